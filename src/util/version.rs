pub const APP_NAME: &str = "FleetWatch";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");
pub const GIT_SHA: Option<&str> = option_env!("GIT_SHA");

/// Release tag when built from a tagged checkout, otherwise the crate version.
pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// Version plus the short commit hash, if known.
pub fn build_label() -> String {
    match GIT_SHA {
        Some(sha) => format!("{} ({sha})", version_label()),
        None => version_label(),
    }
}

pub fn user_agent() -> String {
    format!("{}/{}", APP_NAME.to_lowercase(), version_label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_names_the_app() {
        assert!(user_agent().starts_with("fleetwatch/"));
        assert!(build_label().starts_with(&version_label()));
    }
}
