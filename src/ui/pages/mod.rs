pub mod defects;
pub mod fleet;
pub mod settings;

pub use defects::DefectsPage;
pub use fleet::FleetPage;
pub use settings::SettingsPage;
