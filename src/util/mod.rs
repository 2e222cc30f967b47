pub mod assets;
pub mod config;
pub mod persistence;
pub mod version;
