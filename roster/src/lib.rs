pub mod contact;
pub mod models;
pub mod room;
pub mod section;

// Engine configuration (sections, directory search, rooms)
pub mod config;

pub use config::Config;
