pub mod discord;
pub mod driver;
pub mod error;
pub mod logging;
pub mod presence;
pub mod settings;
