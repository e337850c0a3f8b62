pub mod dependencies;
pub mod display;
pub mod file;
pub mod logging;
pub mod settings;
