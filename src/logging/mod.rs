//! Logging infrastructure for console and file output.

mod settings;
mod subscriber;
mod utils;

pub use settings::{LogSettings, level_from_name};
pub use subscriber::init_subscriber;
