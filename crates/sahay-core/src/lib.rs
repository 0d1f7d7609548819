pub mod config;
pub mod error;
pub mod types;

pub use config::SahayConfig;
pub use error::{Result, SahayError};
pub use types::*;
