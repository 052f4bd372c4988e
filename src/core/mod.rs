pub mod config;
pub mod error;

pub use config::MedRagConfig;
pub use error::{MedRagError, Result};
