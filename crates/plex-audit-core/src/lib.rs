pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod progress;
pub mod report;
pub mod storage;

pub use crate::config::AppConfig;
pub use engine::{AuditEngine, AuditResult};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
