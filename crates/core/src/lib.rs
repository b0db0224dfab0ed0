//! Climate API Core Library
//!
//! Shared pieces of the climate API service:
//! - Configuration loading (XDG-compliant)
//! - Dataset path checks

mod config;
pub mod fs;

pub use config::{config_candidates, find_config_file, load_config};
pub use fs::is_readable_file;

/// Application name used for XDG paths
pub const APP_NAME: &str = "climate-api";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 5000;

/// Default location of the observation dataset
pub const DEFAULT_DATABASE_PATH: &str = "./Resources/hawaii.sqlite";

/// Default size of the read-only connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
