use serde::{Deserialize, Serialize};

/// The watched root folder and the daemon's own bind address, persisted as
/// part of the global settings store alongside provider credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    pub root_folder: String,
    pub host: String,
    pub port: u16,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            root_folder: "~/sefs_root".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8484,
        }
    }
}
