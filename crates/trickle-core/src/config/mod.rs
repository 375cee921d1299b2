pub mod source;
pub mod stream;

pub use source::SourceConfig;
pub use stream::StreamConfig;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration as loaded from a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrickleConfig {
    pub source: SourceConfig,

    #[serde(default)]
    pub stream: StreamConfig,
}

impl TrickleConfig {
    pub fn new(path: PathBuf) -> Self {
        Self {
            source: SourceConfig::new(path),
            stream: StreamConfig::default(),
        }
    }
}
