use serde::{Deserialize, Serialize};

/// Default traversal parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Rows per batch for batched traversal
    /// Default: 50
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Rows per page for paginated traversal
    /// Default: 100
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Items buffered between the blocking worker and an async consumer
    /// Default: 16
    #[serde(default = "default_async_buffer")]
    pub async_buffer: usize,
}

fn default_batch_size() -> usize {
    50
}

fn default_page_size() -> usize {
    100
}

fn default_async_buffer() -> usize {
    16
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            page_size: default_page_size(),
            async_buffer: default_async_buffer(),
        }
    }
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_async_buffer(mut self, async_buffer: usize) -> Self {
        self.async_buffer = async_buffer;
        self
    }
}
