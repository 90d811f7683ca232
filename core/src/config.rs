//! Client configuration.
//!
//! The admin talks to a single fixed origin. Tests and local runs point the
//! same client at the mock server by constructing the config explicitly.

use serde::{Deserialize, Serialize};

/// Origin of the hosted store API.
pub const DEFAULT_BASE_URL: &str = "https://store-api-mle0.onrender.com/api";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
