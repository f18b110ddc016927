//! Configuration loading and management

use crate::core::error::{ConfigError, Result};
use crate::storage::DEFAULT_POSTS_KEY;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Page-size bounds for one listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListingConfig {
    /// Page size used when a request does not send `limit`
    pub page_size: usize,

    /// Upper bound on a requested `limit`
    pub max_page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListingsConfig {
    pub posts: ListingConfig,
    pub users: ListingConfig,
}

/// Where the post collection lives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Key of the JSON blob holding all posts
    pub posts_key: String,

    /// Write the sample posts when the collection is empty at startup
    pub seed_sample_posts: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            posts_key: DEFAULT_POSTS_KEY.to_string(),
            seed_sample_posts: true,
        }
    }
}

/// Complete application configuration
///
/// Every section is optional in YAML; missing values take their defaults.
///
/// ```yaml
/// server:
///   host: 0.0.0.0
///   port: 8080
/// listings:
///   posts: { page_size: 10, max_page_size: 50 }
/// storage:
///   seed_sample_posts: false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub listings: ListingsConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the listings cannot work with
    pub fn validate(&self) -> Result<()> {
        for (name, listing) in [("posts", &self.listings.posts), ("users", &self.listings.users)] {
            if listing.page_size == 0 {
                return Err(invalid(format!("listings.{name}.page_size"), "must be at least 1"));
            }
            if listing.max_page_size < listing.page_size {
                return Err(invalid(
                    format!("listings.{name}.max_page_size"),
                    "must not be smaller than page_size",
                ));
            }
        }
        if self.storage.posts_key.trim().is_empty() {
            return Err(invalid("storage.posts_key".to_string(), "must not be empty"));
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| invalid("server.host".to_string(), &e.to_string()))
    }
}

fn invalid(field: String, message: &str) -> crate::core::BlogError {
    ConfigError::InvalidValue {
        field,
        message: message.to_string(),
    }
    .into()
}
