//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `EXPLORE_*` environment variables, configuration files
//! and, for the server binary, command-line flags. They are read once at
//! startup and turned into the immutable configs the adapters and the
//! domain service are built from.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::{PageSize, PageSizeError};
use serde::Deserialize;

use crate::domain::ExploreConfig;
use crate::outbound::cache::RedisPoolConfig;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_CACHE_POOL_MAX_SIZE: u32 = 16;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 5;

/// Problems found while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required value was not supplied.
    #[error("missing required setting {name}")]
    Missing {
        /// Environment variable that would supply the value.
        name: &'static str,
    },
    /// The configured page size is out of range.
    #[error("invalid page size: {0}")]
    PageSize(#[from] PageSizeError),
    /// The bind address could not be parsed.
    #[error("invalid bind address {value:?}")]
    BindAddr {
        /// Raw configured value.
        value: String,
    },
}

/// Settings shared by the server and the operator binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXPLORE")]
pub struct ExploreSettings {
    /// PostgreSQL URL for the decision store.
    pub database_url: Option<String>,
    /// Redis URL for the like cache.
    pub redis_url: Option<String>,
    /// Entries per "liked you" page.
    pub page_size: Option<u32>,
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// Maximum PostgreSQL connections.
    pub db_pool_max_size: Option<u32>,
    /// Maximum Redis connections.
    pub cache_pool_max_size: Option<u32>,
    /// Checkout timeout for both pools, in seconds.
    pub pool_timeout_secs: Option<u64>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
}

impl ExploreSettings {
    /// PostgreSQL URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when unset.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url.as_deref().ok_or(SettingsError::Missing {
            name: "EXPLORE_DATABASE_URL",
        })
    }

    /// Redis URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when unset.
    pub fn redis_url(&self) -> Result<&str, SettingsError> {
        self.redis_url.as_deref().ok_or(SettingsError::Missing {
            name: "EXPLORE_REDIS_URL",
        })
    }

    /// Page size, defaulting to [`PageSize::DEFAULT`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::PageSize`] for zero or oversized values.
    pub fn page_size(&self) -> Result<PageSize, SettingsError> {
        match self.page_size {
            Some(size) => Ok(PageSize::new(size)?),
            None => Ok(PageSize::DEFAULT),
        }
    }

    /// Listen address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// Checkout timeout shared by both pools.
    pub fn pool_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_timeout_secs.unwrap_or(DEFAULT_POOL_TIMEOUT_SECS))
    }

    /// Domain service configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`ExploreSettings::page_size`] failures.
    pub fn explore_config(&self) -> Result<ExploreConfig, SettingsError> {
        Ok(ExploreConfig::new(self.page_size()?))
    }

    /// PostgreSQL pool configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when the database URL is unset.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(self.db_pool_max_size.unwrap_or(DEFAULT_DB_POOL_MAX_SIZE))
            .with_connection_timeout(self.pool_timeout()))
    }

    /// Redis pool configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when the Redis URL is unset.
    pub fn redis_pool_config(&self) -> Result<RedisPoolConfig, SettingsError> {
        Ok(RedisPoolConfig::new(self.redis_url()?)
            .with_max_size(self.cache_pool_max_size.unwrap_or(DEFAULT_CACHE_POOL_MAX_SIZE))
            .with_connection_timeout(self.pool_timeout()))
    }
}
