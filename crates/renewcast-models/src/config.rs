use serde::{Deserialize, Serialize};

use crate::keys::DEFAULT_KEY_PREFIX;

/// Top-level configuration for renewcast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenewcastConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Path to the shared SQLite database holding the subscriptions table.
    pub sqlite_path: String,
}

/// Configuration for the estimate cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of entries held in memory.
    #[serde(default = "default_max_capacity")]
    pub memory_max_capacity: u64,
    /// How long a computed estimate is served from cache, in seconds.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Prefix for cache keys, so deployments can share a backend.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_max_capacity: default_max_capacity(),
            ttl_seconds: default_ttl(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Before,
    After,
}

/// How revenue amounts are rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencyConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default)]
    pub position: SymbolPosition,
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
    /// Digits after the decimal separator.
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            position: SymbolPosition::default(),
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
            decimals: default_decimals(),
        }
    }
}

fn default_max_capacity() -> u64 {
    1024
}
fn default_ttl() -> u64 {
    300
}
fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}
fn default_symbol() -> String {
    "$".to_string()
}
fn default_thousands_separator() -> String {
    ",".to_string()
}
fn default_decimal_separator() -> String {
    ".".to_string()
}
fn default_decimals() -> u32 {
    2
}
