//! Configuration loading for VipaniCart

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize, Default)]
pub struct CartConfig {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub trip: TripConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

/// Store catalog: item shelf locations plus the base/cashier pose.
///
/// Items are an array of tables so the declared order is preserved;
/// resolution scans entries in exactly this order.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct CatalogConfig {
    /// Shelf entries in declared order.
    #[serde(default)]
    pub items: Vec<CatalogItemConfig>,

    /// Base/cashier pose `[x, y, heading_radians]` the robot returns to
    /// after every trip.
    #[serde(default)]
    pub base: [f32; 3],
}

/// One shelf entry: canonical key and its pose in the map frame.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogItemConfig {
    pub key: String,

    /// `[x, y, heading_radians]`
    pub position: [f32; 3],
}

/// Trip execution tuning
#[derive(Clone, Debug, Deserialize)]
pub struct TripConfig {
    /// Backend status poll interval in milliseconds (default: 100)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Pick-up dwell after a reached shelf, in seconds (default: 2.0)
    #[serde(default = "default_dwell_secs")]
    pub dwell_secs: f32,

    /// Log remaining-distance feedback every N polls (default: 10)
    #[serde(default = "default_feedback_log_every")]
    pub feedback_log_every: u32,

    /// How long to wait for backend readiness before failing a
    /// submission, in seconds (default: 30.0)
    #[serde(default = "default_readiness_timeout_secs")]
    pub readiness_timeout_secs: f32,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            dwell_secs: default_dwell_secs(),
            feedback_log_every: default_feedback_log_every(),
            readiness_timeout_secs: default_readiness_timeout_secs(),
        }
    }
}

/// Scan ingestion settings
#[derive(Clone, Debug, Deserialize)]
pub struct ScannerConfig {
    /// Trailing window suppressing repeats of the identical barcode,
    /// in seconds (default: 5.0)
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: f32,

    /// Barcode → product table
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            debounce_secs: default_debounce_secs(),
            products: Vec::new(),
        }
    }
}

/// One product master entry
#[derive(Clone, Debug, Deserialize)]
pub struct ProductConfig {
    pub code: String,
    pub name: String,
    /// Price in whole yen
    pub price: u32,
}

/// Simulated backend settings (used when no real backend is attached)
#[derive(Clone, Debug, Deserialize)]
pub struct SimConfig {
    /// Straight-line travel speed in m/s (default: 1.0)
    #[serde(default = "default_sim_speed")]
    pub speed_mps: f32,

    /// Time acceleration factor; 2.0 halves every travel time (default: 1.0)
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f32,

    /// Goal positions within `blocked_radius` of any of these `[x, y]`
    /// points report `failed` (for exercising failure handling).
    #[serde(default)]
    pub blocked: Vec<[f32; 2]>,

    /// Radius around blocked points in meters (default: 0.5)
    #[serde(default = "default_blocked_radius")]
    pub blocked_radius: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            speed_mps: default_sim_speed(),
            speed_factor: default_speed_factor(),
            blocked: Vec::new(),
            blocked_radius: default_blocked_radius(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_dwell_secs() -> f32 {
    2.0
}

fn default_feedback_log_every() -> u32 {
    10
}

fn default_readiness_timeout_secs() -> f32 {
    30.0
}

fn default_debounce_secs() -> f32 {
    5.0
}

fn default_sim_speed() -> f32 {
    1.0
}

fn default_speed_factor() -> f32 {
    1.0
}

fn default_blocked_radius() -> f32 {
    0.5
}

impl CartConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: CartConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CartConfig::default();
        assert_eq!(config.trip.poll_interval_ms, 100);
        assert!(config.trip.dwell_secs > 0.0);
        assert_eq!(config.scanner.debounce_secs, 5.0);
        assert!(config.catalog.items.is_empty());
    }

    #[test]
    fn test_parse_catalog_order_preserved() {
        let toml_str = r#"
            [catalog]
            base = [4.3, -1.6, -1.57]

            [[catalog.items]]
            key = "curry roux"
            position = [6.5, 7.9, 1.57]

            [[catalog.items]]
            key = "onion"
            position = [8.4, -1.2, 1.57]

            [[catalog.items]]
            key = "carrot"
            position = [10.8, -1.3, 1.57]

            [trip]
            dwell_secs = 0.5

            [[scanner.products]]
            code = "4902102000186"
            name = "コカ・コーラ 500ml"
            price = 160
        "#;

        let config: CartConfig = toml::from_str(toml_str).unwrap();
        let keys: Vec<&str> = config.catalog.items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["curry roux", "onion", "carrot"]);
        assert_eq!(config.catalog.base[0], 4.3);
        assert_eq!(config.trip.dwell_secs, 0.5);
        assert_eq!(config.scanner.products[0].price, 160);
    }
}
