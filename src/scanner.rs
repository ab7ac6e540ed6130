//! Scan ingestion: barcode debounce, product lookup, cart accumulation.
//!
//! One physical pass of a barcode in front of the scanner can decode many
//! times per second, so [`ScanDebounce`] suppresses repeats of the identical
//! code inside a trailing window before they become [`ScanEvent`]s. Debounce
//! is a property of this ingestion boundary, not of checklist reconciliation.
//!
//! The [`ProductTable`] is the static barcode → `{name, price}` master from
//! configuration; [`CartState`] accumulates accepted scans into the running
//! total, independent of whether the checklist matched anything.

use crate::config::{ProductConfig, ScannerConfig};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A decoded, debounced, product-resolved scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanEvent {
    /// Raw barcode (JAN code).
    pub code: String,
    /// Resolved display name.
    pub name: String,
    /// Price in whole yen.
    pub price: u32,
}

/// Trailing-window repeat suppression for raw codes.
///
/// A code passes if it differs from the previous one or if the window has
/// elapsed since the previous acceptance; unknown codes are tracked too so
/// a lingering unregistered barcode does not spam warnings.
#[derive(Debug)]
pub struct ScanDebounce {
    window: Duration,
    last_code: Option<String>,
    last_accept: Option<Instant>,
}

impl ScanDebounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_code: None,
            last_accept: None,
        }
    }

    /// Whether a raw code should pass the ingestion boundary now.
    ///
    /// Accepting a code updates the trailing window.
    pub fn accept(&mut self, code: &str) -> bool {
        self.accept_at(code, Instant::now())
    }

    fn accept_at(&mut self, code: &str, now: Instant) -> bool {
        let repeat_in_window = match (&self.last_code, self.last_accept) {
            (Some(last), Some(at)) => last == code && now.duration_since(at) < self.window,
            _ => false,
        };

        if repeat_in_window {
            return false;
        }

        self.last_code = Some(code.to_string());
        self.last_accept = Some(now);
        true
    }
}

/// Static barcode → product master.
#[derive(Debug, Clone, Default)]
pub struct ProductTable {
    products: HashMap<String, ProductConfig>,
}

impl ProductTable {
    pub fn from_config(products: &[ProductConfig]) -> Self {
        Self {
            products: products
                .iter()
                .map(|p| (p.code.clone(), p.clone()))
                .collect(),
        }
    }

    /// Resolve a raw code to a scan event, `None` for unregistered codes.
    pub fn lookup(&self, code: &str) -> Option<ScanEvent> {
        self.products.get(code).map(|p| ScanEvent {
            code: p.code.clone(),
            name: p.name.clone(),
            price: p.price,
        })
    }
}

/// One accumulated cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub name: String,
    pub price: u32,
}

/// Running cart total for the session.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// Add a scanned product to the cart.
    pub fn add(&mut self, event: &ScanEvent) {
        self.items.push(CartItem {
            name: event.name.clone(),
            price: event.price,
        });
    }

    pub fn total_price(&self) -> u32 {
        self.items.iter().map(|i| i.price).sum()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Empty the cart (explicit cart-clear or payment completion).
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Result of ingesting one raw code.
#[derive(Debug, Clone, PartialEq)]
pub enum Ingest {
    /// Debounced and resolved; ready for reconciliation and the cart.
    Accepted(ScanEvent),
    /// Identical code inside the debounce window; dropped.
    Suppressed,
    /// Code not in the product master. Still consumes the debounce window
    /// so a barcode lingering in front of the camera is reported once.
    Unknown(String),
}

/// Scan ingestion pipeline: debounce, then product lookup.
#[derive(Debug)]
pub struct Scanner {
    debounce: ScanDebounce,
    products: ProductTable,
}

impl Scanner {
    pub fn from_config(config: &ScannerConfig) -> Self {
        Self {
            debounce: ScanDebounce::new(Duration::from_secs_f32(config.debounce_secs)),
            products: ProductTable::from_config(&config.products),
        }
    }

    /// Ingest a raw code.
    pub fn ingest(&mut self, code: &str) -> Ingest {
        if !self.debounce.accept(code) {
            return Ingest::Suppressed;
        }

        match self.products.lookup(code) {
            Some(event) => Ingest::Accepted(event),
            None => Ingest::Unknown(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ProductTable {
        ProductTable::from_config(&[
            ProductConfig {
                code: "4902102000186".to_string(),
                name: "コカ・コーラ 500ml".to_string(),
                price: 160,
            },
            ProductConfig {
                code: "1111111111111".to_string(),
                name: "玉ねぎ".to_string(),
                price: 200,
            },
        ])
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let table = table();
        let event = table.lookup("4902102000186").unwrap();
        assert_eq!(event.name, "コカ・コーラ 500ml");
        assert_eq!(event.price, 160);
        assert!(table.lookup("0000000000000").is_none());
    }

    #[test]
    fn test_debounce_suppresses_repeat_in_window() {
        let mut debounce = ScanDebounce::new(Duration::from_secs(5));
        let start = Instant::now();

        assert!(debounce.accept_at("A", start));
        assert!(!debounce.accept_at("A", start + Duration::from_secs(1)));
        // A different code passes immediately.
        assert!(debounce.accept_at("B", start + Duration::from_secs(2)));
        // The original code passes again once the window elapsed.
        assert!(debounce.accept_at("A", start + Duration::from_secs(8)));
    }

    #[test]
    fn test_debounce_window_restarts_on_accept() {
        let mut debounce = ScanDebounce::new(Duration::from_secs(5));
        let start = Instant::now();

        assert!(debounce.accept_at("A", start));
        assert!(debounce.accept_at("A", start + Duration::from_secs(6)));
        // Window restarted at t=6, so t=9 is still inside it.
        assert!(!debounce.accept_at("A", start + Duration::from_secs(9)));
    }

    #[test]
    fn test_cart_accumulation() {
        let mut cart = CartState::default();
        let table = table();
        cart.add(&table.lookup("4902102000186").unwrap());
        cart.add(&table.lookup("1111111111111").unwrap());

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_price(), 360);

        cart.clear();
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total_price(), 0);
    }

    #[test]
    fn test_scanner_pipeline() {
        let config = ScannerConfig {
            debounce_secs: 5.0,
            products: vec![ProductConfig {
                code: "1111111111111".to_string(),
                name: "玉ねぎ".to_string(),
                price: 200,
            }],
        };
        let mut scanner = Scanner::from_config(&config);

        match scanner.ingest("1111111111111") {
            Ingest::Accepted(event) => assert_eq!(event.name, "玉ねぎ"),
            other => panic!("expected accepted scan, got {:?}", other),
        }
        // Immediate repeat is debounced, not re-added.
        assert_eq!(scanner.ingest("1111111111111"), Ingest::Suppressed);
        // Unknown code is surfaced.
        assert_eq!(
            scanner.ingest("9999999999999"),
            Ingest::Unknown("9999999999999".to_string())
        );
    }
}
