// In crates/core-types/src/lib.rs

pub mod error;
pub mod lenient;
pub mod sort;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use sort::{Column, SortKey, SortState};
pub use types::{
    AssetRecord, BollingerBands, IndicatorSnapshot, Macd, NormalizedAsset, SignalCategory,
    Snapshot,
};
