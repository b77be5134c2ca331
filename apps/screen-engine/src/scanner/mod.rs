//! Universe scanning: presets, the two-phase filter, and the bounded
//! worker pool.

mod engine;
mod universe;

pub use engine::{QuickFilterSettings, ScannerSettings, UniverseScanner};
pub use universe::{LARGE_CAP, NASDAQ_100, resolve};
