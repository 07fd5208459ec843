//! # epgwatch-adapters
//!
//! Collects metrics from an EPGStation server through its HTTP API.
//!
//! Every metric family maps to one API call and one reduction rule (see
//! [`decode`]). The HTTP client lives behind the `epgstation` feature so that
//! the decoders can be reused without pulling in an HTTP stack.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use epgwatch_adapters::epgstation::EpgStationAdapter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = EpgStationAdapter::builder()
//!         .target("127.0.0.1:8888")
//!         .build()?;
//!
//!     let result = adapter.collect().await?;
//!
//!     for (name, value) in result.iter() {
//!         println!("{name}: {value}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod decode;
pub mod error;

#[cfg(feature = "epgstation")]
pub mod epgstation;

pub use error::AdapterError;

// Re-export types for convenience
pub use epgwatch_types::{CollectionResult, MetricFamily};
