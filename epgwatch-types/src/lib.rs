//! # epgwatch-types
//!
//! Core types for EPGStation observability. This crate defines the fixed
//! schema shared by the API adapter, the plugin host helper and the
//! `mackerel-plugin-epgstation` binary.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to emit plugin meta JSON
//! - **Closed schema**: Every metric family is an enum variant, so graph tables
//!   cannot reference a metric that has no extraction rule
//! - **Ergonomic builders**: Fluent API for graph definitions and results
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use epgwatch_types::{CollectionResult, GraphDefinition, MetricFamily, Unit};
//!
//! let graphs = GraphDefinition::builder()
//!     .graph("encode", |g| {
//!         g.label("EPGStation Encode")
//!          .unit(Unit::Integer)
//!          .metric("queue", "Encode Queues")
//!     })
//!     .build();
//!
//! let result = CollectionResult::builder()
//!     .timestamp_secs(1703160000)
//!     .family(MetricFamily::Queue, 2.0)
//!     .build();
//!
//! assert_eq!(graphs.len(), 1);
//! assert_eq!(result.get_family(MetricFamily::Queue), Some(2.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod graph;
mod metrics;
mod result;

pub use graph::*;
pub use metrics::*;
pub use result::*;
