//! Analysis modules.
//!
//! Aggregations over the active record set live in [`aggregator`].

pub mod aggregator;

pub use aggregator::*;
