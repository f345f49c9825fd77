//! Lazy, paginated enumeration of the keys of an object-storage bucket.
//!
//! [`enumerator::KeyEnumerator`] pulls one listing page at a time through a
//! [`adapters::PageFetcher`], filters it (name pattern, zero-byte objects,
//! excluded keys) and hands out keys one by one in listing order.

pub mod adapters;
pub mod config;
pub mod enumerator;
pub mod model;
pub mod pattern;
pub mod util;

pub use adapters::PageFetcher;
pub use enumerator::KeyEnumerator;
pub use model::error::{Error, Result};
pub use pattern::NamePattern;
