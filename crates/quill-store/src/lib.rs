//! Device-local key-value persistence for Quill.
//!
//! The comment store keeps its whole state as one serialized document under
//! a single key. This crate provides the storage seam it writes through: an
//! async [`KeyValueStore`] trait and two backends.
//!
//! # Storage Backends
//!
//! - [`InMemoryKeyValueStore`] -- `HashMap`-based store for tests and embedding,
//!   with switchable fault modes for exercising recovery paths
//! - [`FileKeyValueStore`] -- one file per key inside a data directory
//!
//! # Design Rules
//!
//! 1. Values are opaque strings; the store never interprets them.
//! 2. Every operation is independently failable and reports a [`StoreError`].
//! 3. `remove` of a missing key is not an error.
//! 4. File writes are atomic: a reader sees either the old or the new value.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileKeyValueStore;
pub use memory::{FaultMode, InMemoryKeyValueStore};
pub use traits::KeyValueStore;
