//! Comment threads for Quill.
//!
//! Every post owns a thread: an ordered list of top-level comments, each of
//! which may carry one level of replies. This crate holds the data model and
//! the pure state transitions over it. It performs no I/O; persistence and
//! authoring identity live in `quill-sdk`.
//!
//! # Architecture
//!
//! - **Model** ([`model`]): [`Comment`] owns its [`Reply`] list. A reply has
//!   a mandatory parent and no children, so nesting deeper than one level
//!   cannot be represented.
//! - **Reducer** ([`reducer`]): `reduce(&state, action) -> new state`. The
//!   previous state is never touched; untouched posts and comments are shared
//!   with it.
//! - **Snapshot** ([`snapshot`]): versioned JSON encoding of the whole map,
//!   with migration from the legacy unversioned layout.
//! - **Seed** ([`seed`]): the fixed example threads used when nothing usable
//!   is persisted.
//!
//! # Ordering
//!
//! Top-level comments are newest-first (new comments are prepended). Replies
//! are oldest-first (new replies are appended).

pub mod error;
pub mod model;
pub mod reducer;
pub mod seed;
pub mod snapshot;

pub use error::{CommentError, CommentResult};
pub use model::{Comment, CommentBody, CommentMap, Reply, Thread};
pub use reducer::{reduce, Action, NewEntry};
pub use seed::seed;
pub use snapshot::{decode, encode, Decoded, SCHEMA_VERSION};
