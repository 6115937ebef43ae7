//! High-level SDK for Quill comments.
//!
//! [`CommentStore`] is the entry point for applications: it owns the
//! per-post comment threads, applies every change through the pure reducer
//! in `quill-comments`, and writes the result to a [`KeyValueStore`].
//! Storage failures never reach callers; they are logged and exposed
//! through [`CommentStore::error`].

pub mod config;
pub mod error;
pub mod identity;
pub mod store;

pub use config::StoreConfig;
pub use error::{SdkError, SdkResult};
pub use identity::{IdentityProvider, SessionIdentity};
pub use store::{CommentStore, StoreStatus};

// Re-export key types
pub use quill_comments::{Comment, CommentBody, CommentError, CommentMap, Reply, Thread};
pub use quill_store::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StoreError};
pub use quill_types::{
    relative_time, Author, CommentId, PostId, PostType, Timestamp, UserId, MAX_CONTENT_CHARS,
};
