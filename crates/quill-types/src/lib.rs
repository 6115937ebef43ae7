//! Foundation types for Quill.
//!
//! This crate provides the identifier, authorship and temporal types shared
//! by every other Quill crate. It carries no behavior beyond validation and
//! formatting.
//!
//! # Key Types
//!
//! - [`CommentId`] — Stable comment identifier (time-ordered UUIDv7 for new comments)
//! - [`PostId`] — Identifier of the post a comment thread belongs to
//! - [`UserId`] / [`Author`] — Authoring identity and its denormalized snapshot
//! - [`PostType`] — Feed post vs. reel, informational only
//! - [`relative_time`] — Presentation-side "2h ago" rendering of instants

pub mod error;
pub mod identity;
pub mod post;
pub mod temporal;

pub use error::TypeError;
pub use identity::{Author, CommentId, PostId, UserId};
pub use post::{PostType, MAX_CONTENT_CHARS};
pub use temporal::{relative_time, Timestamp};
