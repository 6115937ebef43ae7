use quill_types::{CommentId, PostId};
use thiserror::Error;

/// Errors from comment thread operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentError {
    /// A reply named a parent that is not a top-level comment of the post.
    #[error("parent comment {parent_id} not found in post {post_id}")]
    ParentNotFound { post_id: PostId, parent_id: CommentId },

    /// No comment or reply with this id exists in the post.
    #[error("comment {comment_id} not found in post {post_id}")]
    CommentNotFound { post_id: PostId, comment_id: CommentId },

    /// A comment with this id already exists in the post.
    #[error("duplicate comment id {0}")]
    DuplicateId(CommentId),

    /// The entry being added belongs to a different post.
    #[error("comment belongs to post {actual}, not {expected}")]
    PostMismatch { expected: PostId, actual: PostId },

    /// The persisted snapshot was written by a newer schema.
    #[error("unsupported snapshot version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },

    /// The persisted snapshot is not a JSON object.
    #[error("malformed snapshot: {0}")]
    Decode(String),

    /// The persisted snapshot is a JSON object this build cannot read, for
    /// example one with an unknown post type.
    #[error("incompatible snapshot: {0}")]
    Incompatible(String),

    /// Serialization failure while encoding a snapshot.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience type alias for comment operations.
pub type CommentResult<T> = std::result::Result<T, CommentError>;
