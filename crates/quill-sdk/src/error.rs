use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("comment store is not loaded yet")]
    NotReady,

    #[error("comment content is empty")]
    EmptyContent,

    #[error("no signed-in user to author the comment")]
    NoAuthor,

    #[error(transparent)]
    Comment(#[from] quill_comments::CommentError),

    #[error("storage error: {0}")]
    Store(#[from] quill_store::StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type SdkResult<T> = Result<T, SdkError>;
