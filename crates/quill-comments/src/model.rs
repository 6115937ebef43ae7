use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use quill_types::{Author, CommentId, PostId, PostType, Timestamp};

/// Fields shared by top-level comments and replies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub id: CommentId,
    pub post_id: PostId,
    pub post_type: PostType,
    /// Author as they were when the comment was written.
    pub author: Author,
    pub content: String,
    pub likes: u64,
    /// Whether the local viewer has liked this comment.
    pub is_liked: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<Timestamp>,
}

impl CommentBody {
    /// A fresh, unliked, unedited body.
    pub fn new(
        id: CommentId,
        post_id: PostId,
        post_type: PostType,
        author: Author,
        content: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            post_id,
            post_type,
            author,
            content: content.into(),
            likes: 0,
            is_liked: false,
            created_at,
            is_edited: false,
            edited_at: None,
        }
    }

    pub fn with_likes(mut self, likes: u64, is_liked: bool) -> Self {
        self.likes = likes;
        self.is_liked = is_liked;
        self
    }

    /// Flip the viewer's like, moving `likes` with it.
    ///
    /// Unliking a comment whose counter is already zero leaves it at zero.
    pub fn toggle_like(&mut self) {
        if self.is_liked {
            self.is_liked = false;
            self.likes = self.likes.saturating_sub(1);
        } else {
            self.is_liked = true;
            self.likes += 1;
        }
    }

    /// Replace the content and mark the body edited at `at`.
    pub fn apply_edit(&mut self, content: impl Into<String>, at: Timestamp) {
        self.content = content.into();
        self.is_edited = true;
        self.edited_at = Some(at);
    }
}

/// A reply to a top-level comment. Replies never carry replies of their own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(flatten)]
    pub body: CommentBody,
    pub parent_id: CommentId,
}

impl Reply {
    pub fn new(body: CommentBody, parent_id: CommentId) -> Self {
        Self { body, parent_id }
    }

    pub fn id(&self) -> &CommentId {
        &self.body.id
    }
}

/// A top-level comment and its replies, oldest reply first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(flatten)]
    pub body: CommentBody,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    pub fn new(body: CommentBody) -> Self {
        Self {
            body,
            replies: Vec::new(),
        }
    }

    pub fn with_replies(mut self, replies: Vec<Reply>) -> Self {
        self.replies = replies;
        self
    }

    pub fn id(&self) -> &CommentId {
        &self.body.id
    }

    pub fn reply(&self, id: &CommentId) -> Option<&Reply> {
        self.replies.iter().find(|r| r.id() == id)
    }

    /// Whether `id` names this comment or one of its replies.
    pub fn contains(&self, id: &CommentId) -> bool {
        self.id() == id || self.reply(id).is_some()
    }
}

/// Top-level comments of one post, newest first.
pub type Thread = Arc<Vec<Arc<Comment>>>;

/// Every thread the store knows about, keyed by post.
///
/// Cloning is cheap: the map, each thread, and each comment sit behind
/// `Arc`s. Mutation goes through `Arc::make_mut`, so a writer copies only
/// the map spine, the touched thread and the touched comment, and earlier
/// clones keep observing the old values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentMap {
    posts: Arc<BTreeMap<PostId, Thread>>,
}

impl CommentMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from owned threads, e.g. for seeding.
    pub fn from_threads(threads: impl IntoIterator<Item = (PostId, Vec<Comment>)>) -> Self {
        let posts = threads
            .into_iter()
            .map(|(post, comments)| {
                let thread: Thread = Arc::new(comments.into_iter().map(Arc::new).collect());
                (post, thread)
            })
            .collect();
        Self {
            posts: Arc::new(posts),
        }
    }

    /// The thread for `post`, or an empty one if the post is unknown.
    pub fn thread(&self, post: &PostId) -> Thread {
        self.posts.get(post).cloned().unwrap_or_default()
    }

    /// Borrow the top-level comments of `post`.
    pub fn comments(&self, post: &PostId) -> &[Arc<Comment>] {
        self.posts.get(post).map(|t| t.as_slice()).unwrap_or(&[])
    }

    /// Top-level comments plus their direct replies.
    pub fn count(&self, post: &PostId) -> usize {
        self.comments(post)
            .iter()
            .map(|c| 1 + c.replies.len())
            .sum()
    }

    /// Find a comment or reply body anywhere in `post`.
    pub fn find(&self, post: &PostId, id: &CommentId) -> Option<&CommentBody> {
        self.comments(post).iter().find_map(|c| {
            if c.id() == id {
                Some(&c.body)
            } else {
                c.reply(id).map(|r| &r.body)
            }
        })
    }

    pub fn post_ids(&self) -> impl Iterator<Item = &PostId> {
        self.posts.keys()
    }

    /// Number of posts with a thread entry.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Comments and replies across every post.
    pub fn total_comments(&self) -> usize {
        self.posts.keys().map(|p| self.count(p)).sum()
    }

    /// Returns `true` if both maps share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.posts, &other.posts)
    }

    /// Mutable access to an existing thread, copying shared storage.
    pub(crate) fn thread_mut(&mut self, post: &PostId) -> Option<&mut Vec<Arc<Comment>>> {
        if !self.posts.contains_key(post) {
            return None;
        }
        Arc::make_mut(&mut self.posts).get_mut(post).map(Arc::make_mut)
    }

    /// Mutable access to the thread for `post`, creating it if missing.
    pub(crate) fn thread_entry(&mut self, post: PostId) -> &mut Vec<Arc<Comment>> {
        Arc::make_mut(Arc::make_mut(&mut self.posts).entry(post).or_default())
    }
}
