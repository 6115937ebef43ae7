use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use quill_comments::{
    decode, encode, reduce, seed, Action, Comment, CommentBody, CommentError, CommentMap,
    NewEntry, Reply, Thread,
};
use quill_store::KeyValueStore;
use quill_types::{CommentId, PostId, PostType};

use crate::config::StoreConfig;
use crate::error::{SdkError, SdkResult};
use crate::identity::IdentityProvider;

/// Lifecycle of a [`CommentStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreStatus {
    /// Constructed, [`CommentStore::load`] not yet called.
    Uninitialized,
    /// First load in progress.
    Loading,
    /// Threads are in memory; mutations are accepted.
    Ready,
}

struct State {
    comments: CommentMap,
    status: StoreStatus,
    error: Option<String>,
    /// Cleared when the persisted blob belongs to a newer schema, so that
    /// local edits never overwrite data this build cannot read.
    writable: bool,
}

/// Persisted, per-post comment threads.
///
/// Reads are synchronous and served from memory. Mutations are applied to
/// memory first and then written to storage under a single write gate, so
/// storage always receives snapshots in the order they were produced.
/// A failed write is logged and recorded in [`error`](Self::error); the
/// in-memory change stands.
pub struct CommentStore {
    storage: Arc<dyn KeyValueStore>,
    identity: Arc<dyn IdentityProvider>,
    config: StoreConfig,
    state: RwLock<State>,
    write_gate: Mutex<()>,
}

impl CommentStore {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        identity: Arc<dyn IdentityProvider>,
        config: StoreConfig,
    ) -> Self {
        Self {
            storage,
            identity,
            config,
            state: RwLock::new(State {
                comments: CommentMap::new(),
                status: StoreStatus::Uninitialized,
                error: None,
                writable: true,
            }),
            write_gate: Mutex::new(()),
        }
    }

    /// Construct and load in one step.
    pub async fn open(
        storage: Arc<dyn KeyValueStore>,
        identity: Arc<dyn IdentityProvider>,
        config: StoreConfig,
    ) -> Self {
        let store = Self::new(storage, identity, config);
        store.load().await;
        store
    }

    // ---- Bootstrap ----

    /// Read persisted threads, falling back to the seed.
    ///
    /// - a decodable blob is adopted (legacy layouts are rewritten);
    /// - a missing or malformed blob is removed and the seed is used;
    /// - a storage read failure uses the seed and leaves storage alone;
    /// - a blob from a newer schema is left in place, the seed is used in
    ///   memory and writes are disabled.
    ///
    /// Never fails. Calling it again re-reads storage.
    pub async fn load(&self) {
        let _gate = self.write_gate.lock().await;
        self.update_state(|s| s.status = StoreStatus::Loading);

        let key = self.config.storage_key.as_str();
        let mut writable = true;
        let mut rewrite = false;
        let mut load_error = None;

        let comments = match self.storage.get(key).await {
            Ok(Some(text)) => match decode(&text) {
                Ok(decoded) => {
                    rewrite = decoded.needs_migration();
                    info!(
                        key,
                        posts = decoded.comments.len(),
                        version = decoded.source_version,
                        "loaded persisted comments"
                    );
                    decoded.comments
                }
                Err(CommentError::UnsupportedVersion { found, supported }) => {
                    warn!(key, found, supported, "persisted comments use a newer schema");
                    writable = false;
                    load_error = Some(format!(
                        "persisted comments use schema version {found}; changes will not be saved"
                    ));
                    self.fallback()
                }
                Err(CommentError::Incompatible(reason)) => {
                    warn!(key, %reason, "persisted comments do not match this schema");
                    writable = false;
                    load_error = Some(format!(
                        "persisted comments could not be read ({reason}); changes will not be saved"
                    ));
                    self.fallback()
                }
                Err(e) => {
                    warn!(key, error = %e, "discarding malformed persisted comments");
                    if let Err(e) = self.storage.remove(key).await {
                        warn!(key, error = %e, "failed to remove malformed comments");
                    }
                    self.fallback()
                }
            },
            // Nothing stored, so there is no key to remove.
            Ok(None) => {
                info!(key, "no persisted comments");
                self.fallback()
            }
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted comments");
                load_error = Some(format!("failed to load comments: {e}"));
                self.fallback()
            }
        };

        let snapshot = {
            let mut state = self.state.write().expect("lock poisoned");
            match reduce(&state.comments, Action::SetAll(comments)) {
                Ok(next) => state.comments = next,
                Err(e) => warn!(error = %e, "failed to install loaded comments"),
            }
            state.writable = writable;
            state.error = load_error;
            state.status = StoreStatus::Ready;
            state.comments.clone()
        };

        if rewrite {
            info!(key, "rewriting comments in current schema");
            self.persist(&snapshot).await;
        }
    }

    fn fallback(&self) -> CommentMap {
        if self.config.seed_when_empty {
            seed(Utc::now())
        } else {
            CommentMap::new()
        }
    }

    // ---- Queries ----

    /// Top-level comments of `post_id`, newest first. Empty if unknown.
    pub fn comments(&self, post_id: &PostId) -> Thread {
        self.state.read().expect("lock poisoned").comments.thread(post_id)
    }

    /// Top-level comments plus their direct replies.
    pub fn comment_count(&self, post_id: &PostId) -> usize {
        self.state.read().expect("lock poisoned").comments.count(post_id)
    }

    /// The whole map as of now. Later mutations do not affect it.
    pub fn snapshot(&self) -> CommentMap {
        self.state.read().expect("lock poisoned").comments.clone()
    }

    pub fn status(&self) -> StoreStatus {
        self.state.read().expect("lock poisoned").status
    }

    pub fn loading(&self) -> bool {
        self.status() == StoreStatus::Loading
    }

    /// Last load or persistence failure, store-wide.
    pub fn error(&self) -> Option<String> {
        self.state.read().expect("lock poisoned").error.clone()
    }

    pub fn clear_error(&self) {
        self.update_state(|s| s.error = None);
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ---- Mutations ----

    /// Add a top-level comment, or a reply when `parent_id` is given.
    ///
    /// Content is trimmed. Returns the new comment's id.
    pub async fn add_comment(
        &self,
        post_id: &PostId,
        post_type: PostType,
        content: &str,
        parent_id: Option<&CommentId>,
    ) -> SdkResult<CommentId> {
        self.ensure_ready()?;
        let content = non_empty(content)?;
        let author = self.identity.current_user().ok_or_else(|| {
            debug!(post_id = %post_id, "add_comment without signed-in user");
            SdkError::NoAuthor
        })?;

        let id = CommentId::generate();
        let body = CommentBody::new(
            id.clone(),
            post_id.clone(),
            post_type,
            author,
            content,
            Utc::now(),
        );
        let entry = match parent_id {
            Some(parent) => NewEntry::Reply(Reply::new(body, parent.clone())),
            None => NewEntry::Comment(Comment::new(body)),
        };

        self.dispatch(Action::Add {
            post_id: post_id.clone(),
            entry,
        })
        .await?;
        Ok(id)
    }

    /// Toggle the viewer's like on a comment or reply.
    pub async fn like_comment(&self, post_id: &PostId, comment_id: &CommentId) -> SdkResult<()> {
        self.ensure_ready()?;
        self.dispatch(Action::Like {
            post_id: post_id.clone(),
            comment_id: comment_id.clone(),
        })
        .await
    }

    /// Delete a comment with all its replies, or a single reply.
    pub async fn delete_comment(&self, post_id: &PostId, comment_id: &CommentId) -> SdkResult<()> {
        self.ensure_ready()?;
        self.dispatch(Action::Delete {
            post_id: post_id.clone(),
            comment_id: comment_id.clone(),
        })
        .await
    }

    /// Replace a comment's content. Content is trimmed.
    pub async fn edit_comment(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        new_content: &str,
    ) -> SdkResult<()> {
        self.ensure_ready()?;
        let content = non_empty(new_content)?;
        self.dispatch(Action::Edit {
            post_id: post_id.clone(),
            comment_id: comment_id.clone(),
            content: content.to_string(),
            edited_at: Utc::now(),
        })
        .await
    }

    // ---- Internals ----

    fn ensure_ready(&self) -> SdkResult<()> {
        match self.status() {
            StoreStatus::Ready => Ok(()),
            StoreStatus::Uninitialized | StoreStatus::Loading => Err(SdkError::NotReady),
        }
    }

    fn update_state(&self, f: impl FnOnce(&mut State)) {
        f(&mut self.state.write().expect("lock poisoned"));
    }

    /// Simulated latency, then reduce, swap, persist.
    async fn dispatch(&self, action: Action) -> SdkResult<()> {
        let latency = self.config.simulated_latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let _gate = self.write_gate.lock().await;
        let snapshot = {
            let mut state = self.state.write().expect("lock poisoned");
            match reduce(&state.comments, action) {
                Ok(next) => {
                    state.comments = next;
                    state.comments.clone()
                }
                Err(e) => {
                    debug!(error = %e, "comment action rejected");
                    return Err(e.into());
                }
            }
        };
        self.persist(&snapshot).await;
        Ok(())
    }

    /// Write `comments` to storage. Failures are logged and recorded.
    async fn persist(&self, comments: &CommentMap) {
        let key = self.config.storage_key.as_str();
        let writable = self.state.read().expect("lock poisoned").writable;
        if !writable {
            debug!(key, "skipping write; persisted schema is newer");
            return;
        }

        let result = match encode(comments) {
            Ok(text) => self
                .storage
                .set(key, &text)
                .await
                .map(|()| text.len())
                .map_err(SdkError::from),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(bytes) => {
                debug!(key, bytes, "persisted comments");
                self.update_state(|s| s.error = None);
            }
            Err(e) => {
                warn!(key, error = %e, "failed to persist comments");
                self.update_state(|s| s.error = Some(format!("failed to save comments: {e}")));
            }
        }
    }
}

fn non_empty(content: &str) -> SdkResult<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(SdkError::EmptyContent);
    }
    Ok(trimmed)
}

impl std::fmt::Debug for CommentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().expect("lock poisoned");
        f.debug_struct("CommentStore")
            .field("status", &state.status)
            .field("posts", &state.comments.len())
            .field("error", &state.error)
            .finish()
    }
}
