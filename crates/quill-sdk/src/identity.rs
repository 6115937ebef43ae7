use std::sync::RwLock;

use quill_types::Author;

/// Source of the user that new comments are attributed to.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<Author>;
}

/// Identity held for the lifetime of an app session.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    user: RwLock<Option<Author>>,
}

impl SessionIdentity {
    pub fn signed_in(author: Author) -> Self {
        Self {
            user: RwLock::new(Some(author)),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, author: Author) {
        *self.user.write().expect("lock poisoned") = Some(author);
    }

    pub fn sign_out(&self) {
        *self.user.write().expect("lock poisoned") = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<Author> {
        self.user.read().expect("lock poisoned").clone()
    }
}
