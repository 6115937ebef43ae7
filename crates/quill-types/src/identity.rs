use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

fn validate(id: &str) -> Result<(), TypeError> {
    if id.is_empty() {
        return Err(TypeError::EmptyId);
    }
    if let Some(ch) = id.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(TypeError::InvalidIdChar {
            id: id.to_string(),
            ch,
        });
    }
    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap an identifier string.
            pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
                let id = id.into();
                validate(&id)?;
                Ok(Self(id))
            }

            /// Wrap a literal identifier.
            ///
            /// # Panics
            ///
            /// Panics if `id` is not a valid identifier. Intended for
            /// compile-time constants such as fixtures and seed data.
            pub fn from_static(id: &'static str) -> Self {
                match validate(id) {
                    Ok(()) => Self(id.to_string()),
                    Err(e) => panic!("invalid static {}: {e}", stringify!($name)),
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Identifier of a single comment or reply.
    ///
    /// Persisted identifiers are opaque strings. Comments created locally get
    /// a UUIDv7 token, so identifiers sort by creation time and are never
    /// reused.
    CommentId
}

string_id! {
    /// Identifier of the post (feed item or reel) a thread belongs to.
    PostId
}

string_id! {
    /// Identifier of a user account.
    UserId
}

impl CommentId {
    /// Generate a fresh, time-ordered comment identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }
}

/// Snapshot of the authoring user, taken when a comment is written.
///
/// Comments keep this copy for their whole lifetime. Later profile changes
/// are not reflected in historical comments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Author {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}
