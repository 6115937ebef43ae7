use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Upper bound on comment length, enforced by producers (compose boxes),
/// not by the comment store.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Category of the post a comment was written on.
///
/// Informational only: store behavior is identical for both kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Feed,
    Reel,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Reel => "reel",
        }
    }
}

impl FromStr for PostType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feed" => Ok(Self::Feed),
            "reel" => Ok(Self::Reel),
            other => Err(TypeError::UnknownPostType(other.to_string())),
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
