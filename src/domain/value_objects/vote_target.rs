//! Vote target and tally value objects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The item a vote is cast on.
///
/// Posts and comments share one voting model; the variant decides which
/// table the vote row lives in and which item's score it contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum VoteTarget {
    Post(i64),
    Comment(i64),
}

impl VoteTarget {
    /// ID of the targeted post or comment.
    pub fn id(&self) -> i64 {
        match self {
            Self::Post(id) | Self::Comment(id) => *id,
        }
    }

    /// Lowercase name of the target kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Post(_) => "post",
            Self::Comment(_) => "comment",
        }
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// Upvote and downvote counts for a single target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteTally {
    pub fn new(upvotes: i64, downvotes: i64) -> Self {
        Self { upvotes, downvotes }
    }

    /// Tally a sequence of vote polarities (`true` = liked).
    pub fn from_polarities<I>(polarities: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        polarities
            .into_iter()
            .fold(Self::default(), |mut tally, liked| {
                if liked {
                    tally.upvotes += 1;
                } else {
                    tally.downvotes += 1;
                }
                tally
            })
    }

    /// Net score: upvotes minus downvotes.
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}
