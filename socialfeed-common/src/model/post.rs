use crate::model::Id;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::{collections::BTreeMap, fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct CommentMarker;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub username: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Comment {
    pub id: Id<CommentMarker>,
    pub post_id: Id<PostMarker>,
    pub username: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
}

/// Body of a post or comment: trimmed and never empty.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
pub struct Content {
    content: String,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Content was empty after trimming whitespace")]
pub struct EmptyContentError;

impl Content {
    pub fn new(raw: &str) -> Result<Self, EmptyContentError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(EmptyContentError)
        } else {
            Ok(Self {
                content: trimmed.to_owned(),
            })
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.content
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawContent {
            content: String,
        }

        let raw = RawContent::deserialize(deserializer)?;
        Content::new(&raw.content)
            .map_err(|_| Error::invalid_value(Unexpected::Str(&raw.content), &"non-empty content"))
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Love,
    Laugh,
    Wow,
    Angry,
    Sad,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Unknown reaction: {0}")]
pub struct UnknownReactionError(String);

impl Reaction {
    pub const ALL: [Reaction; 6] = [
        Reaction::Like,
        Reaction::Love,
        Reaction::Laugh,
        Reaction::Wow,
        Reaction::Angry,
        Reaction::Sad,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Reaction::Like => "like",
            Reaction::Love => "love",
            Reaction::Laugh => "laugh",
            Reaction::Wow => "wow",
            Reaction::Angry => "angry",
            Reaction::Sad => "sad",
        }
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reaction {
    type Err = UnknownReactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|reaction| reaction.as_str() == s)
            .ok_or_else(|| UnknownReactionError(s.to_owned()))
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Deserialize, Serialize)]
pub struct ReactionChoice {
    pub reaction: Reaction,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct PostCreated {
    #[serde(default)]
    pub post: Option<Post>,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize)]
pub struct LikeToggled {
    pub liked: bool,
    pub like_count: u64,
}

impl LikeToggled {
    #[must_use]
    pub fn label(self) -> &'static str {
        if self.liked { "Unlike" } else { "Like" }
    }

    #[must_use]
    pub fn count_text(self) -> String {
        format!("{} likes", self.like_count)
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Reacted {
    #[serde(default)]
    pub reactions: BTreeMap<String, u64>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct CommentAdded {
    #[serde(default)]
    pub comment: Option<Comment>,
}
