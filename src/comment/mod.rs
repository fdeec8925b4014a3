//! Comment model as reported by the host blog.
//!
//! The host owns comments; this crate only reads them. Field names follow the
//! host's wire format (`coid`, `cid`, `text`) so hook payloads deserialize
//! without a mapping layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    /// Awaiting moderation. The host calls this `waiting`.
    #[serde(rename = "waiting", alias = "pending")]
    Pending,
    Approved,
    Spam,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Pending => "waiting",
            CommentStatus::Approved => "approved",
            CommentStatus::Spam => "spam",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comment as handed to the hooks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id; zero or absent before the host assigns one.
    #[serde(default)]
    pub coid: i64,

    /// Id of the post or page the comment belongs to
    #[serde(default)]
    pub cid: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CommentStatus>,
}

impl Comment {
    /// Status used for creation-time decisions. The host omits it for
    /// comments that skip moderation, so absent means approved.
    pub fn effective_status(&self) -> CommentStatus {
        self.status.unwrap_or(CommentStatus::Approved)
    }
}

/// Payload of the comment-created hook.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentCreated {
    pub comment: Comment,

    /// Title of the parent post, when the host knows it
    #[serde(default)]
    pub post_title: Option<String>,
}

/// Payload of the comment-edited hook.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentEdited {
    /// The comment after the edit
    pub comment: Comment,

    /// Status the comment had before the edit
    #[serde(default)]
    pub previous_status: Option<CommentStatus>,

    #[serde(default)]
    pub post_title: Option<String>,
}
