//! Moderation-mode dispatch policy.
//!
//! Decides whether a comment event warrants a notification and which template
//! set to render it with. Pure functions over in-memory values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::comment::CommentStatus;

/// Which comment states trigger a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationMode {
    All,
    #[default]
    PendingOnly,
    ApprovedOnly,
}

impl ModerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationMode::All => "all",
            ModerationMode::PendingOnly => "pending_only",
            ModerationMode::ApprovedOnly => "approved_only",
        }
    }

    fn notifies_approved(&self) -> bool {
        matches!(self, ModerationMode::All | ModerationMode::ApprovedOnly)
    }
}

impl fmt::Display for ModerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Title/body template pair to render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSet {
    Pending,
    Approved,
}

/// Why an event was not dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Spam,
    /// Status not covered by the configured moderation mode
    ModeExcludes,
    /// Edit did not move the comment into the approved state
    NoApproval,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::Spam => "spam comment",
            SkipReason::ModeExcludes => "status excluded by moderation mode",
            SkipReason::NoApproval => "edit is not an approval",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip(SkipReason),
    Send(TemplateSet),
}

impl Decision {
    pub fn is_send(&self) -> bool {
        matches!(self, Decision::Send(_))
    }
}

/// Decision for a newly created comment.
pub fn decide_on_create(status: CommentStatus, mode: ModerationMode) -> Decision {
    let set = match status {
        CommentStatus::Spam => return Decision::Skip(SkipReason::Spam),
        CommentStatus::Pending => TemplateSet::Pending,
        CommentStatus::Approved => TemplateSet::Approved,
    };

    let allowed = match mode {
        ModerationMode::All => true,
        ModerationMode::PendingOnly => set == TemplateSet::Pending,
        ModerationMode::ApprovedOnly => set == TemplateSet::Approved,
    };

    if allowed {
        Decision::Send(set)
    } else {
        Decision::Skip(SkipReason::ModeExcludes)
    }
}

/// Decision for an edited comment.
///
/// Only a transition into `approved` from some other known status notifies,
/// and only when the mode covers approved comments. An edited comment with no
/// status is not approved.
pub fn decide_on_edit(
    previous: Option<CommentStatus>,
    current: Option<CommentStatus>,
    mode: ModerationMode,
) -> Decision {
    if current == Some(CommentStatus::Spam) {
        return Decision::Skip(SkipReason::Spam);
    }

    let approved_now = current == Some(CommentStatus::Approved);
    let was_unapproved = matches!(previous, Some(prev) if prev != CommentStatus::Approved);

    if !(approved_now && was_unapproved) {
        return Decision::Skip(SkipReason::NoApproval);
    }

    if !mode.notifies_approved() {
        return Decision::Skip(SkipReason::ModeExcludes);
    }

    Decision::Send(TemplateSet::Approved)
}
