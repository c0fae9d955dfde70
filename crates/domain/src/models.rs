use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Body stored in place of a soft-deleted comment's content.
pub const DELETED_PLACEHOLDER: &str = "[deleted]";
/// Body used when a moderator restores a comment without supplying text.
pub const RESTORED_PLACEHOLDER: &str = "[restored]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn can_moderate(self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {:?}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

/// Verified caller identity, supplied by the upstream authentication layer.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_id: String,
    pub comment_count: i64,
    pub created_at: NaiveDateTime,
}

/// A comment in a post's reply tree.
///
/// `ancestors` holds the chain from thread root to immediate parent, so a
/// reply's chain is always its parent's chain plus the parent's id. Top-level
/// comments have an empty chain and no parent. The chain is computed once at
/// creation and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author_id: String,
    pub post_id: String,
    pub parent_comment_id: Option<String>,
    pub ancestors: Vec<String>,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A comment annotated with how many direct replies it has.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithReplies {
    pub comment: Comment,
    pub reply_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    HardDelete,
    Restore,
}

impl ModerationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ModerationAction::HardDelete => "hard_delete",
            ModerationAction::Restore => "restore",
        }
    }
}

impl FromStr for ModerationAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hard_delete" => Ok(ModerationAction::HardDelete),
            "restore" => Ok(ModerationAction::Restore),
            other => Err(format!("unknown moderation action: {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Comment,
    Post,
    User,
}

impl TargetType {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Comment => "comment",
            TargetType::Post => "post",
            TargetType::User => "user",
        }
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comment" => Ok(TargetType::Comment),
            "post" => Ok(TargetType::Post),
            "user" => Ok(TargetType::User),
            other => Err(format!("unknown target type: {:?}", other)),
        }
    }
}

/// Append-only audit record of a moderation action. `metadata` carries a
/// snapshot of whatever prior state the action destroyed or replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationLog {
    pub id: String,
    pub moderator_id: String,
    pub action: ModerationAction,
    pub target_type: TargetType,
    pub target_id: String,
    pub reason: String,
    pub metadata: serde_json::Value,
    pub created_at: NaiveDateTime,
}

/// A log row with the moderator's cached display name joined in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(flatten)]
    pub log: ModerationLog,
    pub moderator_name: Option<String>,
}
