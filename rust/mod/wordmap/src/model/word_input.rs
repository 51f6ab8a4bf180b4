use serde::{Deserialize, Serialize};

use crate::model::UserSummary;

/// One word a user submitted about another user, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInput {
    /// Id of the user this word is about. May dangle if that user was removed.
    pub target_user: String,
    pub word: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A reference to another user, either a bare id or the resolved summary.
///
/// Serializes as the raw id string or as the summary object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetRef {
    Resolved(UserSummary),
    Unresolved(String),
}

/// A word input inside a [`UserView`](crate::model::UserView).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInputView {
    pub target_user: TargetRef,
    pub word: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One entry of a word map: a word about the target, and who wrote it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMapEntry {
    pub target_user: UserSummary,
    pub word: String,
    pub submitted_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of `POST /users/word-input` and `PUT /users/word-input`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInputRequest {
    pub target_user_id: String,
    pub word: String,
}
