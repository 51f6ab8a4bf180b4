use serde::{Deserialize, Serialize};

use crate::model::{TargetRef, WordInput, WordInputView};

/// A roster member, as persisted.
///
/// This is the only type that carries `access_code`; everything sent to
/// clients goes through [`UserView`], [`PublicProfile`] or [`UserSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Login secret. Unique across the roster.
    pub access_code: String,

    #[serde(default)]
    pub is_admin: bool,

    /// URL of the uploaded picture, empty when none.
    #[serde(default)]
    pub profile_picture: String,

    /// Whether this user's received words are shown.
    #[serde(default)]
    pub word_map_visible: bool,

    /// Words this user submitted about other users. At most one per target.
    #[serde(default)]
    pub word_inputs: Vec<WordInput>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

impl User {
    /// Index of this user's entry about `target_id`, if any.
    pub fn word_input_index(&self, target_id: &str) -> Option<usize> {
        self.word_inputs
            .iter()
            .position(|input| input.target_user == target_id)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }

    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            is_admin: self.is_admin,
            profile_picture: self.profile_picture.clone(),
        }
    }
}

/// The `{ id, name, profilePicture }` projection used for references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub profile_picture: String,
}

/// Profile returned by login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
    pub profile_picture: String,
}

/// A user as clients see it: no access code, references resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
    pub profile_picture: String,
    pub word_map_visible: bool,
    pub word_inputs: Vec<WordInputView>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserView {
    /// Build the client view of `user`, resolving each target through `lookup`.
    ///
    /// Targets the lookup cannot find stay [`TargetRef::Unresolved`].
    pub fn resolve<E>(
        user: User,
        mut lookup: impl FnMut(&str) -> Result<Option<UserSummary>, E>,
    ) -> Result<Self, E> {
        let mut word_inputs = Vec::with_capacity(user.word_inputs.len());
        for input in user.word_inputs {
            let target_user = match lookup(&input.target_user)? {
                Some(summary) => TargetRef::Resolved(summary),
                None => TargetRef::Unresolved(input.target_user),
            };
            word_inputs.push(WordInputView {
                target_user,
                word: input.word,
                created_at: input.created_at,
                updated_at: input.updated_at,
            });
        }

        Ok(Self {
            id: user.id,
            name: user.name,
            is_admin: user.is_admin,
            profile_picture: user.profile_picture,
            word_map_visible: user.word_map_visible,
            word_inputs,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

/// Input for creating a new user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub access_code: String,
}
