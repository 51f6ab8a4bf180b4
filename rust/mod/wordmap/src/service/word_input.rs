//! Word-input ledger. Each user holds at most one word per target user.
//!
//! Both write paths run inside a single atomic document update, so two
//! concurrent submissions by the same user never lose each other.

use wordmap_core::now_rfc3339;

use crate::model::{UserView, WordInput, WordMapEntry};
use crate::service::user::summary_index;
use crate::service::{WordMapError, WordMapService};

/// Result of [`WordMapService::upsert_word_input`].
#[derive(Debug)]
pub struct UpsertOutcome {
    /// The caller after the write, references resolved.
    pub user: UserView,
    /// True if a new entry was appended, false if an existing one was replaced.
    pub created: bool,
}

fn normalize_word(word: &str) -> Result<String, WordMapError> {
    let word = word.trim();
    if word.is_empty() {
        return Err(WordMapError::Validation("word is required".into()));
    }
    Ok(word.to_string())
}

impl WordMapService {
    /// Record or revise the caller's word about `target_id`.
    pub fn upsert_word_input(
        &self,
        caller_id: &str,
        target_id: &str,
        word: &str,
    ) -> Result<UpsertOutcome, WordMapError> {
        let word = normalize_word(word)?;
        let target = self
            .find_user(target_id)?
            .ok_or(WordMapError::TargetNotFound)?;

        let (user, created) = self
            .update_user(caller_id, |user| {
                let now = now_rfc3339();
                match user.word_input_index(target_id) {
                    Some(i) => {
                        let entry = &mut user.word_inputs[i];
                        entry.word = word.clone();
                        entry.updated_at = now;
                        Ok(false)
                    }
                    None => {
                        user.word_inputs.push(WordInput {
                            target_user: target_id.to_string(),
                            word: word.clone(),
                            created_at: now.clone(),
                            updated_at: now,
                        });
                        Ok(true)
                    }
                }
            })?
            .ok_or_else(|| WordMapError::NotFound("User not found".into()))?;

        tracing::info!(
            user_id = %user.id,
            user_name = %user.name,
            target_user_id = %target.id,
            target_user_name = %target.name,
            created,
            "word input recorded"
        );

        Ok(UpsertOutcome {
            user: self.resolve_user(user)?,
            created,
        })
    }

    /// Replace the word on the caller's existing entry for `target_id`.
    ///
    /// Unlike [`upsert_word_input`](Self::upsert_word_input) this never
    /// appends: without a prior entry it fails with `NotFound`.
    pub fn update_word_input(
        &self,
        caller_id: &str,
        target_id: &str,
        word: &str,
    ) -> Result<UserView, WordMapError> {
        let word = normalize_word(word)?;

        let (user, ()) = self
            .update_user(caller_id, |user| {
                let i = user
                    .word_input_index(target_id)
                    .ok_or_else(|| WordMapError::NotFound("Word input not found".into()))?;
                let entry = &mut user.word_inputs[i];
                entry.word = word;
                entry.updated_at = now_rfc3339();
                Ok(())
            })?
            .ok_or_else(|| WordMapError::NotFound("Word input not found".into()))?;

        tracing::info!(user_id = %user.id, target_user_id = %target_id, "word input updated");
        self.resolve_user(user)
    }

    /// Every word other users have written about `target_id`.
    ///
    /// Ordered by submitter (store order), then by entry order. Entries
    /// whose target no longer exists are skipped. No visibility check is
    /// applied here; `wordMapVisible` is a display flag for clients.
    pub fn word_inputs_for(&self, target_id: &str) -> Result<Vec<WordMapEntry>, WordMapError> {
        let users = self.scan_users()?;
        let index = summary_index(&users);

        let mut entries = Vec::new();
        for user in &users {
            for input in &user.word_inputs {
                if input.target_user.is_empty() || input.target_user != target_id {
                    continue;
                }
                let Some(target) = index.get(&input.target_user) else {
                    continue;
                };
                entries.push(WordMapEntry {
                    target_user: target.clone(),
                    word: input.word.clone(),
                    submitted_by: user.name.clone(),
                    created_at: input.created_at.clone(),
                    updated_at: input.updated_at.clone(),
                });
            }
        }

        tracing::debug!(target_user_id = %target_id, count = entries.len(), "word inputs fetched");
        Ok(entries)
    }
}
