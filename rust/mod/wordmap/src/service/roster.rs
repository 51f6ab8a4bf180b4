use crate::model::UserView;
use crate::service::user::{resolve_with, summary_index};
use crate::service::{WordMapError, WordMapService};

impl WordMapService {
    /// The whole roster, without access codes, references resolved.
    pub fn list_users(&self) -> Result<Vec<UserView>, WordMapError> {
        let users = self.scan_users()?;
        let index = summary_index(&users);
        Ok(users
            .into_iter()
            .map(|user| resolve_with(user, &index))
            .collect())
    }

    /// The caller first, then every other user exactly once.
    pub fn available_users(&self, caller_id: &str) -> Result<Vec<UserView>, WordMapError> {
        let mut users = self.scan_users()?;
        let index = summary_index(&users);

        let pos = users
            .iter()
            .position(|u| u.id == caller_id)
            .ok_or_else(|| WordMapError::NotFound("User not found".into()))?;
        let caller = users.remove(pos);

        let mut views = Vec::with_capacity(users.len() + 1);
        views.push(resolve_with(caller, &index));
        views.extend(users.into_iter().map(|user| resolve_with(user, &index)));
        Ok(views)
    }

    /// Flip `wordMapVisible` for a user, returning the new value.
    pub fn toggle_word_map_visibility(&self, id: &str) -> Result<bool, WordMapError> {
        let (_, visible) = self
            .update_user(id, |user| {
                user.word_map_visible = !user.word_map_visible;
                Ok(user.word_map_visible)
            })?
            .ok_or_else(|| WordMapError::NotFound("User not found".into()))?;

        tracing::info!(user_id = %id, visible, "word map visibility toggled");
        Ok(visible)
    }
}
