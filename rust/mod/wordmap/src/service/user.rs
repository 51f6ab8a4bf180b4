use std::collections::HashMap;

use wordmap_core::{new_id, now_rfc3339};

use crate::model::{CreateUser, User, UserSummary, UserView};
use crate::service::{WordMapError, WordMapService};

impl WordMapService {
    /// Create a new user. The access code must not be taken.
    pub fn create_user(&self, input: CreateUser) -> Result<User, WordMapError> {
        self.insert_user(input, false)
    }

    /// Create a new admin user.
    pub fn create_admin(&self, input: CreateUser) -> Result<User, WordMapError> {
        self.insert_user(input, true)
    }

    fn insert_user(&self, input: CreateUser, is_admin: bool) -> Result<User, WordMapError> {
        let name = input.name.trim();
        let access_code = input.access_code.trim();
        if name.is_empty() {
            return Err(WordMapError::Validation("name is required".into()));
        }
        if access_code.is_empty() {
            return Err(WordMapError::Validation("access code is required".into()));
        }

        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            name: name.to_string(),
            access_code: access_code.to_string(),
            is_admin,
            profile_picture: String::new(),
            word_map_visible: false,
            word_inputs: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        };

        let user_key = Self::user_key(&user.id);
        let code_key = Self::code_key(&user.access_code);
        let data = serde_json::to_vec(&user)
            .map_err(|e| WordMapError::Internal(e.to_string()))?;

        // The code index and the document land together, or not at all.
        let inserted = self.kv.insert_new(&[
            (code_key.as_str(), user.id.as_bytes()),
            (user_key.as_str(), data.as_slice()),
        ])?;
        if !inserted {
            return Err(WordMapError::DuplicateAccessCode);
        }

        tracing::info!(user_id = %user.id, is_admin, "user created");
        Ok(user)
    }

    /// Get a user by id.
    pub fn get_user(&self, id: &str) -> Result<User, WordMapError> {
        self.find_user(id)?
            .ok_or_else(|| WordMapError::NotFound("User not found".into()))
    }

    /// Find the user holding `access_code`.
    pub fn find_user_by_access_code(&self, access_code: &str) -> Result<Option<User>, WordMapError> {
        if access_code.is_empty() {
            return Ok(None);
        }
        let Some(id) = self.kv.get(&Self::code_key(access_code))? else {
            return Ok(None);
        };
        let id = String::from_utf8(id).map_err(|e| WordMapError::Internal(e.to_string()))?;
        self.find_user(&id)
    }

    /// Delete a user and its access-code entry. Absent ids are a no-op.
    ///
    /// Word inputs other users wrote about this user are kept; they dangle
    /// and are filtered when read.
    pub fn delete_user(&self, id: &str) -> Result<(), WordMapError> {
        let Some(user) = self.find_user(id)? else {
            tracing::debug!(user_id = %id, "delete of unknown user ignored");
            return Ok(());
        };
        let user_key = Self::user_key(&user.id);
        let code_key = Self::code_key(&user.access_code);
        self.kv.batch_delete(&[user_key.as_str(), code_key.as_str()])?;
        tracing::info!(user_id = %id, "user removed");
        Ok(())
    }

    /// Number of users on the roster.
    pub fn count_users(&self) -> Result<usize, WordMapError> {
        Ok(self.kv.scan(crate::service::USER_PREFIX)?.len())
    }

    /// Resolve a single user's references with point lookups.
    pub(crate) fn resolve_user(&self, user: User) -> Result<UserView, WordMapError> {
        let mut cache: HashMap<String, Option<UserSummary>> = HashMap::new();
        UserView::resolve(user, |id| {
            if let Some(hit) = cache.get(id) {
                return Ok(hit.clone());
            }
            let summary = self.find_user(id)?.map(|u| u.summary());
            cache.insert(id.to_string(), summary.clone());
            Ok(summary)
        })
    }
}

/// Summaries of every user keyed by id, for resolving a whole scan at once.
pub(crate) fn summary_index(users: &[User]) -> HashMap<String, UserSummary> {
    users.iter().map(|u| (u.id.clone(), u.summary())).collect()
}

/// Resolve `user` against a prebuilt summary index.
pub(crate) fn resolve_with(user: User, index: &HashMap<String, UserSummary>) -> UserView {
    match UserView::resolve(user, |id| Ok::<_, std::convert::Infallible>(index.get(id).cloned())) {
        Ok(view) => view,
        Err(never) => match never {},
    }
}
