use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::state::AppState;
use crate::users::repo_types::User;

pub const MAX_USERNAME_LEN: usize = 150;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("invalid username {0:?}")]
    InvalidUsername(String),
    #[error("username {0:?} is already taken")]
    UsernameTaken(String),
    #[error("user {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

/// Letters, digits and `@ . + - _`, at most 150 characters.
pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[\w.@+-]+$").unwrap();
    }
    username.chars().count() <= MAX_USERNAME_LEN && USERNAME_RE.is_match(username)
}

#[instrument(skip(st))]
pub async fn register_user(st: &AppState, username: &str) -> Result<User, UserError> {
    let username = username.trim();
    if !is_valid_username(username) {
        warn!(%username, "invalid username");
        return Err(UserError::InvalidUsername(username.to_string()));
    }
    if st.users.find_by_username(username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(UserError::UsernameTaken(username.to_string()));
    }
    let user = match st.users.insert_user(username).await {
        Ok(u) => u,
        // registered concurrently after the lookup above
        Err(e) if is_unique_violation(&e) => {
            warn!(%username, "username already registered");
            return Err(UserError::UsernameTaken(username.to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

pub async fn find_user(st: &AppState, id: Uuid) -> Result<User, UserError> {
    st.users.find_user(id).await?.ok_or(UserError::NotFound(id))
}

/// Deletes the user together with all of their tweets.
#[instrument(skip(st))]
pub async fn delete_user(st: &AppState, id: Uuid) -> Result<(), UserError> {
    if !st.users.delete_user(id).await? {
        return Err(UserError::NotFound(id));
    }
    info!(user_id = %id, "user deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::db::memory::MemoryRepo;
    use crate::users::repo::UserRepo;

    #[test]
    fn username_rules() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("bob.smith+feed@example-1"));
        assert!(is_valid_username("ñandú_42"));
        assert!(is_valid_username(&"a".repeat(150)));

        assert!(!is_valid_username(""));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("semi;colon"));
        assert!(!is_valid_username(&"a".repeat(151)));
    }

    #[tokio::test]
    async fn register_and_find() {
        let st = AppState::fake();
        let user = register_user(&st, "  alice ").await.unwrap();
        assert_eq!(user.username, "alice");

        let found = find_user(&st, user.id).await.unwrap();
        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn register_rejects_duplicates_and_bad_names() {
        let st = AppState::fake();
        register_user(&st, "alice").await.unwrap();

        assert!(matches!(
            register_user(&st, "alice").await,
            Err(UserError::UsernameTaken(_))
        ));
        assert!(matches!(
            register_user(&st, "not valid").await,
            Err(UserError::InvalidUsername(_))
        ));
    }

    /// Misses every username lookup, as if the name was taken right after it.
    struct StaleLookup(MemoryRepo);

    #[async_trait]
    impl UserRepo for StaleLookup {
        async fn insert_user(&self, username: &str) -> anyhow::Result<User> {
            self.0.insert_user(username).await
        }
        async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
            self.0.find_user(id).await
        }
        async fn find_by_username(&self, _username: &str) -> anyhow::Result<Option<User>> {
            Ok(None)
        }
        async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
            self.0.delete_user(id).await
        }
    }

    #[tokio::test]
    async fn concurrent_duplicate_is_reported_as_taken() {
        let repo = MemoryRepo::default();
        let mut st = AppState::fake_with(repo.clone());
        register_user(&st, "alice").await.unwrap();
        st.users = Arc::new(StaleLookup(repo));

        assert!(matches!(
            register_user(&st, "alice").await,
            Err(UserError::UsernameTaken(name)) if name == "alice"
        ));
    }

    #[tokio::test]
    async fn delete_unknown_user_is_not_found() {
        let st = AppState::fake();
        let id = Uuid::new_v4();
        assert!(matches!(delete_user(&st, id).await, Err(UserError::NotFound(x)) if x == id));
        assert!(matches!(find_user(&st, id).await, Err(UserError::NotFound(_))));
    }
}
