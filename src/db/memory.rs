use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::db::ConstraintViolation;
use crate::tweets::repo::TweetRepo;
use crate::tweets::repo_types::{NewTweet, Tweet, TweetWithAuthor};
use crate::users::repo::UserRepo;
use crate::users::repo_types::User;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tweets: Vec<Tweet>,
    pinned: Option<OffsetDateTime>,
    last: Option<OffsetDateTime>,
}

impl Tables {
    /// Pinned time if set, otherwise a wall clock that strictly increases between calls.
    fn now(&mut self) -> OffsetDateTime {
        if let Some(t) = self.pinned {
            return t;
        }
        let mut now = OffsetDateTime::now_utc();
        if let Some(last) = self.last {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last = Some(now);
        now
    }
}

/// In-memory users and tweets following the Postgres schema: cascade on user
/// delete, newest-first listing, and foreign key / unique checks that fail with
/// [`ConstraintViolation`] so callers classify them like database errors.
#[derive(Clone, Default)]
pub struct MemoryRepo {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRepo {
    pub fn pin_clock(&self, at: OffsetDateTime) {
        self.lock().pinned = Some(at);
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

#[async_trait]
impl UserRepo for MemoryRepo {
    async fn insert_user(&self, username: &str) -> anyhow::Result<User> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.username == username) {
            return Err(ConstraintViolation::Unique("users_username_key").into());
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: t.now(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Ok(false);
        }
        t.tweets.retain(|tw| tw.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TweetRepo for MemoryRepo {
    async fn insert_tweet(&self, new: NewTweet<'_>) -> anyhow::Result<Tweet> {
        let mut t = self.lock();
        if !t.users.iter().any(|u| u.id == new.user_id) {
            return Err(ConstraintViolation::ForeignKey("tweets").into());
        }
        let now = t.now();
        let tweet = Tweet {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            content: new.content.to_string(),
            photo: new.photo.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        t.tweets.push(tweet.clone());
        Ok(tweet)
    }

    async fn get_tweet(&self, id: Uuid) -> anyhow::Result<Option<Tweet>> {
        Ok(self.lock().tweets.iter().find(|tw| tw.id == id).cloned())
    }

    async fn update_tweet(
        &self,
        id: Uuid,
        content: &str,
        photo: Option<&str>,
    ) -> anyhow::Result<Option<Tweet>> {
        let mut t = self.lock();
        let now = t.now();
        let Some(tweet) = t.tweets.iter_mut().find(|tw| tw.id == id) else {
            return Ok(None);
        };
        tweet.content = content.to_string();
        tweet.photo = photo.map(str::to_string);
        tweet.updated_at = tweet.updated_at.max(now);
        Ok(Some(tweet.clone()))
    }

    async fn delete_tweet(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.tweets.len();
        t.tweets.retain(|tw| tw.id != id);
        Ok(t.tweets.len() != before)
    }

    async fn list_recent(&self) -> anyhow::Result<Vec<TweetWithAuthor>> {
        let t = self.lock();
        let mut rows: Vec<TweetWithAuthor> = t
            .tweets
            .iter()
            .filter_map(|tw| {
                let user = t.users.iter().find(|u| u.id == tw.user_id)?;
                Some(TweetWithAuthor {
                    id: tw.id,
                    user_id: tw.user_id,
                    username: user.username.clone(),
                    content: tw.content.clone(),
                    photo: tw.photo.clone(),
                    created_at: tw.created_at,
                    updated_at: tw.updated_at,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}
