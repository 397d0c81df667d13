use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgRepo;
use crate::tweets::repo_types::{NewTweet, Tweet, TweetWithAuthor};

#[async_trait]
pub trait TweetRepo: Send + Sync {
    /// Inserts a tweet; `id`, `created_at` and `updated_at` are assigned by the store.
    async fn insert_tweet(&self, new: NewTweet<'_>) -> anyhow::Result<Tweet>;
    async fn get_tweet(&self, id: Uuid) -> anyhow::Result<Option<Tweet>>;
    /// Overwrites content and photo and refreshes `updated_at`, never moving it backwards.
    async fn update_tweet(
        &self,
        id: Uuid,
        content: &str,
        photo: Option<&str>,
    ) -> anyhow::Result<Option<Tweet>>;
    async fn delete_tweet(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Every tweet, newest first. Equal `created_at` values are ordered by `id` descending.
    async fn list_recent(&self) -> anyhow::Result<Vec<TweetWithAuthor>>;
}

#[async_trait]
impl TweetRepo for PgRepo {
    async fn insert_tweet(&self, new: NewTweet<'_>) -> anyhow::Result<Tweet> {
        let tweet = sqlx::query_as::<_, Tweet>(
            r#"
            INSERT INTO tweets (user_id, content, photo)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, content, photo, created_at, updated_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.content)
        .bind(new.photo) // Option<&str> → NULL allowed
        .fetch_one(&self.db)
        .await
        .context("insert tweet")?;
        Ok(tweet)
    }

    async fn get_tweet(&self, id: Uuid) -> anyhow::Result<Option<Tweet>> {
        let tweet = sqlx::query_as::<_, Tweet>(
            r#"
            SELECT id, user_id, content, photo, created_at, updated_at
            FROM tweets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get tweet")?;
        Ok(tweet)
    }

    async fn update_tweet(
        &self,
        id: Uuid,
        content: &str,
        photo: Option<&str>,
    ) -> anyhow::Result<Option<Tweet>> {
        let tweet = sqlx::query_as::<_, Tweet>(
            r#"
            UPDATE tweets
               SET content = $2,
                   photo = $3,
                   updated_at = GREATEST(now(), updated_at)
             WHERE id = $1
            RETURNING id, user_id, content, photo, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .bind(photo)
        .fetch_optional(&self.db)
        .await
        .context("update tweet")?;
        Ok(tweet)
    }

    async fn delete_tweet(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete tweet")?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_recent(&self) -> anyhow::Result<Vec<TweetWithAuthor>> {
        let rows = sqlx::query_as::<_, TweetWithAuthor>(
            r#"
            SELECT t.id, t.user_id, u.username, t.content, t.photo, t.created_at, t.updated_at
              FROM tweets t
              JOIN users u ON u.id = t.user_id
             ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list tweets")?;
        Ok(rows)
    }
}
