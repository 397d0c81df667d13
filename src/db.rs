use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

#[cfg(test)]
pub mod memory;

/// Postgres-backed store for users and tweets.
#[derive(Clone)]
pub struct PgRepo {
    pub(crate) db: PgPool,
}

impl PgRepo {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self { db })
    }
}

/// Constraint failure raised by stores that are not backed by Postgres.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintViolation {
    #[error("insert or update on table {0:?} violates foreign key constraint")]
    ForeignKey(&'static str),
    #[error("duplicate key value violates unique constraint {0:?}")]
    Unique(&'static str),
}

fn is_violation(
    e: &anyhow::Error,
    wanted: fn(&ConstraintViolation) -> bool,
    db_check: fn(&(dyn sqlx::error::DatabaseError + 'static)) -> bool,
) -> bool {
    e.chain().any(|cause| {
        if let Some(v) = cause.downcast_ref::<ConstraintViolation>() {
            return wanted(v);
        }
        cause
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .is_some_and(|db| db_check(db))
    })
}

pub fn is_foreign_key_violation(e: &anyhow::Error) -> bool {
    is_violation(
        e,
        |v| matches!(v, ConstraintViolation::ForeignKey(_)),
        |db| db.is_foreign_key_violation(),
    )
}

pub fn is_unique_violation(e: &anyhow::Error) -> bool {
    is_violation(
        e,
        |v| matches!(v, ConstraintViolation::Unique(_)),
        |db| db.is_unique_violation(),
    )
}
