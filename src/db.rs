use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::config::AppConfig;

/// Failure of a single repository operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation(&e) {
            StoreError::Duplicate
        } else {
            StoreError::Other(e.into())
        }
    }
}

impl From<StoreError> for crate::errors::AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => anyhow::anyhow!("unexpected duplicate").into(),
            StoreError::Other(e) => e.into(),
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run database migrations")?;

    Ok(db)
}
