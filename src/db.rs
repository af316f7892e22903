//! PostgreSQL source: connection and server-side cursor.
//!
//! Extraction queries can return millions of rows, so they run behind a
//! `DECLARE ... NO SCROLL CURSOR` inside a transaction and are read with
//! `FETCH FORWARD n`. Only one batch is resident in memory at a time.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{FromRow, Postgres, Transaction};
use std::marker::PhantomData;
use tracing::{debug, warn};

use crate::config::Config;
use crate::traits::RowSource;

pub async fn connect(config: &Config) -> Result<PgPool> {
    let url = config.postgres_url()?;

    // A job holds exactly one connection for its whole run.
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    Ok(pool)
}

/// A forward-only server-side cursor yielding rows of type `R`.
///
/// [`close`](RowSource::close) closes the cursor and commits the read-only
/// transaction. If the cursor is dropped without being closed, the
/// transaction is rolled back, which also discards the cursor.
pub struct PgRowCursor<R> {
    tx: Option<Transaction<'static, Postgres>>,
    name: String,
    _row: PhantomData<fn() -> R>,
}

impl<R> PgRowCursor<R> {
    /// Begin a transaction and declare `name` as a cursor over `query`.
    ///
    /// `name` must be a plain SQL identifier.
    pub async fn open(pool: &PgPool, name: &str, query: &str) -> Result<Self> {
        let mut tx = pool.begin().await.context("Failed to begin transaction")?;

        let declare = format!("DECLARE {} NO SCROLL CURSOR FOR {}", name, query.trim());
        sqlx::query(&declare)
            .persistent(false)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to declare cursor '{}'", name))?;

        debug!(cursor = name, "cursor declared");

        Ok(Self {
            tx: Some(tx),
            name: name.to_string(),
            _row: PhantomData,
        })
    }
}

#[async_trait]
impl<R> RowSource<R> for PgRowCursor<R>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static,
{
    async fn fetch(&mut self, n: usize) -> Result<Vec<R>> {
        let tx = self
            .tx
            .as_mut()
            .with_context(|| format!("Cursor '{}' is already closed", self.name))?;

        let fetch = format!("FETCH FORWARD {} FROM {}", n, self.name);
        let rows = sqlx::query_as::<_, R>(&fetch)
            .persistent(false)
            .fetch_all(&mut **tx)
            .await
            .with_context(|| format!("Failed to fetch from cursor '{}'", self.name))?;

        Ok(rows)
    }

    async fn close(&mut self) -> Result<()> {
        let Some(mut tx) = self.tx.take() else {
            return Ok(());
        };

        let close = format!("CLOSE {}", self.name);
        if let Err(e) = sqlx::query(&close).persistent(false).execute(&mut *tx).await {
            warn!(cursor = %self.name, error = %e, "failed to close cursor, rolling back");
            tx.rollback().await?;
            return Ok(());
        }
        tx.commit().await?;
        Ok(())
    }
}
