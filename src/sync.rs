//! Full sync pipeline.
//!
//! Each job is one pass over its entity's extraction query:
//!
//! 1. Declare a server-side cursor over the query.
//! 2. Fetch up to `batch_size` rows; stop when a fetch comes back empty.
//! 3. Transform every row into its document.
//! 4. Upsert the batch into the entity's collection in one import request.
//! 5. Count per-document successes into the running total, then repeat.
//!
//! Batches are strictly sequential. Any error in fetch, encode or import
//! ends the job's loop; the report keeps the totals reached so far and the
//! source is closed in every case. There is no retry and no checkpoint: the
//! next run starts again from the first row.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db::{self, PgRowCursor};
use crate::entities::{Entity, EntityKind, Movies, Persons, Playlists, TvSeries, Users};
use crate::progress::{format_number, ProgressMode, SyncProgressEvent, SyncProgressReporter};
use crate::traits::{RowSource, SearchIndex};
use crate::typesense::TypesenseClient;

/// Options for `tsync sync`.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Overrides the configured batch size for every job in the run.
    pub batch_size: Option<usize>,
    /// Extract and transform only; nothing is sent to Typesense.
    pub dry_run: bool,
    pub progress: ProgressMode,
}

/// Outcome of one entity job.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub entity: EntityKind,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub dry_run: bool,
    /// Non-empty batches fetched.
    pub batches: u64,
    /// Rows fetched from the source.
    pub fetched: u64,
    /// Documents the index reported as successfully upserted.
    pub imported: u64,
    /// Documents the index reported as failed.
    pub failed: u64,
    /// The error that ended the job early, if any.
    pub error: Option<String>,
}

impl SyncReport {
    fn new(entity: EntityKind, dry_run: bool) -> Self {
        Self {
            entity,
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            dry_run,
            batches: 0,
            fetched: 0,
            imported: 0,
            failed: 0,
            error: None,
        }
    }

    fn aborted(entity: EntityKind, dry_run: bool, err: anyhow::Error) -> Self {
        error!(entity = %entity, error = %format!("{:#}", err), "sync aborted before first batch");
        Self {
            error: Some(format!("{:#}", err)),
            ..Self::new(entity, dry_run)
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Run the sync jobs selected by `target` (`all` or an entity name), one
/// after another, printing a summary for each.
///
/// Every job gets its own database connection and index client.
pub async fn run_sync(
    config: &Config,
    target: &str,
    options: &SyncOptions,
) -> Result<Vec<SyncReport>> {
    let kinds = EntityKind::parse_target(target)?;
    if options.batch_size == Some(0) {
        anyhow::bail!("--batch-size must be > 0");
    }

    let reporter = options.progress.reporter();
    let mut reports = Vec::with_capacity(kinds.len());

    for kind in kinds {
        let batch_size = options
            .batch_size
            .unwrap_or_else(|| config.batch_size(kind));

        let report = match kind {
            EntityKind::Movies => {
                run_job::<Movies>(config, batch_size, options.dry_run, reporter.as_ref()).await
            }
            EntityKind::Persons => {
                run_job::<Persons>(config, batch_size, options.dry_run, reporter.as_ref()).await
            }
            EntityKind::TvSeries => {
                run_job::<TvSeries>(config, batch_size, options.dry_run, reporter.as_ref()).await
            }
            EntityKind::Playlists => {
                run_job::<Playlists>(config, batch_size, options.dry_run, reporter.as_ref())
                    .await
            }
            EntityKind::Users => {
                run_job::<Users>(config, batch_size, options.dry_run, reporter.as_ref()).await
            }
        };

        print_report(&report);
        reports.push(report);
    }

    Ok(reports)
}

async fn run_job<E: Entity>(
    config: &Config,
    batch_size: usize,
    dry_run: bool,
    reporter: &dyn SyncProgressReporter,
) -> SyncReport {
    info!(entity = %E::KIND, batch_size, dry_run, "starting full sync");

    let client = if dry_run {
        None
    } else {
        match TypesenseClient::from_config(&config.typesense) {
            Ok(client) => Some(client),
            Err(e) => return SyncReport::aborted(E::KIND, dry_run, e),
        }
    };

    let pool = match db::connect(config).await {
        Ok(pool) => pool,
        Err(e) => return SyncReport::aborted(E::KIND, dry_run, e),
    };

    let cursor_name = format!("tsync_{}", E::KIND.name());
    let report = match PgRowCursor::<E::Row>::open(&pool, &cursor_name, E::QUERY).await {
        Ok(mut cursor) => {
            let index = client.as_ref().map(|c| c as &dyn SearchIndex);
            sync_collection::<E, _>(&mut cursor, index, batch_size, reporter).await
        }
        Err(e) => SyncReport::aborted(E::KIND, dry_run, e),
    };

    pool.close().await;
    debug!(entity = %E::KIND, "database connection closed");
    report
}

/// Drive one entity through the extract/transform/load loop.
///
/// `index = None` is a dry run: rows are fetched and transformed but not
/// imported. The source is always closed before returning.
pub async fn sync_collection<E, S>(
    source: &mut S,
    index: Option<&dyn SearchIndex>,
    batch_size: usize,
    reporter: &dyn SyncProgressReporter,
) -> SyncReport
where
    E: Entity,
    S: RowSource<E::Row> + ?Sized,
{
    let clock = Instant::now();
    let mut report = SyncReport::new(E::KIND, index.is_none());

    if let Err(e) = run_batches::<E, S>(source, index, batch_size, reporter, &mut report).await {
        let message = format!("{:#}", e);
        error!(
            entity = %E::KIND,
            batches = report.batches,
            imported = report.imported,
            error = %message,
            "sync stopped"
        );
        report.error = Some(message);
    }

    if let Err(e) = source.close().await {
        warn!(entity = %E::KIND, error = %format!("{:#}", e), "failed to release source");
        if report.error.is_none() {
            report.error = Some(format!("{:#}", e));
        }
    }

    report.elapsed = clock.elapsed();
    info!(
        entity = %E::KIND,
        batches = report.batches,
        fetched = report.fetched,
        imported = report.imported,
        failed = report.failed,
        "sync finished"
    );
    report
}

async fn run_batches<E, S>(
    source: &mut S,
    index: Option<&dyn SearchIndex>,
    batch_size: usize,
    reporter: &dyn SyncProgressReporter,
    report: &mut SyncReport,
) -> Result<()>
where
    E: Entity,
    S: RowSource<E::Row> + ?Sized,
{
    let entity = E::KIND.name().to_string();

    loop {
        let rows = source.fetch(batch_size).await?;
        if rows.is_empty() {
            break;
        }

        let batch = report.batches + 1;
        report.batches = batch;
        report.fetched += rows.len() as u64;
        reporter.report(SyncProgressEvent::Fetched {
            entity: entity.clone(),
            batch,
            rows: rows.len() as u64,
        });

        let documents = rows
            .into_iter()
            .map(|row| serde_json::to_value(E::to_document(row)))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to encode {} documents", entity))?;
        let len = documents.len() as u64;

        let Some(index) = index else {
            continue;
        };

        let results = index
            .import_documents(E::KIND.collection(), &documents)
            .await
            .with_context(|| format!("Import into '{}' failed", E::KIND.collection()))?;

        let ok = results.iter().filter(|r| r.success).count() as u64;
        for failure in results.iter().filter(|r| !r.success).take(5) {
            debug!(
                entity = %E::KIND,
                error = failure.error.as_deref().unwrap_or("unknown"),
                "document rejected"
            );
        }

        report.imported += ok;
        report.failed += len.saturating_sub(ok);

        reporter.report(SyncProgressEvent::Imported {
            entity: entity.clone(),
            batch,
            ok,
            len,
            total: report.imported,
        });
    }

    Ok(())
}

fn print_report(report: &SyncReport) {
    if report.dry_run {
        println!("sync {} (dry-run)", report.entity);
    } else {
        println!("sync {}", report.entity);
    }
    println!("  started: {}", report.started_at.to_rfc3339());
    println!("  batches: {}", report.batches);
    println!("  fetched rows: {}", format_number(report.fetched));
    if report.dry_run {
        println!("  documents built: {}", format_number(report.fetched));
    } else {
        println!("  imported documents: {}", format_number(report.imported));
        println!("  failed documents: {}", format_number(report.failed));
    }
    println!("  elapsed: {:.1}s", report.elapsed.as_secs_f64());
    match &report.error {
        None => println!("ok"),
        Some(e) => println!("error: {}", e),
    }
}
