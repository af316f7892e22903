//! Entity definitions: what each sync job extracts and how rows become documents.
//!
//! Every job follows the same shape, so the per-entity parts are captured
//! by the [`Entity`] trait:
//!
//! - the extraction SQL (joins and aggregation happen in PostgreSQL),
//! - the row and document types,
//! - the pure row → document transform.
//!
//! | Entity | Collection | Default batch |
//! |--------|------------|---------------|
//! | [`Movies`] | `movies` | 100,000 |
//! | [`Persons`] | `persons` | 100,000 |
//! | [`TvSeries`] | `tv_series` | 100,000 |
//! | [`Playlists`] | `playlists` | 5,000 |
//! | [`Users`] | `users` | 5,000 |

mod movies;
mod persons;
mod playlists;
mod tv_series;
mod users;

pub use movies::Movies;
pub use persons::Persons;
pub use playlists::Playlists;
pub use tv_series::TvSeries;
pub use users::Users;

use anyhow::{bail, Result};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::fmt;

/// One synced entity type.
pub trait Entity {
    /// Row shape returned by [`Entity::QUERY`].
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static;
    /// Document shape upserted into the collection.
    type Document: Serialize + Send + Sync;

    const KIND: EntityKind;

    /// Extraction query. Must not end with a semicolon: it is wrapped in a
    /// `DECLARE ... CURSOR FOR` statement.
    const QUERY: &'static str;

    fn to_document(row: Self::Row) -> Self::Document;
}

/// The entity jobs known to `tsync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Movies,
    Persons,
    TvSeries,
    Playlists,
    Users,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Movies,
        EntityKind::Persons,
        EntityKind::TvSeries,
        EntityKind::Playlists,
        EntityKind::Users,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Movies => "movies",
            EntityKind::Persons => "persons",
            EntityKind::TvSeries => "tv_series",
            EntityKind::Playlists => "playlists",
            EntityKind::Users => "users",
        }
    }

    /// Target Typesense collection.
    pub fn collection(&self) -> &'static str {
        self.name()
    }

    pub fn default_batch_size(&self) -> usize {
        match self {
            EntityKind::Movies | EntityKind::Persons | EntityKind::TvSeries => 100_000,
            EntityKind::Playlists | EntityKind::Users => 5_000,
        }
    }

    /// Resolve a CLI target (`all` or an entity name) to the jobs to run.
    pub fn parse_target(target: &str) -> Result<Vec<EntityKind>> {
        if target == "all" {
            return Ok(Self::ALL.to_vec());
        }
        match Self::ALL.iter().find(|k| k.name() == target) {
            Some(kind) => Ok(vec![*kind]),
            None => bail!(
                "Unknown entity: '{}'. Available: all, {}",
                target,
                Self::ALL
                    .iter()
                    .map(|k| k.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the searchable text set for a primary value and its variants.
///
/// Values are trimmed; empty and whitespace-only values are dropped;
/// duplicates (case-sensitive) collapse to one entry. The trimmed primary
/// value is always included when non-empty. Output is sorted so repeated
/// runs produce identical documents.
pub fn dedup_texts<'a, I>(primary: Option<&str>, variants: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut set: BTreeSet<String> = variants
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(p) = primary.map(str::trim).filter(|p| !p.is_empty()) {
        set.insert(p.to_string());
    }

    set.into_iter().collect()
}

/// Flatten an aggregated text array column, tolerating a null array and null elements.
pub(crate) fn text_variants(
    values: &Option<Vec<Option<String>>>,
) -> impl Iterator<Item = Option<&str>> {
    values.iter().flatten().map(|v| v.as_deref())
}

/// Trimmed primary text, or `""` when null.
pub(crate) fn primary_text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Keep a free-text attribute only when it is non-empty.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
