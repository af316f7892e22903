//! Collection schema provisioning.
//!
//! `tsync schemas push` makes sure every collection defined by a local JSON
//! schema file exists in Typesense. Existing collections are never modified
//! or deleted. Each missing collection is created independently: one failed
//! create is logged and the remaining schemas are still attempted.
//!
//! If the list of existing collections cannot be retrieved, nothing is
//! evaluated and the command fails.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use walkdir::WalkDir;

use crate::config::Config;
use crate::traits::SearchIndex;
use crate::typesense::TypesenseClient;

/// A collection schema loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSchema {
    pub name: String,
    /// The full definition, sent as-is on create.
    pub definition: Value,
    pub path: PathBuf,
}

/// What happened to one local schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOutcome {
    /// A collection with this name already exists.
    Skipped,
    Created,
    /// Dry run: the collection is missing and would be created.
    WouldCreate,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct PushReport {
    pub existing: Vec<String>,
    pub outcomes: Vec<(String, SchemaOutcome)>,
}

impl PushReport {
    pub fn count(&self, outcome: &SchemaOutcome) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| std::mem::discriminant(o) == std::mem::discriminant(outcome))
            .count()
    }
}

/// Load every `*.json` file directly inside `dir`, sorted by file name.
///
/// Each file must be a JSON object with a string `name`.
pub fn load_local_schemas(dir: &Path) -> Result<Vec<CollectionSchema>> {
    if !dir.is_dir() {
        bail!("Schema directory not found: {}", dir.display());
    }

    let mut schemas = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        let definition: Value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in schema file: {}", path.display()))?;
        let name = definition
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .with_context(|| format!("Schema file has no \"name\": {}", path.display()))?
            .to_string();

        schemas.push(CollectionSchema {
            name,
            definition,
            path: path.to_path_buf(),
        });
    }

    Ok(schemas)
}

/// Create every schema in `schemas` whose collection is not yet present.
///
/// `existing` is the set of collection names already on the server.
pub async fn push_schemas(
    index: &dyn SearchIndex,
    existing: &HashSet<String>,
    schemas: &[CollectionSchema],
    dry_run: bool,
) -> Vec<(String, SchemaOutcome)> {
    let mut outcomes = Vec::with_capacity(schemas.len());

    for schema in schemas {
        let outcome = if existing.contains(&schema.name) {
            info!(collection = %schema.name, "collection already exists, skipping");
            SchemaOutcome::Skipped
        } else if dry_run {
            info!(collection = %schema.name, "collection missing (dry-run)");
            SchemaOutcome::WouldCreate
        } else {
            match index.create_collection(&schema.definition).await {
                Ok(()) => {
                    info!(collection = %schema.name, "collection created");
                    SchemaOutcome::Created
                }
                Err(e) => {
                    let message = format!("{:#}", e);
                    error!(collection = %schema.name, error = %message, "failed to create collection");
                    SchemaOutcome::Failed(message)
                }
            }
        };
        outcomes.push((schema.name.clone(), outcome));
    }

    outcomes
}

/// Retrieve existing collections, load local schemas, create what is missing.
pub async fn provision(index: &dyn SearchIndex, dir: &Path, dry_run: bool) -> Result<PushReport> {
    let mut existing = index
        .list_collections()
        .await
        .context("Could not fetch existing collections")?;
    existing.sort();
    info!(collections = ?existing, "existing collections");

    let schemas = load_local_schemas(dir)?;
    info!(dir = %dir.display(), count = schemas.len(), "loaded local schemas");

    let existing_set: HashSet<String> = existing.iter().cloned().collect();
    let outcomes = push_schemas(index, &existing_set, &schemas, dry_run).await;

    Ok(PushReport { existing, outcomes })
}

/// `tsync schemas push`.
pub async fn run_push(config: &Config, dir: Option<PathBuf>, dry_run: bool) -> Result<PushReport> {
    let client = TypesenseClient::from_config(&config.typesense)?;
    let dir = dir.unwrap_or_else(|| config.schemas.dir.clone());

    let report = provision(&client, &dir, dry_run).await?;

    if report.existing.is_empty() {
        println!("existing collections: none");
    } else {
        println!("existing collections: {}", report.existing.join(", "));
    }
    for (name, outcome) in &report.outcomes {
        match outcome {
            SchemaOutcome::Skipped => println!("  {:<16} skipped (exists)", name),
            SchemaOutcome::Created => println!("  {:<16} created", name),
            SchemaOutcome::WouldCreate => println!("  {:<16} would create", name),
            SchemaOutcome::Failed(e) => println!("  {:<16} FAILED: {}", name, e),
        }
    }
    println!("schema check complete");

    Ok(report)
}

/// `tsync schemas list`.
pub async fn run_list(config: &Config) -> Result<()> {
    let client = TypesenseClient::from_config(&config.typesense)?;
    let mut names = client
        .list_collections()
        .await
        .context("Could not fetch existing collections")?;
    names.sort();
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
