//! # Typesense Sync
//!
//! One-way full synchronization from a PostgreSQL catalogue (movies, TV
//! series, people) and social data (playlists, users) into Typesense search
//! collections, plus provisioning of those collections from local JSON
//! schema files.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   FETCH n   ┌─────────────┐  import?action=upsert  ┌────────────┐
//! │ PostgreSQL │ ──────────▶ │  sync job   │ ─────────────────────▶ │ Typesense  │
//! │  (cursor)  │             │ row → doc   │                        │ collection │
//! └────────────┘             └─────────────┘                        └────────────┘
//! ```
//!
//! Every run is a complete pass: documents are rebuilt from the current
//! database state and upserted. Nothing is deleted and nothing is resumed.
//!
//! ## Quick Start
//!
//! ```bash
//! tsync schemas push            # create missing collections
//! tsync sync movies             # sync one entity
//! tsync sync all                # sync every entity, one after another
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML + environment configuration |
//! | [`models`] | Row and document types |
//! | [`entities`] | Extraction queries and row → document transforms |
//! | [`entity_list`] | The `tsync entities` table |
//! | [`db`] | PostgreSQL connection and server-side cursor |
//! | [`typesense`] | Typesense HTTP client |
//! | [`traits`] | Source and index seams |
//! | [`sync`] | The batch extract/transform/load loop |
//! | [`schemas`] | Collection provisioning |
//! | [`progress`] | Progress reporting |

pub mod config;
pub mod db;
pub mod entities;
pub mod entity_list;
pub mod models;
pub mod progress;
pub mod schemas;
pub mod sync;
pub mod traits;
pub mod typesense;
