//! Row and document types for each synced entity.
//!
//! Rows mirror the columns selected by each entity's extraction query.
//! Documents are what gets upserted into Typesense: optional fields are
//! omitted from the JSON when absent, pass-through fields are written as-is.

use serde::Serialize;
use sqlx::FromRow;

// ============ Movies ============

#[derive(Debug, Clone, Default, FromRow)]
pub struct MovieRow {
    pub id: i64,
    pub original_title: Option<String>,
    pub popularity: Option<f64>,
    pub genre_ids: Option<Vec<i32>>,
    pub runtime: Option<i64>,
    pub release_ts: Option<i64>,
    pub titles: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDocument {
    pub id: String,
    pub original_title: String,
    pub titles: Vec<String>,
    pub popularity: f64,
    pub genre_ids: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i64>,
    /// Earliest theatrical release, Unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<i64>,
}

// ============ Persons ============

#[derive(Debug, Clone, Default, FromRow)]
pub struct PersonRow {
    pub id: i64,
    pub name: Option<String>,
    pub popularity: Option<f64>,
    pub known_for_department: Option<String>,
    pub also_known_as: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonDocument {
    pub id: String,
    pub name: String,
    pub also_known_as: Vec<String>,
    pub popularity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_for_department: Option<String>,
}

// ============ TV series ============

#[derive(Debug, Clone, Default, FromRow)]
pub struct TvSeriesRow {
    pub id: i64,
    pub original_name: Option<String>,
    pub popularity: Option<f64>,
    pub genre_ids: Option<Vec<i32>>,
    pub number_of_episodes: Option<i32>,
    pub number_of_seasons: Option<i32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i32>,
    pub status: Option<String>,
    #[sqlx(rename = "type")]
    pub series_type: Option<String>,
    pub first_air_ts: Option<i64>,
    pub last_air_ts: Option<i64>,
    pub names: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvSeriesDocument {
    pub id: String,
    pub original_name: String,
    pub names: Vec<String>,
    pub popularity: f64,
    pub genre_ids: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_episodes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_seasons: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub series_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_air_date: Option<i64>,
}

// ============ Playlists ============

#[derive(Debug, Clone, Default, FromRow)]
pub struct PlaylistRow {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub likes_count: Option<i64>,
    pub items_count: Option<i64>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub is_private: Option<bool>,
    pub owner_id: Option<String>,
    pub guest_ids: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistDocument {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub likes_count: Option<i64>,
    pub items_count: Option<i64>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub is_private: Option<bool>,
    pub owner_id: Option<String>,
    pub guest_ids: Vec<String>,
}

// ============ Users ============

#[derive(Debug, Clone, Default, FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub followers_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDocument {
    pub id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub followers_count: Option<i64>,
}
