use super::{dedup_texts, primary_text, text_variants, Entity, EntityKind};
use crate::models::{MovieDocument, MovieRow};

/// TMDB movies with their translated titles, genres, runtime and release date.
pub struct Movies;

impl Entity for Movies {
    type Row = MovieRow;
    type Document = MovieDocument;

    const KIND: EntityKind = EntityKind::Movies;

    // Runtime prefers the translation in the movie's original language;
    // release date is the earliest theatrical (limited or wide) release.
    const QUERY: &'static str = r#"
        SELECT
            m.id::bigint AS id,
            m.original_title,
            m.popularity::float8 AS popularity,
            COALESCE(g.genre_ids, '{}') AS genre_ids,
            rt.runtime::bigint AS runtime,
            rel.release_ts,
            COALESCE(titles.titles, '{}') AS titles
        FROM public.tmdb_movie m
        LEFT JOIN LATERAL (
            SELECT ARRAY_REMOVE(ARRAY_AGG(DISTINCT btrim(t.title)), NULL) AS titles
            FROM public.tmdb_movie_translations t
            WHERE t.movie_id = m.id
              AND t.title IS NOT NULL
              AND btrim(t.title) <> ''
        ) AS titles ON TRUE
        LEFT JOIN LATERAL (
            SELECT t.runtime
            FROM public.tmdb_movie_translations t
            WHERE t.movie_id = m.id
              AND t.runtime IS NOT NULL AND t.runtime > 0
            ORDER BY (t.iso_639_1 = m.original_language) DESC, t.id
            LIMIT 1
        ) AS rt ON TRUE
        LEFT JOIN LATERAL (
            SELECT EXTRACT(EPOCH FROM r.release_date)::bigint AS release_ts
            FROM public.tmdb_movie_release_dates r
            WHERE r.movie_id = m.id AND r.release_type IN (2, 3)
            ORDER BY r.release_date ASC
            LIMIT 1
        ) AS rel ON TRUE
        LEFT JOIN LATERAL (
            SELECT ARRAY_AGG(DISTINCT mg.genre_id)::int[] AS genre_ids
            FROM public.tmdb_movie_genres mg
            WHERE mg.movie_id = m.id
        ) AS g ON TRUE
        ORDER BY m.id
    "#;

    fn to_document(row: MovieRow) -> MovieDocument {
        MovieDocument {
            id: row.id.to_string(),
            titles: dedup_texts(row.original_title.as_deref(), text_variants(&row.titles)),
            original_title: primary_text(&row.original_title),
            popularity: row.popularity.unwrap_or(0.0),
            genre_ids: row.genre_ids.unwrap_or_default(),
            runtime: row.runtime,
            release_date: row.release_ts,
        }
    }
}
