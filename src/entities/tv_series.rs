use super::{dedup_texts, non_empty, primary_text, text_variants, Entity, EntityKind};
use crate::models::{TvSeriesDocument, TvSeriesRow};

/// TMDB TV series with translated names, genres and air dates.
pub struct TvSeries;

impl Entity for TvSeries {
    type Row = TvSeriesRow;
    type Document = TvSeriesDocument;

    const KIND: EntityKind = EntityKind::TvSeries;

    const QUERY: &'static str = r#"
        SELECT
            s.id::bigint AS id,
            s.original_name,
            s.popularity::float8 AS popularity,
            COALESCE(g.genre_ids, '{}') AS genre_ids,
            s.number_of_episodes::int AS number_of_episodes,
            s.number_of_seasons::int AS number_of_seasons,
            s.vote_average::float8 AS vote_average,
            s.vote_count::int AS vote_count,
            s.status,
            s.type,
            EXTRACT(EPOCH FROM s.first_air_date)::bigint AS first_air_ts,
            EXTRACT(EPOCH FROM s.last_air_date)::bigint AS last_air_ts,
            COALESCE(names.names, '{}') AS names
        FROM public.tmdb_tv_series s
        LEFT JOIN LATERAL (
            SELECT ARRAY_REMOVE(ARRAY_AGG(DISTINCT btrim(t.name)), NULL) AS names
            FROM public.tmdb_tv_series_translations t
            WHERE t.serie_id = s.id
              AND t.name IS NOT NULL
              AND btrim(t.name) <> ''
        ) AS names ON TRUE
        LEFT JOIN LATERAL (
            SELECT ARRAY_AGG(DISTINCT sg.genre_id)::int[] AS genre_ids
            FROM public.tmdb_tv_series_genres sg
            WHERE sg.serie_id = s.id
        ) AS g ON TRUE
        ORDER BY s.id
    "#;

    fn to_document(row: TvSeriesRow) -> TvSeriesDocument {
        TvSeriesDocument {
            id: row.id.to_string(),
            names: dedup_texts(row.original_name.as_deref(), text_variants(&row.names)),
            original_name: primary_text(&row.original_name),
            popularity: row.popularity.unwrap_or(0.0),
            genre_ids: row.genre_ids.unwrap_or_default(),
            number_of_episodes: row.number_of_episodes,
            number_of_seasons: row.number_of_seasons,
            vote_average: row.vote_average,
            vote_count: row.vote_count,
            status: non_empty(row.status),
            series_type: non_empty(row.series_type),
            first_air_date: row.first_air_ts,
            last_air_date: row.last_air_ts,
        }
    }
}
