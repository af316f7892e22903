use super::{Entity, EntityKind};
use crate::models::{PlaylistDocument, PlaylistRow};

/// User playlists with their guest list.
pub struct Playlists;

impl Entity for Playlists {
    type Row = PlaylistRow;
    type Document = PlaylistDocument;

    const KIND: EntityKind = EntityKind::Playlists;

    const QUERY: &'static str = r#"
        SELECT
            p.id::text AS id,
            p.title,
            p.description,
            p.likes_count::bigint AS likes_count,
            p.items_count::bigint AS items_count,
            EXTRACT(EPOCH FROM p.created_at)::bigint AS created_at,
            EXTRACT(EPOCH FROM p.updated_at)::bigint AS updated_at,
            p.private AS is_private,
            p.user_id::text AS owner_id,
            ARRAY_REMOVE(ARRAY_AGG(pg.user_id::text), NULL) AS guest_ids
        FROM public.playlists p
        LEFT JOIN public.playlist_guests pg ON p.id = pg.playlist_id
        GROUP BY p.id
        ORDER BY p.created_at
    "#;

    fn to_document(row: PlaylistRow) -> PlaylistDocument {
        // A playlist with no guests aggregates to a single NULL over the outer
        // join; never let it reach the document.
        let guest_ids = row
            .guest_ids
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter(|g| !g.trim().is_empty())
            .collect();

        PlaylistDocument {
            id: row.id,
            title: row.title,
            description: row.description,
            likes_count: row.likes_count,
            items_count: row.items_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_private: row.is_private,
            owner_id: row.owner_id,
            guest_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(guest_ids: Option<Vec<Option<String>>>) -> PlaylistRow {
        PlaylistRow {
            id: "9f1c".to_string(),
            title: Some("Sunday noir".to_string()),
            description: None,
            likes_count: Some(3),
            items_count: Some(12),
            created_at: Some(1_700_000_000),
            updated_at: Some(1_700_000_500),
            is_private: Some(false),
            owner_id: Some("u-1".to_string()),
            guest_ids,
        }
    }

    #[test]
    fn guests_pass_through() {
        let doc = Playlists::to_document(row(Some(vec![
            Some("u-2".to_string()),
            Some("u-3".to_string()),
        ])));
        assert_eq!(doc.guest_ids, vec!["u-2".to_string(), "u-3".to_string()]);
        assert_eq!(doc.owner_id.as_deref(), Some("u-1"));
        assert_eq!(doc.items_count, Some(12));
    }

    #[test]
    fn null_guest_placeholder_is_stripped() {
        let doc = Playlists::to_document(row(Some(vec![None])));
        assert!(doc.guest_ids.is_empty());

        let doc = Playlists::to_document(row(Some(vec![Some(String::new()), None])));
        assert!(doc.guest_ids.is_empty());

        let doc = Playlists::to_document(row(None));
        assert!(doc.guest_ids.is_empty());
    }

    #[test]
    fn description_passes_through_as_null() {
        let json = serde_json::to_value(Playlists::to_document(row(None))).unwrap();
        assert_eq!(json["description"], serde_json::Value::Null);
        assert_eq!(json["guest_ids"], serde_json::json!([]));
    }
}
