use super::{dedup_texts, non_empty, primary_text, text_variants, Entity, EntityKind};
use crate::models::{PersonDocument, PersonRow};

/// TMDB people and their alternative names.
pub struct Persons;

impl Entity for Persons {
    type Row = PersonRow;
    type Document = PersonDocument;

    const KIND: EntityKind = EntityKind::Persons;

    const QUERY: &'static str = r#"
        SELECT
            p.id::bigint AS id,
            p.name,
            p.popularity::float8 AS popularity,
            p.known_for_department,
            COALESCE(aka.names, '{}') AS also_known_as
        FROM public.tmdb_person p
        LEFT JOIN LATERAL (
            SELECT ARRAY_AGG(DISTINCT btrim(a.name)) AS names
            FROM public.tmdb_person_also_known_as a
            WHERE a.person = p.id
        ) AS aka ON TRUE
        ORDER BY p.id
    "#;

    fn to_document(row: PersonRow) -> PersonDocument {
        PersonDocument {
            id: row.id.to_string(),
            also_known_as: dedup_texts(row.name.as_deref(), text_variants(&row.also_known_as)),
            name: primary_text(&row.name),
            popularity: row.popularity.unwrap_or(0.0),
            known_for_department: non_empty(row.known_for_department),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_include_name_once() {
        let row = PersonRow {
            id: 31,
            name: Some("Tom Hanks".to_string()),
            popularity: Some(55.1),
            known_for_department: Some("Acting".to_string()),
            also_known_as: Some(vec![
                Some("Tom Hanks ".to_string()),
                Some("Thomas Jeffrey Hanks".to_string()),
                None,
            ]),
        };
        let doc = Persons::to_document(row);
        assert_eq!(doc.id, "31");
        assert_eq!(
            doc.also_known_as,
            vec!["Thomas Jeffrey Hanks".to_string(), "Tom Hanks".to_string()]
        );
        assert_eq!(doc.known_for_department.as_deref(), Some("Acting"));
    }

    #[test]
    fn empty_department_is_omitted() {
        let row = PersonRow {
            id: 2,
            name: Some("Anon".to_string()),
            known_for_department: Some(String::new()),
            ..Default::default()
        };
        let doc = Persons::to_document(row);
        assert_eq!(doc.popularity, 0.0);
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("known_for_department").is_none());
    }
}
