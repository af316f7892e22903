use super::{Entity, EntityKind};
use crate::models::{UserDocument, UserRow};

pub struct Users;

impl Entity for Users {
    type Row = UserRow;
    type Document = UserDocument;

    const KIND: EntityKind = EntityKind::Users;

    const QUERY: &'static str = r#"
        SELECT
            u.id::text AS id,
            u.username,
            u.full_name,
            u.followers_count::bigint AS followers_count
        FROM public.user u
        ORDER BY u.created_at
    "#;

    fn to_document(row: UserRow) -> UserDocument {
        UserDocument {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            followers_count: row.followers_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_fields_pass_through() {
        let doc = Users::to_document(UserRow {
            id: "b7e2".to_string(),
            username: Some("cinephile".to_string()),
            full_name: Some("Ana Lima".to_string()),
            followers_count: Some(0),
        });
        assert_eq!(doc.id, "b7e2");
        assert_eq!(doc.username.as_deref(), Some("cinephile"));
        assert_eq!(doc.followers_count, Some(0));
    }
}
