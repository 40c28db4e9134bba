//! Shared test utilities for folio-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use folio_core::FieldMap;
    use folio_core::entities::NewField;
    use folio_core::schema::ContentSchema;
    use serde_json::Value;

    use crate::service::FolioService;

    /// In-memory service with an empty schema and no roles.
    pub async fn bare_service() -> FolioService {
        FolioService::new_local(":memory:").await.unwrap()
    }

    /// In-memory service with the default roles and transitions installed.
    pub async fn test_service() -> FolioService {
        let svc = bare_service().await;
        svc.bootstrap().await.unwrap();
        svc
    }

    /// Create a user holding the named seeded role and return its ID.
    pub async fn user_with_role(svc: &FolioService, role_name: &str) -> String {
        let role = svc.get_role_by_name(role_name).await.unwrap();
        let n = svc.list_users().await.unwrap().len();
        svc.create_user(
            &format!("{role_name} {n}"),
            &format!("{role_name}{n}@example.com"),
            Some(&role.id),
        )
        .await
        .unwrap()
        .id
    }

    /// Unwrap a `json!({...})` literal into a field map.
    pub fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected a JSON object, got {other}"),
        }
    }

    /// Create a content type named after `slug` with the given fields.
    pub async fn new_type_with(svc: &FolioService, slug: &str, fields: Vec<NewField>) -> ContentSchema {
        let ct = svc.create_content_type(slug, slug, false).await.unwrap();
        for field in &fields {
            svc.add_field(&ct.id, field).await.unwrap();
        }
        svc.load_schema(&ct.id).await.unwrap()
    }
}
