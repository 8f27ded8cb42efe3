use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::password::hash_password;
use crate::auth::Identity;
use crate::config::{AppConfig, DatabaseConfig};
use crate::database::DatabaseManager;
use crate::state::AppState;

pub const TEST_JWT_SECRET: &str = "shelter-test-secret";
pub const TEST_PASSWORD: &str = "correct horse";

/// In-memory application for router tests
pub struct TestContext {
    pub state: AppState,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let mut config = AppConfig::development();
        config.database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
        };
        config.security.bcrypt_cost = 4;

        let db = DatabaseManager::connect(&config.database).await?;
        Ok(Self {
            state: AppState::new(config, TEST_JWT_SECRET, db),
        })
    }

    pub fn app(&self) -> Router {
        crate::app(self.state.clone())
    }

    /// Insert a user directly, bypassing registration rules
    pub async fn seed_user(&self, email: &str, role_id: i64) -> anyhow::Result<i64> {
        let hash = hash_password(TEST_PASSWORD, 4).await?;
        let result = sqlx::query(r#"INSERT INTO "Users" ("Name", "Email", "Password", "RoleId") VALUES (?, ?, ?, ?)"#)
            .bind(email.split('@').next().unwrap_or(email))
            .bind(email)
            .bind(hash)
            .bind(role_id)
            .execute(self.state.db.pool())
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub fn token_for(&self, user_id: i64, role_id: i64) -> String {
        self.state
            .tokens
            .issue(Identity { user_id, role_id })
            .expect("token issue")
    }

    /// Send one request through the full router and decode the JSON body (Null when empty)
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.app().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{PRIVILEGED_ROLE_ID, REGULAR_ROLE_ID};
    use serde_json::json;

    #[tokio::test]
    async fn public_routes_need_no_token() {
        let ctx = TestContext::new().await.unwrap();
        let (status, _) = ctx.send(Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = ctx.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "ok");
        let (status, _) = ctx.send(Method::GET, "/api-docs", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn gate_rejects_missing_and_bad_tokens() {
        let ctx = TestContext::new().await.unwrap();

        let (status, body) = ctx.send(Method::GET, "/api/animals", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: token missing");

        let (status, body) = ctx.send(Method::GET, "/api/animals", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: invalid token");
    }

    #[tokio::test]
    async fn token_for_deleted_user_is_invalid() {
        let ctx = TestContext::new().await.unwrap();
        let token = ctx.token_for(999, REGULAR_ROLE_ID);
        let (status, body) = ctx.send(Method::GET, "/api/animals", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: invalid token");
    }

    #[tokio::test]
    async fn blocked_user_gets_reason() {
        let ctx = TestContext::new().await.unwrap();
        let id = ctx.seed_user("bob@example.com", REGULAR_ROLE_ID).await.unwrap();
        sqlx::query(r#"UPDATE "Users" SET "IsBlocked" = 1, "BlockReason" = 'spam' WHERE "Id" = ?"#)
            .bind(id)
            .execute(ctx.state.db.pool())
            .await
            .unwrap();

        let token = ctx.token_for(id, REGULAR_ROLE_ID);
        let (status, body) = ctx.send(Method::GET, "/api/animals", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Forbidden: user blocked");
        assert_eq!(body["reason"], "spam");
    }

    #[tokio::test]
    async fn stored_role_outranks_token_claim() {
        let ctx = TestContext::new().await.unwrap();
        let id = ctx.seed_user("eve@example.com", REGULAR_ROLE_ID).await.unwrap();

        // Token claims admin, database says regular
        let token = ctx.token_for(id, PRIVILEGED_ROLE_ID);
        let (status, _) = ctx.send(Method::GET, "/api/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn malformed_json_is_invalid_json() {
        let ctx = TestContext::new().await.unwrap();
        let id = ctx.seed_user("ann@example.com", REGULAR_ROLE_ID).await.unwrap();
        let token = ctx.token_for(id, REGULAR_ROLE_ID);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/animals")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = ctx.app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn missing_required_fields_are_listed() {
        let ctx = TestContext::new().await.unwrap();
        let id = ctx.seed_user("ann@example.com", REGULAR_ROLE_ID).await.unwrap();
        let token = ctx.token_for(id, REGULAR_ROLE_ID);

        let (status, body) = ctx
            .send(Method::POST, "/api/medical-records", Some(&token), Some(json!({ "Procedure": "" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["Date"], "This field is required");
        assert_eq!(body["field_errors"]["Procedure"], "This field is required");
        assert_eq!(body["field_errors"]["AnimalId"], "This field is required");
    }

    #[tokio::test]
    async fn role_one_is_immutable_and_roles_writes_need_admin() {
        let ctx = TestContext::new().await.unwrap();
        let admin = ctx.seed_user("root@example.com", PRIVILEGED_ROLE_ID).await.unwrap();
        let user = ctx.seed_user("joe@example.com", REGULAR_ROLE_ID).await.unwrap();
        let admin_token = ctx.token_for(admin, PRIVILEGED_ROLE_ID);
        let user_token = ctx.token_for(user, REGULAR_ROLE_ID);

        let (status, body) = ctx.send(Method::GET, "/api/roles", Some(&user_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let (status, _) = ctx
            .send(Method::POST, "/api/roles", Some(&user_token), Some(json!({ "Name": "Vet" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = ctx.send(Method::DELETE, "/api/roles/1", Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = ctx
            .send(Method::POST, "/api/roles", Some(&admin_token), Some(json!({ "Name": "Vet" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let vet = body["id"].as_i64().unwrap();
        let (status, _) = ctx
            .send(Method::PUT, &format!("/api/roles/{}", vet), Some(&admin_token), Some(json!({ "Name": "Veterinarian" })))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn logs_are_append_only() {
        let ctx = TestContext::new().await.unwrap();
        let admin = ctx.seed_user("root@example.com", PRIVILEGED_ROLE_ID).await.unwrap();
        let user = ctx.seed_user("joe@example.com", REGULAR_ROLE_ID).await.unwrap();
        let admin_token = ctx.token_for(admin, PRIVILEGED_ROLE_ID);
        let user_token = ctx.token_for(user, REGULAR_ROLE_ID);

        let (status, body) = ctx
            .send(Method::POST, "/api/logs", Some(&user_token), Some(json!({ "Action": "opened kennel 3" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().unwrap();

        let (status, _) = ctx.send(Method::GET, "/api/logs", Some(&user_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = ctx
            .send(Method::PUT, &format!("/api/logs/{}", id), Some(&admin_token), Some(json!({ "Action": "x" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = ctx.send(Method::DELETE, &format!("/api/logs/{}", id), Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = ctx.send(Method::GET, &format!("/api/logs/{}", id), Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Action"], "opened kennel 3");
        assert_eq!(body["UserId"], user);
    }

    #[tokio::test]
    async fn animal_mutations_are_audited() {
        let ctx = TestContext::new().await.unwrap();
        let id = ctx.seed_user("ann@example.com", REGULAR_ROLE_ID).await.unwrap();
        let token = ctx.token_for(id, REGULAR_ROLE_ID);

        let (status, body) = ctx
            .send(Method::POST, "/api/animals", Some(&token), Some(json!({ "Name": "Rex", "Type": "Dog" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let animal = body["id"].as_i64().unwrap();

        let actions: Vec<String> = sqlx::query_scalar(r#"SELECT "Action" FROM "Logs" WHERE "UserId" = ? ORDER BY "Id""#)
            .bind(id)
            .fetch_all(ctx.state.db.pool())
            .await
            .unwrap();
        assert_eq!(actions, vec![format!("create Animal #{}", animal)]);
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected() {
        let ctx = TestContext::new().await.unwrap();
        let id = ctx.seed_user("ann@example.com", REGULAR_ROLE_ID).await.unwrap();
        let token = ctx.token_for(id, REGULAR_ROLE_ID);

        let (status, body) = ctx.send(Method::GET, "/api/animals/abc", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn animal_reads_back_with_photo_url() {
        let ctx = TestContext::new().await.unwrap();
        let id = ctx.seed_user("ann@example.com", REGULAR_ROLE_ID).await.unwrap();
        let token = ctx.token_for(id, REGULAR_ROLE_ID);

        let (status, body) = ctx
            .send(
                Method::POST,
                "/api/animals",
                Some(&token),
                Some(json!({ "Name": "Rex", "Type": "Dog", "Age": 3, "PhotoURL": "http://img/rex.png" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let animal = body["id"].as_i64().unwrap();

        let (status, body) = ctx.send(Method::GET, "/api/animals", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["Id"], animal);
        assert_eq!(body[0]["PhotoURL"], "http://img/rex.png");

        let (status, body) = ctx.send(Method::GET, &format!("/api/animals/{}", animal), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Name"], "Rex");
        assert_eq!(body["Type"], "Dog");
        assert_eq!(body["Age"], 3);
        assert_eq!(body["PhotoURL"], "http://img/rex.png");
        assert_eq!(body["UserId"], id);
    }

    #[tokio::test]
    async fn role_check_runs_before_body_parsing() {
        let ctx = TestContext::new().await.unwrap();
        let id = ctx.seed_user("joe@example.com", REGULAR_ROLE_ID).await.unwrap();
        let token = ctx.token_for(id, REGULAR_ROLE_ID);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/roles")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = ctx.app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let target = ctx.seed_user("bob@example.com", REGULAR_ROLE_ID).await.unwrap();
        let (status, _) = ctx
            .send(Method::POST, &format!("/api/admin/block/{}", target), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn block_without_body_stores_no_reason() {
        let ctx = TestContext::new().await.unwrap();
        let admin = ctx.seed_user("root@example.com", PRIVILEGED_ROLE_ID).await.unwrap();
        let target = ctx.seed_user("bob@example.com", REGULAR_ROLE_ID).await.unwrap();
        let admin_token = ctx.token_for(admin, PRIVILEGED_ROLE_ID);

        let (status, body) = ctx
            .send(Method::POST, &format!("/api/admin/block/{}", target), Some(&admin_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User blocked");

        let (blocked, reason): (bool, Option<String>) =
            sqlx::query_as(r#"SELECT "IsBlocked", "BlockReason" FROM "Users" WHERE "Id" = ?"#)
                .bind(target)
                .fetch_one(ctx.state.db.pool())
                .await
                .unwrap();
        assert!(blocked);
        assert_eq!(reason, None);
    }

    #[tokio::test]
    async fn user_update_rehashes_password() {
        let ctx = TestContext::new().await.unwrap();
        let admin = ctx.seed_user("root@example.com", PRIVILEGED_ROLE_ID).await.unwrap();
        let user = ctx.seed_user("joe@example.com", REGULAR_ROLE_ID).await.unwrap();
        let admin_token = ctx.token_for(admin, PRIVILEGED_ROLE_ID);

        let (status, _) = ctx
            .send(
                Method::PUT,
                &format!("/api/users/{}", user),
                Some(&admin_token),
                Some(json!({ "Name": "Joe", "Email": "joe@example.com", "Password": "new-pass", "RoleId": 2 })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let stored: String = sqlx::query_scalar(r#"SELECT "Password" FROM "Users" WHERE "Id" = ?"#)
            .bind(user)
            .fetch_one(ctx.state.db.pool())
            .await
            .unwrap();
        assert_ne!(stored, "new-pass");

        let (status, _) = ctx
            .send(
                Method::POST,
                "/api/users/login",
                None,
                Some(json!({ "Email": "joe@example.com", "Password": TEST_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = ctx
            .send(
                Method::POST,
                "/api/users/login",
                None,
                Some(json!({ "Email": "joe@example.com", "Password": "new-pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].is_string());
    }

    #[tokio::test]
    async fn missing_user_update_and_delete_are_not_found() {
        let ctx = TestContext::new().await.unwrap();
        let admin = ctx.seed_user("root@example.com", PRIVILEGED_ROLE_ID).await.unwrap();
        let admin_token = ctx.token_for(admin, PRIVILEGED_ROLE_ID);

        let (status, _) = ctx
            .send(
                Method::PUT,
                "/api/users/999",
                Some(&admin_token),
                Some(json!({ "Name": "Ghost", "Email": "ghost@example.com", "Password": "x", "RoleId": 2 })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = ctx.send(Method::DELETE, "/api/users/999", Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let entries: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Logs" WHERE "Action" LIKE '% User #999'"#)
            .fetch_one(ctx.state.db.pool())
            .await
            .unwrap();
        assert_eq!(entries, 0);
    }

    #[tokio::test]
    async fn user_delete_cascades_and_keeps_history() {
        let ctx = TestContext::new().await.unwrap();
        let admin = ctx.seed_user("root@example.com", PRIVILEGED_ROLE_ID).await.unwrap();
        let user = ctx.seed_user("joe@example.com", REGULAR_ROLE_ID).await.unwrap();
        let admin_token = ctx.token_for(admin, PRIVILEGED_ROLE_ID);
        let user_token = ctx.token_for(user, REGULAR_ROLE_ID);

        let (_, body) = ctx
            .send(Method::POST, "/api/animals", Some(&admin_token), Some(json!({ "Name": "Rex", "Type": "Dog" })))
            .await;
        let shared = body["id"].as_i64().unwrap();
        let (_, body) = ctx
            .send(Method::POST, "/api/animals", Some(&user_token), Some(json!({ "Name": "Tom", "Type": "Cat" })))
            .await;
        let owned = body["id"].as_i64().unwrap();

        let (status, body) = ctx
            .send(
                Method::POST,
                "/api/medical-records",
                Some(&user_token),
                Some(json!({ "Date": "2024-03-01", "Procedure": "Vaccination", "AnimalId": shared })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let medical = body["id"].as_i64().unwrap();
        let (status, body) = ctx
            .send(
                Method::POST,
                "/api/state-records",
                Some(&user_token),
                Some(json!({ "Date": "2024-03-01", "State": "Calm", "AnimalId": shared })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let state_record = body["id"].as_i64().unwrap();
        let (status, _) = ctx
            .send(Method::POST, "/api/smart-devices", Some(&user_token), Some(json!({ "DeviceGuid": "tag-1", "AnimalId": owned })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = ctx
            .send(Method::POST, "/api/logs", Some(&user_token), Some(json!({ "Action": "fed Tom" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = ctx.send(Method::DELETE, &format!("/api/users/{}", user), Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let pool = ctx.state.db.pool();
        let animals: Vec<i64> = sqlx::query_scalar(r#"SELECT "Id" FROM "Animals" ORDER BY "Id""#)
            .fetch_all(pool)
            .await
            .unwrap();
        assert_eq!(animals, vec![shared]);
        let devices: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "SmartDevices""#)
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(devices, 0);

        let medical_author: Option<i64> = sqlx::query_scalar(r#"SELECT "UserId" FROM "MedicalRecords" WHERE "Id" = ?"#)
            .bind(medical)
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(medical_author, None);
        let state_author: Option<i64> = sqlx::query_scalar(r#"SELECT "UserId" FROM "StateRecords" WHERE "Id" = ?"#)
            .bind(state_record)
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(state_author, None);

        let fed: Option<i64> = sqlx::query_scalar(r#"SELECT "UserId" FROM "Logs" WHERE "Action" = 'fed Tom'"#)
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(fed, None);
        let remaining: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Logs" WHERE "UserId" = ?"#)
            .bind(user)
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);

        let deletion: Option<i64> = sqlx::query_scalar(r#"SELECT "UserId" FROM "Logs" WHERE "Action" = ?"#)
            .bind(format!("delete User #{}", user))
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(deletion, Some(admin));
    }

    #[tokio::test]
    async fn smart_devices_are_hidden_from_other_users() {
        let ctx = TestContext::new().await.unwrap();
        let owner = ctx.seed_user("ann@example.com", REGULAR_ROLE_ID).await.unwrap();
        let other = ctx.seed_user("joe@example.com", REGULAR_ROLE_ID).await.unwrap();
        let owner_token = ctx.token_for(owner, REGULAR_ROLE_ID);
        let other_token = ctx.token_for(other, REGULAR_ROLE_ID);

        let (_, body) = ctx
            .send(Method::POST, "/api/animals", Some(&owner_token), Some(json!({ "Name": "Rex", "Type": "Dog" })))
            .await;
        let animal = body["id"].as_i64().unwrap();
        let (status, body) = ctx
            .send(Method::POST, "/api/smart-devices", Some(&owner_token), Some(json!({ "DeviceGuid": "tag-1", "AnimalId": animal })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let device = body["id"].as_i64().unwrap();
        let uri = format!("/api/smart-devices/{}", device);

        let (status, _) = ctx.send(Method::GET, &uri, Some(&other_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = ctx
            .send(Method::PUT, &uri, Some(&other_token), Some(json!({ "DeviceGuid": "stolen", "AnimalId": animal })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = ctx.send(Method::DELETE, &uri, Some(&other_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = ctx.send(Method::GET, &uri, Some(&owner_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["DeviceGuid"], "tag-1");
        assert_eq!(body["UserId"], owner);
    }

    #[tokio::test]
    async fn login_succeeds_when_audit_write_fails() {
        let ctx = TestContext::new().await.unwrap();
        ctx.seed_user("ann@example.com", REGULAR_ROLE_ID).await.unwrap();
        sqlx::query(r#"DROP TABLE "Logs""#)
            .execute(ctx.state.db.pool())
            .await
            .unwrap();

        let (status, body) = ctx
            .send(
                Method::POST,
                "/api/users/login",
                None,
                Some(json!({ "Email": "ann@example.com", "Password": TEST_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].is_string());
    }
}
