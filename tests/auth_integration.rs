//! End-to-end tests against Postgres.
//!
//! Each test creates its own database from `configuration.yaml` and runs the
//! migrations into it.

use chirpy::configuration::{get_configuration, DatabaseSettings};
use chirpy::startup::run;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub polka_key: String,
    pub client: reqwest::Client,
}

async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    configuration.application.platform = "dev".to_string();
    let connection_pool = configure_database(&configuration.database).await;
    let polka_key = configuration.polka.api_key.clone();

    let server = run(listener, connection_pool.clone(), configuration)
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
        polka_key,
        client: reqwest::Client::new(),
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

impl TestApp {
    async fn create_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(&format!("{}/api/users", self.address))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(&format!("{}/api/login", self.address))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Registers and logs in, returning the login body
    async fn signed_in_user(&self, email: &str, password: &str) -> Value {
        assert_eq!(201, self.create_user(email, password).await.status().as_u16());
        let response = self.login(email, password).await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse login response")
    }

    async fn post_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(&format!("{}/api/chirps", self.address))
            .bearer_auth(token)
            .json(&json!({"body": body}))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

fn field<'a>(body: &'a Value, name: &str) -> &'a str {
    body[name]
        .as_str()
        .unwrap_or_else(|| panic!("missing string field `{}` in {}", name, body))
}

// --- Users ---

#[tokio::test]
async fn create_user_returns_201_without_tokens() {
    let app = spawn_app().await;

    let response = app.create_user("walt@breakingbad.com", "04234").await;
    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "walt@breakingbad.com");
    assert_eq!(body["is_chirpy_red"], false);
    assert!(body.get("id").is_some());
    assert!(body.get("token").is_none());
    assert!(body.get("hashed_password").is_none());

    let stored: String = sqlx::query_scalar("SELECT hashed_password FROM users WHERE email = $1")
        .bind("walt@breakingbad.com")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_ne!(stored, "04234");
}

#[tokio::test]
async fn create_user_returns_400_for_missing_fields() {
    let app = spawn_app().await;

    let cases = vec![
        (json!({"email": "walt@breakingbad.com"}), "missing password"),
        (json!({"password": "04234"}), "missing email"),
        (json!({"email": "", "password": ""}), "empty fields"),
        (json!({"email": "not-an-email", "password": "04234"}), "invalid email"),
    ];

    for (body, reason) in cases {
        let response = app
            .client
            .post(&format!("{}/api/users", app.address))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(400, response.status().as_u16(), "{}", reason);
    }
}

#[tokio::test]
async fn create_user_returns_409_for_duplicate_email() {
    let app = spawn_app().await;

    assert_eq!(201, app.create_user("walt@breakingbad.com", "04234").await.status().as_u16());
    assert_eq!(409, app.create_user("walt@breakingbad.com", "other").await.status().as_u16());
}

// --- Login / refresh / revoke ---

#[tokio::test]
async fn login_returns_tokens() {
    let app = spawn_app().await;
    let body = app.signed_in_user("walt@breakingbad.com", "04234").await;

    assert_eq!(body["email"], "walt@breakingbad.com");
    assert!(!field(&body, "token").is_empty());

    let refresh_token = field(&body, "refresh_token");
    assert_eq!(refresh_token.len(), 64);
    assert!(refresh_token.chars().all(|c| c.is_ascii_hexdigit()));

    let (user_id, revoked): (uuid::Uuid, Option<chrono::DateTime<chrono::Utc>>) =
        sqlx::query_as("SELECT user_id, revoked_at FROM refresh_tokens WHERE token = $1")
            .bind(refresh_token)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(user_id.to_string(), field(&body, "id"));
    assert!(revoked.is_none());
}

#[tokio::test]
async fn login_fails_with_the_same_message_for_bad_email_and_bad_password() {
    let app = spawn_app().await;
    app.create_user("walt@breakingbad.com", "04234").await;

    let wrong_password = app.login("walt@breakingbad.com", "wrong").await;
    let unknown_email = app.login("jesse@breakingbad.com", "04234").await;

    assert_eq!(401, wrong_password.status().as_u16());
    assert_eq!(401, unknown_email.status().as_u16());

    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_email.json().await.unwrap();
    assert_eq!(a["error"], b["error"]);
}

#[tokio::test]
async fn refresh_issues_a_working_session_token() {
    let app = spawn_app().await;
    let body = app.signed_in_user("walt@breakingbad.com", "04234").await;

    let response = app.post_with_bearer("/api/refresh", field(&body, "refresh_token")).await;
    assert_eq!(200, response.status().as_u16());

    let refreshed: Value = response.json().await.unwrap();
    let new_token = field(&refreshed, "token");

    let chirp = app.post_chirp(new_token, "Still cooking").await;
    assert_eq!(201, chirp.status().as_u16());
}

#[tokio::test]
async fn refresh_rejects_unknown_and_session_tokens() {
    let app = spawn_app().await;
    let body = app.signed_in_user("walt@breakingbad.com", "04234").await;

    let unknown = app.post_with_bearer("/api/refresh", &"0".repeat(64)).await;
    assert_eq!(401, unknown.status().as_u16());

    let session_token = app.post_with_bearer("/api/refresh", field(&body, "token")).await;
    assert_eq!(401, session_token.status().as_u16());
}

#[tokio::test]
async fn revoked_refresh_token_cannot_be_used() {
    let app = spawn_app().await;
    let body = app.signed_in_user("walt@breakingbad.com", "04234").await;
    let refresh_token = field(&body, "refresh_token");

    let revoke = app.post_with_bearer("/api/revoke", refresh_token).await;
    assert_eq!(204, revoke.status().as_u16());

    let refresh = app.post_with_bearer("/api/refresh", refresh_token).await;
    assert_eq!(401, refresh.status().as_u16());

    let revoked_at: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT revoked_at FROM refresh_tokens WHERE token = $1")
            .bind(refresh_token)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert!(revoked_at.is_some());
}

#[tokio::test]
async fn expired_refresh_token_cannot_be_used() {
    let app = spawn_app().await;
    let body = app.signed_in_user("walt@breakingbad.com", "04234").await;
    let refresh_token = field(&body, "refresh_token");

    sqlx::query("UPDATE refresh_tokens SET expires_at = now() - interval '1 minute' WHERE token = $1")
        .bind(refresh_token)
        .execute(&app.db_pool)
        .await
        .unwrap();

    let refresh = app.post_with_bearer("/api/refresh", refresh_token).await;
    assert_eq!(401, refresh.status().as_u16());
}

#[tokio::test]
async fn each_login_creates_its_own_refresh_token() {
    let app = spawn_app().await;
    let first = app.signed_in_user("walt@breakingbad.com", "04234").await;
    let second: Value = app
        .login("walt@breakingbad.com", "04234")
        .await
        .json()
        .await
        .unwrap();

    assert_ne!(field(&first, "refresh_token"), field(&second, "refresh_token"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

// --- Credentials update ---

#[tokio::test]
async fn update_user_changes_email_and_password() {
    let app = spawn_app().await;
    let body = app.signed_in_user("walt@breakingbad.com", "04234").await;

    let response = app
        .client
        .put(&format!("{}/api/users", app.address))
        .bearer_auth(field(&body, "token"))
        .json(&json!({"email": "heisenberg@breakingbad.com", "password": "blue"}))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());

    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["email"], "heisenberg@breakingbad.com");
    assert_eq!(updated["id"], body["id"]);

    assert_eq!(401, app.login("walt@breakingbad.com", "04234").await.status().as_u16());
    assert_eq!(200, app.login("heisenberg@breakingbad.com", "blue").await.status().as_u16());
}

// --- Chirps ---

#[tokio::test]
async fn chirps_are_created_filtered_and_listed() {
    let app = spawn_app().await;
    let body = app.signed_in_user("walt@breakingbad.com", "04234").await;
    let token = field(&body, "token");

    let first = app.post_chirp(token, "I had something interesting for breakfast").await;
    assert_eq!(201, first.status().as_u16());
    let second = app.post_chirp(token, "What a kerfuffle that was, Fornax!").await;
    assert_eq!(201, second.status().as_u16());

    let created: Value = second.json().await.unwrap();
    assert_eq!(created["body"], "What a **** that was, ****!");
    assert_eq!(created["user_id"], body["id"]);

    let list: Value = app
        .client
        .get(&format!("{}/api/chirps", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["body"], "I had something interesting for breakfast");

    let single = app
        .client
        .get(&format!("{}/api/chirps/{}", app.address, field(&created, "id")))
        .send()
        .await
        .unwrap();
    assert_eq!(200, single.status().as_u16());
    let single: Value = single.json().await.unwrap();
    assert_eq!(single["id"], created["id"]);
}

#[tokio::test]
async fn missing_chirp_returns_404() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(&format!("{}/api/chirps/{}", app.address, uuid::Uuid::new_v4()))
        .send()
        .await
        .unwrap();

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn only_the_author_can_delete_a_chirp() {
    let app = spawn_app().await;
    let walt = app.signed_in_user("walt@breakingbad.com", "04234").await;
    let saul = app.signed_in_user("saul@bettercall.com", "123456").await;

    let chirp: Value = app
        .post_chirp(field(&walt, "token"), "Say my name")
        .await
        .json()
        .await
        .unwrap();
    let url = format!("{}/api/chirps/{}", app.address, field(&chirp, "id"));

    let forbidden = app
        .client
        .delete(&url)
        .bearer_auth(field(&saul, "token"))
        .send()
        .await
        .unwrap();
    assert_eq!(403, forbidden.status().as_u16());

    let deleted = app
        .client
        .delete(&url)
        .bearer_auth(field(&walt, "token"))
        .send()
        .await
        .unwrap();
    assert_eq!(204, deleted.status().as_u16());

    let gone = app.client.get(&url).send().await.unwrap();
    assert_eq!(404, gone.status().as_u16());
}

// --- Webhooks ---

#[tokio::test]
async fn polka_upgrade_sets_chirpy_red() {
    let app = spawn_app().await;
    let body = app.signed_in_user("walt@breakingbad.com", "04234").await;

    let response = app
        .client
        .post(&format!("{}/api/polka/webhooks", app.address))
        .header("Authorization", format!("ApiKey {}", app.polka_key))
        .json(&json!({"event": "user.upgraded", "data": {"user_id": body["id"]}}))
        .send()
        .await
        .unwrap();
    assert_eq!(204, response.status().as_u16());

    let relogin: Value = app
        .login("walt@breakingbad.com", "04234")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(relogin["is_chirpy_red"], true);
}

#[tokio::test]
async fn polka_upgrade_for_unknown_user_returns_404() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(&format!("{}/api/polka/webhooks", app.address))
        .header("Authorization", format!("ApiKey {}", app.polka_key))
        .json(&json!({"event": "user.upgraded", "data": {"user_id": uuid::Uuid::new_v4()}}))
        .send()
        .await
        .unwrap();

    assert_eq!(404, response.status().as_u16());
}

// --- Admin ---

#[tokio::test]
async fn reset_deletes_users_and_their_tokens() {
    let app = spawn_app().await;
    let body = app.signed_in_user("walt@breakingbad.com", "04234").await;
    app.post_chirp(field(&body, "token"), "Say my name").await;

    let response = app
        .client
        .post(&format!("{}/admin/reset", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(200, response.status().as_u16());

    for table in ["users", "chirps", "refresh_tokens"] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{} should be empty", table);
    }
}
