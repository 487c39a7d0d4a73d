use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use common::ContestPhase;
use common::storage::FilesystemBlobStore;
use livestore::Store;
use reqwest::Client;
use serde_json::Value;

use server::config::{
    AppConfig, AuthConfig, ContestConfig, CorsConfig, SchedulerConfig, ServerConfig, StorageConfig,
};
use server::state::AppState;

/// PIN of the bootstrap admin seeded into every test app.
pub const ADMIN_PIN: &str = "4242";

/// Upload ceiling for test apps, kept small so oversize tests stay cheap.
pub const MAX_UPLOAD_BYTES: u64 = 64 * 1024;

pub mod routes {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const CONTESTS: &str = "/api/v1/contests";
    pub const ACTIVE: &str = "/api/v1/contests/active";
    pub const USERS: &str = "/api/v1/users";
    pub const ARCHIVES: &str = "/api/v1/archives";
    pub const LEADERBOARD: &str = "/api/v1/leaderboard";
    pub const TURNOVER: &str = "/api/v1/admin/turnover";

    pub fn user(id: &str) -> String {
        format!("/api/v1/users/{id}")
    }

    pub fn contest_finalize(id: &str) -> String {
        format!("/api/v1/contests/{id}/finalize")
    }

    pub fn contest_skip(id: &str) -> String {
        format!("/api/v1/contests/{id}/skip")
    }

    pub fn entries(contest_id: &str) -> String {
        format!("/api/v1/contests/{contest_id}/entries")
    }

    pub fn my_entries(contest_id: &str) -> String {
        format!("/api/v1/contests/{contest_id}/entries/mine")
    }

    pub fn entry(contest_id: &str, entry_id: &str) -> String {
        format!("/api/v1/contests/{contest_id}/entries/{entry_id}")
    }

    pub fn votes(contest_id: &str) -> String {
        format!("/api/v1/contests/{contest_id}/votes")
    }

    pub fn my_vote(contest_id: &str) -> String {
        format!("/api/v1/contests/{contest_id}/votes/me")
    }

    pub fn vote_progress(contest_id: &str) -> String {
        format!("/api/v1/contests/{contest_id}/votes/progress")
    }

    pub fn archive(id: &str) -> String {
        format!("/api/v1/archives/{id}")
    }

    pub fn archive_images(id: &str) -> String {
        format!("/api/v1/archives/{id}/images")
    }

    /// Mirror of the `blob://` URL written into entries.
    pub fn blob_from_url(url: &str) -> String {
        let relative = url.strip_prefix("blob://").expect("expected a blob URL");
        format!("/api/v1/blobs/{relative}")
    }
}

/// A running test server with an in-memory store and a temp blob root.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    /// Direct handle onto the app state for setup the API does not expose
    /// (e.g. flipping a contest into voting without waiting for a month).
    pub state: AppState,
    _blob_dir: tempfile::TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    /// The `id` field of the JSON body.
    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("response body should contain an id")
            .to_string()
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let blob_dir = tempfile::tempdir().expect("Failed to create blob temp dir");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_days: 1,
                bootstrap_admin_pin: Some(ADMIN_PIN.to_string()),
            },
            storage: StorageConfig {
                root: blob_dir.path().display().to_string(),
                max_upload_bytes: MAX_UPLOAD_BYTES,
                accepted_media_types: vec!["image/jpeg".to_string()],
            },
            contest: ContestConfig {
                max_entries_per_user: 3,
            },
            scheduler: SchedulerConfig {
                enabled: false,
                tick_interval_secs: 3600,
            },
        };

        let blobs = FilesystemBlobStore::new(
            blob_dir.path().join("blobs"),
            config.storage.max_upload_bytes,
        )
        .await
        .expect("Failed to create blob store");

        let state = AppState {
            store: Store::new(),
            blobs: Arc::new(blobs),
            config,
        };

        server::seed::seed_bootstrap_admin(&state).expect("Failed to seed bootstrap admin");

        let app = server::build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            state,
            _blob_dir: blob_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Multipart photo upload with optional metadata fields.
    pub async fn upload_photo(
        &self,
        contest_id: &str,
        token: &str,
        filename: &str,
        bytes: Vec<u8>,
        metadata: Option<(&str, &str)>,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("image/jpeg")
            .expect("Failed to set MIME type");
        let mut form = reqwest::multipart::Form::new().part("photo", part);
        if let Some((order_num, photo_num)) = metadata {
            form = form
                .text("order_num", order_num.to_string())
                .text("photo_num", photo_num.to_string());
        }

        let res = self
            .client
            .post(self.url(&routes::entries(contest_id)))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Upload declaring an arbitrary MIME type.
    pub async fn upload_with_mime(
        &self,
        contest_id: &str,
        token: &str,
        filename: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new().part("photo", part);

        let res = self
            .client
            .post(self.url(&routes::entries(contest_id)))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Log in as the seeded bootstrap admin.
    pub async fn admin_token(&self) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &serde_json::json!({"name": "admin", "pin": ADMIN_PIN}),
            )
            .await;
        assert_eq!(res.status, 200, "Admin login failed: {}", res.text);
        res.body["token"].as_str().unwrap().to_string()
    }

    /// Create a PIN-less member on a team and log them in.
    pub async fn create_member(
        &self,
        admin_token: &str,
        name: &str,
        team: Option<&str>,
    ) -> String {
        let res = self
            .post_with_token(
                routes::USERS,
                &serde_json::json!({"display_name": name, "team_id": team}),
                admin_token,
            )
            .await;
        assert_eq!(res.status, 201, "create_member failed: {}", res.text);

        let login = self
            .post_without_token(routes::LOGIN, &serde_json::json!({"name": name}))
            .await;
        assert_eq!(login.status, 200, "Member login failed: {}", login.text);
        login.body["token"].as_str().unwrap().to_string()
    }

    /// Create an ad-hoc contest with no metadata requirement.
    pub async fn create_contest(&self, admin_token: &str, id: &str, team: Option<&str>) {
        let res = self
            .post_with_token(
                routes::CONTESTS,
                &serde_json::json!({
                    "id": id,
                    "display_name": format!("Contest {id}"),
                    "team_id": team,
                    "metadata_required": false,
                }),
                admin_token,
            )
            .await;
        assert_eq!(res.status, 201, "create_contest failed: {}", res.text);
    }

    /// Flip a contest into the voting phase directly in the store.
    pub fn open_voting(&self, contest_id: &str) {
        self.state
            .contests()
            .unwrap()
            .update(contest_id, |c| {
                c.phase = ContestPhase::Voting;
                c.voting_started_at = Some(Utc::now());
            })
            .expect("Failed to open voting");
    }

    /// Upload a photo and return the created entry's id.
    pub async fn submit_entry(&self, contest_id: &str, token: &str, filename: &str) -> String {
        let res = self
            .upload_photo(contest_id, token, filename, b"jpeg bytes".to_vec(), None)
            .await;
        assert_eq!(res.status, 201, "submit_entry failed: {}", res.text);
        res.id()
    }
}
