use profile_manager_lib::client::controller::{ProfileController, ViewState};
use profile_manager_lib::client::{HttpProfileClient, ProfileApi};
use profile_manager_lib::config::{ClientConfig, ServerConfig};
use profile_manager_lib::errors::AppError;
use profile_manager_lib::models::{SkillInput, UpsertProfilePayload};
use profile_manager_lib::{open_service, serve_on};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
    _dir: tempfile::TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ServerConfig {
            bind: "127.0.0.1:0".to_string(),
            database_path: dir.path().join("profile.db"),
            log_dir: None,
        };
        let service = open_service(&config).expect("service");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            serve_on(listener, service, async move {
                let _ = rx.await;
            })
            .await
            .expect("serve");
        });

        Self {
            base_url: format!("http://{}", addr),
            shutdown: Some(tx),
            handle,
            _dir: dir,
        }
    }

    fn api_url(&self) -> String {
        format!("{}/api", self.base_url)
    }

    fn client(&self) -> HttpProfileClient {
        HttpProfileClient::new(&ClientConfig {
            api_url: self.api_url(),
            timeout_ms: 5_000,
        })
        .expect("client")
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.expect("server task");
    }
}

fn payload(skills: Vec<SkillInput>) -> UpsertProfilePayload {
    UpsertProfilePayload {
        name: Some("Alex Johnson".to_string()),
        bio: Some("Full-stack developer".to_string()),
        profile_picture: Some("https://example.com/alex.png".to_string()),
        social_links: None,
        skills: Some(skills),
    }
}

fn new_skill(name: &str) -> SkillInput {
    SkillInput {
        id: None,
        name: name.to_string(),
        endorsements: None,
    }
}

#[tokio::test]
async fn profile_lifecycle_over_http() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let health: Value = http
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .expect("health")
        .json()
        .await
        .expect("health body");
    assert_eq!(health["success"], json!(true));

    let missing = http
        .get(format!("{}/profile", server.api_url()))
        .send()
        .await
        .expect("get");
    assert_eq!(missing.status(), 404);
    let body: Value = missing.json().await.expect("body");
    assert_eq!(body, json!({ "success": false, "message": "Profile not found" }));

    let created = http
        .put(format!("{}/profile", server.api_url()))
        .json(&json!({
            "name": "Alex Johnson",
            "bio": "Full-stack developer",
            "profilePicture": "https://example.com/alex.png",
            "socialLinks": { "github": "https://github.com/alexjohnson" },
            "skills": [{ "name": "Rust" }, { "name": "Go", "endorsements": 2 }]
        }))
        .send()
        .await
        .expect("put");
    assert_eq!(created.status(), 200);
    let body: Value = created.json().await.expect("body");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Profile updated successfully"));
    assert_eq!(body["data"]["socialLinks"]["github"], json!("https://github.com/alexjohnson"));
    assert_eq!(body["data"]["socialLinks"]["twitter"], json!(""));
    assert_eq!(body["data"]["skills"][1]["endorsements"], json!(2));
    let rust_id = body["data"]["skills"][0]["id"].as_str().expect("skill id").to_string();

    let endorsed = http
        .patch(format!("{}/profile/endorse/{}", server.api_url(), rust_id))
        .send()
        .await
        .expect("patch");
    assert_eq!(endorsed.status(), 200);
    let body: Value = endorsed.json().await.expect("body");
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": { "skillId": rust_id, "name": "Rust", "endorsements": 1 },
            "message": "Skill endorsed successfully"
        })
    );

    let unknown = http
        .patch(format!("{}/profile/endorse/unknown", server.api_url()))
        .send()
        .await
        .expect("patch");
    assert_eq!(unknown.status(), 404);
    let body: Value = unknown.json().await.expect("body");
    assert_eq!(body["message"], json!("Skill not found"));

    server.stop().await;
}

#[tokio::test]
async fn invalid_updates_answer_400_with_envelope() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let missing_bio = http
        .put(format!("{}/profile", server.api_url()))
        .json(&json!({ "name": "Alex", "profilePicture": "pic" }))
        .send()
        .await
        .expect("put");
    assert_eq!(missing_bio.status(), 400);
    let body: Value = missing_bio.json().await.expect("body");
    assert_eq!(
        body,
        json!({ "success": false, "message": "Please provide name, bio, and profile picture" })
    );

    let malformed = http
        .put(format!("{}/profile", server.api_url()))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("put");
    assert_eq!(malformed.status(), 400);
    let body: Value = malformed.json().await.expect("body");
    assert_eq!(body["success"], json!(false));

    let still_missing = http
        .get(format!("{}/profile", server.api_url()))
        .send()
        .await
        .expect("get");
    assert_eq!(still_missing.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn client_merge_and_repeated_endorsements() {
    let server = TestServer::start().await;
    let client = server.client();

    let err = client.fetch_profile().await.expect_err("no profile yet");
    assert!(matches!(err, AppError::NotFound(_)));

    let created = client
        .update_profile(payload(vec![new_skill("Go"), new_skill("Perl")]))
        .await
        .expect("create");
    let go_id = created.skills[0].id.clone();

    for _ in 0..10 {
        client.endorse_skill(&go_id).await.expect("endorse");
    }

    let updated = client
        .update_profile(payload(vec![
            SkillInput {
                id: Some(go_id.clone()),
                name: "Go".to_string(),
                endorsements: Some(0),
            },
            new_skill("Rust"),
        ]))
        .await
        .expect("update");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.skills.len(), 2);
    assert_eq!(updated.skill(&go_id).map(|skill| skill.endorsements), Some(10));
    assert_eq!(updated.skills[1].name, "Rust");
    assert_eq!(updated.skills[1].endorsements, 0);
    assert!(updated.skills.iter().all(|skill| skill.name != "Perl"));

    let fetched = client.fetch_profile().await.expect("fetch");
    assert_eq!(fetched.skills, updated.skills);
    assert_eq!(fetched.name, "Alex Johnson");

    let err = client.endorse_skill("nope").await.expect_err("unknown skill");
    assert!(matches!(err, AppError::NotFound(message) if message == "Skill not found"));

    server.stop().await;
}

#[tokio::test]
async fn controller_drives_a_live_server() {
    let server = TestServer::start().await;
    let client = server.client();
    let created = client
        .update_profile(payload(vec![new_skill("Rust")]))
        .await
        .expect("create");
    let rust_id = created.skills[0].id.clone();

    let mut controller = ProfileController::new(server.client());
    assert!(controller.load().await);
    assert!(controller.endorse(&rust_id).await);
    assert_eq!(
        controller.profile().and_then(|profile| profile.skill(&rust_id)).map(|skill| skill.endorsements),
        Some(1)
    );

    assert!(!controller.endorse("ghost").await);
    assert_eq!(controller.error(), Some("Skill not found"));
    assert_eq!(controller.state(), &ViewState::Ready);

    assert!(controller.begin_edit());
    if let Some(draft) = controller.draft_mut() {
        draft.add_skill("Go");
    }
    assert!(controller.submit_edit().await);
    let saved = controller.profile().expect("profile");
    assert_eq!(saved.skills.len(), 2);
    assert_eq!(saved.skill(&rust_id).map(|skill| skill.endorsements), Some(1));

    server.stop().await;
}

#[tokio::test]
async fn endorse_targets_skill_ids_with_reserved_characters() {
    let server = TestServer::start().await;
    let client = server.client();
    let skill = |id: &str, name: &str| SkillInput {
        id: Some(id.to_string()),
        name: name.to_string(),
        endorsements: Some(0),
    };
    client
        .update_profile(payload(vec![
            skill("x", "Plain"),
            skill("x#y/z", "Hash and slash"),
            skill("a/b", "Slash"),
        ]))
        .await
        .expect("create");

    let result = client.endorse_skill("x#y/z").await.expect("endorse");
    assert_eq!(result.skill_id, "x#y/z");
    assert_eq!(result.endorsements, 1);
    client.endorse_skill("a/b").await.expect("endorse");

    let fetched = client.fetch_profile().await.expect("fetch");
    let count = |id: &str| fetched.skill(id).map(|skill| skill.endorsements);
    assert_eq!(count("x"), Some(0));
    assert_eq!(count("x#y/z"), Some(1));
    assert_eq!(count("a/b"), Some(1));

    server.stop().await;
}
