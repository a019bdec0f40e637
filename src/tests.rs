//! Integration tests for the PawHaven backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::models::UserRole;
use crate::search::SearchIndex;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    repo: Arc<Repository>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");
        let index_path = temp_dir.path().join("index");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Initialize search index
        let search = Arc::new(SearchIndex::open(&index_path).expect("Failed to init search"));

        // Create config
        let config = Config {
            db_path,
            index_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            invite_ttl_minutes: 60,
            session_ttl_minutes: 60,
        };

        let state = AppState {
            repo: repo.clone(),
            search,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            repo,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register an account; returns (token, user id).
    async fn register(&self, name: &str, email: &str) -> (String, String) {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": "correct-horse-battery"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);

        let body: Value = resp.json().await.unwrap();
        let token = body["data"]["token"].as_str().unwrap().to_string();
        let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();
        (token, user_id)
    }

    /// Promote a user to platform admin, bypassing the API bootstrap problem.
    async fn make_admin(&self, user_id: &str) {
        self.repo
            .set_user_role(user_id, UserRole::Admin)
            .await
            .expect("Failed to promote user");
    }

    /// Create a shelter owned by the token's account; returns its id.
    async fn create_shelter(&self, token: &str, name: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/shelters"))
            .bearer_auth(token)
            .json(&json!({
                "name": name,
                "contactEmail": "contact@example.org"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);

        let body: Value = resp.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Create a pet in a shelter; returns its id.
    async fn create_pet(&self, token: &str, shelter_id: &str, name: &str, species: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/pets"))
            .bearer_auth(token)
            .json(&json!({
                "shelterId": shelter_id,
                "name": name,
                "species": species
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);

        let body: Value = resp.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Create an invite; returns (invite id, raw token).
    async fn create_invite(
        &self,
        token: &str,
        shelter_id: &str,
        email: &str,
        ttl_minutes: Option<i64>,
    ) -> (String, String) {
        let mut body = json!({ "email": email, "role": "staff" });
        if let Some(ttl) = ttl_minutes {
            body["ttlMinutes"] = json!(ttl);
        }

        let resp = self
            .client
            .post(self.url(&format!("/api/shelters/{}/invites", shelter_id)))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);

        let body: Value = resp.json().await.unwrap();
        (
            body["data"]["invite"]["id"].as_str().unwrap().to_string(),
            body["data"]["token"].as_str().unwrap().to_string(),
        )
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_register_and_login() {
    let fixture = TestFixture::new().await;

    let (_, _) = fixture.register("Ada", "ada@example.com").await;

    // Login with the right password
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({
            "email": "ada@example.com",
            "password": "correct-horse-battery"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].is_string());

    // Wrong password
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/login"))
        .json(&json!({
            "email": "ada@example.com",
            "password": "not-the-password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_duplicate_email_registration_conflicts() {
    let fixture = TestFixture::new().await;

    fixture.register("Ada", "ada@example.com").await;

    let resp = fixture
        .client
        .post(fixture.url("/api/auth/register"))
        .json(&json!({
            "name": "Other Ada",
            "email": "ada@example.com",
            "password": "another-password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_session_required_and_logout() {
    let fixture = TestFixture::new().await;

    // No token
    let resp = fixture
        .client
        .get(fixture.url("/api/auth/me"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let (token, _) = fixture.register("Ada", "ada@example.com").await;

    // Valid session
    let resp = fixture
        .client
        .get(fixture.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["email"], "ada@example.com");

    // Logout invalidates the session
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_admin_role_change() {
    let fixture = TestFixture::new().await;

    let (admin_token, admin_id) = fixture.register("Root", "root@example.com").await;
    let (user_token, user_id) = fixture.register("Ada", "ada@example.com").await;
    fixture.make_admin(&admin_id).await;

    // Non-admin cannot change roles
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/users/{}/role", admin_id)))
        .bearer_auth(&user_token)
        .json(&json!({ "role": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Admin can
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/users/{}/role", user_id)))
        .bearer_auth(&admin_token)
        .json(&json!({ "role": "shelter" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["role"], "shelter");
}

#[tokio::test]
async fn test_shelter_application_and_moderation() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let (admin_token, admin_id) = fixture.register("Root", "root@example.com").await;
    fixture.make_admin(&admin_id).await;

    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;

    // New shelters await review
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/shelters/{}", shelter_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "pending_review");

    // Owner cannot self-verify
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/shelters/{}/status", shelter_id)))
        .bearer_auth(&owner_token)
        .json(&json!({ "status": "verified" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Admin verifies
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/shelters/{}/status", shelter_id)))
        .bearer_auth(&admin_token)
        .json(&json!({ "status": "verified" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "verified");

    // Status listing filter
    let resp = fixture
        .client
        .get(fixture.url("/api/shelters?status=verified"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_members_are_forbidden() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let (stranger_token, _) = fixture.register("Sam", "sam@example.com").await;

    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;

    // A non-member cannot update the shelter profile
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/shelters/{}", shelter_id)))
        .bearer_auth(&stranger_token)
        .json(&json!({ "city": "Springfield" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    // Nor list its members
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/shelters/{}/members", shelter_id)))
        .bearer_auth(&stranger_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // The owner can
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/shelters/{}", shelter_id)))
        .bearer_auth(&owner_token)
        .json(&json!({ "city": "Springfield" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_invite_lifecycle() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let (staff_token, staff_id) = fixture.register("Stan", "stan@example.com").await;

    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;
    let (_, invite_token) = fixture
        .create_invite(&owner_token, &shelter_id, "stan@example.com", Some(60))
        .await;

    // Public status probe: valid, staff role
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/invites/{}", invite_token)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["valid"], true);
    assert_eq!(body["data"]["role"], "staff");
    assert_eq!(body["data"]["shelterName"], "Happy Tails");

    // Accept
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/invites/{}/accept", invite_token)))
        .bearer_auth(&staff_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "accepted");

    // Membership was created
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/shelters/{}/members", shelter_id)))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let members = body["data"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert!(members
        .iter()
        .any(|m| m["userId"] == staff_id.as_str() && m["role"] == "staff"));

    // At-most-once consumption: the second acceptance fails
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/invites/{}/accept", invite_token)))
        .bearer_auth(&staff_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_invite_expiry() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let (other_token, _) = fixture.register("Tara", "tara@example.com").await;

    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;

    // ttl 0: expires immediately
    let (_, invite_token) = fixture
        .create_invite(&owner_token, &shelter_id, "tara@example.com", Some(0))
        .await;

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/invites/{}", invite_token)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["valid"], false);
    assert_eq!(body["data"]["reason"], "expired");

    // Acceptance of an expired invite fails
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/invites/{}/accept", invite_token)))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_invite_pending_uniqueness() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;

    let (first_id, _) = fixture
        .create_invite(&owner_token, &shelter_id, "new@example.com", None)
        .await;
    let (second_id, _) = fixture
        .create_invite(&owner_token, &shelter_id, "new@example.com", None)
        .await;

    // Exactly one pending invite remains; the first was revoked
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/shelters/{}/invites", shelter_id)))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let invites = body["data"].as_array().unwrap();
    assert_eq!(invites.len(), 2);

    let pending: Vec<&Value> = invites
        .iter()
        .filter(|i| i["status"] == "pending")
        .collect();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], second_id.as_str());

    let revoked: Vec<&Value> = invites
        .iter()
        .filter(|i| i["status"] == "revoked")
        .collect();
    assert_eq!(revoked.len(), 1);
    assert_eq!(revoked[0]["id"], first_id.as_str());
}

#[tokio::test]
async fn test_invite_revoke_and_resend() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;

    let (invite_id, invite_token) = fixture
        .create_invite(&owner_token, &shelter_id, "new@example.com", None)
        .await;

    // Resend works while pending
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/invites/{}/resend", invite_id)))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Revoke
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/invites/{}/revoke", invite_id)))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "revoked");

    // The token no longer validates
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/invites/{}", invite_token)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["valid"], false);
    assert_eq!(body["data"]["reason"], "revoked");

    // Resend after revocation fails
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/invites/{}/resend", invite_id)))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_pet_crud_and_filters() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;

    let dog_id = fixture
        .create_pet(&owner_token, &shelter_id, "Rex", "dog")
        .await;
    fixture
        .create_pet(&owner_token, &shelter_id, "Whiskers", "cat")
        .await;
    fixture
        .create_pet(&owner_token, &shelter_id, "Bella", "dog")
        .await;

    // Species filter
    let resp = fixture
        .client
        .get(fixture.url("/api/pets?species=dog"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["total"], 2);

    // Pagination clamps and reports totals
    let resp = fixture
        .client
        .get(fixture.url("/api/pets?page=1&pageSize=2"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["total"], 3);

    // Name search
    let resp = fixture
        .client
        .get(fixture.url("/api/pets?q=Rex"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["total"], 1);

    // Update status
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/pets/{}", dog_id)))
        .bearer_auth(&owner_token)
        .json(&json!({ "status": "adopted" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "adopted");

    // Delete
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/pets/{}", dog_id)))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/pets/{}", dog_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_adoption_request_flow() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;
    let pet_id = fixture
        .create_pet(&owner_token, &shelter_id, "Rex", "dog")
        .await;

    // Public submission
    let resp = fixture
        .client
        .post(fixture.url("/api/adoption-requests"))
        .json(&json!({
            "petId": pet_id,
            "fullName": "Jane",
            "email": "j@x.com",
            "phone": "555-1234"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    let request_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "pending");

    // Staff listing with status filter includes it
    let resp = fixture
        .client
        .get(fixture.url(&format!(
            "/api/adoption-requests?shelterId={}&status=pending",
            shelter_id
        )))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["id"] == request_id.as_str()));

    // pending -> under_review -> approved -> completed
    for status in ["under_review", "approved", "completed"] {
        let resp = fixture
            .client
            .patch(fixture.url(&format!("/api/adoption-requests/{}", request_id)))
            .bearer_auth(&owner_token)
            .json(&json!({ "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "transition to {} failed", status);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["data"]["status"], status);
    }

    // Backward transition is rejected
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/adoption-requests/{}", request_id)))
        .bearer_auth(&owner_token)
        .json(&json!({ "status": "pending" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_adoption_request_for_missing_pet() {
    let fixture = TestFixture::new().await;

    let (admin_token, admin_id) = fixture.register("Root", "root@example.com").await;
    fixture.make_admin(&admin_id).await;

    let resp = fixture
        .client
        .post(fixture.url("/api/adoption-requests"))
        .json(&json!({
            "petId": "no-such-pet",
            "fullName": "Jane",
            "email": "j@x.com",
            "phone": "555-1234"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // No row was created
    let resp = fixture
        .client
        .get(fixture.url("/api/adoption-requests"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn test_adoption_request_rejection_is_terminal() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;
    let pet_id = fixture
        .create_pet(&owner_token, &shelter_id, "Rex", "dog")
        .await;

    let resp = fixture
        .client
        .post(fixture.url("/api/adoption-requests"))
        .json(&json!({
            "petId": pet_id,
            "fullName": "Jane",
            "email": "j@x.com",
            "phone": "555-1234"
        }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    // Direct rejection from pending is a legal forward move
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/adoption-requests/{}", request_id)))
        .bearer_auth(&owner_token)
        .json(&json!({ "status": "rejected", "notes": "garden too small" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["decisionNotes"], "garden too small");

    // Rejected requests cannot be completed
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/adoption-requests/{}", request_id)))
        .bearer_auth(&owner_token)
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_adoption_request_search() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;
    let pet_id = fixture
        .create_pet(&owner_token, &shelter_id, "Rex", "dog")
        .await;

    for (name, email) in [("Jane Miller", "jane@x.com"), ("Tom Baker", "tom@x.com")] {
        let resp = fixture
            .client
            .post(fixture.url("/api/adoption-requests"))
            .json(&json!({
                "petId": pet_id,
                "fullName": name,
                "email": email,
                "phone": "555-1234",
                "message": "We have a big fenced garden"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
    }

    // Wait for search index to update
    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    let resp = fixture
        .client
        .get(fixture.url(&format!(
            "/api/adoption-requests?shelterId={}&q=Jane",
            shelter_id
        )))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert!(!items.is_empty());
    assert_eq!(items[0]["fullName"], "Jane Miller");
}

#[tokio::test]
async fn test_adoption_request_withdrawal() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let (applicant_token, _) = fixture.register("Jane", "jane@x.com").await;
    let (stranger_token, _) = fixture.register("Sam", "sam@example.com").await;

    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;
    let pet_id = fixture
        .create_pet(&owner_token, &shelter_id, "Rex", "dog")
        .await;

    let resp = fixture
        .client
        .post(fixture.url("/api/adoption-requests"))
        .json(&json!({
            "petId": pet_id,
            "fullName": "Jane",
            "email": "jane@x.com",
            "phone": "555-1234"
        }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    // A stranger cannot withdraw it
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/adoption-requests/{}", request_id)))
        .bearer_auth(&stranger_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // The applicant can (matched by account email)
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/adoption-requests/{}", request_id)))
        .bearer_auth(&applicant_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/adoption-requests/{}", request_id)))
        .bearer_auth(&applicant_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_concurrent_booking_conflict() {
    let fixture = TestFixture::new().await;

    let (token_a, _) = fixture.register("Ada", "ada@example.com").await;
    let (token_b, _) = fixture.register("Ben", "ben@example.com").await;

    let body = json!({
        "vetName": "Dr. Patel",
        "slotAt": "2026-09-01T10:00:00Z"
    });

    let req_a = fixture
        .client
        .post(fixture.url("/api/bookings"))
        .bearer_auth(&token_a)
        .json(&body)
        .send();
    let req_b = fixture
        .client
        .post(fixture.url("/api/bookings"))
        .bearer_auth(&token_b)
        .json(&body)
        .send();

    let (resp_a, resp_b) = tokio::join!(req_a, req_b);
    let (status_a, status_b) = (resp_a.unwrap().status(), resp_b.unwrap().status());

    // Exactly one wins; the other observes Conflict
    let mut statuses = [status_a.as_u16(), status_b.as_u16()];
    statuses.sort();
    assert_eq!(statuses, [201, 409]);
}

#[tokio::test]
async fn test_cancelled_booking_frees_the_slot() {
    let fixture = TestFixture::new().await;

    let (token_a, _) = fixture.register("Ada", "ada@example.com").await;
    let (token_b, _) = fixture.register("Ben", "ben@example.com").await;

    let body = json!({
        "vetName": "Dr. Patel",
        "slotAt": "2026-09-01T10:00:00Z"
    });

    let resp = fixture
        .client
        .post(fixture.url("/api/bookings"))
        .bearer_auth(&token_a)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let booking: Value = resp.json().await.unwrap();
    let booking_id = booking["data"]["id"].as_str().unwrap().to_string();

    // Taken
    let resp = fixture
        .client
        .post(fixture.url("/api/bookings"))
        .bearer_auth(&token_b)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    // Another user cannot cancel it
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/bookings/{}", booking_id)))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // The owner cancels; the slot opens up again
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/bookings/{}", booking_id)))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .post(fixture.url("/api/bookings"))
        .bearer_auth(&token_b)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
}

#[tokio::test]
async fn test_campaign_donations_accumulate() {
    let fixture = TestFixture::new().await;

    let (owner_token, _) = fixture.register("Olive", "olive@example.com").await;
    let shelter_id = fixture.create_shelter(&owner_token, "Happy Tails").await;
    let pet_id = fixture
        .create_pet(&owner_token, &shelter_id, "Rex", "dog")
        .await;

    let resp = fixture
        .client
        .post(fixture.url("/api/campaigns"))
        .bearer_auth(&owner_token)
        .json(&json!({
            "petId": pet_id,
            "title": "Surgery for Rex",
            "goalCents": 50000
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    let campaign_id = body["data"]["id"].as_str().unwrap().to_string();

    // Two public donations
    for (name, amount) in [("Jane", 1500), ("Tom", 2500)] {
        let resp = fixture
            .client
            .post(fixture.url(&format!("/api/campaigns/{}/donations", campaign_id)))
            .json(&json!({
                "name": name,
                "email": format!("{}@x.com", name.to_lowercase()),
                "amountCents": amount
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
    }

    // Raised total matches the participant list exactly
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/campaigns/{}", campaign_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["raisedCents"], 4000);
    let participants = body["data"]["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
    let sum: i64 = participants
        .iter()
        .map(|p| p["amountCents"].as_i64().unwrap())
        .sum();
    assert_eq!(sum, 4000);

    // Cancelled campaigns no longer accept donations
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/campaigns/{}", campaign_id)))
        .bearer_auth(&owner_token)
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/campaigns/{}/donations", campaign_id)))
        .json(&json!({
            "name": "Late",
            "email": "late@x.com",
            "amountCents": 100
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_validation_errors() {
    let fixture = TestFixture::new().await;

    // Short password
    let resp = fixture
        .client
        .post(fixture.url("/api/auth/register"))
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "short"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Adoption request without a phone number
    let resp = fixture
        .client
        .post(fixture.url("/api/adoption-requests"))
        .json(&json!({
            "petId": "whatever",
            "fullName": "Jane",
            "email": "j@x.com",
            "phone": ""
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Unknown status filter
    let resp = fixture
        .client
        .get(fixture.url("/api/pets?status=hibernating"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_not_found_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/pets/non-existent-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let resp = fixture
        .client
        .get(fixture.url("/api/shelters/non-existent-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
