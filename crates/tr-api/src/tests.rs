//! Router tests over the in-memory gateway

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use tr_auth::JwtService;
use tr_core::traits::Id;
use tr_db::{MemoryStore, Store};
use tr_models::{Role, User};

use crate::{router, AppState};

const SECRET: &[u8] = b"router-test-secret-0123456789abcdef";
const MANAGER: Id = 1;
const DEV1: Id = 2;
const DEV2: Id = 3;
const QA1: Id = 4;
const QA2: Id = 5;
const RETIRED: Id = 6;

struct TestApp {
    router: Router,
    jwt: JwtService,
}

impl TestApp {
    fn new() -> Self {
        let memory = MemoryStore::new();
        memory.add_user_with_roles(MANAGER, "manager", &[Role::Manager]);
        memory.add_user_with_roles(DEV1, "dev1", &[Role::Developer]);
        memory.add_user_with_roles(DEV2, "dev2", &[Role::Developer]);
        memory.add_user_with_roles(QA1, "qa1", &[Role::Qa]);
        memory.add_user_with_roles(QA2, "qa2", &[Role::Qa]);
        memory.add_user(User::new(RETIRED, "retired").inactive(), &[]);

        let state = AppState::new(Store::memory(&memory), JwtService::new(SECRET));
        Self {
            router: router().with_state(state),
            jwt: JwtService::new(SECRET),
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<Id>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user {
            let token = self.jwt.create_token(user_id, None).unwrap();
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn get(&self, uri: &str, user: Id) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(user), None).await
    }

    async fn post(&self, uri: &str, user: Id, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(user), Some(body)).await
    }

    async fn create_project(&self, name: &str) -> Id {
        let (status, body) = self
            .post("/api/v1/projects", MANAGER, json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["result"]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_requires_bearer_token() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::GET, "/api/v1/projects", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let request = Request::builder()
        .uri("/api/v1/projects")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_and_inactive_users_rejected() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/v1/projects", 99).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/v1/projects", RETIRED).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_project_permissions() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/v1/projects", DEV1, json!({ "name": "Nope" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["errorKind"], "permission_denied");

    let (status, body) = app
        .post("/api/v1/projects", MANAGER, json!({ "name": "" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["errors"]["name"].is_array());

    let (status, body) = app
        .post(
            "/api/v1/projects",
            MANAGER,
            json!({ "name": "Apollo", "description": "Moon shot" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["result"]["status"], "open");
    assert_eq!(body["result"]["createdById"], MANAGER);
}

#[tokio::test]
async fn test_pick_conflict() {
    let app = TestApp::new();
    let id = app.create_project("P1").await;
    let uri = format!("/api/v1/projects/{}/pick", id);

    let (status, body) = app.post(&uri, DEV1, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You have picked this project.");

    let (status, body) = app.post(&uri, DEV2, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "This project has already been picked.");

    let (_, body) = app.get(&format!("/api/v1/projects/{}", id), DEV2).await;
    assert_eq!(body["result"]["project"]["pickedById"], DEV1);
    assert_eq!(body["result"]["canEdit"], false);
}

#[tokio::test]
async fn test_project_status_flow() {
    let app = TestApp::new();
    let id = app.create_project("P1").await;
    app.post(&format!("/api/v1/projects/{}/pick", id), DEV1, json!({}))
        .await;
    let uri = format!("/api/v1/projects/{}/status", id);

    let (status, _) = app.post(&uri, DEV2, json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post(&uri, DEV1, json!({ "status": "archived" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["errors"]["status"].is_array());

    let (status, body) = app.post(&uri, DEV1, json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "completed");

    let (_, body) = app.get("/api/v1/projects/mine", DEV1).await;
    assert_eq!(body["result"][0]["id"], id);
    assert_eq!(body["result"][0]["openIssues"], 0);
}

#[tokio::test]
async fn test_qa_raise_and_resolve() {
    let app = TestApp::new();
    let id = app.create_project("P1").await;

    let (status, body) = app
        .post(&format!("/api/v1/qa/projects/{}/pick", id), QA1, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "in_progress");

    let (status, _) = app
        .post(&format!("/api/v1/qa/projects/{}/pick", id), QA2, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let raise = format!("/api/v1/projects/{}/raise-issue", id);
    let (status, _) = app
        .post(&raise, QA2, json!({ "title": "Crash", "description": "Boom" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(
            &raise,
            QA1,
            json!({ "title": "Crash", "description": "App crashes on load" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["result"]["reportedById"], QA1);
    let issue_id = body["result"]["id"].as_i64().unwrap();

    let (status, _) = app
        .post(
            &format!("/api/v1/issues/{}/status", issue_id),
            DEV1,
            json!({ "status": "resolved" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get(&format!("/api/v1/qa/projects/{}", id), QA2).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorKind"], "not_found");

    let (_, body) = app.get(&format!("/api/v1/qa/projects/{}", id), QA1).await;
    assert_eq!(body["result"]["issues"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_issue_assignee_and_queue() {
    let app = TestApp::new();
    let id = app.create_project("P1").await;
    let uri = format!("/api/v1/projects/{}/issues", id);

    let (status, body) = app
        .post(
            &uri,
            QA1,
            json!({ "title": "Crash", "description": "Boom", "assignedTo": MANAGER }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["errors"]["assigned_to"].is_array());

    let (status, body) = app
        .post(
            &uri,
            QA1,
            json!({ "title": "Crash", "description": "Boom", "priority": "critical", "assignedTo": DEV1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["result"]["priority"], "critical");
    let issue_id = body["result"]["id"].as_i64().unwrap();

    let (_, body) = app.get("/api/v1/issues/assigned", DEV1).await;
    assert_eq!(body["result"][0]["id"], issue_id);

    let (status, body) = app
        .post(
            &format!("/api/v1/issues/{}/status", issue_id),
            DEV1,
            json!({ "status": "resolved" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"], "resolved");

    let (_, body) = app.get("/api/v1/issues/assignees", QA1).await;
    let names: Vec<&str> = body["result"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["dev1", "dev2"]);
}

#[tokio::test]
async fn test_delete_project_cascades() {
    let app = TestApp::new();
    let id = app.create_project("P1").await;
    app.post(
        &format!("/api/v1/projects/{}/issues", id),
        MANAGER,
        json!({ "title": "Crash", "description": "Boom" }),
    )
    .await;

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/projects/{}", id), Some(DEV1), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/projects/{}", id), Some(MANAGER), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/v1/projects/{}/issues", id), MANAGER).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/v1/qa/dashboard", QA1).await;
    assert_eq!(body["result"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_me_reports_landing_page() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/v1/me", QA1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "qa1");
    assert_eq!(body["landing"], "qa_dashboard");
    assert_eq!(body["landingPath"], "/qa/dashboard");

    let (_, body) = app.get("/api/v1/me", DEV1).await;
    assert_eq!(body["landing"], "available_projects");
}

#[tokio::test]
async fn test_unreadable_request_answers_with_result_object() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/v1/issues/1/status", QA1, json!({ "state": "resolved" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["errorKind"], "invalid_argument");
    assert!(body["message"].as_str().unwrap().contains("status"));
    assert!(body["result"].is_null());

    let (status, body) = app.get("/api/v1/issues/abc", QA1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body.get("errorKind").is_none());

    let token = app.jwt.create_token(MANAGER, None).unwrap();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/projects")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}
