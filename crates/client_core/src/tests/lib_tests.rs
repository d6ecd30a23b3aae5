use super::*;
use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{
    domain::{AlumniId, FilterField},
    filters::FilterState,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct FakePortal {
    search_queries: Arc<Mutex<Vec<Option<String>>>>,
    contact_bodies: Arc<Mutex<Vec<ContactCandidateRequest>>>,
}

fn wire_candidates() -> Value {
    json!([
        {
            "alumni_id": 101,
            "full_name": "Jordan Lee",
            "email": "jordan.lee@alumni.example",
            "major": "Computer Science",
            "gpa": 3.8,
            "grad_year": 2018,
            "current_company": "Initech",
            "current_title": "Backend Engineer",
            "industry": "Technology",
            "years_since_grad": 6,
            "skills": ["rust", "sql"]
        },
        {
            "alumni_id": 102,
            "full_name": "Sam Patel",
            "email": "sam.patel@alumni.example",
            "major": "Computer Science",
            "gpa": null,
            "salary": 91000
        }
    ])
}

async fn handle_majors() -> Json<Value> {
    Json(json!(["Biology", "Computer Science", "Economics"]))
}

async fn handle_industries() -> Json<Value> {
    Json(json!(["Finance", "Technology"]))
}

async fn handle_search(
    State(state): State<FakePortal>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    state.search_queries.lock().await.push(query);
    Json(wire_candidates())
}

async fn handle_contact(
    State(state): State<FakePortal>,
    Json(body): Json<ContactCandidateRequest>,
) -> Json<Value> {
    state.contact_bodies.lock().await.push(body);
    Json(json!({ "status": "sent" }))
}

async fn handle_failure() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "database unavailable" })),
    )
}

async fn handle_garbage() -> &'static str {
    "<html>maintenance</html>"
}

async fn serve(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api")
}

async fn spawn_portal() -> (String, FakePortal) {
    let state = FakePortal::default();
    let app = Router::new()
        .route("/api/filters/majors", get(handle_majors))
        .route("/api/filters/industries", get(handle_industries))
        .route("/api/employers/search-candidates", get(handle_search))
        .route("/api/employers/contact-candidate", post(handle_contact))
        .with_state(state.clone());
    (serve(app).await, state)
}

async fn spawn_failing_portal() -> String {
    let app = Router::new()
        .route("/api/employers/search-candidates", get(handle_failure))
        .route("/api/filters/majors", get(handle_garbage));
    serve(app).await
}

fn backend(base_url: &str) -> HttpSearchBackend {
    HttpSearchBackend::new(base_url, Duration::from_secs(5)).expect("backend")
}

#[tokio::test]
async fn search_sends_only_constrained_parameters() {
    let (base_url, portal) = spawn_portal().await;
    let backend = backend(&base_url);

    let filters = FilterState::default()
        .with_raw(FilterField::Major, "Computer Science")
        .with_raw(FilterField::Industry, "all")
        .with_raw(FilterField::MinGpa, "3.5")
        .with_raw(FilterField::Keyword, "");
    backend
        .search_candidates(&filters.to_query())
        .await
        .expect("search");

    let queries = portal.search_queries.lock().await;
    assert_eq!(
        queries.as_slice(),
        &[Some("major=Computer+Science&min_gpa=3.5".to_string())]
    );
}

#[tokio::test]
async fn unfiltered_search_has_no_query_string() {
    let (base_url, portal) = spawn_portal().await;
    backend(&base_url)
        .search_candidates(&CandidateQuery::default())
        .await
        .expect("search");

    let queries = portal.search_queries.lock().await;
    assert_eq!(queries.len(), 1);
    assert!(queries[0].as_deref().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn configured_result_limit_is_appended() {
    let (base_url, portal) = spawn_portal().await;
    let backend = backend(&base_url).with_result_limit(Some(30));

    let filters = FilterState::default()
        .with_raw(FilterField::MinExperienceYears, "5")
        .with_raw(FilterField::Keyword, "python");
    backend
        .search_candidates(&filters.to_query())
        .await
        .expect("search");

    let queries = portal.search_queries.lock().await;
    assert_eq!(
        queries.as_slice(),
        &[Some("experience=5&skills=python&limit=30".to_string())]
    );
}

#[tokio::test]
async fn decodes_candidates_with_sparse_optional_fields() {
    let (base_url, _portal) = spawn_portal().await;
    let candidates = backend(&base_url)
        .search_candidates(&CandidateQuery::default())
        .await
        .expect("search");

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].alumni_id, AlumniId(101));
    assert_eq!(candidates[0].current_title.as_deref(), Some("Backend Engineer"));
    assert_eq!(candidates[0].years_since_grad, Some(6));
    assert_eq!(
        candidates[0].skills.as_deref(),
        Some(&["rust".to_string(), "sql".to_string()][..])
    );
    assert_eq!(candidates[1].gpa, None);
    assert_eq!(candidates[1].industry, None);
    assert_eq!(candidates[1].years_since_grad, None);
}

#[tokio::test]
async fn null_text_columns_do_not_fail_the_search() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let app = Router::new().route(
        "/api/employers/search-candidates",
        get(|| async {
            Json(json!([
                {
                    "alumni_id": 201,
                    "full_name": "Casey Wu",
                    "email": "casey.wu@alumni.example",
                    "major": "Mathematics"
                },
                {
                    "alumni_id": 202,
                    "full_name": "Drew Hale",
                    "email": null,
                    "major": null,
                    "industry": null
                }
            ]))
        }),
    );
    let base_url = serve(app).await;

    let candidates = backend(&base_url)
        .search_candidates(&CandidateQuery::default())
        .await
        .expect("search");

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].major, "Mathematics");
    assert_eq!(candidates[1].alumni_id, AlumniId(202));
    assert!(candidates[1].email.is_empty());
    assert!(candidates[1].major.is_empty());
    assert_eq!(candidates[1].industry, None);
}

#[tokio::test]
async fn lists_filter_catalogs() {
    let (base_url, _portal) = spawn_portal().await;
    let backend = backend(&format!("{base_url}/"));

    let majors = backend
        .list_filter_values(FilterCatalog::Majors)
        .await
        .expect("majors");
    let industries = backend
        .list_filter_values(FilterCatalog::Industries)
        .await
        .expect("industries");

    assert_eq!(majors, vec!["Biology", "Computer Science", "Economics"]);
    assert_eq!(industries, vec!["Finance", "Technology"]);
}

#[tokio::test]
async fn error_status_carries_server_detail() {
    let base_url = spawn_failing_portal().await;
    let err = backend(&base_url)
        .search_candidates(&CandidateQuery::default())
        .await
        .expect_err("should fail");

    assert_eq!(err.status(), Some(500));
    match err {
        BackendError::Status { detail, .. } => {
            assert_eq!(detail.as_deref(), Some("database unavailable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let base_url = spawn_failing_portal().await;
    let err = backend(&base_url)
        .list_filter_values(FilterCatalog::Majors)
        .await
        .expect_err("should fail");
    assert!(matches!(err, BackendError::Decode { .. }), "{err:?}");
}

#[tokio::test]
async fn missing_route_is_a_status_error() {
    let base_url = spawn_failing_portal().await;
    let err = backend(&base_url)
        .list_filter_values(FilterCatalog::Skills)
        .await
        .expect_err("should fail");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = backend(&format!("http://{addr}/api"))
        .search_candidates(&CandidateQuery::default())
        .await
        .expect_err("should fail");
    assert!(
        matches!(err, BackendError::Transport { .. } | BackendError::Timeout { .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn contact_posts_request_body() {
    let (base_url, portal) = spawn_portal().await;
    let request = ContactCandidateRequest {
        employer_email: "hr@acme.example".to_string(),
        employer_name: "Dana Ortiz".to_string(),
        company_name: "Acme Robotics".to_string(),
        candidate_id: AlumniId(101),
        candidate_email: "jordan.lee@alumni.example".to_string(),
        subject: "Job Opportunity at Acme Robotics".to_string(),
        message: "Dear Jordan Lee".to_string(),
        job_title: "Firmware Engineer".to_string(),
    };

    backend(&base_url)
        .contact_candidate(&request)
        .await
        .expect("contact");

    let bodies = portal.contact_bodies.lock().await;
    assert_eq!(bodies.as_slice(), &[request]);
}

#[test]
fn rejects_invalid_base_url() {
    assert!(matches!(
        HttpSearchBackend::new("ftp://files.example.edu", Duration::from_secs(1)),
        Err(BackendError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn normalizes_base_url_on_construction() {
    let backend = HttpSearchBackend::new("localhost:8001/api/", Duration::from_secs(1))
        .expect("backend");
    assert_eq!(backend.api_base_url(), "http://localhost:8001/api");
    assert_eq!(
        backend.endpoint(SEARCH_CANDIDATES_PATH),
        "http://localhost:8001/api/employers/search-candidates"
    );
}
