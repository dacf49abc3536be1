use job_matcher::auth::{AuthConfig, Claims};
use job_matcher::core::Database;
use job_matcher::extraction::FallbackExtractor;
use job_matcher::{build_rocket, Ranker, SkillEngine, Vocabulary};
use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use rocket::http::{ContentType, Cookie, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

const SECRET: &str = "api-test-secret";

struct TestApp {
    client: Client,
    db: Database,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        std::fs::remove_file(&self.db_path).ok();
    }
}

async fn app(limit: usize) -> TestApp {
    let db_path = std::env::temp_dir().join(format!("jobmatch_api_{}.db", uuid::Uuid::new_v4()));
    let db = Database::new(&db_path).await.unwrap();
    let extractor = Arc::new(FallbackExtractor::new(Arc::new(Vocabulary::default())));
    let engine = SkillEngine::new(extractor, Ranker::new(limit));

    let rocket = build_rocket(engine, db.clone(), AuthConfig::new(SECRET));
    let client = Client::tracked(rocket).await.unwrap();
    TestApp { client, db, db_path }
}

fn token(user_id: &str) -> String {
    let claims = Claims {
        user_id: user_id.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &JwtHeader::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn bearer(user_id: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {}", token(user_id)))
}

async fn post_json(app: &TestApp, path: &str, user: Option<&str>, body: Value) -> (Status, Value) {
    let mut request = app
        .client
        .post(path)
        .header(ContentType::JSON)
        .body(body.to_string());
    if let Some(user) = user {
        request = request.header(bearer(user));
    }
    let response = request.dispatch().await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
}

async fn get_json(app: &TestApp, path: &str, user: Option<&str>) -> (Status, Value) {
    let mut request = app.client.get(path);
    if let Some(user) = user {
        request = request.header(bearer(user));
    }
    let response = request.dispatch().await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
}

fn job_body(title: &str, requirements: Value, description: &str) -> Value {
    json!({
        "title": title,
        "description": description,
        "requirements": requirements,
        "salary": 5000,
        "location": "Remote",
        "job_type": "Full Time",
        "experience": 2,
        "positions": 1
    })
}

#[rocket::async_test]
async fn test_health_is_public() {
    let app = app(10).await;
    let (status, body) = get_json(&app, "/api/health", None).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["message"], "OK");
    assert_eq!(body["type"], "text");
}

#[rocket::async_test]
async fn test_health_reports_unavailable_database() {
    let app = app(10).await;
    app.db.close().await;

    let (status, body) = get_json(&app, "/api/health", None).await;
    assert_eq!(status, Status::ServiceUnavailable);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "DATABASE_UNAVAILABLE");
}

#[rocket::async_test]
async fn test_score_endpoint_normalizes_both_lists() {
    let app = app(10).await;
    let (status, body) = post_json(
        &app,
        "/api/skills/score",
        None,
        json!({ "reference": "JavaScript, React", "candidate": [" react ", "Vue.js", "react"] }),
    )
    .await;

    assert_eq!(status, Status::Ok);
    let data = &body["data"];
    assert_eq!(data["intersection"], 1);
    assert_eq!(data["union"], 3);
    let score = data["match_score"].as_f64().unwrap();
    assert!((score - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(data["candidate"], json!(["react", "vue.js"]));
}

#[rocket::async_test]
async fn test_extract_requires_auth_and_text() {
    let app = app(10).await;

    let (status, body) = post_json(&app, "/api/skills/extract", None, json!({ "text": "Python" })).await;
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["error_code"], "UNAUTHORIZED");
    assert_eq!(body["error"], "Authorization token required");

    let (status, body) = post_json(&app, "/api/skills/extract", Some("u1"), json!({ "text": "   " })).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error_code"], "TEXT_REQUIRED");

    let (status, body) = post_json(
        &app,
        "/api/skills/extract",
        Some("u1"),
        json!({ "text": "I know Python and cooking, also Python", "conversation_id": "c-1" }),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["skills"], json!(["Python"]));
    assert_eq!(body["data"]["strategy"], "fallback");
    assert_eq!(body["conversation_id"], "c-1");
}

#[rocket::async_test]
async fn test_token_cookie_is_accepted() {
    let app = app(10).await;
    let response = app
        .client
        .get("/api/profile")
        .cookie(Cookie::new("token", token("cookie-user")))
        .dispatch()
        .await;

    // authenticated, but no profile yet
    assert_eq!(response.status(), Status::NotFound);
    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["error_code"], "PROFILE_NOT_FOUND");
}

#[rocket::async_test]
async fn test_invalid_token_is_rejected() {
    let app = app(10).await;
    let response = app
        .client
        .get("/api/profile")
        .header(Header::new("Authorization", "Bearer not-a-token"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["error"], "Token verification failed");

    let response = app
        .client
        .get("/api/profile")
        .header(Header::new("Authorization", "Token abc"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["error"], "Invalid authorization token format");
}

#[rocket::async_test]
async fn test_my_jobs_lists_only_the_callers_postings() {
    let app = app(10).await;

    for (user, title) in [
        ("alice", "Rust Engineer"),
        ("bob", "PHP Developer"),
        ("alice", "Data Engineer"),
    ] {
        let (status, _) = post_json(
            &app,
            "/api/jobs",
            Some(user),
            job_body(title, json!("SQL"), "Details follow in the interview."),
        )
        .await;
        assert_eq!(status, Status::Created);
    }

    let (status, body) = get_json(&app, "/api/jobs/mine", Some("alice")).await;
    assert_eq!(status, Status::Ok);
    let jobs = body["data"].as_array().unwrap();
    let titles: Vec<_> = jobs.iter().map(|j| j["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Data Engineer", "Rust Engineer"]);
    assert!(jobs.iter().all(|j| j["created_by"] == "alice"));

    let (_, body) = get_json(&app, "/api/jobs/mine", Some("carol")).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = get_json(&app, "/api/jobs/mine", None).await;
    assert_eq!(status, Status::Unauthorized);
}

#[rocket::async_test]
async fn test_create_job_validates_and_extracts() {
    let app = app(10).await;

    let (status, body) = post_json(
        &app,
        "/api/jobs",
        Some("recruiter"),
        job_body("Go", json!("Go"), "Services in Go and Kafka."),
    )
    .await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Title must be at least 3 characters long");

    let mut invalid_type = job_body("Platform Engineer", json!("Kubernetes"), "Run Docker on AWS.");
    invalid_type["job_type"] = json!("Freelance");
    let (status, _) = post_json(&app, "/api/jobs", Some("recruiter"), invalid_type).await;
    assert_eq!(status, Status::BadRequest);

    let (status, body) = post_json(
        &app,
        "/api/jobs",
        Some("recruiter"),
        job_body("Platform Engineer", json!("Kubernetes, Terraform"), "We run Docker on AWS daily."),
    )
    .await;
    assert_eq!(status, Status::Created);
    let job = &body["data"];
    assert_eq!(job["requirements"], json!(["Kubernetes", "Terraform"]));
    assert_eq!(job["ai_extracted_skills"], json!(["Docker", "AWS"]));
    assert_eq!(job["created_by"], "recruiter");
    assert_eq!(job["job_type"], "Full Time");

    let (status, _) = post_json(
        &app,
        "/api/jobs",
        None,
        job_body("Platform Engineer", json!("Kubernetes"), "We run Docker on AWS daily."),
    )
    .await;
    assert_eq!(status, Status::Unauthorized);
}

#[rocket::async_test]
async fn test_job_detail_scores_only_for_signed_in_users() {
    let app = app(10).await;

    let (_, body) = post_json(
        &app,
        "/api/jobs",
        Some("recruiter"),
        job_body("Web Developer", json!("JavaScript, React, Node.js"), "Frontend and backend work."),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = post_json(
        &app,
        "/api/profile",
        Some("dev"),
        json!({ "full_name": "Dev", "skills": ["javascript", "react", "redux"] }),
    )
    .await;
    assert_eq!(status, Status::Ok);

    let (status, body) = get_json(&app, &format!("/api/jobs/{}", id), None).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["job"]["title"], "Web Developer");
    assert!(body["data"]["match_score"].is_null());

    let (_, body) = get_json(&app, &format!("/api/jobs/{}", id), Some("dev")).await;
    assert_eq!(body["data"]["match_score"].as_f64(), Some(50.0));

    // signed in without a profile
    let (_, body) = get_json(&app, &format!("/api/jobs/{}", id), Some("stranger")).await;
    assert_eq!(body["data"]["match_score"].as_f64(), Some(0.0));

    let (status, body) = get_json(&app, "/api/jobs/does-not-exist", None).await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["error_code"], "JOB_NOT_FOUND");
}

#[rocket::async_test]
async fn test_recommendations_rank_and_truncate() {
    let app = app(2).await;

    for (title, requirements) in [
        ("Data Engineer", "Python, SQL, Spark"),
        ("PHP Developer", "PHP, Laravel"),
        ("ML Engineer", "Python, PyTorch"),
    ] {
        let (status, _) = post_json(
            &app,
            "/api/jobs",
            Some("recruiter"),
            job_body(title, json!(requirements), "Details follow in the interview."),
        )
        .await;
        assert_eq!(status, Status::Created);
    }

    let (status, body) = get_json(&app, "/api/jobs/recommendations", Some("ana")).await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["error_code"], "PROFILE_NOT_FOUND");

    post_json(&app, "/api/profile", Some("ana"), json!({ "skills": "python, pytorch" })).await;

    let (status, body) = get_json(&app, "/api/jobs/recommendations", Some("ana")).await;
    assert_eq!(status, Status::Ok);
    let ranked = body["data"].as_array().unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0]["title"], "ML Engineer");
    assert_eq!(ranked[0]["match_score"], 100);
    assert_eq!(ranked[1]["title"], "Data Engineer");
    assert_eq!(ranked[1]["match_score"], 25);

    // the listing ranks for signed-in users with skills
    let (_, body) = get_json(&app, "/api/jobs", Some("ana")).await;
    assert_eq!(body["data"]["ranked"], true);
    assert_eq!(body["data"]["jobs"].as_array().unwrap().len(), 2);

    // and lists everything, unscored, for anonymous callers
    let (_, body) = get_json(&app, "/api/jobs", None).await;
    assert_eq!(body["data"]["ranked"], false);
    let jobs = body["data"]["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 3);
    assert!(jobs.iter().all(|j| j.get("match_score").is_none()));

    let (_, body) = get_json(&app, "/api/jobs?keyword=engineer", None).await;
    assert_eq!(body["data"]["jobs"].as_array().unwrap().len(), 2);
}

#[rocket::async_test]
async fn test_candidates_ranked_for_a_job() {
    let app = app(10).await;

    let (_, body) = post_json(
        &app,
        "/api/jobs",
        Some("recruiter"),
        job_body("Backend Developer", json!(["Node.js", "MongoDB"]), "APIs and data stores."),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    post_json(&app, "/api/profile", Some("designer"), json!({ "skills": ["Figma"] })).await;
    post_json(&app, "/api/profile", Some("dev"), json!({ "bio": "Shipping Node.js and MongoDB apps" })).await;

    let (status, body) = get_json(&app, &format!("/api/jobs/{}/candidates", id), Some("recruiter")).await;
    assert_eq!(status, Status::Ok);
    let ranked = body["data"].as_array().unwrap();
    assert_eq!(ranked[0]["user_id"], "dev");
    assert_eq!(ranked[0]["match_score"], 100);
    assert_eq!(ranked[1]["user_id"], "designer");
    assert_eq!(ranked[1]["match_score"], 0);

    let (status, _) = get_json(&app, &format!("/api/jobs/{}/candidates", id), None).await;
    assert_eq!(status, Status::Unauthorized);
}

#[rocket::async_test]
async fn test_profile_update_keeps_previous_extraction() {
    let app = app(10).await;

    let (_, body) = post_json(
        &app,
        "/api/profile",
        Some("u1"),
        json!({ "bio": "Writing Rust and Go", "skills": "Rust" }),
    )
    .await;
    assert_eq!(body["data"]["ai_extracted_skills"], json!(["Rust", "Go"]));

    let (_, body) = post_json(&app, "/api/profile", Some("u1"), json!({ "bio": "I like long walks" })).await;
    assert_eq!(body["data"]["bio"], "I like long walks");
    assert_eq!(body["data"]["ai_extracted_skills"], json!(["Rust", "Go"]));
    assert_eq!(body["data"]["skills"], json!(["Rust"]));

    let (status, body) = get_json(&app, "/api/profile", Some("u1")).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["user_id"], "u1");
    assert_eq!(body["data"]["bio"], "I like long walks");
}
