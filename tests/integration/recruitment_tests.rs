//! Job postings and candidates

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::test_utils::{TestApp, BACKENDS};

async fn post_job(app: &TestApp, cookie: &str, title: &str) -> Value {
    let response = app
        .post(
            "/api/jobs",
            json!({
                "jobTitle": title,
                "department": "Engineering",
                "experience": "3+ years",
                "salary": "50k-70k",
                "description": "Build things",
            }),
            Some(cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Job posted successfully");
    response.body["job"].clone()
}

#[tokio::test]
async fn test_jobs_are_public_to_read() {
    for backend in BACKENDS {
        let app = TestApp::new(backend);
        let cookie = app.signup("Ada", "ada@example.com", "password-123").await;
        post_job(&app, &cookie, "Backend Engineer").await;
        let newest = post_job(&app, &cookie, "Data Engineer").await;

        let jobs = app.get("/api/jobs", None).await;
        assert_eq!(jobs.status, StatusCode::OK);
        let titles: Vec<_> = jobs
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["job_title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Data Engineer", "Backend Engineer"]);

        let one = app.get(&format!("/api/jobs/{}", newest["id"]), None).await;
        assert_eq!(one.status, StatusCode::OK);
        assert_eq!(one.body["status"], "open");

        let missing = app.get("/api/jobs/424242", None).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.body["error"], "Job not found");
    }
}

#[tokio::test]
async fn test_job_writes_need_a_session() {
    let app = TestApp::new(BACKENDS[0]);
    let response = app
        .post("/api/jobs", json!({ "jobTitle": "X", "department": "Y" }), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.delete("/api/jobs/1", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_partial_job_update() {
    for backend in BACKENDS {
        let app = TestApp::new(backend);
        let cookie = app.signup("Ada", "ada@example.com", "password-123").await;
        let job = post_job(&app, &cookie, "Backend Engineer").await;
        let uri = format!("/api/jobs/{}", job["id"]);

        let closed = app.put(&uri, json!({ "status": "closed" }), Some(&cookie)).await;
        assert_eq!(closed.status, StatusCode::OK);
        assert_eq!(closed.body["status"], "closed");
        assert_eq!(closed.body["job_title"], "Backend Engineer");
        assert_eq!(closed.body["salary"], "50k-70k");
        assert_eq!(closed.body["posted_date"], job["posted_date"]);

        let renamed = app
            .put(&uri, json!({ "jobTitle": "Platform Engineer" }), Some(&cookie))
            .await;
        assert_eq!(renamed.body["job_title"], "Platform Engineer");
        assert_eq!(renamed.body["status"], "closed");

        let empty = app.put(&uri, json!({}), Some(&cookie)).await;
        assert_eq!(empty.status, StatusCode::BAD_REQUEST);
        assert_eq!(empty.body["error"], "No fields to update");

        let blank = app.put(&uri, json!({ "department": "  " }), Some(&cookie)).await;
        assert_eq!(blank.status, StatusCode::BAD_REQUEST);

        // Optional text is trimmed and a blank value clears it
        let tidied = app
            .put(
                &uri,
                json!({ "experience": "  5+ years ", "salary": "   " }),
                Some(&cookie),
            )
            .await;
        assert_eq!(tidied.status, StatusCode::OK);
        assert_eq!(tidied.body["experience"], "5+ years");
        assert!(tidied.body["salary"].is_null());
        assert_eq!(tidied.body["description"], "Build things");

        let missing = app
            .put("/api/jobs/424242", json!({ "status": "closed" }), Some(&cookie))
            .await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_job_validation() {
    for backend in BACKENDS {
        let app = TestApp::new(backend);
        let cookie = app.signup("Ada", "ada@example.com", "password-123").await;

        let response = app
            .post("/api/jobs", json!({ "jobTitle": "Backend Engineer" }), Some(&cookie))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "Job title and department are required");
    }
}

#[tokio::test]
async fn test_job_delete_policy() {
    for backend in BACKENDS {
        let app = TestApp::new(backend);
        let cookie = app.signup("Ada", "ada@example.com", "password-123").await;
        let vacant = post_job(&app, &cookie, "Backend Engineer").await;
        let wanted = post_job(&app, &cookie, "Data Engineer").await;

        let applied = app
            .post(
                "/api/candidates",
                json!({ "jobId": wanted["id"], "name": "Bob", "email": "bob@example.com" }),
                Some(&cookie),
            )
            .await;
        assert_eq!(applied.status, StatusCode::CREATED);

        let refused = app.delete(&format!("/api/jobs/{}", wanted["id"]), Some(&cookie)).await;
        assert_eq!(refused.status, StatusCode::BAD_REQUEST);
        assert_eq!(refused.body["code"], "CONFLICT_001");
        assert_eq!(
            app.get(&format!("/api/jobs/{}", wanted["id"]), None).await.status,
            StatusCode::OK
        );

        let deleted = app.delete(&format!("/api/jobs/{}", vacant["id"]), Some(&cookie)).await;
        assert_eq!(deleted.status, StatusCode::OK);
        assert_eq!(deleted.body["message"], "Job deleted successfully");
        assert_eq!(
            app.get(&format!("/api/jobs/{}", vacant["id"]), None).await.status,
            StatusCode::NOT_FOUND
        );

        let again = app.delete(&format!("/api/jobs/{}", vacant["id"]), Some(&cookie)).await;
        assert_eq!(again.status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_job_delete_racing_an_application_leaves_no_orphan() {
    for backend in BACKENDS {
        let app = Arc::new(TestApp::new(backend));
        let cookie = app.signup("Ada", "ada@example.com", "password-123").await;

        for round in 0..10 {
            let job = post_job(&app, &cookie, &format!("Role {round}")).await;
            let job_id = job["id"].as_i64().unwrap();

            let apply = {
                let app = app.clone();
                let cookie = cookie.clone();
                tokio::spawn(async move {
                    app.post(
                        "/api/candidates",
                        json!({ "jobId": job_id, "name": "Bob", "email": "bob@example.com" }),
                        Some(&cookie),
                    )
                    .await
                    .status
                })
            };
            let remove = {
                let app = app.clone();
                let cookie = cookie.clone();
                tokio::spawn(async move {
                    app.delete(&format!("/api/jobs/{job_id}"), Some(&cookie))
                        .await
                        .status
                })
            };
            let (applied, removed) = (apply.await.unwrap(), remove.await.unwrap());

            // Exactly one of the two wins
            let applied_first = applied == StatusCode::CREATED && removed == StatusCode::BAD_REQUEST;
            let deleted_first = applied == StatusCode::NOT_FOUND && removed == StatusCode::OK;
            assert!(
                applied_first || deleted_first,
                "round {round}: unexpected outcome {applied} / {removed}"
            );
        }

        let candidates = app.get("/api/candidates", None).await;
        for candidate in candidates.body.as_array().unwrap() {
            assert!(candidate["job_title"].is_string(), "orphaned candidate {candidate}");
        }
    }
}

#[tokio::test]
async fn test_candidate_pipeline() {
    for backend in BACKENDS {
        let app = TestApp::new(backend);
        let cookie = app.signup("Ada", "ada@example.com", "password-123").await;
        let job = post_job(&app, &cookie, "Backend Engineer").await;

        let applied = app
            .post(
                "/api/candidates",
                json!({
                    "jobId": job["id"],
                    "name": "Bob",
                    "email": "bob@example.com",
                    "resumeUrl": "https://example.com/bob.pdf",
                }),
                Some(&cookie),
            )
            .await;
        assert_eq!(applied.status, StatusCode::CREATED);
        assert_eq!(applied.body["status"], "pending");
        let id = applied.body["id"].as_i64().unwrap();

        let open_application = app
            .post(
                "/api/candidates",
                json!({ "name": "Carol", "email": "carol@example.com" }),
                Some(&cookie),
            )
            .await;
        assert_eq!(open_application.status, StatusCode::CREATED);

        let listed = app.get("/api/candidates", None).await;
        assert_eq!(listed.status, StatusCode::OK);
        let listed = listed.body.as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["name"], "Carol");
        assert!(listed[0]["job_title"].is_null());
        assert_eq!(listed[1]["job_title"], "Backend Engineer");

        let moved = app
            .put(
                &format!("/api/candidates/{id}"),
                json!({ "status": "shortlisted" }),
                Some(&cookie),
            )
            .await;
        assert_eq!(moved.status, StatusCode::OK);
        assert_eq!(moved.body["status"], "shortlisted");

        let fetched = app.get(&format!("/api/candidates/{id}"), None).await;
        assert_eq!(fetched.body["status"], "shortlisted");
        assert_eq!(fetched.body["resume_url"], "https://example.com/bob.pdf");

        let missing = app.get("/api/candidates/424242", None).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.body["error"], "Candidate not found");
    }
}

#[tokio::test]
async fn test_candidate_validation() {
    for backend in BACKENDS {
        let app = TestApp::new(backend);
        let cookie = app.signup("Ada", "ada@example.com", "password-123").await;

        let missing = app
            .post("/api/candidates", json!({ "name": "Bob" }), Some(&cookie))
            .await;
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);
        assert_eq!(missing.body["error"], "Name and email are required");

        let bad_email = app
            .post(
                "/api/candidates",
                json!({ "name": "Bob", "email": "bob(at)example.com" }),
                Some(&cookie),
            )
            .await;
        assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

        let unknown_job = app
            .post(
                "/api/candidates",
                json!({ "jobId": 424242, "name": "Bob", "email": "bob@example.com" }),
                Some(&cookie),
            )
            .await;
        assert_eq!(unknown_job.status, StatusCode::NOT_FOUND);

        let no_status = app
            .put("/api/candidates/1", json!({}), Some(&cookie))
            .await;
        assert_eq!(no_status.status, StatusCode::BAD_REQUEST);
    }
}
