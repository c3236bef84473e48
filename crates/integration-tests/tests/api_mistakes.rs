use axum::http::{Method, StatusCode};
use integration_tests::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_create_then_fetch_round_trip() {
    let app = TestApp::new();
    let created = app
        .add(json!({
            "topic": "  Calculus ",
            "mistake_type": "Calculation",
            "why_happened": "forgot chain rule ",
            "how_to_avoid": " write every step",
            "question_image": "img/q7.png"
        }))
        .await;

    assert_eq!(created["topic"], "Calculus");
    assert_eq!(created["why_happened"], "forgot chain rule");
    assert_eq!(created["how_to_avoid"], "write every step");
    assert_eq!(created["question_image"], "img/q7.png");
    assert_eq!(created["date_added"], created["date_modified"]);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = app.send(Method::GET, &format!("/api/mistakes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (_, again) = app.send(Method::GET, &format!("/api/mistakes/{id}"), None).await;
    assert_eq!(again, fetched);
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let app = TestApp::new();
    let created = app.add(json!({ "topic": "Optics" })).await;
    assert_eq!(created["mistake_type"], "Conceptual");
    assert_eq!(created["question_image"], "");
    assert_eq!(created["why_happened"], "");
    assert_eq!(created.as_object().unwrap().len(), 8);
}

#[tokio::test]
async fn test_create_accepts_unknown_type() {
    let app = TestApp::new();
    let created = app.add(json!({ "mistake_type": "Guessing" })).await;
    assert_eq!(created["mistake_type"], "Guessing");
}

#[tokio::test]
async fn test_create_rejects_missing_body() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::POST, "/api/mistakes", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No data provided" }));

    let (status, _) = app.send(Method::POST, "/api/mistakes", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!app.data_file().exists());
}

#[tokio::test]
async fn test_get_unknown_is_404() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/mistakes/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Mistake not found" }));
}

#[tokio::test]
async fn test_list_filters_case_insensitively() {
    let app = TestApp::new();
    app.add(json!({ "topic": "Calculus", "mistake_type": "Calculation" })).await;
    app.add(json!({ "topic": "Physics", "mistake_type": "Conceptual" })).await;

    let (status, listed) = app.send(Method::GET, "/api/mistakes?topic=calculus", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["topic"], "Calculus");

    let (_, listed) = app
        .send(Method::GET, "/api/mistakes?topic=calculus&mistake_type=Conceptual", None)
        .await;
    assert!(listed.as_array().unwrap().is_empty());

    let (_, listed) = app
        .send(Method::GET, "/api/mistakes?topic=&mistake_type=", None)
        .await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_filters_by_type_alone() {
    let app = TestApp::new();
    app.add(json!({ "topic": "Calculus", "mistake_type": "Calculation" })).await;
    let kept = app.add(json!({ "topic": "Physics", "mistake_type": "Conceptual" })).await;

    let (status, listed) = app
        .send(Method::GET, "/api/mistakes?mistake_type=Conceptual", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], kept["id"]);

    let (_, listed) = app
        .send(Method::GET, "/api/mistakes?mistake_type=conceptual", None)
        .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = TestApp::new();
    for topic in ["first", "second", "third"] {
        app.add(json!({ "topic": topic })).await;
    }
    let (_, listed) = app.send(Method::GET, "/api/mistakes", None).await;
    let dates: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["date_added"].as_str().unwrap())
        .collect();
    assert_eq!(dates.len(), 3);
    for pair in dates.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn test_update_is_partial() {
    let app = TestApp::new();
    let created = app
        .add(json!({
            "topic": "Calculus",
            "mistake_type": "Calculation",
            "why_happened": "rushed",
            "how_to_avoid": "check",
            "question_image": "q.png"
        }))
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/api/mistakes/{id}"),
            Some(json!({ "how_to_avoid": "Slow down" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["how_to_avoid"], "Slow down");
    for field in ["id", "topic", "mistake_type", "why_happened", "question_image", "date_added"] {
        assert_eq!(updated[field], created[field], "{field} changed");
    }
    assert!(updated["date_modified"].as_str().unwrap() >= created["date_modified"].as_str().unwrap());

    let (_, fetched) = app.send(Method::GET, &format!("/api/mistakes/{id}"), None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_unknown_is_404() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::PUT, "/api/mistakes/nope", Some(json!({ "topic": "x" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Mistake not found");
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let app = TestApp::new();
    let created = app.add(json!({ "topic": "Optics" })).await;
    let uri = format!("/api/mistakes/{}", created["id"].as_str().unwrap());

    let (status, body) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_topics_sorted_and_unique() {
    let app = TestApp::new();
    for topic in ["Physics", "", "Algebra", "Physics"] {
        app.add(json!({ "topic": topic })).await;
    }
    let (status, topics) = app.send(Method::GET, "/api/topics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(topics, json!(["Algebra", "Physics"]));
}

#[tokio::test]
async fn test_mistake_types() {
    let app = TestApp::new();
    let (status, types) = app.send(Method::GET, "/api/mistake-types", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        types,
        json!([
            "Conceptual",
            "Silly/Careless",
            "Calculation",
            "Time Pressure",
            "Misread Question",
            "Memory/Formula"
        ])
    );
}

#[tokio::test]
async fn test_corrupt_document_lists_empty() {
    let app = TestApp::new();
    std::fs::write(app.data_file(), "[{ broken").unwrap();

    let (status, listed) = app.send(Method::GET, "/api/mistakes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    // The next write replaces the corrupt document with a valid one
    app.add(json!({ "topic": "Recovered" })).await;
    let (_, listed) = app.send(Method::GET, "/api/mistakes", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_null_field_record_survives_next_write() {
    let app = TestApp::new();
    std::fs::write(
        app.data_file(),
        r#"[{"id": "old-1", "topic": "Optics", "question_image": null, "mistake_type": null,
             "why_happened": "", "how_to_avoid": "", "date_added": "2024-01-01T00:00:00.000000",
             "date_modified": "2024-01-01T00:00:00.000000"}]"#,
    )
    .unwrap();

    app.add(json!({ "topic": "Calculus" })).await;

    let (status, old) = app.send(Method::GET, "/api/mistakes/old-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(old["topic"], "Optics");
    assert_eq!(old["question_image"], "");
    assert_eq!(old["mistake_type"], "Conceptual");

    let (_, listed) = app.send(Method::GET, "/api/mistakes", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

fn data_uri_image(bytes: usize) -> String {
    format!("data:image/png;base64,{}", "A".repeat(bytes))
}

#[tokio::test]
async fn test_multi_mib_pasted_image_is_accepted() {
    let app = TestApp::new();
    let image = data_uri_image(3 * 1024 * 1024);

    let created = app
        .add(json!({ "topic": "Optics", "question_image": image }))
        .await;
    assert_eq!(created["question_image"].as_str().unwrap().len(), image.len());

    let uri = format!("/api/mistakes/{}", created["id"].as_str().unwrap());
    let bigger = data_uri_image(4 * 1024 * 1024);
    let (status, updated) = app
        .send(Method::PUT, &uri, Some(json!({ "question_image": bigger })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["question_image"].as_str().unwrap().len(), bigger.len());
}

#[tokio::test]
async fn test_configured_body_limit_is_json_413() {
    let app = TestApp::with_body_limit(1024);
    let (status, body) = app
        .send(
            Method::POST,
            "/api/mistakes",
            Some(json!({ "topic": "Optics", "question_image": data_uri_image(4096) })),
        )
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "error": "Request body too large" }));
    assert!(!app.data_file().exists());

    // Small bodies still go through
    app.add(json!({ "topic": "Optics" })).await;
}
