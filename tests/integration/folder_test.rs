//! Integration tests for folder management.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_create_and_get_folder() {
    let app = TestApp::new();

    let created = app.create_folder("Reports", None).await;
    let uid = created["uid"].as_str().unwrap();
    assert_eq!(created["path"], format!("/{uid}"));
    assert!(created["parentId"].is_null());

    let fetched = app
        .request("GET", &format!("/upload/folders/{}", created["id"]), None)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Reports");
}

#[tokio::test]
async fn test_duplicate_sibling_name_conflicts() {
    let app = TestApp::new();
    let parent = app.create_folder("Media", None).await;
    let parent_id = parent["id"].as_i64().unwrap();

    app.create_folder("Uploads", None).await;
    // Same name under another parent is fine.
    app.create_folder("Uploads", Some(parent_id)).await;

    let response = app
        .request("POST", "/upload/folders", Some(json!({ "name": "Uploads" })))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_invalid_folder_requests() {
    let app = TestApp::new();

    let empty = app
        .request("POST", "/upload/folders", Some(json!({ "name": "" })))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let orphan = app
        .request(
            "POST",
            "/upload/folders",
            Some(json!({ "name": "Lost", "parent": 404 })),
        )
        .await;
    assert_eq!(orphan.status, StatusCode::NOT_FOUND);

    let bad_query = app.request("GET", "/upload/folders?parent=abc", None).await;
    assert_eq!(bad_query.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rename_and_move_rewrite_paths() {
    let app = TestApp::new();
    let a = app.create_folder("A", None).await;
    let b = app.create_folder("B", None).await;
    let child = app.create_folder("Child", a["id"].as_i64()).await;
    let grandchild = app.create_folder("Grandchild", child["id"].as_i64()).await;

    let moved = app
        .request(
            "PUT",
            &format!("/upload/folders/{}", child["id"]),
            Some(json!({ "name": "Moved", "parent": b["id"] })),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{}", moved.body);
    assert_eq!(moved.body["name"], "Moved");
    assert_eq!(
        moved.body["path"],
        format!(
            "{}/{}",
            b["path"].as_str().unwrap(),
            child["uid"].as_str().unwrap()
        )
    );

    let nested = app
        .request("GET", &format!("/upload/folders/{}", grandchild["id"]), None)
        .await;
    assert_eq!(
        nested.body["path"],
        format!(
            "{}/{}",
            moved.body["path"].as_str().unwrap(),
            grandchild["uid"].as_str().unwrap()
        )
    );

    let to_root = app
        .request(
            "PUT",
            &format!("/upload/folders/{}", child["id"]),
            Some(json!({ "parent": null })),
        )
        .await;
    assert_eq!(to_root.status, StatusCode::OK);
    assert!(to_root.body["parentId"].is_null());
}

#[tokio::test]
async fn test_move_into_own_subtree_is_rejected() {
    let app = TestApp::new();
    let a = app.create_folder("A", None).await;
    let child = app.create_folder("Child", a["id"].as_i64()).await;

    let response = app
        .request(
            "PUT",
            &format!("/upload/folders/{}", a["id"]),
            Some(json!({ "parent": child["id"] })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_by_scope() {
    let app = TestApp::new();
    let a = app.create_folder("A", None).await;
    app.create_folder("B", None).await;
    app.create_folder("Inner", a["id"].as_i64()).await;

    let all = app.request("GET", "/upload/folders", None).await;
    assert_eq!(all.body["results"].as_array().unwrap().len(), 3);

    let roots = app.request("GET", "/upload/folders?parent=root", None).await;
    assert_eq!(roots.body["results"].as_array().unwrap().len(), 2);

    let inner = app
        .request("GET", &format!("/upload/folders?parent={}", a["id"]), None)
        .await;
    let inner = inner.body["results"].as_array().unwrap().clone();
    assert_eq!(inner.len(), 1);
    assert_eq!(inner[0]["name"], "Inner");
}

#[tokio::test]
async fn test_bulk_delete_removes_subtree() {
    let app = TestApp::new();
    let a = app.create_folder("A", None).await;
    let inner = app.create_folder("Inner", a["id"].as_i64()).await;
    let b = app.create_folder("B", None).await;

    let response = app.delete_folders(&[a["id"].as_i64().unwrap()]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["deleted"], 2);

    let gone = app
        .request("GET", &format!("/upload/folders/{}", inner["id"]), None)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let kept = app
        .request("GET", &format!("/upload/folders/{}", b["id"]), None)
        .await;
    assert_eq!(kept.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
