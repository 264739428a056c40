//! Integration tests for uploads landing in the default upload folder.

mod helpers;

use axum::http::StatusCode;
use mediavault_core::config::DefaultFolderLookup;

use helpers::{Multipart, TestApp};

fn folder_id(file: &serde_json::Value) -> i64 {
    file["folder"]["id"].as_i64().expect("file has a folder")
}

#[tokio::test]
async fn test_default_folder_lifecycle() {
    let app = TestApp::new();

    let a = app.upload_standalone("a.jpg").await;
    let a = a.first_file();
    let uid1 = a["folder"]["uid"].as_str().unwrap().to_string();
    assert_eq!(a["folder"]["name"], "Uploads");
    assert_eq!(a["folderPath"], format!("/{uid1}"));

    let response = app.delete_folders(&[folder_id(a)]).await;
    assert_eq!(response.status, StatusCode::OK);

    let b = app.upload_standalone("b.jpg").await;
    let b = b.first_file();
    let uid2 = b["folder"]["uid"].as_str().unwrap().to_string();
    assert_eq!(b["folder"]["name"], "Uploads");
    assert_ne!(uid2, uid1);

    app.delete_folders(&[folder_id(b)]).await;
    let manual = app.create_folder("Uploads", None).await;
    let uid3 = manual["uid"].as_str().unwrap().to_string();

    let c = app.upload_standalone("c.jpg").await;
    let c = c.first_file();
    let uid4 = c["folder"]["uid"].as_str().unwrap().to_string();
    assert_eq!(c["folder"]["name"], "Uploads (1)");
    assert_ne!(uid4, uid3);
    assert_eq!(c["folderPath"], format!("/{uid4}"));
}

#[tokio::test]
async fn test_disambiguation_is_monotonic() {
    let app = TestApp::new();

    app.create_folder("Uploads", None).await;
    let first = app.upload_standalone("1.jpg").await;
    assert_eq!(first.first_file()["folder"]["name"], "Uploads (1)");

    app.delete_folders(&[folder_id(first.first_file())]).await;
    app.create_folder("Uploads (1)", None).await;
    let second = app.upload_standalone("2.jpg").await;
    assert_eq!(second.first_file()["folder"]["name"], "Uploads (2)");

    app.delete_folders(&[folder_id(second.first_file())]).await;
    app.create_folder("Uploads (2)", None).await;
    let third = app.upload_standalone("3.jpg").await;
    assert_eq!(third.first_file()["folder"]["name"], "Uploads (3)");
}

#[tokio::test]
async fn test_attach_uses_same_default_folder() {
    let app = TestApp::new();

    let attached = app.upload_attached("dog.png", "1").await;
    let attached = attached.first_file();
    assert_eq!(attached["folder"]["name"], "Uploads");
    assert_eq!(attached["related"]["refType"], "api::dog.dog");
    assert_eq!(attached["related"]["field"], "pic");

    let plain = app.upload_standalone("cat.jpg").await;
    assert_eq!(folder_id(plain.first_file()), folder_id(attached));
    assert!(plain.first_file().get("related").is_none());
}

#[tokio::test]
async fn test_attach_after_delete_gets_new_folder() {
    let app = TestApp::new();

    let first = app.upload_attached("a.png", "1").await;
    let first = first.first_file().clone();
    app.delete_folders(&[folder_id(&first)]).await;

    let second = app.upload_attached("b.png", "2").await;
    let second = second.first_file();
    assert_eq!(second["folder"]["name"], "Uploads");
    assert_ne!(second["folder"]["uid"], first["folder"]["uid"]);
    assert_ne!(second["folderPath"], first["folderPath"]);

    let listed = app.request("GET", "/upload/folders?parent=root", None).await;
    assert_eq!(listed.body["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_files_outlive_their_folder() {
    let app = TestApp::new();

    let uploaded = app.upload_standalone("keep.jpg").await;
    let uploaded = uploaded.first_file().clone();
    app.delete_folders(&[folder_id(&uploaded)]).await;

    let file = app
        .request("GET", &format!("/upload/files/{}", uploaded["id"]), None)
        .await;
    assert_eq!(file.status, StatusCode::OK);
    assert!(file.body["folder"].is_null());
    assert_eq!(file.body["folderPath"], uploaded["folderPath"]);
}

#[tokio::test]
async fn test_by_name_lookup_reuses_manual_folder() {
    let app = TestApp::with_lookup(DefaultFolderLookup::ByName);

    let first = app.upload_standalone("a.jpg").await;
    app.delete_folders(&[folder_id(first.first_file())]).await;

    let manual = app.create_folder("Uploads", None).await;
    let next = app.upload_standalone("b.jpg").await;
    assert_eq!(next.first_file()["folder"]["uid"], manual["uid"]);
    assert_eq!(next.first_file()["folder"]["name"], "Uploads");
}

#[tokio::test]
async fn test_explicit_folder_skips_default() {
    let app = TestApp::new();
    let mine = app.create_folder("Mine", None).await;
    let id = mine["id"].as_i64().unwrap();

    let response = app
        .upload(
            Multipart::new()
                .file("x.txt", "text/plain", b"hello")
                .text("folder", &id.to_string()),
        )
        .await;
    assert_eq!(folder_id(response.first_file()), id);

    let listed = app.request("GET", "/upload/folders", None).await;
    assert_eq!(listed.body["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upload_errors() {
    let app = TestApp::new();

    let missing = app
        .upload(
            Multipart::new()
                .file("x.txt", "text/plain", b"hello")
                .text("folder", "999"),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let empty = app.upload(Multipart::new().text("refId", "1")).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let partial_ref = app
        .upload(
            Multipart::new()
                .file("x.txt", "text/plain", b"hello")
                .text("refId", "1"),
        )
        .await;
    assert_eq!(partial_ref.status, StatusCode::BAD_REQUEST);
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn test_multiple_files_in_one_request() {
    let app = TestApp::new();

    let response = app
        .upload(
            Multipart::new()
                .file("a.jpg", "image/jpeg", b"a")
                .file("b.jpg", "image/jpeg", b"bb"),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let files = response.body.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["name"], "a.jpg");
    assert_eq!(files[1]["size"], 2);
    assert_eq!(files[0]["folder"]["id"], files[1]["folder"]["id"]);
    assert_eq!(app.storage.len(), 2);
}

#[tokio::test]
async fn test_upload_responds_ok() {
    let app = TestApp::new();
    let response = app.upload_standalone("ok.jpg").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_attach_keeps_disambiguated_name_across_recreation() {
    let app = TestApp::new();

    // A manual "Uploads" pushes the default folder to "Uploads (1)".
    app.create_folder("Uploads", None).await;
    let first = app.upload_attached("1.png", "1").await;
    let first = first.first_file().clone();
    assert_eq!(first["folder"]["name"], "Uploads (1)");

    // The designated folder is reused, not the manual one.
    let again = app.upload_attached("2.png", "2").await;
    assert_eq!(again.first_file()["folder"]["uid"], first["folder"]["uid"]);

    // Deleting it frees "Uploads (1)" again.
    app.delete_folders(&[folder_id(&first)]).await;
    let recreated = app.upload_attached("3.png", "3").await;
    let recreated = recreated.first_file().clone();
    assert_eq!(recreated["folder"]["name"], "Uploads (1)");
    assert_ne!(recreated["folder"]["uid"], first["folder"]["uid"]);

    // Taking "Uploads (1)" by hand moves the next one to "Uploads (2)".
    app.delete_folders(&[folder_id(&recreated)]).await;
    app.create_folder("Uploads (1)", None).await;
    let next = app.upload_attached("4.png", "4").await;
    let next = next.first_file().clone();
    assert_eq!(next["folder"]["name"], "Uploads (2)");

    app.delete_folders(&[folder_id(&next)]).await;
    let last = app.upload_attached("5.png", "5").await;
    assert_eq!(last.first_file()["folder"]["name"], "Uploads (2)");
}
