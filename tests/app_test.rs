mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use cheatsheeter::api::{ApiError, SheetApi};
use cheatsheeter::app::router;
use cheatsheeter::controller::ViewController;
use cheatsheeter::model::{Cheatsheet, SheetData, SheetList};
use common::{FakeApi, git_basics};
use std::sync::Arc;
use tokio::sync::Notify;
use tower::ServiceExt;

/// Backend whose list call waits until the test lets it finish
struct GatedApi {
    inner: FakeApi,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

impl SheetApi for GatedApi {
    async fn list_all(&self) -> Result<SheetList, ApiError> {
        self.started.notify_one();
        self.release.notified().await;
        self.inner.list_all().await
    }

    async fn get(&self, name: &str) -> Result<Cheatsheet, ApiError> {
        self.inner.get(name).await
    }

    async fn create(&self, name: &str, data: &SheetData) -> Result<(), ApiError> {
        self.inner.create(name, data).await
    }

    async fn update(&self, name: &str, data: &SheetData) -> Result<(), ApiError> {
        self.inner.update(name, data).await
    }

    async fn delete(&self, name: &str) -> Result<(), ApiError> {
        self.inner.delete(name).await
    }
}

async fn app_with(sheets: &[cheatsheeter::model::Cheatsheet]) -> Router {
    let mut controller = ViewController::new(FakeApi::with_sheets(sheets));
    controller.show_list().await;
    router(controller)
}

async fn get_page(app: &Router, uri: &str) -> String {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn post(app: &Router, uri: &str, form: &str) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_health() {
    let app = app_with(&[]).await;
    assert_eq!(get_page(&app, "/health").await, "ok");
}

#[tokio::test]
async fn test_index_lists_cheatsheets() {
    let app = app_with(&[git_basics()]).await;

    let html = get_page(&app, "/").await;
    assert!(html.contains("Git Basics"));
    assert!(html.contains(r#"action="/sheets/git-basics/view""#));
}

#[tokio::test]
async fn test_search_query_hides_cards() {
    let app = app_with(&[git_basics()]).await;

    let html = get_page(&app, "/?q=docker").await;
    assert!(html.contains(r#"style="display: none""#));
    assert!(html.contains(r#"value="docker""#));
}

#[tokio::test]
async fn test_view_and_back() {
    let app = app_with(&[git_basics()]).await;

    post(&app, "/sheets/git-basics/view", "").await;
    let html = get_page(&app, "/").await;
    assert!(html.contains(r#"id="cheatsheet-title">Git Basics"#));
    assert!(html.contains("git init"));

    post(&app, "/list", "").await;
    let html = get_page(&app, "/").await;
    assert!(html.contains(r#"id="list-view""#));
}

#[tokio::test]
async fn test_create_through_form_posts() {
    let app = app_with(&[]).await;

    post(&app, "/create", "").await;
    let html = get_page(&app, "/").await;
    assert!(html.contains("Create Cheatsheet"));
    assert!(html.contains(r#"id="no-categories""#));

    post(
        &app,
        "/form",
        "name=new-sheet&title=New+Sheet&columns=2&action=add-category",
    )
    .await;
    let html = get_page(&app, "/").await;
    assert!(html.contains(r#"name="category-1-name""#));
    assert!(html.contains(r#"value="New Sheet""#));

    post(
        &app,
        "/form",
        "category-1-name=Basics&category-1-column=1&action=add-item-1",
    )
    .await;
    let html = get_page(&app, "/").await;
    assert!(html.contains("item-card"));

    post(&app, "/form", "unknown-input=1&action=save").await;
    let html = get_page(&app, "/").await;
    assert!(html.contains("Cheatsheet created successfully!"));
    assert!(html.contains("New Sheet"));
    assert!(html.contains(r#"data-name="new-sheet""#));
}

#[tokio::test]
async fn test_save_with_missing_title_warns() {
    let app = app_with(&[]).await;

    post(&app, "/create", "").await;
    post(&app, "/form", "name=nameless&title=&action=save").await;

    let html = get_page(&app, "/").await;
    assert!(html.contains("alert-warning"));
    assert!(html.contains("Please fill in all required fields."));
    assert!(html.contains("Create Cheatsheet"));
}

#[tokio::test]
async fn test_form_post_outside_edit_view_is_ignored() {
    let app = app_with(&[]).await;

    post(&app, "/form", "name=x&title=X&action=save").await;

    let html = get_page(&app, "/").await;
    assert!(html.contains(r#"id="empty-state""#));
    assert!(!html.contains(r#"role="alert""#));
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let app = app_with(&[git_basics()]).await;

    let html = get_page(&app, "/sheets/git-basics/delete").await;
    assert!(html.contains(
        "Are you sure you want to delete &quot;git-basics&quot;? This action cannot be undone."
    ));

    post(&app, "/sheets/git-basics/delete", "confirmed=no").await;
    let html = get_page(&app, "/").await;
    assert!(html.contains(r#"data-name="git-basics""#));

    post(&app, "/sheets/git-basics/delete", "confirmed=yes").await;
    let html = get_page(&app, "/").await;
    assert!(!html.contains(r#"data-name="git-basics""#));
    assert!(html.contains("Cheatsheet deleted successfully!"));
}

#[tokio::test]
async fn test_spinner_shown_while_call_in_flight() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let app = router(ViewController::new(GatedApi {
        inner: FakeApi::with_sheets(&[git_basics()]),
        started: Arc::clone(&started),
        release: Arc::clone(&release),
    }));

    let refresh = tokio::spawn({
        let app = app.clone();
        async move { post(&app, "/list", "").await }
    });
    started.notified().await;

    let html = get_page(&app, "/").await;
    assert!(html.contains(r#"id="loading-spinner""#));
    assert!(html.contains(r#"http-equiv="refresh""#));

    release.notify_one();
    refresh.await.unwrap();

    let html = get_page(&app, "/").await;
    assert!(!html.contains(r#"id="loading-spinner""#));
    assert!(html.contains(r#"data-name="git-basics""#));
}
