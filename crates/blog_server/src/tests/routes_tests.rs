use super::*;
use axum::{
    body::{self, Body},
    http::{header, Request},
};
use blog_api::ApiContext;
use shared::domain::{NewPost, PostId};
use storage::Storage;
use tower::ServiceExt;

async fn test_app() -> (Router, Storage) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let state = AppState {
        api: ApiContext {
            storage: storage.clone(),
        },
    };
    (build_router(Arc::new(state)), storage)
}

async fn body_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

fn form_request(uri: &str, form: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request")
}

fn assert_redirects_home(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );
}

async fn seed(storage: &Storage, title: &str) -> PostId {
    storage
        .create_post(&NewPost {
            title: title.to_string(),
            content: format!("{title} body"),
        })
        .await
        .expect("seed post")
}

#[tokio::test]
async fn static_pages_render() {
    let (app, _storage) = test_app().await;
    for (uri, marker) in [("/about", "<h1>About</h1>"), ("/new", r#"action="/new""#)] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_text(response).await.contains(marker), "{uri}");
    }
}

#[tokio::test]
async fn valid_submission_redirects_and_appears_first() {
    let (app, storage) = test_app().await;
    seed(&storage, "older").await;

    let response = app
        .clone()
        .oneshot(form_request("/new", "title=Fresh+post&content=Hello%20there"))
        .await
        .expect("response");
    assert_redirects_home(&response);

    let posts = storage.list_posts().await.expect("list");
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "Fresh post");
    assert_eq!(posts[0].content, "Hello there");

    let index = app
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(index.status(), StatusCode::OK);
    let html = body_text(index).await;
    let fresh = html.find("Fresh post").expect("fresh listed");
    let older = html.find("older").expect("older listed");
    assert!(fresh < older, "newest post should render first");
}

#[tokio::test]
async fn empty_fields_rerender_the_form_without_creating() {
    let (app, storage) = test_app().await;

    for form in ["title=&content=body", "title=t&content=", "content=only"] {
        let response = app
            .clone()
            .oneshot(form_request("/new", form))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{form}");
        assert!(response.headers().get(header::LOCATION).is_none());
        assert!(body_text(response).await.contains(r#"action="/new""#));
    }

    assert_eq!(storage.count_posts().await.expect("count"), 0);
}

#[tokio::test]
async fn submission_without_form_content_type_rerenders_the_form() {
    let (app, storage) = test_app().await;

    let requests = [
        Request::post("/new").body(Body::empty()).expect("request"),
        Request::post("/new")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title":"t","content":"c"}"#))
            .expect("request"),
    ];
    for request in requests {
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(r#"action="/new""#));
    }

    assert_eq!(storage.count_posts().await.expect("count"), 0);
}

#[tokio::test]
async fn oversized_submission_is_rejected() {
    let (app, storage) = test_app().await;
    let form = format!("title=big&content={}", "a".repeat(MAX_FORM_BYTES));

    let response = app
        .oneshot(form_request("/new", &form))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(storage.count_posts().await.expect("count"), 0);
}

#[tokio::test]
async fn delete_removes_exactly_one_post() {
    let (app, storage) = test_app().await;
    let keep = seed(&storage, "keep").await;
    let doomed = seed(&storage, "doomed").await;

    let response = app
        .oneshot(
            Request::post(format!("/delete/{doomed}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_redirects_home(&response);

    let posts = storage.list_posts().await.expect("list");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, keep);
}

#[tokio::test]
async fn delete_of_unknown_or_non_numeric_id_still_redirects() {
    let (app, storage) = test_app().await;
    seed(&storage, "survivor").await;

    for uri in ["/delete/4242", "/delete/not-a-number"] {
        let response = app
            .clone()
            .oneshot(Request::post(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_redirects_home(&response);
    }

    assert_eq!(storage.count_posts().await.expect("count"), 1);
}

#[tokio::test]
async fn index_degrades_when_store_is_unreachable() {
    let (app, storage) = test_app().await;
    seed(&storage, "hidden").await;
    storage.close().await;

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(views::EMPTY_STATE));
    assert!(!html.contains("hidden"));
}

#[tokio::test]
async fn create_with_unreachable_store_rerenders_form() {
    let (app, storage) = test_app().await;
    storage.close().await;

    let response = app
        .oneshot(form_request("/new", "title=t&content=c"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"action="/new""#));
}

#[tokio::test]
async fn healthz_tracks_store_availability() {
    let (app, storage) = test_app().await;

    let response = app
        .clone()
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");

    storage.close().await;
    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
