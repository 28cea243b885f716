use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use blog_api::{create_post, delete_post, list_posts, store_healthy, CreateOutcome, DeleteOutcome};
use serde::Deserialize;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, warn};

use crate::{app_state::AppState, views};

const MAX_FORM_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
pub(crate) struct NewPostForm {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

pub(crate) fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/new", get(new_post_form).post(submit_post))
        .route("/delete/:id", post(remove_post))
        .route("/healthz", get(healthz))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    match list_posts(&state.api).await {
        Ok(posts) => views::index_page(Some(&posts)),
        Err(error) => {
            error!(%error, "failed to load posts; rendering without them");
            views::index_page(None)
        }
    }
}

async fn about() -> Html<String> {
    views::about_page()
}

async fn new_post_form() -> Html<String> {
    views::new_post_page()
}

/// A body that is not a urlencoded form is treated like an empty submission,
/// except an oversized one, which keeps its 413.
async fn submit_post(
    State(state): State<Arc<AppState>>,
    form: Result<Form<NewPostForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return rejection.into_response();
        }
        Err(rejection) => {
            warn!(%rejection, "unreadable post submission");
            return views::new_post_page().into_response();
        }
    };

    match create_post(&state.api, form.title.as_deref(), form.content.as_deref()).await {
        Ok(CreateOutcome::Created(_)) => Redirect::to("/").into_response(),
        Ok(CreateOutcome::Rejected(_)) => views::new_post_page().into_response(),
        Err(error) => {
            error!(%error, "failed to create post");
            views::new_post_page().into_response()
        }
    }
}

async fn remove_post(State(state): State<Arc<AppState>>, Path(raw_id): Path<String>) -> Redirect {
    match delete_post(&state.api, &raw_id).await {
        Ok(DeleteOutcome::Deleted(_)) => {}
        Ok(DeleteOutcome::NotFound(post_id)) => {
            warn!(post_id = post_id.0, "delete requested for unknown post");
        }
        Err(error) => {
            error!(id = %raw_id, %error, "failed to delete post");
        }
    }
    Redirect::to("/")
}

async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    if store_healthy(&state.api).await {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    }
}

#[cfg(test)]
#[path = "tests/routes_tests.rs"]
mod tests;
