use shared::{
    domain::{NewPost, Post, PostField, PostId},
    error::ApiError,
};
use storage::Storage;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(PostId),
    /// Nothing was written; the listed fields were absent or empty.
    Rejected(Vec<PostField>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(PostId),
    NotFound(PostId),
}

pub async fn list_posts(ctx: &ApiContext) -> Result<Vec<Post>, ApiError> {
    ctx.storage.list_posts().await.map_err(internal)
}

/// Creates a post when both fields carry text. Only the empty string counts as
/// empty; whitespace is stored as given.
pub async fn create_post(
    ctx: &ApiContext,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<CreateOutcome, ApiError> {
    let mut missing = Vec::new();
    if title.map_or(true, str::is_empty) {
        missing.push(PostField::Title);
    }
    if content.map_or(true, str::is_empty) {
        missing.push(PostField::Content);
    }

    let (Some(title), Some(content), true) = (title, content, missing.is_empty()) else {
        warn!(
            missing = ?missing.iter().map(|f| f.as_str()).collect::<Vec<_>>(),
            "post not created: title and content are required"
        );
        return Ok(CreateOutcome::Rejected(missing));
    };

    let post_id = ctx
        .storage
        .create_post(&NewPost {
            title: title.to_string(),
            content: content.to_string(),
        })
        .await
        .map_err(internal)?;
    info!(post_id = post_id.0, "post created");
    Ok(CreateOutcome::Created(post_id))
}

/// Deletes by the raw path segment. A segment that is not an integer cannot
/// match any row and is reported as a validation error.
pub async fn delete_post(ctx: &ApiContext, raw_id: &str) -> Result<DeleteOutcome, ApiError> {
    let post_id = raw_id.parse::<PostId>().map_err(|e| {
        ApiError::validation(format!("post id '{raw_id}' is not an integer: {e}"))
    })?;

    let deleted = ctx.storage.delete_post(post_id).await.map_err(internal)?;
    if deleted {
        info!(post_id = post_id.0, "post deleted");
        Ok(DeleteOutcome::Deleted(post_id))
    } else {
        Ok(DeleteOutcome::NotFound(post_id))
    }
}

pub async fn store_healthy(ctx: &ApiContext) -> bool {
    ctx.storage.health_check().await.is_ok()
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::internal(format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
