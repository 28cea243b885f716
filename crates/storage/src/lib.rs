use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{NewPost, Post, PostId};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Closes every pooled connection. Later calls fail with a pool-closed error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<PostId> {
        let rec = sqlx::query("INSERT INTO posts (title, content) VALUES (?, ?) RETURNING id")
            .bind(&post.title)
            .bind(&post.content)
            .fetch_one(&self.pool)
            .await
            .context("failed to insert post")?;
        Ok(PostId(rec.get::<i64, _>(0)))
    }

    /// All posts, newest (highest id) first.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query("SELECT id, title, content FROM posts ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await
            .context("failed to list posts")?;
        Ok(rows.iter().map(post_from_row).collect())
    }

    pub async fn load_post(&self, post_id: PostId) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT id, title, content FROM posts WHERE id = ?")
            .bind(post_id.0)
            .fetch_optional(&self.pool)
            .await
            .context("failed to load post")?;
        Ok(row.as_ref().map(post_from_row))
    }

    /// Returns `false` when no row carried that id.
    pub async fn delete_post(&self, post_id: PostId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(post_id.0)
            .execute(&self.pool)
            .await
            .context("failed to delete post")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_posts(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .context("failed to count posts")?;
        Ok(count)
    }
}

fn post_from_row(row: &SqliteRow) -> Post {
    Post {
        id: PostId(row.get::<i64, _>(0)),
        title: row.get::<String, _>(1),
        content: row.get::<String, _>(2),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
