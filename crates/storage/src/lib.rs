use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{Tutorial, TutorialId};

/// Persistence gateway for tutorials.
///
/// Every method is a single SQL statement, so each call is atomic on its own.
#[async_trait]
pub trait TutorialRepository: Send + Sync {
    /// Inserts a record without an id, or overwrites the row carrying the
    /// record's id. Returns the record with its id filled in.
    async fn save(&self, tutorial: Tutorial) -> Result<Tutorial>;
    async fn find_by_id(&self, id: TutorialId) -> Result<Option<Tutorial>>;
    /// All rows in insertion order.
    async fn find_all(&self) -> Result<Vec<Tutorial>>;
    /// Unknown ids are ignored.
    async fn delete_by_id(&self, id: TutorialId) -> Result<()>;
    async fn count(&self) -> Result<i64>;
    async fn exists_by_id(&self, id: TutorialId) -> Result<bool>;
    /// Literal, case-insensitive substring match on the title. An empty
    /// keyword matches every row.
    async fn find_by_title_containing_ignore_case(&self, keyword: &str) -> Result<Vec<Tutorial>>;
    /// Flips only the `published` column. Unknown ids are ignored.
    async fn update_published_status(&self, id: TutorialId, published: bool) -> Result<()>;
    /// Fails when the backing store cannot answer a trivial query.
    async fn health_check(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Each in-memory connection is its own database, so keep exactly one alive.
        let pool_options = if is_memory_url(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(connect_options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Closes the pool; later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TutorialRepository for Storage {
    async fn save(&self, tutorial: Tutorial) -> Result<Tutorial> {
        let id = match tutorial.id {
            None => {
                let rec = sqlx::query(
                    "INSERT INTO tutorials (title, description, level, published)
                     VALUES (?1, ?2, ?3, ?4)
                     RETURNING id",
                )
                .bind(&tutorial.title)
                .bind(tutorial.description.as_deref())
                .bind(tutorial.level)
                .bind(tutorial.published)
                .fetch_one(&self.pool)
                .await
                .context("failed to insert tutorial")?;
                TutorialId(rec.get::<i64, _>(0))
            }
            Some(id) => {
                sqlx::query(
                    r#"
                    INSERT INTO tutorials (id, title, description, level, published)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(id) DO UPDATE SET
                        title = excluded.title,
                        description = excluded.description,
                        level = excluded.level,
                        published = excluded.published
                    "#,
                )
                .bind(id.0)
                .bind(&tutorial.title)
                .bind(tutorial.description.as_deref())
                .bind(tutorial.level)
                .bind(tutorial.published)
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed to update tutorial id={id}"))?;
                id
            }
        };
        Ok(tutorial.with_id(id))
    }

    async fn find_by_id(&self, id: TutorialId) -> Result<Option<Tutorial>> {
        let row = sqlx::query(
            "SELECT id, title, description, level, published FROM tutorials WHERE id = ?1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load tutorial id={id}"))?;
        row.as_ref().map(tutorial_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Tutorial>> {
        let rows = sqlx::query(
            "SELECT id, title, description, level, published FROM tutorials ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list tutorials")?;
        rows.iter().map(tutorial_from_row).collect()
    }

    async fn delete_by_id(&self, id: TutorialId) -> Result<()> {
        sqlx::query("DELETE FROM tutorials WHERE id = ?1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete tutorial id={id}"))?;
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tutorials")
            .fetch_one(&self.pool)
            .await
            .context("failed to count tutorials")
    }

    async fn exists_by_id(&self, id: TutorialId) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tutorials WHERE id = ?1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to check tutorial id={id}"))
    }

    async fn find_by_title_containing_ignore_case(&self, keyword: &str) -> Result<Vec<Tutorial>> {
        // SQLite's lower() only folds ASCII, so match in Rust.
        let needle = keyword.to_lowercase();
        let tutorials = self
            .find_all()
            .await
            .with_context(|| format!("failed to search tutorials for '{keyword}'"))?;
        Ok(tutorials
            .into_iter()
            .filter(|tutorial| tutorial.title.to_lowercase().contains(&needle))
            .collect())
    }

    async fn update_published_status(&self, id: TutorialId, published: bool) -> Result<()> {
        sqlx::query("UPDATE tutorials SET published = ?1 WHERE id = ?2")
            .bind(published)
            .bind(id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to update published status of tutorial id={id}"))?;
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

fn tutorial_from_row(row: &SqliteRow) -> Result<Tutorial> {
    Ok(Tutorial {
        id: Some(TutorialId(row.try_get::<i64, _>("id")?)),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        level: row.try_get("level")?,
        published: row.try_get("published")?,
    })
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
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
    if is_memory_url(database_url) || !database_url.starts_with("sqlite:") {
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
