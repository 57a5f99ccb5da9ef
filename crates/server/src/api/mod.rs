use std::sync::Arc;

use shared::{
    domain::{Tutorial, TutorialId},
    error::{ApiError, ErrorCode},
    protocol::SaveTutorialForm,
};
use storage::TutorialRepository;

#[derive(Clone)]
pub struct ApiContext {
    pub repository: Arc<dyn TutorialRepository>,
}

impl ApiContext {
    pub fn new(repository: impl TutorialRepository + 'static) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}

/// All tutorials, or only those whose title contains `keyword` when one is given.
pub async fn list_tutorials(
    ctx: &ApiContext,
    keyword: Option<&str>,
) -> Result<Vec<Tutorial>, ApiError> {
    match keyword {
        Some(keyword) => ctx
            .repository
            .find_by_title_containing_ignore_case(keyword)
            .await
            .map_err(storage),
        None => ctx.repository.find_all().await.map_err(storage),
    }
}

pub async fn load_tutorial(ctx: &ApiContext, id: TutorialId) -> Result<Tutorial, ApiError> {
    ctx.repository
        .find_by_id(id)
        .await
        .map_err(storage)?
        .ok_or_else(|| {
            ApiError::new(
                ErrorCode::NotFound,
                format!("Could not find any Tutorial with id={id}"),
            )
        })
}

pub async fn save_tutorial(ctx: &ApiContext, form: SaveTutorialForm) -> Result<Tutorial, ApiError> {
    let tutorial = form.into_tutorial()?;
    ctx.repository.save(tutorial).await.map_err(storage)
}

pub async fn delete_tutorial(ctx: &ApiContext, id: TutorialId) -> Result<(), ApiError> {
    ctx.repository.delete_by_id(id).await.map_err(storage)
}

pub async fn set_published(
    ctx: &ApiContext,
    id: TutorialId,
    published: bool,
) -> Result<(), ApiError> {
    ctx.repository
        .update_published_status(id, published)
        .await
        .map_err(storage)
}

pub async fn health(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.repository.health_check().await.map_err(storage)
}

fn storage(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Storage, format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
pub(crate) mod tests;
