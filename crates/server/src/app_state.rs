use crate::{api::ApiContext, views::Views};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    pub(crate) views: Views,
}
