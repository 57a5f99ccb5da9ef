use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use shared::{
    domain::{Tutorial, TutorialId},
    protocol::{ListQuery, SaveTutorialForm},
};
use storage::Storage;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod flash;
mod views;

use api::{
    delete_tutorial, list_tutorials, load_tutorial, save_tutorial, set_published, ApiContext,
};
use app_state::AppState;
use config::{load_settings, normalize_database_url};
use flash::{clear_flash_cookie, read_flash, redirect_with_flash, redirect_with_query_message};
use views::{FormPage, ListPage, Views};

const TUTORIALS_PATH: &str = "/tutorials";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    let views = Views::new()?;

    let state = AppState {
        api: ApiContext::new(storage),
        views,
    };
    let app = build_router(Arc::new(state), settings.max_form_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, %database_url, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_form_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/tutorials", get(tutorials_page))
        .route("/tutorials/new", get(new_tutorial_page))
        .route("/tutorials/save", post(save_tutorial_page))
        .route("/tutorials/:id", get(edit_tutorial_page))
        .route("/tutorials/delete/:id", get(delete_tutorial_page))
        .route("/tutorials/:id/published/:status", get(publish_tutorial_page))
        .layer(RequestBodyLimitLayer::new(max_form_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Redirect {
    Redirect::to(TUTORIALS_PATH)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    api::health(&state.api).await.map(|_| "ok").map_err(|err| {
        error!(error = %err.message, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })
}

async fn tutorials_page(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListQuery>,
    headers: HeaderMap,
) -> Response {
    let flash = read_flash(&headers);
    let keyword = q.keyword.as_deref();

    let (tutorials, failure) = match list_tutorials(&state.api, keyword).await {
        Ok(tutorials) => (tutorials, None),
        Err(err) => {
            error!(?keyword, error = %err.message, "failed to list tutorials");
            (Vec::new(), Some(err.message))
        }
    };
    let message = failure
        .as_deref()
        .or(flash.as_deref())
        .or(q.message.as_deref());

    let mut response = state.views.tutorials(&ListPage {
        tutorials: &tutorials,
        keyword,
        message,
    });
    if flash.is_some() {
        if let Ok(value) = HeaderValue::from_str(&clear_flash_cookie()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

async fn new_tutorial_page(State(state): State<Arc<AppState>>) -> Response {
    let tutorial = Tutorial::draft();
    state.views.tutorial_form(&FormPage {
        page_title: "Create new Tutorial",
        tutorial: &tutorial,
    })
}

async fn save_tutorial_page(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SaveTutorialForm>,
) -> Response {
    match save_tutorial(&state.api, form).await {
        Ok(tutorial) => {
            info!(tutorial_id = ?tutorial.id, "tutorial saved");
            redirect_with_flash(TUTORIALS_PATH, "The Tutorial has been saved successfully!")
        }
        Err(err) => {
            warn!(code = ?err.code, error = %err.message, "failed to save tutorial");
            redirect_with_query_message(TUTORIALS_PATH, &err.message)
        }
    }
}

async fn edit_tutorial_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    let id = TutorialId(id);
    match load_tutorial(&state.api, id).await {
        Ok(tutorial) => {
            let page_title = format!("Edit Tutorial (ID: {id})");
            state.views.tutorial_form(&FormPage {
                page_title: &page_title,
                tutorial: &tutorial,
            })
        }
        Err(err) => {
            warn!(tutorial_id = id.0, code = ?err.code, error = %err.message, "cannot edit tutorial");
            redirect_with_flash(TUTORIALS_PATH, err.message)
        }
    }
}

async fn delete_tutorial_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    let id = TutorialId(id);
    match delete_tutorial(&state.api, id).await {
        Ok(()) => {
            info!(tutorial_id = id.0, "tutorial deleted");
            redirect_with_flash(
                TUTORIALS_PATH,
                format!("The Tutorial with id={id} has been deleted successfully!"),
            )
        }
        Err(err) => {
            warn!(tutorial_id = id.0, error = %err.message, "failed to delete tutorial");
            redirect_with_flash(TUTORIALS_PATH, err.message)
        }
    }
}

async fn publish_tutorial_page(
    State(state): State<Arc<AppState>>,
    Path((id, published)): Path<(i64, bool)>,
) -> Response {
    let id = TutorialId(id);
    match set_published(&state.api, id, published).await {
        Ok(()) => {
            let status = if published { "published" } else { "disabled" };
            info!(tutorial_id = id.0, published, "tutorial status updated");
            redirect_with_flash(
                TUTORIALS_PATH,
                format!("The Tutorial id={id} has been {status}"),
            )
        }
        Err(err) => {
            warn!(tutorial_id = id.0, published, error = %err.message, "failed to update status");
            redirect_with_flash(TUTORIALS_PATH, err.message)
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
