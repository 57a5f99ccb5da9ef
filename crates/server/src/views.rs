use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use shared::domain::Tutorial;
use tera::{Context, Tera};
use tracing::error;

const TEMPLATES: [(&str, &str); 3] = [
    ("layout.html", include_str!("../templates/layout.html")),
    ("tutorials.html", include_str!("../templates/tutorials.html")),
    (
        "tutorial_form.html",
        include_str!("../templates/tutorial_form.html"),
    ),
];

/// Model of the list page.
#[derive(Debug, Serialize)]
pub struct ListPage<'a> {
    pub tutorials: &'a [Tutorial],
    pub keyword: Option<&'a str>,
    pub message: Option<&'a str>,
}

/// Model of the create/edit page.
#[derive(Debug, Serialize)]
pub struct FormPage<'a> {
    pub page_title: &'a str,
    pub tutorial: &'a Tutorial,
}

/// Compiled page templates; `.html` output is autoescaped.
#[derive(Clone)]
pub struct Views {
    tera: Arc<Tera>,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    pub fn tutorials(&self, page: &ListPage<'_>) -> Response {
        self.render("tutorials.html", page)
    }

    pub fn tutorial_form(&self, page: &FormPage<'_>) -> Response {
        self.render("tutorial_form.html", page)
    }

    fn render(&self, template: &str, model: &impl Serialize) -> Response {
        let rendered = Context::from_serialize(model)
            .and_then(|context| self.tera.render(template, &context));
        match rendered {
            Ok(body) => Html(body).into_response(),
            Err(err) => {
                error!(template, error = ?err, "failed to render page");
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
