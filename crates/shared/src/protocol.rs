use serde::{Deserialize, Serialize};

use crate::{
    domain::{Tutorial, TutorialId},
    error::ValidationError,
};

/// Query string accepted by the list page.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ListQuery {
    pub keyword: Option<String>,
    /// Error text carried over from a failed save.
    pub message: Option<String>,
}

/// Raw fields posted by the tutorial form.
///
/// Everything arrives as text so that a blank `id` or a mistyped `level`
/// turns into a [`ValidationError`] instead of a rejected request.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SaveTutorialForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
}

impl SaveTutorialForm {
    pub fn into_tutorial(self) -> Result<Tutorial, ValidationError> {
        let id = match non_blank(self.id) {
            Some(raw) => Some(TutorialId(
                raw.trim()
                    .parse::<i64>()
                    .map_err(|_| ValidationError::InvalidId(raw.clone()))?,
            )),
            None => None,
        };
        let level = match non_blank(self.level) {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|_| ValidationError::InvalidLevel(raw.clone()))?,
            None => 0,
        };

        let tutorial = Tutorial {
            id,
            title: self.title.trim().to_string(),
            description: non_blank(self.description),
            level,
            published: self.published.as_deref().is_some_and(checkbox_checked),
        };
        tutorial.validate()?;
        Ok(tutorial)
    }
}

/// Drops whitespace-only values; anything else is kept verbatim.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn checkbox_checked(value: &str) -> bool {
    matches!(value.trim(), "true" | "on" | "1")
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
