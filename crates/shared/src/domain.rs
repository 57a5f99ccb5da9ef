use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(TutorialId);

pub const TITLE_MAX_CHARS: usize = 128;
pub const DESCRIPTION_MAX_CHARS: usize = 256;
pub const LEVEL_MIN: i32 = 0;
pub const LEVEL_MAX: i32 = 10;

/// One row of the `tutorials` table.
///
/// Fields are plain data; nothing here rejects a bad title or level on
/// assignment. Call [`Tutorial::validate`] before persisting user input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tutorial {
    /// Assigned by storage on first save.
    pub id: Option<TutorialId>,
    pub title: String,
    pub description: Option<String>,
    pub level: i32,
    pub published: bool,
}

impl Tutorial {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        level: i32,
        published: bool,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description,
            level,
            published,
        }
    }

    pub fn with_id(mut self, id: TutorialId) -> Self {
        self.id = Some(id);
        self
    }

    /// Blank record used by the create form.
    pub fn draft() -> Self {
        Self {
            published: true,
            ..Self::default()
        }
    }

    /// Checks the title, description and level constraints, reporting the
    /// first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let title_chars = self.title.chars().count();
        if title_chars > TITLE_MAX_CHARS {
            return Err(ValidationError::TitleTooLong { chars: title_chars });
        }
        if let Some(description) = &self.description {
            let chars = description.chars().count();
            if chars > DESCRIPTION_MAX_CHARS {
                return Err(ValidationError::DescriptionTooLong { chars });
            }
        }
        if !(LEVEL_MIN..=LEVEL_MAX).contains(&self.level) {
            return Err(ValidationError::LevelOutOfRange(self.level));
        }
        Ok(())
    }
}

impl fmt::Display for Tutorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tutorial [id=")?;
        match self.id {
            Some(id) => write!(f, "{id}")?,
            None => write!(f, "null")?,
        }
        write!(
            f,
            ", title={}, description={}, level={}, published={}]",
            self.title,
            self.description.as_deref().unwrap_or("null"),
            self.level,
            self.published
        )
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
