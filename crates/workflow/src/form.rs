use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{WorkflowError, WorkflowResult};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OptionsError {
    #[error("Year option '{0}' is not an integer")]
    NonNumericYear(String),

    #[error("At least one {0} option is required")]
    Empty(&'static str),
}

/// The fixed choices offered by the year and type selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    pub years: Vec<String>,
    pub types: Vec<String>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            years: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            types: vec![
                "exam".to_string(),
                "worksheet".to_string(),
                "summary".to_string(),
                "other".to_string(),
            ],
        }
    }
}

impl FormOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.years.is_empty() {
            return Err(OptionsError::Empty("year"));
        }
        if self.types.is_empty() {
            return Err(OptionsError::Empty("type"));
        }
        if let Some(bad) = self.years.iter().find(|y| y.trim().parse::<i32>().is_err()) {
            return Err(OptionsError::NonNumericYear(bad.clone()));
        }
        Ok(())
    }

    /// Value a selector holds after `value` is picked: anything outside the
    /// option set leaves the selector empty.
    pub fn pick_year(&self, value: Option<&str>) -> Option<String> {
        pick(&self.years, value)
    }

    pub fn pick_type(&self, value: Option<&str>) -> Option<String> {
        pick(&self.types, value)
    }
}

fn pick(options: &[String], value: Option<&str>) -> Option<String> {
    let value = value?;
    options.iter().find(|option| option.as_str() == value).cloned()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub custom_name: String,
    pub year: Option<String>,
    pub doc_type: Option<String>,
}

/// Form contents that satisfy every submission precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub custom_name: String,
    pub year: i32,
    pub doc_type: String,
}

impl UploadForm {
    /// Checks name, year, then type, stopping at the first missing field.
    pub fn validate(&self) -> WorkflowResult<ValidatedForm> {
        let custom_name = self.custom_name.trim();
        if custom_name.is_empty() {
            return Err(WorkflowError::MissingName);
        }

        let year = self
            .year
            .as_deref()
            .and_then(|y| y.trim().parse::<i32>().ok())
            .ok_or(WorkflowError::MissingYear)?;

        let doc_type = self
            .doc_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(WorkflowError::MissingType)?;

        Ok(ValidatedForm {
            custom_name: custom_name.to_string(),
            year,
            doc_type: doc_type.to_string(),
        })
    }
}
