// src/error.rs
use std::fmt;
use thiserror::Error;

/// Failures a chart calculation can end in.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("{0}")]
    Validation(ValidationError),
    #[error("Invalid date/time: {0}")]
    Parse(String),
    #[error("{0}")]
    Computation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ChartError {
    fn from(err: ValidationError) -> Self {
        ChartError::Validation(err)
    }
}

/// Request fields that were absent or unusable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
    pub invalid: Vec<String>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.missing.is_empty() {
            write!(f, "Missing required parameters: {}", self.missing.join(", "))?;
            if !self.invalid.is_empty() {
                write!(f, "; ")?;
            }
        }
        if !self.invalid.is_empty() {
            write!(f, "Invalid parameters: {}", self.invalid.join(", "))?;
        }
        Ok(())
    }
}
