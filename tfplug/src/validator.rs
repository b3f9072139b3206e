//! Attribute validators
//!
//! Validators run during `Schema::validate` against non-null, known values.
//! Each validator appends error diagnostics rather than returning early so a
//! single plan surfaces every problem at once.

use crate::types::{AttributePath, Diagnostic, Dynamic};

pub trait Validator: Send + Sync {
    /// Human-readable description
    fn description(&self) -> String;

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>);
}

pub struct StringLengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Validator for StringLengthValidator {
    fn description(&self) -> String {
        format!("string length between {:?} and {:?}", self.min, self.max)
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        let Some(s) = value.as_str() else { return };

        if let Some(min) = self.min {
            if s.len() < min {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must have minimum length of {}", path, min),
                        format!("Got length {}", s.len()),
                    )
                    .with_attribute(path.clone()),
                );
            }
        }
        if let Some(max) = self.max {
            if s.len() > max {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must have maximum length of {}", path, max),
                        format!("Got length {}", s.len()),
                    )
                    .with_attribute(path.clone()),
                );
            }
        }
    }
}

/// Accepts only one of a fixed set of strings
pub struct StringOneOfValidator {
    pub values: Vec<String>,
}

impl StringOneOfValidator {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for StringOneOfValidator {
    fn description(&self) -> String {
        format!("one of {}", self.values.join(", "))
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        let Some(s) = value.as_str() else { return };

        if !self.values.iter().any(|v| v == s) {
            diagnostics.push(
                Diagnostic::error(
                    format!("{} must be one of [{}]", path, self.values.join(", ")),
                    format!("Got '{}'", s),
                )
                .with_attribute(path.clone()),
            );
        }
    }
}

pub struct StringPatternValidator {
    pub pattern: regex::Regex,
    pub description: String,
}

impl Validator for StringPatternValidator {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        let Some(s) = value.as_str() else { return };

        if !self.pattern.is_match(s) {
            diagnostics.push(
                Diagnostic::error(
                    format!("{} must match {}", path, self.description),
                    format!("Value '{}' does not match pattern", s),
                )
                .with_attribute(path.clone()),
            );
        }
    }
}

/// The value itself must be a valid regular expression
pub struct RegexCompilesValidator;

impl Validator for RegexCompilesValidator {
    fn description(&self) -> String {
        "a valid regular expression".to_string()
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        let Some(s) = value.as_str() else { return };

        if let Err(e) = regex::Regex::new(s) {
            diagnostics.push(
                Diagnostic::error(
                    format!("{} is not a valid regular expression", path),
                    e.to_string(),
                )
                .with_attribute(path.clone()),
            );
        }
    }
}

pub struct NumberRangeValidator {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberRangeValidator {
    /// Valid TCP/UDP port numbers
    pub fn port() -> Self {
        Self {
            min: Some(1.0),
            max: Some(65535.0),
        }
    }
}

impl Validator for NumberRangeValidator {
    fn description(&self) -> String {
        format!("number between {:?} and {:?}", self.min, self.max)
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        let Some(n) = value.as_number() else { return };

        if let Some(min) = self.min {
            if n < min {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must be at least {}", path, min),
                        format!("Got {}", n),
                    )
                    .with_attribute(path.clone()),
                );
            }
        }
        if let Some(max) = self.max {
            if n > max {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must be at most {}", path, max),
                        format!("Got {}", n),
                    )
                    .with_attribute(path.clone()),
                );
            }
        }
    }
}

pub struct ListLengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Validator for ListLengthValidator {
    fn description(&self) -> String {
        format!("list length between {:?} and {:?}", self.min, self.max)
    }

    fn validate(&self, value: &Dynamic, path: &AttributePath, diagnostics: &mut Vec<Diagnostic>) {
        let Some(items) = value.as_list() else { return };

        if let Some(min) = self.min {
            if items.len() < min {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must have at least {} items", path, min),
                        format!("Got {} items", items.len()),
                    )
                    .with_attribute(path.clone()),
                );
            }
        }
        if let Some(max) = self.max {
            if items.len() > max {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must have at most {} items", path, max),
                        format!("Got {} items", items.len()),
                    )
                    .with_attribute(path.clone()),
                );
            }
        }
    }
}
