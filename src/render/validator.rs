use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{VariableKind, VariableSchema};
use crate::utils::is_valid_ipv4;

/// ValidationError is a user-recoverable problem with one supplied value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{variable}: required variable is missing")]
    MissingRequiredVariable { variable: String },

    #[error("{variable}: expected {expected}")]
    TypeMismatch {
        variable: String,
        expected: &'static str,
    },

    #[error("{variable}: value does not match pattern {pattern}")]
    PatternMismatch { variable: String, pattern: String },

    #[error("{variable}: '{value}' is not one of [{}]", .options.join(", "))]
    OptionNotAllowed {
        variable: String,
        value: String,
        options: Vec<String>,
    },

    #[error("{variable}: '{value}' is not a valid IPv4 address")]
    InvalidIpAddress { variable: String, value: String },
}

/// Wire form of a validation failure: `{variable, reason, message}`
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub variable: String,
    pub reason: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn variable(&self) -> &str {
        match self {
            Self::MissingRequiredVariable { variable }
            | Self::TypeMismatch { variable, .. }
            | Self::PatternMismatch { variable, .. }
            | Self::OptionNotAllowed { variable, .. }
            | Self::InvalidIpAddress { variable, .. } => variable,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingRequiredVariable { .. } => "MissingRequiredVariable",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::PatternMismatch { .. } => "PatternMismatch",
            Self::OptionNotAllowed { .. } => "OptionNotAllowed",
            Self::InvalidIpAddress { .. } => "InvalidIPAddress",
        }
    }

    pub fn to_field_error(&self) -> FieldError {
        FieldError {
            variable: self.variable().to_string(),
            reason: self.reason(),
            message: self.to_string(),
        }
    }
}

/// Null and the empty string stand for "not supplied"; whitespace is a value
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Validate one variable against its schema.
///
/// `raw` is the caller-supplied value, if any. Absent, null and empty values
/// fall back to the declared default; a required variable with neither is a
/// `MissingRequiredVariable`, an optional one resolves to the empty string.
/// The returned value is the normalized value that gets substituted.
pub fn validate_variable(
    schema: &VariableSchema,
    raw: Option<&Value>,
) -> Result<Value, ValidationError> {
    let effective = raw
        .filter(|v| !is_blank(v))
        .or_else(|| schema.default_value.as_ref().filter(|v| !is_blank(v)));

    let Some(value) = effective else {
        if schema.required {
            return Err(ValidationError::MissingRequiredVariable {
                variable: schema.name.clone(),
            });
        }
        return Ok(Value::String(String::new()));
    };

    check_value(schema, value)
}

fn check_value(schema: &VariableSchema, value: &Value) -> Result<Value, ValidationError> {
    let name = &schema.name;
    let mismatch = |expected: &'static str| ValidationError::TypeMismatch {
        variable: name.clone(),
        expected,
    };

    match &schema.kind {
        VariableKind::Text { pattern } | VariableKind::Password { pattern } => {
            let s = value.as_str().ok_or_else(|| mismatch("a string"))?;
            check_pattern(schema, pattern.as_deref(), s)?;
            Ok(Value::String(s.to_string()))
        }
        VariableKind::Number => match value {
            Value::Number(n) if n.as_f64().map(f64::is_finite).unwrap_or(false) => {
                Ok(value.clone())
            }
            Value::String(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<f64>() {
                    // Keep the caller's spelling; "10.50" stays "10.50"
                    Ok(n) if n.is_finite() => Ok(Value::String(trimmed.to_string())),
                    _ => Err(mismatch("a finite number")),
                }
            }
            _ => Err(mismatch("a finite number")),
        },
        VariableKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            _ => Err(mismatch("a boolean literal")),
        },
        VariableKind::Select { options } => {
            let s = value.as_str().ok_or_else(|| mismatch("a string option"))?;
            if options.iter().any(|o| o == s) {
                Ok(Value::String(s.to_string()))
            } else {
                Err(ValidationError::OptionNotAllowed {
                    variable: name.clone(),
                    value: s.to_string(),
                    options: options.clone(),
                })
            }
        }
        VariableKind::Ip { pattern } => {
            let s = value.as_str().ok_or_else(|| mismatch("an IPv4 address string"))?;
            let trimmed = s.trim();
            if !is_valid_ipv4(trimmed) {
                return Err(ValidationError::InvalidIpAddress {
                    variable: name.clone(),
                    value: s.to_string(),
                });
            }
            check_pattern(schema, pattern.as_deref(), trimmed)?;
            Ok(Value::String(trimmed.to_string()))
        }
    }
}

/// Full-string match against an optional pattern. A pattern that fails to
/// compile matches nothing; catalog verification rejects such templates
/// before they can be rendered.
fn check_pattern(
    schema: &VariableSchema,
    pattern: Option<&str>,
    value: &str,
) -> Result<(), ValidationError> {
    let Some(pattern) = pattern else {
        return Ok(());
    };

    let matched = schema
        .pattern_regex()
        .and_then(|re| re.ok())
        .map(|re| re.is_match(value))
        .unwrap_or(false);

    if matched {
        Ok(())
    } else {
        Err(ValidationError::PatternMismatch {
            variable: schema.name.clone(),
            pattern: pattern.to_string(),
        })
    }
}

/// String form of a normalized value as it is written into a template body
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
