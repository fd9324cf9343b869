use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// VariableKind is the declared type of a template variable together with
/// the constraints that only make sense for that type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VariableKind {
    Text {
        #[serde(
            rename = "validationPattern",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        pattern: Option<String>,
    },
    Number,
    Boolean,
    Select {
        #[serde(default)]
        options: Vec<String>,
    },
    Ip {
        #[serde(
            rename = "validationPattern",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        pattern: Option<String>,
    },
    Password {
        #[serde(
            rename = "validationPattern",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        pattern: Option<String>,
    },
}

impl VariableKind {
    pub fn text() -> Self {
        Self::Text { pattern: None }
    }

    pub fn ip() -> Self {
        Self::Ip { pattern: None }
    }

    pub fn password() -> Self {
        Self::Password { pattern: None }
    }

    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Select {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Validation pattern, for the kinds that accept one
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::Text { pattern } | Self::Ip { pattern } | Self::Password { pattern } => {
                pattern.as_deref()
            }
            _ => None,
        }
    }
}

/// Validation pattern anchored to the whole value, compiled on first use.
/// Holds the compile error text when the pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher(OnceLock<Result<Regex, String>>);

// Derived from `kind`, so it never makes two schemas differ
impl PartialEq for PatternMatcher {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// VariableSchema describes one substitutable parameter of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableSchema {
    pub name: String,
    #[serde(flatten)]
    pub kind: VariableKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip)]
    matcher: PatternMatcher,
}

impl VariableSchema {
    /// Optional variable with no default; use the builder methods to refine it
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default_value: None,
            label: None,
            description: None,
            matcher: PatternMatcher::default(),
        }
    }

    /// Compiled validation pattern; None when the kind carries no pattern.
    /// Compiled once per schema, so a catalog pays for it at build time.
    pub fn pattern_regex(&self) -> Option<Result<&Regex, &str>> {
        let pattern = self.kind.pattern()?;
        let compiled = self.matcher.0.get_or_init(|| {
            Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| e.to_string())
        });
        Some(compiled.as_ref().map_err(String::as_str))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
