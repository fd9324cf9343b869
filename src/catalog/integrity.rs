use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

use crate::models::{TemplateDefinition, VariableKind};
use crate::render::validate_variable;
use crate::utils::scan_placeholders;

/// CatalogIntegrityError is a template authoring defect, never a user input
/// problem. A catalog containing one is refused at build time and a render
/// that trips over one fails hard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogIntegrityError {
    #[error("template {template}: missing required field '{field}'")]
    MissingField { template: String, field: &'static str },

    #[error("duplicate template id '{0}'")]
    DuplicateTemplate(String),

    #[error("template {template}: variable '{variable}' declared more than once")]
    DuplicateVariable { template: String, variable: String },

    #[error("template {template}: placeholder '{{{{{placeholder}}}}}' has no declared variable")]
    UndeclaredPlaceholder { template: String, placeholder: String },

    #[error("template {template}: '{{{{{text}}}}}' is not a valid placeholder")]
    MalformedPlaceholder { template: String, text: String },

    #[error("template {template}: variable '{variable}' never appears in the body")]
    UnusedVariable { template: String, variable: String },

    #[error("template {template}: select variable '{variable}' has no options")]
    EmptySelect { template: String, variable: String },

    #[error("template {template}: default for '{variable}' is not one of its options")]
    DefaultNotInOptions { template: String, variable: String },

    #[error("template {template}: default for '{variable}' is invalid: {reason}")]
    InvalidDefault {
        template: String,
        variable: String,
        reason: String,
    },

    #[error("template {template}: variable '{variable}' has an invalid pattern: {reason}")]
    InvalidPattern {
        template: String,
        variable: String,
        reason: String,
    },
}

/// Check a single template against every authoring rule.
/// Returns all problems found, in a stable order.
pub fn verify_template(template: &TemplateDefinition) -> Vec<CatalogIntegrityError> {
    let mut problems = Vec::new();
    let tid = template.id.clone();

    for (field, value) in [
        ("id", &template.id),
        ("vendor", &template.vendor),
        ("model", &template.model),
        ("body", &template.body),
    ] {
        if value.trim().is_empty() {
            problems.push(CatalogIntegrityError::MissingField {
                template: tid.clone(),
                field,
            });
        }
    }

    let mut declared: HashSet<&str> = HashSet::new();
    for var in &template.variables {
        if !declared.insert(var.name.as_str()) {
            problems.push(CatalogIntegrityError::DuplicateVariable {
                template: tid.clone(),
                variable: var.name.clone(),
            });
        }
    }

    let mut used: BTreeSet<&str> = BTreeSet::new();
    for placeholder in scan_placeholders(&template.body) {
        match placeholder.name() {
            Some(name) => {
                used.insert(name);
            }
            None => problems.push(CatalogIntegrityError::MalformedPlaceholder {
                template: tid.clone(),
                text: placeholder.text.to_string(),
            }),
        }
    }

    for name in &used {
        if !declared.contains(name) {
            problems.push(CatalogIntegrityError::UndeclaredPlaceholder {
                template: tid.clone(),
                placeholder: name.to_string(),
            });
        }
    }

    for var in &template.variables {
        if !used.contains(var.name.as_str()) {
            problems.push(CatalogIntegrityError::UnusedVariable {
                template: tid.clone(),
                variable: var.name.clone(),
            });
        }

        if let Some(Err(reason)) = var.pattern_regex() {
            problems.push(CatalogIntegrityError::InvalidPattern {
                template: tid.clone(),
                variable: var.name.clone(),
                reason: reason.to_string(),
            });
            // Default can't be checked against a broken pattern
            continue;
        }

        if let VariableKind::Select { options } = &var.kind {
            if options.is_empty() {
                problems.push(CatalogIntegrityError::EmptySelect {
                    template: tid.clone(),
                    variable: var.name.clone(),
                });
                continue;
            }
            if let Some(default) = &var.default_value {
                let in_options = default
                    .as_str()
                    .map(|d| options.iter().any(|o| o == d))
                    .unwrap_or(false);
                if !in_options {
                    problems.push(CatalogIntegrityError::DefaultNotInOptions {
                        template: tid.clone(),
                        variable: var.name.clone(),
                    });
                }
                continue;
            }
        }

        if let Some(default) = &var.default_value {
            if let Err(e) = validate_variable(var, Some(default)) {
                problems.push(CatalogIntegrityError::InvalidDefault {
                    template: tid.clone(),
                    variable: var.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    problems
}
