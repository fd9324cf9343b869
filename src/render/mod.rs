pub mod validator;

pub use validator::{display_value, validate_variable, FieldError, ValidationError};

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::catalog::{verify_template, CatalogIntegrityError};
use crate::models::TemplateDefinition;
use crate::utils::scan_placeholders;

/// Values supplied by the caller, keyed by variable name
pub type VariableValues = HashMap<String, Value>;

/// RenderedConfig is a fully substituted configuration document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedConfig {
    pub template_id: String,
    pub text: String,
    /// Every declared variable with the value actually used, defaults included
    pub effective_values: BTreeMap<String, Value>,
    /// Supplied names the template does not declare
    pub ignored_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{} variable(s) failed validation", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("template integrity check failed: {}", join_problems(.0))]
    Integrity(Vec<CatalogIntegrityError>),
}

fn join_problems(problems: &[CatalogIntegrityError]) -> String {
    problems
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl RenderError {
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation(errors) => errors,
            Self::Integrity(_) => &[],
        }
    }
}

/// Validate `values` against the template and substitute them into its body.
///
/// Every variable is validated before anything is substituted, and all
/// failures are returned together. Substitution is a single literal pass:
/// text coming from a value is never scanned for further placeholders.
pub fn render(
    template: &TemplateDefinition,
    values: &VariableValues,
) -> Result<RenderedConfig, RenderError> {
    let problems = verify_template(template);
    if !problems.is_empty() {
        for problem in &problems {
            tracing::error!(template = %template.id, "catalog integrity error: {}", problem);
        }
        return Err(RenderError::Integrity(problems));
    }

    let mut errors = Vec::new();
    let mut effective: BTreeMap<String, Value> = BTreeMap::new();

    for var in &template.variables {
        match validate_variable(var, values.get(&var.name)) {
            Ok(value) => {
                effective.insert(var.name.clone(), value);
            }
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        tracing::debug!(
            template = %template.id,
            "render rejected with {} validation error(s)",
            errors.len()
        );
        return Err(RenderError::Validation(errors));
    }

    let text = substitute(template, &effective)?;

    let mut ignored_values: Vec<String> = values
        .keys()
        .filter(|k| template.variable(k).is_none())
        .cloned()
        .collect();
    ignored_values.sort();

    tracing::debug!(template = %template.id, bytes = text.len(), "rendered template");

    Ok(RenderedConfig {
        template_id: template.id.clone(),
        text,
        effective_values: effective,
        ignored_values,
    })
}

fn substitute(
    template: &TemplateDefinition,
    effective: &BTreeMap<String, Value>,
) -> Result<String, RenderError> {
    let body = &template.body;
    let mut out = String::with_capacity(body.len());
    let mut last = 0;

    for placeholder in scan_placeholders(body) {
        let value = placeholder.name().and_then(|name| effective.get(name));
        let Some(value) = value else {
            let problem = match placeholder.name() {
                Some(name) => CatalogIntegrityError::UndeclaredPlaceholder {
                    template: template.id.clone(),
                    placeholder: name.to_string(),
                },
                None => CatalogIntegrityError::MalformedPlaceholder {
                    template: template.id.clone(),
                    text: placeholder.text.to_string(),
                },
            };
            tracing::error!(template = %template.id, "catalog integrity error: {}", problem);
            return Err(RenderError::Integrity(vec![problem]));
        };
        out.push_str(&body[last..placeholder.start]);
        out.push_str(&display_value(value));
        last = placeholder.end;
    }
    out.push_str(&body[last..]);

    Ok(out)
}

/// Render many (template, values) pairs in parallel. Results keep input order.
pub fn render_batch(
    jobs: &[(&TemplateDefinition, &VariableValues)],
) -> Vec<Result<RenderedConfig, RenderError>> {
    jobs.par_iter()
        .map(|(template, values)| render(template, values))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TemplateCategory, VariableKind, VariableSchema};
    use serde_json::json;

    fn template(body: &str, variables: Vec<VariableSchema>) -> TemplateDefinition {
        TemplateDefinition {
            id: "test-template".into(),
            name: "Test".into(),
            description: String::new(),
            vendor: "Cisco".into(),
            model: "C9300".into(),
            firmware: "17.x".into(),
            category: TemplateCategory::Authentication,
            body: body.into(),
            variables,
            tags: vec![],
            use_cases: vec![],
            requirements: vec![],
            troubleshooting: vec![],
            references: vec![],
        }
    }

    fn values(v: Value) -> VariableValues {
        serde_json::from_value(v).unwrap()
    }

    fn host_template() -> TemplateDefinition {
        template(
            "set host {{host}}",
            vec![VariableSchema::new("host", VariableKind::text()).required()],
        )
    }

    #[test]
    fn test_simple_render() {
        let out = render(&host_template(), &values(json!({"host": "sw1"}))).unwrap();
        assert_eq!(out.text, "set host sw1");
        assert_eq!(out.effective_values.get("host"), Some(&json!("sw1")));
        assert!(out.ignored_values.is_empty());
    }

    #[test]
    fn test_missing_required() {
        let err = render(&host_template(), &VariableValues::new()).unwrap_err();
        assert_eq!(
            err,
            RenderError::Validation(vec![ValidationError::MissingRequiredVariable {
                variable: "host".into()
            }])
        );
    }

    #[test]
    fn test_select_option_not_allowed() {
        let t = template(
            "vlan {{vlan}}",
            vec![VariableSchema::new("vlan", VariableKind::select(["10", "20"]))],
        );
        let err = render(&t, &values(json!({"vlan": "30"}))).unwrap_err();
        let errors = err.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].reason(), "OptionNotAllowed");
        assert_eq!(errors[0].variable(), "vlan");
    }

    #[test]
    fn test_collects_every_missing_variable() {
        let t = template(
            "{{a}} {{b}} {{c}} {{d}}",
            vec![
                VariableSchema::new("a", VariableKind::text()).required(),
                VariableSchema::new("b", VariableKind::ip()).required(),
                VariableSchema::new("c", VariableKind::Number).required(),
                VariableSchema::new("d", VariableKind::text()),
            ],
        );
        let err = render(&t, &VariableValues::new()).unwrap_err();
        let missing = err
            .validation_errors()
            .iter()
            .filter(|e| matches!(e, ValidationError::MissingRequiredVariable { .. }))
            .count();
        assert_eq!(missing, 3);
        assert_eq!(err.validation_errors().len(), 3);
    }

    #[test]
    fn test_mixed_failures_all_reported() {
        let t = template(
            "{{ip}} {{flag}} {{host}}",
            vec![
                VariableSchema::new("ip", VariableKind::ip()).required(),
                VariableSchema::new("flag", VariableKind::Boolean),
                VariableSchema::new("host", VariableKind::text()).required(),
            ],
        );
        let err = render(&t, &values(json!({"ip": "300.1.1.1", "flag": "yes"}))).unwrap_err();
        let reasons: Vec<&str> = err.validation_errors().iter().map(|e| e.reason()).collect();
        assert_eq!(reasons, vec!["InvalidIPAddress", "TypeMismatch", "MissingRequiredVariable"]);
    }

    #[test]
    fn test_defaults_are_echoed() {
        let t = template(
            "radius-server {{server}} auth-port {{port}} {{note}}",
            vec![
                VariableSchema::new("server", VariableKind::ip()).required(),
                VariableSchema::new("port", VariableKind::Number).with_default(1812),
                VariableSchema::new("note", VariableKind::text()),
            ],
        );
        let out = render(&t, &values(json!({"server": "10.0.0.5", "extra": 1}))).unwrap();
        assert_eq!(out.text, "radius-server 10.0.0.5 auth-port 1812 ");
        assert_eq!(out.effective_values.get("port"), Some(&json!(1812)));
        assert_eq!(out.effective_values.get("note"), Some(&json!("")));
        assert_eq!(out.ignored_values, vec!["extra".to_string()]);
    }

    #[test]
    fn test_substituted_text_is_not_expanded() {
        let t = template(
            "a={{a}} b={{b}}",
            vec![
                VariableSchema::new("a", VariableKind::text()),
                VariableSchema::new("b", VariableKind::text()),
            ],
        );
        let out = render(&t, &values(json!({"a": "{{b}}", "b": "x"}))).unwrap();
        assert_eq!(out.text, "a={{b}} b=x");
    }

    #[test]
    fn test_repeated_placeholder() {
        let t = template(
            "hostname {{h}}\nbanner {{ h }}",
            vec![VariableSchema::new("h", VariableKind::text()).required()],
        );
        let out = render(&t, &values(json!({"h": "core1"}))).unwrap();
        assert_eq!(out.text, "hostname core1\nbanner core1");
    }

    #[test]
    fn test_malformed_placeholder_is_never_emitted() {
        let t = template(
            "hostname {{host}}\nradius-server {{radius server}}\nvlan {{1vlan}}",
            vec![VariableSchema::new("host", VariableKind::text()).required()],
        );
        let err = render(&t, &values(json!({"host": "sw1"}))).unwrap_err();
        match err {
            RenderError::Integrity(problems) => {
                assert_eq!(
                    problems,
                    vec![
                        CatalogIntegrityError::MalformedPlaceholder {
                            template: "test-template".into(),
                            text: "radius server".into(),
                        },
                        CatalogIntegrityError::MalformedPlaceholder {
                            template: "test-template".into(),
                            text: "1vlan".into(),
                        },
                    ]
                );
            }
            other => panic!("expected integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_undeclared_placeholder_is_fatal() {
        let t = template(
            "set host {{host}} {{domain}}",
            vec![VariableSchema::new("host", VariableKind::text())],
        );
        let err = render(&t, &values(json!({"host": "sw1", "domain": "lab"}))).unwrap_err();
        match err {
            RenderError::Integrity(problems) => {
                assert_eq!(
                    problems,
                    vec![CatalogIntegrityError::UndeclaredPlaceholder {
                        template: "test-template".into(),
                        placeholder: "domain".into(),
                    }]
                );
            }
            other => panic!("expected integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let t = template(
            "{{a}}-{{b}}-{{c}}",
            vec![
                VariableSchema::new("a", VariableKind::text()),
                VariableSchema::new("b", VariableKind::Boolean).with_default(true),
                VariableSchema::new("c", VariableKind::Number),
            ],
        );
        let v = values(json!({"a": "x", "c": 3.5}));
        let first = render(&t, &v).unwrap();
        let second = render(&t, &v).unwrap();
        assert_eq!(first.text, second.text);
        assert_eq!(first, second);
        assert_eq!(first.text, "x-true-3.5");
    }

    #[test]
    fn test_render_batch_keeps_order() {
        let t = host_template();
        let inputs: Vec<VariableValues> = (0..32)
            .map(|i| values(json!({ "host": format!("sw{}", i) })))
            .collect();
        let jobs: Vec<(&TemplateDefinition, &VariableValues)> =
            inputs.iter().map(|v| (&t, v)).collect();

        let results = render_batch(&jobs);
        assert_eq!(results.len(), 32);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.as_ref().unwrap().text, format!("set host sw{}", i));
        }
    }
}
