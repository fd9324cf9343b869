use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::models::TemplateDefinition;

use super::{seeds, TemplateCatalog};

/// List the `*.json` files of a template directory in filename order
pub fn template_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read template directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    files.sort();
    Ok(files)
}

/// Parse one catalog file. A file holds either a single template object or
/// an array of templates.
pub fn parse_template_file(content: &str) -> Result<Vec<TemplateDefinition>> {
    let value: Value = serde_json::from_str(content).context("Invalid JSON")?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value(item).with_context(|| format!("Invalid template at index {}", i))
            })
            .collect(),
        Value::Object(_) => Ok(vec![serde_json::from_value(value).context("Invalid template")?]),
        _ => Err(anyhow!("expected a template object or an array of templates")),
    }
}

/// Read every template in a directory, in filename order
pub fn load_dir(dir: &Path) -> Result<Vec<TemplateDefinition>> {
    let mut templates = Vec::new();
    for path in template_files(dir)? {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let parsed = parse_template_file(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("Loaded {} template(s) from {}", parsed.len(), path.display());
        templates.extend(parsed);
    }
    Ok(templates)
}

/// Overlay `extra` onto `base`: a template whose id already exists replaces
/// the earlier one in place, new ids are appended.
pub fn merge_templates(
    base: Vec<TemplateDefinition>,
    extra: Vec<TemplateDefinition>,
) -> Vec<TemplateDefinition> {
    let mut merged = base;
    for template in extra {
        if let Some(slot) = merged.iter_mut().find(|t| t.id == template.id) {
            tracing::info!("Template {} overridden by catalog directory", template.id);
            *slot = template;
        } else {
            merged.push(template);
        }
    }
    merged
}

/// Build the catalog served by the process: built-in templates plus, when a
/// directory is given, every template found there.
pub fn build_catalog(dir: Option<&Path>) -> Result<TemplateCatalog> {
    let mut templates = seeds::default_templates();

    if let Some(dir) = dir {
        let extra = load_dir(dir)?;
        templates = merge_templates(templates, extra);
    }

    TemplateCatalog::new(templates).map_err(|problems| {
        for problem in &problems {
            tracing::error!("catalog integrity error: {}", problem);
        }
        let summary: Vec<String> = problems.iter().map(|p| p.to_string()).collect();
        anyhow!("catalog rejected: {}", summary.join("; "))
    })
}
