use serde::{Deserialize, Serialize};

use super::VariableSchema;

/// Functional area a configuration template belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TemplateCategory {
    Authentication,
    Authorization,
    Accounting,
    Management,
    Segmentation,
    Monitoring,
    Integration,
}

impl TemplateCategory {
    pub const ALL: &'static [TemplateCategory] = &[
        Self::Authentication,
        Self::Authorization,
        Self::Accounting,
        Self::Management,
        Self::Segmentation,
        Self::Monitoring,
        Self::Integration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication",
            Self::Authorization => "Authorization",
            Self::Accounting => "Accounting",
            Self::Management => "Management",
            Self::Segmentation => "Segmentation",
            Self::Monitoring => "Monitoring",
            Self::Integration => "Integration",
        }
    }
}

impl std::fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known problem with a template and how to fix it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroubleshootingEntry {
    pub issue: String,
    pub solution: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Documentation,
    Guide,
    Video,
    Community,
    Kb,
}

/// External reading for a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateReference {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
}

/// TemplateDefinition is a vendor/model-specific configuration blueprint.
/// `body` holds `{{variableName}}` placeholders, one declared variable per name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub vendor: String,
    pub model: String,
    #[serde(default)]
    pub firmware: String,
    pub category: TemplateCategory,
    pub body: String,
    #[serde(default)]
    pub variables: Vec<VariableSchema>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub troubleshooting: Vec<TroubleshootingEntry>,
    #[serde(default)]
    pub references: Vec<TemplateReference>,
}

impl TemplateDefinition {
    pub fn variable(&self, name: &str) -> Option<&VariableSchema> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// TemplateSummary is the list view of a template (no body or advisory data)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub vendor: String,
    pub model: String,
    pub firmware: String,
    pub category: TemplateCategory,
    pub tags: Vec<String>,
    pub use_cases: Vec<String>,
    pub variable_count: usize,
}

impl From<&TemplateDefinition> for TemplateSummary {
    fn from(t: &TemplateDefinition) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            vendor: t.vendor.clone(),
            model: t.model.clone(),
            firmware: t.firmware.clone(),
            category: t.category,
            tags: t.tags.clone(),
            use_cases: t.use_cases.clone(),
            variable_count: t.variables.len(),
        }
    }
}
