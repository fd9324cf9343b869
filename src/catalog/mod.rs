mod integrity;
pub mod loader;
pub mod seeds;
pub mod watcher;

pub use integrity::{verify_template, CatalogIntegrityError};
pub use loader::build_catalog;
pub use watcher::{CatalogHandle, CatalogReloader};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{PlanningProfile, TemplateCategory, TemplateDefinition};
use crate::utils::normalize_token;

/// TemplateCatalog is an immutable, ordered collection of templates with
/// lookup indices derived once at construction.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<TemplateDefinition>,
    by_id: HashMap<String, usize>,
    by_vendor: BTreeMap<String, Vec<usize>>,
    by_model: BTreeMap<String, Vec<usize>>,
    by_category: BTreeMap<TemplateCategory, Vec<usize>>,
    /// (lowercased use case, template index), in catalog order
    use_cases: Vec<(String, usize)>,
}

/// Optional filters for a catalog query; set filters are ANDed together
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateFilter {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub category: Option<TemplateCategory>,
    #[serde(default)]
    pub use_case: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total: usize,
    pub by_vendor: BTreeMap<String, usize>,
    pub by_category: BTreeMap<TemplateCategory, usize>,
}

fn index_key(value: &str) -> String {
    value.trim().to_lowercase()
}

impl TemplateCatalog {
    /// Build a catalog, refusing duplicate ids and any template that fails
    /// verification. All problems are returned, not just the first.
    pub fn new(templates: Vec<TemplateDefinition>) -> Result<Self, Vec<CatalogIntegrityError>> {
        let mut problems = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for template in &templates {
            if !seen.insert(template.id.as_str()) {
                problems.push(CatalogIntegrityError::DuplicateTemplate(template.id.clone()));
            }
            problems.extend(verify_template(template));
        }

        if !problems.is_empty() {
            return Err(problems);
        }

        let mut catalog = Self {
            templates,
            by_id: HashMap::new(),
            by_vendor: BTreeMap::new(),
            by_model: BTreeMap::new(),
            by_category: BTreeMap::new(),
            use_cases: Vec::new(),
        };
        catalog.build_indices();
        Ok(catalog)
    }

    /// The catalog shipped with the binary
    pub fn builtin() -> Result<Self, Vec<CatalogIntegrityError>> {
        Self::new(seeds::default_templates())
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            templates: Vec::new(),
            by_id: HashMap::new(),
            by_vendor: BTreeMap::new(),
            by_model: BTreeMap::new(),
            by_category: BTreeMap::new(),
            use_cases: Vec::new(),
        }
    }

    fn build_indices(&mut self) {
        for (idx, t) in self.templates.iter().enumerate() {
            self.by_id.insert(t.id.clone(), idx);
            self.by_vendor.entry(index_key(&t.vendor)).or_default().push(idx);
            self.by_model.entry(index_key(&t.model)).or_default().push(idx);
            self.by_category.entry(t.category).or_default().push(idx);
            for use_case in &t.use_cases {
                self.use_cases.push((use_case.to_lowercase(), idx));
            }
        }
    }

    fn project(&self, indices: Option<&Vec<usize>>) -> Vec<&TemplateDefinition> {
        indices
            .map(|ids| ids.iter().map(|&i| &self.templates[i]).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn all(&self) -> &[TemplateDefinition] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&TemplateDefinition> {
        self.by_id.get(id).map(|&i| &self.templates[i])
    }

    /// Templates for a vendor (case-insensitive exact match)
    pub fn by_vendor(&self, vendor: &str) -> Vec<&TemplateDefinition> {
        self.project(self.by_vendor.get(&index_key(vendor)))
    }

    /// Templates for a model (case-insensitive exact match)
    pub fn by_model(&self, model: &str) -> Vec<&TemplateDefinition> {
        self.project(self.by_model.get(&index_key(model)))
    }

    pub fn by_category(&self, category: TemplateCategory) -> Vec<&TemplateDefinition> {
        self.project(self.by_category.get(&category))
    }

    /// Templates with at least one use case containing `needle`, case-insensitively.
    /// Each template appears once, in catalog order.
    pub fn by_use_case(&self, needle: &str) -> Vec<&TemplateDefinition> {
        let needle = needle.to_lowercase();
        let mut hits: Vec<usize> = Vec::new();
        for (use_case, idx) in &self.use_cases {
            if use_case.contains(&needle) && hits.last() != Some(idx) {
                hits.push(*idx);
            }
        }
        hits.iter().map(|&i| &self.templates[i]).collect()
    }

    /// Free-text search over id, name, description, tags and use cases
    pub fn search(&self, query: &str) -> Vec<&TemplateDefinition> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return self.templates.iter().collect();
        }
        self.templates
            .iter()
            .filter(|t| {
                t.id.to_lowercase().contains(&q)
                    || t.name.to_lowercase().contains(&q)
                    || t.description.to_lowercase().contains(&q)
                    || t.tags.iter().any(|s| s.to_lowercase().contains(&q))
                    || t.use_cases.iter().any(|s| s.to_lowercase().contains(&q))
            })
            .collect()
    }

    /// Apply every set filter; the result keeps catalog order
    pub fn query(&self, filter: &TemplateFilter) -> Vec<&TemplateDefinition> {
        let mut selected: Vec<bool> = vec![true; self.templates.len()];

        let mut restrict = |hits: Vec<&TemplateDefinition>| {
            let keep: HashSet<&str> = hits.iter().map(|t| t.id.as_str()).collect();
            for (idx, t) in self.templates.iter().enumerate() {
                if !keep.contains(t.id.as_str()) {
                    selected[idx] = false;
                }
            }
        };

        if let Some(vendor) = filter.vendor.as_deref().filter(|s| !s.trim().is_empty()) {
            restrict(self.by_vendor(vendor));
        }
        if let Some(model) = filter.model.as_deref().filter(|s| !s.trim().is_empty()) {
            restrict(self.by_model(model));
        }
        if let Some(category) = filter.category {
            restrict(self.by_category(category));
        }
        if let Some(use_case) = filter.use_case.as_deref().filter(|s| !s.trim().is_empty()) {
            restrict(self.by_use_case(use_case));
        }
        if let Some(q) = filter.q.as_deref() {
            restrict(self.search(q));
        }

        self.templates
            .iter()
            .zip(selected)
            .filter_map(|(t, keep)| keep.then_some(t))
            .collect()
    }

    /// Distinct vendor names, in first-seen spelling, sorted case-insensitively
    pub fn vendors(&self) -> Vec<&str> {
        self.by_vendor
            .values()
            .filter_map(|ids| ids.first())
            .map(|&i| self.templates[i].vendor.as_str())
            .collect()
    }

    pub fn categories(&self) -> Vec<TemplateCategory> {
        self.by_category.keys().copied().collect()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total: self.templates.len(),
            by_vendor: self
                .by_vendor
                .values()
                .filter_map(|ids| ids.first().map(|&i| (self.templates[i].vendor.clone(), ids.len())))
                .collect(),
            by_category: self
                .by_category
                .iter()
                .map(|(c, ids)| (*c, ids.len()))
                .collect(),
        }
    }

    /// Templates worth showing for a planning profile: templates of the
    /// profile's vendors whose use cases mention one of the requested
    /// authentication methods. When no use case matches, fall back to the
    /// vendors' Authentication templates.
    pub fn recommend(&self, profile: &PlanningProfile) -> Vec<&TemplateDefinition> {
        let vendor_templates: Vec<&TemplateDefinition> = self
            .templates
            .iter()
            .filter(|t| {
                let vendor = normalize_token(&t.vendor);
                profile
                    .network
                    .vendors
                    .iter()
                    .any(|v| !v.trim().is_empty() && normalize_token(v) == vendor)
            })
            .collect();

        let methods: Vec<String> = profile
            .use_cases
            .authentication_methods
            .iter()
            .map(|m| normalize_token(m))
            .filter(|m| !m.is_empty())
            .collect();

        let matched: Vec<&TemplateDefinition> = vendor_templates
            .iter()
            .copied()
            .filter(|t| {
                t.use_cases.iter().any(|uc| {
                    let uc = normalize_token(uc);
                    !uc.is_empty()
                        && methods.iter().any(|m| uc.contains(m.as_str()) || m.contains(uc.as_str()))
                })
            })
            .collect();

        if !matched.is_empty() {
            return matched;
        }

        vendor_templates
            .into_iter()
            .filter(|t| t.category == TemplateCategory::Authentication)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{VariableKind, VariableSchema};
    use crate::utils::scan_placeholders;
    use std::collections::BTreeSet;

    fn t(id: &str, vendor: &str, model: &str, category: TemplateCategory, use_cases: &[&str]) -> TemplateDefinition {
        TemplateDefinition {
            id: id.into(),
            name: format!("{} template", id),
            description: String::new(),
            vendor: vendor.into(),
            model: model.into(),
            firmware: String::new(),
            category,
            body: "hostname {{host}}".into(),
            variables: vec![VariableSchema::new("host", VariableKind::text())],
            tags: vec!["tag-".to_string() + id],
            use_cases: use_cases.iter().map(|s| s.to_string()).collect(),
            requirements: vec![],
            troubleshooting: vec![],
            references: vec![],
        }
    }

    fn sample() -> TemplateCatalog {
        TemplateCatalog::new(vec![
            t("a", "Cisco", "C9300", TemplateCategory::Authentication, &["802.1X wired", "MAB fallback"]),
            t("b", "Aruba", "CX 6300", TemplateCategory::Authentication, &["802.1X wired"]),
            t("c", "cisco", "C9800", TemplateCategory::Management, &["Device administration"]),
            t("d", "Juniper", "EX4300", TemplateCategory::Monitoring, &[]),
        ])
        .unwrap()
    }

    fn ids(list: Vec<&TemplateDefinition>) -> Vec<&str> {
        list.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_lookups() {
        let catalog = sample();
        assert_eq!(ids(catalog.by_vendor("CISCO")), vec!["a", "c"]);
        assert_eq!(ids(catalog.by_model("c9300")), vec!["a"]);
        assert_eq!(ids(catalog.by_category(TemplateCategory::Authentication)), vec!["a", "b"]);
        assert!(catalog.by_category(TemplateCategory::Integration).is_empty());
        assert!(catalog.by_vendor("Extreme").is_empty());
        assert_eq!(catalog.get("d").map(|t| t.vendor.as_str()), Some("Juniper"));
        assert!(catalog.get("zz").is_none());
    }

    #[test]
    fn test_by_use_case_substring() {
        let catalog = sample();
        // "a" has two matching use cases but is listed once
        assert_eq!(ids(catalog.by_use_case("WIRED")), vec!["a", "b"]);
        assert_eq!(ids(catalog.by_use_case("mab")), vec!["a"]);
        assert_eq!(ids(catalog.by_use_case("")), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = TemplateCatalog::new(vec![
            t("a", "Cisco", "C9300", TemplateCategory::Authentication, &[]),
            t("a", "Aruba", "CX", TemplateCategory::Authentication, &[]),
        ])
        .unwrap_err();
        assert_eq!(err, vec![CatalogIntegrityError::DuplicateTemplate("a".into())]);
    }

    #[test]
    fn test_query_combines_filters() {
        let catalog = sample();
        let filter = TemplateFilter {
            vendor: Some("cisco".into()),
            category: Some(TemplateCategory::Authentication),
            ..Default::default()
        };
        assert_eq!(ids(catalog.query(&filter)), vec!["a"]);

        let filter = TemplateFilter {
            q: Some("tag-b".into()),
            ..Default::default()
        };
        assert_eq!(ids(catalog.query(&filter)), vec!["b"]);
        assert_eq!(catalog.query(&TemplateFilter::default()).len(), 4);
    }

    #[test]
    fn test_vendors_and_stats() {
        let catalog = sample();
        assert_eq!(catalog.vendors(), vec!["Aruba", "Cisco", "Juniper"]);
        let stats = catalog.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_vendor.get("Cisco"), Some(&2));
        assert_eq!(stats.by_category.get(&TemplateCategory::Authentication), Some(&2));
        assert_eq!(
            catalog.categories(),
            vec![
                TemplateCategory::Authentication,
                TemplateCategory::Management,
                TemplateCategory::Monitoring
            ]
        );
    }

    #[test]
    fn test_recommend() {
        let catalog = sample();
        let mut profile = PlanningProfile::default();
        profile.network.vendors = vec!["cisco".into(), "Juniper".into()];
        profile.use_cases.authentication_methods = vec!["MAB".into()];
        assert_eq!(ids(catalog.recommend(&profile)), vec!["a"]);

        profile.use_cases.authentication_methods = vec!["Guest portal".into()];
        assert_eq!(ids(catalog.recommend(&profile)), vec!["a"]);

        profile.network.vendors = vec![];
        assert!(catalog.recommend(&profile).is_empty());
    }

    #[test]
    fn test_builtin_catalog_is_complete() {
        let catalog = TemplateCatalog::builtin().expect("builtin catalog verifies");
        assert!(!catalog.is_empty());

        for template in catalog.all() {
            let placeholders: BTreeSet<&str> =
                scan_placeholders(&template.body)
                    .iter()
                    .map(|p| p.name().expect("well-formed placeholder"))
                    .collect();
            let declared: BTreeSet<&str> =
                template.variables.iter().map(|v| v.name.as_str()).collect();
            assert_eq!(placeholders, declared, "template {}", template.id);
        }
    }

    #[test]
    fn test_indices_cover_every_template() {
        let catalog = TemplateCatalog::builtin().unwrap();
        let total: usize = catalog
            .categories()
            .into_iter()
            .map(|c| catalog.by_category(c).len())
            .sum();
        assert_eq!(total, catalog.len());

        let by_vendor: usize = catalog.vendors().iter().map(|v| catalog.by_vendor(v).len()).sum();
        assert_eq!(by_vendor, catalog.len());
    }
}
