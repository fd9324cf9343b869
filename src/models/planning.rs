use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::utils::normalize_token;

/// Organization size class collected by the scoping wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrganizationSize {
    #[serde(rename = "SMB", alias = "smb", alias = "startup", alias = "Startup")]
    Smb,
    #[default]
    #[serde(rename = "small", alias = "Small")]
    Small,
    #[serde(
        rename = "medium",
        alias = "Medium",
        alias = "Mid-Market",
        alias = "mid-market"
    )]
    Medium,
    #[serde(rename = "large", alias = "Large")]
    Large,
    #[serde(rename = "Enterprise", alias = "enterprise")]
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NetworkTopology {
    #[default]
    #[serde(alias = "flat")]
    Flat,
    #[serde(alias = "segmented")]
    Segmented,
    #[serde(rename = "Zero-Trust", alias = "ZeroTrust", alias = "zero-trust")]
    ZeroTrust,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    #[serde(default)]
    pub size: OrganizationSize,
    #[serde(default)]
    pub industry: String,
    #[serde(default = "default_site_count")]
    pub site_count: u32,
    #[serde(default)]
    pub compliance_frameworks: Vec<String>,
}

impl Default for OrganizationProfile {
    fn default() -> Self {
        Self {
            size: OrganizationSize::default(),
            industry: String::new(),
            site_count: default_site_count(),
            compliance_frameworks: Vec::new(),
        }
    }
}

fn default_site_count() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(default)]
    pub topology: NetworkTopology,
    #[serde(default)]
    pub endpoint_types: Vec<String>,
    #[serde(default)]
    pub vendors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCaseProfile {
    #[serde(default)]
    pub authentication_methods: Vec<String>,
    #[serde(default)]
    pub integrations: Vec<String>,
}

/// PlanningProfile is the structured description of an organization and its
/// network, used to derive a deployment plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningProfile {
    #[serde(default)]
    pub organization: OrganizationProfile,
    #[serde(default)]
    pub network: NetworkProfile,
    #[serde(default)]
    pub use_cases: UseCaseProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("site count must be at least 1, got {0}")]
    InvalidSiteCount(u32),
}

impl PlanningProfile {
    /// Caller-side checks; the rule engine itself accepts any profile
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.organization.site_count < 1 {
            return Err(ProfileError::InvalidSiteCount(self.organization.site_count));
        }
        Ok(())
    }

    pub fn is_enterprise(&self) -> bool {
        self.organization.size == OrganizationSize::Enterprise
    }

    pub fn site_count(&self) -> u32 {
        self.organization.site_count
    }

    /// Distinct compliance frameworks ("PCI DSS" and "pci-dss" count once)
    pub fn compliance_count(&self) -> usize {
        distinct_count(&self.organization.compliance_frameworks)
    }

    pub fn endpoint_type_count(&self) -> usize {
        distinct_count(&self.network.endpoint_types)
    }

    pub fn vendor_count(&self) -> usize {
        distinct_count(&self.network.vendors)
    }
}

fn distinct_count(values: &[String]) -> usize {
    values
        .iter()
        .map(|v| normalize_token(v))
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .len()
}

/// One itemised contribution to the timeline or complexity estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub reason: String,
    pub weight: u32,
}

/// PlanningResult is derived from a PlanningProfile and never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningResult {
    pub deployment_approach: String,
    pub phases: Vec<String>,
    pub estimated_weeks: u32,
    pub complexity_score: u32,
    pub risk_factors: Vec<String>,
}

/// Explanation of how each PlanningResult number was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningBreakdown {
    pub approach_rule: String,
    pub timeline: Vec<Contribution>,
    pub complexity: Vec<Contribution>,
    pub complexity_clamped: bool,
}
