//! Rule tables for the deployment planner.
//!
//! Each table is evaluated in declaration order. For the approach table the
//! first matching rule wins, so its order is part of the contract.

use crate::models::{NetworkTopology, PlanningProfile};
use crate::utils::normalize_token;

/// Picks the deployment approach when `applies` holds
pub struct ApproachRule {
    pub name: &'static str,
    pub applies: fn(&PlanningProfile) -> bool,
    pub approach: &'static str,
}

/// Adds `weight` to an estimate when `applies` holds
pub struct Adjustment {
    pub reason: &'static str,
    pub applies: fn(&PlanningProfile) -> bool,
    pub weight: u32,
}

/// Flags `risk` when `applies` holds; risk rules are independent
pub struct RiskRule {
    pub applies: fn(&PlanningProfile) -> bool,
    pub risk: &'static str,
}

pub const ENTERPRISE_MULTI_SITE_THRESHOLD: u32 = 10;
pub const COMPLIANCE_HEAVY_THRESHOLD: usize = 2;
pub const MULTI_SITE_THRESHOLD: u32 = 5;
pub const ENDPOINT_DIVERSITY_THRESHOLD: usize = 6;
pub const VENDOR_COMPLEXITY_THRESHOLD: usize = 3;
pub const VENDOR_RISK_THRESHOLD: usize = 4;

pub const TIMELINE_BASE_WEEKS: u32 = 8;
pub const COMPLEXITY_BASE: u32 = 3;
pub const COMPLEXITY_MIN: u32 = 1;
pub const COMPLEXITY_MAX: u32 = 10;

/// Frameworks whose audits demand evidence of NAC policy enforcement
pub const HIGH_SCRUTINY_FRAMEWORKS: &[&str] = &["HIPAA", "PCI-DSS"];

fn enterprise_multi_site(p: &PlanningProfile) -> bool {
    p.is_enterprise() && p.site_count() > ENTERPRISE_MULTI_SITE_THRESHOLD
}

fn compliance_heavy(p: &PlanningProfile) -> bool {
    p.compliance_count() > COMPLIANCE_HEAVY_THRESHOLD
}

fn zero_trust(p: &PlanningProfile) -> bool {
    p.network.topology == NetworkTopology::ZeroTrust
}

fn enterprise(p: &PlanningProfile) -> bool {
    p.is_enterprise()
}

/// Enterprise rollouts already carry the multi-site effort in their own weight
fn multi_site(p: &PlanningProfile) -> bool {
    !p.is_enterprise() && p.site_count() > MULTI_SITE_THRESHOLD
}

fn diverse_endpoints(p: &PlanningProfile) -> bool {
    p.endpoint_type_count() > ENDPOINT_DIVERSITY_THRESHOLD
}

fn many_vendors(p: &PlanningProfile) -> bool {
    p.vendor_count() > VENDOR_COMPLEXITY_THRESHOLD
}

fn vendor_sprawl(p: &PlanningProfile) -> bool {
    p.vendor_count() > VENDOR_RISK_THRESHOLD
}

fn high_scrutiny_compliance(p: &PlanningProfile) -> bool {
    p.organization.compliance_frameworks.iter().any(|f| {
        let f = normalize_token(f);
        HIGH_SCRUTINY_FRAMEWORKS
            .iter()
            .any(|h| normalize_token(h) == f)
    })
}

fn certificate_dot1x(p: &PlanningProfile) -> bool {
    p.use_cases.authentication_methods.iter().any(|m| {
        let m = normalize_token(m);
        m.contains("eaptls") || (m.contains("8021x") && m.contains("cert"))
    })
}

fn iot_endpoints(p: &PlanningProfile) -> bool {
    p.network
        .endpoint_types
        .iter()
        .any(|e| normalize_token(e).contains("iot"))
}

pub const APPROACH_RULES: &[ApproachRule] = &[
    ApproachRule {
        name: "enterprise-multi-site",
        applies: enterprise_multi_site,
        approach: "phased enterprise rollout",
    },
    ApproachRule {
        name: "compliance-heavy",
        applies: compliance_heavy,
        approach: "compliance-first approach",
    },
    ApproachRule {
        name: "zero-trust-topology",
        applies: zero_trust,
        approach: "zero trust implementation",
    },
];

pub const DEFAULT_APPROACH_RULE: &str = "default";
pub const DEFAULT_APPROACH: &str = "standard deployment";

pub const BASE_PHASES: &[&str] = &["Discovery & Planning", "Design & Architecture"];
pub const ENTERPRISE_PHASES: &[&str] = &[
    "Pilot Implementation",
    "Phased Rollout",
    "Production Deployment",
];
pub const STANDARD_PHASES: &[&str] = &["Implementation", "Testing & Validation"];
pub const FINAL_PHASE: &str = "Go-Live & Support";

pub const TIMELINE_ADJUSTMENTS: &[Adjustment] = &[
    Adjustment {
        reason: "enterprise organization",
        applies: enterprise,
        weight: 8,
    },
    Adjustment {
        reason: "more than 5 sites outside an enterprise rollout",
        applies: multi_site,
        weight: 4,
    },
    Adjustment {
        reason: "more than 2 compliance frameworks",
        applies: compliance_heavy,
        weight: 2,
    },
    Adjustment {
        reason: "more than 6 endpoint types",
        applies: diverse_endpoints,
        weight: 2,
    },
];

pub const COMPLEXITY_ADJUSTMENTS: &[Adjustment] = &[
    Adjustment {
        reason: "enterprise organization",
        applies: enterprise,
        weight: 2,
    },
    Adjustment {
        reason: "zero trust topology",
        applies: zero_trust,
        weight: 2,
    },
    Adjustment {
        reason: "more than 2 compliance frameworks",
        applies: compliance_heavy,
        weight: 1,
    },
    Adjustment {
        reason: "more than 3 network vendors",
        applies: many_vendors,
        weight: 1,
    },
];

pub const RISK_RULES: &[RiskRule] = &[
    RiskRule {
        applies: vendor_sprawl,
        risk: "Multi-vendor integration complexity",
    },
    RiskRule {
        applies: high_scrutiny_compliance,
        risk: "Compliance validation and audit evidence requirements",
    },
    RiskRule {
        applies: certificate_dot1x,
        risk: "Certificate-based 802.1X requires PKI expertise",
    },
    RiskRule {
        applies: iot_endpoints,
        risk: "IoT device diversity requires granular policies",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_rule_order() {
        let names: Vec<&str> = APPROACH_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["enterprise-multi-site", "compliance-heavy", "zero-trust-topology"]
        );
    }

    #[test]
    fn test_high_scrutiny_matching() {
        let mut p = PlanningProfile::default();
        p.organization.compliance_frameworks = vec!["pci dss".into()];
        assert!(high_scrutiny_compliance(&p));
        p.organization.compliance_frameworks = vec!["hipaa".into()];
        assert!(high_scrutiny_compliance(&p));
        p.organization.compliance_frameworks = vec!["SOC 2".into(), "ISO 27001".into()];
        assert!(!high_scrutiny_compliance(&p));
    }

    #[test]
    fn test_certificate_dot1x_matching() {
        let mut p = PlanningProfile::default();
        for method in ["EAP-TLS", "802.1X (Certificate)", "certificate-based 802.1x"] {
            p.use_cases.authentication_methods = vec![method.into()];
            assert!(certificate_dot1x(&p), "{}", method);
        }
        for method in ["802.1X (PEAP)", "MAB", "Certificate portal"] {
            p.use_cases.authentication_methods = vec![method.into()];
            assert!(!certificate_dot1x(&p), "{}", method);
        }
    }

    #[test]
    fn test_iot_matching() {
        let mut p = PlanningProfile::default();
        p.network.endpoint_types = vec!["Laptops".into(), "IoT Sensors".into()];
        assert!(iot_endpoints(&p));
        p.network.endpoint_types = vec!["Laptops".into()];
        assert!(!iot_endpoints(&p));
    }
}
