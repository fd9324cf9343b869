pub mod rules;

use crate::models::{Contribution, PlanningBreakdown, PlanningProfile, PlanningResult};

use rules::*;

/// Approach and the name of the rule that chose it
fn approach_with_rule(profile: &PlanningProfile) -> (&'static str, &'static str) {
    APPROACH_RULES
        .iter()
        .find(|rule| (rule.applies)(profile))
        .map(|rule| (rule.name, rule.approach))
        .unwrap_or((DEFAULT_APPROACH_RULE, DEFAULT_APPROACH))
}

fn contributions(profile: &PlanningProfile, table: &[Adjustment]) -> Vec<Contribution> {
    table
        .iter()
        .filter(|adj| (adj.applies)(profile))
        .map(|adj| Contribution {
            reason: adj.reason.to_string(),
            weight: adj.weight,
        })
        .collect()
}

fn total(base: u32, items: &[Contribution]) -> u32 {
    base + items.iter().map(|c| c.weight).sum::<u32>()
}

/// First matching approach rule, or "standard deployment"
pub fn deployment_approach(profile: &PlanningProfile) -> &'static str {
    approach_with_rule(profile).1
}

pub fn phases(profile: &PlanningProfile) -> Vec<String> {
    let middle = if profile.is_enterprise() {
        ENTERPRISE_PHASES
    } else {
        STANDARD_PHASES
    };

    BASE_PHASES
        .iter()
        .chain(middle)
        .chain(std::iter::once(&FINAL_PHASE))
        .map(|s| s.to_string())
        .collect()
}

/// Additive estimate in weeks; no cap
pub fn estimated_weeks(profile: &PlanningProfile) -> u32 {
    total(TIMELINE_BASE_WEEKS, &contributions(profile, TIMELINE_ADJUSTMENTS))
}

/// Score in 1..=10
pub fn complexity_score(profile: &PlanningProfile) -> u32 {
    total(COMPLEXITY_BASE, &contributions(profile, COMPLEXITY_ADJUSTMENTS))
        .clamp(COMPLEXITY_MIN, COMPLEXITY_MAX)
}

pub fn risk_factors(profile: &PlanningProfile) -> Vec<String> {
    RISK_RULES
        .iter()
        .filter(|rule| (rule.applies)(profile))
        .map(|rule| rule.risk.to_string())
        .collect()
}

/// Derive the full plan for a profile. Pure: same profile, same plan.
pub fn plan(profile: &PlanningProfile) -> PlanningResult {
    let result = PlanningResult {
        deployment_approach: deployment_approach(profile).to_string(),
        phases: phases(profile),
        estimated_weeks: estimated_weeks(profile),
        complexity_score: complexity_score(profile),
        risk_factors: risk_factors(profile),
    };
    tracing::debug!(
        approach = %result.deployment_approach,
        weeks = result.estimated_weeks,
        complexity = result.complexity_score,
        risks = result.risk_factors.len(),
        "planning result derived"
    );
    result
}

/// Itemised reasons behind the numbers in `plan`
pub fn explain(profile: &PlanningProfile) -> PlanningBreakdown {
    let complexity = contributions(profile, COMPLEXITY_ADJUSTMENTS);
    let raw = total(COMPLEXITY_BASE, &complexity);

    PlanningBreakdown {
        approach_rule: approach_with_rule(profile).0.to_string(),
        timeline: contributions(profile, TIMELINE_ADJUSTMENTS),
        complexity_clamped: raw > COMPLEXITY_MAX,
        complexity,
    }
}
