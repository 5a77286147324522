mod config;
mod rules;

pub use config::IcpRuleConfig;

use super::domain::InboundLead;
use serde::{Deserialize, Serialize};

/// One rule's contribution to a lead score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdownItem {
    pub rule: String,
    pub points: u32,
    pub matched: bool,
    pub reason: String,
}

/// Composite score plus the ordered rule trail that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadScoreResult {
    pub score: u32,
    pub breakdown: Vec<ScoreBreakdownItem>,
}

/// Deterministic ICP fit scorer.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedScorer {
    config: IcpRuleConfig,
}

impl RuleBasedScorer {
    pub fn new(config: IcpRuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IcpRuleConfig {
        &self.config
    }

    pub fn score_lead(&self, lead: &InboundLead) -> LeadScoreResult {
        let breakdown = vec![
            rules::title_rule(lead, &self.config),
            rules::company_rule(lead, &self.config),
            rules::linkedin_rule(lead, &self.config),
            rules::completeness_rule(lead, &self.config),
        ];

        let raw = breakdown
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.points));
        let ceiling = self.config.max_score.max(self.config.min_score);
        let score = raw.clamp(self.config.min_score, ceiling);

        LeadScoreResult { score, breakdown }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::outreach::domain::DataSource;

    fn lead(title: &str, company: &str, profile_url: &str) -> InboundLead {
        InboundLead {
            full_name: "Jane Doe".to_string(),
            title: title.to_string(),
            company: company.to_string(),
            profile_url: profile_url.to_string(),
            source: DataSource::OfficialApi,
        }
    }

    #[test]
    fn default_profile_awards_full_marks() {
        let scorer = RuleBasedScorer::default();
        let result = scorer.score_lead(&lead(
            "Head of Sales",
            "Acme B2B SaaS",
            "https://www.linkedin.com/in/jane-doe",
        ));

        assert_eq!(result.score, 100);
        let rules: Vec<&str> = result.breakdown.iter().map(|item| item.rule.as_str()).collect();
        assert_eq!(
            rules,
            vec![
                "title_keyword_match",
                "company_keyword_match",
                "linkedin_profile_detected",
                "record_completeness"
            ]
        );
        assert!(result.breakdown.iter().all(|item| item.matched));
        assert_eq!(
            result.breakdown.iter().map(|item| item.points).collect::<Vec<_>>(),
            vec![35, 25, 15, 25]
        );
    }

    #[test]
    fn custom_keywords_match_case_insensitively() {
        let scorer = RuleBasedScorer::new(IcpRuleConfig {
            title_keywords: vec!["RevOps".to_string()],
            company_keywords: vec!["fintech".to_string()],
            title_match_points: 50,
            company_match_points: 20,
            linkedin_profile_points: 10,
            completeness_points: 10,
            ..IcpRuleConfig::default()
        });

        let result = scorer.score_lead(&lead(
            "RevOps Manager",
            "Atlas Fintech",
            "https://www.linkedin.com/in/john-smith",
        ));

        assert_eq!(result.score, 90);
        assert_eq!(result.breakdown[0].points, 50);
    }

    #[test]
    fn unmatched_rules_contribute_nothing_and_score_is_capped() {
        let scorer = RuleBasedScorer::new(IcpRuleConfig {
            max_score: 30,
            ..IcpRuleConfig::default()
        });

        let result = scorer.score_lead(&lead(
            "Associate",
            "Local Shop",
            "https://example.com/people/loser-two",
        ));

        assert_eq!(result.score, 25);
        assert!(!result.breakdown[0].matched);
        assert_eq!(result.breakdown[2].reason, "LinkedIn profile URL not detected");

        let capped = scorer.score_lead(&lead(
            "Head of Sales",
            "Acme SaaS",
            "https://linkedin.com/in/x",
        ));
        assert_eq!(capped.score, 30);
    }

    #[test]
    fn oversized_rule_points_saturate_at_max_score() {
        let scorer = RuleBasedScorer::new(IcpRuleConfig {
            title_match_points: u32::MAX,
            ..IcpRuleConfig::default()
        });

        let result = scorer.score_lead(&lead(
            "Head of Sales",
            "Acme B2B SaaS",
            "https://www.linkedin.com/in/jane-doe",
        ));

        assert_eq!(result.score, 100);
        assert_eq!(result.breakdown[0].points, u32::MAX);
    }
}
