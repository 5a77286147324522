use super::super::domain::InboundLead;
use super::config::IcpRuleConfig;
use super::ScoreBreakdownItem;

pub(crate) fn title_rule(lead: &InboundLead, config: &IcpRuleConfig) -> ScoreBreakdownItem {
    let matched = contains_any(&lead.title, &config.title_keywords);
    ScoreBreakdownItem {
        rule: "title_keyword_match".to_string(),
        points: if matched { config.title_match_points } else { 0 },
        matched,
        reason: if matched {
            "Title matched ICP seniority/function keywords"
        } else {
            "No ICP title keywords matched"
        }
        .to_string(),
    }
}

pub(crate) fn company_rule(lead: &InboundLead, config: &IcpRuleConfig) -> ScoreBreakdownItem {
    let matched = contains_any(&lead.company, &config.company_keywords);
    ScoreBreakdownItem {
        rule: "company_keyword_match".to_string(),
        points: if matched {
            config.company_match_points
        } else {
            0
        },
        matched,
        reason: if matched {
            "Company matched ICP industry keywords"
        } else {
            "No ICP company keywords matched"
        }
        .to_string(),
    }
}

pub(crate) fn linkedin_rule(lead: &InboundLead, config: &IcpRuleConfig) -> ScoreBreakdownItem {
    let matched = lead.profile_url.to_lowercase().contains("linkedin.com");
    ScoreBreakdownItem {
        rule: "linkedin_profile_detected".to_string(),
        points: if matched {
            config.linkedin_profile_points
        } else {
            0
        },
        matched,
        reason: if matched {
            "LinkedIn profile URL is present"
        } else {
            "LinkedIn profile URL not detected"
        }
        .to_string(),
    }
}

pub(crate) fn completeness_rule(lead: &InboundLead, config: &IcpRuleConfig) -> ScoreBreakdownItem {
    let matched = [
        &lead.full_name,
        &lead.title,
        &lead.company,
        &lead.profile_url,
    ]
    .iter()
    .all(|field| !field.trim().is_empty());
    ScoreBreakdownItem {
        rule: "record_completeness".to_string(),
        points: if matched {
            config.completeness_points
        } else {
            0
        },
        matched,
        reason: if matched {
            "Lead record has complete core fields"
        } else {
            "Lead record missing one or more core fields"
        }
        .to_string(),
    }
}

// Case-insensitive on both sides; blank keywords never match.
fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .any(|keyword| !keyword.is_empty() && haystack.contains(&keyword))
}
