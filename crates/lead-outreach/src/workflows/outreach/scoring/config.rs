use serde::{Deserialize, Serialize};

/// Ideal customer profile: keyword lists and the points each rule awards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IcpRuleConfig {
    pub title_keywords: Vec<String>,
    pub company_keywords: Vec<String>,
    pub min_score: u32,
    pub max_score: u32,
    pub title_match_points: u32,
    pub company_match_points: u32,
    pub linkedin_profile_points: u32,
    pub completeness_points: u32,
}

impl Default for IcpRuleConfig {
    fn default() -> Self {
        Self {
            title_keywords: vec![
                "head of sales".to_string(),
                "vp sales".to_string(),
                "sales director".to_string(),
            ],
            company_keywords: vec!["b2b".to_string(), "saas".to_string()],
            min_score: 0,
            max_score: 100,
            title_match_points: 35,
            company_match_points: 25,
            linkedin_profile_points: 15,
            completeness_points: 25,
        }
    }
}
