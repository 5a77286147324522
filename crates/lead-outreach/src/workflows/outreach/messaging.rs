use serde::{Deserialize, Serialize};

use super::domain::Lead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTone {
    Professional,
    Friendly,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTemplate {
    Intro,
    FollowUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCta {
    BookCall,
    Reply,
}

/// Knobs an SDR picks before a draft is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageGenerationControls {
    pub tone: MessageTone,
    pub template: MessageTemplate,
    pub cta: MessageCta,
}

/// Records which lead field backed a personalization token, for reviewer traceability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationEvidence {
    pub token: String,
    pub value: String,
    pub source: String,
    pub captured_at: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub subject: String,
    pub body: String,
    pub controls: MessageGenerationControls,
    pub personalization: Vec<PersonalizationEvidence>,
}

const EVIDENCE_SOURCE: &str = "lead_ingestion";

/// Template-driven drafter. Output depends only on the lead and the controls.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageDraftGenerator;

impl MessageDraftGenerator {
    pub fn generate(&self, lead: &Lead, controls: MessageGenerationControls) -> MessageDraft {
        let greeting = greeting_for_tone(controls.tone);
        let template_line = template_line(controls.template, lead);
        let cta_line = cta_line(controls.cta);

        let body = format!(
            "{greeting} {name},\n\n{template_line}\n\n{cta_line}\n\nBest,\nYour SDR Team",
            name = lead.full_name
        );

        let captured_at = lead.created_at.to_rfc3339();
        let personalization = [
            ("full_name", &lead.full_name, 0.99),
            ("title", &lead.title, 0.95),
            ("company", &lead.company, 0.95),
            ("profile_url", &lead.profile_url, 0.9),
        ]
        .into_iter()
        .map(|(token, value, confidence)| PersonalizationEvidence {
            token: token.to_string(),
            value: value.clone(),
            source: EVIDENCE_SOURCE.to_string(),
            captured_at: captured_at.clone(),
            confidence,
        })
        .collect();

        MessageDraft {
            subject: subject_for_template(controls.template, lead),
            body,
            controls,
            personalization,
        }
    }
}

fn greeting_for_tone(tone: MessageTone) -> &'static str {
    match tone {
        MessageTone::Friendly => "Hi",
        MessageTone::Direct => "Hello",
        MessageTone::Professional => "Good day",
    }
}

fn template_line(template: MessageTemplate, lead: &Lead) -> String {
    match template {
        MessageTemplate::FollowUp => format!(
            "I wanted to follow up because leaders in roles like {} at {} often ask us how to \
             improve outbound performance with less manual work.",
            lead.title, lead.company
        ),
        MessageTemplate::Intro => format!(
            "I noticed your work as {} at {} and thought a brief intro might be relevant to \
             your growth goals.",
            lead.title, lead.company
        ),
    }
}

fn cta_line(cta: MessageCta) -> &'static str {
    match cta {
        MessageCta::BookCall => {
            "Would you be open to a 15-minute call next week to compare approaches?"
        }
        MessageCta::Reply => "If this is relevant, just reply and I can share a short tailored plan.",
    }
}

fn subject_for_template(template: MessageTemplate, lead: &Lead) -> String {
    match template {
        MessageTemplate::FollowUp => format!("Following up for {}", lead.company),
        MessageTemplate::Intro => format!("Intro idea for {}", lead.company),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::outreach::domain::{DataSource, LeadId};
    use chrono::{TimeZone, Utc};

    fn lead() -> Lead {
        Lead {
            id: LeadId(7),
            full_name: "Alex Rivera".to_string(),
            title: "VP Sales".to_string(),
            company: "Orbit SaaS".to_string(),
            profile_url: "https://www.linkedin.com/in/alex-rivera".to_string(),
            source: DataSource::OfficialApi,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn friendly_intro_with_reply_cta() {
        let draft = MessageDraftGenerator.generate(
            &lead(),
            MessageGenerationControls {
                tone: MessageTone::Friendly,
                template: MessageTemplate::Intro,
                cta: MessageCta::Reply,
            },
        );

        assert_eq!(draft.subject, "Intro idea for Orbit SaaS");
        assert!(draft.body.starts_with("Hi Alex Rivera,"));
        assert!(draft.body.contains("just reply"));
        assert!(draft.body.ends_with("Best,\nYour SDR Team"));
        assert_eq!(draft.controls.tone, MessageTone::Friendly);
        let tokens: Vec<&str> = draft
            .personalization
            .iter()
            .map(|item| item.token.as_str())
            .collect();
        assert_eq!(tokens, vec!["full_name", "title", "company", "profile_url"]);
        assert_eq!(
            draft.personalization[0].captured_at,
            "2025-06-01T12:00:00+00:00"
        );
    }

    #[test]
    fn direct_follow_up_with_call_cta() {
        let draft = MessageDraftGenerator.generate(
            &lead(),
            MessageGenerationControls {
                tone: MessageTone::Direct,
                template: MessageTemplate::FollowUp,
                cta: MessageCta::BookCall,
            },
        );

        assert_eq!(draft.subject, "Following up for Orbit SaaS");
        assert!(draft.body.starts_with("Hello Alex Rivera,"));
        assert!(draft.body.contains("roles like VP Sales at Orbit SaaS"));
        assert!(draft.body.contains("15-minute call"));
    }

    #[test]
    fn controls_round_trip_with_snake_case_names() {
        let controls: MessageGenerationControls = serde_json::from_str(
            r#"{"tone":"professional","template":"follow_up","cta":"book_call"}"#,
        )
        .expect("controls parse");
        assert_eq!(controls.template, MessageTemplate::FollowUp);
        assert_eq!(controls.cta, MessageCta::BookCall);
    }
}
