// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Lead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderProfile {
    pub name: String,
    pub company: String,
}

impl Default for SenderProfile {
    fn default() -> Self {
        Self {
            name: "Your Name".to_owned(),
            company: "Your Company".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateEmail {
    pub subject: &'static str,
    pub content: &'static str,
    pub delay_days: u32,
    pub is_follow_up: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub emails: &'static [TemplateEmail],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub subject: &'static str,
    pub content: &'static str,
    pub category: &'static str,
}

pub static SEQUENCE_TEMPLATES: [SequenceTemplate; 2] = [
    SequenceTemplate {
        id: "intro",
        name: "Introduction Sequence",
        description: "A warm 3-email introduction sequence",
        emails: &[
            TemplateEmail {
                subject: "Introduction from {{senderCompany}}",
                content: "Hi {{firstName}},\n\nI hope this email finds you well. I'm reaching out because I've been following {{company}}'s work in the {{industry}} space and I'm impressed by what you're doing.\n\nI believe there might be some interesting synergies between our companies. Would you be open to a brief 15-minute conversation?\n\nBest regards,\n{{senderName}}",
                delay_days: 0,
                is_follow_up: false,
            },
            TemplateEmail {
                subject: "Following up - {{company}} partnership opportunity",
                content: "Hi {{firstName}},\n\nI wanted to follow up on my previous email about potential collaboration between {{company}} and our team.\n\nI understand you're likely busy, but I thought you might be interested in seeing how we've helped similar companies in your industry achieve:\n\n- 40% increase in operational efficiency\n- 25% reduction in costs\n- Streamlined workflows\n\nWould you have 15 minutes this week to explore how this might benefit {{company}}?\n\nBest regards,\n{{senderName}}",
                delay_days: 3,
                is_follow_up: true,
            },
            TemplateEmail {
                subject: "Final follow-up regarding {{company}}",
                content: "Hi {{firstName}},\n\nThis will be my final follow-up regarding the partnership opportunity I mentioned.\n\nI completely understand if you're not interested or if the timing isn't right. If that's the case, please feel free to let me know.\n\nHowever, if you'd like to learn more about how we can help {{company}}, I'm still happy to chat.\n\nBest regards,\n{{senderName}}",
                delay_days: 7,
                is_follow_up: true,
            },
        ],
    },
    SequenceTemplate {
        id: "value-prop",
        name: "Value Proposition Sequence",
        description: "Focus on specific business value and benefits",
        emails: &[
            TemplateEmail {
                subject: "How {{company}} can save 30% on operational costs",
                content: "Hi {{firstName}},\n\nI've been researching companies in the {{industry}} sector and noticed that {{company}} has been growing rapidly.\n\nBased on your role as {{title}}, I thought you might be interested in learning how companies like yours have reduced operational costs by 30% while improving efficiency.\n\nWould you be interested in a quick 10-minute call to discuss how this might apply to {{company}}?\n\nBest regards,\n{{senderName}}",
                delay_days: 0,
                is_follow_up: false,
            },
            TemplateEmail {
                subject: "Case study: 30% cost savings in {{industry}}",
                content: "Hi {{firstName}},\n\nI wanted to share a quick case study that might be relevant to {{company}}.\n\nWe recently helped a company in the {{industry}} space achieve:\n\n- 30% reduction in operational costs\n- 50% faster processing times\n- 95% accuracy improvement\n\nI'd be happy to share more details about how they achieved these results and how it might apply to {{company}}.\n\nWould you have 15 minutes for a brief call this week?\n\nBest regards,\n{{senderName}}",
                delay_days: 5,
                is_follow_up: true,
            },
        ],
    },
];

pub static EMAIL_TEMPLATES: [EmailTemplate; 2] = [
    EmailTemplate {
        id: "intro-1",
        name: "Professional Introduction",
        subject: "Introduction from {{senderName}} at {{senderCompany}}",
        content: "Hi {{firstName}},\n\nI hope this email finds you well. I'm {{senderName}} from {{senderCompany}}, and I've been following {{company}}'s impressive work.\n\nI believe there might be some interesting synergies between our companies. Would you be open to a brief conversation?\n\nBest regards,\n{{senderName}}",
        category: "introduction",
    },
    EmailTemplate {
        id: "follow-1",
        name: "Gentle Follow-up",
        subject: "Following up on our conversation - {{company}}",
        content: "Hi {{firstName}},\n\nI wanted to follow up on my previous email about potential collaboration between {{company}} and {{senderCompany}}.\n\nWould you have 15 minutes this week to explore how this might benefit {{company}}?\n\nBest regards,\n{{senderName}}",
        category: "follow-up",
    },
];

pub fn sequence_template(id: &str) -> Option<&'static SequenceTemplate> {
    SEQUENCE_TEMPLATES.iter().find(|template| template.id == id)
}

pub fn email_template(id: &str) -> Option<&'static EmailTemplate> {
    EMAIL_TEMPLATES.iter().find(|template| template.id == id)
}

fn placeholder_value(name: &str, lead: &Lead, sender: &SenderProfile) -> Option<String> {
    let value: &str = match name {
        "firstName" => lead.first_name(),
        "name" => &lead.name,
        "company" => &lead.company,
        "industry" => &lead.industry,
        "title" => &lead.title,
        "location" => &lead.location,
        "senderName" => &sender.name,
        "senderCompany" => &sender.company,
        _ => return None,
    };
    Some(value.to_owned())
}

/// Replaces each `{{name}}` token with what `visit` returns for it, keeping
/// the token when `visit` returns `None`.
fn expand(text: &str, mut visit: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };
        out.push_str(&rest[..open]);
        let name = &after_open[..close];
        match visit(name) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }
    out.push_str(rest);
    out
}

/// Substitutes lead and sender fields; unknown placeholders stay verbatim.
pub fn render_template(text: &str, lead: &Lead, sender: &SenderProfile) -> String {
    expand(text, |name| placeholder_value(name, lead, sender))
}

/// Placeholder names in order of first appearance.
pub fn placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    expand(text, |name| {
        if !name.is_empty() && !names.iter().any(|seen| seen == name) {
            names.push(name.to_owned());
        }
        None
    });
    names
}

#[cfg(test)]
mod tests {
    use super::{
        EMAIL_TEMPLATES, SEQUENCE_TEMPLATES, SenderProfile, placeholders, render_template,
        sequence_template,
    };
    use crate::{Lead, LeadId, NewLead, SOURCE_AI_CHAT};
    use time::macros::datetime;

    fn sarah() -> Lead {
        NewLead {
            name: "Sarah Chen".to_owned(),
            title: "Chief Technology Officer".to_owned(),
            company: "FinanceFlow".to_owned(),
            industry: "Financial Technology".to_owned(),
            location: "San Francisco, CA".to_owned(),
            ..NewLead::default()
        }
        .into_lead(
            LeadId::new(1),
            SOURCE_AI_CHAT,
            datetime!(2026-03-01 09:00 UTC),
        )
    }

    #[test]
    fn renders_known_placeholders() {
        let sender = SenderProfile {
            name: "Alex".to_owned(),
            company: "Acme".to_owned(),
        };
        let rendered = render_template(
            "Hi {{firstName}} ({{title}}) at {{company}}, {{location}} -- {{senderName}}/{{senderCompany}}",
            &sarah(),
            &sender,
        );
        assert_eq!(
            rendered,
            "Hi Sarah (Chief Technology Officer) at FinanceFlow, San Francisco, CA -- Alex/Acme"
        );
    }

    #[test]
    fn unknown_and_unclosed_placeholders_stay_verbatim() {
        let rendered = render_template(
            "{{name}} {{budget}} {{unclosed",
            &sarah(),
            &SenderProfile::default(),
        );
        assert_eq!(rendered, "Sarah Chen {{budget}} {{unclosed");
    }

    #[test]
    fn placeholders_listed_once_in_first_seen_order() {
        assert_eq!(
            placeholders("{{company}} {{firstName}} {{company}} {{}} {{x"),
            vec!["company", "firstName"]
        );
    }

    #[test]
    fn builtin_templates_have_expected_shape() {
        let intro = sequence_template("intro").expect("intro template");
        assert_eq!(intro.name, "Introduction Sequence");
        let delays: Vec<u32> = intro.emails.iter().map(|email| email.delay_days).collect();
        assert_eq!(delays, vec![0, 3, 7]);

        let value = &SEQUENCE_TEMPLATES[1];
        assert_eq!(value.name, "Value Proposition Sequence");
        assert_eq!(value.emails.len(), 2);
        assert_eq!(value.emails[1].delay_days, 5);

        let names: Vec<&str> = EMAIL_TEMPLATES.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Professional Introduction", "Gentle Follow-up"]);
    }

    #[test]
    fn every_template_placeholder_is_renderable() {
        let lead = sarah();
        let sender = SenderProfile::default();
        for template in SEQUENCE_TEMPLATES {
            for email in template.emails {
                let rendered = render_template(email.content, &lead, &sender);
                assert!(placeholders(&rendered).is_empty(), "{}", template.name);
            }
        }
    }
}
