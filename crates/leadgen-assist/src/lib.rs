// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod task;

pub use task::{CancelToken, SimulatedTask};

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Result, bail};
use leadgen_app::{Chance, NewLead};

pub const DEFAULT_GENERATION_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_CHAT_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_DRAFT_DELAY: Duration = Duration::from_millis(600);
pub const CHAT_TITLE_MAX_CHARS: usize = 50;

/// Subject and body produced by the simulated email writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftEmail {
    pub subject: &'static str,
    pub content: &'static str,
}

const DRAFTS: [DraftEmail; 2] = [
    DraftEmail {
        subject: "Partnership opportunity with {{company}}",
        content: "Hi {{firstName}},\n\nI've been researching innovative companies in the {{industry}} space and {{company}} caught my attention.\n\nI believe there's a great opportunity for collaboration between our companies. Would you be interested in a brief 15-minute call to explore this?\n\nBest regards,\n{{senderName}}",
    },
    DraftEmail {
        subject: "Quick question about {{company}}'s growth",
        content: "Hi {{firstName}},\n\nI noticed {{company}}'s impressive growth trajectory and wanted to reach out.\n\nWe've helped similar companies in your industry streamline their operations and increase efficiency by 30-40%.\n\nWould you be open to a quick chat about how this might apply to {{company}}?\n\nBest,\n{{senderName}}",
    },
];

/// Session title for a prompt: the first 50 characters, with `...` appended
/// when the prompt was longer.
pub fn chat_title_for(prompt: &str) -> String {
    let mut title: String = prompt.chars().take(CHAT_TITLE_MAX_CHARS).collect();
    if prompt.chars().count() > CHAT_TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

pub fn chat_reply(input: &str) -> String {
    format!(
        "I understand you're asking about: {input}. This is a simulated response. In a real application, this would connect to an AI service."
    )
}

pub fn draft_email(chance: &mut dyn Chance) -> DraftEmail {
    let index = (chance.roll() * DRAFTS.len() as f64) as usize;
    DRAFTS[index.min(DRAFTS.len() - 1)]
}

/// Canned prospects for a prompt. Every lead carries the prompt's chat title.
pub fn generate_leads(prompt: &str) -> Result<Vec<NewLead>> {
    if prompt.trim().is_empty() {
        bail!("prompt is required -- describe the leads you want and retry");
    }

    let chat_title = chat_title_for(prompt);
    let leads = vec![
        canned_lead(
            CannedLead {
                name: "Sarah Chen",
                title: "Chief Technology Officer",
                company: "FinanceFlow",
                email: "sarah.chen@financeflow.com",
                phone: Some("+1 (555) 123-4567"),
                linkedin_url: "linkedin.com/in/sarahchen",
                industry: "Financial Technology",
                description: "Experienced CTO leading digital transformation at a fast-growing fintech startup. Focuses on scalable payment solutions and regulatory compliance technology.",
                score: 92,
                tags: &["CTO", "Fintech", "Series B", "Payment Solutions"],
                category: "High Value",
            },
            &chat_title,
        ),
        canned_lead(
            CannedLead {
                name: "Michael Rodriguez",
                title: "VP of Engineering",
                company: "PayScale Pro",
                email: "m.rodriguez@payscalepro.com",
                phone: Some("+1 (555) 234-5678"),
                linkedin_url: "linkedin.com/in/mrodriguez",
                industry: "Financial Technology",
                description: "VP of Engineering with expertise in building secure financial platforms. Previously led teams at two successful fintech exits.",
                score: 88,
                tags: &["VP Engineering", "Security", "Team Leadership"],
                category: "High Value",
            },
            &chat_title,
        ),
        canned_lead(
            CannedLead {
                name: "Jennifer Kim",
                title: "Head of Product",
                company: "CryptoLogic",
                email: "jennifer.kim@cryptologic.io",
                phone: None,
                linkedin_url: "linkedin.com/in/jenniferkim",
                industry: "Cryptocurrency",
                description: "Product leader driving innovation in DeFi solutions. Strong background in user experience and regulatory compliance.",
                score: 85,
                tags: &["Product Manager", "DeFi", "UX", "Compliance"],
                category: "Medium Value",
            },
            &chat_title,
        ),
    ];
    tracing::debug!(count = leads.len(), chat_title = %chat_title, "generated leads");
    Ok(leads)
}

struct CannedLead {
    name: &'static str,
    title: &'static str,
    company: &'static str,
    email: &'static str,
    phone: Option<&'static str>,
    linkedin_url: &'static str,
    industry: &'static str,
    description: &'static str,
    score: u8,
    tags: &'static [&'static str],
    category: &'static str,
}

fn canned_lead(lead: CannedLead, chat_title: &str) -> NewLead {
    NewLead {
        name: lead.name.to_owned(),
        title: lead.title.to_owned(),
        company: lead.company.to_owned(),
        email: lead.email.to_owned(),
        phone: lead.phone.map(str::to_owned),
        linkedin_url: Some(lead.linkedin_url.to_owned()),
        industry: lead.industry.to_owned(),
        location: "San Francisco, CA".to_owned(),
        description: lead.description.to_owned(),
        category: Some(lead.category.to_owned()),
        chat_title: Some(chat_title.to_owned()),
        tags: lead
            .tags
            .iter()
            .map(|tag| (*tag).to_owned())
            .collect::<BTreeSet<_>>(),
        score: lead.score,
    }
}

/// Latency settings for the simulated assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assistant {
    generation_delay: Duration,
    chat_delay: Duration,
    draft_delay: Duration,
}

impl Default for Assistant {
    fn default() -> Self {
        Self {
            generation_delay: DEFAULT_GENERATION_DELAY,
            chat_delay: DEFAULT_CHAT_DELAY,
            draft_delay: DEFAULT_DRAFT_DELAY,
        }
    }
}

impl Assistant {
    pub fn new(generation_delay: Duration, chat_delay: Duration, draft_delay: Duration) -> Self {
        Self {
            generation_delay,
            chat_delay,
            draft_delay,
        }
    }

    pub fn generation_delay(&self) -> Duration {
        self.generation_delay
    }

    pub fn chat_delay(&self) -> Duration {
        self.chat_delay
    }

    pub fn draft_delay(&self) -> Duration {
        self.draft_delay
    }

    pub fn spawn_generation<D>(&self, prompt: &str, deliver: D) -> Result<SimulatedTask>
    where
        D: FnOnce(Vec<NewLead>) + Send + 'static,
    {
        let leads = generate_leads(prompt)?;
        SimulatedTask::spawn("generate", self.generation_delay, move || leads, deliver)
    }

    pub fn spawn_chat_reply<D>(&self, input: &str, deliver: D) -> Result<SimulatedTask>
    where
        D: FnOnce(String) + Send + 'static,
    {
        let reply = chat_reply(input);
        SimulatedTask::spawn("chat", self.chat_delay, move || reply, deliver)
    }

    pub fn spawn_draft<D>(&self, prompt: &str, deliver: D) -> Result<SimulatedTask>
    where
        D: FnOnce(DraftEmail) + Send + 'static,
    {
        if prompt.trim().is_empty() {
            bail!("email prompt is required -- describe the email and retry");
        }
        SimulatedTask::spawn(
            "draft",
            self.draft_delay,
            move || draft_email(&mut fastrand::Rng::new()),
            deliver,
        )
    }
}
