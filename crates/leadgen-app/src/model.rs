// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

pub const SOURCE_AI_CHAT: &str = "AI Chat";
pub const SOURCE_MANUAL_ENTRY: &str = "Manual Entry";

pub const DEFAULT_LEAD_CATEGORIES: [&str; 5] = [
    "High Value",
    "Medium Value",
    "Low Value",
    "Prospects",
    "Hot Leads",
];

pub const DEFAULT_CAMPAIGN_CATEGORIES: [&str; 4] = [
    "Q4 2024",
    "Partnerships",
    "Product Launch",
    "Customer Acquisition",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadSortField {
    Name,
    Title,
    Company,
    Industry,
    Score,
    GeneratedAt,
}

impl LeadSortField {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Title,
        Self::Company,
        Self::Industry,
        Self::Score,
        Self::GeneratedAt,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Company => "company",
            Self::Industry => "industry",
            Self::Score => "score",
            Self::GeneratedAt => "generated_at",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::Name),
            "title" => Some(Self::Title),
            "company" => Some(Self::Company),
            "industry" => Some(Self::Industry),
            "score" => Some(Self::Score),
            "generated_at" => Some(Self::GeneratedAt),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Company => "company",
            Self::Industry => "industry",
            Self::Score => "score",
            Self::GeneratedAt => "generated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignPriority {
    Low,
    Medium,
    High,
}

impl CampaignPriority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

impl SequenceStatus {
    pub const ALL: [Self; 4] = [Self::Draft, Self::Active, Self::Paused, Self::Completed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    Scheduled,
    Sent,
    Opened,
    Replied,
}

impl ActivityStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Sent => "sent",
            Self::Opened => "opened",
            Self::Replied => "replied",
        }
    }
}

/// Sidebar sections of the authenticated dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    Generate,
    Leads,
    Campaigns,
    Outreach,
    Analytics,
    Templates,
}

impl Section {
    pub const ALL: [Self; 6] = [
        Self::Generate,
        Self::Leads,
        Self::Campaigns,
        Self::Outreach,
        Self::Analytics,
        Self::Templates,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Leads => "leads",
            Self::Campaigns => "campaigns",
            Self::Outreach => "outreach",
            Self::Analytics => "analytics",
            Self::Templates => "templates",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "generate" => Some(Self::Generate),
            "leads" => Some(Self::Leads),
            "campaigns" => Some(Self::Campaigns),
            "outreach" => Some(Self::Outreach),
            "analytics" => Some(Self::Analytics),
            "templates" => Some(Self::Templates),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Leads => "leads",
            Self::Campaigns => "campaigns",
            Self::Outreach => "outreach",
            Self::Analytics => "analytics",
            Self::Templates => "templates",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub industry: String,
    pub location: String,
    pub description: String,
    pub category: Option<String>,
    pub chat_title: Option<String>,
    pub tags: BTreeSet<String>,
    pub score: u8,
    pub starred: bool,
    pub generated_at: OffsetDateTime,
    pub source: String,
}

impl Lead {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or_default()
    }
}

/// A lead before it joins a collection: no id, star or timestamp yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewLead {
    pub name: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub industry: String,
    pub location: String,
    pub description: String,
    pub category: Option<String>,
    pub chat_title: Option<String>,
    pub tags: BTreeSet<String>,
    pub score: u8,
}

impl NewLead {
    pub fn into_lead(self, id: LeadId, source: &str, generated_at: OffsetDateTime) -> Lead {
        Lead {
            id,
            name: self.name,
            title: self.title,
            company: self.company,
            email: self.email,
            phone: self.phone,
            linkedin_url: self.linkedin_url,
            industry: self.industry,
            location: self.location,
            description: self.description,
            category: self.category,
            chat_title: self.chat_title,
            tags: self.tags,
            score: self.score,
            starred: false,
            generated_at,
            source: source.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub description: String,
    pub leads: Vec<Lead>,
    pub created_at: OffsetDateTime,
    pub priority: Option<CampaignPriority>,
    pub goal: Option<String>,
    pub category: Option<String>,
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachEmail {
    pub id: EmailId,
    pub subject: String,
    pub content: String,
    pub delay_days: u32,
    pub is_follow_up: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachSequence {
    pub id: SequenceId,
    pub name: String,
    pub description: String,
    pub emails: Vec<OutreachEmail>,
    pub leads: Vec<Lead>,
    pub status: SequenceStatus,
    pub created_at: OffsetDateTime,
}

/// A sequence assembled by the wizard or the bulk outreach panel, before
/// the workspace assigns its id and creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSequence {
    pub name: String,
    pub description: String,
    pub emails: Vec<OutreachEmail>,
    pub leads: Vec<Lead>,
    pub status: SequenceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachActivity {
    pub id: ActivityId,
    pub lead_id: LeadId,
    pub sequence_id: SequenceId,
    pub email_id: EmailId,
    pub status: ActivityStatus,
    pub scheduled_for: OffsetDateTime,
    pub sent_at: Option<OffsetDateTime>,
    pub opened_at: Option<OffsetDateTime>,
    pub replied_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutreachStats {
    pub active_sequences: usize,
    pub total_sent: usize,
    pub total_opened: usize,
    pub total_replied: usize,
}

/// The signed-in user as persisted under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub email: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub login_time: OffsetDateTime,
}
