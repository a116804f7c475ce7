// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::outreach::{self, Chance};
use crate::{
    Campaign, CampaignFormInput, CampaignId, CampaignPriority, DEFAULT_CAMPAIGN_CATEGORIES,
    DEFAULT_LEAD_CATEGORIES, EmailId, Lead, LeadId, NewLead, NewSequence, OutreachActivity,
    OutreachEmail, OutreachSequence, OutreachStats, SOURCE_AI_CHAT, SOURCE_MANUAL_ENTRY,
    SequenceId, SequenceStatus, SequenceTemplate, parse_tags,
};

pub const OTHER_GOAL: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutreachEmailSource {
    Template,
    Manual,
}

/// The bulk "create outreach" panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachRequest<'a> {
    pub name: String,
    pub description: String,
    pub source: OutreachEmailSource,
    pub template: &'a SequenceTemplate,
    pub custom_emails: Vec<OutreachEmail>,
    pub selected_leads: Vec<LeadId>,
}

/// Campaign status columns. A campaign can sit in more than one column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CampaignBuckets<'a> {
    pub active: Vec<&'a Campaign>,
    pub planning: Vec<&'a Campaign>,
    pub completed: Vec<&'a Campaign>,
}

/// Every in-memory collection of a signed-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    leads: Vec<Lead>,
    staged: Vec<Lead>,
    campaigns: Vec<Campaign>,
    sequences: Vec<OutreachSequence>,
    activities: Vec<OutreachActivity>,
    lead_categories: Vec<String>,
    campaign_categories: Vec<String>,
    next_id: i64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            leads: Vec::new(),
            staged: Vec::new(),
            campaigns: Vec::new(),
            sequences: Vec::new(),
            activities: Vec::new(),
            lead_categories: DEFAULT_LEAD_CATEGORIES.iter().map(|name| name.to_string()).collect(),
            campaign_categories: DEFAULT_CAMPAIGN_CATEGORIES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            next_id: 1,
        }
    }
}

impl Workspace {
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn staged_leads(&self) -> &[Lead] {
        &self.staged
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn sequences(&self) -> &[OutreachSequence] {
        &self.sequences
    }

    pub fn activities(&self) -> &[OutreachActivity] {
        &self.activities
    }

    pub fn lead_categories(&self) -> &[String] {
        &self.lead_categories
    }

    pub fn campaign_categories(&self) -> &[String] {
        &self.campaign_categories
    }

    pub fn lead(&self, id: LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == id)
    }

    pub fn sequence(&self, id: SequenceId) -> Option<&OutreachSequence> {
        self.sequences.iter().find(|sequence| sequence.id == id)
    }

    pub fn starred_leads(&self) -> impl Iterator<Item = &Lead> {
        self.leads.iter().filter(|lead| lead.starred)
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Appends a lead as-is. Used for seeding and by the creation paths.
    pub fn insert_lead(&mut self, lead: NewLead, source: &str, now: OffsetDateTime) -> LeadId {
        let id = LeadId::new(self.allocate_id());
        self.leads.push(lead.into_lead(id, source, now));
        id
    }

    /// Manual entry from the add-lead dialog.
    pub fn add_lead(&mut self, lead: NewLead, now: OffsetDateTime) -> Result<LeadId> {
        if lead.name.trim().is_empty() {
            bail!("lead name is required -- enter a name and retry");
        }
        if !(1..=100).contains(&lead.score) {
            bail!("lead score must be between 1 and 100");
        }
        let id = self.insert_lead(lead, SOURCE_MANUAL_ENTRY, now);
        tracing::info!(lead_id = id.get(), "lead added manually");
        Ok(id)
    }

    pub fn toggle_star(&mut self, id: LeadId) -> Result<bool> {
        let Some(lead) = self.leads.iter_mut().find(|lead| lead.id == id) else {
            bail!("lead {} not found", id.get());
        };
        lead.starred = !lead.starred;
        Ok(lead.starred)
    }

    /// Replaces the staged batch with freshly generated leads. Leads
    /// without a chat title get `chat_title`, or a dated default.
    pub fn stage_leads(
        &mut self,
        batch: Vec<NewLead>,
        chat_title: Option<&str>,
        now: OffsetDateTime,
    ) -> Vec<LeadId> {
        let fallback = match chat_title.map(str::trim) {
            Some(title) if !title.is_empty() => title.to_owned(),
            _ => default_chat_title(now),
        };
        self.staged.clear();
        let mut ids = Vec::with_capacity(batch.len());
        for mut lead in batch {
            if lead.chat_title.as_deref().is_none_or(str::is_empty) {
                lead.chat_title = Some(fallback.clone());
            }
            let id = LeadId::new(self.allocate_id());
            self.staged.push(lead.into_lead(id, SOURCE_AI_CHAT, now));
            ids.push(id);
        }
        tracing::debug!(count = ids.len(), "leads staged");
        ids
    }

    /// Saves the chosen staged leads under `session_title`; the rest stay
    /// staged.
    pub fn commit_staged_leads(&mut self, selected: &[LeadId], session_title: &str) -> Result<usize> {
        let title = session_title.trim();
        if title.is_empty() {
            bail!("session title is required -- name the search and retry");
        }
        if !self.staged.iter().any(|lead| selected.contains(&lead.id)) {
            bail!("no staged leads selected -- select leads and retry");
        }
        let (mut chosen, rest): (Vec<Lead>, Vec<Lead>) = std::mem::take(&mut self.staged)
            .into_iter()
            .partition(|lead| selected.contains(&lead.id));
        self.staged = rest;
        for lead in &mut chosen {
            lead.chat_title = Some(title.to_owned());
        }
        let count = chosen.len();
        self.leads.extend(chosen);
        tracing::info!(count, session = title, "staged leads saved");
        Ok(count)
    }

    pub fn commit_all_staged(&mut self) -> usize {
        let count = self.staged.len();
        self.leads.append(&mut self.staged);
        count
    }

    pub fn discard_staged_leads(&mut self) -> usize {
        let count = self.staged.len();
        self.staged.clear();
        count
    }

    pub fn add_lead_category(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            bail!("category name is required -- enter a name and retry");
        }
        if self.lead_categories.iter().any(|existing| existing == name) {
            bail!("category {name:?} already exists");
        }
        self.lead_categories.push(name.to_owned());
        Ok(())
    }

    /// Drops the category and clears it from every lead that used it.
    pub fn remove_lead_category(&mut self, name: &str) -> usize {
        self.lead_categories.retain(|existing| existing != name);
        let mut cleared = 0;
        for lead in &mut self.leads {
            if lead.category.as_deref() == Some(name) {
                lead.category = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Renames the category and carries the new name to its leads.
    pub fn rename_lead_category(&mut self, old: &str, new: &str) -> Result<usize> {
        let new = new.trim();
        if new.is_empty() {
            bail!("category name is required -- enter a name and retry");
        }
        if self.lead_categories.iter().any(|existing| existing == new) {
            bail!("category {new:?} already exists");
        }
        let Some(slot) = self
            .lead_categories
            .iter_mut()
            .find(|existing| existing.as_str() == old)
        else {
            bail!("category {old:?} not found");
        };
        *slot = new.to_owned();
        let mut renamed = 0;
        for lead in &mut self.leads {
            if lead.category.as_deref() == Some(old) {
                lead.category = Some(new.to_owned());
                renamed += 1;
            }
        }
        Ok(renamed)
    }

    pub fn add_campaign_category(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            bail!("category name is required -- enter a name and retry");
        }
        if self.campaign_categories.iter().any(|existing| existing == name) {
            bail!("category {name:?} already exists");
        }
        self.campaign_categories.push(name.to_owned());
        Ok(())
    }

    pub fn remove_campaign_category(&mut self, name: &str) -> usize {
        self.campaign_categories.retain(|existing| existing != name);
        let mut cleared = 0;
        for campaign in &mut self.campaigns {
            if campaign.category.as_deref() == Some(name) {
                campaign.category = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Snapshots every starred lead into a new campaign, then unstars all
    /// leads.
    pub fn create_campaign(
        &mut self,
        name: &str,
        description: &str,
        now: OffsetDateTime,
    ) -> Result<CampaignId> {
        let name = name.trim();
        if name.is_empty() {
            bail!("campaign name is required -- enter a name and retry");
        }
        let snapshot: Vec<Lead> = self.starred_leads().cloned().collect();
        if snapshot.is_empty() {
            bail!("no starred leads -- star leads and retry");
        }
        let id = CampaignId::new(self.allocate_id());
        let lead_count = snapshot.len();
        self.campaigns.push(Campaign {
            id,
            name: name.to_owned(),
            description: description.to_owned(),
            leads: snapshot,
            created_at: now,
            priority: None,
            goal: None,
            category: None,
            tags: Default::default(),
        });
        for lead in &mut self.leads {
            lead.starred = false;
        }
        tracing::info!(campaign_id = id.get(), lead_count, "campaign created");
        Ok(id)
    }

    pub fn create_campaign_detailed(
        &mut self,
        form: &CampaignFormInput,
        now: OffsetDateTime,
    ) -> Result<CampaignId> {
        form.validate()?;
        let leads: Vec<Lead> = self
            .leads
            .iter()
            .filter(|lead| form.lead_ids.contains(&lead.id))
            .cloned()
            .collect();
        if leads.is_empty() {
            bail!("selected leads no longer exist -- select leads and retry");
        }
        let id = CampaignId::new(self.allocate_id());
        self.campaigns.push(Campaign {
            id,
            name: form.name.trim().to_owned(),
            description: form.description.trim().to_owned(),
            leads,
            created_at: now,
            priority: Some(form.priority),
            goal: form.goal(),
            category: form.category(),
            tags: parse_tags(&form.tags),
        });
        tracing::info!(campaign_id = id.get(), "campaign created");
        Ok(id)
    }

    pub fn create_outreach(
        &mut self,
        request: OutreachRequest<'_>,
        now: OffsetDateTime,
    ) -> Result<SequenceId> {
        let name = request.name.trim();
        if name.is_empty() {
            bail!("sequence name is required -- enter a name and retry");
        }
        let leads: Vec<Lead> = request
            .selected_leads
            .iter()
            .filter_map(|id| self.lead(*id).cloned())
            .collect();
        if leads.is_empty() {
            bail!("no leads selected -- select leads and retry");
        }
        let emails = match request.source {
            OutreachEmailSource::Template => template_emails(request.template),
            OutreachEmailSource::Manual => request.custom_emails,
        };
        Ok(self.create_sequence(
            NewSequence {
                name: name.to_owned(),
                description: request.description,
                emails,
                leads,
                status: SequenceStatus::Draft,
            },
            now,
        ))
    }

    /// Stores the sequence and schedules its activities from `now`.
    pub fn create_sequence(&mut self, sequence: NewSequence, now: OffsetDateTime) -> SequenceId {
        let id = SequenceId::new(self.allocate_id());
        let sequence = OutreachSequence {
            id,
            name: sequence.name,
            description: sequence.description,
            emails: sequence.emails,
            leads: sequence.leads,
            status: sequence.status,
            created_at: now,
        };
        let activities = outreach::schedule_activities(&sequence, self.next_id);
        self.next_id += activities.len() as i64;
        tracing::info!(
            sequence_id = id.get(),
            emails = sequence.emails.len(),
            leads = sequence.leads.len(),
            activities = activities.len(),
            "outreach sequence created"
        );
        self.sequences.push(sequence);
        self.activities.extend(activities);
        id
    }

    pub fn update_sequence_status(&mut self, id: SequenceId, status: SequenceStatus) -> Result<()> {
        let Some(sequence) = self.sequences.iter_mut().find(|sequence| sequence.id == id) else {
            bail!("sequence {} not found", id.get());
        };
        sequence.status = status;
        tracing::info!(sequence_id = id.get(), status = status.as_str(), "sequence status changed");
        Ok(())
    }

    /// Removes the sequence and its activities. Returns the number of
    /// activities dropped.
    pub fn delete_sequence(&mut self, id: SequenceId) -> Result<usize> {
        let before = self.sequences.len();
        self.sequences.retain(|sequence| sequence.id != id);
        if self.sequences.len() == before {
            bail!("sequence {} not found", id.get());
        }
        let activities = self.activities.len();
        self.activities.retain(|activity| activity.sequence_id != id);
        Ok(activities - self.activities.len())
    }

    pub fn advance_activities(&mut self, now: OffsetDateTime, chance: &mut dyn Chance) -> usize {
        outreach::advance_activities(&mut self.activities, now, chance)
    }

    pub fn outreach_stats(&self) -> OutreachStats {
        outreach::outreach_stats(&self.sequences, &self.activities)
    }

    /// Campaigns grouped by goal, in first-seen order.
    pub fn campaigns_by_goal(&self) -> Vec<(String, Vec<&Campaign>)> {
        let mut groups: Vec<(String, Vec<&Campaign>)> = Vec::new();
        for campaign in &self.campaigns {
            let goal = match campaign.goal.as_deref() {
                Some(goal) if !goal.is_empty() => goal,
                _ => OTHER_GOAL,
            };
            match groups.iter_mut().find(|(name, _)| name == goal) {
                Some((_, members)) => members.push(campaign),
                None => groups.push((goal.to_owned(), vec![campaign])),
            }
        }
        groups
    }

    pub fn campaign_buckets(&self) -> CampaignBuckets<'_> {
        let mut buckets = CampaignBuckets::default();
        for campaign in &self.campaigns {
            let priority = campaign.priority;
            if priority == Some(CampaignPriority::High)
                || (priority.is_none() && !campaign.leads.is_empty())
            {
                buckets.active.push(campaign);
            }
            if priority == Some(CampaignPriority::Medium) || campaign.leads.is_empty() {
                buckets.planning.push(campaign);
            }
            if priority == Some(CampaignPriority::Low) {
                buckets.completed.push(campaign);
            }
        }
        buckets
    }
}

pub fn template_emails(template: &SequenceTemplate) -> Vec<OutreachEmail> {
    template
        .emails
        .iter()
        .zip(1_i64..)
        .map(|(email, id)| OutreachEmail {
            id: EmailId::new(id),
            subject: email.subject.to_owned(),
            content: email.content.to_owned(),
            delay_days: email.delay_days,
            is_follow_up: email.is_follow_up,
        })
        .collect()
}

fn default_chat_title(now: OffsetDateTime) -> String {
    let date = now
        .format(format_description!("[month padding:none]/[day padding:none]/[year]"))
        .unwrap_or_else(|_| now.date().to_string());
    format!("Chat Session {date}")
}
