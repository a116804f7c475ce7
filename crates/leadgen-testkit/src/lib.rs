// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use leadgen_app::{
    CampaignFormInput, CampaignId, CampaignPriority, Chance, DEFAULT_CAMPAIGN_CATEGORIES,
    DEFAULT_LEAD_CATEGORIES, LeadId, NewLead, SOURCE_AI_CHAT, Workspace,
};
use time::{Duration, OffsetDateTime};
use time::macros::datetime;

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const TITLES: [&str; 10] = [
    "Chief Technology Officer",
    "VP of Engineering",
    "Head of Product",
    "Director of Operations",
    "Chief Financial Officer",
    "Head of Growth",
    "VP of Sales",
    "Founder & CEO",
    "Head of Data",
    "Director of Partnerships",
];

const INDUSTRIES: [&str; 8] = [
    "Financial Technology",
    "Healthcare",
    "Cryptocurrency",
    "Logistics",
    "Education",
    "Retail",
    "Cybersecurity",
    "Climate Tech",
];

const COMPANY_PREFIXES: [&str; 12] = [
    "North", "Bright", "Clear", "Pay", "Data", "Cloud", "Green", "Quantum", "Swift", "Blue",
    "Iron", "Summit",
];
const COMPANY_SUFFIXES: [&str; 8] = ["Flow", "Works", "Labs", "Logic", "Scale", "Path", "Stack", "Hub"];

const CITIES: [&str; 10] = [
    "San Francisco, CA",
    "Austin, TX",
    "Seattle, WA",
    "Denver, CO",
    "New York, NY",
    "Boston, MA",
    "Chicago, IL",
    "Raleigh, NC",
    "Portland, OR",
    "Miami, FL",
];

const TAGS: [&str; 12] = [
    "Series A",
    "Series B",
    "Enterprise",
    "SMB",
    "Decision Maker",
    "Technical",
    "Budget Owner",
    "Compliance",
    "Security",
    "Payments",
    "AI",
    "Remote",
];

const PROMPTS: [&str; 6] = [
    "Find fintech CTOs in San Francisco",
    "Healthcare founders raising a seed round",
    "Logistics operators modernising their fleet",
    "Security leaders at mid-size retailers",
    "Climate startups hiring their first sales lead",
    "Education platforms expanding to enterprise customers",
];

const CAMPAIGN_GOALS: [&str; 4] = [
    "Lead Generation",
    "Brand Awareness",
    "Partnership",
    "Product Demo",
];

const REFERENCE_NOW: OffsetDateTime = datetime!(2026-02-19 12:34:56 UTC);

#[derive(Debug, Clone)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

impl Chance for DeterministicRng {
    fn roll(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }
}

/// Reproducible prospects and campaigns for tests and demo mode.
#[derive(Debug, Clone)]
pub struct LeadFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl LeadFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn prompt(&mut self) -> &'static str {
        self.pick(&PROMPTS)
    }

    pub fn lead(&mut self) -> NewLead {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let company = format!(
            "{}{}",
            self.pick(&COMPANY_PREFIXES),
            self.pick(&COMPANY_SUFFIXES)
        );
        let domain = company.to_ascii_lowercase();
        let industry = self.pick(&INDUSTRIES);
        let score = self.int_range(40, 99) as u8;
        let category = if score >= 85 {
            DEFAULT_LEAD_CATEGORIES[0]
        } else if score >= 65 {
            DEFAULT_LEAD_CATEGORIES[1]
        } else {
            DEFAULT_LEAD_CATEGORIES[2]
        };

        let mut tags = BTreeSet::new();
        for _ in 0..self.int_range(1, 3) {
            tags.insert(self.pick(&TAGS).to_owned());
        }

        let phone = self.rng.bool().then(|| {
            format!(
                "+1 (555) {:03}-{:04}",
                self.int_range(100, 999),
                self.int_range(0, 9999)
            )
        });

        NewLead {
            name: format!("{first} {last}"),
            title: self.pick(&TITLES).to_owned(),
            email: format!(
                "{}.{}@{domain}.com",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            company,
            phone,
            linkedin_url: Some(format!(
                "linkedin.com/in/{}{}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            )),
            industry: industry.to_owned(),
            location: self.pick(&CITIES).to_owned(),
            description: format!("{industry} leader evaluating new vendors this quarter."),
            category: Some(category.to_owned()),
            chat_title: None,
            tags,
            score,
        }
    }

    /// A batch of leads sharing one session title, as a generation run
    /// produces them.
    pub fn session(&mut self, size: usize) -> (String, Vec<NewLead>) {
        let title = self.prompt().to_owned();
        let leads = (0..size)
            .map(|_| {
                let mut lead = self.lead();
                lead.chat_title = Some(title.clone());
                lead
            })
            .collect();
        (title, leads)
    }

    pub fn campaign_form(&mut self, lead_ids: &[LeadId]) -> CampaignFormInput {
        let goal = self.pick(&CAMPAIGN_GOALS);
        let priority = CampaignPriority::ALL[self.rng.int_n(CampaignPriority::ALL.len())];
        CampaignFormInput {
            name: format!("{goal} push"),
            description: format!("Outreach focused on {}", goal.to_ascii_lowercase()),
            goal: goal.to_owned(),
            priority,
            category: self.pick(&DEFAULT_CAMPAIGN_CATEGORIES).to_owned(),
            tags: format!("{}, {}", self.pick(&TAGS), self.pick(&TAGS)),
            lead_ids: lead_ids.to_vec(),
        }
    }

    /// Fills `workspace` with `sessions` generation runs and one campaign per
    /// run. Returns the campaign ids.
    pub fn seed_workspace(
        &mut self,
        workspace: &mut Workspace,
        sessions: usize,
        leads_per_session: usize,
    ) -> Result<Vec<CampaignId>> {
        let mut campaigns = Vec::with_capacity(sessions);
        for index in 0..sessions {
            let generated_at = REFERENCE_NOW - Duration::days((sessions - index) as i64);
            let (_, leads) = self.session(leads_per_session);
            let ids: Vec<LeadId> = leads
                .into_iter()
                .map(|lead| workspace.insert_lead(lead, SOURCE_AI_CHAT, generated_at))
                .collect();
            if ids.is_empty() {
                continue;
            }
            let form = self.campaign_form(&ids);
            let campaign = workspace
                .create_campaign_detailed(&form, generated_at)
                .with_context(|| format!("seed campaign {}", form.name))?;
            campaigns.push(campaign);
        }
        Ok(campaigns)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (self.rng.next_u64() % span) as u32
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("session.db");
    Ok((dir, db_path))
}

pub fn fixture_datetime() -> OffsetDateTime {
    REFERENCE_NOW
}

#[cfg(test)]
mod tests {
    use super::{DeterministicRng, LeadFaker};
    use leadgen_app::{Chance, Workspace, build_hierarchy, is_valid_email};

    #[test]
    fn new_deterministic_seed() {
        let mut left = LeadFaker::new(42);
        let mut right = LeadFaker::new(42);
        assert_eq!(left.lead(), right.lead());
    }

    #[test]
    fn zero_seed_is_normalized() {
        assert_eq!(LeadFaker::new(0).seed(), 1);
    }

    #[test]
    fn leads_pass_manual_entry_rules() {
        let mut faker = LeadFaker::new(7);
        for _ in 0..50 {
            let lead = faker.lead();
            assert!(is_valid_email(&lead.email), "{}", lead.email);
            assert!((1..=100).contains(&lead.score));
            assert!(!lead.tags.is_empty());
        }
    }

    #[test]
    fn session_shares_title() {
        let mut faker = LeadFaker::new(3);
        let (title, leads) = faker.session(4);
        assert_eq!(leads.len(), 4);
        assert!(
            leads
                .iter()
                .all(|lead| lead.chat_title.as_deref() == Some(title.as_str()))
        );
    }

    #[test]
    fn seeded_workspace_groups_by_session() -> anyhow::Result<()> {
        let mut workspace = Workspace::default();
        let campaigns = LeadFaker::new(11).seed_workspace(&mut workspace, 3, 4)?;
        assert_eq!(campaigns.len(), 3);
        assert_eq!(workspace.leads().len(), 12);
        assert_eq!(build_hierarchy(workspace.leads()).total_leads(), 12);
        Ok(())
    }

    #[test]
    fn roll_stays_in_unit_interval() {
        let mut rng = DeterministicRng::new(9);
        for _ in 0..1000 {
            let value = rng.roll();
            assert!((0.0..1.0).contains(&value));
        }
    }
}
