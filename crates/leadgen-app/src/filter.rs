// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::{Lead, LeadSortField, SortDirection};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IndustryFilter {
    #[default]
    All,
    Only(String),
}

impl IndustryFilter {
    pub fn matches(&self, industry: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => name == industry,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "all industries",
            Self::Only(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadTab {
    #[default]
    All,
    Starred,
}

impl LeadTab {
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Starred => "starred",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::All => Self::Starred,
            Self::Starred => Self::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadQuery {
    pub search: String,
    pub industry: IndustryFilter,
    pub tab: LeadTab,
}

impl LeadQuery {
    pub fn matches(&self, lead: &Lead) -> bool {
        let needle = self.search.to_lowercase();
        let text_match = needle.is_empty()
            || [&lead.name, &lead.company, &lead.title, &lead.location]
                .iter()
                .any(|value| value.to_lowercase().contains(&needle));
        let tab_match = match self.tab {
            LeadTab::All => true,
            LeadTab::Starred => lead.starred,
        };
        text_match && self.industry.matches(&lead.industry) && tab_match
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: LeadSortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: LeadSortField::Score,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    /// Picking the active field flips the direction; another field is
    /// adopted with the current direction.
    pub fn toggle(self, field: LeadSortField) -> Self {
        if field == self.field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self { field, ..self }
        }
    }
}

/// Leads matching `query`, in their original relative order.
pub fn filter_leads<'a>(leads: &'a [Lead], query: &LeadQuery) -> Vec<&'a Lead> {
    let matched: Vec<&Lead> = leads.iter().filter(|lead| query.matches(lead)).collect();
    tracing::debug!(
        total = leads.len(),
        matched = matched.len(),
        search = %query.search,
        "filtered leads"
    );
    matched
}

fn compare_field(a: &Lead, b: &Lead, field: LeadSortField) -> Ordering {
    match field {
        LeadSortField::Name => a.name.cmp(&b.name),
        LeadSortField::Title => a.title.cmp(&b.title),
        LeadSortField::Company => a.company.cmp(&b.company),
        LeadSortField::Industry => a.industry.cmp(&b.industry),
        LeadSortField::Score => a.score.cmp(&b.score),
        LeadSortField::GeneratedAt => a.generated_at.cmp(&b.generated_at),
    }
}

pub fn sort_leads(leads: &mut [&Lead], spec: SortSpec) {
    leads.sort_by(|a, b| {
        let ordering = compare_field(a, b, spec.field);
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

pub fn filter_and_sort<'a>(leads: &'a [Lead], query: &LeadQuery, spec: SortSpec) -> Vec<&'a Lead> {
    let mut visible = filter_leads(leads, query);
    sort_leads(&mut visible, spec);
    visible
}

/// Distinct industries in first-seen order.
pub fn industries(leads: &[Lead]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for lead in leads {
        if !seen.iter().any(|name| name == &lead.industry) {
            seen.push(lead.industry.clone());
        }
    }
    seen
}
