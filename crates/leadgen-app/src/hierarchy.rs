// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Lead;

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const OTHER_LEADS: &str = "Other Leads";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession<'a> {
    pub title: String,
    pub leads: Vec<&'a Lead>,
}

impl ChatSession<'_> {
    pub fn average_score(&self) -> u8 {
        average_score(self.leads.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFolder<'a> {
    pub name: String,
    pub sessions: Vec<ChatSession<'a>>,
}

impl<'a> CategoryFolder<'a> {
    pub fn lead_count(&self) -> usize {
        self.sessions.iter().map(|session| session.leads.len()).sum()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn average_score(&self) -> u8 {
        average_score(self.leads())
    }

    pub fn session(&self, title: &str) -> Option<&ChatSession<'a>> {
        self.sessions.iter().find(|session| session.title == title)
    }

    pub fn leads(&self) -> impl Iterator<Item = &'a Lead> + '_ {
        self.sessions
            .iter()
            .flat_map(|session| session.leads.iter().copied())
    }
}

/// Category folder → chat session → leads, every level in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadHierarchy<'a> {
    pub folders: Vec<CategoryFolder<'a>>,
}

impl<'a> LeadHierarchy<'a> {
    pub fn folder(&self, name: &str) -> Option<&CategoryFolder<'a>> {
        self.folders.iter().find(|folder| folder.name == name)
    }

    pub fn session(&self, category: &str, title: &str) -> Option<&ChatSession<'a>> {
        self.folder(category)?.session(title)
    }

    pub fn total_leads(&self) -> usize {
        self.folders.iter().map(CategoryFolder::lead_count).sum()
    }

    pub fn total_sessions(&self) -> usize {
        self.folders.iter().map(CategoryFolder::session_count).sum()
    }
}

pub fn category_key(lead: &Lead) -> &str {
    match lead.category.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => UNCATEGORIZED,
    }
}

pub fn session_key(lead: &Lead) -> &str {
    match lead.chat_title.as_deref() {
        Some(title) if !title.is_empty() => title,
        _ => OTHER_LEADS,
    }
}

pub fn build_hierarchy(leads: &[Lead]) -> LeadHierarchy<'_> {
    let mut hierarchy = LeadHierarchy::default();
    for lead in leads {
        let category = category_key(lead);
        let folder_index = match hierarchy
            .folders
            .iter()
            .position(|folder| folder.name == category)
        {
            Some(index) => index,
            None => {
                hierarchy.folders.push(CategoryFolder {
                    name: category.to_owned(),
                    sessions: Vec::new(),
                });
                hierarchy.folders.len() - 1
            }
        };
        let folder = &mut hierarchy.folders[folder_index];

        let title = session_key(lead);
        match folder
            .sessions
            .iter_mut()
            .find(|session| session.title == title)
        {
            Some(session) => session.leads.push(lead),
            None => folder.sessions.push(ChatSession {
                title: title.to_owned(),
                leads: vec![lead],
            }),
        }
    }
    hierarchy
}

/// Mean score rounded half away from zero; zero for an empty set.
pub fn average_score<'a>(leads: impl Iterator<Item = &'a Lead>) -> u8 {
    let (sum, count) = leads.fold((0_u32, 0_u32), |(sum, count), lead| {
        (sum + u32::from(lead.score), count + 1)
    });
    if count == 0 {
        return 0;
    }
    let rounded = (sum * 2 + count) / (count * 2);
    u8::try_from(rounded).unwrap_or(u8::MAX)
}
