// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DashboardView {
    #[default]
    AllLeads,
    Categories,
    Chats {
        category: String,
    },
    Table {
        category: String,
        chat_title: String,
    },
}

impl DashboardView {
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Chats { category } | Self::Table { category, .. } => Some(category),
            Self::AllLeads | Self::Categories => None,
        }
    }

    pub fn chat_title(&self) -> Option<&str> {
        match self {
            Self::Table { chat_title, .. } => Some(chat_title),
            _ => None,
        }
    }

    pub const fn depth(&self) -> usize {
        match self {
            Self::AllLeads => 0,
            Self::Categories => 1,
            Self::Chats { .. } => 2,
            Self::Table { .. } => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub target: DashboardView,
    pub current: bool,
}

impl Breadcrumb {
    pub const fn is_link(&self) -> bool {
        !self.current
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardNav {
    view: DashboardView,
}

impl DashboardNav {
    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn show_all_leads(&mut self) {
        self.set(DashboardView::AllLeads);
    }

    pub fn show_categories(&mut self) {
        self.set(DashboardView::Categories);
    }

    /// Opens a folder. Valid from the folder grid or from a deeper view
    /// through its breadcrumb.
    pub fn open_category(&mut self, category: &str) -> bool {
        if matches!(self.view, DashboardView::AllLeads) {
            tracing::warn!(category, "open category ignored outside the folder view");
            return false;
        }
        self.set(DashboardView::Chats {
            category: category.to_owned(),
        });
        true
    }

    /// Opens a chat session of the current folder.
    pub fn open_session(&mut self, chat_title: &str) -> bool {
        let DashboardView::Chats { category } = &self.view else {
            tracing::warn!(chat_title, "open session ignored outside a folder");
            return false;
        };
        let category = category.clone();
        self.set(DashboardView::Table {
            category,
            chat_title: chat_title.to_owned(),
        });
        true
    }

    /// One level up; the all-leads view is the root.
    pub fn back(&mut self) {
        let parent = match &self.view {
            DashboardView::AllLeads | DashboardView::Categories => DashboardView::AllLeads,
            DashboardView::Chats { .. } => DashboardView::Categories,
            DashboardView::Table { category, .. } => DashboardView::Chats {
                category: category.clone(),
            },
        };
        self.set(parent);
    }

    /// Follows a breadcrumb. Only shallower views reachable from the
    /// current trail are accepted.
    pub fn follow(&mut self, crumb: &Breadcrumb) -> bool {
        if crumb.current || !self.breadcrumbs().iter().any(|c| c.target == crumb.target) {
            return false;
        }
        self.set(crumb.target.clone());
        true
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut trail = vec![("All Leads".to_owned(), DashboardView::AllLeads)];
        if self.view.depth() >= 1 {
            trail.push(("Folders".to_owned(), DashboardView::Categories));
        }
        if let Some(category) = self.view.category() {
            trail.push((
                category.to_owned(),
                DashboardView::Chats {
                    category: category.to_owned(),
                },
            ));
        }
        if let Some(chat_title) = self.view.chat_title() {
            trail.push((chat_title.to_owned(), self.view.clone()));
        }

        let last = trail.len() - 1;
        trail
            .into_iter()
            .enumerate()
            .map(|(index, (label, target))| Breadcrumb {
                label,
                target,
                current: index == last,
            })
            .collect()
    }

    fn set(&mut self, view: DashboardView) {
        tracing::debug!(from = ?self.view, to = ?view, "dashboard navigation");
        self.view = view;
    }
}

#[cfg(test)]
mod tests {
    use super::{DashboardNav, DashboardView};

    fn labels(nav: &DashboardNav) -> Vec<String> {
        nav.breadcrumbs()
            .into_iter()
            .map(|crumb| crumb.label)
            .collect()
    }

    #[test]
    fn drill_down_to_session_table() {
        let mut nav = DashboardNav::default();
        assert!(!nav.open_category("Prospects"));

        nav.show_categories();
        assert!(nav.open_category("Prospects"));
        assert!(nav.open_session("fintech CTOs"));
        assert_eq!(
            nav.view(),
            &DashboardView::Table {
                category: "Prospects".to_owned(),
                chat_title: "fintech CTOs".to_owned(),
            }
        );
        assert_eq!(
            labels(&nav),
            vec!["All Leads", "Folders", "Prospects", "fintech CTOs"]
        );
    }

    #[test]
    fn session_requires_open_folder() {
        let mut nav = DashboardNav::default();
        nav.show_categories();
        assert!(!nav.open_session("anything"));
        assert_eq!(nav.view(), &DashboardView::Categories);
    }

    #[test]
    fn only_last_crumb_is_current() {
        let mut nav = DashboardNav::default();
        nav.show_categories();
        nav.open_category("Hot Leads");
        let crumbs = nav.breadcrumbs();
        assert_eq!(crumbs.len(), 3);
        assert!(crumbs[0].is_link());
        assert!(crumbs[1].is_link());
        assert!(crumbs[2].current);
    }

    #[test]
    fn following_shallow_crumb_clears_deeper_selection() {
        let mut nav = DashboardNav::default();
        nav.show_categories();
        nav.open_category("Prospects");
        nav.open_session("fintech");

        let folders = nav.breadcrumbs()[1].clone();
        assert!(nav.follow(&folders));
        assert_eq!(nav.view(), &DashboardView::Categories);
        assert_eq!(nav.view().category(), None);
        assert_eq!(nav.view().chat_title(), None);
    }

    #[test]
    fn current_crumb_is_not_followable() {
        let mut nav = DashboardNav::default();
        nav.show_categories();
        let current = nav.breadcrumbs()[1].clone();
        assert!(!nav.follow(&current));
    }

    #[test]
    fn back_walks_up_one_level() {
        let mut nav = DashboardNav::default();
        nav.show_categories();
        nav.open_category("Prospects");
        nav.open_session("fintech");

        nav.back();
        assert_eq!(nav.view().category(), Some("Prospects"));
        nav.back();
        assert_eq!(nav.view(), &DashboardView::Categories);
        nav.back();
        assert_eq!(nav.view(), &DashboardView::AllLeads);
    }

    #[test]
    fn home_resets_from_any_depth() {
        let mut nav = DashboardNav::default();
        nav.show_categories();
        nav.open_category("Prospects");
        nav.open_session("fintech");
        nav.show_all_leads();
        assert_eq!(labels(&nav), vec!["All Leads"]);
    }
}
