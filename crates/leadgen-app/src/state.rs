// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    DashboardNav, DashboardView, IndustryFilter, Lead, LeadHierarchy, LeadId, LeadQuery,
    LeadSortField, Route, Section, SequenceWizard, SortSpec, Workspace, build_hierarchy,
    category_key, industries, resolve_route, session_key, sort_leads,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Public(Route),
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub surface: Surface,
    pub section: Section,
    pub nav: DashboardNav,
    pub query: LeadQuery,
    pub sort: SortSpec,
    pub selected: Vec<LeadId>,
    pub wizard: Option<SequenceWizard>,
    pub workspace: Workspace,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            surface: Surface::Public(Route::Chat),
            section: Section::Generate,
            nav: DashboardNav::default(),
            query: LeadQuery::default(),
            sort: SortSpec::default(),
            selected: Vec::new(),
            wizard: None,
            workspace: Workspace::default(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextSection,
    PrevSection,
    OpenSection(Section),
    NextPage,
    PrevPage,
    GoTo(Route),
    /// Opens the public page a URL-style path names.
    GoToPath(String),
    SignedIn,
    SignedOut,
    ShowAllLeads,
    ShowFolders,
    OpenCategory(String),
    OpenSession(String),
    NavigateBack,
    SetSearch(String),
    CycleIndustry,
    ToggleLeadTab,
    SortBy(LeadSortField),
    ToggleStar(LeadId),
    ToggleSelected(LeadId),
    ClearSelection,
    StartWizard,
    CloseWizard,
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    SurfaceChanged(Surface),
    SectionChanged(Section),
    ViewChanged(DashboardView),
    QueryChanged,
    SortChanged(SortSpec),
    StarToggled { id: LeadId, starred: bool },
    SelectionChanged(usize),
    WizardOpened,
    WizardClosed,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        self.surface == Surface::Dashboard
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextSection => self.rotate_section(1),
            AppCommand::PrevSection => self.rotate_section(-1),
            AppCommand::OpenSection(section) => {
                self.section = section;
                vec![AppEvent::SectionChanged(section)]
            }
            AppCommand::NextPage => self.rotate_page(1),
            AppCommand::PrevPage => self.rotate_page(-1),
            AppCommand::GoTo(route) => {
                if self.is_authenticated() {
                    return Vec::new();
                }
                self.surface = Surface::Public(route);
                vec![AppEvent::SurfaceChanged(self.surface)]
            }
            AppCommand::GoToPath(path) => match resolve_route(&path, self.is_authenticated()) {
                Route::Dashboard => Vec::new(),
                route => {
                    self.surface = Surface::Public(route);
                    vec![AppEvent::SurfaceChanged(self.surface)]
                }
            },
            AppCommand::SignedIn => {
                self.surface = Surface::Dashboard;
                vec![
                    AppEvent::SurfaceChanged(self.surface),
                    self.set_status("signed in"),
                ]
            }
            AppCommand::SignedOut => {
                *self = Self::default();
                vec![
                    AppEvent::SurfaceChanged(self.surface),
                    self.set_status("signed out"),
                ]
            }
            AppCommand::ShowAllLeads => {
                self.nav.show_all_leads();
                self.view_changed()
            }
            AppCommand::ShowFolders => {
                self.nav.show_categories();
                self.view_changed()
            }
            AppCommand::OpenCategory(category) => {
                if self.nav.open_category(&category) {
                    self.view_changed()
                } else {
                    Vec::new()
                }
            }
            AppCommand::OpenSession(title) => {
                if self.nav.open_session(&title) {
                    self.view_changed()
                } else {
                    Vec::new()
                }
            }
            AppCommand::NavigateBack => {
                self.nav.back();
                self.view_changed()
            }
            AppCommand::SetSearch(search) => {
                self.query.search = search;
                vec![AppEvent::QueryChanged]
            }
            AppCommand::CycleIndustry => {
                let options = industries(self.workspace.leads());
                self.query.industry = next_industry(&self.query.industry, &options);
                let label = format!("industry: {}", self.query.industry.label());
                vec![AppEvent::QueryChanged, self.set_status(&label)]
            }
            AppCommand::ToggleLeadTab => {
                self.query.tab = self.query.tab.toggled();
                vec![AppEvent::QueryChanged]
            }
            AppCommand::SortBy(field) => {
                self.sort = self.sort.toggle(field);
                vec![AppEvent::SortChanged(self.sort)]
            }
            AppCommand::ToggleStar(id) => match self.workspace.toggle_star(id) {
                Ok(starred) => vec![AppEvent::StarToggled { id, starred }],
                Err(error) => vec![self.set_status(&error.to_string())],
            },
            AppCommand::ToggleSelected(id) => {
                match self.selected.iter().position(|selected| *selected == id) {
                    Some(index) => {
                        self.selected.remove(index);
                    }
                    None => self.selected.push(id),
                }
                vec![AppEvent::SelectionChanged(self.selected.len())]
            }
            AppCommand::ClearSelection => {
                self.selected.clear();
                vec![AppEvent::SelectionChanged(0)]
            }
            AppCommand::StartWizard => {
                self.wizard = Some(SequenceWizard::new(&self.selected));
                vec![AppEvent::WizardOpened]
            }
            AppCommand::CloseWizard => {
                if self.wizard.take().is_some() {
                    vec![AppEvent::WizardClosed]
                } else {
                    Vec::new()
                }
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    /// Leads for the table of the current dashboard view, filtered and
    /// sorted.
    pub fn visible_leads(&self) -> Vec<&Lead> {
        let view = self.nav.view();
        let mut visible: Vec<&Lead> = self
            .workspace
            .leads()
            .iter()
            .filter(|lead| match view {
                DashboardView::Table {
                    category,
                    chat_title,
                } => {
                    category_key(lead) == category.as_str()
                        && session_key(lead) == chat_title.as_str()
                }
                _ => true,
            })
            .filter(|lead| self.query.matches(lead))
            .collect();
        sort_leads(&mut visible, self.sort);
        visible
    }

    pub fn hierarchy(&self) -> LeadHierarchy<'_> {
        build_hierarchy(self.workspace.leads())
    }

    pub fn selected_leads(&self) -> Vec<&Lead> {
        self.selected
            .iter()
            .filter_map(|id| self.workspace.lead(*id))
            .collect()
    }

    pub fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }

    fn view_changed(&self) -> Vec<AppEvent> {
        vec![AppEvent::ViewChanged(self.nav.view().clone())]
    }

    fn rotate_section(&mut self, delta: isize) -> Vec<AppEvent> {
        let sections = Section::ALL;
        let current = sections
            .iter()
            .position(|section| *section == self.section)
            .unwrap_or(0) as isize;
        let len = sections.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.section = sections[next];
        vec![AppEvent::SectionChanged(self.section)]
    }

    fn rotate_page(&mut self, delta: isize) -> Vec<AppEvent> {
        let Surface::Public(route) = self.surface else {
            return Vec::new();
        };
        let pages = Route::PUBLIC;
        let current = pages.iter().position(|page| *page == route).unwrap_or(0) as isize;
        let len = pages.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.surface = Surface::Public(pages[next]);
        vec![AppEvent::SurfaceChanged(self.surface)]
    }
}

fn next_industry(current: &IndustryFilter, options: &[String]) -> IndustryFilter {
    let next_index = match current {
        IndustryFilter::All => 0,
        IndustryFilter::Only(name) => match options.iter().position(|option| option == name) {
            Some(index) => index + 1,
            None => options.len(),
        },
    };
    match options.get(next_index) {
        Some(name) => IndustryFilter::Only(name.clone()),
        None => IndustryFilter::All,
    }
}
