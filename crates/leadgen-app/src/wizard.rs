// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{EmailId, EmailTemplate, Lead, LeadId, NewSequence, OutreachEmail, SequenceStatus};

pub const FIRST_EMAIL_DELAY: u32 = 0;
pub const FOLLOW_UP_DELAY: u32 = 3;
pub const DUPLICATE_DELAY_STEP: u32 = 3;
/// Longest gap allowed between two emails of a sequence.
pub const MAX_EMAIL_DELAY_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Setup,
    Emails,
    Leads,
    Settings,
    Review,
}

impl WizardStep {
    pub const ALL: [Self; 5] = [
        Self::Setup,
        Self::Emails,
        Self::Leads,
        Self::Settings,
        Self::Review,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Setup => "Sequence Setup",
            Self::Emails => "Create Emails",
            Self::Leads => "Select Leads",
            Self::Settings => "Final Settings",
            Self::Review => "Review & Launch",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|step| *step == self)
            .unwrap_or_default()
    }

    fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|index| Self::ALL[index])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailCreationMode {
    Manual,
    Template,
    Ai,
}

impl EmailCreationMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Template => "template",
            Self::Ai => "ai",
        }
    }
}

/// The email editor open inside the Emails step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub mode: EmailCreationMode,
    pub editing: Option<usize>,
    pub subject: String,
    pub content: String,
    pub delay_days: u32,
    pub template_id: Option<&'static str>,
    pub ai_prompt: String,
}

impl EmailDraft {
    pub fn can_save(&self) -> bool {
        !self.subject.trim().is_empty() && !self.content.trim().is_empty()
    }

    pub fn can_generate(&self) -> bool {
        self.mode == EmailCreationMode::Ai && !self.ai_prompt.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    Moved(WizardStep),
    Rejected(&'static str),
    Cancel,
    Create(NewSequence),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceWizard {
    step: WizardStep,
    pub name: String,
    pub description: String,
    emails: Vec<OutreachEmail>,
    selected: Vec<LeadId>,
    draft: Option<EmailDraft>,
    next_email_id: i64,
    finished: bool,
}

impl Default for SequenceWizard {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl SequenceWizard {
    pub fn new(preselected: &[LeadId]) -> Self {
        let mut selected: Vec<LeadId> = Vec::with_capacity(preselected.len());
        for id in preselected {
            if !selected.contains(id) {
                selected.push(*id);
            }
        }
        Self {
            step: WizardStep::Setup,
            name: String::new(),
            description: String::new(),
            emails: Vec::new(),
            selected,
            draft: None,
            next_email_id: 1,
            finished: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn emails(&self) -> &[OutreachEmail] {
        &self.emails
    }

    pub fn selected_leads(&self) -> &[LeadId] {
        &self.selected
    }

    pub fn is_selected(&self, id: LeadId) -> bool {
        self.selected.contains(&id)
    }

    pub fn draft(&self) -> Option<&EmailDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut EmailDraft> {
        self.draft.as_mut()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn can_proceed(&self) -> bool {
        match self.step {
            WizardStep::Setup => {
                !self.name.trim().is_empty() && !self.description.trim().is_empty()
            }
            WizardStep::Emails => !self.emails.is_empty(),
            WizardStep::Leads => !self.selected.is_empty(),
            WizardStep::Settings | WizardStep::Review => true,
        }
    }

    fn guard_message(&self) -> &'static str {
        match self.step {
            WizardStep::Setup => "sequence name and description are required",
            WizardStep::Emails => "add at least one email",
            WizardStep::Leads => "select at least one lead",
            WizardStep::Settings | WizardStep::Review => "",
        }
    }

    /// Advances one step, or assembles the sequence from the Review step.
    /// `available` is the lead collection the selection refers to.
    pub fn next(&mut self, available: &[Lead]) -> WizardOutcome {
        if self.finished {
            return WizardOutcome::Rejected("sequence already created");
        }
        if !self.can_proceed() {
            tracing::warn!(step = self.step.label(), "wizard step incomplete");
            return WizardOutcome::Rejected(self.guard_message());
        }
        match self.step.next() {
            Some(step) => {
                self.step = step;
                WizardOutcome::Moved(step)
            }
            None => {
                self.finished = true;
                let leads = available
                    .iter()
                    .filter(|lead| self.selected.contains(&lead.id))
                    .cloned()
                    .collect();
                WizardOutcome::Create(NewSequence {
                    name: self.name.clone(),
                    description: self.description.clone(),
                    emails: self.emails.clone(),
                    leads,
                    status: SequenceStatus::Draft,
                })
            }
        }
    }

    pub fn back(&mut self) -> WizardOutcome {
        match self.step.prev() {
            Some(step) => {
                self.step = step;
                WizardOutcome::Moved(step)
            }
            None => WizardOutcome::Cancel,
        }
    }

    /// Opens the email editor, prefilled from `edit_index` when editing.
    pub fn open_creator(&mut self, mode: EmailCreationMode, edit_index: Option<usize>) -> bool {
        let (subject, content, delay_days) = match edit_index {
            Some(index) => match self.emails.get(index) {
                Some(email) => (email.subject.clone(), email.content.clone(), email.delay_days),
                None => return false,
            },
            None => (
                String::new(),
                String::new(),
                if self.emails.is_empty() {
                    FIRST_EMAIL_DELAY
                } else {
                    FOLLOW_UP_DELAY
                },
            ),
        };
        self.draft = Some(EmailDraft {
            mode,
            editing: edit_index,
            subject,
            content,
            delay_days,
            template_id: None,
            ai_prompt: String::new(),
        });
        true
    }

    pub fn cancel_creator(&mut self) {
        self.draft = None;
    }

    pub fn apply_template(&mut self, template: &EmailTemplate) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        draft.subject = template.subject.to_owned();
        draft.content = template.content.to_owned();
        draft.template_id = Some(template.id);
        true
    }

    pub fn apply_generated(&mut self, subject: &str, content: &str) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        draft.subject = subject.to_owned();
        draft.content = content.to_owned();
        true
    }

    /// Appends the draft, or replaces the email it was opened on. Returns
    /// the index of the saved email.
    pub fn save_email(&mut self) -> Result<usize> {
        let draft = match self.draft.take() {
            Some(draft) if draft.can_save() => draft,
            Some(draft) => {
                self.draft = Some(draft);
                bail!("email subject and content are required -- fill both and retry");
            }
            None => bail!("no email is being edited -- open the email editor first"),
        };
        if draft.delay_days > MAX_EMAIL_DELAY_DAYS {
            let delay = draft.delay_days;
            self.draft = Some(draft);
            bail!(
                "email delay {delay} days exceeds {MAX_EMAIL_DELAY_DAYS} -- enter a shorter delay and retry"
            );
        }
        let id = match draft.editing.and_then(|index| self.emails.get(index)) {
            Some(existing) => existing.id,
            None => self.allocate_email_id(),
        };
        let email = OutreachEmail {
            id,
            subject: draft.subject,
            content: draft.content,
            delay_days: draft.delay_days,
            is_follow_up: !self.emails.is_empty() || draft.delay_days > 0,
        };
        let index = match draft.editing {
            Some(index) if index < self.emails.len() => {
                self.emails[index] = email;
                index
            }
            _ => {
                self.emails.push(email);
                self.emails.len() - 1
            }
        };
        Ok(index)
    }

    pub fn delete_email(&mut self, index: usize) -> bool {
        if index >= self.emails.len() {
            return false;
        }
        self.emails.remove(index);
        true
    }

    pub fn duplicate_email(&mut self, index: usize) -> bool {
        let Some(source) = self.emails.get(index).cloned() else {
            return false;
        };
        let id = self.allocate_email_id();
        self.emails.push(OutreachEmail {
            id,
            subject: format!("{} (Copy)", source.subject),
            delay_days: source
                .delay_days
                .saturating_add(DUPLICATE_DELAY_STEP)
                .min(MAX_EMAIL_DELAY_DAYS),
            ..source
        });
        true
    }

    pub fn toggle_lead(&mut self, id: LeadId) {
        match self.selected.iter().position(|selected| *selected == id) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(id),
        }
    }

    /// Selects every lead in `available`, or clears the selection when all
    /// of them are already selected.
    pub fn toggle_all(&mut self, available: &[Lead]) {
        if !available.is_empty() && available.iter().all(|lead| self.is_selected(lead.id)) {
            self.selected.clear();
        } else {
            for lead in available {
                if !self.is_selected(lead.id) {
                    self.selected.push(lead.id);
                }
            }
        }
    }

    /// Cumulative day offset of every email from the sequence start.
    pub fn timeline(&self) -> Vec<(u32, &OutreachEmail)> {
        let mut day: u32 = 0;
        self.emails
            .iter()
            .map(|email| {
                day = day.saturating_add(email.delay_days);
                (day, email)
            })
            .collect()
    }

    fn allocate_email_id(&mut self) -> EmailId {
        let id = EmailId::new(self.next_email_id);
        self.next_email_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EmailCreationMode, MAX_EMAIL_DELAY_DAYS, SequenceWizard, WizardOutcome, WizardStep,
    };
    use crate::{EMAIL_TEMPLATES, Lead, LeadId, NewLead, SOURCE_AI_CHAT, SequenceStatus};
    use time::macros::datetime;

    fn leads() -> Vec<Lead> {
        (1..=3)
            .map(|id| {
                NewLead {
                    name: format!("Lead {id}"),
                    ..NewLead::default()
                }
                .into_lead(
                    LeadId::new(id),
                    SOURCE_AI_CHAT,
                    datetime!(2026-03-01 09:00 UTC),
                )
            })
            .collect()
    }

    fn add_email(wizard: &mut SequenceWizard, subject: &str) {
        assert!(wizard.open_creator(EmailCreationMode::Manual, None));
        let draft = wizard.draft_mut().expect("draft open");
        draft.subject = subject.to_owned();
        draft.content = "Hi {{firstName}}".to_owned();
        wizard.save_email().expect("save email");
    }

    #[test]
    fn setup_guard_rejects_blank_name_without_change() {
        let mut wizard = SequenceWizard::default();
        wizard.name = "   ".to_owned();
        wizard.description = "Intro".to_owned();
        let before = wizard.clone();

        let outcome = wizard.next(&leads());
        assert!(matches!(outcome, WizardOutcome::Rejected(_)));
        assert_eq!(wizard, before);
    }

    #[test]
    fn setup_guard_passes_with_trimmed_name_and_description() {
        let mut wizard = SequenceWizard::default();
        wizard.name = " Q2 push ".to_owned();
        wizard.description = "warm intro".to_owned();
        assert_eq!(
            wizard.next(&leads()),
            WizardOutcome::Moved(WizardStep::Emails)
        );
    }

    #[test]
    fn back_from_setup_cancels() {
        let mut wizard = SequenceWizard::default();
        assert_eq!(wizard.back(), WizardOutcome::Cancel);
        assert_eq!(wizard.step(), WizardStep::Setup);
    }

    #[test]
    fn full_walk_creates_draft_sequence_in_collection_order() {
        let available = leads();
        let mut wizard = SequenceWizard::new(&[LeadId::new(3)]);
        wizard.name = "Q2".to_owned();
        wizard.description = "intro".to_owned();
        wizard.next(&available);

        assert!(matches!(wizard.next(&available), WizardOutcome::Rejected(_)));
        add_email(&mut wizard, "Hello");
        assert_eq!(
            wizard.next(&available),
            WizardOutcome::Moved(WizardStep::Leads)
        );

        wizard.toggle_lead(LeadId::new(1));
        assert_eq!(
            wizard.next(&available),
            WizardOutcome::Moved(WizardStep::Settings)
        );
        assert_eq!(
            wizard.next(&available),
            WizardOutcome::Moved(WizardStep::Review)
        );

        let WizardOutcome::Create(sequence) = wizard.next(&available) else {
            panic!("review should create the sequence");
        };
        assert_eq!(sequence.status, SequenceStatus::Draft);
        let ids: Vec<i64> = sequence.leads.iter().map(|lead| lead.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(sequence.emails.len(), 1);
        assert!(wizard.is_finished());
        assert!(matches!(wizard.next(&available), WizardOutcome::Rejected(_)));
    }

    #[test]
    fn leads_guard_requires_selection() {
        let available = leads();
        let mut wizard = SequenceWizard::default();
        wizard.name = "Q2".to_owned();
        wizard.description = "intro".to_owned();
        wizard.next(&available);
        add_email(&mut wizard, "Hello");
        wizard.next(&available);

        assert!(matches!(wizard.next(&available), WizardOutcome::Rejected(_)));
        wizard.toggle_all(&available);
        assert_eq!(wizard.selected_leads().len(), 3);
        wizard.toggle_all(&available);
        assert!(wizard.selected_leads().is_empty());
    }

    #[test]
    fn default_delays_and_follow_up_flags() {
        let mut wizard = SequenceWizard::default();
        wizard.open_creator(EmailCreationMode::Manual, None);
        assert_eq!(wizard.draft().map(|draft| draft.delay_days), Some(0));
        wizard.cancel_creator();

        add_email(&mut wizard, "first");
        add_email(&mut wizard, "second");
        let emails = wizard.emails();
        assert!(!emails[0].is_follow_up);
        assert_eq!(emails[1].delay_days, 3);
        assert!(emails[1].is_follow_up);
    }

    #[test]
    fn first_email_with_delay_is_follow_up() {
        let mut wizard = SequenceWizard::default();
        wizard.open_creator(EmailCreationMode::Manual, None);
        let draft = wizard.draft_mut().expect("draft");
        draft.subject = "s".to_owned();
        draft.content = "c".to_owned();
        draft.delay_days = 2;
        wizard.save_email().expect("save");
        assert!(wizard.emails()[0].is_follow_up);
    }

    #[test]
    fn editing_replaces_in_place_and_keeps_id() {
        let mut wizard = SequenceWizard::default();
        add_email(&mut wizard, "first");
        add_email(&mut wizard, "second");
        let id = wizard.emails()[0].id;

        assert!(wizard.open_creator(EmailCreationMode::Manual, Some(0)));
        assert_eq!(
            wizard.draft().map(|draft| draft.subject.as_str()),
            Some("first")
        );
        wizard.draft_mut().expect("draft").subject = "renamed".to_owned();
        assert_eq!(wizard.save_email().expect("save"), 0);
        assert_eq!(wizard.emails().len(), 2);
        assert_eq!(wizard.emails()[0].subject, "renamed");
        assert_eq!(wizard.emails()[0].id, id);
        assert!(!wizard.open_creator(EmailCreationMode::Manual, Some(9)));
    }

    #[test]
    fn save_requires_subject_and_content() {
        let mut wizard = SequenceWizard::default();
        assert!(wizard.save_email().is_err());
        wizard.open_creator(EmailCreationMode::Manual, None);
        assert!(wizard.save_email().is_err());
        assert!(wizard.emails().is_empty());
    }

    #[test]
    fn duplicate_suffixes_subject_and_pushes_delay() {
        let mut wizard = SequenceWizard::default();
        add_email(&mut wizard, "first");
        add_email(&mut wizard, "second");
        assert!(wizard.duplicate_email(1));

        let copy = &wizard.emails()[2];
        assert_eq!(copy.subject, "second (Copy)");
        assert_eq!(copy.delay_days, 6);
        assert_ne!(copy.id, wizard.emails()[1].id);
        assert!(!wizard.duplicate_email(7));

        assert!(wizard.delete_email(0));
        assert_eq!(wizard.emails().len(), 2);
    }

    #[test]
    fn template_fills_draft() {
        let mut wizard = SequenceWizard::default();
        assert!(!wizard.apply_template(&EMAIL_TEMPLATES[0]));
        wizard.open_creator(EmailCreationMode::Template, None);
        assert!(wizard.apply_template(&EMAIL_TEMPLATES[1]));
        let draft = wizard.draft().expect("draft");
        assert_eq!(draft.template_id, Some("follow-1"));
        assert!(draft.can_save());
    }

    #[test]
    fn timeline_accumulates_delays() {
        let mut wizard = SequenceWizard::default();
        add_email(&mut wizard, "a");
        add_email(&mut wizard, "b");
        add_email(&mut wizard, "c");
        let days: Vec<u32> = wizard.timeline().iter().map(|(day, _)| *day).collect();
        assert_eq!(days, vec![0, 3, 6]);
    }

    #[test]
    fn preselected_leads_are_deduplicated() {
        let wizard = SequenceWizard::new(&[LeadId::new(2), LeadId::new(2), LeadId::new(1)]);
        assert_eq!(wizard.selected_leads(), &[LeadId::new(2), LeadId::new(1)]);
    }

    #[test]
    fn save_email_rejects_delay_beyond_limit_and_keeps_draft() {
        let mut wizard = SequenceWizard::default();
        wizard.open_creator(EmailCreationMode::Manual, None);
        let draft = wizard.draft_mut().expect("draft open");
        draft.subject = "Hello".to_owned();
        draft.content = "Body".to_owned();
        draft.delay_days = 9_999_999;

        let error = wizard.save_email().expect_err("huge delay should fail");
        assert!(error.to_string().contains("exceeds 365"));
        assert!(wizard.emails().is_empty());
        assert_eq!(wizard.draft().map(|draft| draft.delay_days), Some(9_999_999));

        wizard.draft_mut().expect("draft kept").delay_days = MAX_EMAIL_DELAY_DAYS;
        assert_eq!(wizard.save_email().expect("limit is allowed"), 0);
    }

    #[test]
    fn duplicate_and_timeline_saturate_on_huge_delays() {
        let mut wizard = SequenceWizard::default();
        add_email(&mut wizard, "a");
        wizard.open_creator(EmailCreationMode::Manual, Some(0));
        wizard.draft_mut().expect("draft open").delay_days = MAX_EMAIL_DELAY_DAYS;
        wizard.save_email().expect("save at limit");

        assert!(wizard.duplicate_email(0));
        assert_eq!(wizard.emails()[1].delay_days, MAX_EMAIL_DELAY_DAYS);

        let mut emails = wizard.emails().to_vec();
        emails[0].delay_days = u32::MAX;
        emails[1].delay_days = u32::MAX;
        let mut raw = SequenceWizard::default();
        raw.emails = emails;
        assert!(raw.duplicate_email(0));
        let days: Vec<u32> = raw.timeline().iter().map(|(day, _)| *day).collect();
        assert_eq!(days, vec![u32::MAX, u32::MAX, u32::MAX]);
    }
}
