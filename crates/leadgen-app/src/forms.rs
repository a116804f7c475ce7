// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;
use thiserror::Error;

use crate::{CampaignPriority, LeadId, NewLead};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email pattern"));

pub const LOGIN_PASSWORD_MIN: usize = 6;
pub const SIGNUP_PASSWORD_MIN: usize = 8;
pub const LEAD_SCORE_MIN: i64 = 1;
pub const LEAD_SCORE_MAX: i64 = 100;
pub const LEAD_SCORE_DEFAULT: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldErrorKind {
    #[error("is required")]
    Required,
    #[error("is invalid")]
    InvalidEmail,
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
    #[error("does not match")]
    Mismatch,
    #[error("must be between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", field_label(self.field), self.kind)
    }
}

impl std::error::Error for FieldError {}

/// Per-field validation failures of one form, at most one per field, in
/// the order the fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn push(&mut self, field: &'static str, kind: FieldErrorKind) {
        if self.get(field).is_none() {
            self.errors.push(FieldError { field, kind });
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    pub fn message(&self, field: &str) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn into_result(self) -> std::result::Result<(), FormErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}

fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

fn check_email(errors: &mut FormErrors, email: &str) {
    if email.is_empty() {
        errors.push("email", FieldErrorKind::Required);
    } else if !is_valid_email(email) {
        errors.push("email", FieldErrorKind::InvalidEmail);
    }
}

fn check_password(errors: &mut FormErrors, password: &str, min: usize) {
    if password.is_empty() {
        errors.push("password", FieldErrorKind::Required);
    } else if password.chars().count() < min {
        errors.push("password", FieldErrorKind::TooShort { min });
    }
}

/// Splits comma-separated tag text, trimming and dropping blanks.
pub fn parse_tags(text: &str) -> BTreeSet<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginFormInput {
    pub email: String,
    pub password: String,
}

impl LoginFormInput {
    pub fn validate(&self) -> std::result::Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password, LOGIN_PASSWORD_MIN);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignupFormInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupFormInput {
    pub fn validate(&self) -> std::result::Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.first_name.trim().is_empty() {
            errors.push("first_name", FieldErrorKind::Required);
        }
        if self.last_name.trim().is_empty() {
            errors.push("last_name", FieldErrorKind::Required);
        }
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password, SIGNUP_PASSWORD_MIN);
        if self.confirm_password.is_empty() {
            errors.push("confirm_password", FieldErrorKind::Required);
        } else if self.confirm_password != self.password {
            errors.push("confirm_password", FieldErrorKind::Mismatch);
        }
        errors.into_result()
    }
}

/// The manual "add lead" dialog. Score and tags arrive as raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadFormInput {
    pub name: String,
    pub title: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub linkedin_url: String,
    pub industry: String,
    pub location: String,
    pub description: String,
    pub score: String,
    pub tags: String,
    pub category: String,
    pub chat_title: String,
}

impl Default for LeadFormInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
            linkedin_url: String::new(),
            industry: String::new(),
            location: String::new(),
            description: String::new(),
            score: LEAD_SCORE_DEFAULT.to_string(),
            tags: String::new(),
            category: String::new(),
            chat_title: String::new(),
        }
    }
}

impl LeadFormInput {
    pub fn validate(&self) -> std::result::Result<(), FormErrors> {
        self.to_new_lead().map(|_| ())
    }

    pub fn to_new_lead(&self) -> std::result::Result<NewLead, FormErrors> {
        let mut errors = FormErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", FieldErrorKind::Required);
        }
        check_email(&mut errors, self.email.trim());
        let score = match self.score.trim().parse::<i64>() {
            Ok(score) if (LEAD_SCORE_MIN..=LEAD_SCORE_MAX).contains(&score) => {
                u8::try_from(score).ok()
            }
            _ => None,
        };
        if score.is_none() {
            errors.push(
                "score",
                FieldErrorKind::OutOfRange {
                    min: LEAD_SCORE_MIN,
                    max: LEAD_SCORE_MAX,
                },
            );
        }
        errors.into_result()?;

        Ok(NewLead {
            name: self.name.trim().to_owned(),
            title: self.title.trim().to_owned(),
            company: self.company.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: optional_text(&self.phone),
            linkedin_url: optional_text(&self.linkedin_url),
            industry: self.industry.trim().to_owned(),
            location: self.location.trim().to_owned(),
            description: self.description.trim().to_owned(),
            category: optional_text(&self.category),
            chat_title: optional_text(&self.chat_title),
            tags: parse_tags(&self.tags),
            score: score.unwrap_or(LEAD_SCORE_DEFAULT),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignFormInput {
    pub name: String,
    pub description: String,
    pub goal: String,
    pub priority: CampaignPriority,
    pub category: String,
    pub tags: String,
    pub lead_ids: Vec<LeadId>,
}

impl CampaignFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("campaign name is required -- enter a name and retry");
        }
        if self.description.trim().is_empty() {
            bail!("campaign description is required -- describe the campaign and retry");
        }
        if self.goal.trim().is_empty() {
            bail!("campaign goal is required -- enter a goal and retry");
        }
        if self.lead_ids.is_empty() {
            bail!("campaign needs at least one lead -- select leads and retry");
        }
        Ok(())
    }

    pub fn goal(&self) -> Option<String> {
        optional_text(&self.goal)
    }

    pub fn category(&self) -> Option<String> {
        optional_text(&self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CampaignFormInput, FieldErrorKind, LeadFormInput, LoginFormInput, SignupFormInput,
        is_valid_email, parse_tags,
    };
    use crate::{CampaignPriority, LeadId};

    #[test]
    fn email_pattern_requires_at_and_dot() {
        assert!(is_valid_email("admin@leadgen.com"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("admin@leadgen"));
        assert!(!is_valid_email("admin leadgen.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn login_reports_every_failing_field() {
        let errors = LoginFormInput {
            email: "nope".to_owned(),
            password: "12345".to_owned(),
        }
        .validate()
        .expect_err("login form should fail");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("email").map(|error| error.kind),
            Some(FieldErrorKind::InvalidEmail)
        );
        assert_eq!(
            errors.message("password").as_deref(),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn login_accepts_six_character_password() {
        let form = LoginFormInput {
            email: "admin@leadgen.com".to_owned(),
            password: "123456".to_owned(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn signup_requires_names_and_matching_confirmation() {
        let errors = SignupFormInput {
            first_name: " ".to_owned(),
            last_name: String::new(),
            email: String::new(),
            password: "password".to_owned(),
            confirm_password: "passw0rd".to_owned(),
        }
        .validate()
        .expect_err("signup form should fail");

        assert_eq!(
            errors.message("first_name").as_deref(),
            Some("First name is required")
        );
        assert_eq!(
            errors.message("last_name").as_deref(),
            Some("Last name is required")
        );
        assert_eq!(errors.message("email").as_deref(), Some("Email is required"));
        assert!(errors.get("password").is_none());
        assert_eq!(
            errors.get("confirm_password").map(|error| error.kind),
            Some(FieldErrorKind::Mismatch)
        );
    }

    #[test]
    fn signup_password_minimum_is_eight() {
        let errors = SignupFormInput {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "seven77".to_owned(),
            confirm_password: "seven77".to_owned(),
        }
        .validate()
        .expect_err("short password should fail");
        assert_eq!(
            errors.get("password").map(|error| error.kind),
            Some(FieldErrorKind::TooShort { min: 8 })
        );
    }

    #[test]
    fn tags_split_on_commas_and_drop_blanks() {
        let tags = parse_tags(" CTO, Fintech ,, ,Series B");
        assert_eq!(
            tags.into_iter().collect::<Vec<_>>(),
            vec!["CTO", "Fintech", "Series B"]
        );
    }

    #[test]
    fn lead_form_rejects_out_of_range_score() {
        let form = LeadFormInput {
            name: "Sam".to_owned(),
            email: "sam@example.com".to_owned(),
            score: "0".to_owned(),
            ..LeadFormInput::default()
        };
        let errors = form.validate().expect_err("score 0 should fail");
        assert_eq!(
            errors.message("score").as_deref(),
            Some("Score must be between 1 and 100")
        );

        let form = LeadFormInput {
            score: "abc".to_owned(),
            ..form
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn lead_form_builds_trimmed_lead() {
        let lead = LeadFormInput {
            name: " Sam Rivera ".to_owned(),
            company: "Acme".to_owned(),
            email: "sam@acme.io".to_owned(),
            phone: "  ".to_owned(),
            score: "100".to_owned(),
            tags: "b, a".to_owned(),
            category: "Prospects".to_owned(),
            ..LeadFormInput::default()
        }
        .to_new_lead()
        .expect("valid lead form");

        assert_eq!(lead.name, "Sam Rivera");
        assert_eq!(lead.phone, None);
        assert_eq!(lead.score, 100);
        assert_eq!(lead.category.as_deref(), Some("Prospects"));
        assert_eq!(lead.tags.len(), 2);
    }

    #[test]
    fn campaign_form_requires_goal_and_leads() {
        let mut form = CampaignFormInput {
            name: "Q4 push".to_owned(),
            description: "Fintech CTOs".to_owned(),
            goal: String::new(),
            priority: CampaignPriority::Medium,
            category: String::new(),
            tags: String::new(),
            lead_ids: Vec::new(),
        };
        assert!(form.validate().is_err());

        form.goal = "Book demos".to_owned();
        assert!(form.validate().is_err());

        form.lead_ids.push(LeadId::new(1));
        assert!(form.validate().is_ok());
        assert_eq!(form.category(), None);
    }
}
