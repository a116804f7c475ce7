// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use leadgen_app::{
    ADVANCE_INTERVAL, AppCommand, AppEvent, AppState, Campaign, CampaignFormInput, CampaignId,
    CampaignLeadQuery, CampaignPriority, Chance, DashboardView, EMAIL_TEMPLATES,
    EmailCreationMode, FormErrors, IndustryFilter, Lead, LeadFormInput, LeadId, LeadSortField,
    LoginFormInput, NewLead, OutreachEmailSource, OutreachRequest, Route, SEQUENCE_TEMPLATES,
    Section, SenderProfile, SequenceStatus, SequenceWizard, SessionUser, SignupFormInput,
    SortSpec, Surface, WizardOutcome, WizardStep, analytics_summary, campaign_detail,
    industry_performance, placeholders, render_template, sequence_performance,
    sequence_progress,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use time::OffsetDateTime;

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const STAR_MARK: &str = "★";
const SELECT_MARK: &str = "•";
const CURSOR_MARK: &str = "> ";
const CRUMB_SEPARATOR: &str = " › ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted { message: String, user: SessionUser },
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    LeadsGenerated {
        request_id: u64,
        leads: Vec<NewLead>,
        generated_at: OffsetDateTime,
    },
    ChatReplied {
        request_id: u64,
        reply: String,
    },
    EmailDrafted {
        request_id: u64,
        subject: String,
        content: String,
    },
    TaskFailed {
        request_id: u64,
        error: String,
    },
}

pub trait AppRuntime {
    fn now(&self) -> OffsetDateTime;
    fn sender_profile(&self) -> SenderProfile {
        SenderProfile::default()
    }
    fn chance(&mut self) -> &mut dyn Chance;
    fn login(&mut self, email: &str, password: &str) -> Result<LoginOutcome>;
    fn logout(&mut self) -> Result<()>;
    /// `Some(signed_in)` when the persisted session changed since the last
    /// poll.
    fn poll_session(&mut self) -> Option<bool> {
        None
    }
    fn spawn_lead_generation(
        &mut self,
        request_id: u64,
        prompt: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()>;
    fn spawn_chat_reply(
        &mut self,
        request_id: u64,
        input: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()>;
    fn spawn_email_draft(
        &mut self,
        request_id: u64,
        prompt: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()>;
    fn cancel_request(&mut self, _request_id: u64) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChatLine {
    role: ChatRole,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ChatUiState {
    input: String,
    transcript: Vec<ChatLine>,
    in_flight: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct GenerateUiState {
    prompt: String,
    in_flight: Option<u64>,
    marked: Vec<LeadId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormKind {
    Login,
    Signup,
    Lead,
    Campaign,
}

impl FormKind {
    const fn title(self) -> &'static str {
        match self {
            Self::Login => "sign in",
            Self::Signup => "create account",
            Self::Lead => "add lead",
            Self::Campaign => "new campaign",
        }
    }

    /// Dashboard forms float over the current section and close on esc.
    const fn is_overlay(self) -> bool {
        matches!(self, Self::Lead | Self::Campaign)
    }

    const fn fields(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Login => &[("email", "Email Address"), ("password", "Password")],
            Self::Signup => &[
                ("first_name", "First Name"),
                ("last_name", "Last Name"),
                ("email", "Email Address"),
                ("password", "Password"),
                ("confirm_password", "Confirm Password"),
            ],
            Self::Lead => &[
                ("name", "Name"),
                ("title", "Title"),
                ("company", "Company"),
                ("email", "Email"),
                ("phone", "Phone"),
                ("industry", "Industry"),
                ("location", "Location"),
                ("score", "Score"),
                ("tags", "Tags"),
                ("category", "Category"),
            ],
            Self::Campaign => &[
                ("name", "Campaign Name"),
                ("description", "Description"),
                ("goal", "Goal"),
                ("priority", "Priority (low/medium/high)"),
                ("category", "Category"),
                ("tags", "Tags"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormUiState {
    kind: FormKind,
    values: Vec<String>,
    focus: usize,
    errors: Vec<String>,
}

impl FormUiState {
    fn new(kind: FormKind) -> Self {
        let defaults = LeadFormInput::default();
        let values = kind
            .fields()
            .iter()
            .map(|(key, _)| match (kind, *key) {
                (FormKind::Lead, "score") => defaults.score.clone(),
                (FormKind::Campaign, "priority") => CampaignPriority::Medium.as_str().to_owned(),
                _ => String::new(),
            })
            .collect();
        Self {
            kind,
            values,
            focus: 0,
            errors: Vec::new(),
        }
    }

    fn value(&self, key: &str) -> String {
        self.kind
            .fields()
            .iter()
            .position(|(field, _)| *field == key)
            .and_then(|index| self.values.get(index))
            .cloned()
            .unwrap_or_default()
    }

    fn focused_mut(&mut self) -> Option<&mut String> {
        self.values.get_mut(self.focus)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditTarget {
    Search,
    CampaignName,
    NewCategory,
    RenameCategory(String),
    OutreachName,
    CampaignSearch,
    NewCampaignCategory,
    RemoveCampaignCategory,
    GoToPath,
}

impl EditTarget {
    fn prompt(&self) -> String {
        match self {
            Self::Search | Self::CampaignSearch => "search".to_owned(),
            Self::CampaignName => "campaign name".to_owned(),
            Self::NewCategory => "new category".to_owned(),
            Self::RenameCategory(old) => format!("rename {old}"),
            Self::OutreachName => "outreach name".to_owned(),
            Self::NewCampaignCategory => "new campaign category".to_owned(),
            Self::RemoveCampaignCategory => "remove campaign category".to_owned(),
            Self::GoToPath => "go to".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditorState {
    target: EditTarget,
    buffer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DraftField {
    #[default]
    Subject,
    Content,
    Delay,
    Prompt,
}

impl DraftField {
    const fn label(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Content => "content",
            Self::Delay => "delay",
            Self::Prompt => "prompt",
        }
    }

    fn next(self, mode: EmailCreationMode) -> Self {
        match self {
            Self::Subject => Self::Content,
            Self::Content => Self::Delay,
            Self::Delay if mode == EmailCreationMode::Ai => Self::Prompt,
            Self::Delay | Self::Prompt => Self::Subject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct WizardUiState {
    cursor: usize,
    editing_description: bool,
    draft_field: DraftField,
    template_index: usize,
    draft_request: Option<u64>,
}

/// One campaign's lead snapshot, opened from the campaigns section.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CampaignDetailUiState {
    campaign: CampaignId,
    query: CampaignLeadQuery,
    sort: SortSpec,
    cursor: usize,
    selected: Vec<LeadId>,
}

impl CampaignDetailUiState {
    fn new(campaign: CampaignId) -> Self {
        Self {
            campaign,
            query: CampaignLeadQuery::default(),
            sort: SortSpec::default(),
            cursor: 0,
            selected: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    status_token: u64,
    next_request_id: u64,
    cursor: usize,
    sender: SenderProfile,
    chat: ChatUiState,
    generate: GenerateUiState,
    form: Option<FormUiState>,
    editor: Option<EditorState>,
    wizard: WizardUiState,
    outreach_template: usize,
    campaign_detail: Option<CampaignDetailUiState>,
    help_visible: bool,
}

impl ViewData {
    fn allocate_request_id(&mut self) -> u64 {
        self.next_request_id = self.next_request_id.saturating_add(1);
        self.next_request_id
    }

    /// Drops every per-session panel while keeping counters, so late
    /// timers and responses stay distinguishable.
    fn reset_session(&mut self) {
        *self = Self {
            status_token: self.status_token,
            next_request_id: self.next_request_id,
            sender: self.sender.clone(),
            ..Self::default()
        };
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        sender: runtime.sender_profile(),
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();
    let mut last_advance = Instant::now();

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);
        sync_session(state, runtime, &mut view_data, &internal_tx);

        if last_advance.elapsed() >= ADVANCE_INTERVAL {
            tick_outreach(state, runtime);
            last_advance = Instant::now();
        }

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event
            && let Event::Key(key) = event::read().context("read event")?
            && handle_key_event(state, runtime, &mut view_data, &internal_tx, key)
        {
            break;
        }
    }

    cancel_all_requests(runtime, &mut view_data);
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Runs one step of the simulated mailbox. Returns the number of
/// activities that changed status.
pub fn tick_outreach<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> usize {
    let now = runtime.now();
    let changed = state.workspace.advance_activities(now, runtime.chance());
    if changed > 0 {
        tracing::debug!(changed, "outreach activities advanced");
    }
    changed
}

fn sync_session<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let Some(signed_in) = runtime.poll_session() else {
        return;
    };
    if signed_in == state.is_authenticated() {
        return;
    }
    if signed_in {
        state.dispatch(AppCommand::SignedIn);
        view_data.form = None;
    } else {
        sign_out_locally(state, runtime, view_data, tx);
    }
}

fn sign_out_locally<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    cancel_all_requests(runtime, view_data);
    view_data.reset_session();
    dispatch_tracked(state, view_data, tx, AppCommand::SignedOut);
}

fn cancel_all_requests<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> usize {
    let pending = [
        view_data.generate.in_flight.take(),
        view_data.chat.in_flight.take(),
        view_data.wizard.draft_request.take(),
    ];
    let mut cancelled = 0;
    for request_id in pending.into_iter().flatten() {
        if let Err(error) = runtime.cancel_request(request_id) {
            tracing::warn!(request_id, %error, "cancel request failed");
        }
        cancelled += 1;
    }
    cancelled
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        handle_internal_event(state, view_data, tx, event);
    }
}

fn handle_internal_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: InternalEvent,
) {
    match event {
        InternalEvent::ClearStatus { token } if token == view_data.status_token => {
            state.dispatch(AppCommand::ClearStatus);
        }
        InternalEvent::ClearStatus { .. } => {}
        InternalEvent::LeadsGenerated {
            request_id,
            leads,
            generated_at,
        } => {
            if view_data.generate.in_flight != Some(request_id) {
                return;
            }
            view_data.generate.in_flight = None;
            view_data.generate.prompt.clear();
            view_data.generate.marked.clear();
            view_data.cursor = 0;
            let count = state
                .workspace
                .stage_leads(leads, None, generated_at)
                .len();
            emit_status(
                state,
                view_data,
                tx,
                format!("found {count} leads | ctrl+s save | ctrl+d discard"),
            );
        }
        InternalEvent::ChatReplied { request_id, reply } => {
            if view_data.chat.in_flight != Some(request_id) {
                return;
            }
            view_data.chat.in_flight = None;
            view_data.chat.transcript.push(ChatLine {
                role: ChatRole::Assistant,
                text: reply,
            });
        }
        InternalEvent::EmailDrafted {
            request_id,
            subject,
            content,
        } => {
            if view_data.wizard.draft_request != Some(request_id) {
                return;
            }
            view_data.wizard.draft_request = None;
            let applied = state
                .wizard
                .as_mut()
                .is_some_and(|wizard| wizard.apply_generated(&subject, &content));
            if applied {
                emit_status(state, view_data, tx, "email drafted | ctrl+s save");
            }
        }
        InternalEvent::TaskFailed { request_id, error } => {
            let slots = [
                &mut view_data.generate.in_flight,
                &mut view_data.chat.in_flight,
                &mut view_data.wizard.draft_request,
            ];
            let mut matched = false;
            for slot in slots {
                if *slot == Some(request_id) {
                    *slot = None;
                    matched = true;
                }
            }
            if matched {
                emit_status(state, view_data, tx, format!("request failed: {error}"));
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    let message = message.into();
    state.set_status(&message);
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Dispatches and schedules a clear for any status line the command set.
fn dispatch_tracked(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) -> Vec<AppEvent> {
    let events = state.dispatch(command);
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
    if events.iter().any(|event| {
        matches!(
            event,
            AppEvent::ViewChanged(_) | AppEvent::SectionChanged(_) | AppEvent::QueryChanged
        )
    }) {
        view_data.cursor = 0;
    }
    events
}

fn is_ctrl(key: KeyEvent, ch: char) -> bool {
    key.code == KeyCode::Char(ch) && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn typed_char(key: KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(ch)
        }
        _ => None,
    }
}

fn move_cursor(cursor: &mut usize, delta: isize, len: usize) {
    if len == 0 {
        *cursor = 0;
        return;
    }
    let next = (*cursor as isize + delta).clamp(0, len as isize - 1);
    *cursor = next as usize;
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if is_ctrl(key, 'q') {
        return true;
    }

    if is_ctrl(key, 'c') {
        let message = if cancel_all_requests(runtime, view_data) > 0 {
            "request canceled"
        } else {
            "cancel requested; nothing in flight"
        };
        emit_status(state, view_data, internal_tx, message);
        return false;
    }

    if key.code == KeyCode::F(1) {
        view_data.help_visible = !view_data.help_visible;
        return false;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.editor.is_some() {
        handle_editor_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if view_data
        .form
        .as_ref()
        .is_some_and(|form| form.kind.is_overlay())
    {
        handle_form_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    match state.surface {
        Surface::Public(route) => {
            handle_public_key(state, runtime, view_data, internal_tx, route, key);
        }
        Surface::Dashboard => handle_dashboard_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_public_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    route: Route,
    key: KeyEvent,
) {
    if is_ctrl(key, 'n') {
        state.dispatch(AppCommand::NextPage);
        return;
    }
    if is_ctrl(key, 'p') {
        state.dispatch(AppCommand::PrevPage);
        return;
    }
    if is_ctrl(key, 'g') {
        view_data.editor = Some(EditorState {
            target: EditTarget::GoToPath,
            buffer: route.path().to_owned(),
        });
        return;
    }

    match route {
        Route::Chat => handle_chat_key(state, runtime, view_data, internal_tx, key),
        Route::Settings => handle_form_key(state, runtime, view_data, internal_tx, key),
        Route::Home | Route::About | Route::Blog | Route::Dashboard | Route::NotFound => {
            if key.code == KeyCode::Esc {
                state.dispatch(AppCommand::GoTo(Route::Chat));
            }
        }
    }
}

fn handle_chat_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Enter => {
            let input = view_data.chat.input.trim().to_owned();
            if input.is_empty() {
                return;
            }
            if view_data.chat.in_flight.is_some() {
                emit_status(state, view_data, internal_tx, "waiting for the previous reply");
                return;
            }
            view_data.chat.input.clear();
            view_data.chat.transcript.push(ChatLine {
                role: ChatRole::User,
                text: input.clone(),
            });
            let request_id = view_data.allocate_request_id();
            match runtime.spawn_chat_reply(request_id, &input, internal_tx.clone()) {
                Ok(()) => view_data.chat.in_flight = Some(request_id),
                Err(error) => {
                    emit_status(state, view_data, internal_tx, format!("chat failed: {error}"));
                }
            }
        }
        KeyCode::Backspace => {
            view_data.chat.input.pop();
        }
        _ => {
            if let Some(ch) = typed_char(key) {
                view_data.chat.input.push(ch);
            }
        }
    }
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let form = view_data
        .form
        .get_or_insert_with(|| FormUiState::new(FormKind::Login));
    let field_count = form.values.len().max(1);

    if is_ctrl(key, 't') {
        match form.kind {
            FormKind::Login => *form = FormUiState::new(FormKind::Signup),
            FormKind::Signup => *form = FormUiState::new(FormKind::Login),
            FormKind::Lead | FormKind::Campaign => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            if form.kind.is_overlay() {
                view_data.form = None;
            } else {
                *form = FormUiState::new(form.kind);
            }
        }
        KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % field_count,
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = (form.focus + field_count - 1) % field_count;
        }
        KeyCode::Backspace => {
            if let Some(value) = form.focused_mut() {
                value.pop();
            }
        }
        KeyCode::Enter => submit_form(state, runtime, view_data, internal_tx),
        _ => {
            if let Some(ch) = typed_char(key)
                && let Some(value) = form.focused_mut()
            {
                value.push(ch);
            }
        }
    }
}

fn set_form_errors(view_data: &mut ViewData, errors: &FormErrors) {
    if let Some(form) = view_data.form.as_mut() {
        form.errors = errors.iter().map(ToString::to_string).collect();
    }
}

fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(form) = view_data.form.clone() else {
        return;
    };

    match form.kind {
        FormKind::Login => {
            let input = LoginFormInput {
                email: form.value("email"),
                password: form.value("password"),
            };
            if let Err(errors) = input.validate() {
                set_form_errors(view_data, &errors);
                return;
            }
            match runtime.login(&input.email, &input.password) {
                Ok(LoginOutcome::Accepted { message, user }) => {
                    view_data.form = None;
                    state.dispatch(AppCommand::SignedIn);
                    tracing::debug!(name = %user.name, "dashboard opened");
                    emit_status(state, view_data, internal_tx, message);
                }
                Ok(LoginOutcome::Rejected(message)) => {
                    if let Some(form) = view_data.form.as_mut() {
                        form.errors = vec![message.clone()];
                    }
                    emit_status(state, view_data, internal_tx, message);
                }
                Err(error) => {
                    emit_status(state, view_data, internal_tx, format!("login failed: {error}"));
                }
            }
        }
        FormKind::Signup => {
            let input = SignupFormInput {
                first_name: form.value("first_name"),
                last_name: form.value("last_name"),
                email: form.value("email"),
                password: form.value("password"),
                confirm_password: form.value("confirm_password"),
            };
            match input.validate() {
                Ok(()) => {
                    view_data.form = Some(FormUiState::new(FormKind::Login));
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        "Account created successfully! (This is a demo)",
                    );
                }
                Err(errors) => set_form_errors(view_data, &errors),
            }
        }
        FormKind::Lead => {
            let input = LeadFormInput {
                name: form.value("name"),
                title: form.value("title"),
                company: form.value("company"),
                email: form.value("email"),
                phone: form.value("phone"),
                industry: form.value("industry"),
                location: form.value("location"),
                score: form.value("score"),
                tags: form.value("tags"),
                category: form.value("category"),
                ..LeadFormInput::default()
            };
            let lead = match input.to_new_lead() {
                Ok(lead) => lead,
                Err(errors) => {
                    set_form_errors(view_data, &errors);
                    return;
                }
            };
            match state.workspace.add_lead(lead, runtime.now()) {
                Ok(_) => {
                    view_data.form = None;
                    emit_status(state, view_data, internal_tx, "lead added");
                }
                Err(error) => emit_status(state, view_data, internal_tx, error.to_string()),
            }
        }
        FormKind::Campaign => submit_campaign_form(state, runtime, view_data, internal_tx, &form),
    }
}

/// Builds a campaign from the selected leads, or from the starred leads
/// when nothing is selected.
fn submit_campaign_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    form: &FormUiState,
) {
    let raw_priority = form.value("priority").trim().to_ascii_lowercase();
    let Some(priority) = CampaignPriority::parse(&raw_priority) else {
        if let Some(form) = view_data.form.as_mut() {
            form.errors = vec![format!(
                "priority must be low, medium or high; got {raw_priority:?}"
            )];
        }
        return;
    };
    let from_selection = !state.selected.is_empty();
    let lead_ids = if from_selection {
        state.selected.clone()
    } else {
        state.workspace.starred_leads().map(|lead| lead.id).collect()
    };
    let input = CampaignFormInput {
        name: form.value("name"),
        description: form.value("description"),
        goal: form.value("goal"),
        priority,
        category: form.value("category"),
        tags: form.value("tags"),
        lead_ids,
    };
    match state.workspace.create_campaign_detailed(&input, runtime.now()) {
        Ok(_) => {
            view_data.form = None;
            if from_selection {
                state.dispatch(AppCommand::ClearSelection);
            }
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("campaign \"{}\" created", input.name.trim()),
            );
        }
        Err(error) => {
            if let Some(form) = view_data.form.as_mut() {
                form.errors = vec![error.to_string()];
            }
        }
    }
}

fn handle_editor_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(editor) = view_data.editor.as_mut() else {
        return;
    };
    let live_search = editor.target == EditTarget::Search;
    let campaign_search = editor.target == EditTarget::CampaignSearch;

    match key.code {
        KeyCode::Esc => {
            view_data.editor = None;
            return;
        }
        KeyCode::Enter => {
            if let Some(editor) = view_data.editor.take() {
                commit_editor(state, runtime, view_data, internal_tx, editor);
            }
            return;
        }
        KeyCode::Backspace => {
            editor.buffer.pop();
        }
        _ => match typed_char(key) {
            Some(ch) => editor.buffer.push(ch),
            None => return,
        },
    }

    let search = editor.buffer.clone();
    if live_search {
        dispatch_tracked(state, view_data, internal_tx, AppCommand::SetSearch(search));
    } else if campaign_search && let Some(detail) = view_data.campaign_detail.as_mut() {
        detail.query.search = search;
        detail.cursor = 0;
    }
}

fn commit_editor<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    editor: EditorState,
) {
    let now = runtime.now();
    let result = match editor.target {
        EditTarget::Search | EditTarget::CampaignSearch => return,
        EditTarget::GoToPath => {
            dispatch_tracked(state, view_data, internal_tx, AppCommand::GoToPath(editor.buffer));
            return;
        }
        EditTarget::NewCampaignCategory => state
            .workspace
            .add_campaign_category(&editor.buffer)
            .map(|()| format!("campaign category \"{}\" added", editor.buffer.trim())),
        EditTarget::RemoveCampaignCategory => {
            let name = editor.buffer.trim();
            if state
                .workspace
                .campaign_categories()
                .iter()
                .any(|existing| existing == name)
            {
                let cleared = state.workspace.remove_campaign_category(name);
                Ok(format!("removed \"{name}\" ({cleared} campaigns uncategorized)"))
            } else {
                Err(anyhow::anyhow!("campaign category {name:?} not found"))
            }
        }
        EditTarget::CampaignName => state
            .workspace
            .create_campaign(&editor.buffer, "", now)
            .map(|_| format!("campaign \"{}\" created", editor.buffer.trim())),
        EditTarget::NewCategory => state
            .workspace
            .add_lead_category(&editor.buffer)
            .map(|()| format!("category \"{}\" added", editor.buffer.trim())),
        EditTarget::RenameCategory(old) => {
            let renamed = state.workspace.rename_lead_category(&old, &editor.buffer);
            if renamed.is_ok() {
                dispatch_tracked(state, view_data, internal_tx, AppCommand::ShowFolders);
            }
            renamed.map(|moved| format!("renamed \"{old}\" ({moved} leads moved)"))
        }
        EditTarget::OutreachName => {
            let template =
                &SEQUENCE_TEMPLATES[view_data.outreach_template % SEQUENCE_TEMPLATES.len()];
            let created = state.workspace.create_outreach(
                OutreachRequest {
                    name: editor.buffer.clone(),
                    description: format!("Created from {}", template.name),
                    source: OutreachEmailSource::Template,
                    template,
                    custom_emails: Vec::new(),
                    selected_leads: state.selected.clone(),
                },
                now,
            );
            if created.is_ok() {
                state.dispatch(AppCommand::ClearSelection);
            }
            created.map(|_| format!("outreach \"{}\" created", editor.buffer.trim()))
        }
    };

    let message = match result {
        Ok(message) => message,
        Err(error) => error.to_string(),
    };
    emit_status(state, view_data, internal_tx, message);
}

fn handle_dashboard_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if is_ctrl(key, 'l') {
        match runtime.logout() {
            Ok(()) => sign_out_locally(state, runtime, view_data, internal_tx),
            Err(error) => {
                emit_status(state, view_data, internal_tx, format!("logout failed: {error}"));
            }
        }
        return;
    }

    if state.wizard.is_some() {
        handle_wizard_key(state, runtime, view_data, internal_tx, key);
        return;
    }

    match key.code {
        KeyCode::Tab => {
            dispatch_tracked(state, view_data, internal_tx, AppCommand::NextSection);
            return;
        }
        KeyCode::BackTab => {
            dispatch_tracked(state, view_data, internal_tx, AppCommand::PrevSection);
            return;
        }
        _ => {}
    }

    match state.section {
        Section::Generate => handle_generate_key(state, runtime, view_data, internal_tx, key),
        Section::Leads => handle_leads_key(state, view_data, internal_tx, key),
        Section::Campaigns => handle_campaigns_key(state, view_data, internal_tx, key),
        Section::Outreach => handle_outreach_key(state, runtime, view_data, internal_tx, key),
        Section::Analytics => {}
        Section::Templates => {
            let len = EMAIL_TEMPLATES.len() + SEQUENCE_TEMPLATES.len();
            handle_list_key(view_data, key, len);
        }
    }
}

fn handle_list_key(view_data: &mut ViewData, key: KeyEvent, len: usize) -> bool {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => move_cursor(&mut view_data.cursor, 1, len),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(&mut view_data.cursor, -1, len),
        KeyCode::Char('g') | KeyCode::Home => view_data.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => view_data.cursor = len.saturating_sub(1),
        _ => return false,
    }
    true
}

fn handle_generate_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if is_ctrl(key, 's') {
        save_staged(state, view_data, internal_tx);
        return;
    }
    if is_ctrl(key, 'a') {
        let saved = state.workspace.commit_all_staged();
        let message = if saved == 0 {
            "no generated leads to save".to_owned()
        } else {
            view_data.generate.marked.clear();
            view_data.cursor = 0;
            format!("saved all {saved} leads")
        };
        emit_status(state, view_data, internal_tx, message);
        return;
    }
    if is_ctrl(key, 'd') {
        let discarded = state.workspace.discard_staged_leads();
        view_data.generate.marked.clear();
        view_data.cursor = 0;
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("discarded {discarded} leads"),
        );
        return;
    }
    if is_ctrl(key, 'x') {
        if let Some(lead) = state.workspace.staged_leads().get(view_data.cursor) {
            let marked = &mut view_data.generate.marked;
            match marked.iter().position(|id| *id == lead.id) {
                Some(index) => {
                    marked.remove(index);
                }
                None => marked.push(lead.id),
            }
        }
        return;
    }

    let staged = state.workspace.staged_leads().len();
    match key.code {
        KeyCode::Enter => start_generation(state, runtime, view_data, internal_tx),
        KeyCode::Up => move_cursor(&mut view_data.cursor, -1, staged),
        KeyCode::Down => move_cursor(&mut view_data.cursor, 1, staged),
        KeyCode::Backspace => {
            view_data.generate.prompt.pop();
        }
        _ => {
            if let Some(ch) = typed_char(key) {
                view_data.generate.prompt.push(ch);
            }
        }
    }
}

fn start_generation<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let prompt = view_data.generate.prompt.trim().to_owned();
    if prompt.is_empty() {
        emit_status(
            state,
            view_data,
            internal_tx,
            "describe the leads you want, then press enter",
        );
        return;
    }
    if view_data.generate.in_flight.is_some() {
        emit_status(
            state,
            view_data,
            internal_tx,
            "generation already running; ctrl+c cancels",
        );
        return;
    }

    let request_id = view_data.allocate_request_id();
    match runtime.spawn_lead_generation(request_id, &prompt, internal_tx.clone()) {
        Ok(()) => {
            view_data.generate.in_flight = Some(request_id);
            emit_status(state, view_data, internal_tx, "generating leads...");
        }
        Err(error) => {
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("generation failed: {error}"),
            );
        }
    }
}

fn save_staged(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let staged = state.workspace.staged_leads();
    if staged.is_empty() {
        emit_status(state, view_data, internal_tx, "no generated leads to save");
        return;
    }
    let chosen: Vec<LeadId> = if view_data.generate.marked.is_empty() {
        staged.iter().map(|lead| lead.id).collect()
    } else {
        view_data.generate.marked.clone()
    };
    let title = staged
        .iter()
        .find(|lead| chosen.contains(&lead.id))
        .and_then(|lead| lead.chat_title.clone())
        .unwrap_or_default();

    let message = match state.workspace.commit_staged_leads(&chosen, &title) {
        Ok(count) => {
            view_data.generate.marked.clear();
            view_data.cursor = 0;
            format!("saved {count} leads to \"{title}\"")
        }
        Err(error) => error.to_string(),
    };
    emit_status(state, view_data, internal_tx, message);
}

fn folder_names(state: &AppState) -> Vec<String> {
    state
        .hierarchy()
        .folders
        .iter()
        .map(|folder| folder.name.clone())
        .collect()
}

fn session_titles(state: &AppState, category: &str) -> Vec<String> {
    state
        .hierarchy()
        .folder(category)
        .map(|folder| {
            folder
                .sessions
                .iter()
                .map(|session| session.title.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn leads_list_len(state: &AppState) -> usize {
    match state.nav.view() {
        DashboardView::Categories => state.hierarchy().folders.len(),
        DashboardView::Chats { category } => session_titles(state, category).len(),
        DashboardView::AllLeads | DashboardView::Table { .. } => state.visible_leads().len(),
    }
}

fn lead_at_cursor(state: &AppState, cursor: usize) -> Option<LeadId> {
    state.visible_leads().get(cursor).map(|lead| lead.id)
}

fn next_sort_field(current: LeadSortField) -> LeadSortField {
    let fields = LeadSortField::ALL;
    let index = fields
        .iter()
        .position(|field| *field == current)
        .unwrap_or(0);
    fields[(index + 1) % fields.len()]
}

fn handle_leads_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let len = leads_list_len(state);
    if handle_list_key(view_data, key, len) {
        return;
    }

    let view = state.nav.view().clone();
    let table_view = matches!(view, DashboardView::AllLeads | DashboardView::Table { .. });

    let command = match key.code {
        KeyCode::Esc | KeyCode::Backspace => Some(AppCommand::NavigateBack),
        KeyCode::Char('f') => Some(AppCommand::ShowFolders),
        KeyCode::Char('h') => Some(AppCommand::ShowAllLeads),
        KeyCode::Char('i') => Some(AppCommand::CycleIndustry),
        KeyCode::Char('t') => Some(AppCommand::ToggleLeadTab),
        KeyCode::Char('o') => Some(AppCommand::SortBy(next_sort_field(state.sort.field))),
        KeyCode::Char('O') => Some(AppCommand::SortBy(state.sort.field)),
        KeyCode::Char('x') => Some(AppCommand::ClearSelection),
        KeyCode::Char('w') => Some(AppCommand::StartWizard),
        KeyCode::Char('s') if table_view => {
            lead_at_cursor(state, view_data.cursor).map(AppCommand::ToggleStar)
        }
        KeyCode::Char(' ') if table_view => {
            lead_at_cursor(state, view_data.cursor).map(AppCommand::ToggleSelected)
        }
        KeyCode::Enter => match &view {
            DashboardView::Categories => folder_names(state)
                .get(view_data.cursor)
                .cloned()
                .map(AppCommand::OpenCategory),
            DashboardView::Chats { category } => session_titles(state, category)
                .get(view_data.cursor)
                .cloned()
                .map(AppCommand::OpenSession),
            DashboardView::AllLeads | DashboardView::Table { .. } => None,
        },
        KeyCode::Char('/') => {
            view_data.editor = Some(EditorState {
                target: EditTarget::Search,
                buffer: state.query.search.clone(),
            });
            None
        }
        KeyCode::Char('c') => {
            view_data.editor = Some(EditorState {
                target: EditTarget::CampaignName,
                buffer: String::new(),
            });
            None
        }
        KeyCode::Char('a') => {
            view_data.form = Some(FormUiState::new(FormKind::Lead));
            None
        }
        KeyCode::Char('N') => {
            view_data.form = Some(FormUiState::new(FormKind::Campaign));
            None
        }
        KeyCode::Char('n') if view == DashboardView::Categories => {
            view_data.editor = Some(EditorState {
                target: EditTarget::NewCategory,
                buffer: String::new(),
            });
            None
        }
        KeyCode::Char('r') if view == DashboardView::Categories => {
            if let Some(name) = folder_names(state).get(view_data.cursor) {
                view_data.editor = Some(EditorState {
                    target: EditTarget::RenameCategory(name.clone()),
                    buffer: name.clone(),
                });
            }
            None
        }
        KeyCode::Char('d') if view == DashboardView::Categories => {
            if let Some(name) = folder_names(state).get(view_data.cursor).cloned() {
                let cleared = state.workspace.remove_lead_category(&name);
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("removed \"{name}\" ({cleared} leads uncategorized)"),
                );
            }
            None
        }
        _ => None,
    };

    if let Some(command) = command {
        let opens_wizard = command == AppCommand::StartWizard;
        dispatch_tracked(state, view_data, internal_tx, command);
        if opens_wizard {
            view_data.wizard = WizardUiState::default();
        }
    }
}

/// Campaigns in the order the campaigns section lists them.
fn campaigns_in_view_order(state: &AppState) -> Vec<&Campaign> {
    state
        .workspace
        .campaigns_by_goal()
        .into_iter()
        .flat_map(|(_, campaigns)| campaigns)
        .collect()
}

fn handle_campaigns_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if view_data.campaign_detail.is_some() {
        handle_campaign_detail_key(state, view_data, key);
        return;
    }

    let len = state.workspace.campaigns().len();
    if handle_list_key(view_data, key, len) {
        return;
    }

    let current = campaigns_in_view_order(state)
        .get(view_data.cursor)
        .map(|campaign| (campaign.id, campaign.category.clone()));

    match key.code {
        KeyCode::Enter => match current {
            Some((id, _)) => view_data.campaign_detail = Some(CampaignDetailUiState::new(id)),
            None => emit_status(state, view_data, internal_tx, "no campaigns yet"),
        },
        KeyCode::Char('N') => view_data.form = Some(FormUiState::new(FormKind::Campaign)),
        KeyCode::Char('n') => {
            view_data.editor = Some(EditorState {
                target: EditTarget::NewCampaignCategory,
                buffer: String::new(),
            });
        }
        KeyCode::Char('d') => {
            view_data.editor = Some(EditorState {
                target: EditTarget::RemoveCampaignCategory,
                buffer: current.and_then(|(_, category)| category).unwrap_or_default(),
            });
        }
        _ => {}
    }
}

fn next_industry(current: &IndustryFilter, options: &[String]) -> IndustryFilter {
    let next = match current {
        IndustryFilter::All => options.first(),
        IndustryFilter::Only(name) => options
            .iter()
            .position(|option| option == name)
            .and_then(|index| options.get(index + 1)),
    };
    next.map_or(IndustryFilter::All, |name| IndustryFilter::Only(name.clone()))
}

fn handle_campaign_detail_key(state: &AppState, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => {
            view_data.campaign_detail = None;
            return;
        }
        KeyCode::Char('/') => {
            let search = view_data
                .campaign_detail
                .as_ref()
                .map(|detail| detail.query.search.clone())
                .unwrap_or_default();
            view_data.editor = Some(EditorState {
                target: EditTarget::CampaignSearch,
                buffer: search,
            });
            return;
        }
        _ => {}
    }

    let Some(ui) = view_data.campaign_detail.as_mut() else {
        return;
    };
    let Some(campaign) = state
        .workspace
        .campaigns()
        .iter()
        .find(|campaign| campaign.id == ui.campaign)
    else {
        return;
    };
    let detail = campaign_detail(campaign, &ui.query, ui.sort);
    let visible: Vec<LeadId> = detail.leads.iter().map(|lead| lead.id).collect();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => move_cursor(&mut ui.cursor, 1, visible.len()),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(&mut ui.cursor, -1, visible.len()),
        KeyCode::Char('i') => {
            ui.query.industry = next_industry(&ui.query.industry, &detail.industries);
            ui.cursor = 0;
        }
        KeyCode::Char('o') => ui.sort = ui.sort.toggle(next_sort_field(ui.sort.field)),
        KeyCode::Char('O') => ui.sort = ui.sort.toggle(ui.sort.field),
        KeyCode::Char(' ') => {
            if let Some(id) = visible.get(ui.cursor) {
                match ui.selected.iter().position(|selected| selected == id) {
                    Some(index) => {
                        ui.selected.remove(index);
                    }
                    None => ui.selected.push(*id),
                }
            }
        }
        KeyCode::Char('a') => {
            if !visible.is_empty() && visible.iter().all(|id| ui.selected.contains(id)) {
                ui.selected.clear();
            } else {
                ui.selected = visible;
            }
        }
        _ => {}
    }
}

fn handle_outreach_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let len = state.workspace.sequences().len();
    if handle_list_key(view_data, key, len) {
        return;
    }

    let current = state
        .workspace
        .sequences()
        .get(view_data.cursor)
        .map(|sequence| (sequence.id, sequence.status));

    match key.code {
        KeyCode::Char('p') => {
            let Some((id, status)) = current else {
                return;
            };
            let statuses = SequenceStatus::ALL;
            let index = statuses
                .iter()
                .position(|candidate| *candidate == status)
                .unwrap_or(0);
            let next = statuses[(index + 1) % statuses.len()];
            let message = match state.workspace.update_sequence_status(id, next) {
                Ok(()) => format!("sequence {}", next.as_str()),
                Err(error) => error.to_string(),
            };
            emit_status(state, view_data, internal_tx, message);
        }
        KeyCode::Char('d') => {
            let Some((id, _)) = current else {
                return;
            };
            let message = match state.workspace.delete_sequence(id) {
                Ok(dropped) => {
                    move_cursor(&mut view_data.cursor, 0, len.saturating_sub(1));
                    format!("sequence deleted ({dropped} activities dropped)")
                }
                Err(error) => error.to_string(),
            };
            emit_status(state, view_data, internal_tx, message);
        }
        KeyCode::Char('T') => {
            view_data.outreach_template =
                (view_data.outreach_template + 1) % SEQUENCE_TEMPLATES.len();
            let name = SEQUENCE_TEMPLATES[view_data.outreach_template].name;
            emit_status(state, view_data, internal_tx, format!("template: {name}"));
        }
        KeyCode::Char('n') => {
            view_data.editor = Some(EditorState {
                target: EditTarget::OutreachName,
                buffer: String::new(),
            });
        }
        KeyCode::Char('w') => {
            dispatch_tracked(state, view_data, internal_tx, AppCommand::StartWizard);
            view_data.wizard = WizardUiState::default();
        }
        KeyCode::Char('a') => {
            let changed = tick_outreach(state, runtime);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("{changed} activities advanced"),
            );
        }
        _ => {}
    }
}

fn close_wizard<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if let Some(request_id) = view_data.wizard.draft_request.take()
        && let Err(error) = runtime.cancel_request(request_id)
    {
        tracing::warn!(request_id, %error, "cancel draft failed");
    }
    view_data.wizard = WizardUiState::default();
    dispatch_tracked(state, view_data, internal_tx, AppCommand::CloseWizard);
}

fn handle_wizard_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some((step, drafting)) = state
        .wizard
        .as_ref()
        .map(|wizard| (wizard.step(), wizard.draft().is_some()))
    else {
        return;
    };

    if drafting {
        handle_draft_key(state, runtime, view_data, internal_tx, key);
        return;
    }

    match key.code {
        KeyCode::Enter => {
            advance_wizard(state, runtime, view_data, internal_tx);
            return;
        }
        KeyCode::Esc => {
            let outcome = state.wizard.as_mut().map(|wizard| wizard.back());
            match outcome {
                Some(WizardOutcome::Cancel) => {
                    close_wizard(state, runtime, view_data, internal_tx);
                }
                Some(WizardOutcome::Moved(_)) => view_data.wizard.cursor = 0,
                _ => {}
            }
            return;
        }
        _ => {}
    }

    match step {
        WizardStep::Setup => {
            let Some(wizard) = state.wizard.as_mut() else {
                return;
            };
            let field = if view_data.wizard.editing_description {
                &mut wizard.description
            } else {
                &mut wizard.name
            };
            match key.code {
                KeyCode::Tab | KeyCode::BackTab => {
                    view_data.wizard.editing_description = !view_data.wizard.editing_description;
                }
                KeyCode::Backspace => {
                    field.pop();
                }
                _ => {
                    if let Some(ch) = typed_char(key) {
                        field.push(ch);
                    }
                }
            }
        }
        WizardStep::Emails => {
            let Some(wizard) = state.wizard.as_mut() else {
                return;
            };
            let len = wizard.emails().len();
            let cursor = view_data.wizard.cursor;
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    move_cursor(&mut view_data.wizard.cursor, 1, len);
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    move_cursor(&mut view_data.wizard.cursor, -1, len);
                }
                KeyCode::Char('m') => open_draft(wizard, view_data, EmailCreationMode::Manual, None),
                KeyCode::Char('t') => {
                    open_draft(wizard, view_data, EmailCreationMode::Template, None);
                }
                KeyCode::Char('g') => open_draft(wizard, view_data, EmailCreationMode::Ai, None),
                KeyCode::Char('e') => {
                    open_draft(wizard, view_data, EmailCreationMode::Manual, Some(cursor));
                }
                KeyCode::Char('d') => {
                    if wizard.delete_email(cursor) {
                        move_cursor(&mut view_data.wizard.cursor, 0, len - 1);
                    }
                }
                KeyCode::Char('y') => {
                    wizard.duplicate_email(cursor);
                }
                _ => {}
            }
        }
        WizardStep::Leads => {
            let Some(wizard) = state.wizard.as_mut() else {
                return;
            };
            let leads = state.workspace.leads();
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    move_cursor(&mut view_data.wizard.cursor, 1, leads.len());
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    move_cursor(&mut view_data.wizard.cursor, -1, leads.len());
                }
                KeyCode::Char(' ') => {
                    if let Some(lead) = leads.get(view_data.wizard.cursor) {
                        wizard.toggle_lead(lead.id);
                    }
                }
                KeyCode::Char('a') => wizard.toggle_all(leads),
                _ => {}
            }
        }
        WizardStep::Settings | WizardStep::Review => {}
    }
}

fn open_draft(
    wizard: &mut SequenceWizard,
    view_data: &mut ViewData,
    mode: EmailCreationMode,
    edit_index: Option<usize>,
) {
    if wizard.open_creator(mode, edit_index) {
        view_data.wizard.draft_field = if mode == EmailCreationMode::Ai {
            DraftField::Prompt
        } else {
            DraftField::Subject
        };
    }
}

fn advance_wizard<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(wizard) = state.wizard.as_mut() else {
        return;
    };
    match wizard.next(state.workspace.leads()) {
        WizardOutcome::Moved(step) => {
            view_data.wizard.cursor = 0;
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("step {}: {}", step.index() + 1, step.label()),
            );
        }
        WizardOutcome::Rejected(reason) => emit_status(state, view_data, internal_tx, reason),
        WizardOutcome::Create(sequence) => {
            let name = sequence.name.clone();
            state.workspace.create_sequence(sequence, runtime.now());
            close_wizard(state, runtime, view_data, internal_tx);
            dispatch_tracked(
                state,
                view_data,
                internal_tx,
                AppCommand::OpenSection(Section::Outreach),
            );
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("sequence \"{name}\" created"),
            );
        }
        WizardOutcome::Cancel => close_wizard(state, runtime, view_data, internal_tx),
    }
}

fn handle_draft_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if key.code == KeyCode::Esc {
        if let Some(wizard) = state.wizard.as_mut() {
            wizard.cancel_creator();
        }
        if let Some(request_id) = view_data.wizard.draft_request.take() {
            let _ = runtime.cancel_request(request_id);
        }
        return;
    }

    if is_ctrl(key, 's') {
        let saved = state.wizard.as_mut().map(|wizard| wizard.save_email());
        let message = match saved {
            Some(Ok(index)) => {
                view_data.wizard.cursor = index;
                view_data.wizard.draft_field = DraftField::Subject;
                "email saved".to_owned()
            }
            Some(Err(error)) => error.to_string(),
            None => return,
        };
        emit_status(state, view_data, internal_tx, message);
        return;
    }

    if is_ctrl(key, 'g') {
        request_draft(state, runtime, view_data, internal_tx);
        return;
    }

    if is_ctrl(key, 't') {
        let template = &EMAIL_TEMPLATES[view_data.wizard.template_index % EMAIL_TEMPLATES.len()];
        let in_template_mode = state
            .wizard
            .as_ref()
            .and_then(|wizard| wizard.draft())
            .is_some_and(|draft| draft.mode == EmailCreationMode::Template);
        if !in_template_mode {
            emit_status(state, view_data, internal_tx, "templates apply in template mode");
            return;
        }
        if let Some(wizard) = state.wizard.as_mut() {
            wizard.apply_template(template);
        }
        view_data.wizard.template_index += 1;
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("template: {}", template.name),
        );
        return;
    }

    let Some(draft) = state.wizard.as_mut().and_then(|wizard| wizard.draft_mut()) else {
        return;
    };
    let field = view_data.wizard.draft_field;
    match key.code {
        KeyCode::Tab => view_data.wizard.draft_field = field.next(draft.mode),
        KeyCode::Enter if field == DraftField::Content => draft.content.push('\n'),
        KeyCode::Backspace => match field {
            DraftField::Subject => {
                draft.subject.pop();
            }
            DraftField::Content => {
                draft.content.pop();
            }
            DraftField::Delay => draft.delay_days /= 10,
            DraftField::Prompt => {
                draft.ai_prompt.pop();
            }
        },
        _ => {
            let Some(ch) = typed_char(key) else {
                return;
            };
            match field {
                DraftField::Subject => draft.subject.push(ch),
                DraftField::Content => draft.content.push(ch),
                DraftField::Delay => {
                    if let Some(digit) = ch.to_digit(10) {
                        draft.delay_days = draft.delay_days.saturating_mul(10).saturating_add(digit);
                    }
                }
                DraftField::Prompt => draft.ai_prompt.push(ch),
            }
        }
    }
}

fn request_draft<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(draft) = state.wizard.as_ref().and_then(|wizard| wizard.draft()) else {
        return;
    };
    if !draft.can_generate() {
        emit_status(
            state,
            view_data,
            internal_tx,
            "describe the email in ai mode first",
        );
        return;
    }
    if view_data.wizard.draft_request.is_some() {
        emit_status(state, view_data, internal_tx, "draft already running");
        return;
    }
    let prompt = draft.ai_prompt.clone();
    let request_id = view_data.allocate_request_id();
    match runtime.spawn_email_draft(request_id, &prompt, internal_tx.clone()) {
        Ok(()) => {
            view_data.wizard.draft_request = Some(request_id);
            emit_status(state, view_data, internal_tx, "drafting email...");
        }
        Err(error) => {
            emit_status(state, view_data, internal_tx, format!("draft failed: {error}"));
        }
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let (titles, selected) = match state.surface {
        Surface::Public(route) => (
            Route::PUBLIC
                .iter()
                .map(|page| page.label().to_owned())
                .collect::<Vec<_>>(),
            Route::PUBLIC.iter().position(|page| *page == route),
        ),
        Surface::Dashboard => (
            Section::ALL
                .iter()
                .map(|section| section.label().to_owned())
                .collect::<Vec<_>>(),
            Section::ALL.iter().position(|section| *section == state.section),
        ),
    };
    let mut tabs = Tabs::new(titles)
        .block(Block::default().title("leadgen").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    if let Some(selected) = selected {
        tabs = tabs.select(selected);
    }
    frame.render_widget(tabs, layout[0]);

    match state.surface {
        Surface::Public(route) => {
            let body = Paragraph::new(render_public_text(route, view_data))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(route.label()));
            frame.render_widget(body, layout[1]);
        }
        Surface::Dashboard => render_dashboard_body(frame, layout[1], state, view_data),
    }

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if state.wizard.is_some() {
        let area = centered_rect(85, 80, frame.area());
        frame.render_widget(Clear, area);
        let wizard = Paragraph::new(render_wizard_text(state, view_data))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("new outreach sequence")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(wizard, area);
    }

    if let Some(form) = &view_data.form
        && form.kind.is_overlay()
    {
        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);
        let panel = Paragraph::new(render_form_text(form))
            .block(Block::default().title(form.kind.title()).borders(Borders::ALL));
        frame.render_widget(panel, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 72, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_dashboard_body(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let title = state.section.label();
    if state.section == Section::Leads
        && matches!(
            state.nav.view(),
            DashboardView::AllLeads | DashboardView::Table { .. }
        )
    {
        render_lead_table(frame, area, state, view_data);
        return;
    }

    let text = match state.section {
        Section::Generate => render_generate_text(state, view_data),
        Section::Leads => render_folders_text(state, view_data.cursor),
        Section::Campaigns => match &view_data.campaign_detail {
            Some(detail) => render_campaign_detail_text(state, detail),
            None => render_campaigns_text(state, view_data.cursor),
        },
        Section::Outreach => render_outreach_text(state, view_data),
        Section::Analytics => render_analytics_text(state),
        Section::Templates => render_templates_text(state, view_data),
    };
    let body = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(body, area);
}

fn render_lead_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    let header_text = format!(
        "{}\n{}",
        render_breadcrumb_text(state),
        render_query_text(state)
    );
    frame.render_widget(Paragraph::new(header_text), layout[0]);

    let header = Row::new(lead_header_labels(state).into_iter().map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let visible = state.visible_leads();
    let rows = visible.iter().enumerate().map(|(index, lead)| {
        let selected = state.selected.contains(&lead.id);
        let mut style = Style::default();
        if lead.starred {
            style = style.fg(Color::Yellow);
        }
        if index == view_data.cursor {
            style = Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
        }
        Row::new(lead_row_cells(lead, selected).map(Cell::from)).style(style)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Min(14),
        Constraint::Min(14),
        Constraint::Min(12),
        Constraint::Min(12),
        Constraint::Length(6),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "leads ({}/{})",
            visible.len(),
            state.workspace.leads().len()
        )));
    frame.render_widget(table, layout[1]);
}

fn lead_header_labels(state: &AppState) -> Vec<String> {
    let mut labels = vec![String::new()];
    for field in [
        LeadSortField::Name,
        LeadSortField::Title,
        LeadSortField::Company,
        LeadSortField::Industry,
        LeadSortField::Score,
        LeadSortField::GeneratedAt,
    ] {
        if field == state.sort.field {
            labels.push(format!("{} {}", field.label(), state.sort.direction.arrow()));
        } else {
            labels.push(field.label().to_owned());
        }
    }
    labels
}

fn lead_row_cells(lead: &Lead, selected: bool) -> [String; 7] {
    let mark = format!(
        "{}{}",
        if lead.starred { STAR_MARK } else { " " },
        if selected { SELECT_MARK } else { " " }
    );
    [
        mark,
        lead.name.clone(),
        lead.title.clone(),
        lead.company.clone(),
        lead.industry.clone(),
        lead.score.to_string(),
        lead.generated_at.date().to_string(),
    ]
}

fn render_breadcrumb_text(state: &AppState) -> String {
    state
        .nav
        .breadcrumbs()
        .iter()
        .map(|crumb| {
            if crumb.current {
                format!("[{}]", crumb.label)
            } else {
                crumb.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(CRUMB_SEPARATOR)
}

fn render_query_text(state: &AppState) -> String {
    let search = if state.query.search.is_empty() {
        "-".to_owned()
    } else {
        format!("\"{}\"", state.query.search)
    };
    format!(
        "search: {search} | industry: {} | tab: {} | selected: {}",
        state.query.industry.label(),
        state.query.tab.label(),
        state.selected.len()
    )
}

fn render_public_text(route: Route, view_data: &ViewData) -> String {
    match route {
        Route::Chat => render_chat_text(&view_data.chat),
        Route::Home => [
            "Find the right people, faster.",
            "",
            "Describe your ideal customer and get a ranked list of prospects,",
            "organised into folders you can turn into outreach campaigns.",
            "",
            "Open settings (ctrl+n) to sign in.",
        ]
        .join("\n"),
        Route::About => [
            "leadgen is a lead-generation and outreach workspace.",
            "",
            "Generation and chat replies are simulated; nothing leaves this machine.",
        ]
        .join("\n"),
        Route::Blog => [
            "Writing a first email that gets a reply",
            "Scoring leads without a data team",
            "Folders, sessions and why structure beats search",
        ]
        .join("\n"),
        Route::Settings => match &view_data.form {
            Some(form) => render_form_text(form),
            None => render_form_text(&FormUiState::new(FormKind::Login)),
        },
        Route::Dashboard | Route::NotFound => {
            "Page not found. Press esc to return to chat.".to_owned()
        }
    }
}

fn render_chat_text(chat: &ChatUiState) -> String {
    let mut lines = Vec::with_capacity(chat.transcript.len() + 3);
    for line in &chat.transcript {
        let speaker = match line.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "assistant",
        };
        lines.push(format!("{speaker}: {}", line.text));
    }
    if chat.in_flight.is_some() {
        lines.push("assistant: ...".to_owned());
    }
    lines.push(String::new());
    lines.push(format!("> {}", chat.input));
    lines.join("\n")
}

fn render_form_text(form: &FormUiState) -> String {
    let mut lines = vec![form.kind.title().to_owned(), String::new()];
    for (index, (key, label)) in form.kind.fields().iter().enumerate() {
        let raw = form.values.get(index).map(String::as_str).unwrap_or_default();
        let shown = if key.contains("password") {
            "*".repeat(raw.chars().count())
        } else {
            raw.to_owned()
        };
        let prefix = if index == form.focus { CURSOR_MARK } else { "  " };
        lines.push(format!("{prefix}{label}: {shown}"));
    }
    if !form.errors.is_empty() {
        lines.push(String::new());
        lines.extend(form.errors.iter().map(|error| format!("! {error}")));
    }
    lines.push(String::new());
    let toggle = match form.kind {
        FormKind::Login => " | ctrl+t create account",
        FormKind::Signup => " | ctrl+t sign in",
        FormKind::Lead | FormKind::Campaign => "",
    };
    lines.push(format!("tab/up/down field | enter submit | esc clear{toggle}"));
    lines.join("\n")
}

fn render_generate_text(state: &AppState, view_data: &ViewData) -> String {
    let mut lines = vec![format!("prompt: {}", view_data.generate.prompt)];
    if view_data.generate.in_flight.is_some() {
        lines.push("generating...".to_owned());
    }
    let staged = state.workspace.staged_leads();
    if !staged.is_empty() {
        lines.push(String::new());
        if let Some(title) = staged.first().and_then(|lead| lead.chat_title.as_deref()) {
            lines.push(format!("results for \"{title}\""));
        }
        for (index, lead) in staged.iter().enumerate() {
            let cursor = if index == view_data.cursor {
                CURSOR_MARK
            } else {
                "  "
            };
            let mark = if view_data.generate.marked.contains(&lead.id) {
                "[x]"
            } else {
                "[ ]"
            };
            lines.push(format!(
                "{cursor}{mark} {} | {} at {} | {} | score {}",
                lead.name, lead.title, lead.company, lead.industry, lead.score
            ));
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "saved: {} leads in {} sessions",
        state.workspace.leads().len(),
        state.hierarchy().total_sessions()
    ));
    lines.join("\n")
}

fn render_folders_text(state: &AppState, cursor: usize) -> String {
    let hierarchy = state.hierarchy();
    let mut lines = vec![render_breadcrumb_text(state), String::new()];
    match state.nav.view() {
        DashboardView::Chats { category } => {
            let sessions = hierarchy
                .folder(category)
                .map(|folder| folder.sessions.as_slice())
                .unwrap_or_default();
            for (index, session) in sessions.iter().enumerate() {
                let prefix = if index == cursor { CURSOR_MARK } else { "  " };
                lines.push(format!(
                    "{prefix}{} | {} leads | avg {}",
                    session.title,
                    session.leads.len(),
                    session.average_score()
                ));
            }
            if sessions.is_empty() {
                lines.push("no sessions in this folder".to_owned());
            }
        }
        _ => {
            for (index, folder) in hierarchy.folders.iter().enumerate() {
                let prefix = if index == cursor { CURSOR_MARK } else { "  " };
                lines.push(format!(
                    "{prefix}{} | {} leads | {} sessions | avg {}",
                    folder.name,
                    folder.lead_count(),
                    folder.session_count(),
                    folder.average_score()
                ));
            }
            if hierarchy.folders.is_empty() {
                lines.push("no leads yet; generate some first".to_owned());
            }
            lines.push(String::new());
            lines.push(format!(
                "categories: {}",
                state.workspace.lead_categories().join(", ")
            ));
        }
    }
    lines.join("\n")
}

fn render_campaigns_text(state: &AppState, cursor: usize) -> String {
    let buckets = state.workspace.campaign_buckets();
    let mut lines = vec![format!(
        "active: {} | planning: {} | completed: {}",
        buckets.active.len(),
        buckets.planning.len(),
        buckets.completed.len()
    )];
    let mut index = 0;
    for (goal, campaigns) in state.workspace.campaigns_by_goal() {
        lines.push(String::new());
        lines.push(goal);
        for campaign in campaigns {
            let prefix = if index == cursor { CURSOR_MARK } else { "  " };
            let priority = campaign
                .priority
                .map(|priority| priority.as_str())
                .unwrap_or("-");
            let category = campaign.category.as_deref().unwrap_or("-");
            lines.push(format!(
                "{prefix}{} | {} leads | priority {priority} | category {category} | {}",
                campaign.name,
                campaign.leads.len(),
                campaign.created_at.date()
            ));
            index += 1;
        }
    }
    if state.workspace.campaigns().is_empty() {
        lines.push(String::new());
        lines.push("no campaigns; star or select leads, then press N".to_owned());
    }
    lines.push(String::new());
    lines.push(format!(
        "categories: {}",
        state.workspace.campaign_categories().join(", ")
    ));
    lines.join("\n")
}

fn render_campaign_detail_text(state: &AppState, ui: &CampaignDetailUiState) -> String {
    let Some(campaign) = state
        .workspace
        .campaigns()
        .iter()
        .find(|campaign| campaign.id == ui.campaign)
    else {
        return "campaign no longer exists; esc to go back".to_owned();
    };
    let detail = campaign_detail(campaign, &ui.query, ui.sort);
    let mut lines = vec![format!("Campaigns{CRUMB_SEPARATOR}[{}]", campaign.name)];
    if !campaign.description.is_empty() {
        lines.push(campaign.description.clone());
    }
    let tags = campaign
        .tags
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!(
        "goal: {} | priority: {} | category: {} | tags: {}",
        campaign.goal.as_deref().unwrap_or("-"),
        campaign.priority.map_or("-", |priority| priority.as_str()),
        campaign.category.as_deref().unwrap_or("-"),
        if tags.is_empty() { "-" } else { tags.as_str() }
    ));
    lines.push(format!(
        "{} leads | avg score {} | {} industries | created {}",
        detail.total,
        detail.average_score,
        detail.industries.len(),
        campaign.created_at.date()
    ));
    let search = if ui.query.search.is_empty() {
        "-".to_owned()
    } else {
        format!("\"{}\"", ui.query.search)
    };
    lines.push(format!(
        "search: {search} | industry: {} | sort: {} {}",
        ui.query.industry.label(),
        ui.sort.field.label(),
        ui.sort.direction.arrow()
    ));
    lines.push(String::new());
    for (index, lead) in detail.leads.iter().enumerate() {
        let prefix = if index == ui.cursor { CURSOR_MARK } else { "  " };
        let mark = if ui.selected.contains(&lead.id) {
            "[x]"
        } else {
            "[ ]"
        };
        lines.push(format!(
            "{prefix}{mark} {} | {} at {} | {} | {} | score {}",
            lead.name, lead.title, lead.company, lead.industry, lead.location, lead.score
        ));
    }
    if detail.leads.is_empty() {
        lines.push("no leads match".to_owned());
    }
    lines.push(String::new());
    lines.push(format!(
        "{} of {} leads | {} selected",
        detail.leads.len(),
        detail.total,
        ui.selected.len()
    ));
    lines.join("\n")
}

fn render_analytics_text(state: &AppState) -> String {
    let workspace = &state.workspace;
    let summary = analytics_summary(
        workspace.leads(),
        workspace.campaigns(),
        workspace.sequences(),
        workspace.activities(),
    );
    let mut lines = vec![
        format!(
            "leads: {} ({} starred) | campaigns: {} | sequences: {} ({} active)",
            summary.total_leads,
            summary.starred_leads,
            summary.total_campaigns,
            summary.total_sequences,
            summary.active_sequences
        ),
        format!(
            "emails: {} | scheduled {} | sent {} | opened {} | replied {}",
            summary.total_emails, summary.scheduled, summary.sent, summary.opened, summary.replied
        ),
        format!(
            "open rate {:.1}% | reply rate {:.1}% | conversion {:.1}%",
            summary.open_rate, summary.reply_rate, summary.conversion_rate
        ),
        format!(
            "per sequence: {:.1} emails, {:.1} leads",
            summary.avg_emails_per_sequence, summary.avg_leads_per_sequence
        ),
        String::new(),
        "sequence performance".to_owned(),
    ];
    let sequences = sequence_performance(workspace.sequences(), workspace.activities());
    for row in &sequences {
        lines.push(format!(
            "  {} [{}] | {} emails x {} leads | sent {} | open {:.1}% | reply {:.1}%",
            row.name,
            row.status.as_str(),
            row.email_count,
            row.leads,
            row.sent,
            row.open_rate,
            row.reply_rate
        ));
    }
    if sequences.is_empty() {
        lines.push("  no sequences yet".to_owned());
    }
    lines.push(String::new());
    lines.push("industry performance".to_owned());
    let industries = industry_performance(workspace.leads(), workspace.activities());
    for row in &industries {
        lines.push(format!(
            "  {} | {} leads | sent {} opened {} replied {} | open {:.1}% | reply {:.1}%",
            row.industry,
            row.leads,
            row.sent,
            row.opened,
            row.replied,
            row.open_rate,
            row.reply_rate
        ));
    }
    if industries.is_empty() {
        lines.push("  no saved leads yet".to_owned());
    }
    lines.join("\n")
}

fn render_outreach_text(state: &AppState, view_data: &ViewData) -> String {
    let stats = state.workspace.outreach_stats();
    let mut lines = vec![format!(
        "active: {} | sent: {} | opened: {} | replied: {}",
        stats.active_sequences, stats.total_sent, stats.total_opened, stats.total_replied
    )];
    lines.push(format!(
        "template: {} | selected leads: {}",
        SEQUENCE_TEMPLATES[view_data.outreach_template % SEQUENCE_TEMPLATES.len()].name,
        state.selected.len()
    ));
    lines.push(String::new());
    for (index, sequence) in state.workspace.sequences().iter().enumerate() {
        let prefix = if index == view_data.cursor {
            CURSOR_MARK
        } else {
            "  "
        };
        let (sent, opened, replied) =
            sequence_progress(state.workspace.activities(), sequence.id);
        lines.push(format!(
            "{prefix}{} [{}] | {} emails | {} leads | sent {sent} opened {opened} replied {replied}",
            sequence.name,
            sequence.status.as_str(),
            sequence.emails.len(),
            sequence.leads.len()
        ));
    }
    if state.workspace.sequences().is_empty() {
        lines.push("no sequences; w opens the wizard".to_owned());
    }
    lines.join("\n")
}

fn render_templates_text(state: &AppState, view_data: &ViewData) -> String {
    let mut lines = vec!["email templates".to_owned()];
    let mut preview = None;
    for (index, template) in EMAIL_TEMPLATES.iter().enumerate() {
        let selected = index == view_data.cursor;
        let prefix = if selected { CURSOR_MARK } else { "  " };
        lines.push(format!("{prefix}{} ({})", template.name, template.category));
        if selected {
            preview = Some((template.subject, template.content));
        }
    }
    lines.push(String::new());
    lines.push("sequence templates".to_owned());
    for (offset, template) in SEQUENCE_TEMPLATES.iter().enumerate() {
        let selected = EMAIL_TEMPLATES.len() + offset == view_data.cursor;
        let prefix = if selected { CURSOR_MARK } else { "  " };
        lines.push(format!(
            "{prefix}{} | {} emails | {}",
            template.name,
            template.emails.len(),
            template.description
        ));
        if selected && let Some(first) = template.emails.first() {
            preview = Some((first.subject, first.content));
        }
    }

    if let Some((subject, content)) = preview {
        lines.push(String::new());
        let fields = placeholders(&format!("{subject}\n{content}"))
            .iter()
            .map(|name| format!("{{{{{name}}}}}"))
            .collect::<Vec<_>>();
        if !fields.is_empty() {
            lines.push(format!("placeholders: {}", fields.join(", ")));
        }
        match state.workspace.leads().first() {
            Some(lead) => {
                lines.push(format!(
                    "preview for {}: {}",
                    lead.name,
                    render_template(subject, lead, &view_data.sender)
                ));
                lines.push(render_template(content, lead, &view_data.sender));
            }
            None => {
                lines.push(subject.to_owned());
                lines.push(content.to_owned());
            }
        }
    }
    lines.join("\n")
}

fn render_wizard_text(state: &AppState, view_data: &ViewData) -> String {
    let Some(wizard) = &state.wizard else {
        return String::new();
    };
    let step = wizard.step();
    let progress = WizardStep::ALL
        .iter()
        .map(|candidate| {
            if *candidate == step {
                format!("[{}]", candidate.label())
            } else {
                candidate.label().to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" > ");
    let mut lines = vec![progress, String::new()];

    if let Some(draft) = wizard.draft() {
        lines.push(format!("email editor ({})", draft.mode.label()));
        let focus = view_data.wizard.draft_field;
        let marker = |field: DraftField| if field == focus { CURSOR_MARK } else { "  " };
        if draft.mode == EmailCreationMode::Ai {
            lines.push(format!(
                "{}{}: {}",
                marker(DraftField::Prompt),
                DraftField::Prompt.label(),
                draft.ai_prompt
            ));
        }
        lines.push(format!(
            "{}{}: {}",
            marker(DraftField::Subject),
            DraftField::Subject.label(),
            draft.subject
        ));
        lines.push(format!(
            "{}{}:",
            marker(DraftField::Content),
            DraftField::Content.label()
        ));
        lines.extend(draft.content.lines().map(|line| format!("    {line}")));
        lines.push(format!(
            "{}{}: {} days",
            marker(DraftField::Delay),
            DraftField::Delay.label(),
            draft.delay_days
        ));
        lines.push(String::new());
        let extra = match draft.mode {
            EmailCreationMode::Manual => "",
            EmailCreationMode::Template => " | ctrl+t next template",
            EmailCreationMode::Ai => " | ctrl+g generate",
        };
        lines.push(format!("tab field | ctrl+s save | esc cancel{extra}"));
        return lines.join("\n");
    }

    match step {
        WizardStep::Setup => {
            let (name_mark, description_mark) = if view_data.wizard.editing_description {
                ("  ", CURSOR_MARK)
            } else {
                (CURSOR_MARK, "  ")
            };
            lines.push(format!("{name_mark}name: {}", wizard.name));
            lines.push(format!("{description_mark}description: {}", wizard.description));
        }
        WizardStep::Emails => {
            for (index, email) in wizard.emails().iter().enumerate() {
                let prefix = if index == view_data.wizard.cursor {
                    CURSOR_MARK
                } else {
                    "  "
                };
                let kind = if email.is_follow_up { "follow-up" } else { "first" };
                lines.push(format!(
                    "{prefix}{}. {} ({kind}, +{} days)",
                    index + 1,
                    email.subject,
                    email.delay_days
                ));
            }
            if wizard.emails().is_empty() {
                lines.push("no emails yet".to_owned());
            }
            lines.push(String::new());
            lines.push("m manual | t template | g ai | e edit | y duplicate | d delete".to_owned());
        }
        WizardStep::Leads => {
            for (index, lead) in state.workspace.leads().iter().enumerate() {
                let prefix = if index == view_data.wizard.cursor {
                    CURSOR_MARK
                } else {
                    "  "
                };
                let mark = if wizard.is_selected(lead.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                lines.push(format!(
                    "{prefix}{mark} {} | {} | score {}",
                    lead.name, lead.company, lead.score
                ));
            }
            lines.push(String::new());
            lines.push(format!(
                "{} selected | space toggle | a all",
                wizard.selected_leads().len()
            ));
        }
        WizardStep::Settings => {
            for (day, email) in wizard.timeline() {
                lines.push(format!("day {day}: {}", email.subject));
            }
        }
        WizardStep::Review => {
            lines.push(format!("name: {}", wizard.name));
            lines.push(format!("description: {}", wizard.description));
            lines.push(format!("emails: {}", wizard.emails().len()));
            lines.push(format!("leads: {}", wizard.selected_leads().len()));
            lines.push(String::new());
            lines.push("enter creates the sequence as a draft".to_owned());
        }
    }
    lines.push(String::new());
    lines.push("enter next | esc back".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(editor) = &view_data.editor {
        return format!("{}: {}_ | enter confirm | esc close", editor.target.prompt(), editor.buffer);
    }

    let default = match state.surface {
        Surface::Public(_) => "ctrl+n/p page | ctrl+g go to | f1 help | ctrl+q quit",
        Surface::Dashboard if state.wizard.is_some() => "ctrl+c cancel | ctrl+l logout | ctrl+q",
        Surface::Dashboard => match state.section {
            Section::Generate => {
                "type prompt | enter generate | ctrl+x mark | ctrl+s save | ctrl+a save all | tab"
            }
            Section::Leads => "j/k | enter open | esc back | f/h | / i t o/O | s star | space select | c N w a | tab",
            Section::Campaigns if view_data.campaign_detail.is_some() => {
                "j/k | / search | i industry | o/O sort | space select | a all | esc back"
            }
            Section::Campaigns => "j/k | enter open | N new | n/d category | tab section",
            Section::Outreach => "j/k | n new | T template | p status | d delete | w wizard | tab",
            Section::Analytics => "tab section | ctrl+l logout",
            Section::Templates => "j/k preview | tab section | ctrl+l logout",
        },
    };
    match &state.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default.to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "global\n  ctrl+q quit | ctrl+c cancel request | f1 help\n\npublic pages\n  ctrl+n/ctrl+p switch page | ctrl+g go to a path such as /about\n  settings: tab field, enter submit, ctrl+t sign in/create account\n\ndashboard\n  tab/shift+tab section | ctrl+l sign out\n  generate: type a prompt, enter runs, ctrl+x marks, ctrl+s saves marked,\n            ctrl+a saves all, ctrl+d discards\n  leads: f folders, h all leads, enter open, esc back, / search, i industry,\n         t starred tab, o/O sort, s star, space select, c quick campaign,\n         N campaign form, a add lead\n  campaigns: enter details, N new, n add category, d remove category\n    details: / search, i industry, o/O sort, space select, a all, esc back\n  outreach: n new from template, T cycle template, p status, d delete, w wizard\n\nwizard\n  enter next | esc back | m/t/g new email | e edit | y duplicate | d delete"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
