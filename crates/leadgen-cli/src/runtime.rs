// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use leadgen_app::{Chance, SenderProfile};
use leadgen_assist::{Assistant, SimulatedTask};
use leadgen_store::{AuthError, AuthSession, AuthWatcher, KeyValueStore};
use leadgen_tui::{AppRuntime, InternalEvent, LoginOutcome};
use std::collections::BTreeMap;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use time::OffsetDateTime;

/// How often the persisted session is re-read to pick up sign-ins and
/// sign-outs from other processes sharing the database.
const SESSION_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

pub struct CliRuntime<S: KeyValueStore> {
    session: AuthSession<S>,
    watcher: AuthWatcher,
    assistant: Assistant,
    sender: SenderProfile,
    rng: fastrand::Rng,
    tasks: BTreeMap<u64, SimulatedTask>,
    refresh_every: Duration,
    last_refresh: Instant,
}

impl<S: KeyValueStore> CliRuntime<S> {
    pub fn new(mut session: AuthSession<S>, assistant: Assistant, sender: SenderProfile) -> Self {
        let watcher = session.subscribe();
        Self {
            session,
            watcher,
            assistant,
            sender,
            rng: fastrand::Rng::new(),
            tasks: BTreeMap::new(),
            refresh_every: SESSION_REFRESH_INTERVAL,
            last_refresh: Instant::now(),
        }
    }

    #[cfg(test)]
    fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_every = interval;
        self
    }

    pub fn session(&self) -> &AuthSession<S> {
        &self.session
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    fn reap_finished(&mut self) {
        self.tasks.retain(|_, task| !task.is_finished());
    }

    fn track(
        &mut self,
        request_id: u64,
        spawned: Result<SimulatedTask>,
        tx: &Sender<InternalEvent>,
    ) -> Result<()> {
        self.reap_finished();
        match spawned {
            Ok(task) => {
                self.tasks.insert(request_id, task);
                Ok(())
            }
            Err(error) => {
                tracing::warn!(request_id, %error, "assistant request rejected");
                tx.send(InternalEvent::TaskFailed {
                    request_id,
                    error: error.to_string(),
                })
                .map_err(|_| anyhow!("ui event channel closed"))
            }
        }
    }
}

impl<S: KeyValueStore> Drop for CliRuntime<S> {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.cancel();
        }
    }
}

impl<S: KeyValueStore> AppRuntime for CliRuntime<S> {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn sender_profile(&self) -> SenderProfile {
        self.sender.clone()
    }

    fn chance(&mut self) -> &mut dyn Chance {
        &mut self.rng
    }

    fn login(&mut self, email: &str, password: &str) -> Result<LoginOutcome> {
        match self.session.login(email, password, OffsetDateTime::now_utc()) {
            Ok(message) => {
                // Our own broadcast; the UI already knows.
                self.watcher.poll();
                let user = self
                    .session
                    .user()
                    .cloned()
                    .ok_or_else(|| anyhow!("session user missing after login"))?;
                Ok(LoginOutcome::Accepted {
                    message: message.to_owned(),
                    user,
                })
            }
            Err(error @ AuthError::InvalidCredentials) => {
                Ok(LoginOutcome::Rejected(error.to_string()))
            }
            Err(error) => Err(error.into()),
        }
    }

    fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        self.watcher.poll();
        for (_, task) in std::mem::take(&mut self.tasks) {
            task.cancel();
        }
        Ok(())
    }

    fn poll_session(&mut self) -> Option<bool> {
        let mut change = self.watcher.latest();
        if self.last_refresh.elapsed() >= self.refresh_every {
            self.last_refresh = Instant::now();
            let before = self.session.is_authenticated();
            match self.session.refresh() {
                Ok(after) if after != before => {
                    tracing::info!(signed_in = after, "session changed outside this process");
                    change = Some(after);
                }
                Ok(_) => {}
                Err(error) => tracing::warn!(%error, "session refresh failed"),
            }
        }
        change
    }

    fn spawn_lead_generation(
        &mut self,
        request_id: u64,
        prompt: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let deliver_tx = tx.clone();
        let spawned = self.assistant.spawn_generation(prompt, move |leads| {
            let _ = deliver_tx.send(InternalEvent::LeadsGenerated {
                request_id,
                leads,
                generated_at: OffsetDateTime::now_utc(),
            });
        });
        tracing::debug!(request_id, "lead generation requested");
        self.track(request_id, spawned, &tx)
    }

    fn spawn_chat_reply(
        &mut self,
        request_id: u64,
        input: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let deliver_tx = tx.clone();
        let spawned = self.assistant.spawn_chat_reply(input, move |reply| {
            let _ = deliver_tx.send(InternalEvent::ChatReplied { request_id, reply });
        });
        self.track(request_id, spawned, &tx)
    }

    fn spawn_email_draft(
        &mut self,
        request_id: u64,
        prompt: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let deliver_tx = tx.clone();
        let spawned = self.assistant.spawn_draft(prompt, move |draft| {
            let _ = deliver_tx.send(InternalEvent::EmailDrafted {
                request_id,
                subject: draft.subject.to_owned(),
                content: draft.content.to_owned(),
            });
        });
        self.track(request_id, spawned, &tx)
    }

    fn cancel_request(&mut self, request_id: u64) -> Result<()> {
        if let Some(task) = self.tasks.remove(&request_id) {
            task.cancel();
            tracing::debug!(request_id, "request cancelled");
        }
        Ok(())
    }
}
