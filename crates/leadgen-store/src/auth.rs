// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use leadgen_app::SessionUser;
use thiserror::Error;
use time::OffsetDateTime;

use crate::{KeyValueStore, StorageError};

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "user";
pub const DEMO_EMAIL: &str = "admin@leadgen.com";
pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_USER_NAME: &str = "Admin User";
pub const LOGIN_SUCCESS: &str = "Login successful!";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials. Use admin@leadgen.com / password123")]
    InvalidCredentials,

    #[error("encode session user: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(SessionUser),
    SignedOut,
}

/// Receiving end of an [`AuthSession::subscribe`] call.
#[derive(Debug)]
pub struct AuthWatcher {
    rx: Receiver<AuthEvent>,
}

impl AuthWatcher {
    /// Drains every event broadcast since the last poll.
    pub fn poll(&self) -> Vec<AuthEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Returns whether the most recent event left the watcher signed in.
    pub fn latest(&self) -> Option<bool> {
        self.poll()
            .last()
            .map(|event| matches!(event, AuthEvent::SignedIn(_)))
    }
}

/// The single signed-in session, persisted through a [`KeyValueStore`].
pub struct AuthSession<S: KeyValueStore> {
    store: S,
    user: Option<SessionUser>,
    subscribers: Vec<Sender<AuthEvent>>,
}

impl<S: KeyValueStore> AuthSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            user: None,
            subscribers: Vec::new(),
        }
    }

    /// Builds a session and loads whatever the store already holds.
    pub fn restore(store: S) -> Result<Self, StorageError> {
        let mut session = Self::new(store);
        session.refresh()?;
        Ok(session)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Re-reads both keys. A session counts only when the token exists and
    /// the user record parses.
    pub fn refresh(&mut self) -> Result<bool, StorageError> {
        let token = self.store.get(TOKEN_KEY)?;
        let user = self.store.get(USER_KEY)?;
        self.user = match (token, user) {
            (Some(_), Some(raw)) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(error) => {
                    tracing::warn!(%error, "stored session user is unreadable; treating as signed out");
                    None
                }
            },
            _ => None,
        };
        Ok(self.is_authenticated())
    }

    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<&'static str, AuthError> {
        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            tracing::warn!(email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let user = SessionUser {
            email: email.to_owned(),
            name: DEMO_USER_NAME.to_owned(),
            login_time: now,
        };
        let encoded = serde_json::to_string(&user)?;
        let token = format!("demo-token-{}", now.unix_timestamp_nanos() / 1_000_000);
        self.store.set(TOKEN_KEY, &token)?;
        if let Err(error) = self.store.set(USER_KEY, &encoded) {
            if let Err(cleanup) = self.store.delete(TOKEN_KEY) {
                tracing::warn!(%cleanup, "orphan auth token left after failed login");
            }
            return Err(error.into());
        }

        tracing::info!(email, "signed in");
        self.user = Some(user.clone());
        self.broadcast(AuthEvent::SignedIn(user));
        Ok(LOGIN_SUCCESS)
    }

    /// Clears both keys and tells every live subscriber before returning.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.store.delete(TOKEN_KEY)?;
        self.store.delete(USER_KEY)?;
        self.user = None;
        tracing::info!("signed out");
        self.broadcast(AuthEvent::SignedOut);
        Ok(())
    }

    pub fn subscribe(&mut self) -> AuthWatcher {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        AuthWatcher { rx }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn broadcast(&mut self, event: AuthEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}
