// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};

/// Shared cancellation flag. Cancelling wakes a sleeping task immediately.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (flag, wake) = &*self.inner;
        if let Ok(mut cancelled) = flag.lock() {
            *cancelled = true;
        }
        wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (flag, _) = &*self.inner;
        flag.lock().map(|cancelled| *cancelled).unwrap_or(true)
    }

    /// Sleeps for `delay` unless cancelled first. Returns whether the wait
    /// ran to completion.
    fn wait(&self, delay: Duration) -> bool {
        let (flag, wake) = &*self.inner;
        let Ok(guard) = flag.lock() else {
            return false;
        };
        match wake.wait_timeout_while(guard, delay, |cancelled| !*cancelled) {
            Ok((cancelled, _)) => !*cancelled,
            Err(_) => false,
        }
    }

    /// Runs `deliver` while holding the flag, so a concurrent `cancel` either
    /// happens-before the check (nothing delivered) or waits for delivery.
    fn deliver_unless_cancelled(&self, deliver: impl FnOnce()) -> bool {
        let (flag, _) = &*self.inner;
        let Ok(cancelled) = flag.lock() else {
            return false;
        };
        if *cancelled {
            return false;
        }
        deliver();
        true
    }
}

/// Delayed result computed on a worker thread. Dropping the handle cancels
/// the task, and a cancelled task never calls its delivery closure.
#[derive(Debug)]
pub struct SimulatedTask {
    token: CancelToken,
    handle: Option<JoinHandle<bool>>,
}

impl SimulatedTask {
    pub fn spawn<T, W, D>(name: &str, delay: Duration, work: W, deliver: D) -> Result<Self>
    where
        T: Send + 'static,
        W: FnOnce() -> T + Send + 'static,
        D: FnOnce(T) + Send + 'static,
    {
        let token = CancelToken::new();
        let worker_token = token.clone();
        let handle = thread::Builder::new()
            .name(format!("leadgen-{name}"))
            .spawn(move || {
                let output = work();
                if !worker_token.wait(delay) {
                    return false;
                }
                worker_token.deliver_unless_cancelled(|| deliver(output))
            })
            .with_context(|| format!("spawn {name} task"))?;

        Ok(Self {
            token,
            handle: Some(handle),
        })
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Blocks until the worker exits and reports whether it delivered.
    pub fn join(mut self) -> bool {
        self.handle
            .take()
            .is_some_and(|handle| handle.join().unwrap_or(false))
    }
}

impl Drop for SimulatedTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.token.cancel();
        }
    }
}
