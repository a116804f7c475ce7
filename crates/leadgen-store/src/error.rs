// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read key '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write key '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("failed to delete key '{key}': {reason}")]
    Delete { key: String, reason: String },
}

impl StorageError {
    pub(crate) fn read(key: &str, reason: impl ToString) -> Self {
        Self::Read {
            key: key.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(key: &str, reason: impl ToString) -> Self {
        Self::Write {
            key: key.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn delete(key: &str, reason: impl ToString) -> Self {
        Self::Delete {
            key: key.to_owned(),
            reason: reason.to_string(),
        }
    }
}
