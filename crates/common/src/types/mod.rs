use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// `{status, message}` body shared by most API responses.
#[derive(Serialize, Debug, Clone)]
pub struct StatusMessage {
    pub status: bool,
    pub message: String,
}

impl StatusMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { status: true, message: message.into() }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self { status: false, message: message.into() }
    }
}

/// `{status: false, error}` body for server-side failures.
#[derive(Serialize, Debug, Clone)]
pub struct StatusError {
    pub status: bool,
    pub error: String,
}

impl StatusError {
    pub fn new(error: impl Into<String>) -> Self {
        Self { status: false, error: error.into() }
    }
}
