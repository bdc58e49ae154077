//! Single error/notification channel with a severity + message contract.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeContext {
    SessionStart,
    FetchProfile,
    UploadCover,
    ToggleSection,
    Editor,
    Education,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    severity: Severity,
    context: NoticeContext,
    category: NoticeCategory,
    message: String,
    raised_at: DateTime<Utc>,
}

fn classify(message: &str) -> NoticeCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("401")
        || lower.contains("403")
        || lower.contains("unauthorized")
        || lower.contains("forbidden")
        || lower.contains("token")
    {
        NoticeCategory::Auth
    } else if lower.contains("invalid")
        || lower.contains("missing")
        || lower.contains("required")
        || lower.contains("cant be the same")
        || lower.contains("no section")
    {
        NoticeCategory::Validation
    } else if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connect")
        || lower.contains("request failed")
        || lower.contains("network")
        || lower.contains("dns")
    {
        NoticeCategory::Transport
    } else {
        NoticeCategory::Unknown
    }
}

impl Notice {
    pub fn new(severity: Severity, context: NoticeContext, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            severity,
            context,
            category: classify(&message),
            message,
            raised_at: Utc::now(),
        }
    }

    pub fn error(context: NoticeContext, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, context, message)
    }

    pub fn warning(context: NoticeContext, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, context, message)
    }

    pub fn success(context: NoticeContext, message: impl Into<String>) -> Self {
        Self::new(Severity::Success, context, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn context(&self) -> NoticeContext {
        self.context
    }

    pub fn category(&self) -> NoticeCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn raised_at(&self) -> DateTime<Utc> {
        self.raised_at
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == NoticeCategory::Auth
    }
}
