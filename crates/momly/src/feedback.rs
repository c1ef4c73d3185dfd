//! Feedback intake and the static support-resource directory.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("feedback log unavailable: {0}")]
    Unavailable(String),
}

/// One submitted piece of feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub submitted_at: DateTime<Utc>,
    pub name: Option<String>,
    pub message: String,
}

pub trait FeedbackSink: Send + Sync {
    fn record(&self, entry: &FeedbackEntry) -> Result<(), FeedbackError>;
}

/// Appends feedback rows to a CSV file.
#[derive(Debug, Clone)]
pub struct CsvFeedbackSink {
    path: PathBuf,
}

#[derive(Debug, Serialize)]
struct FeedbackRow<'a> {
    timestamp: String,
    name: &'a str,
    message: &'a str,
}

impl CsvFeedbackSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedbackSink for CsvFeedbackSink {
    fn record(&self, entry: &FeedbackEntry) -> Result<(), FeedbackError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| FeedbackError::Unavailable(err.to_string()))?;
        let needs_header = file
            .metadata()
            .map(|meta| meta.len() == 0)
            .map_err(|err| FeedbackError::Unavailable(err.to_string()))?;

        let row = FeedbackRow {
            timestamp: entry.submitted_at.to_rfc3339(),
            name: entry.name.as_deref().unwrap_or(""),
            message: &entry.message,
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer
            .serialize(row)
            .map_err(|err| FeedbackError::Unavailable(err.to_string()))?;
        writer
            .flush()
            .map_err(|err| FeedbackError::Unavailable(err.to_string()))?;
        Ok(())
    }
}

/// Keeps entries in memory; the default when no feedback log is configured.
#[derive(Debug, Default, Clone)]
pub struct MemoryFeedbackSink {
    entries: Arc<Mutex<Vec<FeedbackEntry>>>,
}

impl MemoryFeedbackSink {
    pub fn entries(&self) -> Vec<FeedbackEntry> {
        match self.entries.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl FeedbackSink for MemoryFeedbackSink {
    fn record(&self, entry: &FeedbackEntry) -> Result<(), FeedbackError> {
        match self.entries.lock() {
            Ok(mut guard) => guard.push(entry.clone()),
            Err(poisoned) => poisoned.into_inner().push(entry.clone()),
        }
        Ok(())
    }
}

/// A support resource shown on the resources page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub name: &'static str,
    pub url: &'static str,
}

pub fn support_resources() -> &'static [Resource] {
    SUPPORT_RESOURCES
}

const SUPPORT_RESOURCES: &[Resource] = &[
    Resource {
        name: "Postpartum Support International",
        url: "https://www.postpartum.net/",
    },
    Resource {
        name: "WHO Maternal Mental Health",
        url: "https://www.who.int/news-room/fact-sheets/detail/mental-health-of-women-during-pregnancy-and-after-childbirth",
    },
    Resource {
        name: "India Mental Health Helpline (NIMHANS)",
        url: "https://www.nimhans.ac.in/helpline-number/",
    },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub message: String,
}

/// Router exposing feedback intake and the resource directory.
pub fn feedback_router<F>(sink: Arc<F>) -> Router
where
    F: FeedbackSink + 'static,
{
    Router::new()
        .route("/api/v1/feedback", post(feedback_handler::<F>))
        .route("/api/v1/resources", get(resources_handler))
        .with_state(sink)
}

pub(crate) async fn feedback_handler<F>(
    State(sink): State<Arc<F>>,
    axum::Json(request): axum::Json<FeedbackRequest>,
) -> Response
where
    F: FeedbackSink + 'static,
{
    let message = request.message.trim();
    if message.is_empty() {
        let payload = json!({
            "error": "feedback message must not be empty",
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    let entry = FeedbackEntry {
        submitted_at: Utc::now(),
        name: request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned),
        message: message.to_owned(),
    };
    match sink.record(&entry) {
        Ok(()) => {
            let payload = json!({
                "message": "Thank you for your feedback!",
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn resources_handler() -> Response {
    (StatusCode::OK, axum::Json(support_resources())).into_response()
}
