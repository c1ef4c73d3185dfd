use metrics_exporter_prometheus::PrometheusHandle;
use momly::config::ScreeningConfig;
use momly::feedback::{CsvFeedbackSink, FeedbackEntry, FeedbackError, FeedbackSink, MemoryFeedbackSink};
use momly::screening::{
    BandedRiskModel, CsvResultLog, FamilySupport, NullResultLog, ResultSink, ScreeningService,
    ScreeningSession, ScreeningSummary, SessionId, SessionStore, SinkError, StaticLabelDecoder,
    StoreError, ITEM_COUNT,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The screening service as wired for this binary.
pub(crate) type ApiScreeningService =
    ScreeningService<InMemorySessionStore, BandedRiskModel, StaticLabelDecoder, ApiResultLog>;

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, ScreeningSession>>>,
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, id: SessionId, session: ScreeningSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(id, session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<ScreeningSession>, StoreError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, id: &SessionId, session: ScreeningSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(id) {
            guard.insert(*id, session);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

/// Result log selected by configuration: a CSV file when a path is set,
/// otherwise a no-op.
pub(crate) enum ApiResultLog {
    Csv(CsvResultLog),
    Null(NullResultLog),
}

impl ResultSink for ApiResultLog {
    fn record(&self, summary: &ScreeningSummary) -> Result<(), SinkError> {
        match self {
            ApiResultLog::Csv(log) => log.record(summary),
            ApiResultLog::Null(log) => log.record(summary),
        }
    }
}

pub(crate) enum ApiFeedbackSink {
    Csv(CsvFeedbackSink),
    Memory(MemoryFeedbackSink),
}

impl FeedbackSink for ApiFeedbackSink {
    fn record(&self, entry: &FeedbackEntry) -> Result<(), FeedbackError> {
        match self {
            ApiFeedbackSink::Csv(sink) => sink.record(entry),
            ApiFeedbackSink::Memory(sink) => sink.record(entry),
        }
    }
}

pub(crate) fn build_screening_service(config: &ScreeningConfig) -> Arc<ApiScreeningService> {
    let result_log = match &config.result_log {
        Some(path) => ApiResultLog::Csv(CsvResultLog::new(path)),
        None => ApiResultLog::Null(NullResultLog),
    };

    Arc::new(ScreeningService::new(
        Arc::new(InMemorySessionStore::default()),
        Arc::new(BandedRiskModel::standard()),
        Arc::new(StaticLabelDecoder::canonical()),
        Arc::new(result_log),
        config.support_encoding,
    ))
}

pub(crate) fn build_feedback_sink(config: &ScreeningConfig) -> Arc<ApiFeedbackSink> {
    let sink = match &config.feedback_log {
        Some(path) => ApiFeedbackSink::Csv(CsvFeedbackSink::new(path)),
        None => ApiFeedbackSink::Memory(MemoryFeedbackSink::default()),
    };
    Arc::new(sink)
}

/// Ten comma-separated answer scores, as taken on the command line.
#[derive(Debug, Clone)]
pub(crate) struct AnswerList(pub(crate) Vec<u8>);

pub(crate) fn parse_answers(raw: &str) -> Result<AnswerList, String> {
    let scores = raw
        .split(',')
        .map(|part| {
            let trimmed = part.trim();
            match trimmed.parse::<u8>() {
                Ok(score) if score <= 3 => Ok(score),
                _ => Err(format!("'{trimmed}' is not a score between 0 and 3")),
            }
        })
        .collect::<Result<Vec<u8>, String>>()?;
    if scores.len() != ITEM_COUNT {
        return Err(format!(
            "expected {ITEM_COUNT} comma-separated scores, got {}",
            scores.len()
        ));
    }
    Ok(AnswerList(scores))
}

pub(crate) fn parse_support(raw: &str) -> Result<FamilySupport, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "high" => Ok(FamilySupport::High),
        "medium" => Ok(FamilySupport::Medium),
        "low" => Ok(FamilySupport::Low),
        other => Err(format!(
            "'{other}' is not a support level (expected high, medium, or low)"
        )),
    }
}
