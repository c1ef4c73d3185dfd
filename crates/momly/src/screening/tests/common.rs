use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::screening::classifier::{
    BandedRiskModel, CategoryCode, ModelError, RiskModel, StaticLabelDecoder,
};
use crate::screening::features::{FeatureRecord, SupportEncoding};
use crate::screening::log::{ResultSink, SinkError};
use crate::screening::result::ScreeningSummary;
use crate::screening::router::screening_router;
use crate::screening::service::ScreeningService;
use crate::screening::session::{DemographicsForm, FamilySupport, ScreeningSession};
use crate::screening::store::{SessionId, SessionStore, StoreError};

pub(super) fn intake_form() -> DemographicsForm {
    DemographicsForm {
        name: "Amina".to_string(),
        location: "Nairobi".to_string(),
        age: 29,
        family_support: FamilySupport::Medium,
    }
}

pub(super) type MemoryService =
    ScreeningService<MemoryStore, BandedRiskModel, StaticLabelDecoder, MemorySink>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryStore>, Arc<MemorySink>) {
    let store = Arc::new(MemoryStore::default());
    let sink = Arc::new(MemorySink::default());
    let service = ScreeningService::new(
        store.clone(),
        Arc::new(BandedRiskModel::standard()),
        Arc::new(StaticLabelDecoder::canonical()),
        sink.clone(),
        SupportEncoding::HighZero,
    );
    (service, store, sink)
}

/// Drive a fresh session through intake and the first `answers.len()` items.
pub(super) fn advance_through(
    service: &MemoryService,
    answers: &[u8],
) -> SessionId {
    let created = service.create().expect("session created");
    service
        .submit_demographics(&created.session_id, &intake_form())
        .expect("intake accepted");
    for (index, score) in answers.iter().enumerate() {
        service
            .answer(&created.session_id, index as u8 + 1, *score)
            .expect("answer accepted");
    }
    created.session_id
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    sessions: Arc<Mutex<HashMap<SessionId, ScreeningSession>>>,
}

impl MemoryStore {
    pub(super) fn session(&self, id: &SessionId) -> Option<ScreeningSession> {
        self.sessions
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl SessionStore for MemoryStore {
    fn insert(&self, id: SessionId, session: ScreeningSession) -> Result<(), StoreError> {
        self.sessions
            .lock()
            .expect("store mutex poisoned")
            .insert(id, session);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<ScreeningSession>, StoreError> {
        Ok(self
            .sessions
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn update(&self, id: &SessionId, session: ScreeningSession) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        if !guard.contains_key(id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(*id, session);
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn insert(&self, _id: SessionId, _session: ScreeningSession) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<ScreeningSession>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _id: &SessionId, _session: ScreeningSession) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySink {
    summaries: Arc<Mutex<Vec<ScreeningSummary>>>,
}

impl MemorySink {
    pub(super) fn summaries(&self) -> Vec<ScreeningSummary> {
        self.summaries.lock().expect("sink mutex poisoned").clone()
    }
}

impl ResultSink for MemorySink {
    fn record(&self, summary: &ScreeningSummary) -> Result<(), SinkError> {
        self.summaries
            .lock()
            .expect("sink mutex poisoned")
            .push(summary.clone());
        Ok(())
    }
}

pub(super) struct FailingSink;

impl ResultSink for FailingSink {
    fn record(&self, _summary: &ScreeningSummary) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("log disk full".to_string()))
    }
}

/// Model whose first `failures` predictions fail, then recovers.
pub(super) struct FlakyModel {
    inner: BandedRiskModel,
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyModel {
    pub(super) fn failing_first(failures: usize) -> Self {
        Self {
            inner: BandedRiskModel::standard(),
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RiskModel for FlakyModel {
    fn predict(&self, features: &FeatureRecord) -> Result<CategoryCode, ModelError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(ModelError::Unavailable("model artifact offline".to_string()));
        }
        self.inner.predict(features)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_raw_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) fn screening_router_with_service(service: MemoryService) -> axum::Router {
    screening_router(Arc::new(service))
}
