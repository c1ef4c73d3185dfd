use std::sync::Arc;

use super::classifier::{LabelDecoder, PredictionError, RiskModel};
use super::features::{FeatureRecord, SupportEncoding};
use super::log::ResultSink;
use super::machine::{IncompleteAssessment, TransitionError};
use super::questionnaire::QuestionBank;
use super::result::{assemble, ResultRecord, ScreeningSummary};
use super::session::{DemographicsError, DemographicsForm, ScreeningSession, Step};
use super::store::{SessionId, SessionStore, StoreError};
use super::views::{AnswerOutcome, SessionCreated, StepView};

/// Service composing the session store, risk model, label decoder, and
/// result log around the screening state machine.
pub struct ScreeningService<S, M, D, L> {
    bank: QuestionBank,
    store: Arc<S>,
    model: Arc<M>,
    decoder: Arc<D>,
    results: Arc<L>,
    encoding: SupportEncoding,
}

impl<S, M, D, L> ScreeningService<S, M, D, L>
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    pub fn new(
        store: Arc<S>,
        model: Arc<M>,
        decoder: Arc<D>,
        results: Arc<L>,
        encoding: SupportEncoding,
    ) -> Self {
        Self {
            bank: QuestionBank::standard(),
            store,
            model,
            decoder,
            results,
            encoding,
        }
    }

    pub fn question_bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn support_encoding(&self) -> SupportEncoding {
        self.encoding
    }

    /// Open a fresh session at the intake form.
    pub fn create(&self) -> Result<SessionCreated, ScreeningError> {
        let session_id = SessionId::generate();
        let session = ScreeningSession::new();
        self.store.insert(session_id, session.clone())?;
        tracing::info!(session = %session_id, "screening session created");
        Ok(SessionCreated {
            session_id,
            step: StepView::for_session(&session, &self.bank),
        })
    }

    /// What the client should render for the session right now.
    pub fn step(&self, session_id: &SessionId) -> Result<StepView, ScreeningError> {
        let session = self.fetch(session_id)?;
        Ok(StepView::for_session(&session, &self.bank))
    }

    /// Validate and record the intake form, moving to question 1.
    pub fn submit_demographics(
        &self,
        session_id: &SessionId,
        form: &DemographicsForm,
    ) -> Result<StepView, ScreeningError> {
        let mut session = self.fetch(session_id)?;
        let demographics = form.validate()?;
        session.begin(demographics)?;
        self.store.update(session_id, session.clone())?;
        Ok(StepView::for_session(&session, &self.bank))
    }

    /// Record the answer for the question on screen. When it was the last
    /// one, classification runs immediately and the outcome rides along.
    pub fn answer(
        &self,
        session_id: &SessionId,
        question: u8,
        score: u8,
    ) -> Result<AnswerOutcome, ScreeningError> {
        let mut session = self.fetch(session_id)?;
        let step = session.record_answer(&self.bank, question, score)?;
        self.store.update(session_id, session.clone())?;

        let result = if step == Step::Results {
            Some(self.classify(session_id, &mut session)?)
        } else {
            None
        };
        Ok(AnswerOutcome {
            step: StepView::for_session(&session, &self.bank),
            result,
        })
    }

    /// Step back from the question on screen, reopening the previous one.
    pub fn go_back(
        &self,
        session_id: &SessionId,
        question: u8,
    ) -> Result<StepView, ScreeningError> {
        let mut session = self.fetch(session_id)?;
        session.step_back(question)?;
        self.store.update(session_id, session.clone())?;
        Ok(StepView::for_session(&session, &self.bank))
    }

    /// Throw the session away and restart at an empty intake form.
    pub fn restart(&self, session_id: &SessionId) -> Result<StepView, ScreeningError> {
        let mut session = self.fetch(session_id)?;
        session.reset();
        self.store.update(session_id, session.clone())?;
        Ok(StepView::for_session(&session, &self.bank))
    }

    /// Produce the result for a finished questionnaire. Idempotent: a stored
    /// outcome is returned as-is, so a failed prediction can be retried
    /// without re-answering anything.
    pub fn finalize(&self, session_id: &SessionId) -> Result<ResultRecord, ScreeningError> {
        let mut session = self.fetch(session_id)?;
        self.classify(session_id, &mut session)
    }

    /// The stored result, if finalization has succeeded.
    pub fn result(&self, session_id: &SessionId) -> Result<ResultRecord, ScreeningError> {
        let session = self.fetch(session_id)?;
        session
            .outcome()
            .cloned()
            .ok_or(ScreeningError::ResultNotReady)
    }

    /// The export record for a finalized session.
    pub fn summary(&self, session_id: &SessionId) -> Result<ScreeningSummary, ScreeningError> {
        let session = self.fetch(session_id)?;
        let record = session
            .outcome()
            .cloned()
            .ok_or(ScreeningError::ResultNotReady)?;
        let assessment = session.completed()?;
        Ok(ScreeningSummary::compose(&assessment, &record, &self.bank))
    }

    fn fetch(&self, session_id: &SessionId) -> Result<ScreeningSession, ScreeningError> {
        let session = self
            .store
            .fetch(session_id)?
            .ok_or(StoreError::NotFound)?;
        Ok(session)
    }

    fn classify(
        &self,
        session_id: &SessionId,
        session: &mut ScreeningSession,
    ) -> Result<ResultRecord, ScreeningError> {
        if let Some(record) = session.outcome() {
            return Ok(record.clone());
        }

        let (features, total_score) = {
            let assessment = session.completed()?;
            (
                FeatureRecord::from_assessment(&assessment, self.encoding),
                assessment.total_score(),
            )
        };
        let code = self.model.predict(&features).map_err(PredictionError::from)?;
        let label = self.decoder.decode(code).map_err(PredictionError::from)?;
        let record = assemble(total_score, label);

        session.record_outcome(record.clone())?;
        self.store.update(session_id, session.clone())?;
        tracing::info!(
            session = %session_id,
            total_score,
            risk_label = %record.risk_label,
            "screening finalized"
        );

        let assessment = session.completed()?;
        let summary = ScreeningSummary::compose(&assessment, &record, &self.bank);
        if let Err(error) = self.results.record(&summary) {
            tracing::warn!(session = %session_id, %error, "result log write failed");
        }
        Ok(record)
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error(transparent)]
    Intake(#[from] DemographicsError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Incomplete(#[from] IncompleteAssessment),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error("the screening result is not ready yet")]
    ResultNotReady,
    #[error(transparent)]
    Store(#[from] StoreError),
}
