//! EPDS screening workflow: question bank, session state machine, feature
//! encoding, classifier seams, result assembly, and the HTTP surface.
//!
//! One respondent drives one session at a time, so every operation here is
//! synchronous; concurrency only exists between unrelated sessions and is
//! the store's concern.

pub mod classifier;
pub mod features;
pub mod log;
pub mod machine;
pub mod questionnaire;
pub mod report;
pub mod result;
pub mod router;
pub mod service;
pub mod session;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use classifier::{
    BandedRiskModel, CategoryCode, LabelDecoder, ModelError, PredictionError, RiskModel,
    StaticLabelDecoder,
};
pub use features::{FeatureRecord, SupportEncoding};
pub use log::{CsvResultLog, NullResultLog, ResultSink, SinkError};
pub use machine::{CompletedAssessment, IncompleteAssessment, TransitionError};
pub use questionnaire::{
    Choice, Question, QuestionBank, QuestionnaireError, INSTRUCTION, ITEM_COUNT, MAX_TOTAL,
};
pub use report::{render_summary, ExportError};
pub use result::{assemble, AnswerLine, ResultRecord, ScreeningSummary, DISCLAIMER};
pub use router::{screening_router, AnswerRequest, BackRequest};
pub use service::{ScreeningError, ScreeningService};
pub use session::{
    Demographics, DemographicsError, DemographicsForm, FamilySupport, ScreeningSession, Step,
    MAX_AGE, MIN_AGE,
};
pub use store::{InvalidSessionId, SessionId, SessionStore, StoreError};
pub use views::{AnswerOutcome, ChoiceView, DemographicsView, SessionCreated, StepView};
