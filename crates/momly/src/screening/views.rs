//! Serializable projections of session state for API responses.

use serde::Serialize;

use super::questionnaire::{Question, QuestionBank, INSTRUCTION};
use super::result::ResultRecord;
use super::session::{Demographics, FamilySupport, ScreeningSession, Step};
use super::store::SessionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub label: &'static str,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemographicsView {
    pub name: String,
    pub location: String,
    pub age: u8,
    pub family_support: FamilySupport,
}

impl DemographicsView {
    fn from_domain(demographics: &Demographics) -> Self {
        Self {
            name: demographics.respondent_name().to_owned(),
            location: demographics.location().to_owned(),
            age: demographics.age(),
            family_support: demographics.family_support(),
        }
    }
}

/// What the client should render next.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepView {
    /// The intake form, pre-filled when the respondent navigated back to it.
    Demographics {
        position: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        intake: Option<DemographicsView>,
    },
    Question {
        position: u8,
        number: u8,
        total: u8,
        instruction: &'static str,
        text: &'static str,
        choices: Vec<ChoiceView>,
    },
    Results {
        position: u8,
        finalized: bool,
    },
}

impl StepView {
    pub fn for_session(session: &ScreeningSession, bank: &QuestionBank) -> Self {
        match session.step() {
            Step::Demographics => StepView::Demographics {
                position: 0,
                intake: session.demographics().map(DemographicsView::from_domain),
            },
            Step::Question(number) => bank
                .question(number)
                .map(|question| Self::for_question(question, bank))
                .unwrap_or(StepView::Results {
                    position: number,
                    finalized: false,
                }),
            Step::Results => StepView::Results {
                position: session.step().position(),
                finalized: session.outcome().is_some(),
            },
        }
    }

    fn for_question(question: &Question, bank: &QuestionBank) -> Self {
        StepView::Question {
            position: question.number,
            number: question.number,
            total: bank.len() as u8,
            instruction: INSTRUCTION,
            text: question.text,
            choices: question
                .choices
                .iter()
                .map(|choice| ChoiceView {
                    label: choice.label,
                    score: choice.score,
                })
                .collect(),
        }
    }
}

/// Response to session creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionCreated {
    pub session_id: SessionId,
    pub step: StepView,
}

/// Response to an answer submission. `result` is present only when the
/// answer finished the questionnaire and classification succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub step: StepView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultRecord>,
}
