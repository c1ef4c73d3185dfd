//! Transition rules for a screening session.
//!
//! Every mutation funnels through here so the answer ledger can never drift
//! from the current step: after any call, the number of stored answers equals
//! `min(position - 1, ITEM_COUNT)`. Moving backwards always drops the answer
//! of the question being returned to, which is why submitting an answer is
//! always an append and never an overwrite.

use super::questionnaire::{QuestionBank, ITEM_COUNT};
use super::result::ResultRecord;
use super::session::{Demographics, ScreeningSession, Step};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("the screening has already moved past the intake form")]
    IntakeClosed,
    #[error("the intake form has not been completed yet")]
    IntakeOpen,
    #[error("the request targets question {requested} but the session is at question {current}")]
    WrongQuestion { requested: u8, current: u8 },
    #[error("all {ITEM_COUNT} answers are already recorded; restart to change them")]
    QuestionsFinished,
    #[error("score {score} is not one of question {question}'s choices")]
    InvalidScore { question: u8, score: u8 },
    #[error("cannot go back from the intake form")]
    AtStart,
}

/// Raised when a caller asks for results before all answers are in.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("screening incomplete: {answered} of {ITEM_COUNT} answers recorded, resume at question {next_question}")]
pub struct IncompleteAssessment {
    pub answered: usize,
    pub next_question: u8,
}

/// Borrowed proof that a session holds demographics and all ten answers.
/// Only [`ScreeningSession::completed`] hands these out.
#[derive(Debug, Clone, Copy)]
pub struct CompletedAssessment<'a> {
    demographics: &'a Demographics,
    scores: &'a [u8],
}

impl CompletedAssessment<'_> {
    pub fn demographics(&self) -> &Demographics {
        self.demographics
    }

    /// All ten scores in item order.
    pub fn scores(&self) -> &[u8] {
        self.scores
    }

    pub fn total_score(&self) -> u8 {
        self.scores.iter().sum()
    }
}

impl ScreeningSession {
    /// Close the intake form and move to question 1.
    pub fn begin(&mut self, demographics: Demographics) -> Result<Step, TransitionError> {
        if self.step != Step::Demographics {
            return Err(TransitionError::IntakeClosed);
        }
        self.demographics = Some(demographics);
        self.answers.clear();
        self.outcome = None;
        self.step = Step::Question(1);
        Ok(self.step)
    }

    /// Record the score for the question currently on screen and advance.
    ///
    /// `question` must match the current step; a mismatch means the caller's
    /// view of the session is stale and nothing is changed.
    pub fn record_answer(
        &mut self,
        bank: &QuestionBank,
        question: u8,
        score: u8,
    ) -> Result<Step, TransitionError> {
        let current = match self.step {
            Step::Demographics => return Err(TransitionError::IntakeOpen),
            Step::Results => return Err(TransitionError::QuestionsFinished),
            Step::Question(number) => number,
        };
        if question != current {
            return Err(TransitionError::WrongQuestion {
                requested: question,
                current,
            });
        }
        let item = bank
            .question(current)
            .map_err(|_| TransitionError::WrongQuestion {
                requested: question,
                current,
            })?;
        if !item.accepts(score) {
            return Err(TransitionError::InvalidScore {
                question: current,
                score,
            });
        }
        self.answers.push(score);
        self.step = if usize::from(current) == ITEM_COUNT {
            Step::Results
        } else {
            Step::Question(current + 1)
        };
        Ok(self.step)
    }

    /// Move one screen backwards from the question currently on screen,
    /// dropping the answer of the question being returned to so it can be
    /// re-entered. From question 1 this reopens the intake form with its
    /// previous values still in place. The results screen is only left via
    /// [`ScreeningSession::reset`].
    pub fn step_back(&mut self, question: u8) -> Result<Step, TransitionError> {
        let current = match self.step {
            Step::Demographics => return Err(TransitionError::AtStart),
            Step::Results => return Err(TransitionError::QuestionsFinished),
            Step::Question(number) => number,
        };
        if question != current {
            return Err(TransitionError::WrongQuestion {
                requested: question,
                current,
            });
        }
        self.step = if current == 1 {
            self.answers.clear();
            Step::Demographics
        } else {
            self.answers.pop();
            Step::Question(current - 1)
        };
        Ok(self.step)
    }

    /// Wipe everything and return to a fresh intake form.
    pub fn reset(&mut self) -> Step {
        self.demographics = None;
        self.answers.clear();
        self.outcome = None;
        self.step = Step::Demographics;
        self.step
    }

    /// Prove the session is ready for classification. Fails with the question
    /// the respondent should resume at otherwise.
    pub fn completed(&self) -> Result<CompletedAssessment<'_>, IncompleteAssessment> {
        match (&self.demographics, self.step) {
            (Some(demographics), Step::Results) if self.answers.len() == ITEM_COUNT => {
                Ok(CompletedAssessment {
                    demographics,
                    scores: &self.answers,
                })
            }
            _ => Err(IncompleteAssessment {
                answered: self.answers.len(),
                next_question: self.answers.len() as u8 + 1,
            }),
        }
    }

    /// Attach the classification outcome. Only a complete session may hold
    /// one, so a stale record can never survive a back-step or reset.
    pub fn record_outcome(&mut self, record: ResultRecord) -> Result<(), IncompleteAssessment> {
        self.completed()?;
        self.outcome = Some(record);
        Ok(())
    }

    /// Sum of the scores recorded so far.
    pub fn total_score(&self) -> u8 {
        self.answers.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::result;
    use crate::screening::session::FamilySupport;

    fn intake() -> Demographics {
        Demographics::new("Amina", "Nairobi", 29, FamilySupport::Medium).expect("valid intake")
    }

    fn assert_ledger_matches_step(session: &ScreeningSession) {
        let expected = usize::from(session.step().position())
            .saturating_sub(1)
            .min(ITEM_COUNT);
        assert_eq!(
            session.answered_count(),
            expected,
            "answer ledger out of sync at {:?}",
            session.step()
        );
    }

    fn answered_through(bank: &QuestionBank, count: u8) -> ScreeningSession {
        let mut session = ScreeningSession::new();
        session.begin(intake()).expect("intake accepted");
        for number in 1..=count {
            session
                .record_answer(bank, number, 1)
                .expect("answer accepted");
        }
        session
    }

    #[test]
    fn forward_walk_keeps_the_ledger_in_sync() {
        let bank = QuestionBank::standard();
        let mut session = ScreeningSession::new();
        assert_ledger_matches_step(&session);

        session.begin(intake()).expect("intake accepted");
        assert_eq!(session.step(), Step::Question(1));
        assert_ledger_matches_step(&session);

        for number in 1..=ITEM_COUNT as u8 {
            session
                .record_answer(&bank, number, 2)
                .expect("answer accepted");
            assert_ledger_matches_step(&session);
        }
        assert_eq!(session.step(), Step::Results);
        assert_eq!(session.total_score(), 20);
    }

    #[test]
    fn intake_cannot_be_resubmitted_mid_questionnaire() {
        let bank = QuestionBank::standard();
        let mut session = answered_through(&bank, 3);
        assert_eq!(session.begin(intake()), Err(TransitionError::IntakeClosed));
        assert_eq!(session.step(), Step::Question(4));
    }

    #[test]
    fn answers_before_intake_are_rejected() {
        let bank = QuestionBank::standard();
        let mut session = ScreeningSession::new();
        assert_eq!(
            session.record_answer(&bank, 1, 0),
            Err(TransitionError::IntakeOpen)
        );
        assert_eq!(session.step(), Step::Demographics);
    }

    #[test]
    fn stale_question_number_changes_nothing() {
        let bank = QuestionBank::standard();
        let mut session = answered_through(&bank, 4);
        let before = session.clone();
        assert_eq!(
            session.record_answer(&bank, 3, 2),
            Err(TransitionError::WrongQuestion {
                requested: 3,
                current: 5
            })
        );
        assert_eq!(session, before);
    }

    #[test]
    fn invalid_score_changes_nothing() {
        let bank = QuestionBank::standard();
        let mut session = answered_through(&bank, 2);
        let before = session.clone();
        assert_eq!(
            session.record_answer(&bank, 3, 4),
            Err(TransitionError::InvalidScore {
                question: 3,
                score: 4
            })
        );
        assert_eq!(session, before);
        assert_ledger_matches_step(&session);
    }

    #[test]
    fn stepping_back_drops_the_answer_being_revisited() {
        let bank = QuestionBank::standard();
        let mut session = answered_through(&bank, 5);

        assert_eq!(session.step_back(6), Ok(Step::Question(5)));
        assert_eq!(session.answers(), &[1, 1, 1, 1]);
        assert_ledger_matches_step(&session);

        session
            .record_answer(&bank, 5, 3)
            .expect("revised answer accepted");
        assert_eq!(session.answers(), &[1, 1, 1, 1, 3]);
        assert_eq!(session.step(), Step::Question(6));
    }

    #[test]
    fn back_navigation_requires_the_on_screen_question() {
        let bank = QuestionBank::standard();
        let mut session = answered_through(&bank, 5);
        let before = session.clone();
        assert_eq!(
            session.step_back(4),
            Err(TransitionError::WrongQuestion {
                requested: 4,
                current: 6
            })
        );
        assert_eq!(session, before);
    }

    #[test]
    fn backing_into_the_intake_form_keeps_demographics() {
        let bank = QuestionBank::standard();
        let mut session = answered_through(&bank, 1);

        assert_eq!(session.step_back(2), Ok(Step::Question(1)));
        assert_eq!(session.step_back(1), Ok(Step::Demographics));
        assert!(session.answers().is_empty());
        assert_eq!(
            session.demographics().map(|d| d.respondent_name()),
            Some("Amina")
        );
        assert_eq!(session.step_back(1), Err(TransitionError::AtStart));
    }

    #[test]
    fn results_screen_only_exits_through_restart() {
        let bank = QuestionBank::standard();
        let mut session = answered_through(&bank, 10);
        assert_eq!(session.step(), Step::Results);

        assert_eq!(
            session.step_back(10),
            Err(TransitionError::QuestionsFinished)
        );
        assert_eq!(session.answered_count(), ITEM_COUNT);
        assert_eq!(session.reset(), Step::Demographics);
    }

    #[test]
    fn reset_wipes_the_whole_session() {
        let bank = QuestionBank::standard();
        let mut session = answered_through(&bank, 7);
        assert_eq!(session.reset(), Step::Demographics);
        assert!(session.demographics().is_none());
        assert!(session.answers().is_empty());
        assert!(session.outcome().is_none());
    }

    #[test]
    fn completion_gate_names_the_next_unanswered_question() {
        let bank = QuestionBank::standard();
        let session = answered_through(&bank, 6);
        assert_eq!(
            session.completed().unwrap_err(),
            IncompleteAssessment {
                answered: 6,
                next_question: 7
            }
        );

        let fresh = ScreeningSession::new();
        assert_eq!(fresh.completed().unwrap_err().next_question, 1);

        let done = answered_through(&bank, 10);
        let assessment = done.completed().expect("complete session");
        assert_eq!(assessment.scores().len(), ITEM_COUNT);
        assert_eq!(assessment.total_score(), 10);
    }

    #[test]
    fn outcome_only_sticks_to_a_complete_session() {
        let bank = QuestionBank::standard();
        let record = result::assemble(10, "Moderate".to_owned());

        let mut partial = answered_through(&bank, 9);
        assert!(partial.record_outcome(record.clone()).is_err());

        let mut done = answered_through(&bank, 10);
        done.record_outcome(record).expect("outcome stored");
        assert!(done.outcome().is_some());

        done.reset();
        assert!(done.outcome().is_none(), "stale outcome must not survive");
    }
}
