use serde::Serialize;

/// Number of items on the Edinburgh Postnatal Depression Scale.
pub const ITEM_COUNT: usize = 10;

/// Highest reachable total (every item answered with the top score).
pub const MAX_TOTAL: u8 = (ITEM_COUNT as u8) * 3;

/// Instruction stem shown above every item.
pub const INSTRUCTION: &str =
    "In the past 7 days, please pick the answer that comes closest to how you have felt.";

/// One selectable answer with its severity contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub label: &'static str,
    pub score: u8,
}

/// A single questionnaire item. Scores across the four choices are always a
/// permutation of {0, 1, 2, 3}; the choice order follows the published scale,
/// so positively-worded items ascend and negatively-worded items descend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub number: u8,
    pub text: &'static str,
    pub choices: [Choice; 4],
}

impl Question {
    /// Whether `score` is one of this item's choice values.
    pub fn accepts(&self, score: u8) -> bool {
        self.choices.iter().any(|choice| choice.score == score)
    }

    /// The choice carrying `score`, when the item has one.
    pub fn choice_for(&self, score: u8) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.score == score)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuestionnaireError {
    #[error("question {0} is out of range (valid numbers are 1..={ITEM_COUNT})")]
    OutOfRange(u8),
}

/// The ordered ten-item bank. Built once at startup and shared read-only.
#[derive(Debug)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn standard() -> Self {
        Self {
            questions: standard_items(),
        }
    }

    /// Look up an item by its 1-based number.
    pub fn question(&self, number: u8) -> Result<&Question, QuestionnaireError> {
        if number == 0 {
            return Err(QuestionnaireError::OutOfRange(number));
        }
        self.questions
            .get(usize::from(number) - 1)
            .ok_or(QuestionnaireError::OutOfRange(number))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_items() -> Vec<Question> {
    vec![
        Question {
            number: 1,
            text: "I have been able to laugh and see the funny side of things",
            choices: [
                Choice { label: "As much as I always could", score: 0 },
                Choice { label: "Not quite so much now", score: 1 },
                Choice { label: "Definitely not so much now", score: 2 },
                Choice { label: "Not at all", score: 3 },
            ],
        },
        Question {
            number: 2,
            text: "I have looked forward with enjoyment to things",
            choices: [
                Choice { label: "As much as I ever did", score: 0 },
                Choice { label: "Rather less than I used to", score: 1 },
                Choice { label: "Definitely less than I used to", score: 2 },
                Choice { label: "Hardly at all", score: 3 },
            ],
        },
        Question {
            number: 3,
            text: "I have blamed myself unnecessarily when things went wrong",
            choices: [
                Choice { label: "Yes, most of the time", score: 3 },
                Choice { label: "Yes, some of the time", score: 2 },
                Choice { label: "Not very often", score: 1 },
                Choice { label: "No, never", score: 0 },
            ],
        },
        Question {
            number: 4,
            text: "I have been anxious or worried for no good reason",
            choices: [
                Choice { label: "No, not at all", score: 0 },
                Choice { label: "Hardly ever", score: 1 },
                Choice { label: "Yes, sometimes", score: 2 },
                Choice { label: "Yes, very often", score: 3 },
            ],
        },
        Question {
            number: 5,
            text: "I have felt scared or panicky for no very good reason",
            choices: [
                Choice { label: "Yes, quite a lot", score: 3 },
                Choice { label: "Yes, sometimes", score: 2 },
                Choice { label: "No, not much", score: 1 },
                Choice { label: "No, not at all", score: 0 },
            ],
        },
        Question {
            number: 6,
            text: "Things have been getting on top of me",
            choices: [
                Choice {
                    label: "Yes, most of the time I haven't been able to cope at all",
                    score: 3,
                },
                Choice {
                    label: "Yes, sometimes I haven't been coping as well as usual",
                    score: 2,
                },
                Choice { label: "No, most of the time I have coped quite well", score: 1 },
                Choice { label: "No, I have been coping as well as ever", score: 0 },
            ],
        },
        Question {
            number: 7,
            text: "I have been so unhappy that I have had difficulty sleeping",
            choices: [
                Choice { label: "Yes, most of the time", score: 3 },
                Choice { label: "Yes, sometimes", score: 2 },
                Choice { label: "Not very often", score: 1 },
                Choice { label: "No, not at all", score: 0 },
            ],
        },
        Question {
            number: 8,
            text: "I have felt sad or miserable",
            choices: [
                Choice { label: "Yes, most of the time", score: 3 },
                Choice { label: "Yes, quite often", score: 2 },
                Choice { label: "Not very often", score: 1 },
                Choice { label: "No, not at all", score: 0 },
            ],
        },
        Question {
            number: 9,
            text: "I have been so unhappy that I have been crying",
            choices: [
                Choice { label: "Yes, most of the time", score: 3 },
                Choice { label: "Yes, quite often", score: 2 },
                Choice { label: "Only occasionally", score: 1 },
                Choice { label: "No, never", score: 0 },
            ],
        },
        Question {
            number: 10,
            text: "The thought of harming myself has occurred to me",
            choices: [
                Choice { label: "Yes, quite often", score: 3 },
                Choice { label: "Sometimes", score: 2 },
                Choice { label: "Hardly ever", score: 1 },
                Choice { label: "Never", score: 0 },
            ],
        },
    ]
}
