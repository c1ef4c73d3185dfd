use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::machine::CompletedAssessment;
use super::questionnaire::QuestionBank;
use super::session::FamilySupport;

/// Shown alongside every result surface, screen or export.
pub const DISCLAIMER: &str =
    "This screening supports, but never replaces, the judgement of a qualified health professional.";

/// What the respondent sees at the end: the total, the model's label and the
/// guidance tied to that label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub total_score: u8,
    pub risk_label: String,
    pub tips: Vec<String>,
}

/// Build the final record for a decoded label. Labels outside the known set
/// still produce a usable result with the generic guidance.
pub fn assemble(total_score: u8, risk_label: String) -> ResultRecord {
    let tips = tips_for(&risk_label)
        .iter()
        .map(|tip| (*tip).to_owned())
        .collect();
    ResultRecord {
        total_score,
        risk_label,
        tips,
    }
}

const MILD_TIPS: &[&str] = &[
    "Keep up the routines that are working for you, and protect time to rest when the baby sleeps.",
    "Stay connected: a short daily chat with someone you trust goes a long way.",
    "Gentle walks and daylight help steady mood and sleep.",
];

const MODERATE_TIPS: &[&str] = &[
    "Share how you have been feeling with your partner or a trusted family member.",
    "Consider telling your midwife or health visitor how the past week has felt.",
    "Prioritise sleep and accept offers of help with the baby where you can.",
];

const SEVERE_TIPS: &[&str] = &[
    "Please arrange to talk to a doctor, midwife or health visitor soon; these feelings are treatable.",
    "Do not carry this alone: tell someone close to you how hard the past week has been.",
    "Keep a helpline number nearby and use it whenever things feel too heavy.",
];

const PROFOUND_TIPS: &[&str] = &[
    "Please seek professional support today; contact your doctor or a maternal mental-health service.",
    "If you have thoughts of harming yourself, call a crisis helpline or go to the nearest emergency department.",
    "Ask someone you trust to stay with you and to help you make these calls.",
];

const DEFAULT_TIPS: &[&str] = &[
    "Talking to a maternal health professional is a good next step whatever the score.",
    "Support from family and friends makes a real difference; let them in.",
];

fn tips_for(risk_label: &str) -> &'static [&'static str] {
    match risk_label {
        "Mild" => MILD_TIPS,
        "Moderate" => MODERATE_TIPS,
        "Severe" => SEVERE_TIPS,
        "Profound" => PROFOUND_TIPS,
        _ => DEFAULT_TIPS,
    }
}

/// One row of the answer table in exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerLine {
    pub question: u8,
    pub text: String,
    pub choice: String,
    pub score: u8,
}

/// Everything an export needs about one finished screening, resolved against
/// the question bank so downstream renderers stay dumb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningSummary {
    pub respondent_name: String,
    pub location: String,
    pub age: u8,
    pub family_support: FamilySupport,
    pub answers: Vec<AnswerLine>,
    pub total_score: u8,
    pub risk_label: String,
    pub tips: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

impl ScreeningSummary {
    pub fn compose(
        assessment: &CompletedAssessment<'_>,
        record: &ResultRecord,
        bank: &QuestionBank,
    ) -> Self {
        let demographics = assessment.demographics();
        let answers = assessment
            .scores()
            .iter()
            .zip(bank.questions())
            .map(|(&score, question)| AnswerLine {
                question: question.number,
                text: question.text.to_owned(),
                choice: question
                    .choice_for(score)
                    .map(|choice| choice.label.to_owned())
                    .unwrap_or_else(|| format!("score {score}")),
                score,
            })
            .collect();
        Self {
            respondent_name: demographics.respondent_name().to_owned(),
            location: demographics.location().to_owned(),
            age: demographics.age(),
            family_support: demographics.family_support(),
            answers,
            total_score: record.total_score,
            risk_label: record.risk_label.clone(),
            tips: record.tips.clone(),
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::questionnaire::ITEM_COUNT;
    use crate::screening::session::{Demographics, ScreeningSession};

    #[test]
    fn each_band_gets_its_own_guidance() {
        assert_eq!(assemble(4, "Mild".to_owned()).tips.len(), MILD_TIPS.len());
        assert!(assemble(11, "Moderate".to_owned()).tips[1].contains("midwife"));
        assert!(assemble(15, "Severe".to_owned()).tips[0].contains("doctor"));
        assert!(assemble(25, "Profound".to_owned()).tips[1].contains("helpline"));
    }

    #[test]
    fn unknown_labels_fall_back_to_the_generic_guidance() {
        let record = assemble(12, "Uncalibrated".to_owned());
        assert_eq!(record.risk_label, "Uncalibrated");
        assert_eq!(record.tips.len(), DEFAULT_TIPS.len());
        assert_eq!(record.tips[0], DEFAULT_TIPS[0]);
    }

    #[test]
    fn summary_resolves_choice_labels_against_the_bank() {
        let bank = QuestionBank::standard();
        let mut session = ScreeningSession::new();
        let intake = Demographics::new("Amina", "Nairobi", 27, FamilySupport::Medium)
            .expect("valid intake");
        session.begin(intake).expect("intake accepted");
        for number in 1..=ITEM_COUNT as u8 {
            session.record_answer(&bank, number, 0).expect("answer accepted");
        }

        let assessment = session.completed().expect("complete session");
        let record = assemble(assessment.total_score(), "Mild".to_owned());
        let summary = ScreeningSummary::compose(&assessment, &record, &bank);

        assert_eq!(summary.answers.len(), ITEM_COUNT);
        assert_eq!(summary.answers[0].choice, "As much as I always could");
        assert_eq!(summary.answers[9].choice, "Never");
        assert_eq!(summary.total_score, 0);
        assert_eq!(summary.respondent_name, "Amina");
    }
}
