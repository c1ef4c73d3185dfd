//! Flattening a finished session into the column layout the risk model was
//! trained on. Key names and their order are part of the model contract and
//! must not change without retraining.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::machine::CompletedAssessment;
use super::questionnaire::ITEM_COUNT;
use super::session::FamilySupport;

/// How the three support levels map onto the model's integer column.
///
/// Training runs disagreed on the direction, so the mapping is explicit
/// configuration rather than an assumption baked into the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupportEncoding {
    /// High = 0, Medium = 1, Low = 2.
    HighZero,
    /// Low = 0, Medium = 1, High = 2.
    LowZero,
}

impl SupportEncoding {
    pub fn encode(self, support: FamilySupport) -> u8 {
        match (self, support) {
            (SupportEncoding::HighZero, FamilySupport::High) => 0,
            (SupportEncoding::HighZero, FamilySupport::Medium) => 1,
            (SupportEncoding::HighZero, FamilySupport::Low) => 2,
            (SupportEncoding::LowZero, FamilySupport::Low) => 0,
            (SupportEncoding::LowZero, FamilySupport::Medium) => 1,
            (SupportEncoding::LowZero, FamilySupport::High) => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SupportEncoding::HighZero => "high-zero",
            SupportEncoding::LowZero => "low-zero",
        }
    }
}

impl Default for SupportEncoding {
    fn default() -> Self {
        SupportEncoding::HighZero
    }
}

/// The twelve feature columns plus the derived total, ready for the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub age: u8,
    pub family_support: u8,
    pub item_scores: [u8; ITEM_COUNT],
    pub total_score: u8,
}

impl FeatureRecord {
    pub fn from_assessment(assessment: &CompletedAssessment<'_>, encoding: SupportEncoding) -> Self {
        let mut item_scores = [0u8; ITEM_COUNT];
        item_scores.copy_from_slice(assessment.scores());
        Self {
            age: assessment.demographics().age(),
            family_support: encoding.encode(assessment.demographics().family_support()),
            item_scores,
            total_score: assessment.total_score(),
        }
    }

    /// Column name/value pairs in training order.
    pub fn columns(&self) -> Vec<(String, u8)> {
        let mut columns = Vec::with_capacity(ITEM_COUNT + 3);
        columns.push(("Age".to_owned(), self.age));
        columns.push(("FamilySupport".to_owned(), self.family_support));
        for (index, score) in self.item_scores.iter().enumerate() {
            columns.push((format!("Q{}", index + 1), *score));
        }
        columns.push(("EPDS_Score".to_owned(), self.total_score));
        columns
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let columns = self.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (name, value) in &columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::questionnaire::QuestionBank;
    use crate::screening::session::{Demographics, ScreeningSession};

    fn finished_session() -> ScreeningSession {
        let bank = QuestionBank::standard();
        let mut session = ScreeningSession::new();
        let intake = Demographics::new("Amina", "Nairobi", 31, FamilySupport::Low)
            .expect("valid intake");
        session.begin(intake).expect("intake accepted");
        for number in 1..=ITEM_COUNT as u8 {
            let score = if number % 2 == 0 { 2 } else { 1 };
            session
                .record_answer(&bank, number, score)
                .expect("answer accepted");
        }
        session
    }

    #[test]
    fn columns_follow_the_training_layout() {
        let session = finished_session();
        let assessment = session.completed().expect("complete session");
        let record = FeatureRecord::from_assessment(&assessment, SupportEncoding::HighZero);

        let columns = record.columns();
        let names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Age",
                "FamilySupport",
                "Q1",
                "Q2",
                "Q3",
                "Q4",
                "Q5",
                "Q6",
                "Q7",
                "Q8",
                "Q9",
                "Q10",
                "EPDS_Score"
            ]
        );
        assert_eq!(record.age, 31);
        assert_eq!(record.total_score, 15);
    }

    #[test]
    fn both_encodings_agree_on_medium_only() {
        for support in FamilySupport::ordered() {
            let high_zero = SupportEncoding::HighZero.encode(support);
            let low_zero = SupportEncoding::LowZero.encode(support);
            match support {
                FamilySupport::Medium => {
                    assert_eq!(high_zero, 1);
                    assert_eq!(low_zero, 1);
                }
                _ => assert_eq!(high_zero, 2 - low_zero),
            }
        }
        assert_eq!(SupportEncoding::HighZero.encode(FamilySupport::High), 0);
        assert_eq!(SupportEncoding::LowZero.encode(FamilySupport::High), 2);
    }

    #[test]
    fn encoding_choice_flows_into_the_record() {
        let session = finished_session();
        let assessment = session.completed().expect("complete session");

        let high_zero = FeatureRecord::from_assessment(&assessment, SupportEncoding::HighZero);
        assert_eq!(high_zero.family_support, 2);

        let low_zero = FeatureRecord::from_assessment(&assessment, SupportEncoding::LowZero);
        assert_eq!(low_zero.family_support, 0);
    }

    #[test]
    fn serializes_as_an_ordered_map() {
        let session = finished_session();
        let assessment = session.completed().expect("complete session");
        let record = FeatureRecord::from_assessment(&assessment, SupportEncoding::HighZero);

        let json = serde_json::to_string(&record).expect("serializable");
        assert!(json.starts_with("{\"Age\":31"));
        assert!(json.contains("\"EPDS_Score\":15"));
        assert!(json.contains("\"Q10\":2"));
    }
}
