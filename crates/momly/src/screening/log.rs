use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::questionnaire::ITEM_COUNT;
use super::result::ScreeningSummary;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("result log unavailable: {0}")]
    Unavailable(String),
}

/// Receives one record per finished screening. Failures are reported but the
/// screening that produced the record has already succeeded.
pub trait ResultSink: Send + Sync {
    fn record(&self, summary: &ScreeningSummary) -> Result<(), SinkError>;
}

/// Sink used when no log destination is configured.
#[derive(Debug, Default, Clone)]
pub struct NullResultLog;

impl ResultSink for NullResultLog {
    fn record(&self, _summary: &ScreeningSummary) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Appends screenings to a CSV file, one row per completed session, with the
/// same column layout the model is trained from plus the decoded label.
#[derive(Debug, Clone)]
pub struct CsvResultLog {
    path: PathBuf,
}

#[derive(Debug, Serialize)]
struct LogRow<'a> {
    timestamp: String,
    name: &'a str,
    location: &'a str,
    age: u8,
    family_support: &'static str,
    q1: u8,
    q2: u8,
    q3: u8,
    q4: u8,
    q5: u8,
    q6: u8,
    q7: u8,
    q8: u8,
    q9: u8,
    q10: u8,
    total_score: u8,
    risk_label: &'a str,
}

impl CsvResultLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvResultLog {
    fn record(&self, summary: &ScreeningSummary) -> Result<(), SinkError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| SinkError::Unavailable(err.to_string()))?;
        let needs_header = file
            .metadata()
            .map(|meta| meta.len() == 0)
            .map_err(|err| SinkError::Unavailable(err.to_string()))?;

        let mut scores = [0u8; ITEM_COUNT];
        for (slot, line) in scores.iter_mut().zip(&summary.answers) {
            *slot = line.score;
        }
        let row = LogRow {
            timestamp: summary.completed_at.to_rfc3339(),
            name: &summary.respondent_name,
            location: &summary.location,
            age: summary.age,
            family_support: summary.family_support.label(),
            q1: scores[0],
            q2: scores[1],
            q3: scores[2],
            q4: scores[3],
            q5: scores[4],
            q6: scores[5],
            q7: scores[6],
            q8: scores[7],
            q9: scores[8],
            q10: scores[9],
            total_score: summary.total_score,
            risk_label: &summary.risk_label,
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer
            .serialize(row)
            .map_err(|err| SinkError::Unavailable(err.to_string()))?;
        writer
            .flush()
            .map_err(|err| SinkError::Unavailable(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::classifier::{
        BandedRiskModel, LabelDecoder, RiskModel, StaticLabelDecoder,
    };
    use crate::screening::features::{FeatureRecord, SupportEncoding};
    use crate::screening::questionnaire::QuestionBank;
    use crate::screening::result::{assemble, ScreeningSummary};
    use crate::screening::session::{Demographics, FamilySupport, ScreeningSession};

    fn sample_summary(score_per_item: u8) -> ScreeningSummary {
        let bank = QuestionBank::standard();
        let mut session = ScreeningSession::new();
        let intake = Demographics::new("Amina", "Nairobi", 27, FamilySupport::Medium)
            .expect("valid intake");
        session.begin(intake).expect("intake accepted");
        for number in 1..=ITEM_COUNT as u8 {
            session
                .record_answer(&bank, number, score_per_item)
                .expect("answer accepted");
        }
        let assessment = session.completed().expect("complete session");
        let features = FeatureRecord::from_assessment(&assessment, SupportEncoding::HighZero);
        let code = BandedRiskModel::standard()
            .predict(&features)
            .expect("prediction");
        let label = StaticLabelDecoder::canonical()
            .decode(code)
            .expect("known code");
        let record = assemble(assessment.total_score(), label);
        ScreeningSummary::compose(&assessment, &record, &bank)
    }

    #[test]
    fn appends_a_header_once_and_one_row_per_screening() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("screenings.csv");
        let log = CsvResultLog::new(&path);

        log.record(&sample_summary(1)).expect("first row");
        log.record(&sample_summary(3)).expect("second row");

        let contents = std::fs::read_to_string(&path).expect("log readable");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3, "header plus two rows");
        assert!(lines[0].starts_with("timestamp,name,location,age,family_support,q1"));
        assert!(lines[1].contains("Amina"));
        assert!(lines[1].contains("Moderate"), "total 10 decodes as Moderate");
        assert!(lines[2].contains("Profound"), "total 30 decodes as Profound");
    }

    #[test]
    fn null_sink_accepts_anything() {
        NullResultLog
            .record(&sample_summary(0))
            .expect("null sink never fails");
    }
}
