use serde::{Deserialize, Serialize};

use super::questionnaire::ITEM_COUNT;
use super::result::ResultRecord;

/// Self-reported level of support available to the respondent at home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilySupport {
    High,
    Medium,
    Low,
}

impl FamilySupport {
    pub const fn ordered() -> [FamilySupport; 3] {
        [FamilySupport::High, FamilySupport::Medium, FamilySupport::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            FamilySupport::High => "High",
            FamilySupport::Medium => "Medium",
            FamilySupport::Low => "Low",
        }
    }
}

/// Validated intake details. Construct through [`Demographics::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    respondent_name: String,
    location: String,
    age: u8,
    family_support: FamilySupport,
}

pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 45;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DemographicsError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("age {0} is outside the supported range {MIN_AGE}..={MAX_AGE}")]
    AgeOutOfRange(u8),
}

impl Demographics {
    /// Trims both text fields and rejects blank values or an age outside
    /// the supported band.
    pub fn new(
        respondent_name: &str,
        location: &str,
        age: u8,
        family_support: FamilySupport,
    ) -> Result<Self, DemographicsError> {
        let respondent_name = respondent_name.trim();
        if respondent_name.is_empty() {
            return Err(DemographicsError::EmptyField { field: "name" });
        }
        let location = location.trim();
        if location.is_empty() {
            return Err(DemographicsError::EmptyField { field: "location" });
        }
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(DemographicsError::AgeOutOfRange(age));
        }
        Ok(Self {
            respondent_name: respondent_name.to_owned(),
            location: location.to_owned(),
            age,
            family_support,
        })
    }

    pub fn respondent_name(&self) -> &str {
        &self.respondent_name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn family_support(&self) -> FamilySupport {
        self.family_support
    }
}

/// Intake submission as received from the client, validated into
/// [`Demographics`] before it touches a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicsForm {
    pub name: String,
    pub location: String,
    pub age: u8,
    pub family_support: FamilySupport,
}

impl DemographicsForm {
    pub fn validate(&self) -> Result<Demographics, DemographicsError> {
        Demographics::new(&self.name, &self.location, self.age, self.family_support)
    }
}

/// Where a session currently sits. Question numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Demographics,
    Question(u8),
    Results,
}

impl Step {
    /// Numeric position on the demographics -> Q1..Q10 -> results track:
    /// 0 for the intake form, the question number while answering, and
    /// `ITEM_COUNT + 1` once all items are in.
    pub fn position(self) -> u8 {
        match self {
            Step::Demographics => 0,
            Step::Question(number) => number,
            Step::Results => ITEM_COUNT as u8 + 1,
        }
    }
}

/// One respondent's walk through the questionnaire.
///
/// The struct is a plain record; every transition lives in the state-machine
/// impl block so the two invariants hold at all times:
/// answers are stored in item order, and their count always equals
/// `min(position - 1, ITEM_COUNT)` (no gaps, no stale tail).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningSession {
    pub(crate) demographics: Option<Demographics>,
    pub(crate) step: Step,
    pub(crate) answers: Vec<u8>,
    pub(crate) outcome: Option<ResultRecord>,
}

impl ScreeningSession {
    /// A fresh session waiting on the intake form.
    pub fn new() -> Self {
        Self {
            demographics: None,
            step: Step::Demographics,
            answers: Vec::with_capacity(ITEM_COUNT),
            outcome: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn demographics(&self) -> Option<&Demographics> {
        self.demographics.as_ref()
    }

    /// Scores recorded so far, in item order starting at question 1.
    pub fn answers(&self) -> &[u8] {
        &self.answers
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// The stored classification, present only after a successful finalize.
    pub fn outcome(&self) -> Option<&ResultRecord> {
        self.outcome.as_ref()
    }
}

impl Default for ScreeningSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_at_the_intake_form() {
        let session = ScreeningSession::new();
        assert_eq!(session.step(), Step::Demographics);
        assert!(session.demographics().is_none());
        assert!(session.answers().is_empty());
        assert!(session.outcome().is_none());
    }

    #[test]
    fn positions_track_the_screen_order() {
        assert_eq!(Step::Demographics.position(), 0);
        assert_eq!(Step::Question(1).position(), 1);
        assert_eq!(Step::Question(10).position(), 10);
        assert_eq!(Step::Results.position(), 11);
    }

    #[test]
    fn demographics_trims_and_validates() {
        let ok = Demographics::new("  Amina  ", "Nairobi", 29, FamilySupport::High)
            .expect("valid intake");
        assert_eq!(ok.respondent_name(), "Amina");
        assert_eq!(ok.location(), "Nairobi");

        assert_eq!(
            Demographics::new("   ", "Nairobi", 29, FamilySupport::High),
            Err(DemographicsError::EmptyField { field: "name" })
        );
        assert_eq!(
            Demographics::new("Amina", "", 29, FamilySupport::High),
            Err(DemographicsError::EmptyField { field: "location" })
        );
        assert_eq!(
            Demographics::new("Amina", "Nairobi", 17, FamilySupport::High),
            Err(DemographicsError::AgeOutOfRange(17))
        );
        assert_eq!(
            Demographics::new("Amina", "Nairobi", 46, FamilySupport::High),
            Err(DemographicsError::AgeOutOfRange(46))
        );
    }

    #[test]
    fn support_labels_follow_the_intake_order() {
        let labels: Vec<&str> = FamilySupport::ordered().iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["High", "Medium", "Low"]);
    }
}
