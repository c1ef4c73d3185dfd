//! Seam between the screening flow and the trained risk model.
//!
//! The flow only ever sees [`RiskModel`] and [`LabelDecoder`], so the bundled
//! score-band stand-ins can be swapped for a real inference backend without
//! touching any session logic.

use serde::{Deserialize, Serialize};

use super::features::FeatureRecord;
use super::questionnaire::MAX_TOTAL;

/// Opaque category index produced by the model. Meaning belongs to the
/// decoder that ships with the same training artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryCode(pub u8);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("risk model rejected the feature record: {0}")]
    Rejected(String),
    #[error("risk model unavailable: {0}")]
    Unavailable(String),
    #[error("no label known for risk category code {}", (.0).0)]
    UnknownCategory(CategoryCode),
}

/// Anything that can turn a feature record into a risk category.
pub trait RiskModel: Send + Sync {
    fn predict(&self, features: &FeatureRecord) -> Result<CategoryCode, ModelError>;
}

/// Maps category codes back to the human-readable labels the model was
/// trained against.
pub trait LabelDecoder: Send + Sync {
    fn decode(&self, code: CategoryCode) -> Result<String, ModelError>;
}

/// Failure of the predict-then-decode pipeline. The session that triggered it
/// stays finished and can be retried without re-answering anything.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("risk prediction failed: {source}")]
pub struct PredictionError {
    #[from]
    source: ModelError,
}

impl PredictionError {
    pub fn model_error(&self) -> &ModelError {
        &self.source
    }
}

/// Stand-in model that bands the EPDS total into four categories. The cut
/// points follow the published scale guidance (10 and 13) with a fourth band
/// for the top of the range.
#[derive(Debug, Clone)]
pub struct BandedRiskModel {
    cut_points: [u8; 3],
}

impl BandedRiskModel {
    pub fn standard() -> Self {
        Self {
            cut_points: [10, 13, 20],
        }
    }

    /// Custom cut points, ascending. `cut_points[i]` is the lowest total
    /// that lands in category `i + 1`.
    pub fn with_cut_points(cut_points: [u8; 3]) -> Self {
        Self { cut_points }
    }
}

impl RiskModel for BandedRiskModel {
    fn predict(&self, features: &FeatureRecord) -> Result<CategoryCode, ModelError> {
        if features.total_score > MAX_TOTAL {
            return Err(ModelError::Rejected(format!(
                "total score {} exceeds the scale maximum {MAX_TOTAL}",
                features.total_score
            )));
        }
        let band = self
            .cut_points
            .iter()
            .filter(|&&cut| features.total_score >= cut)
            .count() as u8;
        Ok(CategoryCode(band))
    }
}

/// Decoder for the four-band labelling shipped with [`BandedRiskModel`].
#[derive(Debug, Clone)]
pub struct StaticLabelDecoder {
    labels: Vec<String>,
}

impl StaticLabelDecoder {
    /// The label set the rest of the product keys on.
    pub fn canonical() -> Self {
        Self::new(["Mild", "Moderate", "Severe", "Profound"])
    }

    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

impl LabelDecoder for StaticLabelDecoder {
    fn decode(&self, code: CategoryCode) -> Result<String, ModelError> {
        self.labels
            .get(usize::from(code.0))
            .cloned()
            .ok_or(ModelError::UnknownCategory(code))
    }
}
