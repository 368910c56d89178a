//! Wire types shared by the native shell and the browser frontend.
//!
//! These mirror the backend's JSON and must not depend on native-only crates.

use serde::{Deserialize, Serialize};

/// Marital situation sent to the prediction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DivorceStatus {
    Divorced,
    #[serde(rename = "Not Divorced")]
    NotDivorced,
}

impl DivorceStatus {
    pub const ALL: [DivorceStatus; 2] = [DivorceStatus::Divorced, DivorceStatus::NotDivorced];

    pub fn as_str(&self) -> &'static str {
        match self {
            DivorceStatus::Divorced => "Divorced",
            DivorceStatus::NotDivorced => "Not Divorced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// Stated ground for the divorce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DivorceReason {
    Adultery,
    Abandonment,
    Incompatibility,
    #[serde(rename = "Domestic Violence")]
    DomesticViolence,
    Other,
}

impl DivorceReason {
    pub const ALL: [DivorceReason; 5] = [
        DivorceReason::Adultery,
        DivorceReason::Abandonment,
        DivorceReason::Incompatibility,
        DivorceReason::DomesticViolence,
        DivorceReason::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DivorceReason::Adultery => "Adultery",
            DivorceReason::Abandonment => "Abandonment",
            DivorceReason::Incompatibility => "Incompatibility",
            DivorceReason::DomesticViolence => "Domestic Violence",
            DivorceReason::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub father_salary: f64,
    pub mother_salary: f64,
    pub divorce_status: DivorceStatus,
    pub reason_for_divorce: DivorceReason,
    pub child_age: u8,
}

/// A past case the model considers comparable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarCase {
    pub title: String,
    pub outcome: String,
}

/// Successful `POST /predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub custody: String,
    pub compensation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_cases: Option<Vec<SimilarCase>>,
}

/// Either shape `POST /upload` may answer with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error body both endpoints use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
