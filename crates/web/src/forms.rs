//! Local validation of user input, before anything goes over the network.

use thiserror::Error;

use crate::types::{DivorceReason, DivorceStatus, PredictionRequest};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// The backend rejects request bodies above this size.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Youngest and oldest child age the prediction form accepts.
pub const CHILD_AGE_RANGE: core::ops::RangeInclusive<u8> = 1..=18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please upload a PDF file only")]
    NotPdf,

    #[error("Please select a PDF file")]
    NoFile,

    #[error("File is too large. Maximum size is 16 MB.")]
    TooLarge,

    #[error("Please fill in all fields.")]
    MissingFields,

    #[error("{field} must be a non-negative number.")]
    InvalidAmount { field: &'static str },

    #[error("Please select a valid divorce status.")]
    InvalidDivorceStatus,

    #[error("Please select a valid reason for divorce.")]
    InvalidReason,

    #[error("Child's age must be a whole number between 1 and 18.")]
    InvalidChildAge,
}

/// A file exactly as the user picked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A file that passed local checks and may be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    name: String,
    bytes: Vec<u8>,
}

impl PdfDocument {
    pub fn from_selection(file: SelectedFile) -> Result<Self, FormError> {
        if !is_pdf_content_type(&file.content_type) {
            return Err(FormError::NotPdf);
        }
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(FormError::TooLarge);
        }

        Ok(Self {
            name: file.name,
            bytes: file.bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn is_pdf_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
}

/// The prediction form's fields, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionForm {
    pub father_salary: String,
    pub mother_salary: String,
    pub divorce_status: String,
    pub reason_for_divorce: String,
    pub child_age: String,
}

impl PredictionForm {
    pub fn to_request(&self) -> Result<PredictionRequest, FormError> {
        let fields = [
            &self.father_salary,
            &self.mother_salary,
            &self.divorce_status,
            &self.reason_for_divorce,
            &self.child_age,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(FormError::MissingFields);
        }

        Ok(PredictionRequest {
            father_salary: parse_amount(&self.father_salary, "Father's salary")?,
            mother_salary: parse_amount(&self.mother_salary, "Mother's salary")?,
            divorce_status: DivorceStatus::parse(self.divorce_status.trim())
                .ok_or(FormError::InvalidDivorceStatus)?,
            reason_for_divorce: DivorceReason::parse(self.reason_for_divorce.trim())
                .ok_or(FormError::InvalidReason)?,
            child_age: self
                .child_age
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|age| CHILD_AGE_RANGE.contains(age))
                .ok_or(FormError::InvalidChildAge)?,
        })
    }
}

fn parse_amount(raw: &str, field: &'static str) -> Result<f64, FormError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or(FormError::InvalidAmount { field })
}
