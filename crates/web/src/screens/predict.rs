use core::fmt;

use crate::api::{ApiError, PredictionService};
use crate::forms::PredictionForm;
use crate::types::{PredictionRequest, PredictionResult};

pub const PREDICTION_FAILED: &str = "Failed to get prediction";

/// One comparable case, rendered as `title - outcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarCaseLine {
    pub title: String,
    pub outcome: String,
}

impl fmt::Display for SimilarCaseLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.outcome)
    }
}

/// What the prediction screen displays for a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionView {
    pub custody: String,
    pub compensation: String,
    /// `None` hides the section entirely.
    pub similar_cases: Option<Vec<SimilarCaseLine>>,
}

impl From<&PredictionResult> for PredictionView {
    fn from(result: &PredictionResult) -> Self {
        let similar_cases = result
            .similar_cases
            .as_ref()
            .filter(|cases| !cases.is_empty())
            .map(|cases| {
                cases
                    .iter()
                    .map(|case| SimilarCaseLine {
                        title: case.title.clone(),
                        outcome: case.outcome.clone(),
                    })
                    .collect()
            });

        Self {
            custody: result.custody.clone(),
            compensation: format!("{:.2}", result.compensation),
            similar_cases,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionScreen {
    pub form: PredictionForm,
    loading: bool,
    error: Option<String>,
    result: Option<PredictionResult>,
}

impl PredictionScreen {
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn view(&self) -> Option<PredictionView> {
        self.result.as_ref().map(PredictionView::from)
    }

    pub fn begin_prediction(&mut self) -> Option<PredictionRequest> {
        if self.loading {
            return None;
        }

        match self.form.to_request() {
            Ok(request) => {
                self.loading = true;
                self.error = None;
                Some(request)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn finish_prediction(&mut self, outcome: Result<PredictionResult, ApiError>) {
        self.loading = false;
        match outcome {
            Ok(result) => self.result = Some(result),
            Err(e) => self.error = Some(e.user_message(PREDICTION_FAILED)),
        }
    }

    pub async fn submit<S>(&mut self, service: &S)
    where
        S: PredictionService + ?Sized,
    {
        let Some(request) = self.begin_prediction() else {
            return;
        };

        let outcome = service.predict(&request).await;
        self.finish_prediction(outcome);
    }
}
