use crate::api::{ApiError, SummaryService};
use crate::forms::{FormError, PdfDocument, SelectedFile};

pub const SUMMARY_FAILED: &str = "Failed to process the document. Please try again.";

/// A summary as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary(String);

impl Summary {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// One paragraph per line, as displayed.
    pub fn lines(&self) -> Vec<&str> {
        self.0.split('\n').collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummarizationScreen {
    selected: Option<PdfDocument>,
    loading: bool,
    error: Option<String>,
    summary: Option<Summary>,
}

impl SummarizationScreen {
    pub fn selected(&self) -> Option<&PdfDocument> {
        self.selected.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.loading
    }

    /// A rejected file clears any earlier selection.
    pub fn select_file(&mut self, file: SelectedFile) {
        match PdfDocument::from_selection(file) {
            Ok(document) => {
                tracing::debug!(file = document.name(), "document selected");
                self.selected = Some(document);
                self.error = None;
            }
            Err(e) => {
                self.selected = None;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn begin_upload(&mut self) -> Option<PdfDocument> {
        if self.loading {
            return None;
        }
        let Some(document) = self.selected.clone() else {
            self.error = Some(FormError::NoFile.to_string());
            return None;
        };

        self.loading = true;
        self.error = None;
        Some(document)
    }

    /// A failure keeps the previous summary on screen.
    pub fn finish_upload(&mut self, outcome: Result<String, ApiError>) {
        self.loading = false;
        match outcome {
            Ok(text) => self.summary = Some(Summary::new(text)),
            Err(e) => self.error = Some(e.user_message(SUMMARY_FAILED)),
        }
    }

    pub async fn submit<S>(&mut self, service: &S)
    where
        S: SummaryService + ?Sized,
    {
        let Some(document) = self.begin_upload() else {
            return;
        };

        let outcome = service.summarize(&document).await;
        self.finish_upload(outcome);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Records every upload it receives.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        answer: Option<Result<String, ApiError>>,
    }

    #[async_trait]
    impl SummaryService for Recorder {
        async fn summarize(&self, document: &PdfDocument) -> Result<String, ApiError> {
            self.calls.lock().unwrap().push(document.name().to_string());
            self.answer.clone().unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn pdf() -> SelectedFile {
        SelectedFile {
            name: "contract.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.7".to_vec(),
        }
    }

    #[tokio::test]
    async fn non_pdf_never_reaches_backend() {
        let service = Recorder::default();
        let mut screen = SummarizationScreen::default();

        screen.select_file(SelectedFile {
            name: "notes.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: b"hello".to_vec(),
        });
        assert_eq!(screen.error(), Some("Please upload a PDF file only"));
        assert!(screen.selected().is_none());
        assert!(!screen.can_submit());

        screen.submit(&service).await;
        assert_eq!(screen.error(), Some("Please select a PDF file"));
        assert!(service.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn rejected_file_replaces_earlier_selection() {
        let mut screen = SummarizationScreen::default();
        screen.select_file(pdf());
        assert!(screen.can_submit());

        screen.select_file(SelectedFile {
            content_type: "image/png".to_string(),
            ..pdf()
        });
        assert!(screen.selected().is_none());
    }

    #[tokio::test]
    async fn summary_is_split_into_lines() {
        let service = Recorder {
            answer: Some(Ok("First point.\nSecond point.".to_string())),
            ..Default::default()
        };
        let mut screen = SummarizationScreen::default();
        screen.select_file(pdf());

        screen.submit(&service).await;

        assert_eq!(service.calls.lock().unwrap().as_slice(), ["contract.pdf"]);
        let summary = screen.summary().unwrap();
        assert_eq!(summary.lines(), vec!["First point.", "Second point."]);
        assert_eq!(screen.error(), None);
        assert!(!screen.loading());
    }

    #[tokio::test]
    async fn backend_error_text_is_shown() {
        let service = Recorder {
            answer: Some(Err(ApiError::Remote("No text found in PDF".to_string()))),
            ..Default::default()
        };
        let mut screen = SummarizationScreen::default();
        screen.select_file(pdf());

        screen.submit(&service).await;
        assert_eq!(screen.error(), Some("No text found in PDF"));
        assert!(screen.summary().is_none());
    }

    #[test]
    fn transport_failure_uses_fallback() {
        let mut screen = SummarizationScreen::default();
        screen.select_file(pdf());
        assert!(screen.begin_upload().is_some());

        screen.finish_upload(Err(ApiError::Network("connection refused".to_string())));
        assert_eq!(screen.error(), Some(SUMMARY_FAILED));
    }

    #[test]
    fn loading_screen_refuses_second_upload() {
        let mut screen = SummarizationScreen::default();
        screen.select_file(pdf());

        assert!(screen.begin_upload().is_some());
        assert!(screen.begin_upload().is_none());
        assert!(!screen.can_submit());
    }
}
