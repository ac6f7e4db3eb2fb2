//! Persistence seam between a response session and whatever holds surveys.
//!
//! Sessions only ever need three operations: fetch a published survey, fetch
//! a survey regardless of status for previewing, and record a completed
//! submission. Backends implement [`SurveyStore`] over HTTP, a database, or
//! an in-memory table for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use survey_flow_types::{AnswerValue, QuestionId, SurveyDefinition, SurveyId};

/// Failure taxonomy shared by every store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The survey does not exist or is not visible to this caller.
    #[error("survey not found")]
    NotFound,

    /// The store rejected the request as malformed or incomplete.
    #[error("store rejected the request: {0}")]
    Validation(String),

    /// The store failed internally.
    #[error("store failure: {0}")]
    Server(String),

    /// The store could not be reached at all.
    #[error("store unreachable")]
    Network(#[source] anyhow::Error),
}

/// One answered question as the store records it.
///
/// The id is numeric on the wire; compound questions contribute one entry
/// per present part, both under the bare question id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    #[serde(rename = "questionId")]
    pub question_id: QuestionId,
    pub answer: AnswerValue,
}

impl ResponseEntry {
    pub fn new(question_id: QuestionId, answer: impl Into<AnswerValue>) -> Self {
        Self {
            question_id,
            answer: answer.into(),
        }
    }
}

/// A completed response, ready to be recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSubmission {
    pub survey_id: SurveyId,
    pub session_id: String,
    pub responses: Vec<ResponseEntry>,
}

/// The store's acknowledgement of a recorded submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub session_id: String,
}

/// Where surveys live and responses go.
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Fetch a survey that is open for responses. Surveys that exist but are
    /// not published come back as [`StoreError::NotFound`].
    async fn fetch_published(&self, id: SurveyId) -> Result<SurveyDefinition, StoreError>;

    /// Fetch a survey regardless of status, for previewing.
    async fn fetch_preview(&self, id: SurveyId) -> Result<SurveyDefinition, StoreError>;

    /// Record a completed submission.
    async fn create_response(
        &self,
        submission: &ResponseSubmission,
    ) -> Result<SubmissionReceipt, StoreError>;
}

#[async_trait]
impl<S: SurveyStore + ?Sized> SurveyStore for &S {
    async fn fetch_published(&self, id: SurveyId) -> Result<SurveyDefinition, StoreError> {
        (**self).fetch_published(id).await
    }

    async fn fetch_preview(&self, id: SurveyId) -> Result<SurveyDefinition, StoreError> {
        (**self).fetch_preview(id).await
    }

    async fn create_response(
        &self,
        submission: &ResponseSubmission,
    ) -> Result<SubmissionReceipt, StoreError> {
        (**self).create_response(submission).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_serializes_with_wire_field_names() {
        let submission = ResponseSubmission {
            survey_id: 3,
            session_id: "session_1712000000000_abc123def".to_string(),
            responses: vec![
                ResponseEntry::new(10, "hello"),
                ResponseEntry::new(12, "more detail"),
            ],
        };

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["surveyId"], 3);
        assert_eq!(json["sessionId"], "session_1712000000000_abc123def");
        // Question ids are numbers on the wire, never strings.
        assert_eq!(json["responses"][0]["questionId"], 10);
        assert_eq!(json["responses"][0]["answer"], "hello");
        assert_eq!(json["responses"][1]["questionId"], 12);
    }
}
