//! [`SurveyStore`] backend over the survey service's HTTP API.
//!
//! Endpoints:
//! - `GET  {base}/api/surveys/public/{id}` — published surveys only
//! - `GET  {base}/api/surveys/{id}` — any status, for previews
//! - `POST {base}/api/responses` — record a submission
//!
//! The service reports failures as a JSON body `{"error": "..."}`; status
//! codes map onto the [`StoreError`] taxonomy.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use survey_flow::{
    ResponseSubmission, StoreError, SubmissionReceipt, SurveyDefinition, SurveyId, SurveyStore,
};

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

/// HTTP-backed survey store.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// Store talking to the service at `base_url` (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Store with a caller-configured client, e.g. for timeouts or proxies.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn fetch_survey(&self, url: String) -> Result<SurveyDefinition, StoreError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| StoreError::Network(err.into()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_for(status, &body);
            tracing::warn!(%url, %status, error = %err, "survey fetch failed");
            return Err(err);
        }

        response
            .json::<SurveyDefinition>()
            .await
            .map_err(|err| StoreError::Server(format!("malformed survey body: {err}")))
    }
}

/// Map a non-success status and its error body onto the store taxonomy.
fn error_for(status: StatusCode, body: &str) -> StoreError {
    let detail = serde_json::from_str::<ApiError>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| status.to_string());

    if status == StatusCode::NOT_FOUND {
        StoreError::NotFound
    } else if status.is_client_error() {
        StoreError::Validation(detail)
    } else {
        StoreError::Server(detail)
    }
}

#[async_trait]
impl SurveyStore for HttpStore {
    async fn fetch_published(&self, id: SurveyId) -> Result<SurveyDefinition, StoreError> {
        self.fetch_survey(self.endpoint(&format!("surveys/public/{id}")))
            .await
    }

    async fn fetch_preview(&self, id: SurveyId) -> Result<SurveyDefinition, StoreError> {
        self.fetch_survey(self.endpoint(&format!("surveys/{id}"))).await
    }

    async fn create_response(
        &self,
        submission: &ResponseSubmission,
    ) -> Result<SubmissionReceipt, StoreError> {
        let url = self.endpoint("responses");
        let response = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|err| StoreError::Network(err.into()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_for(status, &body);
            tracing::warn!(
                %url,
                %status,
                survey_id = submission.survey_id,
                session_id = %submission.session_id,
                error = %err,
                "submission failed"
            );
            return Err(err);
        }

        response
            .json::<SubmissionReceipt>()
            .await
            .map_err(|err| StoreError::Server(format!("malformed receipt body: {err}")))
    }
}
