//! In-memory [`SurveyStore`] for exercising sessions without a server.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use survey_flow_types::{SurveyDefinition, SurveyId, SurveyStatus};

use crate::store::{ResponseSubmission, StoreError, SubmissionReceipt, SurveyStore};

/// A scripted store: holds survey definitions, records every submission it
/// receives, and can be primed to fail the next submissions in order.
#[derive(Default)]
pub struct TestStore {
    surveys: Vec<SurveyDefinition>,
    submissions: Mutex<Vec<ResponseSubmission>>,
    submit_failures: Mutex<VecDeque<StoreError>>,
    create_calls: Mutex<usize>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_survey(mut self, survey: SurveyDefinition) -> Self {
        self.surveys.push(survey);
        self
    }

    /// Prime the store so the next submission fails with `error`. Multiple
    /// calls queue failures in order; once drained, submissions succeed.
    pub fn fail_next_submit(&self, error: StoreError) {
        self.submit_failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(error);
    }

    /// Every submission the store accepted, in arrival order.
    pub fn submissions(&self) -> Vec<ResponseSubmission> {
        self.submissions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// How many times `create_response` was called, failures included.
    pub fn create_calls(&self) -> usize {
        *self
            .create_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn find(&self, id: SurveyId) -> Option<&SurveyDefinition> {
        self.surveys.iter().find(|s| s.id == id)
    }
}

#[async_trait]
impl SurveyStore for TestStore {
    async fn fetch_published(&self, id: SurveyId) -> Result<SurveyDefinition, StoreError> {
        self.find(id)
            .filter(|s| s.status == SurveyStatus::Published)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn fetch_preview(&self, id: SurveyId) -> Result<SurveyDefinition, StoreError> {
        self.find(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create_response(
        &self,
        submission: &ResponseSubmission,
    ) -> Result<SubmissionReceipt, StoreError> {
        *self
            .create_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) += 1;

        if let Some(error) = self
            .submit_failures
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
        {
            return Err(error);
        }

        self.submissions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(submission.clone());

        Ok(SubmissionReceipt {
            session_id: submission.session_id.clone(),
        })
    }
}
