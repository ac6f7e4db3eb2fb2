//! The survey-taking state machine.
//!
//! A [`ResponseSession`] walks a respondent through a survey one question at
//! a time: it loads the definition from a [`SurveyStore`], accumulates typed
//! answers, clamps navigation to the question range, validates required
//! questions, and hands the store exactly one submission on success.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::distributions::Alphanumeric;

use survey_flow_types::{
    AnswerError, AnswerKey, AnswerValue, Answers, Question, QuestionId, SurveyDefinition,
    SurveyId,
};

use crate::registry::HandlerRegistry;
use crate::store::{ResponseEntry, ResponseSubmission, StoreError, SurveyStore};
use crate::widget::{RawInput, Widget};

/// Opaque per-sitting identifier, minted when the session opens.
///
/// Format: `session_<unix-millis>_<9 alphanumerics>`. The id carries no
/// authority; it only lets the store group a sitting's answers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|c| (c as char).to_ascii_lowercase())
            .collect();
        Self(format!("session_{millis}_{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the session fetched its survey, which decides whether submission is
/// allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Respondent-facing: only published surveys load, submission records.
    Published,
    /// Author-facing dry run: any status loads, submission is refused
    /// before the store is ever contacted.
    Preview,
}

/// Observable lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting answers and navigation.
    Active,
    /// Successfully recorded; the session is read-only.
    Submitted,
}

/// Failure opening a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("survey not found")]
    NotFound,

    #[error("failed to load survey")]
    Load(#[source] StoreError),

    #[error("session already submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Failure submitting a session.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("survey is not open for responses")]
    PreviewOnly,

    #[error("{} required question(s) unanswered", missing.len())]
    MissingRequired { missing: Vec<QuestionId> },

    #[error("session already submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One respondent's walk through one survey.
pub struct ResponseSession<S> {
    store: S,
    mode: FetchMode,
    registry: HandlerRegistry,
    survey: SurveyDefinition,
    session_id: SessionId,
    current: usize,
    answers: Answers,
    submitted: bool,
}

impl<S> std::fmt::Debug for ResponseSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSession")
            .field("mode", &self.mode)
            .field("survey", &self.survey)
            .field("session_id", &self.session_id)
            .field("current", &self.current)
            .field("answers", &self.answers)
            .field("submitted", &self.submitted)
            .finish_non_exhaustive()
    }
}

impl<S: SurveyStore> ResponseSession<S> {
    /// Open a session by fetching the survey and minting a session id.
    ///
    /// In [`FetchMode::Published`] a survey that is missing, draft, or
    /// archived yields [`SessionError::NotFound`]; previews load any status.
    pub async fn open(store: S, survey_id: SurveyId, mode: FetchMode) -> Result<Self, SessionError> {
        let survey = match mode {
            FetchMode::Published => store.fetch_published(survey_id).await,
            FetchMode::Preview => store.fetch_preview(survey_id).await,
        }
        .map_err(|err| match err {
            StoreError::NotFound => SessionError::NotFound,
            other => SessionError::Load(other),
        })?;

        let session_id = SessionId::generate();
        tracing::info!(
            survey_id,
            session_id = %session_id,
            questions = survey.len(),
            ?mode,
            "opened response session"
        );

        Ok(Self {
            store,
            mode,
            registry: HandlerRegistry::standard(),
            survey,
            session_id,
            current: 0,
            answers: Answers::new(),
            submitted: false,
        })
    }

    /// Replace the standard handler registry, e.g. to add custom types.
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn survey(&self) -> &SurveyDefinition {
        &self.survey
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        if self.submitted {
            SessionState::Submitted
        } else {
            SessionState::Active
        }
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Zero-based index of the question currently shown.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question currently shown, or `None` for an empty survey.
    pub fn current_question(&self) -> Option<&Question> {
        self.survey.questions().get(self.current)
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.survey.is_empty() || self.current + 1 == self.survey.len()
    }

    /// Describe the current question's widget against the stored answers.
    pub fn render_current(&self) -> Option<Widget> {
        self.current_question()
            .map(|q| self.registry.render(q, &self.answers))
    }

    /// Advance one question; saturates at the last question.
    pub fn next(&mut self) {
        if self.current + 1 < self.survey.len() {
            self.current += 1;
        }
    }

    /// Go back one question; saturates at the first question.
    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Store a typed value under an answer key.
    pub fn answer(
        &mut self,
        key: impl Into<AnswerKey>,
        value: impl Into<AnswerValue>,
    ) -> Result<(), SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        self.answers.insert(key, value);
        Ok(())
    }

    /// Coerce raw UI input through the current question's handler and store
    /// the result under the question's bare key.
    pub fn answer_current(&mut self, input: impl Into<RawInput>) -> Result<(), SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        let Some(question) = self.current_question() else {
            return Ok(());
        };
        let value = self.registry.coerce(question, input.into())?;
        let id = question.id;
        self.answers.insert(id, value);
        Ok(())
    }

    /// Toggle one value in a multi-select answer: absent values are added,
    /// present values removed. Toggling the same value twice is a no-op.
    pub fn toggle_selection(
        &mut self,
        question_id: QuestionId,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        self.answers.toggle_selection(question_id, value);
        Ok(())
    }

    /// Ids of required questions that are not yet answered, in survey order.
    ///
    /// Presence is judged per question id by the question's own handler, so
    /// an answer to an optional question never satisfies a required one.
    pub fn validate(&self) -> Vec<QuestionId> {
        self.survey
            .questions()
            .iter()
            .filter(|q| q.required && !self.registry.answered(q, &self.answers))
            .map(|q| q.id)
            .collect()
    }

    /// Validate and record the response.
    ///
    /// Submission is callable from any question index. Preview sessions and
    /// incomplete required questions are refused before the store is
    /// contacted; a store failure leaves the session active with all answers
    /// intact, so the respondent can retry.
    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        if self.submitted {
            return Err(SubmitError::AlreadySubmitted);
        }
        // The status check also covers stores that hand out non-published
        // surveys on the published path.
        if self.mode == FetchMode::Preview || !self.survey.status.accepts_responses() {
            return Err(SubmitError::PreviewOnly);
        }
        let missing = self.validate();
        if !missing.is_empty() {
            return Err(SubmitError::MissingRequired { missing });
        }

        let submission = ResponseSubmission {
            survey_id: self.survey.id,
            session_id: self.session_id.to_string(),
            responses: self.collect_entries(),
        };

        tracing::info!(
            survey_id = self.survey.id,
            session_id = %self.session_id,
            entries = submission.responses.len(),
            "submitting response"
        );

        match self.store.create_response(&submission).await {
            Ok(_) => {
                self.submitted = true;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    survey_id = self.survey.id,
                    session_id = %self.session_id,
                    error = %err,
                    "submission failed, session stays active"
                );
                Err(err.into())
            }
        }
    }

    /// Flatten the answer map into wire entries, in survey question order,
    /// with empty values filtered out. Compound questions contribute one
    /// entry per present part, both under the bare question id — the store
    /// keys responses by numeric question id only.
    fn collect_entries(&self) -> Vec<ResponseEntry> {
        let mut entries = Vec::new();
        for question in self.survey.questions() {
            let handler = self.registry.handler(&question.question_type);
            let keys = [
                AnswerKey::Question(question.id),
                AnswerKey::Comments(question.id),
                AnswerKey::Phone(question.id),
            ];
            for key in keys {
                if let Some(value) = self.answers.get(&key) {
                    if handler.value_present(value) {
                        entries.push(ResponseEntry::new(question.id, value.clone()));
                    }
                }
            }
        }
        entries
    }
}
