use serde::{Deserialize, Serialize};

use crate::{Question, QuestionId};

/// Identifier of a survey. Opaque to the session; numeric on the wire.
pub type SurveyId = u64;

/// Publication state of a survey. Governs whether submission is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    Draft,
    Published,
    Archived,
}

impl SurveyStatus {
    /// Only published surveys accept responses.
    pub fn accepts_responses(&self) -> bool {
        matches!(self, Self::Published)
    }
}

/// Display configuration. Consumed only for rendering; never affects
/// session behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub dark_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

/// The ordered, immutable-during-session description of a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyDefinition {
    pub id: SurveyId,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub status: SurveyStatus,

    /// Order is significant and fixed for the duration of a session.
    #[serde(default)]
    pub questions: Vec<Question>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl SurveyDefinition {
    /// Create a draft survey with the given questions.
    pub fn new(id: SurveyId, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            status: SurveyStatus::Draft,
            questions,
            theme: None,
        }
    }

    /// Set the publication status.
    pub fn with_status(mut self, status: SurveyStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the display theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by id.
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}
