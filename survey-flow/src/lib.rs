//! Step-by-step survey response sessions.
//!
//! The surveys themselves are plain data ([`SurveyDefinition`] and friends,
//! re-exported from `survey-flow-types`). This crate adds the machinery for
//! taking one: a [`ResponseSession`] that walks the questions in order, a
//! [`HandlerRegistry`] that renders and coerces per question type, and a
//! [`SurveyStore`] trait abstracting where surveys live and responses go.
//!
//! ```no_run
//! use survey_flow::{FetchMode, ResponseSession, TestStore};
//!
//! # async fn demo(store: TestStore) -> anyhow::Result<()> {
//! let mut session = ResponseSession::open(store, 1, FetchMode::Published).await?;
//! session.answer_current("hello")?;
//! session.next();
//! session.submit().await?;
//! # Ok(())
//! # }
//! ```

pub mod registry;
pub mod session;
pub mod store;
pub mod test_store;
pub mod widget;

pub use registry::{HandlerRegistry, QuestionHandler};
pub use session::{
    FetchMode, ResponseSession, SessionError, SessionId, SessionState, SubmitError,
};
pub use store::{
    ResponseEntry, ResponseSubmission, StoreError, SubmissionReceipt, SurveyStore,
};
pub use test_store::TestStore;
pub use widget::{RawInput, Widget};

pub use survey_flow_types::{
    AnswerError, AnswerKey, AnswerValue, Answers, FileAttachment, Question, QuestionId,
    QuestionOption, QuestionSettings, QuestionType, SurveyDefinition, SurveyId, SurveyStatus,
    Theme,
};
