//! Core types for the survey-flow crates.
//!
//! This crate provides the foundational types for running survey response
//! sessions:
//! - `SurveyDefinition` - The top-level survey structure fetched from a store
//! - `Question`, `QuestionType` and `QuestionSettings` - Individual questions
//! - `AnswerKey`, `AnswerValue` and `Answers` - Collected respondent data
//! - `FileAttachment` - Decoded file payloads for upload questions
//!
//! Everything here is presentation-agnostic and serde-enabled; definitions
//! arrive and submissions depart as JSON over a REST-ish boundary.

mod question;
pub use question::{Question, QuestionId, QuestionOption, QuestionSettings, QuestionType};

mod answer;
pub use answer::{AnswerKey, AnswerValue, Answers, FileAttachment};

mod survey;
pub use survey::{SurveyDefinition, SurveyId, SurveyStatus, Theme};

mod error;
pub use error::AnswerError;
