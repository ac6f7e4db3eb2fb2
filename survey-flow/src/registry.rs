//! Type-dispatch rendering and coercion.
//!
//! Each question type registers a handler with three duties: describe the
//! input widget for a question and its stored value, coerce raw UI input to
//! the typed answer value, and decide whether a stored value counts as
//! "present" for required-question validation. New question types are added
//! by registration, not by editing a central switch.

use std::collections::HashMap;

use survey_flow_types::{
    AnswerError, AnswerKey, AnswerValue, Answers, Question, QuestionType,
};

use crate::widget::{RawInput, Widget};

/// Per-type behavior: rendering, input coercion, and the presence rule.
pub trait QuestionHandler: Send + Sync {
    /// Describe the widget for this question, showing any stored value.
    fn render(&self, question: &Question, answers: &Answers) -> Widget;

    /// Coerce raw UI input into the typed value stored for this question.
    fn coerce(&self, question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError>;

    /// Whether a stored value counts as an answer.
    fn value_present(&self, value: &AnswerValue) -> bool;

    /// Whether the question counts as answered given the full answer set.
    ///
    /// The default looks up the question's bare key; compound types override.
    fn answered(&self, question: &Question, answers: &Answers) -> bool {
        answers
            .get(&AnswerKey::Question(question.id))
            .is_some_and(|value| self.value_present(value))
    }
}

fn stored<'a>(question: &Question, answers: &'a Answers) -> Option<&'a AnswerValue> {
    answers.get(&AnswerKey::Question(question.id))
}

fn parse_number(input: RawInput) -> Result<AnswerValue, AnswerError> {
    match input {
        RawInput::Text(raw) => raw
            .trim()
            .parse::<f64>()
            .map(AnswerValue::Number)
            .map_err(|_| AnswerError::InvalidNumber(raw)),
        _ => Err(AnswerError::InvalidInput("expected numeric text")),
    }
}

/// Text-like questions: text, textarea, email, phone, address, and the
/// free-text branches of date/time entry.
struct TextHandler {
    multiline: bool,
}

impl QuestionHandler for TextHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        let value = stored(question, answers)
            .and_then(AnswerValue::as_text)
            .unwrap_or_default()
            .to_string();
        Widget::TextEntry {
            placeholder: question.settings.placeholder().to_string(),
            multiline: self.multiline,
            rows: question.settings.rows(),
            value,
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        match input {
            RawInput::Text(s) => Ok(AnswerValue::Text(s)),
            _ => Err(AnswerError::InvalidInput("expected text")),
        }
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Text(s) if !s.is_empty())
    }
}

enum NumberUnit {
    Plain,
    Currency,
    Percent,
}

/// Plain numeric entry, shared by number, currency, and percentage.
struct NumberHandler {
    unit: NumberUnit,
}

impl QuestionHandler for NumberHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        let unit = match self.unit {
            NumberUnit::Plain => None,
            NumberUnit::Currency => Some(question.settings.currency_code().to_string()),
            NumberUnit::Percent => Some("%".to_string()),
        };
        Widget::NumberEntry {
            min: question.settings.min,
            max: question.settings.max,
            step: question.settings.step(),
            unit,
            value: stored(question, answers).and_then(AnswerValue::as_number),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        parse_number(input)
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Number(_))
    }
}

/// Single-select radio group.
struct ChoiceHandler;

impl QuestionHandler for ChoiceHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        let selected = stored(question, answers)
            .and_then(AnswerValue::as_text)
            .map(|v| vec![v.to_string()])
            .unwrap_or_default();
        Widget::ChoiceList {
            options: question.options.clone(),
            selected,
            multiple: false,
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        match input {
            RawInput::Text(value) => Ok(AnswerValue::Text(value)),
            _ => Err(AnswerError::InvalidInput("expected an option value")),
        }
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Text(s) if !s.is_empty())
    }
}

/// Multi-select checkbox group. Hosts usually route interaction through
/// `ResponseSession::toggle_selection`; coercing a raw option value yields a
/// fresh single-element selection.
struct CheckboxHandler;

impl QuestionHandler for CheckboxHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        let selected = stored(question, answers)
            .and_then(AnswerValue::as_selections)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        Widget::ChoiceList {
            options: question.options.clone(),
            selected,
            multiple: true,
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        match input {
            RawInput::Text(value) => Ok(AnswerValue::Selections(vec![value])),
            _ => Err(AnswerError::InvalidInput("expected an option value")),
        }
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Selections(values) if !values.is_empty())
    }
}

/// Emoji and likert scales; the selection is the numeric option value.
struct ScaleHandler;

impl QuestionHandler for ScaleHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        Widget::Scale {
            options: question.options.clone(),
            selected: stored(question, answers).and_then(AnswerValue::as_number),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        parse_number(input)
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Number(_))
    }
}

struct StarHandler;

impl QuestionHandler for StarHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        Widget::StarRow {
            count: question.settings.max_rating(),
            value: stored(question, answers)
                .and_then(AnswerValue::as_number)
                .map(|n| n as u8),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        parse_number(input)
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Number(_))
    }
}

struct ThumbsHandler;

impl QuestionHandler for ThumbsHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        Widget::ThumbsPair {
            up: stored(question, answers).and_then(AnswerValue::as_bool),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        match input {
            RawInput::Toggle(up) => Ok(AnswerValue::Bool(up)),
            RawInput::Text(raw) => match raw.as_str() {
                "up" => Ok(AnswerValue::Bool(true)),
                "down" => Ok(AnswerValue::Bool(false)),
                _ => Err(AnswerError::InvalidInput("expected up or down")),
            },
            _ => Err(AnswerError::InvalidInput("expected a thumb direction")),
        }
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Bool(_))
    }
}

struct SliderHandler;

impl QuestionHandler for SliderHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        let settings = &question.settings;
        Widget::Slider {
            min: settings.slider_min(),
            max: settings.slider_max(),
            step: settings.step(),
            left_label: settings.left_label().to_string(),
            right_label: settings.right_label().to_string(),
            show_value: settings.show_value(),
            value: stored(question, answers)
                .and_then(AnswerValue::as_number)
                .unwrap_or_else(|| settings.slider_min()),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        parse_number(input)
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Number(_))
    }
}

struct DateHandler;

impl QuestionHandler for DateHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        Widget::DateEntry {
            value: stored(question, answers)
                .and_then(AnswerValue::as_text)
                .unwrap_or_default()
                .to_string(),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        match input {
            RawInput::Text(s) => Ok(AnswerValue::Text(s)),
            _ => Err(AnswerError::InvalidInput("expected a date string")),
        }
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Text(s) if !s.is_empty())
    }
}

struct TimeHandler;

impl QuestionHandler for TimeHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        Widget::TimeEntry {
            value: stored(question, answers)
                .and_then(AnswerValue::as_text)
                .unwrap_or_default()
                .to_string(),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        match input {
            RawInput::Text(s) => Ok(AnswerValue::Text(s)),
            _ => Err(AnswerError::InvalidInput("expected a time string")),
        }
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Text(s) if !s.is_empty())
    }
}

/// Yes/no and boolean questions.
struct YesNoHandler;

impl QuestionHandler for YesNoHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        Widget::YesNo {
            value: stored(question, answers).and_then(AnswerValue::as_bool),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        match input {
            RawInput::Toggle(b) => Ok(AnswerValue::Bool(b)),
            RawInput::Text(raw) => match raw.as_str() {
                "yes" | "true" => Ok(AnswerValue::Bool(true)),
                "no" | "false" => Ok(AnswerValue::Bool(false)),
                _ => Err(AnswerError::InvalidInput("expected yes or no")),
            },
            _ => Err(AnswerError::InvalidInput("expected a boolean")),
        }
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Bool(_))
    }
}

/// File and image uploads. Attachments arrive already decoded; decode is
/// asynchronous on the host side and may complete out of order across
/// questions, which is safe because each question owns its key.
struct FileHandler {
    images_only: bool,
}

impl QuestionHandler for FileHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        let settings = &question.settings;
        Widget::FileDrop {
            allowed_types: settings.allowed_types().to_vec(),
            max_files: settings.max_files(),
            max_size_mb: settings.max_size_mb(),
            images_only: self.images_only,
            files: stored(question, answers)
                .and_then(AnswerValue::as_files)
                .map(<[_]>::to_vec)
                .unwrap_or_default(),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        match input {
            RawInput::Files(files) => Ok(AnswerValue::Files(files)),
            _ => Err(AnswerError::InvalidInput("expected decoded attachments")),
        }
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Files(files) if !files.is_empty())
    }
}

/// Compound comments + phone question. Stores its parts under the
/// `<id>_comments` and `<id>_phone` keys; counts as answered when either
/// part is a non-empty string.
struct ContactHandler;

impl QuestionHandler for ContactHandler {
    fn render(&self, question: &Question, answers: &Answers) -> Widget {
        let part = |key: AnswerKey| {
            answers
                .get(&key)
                .and_then(AnswerValue::as_text)
                .unwrap_or_default()
                .to_string()
        };
        let settings = &question.settings;
        Widget::ContactFollowup {
            comments: part(AnswerKey::Comments(question.id)),
            comments_placeholder: settings.comments_placeholder().to_string(),
            phone: part(AnswerKey::Phone(question.id)),
            phone_placeholder: settings.phone_placeholder().to_string(),
            country_code: settings.country_code().to_string(),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        match input {
            RawInput::Text(s) => Ok(AnswerValue::Text(s)),
            _ => Err(AnswerError::InvalidInput("expected text")),
        }
    }

    fn value_present(&self, value: &AnswerValue) -> bool {
        matches!(value, AnswerValue::Text(s) if !s.is_empty())
    }

    fn answered(&self, question: &Question, answers: &Answers) -> bool {
        [
            AnswerKey::Comments(question.id),
            AnswerKey::Phone(question.id),
        ]
        .iter()
        .any(|key| {
            answers
                .get(key)
                .is_some_and(|value| self.value_present(value))
        })
    }
}

/// Fallback for unrecognized types: renders a neutral placeholder and never
/// blocks submission.
struct UnsupportedHandler;

impl QuestionHandler for UnsupportedHandler {
    fn render(&self, question: &Question, _answers: &Answers) -> Widget {
        Widget::Unsupported {
            type_name: question.question_type.to_string(),
        }
    }

    fn coerce(&self, _question: &Question, input: RawInput) -> Result<AnswerValue, AnswerError> {
        match input {
            RawInput::Text(s) => Ok(AnswerValue::Text(s)),
            _ => Err(AnswerError::InvalidInput("unsupported question type")),
        }
    }

    fn value_present(&self, _value: &AnswerValue) -> bool {
        true
    }

    fn answered(&self, _question: &Question, _answers: &Answers) -> bool {
        true
    }
}

/// Registered-handler table mapping question types to their behavior.
pub struct HandlerRegistry {
    handlers: HashMap<QuestionType, Box<dyn QuestionHandler>>,
    fallback: Box<dyn QuestionHandler>,
}

impl HandlerRegistry {
    /// Registry with a handler for every question type in the standard
    /// enumeration.
    pub fn standard() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            fallback: Box::new(UnsupportedHandler),
        };

        registry.register(QuestionType::Text, TextHandler { multiline: false });
        registry.register(QuestionType::Textarea, TextHandler { multiline: true });
        registry.register(QuestionType::Email, TextHandler { multiline: false });
        registry.register(QuestionType::Phone, TextHandler { multiline: false });
        registry.register(QuestionType::Address, TextHandler { multiline: true });
        registry.register(QuestionType::MultipleChoice, ChoiceHandler);
        registry.register(QuestionType::Checkbox, CheckboxHandler);
        registry.register(QuestionType::EmojiScale, ScaleHandler);
        registry.register(QuestionType::LikertScale, ScaleHandler);
        registry.register(QuestionType::StarRating, StarHandler);
        registry.register(QuestionType::ThumbsRating, ThumbsHandler);
        registry.register(QuestionType::Slider, SliderHandler);
        registry.register(QuestionType::Number, NumberHandler { unit: NumberUnit::Plain });
        registry.register(
            QuestionType::Currency,
            NumberHandler {
                unit: NumberUnit::Currency,
            },
        );
        registry.register(
            QuestionType::Percentage,
            NumberHandler {
                unit: NumberUnit::Percent,
            },
        );
        registry.register(QuestionType::Date, DateHandler);
        registry.register(QuestionType::Time, TimeHandler);
        registry.register(QuestionType::YesNo, YesNoHandler);
        registry.register(QuestionType::Boolean, YesNoHandler);
        registry.register(QuestionType::FileUpload, FileHandler { images_only: false });
        registry.register(QuestionType::ImageUpload, FileHandler { images_only: true });
        registry.register(QuestionType::ContactFollowup, ContactHandler);

        registry
    }

    /// Register or override the handler for a question type.
    pub fn register(&mut self, ty: QuestionType, handler: impl QuestionHandler + 'static) {
        self.handlers.insert(ty, Box::new(handler));
    }

    /// Resolve the handler for a type, falling back to the unsupported
    /// placeholder for anything unregistered.
    pub fn handler(&self, ty: &QuestionType) -> &dyn QuestionHandler {
        match self.handlers.get(ty) {
            Some(handler) => handler.as_ref(),
            None => self.fallback.as_ref(),
        }
    }

    /// Describe the widget for a question against the current answers.
    pub fn render(&self, question: &Question, answers: &Answers) -> Widget {
        self.handler(&question.question_type)
            .render(question, answers)
    }

    /// Coerce raw UI input for a question into its typed value.
    pub fn coerce(
        &self,
        question: &Question,
        input: RawInput,
    ) -> Result<AnswerValue, AnswerError> {
        self.handler(&question.question_type).coerce(question, input)
    }

    /// Whether a question counts as answered.
    pub fn answered(&self, question: &Question, answers: &Answers) -> bool {
        self.handler(&question.question_type)
            .answered(question, answers)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(ty: QuestionType) -> Question {
        Question::new(10, ty, "q")
    }

    #[test]
    fn numeric_types_coerce_text_to_numbers() {
        let registry = HandlerRegistry::standard();
        for ty in [
            QuestionType::Slider,
            QuestionType::Number,
            QuestionType::Percentage,
            QuestionType::Currency,
            QuestionType::StarRating,
        ] {
            let value = registry
                .coerce(&question(ty), RawInput::from("42"))
                .unwrap();
            assert_eq!(value, AnswerValue::Number(42.0));
        }

        let err = registry
            .coerce(&question(QuestionType::Number), RawInput::from("forty"))
            .unwrap_err();
        assert!(matches!(err, AnswerError::InvalidNumber(_)));
    }

    #[test]
    fn presence_rules_per_type() {
        let registry = HandlerRegistry::standard();
        let mut answers = Answers::new();

        let text = question(QuestionType::Text);
        assert!(!registry.answered(&text, &answers));
        answers.insert(10, "");
        assert!(!registry.answered(&text, &answers));
        answers.insert(10, "hi");
        assert!(registry.answered(&text, &answers));

        let boxes = question(QuestionType::Checkbox);
        answers.insert(10, Vec::<String>::new());
        assert!(!registry.answered(&boxes, &answers));
        answers.insert(10, vec!["a".to_string()]);
        assert!(registry.answered(&boxes, &answers));

        let stars = question(QuestionType::StarRating);
        answers.insert(10, 0.0);
        assert!(registry.answered(&stars, &answers));
    }

    #[test]
    fn contact_followup_is_answered_by_either_part() {
        let registry = HandlerRegistry::standard();
        let contact = question(QuestionType::ContactFollowup);
        let mut answers = Answers::new();

        assert!(!registry.answered(&contact, &answers));

        answers.insert(AnswerKey::Phone(10), "0241234567");
        assert!(registry.answered(&contact, &answers));

        answers.remove(&AnswerKey::Phone(10));
        answers.insert(AnswerKey::Comments(10), "call me");
        assert!(registry.answered(&contact, &answers));
    }

    #[test]
    fn unknown_types_render_placeholder_and_never_block() {
        let registry = HandlerRegistry::standard();
        let exotic = question(QuestionType::Unsupported("hologram".to_string()));
        let answers = Answers::new();

        assert_eq!(
            registry.render(&exotic, &answers),
            Widget::Unsupported {
                type_name: "hologram".to_string()
            }
        );
        assert!(registry.answered(&exotic, &answers));
    }

    #[test]
    fn render_round_trips_stored_value() {
        let registry = HandlerRegistry::standard();
        let slider = question(QuestionType::Slider);
        let mut answers = Answers::new();

        let coerced = registry.coerce(&slider, RawInput::from("30")).unwrap();
        answers.insert(10, coerced);

        match registry.render(&slider, &answers) {
            Widget::Slider { value, .. } => assert_eq!(value, 30.0),
            other => panic!("unexpected widget: {other:?}"),
        }
    }
}
