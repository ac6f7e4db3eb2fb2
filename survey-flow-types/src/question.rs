use serde::{Deserialize, Serialize};

/// Identifier of a question, unique within its survey.
pub type QuestionId = u64;

/// A single question in a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique id within the survey.
    pub id: QuestionId,

    /// The kind of input this question collects.
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    /// The prompt text shown to the respondent.
    pub title: String,

    /// Optional helper text shown under the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unanswered required questions block submission.
    #[serde(default)]
    pub required: bool,

    /// Ordered choices for choice-based types. Values are unique per question.
    #[serde(default)]
    pub options: Vec<QuestionOption>,

    /// Type-specific configuration.
    #[serde(default)]
    pub settings: QuestionSettings,
}

impl Question {
    /// Create a new question with empty options and default settings.
    pub fn new(id: QuestionId, question_type: QuestionType, title: impl Into<String>) -> Self {
        Self {
            id,
            question_type,
            title: title.into(),
            description: None,
            required: false,
            options: Vec::new(),
            settings: QuestionSettings::default(),
        }
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the ordered choices.
    pub fn with_options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = options;
        self
    }

    /// Set the type-specific configuration.
    pub fn with_settings(mut self, settings: QuestionSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// The fixed enumeration of question types.
///
/// Unknown wire strings are carried as `Unsupported` so a survey with a type
/// this version does not know about still loads; such questions render a
/// placeholder and never block submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    Text,
    Textarea,
    MultipleChoice,
    Checkbox,
    EmojiScale,
    LikertScale,
    StarRating,
    ThumbsRating,
    Slider,
    Number,
    Date,
    Time,
    Currency,
    Percentage,
    Email,
    Phone,
    Address,
    FileUpload,
    ImageUpload,
    YesNo,
    Boolean,
    ContactFollowup,
    /// A type string this version does not recognize.
    Unsupported(String),
}

impl QuestionType {
    /// The wire name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::MultipleChoice => "multiple_choice",
            Self::Checkbox => "checkbox",
            Self::EmojiScale => "emoji_scale",
            Self::LikertScale => "likert_scale",
            Self::StarRating => "star_rating",
            Self::ThumbsRating => "thumbs_rating",
            Self::Slider => "slider",
            Self::Number => "number",
            Self::Date => "date",
            Self::Time => "time",
            Self::Currency => "currency",
            Self::Percentage => "percentage",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::FileUpload => "file_upload",
            Self::ImageUpload => "image_upload",
            Self::YesNo => "yes_no",
            Self::Boolean => "boolean",
            Self::ContactFollowup => "contact_followup",
            Self::Unsupported(raw) => raw,
        }
    }

    /// Choice-based types carry their scale or choices in `options`.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            Self::MultipleChoice | Self::Checkbox | Self::EmojiScale | Self::LikertScale
        )
    }

    /// Types whose answers are numeric and must be coerced before storage.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Slider
                | Self::Number
                | Self::Currency
                | Self::Percentage
                | Self::StarRating
                | Self::EmojiScale
                | Self::LikertScale
        )
    }

    /// Types whose answers are file attachments.
    pub fn is_file_bearing(&self) -> bool {
        matches!(self, Self::FileUpload | Self::ImageUpload)
    }
}

impl From<String> for QuestionType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "text" => Self::Text,
            "textarea" => Self::Textarea,
            "multiple_choice" => Self::MultipleChoice,
            "checkbox" => Self::Checkbox,
            "emoji_scale" => Self::EmojiScale,
            "likert_scale" => Self::LikertScale,
            "star_rating" => Self::StarRating,
            "thumbs_rating" => Self::ThumbsRating,
            "slider" => Self::Slider,
            "number" => Self::Number,
            "date" => Self::Date,
            "time" => Self::Time,
            "currency" => Self::Currency,
            "percentage" => Self::Percentage,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "address" => Self::Address,
            "file_upload" => Self::FileUpload,
            "image_upload" => Self::ImageUpload,
            "yes_no" => Self::YesNo,
            "boolean" => Self::Boolean,
            "contact_followup" => Self::ContactFollowup,
            _ => Self::Unsupported(raw),
        }
    }
}

impl From<QuestionType> for String {
    fn from(ty: QuestionType) -> Self {
        ty.as_str().to_string()
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One choice in a choice-based question.
///
/// The wire format accepts either `{"value": "...", "label": "..."}` objects
/// or bare strings; a bare string becomes both value and label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OptionRepr")]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
}

impl QuestionOption {
    /// Create an option with distinct value and label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Create an option whose value and label are the same string.
    pub fn bare(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: text,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OptionRepr {
    Full { value: String, label: String },
    Bare(String),
}

impl From<OptionRepr> for QuestionOption {
    fn from(repr: OptionRepr) -> Self {
        match repr {
            OptionRepr::Full { value, label } => Self { value, label },
            OptionRepr::Bare(text) => Self::bare(text),
        }
    }
}

/// Type-specific question configuration.
///
/// All keys are optional on the wire; accessors apply the per-type defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_files: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size_mb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_placeholder: Option<String>,
}

impl QuestionSettings {
    pub fn placeholder(&self) -> &str {
        self.placeholder.as_deref().unwrap_or("Enter your answer...")
    }

    /// Textarea row count. Default 4.
    pub fn rows(&self) -> u32 {
        self.rows.unwrap_or(4)
    }

    /// Slider lower bound. Default 0.
    pub fn slider_min(&self) -> f64 {
        self.min.unwrap_or(0.0)
    }

    /// Slider upper bound. Default 100.
    pub fn slider_max(&self) -> f64 {
        self.max.unwrap_or(100.0)
    }

    /// Numeric step. Default 1.
    pub fn step(&self) -> f64 {
        self.step.unwrap_or(1.0)
    }

    pub fn left_label(&self) -> &str {
        self.left_label.as_deref().unwrap_or("Low")
    }

    pub fn right_label(&self) -> &str {
        self.right_label.as_deref().unwrap_or("High")
    }

    pub fn show_value(&self) -> bool {
        self.show_value.unwrap_or(false)
    }

    /// Number of stars in a star rating. Default 5.
    pub fn max_rating(&self) -> u8 {
        self.max_rating.unwrap_or(5)
    }

    /// ISO currency code for currency questions. Default "USD".
    pub fn currency_code(&self) -> &str {
        self.currency_code.as_deref().unwrap_or("USD")
    }

    /// Accepted MIME patterns for upload questions.
    pub fn allowed_types(&self) -> &[String] {
        self.allowed_types.as_deref().unwrap_or(&[])
    }

    /// Maximum number of attachments. Default 1.
    pub fn max_files(&self) -> u32 {
        self.max_files.unwrap_or(1)
    }

    /// Maximum attachment size in megabytes. Default 10.
    pub fn max_size_mb(&self) -> u32 {
        self.max_size_mb.unwrap_or(10)
    }

    /// Dialing prefix shown next to the follow-up phone field. Default "+233".
    pub fn country_code(&self) -> &str {
        self.country_code.as_deref().unwrap_or("+233")
    }

    pub fn comments_placeholder(&self) -> &str {
        self.comments_placeholder.as_deref().unwrap_or(
            "We would love to hear from you, please provide your comments. (Optional)",
        )
    }

    pub fn phone_placeholder(&self) -> &str {
        self.phone_placeholder.as_deref().unwrap_or("Phone number")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_round_trips_through_wire_name() {
        let ty: QuestionType = "multiple_choice".to_string().into();
        assert_eq!(ty, QuestionType::MultipleChoice);
        assert_eq!(ty.as_str(), "multiple_choice");
    }

    #[test]
    fn unknown_type_is_carried_not_rejected() {
        let question: Question = serde_json::from_value(serde_json::json!({
            "id": 7,
            "type": "hologram",
            "title": "Beam it"
        }))
        .unwrap();

        assert_eq!(
            question.question_type,
            QuestionType::Unsupported("hologram".to_string())
        );
    }

    #[test]
    fn bare_string_options_are_accepted() {
        let question: Question = serde_json::from_value(serde_json::json!({
            "id": 1,
            "type": "checkbox",
            "title": "Pick",
            "options": ["red", {"value": "b", "label": "Blue"}]
        }))
        .unwrap();

        assert_eq!(question.options[0], QuestionOption::bare("red"));
        assert_eq!(question.options[1], QuestionOption::new("b", "Blue"));
    }

    #[test]
    fn settings_defaults() {
        let settings = QuestionSettings::default();
        assert_eq!(settings.slider_min(), 0.0);
        assert_eq!(settings.slider_max(), 100.0);
        assert_eq!(settings.step(), 1.0);
        assert_eq!(settings.max_rating(), 5);
        assert_eq!(settings.currency_code(), "USD");
        assert_eq!(settings.max_files(), 1);
        assert_eq!(settings.country_code(), "+233");
    }

    #[test]
    fn settings_accept_camel_case_keys() {
        let settings: QuestionSettings = serde_json::from_value(serde_json::json!({
            "maxRating": 10,
            "leftLabel": "Meh",
            "showValue": true
        }))
        .unwrap();

        assert_eq!(settings.max_rating(), 10);
        assert_eq!(settings.left_label(), "Meh");
        assert!(settings.show_value());
    }
}
