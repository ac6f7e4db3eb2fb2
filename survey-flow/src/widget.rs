use survey_flow_types::{FileAttachment, QuestionOption};

/// Declarative description of the input widget for one question.
///
/// Hosts (web view, TUI, native form) translate these into concrete
/// controls. A widget shows the stored value; interaction flows back into
/// the session as [`RawInput`] through `answer` / `toggle_selection`.
/// Widgets know nothing about navigation or validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Free text, single or multi line.
    TextEntry {
        placeholder: String,
        multiline: bool,
        rows: u32,
        value: String,
    },

    /// Plain numeric entry, optionally annotated with a unit such as a
    /// currency code or a percent sign.
    NumberEntry {
        min: Option<f64>,
        max: Option<f64>,
        step: f64,
        unit: Option<String>,
        value: Option<f64>,
    },

    /// Radio group or checkbox group over the question's options.
    ChoiceList {
        options: Vec<QuestionOption>,
        selected: Vec<String>,
        multiple: bool,
    },

    /// Emoji or likert scale; selection is the numeric option value.
    Scale {
        options: Vec<QuestionOption>,
        selected: Option<f64>,
    },

    /// Row of stars.
    StarRow { count: u8, value: Option<u8> },

    /// Thumbs up / thumbs down.
    ThumbsPair { up: Option<bool> },

    /// Range slider.
    Slider {
        min: f64,
        max: f64,
        step: f64,
        left_label: String,
        right_label: String,
        show_value: bool,
        value: f64,
    },

    /// Calendar date picker.
    DateEntry { value: String },

    /// Time-of-day picker.
    TimeEntry { value: String },

    /// Yes/no pair.
    YesNo { value: Option<bool> },

    /// File drop zone with the already-decoded attachments.
    FileDrop {
        allowed_types: Vec<String>,
        max_files: u32,
        max_size_mb: u32,
        images_only: bool,
        files: Vec<FileAttachment>,
    },

    /// Compound comments + phone pair for contact follow-up questions.
    ContactFollowup {
        comments: String,
        comments_placeholder: String,
        phone: String,
        phone_placeholder: String,
        country_code: String,
    },

    /// Neutral placeholder for unrecognized question types.
    Unsupported { type_name: String },
}

/// Raw interaction input before per-type coercion.
///
/// Text carries whatever the control produced (numeric types parse it),
/// Toggle carries boolean controls, Files carries decoded attachments from
/// upload widgets. Decode is asynchronous on the host side, so a `Files`
/// input may arrive long after the widget was rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Text(String),
    Toggle(bool),
    Files(Vec<FileAttachment>),
}

impl From<&str> for RawInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for RawInput {
    fn from(b: bool) -> Self {
        Self::Toggle(b)
    }
}

impl From<Vec<FileAttachment>> for RawInput {
    fn from(files: Vec<FileAttachment>) -> Self {
        Self::Files(files)
    }
}
