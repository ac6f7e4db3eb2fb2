use std::collections::HashMap;
use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{AnswerError, QuestionId};

/// A key in the answer map.
///
/// Keys are either bare question ids or the compound `<id>_comments` /
/// `<id>_phone` pair used by contact follow-up questions. No other shapes
/// exist in an answer map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AnswerKey {
    /// The answer to a plain question.
    Question(QuestionId),

    /// The free-text half of a contact follow-up question.
    Comments(QuestionId),

    /// The phone half of a contact follow-up question.
    Phone(QuestionId),
}

impl AnswerKey {
    /// The id of the question this key belongs to.
    pub fn question_id(&self) -> QuestionId {
        match self {
            Self::Question(id) | Self::Comments(id) | Self::Phone(id) => *id,
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question(id) => write!(f, "{id}"),
            Self::Comments(id) => write!(f, "{id}_comments"),
            Self::Phone(id) => write!(f, "{id}_phone"),
        }
    }
}

impl From<QuestionId> for AnswerKey {
    fn from(id: QuestionId) -> Self {
        Self::Question(id)
    }
}

impl From<AnswerKey> for String {
    fn from(key: AnswerKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for AnswerKey {
    type Error = AnswerError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl std::str::FromStr for AnswerKey {
    type Err = AnswerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (id_part, build): (&str, fn(QuestionId) -> Self) =
            if let Some(prefix) = raw.strip_suffix("_comments") {
                (prefix, Self::Comments)
            } else if let Some(prefix) = raw.strip_suffix("_phone") {
                (prefix, Self::Phone)
            } else {
                (raw, Self::Question)
            };

        id_part
            .parse::<QuestionId>()
            .map(build)
            .map_err(|_| AnswerError::InvalidKey(raw.to_string()))
    }
}

/// The typed value stored for one answer key.
///
/// The wire representation is untagged: plain JSON scalars, a string array
/// for checkbox selections, or an object array for file attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Yes/no and boolean questions.
    Bool(bool),

    /// Numeric, rating, and scale questions.
    Number(f64),

    /// Text-like questions (text, email, date, ...).
    Text(String),

    /// Checkbox selections, by option value.
    Selections(Vec<String>),

    /// Decoded uploads for file-bearing questions.
    Files(Vec<FileAttachment>),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_selections(&self) -> Option<&[String]> {
        match self {
            Self::Selections(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_files(&self) -> Option<&[FileAttachment]> {
        match self {
            Self::Files(files) => Some(files),
            _ => None,
        }
    }

    /// Get the variant name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Number(_) => "Number",
            Self::Text(_) => "Text",
            Self::Selections(_) => "Selections",
            Self::Files(_) => "Files",
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(values: Vec<String>) -> Self {
        Self::Selections(values)
    }
}

impl From<Vec<FileAttachment>> for AnswerValue {
    fn from(files: Vec<FileAttachment>) -> Self {
        Self::Files(files)
    }
}

/// A decoded upload: name, MIME type, byte size, and base64 payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub name: String,

    #[serde(rename = "type")]
    pub content_type: String,

    /// Size of the decoded payload in bytes.
    pub size: u64,

    /// Base64-encoded payload.
    pub data: String,
}

impl FileAttachment {
    /// Build an attachment from raw bytes, base64-encoding the payload.
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: bytes.len() as u64,
            data: BASE64.encode(bytes),
        }
    }

    /// Build an attachment by draining an async reader.
    ///
    /// File decode completes after an arbitrary delay; callers store the
    /// result under the question's key whenever it arrives, and the last
    /// write for a key wins.
    pub async fn read<R>(
        name: impl Into<String>,
        content_type: impl Into<String>,
        mut reader: R,
    ) -> std::io::Result<Self>
    where
        R: AsyncRead + Unpin,
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        Ok(Self::from_bytes(name, content_type, &bytes))
    }

    /// Decode the base64 payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, AnswerError> {
        BASE64
            .decode(&self.data)
            .map_err(|_| AnswerError::InvalidPayload(self.name.clone()))
    }
}

/// The in-progress answer set of one respondent.
///
/// Insertion order is irrelevant; submission ordering follows the survey's
/// question order, not this map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answers {
    values: HashMap<AnswerKey, AnswerValue>,
}

impl Answers {
    /// Create an empty answer set.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Insert a value at the given key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<AnswerKey>, value: impl Into<AnswerValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &AnswerKey) -> Option<&AnswerValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &AnswerKey) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &AnswerKey) -> Option<AnswerValue> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnswerKey, &AnswerValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Toggle a checkbox selection in place.
    ///
    /// Adds the option value if absent, removes it if present; an empty
    /// selection list stays in the map as an explicit "nothing picked".
    /// Toggling the same value twice restores the previous content.
    pub fn toggle_selection(&mut self, key: impl Into<AnswerKey>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        let mut selections = match self.values.remove(&key) {
            Some(AnswerValue::Selections(values)) => values,
            // A non-list value under this key is discarded; the toggle owns the key now.
            _ => Vec::new(),
        };

        if let Some(pos) = selections.iter().position(|v| v == &value) {
            selections.remove(pos);
        } else {
            selections.push(value);
        }

        self.values.insert(key, AnswerValue::Selections(selections));
    }

    // === Convenience accessors ===

    /// Get a text value at the given key.
    pub fn get_text(&self, key: &AnswerKey) -> Result<&str, AnswerError> {
        match self.get(key) {
            Some(AnswerValue::Text(s)) => Ok(s),
            Some(other) => Err(AnswerError::TypeMismatch {
                key: key.clone(),
                expected: "Text",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingKey(key.clone())),
        }
    }

    /// Get a numeric value at the given key.
    pub fn get_number(&self, key: &AnswerKey) -> Result<f64, AnswerError> {
        match self.get(key) {
            Some(AnswerValue::Number(n)) => Ok(*n),
            Some(other) => Err(AnswerError::TypeMismatch {
                key: key.clone(),
                expected: "Number",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingKey(key.clone())),
        }
    }

    /// Get a boolean value at the given key.
    pub fn get_bool(&self, key: &AnswerKey) -> Result<bool, AnswerError> {
        match self.get(key) {
            Some(AnswerValue::Bool(b)) => Ok(*b),
            Some(other) => Err(AnswerError::TypeMismatch {
                key: key.clone(),
                expected: "Bool",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingKey(key.clone())),
        }
    }

    /// Get checkbox selections at the given key.
    pub fn get_selections(&self, key: &AnswerKey) -> Result<&[String], AnswerError> {
        match self.get(key) {
            Some(AnswerValue::Selections(values)) => Ok(values),
            Some(other) => Err(AnswerError::TypeMismatch {
                key: key.clone(),
                expected: "Selections",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingKey(key.clone())),
        }
    }

    /// Get file attachments at the given key.
    pub fn get_files(&self, key: &AnswerKey) -> Result<&[FileAttachment], AnswerError> {
        match self.get(key) {
            Some(AnswerValue::Files(files)) => Ok(files),
            Some(other) => Err(AnswerError::TypeMismatch {
                key: key.clone(),
                expected: "Files",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingKey(key.clone())),
        }
    }
}

impl IntoIterator for Answers {
    type Item = (AnswerKey, AnswerValue);
    type IntoIter = std::collections::hash_map::IntoIter<AnswerKey, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a AnswerKey, &'a AnswerValue);
    type IntoIter = std::collections::hash_map::Iter<'a, AnswerKey, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_and_parse() {
        for key in [
            AnswerKey::Question(10),
            AnswerKey::Comments(10),
            AnswerKey::Phone(10),
        ] {
            let parsed: AnswerKey = key.to_string().parse().unwrap();
            assert_eq!(parsed, key);
        }

        assert!("ten".parse::<AnswerKey>().is_err());
        assert!("_comments".parse::<AnswerKey>().is_err());
    }

    #[test]
    fn value_wire_shapes_are_untagged() {
        let value: AnswerValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(value, AnswerValue::Text("hello".to_string()));

        let value: AnswerValue = serde_json::from_str("4").unwrap();
        assert_eq!(value, AnswerValue::Number(4.0));

        let value: AnswerValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(
            value,
            AnswerValue::Selections(vec!["a".to_string(), "b".to_string()])
        );

        let value: AnswerValue = serde_json::from_value(serde_json::json!([
            {"name": "cv.pdf", "type": "application/pdf", "size": 3, "data": "AAECAw=="}
        ]))
        .unwrap();
        assert!(matches!(value, AnswerValue::Files(ref files) if files.len() == 1));
    }

    #[test]
    fn insert_and_typed_get() {
        let mut answers = Answers::new();
        answers.insert(10, "hello");
        answers.insert(11, 4.0);

        assert_eq!(answers.get_text(&AnswerKey::Question(10)).unwrap(), "hello");
        assert_eq!(answers.get_number(&AnswerKey::Question(11)).unwrap(), 4.0);

        let err = answers.get_number(&AnswerKey::Question(10)).unwrap_err();
        assert!(matches!(err, AnswerError::TypeMismatch { .. }));
    }

    #[test]
    fn double_toggle_restores_selections() {
        let mut answers = Answers::new();
        answers.insert(5, vec!["a".to_string()]);

        answers.toggle_selection(5, "b");
        answers.toggle_selection(5, "b");

        let selections = answers.get_selections(&AnswerKey::Question(5)).unwrap();
        assert_eq!(selections, &["a".to_string()]);
    }

    #[test]
    fn toggle_starts_from_empty() {
        let mut answers = Answers::new();
        answers.toggle_selection(5, "a");
        assert_eq!(
            answers.get_selections(&AnswerKey::Question(5)).unwrap(),
            &["a".to_string()]
        );
    }

    #[test]
    fn attachment_round_trips_bytes() {
        let attachment = FileAttachment::from_bytes("cv.pdf", "application/pdf", &[0, 1, 2, 3]);
        assert_eq!(attachment.size, 4);
        assert_eq!(attachment.decode().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn attachment_reads_async_sources() {
        let bytes: &[u8] = b"portrait";
        let attachment = FileAttachment::read("me.png", "image/png", bytes)
            .await
            .unwrap();
        assert_eq!(attachment.size, 8);
        assert_eq!(attachment.decode().unwrap(), b"portrait");
    }
}
