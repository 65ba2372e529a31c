pub mod catalog;
pub mod text_cleanup;

use std::collections::BTreeMap;

pub use catalog::{CatalogIndex, CatalogItem, Category, ConfigDocument, WordList};

#[derive(
    Copy,
    Clone,
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    tsify::Tsify,
    schemars::JsonSchema,
    parse_display::Display,
    parse_display::FromStr,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "lowercase")]
#[display(style = "lowercase")]
pub enum ModeType {
    /// Flip-card study without grading.
    Review,
    /// Typed answers, graded after normalization.
    Quiz,
    /// Multiple choice with generated distractors.
    Mcq,
}

/// What the presentation layer needs to show for a given mode.
#[derive(
    Copy, Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub shows_text_input: bool,
    pub shows_options: bool,
    pub supports_exam: bool,
    pub requires_answer_field: bool,
}

impl ModeType {
    pub fn capabilities(&self) -> Capabilities {
        match self {
            ModeType::Review => Capabilities {
                shows_text_input: false,
                shows_options: false,
                supports_exam: false,
                requires_answer_field: false,
            },
            ModeType::Quiz => Capabilities {
                shows_text_input: true,
                shows_options: false,
                supports_exam: true,
                requires_answer_field: true,
            },
            ModeType::Mcq => Capabilities {
                shows_text_input: false,
                shows_options: true,
                supports_exam: true,
                requires_answer_field: true,
            },
        }
    }
}

#[derive(
    Clone,
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Eq,
    PartialEq,
    tsify::Tsify,
    schemars::JsonSchema,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
}

#[derive(
    Clone,
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Eq,
    PartialEq,
    tsify::Tsify,
    schemars::JsonSchema,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct ModeConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub mode_type: ModeType,
    #[serde(rename = "name")]
    pub display_name: String,
    // modes are only offered when the catalog turns them on explicitly
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "q_field", default)]
    pub question_field: String,
    #[serde(rename = "a_field", default, skip_serializing_if = "Option::is_none")]
    pub answer_field: Option<String>,
    #[serde(default)]
    pub back_fields: Vec<FieldSpec>,
}

impl ModeConfig {
    /// The answer field, treating an empty string the same as a missing one.
    pub fn answer_field(&self) -> Option<&str> {
        self.answer_field
            .as_deref()
            .map(str::trim)
            .filter(|field| !field.is_empty())
    }

    pub fn capabilities(&self) -> Capabilities {
        self.mode_type.capabilities()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.question_field.trim().is_empty() {
            return Err(ConfigError::MissingQuestionField(self.id.clone()));
        }
        if self.capabilities().requires_answer_field && self.answer_field().is_none() {
            return Err(ConfigError::MissingAnswerField {
                mode_id: self.id.clone(),
                mode_type: self.mode_type,
            });
        }
        Ok(())
    }
}

/// One vocabulary entry. Field names vary from list to list.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(
    from = "BTreeMap<String, serde_json::Value>",
    into = "BTreeMap<String, String>"
)]
pub struct VocabRecord {
    fields: BTreeMap<String, String>,
}

impl VocabRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, or an empty string when the record lacks it.
    pub fn display(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, serde_json::Value>> for VocabRecord {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let fields = raw
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key, text_cleanup::value_to_text(&value)))
            .collect();
        Self { fields }
    }
}

impl From<VocabRecord> for BTreeMap<String, String> {
    fn from(record: VocabRecord) -> Self {
        record.fields
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VocabRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Parses a word list file: a JSON array of flat objects.
pub fn parse_word_list(json: &str) -> Result<Vec<VocabRecord>, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// How many questions an exam should ask.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, parse_display::Display, parse_display::FromStr,
)]
pub enum QuestionCount {
    #[display("all")]
    All,
    #[display("{0}")]
    Count(usize),
}

impl QuestionCount {
    /// Parses the exam size picker value (`"all"`, a preset number, or custom input).
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        match trimmed.parse::<QuestionCount>() {
            Ok(QuestionCount::Count(0)) | Err(_) => {
                Err(ConfigError::InvalidQuestionCount(raw.to_string()))
            }
            Ok(count) => Ok(count),
        }
    }

    /// The requested number of questions for a deck of `deck_size` records, before clamping.
    pub fn requested(&self, deck_size: usize) -> usize {
        match self {
            QuestionCount::All => deck_size,
            QuestionCount::Count(count) => *count,
        }
    }
}

/// What the navigation layer hands over when the user starts studying.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct LaunchParams {
    /// One or more list ids; their words are merged in this order.
    pub list_ids: Vec<String>,
    pub mode_id: String,
    #[serde(default)]
    pub exam: bool,
    /// `"all"`, a number, or whatever the user typed into the custom box.
    #[serde(default)]
    pub question_count: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No word list was selected")]
    NoListSelected,

    #[error("Unknown word list: {0}")]
    UnknownList(String),

    #[error("List {list_id} has no mode {mode_id}")]
    UnknownMode { list_id: String, mode_id: String },

    #[error("Mode {mode_id} of list {list_id} is disabled")]
    ModeDisabled { list_id: String, mode_id: String },

    #[error("Mode {0} does not name a question field")]
    MissingQuestionField(String),

    #[error("{mode_type} mode {mode_id} does not name an answer field")]
    MissingAnswerField { mode_id: String, mode_type: ModeType },

    #[error("Catalog id {0} is used more than once")]
    DuplicateId(String),

    #[error("Invalid exam question count: {0:?}")]
    InvalidQuestionCount(String),

    #[error("Malformed document")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(mode_type: ModeType, answer_field: Option<&str>) -> ModeConfig {
        ModeConfig {
            id: "m".to_string(),
            mode_type,
            display_name: "Mode".to_string(),
            enabled: true,
            question_field: "kanji".to_string(),
            answer_field: answer_field.map(str::to_string),
            back_fields: Vec::new(),
        }
    }

    #[test]
    fn review_never_supports_exam() {
        assert!(!ModeType::Review.capabilities().supports_exam);
        assert!(ModeType::Quiz.capabilities().supports_exam);
        assert!(ModeType::Mcq.capabilities().supports_exam);
        assert!(ModeType::Quiz.capabilities().shows_text_input);
        assert!(ModeType::Mcq.capabilities().shows_options);
    }

    #[test]
    fn mode_type_round_trips_through_text() {
        assert_eq!("mcq".parse::<ModeType>().unwrap(), ModeType::Mcq);
        assert_eq!(ModeType::Review.to_string(), "review");
        assert!("Quiz".parse::<ModeType>().is_err());
    }

    #[test]
    fn scored_modes_need_an_answer_field() {
        assert!(mode(ModeType::Review, None).validate().is_ok());
        assert!(mode(ModeType::Quiz, Some("hiragana")).validate().is_ok());
        assert!(matches!(
            mode(ModeType::Quiz, None).validate(),
            Err(ConfigError::MissingAnswerField { .. })
        ));
        assert!(matches!(
            mode(ModeType::Mcq, Some("  ")).validate(),
            Err(ConfigError::MissingAnswerField { .. })
        ));

        let mut no_question = mode(ModeType::Review, None);
        no_question.question_field = String::new();
        assert!(matches!(
            no_question.validate(),
            Err(ConfigError::MissingQuestionField(_))
        ));
    }

    #[test]
    fn mode_config_reads_catalog_field_names() {
        let json = r#"{
            "id": "kana-quiz",
            "type": "quiz",
            "name": "Kana quiz",
            "enabled": true,
            "q_field": "kanji",
            "a_field": "hiragana",
            "back_fields": [{"key": "hiragana", "label": "Reading"}, {"key": "definition", "label": "Meaning"}]
        }"#;
        let mode: ModeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(mode.mode_type, ModeType::Quiz);
        assert_eq!(mode.answer_field(), Some("hiragana"));
        assert_eq!(mode.back_fields[1].label, "Meaning");
    }

    #[test]
    fn modes_are_disabled_unless_enabled() {
        let mode: ModeConfig =
            serde_json::from_str(r#"{"id": "r", "type": "review", "name": "Review", "q_field": "kanji"}"#)
                .unwrap();
        assert!(!mode.enabled);
    }

    #[test]
    fn records_coerce_values_to_text() {
        let records =
            parse_word_list(r#"[{"kanji": "猫", "pitch": 1, "common": true, "note": null}]"#)
                .unwrap();
        assert_eq!(records[0].get("kanji"), Some("猫"));
        assert_eq!(records[0].get("pitch"), Some("1"));
        assert_eq!(records[0].get("common"), Some("true"));
        assert_eq!(records[0].get("note"), None);
        assert_eq!(records[0].display("missing"), "");
    }

    #[test]
    fn question_count_accepts_all_and_positive_numbers() {
        assert_eq!(QuestionCount::parse("all").unwrap(), QuestionCount::All);
        assert_eq!(QuestionCount::parse(" 20 ").unwrap(), QuestionCount::Count(20));
        assert!(QuestionCount::parse("0").is_err());
        assert!(QuestionCount::parse("ten").is_err());
        assert!(QuestionCount::parse("-3").is_err());
        assert_eq!(QuestionCount::All.requested(12), 12);
        assert_eq!(QuestionCount::Count(50).requested(12), 50);
    }
}
