use quiz_utils::{FieldSpec, ModeConfig, ModeType, VocabRecord};

use crate::SetupError;

/// The records studied in one session, together with the fields the active mode reads.
#[derive(Clone, Debug)]
pub struct Deck {
    records: Vec<VocabRecord>,
    question_field: String,
    answer_field: Option<String>,
    back_fields: Vec<FieldSpec>,
    mode_type: ModeType,
}

/// One line on the back of a card.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, tsify::Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct BackField {
    pub label: String,
    pub value: String,
    pub is_answer: bool,
}

impl Deck {
    pub fn new(records: Vec<VocabRecord>, mode: &ModeConfig) -> Result<Self, SetupError> {
        mode.validate()?;
        if records.is_empty() {
            return Err(SetupError::EmptyDeck {
                mode_id: mode.id.clone(),
            });
        }
        Ok(Self {
            records,
            question_field: mode.question_field.trim().to_string(),
            answer_field: mode.answer_field().map(str::to_string),
            back_fields: mode.back_fields.clone(),
            mode_type: mode.mode_type,
        })
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn record_at(&self, index: usize) -> Option<&VocabRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[VocabRecord] {
        &self.records
    }

    pub fn mode_type(&self) -> ModeType {
        self.mode_type
    }

    pub fn question_text<'a>(&self, record: &'a VocabRecord) -> &'a str {
        record.display(&self.question_field)
    }

    /// The raw answer field. May hold several accepted answers separated by `/`.
    pub fn answer_text<'a>(&self, record: &'a VocabRecord) -> &'a str {
        match &self.answer_field {
            Some(field) => record.display(field),
            None => "",
        }
    }

    pub fn back_field_values(&self, record: &VocabRecord) -> Vec<BackField> {
        self.back_fields
            .iter()
            .filter_map(|field| {
                let value = record.get(&field.key)?;
                if value.is_empty() {
                    return None;
                }
                Some(BackField {
                    label: field.label.clone(),
                    value: value.to_string(),
                    is_answer: self.answer_field.as_deref() == Some(field.key.as_str()),
                })
            })
            .collect()
    }

    /// The label of the answer field on the back of the card, used to prompt for input.
    pub fn answer_label(&self) -> Option<&str> {
        let answer_field = self.answer_field.as_deref()?;
        self.back_fields
            .iter()
            .find(|field| field.key == answer_field)
            .map(|field| field.label.as_str())
    }

    /// Names of fields the mode reads that `record` lacks.
    pub fn missing_fields(&self, record: &VocabRecord) -> Vec<String> {
        std::iter::once(self.question_field.as_str())
            .chain(self.answer_field.as_deref())
            .filter(|field| record.get(field).is_none_or(str::is_empty))
            .map(str::to_string)
            .collect()
    }
}
