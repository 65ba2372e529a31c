use quiz_utils::{CatalogIndex, ConfigError, LaunchParams, ModeConfig, QuestionCount, VocabRecord};

use crate::SetupError;
use crate::deck::Deck;
use crate::session::Session;

/// Everything needed to load and start a session, resolved from the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionPlan {
    /// The mode as configured on the first selected list.
    pub mode: ModeConfig,
    pub list_ids: Vec<String>,
    /// Word files to fetch, in the order their records are merged.
    pub word_files: Vec<String>,
    pub exam: Option<QuestionCount>,
}

/// Checks the launch parameters against the catalog.
pub fn resolve_session(
    index: &CatalogIndex,
    params: &LaunchParams,
) -> Result<SessionPlan, ConfigError> {
    let Some(first) = params.list_ids.first() else {
        return Err(ConfigError::NoListSelected);
    };
    let mode = index.mode(first, &params.mode_id)?.clone();
    mode.validate()?;

    let word_files = params
        .list_ids
        .iter()
        .map(|list_id| index.list(list_id).map(|indexed| indexed.list.word_file()))
        .collect::<Result<Vec<_>, _>>()?;

    let exam = if !params.exam {
        None
    } else if !mode.capabilities().supports_exam {
        log::info!(
            "Ignoring exam request for {} mode {}",
            mode.mode_type,
            mode.id
        );
        None
    } else {
        let raw = params.question_count.as_deref().unwrap_or("all");
        Some(QuestionCount::parse(raw)?)
    };

    Ok(SessionPlan {
        mode,
        list_ids: params.list_ids.clone(),
        word_files,
        exam,
    })
}

impl SessionPlan {
    /// Merges the loaded lists, in plan order, and starts the session.
    pub fn build_session(
        &self,
        records_per_list: Vec<Vec<VocabRecord>>,
        seed: u64,
    ) -> Result<Session, SetupError> {
        let records: Vec<VocabRecord> = records_per_list.into_iter().flatten().collect();
        let deck = Deck::new(records, &self.mode)?;
        let exam_questions = self.exam.map(|count| count.requested(deck.size()));
        Ok(Session::new(deck, exam_questions, seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_utils::ConfigDocument;

    const CONFIG: &str = r#"{
        "catalog": [
            {
                "type": "category",
                "id": "jlpt",
                "name": "JLPT",
                "items": [
                    {
                        "type": "list",
                        "id": "n5",
                        "name": "N5",
                        "modes": [
                            {"id": "review", "type": "review", "name": "Review", "enabled": true, "q_field": "kanji",
                             "back_fields": [{"key": "hiragana", "label": "平假名"}]},
                            {"id": "quiz", "type": "quiz", "name": "Quiz", "enabled": true, "q_field": "kanji", "a_field": "hiragana"},
                            {"id": "broken", "type": "mcq", "name": "Choice", "enabled": true, "q_field": "kanji"},
                            {"id": "off", "type": "quiz", "name": "Off", "q_field": "kanji", "a_field": "hiragana"}
                        ]
                    },
                    {"type": "list", "id": "n4", "name": "N4", "file": "jlpt/n4.json", "modes": []}
                ]
            }
        ]
    }"#;

    fn index() -> CatalogIndex {
        CatalogIndex::build(&ConfigDocument::from_json(CONFIG).unwrap()).unwrap()
    }

    fn params(list_ids: &[&str], mode_id: &str, exam: bool, count: Option<&str>) -> LaunchParams {
        LaunchParams {
            list_ids: list_ids.iter().map(|id| id.to_string()).collect(),
            mode_id: mode_id.to_string(),
            exam,
            question_count: count.map(str::to_string),
        }
    }

    fn records(words: &[(&str, &str)]) -> Vec<VocabRecord> {
        words
            .iter()
            .map(|(kanji, hiragana)| {
                [("kanji", *kanji), ("hiragana", *hiragana)]
                    .into_iter()
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_merged_lists_use_mode_of_first_list() {
        let plan = resolve_session(&index(), &params(&["n5", "n4"], "quiz", false, None)).unwrap();
        assert_eq!(plan.mode.id, "quiz");
        assert_eq!(plan.word_files, vec!["words/n5.json", "jlpt/n4.json"]);
        assert_eq!(plan.exam, None);
    }

    #[test]
    fn test_resolution_errors() {
        let index = index();
        assert!(matches!(
            resolve_session(&index, &params(&[], "quiz", false, None)),
            Err(ConfigError::NoListSelected)
        ));
        assert!(matches!(
            resolve_session(&index, &params(&["n3"], "quiz", false, None)),
            Err(ConfigError::UnknownList(id)) if id == "n3"
        ));
        assert!(matches!(
            resolve_session(&index, &params(&["n5", "n3"], "quiz", false, None)),
            Err(ConfigError::UnknownList(id)) if id == "n3"
        ));
        assert!(matches!(
            resolve_session(&index, &params(&["n4"], "quiz", false, None)),
            Err(ConfigError::UnknownMode { .. })
        ));
        assert!(matches!(
            resolve_session(&index, &params(&["n5"], "off", false, None)),
            Err(ConfigError::ModeDisabled { .. })
        ));
        assert!(matches!(
            resolve_session(&index, &params(&["n5"], "broken", false, None)),
            Err(ConfigError::MissingAnswerField { .. })
        ));
        assert!(matches!(
            resolve_session(&index, &params(&["n5"], "quiz", true, Some("zero"))),
            Err(ConfigError::InvalidQuestionCount(_))
        ));
    }

    #[test]
    fn test_exam_framing() {
        let index = index();
        let plan = resolve_session(&index, &params(&["n5"], "quiz", true, Some("10"))).unwrap();
        assert_eq!(plan.exam, Some(QuestionCount::Count(10)));

        let plan = resolve_session(&index, &params(&["n5"], "quiz", true, None)).unwrap();
        assert_eq!(plan.exam, Some(QuestionCount::All));

        let plan = resolve_session(&index, &params(&["n5"], "review", true, Some("10"))).unwrap();
        assert_eq!(plan.exam, None, "review sessions are never exams");
    }

    #[test]
    fn test_build_session_merges_lists() {
        let plan = resolve_session(&index(), &params(&["n5", "n4"], "quiz", true, None)).unwrap();
        let session = plan
            .build_session(
                vec![
                    records(&[("犬", "いぬ"), ("猫", "ねこ")]),
                    records(&[("鳥", "とり")]),
                ],
                3,
            )
            .unwrap();
        assert_eq!(session.deck().size(), 3);
        assert_eq!(session.exam_progress().unwrap().total, 3);
    }

    #[test]
    fn test_build_session_rejects_empty_lists() {
        let plan = resolve_session(&index(), &params(&["n5"], "review", false, None)).unwrap();
        assert!(matches!(
            plan.build_session(vec![Vec::new()], 1),
            Err(SetupError::EmptyDeck { mode_id }) if mode_id == "review"
        ));
    }
}
