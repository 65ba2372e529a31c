use std::collections::BTreeSet;

use quiz_frontend_rs::simulation::{Answer, AlwaysCorrect, ExamSimulation};
use quiz_frontend_rs::{
    AdvanceOutcome, CardView, IncorrectEntry, QuizApp, SubmitOutcome, resolve_session,
};
use quiz_utils::{ConfigDocument, LaunchParams, VocabRecord, parse_word_list};

const CONFIG: &str = r#"{
    "siteTitle": "日本語",
    "catalog": [
        {
            "type": "list",
            "id": "animals",
            "name": "Animals",
            "modes": [
                {"id": "quiz", "type": "quiz", "name": "Quiz", "enabled": true,
                 "q_field": "kanji", "a_field": "hiragana",
                 "back_fields": [{"key": "hiragana", "label": "平假名"}, {"key": "meaning", "label": "意思"}]},
                {"id": "review", "type": "review", "name": "Review", "enabled": true, "q_field": "kanji"}
            ]
        },
        {"type": "list", "id": "more", "name": "More animals", "modes": []}
    ]
}"#;

const ANIMALS: &str = r#"[
    {"kanji": "犬", "hiragana": "いぬ", "meaning": "dog"},
    {"kanji": "猫", "hiragana": "ねこ", "meaning": "cat"},
    {"kanji": "鳥", "hiragana": "とり", "meaning": null}
]"#;

const MORE: &str = r#"[
    {"kanji": "馬", "hiragana": "うま"},
    {"kanji": "牛", "hiragana": "うし"}
]"#;

fn app() -> QuizApp {
    QuizApp::from_document(&ConfigDocument::from_json(CONFIG).unwrap(), "").unwrap()
}

fn params(list_ids: &[&str], mode_id: &str, exam: bool, count: Option<&str>) -> LaunchParams {
    LaunchParams {
        list_ids: list_ids.iter().map(|id| id.to_string()).collect(),
        mode_id: mode_id.to_string(),
        exam,
        question_count: count.map(str::to_string),
    }
}

fn animals() -> Vec<VocabRecord> {
    parse_word_list(ANIMALS).unwrap()
}

#[test]
fn test_exam_with_one_wrong_answer() {
    let plan = resolve_session(app().index(), &params(&["animals"], "quiz", true, Some("all")))
        .unwrap();
    let session = plan.build_session(vec![animals()], 1234).unwrap();

    let report = ExamSimulation::new(session)
        .run(&mut |card: &CardView, correct: &str| {
            if card.question == "猫" {
                Answer::Type("いぬ".to_string())
            } else {
                Answer::Type(correct.to_string())
            }
        })
        .unwrap();

    assert_eq!(report.result.score, 67);
    assert_eq!(report.result.correct_count, 2);
    assert_eq!(report.result.incorrect_count, 1);
    assert_eq!(report.result.total_questions, 3);
    assert_eq!(
        report.result.incorrect_log,
        vec![IncorrectEntry {
            question: "猫".to_string(),
            answer: "ねこ".to_string(),
        }]
    );

    let questions: BTreeSet<String> = report.cards.into_iter().map(|card| card.question).collect();
    assert_eq!(
        questions,
        ["犬", "猫", "鳥"]
            .into_iter()
            .map(str::to_string)
            .collect::<BTreeSet<_>>(),
        "every card is asked exactly once"
    );
}

#[test]
fn test_exam_over_merged_lists_is_clamped() {
    let plan = resolve_session(
        app().index(),
        &params(&["animals", "more"], "quiz", true, Some("20")),
    )
    .unwrap();
    let session = plan
        .build_session(vec![animals(), parse_word_list(MORE).unwrap()], 99)
        .unwrap();
    let progress = session.exam_progress().unwrap();
    assert_eq!(progress.total, 5);
    assert!(progress.clamped);

    let report = ExamSimulation::new(session).run(&mut AlwaysCorrect).unwrap();
    assert_eq!(report.cards.len(), 5);
    assert_eq!(report.result.score, 100);
}

#[test]
fn test_wrong_answers_retry_before_advancing() {
    let plan = resolve_session(app().index(), &params(&["animals"], "quiz", true, None)).unwrap();
    let mut session = plan.build_session(vec![animals()], 5).unwrap();

    for _ in 0..3 {
        assert_eq!(session.submit("ぞう"), SubmitOutcome::Incorrect);
        session.clear_shake();
    }
    assert_eq!(session.advance(), AdvanceOutcome::Blocked);

    let answer = session.correct_answer().to_string();
    assert!(matches!(
        session.submit(&format!(" {answer} ")),
        SubmitOutcome::Correct { .. }
    ));
    assert_eq!(session.exam_progress().unwrap().incorrect_count, 1);

    let card = session.card_view();
    assert_eq!(card.answer_placeholder.as_deref(), Some("平假名"));
    assert!(card.back_fields.iter().any(|field| field.is_answer));
}

#[test]
fn test_review_practice_never_ends() {
    let plan = resolve_session(app().index(), &params(&["animals"], "review", true, None)).unwrap();
    let mut session = plan.build_session(vec![animals()], 8).unwrap();
    assert!(!session.is_exam());

    let mut previous = session.current_index();
    for _ in 0..100 {
        assert!(matches!(session.advance(), AdvanceOutcome::NextCard { .. }));
        assert_ne!(session.current_index(), previous);
        previous = session.current_index();
    }
}

#[test]
fn test_menu() {
    let app = app();
    assert_eq!(app.site_title(), "日本語");
    let menu = app.menu("#");
    assert_eq!(menu.entries.len(), 2);
    assert!(menu.shows_exam_toggle);
}
