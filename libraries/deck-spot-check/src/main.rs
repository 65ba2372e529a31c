use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use quiz_frontend_rs::simulation::{AlwaysCorrect, ExamSimulation};
use quiz_frontend_rs::{SessionPlan, resolve_session};
use quiz_utils::{CatalogIndex, ConfigDocument, LaunchParams, VocabRecord, parse_word_list};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// How many word files are read at once.
const CONCURRENT_READS: usize = 16;

/// Number of offending records printed per mode.
const SAMPLE_SIZE: usize = 5;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a site directory containing config.json and its word files
    Check {
        site_dir: PathBuf,

        /// Seed for the simulated exams
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Print the JSON schema of config.json
    Schema,
}

#[derive(Debug)]
struct ModeReport {
    list_id: String,
    mode_id: String,
    records: usize,
    /// Record index and the fields it lacks.
    missing_fields: Vec<(usize, Vec<String>)>,
    exam_score: Option<u32>,
}

#[derive(Debug, Default)]
struct SiteReport {
    modes: Vec<ModeReport>,
    errors: Vec<String>,
}

async fn load_word_files(
    site_dir: &Path,
    plans: &[(String, SessionPlan)],
) -> FxHashMap<String, Result<Vec<VocabRecord>>> {
    let mut files: Vec<&String> = plans
        .iter()
        .flat_map(|(_, plan)| &plan.word_files)
        .collect();
    files.sort();
    files.dedup();

    futures::stream::iter(files)
        .map(|file| async move {
            let path = site_dir.join(file);
            let records = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))
                .and_then(|json| {
                    parse_word_list(&json)
                        .with_context(|| format!("Failed to parse {}", path.display()))
                });
            (file.clone(), records)
        })
        .buffer_unordered(CONCURRENT_READS)
        .collect()
        .await
}

fn check_mode(
    plan: &SessionPlan,
    list_id: &str,
    records: Vec<VocabRecord>,
    seed: u64,
) -> Result<ModeReport> {
    let session = plan
        .build_session(vec![records], seed)
        .map_err(|e| anyhow!("Failed to start {list_id}/{}: {e}", plan.mode.id))?;

    let deck = session.deck();
    let missing_fields = deck
        .records()
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let missing = deck.missing_fields(record);
            (!missing.is_empty()).then_some((index, missing))
        })
        .collect();
    let records = deck.size();

    let exam_score = if session.is_exam() {
        let report = ExamSimulation::new(session)
            .run(&mut AlwaysCorrect)
            .with_context(|| format!("Simulated exam of {list_id}/{} stalled", plan.mode.id))?;
        Some(report.result.score)
    } else {
        None
    };

    Ok(ModeReport {
        list_id: list_id.to_string(),
        mode_id: plan.mode.id.clone(),
        records,
        missing_fields,
        exam_score,
    })
}

async fn check_site(site_dir: &Path, seed: u64) -> Result<SiteReport> {
    let config_path = site_dir.join("config.json");
    let json = tokio::fs::read_to_string(&config_path)
        .await
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let document = ConfigDocument::from_json(&json)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    let index = CatalogIndex::build(&document)?;

    let mut report = SiteReport::default();
    let mut plans = Vec::new();

    let mut lists: Vec<_> = index.lists().filter(|indexed| indexed.list.enabled).collect();
    lists.sort_by(|a, b| a.list.id.cmp(&b.list.id));

    for indexed in lists {
        for mode in indexed.list.modes.iter().filter(|mode| mode.enabled) {
            let params = LaunchParams {
                list_ids: vec![indexed.list.id.clone()],
                mode_id: mode.id.clone(),
                exam: mode.capabilities().supports_exam,
                question_count: None,
            };
            match resolve_session(&index, &params) {
                Ok(plan) => plans.push((indexed.list.id.clone(), plan)),
                Err(e) => report
                    .errors
                    .push(format!("{}/{}: {e}", indexed.list.id, mode.id)),
            }
        }
    }

    let word_files = load_word_files(site_dir, &plans).await;
    log::info!("Read {} word files", word_files.len());

    for (list_id, plan) in &plans {
        let Some(file) = plan.word_files.first() else {
            continue;
        };
        let records = match word_files.get(file) {
            Some(Ok(records)) => records.clone(),
            Some(Err(e)) => {
                report.errors.push(format!("{list_id}/{}: {e:#}", plan.mode.id));
                continue;
            }
            None => continue,
        };
        match check_mode(plan, list_id, records, seed) {
            Ok(mode_report) => report.modes.push(mode_report),
            Err(e) => report.errors.push(format!("{e:#}")),
        }
    }

    Ok(report)
}

fn print_summary(report: &SiteReport) {
    println!("\n=== DECK SPOT CHECK SUMMARY ===\n");
    for mode in &report.modes {
        print!("{}/{}: {} records", mode.list_id, mode.mode_id, mode.records);
        if let Some(score) = mode.exam_score {
            print!(", simulated exam scored {score}%");
        }
        println!();
        if !mode.missing_fields.is_empty() {
            println!(
                "  {} records are missing fields the mode reads:",
                mode.missing_fields.len()
            );
            for (index, fields) in mode.missing_fields.iter().take(SAMPLE_SIZE) {
                println!("    #{index}: {}", fields.join(", "));
            }
        }
    }
    if !report.errors.is_empty() {
        println!("\n{} errors:", report.errors.len());
        for error in &report.errors {
            println!("  {error}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Check { site_dir, seed } => {
            let seed = seed.unwrap_or_else(rand::random);
            log::info!("Checking {} with seed {seed}", site_dir.display());
            let report = check_site(&site_dir, seed).await?;
            print_summary(&report);
            if !report.errors.is_empty() {
                bail!("{} problems found", report.errors.len());
            }
        }
        Command::Schema => {
            let schema = schemars::schema_for!(ConfigDocument);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CONFIG: &str = r#"{
        "catalog": [
            {"type": "category", "id": "basics", "name": "Basics", "items": [
                {"type": "list", "id": "animals", "name": "Animals", "modes": [
                    {"id": "review", "type": "review", "name": "Review", "enabled": true, "q_field": "kanji"},
                    {"id": "quiz", "type": "quiz", "name": "Quiz", "enabled": true, "q_field": "kanji", "a_field": "hiragana"},
                    {"id": "mcq", "type": "mcq", "name": "Choice", "enabled": true, "q_field": "kanji"}
                ]},
                {"type": "list", "id": "colors", "name": "Colors", "file": "words/missing.json", "modes": [
                    {"id": "review", "type": "review", "name": "Review", "enabled": true, "q_field": "word"}
                ]},
                {"type": "list", "id": "off", "name": "Off", "enabled": false, "modes": [
                    {"id": "review", "type": "review", "name": "Review", "enabled": true, "q_field": "word"}
                ]}
            ]}
        ]
    }"#;

    const ANIMALS: &str = r#"[
        {"kanji": "犬", "hiragana": "いぬ"},
        {"kanji": "猫", "hiragana": ""},
        {"kanji": "鳥", "hiragana": "とり"}
    ]"#;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), CONFIG).unwrap();
        fs::create_dir(dir.path().join("words")).unwrap();
        fs::write(dir.path().join("words/animals.json"), ANIMALS).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_check_site_reports_problems() {
        let dir = site();
        let report = check_site(dir.path(), 3).await.unwrap();

        let modes: Vec<(&str, &str)> = report
            .modes
            .iter()
            .map(|mode| (mode.list_id.as_str(), mode.mode_id.as_str()))
            .collect();
        assert_eq!(modes, vec![("animals", "review"), ("animals", "quiz")]);

        let quiz = &report.modes[1];
        assert_eq!(quiz.records, 3);
        assert_eq!(
            quiz.missing_fields,
            vec![(1, vec!["hiragana".to_string()])]
        );
        assert!(quiz.exam_score.is_some());
        assert_eq!(report.modes[0].exam_score, None);

        assert_eq!(report.errors.len(), 2, "errors: {:?}", report.errors);
        assert!(report.errors.iter().any(|e| e.starts_with("animals/mcq")));
        assert!(report.errors.iter().any(|e| e.starts_with("colors/review")));
    }

    #[tokio::test]
    async fn test_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_site(dir.path(), 1).await.is_err());
    }

    #[test]
    fn test_schema_describes_catalog() {
        let schema = serde_json::to_value(schemars::schema_for!(ConfigDocument)).unwrap();
        assert!(schema.to_string().contains("catalog"));
    }
}
