use quiz_utils::{CatalogIndex, ConfigDocument, LaunchParams, VocabRecord};

use crate::SetupError;
use crate::session::Session;
use crate::session_config::resolve_session;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Request for {url} failed")]
    Request {
        url: String,
        #[source]
        source: fetch_happen::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: String },

    #[error("Could not parse {url}")]
    Parse {
        url: String,
        #[source]
        source: fetch_happen::Error,
    },
}

/// Joins a site-relative path onto the base url and appends a cache-busting version.
pub(crate) fn versioned_url(base_url: &str, path: &str, version: i64) -> String {
    let path = path.trim_start_matches('/');
    let base = base_url.trim_end_matches('/');
    if base.is_empty() {
        format!("{path}?v={version}")
    } else {
        format!("{base}/{path}?v={version}")
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    base_url: &str,
    path: &str,
) -> Result<T, LoadError> {
    let url = versioned_url(base_url, path, chrono::Utc::now().timestamp_millis());
    let client = fetch_happen::Client;
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| LoadError::Request {
            url: url.clone(),
            source,
        })?;

    if !response.ok() {
        return Err(LoadError::Status {
            url,
            status: response.status().to_string(),
        });
    }

    response
        .json()
        .await
        .map_err(|source| LoadError::Parse { url, source })
}

pub async fn fetch_config(base_url: &str) -> Result<ConfigDocument, LoadError> {
    let document: ConfigDocument = fetch_json(base_url, CONFIG_FILE).await?;
    log::info!("Loaded catalog {:?}", document.site_title());
    Ok(document)
}

pub async fn fetch_word_list(base_url: &str, file: &str) -> Result<Vec<VocabRecord>, LoadError> {
    let records: Vec<VocabRecord> = fetch_json(base_url, file).await?;
    log::info!("Loaded {} records from {file}", records.len());
    Ok(records)
}

/// Resolves the launch parameters, fetches every selected list in order, and starts the session.
pub async fn load_session(
    index: &CatalogIndex,
    params: &LaunchParams,
    base_url: &str,
    seed: u64,
) -> Result<Session, SetupError> {
    let plan = resolve_session(index, params)?;
    let mut records_per_list = Vec::with_capacity(plan.word_files.len());
    for file in &plan.word_files {
        records_per_list.push(fetch_word_list(base_url, file).await?);
    }
    plan.build_session(records_per_list, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_url() {
        assert_eq!(
            versioned_url("https://example.com/site/", "/words/n5.json", 42),
            "https://example.com/site/words/n5.json?v=42"
        );
        assert_eq!(versioned_url("", "config.json", 7), "config.json?v=7");
    }
}
