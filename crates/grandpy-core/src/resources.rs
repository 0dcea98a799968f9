//! Static resources loaded once at startup
//!
//! Stop words, address-intent keywords and canned answers live in JSON files.
//! A file that cannot be read is logged and its consumer degrades instead of
//! failing the whole pipeline.

use crate::config::ResourceConfig;
use crate::{GrandpyError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Word list as stored on disk: either a plain array or an object whose keys
/// are the words.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WordFile {
    List(Vec<String>),
    Map(BTreeMap<String, serde_json::Value>),
}

impl WordFile {
    fn into_words(self) -> Vec<String> {
        match self {
            Self::List(words) => words,
            Self::Map(map) => map.into_keys().collect(),
        }
    }
}

/// Read a JSON word list (stop words, detection keywords)
pub fn load_word_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| GrandpyError::Resource {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let file: WordFile = serde_json::from_str(&content).map_err(|e| GrandpyError::Resource {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(file.into_words())
}

/// Pools of pre-written answers
#[derive(Debug, Clone, Deserialize)]
pub struct MessageStore {
    /// Prefixes announcing an address
    #[serde(default)]
    pub message_for_address: Vec<String>,

    /// Story introductions
    #[serde(default)]
    pub message_for_story: Vec<String>,

    /// Apologies shown when nothing was found
    #[serde(default)]
    pub message_for_error: Vec<String>,
}

impl MessageStore {
    /// Read the answer pools from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GrandpyError::Resource {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| GrandpyError::Resource {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self {
            message_for_address: vec!["Bien sûr mon poussin ! La voici :".to_string()],
            message_for_story: vec![
                "Mais t'ai-je déjà raconté l'histoire de ce quartier ?".to_string(),
            ],
            message_for_error: vec![
                "Désolé mon petit, ma mémoire me joue des tours... Je ne connais pas cet endroit."
                    .to_string(),
            ],
        }
    }
}

/// Every static resource the pipeline needs
#[derive(Debug, Clone, Default)]
pub struct Resources {
    /// `None` when the stop-word file could not be loaded
    pub stop_words: Option<Vec<String>>,

    /// `None` when the keyword file could not be loaded
    pub keywords: Option<Vec<String>>,

    /// Falls back to built-in answers when the file could not be loaded
    pub messages: MessageStore,
}

impl Resources {
    /// Load all resources, logging and degrading on individual failures
    pub fn load(config: &ResourceConfig) -> Self {
        let stop_words = load_word_list(&config.stop_words)
            .inspect(|words| tracing::debug!("Loaded {} stop words", words.len()))
            .inspect_err(|e| tracing::error!("Stop-word removal disabled: {e}"))
            .ok();

        let keywords = load_word_list(&config.keywords)
            .inspect(|words| tracing::debug!("Loaded {} detection keywords", words.len()))
            .inspect_err(|e| tracing::error!("Question scoring disabled: {e}"))
            .ok();

        let messages = MessageStore::from_file(&config.messages).unwrap_or_else(|e| {
            tracing::error!("Using built-in answers: {e}");
            MessageStore::default()
        });

        Self {
            stop_words,
            keywords,
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn json_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_word_list_from_array() {
        let file = json_file(r#"["le", "la", "les"]"#);
        let words = load_word_list(file.path()).unwrap();
        assert_eq!(words, vec!["le", "la", "les"]);
    }

    #[test]
    fn test_word_list_from_object_keys() {
        let file = json_file(r#"{"de": 1, "du": 1}"#);
        let mut words = load_word_list(file.path()).unwrap();
        words.sort();
        assert_eq!(words, vec!["de", "du"]);
    }

    #[test]
    fn test_word_list_missing_file() {
        let err = load_word_list(Path::new("/nonexistent/words.json")).unwrap_err();
        assert!(matches!(err, GrandpyError::Resource { .. }));
    }

    #[test]
    fn test_message_store_from_file() {
        let file = json_file(
            r#"{
                "message_for_address": ["Voici l'adresse :"],
                "message_for_error": ["Oups"]
            }"#,
        );
        let store = MessageStore::from_file(file.path()).unwrap();
        assert_eq!(store.message_for_address, vec!["Voici l'adresse :"]);
        assert!(store.message_for_story.is_empty());
        assert_eq!(store.message_for_error, vec!["Oups"]);
    }

    #[test]
    fn test_resources_degrade_when_missing() {
        let config = ResourceConfig {
            stop_words: PathBuf::from("/nonexistent/stop.json"),
            keywords: PathBuf::from("/nonexistent/keywords.json"),
            messages: PathBuf::from("/nonexistent/answers.json"),
        };

        let resources = Resources::load(&config);
        assert!(resources.stop_words.is_none());
        assert!(resources.keywords.is_none());
        assert!(!resources.messages.message_for_error.is_empty());
    }
}
