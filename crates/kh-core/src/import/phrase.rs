use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::encoding::Base64EncodedString;

/// BIP-39 word list of an exported phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WordListLanguage {
    #[default]
    English,
    Spanish,
    French,
    Italian,
    Portuguese,
    Czech,
    Japanese,
    Korean,
    ChineseTraditional,
    ChineseSimplified,
}

impl WordListLanguage {
    pub const ALL: [WordListLanguage; 10] = [
        WordListLanguage::English,
        WordListLanguage::Spanish,
        WordListLanguage::French,
        WordListLanguage::Italian,
        WordListLanguage::Portuguese,
        WordListLanguage::Czech,
        WordListLanguage::Japanese,
        WordListLanguage::Korean,
        WordListLanguage::ChineseTraditional,
        WordListLanguage::ChineseSimplified,
    ];

    /// Stable wire id, 1..=10
    pub fn id(&self) -> u8 {
        match self {
            WordListLanguage::English => 1,
            WordListLanguage::Spanish => 2,
            WordListLanguage::French => 3,
            WordListLanguage::Italian => 4,
            WordListLanguage::Portuguese => 5,
            WordListLanguage::Czech => 6,
            WordListLanguage::Japanese => 7,
            WordListLanguage::Korean => 8,
            WordListLanguage::ChineseTraditional => 9,
            WordListLanguage::ChineseSimplified => 10,
        }
    }

    /// Unknown ids fall back to English.
    pub fn from_id(id: u8) -> Self {
        Self::ALL
            .into_iter()
            .find(|language| language.id() == id)
            .unwrap_or_default()
    }
}

/// Plaintext export payload, encrypted to the owner device before upload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedPhrase {
    pub binary_phrase: String,
    pub language: u8,
    pub label: String,
}

impl ExportedPhrase {
    pub fn new(
        binary_phrase: impl Into<String>,
        language: WordListLanguage,
        label: impl Into<String>,
    ) -> Self {
        Self {
            binary_phrase: binary_phrase.into(),
            language: language.id(),
            label: label.into(),
        }
    }

    /// English word list, empty label.
    pub fn with_defaults(binary_phrase: impl Into<String>) -> Self {
        Self::new(binary_phrase, WordListLanguage::default(), "")
    }

    pub fn word_list(&self) -> WordListLanguage {
        WordListLanguage::from_id(self.language)
    }
}

impl fmt::Debug for ExportedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedPhrase")
            .field("binary_phrase", &"[REDACTED]")
            .field("language", &self.language)
            .field("label", &self.label)
            .finish()
    }
}

impl Drop for ExportedPhrase {
    fn drop(&mut self) {
        self.binary_phrase.zeroize();
    }
}

/// Body of `POST import/{channel}/encrypted`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPhrase {
    pub encrypted_data: Base64EncodedString,
}
