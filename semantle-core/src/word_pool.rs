use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

/// Target used when the pool is empty.
pub const FALLBACK_WORD: &str = "example";

/// Canonical form for every word the game stores or compares.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

#[derive(Debug, Deserialize)]
struct WordListDocument {
    #[serde(default)]
    words: Vec<String>,
}

/// Candidate target words, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    /// Build a pool from raw words. Words are normalized and blanks dropped;
    /// order is kept.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| normalize_word(word.as_ref()))
            .filter(|word| !word.is_empty())
            .collect();

        Self { words }
    }

    /// Parse a `{ "words": [...] }` document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: WordListDocument =
            serde_json::from_str(json).context("Word list is not a valid JSON document")?;
        Ok(Self::new(document.words))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Load the pool from disk. A missing or unreadable file gives an empty
    /// pool; callers fall back to [`FALLBACK_WORD`].
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Word list not found at {}", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(pool) => {
                info!("Loaded {} words from {}", pool.len(), path.display());
                pool
            }
            Err(e) => {
                error!("Error loading word list: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        let word = normalize_word(word);
        self.words.iter().any(|w| *w == word)
    }

    /// Index of the word of the day, `None` for an empty pool.
    pub fn daily_index(&self, date: NaiveDate) -> Option<usize> {
        if self.words.is_empty() {
            return None;
        }
        let date_str = date.format("%Y-%m-%d").to_string();
        Some(digest_mod(&date_str, self.words.len()))
    }

    /// Word of the day. Depends only on the pool contents and the date.
    pub fn daily_word(&self, date: NaiveDate) -> String {
        self.daily_index(date)
            .map(|index| self.words[index].clone())
            .unwrap_or_else(|| FALLBACK_WORD.to_string())
    }

    /// Uniformly chosen word from the pool.
    pub fn random_word(&self) -> String {
        self.words
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| FALLBACK_WORD.to_string())
    }
}

/// SHA-256 of `input` read as a big-endian integer, reduced modulo `modulus`.
fn digest_mod(input: &str, modulus: usize) -> usize {
    let digest = Sha256::digest(input.as_bytes());
    let modulus = modulus as u128;
    digest
        .iter()
        .fold(0u128, |acc, &byte| (acc * 256 + byte as u128) % modulus) as usize
}
