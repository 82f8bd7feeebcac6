use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseOptionError {
    #[error("unknown word list: {0}")]
    List(String),

    #[error("unknown quiz mode: {0}")]
    Mode(String),

    #[error("unknown difficulty: {0}")]
    Difficulty(String),
}

//
// ─── WORD LISTS ────────────────────────────────────────────────────────────────
//

/// One of the fixed vocabulary lists shipped with the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ListId {
    #[serde(rename = "List A")]
    ListA,
    #[serde(rename = "List B")]
    ListB,
    #[serde(rename = "List C")]
    ListC,
    #[serde(rename = "List D")]
    ListD,
}

impl ListId {
    pub const ALL: [ListId; 4] = [ListId::ListA, ListId::ListB, ListId::ListC, ListId::ListD];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ListA => "List A",
            Self::ListB => "List B",
            Self::ListC => "List C",
            Self::ListD => "List D",
        }
    }
}

impl FromStr for ListId {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let key = key
            .strip_prefix("list")
            .map(|rest| rest.trim_start_matches([' ', '-', '_']))
            .unwrap_or(&key);
        match key {
            "a" => Ok(Self::ListA),
            "b" => Ok(Self::ListB),
            "c" => Ok(Self::ListC),
            "d" => Ok(Self::ListD),
            _ => Err(ParseOptionError::List(s.to_string())),
        }
    }
}

//
// ─── QUIZ MODE ─────────────────────────────────────────────────────────────────
//

/// What the match card of each pair shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuizMode {
    /// Term against its Arabic translation (right-to-left script).
    #[default]
    #[serde(rename = "English-Arabic")]
    EnglishToTranslation,
    /// Term against its English definition.
    #[serde(rename = "English-Definition")]
    EnglishToDefinition,
}

impl QuizMode {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::EnglishToTranslation => "English-Arabic",
            Self::EnglishToDefinition => "English-Definition",
        }
    }
}

impl FromStr for QuizMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "translation" | "arabic" | "english-arabic" => Ok(Self::EnglishToTranslation),
            "definition" | "english-definition" => Ok(Self::EnglishToDefinition),
            _ => Err(ParseOptionError::Mode(s.to_string())),
        }
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "Easy (10 words)")]
    Easy,
    #[serde(rename = "Medium (15 words)")]
    Medium,
    #[serde(rename = "Hard (20 words)")]
    Hard,
}

impl Difficulty {
    /// Number of vocabulary entries (pairs) dealt at this level.
    #[must_use]
    pub fn word_count(self) -> usize {
        match self {
            Self::Easy => 10,
            Self::Medium => 15,
            Self::Hard => 20,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseOptionError::Difficulty(s.to_string())),
        }
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_counts_follow_difficulty() {
        assert_eq!(Difficulty::Easy.word_count(), 10);
        assert_eq!(Difficulty::Medium.word_count(), 15);
        assert_eq!(Difficulty::Hard.word_count(), 20);
    }

    #[test]
    fn list_parses_short_and_long_forms() {
        assert_eq!("b".parse::<ListId>().unwrap(), ListId::ListB);
        assert_eq!("List C".parse::<ListId>().unwrap(), ListId::ListC);
        assert_eq!("list-d".parse::<ListId>().unwrap(), ListId::ListD);
        assert!("e".parse::<ListId>().is_err());
    }

    #[test]
    fn options_serialize_as_display_strings() {
        assert_eq!(serde_json::to_string(&ListId::ListA).unwrap(), "\"List A\"");
        assert_eq!(
            serde_json::to_string(&Difficulty::Medium).unwrap(),
            "\"Medium (15 words)\""
        );
        assert_eq!(
            serde_json::to_string(&QuizMode::EnglishToTranslation).unwrap(),
            "\"English-Arabic\""
        );
    }

    #[test]
    fn mode_rejects_unknown_values() {
        let err = "spanish".parse::<QuizMode>().unwrap_err();
        assert_eq!(err, ParseOptionError::Mode("spanish".into()));
    }
}
