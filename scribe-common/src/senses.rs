//! Sense taxonomy and per-sense value maps
//!
//! Every analysis in Sensory Scribe is expressed over the same fixed set of
//! five senses. [`SenseMap`] stores one value per sense and always serializes
//! all five keys, so a missing key in an inbound payload becomes the value
//! type's default rather than disappearing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Lowest score a sense can receive
pub const MIN_SCORE: u8 = 0;

/// Highest score a sense can receive
pub const MAX_SCORE: u8 = 10;

/// Scores below this value mark a sense as needing improvement
pub const WEAK_SCORE_THRESHOLD: u8 = 6;

/// One of the five senses used to classify sensory writing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    Sight,
    Sound,
    Touch,
    Taste,
    Smell,
}

impl Sense {
    /// All senses in canonical order
    pub const ALL: [Sense; 5] = [
        Sense::Sight,
        Sense::Sound,
        Sense::Touch,
        Sense::Taste,
        Sense::Smell,
    ];

    /// Lowercase wire name ("sight", "sound", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Sense::Sight => "sight",
            Sense::Sound => "sound",
            Sense::Touch => "touch",
            Sense::Taste => "taste",
            Sense::Smell => "smell",
        }
    }

    /// Capitalized name used in prompts and reports
    pub fn title(&self) -> &'static str {
        match self {
            Sense::Sight => "Sight",
            Sense::Sound => "Sound",
            Sense::Touch => "Touch",
            Sense::Taste => "Taste",
            Sense::Smell => "Smell",
        }
    }

    /// Comma-separated list of valid sense names, for error messages
    pub fn valid_names() -> String {
        Sense::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sense {
    type Err = Error;

    /// Case-insensitive parse ("SIGHT", "Sight" and "sight" are all accepted)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Sense::ALL
            .into_iter()
            .find(|sense| sense.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Invalid sense \"{}\". Must be one of: {}",
                    wanted,
                    Sense::valid_names()
                ))
            })
    }
}

/// One value per sense
///
/// Serializes as `{"sight": .., "sound": .., "touch": .., "taste": .., "smell": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenseMap<T: Default> {
    pub sight: T,
    pub sound: T,
    pub touch: T,
    pub taste: T,
    pub smell: T,
}

/// Integer score in [0, 10] per sense
pub type SenseScores = SenseMap<u8>;

/// Phrases from the analyzed text evidencing each sense
pub type HighlightPhrases = SenseMap<Vec<String>>;

/// Free-text explanation per sense
pub type SenseNotes = SenseMap<String>;

impl<T: Default> SenseMap<T> {
    /// Build a map by evaluating `f` once per sense, in canonical order
    pub fn from_fn(mut f: impl FnMut(Sense) -> T) -> Self {
        Self {
            sight: f(Sense::Sight),
            sound: f(Sense::Sound),
            touch: f(Sense::Touch),
            taste: f(Sense::Taste),
            smell: f(Sense::Smell),
        }
    }

    pub fn get(&self, sense: Sense) -> &T {
        match sense {
            Sense::Sight => &self.sight,
            Sense::Sound => &self.sound,
            Sense::Touch => &self.touch,
            Sense::Taste => &self.taste,
            Sense::Smell => &self.smell,
        }
    }

    pub fn get_mut(&mut self, sense: Sense) -> &mut T {
        match sense {
            Sense::Sight => &mut self.sight,
            Sense::Sound => &mut self.sound,
            Sense::Touch => &mut self.touch,
            Sense::Taste => &mut self.taste,
            Sense::Smell => &mut self.smell,
        }
    }

    /// Iterate `(sense, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Sense, &T)> {
        Sense::ALL.into_iter().map(move |sense| (sense, self.get(sense)))
    }
}

impl SenseScores {
    /// Senses scoring below [`WEAK_SCORE_THRESHOLD`], weakest first
    ///
    /// Ties keep canonical sense order.
    pub fn weak_senses(&self) -> Vec<(Sense, u8)> {
        let mut weak: Vec<(Sense, u8)> = self
            .iter()
            .filter(|(_, score)| **score < WEAK_SCORE_THRESHOLD)
            .map(|(sense, score)| (sense, *score))
            .collect();
        weak.sort_by_key(|(_, score)| *score);
        weak
    }

    /// Whether rewrite suggestions are worth offering (any weak sense)
    pub fn should_offer_suggestions(&self) -> bool {
        !self.weak_senses().is_empty()
    }

    /// All senses ordered by ascending score (weakest first)
    pub fn priority_order(&self) -> Vec<Sense> {
        let mut ordered: Vec<(Sense, u8)> = self.iter().map(|(s, v)| (s, *v)).collect();
        ordered.sort_by_key(|(_, score)| *score);
        ordered.into_iter().map(|(sense, _)| sense).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("SIGHT".parse::<Sense>().unwrap(), Sense::Sight);
        assert_eq!("Smell".parse::<Sense>().unwrap(), Sense::Smell);
        assert_eq!(" taste ".parse::<Sense>().unwrap(), Sense::Taste);
    }

    #[test]
    fn test_parse_rejects_unknown_sense_with_valid_list() {
        let err = "vision".parse::<Sense>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sight, sound, touch, taste, smell"));
    }

    #[test]
    fn test_missing_keys_default_to_zero() {
        let scores: SenseScores = serde_json::from_str(r#"{"sight": 7}"#).unwrap();
        assert_eq!(scores.sight, 7);
        assert_eq!(scores.sound, 0);
        assert_eq!(scores.smell, 0);

        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_weak_senses_sorted_weakest_first() {
        let scores = SenseScores {
            sight: 8,
            sound: 5,
            touch: 2,
            taste: 6,
            smell: 0,
        };

        let weak = scores.weak_senses();
        assert_eq!(
            weak,
            vec![(Sense::Smell, 0), (Sense::Touch, 2), (Sense::Sound, 5)]
        );
        assert!(scores.should_offer_suggestions());
    }

    #[test]
    fn test_no_suggestions_when_all_strong() {
        let scores = SenseScores::from_fn(|_| 9);
        assert!(scores.weak_senses().is_empty());
        assert!(!scores.should_offer_suggestions());
    }

    #[test]
    fn test_priority_order() {
        let scores = SenseScores {
            sight: 9,
            sound: 1,
            touch: 4,
            taste: 3,
            smell: 7,
        };
        assert_eq!(
            scores.priority_order(),
            vec![Sense::Sound, Sense::Taste, Sense::Touch, Sense::Smell, Sense::Sight]
        );
    }
}
