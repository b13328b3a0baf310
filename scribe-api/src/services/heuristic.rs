//! Keyword-frequency fallback analyzer
//!
//! Runs without the upstream model. Counts keyword occurrences per sense,
//! marks senses with no hits as weak, and appends a stock sensory phrase to
//! up to four sentences of the input.

use rand::Rng;
use scribe_common::models::{HeuristicReport, HeuristicSuggestion, OverallAnalysis};
use scribe_common::{Sense, SenseMap};

/// A sense with fewer keyword hits than this is weak
pub const WEAK_COUNT_THRESHOLD: u32 = 1;

/// Upper bound on suggestions per report
pub const MAX_SUGGESTIONS: usize = 4;

/// Sentences shorter than this (after trimming) are skipped
pub const MIN_SENTENCE_CHARS: usize = 10;

const SIGHT_WORDS: &[&str] = &[
    "see", "look", "watch", "observe", "glance", "stare", "bright", "dark", "color", "light",
    "shadow", "visible", "appear", "view", "glimpse",
];
const SOUND_WORDS: &[&str] = &[
    "hear", "listen", "sound", "noise", "whisper", "shout", "music", "voice", "echo", "silence",
    "bang", "crash", "hum", "buzz", "ring",
];
const TOUCH_WORDS: &[&str] = &[
    "feel", "touch", "smooth", "rough", "soft", "hard", "warm", "cold", "texture", "pressure",
    "grip", "caress", "brush", "stroke",
];
const TASTE_WORDS: &[&str] = &[
    "taste", "flavor", "sweet", "sour", "bitter", "salty", "spicy", "delicious", "mouth",
    "tongue", "swallow", "chew", "bite",
];
const SMELL_WORDS: &[&str] = &[
    "smell", "scent", "aroma", "fragrance", "odor", "perfume", "stench", "whiff", "sniff",
    "inhale", "sweet", "bitter", "fresh",
];

const SIGHT_PHRASES: [&str; 5] = [
    " bathed in golden afternoon light that cast long shadows,",
    " illuminated by pale morning sunlight filtering through nearby windows,",
    " shrouded in darkness that seemed to swallow details,",
    " where bright colors danced in the shifting light,",
    " revealed by the dim glow that painted everything in muted tones,",
];
const SOUND_PHRASES: [&str; 5] = [
    " accompanied by the soft whisper of wind through leaves,",
    " while distant voices echoed faintly in the background,",
    " as footsteps clicked rhythmically against hard surfaces,",
    " with the gentle hum of hidden machinery,",
    " amid the rhythmic tapping of rain on nearby surfaces,",
];
const TOUCH_PHRASES: [&str; 5] = [
    " while rough textures scraped against exposed skin,",
    " as smooth surfaces felt surprisingly cool to the touch,",
    " with warmth radiating from nearby heated surfaces,",
    " where soft fabric yielded under gentle pressure,",
    " as cold metal sent shivers through sensitive fingertips,",
];
const TASTE_PHRASES: [&str; 5] = [
    " while the metallic taste of anxiety lingered,",
    " as unexpected sweetness seemed to coat the tongue,",
    " with a bitter aftertaste that refused to fade,",
    " where the salty tang of ocean air was unmistakable,",
    " as rich, complex flavors burst across the palate,",
];
const SMELL_PHRASES: [&str; 5] = [
    " while the air carried hints of jasmine and morning dew,",
    " as a faint aroma of fresh coffee lingered nearby,",
    " with the scent of rain on hot pavement filling the air,",
    " where sweet fragrance drifted from hidden flowers,",
    " as the musty smell of old books pervaded the space,",
];

fn keywords(sense: Sense) -> &'static [&'static str] {
    match sense {
        Sense::Sight => SIGHT_WORDS,
        Sense::Sound => SOUND_WORDS,
        Sense::Touch => TOUCH_WORDS,
        Sense::Taste => TASTE_WORDS,
        Sense::Smell => SMELL_WORDS,
    }
}

fn enhancement_phrases(sense: Sense) -> &'static [&'static str; 5] {
    match sense {
        Sense::Sight => &SIGHT_PHRASES,
        Sense::Sound => &SOUND_PHRASES,
        Sense::Touch => &TOUCH_PHRASES,
        Sense::Taste => &TASTE_PHRASES,
        Sense::Smell => &SMELL_PHRASES,
    }
}

fn explanation(sense: Sense) -> &'static str {
    match sense {
        Sense::Sight => {
            "Added visual details like lighting, colors, and movement to make the scene more vivid."
        }
        Sense::Sound => "Incorporated auditory elements to create a richer soundscape.",
        Sense::Touch => {
            "Added tactile sensations and textures to make the experience more tangible."
        }
        Sense::Taste => "Added taste elements to create a more immersive sensory experience.",
        Sense::Smell => "Included scent descriptions to evoke stronger emotional responses.",
    }
}

// ============================================================================
// Phrase selection
// ============================================================================

/// Chooses an index in `0..len`
pub trait PhraseSelector {
    fn select(&mut self, len: usize) -> usize;
}

/// Uniform random choice
#[derive(Debug, Default)]
pub struct RandomSelector;

impl PhraseSelector for RandomSelector {
    fn select(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always the same index (modulo `len`)
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl PhraseSelector for FixedSelector {
    fn select(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.0 % len
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Case-insensitive, non-overlapping keyword hits per sense
///
/// Counts are substring matches ("light" counts inside "lighthouse") and a
/// keyword listed under two senses counts for both.
pub fn keyword_counts(text: &str) -> SenseMap<u32> {
    let lower = text.to_lowercase();
    SenseMap::from_fn(|sense| {
        keywords(sense)
            .iter()
            .map(|word| lower.matches(word).count() as u32)
            .sum()
    })
}

/// Split on `.`, `!` and `?`, dropping blank fragments
fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .filter(|fragment| !fragment.trim().is_empty())
        .collect()
}

/// Build the heuristic rewrite report for `text`
pub fn suggest_rewrites(text: &str, selector: &mut impl PhraseSelector) -> HeuristicReport {
    let counts = keyword_counts(text);

    let weak_areas: Vec<Sense> = counts
        .iter()
        .filter(|(_, count)| **count < WEAK_COUNT_THRESHOLD)
        .map(|(sense, _)| sense)
        .collect();
    let strength_areas: Vec<Sense> = counts
        .iter()
        .filter(|(_, count)| **count >= WEAK_COUNT_THRESHOLD)
        .map(|(sense, _)| sense)
        .collect();

    let targets: Vec<Sense> = if weak_areas.is_empty() {
        Sense::ALL.to_vec()
    } else {
        weak_areas.clone()
    };

    let suggestions = split_sentences(text)
        .into_iter()
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() >= MIN_SENTENCE_CHARS)
        .take(MAX_SUGGESTIONS)
        .enumerate()
        .map(|(i, sentence)| {
            let sense = targets[i % targets.len()];
            let phrases = enhancement_phrases(sense);
            let phrase = phrases[selector.select(phrases.len()) % phrases.len()];
            HeuristicSuggestion {
                original: sentence.to_string(),
                rewritten: format!("{}{}", sentence.trim_end_matches('.'), phrase),
                explanation: explanation(sense).to_string(),
                senses_improved: vec![sense],
            }
        })
        .collect();

    let improvement_summary = summarize(&weak_areas, &strength_areas);

    HeuristicReport {
        suggestions,
        overall_analysis: OverallAnalysis {
            weak_areas,
            strength_areas,
            improvement_summary,
        },
    }
}

fn join(senses: &[Sense]) -> String {
    senses
        .iter()
        .map(Sense::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn summarize(weak: &[Sense], strong: &[Sense]) -> String {
    match (weak.is_empty(), strong.is_empty()) {
        (true, _) => "Every sense is already represented. Try layering more than one sense into key moments.".to_string(),
        (false, true) => format!(
            "Focus on enhancing {} details. No sense stands out yet.",
            join(weak)
        ),
        (false, false) => format!(
            "Focus on enhancing {} details. Your {} descriptions are already strong.",
            join(weak),
            join(strong)
        ),
    }
}
