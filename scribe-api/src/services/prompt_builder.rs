//! Prompt construction for the analysis and rewrite calls
//!
//! Both builders are pure string functions. The prose is embedded verbatim
//! between `"""` delimiters, the expected JSON shape is spelled out field by
//! field, and the model is told to answer with the JSON object alone.

use scribe_common::Sense;

/// Focus value meaning "weigh every sense equally"
pub const ALL_SENSES: &str = "All Senses";

/// Top-level keys the analysis response must contain
pub const ANALYSIS_KEYS: &[&str] = &[
    "sensory_scores",
    "highlight_phrases",
    "analysis_chain_of_thought",
];

/// Top-level keys the rewrite response must contain
pub const REWRITE_KEYS: &[&str] = &[
    "sense",
    "originalSentences",
    "rewrittenSentences",
    "explanation",
    "improvement",
];

const SCORING_RUBRIC: &str = "\
SCORING RUBRIC (integer 0-10 per sense):
- 0: No details for this sense at all
- 1-2: Minimal sensory details, mostly abstract or conceptual
- 3-4: Basic sensory details present but generic
- 5-6: Moderate sensory details with some specificity
- 7-8: Rich sensory details that enhance the narrative
- 9-10: Exceptional sensory immersion that serves the story";

const GENRE_GUIDANCE: &str = "\
GENRE CONSIDERATIONS:
- Romance: Sensory details should enhance emotional connection and intimacy
- Thriller: Sensory cues should build tension and danger
- Fantasy: Sensory details should aid worldbuilding and magical immersion
- Horror: Sensory elements should create atmosphere and dread
- Literary Fiction: Sensory details should serve character development and themes
- Mystery: Sensory clues should support investigation and plot development
- Science Fiction: Sensory details should make futuristic or alien settings tangible";

const SENSE_GUIDELINES: &str = "\
SENSE-SPECIFIC GUIDELINES:
- SIGHT: colors, lighting, shapes, movement, expressions, visual textures, shadows, contrasts
- SOUND: specific noises, volume, pitch, rhythm, echoes, silence, musical qualities
- TOUCH: textures, temperatures, pressure, vibrations, pain, comfort, physical contact
- TASTE: flavors (sweet, salty, bitter, sour, umami), aftertastes, food, metaphorical tastes
- SMELL: specific scents, intensity, associations, pleasant or unpleasant odors, atmosphere";

const JSON_ONLY: &str = "\
Return only the JSON object. Do not wrap it in markdown code fences and do not add any text before or after it.";

/// Build the sensory analysis prompt
///
/// `focus` is either a sense name or [`ALL_SENSES`] (matched case-insensitively).
pub fn build_analysis_prompt(text: &str, genre: &str, focus: &str) -> String {
    let focus_rule = match focus.trim().parse::<Sense>() {
        Ok(sense) => format!(
            "Pay particular attention to the {} sense and explain its score in the most detail",
            sense
        ),
        Err(_) => "Consider all five senses equally".to_string(),
    };

    format!(
        r#"You are an expert fiction editor specializing in sensory writing analysis. Analyze the following prose for sensory details across all five senses: sight, sound, touch, taste and smell.

TEXT TO ANALYZE:
"""
{text}
"""

GENRE: {genre}
FOCUS SENSE: {focus}

Respond with a JSON object of exactly this structure:

{{
  "sensory_scores": {{
    "sight": <integer 0-10>,
    "sound": <integer 0-10>,
    "touch": <integer 0-10>,
    "taste": <integer 0-10>,
    "smell": <integer 0-10>
  }},
  "highlight_phrases": {{
    "sight": [<phrases copied exactly from the text>],
    "sound": [<phrases copied exactly from the text>],
    "touch": [<phrases copied exactly from the text>],
    "taste": [<phrases copied exactly from the text>],
    "smell": [<phrases copied exactly from the text>]
  }},
  "analysis_chain_of_thought": {{
    "sight": "<explanation for the sight score>",
    "sound": "<explanation for the sound score>",
    "touch": "<explanation for the touch score>",
    "taste": "<explanation for the taste score>",
    "smell": "<explanation for the smell score>"
  }}
}}

{rubric}

ANALYSIS RULES:
1. Every score is a whole number between 0 and 10
2. Highlight phrases must be exact substrings of the text; use an empty list when a sense has none
3. Each explanation names what works and what is missing, in 2-4 sentences
4. Judge the details by how well they serve the {genre} genre
5. {focus_rule}

{genre_guidance}

{json_only}"#,
        text = text,
        genre = genre,
        focus = focus.trim(),
        rubric = SCORING_RUBRIC,
        focus_rule = focus_rule,
        genre_guidance = GENRE_GUIDANCE,
        json_only = JSON_ONLY,
    )
}

/// Build the rewrite prompt for one target sense
pub fn build_rewrite_prompt(text: &str, genre: &str, target: Sense, current_score: f64) -> String {
    format!(
        r#"You are an expert fiction editor specializing in sensory writing enhancement. Rewrite specific parts of the provided text to strengthen the {sense} sense while keeping the story's flow and style.

ORIGINAL TEXT:
"""
{text}
"""

GENRE: {genre}
TARGET SENSE: {sense}
CURRENT {sense_upper} SCORE: {score}/10

Respond with a JSON object of exactly this structure:

{{
  "sense": "{sense}",
  "originalSentences": ["<sentence copied exactly from the text>", "..."],
  "rewrittenSentences": ["<enhanced version of the sentence at the same position>", "..."],
  "explanation": "<brief explanation of the {sense} details that were added>",
  "improvement": "<how this strengthens the writing for the {genre} genre>"
}}

INSTRUCTIONS:
1. Identify 2-3 sentences that lack {sense} details or could be enhanced
2. Rewrite them with vivid, specific {sense} details
3. originalSentences and rewrittenSentences have the same length and order
4. Keep the original tone, style and meaning
5. Make the additions feel natural and integrated, not forced
6. Choose details appropriate to {genre}

{sense_guidelines}

{genre_guidance}

{json_only}"#,
        sense = target,
        sense_upper = target.as_str().to_uppercase(),
        text = text,
        genre = genre,
        score = format_score(current_score),
        sense_guidelines = SENSE_GUIDELINES,
        genre_guidance = GENRE_GUIDANCE,
        json_only = JSON_ONLY,
    )
}

/// Whole scores print without a decimal point
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{}", score)
    }
}
