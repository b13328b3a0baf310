//! Terminal rendering of service results

use scribe_common::models::{
    AnalysisResult, GenreExamplesResponse, HeuristicReport, ImprovementTipsResponse,
    RewriteSuggestion,
};
use scribe_common::senses::MAX_SCORE;
use scribe_common::{Draft, Sense};
use std::fmt::Write as _;

const BAR_WIDTH: usize = 10;

fn bar(score: u8) -> String {
    let filled = usize::from(score.min(MAX_SCORE)) * BAR_WIDTH / usize::from(MAX_SCORE);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Score bars, weakest senses and per-sense notes
pub fn render_analysis(analysis: &AnalysisResult) -> String {
    let mut out = String::new();
    let scores = &analysis.sensory_scores;

    let _ = writeln!(out, "Sensory scores");
    for (sense, score) in scores.iter() {
        let _ = writeln!(out, "  {:<6} {} {:>2}/10", sense.title(), bar(*score), score);
    }

    if !scores.should_offer_suggestions() {
        let _ = writeln!(out, "\nEvery sense scores 6 or above.");
    } else {
        let weak = scores.weak_senses();
        let names: Vec<String> = weak
            .iter()
            .map(|(sense, score)| format!("{} ({})", sense, score))
            .collect();
        let _ = writeln!(out, "\nWeakest senses: {}", names.join(", "));
        if let Some((sense, score)) = weak.first() {
            let _ = writeln!(
                out,
                "Try: scribe rewrite <file> --sense {} --score {}",
                sense, score
            );
        }
    }

    for sense in scores.priority_order() {
        let note = analysis.analysis_chain_of_thought.get(sense);
        let phrases = analysis.highlight_phrases.get(sense);
        if note.is_empty() && phrases.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}", sense.title());
        if !note.is_empty() {
            let _ = writeln!(out, "  {}", note);
        }
        for phrase in phrases {
            let _ = writeln!(out, "  - \"{}\"", phrase);
        }
    }

    if let Some(id) = &analysis.id {
        let _ = writeln!(out, "\nRecord: {}", id);
    }
    out
}

pub fn render_rewrite(suggestion: &RewriteSuggestion) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rewrite for {}", suggestion.sense.title());
    for (i, (original, rewritten)) in suggestion
        .original_sentences
        .iter()
        .zip(&suggestion.rewritten_sentences)
        .enumerate()
    {
        let _ = writeln!(out, "\n{}. Before: {}", i + 1, original);
        let _ = writeln!(out, "   After:  {}", rewritten);
    }
    if !suggestion.explanation.is_empty() {
        let _ = writeln!(out, "\nWhy: {}", suggestion.explanation);
    }
    if !suggestion.improvement.is_empty() {
        let _ = writeln!(out, "Effect: {}", suggestion.improvement);
    }
    out
}

pub fn render_heuristic(report: &HeuristicReport) -> String {
    let mut out = String::new();
    let overall = &report.overall_analysis;
    let _ = writeln!(out, "{}", overall.improvement_summary);

    for (i, suggestion) in report.suggestions.iter().enumerate() {
        let senses: Vec<&str> = suggestion.senses_improved.iter().map(Sense::as_str).collect();
        let _ = writeln!(out, "\n{}. [{}]", i + 1, senses.join(", "));
        let _ = writeln!(out, "   Before: {}", suggestion.original);
        let _ = writeln!(out, "   After:  {}", suggestion.rewritten);
        let _ = writeln!(out, "   {}", suggestion.explanation);
    }
    out
}

pub fn render_examples(genre: &str, sense: &str, examples: &GenreExamplesResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} / {}", genre, sense);
    let _ = writeln!(out, "{}", examples.explanation);
    for example in &examples.examples {
        let _ = writeln!(out, "  - {}", example);
    }
    out
}

pub fn render_tips(sense: Sense, tips: &ImprovementTipsResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: strategies", sense.title());
    for strategy in &tips.strategies {
        let _ = writeln!(out, "  + {}", strategy);
    }
    let _ = writeln!(out, "{}: common mistakes", sense.title());
    for mistake in &tips.mistakes {
        let _ = writeln!(out, "  - {}", mistake);
    }
    out
}

/// One line per draft: timestamp, genre, focus, analyzed flag, text preview
pub fn render_draft_list(drafts: &[Draft]) -> String {
    if drafts.is_empty() {
        return "No saved drafts.\n".to_string();
    }

    let mut out = String::new();
    for draft in drafts {
        let preview: String = draft.text.chars().take(40).collect();
        let preview = preview.replace('\n', " ");
        let ellipsis = if draft.text.chars().count() > 40 { "..." } else { "" };
        let _ = writeln!(
            out,
            "{}  {:<16} {:<10} {}  {}{}",
            draft.timestamp,
            draft.genre,
            draft.sense,
            if draft.analysis.is_some() { "*" } else { " " },
            preview,
            ellipsis
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> AnalysisResult {
        let mut analysis = AnalysisResult::default();
        analysis.sensory_scores.sight = 8;
        analysis.sensory_scores.sound = 7;
        analysis.sensory_scores.touch = 6;
        analysis.sensory_scores.taste = 1;
        analysis.sensory_scores.smell = 4;
        analysis.analysis_chain_of_thought.taste = "No taste at all.".to_string();
        analysis
    }

    #[test]
    fn test_bar_scales_to_width() {
        assert_eq!(bar(0), "..........");
        assert_eq!(bar(5), "#####.....");
        assert_eq!(bar(10), "##########");
    }

    #[test]
    fn test_analysis_lists_weak_senses_weakest_first() {
        let rendered = render_analysis(&analysis());
        assert!(rendered.contains("Weakest senses: taste (1), smell (4)"));
        assert!(rendered.contains("--sense taste --score 1"));
        assert!(rendered.contains("No taste at all."));
        assert!(!rendered.contains("Record:"));
    }

    #[test]
    fn test_rewrite_pairs_sentences() {
        let suggestion = RewriteSuggestion {
            sense: Sense::Touch,
            original_sentences: vec!["He held the rope.".to_string()],
            rewritten_sentences: vec!["He held the rope, its fibres biting his palms.".to_string()],
            explanation: "Adds texture.".to_string(),
            improvement: String::new(),
        };
        let rendered = render_rewrite(&suggestion);
        assert!(rendered.contains("1. Before: He held the rope."));
        assert!(rendered.contains("After:  He held the rope, its fibres"));
        assert!(!rendered.contains("Effect:"));
    }

    #[test]
    fn test_empty_draft_list() {
        assert_eq!(render_draft_list(&[]), "No saved drafts.\n");
    }
}
