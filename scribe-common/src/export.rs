//! Plain text and Markdown reports for a draft and its analysis

use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::str::FromStr;

use crate::client_store::Draft;
use crate::senses::Sense;
use crate::Error;

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Md,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Md => "md",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Txt),
            "md" | "markdown" => Ok(ExportFormat::Md),
            other => Err(Error::InvalidInput(format!(
                "Unknown export format \"{}\". Must be one of: txt, md",
                other
            ))),
        }
    }
}

/// `sensory-analysis-<genre>-<YYYY-MM-DD>.<ext>`, genre slugified
pub fn generate_filename(format: ExportFormat, genre: &str, date: DateTime<Utc>) -> String {
    let mut slug = String::new();
    for c in genre.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "untitled" } else { slug };

    format!(
        "sensory-analysis-{}-{}.{}",
        slug,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Render a draft as a report in the given format
pub fn render_report(draft: &Draft, format: ExportFormat) -> String {
    match format {
        ExportFormat::Txt => render_txt(draft),
        ExportFormat::Md => render_md(draft),
    }
}

fn render_txt(draft: &Draft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SENSORY WRITING ANALYSIS");
    let _ = writeln!(out, "========================");
    let _ = writeln!(out, "Date: {}", draft.timestamp);
    let _ = writeln!(out, "Genre: {}", draft.genre);
    let _ = writeln!(out, "Focus Sense: {}", draft.sense);
    let _ = writeln!(out);

    if let Some(analysis) = &draft.analysis {
        let _ = writeln!(out, "SCORES");
        let _ = writeln!(out, "------");
        for (sense, score) in analysis.sensory_scores.iter() {
            let _ = writeln!(out, "{:<6} {:>2}/10", sense.title(), score);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "NOTES");
        let _ = writeln!(out, "-----");
        for sense in Sense::ALL {
            let note = analysis.analysis_chain_of_thought.get(sense);
            if !note.is_empty() {
                let _ = writeln!(out, "{}: {}", sense.title(), note);
            }
            for phrase in analysis.highlight_phrases.get(sense) {
                let _ = writeln!(out, "  - \"{}\"", phrase);
            }
        }
        let _ = writeln!(out);
    } else {
        let _ = writeln!(out, "(not analyzed)");
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "ORIGINAL TEXT");
    let _ = writeln!(out, "-------------");
    let _ = writeln!(out, "{}", draft.text);
    out
}

fn render_md(draft: &Draft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Sensory Writing Analysis");
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Date:** {}", draft.timestamp);
    let _ = writeln!(out, "- **Genre:** {}", draft.genre);
    let _ = writeln!(out, "- **Focus Sense:** {}", draft.sense);
    let _ = writeln!(out);

    if let Some(analysis) = &draft.analysis {
        let _ = writeln!(out, "## Scores");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Sense | Score |");
        let _ = writeln!(out, "|-------|-------|");
        for (sense, score) in analysis.sensory_scores.iter() {
            let _ = writeln!(out, "| {} | {}/10 |", sense.title(), score);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "## Breakdown");
        for sense in Sense::ALL {
            let _ = writeln!(out);
            let _ = writeln!(out, "### {}", sense.title());
            let note = analysis.analysis_chain_of_thought.get(sense);
            if !note.is_empty() {
                let _ = writeln!(out);
                let _ = writeln!(out, "{}", note);
            }
            let phrases = analysis.highlight_phrases.get(sense);
            if !phrases.is_empty() {
                let _ = writeln!(out);
                for phrase in phrases {
                    let _ = writeln!(out, "- \"{}\"", phrase);
                }
            }
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## Original Text");
    let _ = writeln!(out);
    for line in draft.text.lines() {
        let _ = writeln!(out, "> {}", line);
    }
    out
}
