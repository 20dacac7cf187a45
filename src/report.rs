//! Plain-text field report: readings, model verdict, per-topic assessment and
//! the chat transcript, laid out on fixed-height pages separated by form feeds.

use crate::error::{Result, RiceIntelError};
use crate::logic::AdvisoryEngine;
use crate::ml::VerdictSource;
use crate::models::{format_value, Feature, Reading, Transcript, Verdict};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub const LINES_PER_PAGE: usize = 56;
pub const LINE_WIDTH: usize = 78;

/// Everything a report is built from.
pub struct ReportInput<'a> {
    pub snapshot: Option<&'a Reading>,
    pub verdict: Option<&'a Verdict>,
    pub transcript: &'a Transcript,
}

pub fn render(
    input: &ReportInput<'_>,
    engine: &AdvisoryEngine,
    predictor: &dyn VerdictSource,
    generated_at: DateTime<Local>,
) -> Result<String> {
    let (reading, verdict) = match (input.snapshot, input.verdict) {
        (Some(r), Some(v)) => (r, v),
        _ => {
            return Err(RiceIntelError::NoData(
                "analyze field conditions before exporting a report".into(),
            ))
        }
    };

    let mut body: Vec<String> = Vec::new();
    body.push(format!(
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    body.push(String::new());

    body.push("FIELD READINGS".into());
    for feature in Feature::ALL {
        body.push(format!(
            "  {:<20} {}{}",
            feature.label(),
            format_value(reading.get(feature)),
            feature.unit()
        ));
    }
    body.push(String::new());

    body.push("MODEL VERDICT".into());
    body.push(format!("  {}", verdict.headline()));
    body.push(format!(
        "  Model Accuracy: {:.2}%",
        verdict.accuracy_percent()
    ));
    body.push(String::new());

    body.push("ASSESSMENT".into());
    for advice in engine.evaluate_all(reading, predictor) {
        let prefix = format!("  [{}] ", advice.topic);
        push_wrapped(&mut body, &prefix, &advice.message);
    }
    body.push(String::new());

    body.push("CONVERSATION".into());
    if input.transcript.is_empty() {
        body.push("  (no messages)".into());
    }
    for turn in input.transcript.turns() {
        let prefix = format!("  {}: ", turn.speaker);
        push_wrapped(&mut body, &prefix, &turn.text);
    }

    Ok(paginate(&body))
}

/// Render and write the report into `dir`, returning the file path.
pub fn export(
    input: &ReportInput<'_>,
    engine: &AdvisoryEngine,
    predictor: &dyn VerdictSource,
    dir: &Path,
) -> Result<PathBuf> {
    let now = Local::now();
    let text = render(input, engine, predictor, now)?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "riceintel-report-{}.txt",
        now.format("%Y%m%d-%H%M%S")
    ));
    std::fs::write(&path, text)?;

    tracing::info!("Report written to {}", path.display());
    Ok(path)
}

/// Wrap `text` to [`LINE_WIDTH`], indenting continuation lines under the prefix.
/// Words wider than the space after the indent are split across lines.
fn push_wrapped(out: &mut Vec<String>, prefix: &str, text: &str) {
    let indent = " ".repeat(prefix.chars().count());
    let room = LINE_WIDTH.saturating_sub(indent.chars().count()).max(1);
    let mut line = prefix.to_string();
    let mut line_has_word = false;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(room) {
            let len = line.chars().count();
            let sep = usize::from(line_has_word);
            if line_has_word && len + sep + chunk.len() > LINE_WIDTH {
                out.push(std::mem::replace(&mut line, indent.clone()));
                line_has_word = false;
            }
            if line_has_word {
                line.push(' ');
            }
            line.extend(chunk);
            line_has_word = true;
        }
    }
    out.push(line);
}

fn paginate(body: &[String]) -> String {
    // Header line + blank line on every page
    let per_page = LINES_PER_PAGE - 2;
    let pages: Vec<&[String]> = body.chunks(per_page).collect();
    let total = pages.len();

    pages
        .iter()
        .enumerate()
        .map(|(i, lines)| {
            let mut page = format!(
                "RICE INTEL FIELD REPORT{:>width$}\n\n",
                format!("Page {} of {}", i + 1, total),
                width = LINE_WIDTH - "RICE INTEL FIELD REPORT".len()
            );
            for line in lines.iter() {
                page.push_str(line);
                page.push('\n');
            }
            page
        })
        .collect::<Vec<_>>()
        .join("\x0c")
}
