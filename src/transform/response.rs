/*!
 * Parsing of provider replies.
 *
 * Correct-and-summarize replies are read in three passes: explicit section
 * markers, then an embedded JSON object, then a loose line scan for the
 * section headings. Summary-only replies are taken as is.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::TransformOutput;
use crate::errors::TransformError;

/// Characters of the reply kept in a malformed-response error
const ERROR_PREVIEW_CHARS: usize = 200;

static SECTIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)====\s*(?:補正テキスト|CORRECTED TEXT)\s*====(.*?)====\s*(?:要約|SUMMARY)\s*====(.*)$")
        .expect("section pattern is valid")
});

static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("json object pattern is valid"));

#[derive(Debug, Deserialize)]
struct JsonReply {
    corrected_text: String,
    summary: String,
}

fn malformed(reply: &str) -> TransformError {
    let preview: String = reply.chars().take(ERROR_PREVIEW_CHARS).collect();
    TransformError::MalformedResponse(preview)
}

fn both(corrected: &str, summary: &str) -> Option<TransformOutput> {
    let corrected = corrected.trim();
    let summary = summary.trim();
    if corrected.is_empty() || summary.is_empty() {
        return None;
    }
    Some(TransformOutput {
        corrected_text: Some(corrected.to_string()),
        summary: Some(summary.to_string()),
    })
}

fn from_sections(reply: &str) -> Option<TransformOutput> {
    let captures = SECTIONS.captures(reply)?;
    both(captures.get(1)?.as_str(), captures.get(2)?.as_str())
}

fn from_json(reply: &str) -> Option<TransformOutput> {
    let object = JSON_OBJECT.find(reply)?;
    match serde_json::from_str::<JsonReply>(object.as_str()) {
        Ok(parsed) => both(&parsed.corrected_text, &parsed.summary),
        Err(e) => {
            debug!("Reply contains braces but no usable JSON object: {}", e);
            None
        }
    }
}

fn from_lines(reply: &str) -> Option<TransformOutput> {
    #[derive(PartialEq)]
    enum Section {
        None,
        Corrected,
        Summary,
    }

    let mut section = Section::None;
    let mut corrected = String::new();
    let mut summary = String::new();

    for line in reply.lines() {
        let lowered = line.to_lowercase();
        if lowered.contains("corrected text") || line.contains("補正テキスト") {
            section = Section::Corrected;
            continue;
        }
        if lowered.contains("summary") || line.contains("要約") {
            section = Section::Summary;
            continue;
        }
        let target = match section {
            Section::Corrected => &mut corrected,
            Section::Summary => &mut summary,
            Section::None => continue,
        };
        target.push_str(line);
        target.push('\n');
    }

    both(&corrected, &summary)
}

/// Split a correct-and-summarize reply into corrected text and summary
pub fn parse_sectioned(reply: &str) -> Result<TransformOutput, TransformError> {
    from_sections(reply)
        .or_else(|| from_json(reply))
        .or_else(|| from_lines(reply))
        .ok_or_else(|| malformed(reply))
}

/// Read a summary-only reply
pub fn parse_summary(reply: &str) -> Result<TransformOutput, TransformError> {
    let summary = reply.trim();
    if summary.is_empty() {
        return Err(malformed(reply));
    }
    Ok(TransformOutput {
        corrected_text: None,
        summary: Some(summary.to_string()),
    })
}
