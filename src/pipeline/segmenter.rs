/*!
 * Boundary segmentation of long text.
 *
 * Text is cut into chunks no longer than a character budget, preferring
 * paragraph breaks, then sentence ends, then whitespace between words.
 * Chunks are contiguous slices of the input and every byte between two
 * chunks is kept as that chunk's `separator`, so the input can always be
 * rebuilt exactly from the chunk list.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::Chunk;

/// A blank line: newline, optional whitespace, newline
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

/// Characters that end a sentence and stay attached to it
const SENTENCE_TERMINATORS: &[char] = &['。', '！', '!', '？', '?', '.'];

/// Byte range into the segmented text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

/// Granularity of a split, coarsest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Paragraph,
    Sentence,
    Word,
}

impl Level {
    fn finer(self) -> Option<Level> {
        match self {
            Level::Paragraph => Some(Level::Sentence),
            Level::Sentence => Some(Level::Word),
            Level::Word => None,
        }
    }
}

/// Splits text into chunks of at most `max_chunk_chars` characters
#[derive(Debug, Clone, Copy)]
pub struct BoundarySegmenter {
    max_chunk_chars: usize,
}

impl BoundarySegmenter {
    pub fn new(max_chunk_chars: usize) -> Self {
        Self {
            max_chunk_chars: max_chunk_chars.max(1),
        }
    }

    pub fn max_chunk_chars(&self) -> usize {
        self.max_chunk_chars
    }

    /// Segment `text` into ordered chunks
    pub fn segment(&self, text: &str) -> Vec<Chunk> {
        if char_len(text) <= self.max_chunk_chars {
            return vec![Chunk {
                index: 0,
                text: text.to_string(),
                separator: String::new(),
            }];
        }

        // Leading whitespace belongs to the first chunk and counts toward its size
        let first_content = text.find(|c: char| !c.is_whitespace()).unwrap_or(text.len());
        let pass = SegmentPass {
            text,
            max: self.max_chunk_chars,
            first_content,
        };

        let whole = Span { start: 0, end: text.len() };
        let mut spans = Vec::new();
        pass.pack(pass.units(whole, Level::Paragraph), Level::Paragraph, &mut spans);

        if spans.is_empty() {
            // Whitespace only
            return vec![Chunk {
                index: 0,
                text: text.to_string(),
                separator: String::new(),
            }];
        }

        spans
            .iter()
            .enumerate()
            .map(|(index, span)| {
                let start = if index == 0 { 0 } else { span.start };
                let separator_end = spans.get(index + 1).map_or(text.len(), |next| next.start);
                Chunk {
                    index,
                    text: text[start..span.end].to_string(),
                    separator: text[span.end..separator_end].to_string(),
                }
            })
            .collect()
    }
}

/// Segment `text` with a one-off segmenter
pub fn segment(text: &str, max_chunk_chars: usize) -> Vec<Chunk> {
    BoundarySegmenter::new(max_chunk_chars).segment(text)
}

/// Rebuild the segmented text from its chunks
pub fn reconstruct(chunks: &[Chunk]) -> String {
    let capacity = chunks.iter().map(|c| c.text.len() + c.separator.len()).sum();
    chunks.iter().fold(String::with_capacity(capacity), |mut out, chunk| {
        out.push_str(&chunk.text);
        out.push_str(&chunk.separator);
        out
    })
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// State of a single segmentation run
struct SegmentPass<'a> {
    text: &'a str,
    max: usize,
    /// Byte offset of the first non-whitespace character in `text`
    first_content: usize,
}

impl SegmentPass<'_> {
    /// Characters from `start` to `end`, counting leading whitespace for the first unit
    fn width(&self, start: usize, end: usize) -> usize {
        let from = if start == self.first_content { 0 } else { start };
        char_len(&self.text[from..end])
    }

    /// `start..end` without surrounding whitespace, or None if nothing is left
    fn trimmed(&self, start: usize, end: usize) -> Option<Span> {
        let slice = &self.text[start..end];
        let leading = slice.len() - slice.trim_start().len();
        let trailing = slice.len() - slice.trim_end().len();
        if leading == slice.len() {
            return None;
        }
        Some(Span {
            start: start + leading,
            end: end - trailing,
        })
    }

    /// Non-empty units of `span` at the given level, in order
    fn units(&self, span: Span, level: Level) -> Vec<Span> {
        let slice = &self.text[span.start..span.end];
        let mut units = Vec::new();

        match level {
            Level::Paragraph => {
                let mut piece_start = span.start;
                for found in PARAGRAPH_BREAK.find_iter(slice) {
                    units.extend(self.trimmed(piece_start, span.start + found.start()));
                    piece_start = span.start + found.end();
                }
                units.extend(self.trimmed(piece_start, span.end));
            }
            Level::Sentence => {
                let mut unit_start = span.start;
                for (offset, ch) in slice.char_indices() {
                    let position = span.start + offset;
                    if SENTENCE_TERMINATORS.contains(&ch) {
                        let end = position + ch.len_utf8();
                        units.extend(self.trimmed(unit_start, end));
                        unit_start = end;
                    } else if ch == '\n' {
                        units.extend(self.trimmed(unit_start, position));
                        unit_start = position + 1;
                    }
                }
                units.extend(self.trimmed(unit_start, span.end));
            }
            Level::Word => {
                let mut word_start: Option<usize> = None;
                for (offset, ch) in slice.char_indices() {
                    let position = span.start + offset;
                    match (ch.is_whitespace(), word_start) {
                        (true, Some(start)) => {
                            units.push(Span { start, end: position });
                            word_start = None;
                        }
                        (false, None) => word_start = Some(position),
                        _ => {}
                    }
                }
                if let Some(start) = word_start {
                    units.push(Span { start, end: span.end });
                }
            }
        }

        units
    }

    /// Greedily merge `units` into spans that fit the budget, splitting
    /// oversized units at the next finer level
    fn pack(&self, units: Vec<Span>, level: Level, out: &mut Vec<Span>) {
        let mut current: Option<Span> = None;

        for unit in units {
            if self.width(unit.start, unit.end) > self.max {
                if let Some(done) = current.take() {
                    out.push(done);
                }
                match level.finer() {
                    Some(finer) => self.pack(self.units(unit, finer), finer, out),
                    // A single word longer than the budget stays whole
                    None => out.push(unit),
                }
                continue;
            }

            current = match current {
                Some(cur) if self.width(cur.start, unit.end) <= self.max => Some(Span {
                    start: cur.start,
                    end: unit.end,
                }),
                Some(cur) => {
                    out.push(cur);
                    Some(unit)
                }
                None => Some(unit),
            };
        }

        if let Some(done) = current {
            out.push(done);
        }
    }
}
