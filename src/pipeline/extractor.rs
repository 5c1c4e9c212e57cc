/*!
 * Importance-based pre-filtering of oversized input.
 *
 * When a transcript is longer than the input budget, only a subset of its
 * paragraphs is kept: the opening and closing paragraphs, paragraphs that
 * look important (keywords, list items), and then a sampled fill of the
 * leftovers until the budget is used up.
 */

use log::debug;
use once_cell::sync::Lazy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use regex::Regex;

/// Joins kept paragraphs in the output
const PARAGRAPH_JOIN: &str = "\n\n";

/// Appended to a truncated closing paragraph
const TRUNCATION_MARK: char = '…';

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*[・\-\*]|\d+\.)").expect("list marker pattern is valid"));

/// English importance keywords, lowercase
pub const KEYWORDS_EN: &[&str] = &[
    "important",
    "note",
    "key point",
    "conclusion",
    "decision",
    "decided",
    "task",
    "action item",
    "issue",
    "goal",
    "summary",
    "policy",
    "strategy",
    "confirm",
    "agree",
    "proposal",
];

/// Japanese importance keywords
pub const KEYWORDS_JA: &[&str] = &[
    "重要", "注意", "ポイント", "結論", "決定", "タスク", "課題", "目標", "要約", "まとめ", "総括", "方針", "戦略",
    "確認", "合意", "提案",
];

/// Chooses the order in which leftover paragraphs are offered to the fill pass
pub trait ParagraphSampler: Send {
    /// Reorder candidate paragraph indices in place
    fn arrange(&mut self, candidates: &mut [usize]);
}

/// Shuffles candidates, reproducibly when seeded
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when a seed is given, otherwise OS entropy
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os_rng, Self::seeded)
    }
}

impl ParagraphSampler for RandomSampler {
    fn arrange(&mut self, candidates: &mut [usize]) {
        candidates.shuffle(&mut self.rng);
    }
}

/// Keeps candidates in document order
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialSampler;

impl ParagraphSampler for SequentialSampler {
    fn arrange(&mut self, _candidates: &mut [usize]) {}
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Whether a paragraph mentions a keyword or starts like a list item
pub fn is_important(paragraph: &str) -> bool {
    let lowered = paragraph.to_lowercase();
    KEYWORDS_EN.iter().any(|k| lowered.contains(k))
        || KEYWORDS_JA.iter().any(|k| paragraph.contains(k))
        || LIST_MARKER.is_match(paragraph)
}

/// `text` cut to `budget` characters, the last one being the truncation mark
fn truncate_with_mark(text: &str, budget: usize) -> String {
    if budget == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(budget - 1).collect();
    out.push(TRUNCATION_MARK);
    out
}

/// Reduce `text` to at most `max_length` characters of its most relevant paragraphs
///
/// Text already within the budget is returned unchanged.
pub fn extract(text: &str, max_length: usize, sampler: &mut dyn ParagraphSampler) -> String {
    if char_len(text) <= max_length {
        return text.to_string();
    }

    let paragraphs: Vec<&str> = PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    // A single paragraph can only be shortened
    if paragraphs.len() < 2 || max_length <= char_len(PARAGRAPH_JOIN) {
        let only = paragraphs.first().copied().unwrap_or_default();
        return truncate_with_mark(only, max_length);
    }

    let separator = char_len(PARAGRAPH_JOIN);
    let last_index = paragraphs.len() - 1;
    let last = paragraphs[last_index];
    let reserve = separator + char_len(last);

    // The closing paragraph always keeps up to half of the budget
    let closing_floor = char_len(last).min(max_length.saturating_sub(separator) / 2);
    let first_budget = max_length.saturating_sub(separator + closing_floor);
    let first = if char_len(paragraphs[0]) > first_budget {
        truncate_with_mark(paragraphs[0], first_budget)
    } else {
        paragraphs[0].to_string()
    };

    let mut used = char_len(&first);
    let mut selected = vec![false; paragraphs.len()];

    let fits = |used: usize, candidate: &str| used + separator + char_len(candidate) + reserve <= max_length;

    // Keyword and list paragraphs first
    let mut important = 0;
    for index in 1..last_index {
        let paragraph = paragraphs[index];
        if is_important(paragraph) && fits(used, paragraph) {
            used += separator + char_len(paragraph);
            selected[index] = true;
            important += 1;
        }
    }

    // Sampled fill from what is left
    let mut leftovers: Vec<usize> = (1..last_index).filter(|i| !selected[*i]).collect();
    sampler.arrange(&mut leftovers);
    let mut filled = 0;
    for index in leftovers {
        let paragraph = paragraphs[index];
        if fits(used, paragraph) {
            used += separator + char_len(paragraph);
            selected[index] = true;
            filled += 1;
        }
    }

    let closing = if used + reserve <= max_length {
        last.to_string()
    } else {
        truncate_with_mark(last, max_length.saturating_sub(used + separator))
    };

    debug!(
        "Extracted {} of {} paragraphs ({} important, {} sampled)",
        2 + important + filled,
        paragraphs.len(),
        important,
        filled
    );

    let mut kept: Vec<&str> = Vec::with_capacity(2 + important + filled);
    kept.push(&first);
    kept.extend((1..last_index).filter(|i| selected[*i]).map(|i| paragraphs[i]));
    kept.push(&closing);
    kept.join(PARAGRAPH_JOIN)
}
