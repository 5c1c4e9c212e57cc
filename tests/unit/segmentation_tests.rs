/*!
 * Property tests for segmentation and extraction on transcript-like input
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use transcript_digest::pipeline::{
    BoundarySegmenter, RandomSampler, SequentialSampler, extract, reconstruct, segment,
};

const EN_SENTENCES: &[&str] = &[
    "So today we are going to talk about the quarterly numbers.",
    "Um, I think the main point is that growth slowed down.",
    "Let me share my screen real quick",
    "Does anyone have questions?",
    "The deadline is next Friday!",
];

const JA_SENTENCES: &[&str] = &[
    "えーと、今日は新しい企画について話します。",
    "まず予算の確認をしましょう。",
    "これは重要なポイントです！",
    "質問はありますか？",
];

/// Transcript of `paragraphs` paragraphs built from canned sentences
fn transcript(rng: &mut StdRng, paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|_| {
            let sentences = rng.random_range(1..8);
            (0..sentences)
                .map(|_| {
                    if rng.random_bool(0.3) {
                        JA_SENTENCES[rng.random_range(0..JA_SENTENCES.len())]
                    } else {
                        EN_SENTENCES[rng.random_range(0..EN_SENTENCES.len())]
                    }
                })
                .collect::<Vec<_>>()
                .join(if rng.random_bool(0.2) { "\n" } else { " " })
        })
        .collect::<Vec<_>>()
        .join(if rng.random_bool(0.5) { "\n\n" } else { "\n  \n" })
}

#[test]
fn test_segment_withGeneratedTranscripts_shouldReconstructLosslessly() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..50 {
        let paragraphs = rng.random_range(1..40);
        let text = transcript(&mut rng, paragraphs);
        let max = rng.random_range(60..600);

        let chunks = segment(&text, max);

        assert_eq!(reconstruct(&chunks), text);
        for chunk in &chunks {
            // Canned sentences are shorter than any max used here
            assert!(chunk.char_len() <= max, "{} > {}", chunk.char_len(), max);
        }
    }
}

#[test]
fn test_segment_withTextWithinLimit_shouldReturnInputAsOnlyChunk() {
    let mut rng = StdRng::seed_from_u64(5);
    let text = transcript(&mut rng, 3);
    let chunks = BoundarySegmenter::new(text.chars().count()).segment(&text);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);
}

#[test]
fn test_segment_withBlankLineBetweenLargeParagraphs_shouldSplitThere() {
    let first = "a".repeat(3000);
    let second = "b".repeat(3000);
    let chunks = segment(&format!("{}\n\n{}", first, second), 4000);
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec![first.as_str(), second.as_str()]);
}

#[test]
fn test_segment_withLargeTranscript_shouldPackChunksNearLimit() {
    let mut rng = StdRng::seed_from_u64(11);
    let text = transcript(&mut rng, 200);
    let max = 4000;

    let chunks = segment(&text, max);

    // Greedy packing leaves at most one short chunk per boundary
    let total = text.chars().count();
    assert!(chunks.len() <= total / (max / 2) + 2, "{} chunks for {} chars", chunks.len(), total);
    assert_eq!(reconstruct(&chunks), text);
}

#[test]
fn test_extract_withGeneratedTranscripts_shouldStayWithinBudget() {
    let mut rng = StdRng::seed_from_u64(99);
    for seed in 0..30 {
        let text = transcript(&mut rng, 60);
        let max = 1500;
        let mut sampler = RandomSampler::seeded(seed);

        let reduced = extract(&text, max, &mut sampler);

        assert!(reduced.chars().count() <= max, "{} > {}", reduced.chars().count(), max);
        let first_paragraph = text.split("\n\n").next().unwrap().split("\n  \n").next().unwrap().trim();
        assert!(reduced.starts_with(first_paragraph));
    }
}

#[test]
fn test_extract_withLongOpeningMonologue_shouldKeepConclusionWithinBudget() {
    let mut rng = StdRng::seed_from_u64(5);
    let opening = EN_SENTENCES.iter().cycle().take(80).copied().collect::<Vec<_>>().join(" ");
    let text = format!("{}\n\n{}\n\nIn conclusion, we ship on Friday.", opening, transcript(&mut rng, 10));

    for max in [200, 800, 2000] {
        let reduced = extract(&text, max, &mut RandomSampler::seeded(max as u64));

        assert!(reduced.chars().count() <= max, "{} > {}", reduced.chars().count(), max);
        assert!(reduced.ends_with("In conclusion, we ship on Friday."));
    }
}

#[test]
fn test_extract_withSameSeed_shouldBeReproducible() {
    let mut rng = StdRng::seed_from_u64(3);
    let text = transcript(&mut rng, 80);

    let a = extract(&text, 2000, &mut RandomSampler::seeded(17));
    let b = extract(&text, 2000, &mut RandomSampler::seeded(17));

    assert_eq!(a, b);
}

#[test]
fn test_extract_withSequentialSampler_shouldPreferEarlierParagraphs() {
    let paragraphs: Vec<String> = (0..20).map(|i| format!("plain paragraph number {:02}", i)).collect();
    let text = paragraphs.join("\n\n");

    let reduced = extract(&text, 200, &mut SequentialSampler);

    assert!(reduced.contains("number 01"));
    assert!(!reduced.contains("number 15"));
    assert!(reduced.ends_with("number 19"));
}
