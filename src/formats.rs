/*!
 * Summary format registry.
 *
 * A fixed set of named summary formats, each contributing a prompt suffix
 * that tells the model how to lay out its summary. The registry is built
 * once and shared read-only; unknown keys resolve to `standard`.
 */

use log::warn;
use once_cell::sync::Lazy;

use crate::language_utils::PromptLanguage;

/// Key of the fallback format
pub const DEFAULT_FORMAT_KEY: &str = "standard";

/// A single summary format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    /// Registry key, e.g. "bullet"
    pub key: &'static str,
    /// Human readable name
    pub name: &'static str,
    /// Short description for listings
    pub description: &'static str,
    /// Prompt modifier in English
    pub prompt_suffix_en: &'static str,
    /// Prompt modifier in Japanese
    pub prompt_suffix_ja: &'static str,
}

impl FormatSpec {
    /// The prompt modifier matching the prompt wording
    pub fn prompt_suffix(&self, language: PromptLanguage) -> &'static str {
        match language {
            PromptLanguage::Japanese => self.prompt_suffix_ja,
            PromptLanguage::English => self.prompt_suffix_en,
        }
    }
}

const MEETING_SUFFIX_EN: &str = "Create proper meeting minutes in Markdown from the meeting transcript below. Do not output JSON; use this Markdown layout:
## Date
The meeting date if it can be determined from the text, otherwise \"not stated\".

## Attendees
- Member 1
- Member 2 (role)

## Summary
A summary of what was discussed.

### Main topics and conclusions
Topics and their conclusions

### Key decisions
Decisions that were made

### Options discussed
Options or alternatives that were considered

## Tasks
- [ ] Task 1 @owner (due date)
- [ ] Task 2 @owner (due date)

Output well organized, human readable minutes rather than structured data.";

const MEETING_SUFFIX_JA: &str = "以下の会議の文字起こしから、適切な会議議事録をMarkdown形式で作成してください。JSONではなく、以下のようなMarkdown形式で出力してください：
## 開催日
文中から特定できる会議日時を記載してください。特定できない場合は「記載なし」としてください。

## 参加メンバー
- メンバー1
- メンバー2（役職）

## 内容まとめ
会議で議論された主な内容の要約を記載してください。

### 主な議題と結論
議題と結論の説明

### 重要な決定事項
決定事項の説明

### 議論されたオプションや選択肢
オプションや選択肢の説明

## タスク
- [ ] タスク1 @担当者（期限）
- [ ] タスク2 @担当者（期限）

以上を、整理された議事録形式で出力してください。JSONのような構造化データではなく、人間が読みやすいMarkdown形式にしてください。";

static FORMATS: Lazy<Vec<FormatSpec>> = Lazy::new(|| {
    vec![
        FormatSpec {
            key: "standard",
            name: "Standard",
            description: "Ordinary paragraph summary",
            prompt_suffix_en: "Summarize the text and output it as paragraphs.",
            prompt_suffix_ja: "文章を要約して段落形式で出力してください。",
        },
        FormatSpec {
            key: "bullet",
            name: "Bullet points",
            description: "Key points as a bulleted list",
            prompt_suffix_en: "Summarize the text and list the important points as bullets (lines starting with \"- \").",
            prompt_suffix_ja: "文章を要約して、重要なポイントを箇条書き（- で始まる行）形式で出力してください。",
        },
        FormatSpec {
            key: "headline",
            name: "Headlines",
            description: "Headings with a short explanation under each",
            prompt_suffix_en: "Summarize the text, present the main topics as \"## Heading\" lines and add a brief explanation under each heading.",
            prompt_suffix_ja: "文章を要約して、主要な話題を「## 見出し」形式で示し、各見出しの下に簡潔な説明を追加してください。",
        },
        FormatSpec {
            key: "qa",
            name: "Q&A",
            description: "Questions and answers",
            prompt_suffix_en: "Based on the text, summarize the important points as questions and answers. Start each question with \"Q:\" and each answer with \"A:\".",
            prompt_suffix_ja: "文章の内容に基づいて、重要なポイントを質問と回答の形式でまとめてください。各質問は「Q:」で始め、回答は「A:」で始めてください。",
        },
        FormatSpec {
            key: "executive",
            name: "Executive summary",
            description: "Concise summary for decision makers",
            prompt_suffix_en: "Write a concise executive summary of this business document covering purpose, conclusions and recommendations.",
            prompt_suffix_ja: "ビジネス文書のエグゼクティブサマリーとして、目的、結論、推奨事項を含む簡潔な要約を作成してください。",
        },
        FormatSpec {
            key: "meeting",
            name: "Meeting minutes",
            description: "Minutes with date, attendees, content and tasks",
            prompt_suffix_en: MEETING_SUFFIX_EN,
            prompt_suffix_ja: MEETING_SUFFIX_JA,
        },
    ]
});

/// Read-only access to the format registry
pub struct FormatRegistry;

impl FormatRegistry {
    /// All formats in display order
    pub fn all() -> &'static [FormatSpec] {
        FORMATS.as_slice()
    }

    /// Exact lookup
    pub fn get(key: &str) -> Option<&'static FormatSpec> {
        FORMATS.iter().find(|f| f.key == key)
    }

    /// The `standard` format
    pub fn standard() -> &'static FormatSpec {
        // The registry is a fixed literal that always contains the default key
        &FORMATS[0]
    }

    /// Lookup that never fails: unknown keys fall back to `standard`
    pub fn resolve(key: &str) -> &'static FormatSpec {
        let normalized = key.trim().to_lowercase();
        match Self::get(&normalized) {
            Some(spec) => spec,
            None => {
                warn!("Unknown summary format '{}', using '{}'", key, DEFAULT_FORMAT_KEY);
                Self::standard()
            }
        }
    }
}
