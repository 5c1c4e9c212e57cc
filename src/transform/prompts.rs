/*!
 * Prompt templates for transcript transformation.
 *
 * Each task has a Japanese and an English wording; the wording is picked
 * from the transcript language and the format's prompt suffix is spliced in.
 */

use crate::formats::FormatSpec;
use crate::language_utils::PromptLanguage;

/// The transformation a prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Correct recognition errors, then summarize the corrected text
    CorrectAndSummarize,
    /// Summarize only
    SummarizeOnly,
    /// Merge summaries of consecutive parts into one
    Recondense,
}

/// A prompt template with `{format_instructions}` and `{text}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: &'static str,
}

impl PromptTemplate {
    pub const CORRECT_AND_SUMMARIZE_EN: &'static str = "Below is a transcription text generated by speech recognition. This text may contain recognition errors, unnatural expressions, punctuation issues, etc.

First, please correct this text into natural English. When making corrections, fix obvious recognition errors, make it grammatically correct, and ensure it's easy to read.
Next, create a summary of the corrected text. {format_instructions}

Please provide both the correction and summary in the following format, NOT in JSON:

==== CORRECTED TEXT ====
(corrected text goes here)

==== SUMMARY ====
(summary goes here)

Original text:
{text}";

    pub const CORRECT_AND_SUMMARIZE_JA: &'static str = "以下は音声認識によって生成された文字起こしテキストです。このテキストには認識エラーや不自然な表現、句読点の問題などがある可能性があります。

まず、このテキストを自然な日本語に補正してください。補正の際は、明らかな認識ミスを修正し、文法的に正しく、読みやすい文章にしてください。
次に、補正したテキストの要約を作成してください。{format_instructions}

補正と要約の両方をJSON形式ではなく、以下のフォーマットで出力してください：

==== 補正テキスト ====
（補正された文章をここに記載）

==== 要約 ====
（要約をここに記載）

元のテキスト:
{text}";

    pub const SUMMARIZE_ONLY_EN: &'static str = "Summarize the following text. {format_instructions}

Please output as normal text, not in JSON format.

Target text:
{text}";

    pub const SUMMARIZE_ONLY_JA: &'static str = "以下のテキストを要約してください。{format_instructions}

JSONではなく、通常のテキスト形式で出力してください。

対象テキスト:
{text}";

    pub const RECONDENSE_EN: &'static str = "The following text combines the summaries of consecutive parts of one document. Merge them into a single concise summary of the whole. {format_instructions}

Please output as normal text, not in JSON format.

{text}";

    pub const RECONDENSE_JA: &'static str = "以下は複数の要約をまとめたものです。全体をまとめて簡潔な要約を作成してください。{format_instructions}

JSONではなく、通常のテキスト形式で出力してください。

{text}";

    /// Template for a task in the given wording
    pub fn for_kind(kind: PromptKind, language: PromptLanguage) -> Self {
        let template = match (kind, language) {
            (PromptKind::CorrectAndSummarize, PromptLanguage::English) => Self::CORRECT_AND_SUMMARIZE_EN,
            (PromptKind::CorrectAndSummarize, PromptLanguage::Japanese) => Self::CORRECT_AND_SUMMARIZE_JA,
            (PromptKind::SummarizeOnly, PromptLanguage::English) => Self::SUMMARIZE_ONLY_EN,
            (PromptKind::SummarizeOnly, PromptLanguage::Japanese) => Self::SUMMARIZE_ONLY_JA,
            (PromptKind::Recondense, PromptLanguage::English) => Self::RECONDENSE_EN,
            (PromptKind::Recondense, PromptLanguage::Japanese) => Self::RECONDENSE_JA,
        };
        Self { template }
    }

    /// Render the template with the given variables.
    pub fn render(&self, format_instructions: &str, text: &str) -> String {
        // Text goes last so placeholders inside the transcript stay untouched
        self.template
            .replace("{format_instructions}", format_instructions)
            .replace("{text}", text)
    }
}

/// Build the full prompt for `text`
pub fn build_prompt(kind: PromptKind, language_code: &str, format: &FormatSpec, text: &str) -> String {
    let language = PromptLanguage::for_code(language_code);
    PromptTemplate::for_kind(kind, language).render(format.prompt_suffix(language), text)
}
