//! LLM prompts for event extraction.
//!
//! The extraction prompt asks for a bare JSON array. Models do not
//! reliably comply, which is why the repair stage exists; the prompt
//! still states the rules so that compliant responses parse directly.

use sha2::{Digest, Sha256};

use crate::types::config::DateRange;

/// Prompt for extracting event records from harvested page text.
pub const EXTRACT_PROMPT: &str = r#"あなたはトレンドリサーチャーです。
以下のWebページ本文から「{query}」に該当する情報を抽出してください。

【条件】
- ページ本文に書かれている情報だけを使うこと。推測で項目を作らないこと。
{period_section}- 出力はJSON配列のみ。コードフェンスや説明文を付けないこと。
- 該当情報がない場合は [] を出力すること。

【出力形式】
[
  {
    "name": "イベント・商品名",
    "place": "開催場所・店舗名",
    "date_info": "開催日・発売日（例: 2025年08月01日、2025/08/01〜2025/08/03）",
    "description": "1〜2文の説明",
    "source_name": "情報元ページの名前",
    "source_url": "情報元ページのURL",
    "lat": null,
    "lon": null
  }
]

【ページ本文】
{content}"#;

/// Format the extraction prompt.
pub fn format_extract_prompt(query: &str, period: Option<&DateRange>, content: &str) -> String {
    let period_section = match period {
        Some(range) => format!(
            "- 【{}】から【{}】までの期間に含まれる情報に限ること。過去のイベントは除くこと。\n",
            range.start, range.end,
        ),
        None => String::new(),
    };

    EXTRACT_PROMPT
        .replace("{query}", query)
        .replace("{period_section}", &period_section)
        .replace("{content}", content)
}

/// Hash of the extraction prompt, for callers that cache model responses
/// keyed on page content and want prompt changes to invalidate them.
pub fn extract_prompt_hash() -> String {
    let mut hasher = Sha256::new();
    hasher.update(EXTRACT_PROMPT.as_bytes());
    format!("{:x}", hasher.finalize())
}
