//! Date text normalization.
//!
//! Source pages and model output mix `2025年1月5日`, `2025/1/5`, and
//! free-form text like `来週末`. Recognized forms are rewritten to
//! zero-padded month/day so equal dates compare equal as strings;
//! everything else passes through untouched. No calendar or timezone
//! logic.

use regex::{Captures, Regex};

/// Rewrite all recognized date substrings to zero-padded form.
///
/// `2025年1月5日` becomes `2025年01月05日` and `2025/1/5` becomes
/// `2025/01/05`. The transform is idempotent and leaves unrecognized
/// text unchanged.
pub fn normalize_date_text(text: &str) -> String {
    let japanese = Regex::new(r"(\d{4})年(\d{1,2})月(\d{1,2})日").unwrap();
    let slash = Regex::new(r"(\d{4})/(\d{1,2})/(\d{1,2})").unwrap();

    let text = japanese.replace_all(text, |caps: &Captures| {
        format!("{}年{:02}月{:02}日", &caps[1], pad(&caps[2]), pad(&caps[3]))
    });

    slash
        .replace_all(&text, |caps: &Captures| {
            format!("{}/{:02}/{:02}", &caps[1], pad(&caps[2]), pad(&caps[3]))
        })
        .into_owned()
}

/// Parse a 1-2 digit capture. The regex guarantees digits.
fn pad(digits: &str) -> u32 {
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_japanese_date_is_zero_padded() {
        assert_eq!(normalize_date_text("2025年1月5日"), "2025年01月05日");
    }

    #[test]
    fn test_slash_date_is_zero_padded() {
        assert_eq!(normalize_date_text("2025/1/5"), "2025/01/05");
    }

    #[test]
    fn test_unrecognized_text_passes_through() {
        assert_eq!(normalize_date_text("来週末"), "来週末");
        assert_eq!(normalize_date_text("1月5日ごろ"), "1月5日ごろ");
    }

    #[test]
    fn test_already_padded_is_unchanged() {
        assert_eq!(normalize_date_text("2025年01月05日"), "2025年01月05日");
        assert_eq!(normalize_date_text("2025/11/30"), "2025/11/30");
    }

    #[test]
    fn test_range_normalizes_both_ends() {
        assert_eq!(
            normalize_date_text("2025/7/1〜2025/7/21"),
            "2025/07/01〜2025/07/21",
        );
        assert_eq!(
            normalize_date_text("2025年7月1日から2025年7月3日まで開催"),
            "2025年07月01日から2025年07月03日まで開催",
        );
    }

    #[test]
    fn test_mixed_text_only_rewrites_dates() {
        assert_eq!(
            normalize_date_text("開催日: 2025/8/9 (雨天中止)"),
            "開催日: 2025/08/09 (雨天中止)",
        );
    }
}
