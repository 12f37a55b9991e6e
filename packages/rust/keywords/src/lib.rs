//! Search-keyword extraction for article records.
//!
//! Keywords come from three sources, in order: the article's tags, the first
//! few title tokens, and mapped English equivalents of domain terms. Order
//! matters — only the first 3 entries are used to build the search query.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use thumbfill_shared::ArticleRecord;

/// How many title tokens are appended after the tags.
const MAX_TITLE_TOKENS: usize = 3;

/// Splits titles on Japanese/ASCII sentence punctuation and any Unicode
/// whitespace (including the ideographic space U+3000).
static TITLE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[！？。、!?.,\s\u{3000}]+").expect("valid title split regex"));

/// Extract a deduplicated, ordered keyword sequence for an article.
///
/// 1. All tags, in existing order.
/// 2. Title tokens longer than one character, first 3, appended.
/// 3. For every keyword present as a key in `mapping`, the mapped value is
///    appended (the original is retained).
/// 4. Duplicates removed, first occurrence wins.
pub fn extract_keywords(
    article: &ArticleRecord,
    mapping: &BTreeMap<String, String>,
) -> Vec<String> {
    let mut keywords: Vec<String> = article.tags.clone();

    keywords.extend(
        TITLE_SPLIT
            .split(&article.title)
            .filter(|token| token.chars().count() > 1)
            .take(MAX_TITLE_TOKENS)
            .map(String::from),
    );

    let mapped: Vec<String> = keywords
        .iter()
        .filter_map(|k| mapping.get(k).cloned())
        .collect();
    keywords.extend(mapped);

    dedup_preserving_order(keywords)
}

/// Remove duplicates while keeping first-occurrence order.
fn dedup_preserving_order(keywords: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use thumbfill_shared::config::default_keyword_mapping;

    fn article(title: &str, tags: &[&str]) -> ArticleRecord {
        ArticleRecord {
            title: title.into(),
            url: "https://example.com/post".into(),
            description: String::new(),
            date: "2024-01-15".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            client: None,
            thumbnail: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn tags_come_first_in_order() {
        let a = article("irrelevant", &["sleep", "health"]);
        let keywords = extract_keywords(&a, &BTreeMap::new());
        assert_eq!(&keywords[..2], &["sleep".to_string(), "health".to_string()]);
    }

    #[test]
    fn title_tokens_capped_at_three() {
        let a = article("alpha beta gamma delta epsilon", &[]);
        let keywords = extract_keywords(&a, &BTreeMap::new());
        assert_eq!(keywords, ["alpha", "beta", "gamma"]);
    }

    #[test]
    fn single_char_tokens_dropped() {
        let a = article("a bb c dd ee", &[]);
        let keywords = extract_keywords(&a, &BTreeMap::new());
        assert_eq!(keywords, ["bb", "dd", "ee"]);
    }

    #[test]
    fn japanese_punctuation_splits_title() {
        let a = article("睡眠の質を上げる！読書と学習、そして健康。", &[]);
        let keywords = extract_keywords(&a, &BTreeMap::new());
        assert_eq!(keywords, ["睡眠の質を上げる", "読書と学習", "そして健康"]);
    }

    #[test]
    fn mapping_appends_english_equivalents() {
        let a = article("朝の習慣について", &["読書", "健康"]);
        let keywords = extract_keywords(&a, &default_keyword_mapping());
        // Originals retained, mapped values appended after the title tokens.
        assert_eq!(keywords, ["読書", "健康", "朝の習慣について", "book", "health"]);
    }

    #[test]
    fn no_duplicates_first_occurrence_wins() {
        let a = article("sleep study sleep", &["sleep", "study"]);
        let keywords = extract_keywords(&a, &BTreeMap::new());
        assert_eq!(keywords, ["sleep", "study"]);
    }

    #[test]
    fn mapped_value_colliding_with_existing_keyword_not_duplicated() {
        let mut mapping = BTreeMap::new();
        mapping.insert("読書".to_string(), "book".to_string());
        let a = article("book review", &["読書"]);
        let keywords = extract_keywords(&a, &mapping);
        assert_eq!(keywords, ["読書", "book", "review"]);
    }

    #[test]
    fn empty_article_yields_empty_keywords() {
        let a = article("", &[]);
        assert!(extract_keywords(&a, &default_keyword_mapping()).is_empty());
    }
}
