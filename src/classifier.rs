//! Keyword-based category membership.
//!
//! Classification is a lookup in a static rule table followed by a substring
//! scan over the lower-cased title and content. The table is independent of
//! the server-reported category counts; the two are never reconciled.

use crate::model::Article;

/// Category name paired with its ordered keyword list.
pub type CategoryRule = (&'static str, &'static [&'static str]);

/// Keyword table. Keywords are lower-case substrings.
pub const CATEGORY_KEYWORDS: &[CategoryRule] = &[
    (
        "Machine Learning",
        &["machine learning", "ml", "neural network", "deep learning"],
    ),
    (
        "Natural Language Processing",
        &["nlp", "language model", "chatbot", "gpt"],
    ),
    (
        "Computer Vision",
        &["computer vision", "image", "vision", "detection"],
    ),
    ("Robotics", &["robot", "robotics", "autonomous"]),
    ("Ethics & AI", &["ethics", "bias", "fairness", "regulation"]),
    ("Business & AI", &["business", "startup", "investment", "market"]),
    ("Research", &["research", "paper", "study", "academic"]),
];

/// Keywords for `category`, or `None` when the table has no entry.
pub fn keywords_for(category: &str) -> Option<&'static [&'static str]> {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, keywords)| *keywords)
}

/// Returns true iff any keyword of `category` occurs in the article's title
/// or content, ignoring case. Categories missing from the table match nothing.
pub fn classify(article: &Article, category: &str) -> bool {
    let Some(keywords) = keywords_for(category) else {
        return false;
    };

    let text = searchable_text(article);
    keywords.iter().any(|keyword| text.contains(keyword))
}

fn searchable_text(article: &Article) -> String {
    let mut text = String::with_capacity(article.title.len() + article.content.len() + 1);
    text.push_str(&article.title);
    text.push(' ');
    text.push_str(&article.content);
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn article(title: &str, content: &str) -> Article {
        Article {
            id: "id".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            source: "Test".to_string(),
            published: Utc::now(),
            link: "https://example.com".to_string(),
            sentiment: None,
            ai_summary: None,
            summary: None,
        }
    }

    #[test]
    fn test_language_model_title_is_nlp_not_robotics() {
        let a = article("New Transformer-based Language Model Released", "");
        assert!(classify(&a, "Natural Language Processing"));
        assert!(!classify(&a, "Robotics"));
    }

    #[test]
    fn test_keyword_in_content_matches() {
        let a = article("Weekly roundup", "A new humanoid ROBOT walks");
        assert!(classify(&a, "Robotics"));
    }

    #[test]
    fn test_substring_match_is_not_word_bounded() {
        // "html" contains "ml"
        let a = article("Rendering HTML faster", "");
        assert!(classify(&a, "Machine Learning"));
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let a = article("Research paper on robots", "machine learning everywhere");
        assert!(!classify(&a, "General"));
        assert!(!classify(&a, "all"));
        assert!(!classify(&a, ""));
        assert!(!classify(&a, "research"));
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(keywords_for("Robotics"), Some(&["robot", "robotics", "autonomous"][..]));
        assert!(keywords_for("Quantum").is_none());
        assert_eq!(CATEGORY_KEYWORDS.len(), 7);
    }

    #[test]
    fn test_title_and_content_joined_with_separator() {
        // "m" + "l" must not join across the title/content boundary
        let a = article("Team", "led the effort");
        assert!(!classify(&a, "Machine Learning"));
    }

    fn category_name() -> impl Strategy<Value = String> {
        prop_oneof![
            (0..CATEGORY_KEYWORDS.len()).prop_map(|i| CATEGORY_KEYWORDS[i].0.to_string()),
            "[A-Za-z &]{0,30}",
        ]
    }

    proptest! {
        #[test]
        fn prop_case_insensitive(
            title in "[ -~]{0,60}",
            content in "[ -~]{0,120}",
            category in category_name(),
        ) {
            let lower = article(&title, &content);
            let upper = article(&title.to_uppercase(), &content.to_uppercase());
            prop_assert_eq!(classify(&lower, &category), classify(&upper, &category));
        }

        #[test]
        fn prop_unknown_category_never_matches(
            title in "[ -~]{0,60}",
            content in "[ -~]{0,120}",
            category in "[ -~]{0,30}",
        ) {
            prop_assume!(keywords_for(&category).is_none());
            prop_assert!(!classify(&article(&title, &content), &category));
        }
    }
}
