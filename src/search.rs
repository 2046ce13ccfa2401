//! Progressive multi-term substring filter.
//!
//! Every record shape (window, tab, running app) exposes the same view to the
//! engine: a list of pre-folded search fragments. A query is whitespace-split
//! into terms and each term narrows the surviving set in turn, which is an
//! AND across terms but keeps each step cheap once the set has shrunk. The
//! result is always an order-preserving subsequence of the input; ranking is
//! the aggregator's business, not ours.

use crate::transliterate::fold;

/// Uniform text-bearing view of a record for matching purposes.
///
/// Fragments are computed once at record construction and already folded
/// (Latin, lowercase, diacritic-free); the engine never mutates them.
pub trait Searchable {
    fn search_strings(&self) -> &[String];
}

/// Filter `items` down to those matching every term of `query`.
///
/// An empty or whitespace-only query returns the input unchanged. Matching
/// is plain substring containment against any fragment, so `"ab"` matches a
/// fragment `"cabbage"`.
pub fn search<T: Searchable>(items: Vec<T>, query: &str) -> Vec<T> {
    let mut survivors = items;
    for term in query.split_whitespace() {
        if survivors.is_empty() {
            break;
        }
        let term = fold(term);
        survivors.retain(|item| {
            item.search_strings()
                .iter()
                .any(|fragment| fragment.contains(&term))
        });
    }
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rec {
        label: &'static str,
        fragments: Vec<String>,
    }

    fn rec(label: &'static str, fragments: &[&str]) -> Rec {
        Rec {
            label,
            fragments: fragments.iter().map(|s| fold(s)).collect(),
        }
    }

    impl Searchable for Rec {
        fn search_strings(&self) -> &[String] {
            &self.fragments
        }
    }

    fn labels(items: &[Rec]) -> Vec<&'static str> {
        items.iter().map(|r| r.label).collect()
    }

    fn corpus() -> Vec<Rec> {
        vec![
            rec("mail", &["Inbox Mail", "Mail"]),
            rec("openai", &["openai", "OpenAI Blog"]),
            rec("example", &["example", "Example"]),
            rec("cafe", &["Café"]),
        ]
    }

    #[test]
    fn empty_query_returns_input_unchanged() {
        assert_eq!(labels(&search(corpus(), "")), vec!["mail", "openai", "example", "cafe"]);
        assert_eq!(labels(&search(corpus(), "   ")), vec!["mail", "openai", "example", "cafe"]);
    }

    #[test]
    fn single_term_substring_match() {
        assert_eq!(labels(&search(corpus(), "box")), vec!["mail"]);
    }

    #[test]
    fn all_terms_must_match_the_same_record() {
        assert_eq!(labels(&search(corpus(), "open blog")), vec!["openai"]);
        assert!(search(corpus(), "open example").is_empty());
    }

    #[test]
    fn matching_is_case_and_diacritic_insensitive() {
        assert_eq!(labels(&search(corpus(), "cafe")), vec!["cafe"]);
        assert_eq!(labels(&search(corpus(), "CAFÉ")), vec!["cafe"]);
    }

    #[test]
    fn unmatched_term_yields_empty_result() {
        assert!(search(corpus(), "xyz").is_empty());
        assert!(search(vec![rec("a", &["abc"])], "xyz").is_empty());
    }

    #[test]
    fn narrowing_composes_left_to_right() {
        let once = search(corpus(), "e blog");
        let twice = search(search(corpus(), "e"), "blog");
        assert_eq!(labels(&once), labels(&twice));
    }

    #[test]
    fn result_is_a_stable_subsequence() {
        let out = search(corpus(), "e");
        // Every surviving record keeps its original relative order.
        assert_eq!(labels(&out), vec!["openai", "example", "cafe"]);
    }
}
