//! Frequency counts and ranked views over extracted records.

use std::{fmt, hash::Hash, str::FromStr};

use anyhow::{bail, Result};
use derive_more::{Deref, DerefMut};
use indexmap::IndexMap;
use itertools::Itertools;

use crate::{Diagnostic, Story};

/// Category key → occurrence count.
///
/// Iteration order is the order in which keys were first inserted.
/// [`top_by_frequency`] leans on this for its tie-break.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct FrequencyTable<K: Hash + Eq>(IndexMap<K, usize>);

impl<K: Hash + Eq> FrequencyTable<K> {
    fn add(&mut self, key: K) {
        *self.0.entry(key).or_default() += 1;
    }
}

/// Frequency tables for every aggregation dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frequencies {
    pub ratings: FrequencyTable<i64>,
    pub characters: FrequencyTable<String>,
    pub series: FrequencyTable<String>,
    pub authors: FrequencyTable<String>,
}

/// Aggregation dimension, named for report selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Ratings,
    Characters,
    Series,
    Authors,
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ratings" => Ok(Category::Ratings),
            "characters" => Ok(Category::Characters),
            "series" => Ok(Category::Series),
            "authors" => Ok(Category::Authors),
            _ => bail!("unknown category {s:?}"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Ratings => "ratings",
            Category::Characters => "characters",
            Category::Series => "series",
            Category::Authors => "authors",
        };
        write!(f, "{name}")
    }
}

/// Ranking key for [`top_stories`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Rating,
    Words,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rating" => Ok(SortKey::Rating),
            "words" => Ok(SortKey::Words),
            _ => bail!("unknown sort key {s:?}"),
        }
    }
}

/// Count every dimension across the record sequence.
///
/// A record with an absent value for a dimension contributes nothing to
/// that dimension's table.
pub fn aggregate(stories: &[Story]) -> Frequencies {
    let mut freq = Frequencies::default();

    for story in stories {
        if let Some(rating) = story.rating {
            freq.ratings.add(rating);
        }
        for character in story.characters.iter().flatten() {
            freq.characters.add(character.clone());
        }
        if let Some(series) = &story.series {
            freq.series.add(series.clone());
        }
        if let Some(author) = &story.author {
            freq.authors.add(author.clone());
        }
    }

    freq
}

impl Frequencies {
    /// Ranked `(label, count)` rows for one category, keys stringified for
    /// presentation.
    pub fn ranked(&self, category: Category, n: usize) -> Vec<(String, usize)> {
        match category {
            Category::Ratings => top_by_frequency(&self.ratings, n)
                .into_iter()
                .map(|(k, c)| (k.to_string(), c))
                .collect(),
            Category::Characters => top_by_frequency(&self.characters, n),
            Category::Series => top_by_frequency(&self.series, n),
            Category::Authors => top_by_frequency(&self.authors, n),
        }
    }
}

/// The `n` highest-count keys of a table, in descending count order.
///
/// Ties rank in the order the keys were first seen in the record sequence,
/// which is the table's insertion order; the sort is stable over it.
pub fn top_by_frequency<K: Hash + Eq + Clone>(
    table: &FrequencyTable<K>,
    n: usize,
) -> Vec<(K, usize)> {
    table
        .iter()
        .map(|(k, &count)| (k.clone(), count))
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .take(n)
        .collect()
}

/// Convert a raw word-count string to a number.
///
/// The `k` suffix multiplies by a thousand by literal zero-padding, the
/// `~` approximation and `-` range markers are stripped outright. Note that
/// stripping `-` concatenates the digits of a range, `"500-600"` becomes
/// `500600`; this mirrors the export format's own accounting.
pub fn convert_word_count(words: &str) -> Result<i64> {
    let normalized = words
        .to_lowercase()
        .replace('~', "")
        .replace('-', "")
        .replace('k', "000");
    Ok(normalized.parse()?)
}

/// The top `n` records ranked descending on `sort`.
///
/// Records whose sort field is absent are filtered out. Ranking by words
/// normalizes the raw word-count text first; records whose word count does
/// not normalize are reported as diagnostics and left out, the rest still
/// rank. Ties keep their original record order.
pub fn top_stories(
    stories: &[Story],
    sort: SortKey,
    n: usize,
) -> (Vec<Story>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut keyed: Vec<(i64, &Story)> = Vec::new();

    for story in stories {
        let key = match sort {
            SortKey::Rating => match story.rating {
                Some(rating) => rating,
                None => continue,
            },
            SortKey::Words => {
                let Some(words) = &story.words else {
                    continue;
                };
                match convert_word_count(words) {
                    Ok(count) => count,
                    Err(_) => {
                        diagnostics.push(Diagnostic::BadWordCount {
                            title: story.title.clone(),
                            words: words.clone(),
                        });
                        continue;
                    }
                }
            }
        };
        keyed.push((key, story));
    }

    keyed.sort_by(|a, b| b.0.cmp(&a.0));

    let top = keyed.into_iter().take(n).map(|(_, s)| s.clone()).collect();
    (top, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_stories;

    fn story(
        title: &str,
        characters: &[&str],
        series: &str,
        author: &str,
        words: &str,
        rating: i64,
    ) -> Story {
        Story {
            title: title.to_string(),
            characters: Some(
                characters.iter().map(|c| c.to_string()).collect(),
            ),
            series: Some(series.to_string()),
            author: Some(author.to_string()),
            words: Some(words.to_string()),
            rating: Some(rating),
            comment: Some(String::new()),
        }
    }

    #[test]
    fn test_aggregate_empty() {
        let freq = aggregate(&[]);
        assert!(freq.ratings.is_empty());
        assert!(freq.characters.is_empty());
        assert!(freq.series.is_empty());
        assert!(freq.authors.is_empty());
    }

    #[test]
    fn test_aggregate_counts() {
        let stories = vec![
            story("*a*", &["X", "Y"], "S1", "alice", "1k", 80),
            story("*b*", &["X"], "S1", "bob", "2k", 90),
            Story::title_only("*c*"),
        ];
        let freq = aggregate(&stories);

        assert_eq!(freq.ratings.get(&80), Some(&1));
        assert_eq!(freq.ratings.get(&90), Some(&1));
        assert_eq!(freq.characters.get("X"), Some(&2));
        assert_eq!(freq.characters.get("Y"), Some(&1));
        assert_eq!(freq.series.get("S1"), Some(&2));
        assert_eq!(freq.authors.get("alice"), Some(&1));
        assert_eq!(freq.authors.get("bob"), Some(&1));
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let mut stories = vec![
            story("*a*", &["X", "Y"], "S1", "alice", "1k", 80),
            story("*b*", &["X"], "S2", "bob", "2k", 90),
            story("*c*", &["Z"], "S1", "alice", "3k", 80),
        ];
        let forward = aggregate(&stories);
        stories.reverse();
        let backward = aggregate(&stories);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_top_by_frequency_tie_break() {
        // Keys inserted a, b, c; ties between b and c resolve to insertion
        // order, so b ranks first.
        let mut table = FrequencyTable::default();
        table.insert("a".to_string(), 3);
        table.insert("b".to_string(), 5);
        table.insert("c".to_string(), 5);

        assert_eq!(
            top_by_frequency(&table, 2),
            vec![("b".to_string(), 5), ("c".to_string(), 5)]
        );
    }

    #[test]
    fn test_convert_word_count() {
        assert_eq!(convert_word_count("12k").unwrap(), 12000);
        assert_eq!(convert_word_count("~3k").unwrap(), 3000);
        assert_eq!(convert_word_count("4500").unwrap(), 4500);
        assert_eq!(convert_word_count("12K").unwrap(), 12000);
        // Range markers are stripped without a separator, concatenating the
        // digits. Pinned deliberately, see DESIGN.md.
        assert_eq!(convert_word_count("500-600").unwrap(), 500600);
        assert!(convert_word_count("a lot").is_err());
        assert!(convert_word_count("1.5k").is_err());
    }

    #[test]
    fn test_top_stories_by_rating() {
        let stories = vec![
            story("*low*", &["X"], "S", "a", "1k", 10),
            Story::title_only("*skipped*"),
            story("*high*", &["X"], "S", "a", "1k", 95),
            story("*mid*", &["X"], "S", "a", "1k", 50),
        ];
        let (top, diagnostics) = top_stories(&stories, SortKey::Rating, 2);
        assert!(diagnostics.is_empty());
        let titles: Vec<&str> =
            top.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["*high*", "*mid*"]);
    }

    #[test]
    fn test_top_stories_rating_ties_keep_record_order() {
        let stories = vec![
            story("*first*", &["X"], "S", "a", "1k", 80),
            story("*second*", &["X"], "S", "a", "1k", 80),
        ];
        let (top, _) = top_stories(&stories, SortKey::Rating, 10);
        let titles: Vec<&str> =
            top.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["*first*", "*second*"]);
    }

    #[test]
    fn test_top_stories_by_words_reports_bad_counts() {
        let stories = vec![
            story("*small*", &["X"], "S", "a", "2k", 10),
            story("*bad*", &["X"], "S", "a", "lots", 10),
            story("*big*", &["X"], "S", "a", "12k", 10),
        ];
        let (top, diagnostics) = top_stories(&stories, SortKey::Words, 10);

        let titles: Vec<&str> =
            top.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["*big*", "*small*"]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::BadWordCount {
                title: "*bad*".to_string(),
                words: "lots".to_string(),
            }]
        );
    }

    #[test]
    fn test_extract_and_aggregate_end_to_end() {
        let text = "\
*The Long Watch*

- Alice × Bob (Night Garden)

- by [jdoe](https://example.com) → 12k words

- 85/100, good

*Unread*

nothing structured here
";
        let out = extract_stories(text);
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.stories.len(), 2);

        let freq = aggregate(&out.stories);
        assert_eq!(freq.ratings.len(), 1);
        assert_eq!(freq.ratings.get(&85), Some(&1));
        assert_eq!(freq.characters.len(), 2);
        assert_eq!(freq.series.get("Night Garden"), Some(&1));
        assert_eq!(freq.authors.get("jdoe"), Some(&1));
    }
}
