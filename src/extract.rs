//! Extraction of story records from reading list text.
//!
//! The input format is a sequence of title blocks:
//!
//! ```text
//! *Title*
//!
//! - Character A × Character B (Series)
//!
//! - by [author](https://...) → 12k words
//!
//! - 85/100, comment text
//! ```
//!
//! Each block is classified as complete (all sub-patterns present),
//! title-only (none present), or malformed (a partial match, reported as a
//! diagnostic and skipped).

use std::fmt;

use lazy_regex::regex;

/// Separator between names in a character list.
pub const CHARACTER_SEPARATOR: &str = " × ";

/// One entry of a reading list.
///
/// Either complete, with every field populated from a fully matched block,
/// or title-only with everything else `None`. The extractor never emits a
/// mix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Story {
    pub title: String,
    /// Character tags in entry order. `Some(vec![])` means the block had an
    /// empty character list, `None` that there was none.
    pub characters: Option<Vec<String>>,
    pub series: Option<String>,
    pub author: Option<String>,
    /// Word count kept as raw text, it may carry suffixes like `12k` or
    /// markers like `~`. See [`crate::convert_word_count`].
    pub words: Option<String>,
    /// Rating out of 100.
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

impl Story {
    pub fn title_only(title: impl Into<String>) -> Self {
        Story {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.rating.is_some()
    }
}

/// Recoverable anomaly noticed while extracting or ranking.
///
/// Diagnostics are returned to the caller next to the good records, they
/// never abort a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A title block matched only some of its sub-patterns, or matched all
    /// of them but its rating was not an integer.
    MalformedEntry {
        /// 1-based index of the title block in the input.
        section: usize,
        title: String,
        characters: Option<String>,
        author: Option<String>,
        rating: Option<String>,
    },
    /// A word-count string that did not normalize to a number during
    /// ranking.
    BadWordCount { title: String, words: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedEntry {
                section,
                title,
                characters,
                author,
                rating,
            } => write!(
                f,
                "section {section} ({title}): malformed entry, \
                 characters: {characters:?}, author: {author:?}, \
                 rating: {rating:?}"
            ),
            Diagnostic::BadWordCount { title, words } => {
                write!(f, "{title}: unusable word count {words:?}")
            }
        }
    }
}

/// Result of one extraction pass.
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    pub stories: Vec<Story>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Split text into title blocks and parse each one into a [`Story`].
///
/// A title is a `*`-emphasized fragment at the start of a line; the block
/// body runs to the next title or end of input. Within a body the four
/// sub-patterns (characters+series, author, word count, rating+comment) are
/// searched independently. Blocks that match the expected shape only
/// partially produce a [`Diagnostic`] instead of a record; extraction of
/// the rest of the input continues unaffected.
pub fn extract_stories(text: &str) -> Extraction {
    let title_re = regex!(r"(?m)^\*.*?\*");

    let titles: Vec<&str> =
        title_re.find_iter(text).map(|m| m.as_str()).collect();

    // The first fragment is whatever precedes the first title, skip it.
    let bodies = title_re.split(text).skip(1);

    let mut out = Extraction::default();

    for (i, (title, body)) in titles.iter().zip(bodies).enumerate() {
        let characters = regex!(r"- (.*?) \((.*?)\)").captures(body);
        let author = regex!(r"- by \[(.*?)\]\(.*?\)").captures(body);
        let words = regex!(r" → (.*?) words").captures(body);
        let rating_comment = regex!(r"- (.*?)/100, (.*)").captures(body);

        match (&characters, &author, &rating_comment) {
            (Some(chars), Some(author), Some(rating_comment)) => {
                let Ok(rating) = rating_comment[1].trim().parse::<i64>()
                else {
                    out.diagnostics.push(Diagnostic::MalformedEntry {
                        section: i + 1,
                        title: title.to_string(),
                        characters: Some(chars[0].to_string()),
                        author: Some(author[0].to_string()),
                        rating: Some(rating_comment[1].to_string()),
                    });
                    continue;
                };

                out.stories.push(Story {
                    title: title.to_string(),
                    characters: Some(
                        chars[1]
                            .split(CHARACTER_SEPARATOR)
                            .map(str::to_owned)
                            .collect(),
                    ),
                    series: Some(chars[2].to_string()),
                    author: Some(author[1].to_string()),
                    words: Some(
                        words
                            .as_ref()
                            .map_or_else(|| "0".to_string(), |w| w[1].to_string()),
                    ),
                    rating: Some(rating),
                    comment: Some(rating_comment[2].to_string()),
                });
            }
            (None, None, None) => out.stories.push(Story::title_only(*title)),
            _ => out.diagnostics.push(Diagnostic::MalformedEntry {
                section: i + 1,
                title: title.to_string(),
                characters: characters.as_ref().map(|m| m[0].to_string()),
                author: author.as_ref().map(|m| m[0].to_string()),
                rating: rating_comment.as_ref().map(|m| m[0].to_string()),
            }),
        }
    }

    out
}
