use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Leading characters that attach a word to the word before it.
const CLOSING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']'];
/// Trailing characters that attach the next word to this one.
const OPENING_PUNCTUATION: &[char] = &['(', '['];

/// The words produced by expanding a grammar.
///
/// Displaying a `Sentence` joins the words with single spaces, except that closing punctuation
/// (`.`, `,`, `!`, ...) hugs the word before it and opening brackets hug the word after.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Sentence {
    words: Vec<String>,
}

impl Sentence {
    #[must_use]
    pub const fn new() -> Sentence {
        Sentence { words: vec![] }
    }

    #[must_use]
    pub const fn from_parts(words: Vec<String>) -> Sentence {
        Sentence { words }
    }

    pub fn push(&mut self, word: impl Into<String>) {
        self.words.push(word.into());
    }

    pub fn words_iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Number of words, punctuation included
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Groups words into chunks that are never split across a space.
    fn chunks(&self) -> Vec<String> {
        let mut chunks: Vec<String> = vec![];
        let mut glue_next = false;
        for word in &self.words {
            let glue = glue_next || word.starts_with(CLOSING_PUNCTUATION);
            match chunks.last_mut() {
                Some(last) if glue => last.push_str(word),
                _ => chunks.push(word.clone()),
            }
            glue_next = word.ends_with(OPENING_PUNCTUATION);
        }
        chunks
    }

    /// Lay the sentence out over lines no wider than `width` characters.
    ///
    /// Lines only break where [`Display`](fmt::Display) would put a space. A chunk wider than
    /// `width` is placed on a line of its own rather than split.
    ///
    /// ```rust
    /// use rsg::Sentence;
    ///
    /// let sentence = Sentence::from_parts(
    ///     ["the", "quick", "brown", "fox", "."].map(String::from).to_vec(),
    /// );
    /// assert_eq!(sentence.wrap(10), "the quick\nbrown fox.");
    /// ```
    #[must_use]
    pub fn wrap(&self, width: usize) -> String {
        let mut lines: Vec<String> = vec![];
        let mut line = String::new();
        let mut line_width = 0;
        for chunk in self.chunks() {
            let chunk_width = chunk.chars().count();
            if line.is_empty() {
                line = chunk;
                line_width = chunk_width;
            } else if line_width + 1 + chunk_width <= width {
                line.push(' ');
                line.push_str(&chunk);
                line_width += 1 + chunk_width;
            } else {
                lines.push(std::mem::replace(&mut line, chunk));
                line_width = chunk_width;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines.join("\n")
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.chunks().join(" "))
    }
}

impl From<Sentence> for String {
    fn from(sentence: Sentence) -> Self {
        sentence.to_string()
    }
}

impl<S: Into<String>> FromIterator<S> for Sentence {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Sentence {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}
