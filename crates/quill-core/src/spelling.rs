//! Dictionary lookups and spell checking.
//!
//! ## Learning: Arena-Backed Trees
//!
//! A trie is a tree, and trees of `Box`es are awkward to build and walk
//! in Rust. Instead every node lives in one `Vec<Node>` and children are
//! referenced by index. Growing the `Vec` never invalidates an index, so
//! insertion needs no unsafe code and no reference counting.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

use crate::CoreResult;

/// Symbols a word may contain: `a`-`z` and the apostrophe.
const ALPHABET: usize = 27;

/// Index of the trie root in the arena.
const ROOT: usize = 0;

/// The narrow interface higher layers use to check buffer text.
///
/// Columns are character offsets into the line, and ranges are
/// half-open (`start..end`).
pub trait Dictionary {
    /// Returns true if `word` is a known word (case-insensitive).
    fn is_valid_word(&self, word: &str) -> bool;

    /// Returns up to `max_suggestions` corrections for `word`, best first.
    ///
    /// Best-effort: a valid or hopeless word yields an empty list.
    fn suggest(&self, word: &str, max_suggestions: usize) -> Vec<String>;

    /// Returns the column ranges of tokens in `line` that are not words.
    fn find_invalid_ranges(&self, line: &str) -> Vec<Range<usize>>;
}

/// Outcome of checking a single word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpellCheck {
    /// The word is in the dictionary
    Valid,
    /// The word is unknown; the corrections may be empty
    Misspelled(Vec<String>),
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: [Option<usize>; ALPHABET],
    terminal: bool,
}

/// A trie-backed word list.
///
/// Words are case-folded to lowercase; characters outside the alphabet
/// are skipped when words are added.
#[derive(Debug, Clone)]
pub struct SpellChecker {
    nodes: Vec<Node>,
    words: usize,
}

impl SpellChecker {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            words: 0,
        }
    }

    /// Adds every word listed in a file, one per line.
    ///
    /// Returns the number of new words.
    pub fn load(&mut self, path: impl AsRef<Path>) -> CoreResult<usize> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let added = self.load_from_reader(BufReader::new(file))?;

        tracing::debug!(path = %path.display(), added, total = self.words, "loaded dictionary");
        Ok(added)
    }

    /// Adds every word read from `reader`, one per line.
    pub fn load_from_reader<R: BufRead>(&mut self, reader: R) -> CoreResult<usize> {
        let mut added = 0;
        for line in reader.lines() {
            if self.insert(&line?) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Adds one word. Returns false if it was already present or has no
    /// letters.
    pub fn insert(&mut self, word: &str) -> bool {
        let mut node = ROOT;
        let mut any = false;

        for slot in word.chars().filter_map(slot) {
            node = match self.nodes[node].children[slot] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children[slot] = Some(child);
                    child
                }
            };
            any = true;
        }

        if !any || self.nodes[node].terminal {
            return false;
        }
        self.nodes[node].terminal = true;
        self.words += 1;
        true
    }

    /// Returns the number of distinct words.
    pub fn len(&self) -> usize {
        self.words
    }

    /// Returns true if no words are loaded.
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Checks a word, collecting up to `max_suggestions` corrections
    /// when it is unknown.
    pub fn check(&self, word: &str, max_suggestions: usize) -> SpellCheck {
        if self.is_valid_word(word) {
            SpellCheck::Valid
        } else {
            SpellCheck::Misspelled(self.suggest(word, max_suggestions))
        }
    }

    /// Follows `word` from `node`, returning the node it ends on.
    fn walk(&self, mut node: usize, word: &[char]) -> Option<usize> {
        for &ch in word {
            node = self.nodes[node].children[slot(ch)?]?;
        }
        Some(node)
    }
}

impl Default for SpellChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SpellChecker {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut checker = SpellChecker::new();
        for word in iter {
            checker.insert(word.as_ref());
        }
        checker
    }
}

impl Dictionary for SpellChecker {
    fn is_valid_word(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        !chars.is_empty()
            && self
                .walk(ROOT, &chars)
                .is_some_and(|node| self.nodes[node].terminal)
    }

    /// Corrections are the words reachable by replacing exactly one
    /// character, ordered by the replaced position and then by letter.
    fn suggest(&self, word: &str, max_suggestions: usize) -> Vec<String> {
        let mut suggestions = Vec::new();
        if max_suggestions == 0 || self.is_valid_word(word) {
            return suggestions;
        }

        let chars: Vec<char> = word.chars().map(|c| c.to_ascii_lowercase()).collect();
        let mut prefix = Some(ROOT);

        for (i, &ch) in chars.iter().enumerate() {
            let Some(node) = prefix else {
                break;
            };
            let own = slot(ch);

            for replacement in 0..ALPHABET {
                if own == Some(replacement) {
                    continue;
                }
                let Some(child) = self.nodes[node].children[replacement] else {
                    continue;
                };
                let ends_on_word = self
                    .walk(child, &chars[i + 1..])
                    .is_some_and(|end| self.nodes[end].terminal);
                if !ends_on_word {
                    continue;
                }

                let mut candidate: String = chars[..i].iter().collect();
                candidate.push(symbol(replacement));
                candidate.extend(&chars[i + 1..]);
                suggestions.push(candidate);

                if suggestions.len() == max_suggestions {
                    return suggestions;
                }
            }

            prefix = own.and_then(|s| self.nodes[node].children[s]);
        }

        suggestions
    }

    fn find_invalid_ranges(&self, line: &str) -> Vec<Range<usize>> {
        let mut problems = Vec::new();
        let mut token = String::new();
        let mut start = 0;

        // A trailing separator flushes the final token
        for (column, ch) in line.chars().chain(std::iter::once(' ')).enumerate() {
            if slot(ch).is_some() {
                if token.is_empty() {
                    start = column;
                }
                token.push(ch);
            } else if !token.is_empty() {
                if !self.is_valid_word(&token) {
                    problems.push(start..column);
                }
                token.clear();
            }
        }

        problems
    }
}

/// Maps a character to its alphabet slot, folding case.
fn slot(ch: char) -> Option<usize> {
    match ch.to_ascii_lowercase() {
        c @ 'a'..='z' => Some(c as usize - 'a' as usize),
        '\'' => Some(26),
        _ => None,
    }
}

/// Inverse of [`slot`].
fn symbol(slot: usize) -> char {
    if slot == 26 {
        '\''
    } else {
        char::from(b'a' + slot as u8)
    }
}
