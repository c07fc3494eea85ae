//! A small regex compiler targeting [`crate::automaton::Automaton`] directly: no intermediate
//! AST is kept around after compilation, matching the style of the simulators it feeds.

mod classes;
mod parser;

use crate::{
    automaton::{search, simulate, Automaton, Hit},
    error::Result,
};

/// A compiled regular expression: an [`Automaton`] plus the convenience methods built on top of
/// the two simulation/search primitives.
#[derive(Clone, Debug)]
pub struct Regex {
    automaton: Automaton,
}

impl Regex {
    /// Compiles `pattern` per the grammar in [`parser::Parser`].
    pub fn compile(pattern: &str) -> Result<Self> {
        let automaton = parser::Parser::new(pattern).parse()?;
        Ok(Self { automaton })
    }

    /// The compiled automaton, for callers that want to drive their own simulation or run the
    /// text-format codec over it.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Whether `input`, in its entirety, matches this pattern.
    pub fn is_match(&self, input: &str) -> bool {
        simulate(&self.automaton, input)
    }

    /// Non-overlapping matches of this pattern in `input`, left to right: the longest match at
    /// each position, skipping past it before looking for the next one.
    pub fn search(&self, input: &str) -> Vec<Hit> {
        search(&self.automaton, input, false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_matches() {
        let re = Regex::compile("[a-z]+@[a-z]+\\.[a-z]+").unwrap();
        assert!(re.is_match("user@example.com"));
        assert!(!re.is_match("not an email"));
    }

    #[test]
    fn search_finds_embedded_matches() {
        let re = Regex::compile("\\d+").unwrap();
        let hits = re.search("room 42 has 7 chairs");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(Regex::compile("(unterminated").is_err());
        assert!(Regex::compile("[unterminated").is_err());
    }
}
