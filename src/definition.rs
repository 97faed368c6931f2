use crate::error::Error;
use crate::parsers;
use crate::production::Production;
use crate::tracing;
use std::fmt;
use std::io::BufRead;
use std::str::{self, FromStr};

use rand::Rng;
use rand::seq::IndexedRandom;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A Definition attaches a nonterminal to the `Production`s it may expand into.
///
/// In a grammar file a definition is a brace-delimited block: the nonterminal comes first,
/// followed by productions that each end with `;`.
///
/// ```text
/// {
/// <start>
/// The <object> <verb> tonight. ;
/// }
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Definition {
    nonterminal: String,
    productions: Vec<Production>,
}

impl Definition {
    /// Construct a `Definition` for the given nonterminal with no productions
    pub fn new(nonterminal: impl Into<String>) -> Definition {
        Definition {
            nonterminal: nonterminal.into(),
            productions: vec![],
        }
    }

    /// Construct a `Definition` from a nonterminal name and its `Production`s
    pub fn from_parts(nonterminal: impl Into<String>, productions: Vec<Production>) -> Definition {
        Definition {
            nonterminal: nonterminal.into(),
            productions,
        }
    }

    /// Read the next definition from a grammar stream.
    ///
    /// Everything up to and including the next `{` is skipped as commentary, then the block up
    /// to the closing `}` is parsed. Returns `Ok(None)` once the stream holds no further `{`.
    ///
    /// # Errors
    ///
    /// `Error::ParseError` if the block is unterminated, malformed, not UTF-8 or has no
    /// productions. `Error::IoError` if reading fails.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rsg::Definition;
    ///
    /// let mut stream = "a comment { <greeting> hello ; hi there ; } more".as_bytes();
    /// let definition = Definition::read_from(&mut stream).unwrap().unwrap();
    /// assert_eq!(definition.nonterminal(), "greeting");
    /// assert_eq!(definition.len(), 2);
    /// assert!(Definition::read_from(&mut stream).unwrap().is_none());
    /// ```
    pub fn read_from<R: BufRead + ?Sized>(reader: &mut R) -> Result<Option<Definition>, Error> {
        let _span = tracing::span!(tracing::Level::DEBUG, "Definition::read_from").entered();

        let mut skipped = Vec::new();
        reader.read_until(b'{', &mut skipped)?;
        if skipped.last() != Some(&b'{') {
            return Ok(None);
        }

        let mut block = vec![b'{'];
        reader.read_until(b'}', &mut block)?;
        if block.last() != Some(&b'}') {
            return Err(Error::ParseError(format!(
                "Parsing error: definition is missing its closing '}}': {}",
                String::from_utf8_lossy(&block).trim()
            )));
        }

        let text = str::from_utf8(&block)?;
        let definition = match parsers::definition_complete(text) {
            Ok((_, o)) => o,
            Err(e) => return Err(Error::from(e)),
        };
        definition.ensure_productions().map(Some)
    }

    /// A parsed definition must offer at least one production to choose from
    pub(crate) fn ensure_productions(self) -> Result<Definition, Error> {
        if self.productions.is_empty() {
            return Err(Error::ParseError(format!(
                "Parsing error: definition of <{}> has no productions",
                self.nonterminal
            )));
        }
        Ok(self)
    }

    /// The nonterminal name, without angle brackets
    #[must_use]
    pub fn nonterminal(&self) -> &str {
        &self.nonterminal
    }

    /// Add `Production` to the `Definition`
    pub fn add_production(&mut self, production: Production) {
        self.productions.push(production);
    }

    /// Remove `Production` from the `Definition`
    ///
    /// If interested if `Production` was removed, then inspect the returned `Option`.
    pub fn remove_production(&mut self, production: &Production) -> Option<Production> {
        self.productions
            .iter()
            .position(|x| *x == *production)
            .map(|pos| self.productions.remove(pos))
    }

    /// Get iterator of the `Definition`'s `Production`s
    pub fn productions_iter(&self) -> impl Iterator<Item = &Production> {
        self.productions.iter()
    }

    /// Get mutable iterator of the `Definition`'s `Production`s
    pub fn productions_iter_mut(&mut self) -> impl Iterator<Item = &mut Production> {
        self.productions.iter_mut()
    }

    /// Get the production at `index`, if any
    #[must_use]
    pub fn get_production(&self, index: usize) -> Option<&Production> {
        self.productions.get(index)
    }

    /// Uniformly choose one of this definition's productions.
    ///
    /// The returned reference borrows the production stored in the definition; nothing is
    /// allocated per choice. Returns `None` only for a definition with no productions.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rsg::Definition;
    /// use rsg::rand::{SeedableRng, rngs::StdRng};
    ///
    /// let definition: Definition = "{ <coin> heads ; tails ; }".parse().unwrap();
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let side = definition.get_random_production(&mut rng).unwrap();
    /// assert!(definition.productions_iter().any(|p| std::ptr::eq(p, side)));
    /// ```
    pub fn get_random_production<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Production> {
        self.productions.choose(rng)
    }

    /// Get number of `Production`s
    #[must_use]
    pub fn len(&self) -> usize {
        self.productions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// True if any production terminates given the (optional) known terminating nonterminals
    pub(crate) fn has_terminating_production(&self, terminating_rules: Option<&[&str]>) -> bool {
        self.productions
            .iter()
            .any(|p| p.terminates(terminating_rules))
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "<{}>", self.nonterminal)?;
        for production in &self.productions {
            if production.is_empty() {
                writeln!(f, ";")?;
            } else {
                writeln!(f, "{production} ;")?;
            }
        }
        write!(f, "}}")
    }
}

impl FromStr for Definition {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parsers::definition_complete(s) {
            Ok((_, o)) => o.ensure_productions(),
            Err(e) => Err(Error::from(e)),
        }
    }
}
