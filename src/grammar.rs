//! Grammar module for reading random sentence grammars and expanding them into sentences.
//!
//! A grammar file is a sequence of brace-delimited definitions. Text outside the braces is
//! commentary and is ignored:
//!
//! ```text
//! The grammar for a fortune cookie.
//!
//! {
//! <start>
//! You will <fortune> . ;
//! }
//!
//! {
//! <fortune>
//! meet a tall stranger ;
//! find <object> under your pillow ;
//! }
//!
//! {
//! <object>
//! a coin ;
//! happiness ;
//! }
//! ```
//!
//! Expansion starts from `<start>` (or the first definition when there is no `<start>`),
//! choosing one production per nonterminal until only words remain.
//!
//! # Unicode Support
//!
//! Words and nonterminal names may hold any Unicode characters other than whitespace and the
//! reserved `{`, `}` and `;`.
//!
//! ```rust
//! use rsg::Grammar;
//!
//! let grammar: Grammar = "{ <start> <表情> ; } { <表情> 😀 ; 🎉 ; }".parse().unwrap();
//! let sentence = grammar.generate().unwrap();
//! assert!(["😀", "🎉"].contains(&sentence.to_string().as_str()));
//! ```

use crate::definition::Definition;
use crate::error::Error;
use crate::generation::{BorrowedRandomWalk, GenerationStrategy, RandomWalk};
use crate::parsers;
use crate::sentence::Sentence;
use crate::term::Term;
use crate::tracing;
use crate::validation::NonterminalSets;
use rand::rngs::StdRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str;

/// Name of the nonterminal generation starts from, when the grammar defines it.
pub const START_SYMBOL: &str = "start";

/// Deepest nesting of nonterminal expansions before generation gives up.
pub const MAX_RECURSION_DEPTH: usize = 1024;

/// A Grammar is comprised of any number of Definitions.
///
/// Lookups by nonterminal use the first definition with that name; [`Grammar::validate`]
/// reports any duplicates.
#[derive(Clone, Default, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Grammar {
    definitions: Vec<Definition>,
}

impl Grammar {
    /// Construct a new `Grammar`
    #[must_use]
    pub const fn new() -> Grammar {
        Grammar {
            definitions: vec![],
        }
    }

    /// Construct a `Grammar` from `Definition`s
    #[must_use]
    pub const fn from_parts(v: Vec<Definition>) -> Grammar {
        Grammar { definitions: v }
    }

    /// Read a grammar from a stream, one definition at a time.
    ///
    /// # Errors
    ///
    /// Any error from [`Definition::read_from`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use rsg::Grammar;
    ///
    /// let text = "{ <start> I <verb> ; } { <verb> ran ; sat ; }";
    /// let grammar = Grammar::read_from(&mut text.as_bytes()).unwrap();
    /// assert_eq!(grammar.definitions_iter().count(), 2);
    /// ```
    pub fn read_from<R: BufRead + ?Sized>(reader: &mut R) -> Result<Grammar, Error> {
        let _span = tracing::span!(tracing::Level::DEBUG, "Grammar::read_from").entered();

        let mut grammar = Grammar::new();
        while let Some(definition) = Definition::read_from(reader)? {
            grammar.add_definition(definition);
        }
        Ok(grammar)
    }

    /// Open and read the grammar file at `path`.
    ///
    /// # Errors
    ///
    /// `Error::IoError` if the file cannot be opened or read, otherwise any error from
    /// [`Grammar::read_from`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Grammar, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::IoError(format!("I/O error: could not open {}: {e}", path.display()))
        })?;
        Grammar::read_from(&mut BufReader::new(file))
    }

    /// Add `Definition` to the `Grammar`
    pub fn add_definition(&mut self, definition: Definition) {
        self.definitions.push(definition);
    }

    /// Remove `Definition` from the `Grammar`
    pub fn remove_definition(&mut self, definition: &Definition) -> Option<Definition> {
        self.definitions
            .iter()
            .position(|x| *x == *definition)
            .map(|pos| self.definitions.remove(pos))
    }

    /// Get iterator of the `Grammar`'s `Definition`s
    pub fn definitions_iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    /// Get mutable iterator of the `Grammar`'s `Definition`s
    pub fn definitions_iter_mut(&mut self) -> impl Iterator<Item = &mut Definition> {
        self.definitions.iter_mut()
    }

    /// The first definition of `nonterminal`, if any
    #[must_use]
    pub fn find_definition(&self, nonterminal: &str) -> Option<&Definition> {
        self.definitions
            .iter()
            .find(|d| d.nonterminal() == nonterminal)
    }

    /// The nonterminal generation starts from: `start` when defined, else the first definition's
    #[must_use]
    pub fn start_symbol(&self) -> Option<&str> {
        match self.find_definition(START_SYMBOL) {
            Some(definition) => Some(definition.nonterminal()),
            None => self.definitions.first().map(Definition::nonterminal),
        }
    }

    /// Check that the grammar can be expanded as written.
    ///
    /// # Errors
    ///
    /// `Error::ValidationError` if the grammar has no definitions, if a production references
    /// a nonterminal that is never defined, or if a nonterminal is defined more than once.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rsg::{Error, Grammar};
    ///
    /// let grammar: Grammar = "{ <start> the <noun> <verb> ; } { <noun> cat ; }".parse().unwrap();
    /// match grammar.validate() {
    ///     Err(Error::ValidationError(message)) => assert!(message.contains("<verb>")),
    ///     other => panic!("unexpected {other:?}"),
    /// }
    /// ```
    pub fn validate(&self) -> Result<(), Error> {
        let _span = tracing::span!(tracing::Level::DEBUG, "Grammar::validate").entered();

        if self.definitions.is_empty() {
            return Err(Error::ValidationError(String::from(
                "Grammar has no definitions",
            )));
        }

        let sets = NonterminalSets::from_definitions(self.definitions.iter());

        let undefined = sets.undefined();
        if !undefined.is_empty() {
            return Err(Error::ValidationError(format!(
                "Undefined nonterminals: {}",
                bracketed(&undefined)
            )));
        }

        let duplicated = sets.duplicated();
        if !duplicated.is_empty() {
            return Err(Error::ValidationError(format!(
                "Nonterminals defined more than once: {}",
                bracketed(&duplicated)
            )));
        }

        Ok(())
    }

    /// Generate a random sentence from self and seed for random.
    /// Use if interested in reproducing the output generated.
    /// Begins from [`Grammar::start_symbol`].
    ///
    /// # Errors
    ///
    /// See [`Grammar::generate_from`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use rsg::rand::{SeedableRng, rngs::StdRng};
    /// use rsg::Grammar;
    ///
    /// let input = "{ <start> <base> ; <base> <start> ; } { <base> A ; C ; G ; T ; }";
    /// let grammar: Grammar = input.parse().unwrap();
    /// let seed: [u8; 32] = [0; 32];
    /// let mut rng: StdRng = SeedableRng::from_seed(seed);
    /// let sentence = grammar.generate_seeded(&mut rng);
    /// # let sentence_clone = sentence.clone();
    /// match sentence {
    ///     Ok(s) => println!("random sentence: {}", s),
    ///     Err(e) => println!("something went wrong: {}!", e)
    /// }
    ///
    /// # assert!(sentence_clone.is_ok());
    /// ```
    pub fn generate_seeded(&self, rng: &mut StdRng) -> Result<Sentence, Error> {
        self.generate_seeded_with_strategy(&mut BorrowedRandomWalk { rng })
    }

    /// Generate a random sentence, letting `strategy` choose each production.
    /// Begins from [`Grammar::start_symbol`].
    ///
    /// # Errors
    ///
    /// `Error::GenerateError` if the grammar is empty, otherwise see [`Grammar::generate_from`].
    pub fn generate_seeded_with_strategy(
        &self,
        strategy: &mut impl GenerationStrategy,
    ) -> Result<Sentence, Error> {
        let Some(start) = self.start_symbol() else {
            return Err(Error::GenerateError(String::from(
                "Can't generate, grammar has no definitions",
            )));
        };
        self.generate_from(start, strategy)
    }

    /// Generate a random sentence by expanding `start`.
    ///
    /// # Errors
    ///
    /// `Error::GenerateError` if `start` or a nonterminal reached from it has no definition,
    /// if `start` can never expand to words only, if expansion nests deeper than
    /// [`MAX_RECURSION_DEPTH`], or if `strategy` declines to choose.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rsg::{DepthBounded, Grammar};
    ///
    /// let grammar: Grammar = "{ <list> item ; item , <list> ; }".parse().unwrap();
    /// let mut strategy = DepthBounded::new(4);
    /// let sentence = grammar.generate_from("list", &mut strategy).unwrap();
    /// assert!(sentence.words_iter().filter(|w| *w == "item").count() <= 5);
    /// ```
    pub fn generate_from(
        &self,
        start: &str,
        strategy: &mut impl GenerationStrategy,
    ) -> Result<Sentence, Error> {
        let _span = tracing::span!(tracing::Level::DEBUG, "Grammar::generate").entered();

        let expansion = Expansion::new(self);

        if let Some(undefined) = expansion.find_undefined(start) {
            return Err(Error::GenerateError(format!(
                "Can't generate, no definition for <{undefined}>"
            )));
        }

        if !expansion.terminates(start) {
            return Err(Error::GenerateError(format!(
                "Can't generate, <{start}> doesn't lead to a terminal state"
            )));
        }

        let mut sentence = Sentence::new();
        expansion.expand(start, 0, strategy, &mut sentence)?;
        Ok(sentence)
    }

    /// Generate a random sentence from self.
    /// Begins from [`Grammar::start_symbol`].
    ///
    /// # Random Number Generation
    ///
    /// This method seeds a `StdRng` from the system's default random number generator.
    /// For deterministic output use [`Grammar::generate_seeded`].
    ///
    /// # Errors
    ///
    /// See [`Grammar::generate_from`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use rsg::Grammar;
    ///
    /// let input = "{ <start> The <animal> sleeps . ; } { <animal> cat ; dog ; }";
    /// let grammar: Grammar = input.parse().unwrap();
    /// let sentence = grammar.generate();
    /// # let sentence_clone = sentence.clone();
    /// match sentence {
    ///     Ok(s) => println!("random sentence: {}", s),
    ///     Err(e) => println!("something went wrong: {}!", e)
    /// }
    ///
    /// # assert!(sentence_clone.is_ok());
    /// ```
    pub fn generate(&self) -> Result<Sentence, Error> {
        self.generate_seeded_with_strategy(&mut RandomWalk::default())
    }
}

fn bracketed(names: &[&str]) -> String {
    names
        .iter()
        .map(|nt| format!("<{nt}>"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One generation pass: a name index over the grammar's definitions.
struct Expansion<'g> {
    definitions: crate::HashMap<&'g str, &'g Definition>,
}

impl<'g> Expansion<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let mut definitions = crate::HashMap::with_capacity(grammar.definitions.len());
        for definition in &grammar.definitions {
            // first definition wins
            definitions
                .entry(definition.nonterminal())
                .or_insert(definition);
        }
        Self { definitions }
    }

    /// The first nonterminal reachable from `start` (`start` included) that has no definition
    fn find_undefined<'s>(&self, start: &'s str) -> Option<&'s str>
    where
        'g: 's,
    {
        let mut visited = crate::HashSet::new();
        visited.insert(start);
        let mut pending = vec![start];

        while let Some(nonterminal) = pending.pop() {
            let Some(&definition) = self.definitions.get(nonterminal) else {
                return Some(nonterminal);
            };
            for production in definition.productions_iter() {
                for referenced in production.nonterminals_iter() {
                    if visited.insert(referenced) {
                        pending.push(referenced);
                    }
                }
            }
        }
        None
    }

    /// Determine if `start` can reach a sentence made only of words. Used as a check before
    /// generation, to tell if we can safely attempt to generate sentences without risking
    /// unbounded recursion. Only the first definition of each nonterminal counts.
    fn terminates(&self, start: &str) -> bool {
        let mut terminating_rules: Vec<&str> = self
            .definitions
            .values()
            .filter(|definition| definition.has_terminating_production(None))
            .map(|definition| definition.nonterminal())
            .collect();

        if terminating_rules.is_empty() {
            return false;
        }

        let mut is_progress = true;

        while is_progress {
            is_progress = false;

            for definition in self.definitions.values() {
                let nt = definition.nonterminal();

                // if already marked, then no need to reprocess
                if terminating_rules.contains(&nt) {
                    continue;
                }

                if definition.has_terminating_production(Some(terminating_rules.as_slice())) {
                    // only care if the starting term terminates, so can return early
                    if nt == start {
                        return true;
                    }

                    terminating_rules.push(nt);
                    is_progress = true;
                }
            }
        }

        terminating_rules.contains(&start)
    }

    fn expand(
        &self,
        nonterminal: &str,
        depth: usize,
        strategy: &mut impl GenerationStrategy,
        sentence: &mut Sentence,
    ) -> Result<(), Error> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(Error::GenerateError(format!(
                "Can't generate, expansion nested deeper than {MAX_RECURSION_DEPTH} at <{nonterminal}>"
            )));
        }

        let Some(definition) = self.definitions.get(nonterminal) else {
            return Err(Error::GenerateError(format!(
                "Can't generate, no definition for <{nonterminal}>"
            )));
        };

        let Some(production) = strategy.choose(definition, depth) else {
            return Err(Error::GenerateError(format!(
                "Couldn't select a production for <{nonterminal}>"
            )));
        };

        tracing::event!(
            tracing::Level::TRACE,
            nonterminal,
            depth,
            "expanding"
        );

        for term in production.terms_iter() {
            match term {
                Term::Terminal(word) => sentence.push(word.as_str()),
                Term::Nonterminal(nt) => self.expand(nt, depth + 1, strategy, sentence)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{}",
            self.definitions
                .iter()
                .map(std::string::ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n\n")
        )
    }
}

impl str::FromStr for Grammar {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let _span = tracing::span!(tracing::Level::DEBUG, "Grammar::from_str").entered();

        match parsers::grammar_complete(s) {
            Ok((_, o)) => o
                .definitions
                .into_iter()
                .map(Definition::ensure_productions)
                .collect::<Result<Vec<_>, _>>()
                .map(Grammar::from_parts),
            Err(e) => Err(Error::from(e)),
        }
    }
}
