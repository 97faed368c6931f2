use crate::error::Error;
use crate::parsers;
use std::fmt;
use std::str::FromStr;

use nom::Parser;
use nom::combinator::all_consuming;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A Term can represent a Terminal or Nonterminal node
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Term {
    /// A literal word, copied verbatim into generated sentences
    Terminal(String),
    /// A reference to a definition, stored without its angle brackets
    Nonterminal(String),
}

impl Term {
    /// True for [`Term::Nonterminal`]
    #[must_use]
    pub const fn is_nonterminal(&self) -> bool {
        matches!(self, Term::Nonterminal(_))
    }

    /// The word or nonterminal name, without decoration
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Term::Terminal(s) | Term::Nonterminal(s) => s,
        }
    }
}

/// Creates a Terminal if the input is a string literal or a Nonterminal if the input is
/// wrapped in angle brackets
/// ```
/// let terminal = rsg::term!("dog");
/// let nonterminal = rsg::term!(<animal>);
/// # assert_eq!(terminal, rsg::Term::Terminal(String::from("dog")));
/// # assert_eq!(nonterminal, rsg::Term::Nonterminal(String::from("animal")));
/// ```
#[macro_export]
macro_rules! term {
    (<$nt:ident>) => {
        $crate::Term::Nonterminal(String::from(stringify!($nt)))
    };
    ($t:literal) => {
        $crate::Term::Terminal(String::from($t))
    };
}

impl FromStr for Term {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match all_consuming(parsers::term).parse(s) {
            Ok((_, o)) => Ok(o),
            Err(e) => Err(Error::from(e)),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Terminal(s) => write!(f, "{s}"),
            Term::Nonterminal(s) => write!(f, "<{s}>"),
        }
    }
}
