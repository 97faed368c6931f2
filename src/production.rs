use crate::error::Error;
use crate::parsers;
use crate::term::Term;
use std::fmt;
use std::ops;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A Production is one alternative expansion of a nonterminal: a sequence of `Term`s.
///
/// An empty production is allowed and expands to nothing.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Production {
    pub(crate) terms: Vec<Term>,
}

impl Production {
    /// Construct a new `Production`
    #[must_use]
    pub const fn new() -> Production {
        Production { terms: vec![] }
    }

    /// Construct a `Production` from `Term`s
    #[must_use]
    pub const fn from_parts(v: Vec<Term>) -> Production {
        Production { terms: v }
    }

    /// Add `Term` to `Production`
    pub fn add_term(&mut self, term: Term) {
        self.terms.push(term);
    }

    /// Remove `Term` from `Production`
    ///
    /// If interested if `Term` was removed, then inspect the returned `Option`.
    ///
    /// # Example
    ///
    /// ```
    /// use rsg::{Production, Term};
    ///
    /// let mut production = Production::from_parts(vec![]);
    /// let to_remove = Term::Terminal(String::from("a_terminal"));
    /// let removed = production.remove_term(&to_remove);
    /// # let removed_clone = removed.clone();
    /// match removed {
    ///     Some(term) => println!("removed {}", term),
    ///     None => println!("term was not in production, so could not be removed"),
    /// }
    ///
    /// # assert_eq!(removed_clone, None);
    /// ```
    pub fn remove_term(&mut self, term: &Term) -> Option<Term> {
        if let Some(pos) = self.terms.iter().position(|x| *x == *term) {
            Some(self.terms.remove(pos))
        } else {
            None
        }
    }

    /// Get iterator of `Term`s within `Production`
    pub fn terms_iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    /// Get mutable iterator of `Term`s within `Production`
    pub fn terms_iter_mut(&mut self) -> impl Iterator<Item = &mut Term> {
        self.terms.iter_mut()
    }

    /// Iterator over the names of the nonterminals this production references
    pub fn nonterminals_iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().filter_map(|t| match t {
            Term::Nonterminal(nt) => Some(nt.as_str()),
            Term::Terminal(_) => None,
        })
    }

    /// Get number of `Term`s
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True when the production contains no nonterminals at all
    #[must_use]
    pub fn is_terminal_only(&self) -> bool {
        !self.terms.iter().any(Term::is_nonterminal)
    }

    /// Determine if this production terminates or not, i.e contains all terminal elements or every
    /// non-terminal element in the production exists in the (optional) list of 'terminating rules'
    pub(crate) fn terminates(&self, terminating_rules: Option<&[&str]>) -> bool {
        if self.is_terminal_only() {
            return true;
        }

        let Some(terminating_rules) = terminating_rules else {
            return false;
        };

        self.nonterminals_iter()
            .all(|nt| terminating_rules.contains(&nt))
    }
}

/// Create a production from a series of terms
/// ```
/// let production = rsg::production!("the" <noun> "sleeps");
/// # assert_eq!(production.len(), 3);
/// ```
#[macro_export]
macro_rules! production {
    // Entry: nothing at all, the empty production
    () => {
        $crate::Production::new()
    };
    // Entry: nonterminal followed by more tokens
    (<$nt:ident> $($tt:tt)*) => {
        $crate::production!(@collect [$crate::term!(<$nt>)] $($tt)*)
    };
    // Entry: literal followed by more tokens
    ($t:literal $($tt:tt)*) => {
        $crate::production!(@collect [$crate::term!($t)] $($tt)*)
    };
    // Collect nonterminal
    (@collect [$($collected:expr),*] <$nt:ident> $($rest:tt)*) => {
        $crate::production!(@collect [$($collected,)* $crate::term!(<$nt>)] $($rest)*)
    };
    // Collect literal
    (@collect [$($collected:expr),*] $t:literal $($rest:tt)*) => {
        $crate::production!(@collect [$($collected,)* $crate::term!($t)] $($rest)*)
    };
    // Base case - build Production from collected terms
    (@collect [$($collected:expr),*]) => {
        $crate::Production::from_parts(vec![$($collected),*])
    };
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let display = self
            .terms
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        write!(f, "{display}")
    }
}

impl FromStr for Production {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parsers::production_complete(s) {
            Ok((_, o)) => Ok(o),
            Err(e) => Err(Error::from(e)),
        }
    }
}

impl ops::Add<Production> for Production {
    type Output = Production;
    fn add(mut self, rhs: Production) -> Self::Output {
        self.terms.extend(rhs.terms);
        self
    }
}

impl ops::Add<Term> for Production {
    type Output = Production;
    fn add(mut self, rhs: Term) -> Self::Output {
        self.add_term(rhs);
        self
    }
}
