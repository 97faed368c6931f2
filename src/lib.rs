#![doc = include_str!("../README.md")]

mod definition;
mod error;
mod generation;
mod grammar;
mod parsers;
mod production;
mod sentence;
mod term;
mod tracing;
mod validation;
pub use crate::definition::Definition;
pub use crate::error::Error;
pub use crate::generation::{CoverageGuided, DepthBounded, GenerationStrategy, RandomWalk};
pub use crate::grammar::{Grammar, MAX_RECURSION_DEPTH, START_SYMBOL};
pub use crate::production::Production;
pub use crate::sentence::Sentence;
pub use crate::term::Term;

pub use rand;

pub(crate) use hashbrown::{HashMap, HashSet};
