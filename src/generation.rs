//! Sentence generation strategies.
//!
//! A strategy decides which of a definition's productions is expanded at each step. Every
//! strategy answers with a reference into the definition's own storage, so choosing never
//! allocates a production.

use crate::definition::Definition;
use crate::production::Production;
use rand::Rng;
use rand::SeedableRng;
use rand::rng;
use rand::rngs::StdRng;

/// Strategy for choosing which production to use when expanding a nonterminal
/// during sentence generation.
pub trait GenerationStrategy {
    /// Choose one of the definition's productions.
    ///
    /// Returns `Some(&production)` for the chosen alternative, or `None` if there is no
    /// valid choice (the definition has no productions).
    fn choose<'d>(&mut self, definition: &'d Definition, depth: usize) -> Option<&'d Production>;
}

fn os_seeded_rng() -> StdRng {
    let mut seed = [0u8; 32];
    rng().fill(&mut seed);
    StdRng::from_seed(seed)
}

/// Uniform random choice over all productions.
#[derive(Debug)]
#[non_exhaustive]
pub struct RandomWalk {
    rng: StdRng,
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self {
            rng: os_seeded_rng(),
        }
    }
}

impl RandomWalk {
    /// Create a strategy seeded from the given seed for reproducible generation.
    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: StdRng::from_seed(seed),
        }
    }

    /// Convenience for [`RandomWalk::from_seed`] with a `u64` seed.
    #[must_use]
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl GenerationStrategy for RandomWalk {
    fn choose<'d>(&mut self, definition: &'d Definition, _depth: usize) -> Option<&'d Production> {
        definition.get_random_production(&mut self.rng)
    }
}

/// Uniform choice driven by a caller-owned RNG.
pub(crate) struct BorrowedRandomWalk<'r> {
    pub(crate) rng: &'r mut StdRng,
}

impl GenerationStrategy for BorrowedRandomWalk<'_> {
    fn choose<'d>(&mut self, definition: &'d Definition, _depth: usize) -> Option<&'d Production> {
        definition.get_random_production(&mut *self.rng)
    }
}

/// At or above `max_depth`, only chooses productions made entirely of terminals,
/// steering generation towards termination. Below `max_depth`, behaves like [`RandomWalk`].
///
/// If a definition offers no terminal-only production, any production may be chosen.
#[derive(Debug)]
#[non_exhaustive]
pub struct DepthBounded {
    /// Expansion depth from which only terminal-only productions are chosen.
    pub max_depth: usize,
    rng: StdRng,
    /// Reused buffer for eligible indices at depth; avoids per-call allocation.
    eligible_buf: Vec<usize>,
}

impl DepthBounded {
    /// Create a depth-bounded strategy with the given maximum depth.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            rng: os_seeded_rng(),
            eligible_buf: Vec::new(),
        }
    }

    /// Create a strategy seeded from the given seed for reproducible generation.
    #[must_use]
    pub fn from_seed(max_depth: usize, seed: [u8; 32]) -> Self {
        Self {
            max_depth,
            rng: StdRng::from_seed(seed),
            eligible_buf: Vec::new(),
        }
    }

    fn fill_eligible_and_choose_index(&mut self, definition: &Definition, depth: usize) -> usize {
        self.eligible_buf.clear();
        if depth >= self.max_depth {
            for (i, production) in definition.productions_iter().enumerate() {
                if production.is_terminal_only() {
                    self.eligible_buf.push(i);
                }
            }
        }
        if self.eligible_buf.is_empty() {
            random_index(&mut self.rng, definition.len())
        } else {
            let pick = random_index(&mut self.rng, self.eligible_buf.len());
            self.eligible_buf.get(pick).copied().unwrap_or(pick)
        }
    }
}

/// Uniform random index in `0..len`. Shared by strategies that need uniform choice.
fn random_index(rng: &mut StdRng, len: usize) -> usize {
    rng.random_range(0..len)
}

impl GenerationStrategy for DepthBounded {
    fn choose<'d>(&mut self, definition: &'d Definition, depth: usize) -> Option<&'d Production> {
        if definition.is_empty() {
            return None;
        }
        let idx = self.fill_eligible_and_choose_index(definition, depth);
        definition.get_production(idx)
    }
}

/// Prefers productions that have not yet been chosen; tracks coverage per nonterminal.
///
/// Suited for generating sentences that together exercise every production of the grammar.
#[derive(Debug)]
pub struct CoverageGuided {
    /// Indices of the productions chosen so far, by nonterminal.
    seen: crate::HashMap<String, crate::HashSet<usize>>,
    rng: StdRng,
    /// Reused buffer for uncovered indices; avoids per-call allocation.
    candidates_buf: Vec<usize>,
}

impl Default for CoverageGuided {
    fn default() -> Self {
        Self {
            seen: crate::HashMap::new(),
            rng: os_seeded_rng(),
            candidates_buf: Vec::new(),
        }
    }
}

impl CoverageGuided {
    /// Create a new coverage-guided strategy with no coverage yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a strategy seeded from the given seed for reproducible generation.
    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            seen: crate::HashMap::new(),
            rng: StdRng::from_seed(seed),
            candidates_buf: Vec::new(),
        }
    }

    /// True once every production of `definition` has been chosen at least once.
    #[must_use]
    pub fn is_covered(&self, definition: &Definition) -> bool {
        self.seen
            .get(definition.nonterminal())
            .is_some_and(|seen| (0..definition.len()).all(|i| seen.contains(&i)))
    }

    fn fill_uncovered_and_choose_index(&mut self, definition: &Definition) -> usize {
        self.candidates_buf.clear();
        let seen = self.seen.get(definition.nonterminal());
        for i in 0..definition.len() {
            if !seen.is_some_and(|seen| seen.contains(&i)) {
                self.candidates_buf.push(i);
            }
        }
        if self.candidates_buf.is_empty() {
            random_index(&mut self.rng, definition.len())
        } else {
            let pick = random_index(&mut self.rng, self.candidates_buf.len());
            self.candidates_buf.get(pick).copied().unwrap_or(pick)
        }
    }
}

impl GenerationStrategy for CoverageGuided {
    fn choose<'d>(&mut self, definition: &'d Definition, _depth: usize) -> Option<&'d Production> {
        if definition.is_empty() {
            return None;
        }
        let idx = self.fill_uncovered_and_choose_index(definition);
        match self.seen.get_mut(definition.nonterminal()) {
            Some(seen) => {
                seen.insert(idx);
            }
            None => {
                let seen = crate::HashSet::from_iter([idx]);
                self.seen.insert(definition.nonterminal().to_string(), seen);
            }
        }
        definition.get_production(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    fn epsilon_definition() -> Definition {
        Definition::from_parts("s", vec![crate::production!()])
    }

    fn definition_with_no_productions() -> Definition {
        Definition::new("s")
    }

    #[test]
    fn random_walk_epsilon_definition_chooses_epsilon() {
        let mut strategy = RandomWalk::default();
        let definition = epsilon_definition();
        let result = strategy.choose(&definition, 0);
        assert!(result.is_some(), "single epsilon is a valid choice");
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn random_walk_definition_with_no_productions() {
        let mut strategy = RandomWalk::seed_from_u64(1);
        assert!(strategy.choose(&definition_with_no_productions(), 0).is_none());
    }

    #[test]
    fn random_walk_seeded_is_reproducible() {
        let definition = Definition::from_parts(
            "digit",
            (0..10)
                .map(|d| crate::Production::from_parts(vec![Term::Terminal(d.to_string())]))
                .collect(),
        );
        let mut a = RandomWalk::from_seed([3; 32]);
        let mut b = RandomWalk::from_seed([3; 32]);
        for _ in 0..20 {
            assert_eq!(a.choose(&definition, 0), b.choose(&definition, 0));
        }
    }

    #[test]
    fn borrowed_random_walk_uses_callers_rng() {
        let definition = Definition::from_parts(
            "coin",
            vec![crate::production!("heads"), crate::production!("tails")],
        );
        let mut rng = StdRng::seed_from_u64(11);
        let mut expected_rng = StdRng::seed_from_u64(11);
        let mut strategy = BorrowedRandomWalk { rng: &mut rng };
        for _ in 0..10 {
            assert_eq!(
                strategy.choose(&definition, 0),
                definition.get_random_production(&mut expected_rng)
            );
        }
    }

    #[test]
    fn depth_bounded_epsilon_definition_chooses_epsilon() {
        let mut strategy = DepthBounded::new(5);
        let definition = epsilon_definition();
        let result = strategy.choose(&definition, 10);
        assert!(result.is_some(), "single epsilon is a valid choice");
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn depth_bounded_definition_with_no_productions() {
        let mut strategy = DepthBounded::new(5);
        assert!(strategy.choose(&definition_with_no_productions(), 0).is_none());
    }

    #[test]
    fn depth_bounded_at_max_depth_prefers_terminal_only() {
        let definition = Definition::from_parts(
            "list",
            vec![
                crate::production!("item" <list>),
                crate::production!("item"),
            ],
        );
        let terminal_only = definition.get_production(1).unwrap();
        for seed in 0..20u8 {
            let mut strategy = DepthBounded::from_seed(3, [seed; 32]);
            assert_eq!(strategy.choose(&definition, 3), Some(terminal_only));
        }
    }

    #[test]
    fn depth_bounded_at_max_depth_no_terminal_only_chooses_any() {
        let mut strategy = DepthBounded::new(1);
        let definition =
            Definition::from_parts("s", vec![crate::production!("(" <s> ")")]);
        let chosen = strategy.choose(&definition, 1).expect("should choose one");
        assert_eq!(Some(chosen), definition.get_production(0));
    }

    #[test]
    fn coverage_guided_epsilon_definition_chooses_epsilon() {
        let mut strategy = CoverageGuided::new();
        let definition = epsilon_definition();
        let result = strategy.choose(&definition, 0);
        assert!(result.is_some(), "single epsilon is a valid choice");
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn coverage_guided_definition_with_no_productions() {
        let mut strategy = CoverageGuided::new();
        assert!(strategy.choose(&definition_with_no_productions(), 0).is_none());
    }

    #[test]
    fn coverage_guided_covers_all_before_repeating() {
        let definition = Definition::from_parts(
            "color",
            vec![
                crate::production!("red"),
                crate::production!("green"),
                crate::production!("blue"),
                crate::production!("mauve"),
            ],
        );
        let mut strategy = CoverageGuided::from_seed([5; 32]);
        let mut chosen: Vec<_> = (0..4)
            .map(|_| strategy.choose(&definition, 0).unwrap().clone())
            .collect();
        chosen.sort();
        chosen.dedup();
        assert_eq!(chosen.len(), 4, "each production chosen exactly once");
        assert!(strategy.is_covered(&definition));

        // once covered, choices continue uniformly
        assert!(strategy.choose(&definition, 0).is_some());
    }

    #[test]
    fn coverage_is_tracked_per_nonterminal() {
        let a = Definition::from_parts("a", vec![crate::production!("x")]);
        let b = Definition::from_parts("b", vec![crate::production!("y")]);
        let mut strategy = CoverageGuided::new();
        strategy.choose(&a, 0);
        assert!(strategy.is_covered(&a));
        assert!(!strategy.is_covered(&b));
    }
}
