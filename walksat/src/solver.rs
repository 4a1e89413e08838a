//! The WalkSAT search driver: initialization, the termination test, clause
//! and literal selection, and the flip step with its incremental update.
//!
//! This is the only module with an opinion about randomness and timing;
//! everything it needs from outside — the formula, the configuration — is
//! handed to it by the caller. It never touches a file or the process
//! environment itself.

use crate::assignment::Assignment;
use crate::formula::{var, Formula, Lit};
use crate::rng::Rng;
use crate::state::State;

/// Tunable parameters of the search driver, fixed over one run.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Probability that a variable is initialized to `true`. Default `0.1`.
    pub initial_bias: f64,
    /// Probability of considering all literals of the selected clause, not
    /// just the minimum-cost ones, when at least one has `cost > 0`.
    /// Default `0.65`.
    pub non_greedy_choice: f64,
    /// PRNG seed; `0` seeds from wall-clock time.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_bias: 0.1,
            non_greedy_choice: 0.65,
            seed: 0,
        }
    }
}

/// A WalkSAT solver instance bound to one formula and search configuration.
///
/// All mutable state is exclusively owned by the instance; the formula is
/// borrowed read-only for the instance's lifetime.
pub struct Solver<'a> {
    formula: &'a Formula,
    config: Config,
    rng: Rng,
    state: State,
}

impl<'a> Solver<'a> {
    /// Creates a solver and runs initialization (Algorithm W, step W1): a
    /// biased random assignment, the inverse-clause index, `numtrue`,
    /// `cost`, and the unsatisfied-clause stack.
    pub fn new(formula: &'a Formula, config: Config) -> Self {
        let mut rng = Rng::new(config.seed);
        let mut val = Assignment::new(formula.num_vars());
        for v in 1..=formula.num_vars() {
            val.set(v, rng.flip(config.initial_bias));
        }
        let state = State::new(formula, val);
        Solver {
            formula,
            config,
            rng,
            state,
        }
    }

    /// Step W2: whether every clause is currently satisfied.
    pub fn is_solved(&self) -> bool {
        self.state.num_unsatisfied() == 0
    }

    /// Number of currently unsatisfied clauses.
    pub fn num_unsatisfied(&self) -> usize {
        self.state.num_unsatisfied()
    }

    /// The current (possibly partial, if not yet solved) assignment.
    pub fn assignment(&self) -> &Assignment {
        &self.state.val
    }

    /// Performs one flip: clause selection (W3), literal selection (W4), and
    /// the flip itself with incremental maintenance (W5).
    ///
    /// Callers that want a bounded search — the core driver itself never
    /// imposes one — call this directly in a loop guarded by their own cap,
    /// checking [`Solver::is_solved`] after each call.
    pub fn step(&mut self) {
        debug_assert!(!self.is_solved(), "step() called with nothing unsatisfied");
        let k = self.select_clause();
        let choice = self.select_literal(k);
        #[cfg(feature = "logging")]
        log::trace!(
            "flip var {} (clause {}, {} unsatisfied remaining)",
            var(choice),
            k,
            self.state.num_unsatisfied()
        );
        self.state.flip(self.formula, choice);
    }

    /// Runs the search to completion.
    ///
    /// This is the pure core driver described by the specification: its only
    /// exit is a satisfying assignment (W2). It never imposes an iteration
    /// cap and never returns without a model. A bounded search is an ambient
    /// concern layered on top by driving [`Solver::step`] directly.
    pub fn solve(mut self) -> Assignment {
        while !self.is_solved() {
            self.step();
        }
        self.state.val
    }

    /// Clause selection (W3): uniformly picks one currently-unsatisfied clause.
    fn select_clause(&mut self) -> u32 {
        let q = self.rng.uniform(self.state.num_unsatisfied() as u32);
        self.state.unsatisfied_clause(q as usize)
    }

    /// Literal selection (W4): a single reservoir-sampling pass over the
    /// literals of clause `k` that, depending on one up-front coin flip,
    /// either selects uniformly among minimum-cost literals or uniformly
    /// among all literals — except that discovering a zero-cost literal
    /// always forces the minimum-cost reservoir to restart, even in the
    /// "all literals" mode.
    fn select_literal(&mut self, k: u32) -> Lit {
        let all = self.rng.flip(self.config.non_greedy_choice);
        let mut min_cost = u32::MAX;
        let mut choice: Option<Lit> = None;
        let mut reservoir = 1u32;

        for &l in self.formula.clause(k) {
            let c = self.state.cost(var(l));
            if c < min_cost {
                min_cost = c;
                if !all || min_cost == 0 {
                    reservoir = 1;
                }
            }
            if (all && min_cost > 0) || c == min_cost {
                if self.rng.uniform(reservoir) == 0 {
                    choice = Some(l);
                }
                reservoir += 1;
            }
        }

        choice.expect("a clause always has at least one literal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::FormulaBuilder;

    fn formula_from(clauses: &[&[Lit]], num_vars: u32) -> Formula {
        let mut b = FormulaBuilder::new(num_vars);
        for c in clauses {
            b.push_clause(c).unwrap();
        }
        b.finish()
    }

    fn config(seed: u64) -> Config {
        Config {
            seed,
            ..Config::default()
        }
    }

    // S1
    #[test]
    fn single_unit_clause() {
        let f = formula_from(&[&[1]], 1);
        let solver = Solver::new(&f, config(1));
        let model = solver.solve();
        assert!(model.value(1));
    }

    // S4
    #[test]
    fn small_satisfiable_formula() {
        let f = formula_from(&[&[1, 2], &[3], &[-2, -3, 4]], 4);
        for seed in 1..20 {
            let solver = Solver::new(&f, config(seed));
            let model = solver.solve();
            assert!(model.satisfies(&f));
        }
    }

    // S5
    #[test]
    fn formula_with_multiple_models() {
        let f = formula_from(&[&[1, 2, 3], &[-1, -2], &[-2, -3]], 3);
        let solver = Solver::new(&f, config(7));
        let model = solver.solve();
        assert!(model.satisfies(&f));
        assert!(!model.value(2));
        assert!(model.value(1) || model.value(3));
    }

    #[test]
    fn step_preserves_invariants() {
        let f = formula_from(
            &[
                &[1, 2, 3],
                &[-1, -2],
                &[-2, -3],
                &[1, -3],
                &[-1, 2, -3],
                &[3, -2, 1],
            ],
            3,
        );
        let mut solver = Solver::new(&f, config(99));
        for _ in 0..200 {
            solver.state.check_invariants(&f);
            if solver.is_solved() {
                break;
            }
            solver.step();
        }
        solver.state.check_invariants(&f);
    }

    #[test]
    fn determinism_same_seed_same_flip_sequence() {
        let f = formula_from(
            &[&[1, 2, 3], &[-1, -2], &[-2, -3], &[1, -3], &[-1, 2, -3]],
            3,
        );
        let mut a = Solver::new(&f, config(2024));
        let mut b = Solver::new(&f, config(2024));
        for _ in 0..50 {
            if a.is_solved() {
                break;
            }
            a.step();
            b.step();
            assert_eq!(a.assignment(), b.assignment());
        }
    }

    /// Builds a solver with hand-picked `cost` values rather than ones
    /// derived from a random initial assignment, so W4's selection policy
    /// can be checked against a known, fixed input (property #9).
    ///
    /// Clause 0 is `[1, 2, 3]` with all three variables true, so the clause
    /// itself never contributes to any variable's cost; separate unit
    /// clauses on each variable are used to hand-set `cost(1)`, `cost(2)`,
    /// `cost(3)` to arbitrary chosen values.
    fn solver_with_costs(costs: [u32; 3], non_greedy_choice: f64, seed: u64) -> Solver<'static> {
        let mut b = FormulaBuilder::new(3);
        b.push_clause(&[1, 2, 3]).unwrap();
        for (i, &c) in costs.iter().enumerate() {
            let lit = (i + 1) as Lit;
            for _ in 0..c {
                b.push_clause(&[lit]).unwrap();
            }
        }
        let f: &'static Formula = Box::leak(Box::new(b.finish()));

        let mut val = Assignment::new(3);
        val.set(1, true);
        val.set(2, true);
        val.set(3, true);
        let state = State::new(f, val);
        for (i, &c) in costs.iter().enumerate() {
            assert_eq!(state.cost((i + 1) as u32), c, "cost({}) setup", i + 1);
        }

        Solver {
            formula: f,
            config: Config {
                non_greedy_choice,
                ..Config::default()
            },
            rng: Rng::new(seed),
            state,
        }
    }

    // W4: a zero-cost literal forces the reservoir to reset even while
    // sampling "all literals" mode, so it is always the one chosen.
    #[test]
    fn select_literal_zero_cost_forces_reset_even_in_all_mode() {
        let mut solver = solver_with_costs([2, 0, 3], 1.0, 1);
        for _ in 0..200 {
            assert_eq!(var(solver.select_literal(0)), 2);
        }
    }

    // W4: with no zero-cost literal and `all` false (greedy), selection is
    // always the unique minimum-cost literal.
    #[test]
    fn select_literal_greedy_picks_unique_minimum_cost() {
        let mut solver = solver_with_costs([2, 1, 3], 0.0, 2);
        for _ in 0..200 {
            assert_eq!(var(solver.select_literal(0)), 2);
        }
    }

    // W4: with no zero-cost literal and `all` true, selection ranges over
    // every literal of the clause, not just the minimum-cost one.
    #[test]
    fn select_literal_non_greedy_considers_every_literal() {
        let mut solver = solver_with_costs([2, 1, 3], 1.0, 3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..300 {
            seen.insert(var(solver.select_literal(0)));
        }
        assert_eq!(seen, [1, 2, 3].into_iter().collect());
    }

    // W4: with a tied minimum cost and `all` false, selection is confined to
    // the tied minimum-cost literals, never the strictly higher-cost one.
    #[test]
    fn select_literal_greedy_picks_among_tied_minimum() {
        let mut solver = solver_with_costs([1, 1, 3], 0.0, 4);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..300 {
            seen.insert(var(solver.select_literal(0)));
        }
        assert_eq!(seen, [1, 2].into_iter().collect());
    }
}
