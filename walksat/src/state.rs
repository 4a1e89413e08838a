//! Mutable, incrementally-maintained solver state derived from the current
//! assignment: per-clause true-literal counts, per-variable break cost, the
//! unsatisfied-clause stack with its reverse index, and the inverse-clause
//! index. Only [`State::flip`] (and the initialization in [`State::new`])
//! mutates this state; [`State::register_satisfied`] and
//! [`State::register_unsatisfied`] are the sole mutators of the stack and its
//! reverse index.

use crate::assignment::Assignment;
use crate::formula::{var, Formula, Lit};

/// Sentinel meaning "this clause is currently satisfied" in the reverse index.
const NIL: u32 = u32::MAX;

#[derive(Debug)]
pub(crate) struct State {
    pub(crate) val: Assignment,
    /// Per-clause count of currently true literals.
    numtrue: Vec<u32>,
    /// Per-variable break cost, indexed by `v - 1`.
    cost: Vec<u32>,
    /// Dense stack of unsatisfied clause indices.
    f: Vec<u32>,
    /// `w[k]` is `k`'s position in `f`, or [`NIL`] iff clause `k` is satisfied.
    w: Vec<u32>,
    /// `inv_pos[v - 1]` / `inv_neg[v - 1]`: clauses containing `+v` / `-v`,
    /// with multiplicity. Built once in [`State::new`], never mutated after.
    inv_pos: Vec<Vec<u32>>,
    inv_neg: Vec<Vec<u32>>,
}

impl State {
    /// Builds incremental state for `formula` from an already-initialized
    /// random assignment (Algorithm W, step W1).
    pub(crate) fn new(formula: &Formula, val: Assignment) -> Self {
        let nv = formula.num_vars() as usize;
        let nc = formula.num_clauses() as usize;
        let mut state = State {
            val,
            numtrue: vec![0; nc],
            cost: vec![0; nv],
            f: Vec::new(),
            w: vec![NIL; nc],
            inv_pos: vec![Vec::new(); nv],
            inv_neg: vec![Vec::new(); nv],
        };

        for k in 0..nc as u32 {
            let mut last_true_var = None;
            for &lit in formula.clause(k) {
                let v = var(lit);
                if lit > 0 {
                    state.inv_pos[(v - 1) as usize].push(k);
                } else {
                    state.inv_neg[(v - 1) as usize].push(k);
                }
                if state.val.is_true(lit) {
                    state.numtrue[k as usize] += 1;
                    last_true_var = Some(v);
                }
            }
            match state.numtrue[k as usize] {
                0 => state.register_unsatisfied(k),
                1 => state.cost[(last_true_var.expect("numtrue==1 has a true literal") - 1) as usize] += 1,
                _ => {}
            }
        }

        state
    }

    pub(crate) fn num_unsatisfied(&self) -> usize {
        self.f.len()
    }

    pub(crate) fn unsatisfied_clause(&self, q: usize) -> u32 {
        self.f[q]
    }

    pub(crate) fn cost(&self, v: u32) -> u32 {
        self.cost[(v - 1) as usize]
    }

    /// Removes `k` from the unsatisfied stack, precondition `w[k] != NIL`.
    /// Idempotent if `k` is already absent.
    ///
    /// Swaps `k` with the last element of `f` and fixes the reverse index of
    /// the element that got swapped *into* `k`'s old slot -- not of `k`
    /// itself, which is being removed.
    fn register_satisfied(&mut self, k: u32) {
        let pos = self.w[k as usize];
        if pos == NIL {
            return;
        }
        let last = *self.f.last().expect("w[k] != NIL implies f is non-empty");
        self.f[pos as usize] = last;
        self.w[last as usize] = pos;
        self.f.pop();
        self.w[k as usize] = NIL;
    }

    /// Appends `k` to the unsatisfied stack, precondition `w[k] == NIL`.
    /// Idempotent if `k` is already present.
    fn register_unsatisfied(&mut self, k: u32) {
        if self.w[k as usize] != NIL {
            return;
        }
        self.f.push(k);
        self.w[k as usize] = (self.f.len() - 1) as u32;
    }

    /// The clauses containing `lit`, with multiplicity.
    fn inv(&self, lit: Lit) -> &[u32] {
        let v = (var(lit) - 1) as usize;
        if lit > 0 {
            &self.inv_pos[v]
        } else {
            &self.inv_neg[v]
        }
    }

    /// Finds the first literal of clause `k` that is currently true, other
    /// than `skip`. Used by the "scan for the unique/other true literal"
    /// step of the flip routine (W5).
    ///
    /// Returns `None` when `skip` (or the variable just flipped) occurs more
    /// than once in the clause and every true occurrence is a copy of it --
    /// there is no genuinely distinct "other" literal to find. Callers fall
    /// back to crediting the flipped variable itself in that case.
    fn find_true_lit(formula: &Formula, val: &Assignment, k: u32, skip: Option<Lit>) -> Option<u32> {
        formula
            .clause(k)
            .iter()
            .find(|&&l| Some(l) != skip && val.is_true(l))
            .map(|&l| var(l))
    }

    /// Performs one flip of `var(choice)` and incrementally restores all
    /// invariants (Algorithm W, step W5). `choice` need not be the literal
    /// form that was true before the flip.
    pub(crate) fn flip(&mut self, formula: &Formula, choice: Lit) {
        let v = var(choice);
        let pos: Lit = if self.val.is_true(choice) { choice } else { -choice };
        let neg: Lit = -pos;

        self.val.flip(v);

        let n_losing = self.inv(pos).len();
        for i in 0..n_losing {
            let k = self.inv(pos)[i];
            self.numtrue[k as usize] -= 1;
            match self.numtrue[k as usize] {
                0 => {
                    self.register_unsatisfied(k);
                    self.cost[(v - 1) as usize] -= 1;
                }
                1 => {
                    // Usually the scan finds a genuinely distinct true
                    // literal. If clause `k` holds duplicate copies of `pos`
                    // (same variable as the one just flipped), this is the
                    // first of those copies to be processed and the scan
                    // finds nothing real yet -- credit `v` itself; the next
                    // copy's decrement-to-0 branch below will cancel it out.
                    let w = Self::find_true_lit(formula, &self.val, k, None).unwrap_or(v);
                    self.cost[(w - 1) as usize] += 1;
                }
                _ => {}
            }
        }

        let n_gaining = self.inv(neg).len();
        for i in 0..n_gaining {
            let k = self.inv(neg)[i];
            self.numtrue[k as usize] += 1;
            match self.numtrue[k as usize] {
                1 => {
                    self.register_satisfied(k);
                    self.cost[(v - 1) as usize] += 1;
                }
                2 => {
                    // Symmetric case: if `neg` occurs more than once in `k`,
                    // there is no distinct "other" true literal -- this
                    // occurrence is undoing the `cost[v] += 1` credit the
                    // clause's prior (duplicate) occurrence just gave above.
                    let w = Self::find_true_lit(formula, &self.val, k, Some(neg)).unwrap_or(v);
                    self.cost[(w - 1) as usize] -= 1;
                }
                _ => {}
            }
        }
    }

    /// Checks every §3 invariant against a from-scratch recomputation.
    /// Used by tests only; not part of the hot path.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self, formula: &Formula) {
        for k in 0..formula.num_clauses() {
            let expected = formula
                .clause(k)
                .iter()
                .filter(|&&l| self.val.is_true(l))
                .count() as u32;
            assert_eq!(self.numtrue[k as usize], expected, "numtrue[{}]", k);
            assert_eq!(self.w[k as usize] == NIL, expected != 0, "w[{}]", k);
            if let Some(&pos) = self.w.get(k as usize) {
                if pos != NIL {
                    assert_eq!(self.f[pos as usize], k);
                }
            }
        }
        let expected_unsatisfied = (0..formula.num_clauses())
            .filter(|&k| self.numtrue[k as usize] == 0)
            .count();
        assert_eq!(self.f.len(), expected_unsatisfied);

        let mut expected_cost = vec![0u32; formula.num_vars() as usize];
        for k in 0..formula.num_clauses() {
            if self.numtrue[k as usize] == 1 {
                let w = Self::find_true_lit(formula, &self.val, k, None)
                    .expect("numtrue[k] == 1 guarantees a true literal exists");
                expected_cost[(w - 1) as usize] += 1;
            }
        }
        assert_eq!(self.cost, expected_cost);

        let mut seen = std::collections::HashSet::new();
        for &k in &self.f {
            assert!(seen.insert(k), "duplicate clause {} in f", k);
        }
    }
}
