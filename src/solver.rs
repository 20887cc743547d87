//! Witness solver.
//!
//! Walks the cached levels of a compiled system in order. Tasks of a level
//! run concurrently on the rayon pool; each task reads only wires solved by
//! earlier levels and returns the wires it resolves, which are committed once
//! the whole level is done. For each constraint the solver runs pending hints,
//! solves the single remaining unknown wire (if any) and checks `L·R = O`.
//!
//! Alongside the witness, the solver records the QAP evaluations `a`, `b`,
//! `c`: one row per constraint, then one row per public wire `j` with
//! `a = wⱼ` and `b = c = 0`.

use crate::dag::Task;
use crate::errors::SolverError;
use crate::r1cs::{CompiledR1cs, HintInput, HintKind, Term, ONE_WIRE};

use ark_ff::{BigInteger, PrimeField};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info_span};

/// A custom hint function: reads the evaluated inputs and fills every output.
pub type HintFn<F> = Arc<dyn Fn(&[F], &mut [F]) -> Result<(), String> + Send + Sync>;

/// A full assignment and the QAP evaluations derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<F> {
    /// `L` evaluations, one per QAP row.
    pub a: Vec<F>,
    /// `R` evaluations, one per QAP row.
    pub b: Vec<F>,
    /// `O` evaluations, one per QAP row.
    pub c: Vec<F>,
    /// Every wire value, in wire order.
    pub witness: Vec<F>,
}

impl<F: Copy> Solution<F> {
    /// Public input values, constant-one wire excluded.
    pub fn public_inputs(&self, num_public: usize) -> Vec<F> {
        self.witness[ONE_WIRE + 1..num_public].to_vec()
    }
}

/// Solves compiled systems, with a registry of custom hint functions.
pub struct Solver<'a, F: PrimeField> {
    cs: &'a CompiledR1cs<F>,
    hints: HashMap<u32, HintFn<F>>,
}

impl<F: PrimeField> fmt::Debug for Solver<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.hints.keys().collect();
        ids.sort_unstable();
        f.debug_struct("Solver")
            .field("constraints", &self.cs.num_constraints())
            .field("custom_hints", &ids)
            .finish()
    }
}

#[derive(Default)]
struct TaskOutput<F> {
    writes: Vec<(usize, F)>,
    rows: Vec<(usize, F, F, F)>,
}

/// Wire values visible to one task: committed levels plus its own writes.
struct View<'s, F> {
    values: &'s [F],
    solved: &'s [bool],
    local: &'s [(usize, F)],
}

impl<F: PrimeField> View<'_, F> {
    fn get(&self, wire: usize) -> Option<F> {
        if self.solved[wire] {
            return Some(self.values[wire]);
        }
        self.local
            .iter()
            .rev()
            .find(|(w, _)| *w == wire)
            .map(|(_, v)| *v)
    }
}

impl<'a, F: PrimeField> Solver<'a, F> {
    /// Creates a solver for `cs` with only the built-in hints.
    pub fn new(cs: &'a CompiledR1cs<F>) -> Self {
        Self {
            cs,
            hints: HashMap::new(),
        }
    }

    /// Registers the function of `HintKind::Custom(id)`.
    pub fn with_hint<H>(mut self, id: u32, hint: H) -> Self
    where
        H: Fn(&[F], &mut [F]) -> Result<(), String> + Send + Sync + 'static,
    {
        self.hints.insert(id, Arc::new(hint));
        self
    }

    /// The constraint system this solver runs.
    pub fn constraint_system(&self) -> &'a CompiledR1cs<F> {
        self.cs
    }

    /// Solves every wire from the given inputs.
    ///
    /// `public` excludes the constant-one wire.
    pub fn solve(&self, public: &[F], secret: &[F]) -> Result<Solution<F>, SolverError> {
        let cs = self.cs;
        let expected_public = cs.num_public() - 1;
        if public.len() != expected_public {
            return Err(SolverError::InputCountMismatch {
                kind: "public",
                expected: expected_public,
                actual: public.len(),
            });
        }
        if secret.len() != cs.num_secret() {
            return Err(SolverError::InputCountMismatch {
                kind: "secret",
                expected: cs.num_secret(),
                actual: secret.len(),
            });
        }

        let _span = info_span!(
            "solve",
            constraints = cs.num_constraints(),
            wires = cs.num_wires()
        )
        .entered();
        let start = Instant::now();

        let num_wires = cs.num_wires();
        let mut values = vec![F::zero(); num_wires];
        let mut solved = vec![false; num_wires];
        values[ONE_WIRE] = F::one();
        values[ONE_WIRE + 1..cs.num_public()].copy_from_slice(public);
        values[cs.num_public()..cs.num_inputs()].copy_from_slice(secret);
        solved[..cs.num_inputs()].fill(true);

        let rows = cs.qap_size();
        let mut a = vec![F::zero(); rows];
        let mut b = vec![F::zero(); rows];
        let mut c = vec![F::zero(); rows];

        for level in cs.levels() {
            let outputs = level
                .tasks
                .par_iter()
                .map(|task| self.run_task(task, &values, &solved))
                .collect::<Result<Vec<_>, _>>()?;

            for out in outputs {
                for (wire, value) in out.writes {
                    values[wire] = value;
                    solved[wire] = true;
                }
                for (row, l, r, o) in out.rows {
                    a[row] = l;
                    b[row] = r;
                    c[row] = o;
                }
            }
        }

        if let Some(wire) = solved.iter().position(|s| !s) {
            return Err(SolverError::UnresolvedWire { wire });
        }

        let offset = cs.num_constraints();
        a[offset..offset + cs.num_public()].copy_from_slice(&values[..cs.num_public()]);

        debug!(
            levels = cs.levels().num_levels(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "solved witness"
        );

        Ok(Solution {
            a,
            b,
            c,
            witness: values,
        })
    }

    fn run_task(
        &self,
        task: &Task,
        values: &[F],
        solved: &[bool],
    ) -> Result<TaskOutput<F>, SolverError> {
        let mut out = TaskOutput::default();
        for &node in &task.nodes {
            let row = self.solve_constraint(node, values, solved, &mut out.writes)?;
            out.rows.push(row);
        }
        Ok(out)
    }

    fn solve_constraint(
        &self,
        cid: usize,
        values: &[F],
        solved: &[bool],
        writes: &mut Vec<(usize, F)>,
    ) -> Result<(usize, F, F, F), SolverError> {
        let cs = self.cs;
        let r1c = &cs.constraints()[cid];

        // Hints first: their outputs are never solved from the constraint.
        for t in r1c.terms() {
            if let Some((hid, _)) = cs.hint_for_wire(t.wire()) {
                self.run_hint(hid, values, solved, writes)?;
            }
        }

        let view = View {
            values,
            solved,
            local: writes,
        };
        let (l, l_unknown) = self.partial(&r1c.l, &view, cid)?;
        let (r, r_unknown) = self.partial(&r1c.r, &view, cid)?;
        let (o, o_unknown) = self.partial(&r1c.o, &view, cid)?;

        let (l, r, o) = match (l_unknown, r_unknown, o_unknown) {
            (None, None, None) => (l, r, o),
            (Some((w, k)), None, None) => {
                // (l + k·x)·r = o
                let x = r
                    .inverse()
                    .and_then(|r_inv| k.inverse().map(|k_inv| (o * r_inv - l) * k_inv))
                    .ok_or(SolverError::UnsolvableDivision {
                        constraint: cid,
                        wire: w,
                    })?;
                writes.push((w, x));
                (l + k * x, r, o)
            }
            (None, Some((w, k)), None) => {
                // l·(r + k·x) = o
                let x = l
                    .inverse()
                    .and_then(|l_inv| k.inverse().map(|k_inv| (o * l_inv - r) * k_inv))
                    .ok_or(SolverError::UnsolvableDivision {
                        constraint: cid,
                        wire: w,
                    })?;
                writes.push((w, x));
                (l, r + k * x, o)
            }
            (None, None, Some((w, k))) => {
                // l·r = o + k·x
                let x = k
                    .inverse()
                    .map(|k_inv| (l * r - o) * k_inv)
                    .ok_or(SolverError::UnsolvableDivision {
                        constraint: cid,
                        wire: w,
                    })?;
                writes.push((w, x));
                (l, r, o + k * x)
            }
            _ => return Err(SolverError::MultipleUnknowns { constraint: cid }),
        };

        if l * r != o {
            return Err(SolverError::Unsatisfied { constraint: cid });
        }
        Ok((cid, l, r, o))
    }

    /// Sums the known terms of `le`. Terms on a single unknown wire are
    /// folded into one coefficient; a second unknown wire is an error.
    fn partial(
        &self,
        le: &[Term],
        view: &View<'_, F>,
        cid: usize,
    ) -> Result<(F, Option<(usize, F)>), SolverError> {
        let mut sum = F::zero();
        let mut unknown: Option<(usize, F)> = None;
        for t in le {
            let coeff = self.cs.coefficient(t.coeff_id);
            match view.get(t.wire()) {
                Some(v) => sum += coeff * v,
                None => match &mut unknown {
                    None => unknown = Some((t.wire(), coeff)),
                    Some((w, k)) if *w == t.wire() => *k += coeff,
                    Some(_) => return Err(SolverError::MultipleUnknowns { constraint: cid }),
                },
            }
        }
        Ok((sum, unknown))
    }

    /// Runs hint `hid` unless its outputs are already known, after first
    /// running the hints whose outputs it reads.
    fn run_hint(
        &self,
        hid: usize,
        values: &[F],
        solved: &[bool],
        writes: &mut Vec<(usize, F)>,
    ) -> Result<(), SolverError> {
        let cs = self.cs;
        let hint = &cs.hints()[hid];
        let known = |writes: &[(usize, F)], wire: usize| {
            View {
                values,
                solved,
                local: writes,
            }
            .get(wire)
            .is_some()
        };
        if known(&writes[..], hint.wires[0]) {
            return Ok(());
        }
        for input in &hint.inputs {
            let HintInput::WireReference(le) = input else {
                continue;
            };
            for t in le {
                if known(&writes[..], t.wire()) {
                    continue;
                }
                if let Some((dep, _)) = cs.hint_for_wire(t.wire()) {
                    self.run_hint(dep, values, solved, writes)?;
                }
            }
        }

        let view = View {
            values,
            solved,
            local: writes,
        };
        let first = hint.wires[0];
        let mut inputs = Vec::with_capacity(hint.inputs.len());
        for input in &hint.inputs {
            inputs.push(match input {
                HintInput::FieldConstant(c) => *c,
                HintInput::WireReference(le) => {
                    let mut sum = F::zero();
                    for t in le {
                        let v = view
                            .get(t.wire())
                            .ok_or(SolverError::UnresolvedWire { wire: t.wire() })?;
                        sum += cs.coefficient(t.coeff_id) * v;
                    }
                    sum
                }
            });
        }

        let mut outputs = vec![F::zero(); hint.wires.len()];
        let failed = |message: String| SolverError::HintFailed {
            wire: first,
            message,
        };
        match hint.kind {
            HintKind::IsZero => is_zero(&inputs, &mut outputs).map_err(failed)?,
            HintKind::IthBit => ith_bit(&inputs, &mut outputs).map_err(failed)?,
            HintKind::Custom(id) => {
                let f = self.hints.get(&id).ok_or(SolverError::MissingHint { id })?;
                f(&inputs, &mut outputs).map_err(failed)?;
            }
        }
        writes.extend(hint.wires.iter().copied().zip(outputs));
        Ok(())
    }
}

/// `out[0] = 1` if `inputs[0]` is zero, `0` otherwise.
fn is_zero<F: PrimeField>(inputs: &[F], outputs: &mut [F]) -> Result<(), String> {
    match (inputs, outputs) {
        ([x], [out]) => {
            *out = if x.is_zero() { F::one() } else { F::zero() };
            Ok(())
        }
        (i, o) => Err(format!(
            "IsZero expects 1 input and 1 output, got {} and {}",
            i.len(),
            o.len()
        )),
    }
}

/// `out[0]` = bit `inputs[1]` of the canonical integer of `inputs[0]`.
fn ith_bit<F: PrimeField>(inputs: &[F], outputs: &mut [F]) -> Result<(), String> {
    match (inputs, outputs) {
        ([x, i], [out]) => {
            let index = i.into_bigint();
            let limbs = index.as_ref();
            if limbs[1..].iter().any(|&l| l != 0) || limbs[0] >= F::MODULUS_BIT_SIZE as u64 {
                return Err(format!("bit index {} out of range", i));
            }
            let bit = x.into_bigint().get_bit(limbs[0] as usize);
            *out = if bit { F::one() } else { F::zero() };
            Ok(())
        }
        (i, o) => Err(format!(
            "IthBit expects 2 inputs and 1 output, got {} and {}",
            i.len(),
            o.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use crate::r1cs::{evaluate, HintArg, R1csBuilder, Wire};
    use ark_bn254::Fr;
    use ark_ff::{Field, Zero};

    fn fr(v: u64) -> Fr {
        Fr::from(v)
    }

    /// out = x³ + x + 5, out public.
    fn cubic() -> CompiledR1cs<Fr> {
        let mut b = R1csBuilder::<Fr>::new();
        let out = b.public_input();
        let x = b.secret_input();
        let x2 = b.internal();
        let x3 = b.internal();
        b.mul(x, x, x2);
        b.mul(x2, x, x3);
        b.enforce(
            &[(fr(1), x3), (fr(1), x), (fr(5), Wire::ONE)],
            &[(fr(1), Wire::ONE)],
            &[(fr(1), out)],
        );
        b.compile(&SchedulerConfig::default()).unwrap()
    }

    #[test]
    fn solves_internal_wires_and_fills_qap_rows() {
        let cs = cubic();
        let sol = Solver::new(&cs).solve(&[fr(35)], &[fr(3)]).unwrap();
        assert_eq!(sol.witness, vec![fr(1), fr(35), fr(3), fr(9), fr(27)]);
        assert_eq!(sol.public_inputs(cs.num_public()), vec![fr(35)]);

        assert_eq!(sol.a.len(), cs.qap_size());
        for (i, r1c) in cs.constraints().iter().enumerate() {
            assert_eq!(sol.a[i], evaluate(&cs, &r1c.l, &sol.witness));
            assert_eq!(sol.b[i], evaluate(&cs, &r1c.r, &sol.witness));
            assert_eq!(sol.c[i], evaluate(&cs, &r1c.o, &sol.witness));
            assert_eq!(sol.a[i] * sol.b[i], sol.c[i]);
        }
        // Public rows: a = wire value, b = c = 0.
        assert_eq!(sol.a[3], fr(1));
        assert_eq!(sol.a[4], fr(35));
        assert!(sol.b[3..].iter().all(Zero::is_zero));
        assert!(sol.c[3..].iter().all(Zero::is_zero));
    }

    #[test]
    fn solves_unknown_on_left_and_right() {
        // 2·x = y with y secret: unknown x on the left.
        let mut b = R1csBuilder::<Fr>::new();
        let y = b.secret_input();
        let x = b.internal();
        b.enforce(&[(fr(2), x)], &[(fr(1), Wire::ONE)], &[(fr(1), y)]);
        // y · (z + 1) = 3y, unknown z on the right.
        let z = b.internal();
        b.enforce(
            &[(fr(1), y)],
            &[(fr(1), z), (fr(1), Wire::ONE)],
            &[(fr(3), y)],
        );
        let cs = b.compile(&SchedulerConfig::default()).unwrap();
        let sol = Solver::new(&cs).solve(&[], &[fr(10)]).unwrap();
        assert_eq!(sol.witness[2], fr(5));
        assert_eq!(sol.witness[3], fr(2));
    }

    #[test]
    fn repeated_unknown_is_folded() {
        // x + x = y
        let mut b = R1csBuilder::<Fr>::new();
        let y = b.secret_input();
        let x = b.internal();
        b.enforce(&[(fr(1), x), (fr(1), x)], &[(fr(1), Wire::ONE)], &[(fr(1), y)]);
        let cs = b.compile(&SchedulerConfig::default()).unwrap();
        let sol = Solver::new(&cs).solve(&[], &[fr(8)]).unwrap();
        assert_eq!(sol.witness[2], fr(4));
    }

    #[test]
    fn rejects_wrong_input_counts() {
        let cs = cubic();
        let solver = Solver::new(&cs);
        assert!(matches!(
            solver.solve(&[], &[fr(3)]),
            Err(SolverError::InputCountMismatch { kind: "public", expected: 1, actual: 0 })
        ));
        assert!(matches!(
            solver.solve(&[fr(35)], &[fr(3), fr(4)]),
            Err(SolverError::InputCountMismatch { kind: "secret", expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn reports_unsatisfied_constraint() {
        let cs = cubic();
        assert!(matches!(
            Solver::new(&cs).solve(&[fr(36)], &[fr(3)]),
            Err(SolverError::Unsatisfied { constraint: 2 })
        ));
    }

    #[test]
    fn reports_multiple_unknowns() {
        let mut b = R1csBuilder::<Fr>::new();
        let x = b.secret_input();
        let u = b.internal();
        let v = b.internal();
        b.mul(u, v, x);
        let cs = b.compile(&SchedulerConfig::default()).unwrap();
        assert!(matches!(
            Solver::new(&cs).solve(&[], &[fr(1)]),
            Err(SolverError::MultipleUnknowns { constraint: 0 })
        ));
    }

    #[test]
    fn reports_division_by_zero() {
        // x · 0 = y: cannot solve for x.
        let mut b = R1csBuilder::<Fr>::new();
        let y = b.secret_input();
        let zero = b.secret_input();
        let x = b.internal();
        b.mul(x, zero, y);
        let cs = b.compile(&SchedulerConfig::default()).unwrap();
        assert!(matches!(
            Solver::new(&cs).solve(&[], &[fr(1), fr(0)]),
            Err(SolverError::UnsolvableDivision { constraint: 0, wire: 3 })
        ));
    }

    /// inv = 1/x if x != 0, via the IsZero hint: x·inv = 1 - z, x·z = 0.
    fn is_zero_gadget() -> CompiledR1cs<Fr> {
        let mut b = R1csBuilder::<Fr>::new();
        let z_pub = b.public_input();
        let x = b.secret_input();
        let z = b.hint(HintKind::IsZero, vec![x.into()], 1)[0];
        let inv = b.internal();
        b.enforce(&[(fr(1), x)], &[(fr(1), z)], &[]);
        b.enforce(
            &[(fr(1), x)],
            &[(fr(1), inv)],
            &[(fr(1), Wire::ONE), (-fr(1), z)],
        );
        b.enforce(&[(fr(1), z)], &[(fr(1), Wire::ONE)], &[(fr(1), z_pub)]);
        b.compile(&SchedulerConfig::default()).unwrap()
    }

    #[test]
    fn is_zero_hint_on_nonzero_input() {
        let cs = is_zero_gadget();
        let sol = Solver::new(&cs).solve(&[fr(0)], &[fr(4)]).unwrap();
        // wires: one, z_pub, x, z, inv
        assert_eq!(sol.witness[3], fr(0));
        assert_eq!(sol.witness[4], fr(4).inverse().unwrap());
    }

    #[test]
    fn is_zero_hint_on_zero_input_reports_division() {
        // With x = 0 the gadget cannot determine inv from x·inv = 1 - z.
        let cs = is_zero_gadget();
        assert!(matches!(
            Solver::new(&cs).solve(&[fr(1)], &[fr(0)]),
            Err(SolverError::UnsolvableDivision { .. })
        ));
    }

    #[test]
    fn ith_bit_hint_decomposes() {
        // Recompose x from its four low bits: x = b0 + 2b1 + 4b2 + 8b3, bits boolean.
        let mut b = R1csBuilder::<Fr>::new();
        let x = b.secret_input();
        let bits: Vec<Wire> = (0..4)
            .map(|i| b.hint(HintKind::IthBit, vec![x.into(), HintArg::Constant(fr(i))], 1)[0])
            .collect();
        for &bit in &bits {
            b.enforce(&[(fr(1), bit)], &[(fr(1), bit)], &[(fr(1), bit)]);
        }
        let sum: Vec<(Fr, Wire)> = bits.iter().enumerate().map(|(i, &w)| (fr(1 << i), w)).collect();
        b.enforce(&sum, &[(fr(1), Wire::ONE)], &[(fr(1), x)]);
        let cs = b.compile(&SchedulerConfig::default()).unwrap();

        let sol = Solver::new(&cs).solve(&[], &[fr(11)]).unwrap();
        assert_eq!(&sol.witness[2..6], &[fr(1), fr(1), fr(0), fr(1)]);
        assert!(matches!(
            Solver::new(&cs).solve(&[], &[fr(17)]),
            Err(SolverError::Unsatisfied { constraint: 4 })
        ));
    }

    fn custom_square_root() -> CompiledR1cs<Fr> {
        // r = sqrt(x) via custom hint 1, constrained by r·r = x.
        let mut b = R1csBuilder::<Fr>::new();
        let x = b.public_input();
        let r = b.hint(HintKind::Custom(1), vec![x.into()], 1)[0];
        b.mul(r, r, x);
        b.compile(&SchedulerConfig::default()).unwrap()
    }

    #[test]
    fn custom_hint_runs_registered_function() {
        let cs = custom_square_root();
        let solver = Solver::new(&cs).with_hint(1, |inputs: &[Fr], outputs: &mut [Fr]| {
            outputs[0] = inputs[0].sqrt().ok_or("not a square")?;
            Ok(())
        });
        let sol = solver.solve(&[fr(49)], &[]).unwrap();
        assert_eq!(sol.witness[2] * sol.witness[2], fr(49));

        let err = solver.solve(&[fr(5)], &[]).unwrap_err();
        // 5 is a non-residue modulo the BN254 scalar field order.
        assert!(matches!(err, SolverError::HintFailed { wire: 2, .. }));
    }

    #[test]
    fn hint_reading_hint_runs_on_demand_in_either_order() {
        // y = x + 1 via custom hint 1, z = IsZero(y), z·y = t, y = x + 1, t = 0.
        for swap in [false, true] {
            let mut b = R1csBuilder::<Fr>::new();
            let x = b.secret_input();
            let y = b.hint(HintKind::Custom(1), vec![x.into()], 1)[0];
            let z = b.hint(HintKind::IsZero, vec![y.into()], 1)[0];
            let t = b.internal();
            if swap {
                b.mul(z, y, t);
            } else {
                b.mul(y, z, t);
            }
            b.enforce(&[(fr(1), x), (fr(1), Wire::ONE)], &[(fr(1), Wire::ONE)], &[(fr(1), y)]);
            b.enforce(&[(fr(1), t)], &[(fr(1), Wire::ONE)], &[]);
            let cs = b.compile(&SchedulerConfig::default()).unwrap();

            let solver = Solver::new(&cs).with_hint(1, |inputs: &[Fr], outputs: &mut [Fr]| {
                outputs[0] = inputs[0] + Fr::from(1u64);
                Ok(())
            });
            let sol = solver.solve(&[], &[fr(4)]).unwrap();
            // wires: one, x, y, z, t
            assert_eq!(sol.witness, vec![fr(1), fr(4), fr(5), fr(0), fr(0)]);
        }
    }

    #[test]
    fn custom_hint_without_function_is_reported() {
        let cs = custom_square_root();
        assert!(matches!(
            Solver::new(&cs).solve(&[fr(49)], &[]),
            Err(SolverError::MissingHint { id: 1 })
        ));
    }

    #[test]
    fn solution_is_independent_of_task_packing() {
        let mut b = R1csBuilder::<Fr>::new();
        let x = b.secret_input();
        let mut prev = x;
        let mut outs = Vec::new();
        for _ in 0..50 {
            let w = b.internal();
            b.enforce(&[(fr(1), prev), (fr(1), Wire::ONE)], &[(fr(1), x)], &[(fr(1), w)]);
            outs.push(w);
            prev = if outs.len() % 3 == 0 { x } else { w };
        }
        let wide = b.compile(&SchedulerConfig::default()).unwrap();
        let narrow = b
            .compile(&SchedulerConfig {
                max_task_weight: 1,
                ..SchedulerConfig::default()
            })
            .unwrap();
        let s1 = Solver::new(&wide).solve(&[], &[fr(3)]).unwrap();
        let s2 = Solver::new(&narrow).solve(&[], &[fr(3)]).unwrap();
        assert!(narrow.levels().iter().any(|l| l.tasks.len() > 1));
        assert_eq!(s1, s2);
    }
}
