//! Compiled rank-1 constraint systems.
//!
//! A compiled system is a flat list of constraints `L · R = O`, where each of
//! `L`, `R`, `O` is a linear expression over wires. Wires are laid out as
//!
//! ```text
//! [ one | public inputs | secret inputs | internal wires ]
//!   \______ public ______/
//! ```
//!
//! Wire `0` is the constant-one wire. Coefficients are stored once in a
//! deduplicated table and referenced by slot. Some internal wires are produced
//! by hints: functions evaluated by the solver instead of being derived from a
//! constraint.
//!
//! The dependency levels used by the solver are built once, at compile time,
//! and cached alongside the constraints.
//!
//! [`R1csCircuit`] lets the same compiled system drive arkworks' Groth16
//! setup, so keys always match the constraint layout the prover uses.

use crate::config::SchedulerConfig;
use crate::dag::{build_levels, Levels};
use crate::errors::ConstraintSystemError;
use crate::keys::compute_circuit_hash;

use ark_ff::PrimeField;
use ark_relations::{
    lc,
    r1cs::{
        ConstraintSynthesizer, ConstraintSystemRef, LinearCombination, SynthesisError, Variable,
    },
};
use std::collections::HashMap;

/// Wire id of the constant-one wire.
pub const ONE_WIRE: usize = 0;

/// Coefficient slot of `0`.
pub const COEFF_ZERO: u32 = 0;
/// Coefficient slot of `1`.
pub const COEFF_ONE: u32 = 1;
/// Coefficient slot of `2`.
pub const COEFF_TWO: u32 = 2;
/// Coefficient slot of `-1`.
pub const COEFF_MINUS_ONE: u32 = 3;

/// A single `coefficient · wire` entry of a linear expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Term {
    /// Slot in the coefficient table.
    pub coeff_id: u32,
    /// Wire id in the final wire layout.
    pub wire_id: u32,
}

impl Term {
    /// Creates a term from a coefficient slot and a wire id.
    pub fn new(coeff_id: u32, wire_id: usize) -> Self {
        Self {
            coeff_id,
            wire_id: wire_id as u32,
        }
    }

    /// The referenced wire.
    #[inline]
    pub fn wire(&self) -> usize {
        self.wire_id as usize
    }
}

/// A linear combination of wires.
pub type LinearExpression = Vec<Term>;

/// A rank-1 constraint `L · R = O`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct R1c {
    /// Left operand.
    pub l: LinearExpression,
    /// Right operand.
    pub r: LinearExpression,
    /// Output.
    pub o: LinearExpression,
}

impl R1c {
    /// Iterates over every term of `L`, `R` and `O`, in that order.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.l.iter().chain(self.r.iter()).chain(self.o.iter())
    }
}

/// Deduplicating table of constraint coefficients.
#[derive(Clone, Debug)]
pub struct CoeffTable<F: PrimeField> {
    values: Vec<F>,
    index: HashMap<F, u32>,
}

impl<F: PrimeField> Default for CoeffTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField> CoeffTable<F> {
    /// Creates a table pre-seeded with `0, 1, 2, -1`.
    pub fn new() -> Self {
        let mut table = Self {
            values: Vec::new(),
            index: HashMap::new(),
        };
        table.insert(F::zero());
        table.insert(F::one());
        table.insert(F::from(2u64));
        table.insert(-F::one());
        table
    }

    /// Returns the slot of `value`, inserting it if needed.
    pub fn insert(&mut self, value: F) -> u32 {
        if let Some(&id) = self.index.get(&value) {
            return id;
        }
        let id = self.values.len() as u32;
        self.values.push(value);
        self.index.insert(value, id);
        id
    }

    /// Number of distinct coefficients.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the table is empty (never the case after `new`).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the table, returning the coefficients by slot.
    pub fn into_values(self) -> Vec<F> {
        self.values
    }
}

/// Which hint function produces a set of wires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HintKind {
    /// `1` if the input is zero, `0` otherwise.
    IsZero,
    /// Bit `i` of the canonical integer of the first input, `i` being the second input.
    IthBit,
    /// A caller-provided function, registered with the solver under this id.
    Custom(u32),
}

impl HintKind {
    /// Returns true for hints outside the cheap built-in set.
    pub fn is_custom(&self) -> bool {
        matches!(self, HintKind::Custom(_))
    }
}

/// An input to a hint function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HintInput<F> {
    /// A constant field element.
    FieldConstant(F),
    /// A linear expression over already-solved wires.
    WireReference(LinearExpression),
}

/// A hint: `wires = kind(inputs)`, evaluated by the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hint<F> {
    /// Hint function.
    pub kind: HintKind,
    /// Inputs, in the order the function expects them.
    pub inputs: Vec<HintInput<F>>,
    /// Output wires.
    pub wires: Vec<usize>,
}

/// A compiled constraint system with its cached solving schedule.
#[derive(Clone, Debug)]
pub struct CompiledR1cs<F: PrimeField> {
    num_public: usize,
    num_secret: usize,
    num_internal: usize,
    constraints: Vec<R1c>,
    coefficients: Vec<F>,
    hints: Vec<Hint<F>>,
    hint_by_wire: HashMap<usize, usize>,
    levels: Levels,
    digest: [u8; 32],
}

impl<F: PrimeField> CompiledR1cs<F> {
    /// Validates a constraint system and builds its dependency levels.
    ///
    /// `num_public` counts the constant-one wire. Every wire other than the
    /// constant-one wire must appear in at least one constraint.
    pub fn new(
        num_public: usize,
        num_secret: usize,
        num_internal: usize,
        constraints: Vec<R1c>,
        coefficients: Vec<F>,
        hints: Vec<Hint<F>>,
        config: &SchedulerConfig,
    ) -> Result<Self, ConstraintSystemError> {
        if constraints.is_empty() {
            return Err(ConstraintSystemError::EmptyCircuit);
        }
        if num_public == 0 {
            return Err(ConstraintSystemError::MalformedLinearExpression {
                constraint: 0,
                message: "the wire layout has no constant-one wire".to_string(),
            });
        }

        let num_wires = num_public + num_secret + num_internal;
        let num_inputs = num_public + num_secret;

        let check_term = |t: &Term| -> Result<(), String> {
            if t.wire() >= num_wires {
                return Err(format!("wire {} out of range ({} wires)", t.wire(), num_wires));
            }
            if t.coeff_id as usize >= coefficients.len() {
                return Err(format!(
                    "coefficient slot {} out of range ({} coefficients)",
                    t.coeff_id,
                    coefficients.len()
                ));
            }
            Ok(())
        };

        let mut constrained = vec![false; num_wires];
        for (cid, c) in constraints.iter().enumerate() {
            for t in c.terms() {
                check_term(t).map_err(|message| {
                    ConstraintSystemError::MalformedLinearExpression {
                        constraint: cid,
                        message,
                    }
                })?;
                constrained[t.wire()] = true;
            }
        }

        let mut hint_by_wire = HashMap::new();
        for (hid, hint) in hints.iter().enumerate() {
            let first = hint.wires.first().copied().unwrap_or_default();
            let malformed = |message: String| ConstraintSystemError::MalformedHint {
                wire: first,
                message,
            };
            if hint.wires.is_empty() {
                return Err(malformed("hint has no output wires".to_string()));
            }
            for &w in &hint.wires {
                if w < num_inputs || w >= num_wires {
                    return Err(malformed(format!("output wire {} is not an internal wire", w)));
                }
                if hint_by_wire.insert(w, hid).is_some() {
                    return Err(malformed(format!("wire {} is produced by two hints", w)));
                }
            }
            for input in &hint.inputs {
                if let HintInput::WireReference(le) = input {
                    for t in le {
                        check_term(t).map_err(&malformed)?;
                    }
                }
            }
        }

        let unconstrained_inputs: Vec<usize> =
            (1..num_inputs).filter(|&w| !constrained[w]).collect();
        if let Some(&first) = unconstrained_inputs.first() {
            return Err(ConstraintSystemError::UnconstrainedInputs {
                count: unconstrained_inputs.len(),
                first,
            });
        }
        let mut unconstrained_hints: Vec<usize> = hint_by_wire
            .keys()
            .copied()
            .filter(|&w| !constrained[w])
            .collect();
        unconstrained_hints.sort_unstable();
        if let Some(&first) = unconstrained_hints.first() {
            return Err(ConstraintSystemError::UnconstrainedHints {
                count: unconstrained_hints.len(),
                first,
            });
        }
        let unconstrained_internal: Vec<usize> =
            (num_inputs..num_wires).filter(|&w| !constrained[w]).collect();
        if let Some(&first) = unconstrained_internal.first() {
            return Err(ConstraintSystemError::UnconstrainedInternal {
                count: unconstrained_internal.len(),
                first,
            });
        }

        let mut system = Self {
            num_public,
            num_secret,
            num_internal,
            constraints,
            coefficients,
            hints,
            hint_by_wire,
            levels: Levels::default(),
            digest: [0u8; 32],
        };
        system.levels = build_levels(&system, config);
        system.digest = compute_circuit_hash(&system);
        Ok(system)
    }

    /// Number of public wires, including the constant-one wire.
    pub fn num_public(&self) -> usize {
        self.num_public
    }

    /// Number of secret input wires.
    pub fn num_secret(&self) -> usize {
        self.num_secret
    }

    /// Number of internal wires.
    pub fn num_internal(&self) -> usize {
        self.num_internal
    }

    /// Number of wires known before solving starts (public and secret).
    pub fn num_inputs(&self) -> usize {
        self.num_public + self.num_secret
    }

    /// Total number of wires.
    pub fn num_wires(&self) -> usize {
        self.num_public + self.num_secret + self.num_internal
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Number of rows of the QAP: one per constraint plus one per public wire.
    pub fn qap_size(&self) -> usize {
        self.constraints.len() + self.num_public
    }

    /// The constraints, in compilation order.
    pub fn constraints(&self) -> &[R1c] {
        &self.constraints
    }

    /// The coefficient table.
    pub fn coefficients(&self) -> &[F] {
        &self.coefficients
    }

    /// Coefficient stored in `slot`.
    #[inline]
    pub fn coefficient(&self, slot: u32) -> F {
        self.coefficients[slot as usize]
    }

    /// All hints.
    pub fn hints(&self) -> &[Hint<F>] {
        &self.hints
    }

    /// Index and hint producing `wire`, if any.
    pub fn hint_for_wire(&self, wire: usize) -> Option<(usize, &Hint<F>)> {
        self.hint_by_wire
            .get(&wire)
            .map(|&hid| (hid, &self.hints[hid]))
    }

    /// The cached solving schedule.
    pub fn levels(&self) -> &Levels {
        &self.levels
    }

    /// SHA-256 digest of the constraint system.
    pub fn digest(&self) -> [u8; 32] {
        self.digest
    }
}

/// Visibility of a wire allocated by [`R1csBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Known to the verifier.
    Public,
    /// Supplied by the prover.
    Secret,
    /// Computed by the solver.
    Internal,
}

/// A wire handle returned by [`R1csBuilder`]. Ids are relative to the
/// visibility class until the system is compiled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Wire {
    visibility: Visibility,
    index: usize,
}

impl Wire {
    /// The constant-one wire.
    pub const ONE: Wire = Wire {
        visibility: Visibility::Public,
        index: 0,
    };

    /// Visibility of this wire.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }
}

/// A hint argument while building a constraint system.
#[derive(Clone, Debug)]
pub enum HintArg<F> {
    /// A constant field element.
    Constant(F),
    /// A linear combination of wires.
    Combination(Vec<(F, Wire)>),
}

impl<F> From<Wire> for HintArg<F>
where
    F: PrimeField,
{
    fn from(wire: Wire) -> Self {
        HintArg::Combination(vec![(F::one(), wire)])
    }
}

struct PendingHint<F> {
    kind: HintKind,
    inputs: Vec<HintArg<F>>,
    wires: Vec<Wire>,
}

/// Incremental builder for [`CompiledR1cs`].
///
/// Stands in for the external circuit compiler: wires are allocated per
/// visibility class and re-numbered into the final layout by [`compile`].
///
/// [`compile`]: R1csBuilder::compile
pub struct R1csBuilder<F: PrimeField> {
    num_public: usize,
    num_secret: usize,
    num_internal: usize,
    constraints: Vec<[Vec<(F, Wire)>; 3]>,
    hints: Vec<PendingHint<F>>,
}

impl<F: PrimeField> Default for R1csBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField> R1csBuilder<F> {
    /// Creates an empty builder holding only the constant-one wire.
    pub fn new() -> Self {
        Self {
            num_public: 1,
            num_secret: 0,
            num_internal: 0,
            constraints: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Allocates a public input wire.
    pub fn public_input(&mut self) -> Wire {
        self.num_public += 1;
        Wire {
            visibility: Visibility::Public,
            index: self.num_public - 1,
        }
    }

    /// Allocates a secret input wire.
    pub fn secret_input(&mut self) -> Wire {
        self.num_secret += 1;
        Wire {
            visibility: Visibility::Secret,
            index: self.num_secret - 1,
        }
    }

    /// Allocates an internal wire, to be resolved by a constraint.
    pub fn internal(&mut self) -> Wire {
        self.num_internal += 1;
        Wire {
            visibility: Visibility::Internal,
            index: self.num_internal - 1,
        }
    }

    /// Adds the constraint `l · r = o`.
    pub fn enforce(&mut self, l: &[(F, Wire)], r: &[(F, Wire)], o: &[(F, Wire)]) {
        self.constraints.push([l.to_vec(), r.to_vec(), o.to_vec()]);
    }

    /// Adds `left · right = out` over single wires.
    pub fn mul(&mut self, left: Wire, right: Wire, out: Wire) {
        self.enforce(&[(F::one(), left)], &[(F::one(), right)], &[(F::one(), out)]);
    }

    /// Declares `n_outputs` internal wires produced by a hint.
    pub fn hint(&mut self, kind: HintKind, inputs: Vec<HintArg<F>>, n_outputs: usize) -> Vec<Wire> {
        let wires: Vec<Wire> = (0..n_outputs).map(|_| self.internal()).collect();
        self.hints.push(PendingHint {
            kind,
            inputs,
            wires: wires.clone(),
        });
        wires
    }

    /// Number of constraints added so far.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn wire_id(&self, wire: Wire) -> Option<usize> {
        let (offset, count) = match wire.visibility {
            Visibility::Public => (0, self.num_public),
            Visibility::Secret => (self.num_public, self.num_secret),
            Visibility::Internal => (self.num_public + self.num_secret, self.num_internal),
        };
        (wire.index < count).then_some(offset + wire.index)
    }

    fn linear_expression(
        &self,
        coeffs: &mut CoeffTable<F>,
        terms: &[(F, Wire)],
    ) -> Result<LinearExpression, String> {
        terms
            .iter()
            .map(|(coeff, wire)| {
                let id = self
                    .wire_id(*wire)
                    .ok_or_else(|| format!("{:?} was not allocated by this builder", wire))?;
                Ok(Term::new(coeffs.insert(*coeff), id))
            })
            .collect()
    }

    /// Re-numbers wires into the final layout, validates the system and
    /// builds its dependency levels.
    pub fn compile(&self, config: &SchedulerConfig) -> Result<CompiledR1cs<F>, ConstraintSystemError> {
        let mut coeffs = CoeffTable::new();

        let mut constraints = Vec::with_capacity(self.constraints.len());
        for (cid, [l, r, o]) in self.constraints.iter().enumerate() {
            let malformed = |message| ConstraintSystemError::MalformedLinearExpression {
                constraint: cid,
                message,
            };
            constraints.push(R1c {
                l: self.linear_expression(&mut coeffs, l).map_err(malformed)?,
                r: self.linear_expression(&mut coeffs, r).map_err(malformed)?,
                o: self.linear_expression(&mut coeffs, o).map_err(malformed)?,
            });
        }

        let mut hints = Vec::with_capacity(self.hints.len());
        for pending in &self.hints {
            let wires: Vec<usize> = pending
                .wires
                .iter()
                .filter_map(|w| self.wire_id(*w))
                .collect();
            let mut inputs = Vec::with_capacity(pending.inputs.len());
            for arg in &pending.inputs {
                inputs.push(match arg {
                    HintArg::Constant(c) => HintInput::FieldConstant(*c),
                    HintArg::Combination(terms) => HintInput::WireReference(
                        self.linear_expression(&mut coeffs, terms).map_err(|message| {
                            ConstraintSystemError::MalformedHint {
                                wire: wires.first().copied().unwrap_or_default(),
                                message,
                            }
                        })?,
                    ),
                });
            }
            hints.push(Hint {
                kind: pending.kind,
                inputs,
                wires,
            });
        }

        CompiledR1cs::new(
            self.num_public,
            self.num_secret,
            self.num_internal,
            constraints,
            coeffs.into_values(),
            hints,
            config,
        )
    }
}

/// Evaluates a linear expression against a full wire assignment.
pub fn evaluate<F: PrimeField>(cs: &CompiledR1cs<F>, le: &[Term], wires: &[F]) -> F {
    le.iter()
        .map(|t| cs.coefficient(t.coeff_id) * wires[t.wire()])
        .sum()
}

/// Arkworks view of a compiled constraint system.
///
/// Used to run the circuit-specific Groth16 setup and, with a witness, to
/// cross-check satisfiability with arkworks' own constraint system.
#[derive(Clone, Copy)]
pub struct R1csCircuit<'a, F: PrimeField> {
    cs: &'a CompiledR1cs<F>,
    witness: Option<&'a [F]>,
}

impl<'a, F: PrimeField> R1csCircuit<'a, F> {
    /// Creates a circuit without wire values (for setup).
    pub fn new(cs: &'a CompiledR1cs<F>) -> Self {
        Self { cs, witness: None }
    }

    /// Creates a circuit with a full wire assignment.
    pub fn with_witness(cs: &'a CompiledR1cs<F>, witness: &'a [F]) -> Self {
        Self {
            cs,
            witness: Some(witness),
        }
    }

    fn value(&self, wire: usize) -> Result<F, SynthesisError> {
        self.witness
            .and_then(|w| w.get(wire).copied())
            .ok_or(SynthesisError::AssignmentMissing)
    }

    fn linear_combination(&self, le: &[Term], vars: &[Variable]) -> LinearCombination<F> {
        let mut lc = lc!();
        for t in le {
            lc = lc + (self.cs.coefficient(t.coeff_id), vars[t.wire()]);
        }
        lc
    }
}

impl<F: PrimeField> ConstraintSynthesizer<F> for R1csCircuit<'_, F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        let num_wires = self.cs.num_wires();
        let num_public = self.cs.num_public();

        // Arkworks numbers instance variables after its implicit `One`, and
        // witness variables in allocation order, which matches our layout.
        let mut vars = Vec::with_capacity(num_wires);
        vars.push(Variable::One);
        for wire in 1..num_wires {
            let var = if wire < num_public {
                cs.new_input_variable(|| self.value(wire))?
            } else {
                cs.new_witness_variable(|| self.value(wire))?
            };
            vars.push(var);
        }

        for c in self.cs.constraints() {
            cs.enforce_constraint(
                self.linear_combination(&c.l, &vars),
                self.linear_combination(&c.r, &vars),
                self.linear_combination(&c.o, &vars),
            )?;
        }

        Ok(())
    }
}
