//! SequenceMatch Circuit - arkworks R1CS Implementation
//!
//! Proves: "my private sequence A relates to reference B with signal s"
//! without revealing A (and B too, when the contract keeps it secret).
//!
//! # Circuit Constraints
//! 1. Allocation: A as witnesses, B and signal per contract visibility
//! 2. Equality: IsZero(A[i] - B[j]) for every (i, j)
//! 3. Reduction: OR / sum / contiguous-select per declared semantics
//! 4. Assertion: computed signal == expected signal
//!
//! Constraint 4 is the only observable effect. A wrong expected value does
//! not fail synthesis; it leaves the constraint system unsatisfied.

use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, eq::EqGadget, fields::fp::FpVar, R1CSVar};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_std::marker::PhantomData;

use crate::contract::CircuitContract;
use crate::encoder::{allocate_sequence, EncodedSequence, Visibility};
use crate::error::{validation, CircuitError, CircuitResult};
use crate::evaluator::{evaluate, evaluate_native};

/// SequenceMatch Circuit for arkworks
///
/// # Design Decision
///
/// Values are `Option`s so the same type serves key generation (`empty`,
/// all `None`) and proving (`assign`, all `Some`). The contract is always
/// present: it alone decides the constraint system's shape.
#[derive(Clone, Debug)]
pub struct SequenceMatchCircuit<F: PrimeField> {
    /// Shape, visibility and semantics
    pub contract: CircuitContract,
    /// Private: encoded sequence A
    pub a: Option<Vec<F>>,
    /// Public or private: encoded sequence B
    pub b: Option<Vec<F>>,
    /// Claimed Match Signal
    pub expected: Option<F>,
    _marker: PhantomData<F>,
}

impl<F: PrimeField> SequenceMatchCircuit<F> {
    /// Create a new circuit from raw field slots
    pub fn new(contract: CircuitContract, a: Vec<F>, b: Vec<F>, expected: F) -> Self {
        Self {
            contract,
            a: Some(a),
            b: Some(b),
            expected: Some(expected),
            _marker: PhantomData,
        }
    }

    /// Create empty circuit for setup
    pub fn empty(contract: CircuitContract) -> Self {
        Self {
            contract,
            a: None,
            b: None,
            expected: None,
            _marker: PhantomData,
        }
    }

    /// Bind encoded sequences to the contract, checking shape and visibility
    pub fn assign(
        contract: CircuitContract,
        a: EncodedSequence<F>,
        b: EncodedSequence<F>,
        expected: u64,
    ) -> CircuitResult<Self> {
        contract.validate()?;
        validation::validate_length("A", contract.a_len, a.len())?;
        validation::validate_length("B", contract.b_len, b.len())?;
        check_visibility("A", contract.a_visibility, a.visibility())?;
        check_visibility("B", contract.b_visibility, b.visibility())?;

        Ok(Self::new(
            contract,
            a.into_slots(),
            b.into_slots(),
            F::from(expected),
        ))
    }

    /// Signal an honest prover would claim for the bound sequences
    pub fn honest_signal(&self) -> Option<u64> {
        match (&self.a, &self.b) {
            (Some(a), Some(b)) => Some(evaluate_native(a, b, self.contract.semantics)),
            _ => None,
        }
    }

    /// Public inputs in allocation order: A, B, then signal (public ones only)
    pub fn public_inputs(&self) -> Option<Vec<F>> {
        let mut inputs = Vec::with_capacity(self.contract.num_public_inputs());
        if self.contract.a_visibility.is_public() {
            inputs.extend_from_slice(self.a.as_deref()?);
        }
        if self.contract.b_visibility.is_public() {
            inputs.extend_from_slice(self.b.as_deref()?);
        }
        if self.contract.signal_visibility.is_public() {
            inputs.push(self.expected?);
        }
        Some(inputs)
    }
}

fn check_visibility(
    sequence: &'static str,
    expected: Visibility,
    actual: Visibility,
) -> CircuitResult<()> {
    if expected != actual {
        return Err(CircuitError::VisibilityMismatch {
            sequence,
            expected,
            actual,
        });
    }
    Ok(())
}

impl<F: PrimeField> ConstraintSynthesizer<F> for SequenceMatchCircuit<F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        let contract = self.contract;

        // ======== Allocate Sequences ========

        let a_vars = allocate_sequence(
            cs.clone(),
            self.a.as_deref(),
            contract.a_len,
            contract.a_visibility,
        )?;

        let b_vars = allocate_sequence(
            cs.clone(),
            self.b.as_deref(),
            contract.b_len,
            contract.b_visibility,
        )?;

        // ======== Allocate Expected Signal ========

        let expected = || self.expected.ok_or(SynthesisError::AssignmentMissing);
        let expected_var = match contract.signal_visibility {
            Visibility::Public => FpVar::new_input(cs.clone(), expected)?,
            Visibility::Secret => FpVar::new_witness(cs.clone(), expected)?,
        };

        // ======== Constraints 2 & 3: Evaluate ========

        let signal = evaluate(&a_vars, &b_vars, contract.semantics)?;

        // Only meaningful once an assignment is present; never affects constraints
        if let Ok(value) = signal.value() {
            tracing::trace!(
                semantics = %contract.semantics,
                signal = %value,
                "evaluated match signal"
            );
        }

        // ======== Constraint 4: Assert ========

        signal.enforce_equal(&expected_var)?;

        Ok(())
    }
}
