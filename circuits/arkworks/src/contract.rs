//! Circuit Contract
//!
//! The declared, compile-time shape of a sequence-match circuit:
//! lengths, visibilities and matching semantics. Two circuits with different
//! contracts are different constraint systems and need different keys.

use crate::encoder::Visibility;
use crate::error::{validation, CircuitError, CircuitResult};
use crate::evaluator::MatchSemantics;

/// Compile-time shape of a sequence-match circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CircuitContract {
    /// Number of slots in the private sequence A
    pub a_len: usize,
    /// Visibility of A; anything but secret fails validation
    pub a_visibility: Visibility,
    /// Number of slots in the reference sequence B
    pub b_len: usize,
    /// Visibility of B
    pub b_visibility: Visibility,
    /// Visibility of the Match Signal
    pub signal_visibility: Visibility,
    /// Relationship the signal encodes
    pub semantics: MatchSemantics,
}

impl CircuitContract {
    /// Secret A, public B, public signal
    pub fn new(a_len: usize, b_len: usize, semantics: MatchSemantics) -> Self {
        Self {
            a_len,
            a_visibility: Visibility::Secret,
            b_len,
            b_visibility: Visibility::Public,
            signal_visibility: Visibility::Public,
            semantics,
        }
    }

    pub fn with_reference_visibility(mut self, visibility: Visibility) -> Self {
        self.b_visibility = visibility;
        self
    }

    pub fn with_signal_visibility(mut self, visibility: Visibility) -> Self {
        self.signal_visibility = visibility;
        self
    }

    pub fn with_private_visibility(mut self, visibility: Visibility) -> Self {
        self.a_visibility = visibility;
        self
    }

    /// Check the contract can be compiled
    pub fn validate(&self) -> CircuitResult<()> {
        validation::validate_shape(self.a_len, self.b_len)?;
        // A is the sequence being kept private
        if self.a_visibility.is_public() {
            return Err(CircuitError::VisibilityMismatch {
                sequence: "A",
                expected: Visibility::Secret,
                actual: self.a_visibility,
            });
        }
        Ok(())
    }

    /// Number of public inputs, in allocation order A, B, signal.
    ///
    /// Does not count the constant-one instance variable.
    pub fn num_public_inputs(&self) -> usize {
        let mut count = 0;
        if self.a_visibility.is_public() {
            count += self.a_len;
        }
        if self.b_visibility.is_public() {
            count += self.b_len;
        }
        if self.signal_visibility.is_public() {
            count += 1;
        }
        count
    }

    /// Number of (i, j) comparisons the evaluator unrolls
    pub fn pairs(&self) -> usize {
        self.a_len * self.b_len
    }

    pub fn max_signal(&self) -> u64 {
        self.semantics.max_signal(self.a_len, self.b_len)
    }
}
