//! Error types for sequence-match circuits
//!
//! Everything here is detected *before* circuit synthesis. Once an
//! assignment reaches the constraint system, the only failure mode left is
//! unsatisfiability, which the proof backend reports.

use thiserror::Error;

/// Error types for circuit construction and assignment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    /// A sequence was declared (or supplied) with zero slots
    #[error("sequence {sequence} must not be empty")]
    EmptySequence { sequence: &'static str },

    /// Supplied sequence length disagrees with the contract
    #[error("sequence {sequence} has {actual} symbols, contract declares {expected}")]
    LengthMismatch {
        sequence: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Symbol code does not embed injectively into the field
    #[error("symbol code {code} at {sequence}[{index}] does not fit the field")]
    SymbolOutOfDomain {
        sequence: &'static str,
        index: usize,
        code: u64,
    },

    /// Visibility of a supplied sequence disagrees with the contract
    #[error("sequence {sequence} is {actual}, contract declares {expected}")]
    VisibilityMismatch {
        sequence: &'static str,
        expected: crate::Visibility,
        actual: crate::Visibility,
    },

    /// Invalid circuit contract
    #[error("invalid contract: {message}")]
    InvalidContract { message: String },
}

/// Result type for circuit operations
pub type CircuitResult<T> = Result<T, CircuitError>;

/// Input validation utilities
pub mod validation {
    use ark_ff::PrimeField;

    use super::*;

    /// Upper bound on n·m. The circuit grows with every (i, j) pair.
    pub const MAX_PAIRS: usize = 1 << 16;

    /// Validate that a sequence has exactly the declared length
    pub fn validate_length(
        sequence: &'static str,
        expected: usize,
        actual: usize,
    ) -> CircuitResult<()> {
        if expected == 0 {
            return Err(CircuitError::EmptySequence { sequence });
        }
        if expected != actual {
            return Err(CircuitError::LengthMismatch {
                sequence,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Validate that a symbol code is strictly below the field modulus.
    ///
    /// `F::from(u64)` reduces modulo p, so for fields narrower than 64 bits
    /// two distinct codes could collide.
    pub fn validate_symbol<F: PrimeField>(
        sequence: &'static str,
        index: usize,
        code: u64,
    ) -> CircuitResult<()> {
        let fits = if F::MODULUS_BIT_SIZE > 64 {
            true
        } else {
            let modulus = F::MODULUS;
            let limbs: &[u64] = modulus.as_ref();
            limbs.iter().skip(1).any(|limb| *limb != 0) || code < limbs[0]
        };
        if !fits {
            return Err(CircuitError::SymbolOutOfDomain {
                sequence,
                index,
                code,
            });
        }
        Ok(())
    }

    /// Validate the declared shape of a contract
    pub fn validate_shape(a_len: usize, b_len: usize) -> CircuitResult<()> {
        if a_len == 0 {
            return Err(CircuitError::EmptySequence { sequence: "A" });
        }
        if b_len == 0 {
            return Err(CircuitError::EmptySequence { sequence: "B" });
        }
        match a_len.checked_mul(b_len) {
            Some(pairs) if pairs <= MAX_PAIRS => Ok(()),
            _ => Err(CircuitError::InvalidContract {
                message: format!("{a_len}x{b_len} exceeds {MAX_PAIRS} comparison pairs"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn test_validate_length() {
        assert!(validate_length("A", 3, 3).is_ok());
        assert_eq!(
            validate_length("A", 3, 2),
            Err(CircuitError::LengthMismatch {
                sequence: "A",
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            validate_length("B", 0, 0),
            Err(CircuitError::EmptySequence { sequence: "B" })
        );
    }

    #[test]
    fn test_validate_symbol_bn254() {
        // BN254 scalar field is 254 bits; every u64 embeds injectively
        assert!(validate_symbol::<Fr>("A", 0, u64::MAX).is_ok());
        assert!(validate_symbol::<Fr>("A", 0, 'A' as u64).is_ok());
    }

    #[test]
    fn test_validate_shape() {
        assert!(validate_shape(3, 2).is_ok());
        assert!(validate_shape(0, 2).is_err());
        assert!(validate_shape(3, 0).is_err());

        let err = validate_shape(MAX_PAIRS, 2).unwrap_err();
        assert!(err.to_string().contains("comparison pairs"));
    }
}
