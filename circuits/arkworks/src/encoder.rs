//! Sequence Encoder
//!
//! Lifts native symbols into field elements by direct integer embedding.
//! A `char` becomes its Unicode scalar value, a byte its numeric value.
//! The embedding is injective as long as every code is below the field
//! modulus, which [`validation::validate_symbol`] checks.
//!
//! # Interview Q&A
//!
//! Q: 왜 해시가 아니라 직접 임베딩을 쓰는가?
//! A: 비교 연산만 필요하기 때문
//!    - 문자 코드는 254-bit 필드에 그대로 들어감 (충돌 없음)
//!    - 해시는 회로 안에서 수백 개의 constraint 비용
//!    - 동등성 검사는 A[i] - B[j] == 0 하나로 충분

use std::fmt;

use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, fields::fp::FpVar};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::error::{validation, CircuitResult};

/// Who gets to see a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Part of the public witness; the verifier supplies it
    Public,
    /// Known only to the prover
    #[default]
    Secret,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Secret => write!(f, "secret"),
        }
    }
}

/// A single comparable unit
pub trait Symbol: Copy {
    /// Integer code the symbol embeds as
    fn code(&self) -> u64;
}

impl Symbol for char {
    fn code(&self) -> u64 {
        u64::from(u32::from(*self))
    }
}

impl Symbol for u8 {
    fn code(&self) -> u64 {
        u64::from(*self)
    }
}

impl Symbol for u16 {
    fn code(&self) -> u64 {
        u64::from(*self)
    }
}

impl Symbol for u32 {
    fn code(&self) -> u64 {
        u64::from(*self)
    }
}

/// Field encoding of one symbol
pub fn encode_symbol<F: PrimeField, S: Symbol>(symbol: S) -> F {
    F::from(symbol.code())
}

/// An ordered, visibility-tagged run of encoded slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSequence<F: PrimeField> {
    slots: Vec<F>,
    visibility: Visibility,
}

impl<F: PrimeField> EncodedSequence<F> {
    /// Encode symbols, rejecting codes that would collide in `F`.
    ///
    /// `name` only labels errors ("A", "B").
    pub fn encode<S: Symbol>(
        name: &'static str,
        symbols: &[S],
        visibility: Visibility,
    ) -> CircuitResult<Self> {
        let mut slots = Vec::with_capacity(symbols.len());
        for (index, symbol) in symbols.iter().enumerate() {
            validation::validate_symbol::<F>(name, index, symbol.code())?;
            slots.push(encode_symbol(*symbol));
        }
        Ok(Self { slots, visibility })
    }

    /// Encode the characters of a string
    pub fn from_chars(
        name: &'static str,
        text: &str,
        visibility: Visibility,
    ) -> CircuitResult<Self> {
        let chars: Vec<char> = text.chars().collect();
        Self::encode(name, &chars, visibility)
    }

    pub fn slots(&self) -> &[F] {
        &self.slots
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn into_slots(self) -> Vec<F> {
        self.slots
    }
}

/// Allocate `len` circuit variables for a sequence.
///
/// `values` is `None` during setup, when only the shape matters.
/// Public slots become instance variables, secret slots witnesses.
pub fn allocate_sequence<F: PrimeField>(
    cs: ConstraintSystemRef<F>,
    values: Option<&[F]>,
    len: usize,
    visibility: Visibility,
) -> Result<Vec<FpVar<F>>, SynthesisError> {
    (0..len)
        .map(|i| {
            let value = || {
                values
                    .and_then(|slots| slots.get(i).copied())
                    .ok_or(SynthesisError::AssignmentMissing)
            };
            match visibility {
                Visibility::Public => FpVar::new_input(cs.clone(), value),
                Visibility::Secret => FpVar::new_witness(cs.clone(), value),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_relations::r1cs::ConstraintSystem;

    #[test]
    fn test_char_embedding() {
        assert_eq!(encode_symbol::<Fr, _>('A'), Fr::from(65u64));
        assert_eq!(encode_symbol::<Fr, _>(b'A'), Fr::from(65u64));
        assert_eq!(encode_symbol::<Fr, _>('한'), Fr::from(0xD55Cu64));
    }

    #[test]
    fn test_encoding_is_injective_on_bytes() {
        let encoded: Vec<Fr> = (0u8..=255).map(encode_symbol).collect();
        for (i, x) in encoded.iter().enumerate() {
            for y in encoded.iter().skip(i + 1) {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn test_from_chars_keeps_order_and_duplicates() {
        let seq = EncodedSequence::<Fr>::from_chars("A", "ABA", Visibility::Secret).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.slots()[0], seq.slots()[2]);
        assert_eq!(seq.visibility(), Visibility::Secret);
    }

    #[test]
    fn test_allocate_public_and_secret() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let slots = [Fr::from(1u64), Fr::from(2u64)];

        allocate_sequence(cs.clone(), Some(&slots), 2, Visibility::Public).unwrap();
        allocate_sequence(cs.clone(), Some(&slots), 2, Visibility::Secret).unwrap();

        // +1 for the constant "one" instance variable
        assert_eq!(cs.num_instance_variables(), 3);
        assert_eq!(cs.num_witness_variables(), 2);
    }

    #[test]
    fn test_allocate_missing_assignment() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let result = allocate_sequence(cs, None, 2, Visibility::Secret);
        assert!(matches!(result, Err(SynthesisError::AssignmentMissing)));
    }
}
