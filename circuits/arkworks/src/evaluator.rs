//! Match Evaluator - the core branch-free algorithm
//!
//! Reduces encoded sequences A (length n) and B (length m) to a single
//! Match Signal using only constraint-legal operations.
//!
//! # Strategy
//! 1. For every (i, j): `isEqual(i, j) = IsZero(A[i] - B[j])`
//! 2. Reduce the n×m boolean matrix according to the declared semantics
//!    - `Existence`: OR over all pairs, via `acc + e - acc·e`
//!    - `Count`: plain sum over all pairs (no saturation)
//!    - `Contiguous`: B appears in A as an ordered run at some offset
//!
//! Every pair is visited on every run. There is no early exit: the circuit
//! shape is static, so a "break" on private data cannot exist. Conditionals
//! become `conditionally_select` over values that were already computed.
//!
//! # Interview Q&A
//!
//! Q: R1CS에서 동등성 검사는 어떻게 하는가?
//! A: IsZero 가젯 (is_eq)
//!    - diff = a - b, witness inv 할당
//!    - diff * inv = 1 - eq,  diff * eq = 0
//!    - diff == 0 이면 eq = 1, 아니면 inv = 1/diff 로 eq = 0
//!    - 역수를 직접 "동등성 대용"으로 쓰면 diff = 0 에서 정의되지 않음
//!
//! Q: OR를 왜 a + b - a·b 로 쓰는가?
//! A: 회로에는 short-circuit 불리언이 없음
//!    - a, b ∈ {0, 1} 이면 a + b - ab ∈ {0, 1}
//!    - pair 하나당 곱셈 constraint 1개

use std::fmt;
use std::str::FromStr;

use ark_ff::PrimeField;
use ark_r1cs_std::{boolean::Boolean, eq::EqGadget, fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::SynthesisError;

use crate::error::CircuitError;

/// Which relationship the Match Signal encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchSemantics {
    /// 1 if any A[i] equals any B[j], else 0
    #[default]
    Existence,
    /// Number of equal (i, j) pairs
    Count,
    /// 1 if B occurs in A as a contiguous, ordered run, else 0
    Contiguous,
}

impl MatchSemantics {
    /// Largest signal value an honest assignment can produce
    pub fn max_signal(self, a_len: usize, b_len: usize) -> u64 {
        match self {
            MatchSemantics::Existence | MatchSemantics::Contiguous => 1,
            MatchSemantics::Count => (a_len as u64) * (b_len as u64),
        }
    }
}

impl fmt::Display for MatchSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchSemantics::Existence => write!(f, "existence"),
            MatchSemantics::Count => write!(f, "count"),
            MatchSemantics::Contiguous => write!(f, "contiguous"),
        }
    }
}

impl FromStr for MatchSemantics {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "existence" | "any" => Ok(MatchSemantics::Existence),
            "count" => Ok(MatchSemantics::Count),
            "contiguous" | "ordered" => Ok(MatchSemantics::Contiguous),
            other => Err(CircuitError::InvalidContract {
                message: format!("unknown match semantics '{other}'"),
            }),
        }
    }
}

/// `eq[i][j]` = 1 iff `a[i] == b[j]`
pub fn pairwise_equality<F: PrimeField>(
    a: &[FpVar<F>],
    b: &[FpVar<F>],
) -> Result<Vec<Vec<Boolean<F>>>, SynthesisError> {
    a.iter()
        .map(|a_i| {
            b.iter()
                .map(|b_j| {
                    let diff = a_i - b_j;
                    diff.is_eq(&FpVar::zero())
                })
                .collect()
        })
        .collect()
}

/// Boolean OR as field arithmetic: `x + y - x·y`
pub fn or_combine<F: PrimeField>(x: &FpVar<F>, y: &FpVar<F>) -> FpVar<F> {
    x + y - x * y
}

/// Compute the Match Signal for the given semantics
pub fn evaluate<F: PrimeField>(
    a: &[FpVar<F>],
    b: &[FpVar<F>],
    semantics: MatchSemantics,
) -> Result<FpVar<F>, SynthesisError> {
    let eq = pairwise_equality(a, b)?;

    match semantics {
        MatchSemantics::Existence => Ok(any_equal(&eq)),
        MatchSemantics::Count => Ok(count_equal(&eq)),
        MatchSemantics::Contiguous => contiguous_match(&eq, a.len(), b.len()),
    }
}

fn any_equal<F: PrimeField>(eq: &[Vec<Boolean<F>>]) -> FpVar<F> {
    let mut acc = FpVar::zero();
    for is_equal in eq.iter().flatten() {
        let bit = FpVar::from(is_equal.clone());
        acc = or_combine(&acc, &bit);
    }
    acc
}

fn count_equal<F: PrimeField>(eq: &[Vec<Boolean<F>>]) -> FpVar<F> {
    let mut sum = FpVar::zero();
    for is_equal in eq.iter().flatten() {
        sum += FpVar::from(is_equal.clone());
    }
    sum
}

fn contiguous_match<F: PrimeField>(
    eq: &[Vec<Boolean<F>>],
    n: usize,
    m: usize,
) -> Result<FpVar<F>, SynthesisError> {
    // Depends on the static shape only, never on private values
    if m > n {
        return Ok(FpVar::zero());
    }

    let one = FpVar::one();
    let mut found = FpVar::zero();
    for offset in 0..=(n - m) {
        let window: Vec<Boolean<F>> = (0..m).map(|j| eq[offset + j][j].clone()).collect();
        let aligned = Boolean::kary_and(&window)?;
        found = FpVar::conditionally_select(&aligned, &one, &found)?;
    }
    Ok(found)
}

/// Out-of-circuit reference for the same reduction.
///
/// Used to derive the honest expected signal before proving.
pub fn evaluate_native<F: PrimeField>(a: &[F], b: &[F], semantics: MatchSemantics) -> u64 {
    match semantics {
        MatchSemantics::Existence => {
            u64::from(a.iter().any(|a_i| b.iter().any(|b_j| a_i == b_j)))
        }
        MatchSemantics::Count => a
            .iter()
            .map(|a_i| b.iter().filter(|b_j| a_i == *b_j).count() as u64)
            .sum(),
        MatchSemantics::Contiguous => {
            if b.len() > a.len() {
                return 0;
            }
            u64::from(a.windows(b.len()).any(|window| window == b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_relations::r1cs::ConstraintSystem;

    fn alloc(cs: &ark_relations::r1cs::ConstraintSystemRef<Fr>, text: &str) -> Vec<FpVar<Fr>> {
        text.chars()
            .map(|c| FpVar::new_witness(cs.clone(), || Ok(Fr::from(c as u64))).unwrap())
            .collect()
    }

    fn signal(a: &str, b: &str, semantics: MatchSemantics) -> Fr {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let a = alloc(&cs, a);
        let b = alloc(&cs, b);
        let out = evaluate(&a, &b, semantics).unwrap();
        assert!(cs.is_satisfied().unwrap());
        out.value().unwrap()
    }

    #[test]
    fn test_existence() {
        assert_eq!(signal("ABC", "AB", MatchSemantics::Existence), Fr::from(1u64));
        assert_eq!(signal("ABC", "DE", MatchSemantics::Existence), Fr::from(0u64));
        // Saturates: four equal pairs still give 1
        assert_eq!(signal("AA", "AA", MatchSemantics::Existence), Fr::from(1u64));
    }

    #[test]
    fn test_count_is_per_pair() {
        assert_eq!(signal("ABC", "BC", MatchSemantics::Count), Fr::from(2u64));
        // A[0] matches both B slots: counted twice
        assert_eq!(signal("AXY", "AA", MatchSemantics::Count), Fr::from(2u64));
        assert_eq!(signal("AA", "AA", MatchSemantics::Count), Fr::from(4u64));
    }

    #[test]
    fn test_contiguous() {
        assert_eq!(signal("ABC", "BC", MatchSemantics::Contiguous), Fr::from(1u64));
        assert_eq!(signal("ABC", "CB", MatchSemantics::Contiguous), Fr::from(0u64));
        assert_eq!(signal("ABC", "AC", MatchSemantics::Contiguous), Fr::from(0u64));
        assert_eq!(signal("AB", "ABC", MatchSemantics::Contiguous), Fr::from(0u64));
    }

    #[test]
    fn test_or_combine_truth_table() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        for (x, y, expected) in [(0u64, 0u64, 0u64), (0, 1, 1), (1, 0, 1), (1, 1, 1)] {
            let x = FpVar::new_witness(cs.clone(), || Ok(Fr::from(x))).unwrap();
            let y = FpVar::new_witness(cs.clone(), || Ok(Fr::from(y))).unwrap();
            assert_eq!(or_combine(&x, &y).value().unwrap(), Fr::from(expected));
        }
    }

    #[test]
    fn test_native_matches_circuit() {
        let cases = [("ABC", "AB"), ("ABC", "DE"), ("ABC", "BC"), ("ABCA", "CA"), ("A", "A")];
        for (a, b) in cases {
            let a_f: Vec<Fr> = a.chars().map(|c| Fr::from(c as u64)).collect();
            let b_f: Vec<Fr> = b.chars().map(|c| Fr::from(c as u64)).collect();
            for semantics in [
                MatchSemantics::Existence,
                MatchSemantics::Count,
                MatchSemantics::Contiguous,
            ] {
                let native = evaluate_native(&a_f, &b_f, semantics);
                assert_eq!(signal(a, b, semantics), Fr::from(native), "{a}/{b}/{semantics}");
            }
        }
    }

    #[test]
    fn test_semantics_from_str() {
        assert_eq!("count".parse::<MatchSemantics>().unwrap(), MatchSemantics::Count);
        assert_eq!(" Existence ".parse::<MatchSemantics>().unwrap(), MatchSemantics::Existence);
        assert_eq!("ordered".parse::<MatchSemantics>().unwrap(), MatchSemantics::Contiguous);
        assert!("regex".parse::<MatchSemantics>().is_err());
    }

    #[test]
    fn test_constraint_growth_is_pairwise() {
        let count = |n: usize, m: usize| {
            let cs = ConstraintSystem::<Fr>::new_ref();
            let a = alloc(&cs, &"A".repeat(n));
            let b = alloc(&cs, &"B".repeat(m));
            evaluate(&a, &b, MatchSemantics::Existence).unwrap();
            cs.num_constraints()
        };
        // O(n·m): doubling n roughly doubles the constraints
        let small = count(4, 4);
        let large = count(8, 4);
        assert!(large >= 2 * small - 2, "small={small} large={large}");
    }
}
