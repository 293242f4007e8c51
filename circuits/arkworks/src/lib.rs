//! arkworks R1CS Implementation
//!
//! ZK circuits proving that a private sequence of symbols matches a
//! reference sequence, without revealing the private sequence.
//!
//! # Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `encoder` | symbols → field elements, visibility per slot |
//! | `evaluator` | branch-free n×m match reduction (IsZero, OR, select) |
//! | `contract` | lengths, visibility, semantics fixed at compile time |
//! | `circuit` | `SequenceMatchCircuit`, the `ConstraintSynthesizer` |
//!
//! # Semantics
//!
//! | Semantics | Signal | Constraints (n×m) |
//! |-----------|--------|-------------------|
//! | Existence | 1 if any A[i] == B[j] | ~3·n·m |
//! | Count | number of equal pairs | ~2·n·m |
//! | Contiguous | 1 if B is a run inside A | ~2·n·m + (n-m+1)·m |
//!
//! # Example
//! ```ignore
//! use seq_match_circuits::{CircuitContract, EncodedSequence, MatchSemantics,
//!     SequenceMatchCircuit, Visibility};
//! use ark_bn254::Fr;
//!
//! let contract = CircuitContract::new(3, 2, MatchSemantics::Existence);
//! let a = EncodedSequence::<Fr>::from_chars("A", "ABC", Visibility::Secret)?;
//! let b = EncodedSequence::<Fr>::from_chars("B", "AB", Visibility::Public)?;
//! let circuit = SequenceMatchCircuit::assign(contract, a, b, 1)?;
//! ```

pub mod circuit;
pub mod contract;
pub mod encoder;
pub mod error;
pub mod evaluator;


pub use circuit::SequenceMatchCircuit;
pub use contract::CircuitContract;
pub use encoder::{encode_symbol, EncodedSequence, Symbol, Visibility};
pub use error::{validation, CircuitError, CircuitResult};
pub use evaluator::{evaluate, evaluate_native, MatchSemantics};

/// Scalar field the circuits are proved over
pub type ConstraintF = ark_bn254::Fr;
