//! Error Handling Module
//!
//! Every failure in compile / setup / prove / verify is terminal for that
//! call and reaches the caller. Nothing here retries.
//!
//! # Design Decision
//!
//! 세 가지 분류:
//! - Contract: 형태/가시성 불일치 (assignment 생성 시점)
//! - Unsatisfiable: 주장한 signal 이 실제 값과 다름 (prove 시점)
//! - Backend: 키 생성/증명/검증 실패 (그대로 전파)

use ark_relations::r1cs::SynthesisError;
use seq_match_circuits::{CircuitContract, CircuitError};
use thiserror::Error;

/// Prover pipeline error
#[derive(Debug, Error)]
pub enum ProverError {
    // ============ Contract ============
    #[error("contract error: {0}")]
    Contract(#[from] CircuitError),

    #[error("key material was generated for {expected:?}, got {actual:?}")]
    ContractMismatch {
        expected: CircuitContract,
        actual: CircuitContract,
    },

    #[error("public witness has {actual} inputs, verifying key expects {expected}")]
    PublicInputCount { expected: usize, actual: usize },

    // ============ Compile ============
    #[error("failed to compile circuit: {0}")]
    Compile(String),

    // ============ Unsatisfiable ============
    #[error("failed to prove: assignment does not satisfy the circuit (claimed signal {claimed})")]
    Unsatisfiable { claimed: u64 },

    // ============ Backend ============
    #[error("failed to set up proving and verifying keys: {0}")]
    Setup(#[source] SynthesisError),

    #[error("failed to prove: {0}")]
    Prove(#[source] SynthesisError),

    #[error("failed to verify: {0}")]
    Verify(#[source] SynthesisError),

    #[error("proof rejected by verifier")]
    VerificationFailed,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("key cache lock poisoned")]
    LockPoisoned,
}

/// Result type for prover operations
pub type ProverResult<T> = Result<T, ProverError>;

impl From<ark_serialize::SerializationError> for ProverError {
    fn from(err: ark_serialize::SerializationError) -> Self {
        tracing::error!("Serialization error: {:?}", err);
        ProverError::Serialization(err.to_string())
    }
}

impl From<hex::FromHexError> for ProverError {
    fn from(err: hex::FromHexError) -> Self {
        ProverError::Serialization(err.to_string())
    }
}
