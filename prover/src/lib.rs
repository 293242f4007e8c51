//! Sequence-Match Prover Library
//!
//! # Overview
//!
//! 비밀 시퀀스 A 와 기준 시퀀스 B 의 매칭 결과를 Groth16 으로 증명합니다.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Prover                             │
//! │                                                          │
//! │  ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌─────────┐    │
//! │  │ Config  │  │ Service │  │ Envelope │  │  Error  │    │
//! │  └────┬────┘  └────┬────┘  └────┬─────┘  └────┬────┘    │
//! │       └────────────┴──── Backend ─┴────────────┘         │
//! └──────────────────────────┼───────────────────────────────┘
//!                            │
//!                            ▼
//!                 ┌────────────────────┐
//!                 │ seq-match-circuits │
//!                 └────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `backend`: compile / setup / assignment / prove / verify (`ProofBackend`)
//! - `config`: 환경 설정 관리
//! - `envelope`: hex/JSON 형태의 증명 전송 포맷
//! - `error`: 에러 타입 및 처리
//! - `service`: 컨트랙트별 키 캐싱 prover
//!
//! ## Usage
//!
//! ```rust,ignore
//! use seq_match_circuits::{CircuitContract, MatchSemantics};
//! use seq_match_prover::MatchProver;
//!
//! let prover = MatchProver::new();
//! let contract = CircuitContract::new(3, 2, MatchSemantics::Existence);
//!
//! let a: Vec<char> = "ABC".chars().collect();
//! let b: Vec<char> = "AB".chars().collect();
//! let result = prover.prove_honest(contract, &a, &b)?;
//! prover.verify(contract, &result.envelope)?;
//! ```

pub mod backend;
pub mod config;
pub mod envelope;
pub mod error;
pub mod service;

pub use backend::{
    CompiledCircuit, ConstraintStats, Groth16Backend, MatchProvingKey, MatchVerifyingKey,
    ProofBackend, PublicWitness, Witness,
};
pub use config::{Config, Environment};
pub use envelope::ProofEnvelope;
pub use error::{ProverError, ProverResult};
pub use service::{MatchProver, ProofResult};
