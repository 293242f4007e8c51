//! Match Prover Service
//!
//! Wraps the Groth16 backend with per-contract key caching.
//!
//! # Interview Q&A
//!
//! Q: 키를 왜 캐싱하는가?
//! A: Groth16 setup 은 회로마다 한 번이면 충분
//!    - 같은 컨트랙트 → 같은 R1CS → 같은 키
//!    - 첫 요청 시에만 생성 (lazy initialization)
//!    - 컨트랙트별로 키를 분리해 서로 섞이지 않음
//!
//! Q: 동시 요청은?
//! A: RwLock + double-check
//!    - 읽기 잠금으로 캐시 확인
//!    - 없으면 쓰기 잠금 후 다시 확인하고 생성

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use ark_bn254::{Bn254, Fr};
use ark_groth16::Proof;
use rand::rngs::{OsRng, StdRng};
use rand::SeedableRng;

use seq_match_circuits::{CircuitContract, Symbol};

use crate::backend::{
    CompiledCircuit, Groth16Backend, MatchProvingKey, MatchVerifyingKey, ProofBackend,
    PublicWitness,
};
use crate::envelope::ProofEnvelope;
use crate::error::{ProverError, ProverResult};

/// Proof generation result
#[derive(Clone)]
pub struct ProofResult {
    pub proof: Proof<Bn254>,
    pub public: PublicWitness<Fr>,
    pub envelope: ProofEnvelope,
    /// Signal the proof attests to
    pub signal: u64,
}

/// Cached keys for one contract
struct ContractKeys {
    compiled: CompiledCircuit,
    pk: MatchProvingKey<Bn254>,
    vk: MatchVerifyingKey<Bn254>,
}

/// Sequence-match prover
///
/// # Architecture
///
/// ```text
/// ┌───────────────────────────────────────────────┐
/// │                 MatchProver                    │
/// ├───────────────────────────────────────────────┤
/// │  contract ──► compile ──► setup (cached)       │
/// │  symbols  ──► new_assignment ──► prove         │
/// │  envelope ──► public_witness ──► verify        │
/// │                                               │
/// │  keys: HashMap<CircuitContract, ContractKeys> │
/// └───────────────────────────────────────────────┘
/// ```
pub struct MatchProver {
    backend: Groth16Backend<Bn254>,
    keys: Arc<RwLock<HashMap<CircuitContract, Arc<ContractKeys>>>>,
    /// Deterministic setup for development; `None` uses the OS RNG
    setup_seed: Option<u64>,
}

impl MatchProver {
    pub fn new() -> Self {
        Self::with_setup_seed(None)
    }

    pub fn with_setup_seed(setup_seed: Option<u64>) -> Self {
        tracing::info!(seeded = setup_seed.is_some(), "Initializing match prover");
        Self {
            backend: Groth16Backend::new(),
            keys: Arc::new(RwLock::new(HashMap::new())),
            setup_seed,
        }
    }

    /// Keys for `contract`, generated on first use
    fn ensure_keys(&self, contract: CircuitContract) -> ProverResult<Arc<ContractKeys>> {
        {
            let read_guard = self.keys.read().map_err(|_| ProverError::LockPoisoned)?;
            if let Some(keys) = read_guard.get(&contract) {
                return Ok(keys.clone());
            }
        }

        let mut write_guard = self.keys.write().map_err(|_| ProverError::LockPoisoned)?;

        // Double-check after acquiring write lock
        if let Some(keys) = write_guard.get(&contract) {
            return Ok(keys.clone());
        }

        let compiled = self.backend.compile(contract)?;
        let (pk, vk) = match self.setup_seed {
            Some(seed) => self
                .backend
                .setup(&compiled, &mut StdRng::seed_from_u64(seed))?,
            None => self.backend.setup(&compiled, &mut OsRng)?,
        };

        let keys = Arc::new(ContractKeys { compiled, pk, vk });
        write_guard.insert(contract, keys.clone());
        Ok(keys)
    }

    /// Compiled shape and statistics for `contract`
    pub fn compiled(&self, contract: CircuitContract) -> ProverResult<CompiledCircuit> {
        Ok(self.ensure_keys(contract)?.compiled)
    }

    pub fn verifying_key(&self, contract: CircuitContract) -> ProverResult<MatchVerifyingKey<Bn254>> {
        Ok(self.ensure_keys(contract)?.vk.clone())
    }

    /// Prove that `a` and `b` produce `expected` under `contract`
    pub fn prove<S: Symbol>(
        &self,
        contract: CircuitContract,
        a: &[S],
        b: &[S],
        expected: u64,
    ) -> ProverResult<ProofResult> {
        tracing::info!(
            semantics = %contract.semantics,
            a_len = contract.a_len,
            b_len = contract.b_len,
            expected,
            "Generating sequence-match proof"
        );

        let keys = self.ensure_keys(contract)?;
        let witness = self.backend.new_assignment(&keys.compiled, a, b, expected)?;
        self.prove_witness(&keys, witness)
    }

    /// Prove with the signal the sequences actually produce
    pub fn prove_honest<S: Symbol>(
        &self,
        contract: CircuitContract,
        a: &[S],
        b: &[S],
    ) -> ProverResult<ProofResult> {
        let keys = self.ensure_keys(contract)?;
        let witness = self.backend.new_assignment(&keys.compiled, a, b, 0)?;
        let honest = witness.honest_signal();

        tracing::info!(semantics = %contract.semantics, signal = honest, "Proving honest signal");
        self.prove_witness(&keys, witness.with_claim(honest))
    }

    fn prove_witness(
        &self,
        keys: &ContractKeys,
        witness: crate::backend::Witness<Fr>,
    ) -> ProverResult<ProofResult> {
        let public = self.backend.public_part(&witness);
        let proof = self
            .backend
            .prove(&keys.compiled, &keys.pk, &witness, &mut OsRng)?;
        let envelope = ProofEnvelope::new(&proof, &public)?;

        Ok(ProofResult {
            proof,
            public,
            envelope,
            signal: witness.claimed(),
        })
    }

    /// Verify a transported proof against the keys for `contract`
    pub fn verify(&self, contract: CircuitContract, envelope: &ProofEnvelope) -> ProverResult<()> {
        let keys = self.ensure_keys(contract)?;
        let proof = envelope.proof::<Bn254>()?;
        let public = envelope.public_witness(contract)?;

        let result = self.backend.verify(&proof, &keys.vk, &public);
        match &result {
            Ok(()) => tracing::info!("Verification succeeded"),
            Err(e) => tracing::warn!("Verification failed: {}", e),
        }
        result
    }
}

impl Default for MatchProver {
    fn default() -> Self {
        Self::new()
    }
}
