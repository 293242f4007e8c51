//! Proof Envelope
//!
//! Hex/JSON transport form of a proof and its public inputs, so a proof can
//! leave the process and be verified elsewhere against the same contract.

use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use ark_groth16::Proof;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

use seq_match_circuits::CircuitContract;

use crate::backend::PublicWitness;
use crate::error::ProverResult;

/// Serialised proof and public inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofEnvelope {
    /// Matching semantics the proof was made for
    pub semantics: String,
    /// Groth16 proof, compressed (hex encoded)
    pub proof: String,
    /// Public inputs in allocation order (hex encoded)
    pub public_inputs: Vec<String>,
}

impl ProofEnvelope {
    pub fn new<E: Pairing>(
        proof: &Proof<E>,
        public: &PublicWitness<E::ScalarField>,
    ) -> ProverResult<Self> {
        let mut bytes = Vec::new();
        proof.serialize_compressed(&mut bytes)?;

        let public_inputs = public
            .inputs
            .iter()
            .map(fp_to_hex)
            .collect::<ProverResult<Vec<_>>>()?;

        Ok(Self {
            semantics: public.contract.semantics.to_string(),
            proof: format!("0x{}", hex::encode(bytes)),
            public_inputs,
        })
    }

    pub fn proof<E: Pairing>(&self) -> ProverResult<Proof<E>> {
        let bytes = hex::decode(strip_prefix(&self.proof))?;
        Ok(Proof::<E>::deserialize_compressed(bytes.as_slice())?)
    }

    /// Rebuild the verifier's view under `contract`
    pub fn public_witness<F: PrimeField>(
        &self,
        contract: CircuitContract,
    ) -> ProverResult<PublicWitness<F>> {
        let inputs = self
            .public_inputs
            .iter()
            .map(|s| fp_from_hex(s))
            .collect::<ProverResult<Vec<F>>>()?;
        Ok(PublicWitness { contract, inputs })
    }

    pub fn to_json(&self) -> ProverResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::error::ProverError::Serialization(e.to_string()))
    }
}

/// Field element를 hex 문자열로 변환
fn fp_to_hex<F: PrimeField>(fp: &F) -> ProverResult<String> {
    let mut bytes = Vec::new();
    fp.serialize_compressed(&mut bytes)?;
    Ok(format!("0x{}", hex::encode(bytes)))
}

fn fp_from_hex<F: PrimeField>(s: &str) -> ProverResult<F> {
    let bytes = hex::decode(strip_prefix(s))?;
    Ok(F::deserialize_compressed(bytes.as_slice())?)
}

fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}
