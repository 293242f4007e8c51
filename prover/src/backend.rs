//! Proof Backend - Groth16 over arkworks
//!
//! The narrow interface the match circuit needs from a proof system:
//! compile → setup → assignment → public part → prove → verify.
//!
//! # Interview Q&A
//!
//! Q: arkworks Groth16 는 왜 prove 전에 만족성 검사를 따로 하는가?
//! A: Groth16::prove 는 제약이 깨져도 증명을 만들어 버림
//!    - 그 증명은 verify 에서 거절되지만, 원인이 흐려짐
//!    - ConstraintSystem::is_satisfied() 로 먼저 검사
//!    - 잘못된 signal 주장은 "failed to prove" 로 즉시 보고
//!
//! Q: 컨트랙트가 바뀌면?
//! A: 다른 R1CS → 다른 키
//!    - 키는 생성된 컨트랙트를 함께 보관
//!    - 다른 컨트랙트의 public witness 와 섞이면 ContractMismatch

use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, OptimizationGoal, SynthesisMode,
};
use ark_snark::SNARK;
use ark_std::marker::PhantomData;
use rand_core::{CryptoRng, RngCore};

use seq_match_circuits::{CircuitContract, EncodedSequence, SequenceMatchCircuit, Symbol};

use crate::error::{ProverError, ProverResult};

/// R1CS size of a compiled contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintStats {
    pub constraints: usize,
    pub witness_variables: usize,
    /// Excludes the constant-one instance variable
    pub public_inputs: usize,
}

/// A contract that has been synthesised and checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledCircuit {
    pub contract: CircuitContract,
    pub stats: ConstraintStats,
}

/// Proving key bound to the contract it was generated for
#[derive(Clone)]
pub struct MatchProvingKey<E: Pairing> {
    pub contract: CircuitContract,
    pub key: ProvingKey<E>,
}

/// Verifying key bound to the contract it was generated for
#[derive(Clone)]
pub struct MatchVerifyingKey<E: Pairing> {
    pub contract: CircuitContract,
    pub key: VerifyingKey<E>,
}

/// Full assignment: secret and public values for one run
#[derive(Debug, Clone)]
pub struct Witness<F: PrimeField> {
    circuit: SequenceMatchCircuit<F>,
    claimed: u64,
    public: Vec<F>,
}

impl<F: PrimeField> Witness<F> {
    pub fn contract(&self) -> CircuitContract {
        self.circuit.contract
    }

    /// Signal the assignment claims
    pub fn claimed(&self) -> u64 {
        self.claimed
    }

    /// Signal the bound sequences actually produce
    pub fn honest_signal(&self) -> u64 {
        self.circuit.honest_signal().unwrap_or_default()
    }

    /// Same sequences, different claimed signal
    pub fn with_claim(mut self, expected: u64) -> Self {
        self.circuit.expected = Some(F::from(expected));
        self.claimed = expected;
        if self.circuit.contract.signal_visibility.is_public() {
            if let Some(signal) = self.public.last_mut() {
                *signal = F::from(expected);
            }
        }
        self
    }
}

/// The verifier's view of an assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicWitness<F: PrimeField> {
    pub contract: CircuitContract,
    pub inputs: Vec<F>,
}

/// Minimal contract between the match circuit and a proof system
pub trait ProofBackend {
    type Field: PrimeField;
    type ProvingKey;
    type VerifyingKey;
    type Proof;

    /// Synthesise the circuit shape for `contract` and check it
    fn compile(&self, contract: CircuitContract) -> ProverResult<CompiledCircuit>;

    /// Generate key material for a compiled circuit
    fn setup<R: RngCore + CryptoRng>(
        &self,
        compiled: &CompiledCircuit,
        rng: &mut R,
    ) -> ProverResult<(Self::ProvingKey, Self::VerifyingKey)>;

    /// Encode concrete sequences and a claimed signal against the contract
    fn new_assignment<S: Symbol>(
        &self,
        compiled: &CompiledCircuit,
        a: &[S],
        b: &[S],
        expected: u64,
    ) -> ProverResult<Witness<Self::Field>>;

    /// Project the public slots of a witness
    fn public_part(&self, witness: &Witness<Self::Field>) -> PublicWitness<Self::Field>;

    fn prove<R: RngCore + CryptoRng>(
        &self,
        compiled: &CompiledCircuit,
        pk: &Self::ProvingKey,
        witness: &Witness<Self::Field>,
        rng: &mut R,
    ) -> ProverResult<Self::Proof>;

    fn verify(
        &self,
        proof: &Self::Proof,
        vk: &Self::VerifyingKey,
        public: &PublicWitness<Self::Field>,
    ) -> ProverResult<()>;
}

/// Groth16 backend, generic over the pairing
///
/// # Design Decision
///
/// Groth16 needs a per-circuit trusted setup, which fits here: the contract
/// is fixed at compile time and keys never outlive it.
#[derive(Debug, Clone, Copy)]
pub struct Groth16Backend<E: Pairing> {
    _marker: PhantomData<E>,
}

impl<E: Pairing> Groth16Backend<E> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E: Pairing> Default for Groth16Backend<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_same_contract(expected: CircuitContract, actual: CircuitContract) -> ProverResult<()> {
    if expected != actual {
        return Err(ProverError::ContractMismatch { expected, actual });
    }
    Ok(())
}

impl<E: Pairing> ProofBackend for Groth16Backend<E> {
    type Field = E::ScalarField;
    type ProvingKey = MatchProvingKey<E>;
    type VerifyingKey = MatchVerifyingKey<E>;
    type Proof = Proof<E>;

    fn compile(&self, contract: CircuitContract) -> ProverResult<CompiledCircuit> {
        contract.validate()?;

        let cs = ConstraintSystem::<E::ScalarField>::new_ref();
        cs.set_optimization_goal(OptimizationGoal::Constraints);
        cs.set_mode(SynthesisMode::Setup);

        SequenceMatchCircuit::<E::ScalarField>::empty(contract)
            .generate_constraints(cs.clone())
            .map_err(|e| ProverError::Compile(e.to_string()))?;
        cs.finalize();

        let num_instance = cs.num_instance_variables();
        let stats = ConstraintStats {
            constraints: cs.num_constraints(),
            witness_variables: cs.num_witness_variables(),
            public_inputs: num_instance - 1,
        };

        if stats.public_inputs != contract.num_public_inputs() {
            return Err(ProverError::Compile(format!(
                "circuit exposes {} public inputs, contract declares {}",
                stats.public_inputs,
                contract.num_public_inputs()
            )));
        }

        // Every declared input must appear in at least one constraint
        let matrices = cs
            .to_matrices()
            .ok_or_else(|| ProverError::Compile("constraint matrices unavailable".to_string()))?;
        let mut used = vec![false; num_instance + stats.witness_variables];
        for row in matrices.a.iter().chain(&matrices.b).chain(&matrices.c) {
            for (_, column) in row {
                used[*column] = true;
            }
        }
        // Inputs are allocated first: public ones as instances, the rest as
        // the leading witnesses
        let secret_inputs = contract.a_len + contract.b_len + 1 - stats.public_inputs;
        let input_columns = (1..num_instance).chain(num_instance..num_instance + secret_inputs);
        for column in input_columns {
            if !used[column] {
                return Err(ProverError::Compile(format!(
                    "input variable {column} is unconstrained"
                )));
            }
        }

        tracing::debug!(
            constraints = stats.constraints,
            witness_variables = stats.witness_variables,
            public_inputs = stats.public_inputs,
            semantics = %contract.semantics,
            "compiled sequence-match circuit"
        );

        Ok(CompiledCircuit { contract, stats })
    }

    fn setup<R: RngCore + CryptoRng>(
        &self,
        compiled: &CompiledCircuit,
        rng: &mut R,
    ) -> ProverResult<(MatchProvingKey<E>, MatchVerifyingKey<E>)> {
        tracing::info!("Generating Groth16 keys for {:?}...", compiled.contract);

        let (pk, vk) = Groth16::<E>::circuit_specific_setup(
            SequenceMatchCircuit::<E::ScalarField>::empty(compiled.contract),
            rng,
        )
        .map_err(ProverError::Setup)?;

        tracing::info!("Groth16 keys generated successfully");

        Ok((
            MatchProvingKey {
                contract: compiled.contract,
                key: pk,
            },
            MatchVerifyingKey {
                contract: compiled.contract,
                key: vk,
            },
        ))
    }

    fn new_assignment<S: Symbol>(
        &self,
        compiled: &CompiledCircuit,
        a: &[S],
        b: &[S],
        expected: u64,
    ) -> ProverResult<Witness<E::ScalarField>> {
        let contract = compiled.contract;
        let a = EncodedSequence::encode("A", a, contract.a_visibility)?;
        let b = EncodedSequence::encode("B", b, contract.b_visibility)?;
        let circuit = SequenceMatchCircuit::assign(contract, a, b, expected)?;
        let public = circuit.public_inputs().unwrap_or_default();

        Ok(Witness {
            circuit,
            claimed: expected,
            public,
        })
    }

    fn public_part(&self, witness: &Witness<E::ScalarField>) -> PublicWitness<E::ScalarField> {
        PublicWitness {
            contract: witness.contract(),
            inputs: witness.public.clone(),
        }
    }

    fn prove<R: RngCore + CryptoRng>(
        &self,
        compiled: &CompiledCircuit,
        pk: &MatchProvingKey<E>,
        witness: &Witness<E::ScalarField>,
        rng: &mut R,
    ) -> ProverResult<Proof<E>> {
        ensure_same_contract(compiled.contract, pk.contract)?;
        ensure_same_contract(compiled.contract, witness.contract())?;

        // Groth16 itself does not refuse an unsatisfied assignment
        let cs = ConstraintSystem::<E::ScalarField>::new_ref();
        witness
            .circuit
            .clone()
            .generate_constraints(cs.clone())
            .map_err(ProverError::Prove)?;
        if !cs.is_satisfied().map_err(ProverError::Prove)? {
            tracing::warn!(
                claimed = witness.claimed,
                constraint = ?cs.which_is_unsatisfied().ok().flatten(),
                "assignment does not satisfy the circuit"
            );
            return Err(ProverError::Unsatisfiable {
                claimed: witness.claimed,
            });
        }

        let proof = Groth16::<E>::prove(&pk.key, witness.circuit.clone(), rng)
            .map_err(ProverError::Prove)?;

        tracing::info!(claimed = witness.claimed, "Groth16 proof generated");
        Ok(proof)
    }

    fn verify(
        &self,
        proof: &Proof<E>,
        vk: &MatchVerifyingKey<E>,
        public: &PublicWitness<E::ScalarField>,
    ) -> ProverResult<()> {
        ensure_same_contract(vk.contract, public.contract)?;

        let expected = vk.key.gamma_abc_g1.len().saturating_sub(1);
        if public.inputs.len() != expected {
            return Err(ProverError::PublicInputCount {
                expected,
                actual: public.inputs.len(),
            });
        }

        let valid =
            Groth16::<E>::verify(&vk.key, &public.inputs, proof).map_err(ProverError::Verify)?;
        if !valid {
            return Err(ProverError::VerificationFailed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_std::rand::thread_rng;
    use seq_match_circuits::{MatchSemantics, Visibility};

    type Backend = Groth16Backend<Bn254>;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    struct Pipeline {
        backend: Backend,
        compiled: CompiledCircuit,
        pk: MatchProvingKey<Bn254>,
        vk: MatchVerifyingKey<Bn254>,
    }

    fn pipeline(contract: CircuitContract) -> Pipeline {
        let backend = Backend::new();
        let compiled = backend.compile(contract).unwrap();
        let (pk, vk) = backend.setup(&compiled, &mut thread_rng()).unwrap();
        Pipeline {
            backend,
            compiled,
            pk,
            vk,
        }
    }

    impl Pipeline {
        fn run(&self, a: &str, b: &str, expected: u64) -> ProverResult<(Proof<Bn254>, PublicWitness<Fr>)> {
            let witness =
                self.backend
                    .new_assignment(&self.compiled, &chars(a), &chars(b), expected)?;
            let public = self.backend.public_part(&witness);
            let proof = self
                .backend
                .prove(&self.compiled, &self.pk, &witness, &mut thread_rng())?;
            self.backend.verify(&proof, &self.vk, &public)?;
            Ok((proof, public))
        }
    }

    #[test]
    fn test_compile_stats() {
        let contract = CircuitContract::new(3, 2, MatchSemantics::Existence);
        let compiled = Backend::new().compile(contract).unwrap();

        println!("\n=== Compiled SequenceMatch Circuit ===");
        println!("{:?}", compiled.stats);

        assert_eq!(compiled.stats.public_inputs, 3);
        assert!(compiled.stats.constraints >= contract.pairs());
    }

    #[test]
    fn test_compile_rejects_invalid_contract() {
        let contract = CircuitContract::new(0, 2, MatchSemantics::Existence);
        let err = Backend::new().compile(contract).unwrap_err();
        assert!(matches!(err, ProverError::Contract(_)));

        let contract = CircuitContract::new(3, 2, MatchSemantics::Existence)
            .with_private_visibility(Visibility::Public);
        assert!(Backend::new().compile(contract).is_err());
    }

    #[test]
    fn test_scenario_existence_shared() {
        let p = pipeline(CircuitContract::new(3, 2, MatchSemantics::Existence));
        assert!(p.run("ABC", "AB", 1).is_ok());
    }

    #[test]
    fn test_scenario_existence_disjoint() {
        let p = pipeline(CircuitContract::new(3, 2, MatchSemantics::Existence));
        assert!(p.run("ABC", "DE", 0).is_ok());
    }

    #[test]
    fn test_scenario_count() {
        let p = pipeline(CircuitContract::new(3, 2, MatchSemantics::Count));
        assert!(p.run("ABC", "BC", 2).is_ok());
    }

    #[test]
    fn test_scenario_wrong_claim_fails_to_prove() {
        let p = pipeline(CircuitContract::new(3, 2, MatchSemantics::Existence));
        let err = p.run("ABC", "DE", 1).unwrap_err();
        assert!(matches!(err, ProverError::Unsatisfiable { claimed: 1 }));
    }

    #[test]
    fn test_assignment_shape_mismatch() {
        let p = pipeline(CircuitContract::new(3, 2, MatchSemantics::Existence));
        let err = p
            .backend
            .new_assignment(&p.compiled, &chars("ABCD"), &chars("AB"), 1)
            .unwrap_err();
        assert!(matches!(err, ProverError::Contract(_)));
    }

    #[test]
    fn test_proving_twice_gives_two_valid_proofs() {
        let p = pipeline(CircuitContract::new(3, 2, MatchSemantics::Existence));
        let (first, public) = p.run("ABC", "AB", 1).unwrap();
        let (second, _) = p.run("ABC", "AB", 1).unwrap();

        assert!(p.backend.verify(&first, &p.vk, &public).is_ok());
        assert!(p.backend.verify(&second, &p.vk, &public).is_ok());
    }

    #[test]
    fn test_proof_rejected_under_different_signal() {
        let p = pipeline(CircuitContract::new(3, 2, MatchSemantics::Count));
        let (proof, mut public) = p.run("ABC", "BC", 2).unwrap();

        // Signal is the last public input
        *public.inputs.last_mut().unwrap() = Fr::from(1u64);
        let err = p.backend.verify(&proof, &p.vk, &public).unwrap_err();
        assert!(matches!(err, ProverError::VerificationFailed));
    }

    #[test]
    fn test_proof_rejected_under_different_reference() {
        let p = pipeline(CircuitContract::new(3, 2, MatchSemantics::Existence));
        let (proof, mut public) = p.run("ABC", "AB", 1).unwrap();

        public.inputs[0] = Fr::from('Z' as u64);
        assert!(p.backend.verify(&proof, &p.vk, &public).is_err());
    }

    #[test]
    fn test_keys_not_shared_across_contracts() {
        let existence = pipeline(CircuitContract::new(3, 2, MatchSemantics::Existence));
        let count = pipeline(CircuitContract::new(3, 2, MatchSemantics::Count));
        let (proof, public) = existence.run("ABC", "AB", 1).unwrap();

        let err = count.backend.verify(&proof, &count.vk, &public).unwrap_err();
        assert!(matches!(err, ProverError::ContractMismatch { .. }));

        let witness = count
            .backend
            .new_assignment(&count.compiled, &chars("ABC"), &chars("AB"), 2)
            .unwrap();
        let err = count
            .backend
            .prove(&count.compiled, &existence.pk, &witness, &mut thread_rng())
            .unwrap_err();
        assert!(matches!(err, ProverError::ContractMismatch { .. }));
    }

    #[test]
    fn test_secret_reference_hides_b() {
        let contract = CircuitContract::new(3, 2, MatchSemantics::Existence)
            .with_reference_visibility(Visibility::Secret);
        let p = pipeline(contract);
        let (_, public) = p.run("ABC", "AB", 1).unwrap();

        // Only the signal is visible to the verifier
        assert_eq!(public.inputs, vec![Fr::from(1u64)]);
    }

    #[test]
    fn test_parallel_pipelines_on_distinct_contracts() {
        let contracts = [
            CircuitContract::new(3, 2, MatchSemantics::Existence),
            CircuitContract::new(3, 2, MatchSemantics::Count),
        ];

        std::thread::scope(|scope| {
            let handles: Vec<_> = contracts
                .iter()
                .map(|contract| {
                    scope.spawn(move || {
                        let p = pipeline(*contract);
                        let expected = match contract.semantics {
                            MatchSemantics::Count => 2,
                            _ => 1,
                        };
                        p.run("ABC", "BC", expected).is_ok()
                    })
                })
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap());
            }
        });
    }
}
