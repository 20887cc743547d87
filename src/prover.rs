//! Groth16 proving and verification.
//!
//! Proving runs in three stages:
//!
//! 1. the [`Solver`] computes the full witness and the QAP evaluations;
//! 2. the quotient `H` and the MSMs for `Ar`, `Bs` (G1 and G2) run
//!    concurrently;
//! 3. `Krs` combines the quotient and private-wire MSMs with the blinded
//!    `Ar` and `Bs`.
//!
//! # Usage
//!
//! ```ignore
//! use r1cs_backend_groth16::{Bn254, Groth16Prover, R1csBuilder, SchedulerConfig};
//!
//! let prover = Groth16Prover::<Bn254>::new();
//! let cs = prover.compile(&builder)?;
//!
//! // Generate keys (for development only - use MPC ceremony keys in production)
//! let (pk, vk) = prover.generate_keys(&cs)?;
//!
//! let proof = prover.prove(&cs, &pk, &public, &secret)?;
//! let is_valid = prover.verify(&proof, &public.into(), &vk)?;
//! ```
//!
//! # Security Warning
//!
//! The `generate_keys` method uses local randomness and is NOT suitable for
//! production use. For production deployments, you must use keys generated
//! through a proper multi-party computation (MPC) trusted setup ceremony.

use crate::config::ProverConfig;
use crate::domain::FftDomain;
use crate::errors::{Groth16Result, KeyError, ProofGenerationError, VerificationError};
use crate::keys::{setup, ProvingKey, VerifyingKey};
use crate::proof::{Proof, PublicInputs};
use crate::quotient::compute_h;
use crate::r1cs::{CompiledR1cs, R1csBuilder};
use crate::solver::{Solution, Solver};

use ark_ec::{pairing::Pairing, CurveGroup, VariableBaseMSM};
use ark_ff::{PrimeField, UniformRand};
use ark_groth16::Groth16;
use ark_std::rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use std::marker::PhantomData;
use std::time::Instant;
use tracing::{debug, debug_span, info, info_span};

type BigInt<E> = <<E as Pairing>::ScalarField as PrimeField>::BigInt;

/// Converts field elements out of Montgomery form for the MSMs.
fn to_regular<F: PrimeField>(values: &[F]) -> Vec<F::BigInt> {
    values.par_iter().map(|v| v.into_bigint()).collect()
}

/// Combines a proving key, a solved witness and blinding factors into a proof.
pub struct ProofAssembler<'a, E: Pairing> {
    pk: &'a ProvingKey<E>,
}

impl<'a, E: Pairing> ProofAssembler<'a, E> {
    /// Creates an assembler for `pk`, checking the key's internal shape.
    pub fn new(pk: &'a ProvingKey<E>) -> Result<Self, ProofGenerationError> {
        pk.check_shape()
            .map_err(|e| ProofGenerationError::InvalidProvingKey {
                message: e.to_string(),
            })?;
        Ok(Self { pk })
    }

    /// Builds a proof from a solution, with blinding factors `r` and `s`.
    ///
    /// The quotient is computed over `domain`, concurrently with the
    /// `Ar`, `Bs` (G1) and `Bs` (G2) MSMs.
    pub fn assemble(
        &self,
        solution: Solution<E::ScalarField>,
        domain: &FftDomain<E::ScalarField>,
        r: E::ScalarField,
        s: E::ScalarField,
    ) -> Result<Proof<E>, ProofGenerationError> {
        let pk = self.pk;
        if solution.witness.len() != pk.num_wires() {
            return Err(ProofGenerationError::WitnessLengthMismatch {
                expected: pk.num_wires(),
                actual: solution.witness.len(),
            });
        }
        if pk.z_g1.len() > domain.cardinality() {
            return Err(ProofGenerationError::QuotientLengthMismatch {
                expected: pk.z_g1.len(),
                actual: domain.cardinality(),
            });
        }

        let Solution { a, b, c, witness } = solution;
        let wires = to_regular(&witness);
        drop(witness);

        let _span = debug_span!("msm", wires = wires.len()).entered();
        let start = Instant::now();
        let ((h, ar), (bs1, bs)) = rayon::join(
            || rayon::join(|| compute_h(a, b, c, domain), || self.ar(&wires, r)),
            || rayon::join(|| self.bs_g1(&wires, s), || self.bs_g2(&wires, s)),
        );
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "computed quotient and A/B commitments"
        );

        let krs = self.krs(&wires, &h, ar, bs1, r, s);
        Ok(Proof {
            ar: ar.into_affine(),
            bs: bs.into_affine(),
            krs: krs.into_affine(),
        })
    }

    /// `Ar = Σ wᵢ·Aᵢ + r·δ + α`
    fn ar(&self, wires: &[BigInt<E>], r: E::ScalarField) -> E::G1 {
        E::G1::msm_bigint(&self.pk.a_g1, wires) + self.pk.delta_g1 * r + self.pk.alpha_g1
    }

    /// `Bs = Σ wᵢ·Bᵢ + s·δ + β` in G1
    fn bs_g1(&self, wires: &[BigInt<E>], s: E::ScalarField) -> E::G1 {
        E::G1::msm_bigint(&self.pk.b_g1, wires) + self.pk.delta_g1 * s + self.pk.beta_g1
    }

    /// `Bs = Σ wᵢ·Bᵢ + s·δ + β` in G2
    fn bs_g2(&self, wires: &[BigInt<E>], s: E::ScalarField) -> E::G2 {
        E::G2::msm_bigint(&self.pk.b_g2, wires) + self.pk.delta_g2 * s + self.pk.beta_g2
    }

    /// `Krs = Σ hᵢ·Zᵢ + Σ wᵢ·Kᵢ + s·Ar + r·Bs - r·s·δ`
    fn krs(
        &self,
        wires: &[BigInt<E>],
        h: &[BigInt<E>],
        ar: E::G1,
        bs1: E::G1,
        r: E::ScalarField,
        s: E::ScalarField,
    ) -> E::G1 {
        let pk = self.pk;
        let private = &wires[pk.num_public as usize..];
        // The key carries one fewer quotient base than the domain size; the
        // top coefficient of H is zero for a satisfying witness.
        let h = &h[..pk.z_g1.len()];
        let (zh, kw) = rayon::join(
            || E::G1::msm_bigint(&pk.z_g1, h),
            || E::G1::msm_bigint(&pk.k_g1, private),
        );
        zh + kw + ar * s + bs1 * r - pk.delta_g1 * (r * s)
    }
}

/// The Groth16 prover for compiled R1CS.
///
/// # Type Parameters
/// * `E` - The pairing-friendly elliptic curve to use (e.g., BN254, BLS12-381)
pub struct Groth16Prover<E: Pairing> {
    config: ProverConfig,
    _marker: PhantomData<E>,
}

impl<E: Pairing> Default for Groth16Prover<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Pairing> Groth16Prover<E> {
    /// Creates a new Groth16 prover with default configuration.
    pub fn new() -> Self {
        Self::with_config(ProverConfig::default())
    }

    /// Creates a new Groth16 prover with the given configuration.
    pub fn with_config(config: ProverConfig) -> Self {
        Self {
            config,
            _marker: PhantomData,
        }
    }

    /// The prover configuration.
    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    /// Compiles a constraint system using this prover's scheduler settings.
    pub fn compile(
        &self,
        builder: &R1csBuilder<E::ScalarField>,
    ) -> Groth16Result<CompiledR1cs<E::ScalarField>> {
        Ok(builder.compile(&self.config.scheduler)?)
    }

    /// Generates proving and verification keys for a constraint system.
    ///
    /// # Security Warning
    ///
    /// This method uses local randomness and is **NOT** suitable for production use.
    /// For production deployments, you must use keys generated through a proper
    /// multi-party computation (MPC) trusted setup ceremony.
    pub fn generate_keys(
        &self,
        cs: &CompiledR1cs<E::ScalarField>,
    ) -> Groth16Result<(ProvingKey<E>, VerifyingKey<E>)> {
        self.generate_keys_with_rng(cs, &mut ark_std::rand::thread_rng())
    }

    /// Generates proving and verification keys with a specified RNG.
    ///
    /// # Security Warning
    ///
    /// Unless your RNG comes from an MPC ceremony, these keys are **NOT**
    /// suitable for production use.
    pub fn generate_keys_with_rng<R: RngCore + CryptoRng>(
        &self,
        cs: &CompiledR1cs<E::ScalarField>,
        rng: &mut R,
    ) -> Groth16Result<(ProvingKey<E>, VerifyingKey<E>)> {
        Ok(setup(cs, rng)?)
    }

    /// Solves the constraint system and generates a proof.
    ///
    /// `public` excludes the constant-one wire.
    pub fn prove(
        &self,
        cs: &CompiledR1cs<E::ScalarField>,
        proving_key: &ProvingKey<E>,
        public: &[E::ScalarField],
        secret: &[E::ScalarField],
    ) -> Groth16Result<Proof<E>> {
        self.prove_with_rng(cs, proving_key, public, secret, &mut ark_std::rand::thread_rng())
    }

    /// Generates a proof with a specified RNG for the blinding factors.
    pub fn prove_with_rng<R: RngCore + CryptoRng>(
        &self,
        cs: &CompiledR1cs<E::ScalarField>,
        proving_key: &ProvingKey<E>,
        public: &[E::ScalarField],
        secret: &[E::ScalarField],
        rng: &mut R,
    ) -> Groth16Result<Proof<E>> {
        self.prove_with_solver(&Solver::new(cs), proving_key, public, secret, rng)
    }

    /// Generates a proof using a solver with custom hints registered.
    pub fn prove_with_solver<R: RngCore + CryptoRng>(
        &self,
        solver: &Solver<'_, E::ScalarField>,
        proving_key: &ProvingKey<E>,
        public: &[E::ScalarField],
        secret: &[E::ScalarField],
        rng: &mut R,
    ) -> Groth16Result<Proof<E>> {
        let cs = solver.constraint_system();
        if proving_key.circuit_hash != cs.digest() {
            return Err(KeyError::IncompatibleKey {
                message: format!(
                    "proving key was generated for circuit {}, not {}",
                    hex::encode(proving_key.circuit_hash),
                    hex::encode(cs.digest())
                ),
            }
            .into());
        }

        let _span = info_span!(
            "prove",
            constraints = cs.num_constraints(),
            wires = cs.num_wires()
        )
        .entered();
        let start = Instant::now();

        let assembler = ProofAssembler::new(proving_key)?;
        let domain = FftDomain::new(cs.qap_size())?;
        let solution = solver.solve(public, secret)?;

        let r = E::ScalarField::rand(rng);
        let s = E::ScalarField::rand(rng);
        let proof = assembler.assemble(solution, &domain, r, s)?;

        info!(
            domain = domain.cardinality(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generated Groth16 proof"
        );
        Ok(proof)
    }

    /// Convenience method to prove and return both the proof and public inputs.
    pub fn prove_with_public_inputs(
        &self,
        cs: &CompiledR1cs<E::ScalarField>,
        proving_key: &ProvingKey<E>,
        public: &[E::ScalarField],
        secret: &[E::ScalarField],
    ) -> Groth16Result<(Proof<E>, PublicInputs<E::ScalarField>)> {
        let proof = self.prove(cs, proving_key, public, secret)?;
        Ok((proof, PublicInputs::new(public.to_vec())))
    }

    /// Verifies a proof against public inputs.
    ///
    /// # Returns
    /// `true` if the proof is valid, `false` otherwise
    pub fn verify(
        &self,
        proof: &Proof<E>,
        public_inputs: &PublicInputs<E::ScalarField>,
        verification_key: &VerifyingKey<E>,
    ) -> Groth16Result<bool> {
        if public_inputs.len() != verification_key.num_public_inputs {
            return Err(VerificationError::MalformedPublicInputs {
                message: format!(
                    "Expected {} public inputs, got {}",
                    verification_key.num_public_inputs,
                    public_inputs.len()
                ),
            }
            .into());
        }

        let result = Groth16::<E>::verify_proof(
            verification_key.prepared(),
            &proof.to_arkworks(),
            &public_inputs.values,
        )
        .map_err(|e| VerificationError::VerifierError {
            message: e.to_string(),
        })?;

        Ok(result)
    }
}

/// Convenience function to generate keys for a constraint system.
///
/// # Security Warning
///
/// This function uses local randomness and is **NOT** suitable for production use.
pub fn generate_keys<E: Pairing>(
    cs: &CompiledR1cs<E::ScalarField>,
) -> Groth16Result<(ProvingKey<E>, VerifyingKey<E>)> {
    Groth16Prover::<E>::new().generate_keys(cs)
}

/// Convenience function to generate a proof.
pub fn prove<E: Pairing>(
    cs: &CompiledR1cs<E::ScalarField>,
    proving_key: &ProvingKey<E>,
    public: &[E::ScalarField],
    secret: &[E::ScalarField],
) -> Groth16Result<Proof<E>> {
    Groth16Prover::<E>::new().prove(cs, proving_key, public, secret)
}

/// Convenience function to verify a proof.
pub fn verify<E: Pairing>(
    proof: &Proof<E>,
    public_inputs: &PublicInputs<E::ScalarField>,
    verification_key: &VerifyingKey<E>,
) -> Groth16Result<bool> {
    Groth16Prover::<E>::new().verify(proof, public_inputs, verification_key)
}
