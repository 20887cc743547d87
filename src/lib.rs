//! # r1cs-backend-groth16
//!
//! A Groth16 proving backend for compiled rank-1 constraint systems.
//!
//! Given a compiled constraint system, a proving key and the public and
//! secret inputs, this crate solves the remaining wires, computes the
//! quotient polynomial and assembles a blinded Groth16 proof `(Ar, Bs, Krs)`.
//!
//! ## Features
//!
//! - **Leveled solving**: constraints are grouped into dependency levels at
//!   compile time; each level is solved in parallel in weight-balanced tasks
//! - **Coset-FFT quotient**: `H = (A·B - C) / Z` via three concurrent
//!   interpolations and one pointwise pass on a coset where `Z` is constant
//! - **Parallel MSMs**: the `Ar`, `Bs` (G1 and G2) and quotient work run
//!   concurrently on the rayon pool
//! - **Multiple Curves**: BN254 and BLS12-381
//! - **Integrity-checked encodings** for proofs, public inputs and keys
//!
//! ## Security Warning
//!
//! The key generation functions in this crate use local randomness and are **NOT**
//! suitable for production use. For production deployments, you must use keys
//! generated through a proper multi-party computation (MPC) trusted setup ceremony.
//!
//! ## Usage
//!
//! ```ignore
//! use r1cs_backend_groth16::prelude::*;
//! use ark_bn254::Fr;
//!
//! // out = x · x
//! let mut builder = R1csBuilder::<Fr>::new();
//! let out = builder.public_input();
//! let x = builder.secret_input();
//! builder.mul(x, x, out);
//!
//! let prover = Groth16Prover::<Bn254>::new();
//! let cs = prover.compile(&builder)?;
//!
//! // Generate keys (DEVELOPMENT ONLY - use MPC keys in production)
//! let (proving_key, verification_key) = prover.generate_keys(&cs)?;
//!
//! let proof = prover.prove(&cs, &proving_key, &[Fr::from(9u64)], &[Fr::from(3u64)])?;
//! let public_inputs = PublicInputs::new(vec![Fr::from(9u64)]);
//! assert!(prover.verify(&proof, &public_inputs, &verification_key)?);
//! ```
//!
//! ### Serializing Keys and Proofs
//!
//! ```ignore
//! proving_key.save_to_file("proving_key.bin")?;
//! let pk = ProvingKey::<Bn254>::load_from_file("proving_key.bin")?;
//!
//! let proof_hex = proof.to_hex()?;
//! let loaded_proof = Proof::<Bn254>::from_hex(&proof_hex)?;
//! ```
//!
//! ## Configuration
//!
//! Scheduler settings can be loaded from TOML:
//!
//! ```toml
//! [scheduler]
//! max_task_weight = 750
//! reduce_transitive_edges = false
//! ```
//!
//! ## Feature Flags
//!
//! - `bn254` (default): Enable BN254 curve support
//! - `bls12_381`: Enable BLS12-381 curve support
//! - `parallel` (default): Enable parallel field, curve and FFT arithmetic in arkworks

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]
#![warn(unreachable_pub)]
#![deny(unsafe_code)]

pub mod config;
pub mod dag;
pub mod domain;
pub mod errors;
pub mod exp_table;
pub mod keys;
pub mod proof;
pub mod prover;
pub mod quotient;
pub mod r1cs;
pub mod solver;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use tracing_subscriber as _;

// Re-export curve types for convenience
pub use ark_bls12_381::Bls12_381;
pub use ark_bn254::Bn254;

// Re-export main types
pub use config::{ProverConfig, SchedulerConfig};
pub use errors::{Groth16Error, Groth16Result};
pub use keys::{ProvingKey, VerifyingKey};
pub use proof::{Proof, PublicInputs};
pub use prover::{Groth16Prover, ProofAssembler};
pub use r1cs::{CompiledR1cs, R1csBuilder, Wire};
pub use solver::{Solution, Solver};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{ProverConfig, SchedulerConfig};
    pub use crate::errors::{Groth16Error, Groth16Result};
    pub use crate::keys::{ProvingKey, VerifyingKey};
    pub use crate::proof::{Proof, PublicInputs};
    pub use crate::prover::Groth16Prover;
    pub use crate::r1cs::{CompiledR1cs, HintArg, HintKind, R1csBuilder, Wire};
    pub use crate::solver::Solver;
    pub use crate::{Bls12_381, Bn254};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prover_uses_default_scheduler() {
        let prover = Groth16Prover::<Bn254>::new();
        assert_eq!(prover.config().scheduler, SchedulerConfig::default());
    }
}
