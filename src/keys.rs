//! Proving and verifying keys.
//!
//! The proving key stores the curve points the prover combines by MSM:
//!
//! | field  | group | length          | multiplied by          |
//! |--------|-------|-----------------|------------------------|
//! | `a_g1` | G1    | wires           | full witness           |
//! | `b_g1` | G1    | wires           | full witness           |
//! | `b_g2` | G2    | wires           | full witness           |
//! | `z_g1` | G1    | domain size - 1 | quotient coefficients  |
//! | `k_g1` | G1    | private wires   | witness past the public part |
//!
//! Keys produced by [`setup`] come from arkworks' circuit-specific setup run
//! on the same compiled system, so their layout matches the prover's.
//!
//! # Security Warning
//!
//! [`setup`] uses local randomness and is NOT suitable for production use.
//! Production keys must come from a multi-party trusted setup ceremony.

use crate::errors::{KeyError, SerializationError};
use crate::proof::{open, seal};
use crate::r1cs::{CompiledR1cs, HintInput, HintKind, R1csCircuit, Term};

use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use ark_groth16::{
    prepare_verifying_key, Groth16, PreparedVerifyingKey, ProvingKey as ArkProvingKey,
    VerifyingKey as ArkVerifyingKey,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::info;

/// Magic bytes for proving key files.
const PROVING_KEY_MAGIC: &[u8; 4] = b"G16P";

/// Magic bytes for verifying key files.
const VERIFYING_KEY_MAGIC: &[u8; 4] = b"G16V";

/// Current version of the key serialization format.
pub const KEY_FORMAT_VERSION: u32 = 1;

/// Groth16 proving key in MSM-ready layout.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ProvingKey<E: Pairing> {
    /// `α` in G1.
    pub alpha_g1: E::G1Affine,
    /// `β` in G1.
    pub beta_g1: E::G1Affine,
    /// `β` in G2.
    pub beta_g2: E::G2Affine,
    /// `δ` in G1.
    pub delta_g1: E::G1Affine,
    /// `δ` in G2.
    pub delta_g2: E::G2Affine,
    /// A-polynomial bases, one per wire.
    pub a_g1: Vec<E::G1Affine>,
    /// B-polynomial bases in G1, one per wire.
    pub b_g1: Vec<E::G1Affine>,
    /// B-polynomial bases in G2, one per wire.
    pub b_g2: Vec<E::G2Affine>,
    /// Quotient bases `xⁱ·Z(x)/δ`.
    pub z_g1: Vec<E::G1Affine>,
    /// Private wire bases `(β·Aᵢ + α·Bᵢ + Cᵢ)/δ`.
    pub k_g1: Vec<E::G1Affine>,
    /// Number of public wires, including the constant-one wire.
    pub num_public: u64,
    /// Digest of the constraint system the key was generated for.
    pub circuit_hash: [u8; 32],
}

impl<E: Pairing> ProvingKey<E> {
    /// Re-lays out an arkworks proving key.
    pub fn from_arkworks(pk: &ArkProvingKey<E>, circuit_hash: [u8; 32]) -> Self {
        Self {
            alpha_g1: pk.vk.alpha_g1,
            beta_g1: pk.beta_g1,
            beta_g2: pk.vk.beta_g2,
            delta_g1: pk.delta_g1,
            delta_g2: pk.vk.delta_g2,
            a_g1: pk.a_query.clone(),
            b_g1: pk.b_g1_query.clone(),
            b_g2: pk.b_g2_query.clone(),
            z_g1: pk.h_query.clone(),
            k_g1: pk.l_query.clone(),
            num_public: pk.vk.gamma_abc_g1.len() as u64,
            circuit_hash,
        }
    }

    /// Total number of wires the key covers.
    pub fn num_wires(&self) -> usize {
        self.a_g1.len()
    }

    /// Checks that every base vector agrees with the wire layout.
    pub fn check_shape(&self) -> Result<(), KeyError> {
        let wires = self.a_g1.len();
        let public = self.num_public as usize;
        let bad = |message: String| Err(KeyError::IncompatibleKey { message });
        if public == 0 || public > wires {
            return bad(format!("{} public wires for {} wires", public, wires));
        }
        if self.b_g1.len() != wires || self.b_g2.len() != wires {
            return bad(format!(
                "B bases cover {} / {} wires, A bases cover {}",
                self.b_g1.len(),
                self.b_g2.len(),
                wires
            ));
        }
        if self.k_g1.len() != wires - public {
            return bad(format!(
                "{} K bases for {} private wires",
                self.k_g1.len(),
                wires - public
            ));
        }
        Ok(())
    }

    /// Serializes the key to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let mut payload = Vec::new();
        self.serialize_compressed(&mut payload).map_err(|e| {
            SerializationError::BinarySerializationFailed {
                message: e.to_string(),
            }
        })?;
        Ok(seal(PROVING_KEY_MAGIC, KEY_FORMAT_VERSION, &payload))
    }

    /// Deserializes a key from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        let payload = open(bytes, PROVING_KEY_MAGIC, KEY_FORMAT_VERSION, "proving key")?;
        Ok(Self::deserialize_compressed(payload)?)
    }

    /// Saves the key to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), KeyError> {
        std::fs::write(path.as_ref(), self.to_bytes()?)?;
        Ok(())
    }

    /// Loads a key from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, KeyError> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::from_bytes(&bytes)?)
    }
}

/// Groth16 verifying key with its pairing-ready form.
#[derive(Clone, Debug)]
pub struct VerifyingKey<E: Pairing> {
    /// The arkworks verifying key.
    pub key: ArkVerifyingKey<E>,
    prepared: PreparedVerifyingKey<E>,
    /// Number of public inputs the verifier expects (constant-one excluded).
    pub num_public_inputs: usize,
    /// Digest of the constraint system the key was generated for.
    pub circuit_hash: [u8; 32],
}

impl<E: Pairing> VerifyingKey<E> {
    /// Wraps an arkworks verifying key.
    pub fn new(key: ArkVerifyingKey<E>, circuit_hash: [u8; 32]) -> Self {
        let prepared = prepare_verifying_key(&key);
        let num_public_inputs = key.gamma_abc_g1.len().saturating_sub(1);
        Self {
            key,
            prepared,
            num_public_inputs,
            circuit_hash,
        }
    }

    /// The pairing-ready form of the key.
    pub fn prepared(&self) -> &PreparedVerifyingKey<E> {
        &self.prepared
    }

    /// Serializes the key to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let mut payload = Vec::new();
        self.key
            .serialize_compressed(&mut payload)
            .and_then(|()| self.circuit_hash.serialize_compressed(&mut payload))
            .map_err(|e| SerializationError::BinarySerializationFailed {
                message: e.to_string(),
            })?;
        Ok(seal(VERIFYING_KEY_MAGIC, KEY_FORMAT_VERSION, &payload))
    }

    /// Deserializes a key from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        let payload = open(bytes, VERIFYING_KEY_MAGIC, KEY_FORMAT_VERSION, "verifying key")?;
        let mut reader = payload;
        let key = ArkVerifyingKey::<E>::deserialize_compressed(&mut reader)?;
        let circuit_hash = <[u8; 32]>::deserialize_compressed(&mut reader)?;
        Ok(Self::new(key, circuit_hash))
    }

    /// Serializes the key to a hex string.
    pub fn to_hex(&self) -> Result<String, SerializationError> {
        Ok(hex::encode(self.to_bytes()?))
    }

    /// Deserializes a key from a hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, SerializationError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Saves the key to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), KeyError> {
        std::fs::write(path.as_ref(), self.to_bytes()?)?;
        Ok(())
    }

    /// Loads a key from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, KeyError> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::from_bytes(&bytes)?)
    }
}

/// Runs a circuit-specific Groth16 setup for a compiled constraint system.
pub fn setup<E, R>(
    cs: &CompiledR1cs<E::ScalarField>,
    rng: &mut R,
) -> Result<(ProvingKey<E>, VerifyingKey<E>), KeyError>
where
    E: Pairing,
    R: RngCore + CryptoRng,
{
    let (pk, vk) = Groth16::<E>::circuit_specific_setup(R1csCircuit::new(cs), rng).map_err(
        |e| KeyError::GenerationFailed {
            message: e.to_string(),
        },
    )?;

    let pk = ProvingKey::from_arkworks(&pk, cs.digest());
    info!(
        wires = pk.num_wires(),
        quotient_bases = pk.z_g1.len(),
        "generated Groth16 keys"
    );
    Ok((pk, VerifyingKey::new(vk, cs.digest())))
}

/// Computes a SHA-256 digest over the structure of a constraint system:
/// wire counts, constraints, coefficients and hints.
pub fn compute_circuit_hash<F: PrimeField>(cs: &CompiledR1cs<F>) -> [u8; 32] {
    let mut hasher = Sha256::new();

    put_usize(&mut hasher, cs.num_public());
    put_usize(&mut hasher, cs.num_secret());
    put_usize(&mut hasher, cs.num_internal());

    put_usize(&mut hasher, cs.num_constraints());
    for c in cs.constraints() {
        put_terms(&mut hasher, &c.l);
        put_terms(&mut hasher, &c.r);
        put_terms(&mut hasher, &c.o);
    }

    put_usize(&mut hasher, cs.coefficients().len());
    for coeff in cs.coefficients() {
        put_field(&mut hasher, *coeff);
    }

    put_usize(&mut hasher, cs.hints().len());
    for hint in cs.hints() {
        match hint.kind {
            HintKind::IsZero => hasher.update([0u8]),
            HintKind::IthBit => hasher.update([1u8]),
            HintKind::Custom(id) => {
                hasher.update([2u8]);
                hasher.update(id.to_le_bytes());
            }
        }
        put_usize(&mut hasher, hint.inputs.len());
        for input in &hint.inputs {
            match input {
                HintInput::FieldConstant(c) => {
                    hasher.update([0u8]);
                    put_field(&mut hasher, *c);
                }
                HintInput::WireReference(le) => {
                    hasher.update([1u8]);
                    put_terms(&mut hasher, le);
                }
            }
        }
        put_usize(&mut hasher, hint.wires.len());
        for &w in &hint.wires {
            put_usize(&mut hasher, w);
        }
    }

    hasher.finalize().into()
}

fn put_usize(hasher: &mut Sha256, v: usize) {
    hasher.update((v as u64).to_le_bytes());
}

fn put_field<F: PrimeField>(hasher: &mut Sha256, v: F) {
    for limb in v.into_bigint().as_ref() {
        hasher.update(limb.to_le_bytes());
    }
}

fn put_terms(hasher: &mut Sha256, terms: &[Term]) {
    put_usize(hasher, terms.len());
    for t in terms {
        hasher.update(t.coeff_id.to_le_bytes());
        hasher.update(t.wire_id.to_le_bytes());
    }
}
