//! Proof structures and serialization.
//!
//! Every serialized artifact of this crate (proofs, public inputs, keys)
//! shares one envelope:
//!
//! ```text
//! magic (4) | version (u32 LE) | payload length (u64 LE) | payload | SHA-256 of everything before
//! ```
//!
//! Payloads are arkworks compressed encodings.

use crate::errors::SerializationError;
use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use ark_groth16::Proof as ArkProof;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Magic bytes for proof files.
const PROOF_MAGIC: &[u8; 4] = b"G16R";

/// Magic bytes for public input files.
const PUBLIC_INPUTS_MAGIC: &[u8; 4] = b"G16I";

/// Current version of the proof serialization format.
pub const PROOF_FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 8;
const HASH_LEN: usize = 32;

/// A Groth16 proof `(Ar, Bs, Krs)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof<E: Pairing> {
    /// `A·r` in G1.
    pub ar: E::G1Affine,
    /// `B·s` in G2.
    pub bs: E::G2Affine,
    /// `K·r·s` in G1.
    pub krs: E::G1Affine,
}

impl<E: Pairing> From<Proof<E>> for ArkProof<E> {
    fn from(proof: Proof<E>) -> Self {
        ArkProof {
            a: proof.ar,
            b: proof.bs,
            c: proof.krs,
        }
    }
}

impl<E: Pairing> From<ArkProof<E>> for Proof<E> {
    fn from(proof: ArkProof<E>) -> Self {
        Self {
            ar: proof.a,
            bs: proof.b,
            krs: proof.c,
        }
    }
}

impl<E: Pairing> Proof<E> {
    /// The proof in arkworks form, as consumed by its verifier.
    pub fn to_arkworks(&self) -> ArkProof<E> {
        self.clone().into()
    }

    /// Serializes the proof to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let mut payload = Vec::new();
        self.to_arkworks()
            .serialize_compressed(&mut payload)
            .map_err(|e| SerializationError::BinarySerializationFailed {
                message: e.to_string(),
            })?;
        Ok(seal(PROOF_MAGIC, PROOF_FORMAT_VERSION, &payload))
    }

    /// Deserializes a proof from bytes. Points are checked to be on the curve
    /// and in the prime-order subgroup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        let payload = open(bytes, PROOF_MAGIC, PROOF_FORMAT_VERSION, "proof")?;
        let proof = ArkProof::<E>::deserialize_compressed(payload)?;
        Ok(proof.into())
    }

    /// Serializes the proof to a hex string.
    pub fn to_hex(&self) -> Result<String, SerializationError> {
        Ok(hex::encode(self.to_bytes()?))
    }

    /// Deserializes a proof from a hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, SerializationError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Saves the proof to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SerializationError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes).map_err(|e| {
            SerializationError::BinarySerializationFailed {
                message: e.to_string(),
            }
        })
    }

    /// Loads a proof from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SerializationError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|e| {
            SerializationError::BinaryDeserializationFailed {
                message: e.to_string(),
            }
        })?;
        Self::from_bytes(&bytes)
    }
}

/// Public inputs for proof verification, excluding the constant-one wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicInputs<F> {
    /// The public input values as field elements.
    pub values: Vec<F>,
}

impl<F: PrimeField> PublicInputs<F> {
    /// Creates new public inputs from field elements.
    pub fn new(values: Vec<F>) -> Self {
        Self { values }
    }

    /// Creates empty public inputs.
    pub fn empty() -> Self {
        Self { values: Vec::new() }
    }

    /// Returns the number of public inputs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no public inputs.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serializes the public inputs to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let mut payload = Vec::new();
        self.values
            .serialize_compressed(&mut payload)
            .map_err(|e| SerializationError::BinarySerializationFailed {
                message: e.to_string(),
            })?;
        Ok(seal(PUBLIC_INPUTS_MAGIC, PROOF_FORMAT_VERSION, &payload))
    }

    /// Deserializes public inputs from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerializationError> {
        let payload = open(bytes, PUBLIC_INPUTS_MAGIC, PROOF_FORMAT_VERSION, "public inputs")?;
        let values = Vec::<F>::deserialize_compressed(payload)?;
        Ok(Self { values })
    }

    /// Serializes the public inputs to a hex string.
    pub fn to_hex(&self) -> Result<String, SerializationError> {
        Ok(hex::encode(self.to_bytes()?))
    }

    /// Deserializes public inputs from a hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, SerializationError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }
}

impl<F> From<Vec<F>> for PublicInputs<F> {
    fn from(values: Vec<F>) -> Self {
        Self { values }
    }
}

/// Wraps a payload in the envelope.
pub(crate) fn seal(magic: &[u8; 4], version: u32, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len() + HASH_LEN);
    bytes.extend_from_slice(magic);
    bytes.extend_from_slice(&version.to_le_bytes());
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(payload);
    let hash = compute_integrity_hash(&bytes);
    bytes.extend_from_slice(&hash);
    bytes
}

/// Checks the envelope and returns its payload.
pub(crate) fn open<'a>(
    bytes: &'a [u8],
    magic: &[u8; 4],
    version: u32,
    what: &str,
) -> Result<&'a [u8], SerializationError> {
    if bytes.len() < HEADER_LEN + HASH_LEN {
        return Err(SerializationError::BinaryDeserializationFailed {
            message: format!("Data too short to be a valid {}", what),
        });
    }

    let data_len = bytes.len() - HASH_LEN;
    let (data, expected_hash) = bytes.split_at(data_len);
    let computed_hash = compute_integrity_hash(data);
    if expected_hash != computed_hash {
        return Err(SerializationError::IntegrityCheckFailed {
            computed: hex::encode(computed_hash),
            expected: hex::encode(expected_hash),
        });
    }

    if &data[..4] != magic {
        return Err(SerializationError::InvalidFormat {
            message: format!("Invalid {} file format", what),
        });
    }

    let found = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if found != version {
        return Err(SerializationError::InvalidFormat {
            message: format!(
                "Unsupported {} format version: {} (expected {})",
                what, found, version
            ),
        });
    }

    let mut len = [0u8; 8];
    len.copy_from_slice(&data[8..HEADER_LEN]);
    let payload = &data[HEADER_LEN..];
    if u64::from_le_bytes(len) != payload.len() as u64 {
        return Err(SerializationError::InvalidFormat {
            message: format!(
                "Declared {} length {} does not match payload of {} bytes",
                what,
                u64::from_le_bytes(len),
                payload.len()
            ),
        });
    }

    Ok(payload)
}

/// Computes an integrity hash of the given data.
fn compute_integrity_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_returns_payload() {
        let sealed = seal(b"TEST", 3, b"payload");
        assert_eq!(sealed.len(), HEADER_LEN + 7 + HASH_LEN);
        assert_eq!(open(&sealed, b"TEST", 3, "test").unwrap(), b"payload");
    }

    #[test]
    fn envelope_detects_tampering() {
        let mut sealed = seal(b"TEST", 1, b"payload");
        sealed[HEADER_LEN] ^= 1;
        assert!(matches!(
            open(&sealed, b"TEST", 1, "test"),
            Err(SerializationError::IntegrityCheckFailed { .. })
        ));
    }

    #[test]
    fn envelope_checks_magic_and_version() {
        let sealed = seal(b"TEST", 1, b"");
        assert!(matches!(
            open(&sealed, b"NOPE", 1, "test"),
            Err(SerializationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            open(&sealed, b"TEST", 2, "test"),
            Err(SerializationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn envelope_rejects_short_input() {
        assert!(matches!(
            open(&[0u8; 10], b"TEST", 1, "test"),
            Err(SerializationError::BinaryDeserializationFailed { .. })
        ));
    }

    #[test]
    fn public_inputs_hex_round_trip() {
        use ark_bn254::Fr;
        let inputs = PublicInputs::new(vec![Fr::from(3u64), Fr::from(35u64)]);
        let decoded = PublicInputs::<Fr>::from_hex(&inputs.to_hex().unwrap()).unwrap();
        assert_eq!(decoded, inputs);
    }
}
