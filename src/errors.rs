//! Error types for the Groth16 backend.
//!
//! Input validation failures, solver failures and I/O problems are reported
//! through these types. Internal invariant violations of the compiled
//! constraint system (dependency cycles, unresolvable wires) are bugs in the
//! upstream compiler and panic instead of being returned.

use thiserror::Error;

/// The main error type for the Groth16 backend.
#[derive(Debug, Error)]
pub enum Groth16Error {
    /// The constraint system is malformed.
    #[error("Constraint system error: {0}")]
    ConstraintSystem(#[from] ConstraintSystemError),

    /// The solver could not produce a satisfying witness.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Error during proof generation.
    #[error("Proof generation error: {0}")]
    ProofGeneration(#[from] ProofGenerationError),

    /// Error during proof verification.
    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    /// Error during key operations.
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// Error during serialization/deserialization.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// The evaluation domain cannot be built.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// The configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors detected while validating a constraint system before compilation.
#[derive(Debug, Error)]
pub enum ConstraintSystemError {
    /// A linear expression references a wire or coefficient that does not exist.
    #[error("Malformed linear expression in constraint {constraint}: {message}")]
    MalformedLinearExpression {
        /// Index of the offending constraint.
        constraint: usize,
        /// Description of the problem.
        message: String,
    },

    /// A hint references a wire that does not exist.
    #[error("Malformed hint producing wire {wire}: {message}")]
    MalformedHint {
        /// First output wire of the hint.
        wire: usize,
        /// Description of the problem.
        message: String,
    },

    /// Some public or secret inputs never appear in a constraint.
    #[error("{count} inputs are not constrained (first: wire {first})")]
    UnconstrainedInputs {
        /// Number of unconstrained inputs.
        count: usize,
        /// First unconstrained wire id.
        first: usize,
    },

    /// Some internal wires are neither hint outputs nor referenced by a constraint.
    #[error("{count} internal wires are not constrained (first: wire {first})")]
    UnconstrainedInternal {
        /// Number of unconstrained internal wires.
        count: usize,
        /// First unconstrained wire id.
        first: usize,
    },

    /// Some hint outputs never appear in a constraint.
    #[error("{count} hint outputs are not constrained (first: wire {first})")]
    UnconstrainedHints {
        /// Number of unconstrained hint outputs.
        count: usize,
        /// First unconstrained wire id.
        first: usize,
    },

    /// The constraint system has no constraints.
    #[error("Constraint system has no constraints. Cannot generate a valid proof for an empty circuit")]
    EmptyCircuit,
}

/// Errors reported by the constraint solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The assignment does not provide the expected number of inputs.
    #[error("Expected {expected} {kind} inputs, got {actual}")]
    InputCountMismatch {
        /// Either "public" or "secret".
        kind: &'static str,
        /// Expected number of values.
        expected: usize,
        /// Actual number of values.
        actual: usize,
    },

    /// The assignment does not satisfy a constraint.
    #[error("Constraint {constraint} is not satisfied: L * R != O")]
    Unsatisfied {
        /// Index of the unsatisfied constraint.
        constraint: usize,
    },

    /// A constraint has more than one unsolved wire when it is reached.
    #[error("Constraint {constraint} has more than one unsolved wire")]
    MultipleUnknowns {
        /// Index of the offending constraint.
        constraint: usize,
    },

    /// Solving for the unknown wire requires dividing by zero.
    #[error("Constraint {constraint} cannot be solved for wire {wire}: division by zero")]
    UnsolvableDivision {
        /// Index of the offending constraint.
        constraint: usize,
        /// Wire that could not be solved.
        wire: usize,
    },

    /// No function is registered for a custom hint.
    #[error("No hint function registered for custom hint {id}")]
    MissingHint {
        /// Custom hint identifier.
        id: u32,
    },

    /// A hint function reported a failure.
    #[error("Hint producing wire {wire} failed: {message}")]
    HintFailed {
        /// First output wire of the hint.
        wire: usize,
        /// Description of the failure.
        message: String,
    },

    /// A wire is still unsolved once every level has run.
    #[error("Wire {wire} was not resolved by any constraint")]
    UnresolvedWire {
        /// The unresolved wire id.
        wire: usize,
    },
}

/// Errors that can occur during proof generation.
#[derive(Debug, Error)]
pub enum ProofGenerationError {
    /// The proving key does not match the constraint system.
    #[error("Invalid proving key: {message}")]
    InvalidProvingKey {
        /// Description of why the key is invalid.
        message: String,
    },

    /// The witness length does not match the key.
    #[error("Witness length mismatch: expected {expected} wires, got {actual}")]
    WitnessLengthMismatch {
        /// Expected number of wires.
        expected: usize,
        /// Actual number of wires.
        actual: usize,
    },

    /// The quotient vector length does not match the key.
    #[error("Quotient length mismatch: key has {expected} bases, got {actual} coefficients")]
    QuotientLengthMismatch {
        /// Number of quotient bases in the key.
        expected: usize,
        /// Number of quotient coefficients.
        actual: usize,
    },
}

/// Errors that can occur during proof verification.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The arkworks Groth16 verifier encountered an error.
    #[error("Groth16 verifier error: {message}")]
    VerifierError {
        /// Description of the verifier error.
        message: String,
    },

    /// Public inputs are malformed.
    #[error("Malformed public inputs: {message}")]
    MalformedPublicInputs {
        /// Description of the malformation.
        message: String,
    },
}

/// Errors related to proving and verification keys.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Key generation failed.
    #[error("Key generation failed: {message}")]
    GenerationFailed {
        /// Description of the generation failure.
        message: String,
    },

    /// Key is not compatible with the circuit.
    #[error("Key incompatible with circuit: {message}")]
    IncompatibleKey {
        /// Description of the incompatibility.
        message: String,
    },

    /// Key file I/O error.
    #[error("Key file I/O error: {message}")]
    IoError {
        /// Description of the I/O error.
        message: String,
    },

    /// The key bytes could not be encoded or decoded.
    #[error("Key encoding error: {0}")]
    Serialization(#[from] SerializationError),
}

/// Errors related to serialization and deserialization.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// Binary serialization failed.
    #[error("Binary serialization failed: {message}")]
    BinarySerializationFailed {
        /// Description of the failure.
        message: String,
    },

    /// Binary deserialization failed.
    #[error("Binary deserialization failed: {message}")]
    BinaryDeserializationFailed {
        /// Description of the failure.
        message: String,
    },

    /// Hex decoding failed.
    #[error("Hex decoding failed: {message}")]
    HexDecodingFailed {
        /// Description of the failure.
        message: String,
    },

    /// Invalid data format.
    #[error("Invalid data format: {message}")]
    InvalidFormat {
        /// Description of the format error.
        message: String,
    },

    /// Data integrity check failed.
    #[error("Data integrity check failed: computed hash {computed} does not match expected {expected}")]
    IntegrityCheckFailed {
        /// Computed hash.
        computed: String,
        /// Expected hash.
        expected: String,
    },
}

/// Errors raised while building an evaluation domain.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The field has no multiplicative subgroup large enough.
    #[error("No evaluation domain of size {size}: field two-adicity is {two_adicity}")]
    DomainTooLarge {
        /// Requested size.
        size: usize,
        /// Two-adicity of the scalar field.
        two_adicity: u32,
    },
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Groth16 operations.
pub type Groth16Result<T> = Result<T, Groth16Error>;

impl From<std::io::Error> for KeyError {
    fn from(err: std::io::Error) -> Self {
        KeyError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<hex::FromHexError> for SerializationError {
    fn from(err: hex::FromHexError) -> Self {
        SerializationError::HexDecodingFailed {
            message: err.to_string(),
        }
    }
}

impl From<ark_serialize::SerializationError> for SerializationError {
    fn from(err: ark_serialize::SerializationError) -> Self {
        SerializationError::BinaryDeserializationFailed {
            message: err.to_string(),
        }
    }
}
