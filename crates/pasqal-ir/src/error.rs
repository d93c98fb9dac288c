//! Error types for the IR crate.

use crate::qubit::Qid;
use thiserror::Error;

/// Errors that can occur while building operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: Qid,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Parallel application needs a single-qubit gate.
    #[error("Gate '{0}' is not a single-qubit gate and cannot be applied in parallel")]
    NotSingleQubitGate(String),

    /// An operation was built with no qubits at all.
    #[error("Operation '{0}' has no target qubits")]
    NoQubits(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
