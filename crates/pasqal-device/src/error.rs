//! Error types for the device crate.

use pasqal_ir::{IrError, Qid};
use thiserror::Error;

/// Broad category of a [`DeviceError`].
///
/// `TypeMismatch` means the caller passed the wrong kind of value (a line
/// qubit where a grid site was required, a non-gate operation to the
/// decomposer). `Value` means the kind was right but the value breaks a
/// device rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Wrong kind of operand.
    TypeMismatch,
    /// Right kind of operand, invalid value.
    Value,
}

/// Errors that can occur when building or querying a device.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeviceError {
    /// A site list contained something other than a grid qubit.
    #[error("Unsupported qubit type: {kind} {qubit}")]
    UnsupportedQubitType {
        /// Kind of the rejected qubit.
        kind: &'static str,
        /// The rejected qubit.
        qubit: Qid,
    },

    /// Decomposition was asked for something that is not a gate operation.
    #[error("{0} is not a gate operation")]
    NotAGateOperation(String),

    /// Control radius must be a positive, finite number.
    #[error("Control radius must be positive, got {0}")]
    InvalidControlRadius(f64),

    /// No duration is known for this operation.
    #[error("Unsupported gate for duration lookup: {0}")]
    UnsupportedDuration(String),

    /// A distance query received a qubit of the wrong kind.
    #[error("Unsupported qubit for distance: {0}")]
    UnsupportedQubit(Qid),

    /// The operation is not device-native, or has an unknown shape.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An operation targets a qubit that is not a site of the device.
    #[error("Qubit not on device: {0}")]
    QubitNotOnDevice(Qid),

    /// Two targets of an interaction are farther apart than the control radius.
    #[error("Qubits {a}, {b} are too far away (distance {distance} > control radius {control_radius})")]
    QubitsTooFarApart {
        /// First qubit.
        a: Qid,
        /// Second qubit.
        b: Qid,
        /// Their distance.
        distance: f64,
        /// The device's control radius.
        control_radius: f64,
    },

    /// A parallel Z rotation addresses every site.
    #[error("Too many Z gates in parallel: {count} on a device with {sites} sites")]
    TooManyZGates {
        /// Qubits addressed.
        count: usize,
        /// Sites on the device.
        sites: usize,
    },

    /// A parallel X/Y rotation addresses neither one site nor all of them.
    #[error("Bad number of X/Y gates in parallel: {count} on a device with {sites} sites")]
    BadXyGateCount {
        /// Qubits addressed.
        count: usize,
        /// Sites on the device.
        sites: usize,
    },

    /// The decomposition strategy could not reduce an operation to native ones.
    #[error("Cannot decompose {0} into device-native operations")]
    DecompositionFailed(String),

    /// An operation could not be built.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl DeviceError {
    /// Category of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            DeviceError::UnsupportedQubitType { .. } | DeviceError::NotAGateOperation(_) => {
                ErrorClass::TypeMismatch
            }
            _ => ErrorClass::Value,
        }
    }
}

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;
