//! Quantum gate types.
//!
//! Gates are a closed enumeration of rotation families. Exponents are in half
//! turns: `XPow { exponent: 1.0 }` is a Pauli X, `ZPow { exponent: 0.25 }` is
//! a T gate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IrResult;
use crate::operation::{GateOperation, Operation, ParallelGateOperation};
use crate::qubit::Qid;

/// Tolerance used when deciding whether an exponent is a whole number.
pub const EXPONENT_TOLERANCE: f64 = 1e-9;

/// Check whether an exponent is (numerically) an integer.
#[inline]
pub fn is_integer_exponent(exponent: f64) -> bool {
    (exponent - exponent.round()).abs() < EXPONENT_TOLERANCE
}

/// Gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gate {
    /// Identity gate.
    Identity,
    /// Computational-basis measurement.
    Measure {
        /// Optional measurement key.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    // Single-qubit rotation families
    /// Power of Pauli X.
    XPow {
        /// Exponent in half turns.
        exponent: f64,
    },
    /// Power of Pauli Y.
    YPow {
        /// Exponent in half turns.
        exponent: f64,
    },
    /// Power of Pauli Z.
    ZPow {
        /// Exponent in half turns.
        exponent: f64,
    },
    /// X rotation about an axis in the XY plane at `phase_exponent` half turns from X.
    PhasedXPow {
        /// Axis angle in half turns.
        phase_exponent: f64,
        /// Exponent in half turns.
        exponent: f64,
    },
    /// Power of Hadamard.
    HPow {
        /// Exponent in half turns.
        exponent: f64,
    },

    // Two-qubit families
    /// Power of controlled-Z.
    #[serde(rename = "cz_pow")]
    CZPow {
        /// Exponent in half turns.
        exponent: f64,
    },
    /// Power of controlled-X (CNOT).
    #[serde(rename = "cnot_pow")]
    CNotPow {
        /// Exponent in half turns.
        exponent: f64,
    },
    /// Power of SWAP.
    SwapPow {
        /// Exponent in half turns.
        exponent: f64,
    },

    // Three-qubit families
    /// Power of doubly-controlled Z.
    #[serde(rename = "ccz_pow")]
    CCZPow {
        /// Exponent in half turns.
        exponent: f64,
    },
    /// Power of Toffoli (doubly-controlled X).
    #[serde(rename = "ccx_pow")]
    CCXPow {
        /// Exponent in half turns.
        exponent: f64,
    },
    /// Fredkin gate (controlled SWAP).
    #[serde(rename = "cswap")]
    CSwap,

    /// A user-defined gate with no known semantics.
    Custom(CustomGate),
}

impl Gate {
    /// Pauli X.
    pub fn x() -> Self {
        Gate::XPow { exponent: 1.0 }
    }

    /// Pauli Y.
    pub fn y() -> Self {
        Gate::YPow { exponent: 1.0 }
    }

    /// Pauli Z.
    pub fn z() -> Self {
        Gate::ZPow { exponent: 1.0 }
    }

    /// Hadamard.
    pub fn h() -> Self {
        Gate::HPow { exponent: 1.0 }
    }

    /// Controlled-Z.
    pub fn cz() -> Self {
        Gate::CZPow { exponent: 1.0 }
    }

    /// CNOT.
    pub fn cnot() -> Self {
        Gate::CNotPow { exponent: 1.0 }
    }

    /// SWAP.
    pub fn swap() -> Self {
        Gate::SwapPow { exponent: 1.0 }
    }

    /// Doubly-controlled Z.
    pub fn ccz() -> Self {
        Gate::CCZPow { exponent: 1.0 }
    }

    /// Toffoli.
    pub fn ccx() -> Self {
        Gate::CCXPow { exponent: 1.0 }
    }

    /// Unkeyed measurement.
    pub fn measure() -> Self {
        Gate::Measure { key: None }
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Gate::Identity => "id",
            Gate::Measure { .. } => "measure",
            Gate::XPow { .. } => "x",
            Gate::YPow { .. } => "y",
            Gate::ZPow { .. } => "z",
            Gate::PhasedXPow { .. } => "phased_x",
            Gate::HPow { .. } => "h",
            Gate::CZPow { .. } => "cz",
            Gate::CNotPow { .. } => "cnot",
            Gate::SwapPow { .. } => "swap",
            Gate::CCZPow { .. } => "ccz",
            Gate::CCXPow { .. } => "ccx",
            Gate::CSwap => "cswap",
            Gate::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Identity
            | Gate::Measure { .. }
            | Gate::XPow { .. }
            | Gate::YPow { .. }
            | Gate::ZPow { .. }
            | Gate::PhasedXPow { .. }
            | Gate::HPow { .. } => 1,

            Gate::CZPow { .. } | Gate::CNotPow { .. } | Gate::SwapPow { .. } => 2,

            Gate::CCZPow { .. } | Gate::CCXPow { .. } | Gate::CSwap => 3,

            Gate::Custom(g) => g.num_qubits,
        }
    }

    /// Exponent of a power family, `None` for gates without one.
    pub fn exponent(&self) -> Option<f64> {
        match self {
            Gate::XPow { exponent }
            | Gate::YPow { exponent }
            | Gate::ZPow { exponent }
            | Gate::PhasedXPow { exponent, .. }
            | Gate::HPow { exponent }
            | Gate::CZPow { exponent }
            | Gate::CNotPow { exponent }
            | Gate::SwapPow { exponent }
            | Gate::CCZPow { exponent }
            | Gate::CCXPow { exponent } => Some(*exponent),
            Gate::Identity | Gate::Measure { .. } | Gate::CSwap | Gate::Custom(_) => None,
        }
    }

    /// Raise a power family to `power`, multiplying its exponent.
    ///
    /// Identity stays identity. Returns `None` for gates that have no
    /// exponent (measurement, Fredkin, custom gates).
    #[must_use]
    pub fn pow(&self, power: f64) -> Option<Gate> {
        let mut gate = self.clone();
        match &mut gate {
            Gate::Identity => {}
            Gate::XPow { exponent }
            | Gate::YPow { exponent }
            | Gate::ZPow { exponent }
            | Gate::PhasedXPow { exponent, .. }
            | Gate::HPow { exponent }
            | Gate::CZPow { exponent }
            | Gate::CNotPow { exponent }
            | Gate::SwapPow { exponent }
            | Gate::CCZPow { exponent }
            | Gate::CCXPow { exponent } => *exponent *= power,
            Gate::Measure { .. } | Gate::CSwap | Gate::Custom(_) => return None,
        }
        Some(gate)
    }

    /// Check if this gate is a measurement.
    #[inline]
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::Measure { .. })
    }

    /// Apply the gate to `qubits`.
    pub fn on<Q: Into<Qid>>(&self, qubits: impl IntoIterator<Item = Q>) -> IrResult<Operation> {
        GateOperation::new(self.clone(), qubits).map(Operation::from)
    }

    /// Apply this single-qubit gate to every qubit in `qubits` at once.
    pub fn on_each<Q: Into<Qid>>(
        &self,
        qubits: impl IntoIterator<Item = Q>,
    ) -> IrResult<Operation> {
        ParallelGateOperation::new(self.clone(), qubits).map(Operation::from)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::PhasedXPow {
                phase_exponent,
                exponent,
            } => {
                write!(f, "phased_x(p={phase_exponent})")?;
                if *exponent != 1.0 {
                    write!(f, "**{exponent}")?;
                }
                Ok(())
            }
            Gate::Measure { key: Some(key) } => write!(f, "measure({key})"),
            other => {
                f.write_str(other.name())?;
                match other.exponent() {
                    Some(e) if e != 1.0 => write!(f, "**{e}"),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// A user-defined gate.
///
/// The device knows nothing about it beyond its name and arity, so it is never
/// native and cannot be decomposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
}

impl CustomGate {
    /// Create a new custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
        }
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::Custom(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_properties() {
        assert_eq!(Gate::h().num_qubits(), 1);
        assert_eq!(Gate::cz().num_qubits(), 2);
        assert_eq!(Gate::ccz().num_qubits(), 3);
        assert_eq!(Gate::CSwap.num_qubits(), 3);
        assert_eq!(Gate::from(CustomGate::new("u", 1)).name(), "u");
    }

    #[test]
    fn test_pow() {
        assert_eq!(Gate::ccz().pow(1.5), Some(Gate::CCZPow { exponent: 1.5 }));
        assert_eq!(
            Gate::ZPow { exponent: 0.5 }.pow(-1.0),
            Some(Gate::ZPow { exponent: -0.5 })
        );
        assert_eq!(Gate::Identity.pow(3.0), Some(Gate::Identity));
        assert_eq!(Gate::measure().pow(2.0), None);
        assert_eq!(Gate::CSwap.pow(0.5), None);
    }

    #[test]
    fn test_integer_exponent() {
        assert!(is_integer_exponent(1.0));
        assert!(is_integer_exponent(-2.0));
        assert!(is_integer_exponent(0.5 * 2.0));
        assert!(!is_integer_exponent(1.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Gate::x().to_string(), "x");
        assert_eq!(Gate::ccz().pow(1.5).unwrap().to_string(), "ccz**1.5");
        assert_eq!(
            Gate::Measure {
                key: Some("m".into())
            }
            .to_string(),
            "measure(m)"
        );
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(Gate::CZPow { exponent: 0.5 }).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "cz_pow", "exponent": 0.5}));

        let gate: Gate = serde_json::from_str(r#"{"kind": "identity"}"#).unwrap();
        assert_eq!(gate, Gate::Identity);

        let gate: Gate =
            serde_json::from_str(r#"{"kind": "custom", "name": "u3", "num_qubits": 1}"#).unwrap();
        assert_eq!(gate, Gate::Custom(CustomGate::new("u3", 1)));
    }
}
