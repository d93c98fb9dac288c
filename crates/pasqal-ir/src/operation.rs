//! Operations: gates bound to the qubits they act on.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::Qid;

/// Reject repeated qubits in one operation.
fn check_distinct(qubits: &[Qid], gate_name: &str) -> IrResult<()> {
    let mut seen = FxHashSet::default();
    for qubit in qubits {
        if !seen.insert(qubit) {
            return Err(IrError::DuplicateQubit {
                qubit: qubit.clone(),
                gate_name: Some(gate_name.to_string()),
            });
        }
    }
    Ok(())
}

/// Wire form of a gate operation, checked on the way in.
#[derive(Deserialize)]
struct RawTargets {
    gate: Gate,
    qubits: Vec<Qid>,
}

/// A gate applied to an explicit list of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTargets")]
pub struct GateOperation {
    gate: Gate,
    qubits: Vec<Qid>,
}

impl GateOperation {
    /// Bind `gate` to `qubits`.
    ///
    /// Fails if the qubit count does not match the gate's arity or a qubit
    /// appears twice.
    pub fn new<Q: Into<Qid>>(gate: Gate, qubits: impl IntoIterator<Item = Q>) -> IrResult<Self> {
        let qubits: Vec<Qid> = qubits.into_iter().map(Into::into).collect();
        let expected = gate.num_qubits();
        if qubits.len() != expected as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected,
                got: u32::try_from(qubits.len()).unwrap_or(u32::MAX),
            });
        }
        check_distinct(&qubits, gate.name())?;
        Ok(Self { gate, qubits })
    }

    /// The gate.
    #[inline]
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// The target qubits, in gate order.
    #[inline]
    pub fn qubits(&self) -> &[Qid] {
        &self.qubits
    }
}

impl TryFrom<RawTargets> for GateOperation {
    type Error = IrError;

    fn try_from(raw: RawTargets) -> IrResult<Self> {
        GateOperation::new(raw.gate, raw.qubits)
    }
}

/// One single-qubit gate applied simultaneously to several qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTargets")]
pub struct ParallelGateOperation {
    gate: Gate,
    qubits: Vec<Qid>,
}

impl ParallelGateOperation {
    /// Apply `gate` to every qubit in `qubits` at once.
    pub fn new<Q: Into<Qid>>(gate: Gate, qubits: impl IntoIterator<Item = Q>) -> IrResult<Self> {
        if gate.num_qubits() != 1 {
            return Err(IrError::NotSingleQubitGate(gate.name().to_string()));
        }
        let qubits: Vec<Qid> = qubits.into_iter().map(Into::into).collect();
        if qubits.is_empty() {
            return Err(IrError::NoQubits(gate.name().to_string()));
        }
        check_distinct(&qubits, gate.name())?;
        Ok(Self { gate, qubits })
    }

    /// The gate applied to each qubit.
    #[inline]
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// The target qubits.
    #[inline]
    pub fn qubits(&self) -> &[Qid] {
        &self.qubits
    }
}

impl TryFrom<RawTargets> for ParallelGateOperation {
    type Error = IrError;

    fn try_from(raw: RawTargets) -> IrResult<Self> {
        ParallelGateOperation::new(raw.gate, raw.qubits)
    }
}

/// An operation whose structure is unknown here.
///
/// Stands for operations produced elsewhere in a circuit (classically
/// controlled blocks, tagged sub-circuits, ...). Devices see only a name and
/// the qubits it touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueOperation {
    /// Descriptive name.
    pub name: String,
    /// Qubits touched.
    pub qubits: Vec<Qid>,
}

impl OpaqueOperation {
    /// Create an opaque operation.
    pub fn new<Q: Into<Qid>>(name: impl Into<String>, qubits: impl IntoIterator<Item = Q>) -> Self {
        Self {
            name: name.into(),
            qubits: qubits.into_iter().map(Into::into).collect(),
        }
    }
}

/// The closed set of operation shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// A gate applied to explicit qubits.
    Gate(GateOperation),
    /// A single-qubit gate applied to many qubits at once.
    Parallel(ParallelGateOperation),
    /// Anything else.
    Opaque(OpaqueOperation),
}

impl Operation {
    /// Qubits this operation acts on.
    pub fn qubits(&self) -> &[Qid] {
        match self {
            Operation::Gate(op) => op.qubits(),
            Operation::Parallel(op) => op.qubits(),
            Operation::Opaque(op) => &op.qubits,
        }
    }

    /// The underlying gate, for gate-shaped operations.
    pub fn gate(&self) -> Option<&Gate> {
        match self {
            Operation::Gate(op) => Some(op.gate()),
            Operation::Parallel(op) => Some(op.gate()),
            Operation::Opaque(_) => None,
        }
    }

    /// Get the gate operation if this is one.
    pub fn as_gate_operation(&self) -> Option<&GateOperation> {
        match self {
            Operation::Gate(op) => Some(op),
            _ => None,
        }
    }

    /// Check if this is a gate operation.
    pub fn is_gate_operation(&self) -> bool {
        matches!(self, Operation::Gate(_))
    }

    /// Check if this is a parallel gate operation.
    pub fn is_parallel(&self) -> bool {
        matches!(self, Operation::Parallel(_))
    }

    /// Get the name of the operation.
    pub fn name(&self) -> &str {
        match self {
            Operation::Gate(op) => op.gate().name(),
            Operation::Parallel(op) => op.gate().name(),
            Operation::Opaque(op) => &op.name,
        }
    }
}

impl From<GateOperation> for Operation {
    fn from(op: GateOperation) -> Self {
        Operation::Gate(op)
    }
}

impl From<ParallelGateOperation> for Operation {
    fn from(op: ParallelGateOperation) -> Self {
        Operation::Parallel(op)
    }
}

impl From<OpaqueOperation> for Operation {
    fn from(op: OpaqueOperation) -> Self {
        Operation::Opaque(op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, qubits) = match self {
            Operation::Gate(op) => (op.gate().to_string(), op.qubits()),
            Operation::Parallel(op) => (format!("parallel[{}]", op.gate()), op.qubits()),
            Operation::Opaque(op) => (op.name.clone(), op.qubits.as_slice()),
        };
        write!(f, "{label}(")?;
        for (i, q) in qubits.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{q}")?;
        }
        f.write_str(")")
    }
}

/// Measure a single qubit.
pub fn measure(qubit: impl Into<Qid>) -> Operation {
    Operation::Gate(GateOperation {
        gate: Gate::measure(),
        qubits: vec![qubit.into()],
    })
}
