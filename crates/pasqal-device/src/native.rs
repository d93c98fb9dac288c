//! The closed set of operations the hardware executes directly.
//!
//! Single-qubit rotations and identity/measurement are native at any
//! exponent. The controlled families (CZ, CNOT, CCZ, CCX) are native only at
//! whole exponents; fractional powers have to be rewritten first.

use pasqal_ir::{Gate, Operation, is_integer_exponent};

/// Category of a device-native operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    /// Identity on one site.
    Identity,
    /// Measurement of one site.
    Measurement,
    /// X, Y or phased-X rotation on one site.
    XyRotation,
    /// Z rotation on one site.
    ZRotation,
    /// CZ or CNOT between two sites.
    TwoQubitEntangler,
    /// CCZ or CCX across three sites.
    ThreeQubitEntangler,
    /// Z rotation on many sites at once.
    ParallelZ,
    /// X/Y rotation on many sites at once.
    ParallelXy,
    /// Identity or measurement on many sites at once.
    ParallelPassive,
}

impl NativeKind {
    /// Whether the kind is a parallel application.
    pub fn is_parallel(self) -> bool {
        matches!(
            self,
            NativeKind::ParallelZ | NativeKind::ParallelXy | NativeKind::ParallelPassive
        )
    }
}

/// Native kind of a single-qubit gate, if it is native.
fn single_qubit_kind(gate: &Gate) -> Option<NativeKind> {
    match gate {
        Gate::Identity => Some(NativeKind::Identity),
        Gate::Measure { .. } => Some(NativeKind::Measurement),
        Gate::XPow { .. } | Gate::YPow { .. } | Gate::PhasedXPow { .. } => {
            Some(NativeKind::XyRotation)
        }
        Gate::ZPow { .. } => Some(NativeKind::ZRotation),
        _ => None,
    }
}

/// Native kind of a gate bound to explicit qubits, if it is native.
pub fn gate_kind(gate: &Gate) -> Option<NativeKind> {
    match gate {
        Gate::CZPow { exponent } | Gate::CNotPow { exponent } => {
            is_integer_exponent(*exponent).then_some(NativeKind::TwoQubitEntangler)
        }
        Gate::CCZPow { exponent } | Gate::CCXPow { exponent } => {
            is_integer_exponent(*exponent).then_some(NativeKind::ThreeQubitEntangler)
        }
        other => single_qubit_kind(other),
    }
}

/// Classify an operation, returning `None` when it is not device-native.
pub fn native_kind(operation: &Operation) -> Option<NativeKind> {
    match operation {
        Operation::Gate(op) => gate_kind(op.gate()),
        Operation::Parallel(op) => match single_qubit_kind(op.gate())? {
            NativeKind::ZRotation => Some(NativeKind::ParallelZ),
            NativeKind::XyRotation => Some(NativeKind::ParallelXy),
            _ => Some(NativeKind::ParallelPassive),
        },
        Operation::Opaque(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasqal_ir::{CustomGate, LineQubit, OpaqueOperation};

    #[test]
    fn test_single_qubit_families() {
        assert_eq!(gate_kind(&Gate::Identity), Some(NativeKind::Identity));
        assert_eq!(gate_kind(&Gate::measure()), Some(NativeKind::Measurement));
        assert_eq!(
            gate_kind(&Gate::XPow { exponent: 0.3 }),
            Some(NativeKind::XyRotation)
        );
        assert_eq!(
            gate_kind(&Gate::PhasedXPow {
                phase_exponent: 0.25,
                exponent: 0.5
            }),
            Some(NativeKind::XyRotation)
        );
        assert_eq!(gate_kind(&Gate::z()), Some(NativeKind::ZRotation));
        assert_eq!(gate_kind(&Gate::h()), None);
        assert_eq!(gate_kind(&Gate::Custom(CustomGate::new("u", 1))), None);
    }

    #[test]
    fn test_entanglers_need_whole_exponents() {
        assert_eq!(gate_kind(&Gate::cz()), Some(NativeKind::TwoQubitEntangler));
        assert_eq!(gate_kind(&Gate::CZPow { exponent: 0.5 }), None);
        assert_eq!(gate_kind(&Gate::ccz()), Some(NativeKind::ThreeQubitEntangler));
        assert_eq!(gate_kind(&Gate::CCZPow { exponent: 1.5 }), None);
        assert_eq!(gate_kind(&Gate::swap()), None);
        assert_eq!(gate_kind(&Gate::CSwap), None);
    }

    #[test]
    fn test_operation_shapes() {
        let sites = LineQubit::range(3);
        let parallel_z = Gate::z().on_each(sites.clone()).unwrap();
        assert_eq!(native_kind(&parallel_z), Some(NativeKind::ParallelZ));

        let parallel_y = Gate::y().on_each(sites.clone()).unwrap();
        assert_eq!(native_kind(&parallel_y), Some(NativeKind::ParallelXy));

        let parallel_h = Gate::h().on_each(sites.clone()).unwrap();
        assert_eq!(native_kind(&parallel_h), None);

        let opaque = Operation::from(OpaqueOperation::new("block", sites));
        assert_eq!(native_kind(&opaque), None);
        assert!(NativeKind::ParallelPassive.is_parallel());
        assert!(!NativeKind::Identity.is_parallel());
    }
}
