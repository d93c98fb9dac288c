//! Rewriting gates into device-native operations.
//!
//! A [`Decomposer`] performs one rewriting step: it replaces a gate operation
//! by an equivalent sequence, or reports that it cannot. The device drives it
//! repeatedly until every operation is native (see
//! [`PasqalDevice::decompose_operation`](crate::PasqalDevice::decompose_operation)).
//!
//! [`NativeDecomposer`] targets the neutral-atom basis: single-qubit X/Y/Z
//! rotations plus whole-exponent CZ, CNOT, CCZ and CCX.

use pasqal_ir::{Gate, GateOperation, IrResult, Qid, is_integer_exponent};

/// One step of gate decomposition.
pub trait Decomposer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Rewrite `operation` as an equivalent sequence, or `None` if this
    /// strategy does not know how.
    ///
    /// The output need not be native yet; it is decomposed again until it is.
    fn decompose(&self, operation: &GateOperation) -> Option<Vec<GateOperation>>;
}

/// Standard rewrites into the neutral-atom native set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDecomposer;

impl Decomposer for NativeDecomposer {
    fn name(&self) -> &'static str {
        "NativeDecomposer"
    }

    fn decompose(&self, operation: &GateOperation) -> Option<Vec<GateOperation>> {
        rewrite(operation.gate(), operation.qubits()).ok().flatten()
    }
}

fn op(gate: Gate, qubits: &[&Qid]) -> IrResult<GateOperation> {
    GateOperation::new(gate, qubits.iter().map(|q| (*q).clone()))
}

fn z_pow(exponent: f64, qubit: &Qid) -> IrResult<GateOperation> {
    op(Gate::ZPow { exponent }, &[qubit])
}

fn cnot(control: &Qid, target: &Qid) -> IrResult<GateOperation> {
    op(Gate::cnot(), &[control, target])
}

/// H = Ry(π/2) · Z, with Z applied first.
fn hadamard(qubit: &Qid) -> IrResult<Vec<GateOperation>> {
    Ok(vec![
        z_pow(1.0, qubit)?,
        op(Gate::YPow { exponent: 0.5 }, &[qubit])?,
    ])
}

/// Sandwich `middle` between Hadamards on `target`.
fn conjugate_by_hadamard(
    target: &Qid,
    middle: GateOperation,
) -> IrResult<Vec<GateOperation>> {
    let h = hadamard(target)?;
    let mut result = Vec::with_capacity(h.len() * 2 + 1);
    result.extend_from_slice(&h);
    result.push(middle);
    result.extend_from_slice(&h);
    Ok(result)
}

#[allow(clippy::many_single_char_names)]
fn rewrite(gate: &Gate, qubits: &[Qid]) -> IrResult<Option<Vec<GateOperation>>> {
    Ok(Some(match gate {
        // H = Ry(π/2) · Z
        Gate::HPow { exponent } if is_integer_exponent(*exponent) => {
            if is_integer_exponent(exponent / 2.0) {
                vec![op(Gate::Identity, &[&qubits[0]])?]
            } else {
                hadamard(&qubits[0])?
            }
        }

        // H^t = Ry(π/4) · Z^t · Ry(-π/4)
        Gate::HPow { exponent } => {
            let q = &qubits[0];
            vec![
                op(Gate::YPow { exponent: -0.25 }, &[q])?,
                z_pow(*exponent, q)?,
                op(Gate::YPow { exponent: 0.25 }, &[q])?,
            ]
        }

        // CZ^t = Z^(t/2) ⊗ Z^(t/2) · CNOT · (I ⊗ Z^(-t/2)) · CNOT
        //
        // Phase bookkeeping: t/2·(a + b − a⊕b) = t·ab.
        Gate::CZPow { exponent } => {
            let (a, b) = (&qubits[0], &qubits[1]);
            let half = exponent / 2.0;
            vec![
                z_pow(half, a)?,
                z_pow(half, b)?,
                cnot(a, b)?,
                z_pow(-half, b)?,
                cnot(a, b)?,
            ]
        }

        // CNOT^t = H(target) · CZ^t · H(target)
        Gate::CNotPow { exponent } => {
            let (a, b) = (&qubits[0], &qubits[1]);
            conjugate_by_hadamard(b, op(Gate::CZPow { exponent: *exponent }, &[a, b])?)?
        }

        // SWAP^t = CNOT(a,b) · CNOT(b,a)^t · CNOT(a,b)
        Gate::SwapPow { exponent } => {
            let (a, b) = (&qubits[0], &qubits[1]);
            if is_integer_exponent(exponent / 2.0) {
                vec![op(Gate::Identity, &[a])?, op(Gate::Identity, &[b])?]
            } else {
                vec![
                    cnot(a, b)?,
                    op(Gate::CNotPow { exponent: *exponent }, &[b, a])?,
                    cnot(a, b)?,
                ]
            }
        }

        // CCZ^t as a CNOT sweep with T^t rotations.
        //
        // Only (a, b) and (b, c) interact, so on a line of three sites the
        // outer pair never needs to be within the control radius. The Z
        // rotations accumulate t/4·(a + b + c − a⊕b − a⊕c − b⊕c + a⊕b⊕c) = t·abc.
        Gate::CCZPow { exponent } => {
            let (a, b, c) = (&qubits[0], &qubits[1], &qubits[2]);
            let p = exponent / 4.0;
            let sweep = || -> IrResult<[GateOperation; 2]> { Ok([cnot(a, b)?, cnot(b, c)?]) };
            let mut result = Vec::with_capacity(15);
            result.extend([z_pow(p, a)?, z_pow(p, b)?, z_pow(p, c)?]);
            result.extend(sweep()?);
            result.extend([z_pow(-p, b)?, z_pow(p, c)?]);
            result.extend(sweep()?);
            result.push(z_pow(-p, c)?);
            result.extend(sweep()?);
            result.push(z_pow(-p, c)?);
            result.extend(sweep()?);
            result
        }

        // CCX^t = H(c) · CCZ^t · H(c)
        Gate::CCXPow { exponent } => {
            let (a, b, c) = (&qubits[0], &qubits[1], &qubits[2]);
            conjugate_by_hadamard(c, op(Gate::CCZPow { exponent: *exponent }, &[a, b, c])?)?
        }

        // CSWAP(a; b, c) = CNOT(c, b) · CCX(a, b, c) · CNOT(c, b)
        Gate::CSwap => {
            let (a, b, c) = (&qubits[0], &qubits[1], &qubits[2]);
            vec![cnot(c, b)?, op(Gate::ccx(), &[a, b, c])?, cnot(c, b)?]
        }

        _ => return Ok(None),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasqal_ir::LineQubit;

    fn line(n: i64) -> Vec<Qid> {
        LineQubit::range(n).into_iter().map(Qid::from).collect()
    }

    fn decompose(gate: Gate, qubits: &[Qid]) -> Option<Vec<GateOperation>> {
        NativeDecomposer.decompose(&GateOperation::new(gate, qubits.to_vec()).unwrap())
    }

    #[test]
    fn test_hadamard() {
        let q = line(1);
        let ops = decompose(Gate::h(), &q).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].gate(), &Gate::z());
        assert_eq!(ops[1].gate(), &Gate::YPow { exponent: 0.5 });

        let even = decompose(Gate::HPow { exponent: 2.0 }, &q).unwrap();
        assert_eq!(even[0].gate(), &Gate::Identity);

        let inverse = decompose(Gate::HPow { exponent: -1.0 }, &q).unwrap();
        assert_eq!(inverse, ops);
    }

    #[test]
    fn test_fractional_hadamard() {
        let q = line(1);
        let ops = decompose(Gate::HPow { exponent: 0.5 }, &q).unwrap();
        let gates: Vec<&Gate> = ops.iter().map(GateOperation::gate).collect();
        assert_eq!(
            gates,
            vec![
                &Gate::YPow { exponent: -0.25 },
                &Gate::ZPow { exponent: 0.5 },
                &Gate::YPow { exponent: 0.25 },
            ]
        );

        let negative = decompose(Gate::HPow { exponent: -0.75 }, &q).unwrap();
        assert_eq!(negative[1].gate(), &Gate::ZPow { exponent: -0.75 });
    }

    #[test]
    fn test_cz_pow() {
        let q = line(2);
        let ops = decompose(Gate::CZPow { exponent: 0.5 }, &q).unwrap();
        assert_eq!(ops.len(), 5);
        assert_eq!(ops[0].gate(), &Gate::ZPow { exponent: 0.25 });
        assert_eq!(ops[3].gate(), &Gate::ZPow { exponent: -0.25 });
        assert_eq!(ops[2].qubits(), &q[..]);
    }

    #[test]
    fn test_ccz_pow_touches_only_adjacent_pairs() {
        let q = line(3);
        let ops = decompose(Gate::CCZPow { exponent: 1.5 }, &q).unwrap();
        assert_eq!(ops.len(), 15);
        for two_qubit in ops.iter().filter(|o| o.qubits().len() == 2) {
            assert_ne!(two_qubit.qubits(), &[q[0].clone(), q[2].clone()][..]);
            assert_eq!(two_qubit.gate(), &Gate::cnot());
        }
        let z_total: f64 = ops
            .iter()
            .filter_map(|o| match o.gate() {
                Gate::ZPow { exponent } => Some(*exponent),
                _ => None,
            })
            .sum();
        // Three +p on entry, then -p, +p, -p, -p: net +p.
        assert!((z_total - 1.5 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_swap_and_cswap() {
        let q = line(3);
        let swap = decompose(Gate::swap(), &q[..2]).unwrap();
        assert_eq!(swap.len(), 3);
        assert_eq!(swap[1].qubits(), &[q[1].clone(), q[0].clone()][..]);
        assert_eq!(swap[1].gate(), &Gate::cnot());

        let root = decompose(Gate::SwapPow { exponent: 0.5 }, &q[..2]).unwrap();
        assert_eq!(root.len(), 3);
        assert_eq!(root[0].gate(), &Gate::cnot());
        assert_eq!(root[1].gate(), &Gate::CNotPow { exponent: 0.5 });
        assert_eq!(root[1].qubits(), &[q[1].clone(), q[0].clone()][..]);

        let negative = decompose(Gate::SwapPow { exponent: -1.0 }, &q[..2]).unwrap();
        assert_eq!(negative[1].gate(), &Gate::CNotPow { exponent: -1.0 });

        let even = decompose(Gate::SwapPow { exponent: 2.0 }, &q[..2]).unwrap();
        assert!(even.iter().all(|o| o.gate() == &Gate::Identity));
        assert_eq!(even.len(), 2);

        let fredkin = decompose(Gate::CSwap, &q).unwrap();
        assert_eq!(fredkin.len(), 3);
        assert_eq!(fredkin[1].gate(), &Gate::ccx());
    }

    #[test]
    fn test_unknown_gates() {
        let q = line(1);
        assert!(decompose(Gate::Custom(pasqal_ir::CustomGate::new("u", 1)), &q).is_none());
    }
}
