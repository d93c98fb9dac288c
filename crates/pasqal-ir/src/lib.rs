//! Pasqal Intermediate Representation
//!
//! This crate provides the qubit, gate and operation types that neutral-atom
//! device models check circuits against.
//!
//! # Core Components
//!
//! - **Qubits**: [`ThreeDGridQubit`] for sites in 3D space, plus [`LineQubit`]
//!   and [`NamedQubit`], all unified under [`Qid`]
//! - **Gates**: [`Gate`], a closed set of rotation families, and
//!   [`CustomGate`] for opaque user gates
//! - **Operations**: [`GateOperation`], [`ParallelGateOperation`] and
//!   [`OpaqueOperation`], unified under [`Operation`]
//!
//! # Example: Building Operations on a Lattice
//!
//! ```rust
//! use pasqal_ir::{Gate, ThreeDGridQubit};
//!
//! let sites = ThreeDGridQubit::square(2, 0, 0);
//! assert_eq!(sites.len(), 4);
//!
//! let cz = Gate::cz().on([sites[0], sites[1]]).unwrap();
//! assert_eq!(cz.qubits().len(), 2);
//!
//! let global_x = Gate::x().on_each(sites.iter().copied()).unwrap();
//! assert!(global_x.is_parallel());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `Identity` | 1 | Identity |
//! | `Measure` | 1 | Computational-basis measurement |
//! | `XPow`, `YPow`, `ZPow` | 1 | Pauli powers |
//! | `PhasedXPow` | 1 | X rotation about a tilted axis |
//! | `HPow` | 1 | Hadamard power |
//! | `CZPow`, `CNotPow`, `SwapPow` | 2 | Entangling families |
//! | `CCZPow`, `CCXPow` | 3 | Doubly-controlled families |
//! | `CSwap` | 3 | Fredkin |

pub mod error;
pub mod gate;
pub mod operation;
pub mod qubit;

pub use error::{IrError, IrResult};
pub use gate::{CustomGate, EXPONENT_TOLERANCE, Gate, is_integer_exponent};
pub use operation::{GateOperation, OpaqueOperation, Operation, ParallelGateOperation, measure};
pub use qubit::{COMPARISON_DIGITS, LineQubit, NamedQubit, Offset, Qid, ThreeDGridQubit};
