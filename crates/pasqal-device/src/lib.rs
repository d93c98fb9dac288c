//! Neutral-atom device model.
//!
//! This crate describes a neutral-atom quantum processor as a fixed set of
//! sites in three-dimensional space, together with the rules a circuit has to
//! obey to run on it:
//!
//! - every operation must belong to the native set (see [`NativeKind`]);
//! - every target must be a site of the device;
//! - interacting qubits must lie within the control radius;
//! - parallel Z rotations may not cover every site, and parallel X/Y
//!   rotations must cover exactly one site or all of them.
//!
//! Non-native gates are rewritten by a [`Decomposer`] before validation.
//!
//! # Example
//!
//! ```rust
//! use pasqal_device::PasqalDevice;
//! use pasqal_ir::{Gate, ThreeDGridQubit};
//!
//! let device = PasqalDevice::new(1.5, ThreeDGridQubit::square(3, 0, 0)).unwrap();
//! let sites = device.qubit_list();
//!
//! // A fractional CCZ is not native; lower it first.
//! let ccz = Gate::CCZPow { exponent: 0.5 }
//!     .on([sites[0], sites[1], sites[2]])
//!     .unwrap();
//! let native = device.validate_circuit([&ccz]).unwrap();
//! assert!(native.iter().all(PasqalDevice::is_pasqal_device_op));
//! ```

pub mod config;
pub mod decompose;
pub mod device;
pub mod error;
pub mod native;

pub use config::{
    CONTROL_RADIUS_ENV, ConfigError, DeviceConfig, DurationConfig, LayoutConfig, MAX_LAYOUT_SITES,
};
pub use decompose::{Decomposer, NativeDecomposer};
pub use device::{DurationTable, MAX_DECOMPOSITION_DEPTH, PasqalDevice};
pub use error::{DeviceError, DeviceResult, ErrorClass};
pub use native::{NativeKind, gate_kind, native_kind};
