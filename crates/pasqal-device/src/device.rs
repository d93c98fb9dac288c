//! The neutral-atom device.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use pasqal_ir::{GateOperation, Operation, Qid, ThreeDGridQubit};

use crate::config::DurationConfig;
use crate::decompose::{Decomposer, NativeDecomposer};
use crate::error::{DeviceError, DeviceResult};
use crate::native::{NativeKind, gate_kind, native_kind};

/// Maximum nesting of decomposition steps before giving up.
pub const MAX_DECOMPOSITION_DEPTH: usize = 16;

/// Fixed durations of the operations that have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationTable {
    /// Duration of an identity gate.
    pub identity: Duration,
    /// Duration of a measurement.
    pub measurement: Duration,
}

impl Default for DurationTable {
    fn default() -> Self {
        Self {
            identity: Duration::from_micros(2),
            measurement: Duration::from_millis(2),
        }
    }
}

/// A neutral-atom device: a fixed set of sites and the rules for using them.
///
/// The device is immutable once built. Every query is a pure function of the
/// site layout, so one device can be shared across threads.
///
/// # Example
///
/// ```rust
/// use pasqal_device::PasqalDevice;
/// use pasqal_ir::{Gate, ThreeDGridQubit};
///
/// let device = PasqalDevice::new(1.5, ThreeDGridQubit::cube(2, 0, 0, 0)).unwrap();
/// let sites = device.qubit_list();
///
/// let cz = Gate::cz().on([sites[0], sites[1]]).unwrap();
/// device.validate_operation(&cz).unwrap();
///
/// let far = Gate::cz().on([sites[0], sites[7]]).unwrap();
/// assert!(device.validate_operation(&far).is_err());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "DeviceRecord", into = "DeviceRecord")]
pub struct PasqalDevice {
    control_radius: f64,
    qubits: BTreeSet<ThreeDGridQubit>,
    durations: DurationTable,
    decomposer: Arc<dyn Decomposer>,
}

/// Serialized form of a device.
///
/// Durations are omitted when they equal the defaults.
#[derive(Serialize, Deserialize)]
struct DeviceRecord {
    control_radius: f64,
    qubits: Vec<ThreeDGridQubit>,
    #[serde(default, skip_serializing_if = "DurationConfig::is_default")]
    durations: DurationConfig,
}

impl TryFrom<DeviceRecord> for PasqalDevice {
    type Error = DeviceError;

    fn try_from(record: DeviceRecord) -> DeviceResult<Self> {
        record.durations.validate()?;
        Ok(PasqalDevice::new(record.control_radius, record.qubits)?
            .with_durations(record.durations.into()))
    }
}

impl From<PasqalDevice> for DeviceRecord {
    fn from(device: PasqalDevice) -> Self {
        DeviceRecord {
            control_radius: device.control_radius,
            qubits: device.qubits.into_iter().collect(),
            durations: device.durations.into(),
        }
    }
}

impl PasqalDevice {
    /// Build a device from its control radius and sites.
    ///
    /// Every element of `qubits` must be a [`ThreeDGridQubit`]; duplicates
    /// collapse into one site.
    pub fn new<Q: Into<Qid>>(
        control_radius: f64,
        qubits: impl IntoIterator<Item = Q>,
    ) -> DeviceResult<Self> {
        let mut sites = BTreeSet::new();
        for qubit in qubits {
            match qubit.into() {
                Qid::Grid(site) => {
                    sites.insert(site);
                }
                other => {
                    return Err(DeviceError::UnsupportedQubitType {
                        kind: other.kind_name(),
                        qubit: other,
                    });
                }
            }
        }

        if !control_radius.is_finite() || control_radius <= 0.0 {
            return Err(DeviceError::InvalidControlRadius(control_radius));
        }

        info!(
            "Built device with {} sites, control radius {}",
            sites.len(),
            control_radius
        );

        Ok(Self {
            control_radius,
            qubits: sites,
            durations: DurationTable::default(),
            decomposer: Arc::new(NativeDecomposer),
        })
    }

    /// Replace the duration table.
    #[must_use]
    pub fn with_durations(mut self, durations: DurationTable) -> Self {
        self.durations = durations;
        self
    }

    /// Replace the decomposition strategy.
    #[must_use]
    pub fn with_decomposer(mut self, decomposer: impl Decomposer + 'static) -> Self {
        self.decomposer = Arc::new(decomposer);
        self
    }

    /// Maximum distance for a two-qubit interaction.
    #[inline]
    pub fn control_radius(&self) -> f64 {
        self.control_radius
    }

    /// The duration table.
    #[inline]
    pub fn durations(&self) -> &DurationTable {
        &self.durations
    }

    /// The set of sites.
    #[inline]
    pub fn qubit_set(&self) -> &BTreeSet<ThreeDGridQubit> {
        &self.qubits
    }

    /// The sites in ascending order.
    pub fn qubit_list(&self) -> Vec<ThreeDGridQubit> {
        self.qubits.iter().copied().collect()
    }

    /// The sites in ascending order, as generic qubit identities.
    pub fn qubits(&self) -> Vec<Qid> {
        self.qubits.iter().map(Qid::from).collect()
    }

    /// Number of sites.
    #[inline]
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Check if the device has no sites.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Check whether `qubit` is a site of this device.
    pub fn contains(&self, qubit: &Qid) -> bool {
        qubit.as_grid().is_some_and(|site| self.qubits.contains(site))
    }

    /// Euclidean distance between two grid qubits.
    ///
    /// The qubits need not be sites of this device, but both must be
    /// [`ThreeDGridQubit`]s.
    pub fn distance(&self, a: &Qid, b: &Qid) -> DeviceResult<f64> {
        let a = a
            .as_grid()
            .ok_or_else(|| DeviceError::UnsupportedQubit(a.clone()))?;
        let b = b
            .as_grid()
            .ok_or_else(|| DeviceError::UnsupportedQubit(b.clone()))?;
        Ok(a.distance(b))
    }

    /// Sites other than `site` within the control radius, in ascending order.
    pub fn neighbors(&self, site: &ThreeDGridQubit) -> Vec<ThreeDGridQubit> {
        self.qubits
            .iter()
            .filter(|other| *other != site && site.distance(other) <= self.control_radius)
            .copied()
            .collect()
    }

    /// Duration of an operation.
    ///
    /// Only identity and measurement have a known duration.
    pub fn duration_of(&self, operation: &Operation) -> DeviceResult<Duration> {
        match operation.gate().and_then(gate_kind) {
            Some(NativeKind::Identity) => Ok(self.durations.identity),
            Some(NativeKind::Measurement) => Ok(self.durations.measurement),
            _ => Err(DeviceError::UnsupportedDuration(operation.to_string())),
        }
    }

    /// Whether `operation` is one the hardware executes directly.
    pub fn is_pasqal_device_op(operation: &Operation) -> bool {
        native_kind(operation).is_some()
    }

    /// Rewrite a gate operation into device-native operations.
    ///
    /// Native operations come back unchanged. Every returned operation is
    /// native, but still has to pass [`validate_operation`](Self::validate_operation)
    /// (the rewrite does not know the site layout).
    pub fn decompose_operation(&self, operation: &Operation) -> DeviceResult<Vec<Operation>> {
        self.decompose_with(operation, self.decomposer.as_ref())
    }

    /// Like [`decompose_operation`](Self::decompose_operation), with an explicit strategy.
    pub fn decompose_with(
        &self,
        operation: &Operation,
        decomposer: &dyn Decomposer,
    ) -> DeviceResult<Vec<Operation>> {
        let Operation::Gate(gate_op) = operation else {
            return Err(DeviceError::NotAGateOperation(operation.to_string()));
        };

        if Self::is_pasqal_device_op(operation) {
            return Ok(vec![operation.clone()]);
        }

        debug!("Decomposing {} with {}", operation, decomposer.name());
        let mut native = Vec::new();
        expand(gate_op, decomposer, 0, &mut native)?;
        Ok(native.into_iter().map(Operation::from).collect())
    }

    /// Check that `operation` can run on this device.
    pub fn validate_operation(&self, operation: &Operation) -> DeviceResult<()> {
        let kind = match (operation, native_kind(operation)) {
            (Operation::Gate(_) | Operation::Parallel(_), Some(kind)) => kind,
            _ => return Err(DeviceError::UnsupportedOperation(operation.to_string())),
        };

        for qubit in operation.qubits() {
            if !self.contains(qubit) {
                return Err(DeviceError::QubitNotOnDevice(qubit.clone()));
            }
        }

        let count = operation.qubits().len();
        let sites = self.len();
        match kind {
            NativeKind::TwoQubitEntangler | NativeKind::ThreeQubitEntangler => {
                self.check_pairwise_distances(operation.qubits())?;
            }
            NativeKind::ParallelZ if count > sites.saturating_sub(1) => {
                return Err(DeviceError::TooManyZGates { count, sites });
            }
            NativeKind::ParallelXy if count != 1 && count != sites => {
                return Err(DeviceError::BadXyGateCount { count, sites });
            }
            _ => {}
        }

        debug!("Validated {}", operation);
        Ok(())
    }

    /// Validate every operation, stopping at the first failure.
    #[instrument(skip_all, fields(sites = self.len()))]
    pub fn validate_operations<'a>(
        &self,
        operations: impl IntoIterator<Item = &'a Operation>,
    ) -> DeviceResult<()> {
        let mut validated = 0usize;
        for operation in operations {
            self.validate_operation(operation)?;
            validated += 1;
        }
        debug!("Validated {} operations", validated);
        Ok(())
    }

    /// Decompose every operation, then validate the result.
    ///
    /// Returns the native, validated sequence in order.
    #[instrument(skip_all, fields(sites = self.len()))]
    pub fn validate_circuit<'a>(
        &self,
        operations: impl IntoIterator<Item = &'a Operation>,
    ) -> DeviceResult<Vec<Operation>> {
        let mut native = Vec::new();
        for operation in operations {
            let decomposed = match operation {
                Operation::Gate(_) => self.decompose_operation(operation)?,
                _ => vec![operation.clone()],
            };
            for op in decomposed {
                self.validate_operation(&op)?;
                native.push(op);
            }
        }
        info!("Circuit lowered to {} native operations", native.len());
        Ok(native)
    }

    fn check_pairwise_distances(&self, qubits: &[Qid]) -> DeviceResult<()> {
        for (i, a) in qubits.iter().enumerate() {
            for b in &qubits[i + 1..] {
                let distance = self.distance(a, b)?;
                if distance > self.control_radius {
                    return Err(DeviceError::QubitsTooFarApart {
                        a: a.clone(),
                        b: b.clone(),
                        distance,
                        control_radius: self.control_radius,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Depth-first expansion of `operation` into native gate operations.
fn expand(
    operation: &GateOperation,
    decomposer: &dyn Decomposer,
    depth: usize,
    out: &mut Vec<GateOperation>,
) -> DeviceResult<()> {
    if gate_kind(operation.gate()).is_some() {
        out.push(operation.clone());
        return Ok(());
    }
    if depth >= MAX_DECOMPOSITION_DEPTH {
        return Err(DeviceError::DecompositionFailed(format!(
            "{} (depth limit {MAX_DECOMPOSITION_DEPTH} reached)",
            Operation::from(operation.clone())
        )));
    }
    let steps = decomposer.decompose(operation).ok_or_else(|| {
        DeviceError::DecompositionFailed(Operation::from(operation.clone()).to_string())
    })?;
    for step in &steps {
        expand(step, decomposer, depth + 1, out)?;
    }
    Ok(())
}

impl fmt::Debug for PasqalDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasqalDevice")
            .field("control_radius", &self.control_radius)
            .field("qubits", &self.qubit_list())
            .field("durations", &self.durations)
            .field("decomposer", &self.decomposer.name())
            .finish()
    }
}

impl fmt::Display for PasqalDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PasqalDevice(control_radius={}, qubits=[",
            self.control_radius
        )?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{q}")?;
        }
        f.write_str("])")
    }
}

impl PartialEq for PasqalDevice {
    fn eq(&self, other: &Self) -> bool {
        self.control_radius == other.control_radius
            && self.qubits == other.qubits
            && self.durations == other.durations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasqal_ir::{Gate, LineQubit};

    fn square_device() -> PasqalDevice {
        PasqalDevice::new(1.0, ThreeDGridQubit::square(2, 0, 0)).unwrap()
    }

    #[test]
    fn test_deduplicates_sites() {
        let q = ThreeDGridQubit::new(0.0, 0.0, 0.0);
        let device = PasqalDevice::new(1.0, [q, q, q + (0.0, 0.0, 1e-12)]).unwrap();
        assert_eq!(device.len(), 1);
    }

    #[test]
    fn test_rejects_non_finite_radius() {
        let sites = ThreeDGridQubit::square(1, 0, 0);
        assert!(matches!(
            PasqalDevice::new(f64::NAN, sites.clone()),
            Err(DeviceError::InvalidControlRadius(_))
        ));
        assert!(matches!(
            PasqalDevice::new(0.0, sites),
            Err(DeviceError::InvalidControlRadius(_))
        ));
    }

    #[test]
    fn test_neighbors() {
        let device = square_device();
        let origin = ThreeDGridQubit::new(0.0, 0.0, 0.0);
        assert_eq!(
            device.neighbors(&origin),
            vec![
                ThreeDGridQubit::new(0.0, 1.0, 0.0),
                ThreeDGridQubit::new(1.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_contains() {
        let device = square_device();
        assert!(device.contains(&Qid::from(ThreeDGridQubit::new(1.0, 1.0, 0.0))));
        assert!(!device.contains(&Qid::from(ThreeDGridQubit::new(2.0, 1.0, 0.0))));
        assert!(!device.contains(&Qid::from(LineQubit(0))));
    }

    #[test]
    fn test_display() {
        let device = PasqalDevice::new(1.5, [ThreeDGridQubit::new(0.0, 0.0, 0.0)]).unwrap();
        assert_eq!(
            device.to_string(),
            "PasqalDevice(control_radius=1.5, qubits=[(0, 0, 0)])"
        );
    }

    #[test]
    fn test_custom_decomposer() {
        struct Refuse;
        impl Decomposer for Refuse {
            fn name(&self) -> &'static str {
                "Refuse"
            }
            fn decompose(&self, _operation: &GateOperation) -> Option<Vec<GateOperation>> {
                None
            }
        }

        let device = square_device().with_decomposer(Refuse);
        let sites = device.qubit_list();
        let op = Gate::h().on([sites[0]]).unwrap();
        assert!(matches!(
            device.decompose_operation(&op),
            Err(DeviceError::DecompositionFailed(_))
        ));
        assert_eq!(square_device().decompose_operation(&op).unwrap().len(), 2);
    }

    #[test]
    fn test_looping_decomposer_hits_depth_limit() {
        struct Loop;
        impl Decomposer for Loop {
            fn name(&self) -> &'static str {
                "Loop"
            }
            fn decompose(&self, operation: &GateOperation) -> Option<Vec<GateOperation>> {
                Some(vec![operation.clone()])
            }
        }

        let device = square_device();
        let sites = device.qubit_list();
        let op = Gate::h().on([sites[0]]).unwrap();
        let err = device.decompose_with(&op, &Loop).unwrap_err();
        assert!(err.to_string().contains("depth limit"));
    }

    #[test]
    fn test_device_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PasqalDevice>();
    }
}
