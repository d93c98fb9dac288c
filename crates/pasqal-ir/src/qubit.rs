//! Qubit identities.
//!
//! [`ThreeDGridQubit`] is a site in 3D space. [`LineQubit`] and
//! [`NamedQubit`] are the other identities a circuit may carry; they exist so
//! that a device can reject them explicitly. [`Qid`] is the closed sum of all
//! three.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Neg, Sub};

/// Number of decimal digits kept when comparing coordinates.
pub const COMPARISON_DIGITS: i32 = 9;

/// Round an axis value to [`COMPARISON_DIGITS`] decimals, folding `-0.0` into `0.0`.
fn round_axis(value: f64) -> f64 {
    let scale = 10f64.powi(COMPARISON_DIGITS);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Upper bound on the capacity a lattice factory reserves up front.
const MAX_PREALLOCATED_SITES: usize = 1 << 20;

/// Number of sites in a dense grid with the given extents, capped for preallocation.
fn grid_capacity(extents: &[u32]) -> usize {
    extents
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n as usize))
        .map_or(MAX_PREALLOCATED_SITES, |n| n.min(MAX_PREALLOCATED_SITES))
}

/// A qubit site in 3D space.
///
/// Sites compare, order and hash by their axes rounded to nine decimals, so
/// arithmetic noise does not split one site into two. Ordering is
/// lexicographic over `(x, y, z)`:
///
/// ```rust
/// use pasqal_ir::ThreeDGridQubit;
///
/// let q000 = ThreeDGridQubit::new(0.0, 0.0, 0.0);
/// let q001 = ThreeDGridQubit::new(0.0, 0.0, 1.0);
/// let q010 = ThreeDGridQubit::new(0.0, 1.0, 0.0);
/// let q100 = ThreeDGridQubit::new(1.0, 0.0, 0.0);
/// assert!(q000 < q001 && q001 < q010 && q010 < q100);
/// ```
///
/// New sites are built by offsetting with 3-tuples:
///
/// ```rust
/// use pasqal_ir::ThreeDGridQubit;
///
/// let q = ThreeDGridQubit::new(2.5, 3.0, 4.7) + (3.0, 1.2, 6.0);
/// assert_eq!(q, ThreeDGridQubit::new(5.5, 4.2, 10.7));
/// ```
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct ThreeDGridQubit {
    x: f64,
    y: f64,
    z: f64,
}

impl ThreeDGridQubit {
    /// Create a site at `(row, col, lay)`.
    pub const fn new(row: f64, col: f64, lay: f64) -> Self {
        Self {
            x: row,
            y: col,
            z: lay,
        }
    }

    /// Row coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Column coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Layer coordinate.
    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Number of levels of the site. Always 2.
    #[inline]
    pub const fn dimension(&self) -> u32 {
        2
    }

    /// The rounded triple used for equality, ordering and hashing.
    pub fn comparison_key(&self) -> (f64, f64, f64) {
        (round_axis(self.x), round_axis(self.y), round_axis(self.z))
    }

    /// Euclidean distance to another site, on the raw axes.
    pub fn distance(&self, other: &ThreeDGridQubit) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }

    /// A dense `rows × cols × lays` block starting at `(top, left, upper)`.
    ///
    /// Sites are ordered by row, then column, then layer.
    pub fn parallelepiped(
        rows: u32,
        cols: u32,
        lays: u32,
        top: i64,
        left: i64,
        upper: i64,
    ) -> Vec<ThreeDGridQubit> {
        let mut sites = Vec::with_capacity(grid_capacity(&[rows, cols, lays]));
        for row in 0..rows {
            for col in 0..cols {
                for lay in 0..lays {
                    sites.push(ThreeDGridQubit::new(
                        top as f64 + f64::from(row),
                        left as f64 + f64::from(col),
                        upper as f64 + f64::from(lay),
                    ));
                }
            }
        }
        sites
    }

    /// A cube of side `diameter` starting at `(top, left, upper)`.
    pub fn cube(diameter: u32, top: i64, left: i64, upper: i64) -> Vec<ThreeDGridQubit> {
        Self::parallelepiped(diameter, diameter, diameter, top, left, upper)
    }

    /// A `rows × cols` rectangle on layer 0 starting at `(top, left)`.
    pub fn rect(rows: u32, cols: u32, top: i64, left: i64) -> Vec<ThreeDGridQubit> {
        Self::parallelepiped(rows, cols, 1, top, left, 0)
    }

    /// A square of side `diameter` on layer 0 starting at `(top, left)`.
    pub fn square(diameter: u32, top: i64, left: i64) -> Vec<ThreeDGridQubit> {
        Self::rect(diameter, diameter, top, left)
    }

    /// A triangular lattice of `(size + 1)²` sites on layer 0.
    ///
    /// Point `(i, j)` lands at `x = i + (j mod 2) / 2`, `y = j·√3/2`, shifted
    /// by `(top, left)`, so that every site has six equidistant neighbours in
    /// the bulk.
    pub fn triangular_lattice(size: u32, top: f64, left: f64) -> Vec<ThreeDGridQubit> {
        let side = u64::from(size) + 1;
        let row_height = 3f64.sqrt() / 2.0;
        let mut sites = Vec::with_capacity(
            usize::try_from(side.saturating_mul(side))
                .unwrap_or(0)
                .min(MAX_PREALLOCATED_SITES),
        );
        for i in 0..side {
            for j in 0..side {
                let shift = if j % 2 == 1 { 0.5 } else { 0.0 };
                sites.push(ThreeDGridQubit::new(
                    i as f64 + shift + top,
                    j as f64 * row_height + left,
                    0.0,
                ));
            }
        }
        sites
    }

    fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        ThreeDGridQubit::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl PartialEq for ThreeDGridQubit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ThreeDGridQubit {}

impl PartialOrd for ThreeDGridQubit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ThreeDGridQubit {
    fn cmp(&self, other: &Self) -> Ordering {
        let (ax, ay, az) = self.comparison_key();
        let (bx, by, bz) = other.comparison_key();
        ax.total_cmp(&bx)
            .then_with(|| ay.total_cmp(&by))
            .then_with(|| az.total_cmp(&bz))
    }
}

impl Hash for ThreeDGridQubit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (x, y, z) = self.comparison_key();
        x.to_bits().hash(state);
        y.to_bits().hash(state);
        z.to_bits().hash(state);
    }
}

impl fmt::Debug for ThreeDGridQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ThreeDGridQubit::new({:?}, {:?}, {:?})",
            self.x, self.y, self.z
        )
    }
}

impl fmt::Display for ThreeDGridQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Numeric types accepted as components of a coordinate offset.
pub trait Offset: Copy {
    /// The component as an axis value.
    fn to_axis(self) -> f64;
}

macro_rules! impl_offset {
    ($($t:ty),*) => {
        $(
            impl Offset for $t {
                #[inline]
                fn to_axis(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_offset!(f64, f32, i64, i32, u32);

impl<T: Offset> Add<(T, T, T)> for ThreeDGridQubit {
    type Output = ThreeDGridQubit;

    fn add(self, (dx, dy, dz): (T, T, T)) -> Self::Output {
        self.offset(dx.to_axis(), dy.to_axis(), dz.to_axis())
    }
}

impl<T: Offset> Sub<(T, T, T)> for ThreeDGridQubit {
    type Output = ThreeDGridQubit;

    fn sub(self, (dx, dy, dz): (T, T, T)) -> Self::Output {
        self.offset(-dx.to_axis(), -dy.to_axis(), -dz.to_axis())
    }
}

macro_rules! impl_tuple_lhs {
    ($($t:ty),*) => {
        $(
            impl Add<ThreeDGridQubit> for ($t, $t, $t) {
                type Output = ThreeDGridQubit;

                fn add(self, qubit: ThreeDGridQubit) -> Self::Output {
                    qubit + self
                }
            }

            impl Sub<ThreeDGridQubit> for ($t, $t, $t) {
                type Output = ThreeDGridQubit;

                fn sub(self, qubit: ThreeDGridQubit) -> Self::Output {
                    -qubit + self
                }
            }
        )*
    };
}

impl_tuple_lhs!(f64, i64);

impl Neg for ThreeDGridQubit {
    type Output = ThreeDGridQubit;

    fn neg(self) -> Self::Output {
        ThreeDGridQubit::new(-self.x, -self.y, -self.z)
    }
}

/// A qubit on a line, identified by its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineQubit(pub i64);

impl LineQubit {
    /// Qubits `0..n`.
    pub fn range(n: i64) -> Vec<LineQubit> {
        (0..n).map(LineQubit).collect()
    }
}

impl fmt::Display for LineQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q({})", self.0)
    }
}

/// A qubit identified only by a name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedQubit(pub String);

impl NamedQubit {
    /// Create a named qubit.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for NamedQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Any qubit identity an operation can target.
///
/// Serialized untagged: a grid site is `{"x": .., "y": .., "z": ..}`, a line
/// qubit is an integer and a named qubit is a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Qid {
    /// A site in 3D space.
    Grid(ThreeDGridQubit),
    /// A position on a line.
    Line(LineQubit),
    /// A bare name.
    Named(NamedQubit),
}

impl Qid {
    /// The grid site, if this is one.
    #[inline]
    pub fn as_grid(&self) -> Option<&ThreeDGridQubit> {
        match self {
            Qid::Grid(q) => Some(q),
            _ => None,
        }
    }

    /// Number of levels of the qubit.
    pub fn dimension(&self) -> u32 {
        match self {
            Qid::Grid(q) => q.dimension(),
            Qid::Line(_) | Qid::Named(_) => 2,
        }
    }

    /// Short name of the identity's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Qid::Grid(_) => "ThreeDGridQubit",
            Qid::Line(_) => "LineQubit",
            Qid::Named(_) => "NamedQubit",
        }
    }
}

impl fmt::Display for Qid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qid::Grid(q) => write!(f, "{q}"),
            Qid::Line(q) => write!(f, "{q}"),
            Qid::Named(q) => write!(f, "{q}"),
        }
    }
}

impl From<ThreeDGridQubit> for Qid {
    fn from(q: ThreeDGridQubit) -> Self {
        Qid::Grid(q)
    }
}

impl From<&ThreeDGridQubit> for Qid {
    fn from(q: &ThreeDGridQubit) -> Self {
        Qid::Grid(*q)
    }
}

impl From<LineQubit> for Qid {
    fn from(q: LineQubit) -> Self {
        Qid::Line(q)
    }
}

impl From<NamedQubit> for Qid {
    fn from(q: NamedQubit) -> Self {
        Qid::Named(q)
    }
}
