/*!
Group weighted points in the plane into a requested number of
[clusters](https://en.wikipedia.org/wiki/Cluster_analysis).

Each input point (for example a county) has an identifier, a position, a weight (for example its
population) and a scalar attribute (for example a risk score). A [`Cluster`] aggregates any number
of such points: its position and attribute are always the weight-averaged values of its members.

Two strategies reduce a list of clusters to a target size:
- [`hierarchical_clustering`] repeatedly merges the closest pair of clusters, found with the
  divide-and-conquer search [`closest_pair_fast`].
- [`kmeans_clustering`] runs a fixed number of Lloyd-iterations, seeded with the heaviest clusters.

The quality of a result can be compared with [`total_distortion`].

# Example

```
use planar_clustering::{hierarchical_clustering, singletons, total_distortion, Row};

let rows = vec![
    Row::new("a", 0.0, 0.0, 1.0, 0.5),
    Row::new("b", 1.0, 0.0, 1.0, 0.5),
    Row::new("c", 0.0, 1.0, 1.0, 0.5),
    Row::new("d", 10.0, 10.0, 1.0, 0.5),
];
let clusters = singletons(&rows);

let clustering = hierarchical_clustering(&clusters, 2).unwrap();
assert_eq!(clustering.len(), 2);

// The lone far-away point keeps its own cluster.
assert!(clustering.iter().any(|cluster| cluster.len() == 1 && cluster.members().contains("d")));
assert!(total_distortion(&clustering, &rows).unwrap() > 0.0);
```
*/

#![expect(
    clippy::missing_errors_doc,
    reason = "The Error-Enum is sparse and documented."
)]

use core::hash::Hash;
use core::{cmp, fmt};
use itertools::Itertools as _;
use rustc_hash::{FxHashMap, FxHashSet};

/// One original data point, as handed over by whatever loads the data.
#[derive(Clone, Debug, PartialEq)]
pub struct Row<I> {
    /// An opaque identifier, unique among all rows.
    pub id: I,
    /// The horizontal coordinate.
    pub x: f64,
    /// The vertical coordinate.
    pub y: f64,
    /// A non-negative weight, usually a population.
    pub weight: f64,
    /// A scalar that gets weight-averaged when points are merged.
    pub attribute: f64,
}
impl<I> Row<I> {
    /// Create a new row.
    #[inline]
    pub const fn new(id: I, x: f64, y: f64, weight: f64, attribute: f64) -> Self {
        Self {
            id,
            x,
            y,
            weight,
            attribute,
        }
    }
}

/// A set of original points, merged together.
///
/// The position and attribute are the weighted averages of the members' positions and attributes,
/// and the weight is the sum of the members' weights. These are updated incrementally on every
/// [`merge`](Cluster::merge) and never recomputed from the members.
///
/// A cluster without members is an "empty group". It has weight `0` and no meaningful position.
/// It only arises from [`Cluster::empty`] or from a k-means center nobody was assigned to.
#[derive(Clone, Debug)]
pub struct Cluster<I> {
    /// The identifiers of all original points in this cluster.
    members: FxHashSet<I>,
    /// Weighted horizontal center.
    x: f64,
    /// Weighted vertical center.
    y: f64,
    /// The sum of all members' weights.
    weight: f64,
    /// Weighted average of all members' attributes.
    attribute: f64,
}

impl<I: Clone + Eq + Hash> Cluster<I> {
    /// Create a cluster containing a single point.
    ///
    /// # Examples
    ///
    /// ```
    /// use planar_clustering::Cluster;
    ///
    /// let cluster = Cluster::singleton("06037", -118.2, 34.1, 9_800_000.0, 5.8e-5);
    /// assert_eq!(cluster.len(), 1);
    /// assert_eq!(cluster.position(), (-118.2, 34.1));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(id: I, x: f64, y: f64, weight: f64, attribute: f64) -> Self {
        let mut members = FxHashSet::default();
        members.insert(id);
        Self {
            members,
            x,
            y,
            weight,
            attribute,
        }
    }

    /// Create the singleton cluster for an input row.
    #[inline]
    #[must_use]
    pub fn from_row(row: &Row<I>) -> Self {
        Self::singleton(row.id.clone(), row.x, row.y, row.weight, row.attribute)
    }

    /// Create an empty group: no members, weight `0`.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            members: FxHashSet::default(),
            x: 0.0,
            y: 0.0,
            weight: 0.0,
            attribute: 0.0,
        }
    }

    /// The identifiers of all original points in this cluster.
    #[inline]
    #[must_use]
    pub const fn members(&self) -> &FxHashSet<I> {
        &self.members
    }

    /// The number of original points in this cluster.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check whether this is an empty group.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The weighted center as `(horizontal, vertical)`.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// The total weight of all members.
    #[inline]
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// The weighted average attribute of all members.
    #[inline]
    #[must_use]
    pub const fn attribute(&self) -> f64 {
        self.attribute
    }

    /// The Euclidean distance between the centers of two clusters.
    ///
    /// Empty groups have no center, so asking for their distance is an [`Error::NoPosition`].
    ///
    /// # Examples
    ///
    /// ```
    /// use planar_clustering::Cluster;
    ///
    /// let a = Cluster::singleton(0, 0.0, 0.0, 1.0, 0.0);
    /// let b = Cluster::singleton(1, 3.0, 4.0, 1.0, 0.0);
    /// assert_eq!(a.distance(&b), Ok(5.0));
    /// assert!(a.distance(&Cluster::empty()).is_err());
    /// ```
    #[inline]
    pub fn distance(&self, other: &Self) -> Result<f64, Error> {
        if self.is_empty() || other.is_empty() {
            return Err(Error::NoPosition);
        }
        Ok(self.gap(other))
    }

    /// The distance between the centers, without checking for empty groups.
    #[inline]
    fn gap(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Merge `other` into `self`, returning `self`.
    ///
    /// The members are united and the weights added. The position and attribute become the
    /// weighted average of both clusters' previous values. If both weights are zero, the plain
    /// average is used instead.
    ///
    /// Merging an empty group changes nothing. Merging into an empty group turns `self` into a
    /// copy of `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use planar_clustering::Cluster;
    ///
    /// let mut a = Cluster::singleton("a", 0.0, 0.0, 3.0, 1.0);
    /// a.merge(&Cluster::singleton("b", 4.0, 0.0, 1.0, 5.0));
    ///
    /// assert_eq!(a.len(), 2);
    /// assert_eq!(a.weight(), 4.0);
    /// assert_eq!(a.position(), (1.0, 0.0));
    /// assert_eq!(a.attribute(), 2.0);
    /// ```
    #[inline]
    pub fn merge(&mut self, other: &Self) -> &mut Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            self.clone_from(other);
            return self;
        }
        debug_assert!(
            self.members.is_disjoint(&other.members),
            "Throughout the entire implementation, we should never be merging intersecting clusters."
        );
        self.members.extend(other.members.iter().cloned());

        let total_weight = self.weight + other.weight;
        let (self_share, other_share) = if total_weight > 0.0 {
            (self.weight / total_weight, other.weight / total_weight)
        } else {
            (0.5, 0.5)
        };
        self.x = self_share * self.x + other_share * other.x;
        self.y = self_share * self.y + other_share * other.y;
        self.attribute = self_share * self.attribute + other_share * other.attribute;
        self.weight = total_weight;
        self
    }

    /// The distortion of this cluster: the sum over all members of their weight times their
    /// squared distance to this cluster's center.
    ///
    /// `rows` must be the table the members were originally built from.
    ///
    /// # Examples
    ///
    /// ```
    /// use planar_clustering::{Cluster, Row};
    ///
    /// let rows = [Row::new(1, 0.0, 0.0, 2.0, 0.0), Row::new(2, 2.0, 0.0, 2.0, 0.0)];
    /// let mut cluster = Cluster::from_row(&rows[0]);
    /// cluster.merge(&Cluster::from_row(&rows[1]));
    ///
    /// // Both points are at distance 1 from the center (1, 0).
    /// assert_eq!(cluster.error(&rows), Ok(4.0));
    /// ```
    #[inline]
    pub fn error(&self, rows: &[Row<I>]) -> Result<f64, Error> {
        self.error_with(&row_lookup(rows)?)
    }

    /// Like [`Cluster::error`], but with a prepared lookup-table.
    fn error_with(&self, lookup: &FxHashMap<&I, &Row<I>>) -> Result<f64, Error> {
        self.members.iter().try_fold(0.0, |total, id| {
            let row = lookup.get(id).ok_or(Error::UnknownMember)?;
            let point = Self::from_row(row);
            Ok(total + self.gap(&point).powi(2) * point.weight)
        })
    }
}

impl<I> fmt::Display for Cluster<I> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} point(s) at ({:.4}, {:.4}), weight {}, attribute {:.3e}",
            self.members.len(),
            self.x,
            self.y,
            self.weight,
            self.attribute
        )
    }
}

/// Create one singleton cluster per row.
#[inline]
pub fn singletons<I: Clone + Eq + Hash>(rows: &[Row<I>]) -> Vec<Cluster<I>> {
    rows.iter().map(Cluster::from_row).collect()
}

/// The result of a closest-pair search.
///
/// Results are ordered by distance first and by their indices second, with "no pair" ordered before
/// any actual pair. Taking the [`min`](cmp::min) of two results therefore keeps the earlier one on
/// exact ties, which keeps every search deterministic.
#[derive(Clone, Copy, Debug)]
pub struct ClosestPair {
    /// The distance between the two clusters, or `+∞` if there is no pair.
    distance: f64,
    /// The indices of the two clusters, smaller index first.
    pair: Option<(usize, usize)>,
}
impl ClosestPair {
    /// The result for a list that doesn't contain any pair.
    pub const NONE: Self = Self {
        distance: f64::INFINITY,
        pair: None,
    };

    /// Create a result for the clusters at indices `a` and `b`, in either order.
    #[inline]
    const fn new(distance: f64, a: usize, b: usize) -> Self {
        let pair = if a < b { (a, b) } else { (b, a) };
        Self {
            distance,
            pair: Some(pair),
        }
    }

    /// The distance between the two clusters, or `+∞` if no pair was found.
    #[inline]
    #[must_use]
    pub const fn distance(self) -> f64 {
        self.distance
    }

    /// The indices `(i, j)` with `i < j`, or `None` if no pair was found.
    #[inline]
    #[must_use]
    pub const fn indices(self) -> Option<(usize, usize)> {
        self.pair
    }

    /// Shift both indices by `offset`, for results found in a sub-slice.
    #[inline]
    fn shifted(self, offset: usize) -> Self {
        Self {
            distance: self.distance,
            pair: self.pair.map(|(i, j)| (i + offset, j + offset)),
        }
    }
}
impl PartialEq for ClosestPair {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == cmp::Ordering::Equal
    }
}
impl Eq for ClosestPair {} // `total_cmp` makes this a total order.
impl Ord for ClosestPair {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.pair.cmp(&other.pair))
    }
}
impl PartialOrd for ClosestPair {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the closest pair of clusters by comparing all pairs.
///
/// On ties, the first pair in the order `(0, 1), (0, 2), …, (1, 2), …` wins. Empty groups are
/// skipped. Returns [`ClosestPair::NONE`] if fewer than two clusters have members.
///
/// # Examples
///
/// ```
/// use planar_clustering::{closest_pair_brute, Cluster};
///
/// let clusters = [
///     Cluster::singleton(0, 0.0, 0.0, 1.0, 0.0),
///     Cluster::singleton(1, 5.0, 0.0, 1.0, 0.0),
///     Cluster::singleton(2, 1.0, 0.0, 1.0, 0.0),
/// ];
/// let closest = closest_pair_brute(&clusters).unwrap();
/// assert_eq!(closest.distance(), 1.0);
/// assert_eq!(closest.indices(), Some((0, 2)));
/// ```
#[inline]
pub fn closest_pair_brute<I: Clone + Eq + Hash>(
    clusters: &[Cluster<I>],
) -> Result<ClosestPair, Error> {
    verify_clusters(clusters)?;
    Ok(scan_all_pairs(clusters))
}

/// Find the closest pair of clusters in `O(n log n)` by divide-and-conquer.
///
/// This sorts `clusters` by their horizontal position first, with empty groups moved to the end,
/// and the returned indices refer to that sorted order. The resulting distance always equals the
/// one of [`closest_pair_brute`].
///
/// # Examples
///
/// ```
/// use planar_clustering::{closest_pair_fast, Cluster};
///
/// let mut clusters = vec![
///     Cluster::singleton("far", 9.0, 9.0, 1.0, 0.0),
///     Cluster::singleton("b", 1.0, 0.0, 1.0, 0.0),
///     Cluster::singleton("mid", 4.0, 4.0, 1.0, 0.0),
///     Cluster::singleton("a", 0.0, 0.0, 1.0, 0.0),
/// ];
/// let closest = closest_pair_fast(&mut clusters).unwrap();
/// assert_eq!(closest.distance(), 1.0);
/// assert_eq!(closest.indices(), Some((0, 1)));
/// assert!(clusters[0].members().contains("a"));
/// ```
#[inline]
pub fn closest_pair_fast<I: Clone + Eq + Hash>(
    clusters: &mut [Cluster<I>],
) -> Result<ClosestPair, Error> {
    verify_clusters(clusters)?;
    sort_horizontally(clusters);
    Ok(divide_and_conquer(located(clusters)))
}

/// Find the closest pair among the clusters whose horizontal position lies strictly within
/// `half_width` of `mid_x`. Empty groups are skipped.
///
/// Only the next three clusters in vertical order are compared with each cluster, so this finds the
/// closest pair within the strip only if that pair is closer than `half_width`. Returns
/// [`ClosestPair::NONE`] if the strip contains fewer than two clusters.
#[inline]
pub fn closest_pair_strip<I: Clone + Eq + Hash>(
    clusters: &[Cluster<I>],
    mid_x: f64,
    half_width: f64,
) -> Result<ClosestPair, Error> {
    verify_clusters(clusters)?;
    Ok(scan_strip(clusters, mid_x, half_width))
}

/// Sort clusters by ascending horizontal position, keeping the order of equal positions.
///
/// Empty groups have no position and go last.
fn sort_horizontally<I>(clusters: &mut [Cluster<I>]) {
    clusters.sort_by(|a, b| {
        a.members
            .is_empty()
            .cmp(&b.members.is_empty())
            .then_with(|| a.x.total_cmp(&b.x))
    });
}

/// The leading clusters with members, of a list sorted by [`sort_horizontally`].
fn located<I>(clusters: &[Cluster<I>]) -> &[Cluster<I>] {
    let count = clusters
        .iter()
        .take_while(|cluster| !cluster.members.is_empty())
        .count();
    clusters.split_at(count).0
}

/// Compare all pairs of non-empty clusters, keeping the first strictly-closest one.
fn scan_all_pairs<I: Clone + Eq + Hash>(clusters: &[Cluster<I>]) -> ClosestPair {
    let mut closest = ClosestPair::NONE;
    for ((i, a), (j, b)) in clusters
        .iter()
        .enumerate()
        .filter(|(_, cluster)| !cluster.is_empty())
        .tuple_combinations()
    {
        let distance = a.gap(b);
        if distance < closest.distance {
            closest = ClosestPair::new(distance, i, j);
        }
    }
    closest
}

/// The recursive step of [`closest_pair_fast`]. `clusters` must be sorted horizontally and
/// contain no empty groups.
fn divide_and_conquer<I: Clone + Eq + Hash>(clusters: &[Cluster<I>]) -> ClosestPair {
    if clusters.len() <= 3 {
        return scan_all_pairs(clusters);
    }
    #[expect(
        clippy::integer_division,
        reason = "The left half should get the smaller half."
    )]
    let mid = clusters.len() / 2;
    let (left, right) = clusters.split_at(mid);

    // The left result comes first, so it wins ties.
    let closest = cmp::min(divide_and_conquer(left), divide_and_conquer(right).shifted(mid));

    let (Some(rightmost_left), Some(leftmost_right)) = (left.last(), right.first()) else {
        return closest;
    };
    let mid_x = (rightmost_left.x + leftmost_right.x) / 2.0;
    cmp::min(closest, scan_strip(clusters, mid_x, closest.distance))
}

/// The strip-search of [`closest_pair_strip`], without validation.
fn scan_strip<I: Clone + Eq + Hash>(
    clusters: &[Cluster<I>],
    mid_x: f64,
    half_width: f64,
) -> ClosestPair {
    let mut strip: Vec<(usize, &Cluster<I>)> = clusters
        .iter()
        .enumerate()
        .filter(|(_, cluster)| !cluster.is_empty() && (cluster.x - mid_x).abs() < half_width)
        .collect();
    strip.sort_by(|(_, a), (_, b)| a.y.total_cmp(&b.y));

    let mut closest = ClosestPair::NONE;
    for (u, (i, a)) in strip.iter().enumerate() {
        // Any pair in the strip closer than `half_width` is at most 3 apart in vertical order.
        for (j, b) in strip.iter().skip(u + 1).take(3) {
            let distance = a.gap(b);
            if distance < closest.distance {
                closest = ClosestPair::new(distance, *i, *j);
            }
        }
    }
    closest
}

/// Merge the closest pair of clusters until only `target_count` clusters remain.
///
/// The input is not modified. If `target_count` is at least the number of clusters, an unchanged
/// copy is returned.
///
/// Empty groups (as left by [`kmeans_clustering`]) take no part in the distance comparisons. Once
/// fewer than two clusters with members remain, empty groups are dropped until `target_count` is
/// reached.
///
/// # Examples
///
/// ```
/// use planar_clustering::{hierarchical_clustering, Cluster};
///
/// let clusters: Vec<Cluster<u32>> = (0..10)
///     .map(|i| Cluster::singleton(i, f64::from(i % 2) * 100.0, f64::from(i), 1.0, 0.0))
///     .collect();
/// let clustering = hierarchical_clustering(&clusters, 2).unwrap();
///
/// assert_eq!(clustering.len(), 2);
/// assert!(clustering.iter().all(|cluster| cluster.len() == 5));
/// ```
#[inline]
pub fn hierarchical_clustering<I: Clone + Eq + Hash>(
    clusters: &[Cluster<I>],
    target_count: usize,
) -> Result<Vec<Cluster<I>>, Error> {
    verify_clusters(clusters)?;
    if target_count == 0 {
        return Err(Error::ZeroTarget);
    }
    log::debug!(
        "hierarchical clustering of {} clusters into {target_count}",
        clusters.len()
    );

    let mut clustering = clusters.to_vec();
    while clustering.len() > target_count {
        sort_horizontally(&mut clustering);
        let closest = divide_and_conquer(located(&clustering));
        let Some((i, j)) = closest.indices() else {
            // At most one cluster has members, so the last one is an empty group.
            clustering.pop();
            log::trace!("dropped an empty group");
            continue;
        };

        // `i < j`, so removing `j` first leaves `i` in place.
        let absorbed = clustering.remove(j);
        let mut merged = clustering.remove(i);
        merged.merge(&absorbed);
        log::trace!(
            "merged clusters at distance {:.4} into {merged}",
            closest.distance()
        );
        clustering.push(merged);
    }
    Ok(clustering)
}

/// Run `iterations` rounds of Lloyd's algorithm, seeded with the `k` heaviest clusters.
///
/// In every round, each input cluster is assigned to its nearest center, and all clusters assigned
/// to the same center are merged into a group. The groups become the centers of the next round.
/// The groups of the last round are returned, in center order. A group nobody was assigned to is
/// returned as an [empty group](Cluster::empty) and is skipped as a center afterwards.
///
/// The heaviest clusters come first, with equal weights keeping their input order. On equal
/// distances, the center with the lowest index wins. Empty groups in the input are neither seeds
/// nor assigned, and don't count towards the available clusters. The input is not modified.
///
/// # Examples
///
/// ```
/// use planar_clustering::{kmeans_clustering, Cluster};
///
/// let clusters = [
///     Cluster::singleton("a", 0.0, 0.0, 10.0, 0.0),
///     Cluster::singleton("b", 1.0, 0.0, 1.0, 0.0),
///     Cluster::singleton("c", 9.0, 0.0, 1.0, 0.0),
///     Cluster::singleton("d", 10.0, 0.0, 5.0, 0.0),
/// ];
/// let groups = kmeans_clustering(&clusters, 2, 3).unwrap();
///
/// assert_eq!(groups.len(), 2);
/// assert!(groups[0].members().contains("a") && groups[0].members().contains("b"));
/// assert!(groups[1].members().contains("c") && groups[1].members().contains("d"));
/// ```
#[inline]
pub fn kmeans_clustering<I: Clone + Eq + Hash>(
    clusters: &[Cluster<I>],
    k: usize,
    iterations: usize,
) -> Result<Vec<Cluster<I>>, Error> {
    verify_clusters(clusters)?;
    let mut by_weight: Vec<&Cluster<I>> = clusters
        .iter()
        .filter(|cluster| !cluster.is_empty())
        .collect();
    if k == 0 || k > by_weight.len() {
        return Err(Error::BadCenterCount {
            k,
            available: by_weight.len(),
        });
    }
    if iterations == 0 {
        return Err(Error::ZeroIterations);
    }
    log::debug!(
        "k-means clustering of {} clusters into {k} over {iterations} iterations",
        clusters.len()
    );

    by_weight.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    let mut centers: Vec<Cluster<I>> = by_weight.into_iter().take(k).cloned().collect();

    let mut groups = assign_to_centers(clusters, &centers);
    for round in 1..iterations {
        log::trace!(
            "k-means round {round}: {} empty group(s)",
            groups.iter().filter(|group| group.is_empty()).count()
        );
        centers = groups;
        groups = assign_to_centers(clusters, &centers);
    }
    Ok(groups)
}

/// Merge every cluster into the group of its nearest center.
fn assign_to_centers<I: Clone + Eq + Hash>(
    clusters: &[Cluster<I>],
    centers: &[Cluster<I>],
) -> Vec<Cluster<I>> {
    let mut groups = vec![Cluster::empty(); centers.len()];
    for cluster in clusters.iter().filter(|cluster| !cluster.is_empty()) {
        let nearest = nearest_center(cluster, centers)
            .expect("At least one center should be non-empty after validated input.");
        if let Some(group) = groups.get_mut(nearest) {
            group.merge(cluster);
        }
    }
    groups
}

/// The index of the nearest non-empty center, the lowest index winning ties.
fn nearest_center<I: Clone + Eq + Hash>(
    cluster: &Cluster<I>,
    centers: &[Cluster<I>],
) -> Option<usize> {
    centers
        .iter()
        .enumerate()
        .filter(|(_, center)| !center.is_empty())
        .map(|(ix, center)| (ix, cluster.gap(center)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(ix, _)| ix)
}

/// The sum of the [errors](Cluster::error) of all clusters.
///
/// This is the weighted sum of squared distances from every original point to the center of its
/// cluster. Lower is better.
#[inline]
pub fn total_distortion<I: Clone + Eq + Hash>(
    clusters: &[Cluster<I>],
    rows: &[Row<I>],
) -> Result<f64, Error> {
    let lookup = row_lookup(rows)?;
    clusters
        .iter()
        .try_fold(0.0, |total, cluster| Ok(total + cluster.error_with(&lookup)?))
}

/// Index rows by their identifier.
fn row_lookup<I: Clone + Eq + Hash>(rows: &[Row<I>]) -> Result<FxHashMap<&I, &Row<I>>, Error> {
    if rows.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(rows.iter().map(|row| (&row.id, row)).collect())
}

/// An error-type for invalid arguments to the clustering-operations.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[expect(
    clippy::exhaustive_enums,
    reason = "Extending this enum should be a breaking change."
)]
pub enum Error {
    /// No clusters or rows were supplied.
    EmptyInput,
    /// A cluster's (specified by its index in the input) weight is negative or non-finite.
    BadWeight(usize),
    /// A cluster's (specified by its index in the input) position is non-finite.
    BadPosition(usize),
    /// A distance was requested to an empty group, which has no position.
    NoPosition,
    /// The number of k-means centers is zero or exceeds the number of non-empty clusters.
    BadCenterCount {
        /// The requested number of centers.
        k: usize,
        /// The number of non-empty clusters supplied.
        available: usize,
    },
    /// Hierarchical clustering was asked for zero clusters.
    ZeroTarget,
    /// K-means clustering was asked to run zero iterations.
    ZeroIterations,
    /// A cluster contains an identifier that doesn't appear in the supplied rows.
    UnknownMember,
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Self::EmptyInput => "no clusters supplied".to_owned(),
            Self::BadWeight(ix) => {
                format!("cluster {ix} doesn't have a finite and non-negative weight")
            }
            Self::BadPosition(ix) => format!("cluster {ix} doesn't have a finite position"),
            Self::NoPosition => "an empty group has no position".to_owned(),
            Self::BadCenterCount { k, available } => {
                format!("can't choose {k} centers from {available} clusters")
            }
            Self::ZeroTarget => "can't cluster into zero clusters".to_owned(),
            Self::ZeroIterations => "k-means needs at least one iteration".to_owned(),
            Self::UnknownMember => "a cluster member doesn't appear in the rows".to_owned(),
        };
        f.write_str(&msg)
    }
}

#[expect(
    clippy::absolute_paths,
    reason = "Not worth bringing into scope for one use."
)]
impl core::error::Error for Error {}

/// Check whether a list of clusters is valid for clustering.
///
/// Empty groups are valid: they have weight `0` and are skipped wherever positions are compared.
fn verify_clusters<I: Clone + Eq + Hash>(clusters: &[Cluster<I>]) -> Result<(), Error> {
    if clusters.is_empty() {
        return Err(Error::EmptyInput);
    }
    if let Some(ix) = clusters
        .iter()
        .position(|cluster| !cluster.weight.is_finite() || cluster.weight < 0.0)
    {
        return Err(Error::BadWeight(ix));
    }
    if let Some(ix) = clusters
        .iter()
        .position(|cluster| !cluster.x.is_finite() || !cluster.y.is_finite())
    {
        return Err(Error::BadPosition(ix));
    }
    Ok(())
}
