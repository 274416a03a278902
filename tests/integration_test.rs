#![allow(missing_docs, reason = "Docs aren't necessary for tests.")]
#![allow(
    clippy::tests_outside_test_module,
    reason = "This is an integration-test. This is a false-positive by clippy, see https://github.com/rust-lang/rust-clippy/issues/11024"
)]

use itertools::Itertools as _;
use planar_clustering::*;
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};
use rustc_hash::FxHashSet;

fn four_points() -> Vec<Row<&'static str>> {
    // Looks like this:
    //
    //                  .
    //
    //  :.
    //
    vec![
        Row::new("origin", 0.0, 0.0, 1.0, 1.0),
        Row::new("east", 1.0, 0.0, 1.0, 2.0),
        Row::new("north", 0.0, 1.0, 1.0, 3.0),
        Row::new("far", 10.0, 10.0, 1.0, 4.0),
    ]
}

fn random_rows(seed: u64, count: usize) -> Vec<Row<String>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|ix| {
            Row::new(
                format!("{ix:05}"),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(1.0..100_000.0),
                rng.gen_range(0.0..1e-4),
            )
        })
        .collect()
}

/// Four tight blobs in the corners of a square, with `per_blob` points each.
fn blobs(per_blob: usize) -> Vec<Row<usize>> {
    let corners = [(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)];
    let mut rng = StdRng::seed_from_u64(4);
    corners
        .iter()
        .flat_map(|corner| std::iter::repeat(*corner).take(per_blob))
        .enumerate()
        .map(|(ix, (x, y))| {
            Row::new(
                ix,
                x + rng.gen_range(-1.0..1.0),
                y + rng.gen_range(-1.0..1.0),
                // The first point of every blob is by far the heaviest.
                if ix % per_blob == 0 {
                    100.0
                } else {
                    rng.gen_range(1.0..10.0)
                },
                0.0,
            )
        })
        .collect()
}

/// Check that the non-empty clusters partition the identifiers of `rows`.
fn assert_partition<I: Clone + Eq + core::hash::Hash + core::fmt::Debug>(
    clusters: &[Cluster<I>],
    rows: &[Row<I>],
) {
    let mut seen = FxHashSet::default();
    for member in clusters.iter().flat_map(|cluster| cluster.members().iter()) {
        assert!(seen.insert(member.clone()), "{member:?} appears twice.");
    }
    let expected: FxHashSet<I> = rows.iter().map(|row| row.id.clone()).collect();
    assert_eq!(seen, expected, "Clusters should cover every row exactly once.");
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
#[expect(clippy::float_cmp, reason = "These values should be exact.")]
fn closest_pair_scenario() {
    let rows = four_points();
    let mut clusters = singletons(&rows);

    let brute = closest_pair_brute(&clusters).expect("Clusters are valid.");
    assert_eq!(brute.distance(), 1.0);
    assert_eq!(brute.indices(), Some((0, 1)));

    let fast = closest_pair_fast(&mut clusters).expect("Clusters are valid.");
    assert_eq!(fast.distance(), 1.0);
    let (i, j) = fast.indices().expect("There are four clusters.");
    assert!(i < j);
    for ix in [i, j] {
        assert!(
            !clusters[ix].members().contains("far"),
            "The far point should never be part of the closest pair."
        );
    }
    assert!(clusters[i].members().contains("origin"));
}

#[test]
#[expect(clippy::float_cmp, reason = "These values should be exact.")]
fn fast_agrees_with_brute_on_random_clusters() {
    for (seed, count) in (0..20).cartesian_product([2, 3, 4, 5, 17, 64, 300]) {
        let rows = random_rows(seed, count);
        let mut clusters = singletons(&rows);
        let brute = closest_pair_brute(&clusters).expect("Clusters are valid.");
        let fast = closest_pair_fast(&mut clusters).expect("Clusters are valid.");
        assert!(
            approx_eq(brute.distance(), fast.distance()),
            "Seed {seed}, {count} clusters: brute-force found {brute:?}, divide-and-conquer found {fast:?}."
        );
        let (i, j) = fast.indices().expect("There are at least two clusters.");
        assert!(i < j && j < count);
        assert_eq!(
            clusters[i]
                .distance(&clusters[j])
                .expect("Clusters are non-empty."),
            fast.distance()
        );
    }
}

#[test]
#[expect(clippy::float_cmp, reason = "These values should be exact.")]
fn fast_agrees_with_brute_on_grids() {
    // Many exact ties in both coordinates.
    let mut clusters: Vec<Cluster<(u32, u32)>> = (0..7)
        .cartesian_product(0..9)
        .map(|(x, y)| Cluster::singleton((x, y), f64::from(x), f64::from(y) * 1.5, 1.0, 0.0))
        .collect();
    let brute = closest_pair_brute(&clusters).expect("Clusters are valid.");
    let fast = closest_pair_fast(&mut clusters).expect("Clusters are valid.");
    assert_eq!(brute.distance(), 1.0);
    assert_eq!(fast.distance(), 1.0);
}

#[test]
fn closest_pair_rejects_invalid_input() {
    assert_eq!(
        closest_pair_brute::<usize>(&[]).map(ClosestPair::distance),
        Err(Error::EmptyInput)
    );
    assert_eq!(
        closest_pair_fast::<usize>(&mut []).map(ClosestPair::distance),
        Err(Error::EmptyInput)
    );
    assert_eq!(
        closest_pair_brute(&[Cluster::singleton(0, f64::NAN, 0.0, 1.0, 0.0)])
            .map(ClosestPair::distance),
        Err(Error::BadPosition(0))
    );
}

#[test]
#[expect(clippy::float_cmp, reason = "These values should be exact.")]
fn closest_pair_strip_scenario() {
    let clusters = singletons(&four_points());
    // Only "origin" and "north" are strictly within 0.5 of the line x = 0.
    let closest = closest_pair_strip(&clusters, 0.0, 0.5).expect("Clusters are valid.");
    assert_eq!(closest.indices(), Some((0, 2)));
    assert_eq!(closest.distance(), 1.0);

    let nothing = closest_pair_strip(&clusters, 5.0, 1.0).expect("Clusters are valid.");
    assert_eq!(nothing.indices(), None);
    assert_eq!(nothing.distance(), f64::INFINITY);
}

#[test]
fn hierarchical_scenario() {
    let rows = four_points();
    let clusters = singletons(&rows);

    let clustering = hierarchical_clustering(&clusters, 1).expect("Arguments are valid.");
    assert_eq!(clustering.len(), 1);
    let cluster = &clustering[0];
    assert!(approx_eq(cluster.weight(), 4.0));
    let (x, y) = cluster.position();
    assert!(approx_eq(x, 2.75) && approx_eq(y, 2.75), "Got ({x}, {y}).");
    assert!(approx_eq(cluster.attribute(), 2.5));
    assert_partition(&clustering, &rows);

    // The input is left alone.
    assert!(clusters.iter().all(|cluster| cluster.len() == 1));
    assert_eq!(
        clusters
            .iter()
            .map(|cluster| cluster.position())
            .collect_vec(),
        rows.iter().map(|row| (row.x, row.y)).collect_vec()
    );
}

#[test]
fn hierarchical_target_at_least_input() {
    let rows = four_points();
    let clusters = singletons(&rows);
    for target in [4, 5, 100] {
        let clustering = hierarchical_clustering(&clusters, target).expect("Arguments are valid.");
        assert_eq!(clustering.len(), 4);
        assert_eq!(
            clustering
                .iter()
                .map(|cluster| cluster.position())
                .collect_vec(),
            clusters
                .iter()
                .map(|cluster| cluster.position())
                .collect_vec()
        );
    }
}

#[test]
fn hierarchical_sizes_and_partitions() {
    let rows = random_rows(7, 60);
    let clusters = singletons(&rows);
    let total_weight: f64 = rows.iter().map(|row| row.weight).sum();
    for target in [1, 2, 5, 17, 59, 60] {
        let clustering = hierarchical_clustering(&clusters, target).expect("Arguments are valid.");
        assert_eq!(clustering.len(), target);
        assert_partition(&clustering, &rows);
        let weight: f64 = clustering.iter().map(Cluster::weight).sum();
        assert!(approx_eq(weight, total_weight));
    }
}

#[test]
fn hierarchical_finds_blobs() {
    let rows = blobs(8);
    let clustering =
        hierarchical_clustering(&singletons(&rows), 4).expect("Arguments are valid.");
    let blobs: FxHashSet<Vec<usize>> = clustering
        .iter()
        .map(|cluster| cluster.members().iter().copied().sorted().collect_vec())
        .collect();
    let expected: FxHashSet<Vec<usize>> = (0..4)
        .map(|blob| (blob * 8..(blob + 1) * 8).collect_vec())
        .collect();
    assert_eq!(blobs, expected);
}

#[test]
#[expect(clippy::float_cmp, reason = "These values should be exact.")]
fn kmeans_with_one_center_per_cluster() {
    let rows = random_rows(3, 25);
    let clusters = singletons(&rows);
    for iterations in [1, 2, 10] {
        let groups = kmeans_clustering(&clusters, clusters.len(), iterations)
            .expect("Arguments are valid.");
        assert_eq!(groups.len(), clusters.len());
        assert!(groups.iter().all(|group| group.len() == 1));
        assert_partition(&groups, &rows);
        for group in &groups {
            let id = group.members().iter().next().expect("Groups are singletons.");
            let row = rows.iter().find(|row| &row.id == id).expect("Member exists.");
            assert_eq!(group.position(), (row.x, row.y));
            assert_eq!(group.weight(), row.weight);
        }
        assert_eq!(total_distortion(&groups, &rows), Ok(0.0));
    }
}

#[test]
fn kmeans_sizes_and_partitions() {
    let rows = random_rows(11, 80);
    let clusters = singletons(&rows);
    for (k, iterations) in [1, 3, 9, 40].into_iter().cartesian_product([1, 5]) {
        let groups = kmeans_clustering(&clusters, k, iterations).expect("Arguments are valid.");
        assert_eq!(groups.len(), k);
        assert_partition(&groups, &rows);
    }
    // The input is left alone.
    assert!(clusters.iter().all(|cluster| cluster.len() == 1));
}

#[test]
fn kmeans_seeds_with_heaviest_clusters() {
    let clusters = [
        Cluster::singleton("light", 5.0, 0.0, 1.0, 0.0),
        Cluster::singleton("heavy", 0.0, 0.0, 50.0, 0.0),
        Cluster::singleton("medium", 10.0, 0.0, 20.0, 0.0),
    ];
    // With one iteration, "light" is equally far from both seeds and goes to the heavier one.
    let groups = kmeans_clustering(&clusters, 2, 1).expect("Arguments are valid.");
    assert_eq!(
        groups
            .iter()
            .map(|group| group.members().iter().copied().sorted().collect_vec())
            .collect_vec(),
        vec![vec!["heavy", "light"], vec!["medium"]]
    );
}

#[test]
fn kmeans_keeps_scan_order_among_equal_weights() {
    let sorted_ids = |groups: &[Cluster<&'static str>]| {
        groups
            .iter()
            .map(|group| group.members().iter().copied().sorted().collect_vec())
            .collect_vec()
    };
    let a = Cluster::singleton("a", 0.0, 0.0, 5.0, 0.0);
    let b = Cluster::singleton("b", 10.0, 0.0, 5.0, 0.0);
    let c = Cluster::singleton("c", 9.0, 0.0, 5.0, 0.0);

    // The first two clusters seed the groups, in input order.
    let groups = kmeans_clustering(&[a.clone(), b.clone(), c.clone()], 2, 1)
        .expect("Arguments are valid.");
    assert_eq!(sorted_ids(&groups), vec![vec!["a"], vec!["b", "c"]]);

    let groups = kmeans_clustering(&[c, a, b], 2, 1).expect("Arguments are valid.");
    assert_eq!(sorted_ids(&groups), vec![vec!["a", "c"], vec!["b"]]);
}

#[test]
fn kmeans_output_with_empty_group_can_be_clustered_again() {
    // The two heaviest clusters coincide, so the second seed never wins a cluster.
    let rows = vec![
        Row::new("a", 0.0, 0.0, 10.0, 0.0),
        Row::new("b", 0.0, 0.0, 10.0, 0.0),
        Row::new("c", 5.0, 0.0, 1.0, 0.0),
        Row::new("d", 6.0, 0.0, 2.0, 0.0),
    ];
    let groups = kmeans_clustering(&singletons(&rows), 3, 3).expect("Arguments are valid.");
    assert_eq!(
        groups.iter().map(Cluster::is_empty).collect_vec(),
        vec![false, true, false]
    );
    assert_partition(&groups, &rows);

    let brute = closest_pair_brute(&groups).expect("Empty groups are valid.");
    assert_eq!(brute.indices(), Some((0, 2)));
    assert!(approx_eq(brute.distance(), 17.0 / 3.0));

    let mut sorted = groups.clone();
    let fast = closest_pair_fast(&mut sorted).expect("Empty groups are valid.");
    assert_eq!(fast.indices(), Some((0, 1)));
    assert!(approx_eq(fast.distance(), brute.distance()));
    assert!(sorted[2].is_empty());

    let merged = hierarchical_clustering(&groups, 1).expect("Empty groups are valid.");
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].len(), 4);
    assert!(approx_eq(merged[0].weight(), 23.0));
    assert_partition(&merged, &rows);

    let pair = hierarchical_clustering(&groups, 2).expect("Empty groups are valid.");
    assert_eq!(pair.len(), 2);
    assert_eq!(pair.iter().filter(|cluster| cluster.is_empty()).count(), 1);
    assert_partition(&pair, &rows);

    assert!(total_distortion(&groups, &rows).is_ok());
}

#[test]
fn kmeans_finds_blobs() {
    let rows = blobs(6);
    let groups = kmeans_clustering(&singletons(&rows), 4, 5).expect("Arguments are valid.");
    assert_partition(&groups, &rows);
    // Every blob ends up in exactly one group.
    for group in &groups {
        let blob_ids = group.members().iter().map(|ix| ix / 6).collect::<FxHashSet<_>>();
        assert!(blob_ids.len() <= 1, "A group spans blobs {blob_ids:?}.");
    }
}

#[test]
fn distortion_compares_algorithms() {
    let rows = blobs(10);
    let clusters = singletons(&rows);

    let hierarchical = hierarchical_clustering(&clusters, 4).expect("Arguments are valid.");
    let kmeans = kmeans_clustering(&clusters, 4, 5).expect("Arguments are valid.");
    let hierarchical_distortion =
        total_distortion(&hierarchical, &rows).expect("Rows match clusters.");
    let kmeans_distortion = total_distortion(&kmeans, &rows).expect("Rows match clusters.");

    // Both find the blobs, so both have the same small distortion.
    assert!(approx_eq(hierarchical_distortion, kmeans_distortion));

    // Lumping everything together is much worse.
    let lumped = hierarchical_clustering(&clusters, 1).expect("Arguments are valid.");
    let lumped_distortion = total_distortion(&lumped, &rows).expect("Rows match clusters.");
    assert!(lumped_distortion > 10.0 * hierarchical_distortion);

    // The total is the sum of the errors.
    let summed: f64 = hierarchical
        .iter()
        .map(|cluster| cluster.error(&rows).expect("Rows match clusters."))
        .sum();
    assert!(approx_eq(summed, hierarchical_distortion));
}

#[test]
fn distortion_rejects_foreign_members() {
    let rows = four_points();
    let foreign = [Cluster::singleton("elsewhere", 0.0, 0.0, 1.0, 0.0)];
    assert_eq!(total_distortion(&foreign, &rows), Err(Error::UnknownMember));
    assert_eq!(
        total_distortion(&singletons(&rows), &[]),
        Err(Error::EmptyInput)
    );
}
