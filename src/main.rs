//! Compare the two clustering strategies on random weighted points.
//!
//! `efficiency` times both closest-pair searches, `quality` compares the distortion of
//! hierarchical and k-means clusterings for a range of output sizes.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use ordered_float::OrderedFloat;
use planar_clustering::{
    closest_pair_brute, closest_pair_fast, hierarchical_clustering, kmeans_clustering,
    singletons, total_distortion, Cluster, Row,
};
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};
use rayon::prelude::*;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Compare hierarchical and k-means clustering of weighted points")]
struct Args {
    /// Seed for generating the random points.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time brute-force and divide-and-conquer closest-pair searches.
    Efficiency {
        /// The largest number of clusters to search.
        #[arg(long, default_value_t = 200)]
        max_size: usize,
    },
    /// Compare the distortion of both clusterings for a range of output sizes.
    Quality {
        /// The number of random points to cluster.
        #[arg(long, default_value_t = 111)]
        points: usize,
        /// The largest number of output clusters.
        #[arg(long, default_value_t = 20)]
        most: usize,
        /// The smallest number of output clusters.
        #[arg(long, default_value_t = 6)]
        fewest: usize,
        /// The number of k-means iterations.
        #[arg(long, default_value_t = 5)]
        iterations: usize,
    },
}

/// Rows scattered uniformly over the square with corners `(±1, ±1)`.
fn random_rows(rng: &mut StdRng, count: usize) -> Vec<Row<String>> {
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

/// Print the running time of both closest-pair searches for every list size.
fn efficiency(rng: &mut StdRng, max_size: usize) -> anyhow::Result<()> {
    println!("{:>8}{:>16}{:>16}", "clusters", "brute (µs)", "fast (µs)");
    for size in 2..=max_size {
        let mut clusters: Vec<Cluster<String>> = singletons(&random_rows(rng, size));

        let start = Instant::now();
        let brute = closest_pair_brute(&clusters)?;
        let brute_time = start.elapsed();

        let start = Instant::now();
        let fast = closest_pair_fast(&mut clusters)?;
        let fast_time = start.elapsed();

        anyhow::ensure!(
            (brute.distance() - fast.distance()).abs() <= 1e-12,
            "searches disagree on {size} clusters: {brute:?} vs {fast:?}"
        );
        println!(
            "{size:>8}{:>16}{:>16}",
            brute_time.as_micros(),
            fast_time.as_micros()
        );
    }
    Ok(())
}

/// Print the distortion of both clusterings for every output size from `most` down to `fewest`.
fn quality(
    rng: &mut StdRng,
    points: usize,
    most: usize,
    fewest: usize,
    iterations: usize,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        fewest >= 1 && fewest <= most && most <= points,
        "need 1 ≤ fewest ≤ most ≤ points, got {fewest}, {most}, {points}"
    );
    let rows = random_rows(rng, points);
    let clusters = singletons(&rows);
    let sizes: Vec<usize> = (fewest..=most).rev().collect();

    // Each level clusters the previous level's output.
    let mut hierarchical = Vec::with_capacity(sizes.len());
    let mut level = clusters.clone();
    for &size in &sizes {
        level = hierarchical_clustering(&level, size)?;
        hierarchical.push(total_distortion(&level, &rows)?);
    }

    let kmeans = sizes
        .par_iter()
        .map(|&size| {
            let groups = kmeans_clustering(&clusters, size, iterations)?;
            total_distortion(&groups, &rows)
        })
        .collect::<Result<Vec<f64>, _>>()
        .context("k-means clustering failed")?;

    println!("{:>8}{:>20}{:>20}", "clusters", "hierarchical", "k-means");
    for ((size, h), k) in sizes.iter().zip(&hierarchical).zip(&kmeans) {
        println!("{size:>8}{h:>20.6e}{k:>20.6e}");
    }
    if let Some(((size, h), k)) = sizes
        .iter()
        .zip(&hierarchical)
        .zip(&kmeans)
        .max_by_key(|((_, h), k)| OrderedFloat(*k / *h))
    {
        println!("largest k-means/hierarchical ratio {:.3} at {size} clusters", k / h);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{args:?}");
    let mut rng = StdRng::seed_from_u64(args.seed);
    match args.command {
        Command::Efficiency { max_size } => efficiency(&mut rng, max_size),
        Command::Quality {
            points,
            most,
            fewest,
            iterations,
        } => quality(&mut rng, points, most, fewest, iterations),
    }
}
