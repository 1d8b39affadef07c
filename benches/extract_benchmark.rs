use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use castmotif::{extract_motifs, DistanceMeasure, MotifConfig, ReportMode, SuffixTree};

/// Generate a synthetic DNA-like sequence with a fixed seed.
fn generate_sequence(length: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    let bases = [b'A', b'C', b'G', b'T'];
    (0..length).map(|_| bases[rng.gen_range(0..4)]).collect()
}

fn bench_tree_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("suffix_tree");

    for length in [1_000, 10_000, 100_000] {
        let sequence = generate_sequence(length);
        group.bench_with_input(BenchmarkId::new("build", length), &sequence, |b, seq| {
            b.iter(|| SuffixTree::build(black_box(seq.clone())));
        });
    }

    group.finish();
}

fn bench_exact_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_exact");

    for length in [1_000, 10_000] {
        let sequence = generate_sequence(length);
        let config = MotifConfig {
            min_length: 4,
            max_length: 10,
            min_frequency: 2,
            max_distance: 0.0,
            mode: ReportMode::Silent,
        };
        group.bench_with_input(BenchmarkId::new("hamming_d0", length), &sequence, |b, seq| {
            b.iter(|| {
                extract_motifs(
                    black_box(seq.as_slice()),
                    &config,
                    &DistanceMeasure::Hamming,
                    &mut std::io::sink(),
                )
            });
        });
    }

    group.finish();
}

fn bench_approximate_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_approximate");

    for length in [1_000, 5_000] {
        let sequence = generate_sequence(length);
        let config = MotifConfig {
            min_length: 4,
            max_length: 8,
            min_frequency: 4,
            max_distance: 1.0,
            mode: ReportMode::Silent,
        };
        group.bench_with_input(BenchmarkId::new("hamming_d1", length), &sequence, |b, seq| {
            b.iter(|| {
                extract_motifs(
                    black_box(seq.as_slice()),
                    &config,
                    &DistanceMeasure::Hamming,
                    &mut std::io::sink(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tree_construction,
    bench_exact_extraction,
    bench_approximate_extraction
);
criterion_main!(benches);
