use super::*;
use crate::io;
use crate::utils;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn p(coords: &[f64]) -> VecPoint {
    VecPoint(coords.to_vec())
}

// Two well-separated pairs around x=0 and x=10
fn two_pairs() -> Vec<VecPoint> {
    vec![
        p(&[0.0, 0.0]),
        p(&[0.0, 1.0]),
        p(&[10.0, 0.0]),
        p(&[10.0, 1.0]),
    ]
}

fn line_points(n: usize) -> Vec<VecPoint> {
    (0..n).map(|i| p(&[i as f64, 0.0])).collect()
}

fn assert_close(point: &VecPoint, expected: &[f64]) {
    for (got, want) in point.0.iter().zip(expected.iter()) {
        assert!(
            (got - want).abs() < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            point.0
        );
    }
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("kmeantune_{}_{}", std::process::id(), name))
}

#[test]
fn seeder_returns_k_indices_in_range() {
    let points = line_points(10);
    let rng = SmallRng::seed_from_u64(0);
    let (indices, centroids) = Seeder::new(rng, 4, &points).unwrap().select();

    assert_eq!(indices.len(), 4);
    assert_eq!(centroids.len(), 4);
    for (&i, centroid) in indices.iter().zip(&centroids) {
        assert!((i as usize) < points.len());
        assert_eq!(*centroid, points[i as usize]);
    }
}

#[test]
fn seeder_is_deterministic_for_a_fixed_seed() {
    let points = line_points(20);

    let (first, _) = Seeder::new(SmallRng::seed_from_u64(7), 5, &points)
        .unwrap()
        .select();
    let (second, _) = Seeder::new(SmallRng::seed_from_u64(7), 5, &points)
        .unwrap()
        .select();
    assert_eq!(first, second);

    // The builder wires the same rng stream
    let via_builder = KMeans::new(5)
        .set_rng_seed(7)
        .seed_indices(&points)
        .unwrap();
    assert_eq!(first, via_builder);
}

#[test]
fn seeder_rejects_out_of_range_k() {
    let points = line_points(4);

    for k in [0, 1, 4, 5] {
        let rng = SmallRng::seed_from_u64(0);
        let err = Seeder::new(rng, k, &points).err().unwrap();
        assert!(matches!(err, Error::InvalidArgument(_)), "k = {}", k);
    }
}

#[test]
fn seeder_spreads_picks_across_separated_locations() {
    // Duplicates give the co-located point zero weight, so the second pick
    // must land on the far location no matter what the rng draws.
    let points = vec![
        p(&[0.0, 0.0]),
        p(&[0.0, 0.0]),
        p(&[10.0, 0.0]),
        p(&[10.0, 0.0]),
    ];
    let rng = SmallRng::seed_from_u64(0);
    let (indices, _) = Seeder::new(rng, 2, &points).unwrap().select();

    let xs: Vec<f64> = indices.iter().map(|&i| points[i as usize].0[0]).collect();
    assert_ne!(xs[0], xs[1]);
}

#[test]
fn seeder_falls_back_to_uniform_on_identical_points() {
    let points = vec![p(&[1.0, 1.0]); 5];
    let rng = SmallRng::seed_from_u64(0);
    let (indices, _) = Seeder::new(rng, 2, &points).unwrap().select();

    assert_eq!(indices.len(), 2);
    for &i in &indices {
        assert!((i as usize) < points.len());
    }
}

#[test]
fn refiner_rejects_bad_parameters() {
    let points = two_pairs();

    assert!(matches!(
        Refiner::new(0, 0.001, &points).err().unwrap(),
        Error::InvalidArgument(_)
    ));
    assert!(matches!(
        Refiner::new(10, -1.0, &points).err().unwrap(),
        Error::InvalidArgument(_)
    ));

    let empty: Vec<VecPoint> = Vec::new();
    assert!(matches!(
        Refiner::new(10, 0.001, &empty).err().unwrap(),
        Error::InvalidArgument(_)
    ));
}

#[test]
fn refiner_rejects_dimension_mismatch() {
    let points = two_pairs();
    let refiner = Refiner::new(10, 0.001, &points).unwrap();

    let err = refiner
        .refine(vec![p(&[0.0, 0.0, 0.0]), p(&[1.0, 1.0, 1.0])])
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let refiner = Refiner::new(10, 0.001, &points).unwrap();
    let err = refiner.refine(Vec::new()).err().unwrap();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn refiner_runs_exactly_one_pass_when_max_iter_is_one() {
    let points = two_pairs();
    let refiner = Refiner::new(1, 0.001, &points).unwrap();
    let refined = refiner
        .refine(vec![p(&[0.0, 0.0]), p(&[10.0, 0.0])])
        .unwrap();

    assert_eq!(refined.iterations, 1);
    assert!(!refined.converged);
    assert_close(&refined.centroids[0], &[0.0, 0.5]);
    assert_close(&refined.centroids[1], &[10.0, 0.5]);
    assert_eq!(refined.assignments, vec![0, 0, 1, 1]);
}

#[test]
fn refiner_converges_after_one_pass_with_huge_epsilon() {
    let points = two_pairs();
    let refiner = Refiner::new(50, f64::INFINITY, &points).unwrap();
    let refined = refiner
        .refine(vec![p(&[0.0, 0.0]), p(&[10.0, 0.0])])
        .unwrap();

    assert_eq!(refined.iterations, 1);
    assert!(refined.converged);
}

#[test]
fn refiner_converges_on_two_pair_scenario() {
    let points = two_pairs();
    let refiner = Refiner::new(100, 0.001, &points).unwrap();
    let refined = refiner
        .refine(vec![p(&[0.0, 0.0]), p(&[10.0, 0.0])])
        .unwrap();

    assert!(refined.converged);
    assert_close(&refined.centroids[0], &[0.0, 0.5]);
    assert_close(&refined.centroids[1], &[10.0, 0.5]);
}

#[test]
fn refiner_is_idempotent_on_its_own_output() {
    let points = two_pairs();
    let refined = Refiner::new(100, 0.001, &points)
        .unwrap()
        .refine(vec![p(&[0.0, 0.0]), p(&[10.0, 0.0])])
        .unwrap();
    assert!(refined.converged);

    // The assignment is already stable, so movement is zero on iteration 1
    let again = Refiner::new(100, 0.001, &points)
        .unwrap()
        .refine(refined.centroids.clone())
        .unwrap();
    assert!(again.converged);
    assert_eq!(again.iterations, 1);
    assert_eq!(again.centroids, refined.centroids);
}

#[test]
fn empty_cluster_keeps_its_previous_centroid() {
    let points = vec![p(&[0.0, 0.0]), p(&[1.0, 0.0])];
    let refined = Refiner::new(5, 0.001, &points)
        .unwrap()
        .refine(vec![p(&[0.5, 0.0]), p(&[100.0, 0.0])])
        .unwrap();

    // Every point lands in cluster 0; cluster 1 never receives a member
    assert_eq!(refined.assignments, vec![0, 0]);
    assert_eq!(refined.centroids[1], p(&[100.0, 0.0]));
    assert_close(&refined.centroids[0], &[0.5, 0.0]);
    assert!(refined.converged);
}

#[test]
fn assignment_ties_break_to_lowest_cluster_index() {
    let centroids = vec![p(&[0.0, 0.0]), p(&[2.0, 0.0])];
    assert_eq!(find_closest_centroid(&p(&[1.0, 0.0]), &centroids), Some(0));
}

#[test]
fn no_centroids_means_no_closest_centroid() {
    let centroids: Vec<VecPoint> = Vec::new();
    assert_eq!(find_closest_centroid(&p(&[1.0, 0.0]), &centroids), None);
}

#[test]
fn fit_end_to_end_on_duplicate_pairs() {
    let points = vec![
        p(&[0.0, 0.0]),
        p(&[0.0, 0.0]),
        p(&[10.0, 1.0]),
        p(&[10.0, 1.0]),
    ];
    let output = fit(&points, 2).unwrap();

    assert_eq!(output.seed_indices.len(), 2);
    assert!(output.converged);
    assert_eq!(output.iterations, 1);

    let mut xs: Vec<f64> = output.centroids.iter().map(|c| c.0[0]).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(xs, vec![0.0, 10.0]);
}

#[test]
fn distance_primitives() {
    assert_eq!(utils::euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
    assert_eq!(utils::squared_distance(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
    assert_eq!(utils::vector_sum(&[1.0, 2.0], &[3.0, 4.0]), vec![4.0, 6.0]);
    assert_eq!(utils::scalar_scale(&[2.0, 4.0], 0.5), vec![1.0, 2.0]);
}

#[test]
fn merge_join_keeps_only_shared_keys() {
    let a = vec![(1.0, vec![0.0]), (2.0, vec![1.0]), (4.0, vec![4.4])];
    let b = vec![(1.0, vec![0.5]), (3.0, vec![7.0]), (4.0, vec![9.9])];

    let joined = utils::merge_join_on_key(&a, &b);
    assert_eq!(joined, vec![vec![0.0, 0.5], vec![4.4, 9.9]]);
}

#[test]
fn load_joined_sorts_by_key_and_drops_it() {
    let path1 = temp_path("join_a.csv");
    let path2 = temp_path("join_b.csv");
    std::fs::write(&path1, "1,0.0\n3,30.0\n2,1.0\n").unwrap();
    std::fs::write(&path2, "2,2.0\n1,0.5\n4,9.9\n").unwrap();

    let points = io::load_joined(&path1, &path2).unwrap();
    assert_eq!(points, vec![p(&[0.0, 0.5]), p(&[1.0, 2.0])]);

    let _ = std::fs::remove_file(&path1);
    let _ = std::fs::remove_file(&path2);
}

#[test]
fn load_points_rejects_malformed_rows() {
    let path = temp_path("bad_field.csv");
    std::fs::write(&path, "1.0,oops\n").unwrap();
    assert!(matches!(
        io::load_points(&path).err().unwrap(),
        Error::InvalidData(_)
    ));
    let _ = std::fs::remove_file(&path);

    let path = temp_path("ragged.csv");
    std::fs::write(&path, "1.0,2.0\n3.0\n").unwrap();
    assert!(matches!(
        io::load_points(&path).err().unwrap(),
        Error::InvalidData(_)
    ));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn centroids_render_at_four_decimal_places() {
    let path = temp_path("centroids.csv");
    let centroids = vec![p(&[1.00004, 2.00006]), p(&[0.5, 1.25])];
    io::save_centroids(&path, &centroids).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "1.0000,2.0001\n0.5000,1.2500\n");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn result_file_reads_back_as_centroids() {
    let path = temp_path("result.csv");
    let centroids = vec![p(&[0.5, 1.25]), p(&[10.0, 0.5])];
    io::save_centroids(&path, &centroids).unwrap();

    let read_back = io::read_centroids(&path).unwrap();
    assert_eq!(read_back, centroids);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn handoff_file_round_trips() {
    let path = temp_path("handoff.txt");
    let points = vec![p(&[1.5, 2.5]), p(&[3.0, 4.0]), p(&[5.0, 6.0])];
    io::write_handoff(&path, &points, &[2, 0], 2, 300, 0.001).unwrap();

    let (header, seed_indices, read_back) = io::read_handoff(&path).unwrap();
    assert_eq!(
        header,
        io::HandoffHeader {
            n_points: 3,
            dim: 2,
            k: 2,
            max_iter: 300,
            epsilon: 0.001,
        }
    );
    assert_eq!(seed_indices, vec![2, 0]);
    assert_eq!(read_back, points);

    let _ = std::fs::remove_file(&path);
}
