use extended_em::{Attribute, Dataset, Instance};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The six-point, two-group column `{1, 1, 2, 8, 9, 9}`.
pub fn six_points() -> Dataset {
    column(&[1.0, 1.0, 2.0, 8.0, 9.0, 9.0])
}

pub fn column(values: &[f64]) -> Dataset {
    let mut data = Dataset::new("column", vec![Attribute::numeric("x")]);
    for &x in values {
        data.add(Instance::numeric(&[x])).expect("valid row");
    }
    data
}

/// Two-attribute blobs with uniform jitter of half-width `spread` around each
/// center. Every `missing_every`-th row loses its second cell.
pub fn blobs(
    centers: &[[f64; 2]],
    per_blob: usize,
    spread: f64,
    missing_every: Option<usize>,
    seed: u64,
) -> Dataset {
    assert!(per_blob > 0, "blobs need at least one point");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Dataset::new(
        "blobs",
        vec![Attribute::numeric("x"), Attribute::numeric("y")],
    );
    let mut row = 0usize;
    for center in centers {
        for _ in 0..per_blob {
            let x = center[0] + rng.gen_range(-spread..spread);
            let mut y = center[1] + rng.gen_range(-spread..spread);
            if missing_every.is_some_and(|n| row % n == n - 1) {
                y = f64::NAN;
            }
            let weight = 0.5 + rng.gen::<f64>();
            data.add(Instance::with_weight(
                Instance::numeric(&[x, y]).values().to_vec(),
                weight,
            ))
            .expect("valid row");
            row += 1;
        }
    }
    data
}
