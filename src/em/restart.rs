use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Draws discarded right after seeding so that neighbouring seeds do not
/// start with correlated streams.
const DECORRELATION_DRAWS: usize = 10;

/// Seeded PRNG that moves to the next seed on every restart.
pub(crate) struct SeedSchedule {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeedSchedule {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Self::seeded(seed),
        }
    }

    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Advance to the next seed and reseed.
    pub(crate) fn advance(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        self.rng = Self::seeded(self.seed);
    }

    fn seeded(seed: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        decorrelate(&mut rng);
        rng
    }
}

/// Burn the first few outputs of a freshly seeded generator.
fn decorrelate<R: Rng>(rng: &mut R) {
    for _ in 0..DECORRELATION_DRAWS {
        let _: f64 = rng.gen();
    }
}
