//! Seeded environment with a virtual clock.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use liaison_core::Environment;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Virtual clock start: 2023-11-14T22:13:20Z.
const EPOCH_MILLIS: u64 = 1_700_000_000_000;

/// Deterministic environment.
///
/// Clones share one RNG stream and one clock, so the network, the
/// introducees and the introducer all draw from the same seeded sequence.
#[derive(Clone)]
pub struct SimEnv {
    rng: Rc<RefCell<ChaCha8Rng>>,
    clock: Rc<Cell<u64>>,
}

impl SimEnv {
    /// Create an environment from a seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Rc::new(RefCell::new(ChaCha8Rng::seed_from_u64(seed))),
            clock: Rc::new(Cell::new(EPOCH_MILLIS)),
        }
    }

    /// Move the virtual clock forward.
    pub fn advance(&self, millis: u64) {
        self.clock.set(self.clock.get().saturating_add(millis));
    }

    /// True with probability `p` (clamped to `0.0..=1.0`).
    pub fn chance(&self, p: f64) -> bool {
        let p = p.clamp(0.0, 1.0);
        p > 0.0 && self.rng.borrow_mut().gen_bool(p)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick(&self, len: usize) -> usize {
        self.rng.borrow_mut().gen_range(0..len)
    }
}

impl Environment for SimEnv {
    fn now_millis(&self) -> u64 {
        self.clock.get()
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.borrow_mut().fill_bytes(buffer);
    }
}
