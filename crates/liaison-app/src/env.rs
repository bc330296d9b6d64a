//! Production environment.

use std::time::{SystemTime, UNIX_EPOCH};

use liaison_core::Environment;
use rand::{RngCore, rngs::OsRng};

/// Wall clock and operating system randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn now_millis(&self) -> u64 {
        // A clock before the epoch reads as zero.
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis() as u64)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        OsRng.fill_bytes(buffer);
    }
}
