//! Environment abstraction.
//!
//! Engines are pure and never touch this. It exists for the layers that
//! create sessions and stamp messages: production plugs in the OS RNG and
//! wall clock, simulations plug in a seeded RNG and a virtual clock.

/// Source of time and randomness.
pub trait Environment {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;

    /// Fill `buffer` with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// 32 random bytes, the size of every identifier in the protocol.
    fn random_id(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.random_bytes(&mut bytes);
        bytes
    }
}
