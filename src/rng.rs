use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Hands out independent, reproducible random streams keyed by name.
///
/// Every stream shares the scenario seed and differs only in its ChaCha
/// stream id, which is a hash of the name. A stream's sequence therefore does
/// not depend on which other streams were requested first.
pub struct RngManager {
    seed: u64,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            streams: HashMap::new(),
        }
    }

    /// Persistent stream for `name`; created on first use.
    pub fn stream(&mut self, name: &str) -> &mut ChaCha8Rng {
        let seed = self.seed;
        self.streams
            .entry(name.to_string())
            .or_insert_with(|| Self::derive(seed, name))
    }

    /// Fresh generator positioned at the start of `name`'s stream, detached
    /// from the persistent copy, e.g. to hand to a `World`.
    pub fn fork(&self, name: &str) -> ChaCha8Rng {
        Self::derive(self.seed, name)
    }

    fn derive(seed: u64, name: &str) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream_id(name));
        rng
    }
}

/// 64-bit FNV-1a over the stream name.
fn stream_id(name: &str) -> u64 {
    name.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
