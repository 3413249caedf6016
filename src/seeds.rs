//! Seed management for level generation
//!
//! Every generation stage draws from its own RNG stream, derived from one
//! master seed. Overriding a single stream (say, decor) leaves the cave
//! layout untouched.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for each generation stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Initial wall/floor roll of the automaton
    pub automaton: u64,
    /// Base white noise of the decoration field
    pub noise: u64,
    /// Spike and turret placement
    pub hazards: u64,
    /// Colour scheme choice
    pub decor: u64,
}

impl LevelSeeds {
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            automaton: derive_seed(master, "automaton"),
            noise: derive_seed(master, "noise"),
            hazards: derive_seed(master, "hazards"),
            decor: derive_seed(master, "decor"),
        }
    }

    pub fn builder(master: u64) -> LevelSeedsBuilder {
        LevelSeedsBuilder {
            seeds: Self::from_master(master),
        }
    }

    /// Seeds for retry number `attempt`. Attempt 0 is `self`.
    pub fn for_attempt(&self, attempt: usize) -> Self {
        if attempt == 0 {
            return *self;
        }
        let salt = attempt as u64;
        Self {
            master: self.master,
            automaton: derive_seed(self.automaton, "retry").wrapping_add(salt),
            noise: derive_seed(self.noise, "retry").wrapping_add(salt),
            hazards: derive_seed(self.hazards, "retry").wrapping_add(salt),
            decor: self.decor,
        }
    }

    pub fn automaton_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.automaton)
    }

    pub fn noise_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.noise)
    }

    pub fn hazards_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.hazards)
    }

    pub fn decor_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.decor)
    }
}

impl Default for LevelSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Override individual streams while deriving the rest from the master.
pub struct LevelSeedsBuilder {
    seeds: LevelSeeds,
}

impl LevelSeedsBuilder {
    pub fn automaton(mut self, seed: u64) -> Self {
        self.seeds.automaton = seed;
        self
    }

    pub fn noise(mut self, seed: u64) -> Self {
        self.seeds.noise = seed;
        self
    }

    pub fn hazards(mut self, seed: u64) -> Self {
        self.seeds.hazards = seed;
        self
    }

    pub fn decor(mut self, seed: u64) -> Self {
        self.seeds.decor = seed;
        self
    }

    pub fn build(self) -> LevelSeeds {
        self.seeds
    }
}

/// SplitMix64 finaliser.
fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Mix the stage label into the master seed. The mix is fixed, so a master
/// seed names the same level on every build and platform.
fn derive_seed(master: u64, stage: &str) -> u64 {
    stage
        .bytes()
        .fold(splitmix64(master), |acc, byte| splitmix64(acc ^ u64::from(byte)))
}

impl std::fmt::Display for LevelSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "master {} (automaton {}, noise {}, hazards {}, decor {})",
            self.master, self.automaton, self.noise, self.hazards, self.decor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_deterministic_derivation() {
        assert_eq!(LevelSeeds::from_master(12345), LevelSeeds::from_master(12345));
        assert_ne!(LevelSeeds::from_master(12345), LevelSeeds::from_master(12346));
    }

    #[test]
    fn test_stages_get_distinct_streams() {
        let seeds = LevelSeeds::from_master(12345);
        assert_ne!(seeds.automaton, seeds.noise);
        assert_ne!(seeds.noise, seeds.hazards);
        assert_ne!(seeds.hazards, seeds.decor);
        assert_ne!(seeds.automaton_rng().gen::<u64>(), seeds.noise_rng().gen::<u64>());
    }

    #[test]
    fn test_builder_override() {
        let seeds = LevelSeeds::builder(12345).decor(99999).build();
        let derived = LevelSeeds::from_master(12345);
        assert_eq!(seeds.decor, 99999);
        assert_eq!(seeds.automaton, derived.automaton);
        assert_eq!(seeds.hazards, derived.hazards);
    }

    #[test]
    fn test_derivation_is_pinned() {
        // Shared seeds must keep producing the same levels across builds
        assert_eq!(splitmix64(0), 0xE220_A839_7B1D_CDAF);
        let seeds = LevelSeeds::from_master(42);
        assert_eq!(seeds.automaton, 17987043426665242494);
        assert_eq!(seeds.decor, 4956682192775386852);
    }

    #[test]
    fn test_attempts_reroll_layout_only() {
        let seeds = LevelSeeds::from_master(7);
        assert_eq!(seeds.for_attempt(0), seeds);

        let retry = seeds.for_attempt(3);
        assert_eq!(retry.master, seeds.master);
        assert_eq!(retry.decor, seeds.decor);
        assert_ne!(retry.automaton, seeds.automaton);
        assert_ne!(retry.automaton, seeds.for_attempt(4).automaton);
    }
}
