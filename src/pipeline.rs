//! Retry-until-valid level generation
//!
//! One attempt grows a cave, encloses it, segments it and asks the analyzer
//! for a dominant zone and a spawn/exit pair. A failed attempt is discarded
//! and the next one is drawn from fresh seeds. After `max_attempts` failures
//! in a row the validity threshold is relaxed; once it cannot relax any
//! further the run gives up.
//!
//! Relaxing only helps layouts that lacked a dominant zone. A round in which
//! every attempt had a valid zone but no spawn/exit pair ends the run
//! without touching the threshold.

use std::thread::{self, JoinHandle};

use rayon::prelude::*;

use crate::automaton::CaveAutomaton;
use crate::config::GenerationConfig;
use crate::decor::ColorScheme;
use crate::error::{LevelError, Result};
use crate::hazards::place_hazards;
use crate::level::Level;
use crate::noise::NoiseField;
use crate::seeds::LevelSeeds;
use crate::zones::{SpawnExit, ZoneAnalyzer};

/// Slack for comparing relaxed thresholds.
const THRESHOLD_EPSILON: f64 = 1e-9;

/// A validated cave with its spawn and exit, before hazards and decoration.
struct Layout {
    analyzer: ZoneAnalyzer,
    spawn_exit: SpawnExit,
}

/// Why an attempt was thrown away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    NoDominantZone,
    NoSpawnExit,
}

/// Run one attempt.
fn attempt_layout(
    config: &GenerationConfig,
    seeds: &LevelSeeds,
    threshold: f64,
) -> std::result::Result<Layout, Rejection> {
    let mut rng = seeds.automaton_rng();
    let mut automaton = CaveAutomaton::new(config.height, config.width, config.rules, &mut rng);
    automaton.simulate(config.simulation_steps);

    let mut analyzer = ZoneAnalyzer::new(automaton);
    analyzer.enforce_boundary();
    analyzer.segment();

    let Some(zone_id) = analyzer.validate(threshold) else {
        tracing::debug!(zones = analyzer.zones().len(), "layout rejected: no dominant zone");
        return Err(Rejection::NoDominantZone);
    };
    let Some(spawn_exit) = analyzer.select_spawn_exit(zone_id, config.min_spawn_exit_distance) else {
        tracing::debug!(zone = zone_id.0, "layout rejected: no spawn/exit pair");
        return Err(Rejection::NoSpawnExit);
    };

    Ok(Layout { analyzer, spawn_exit })
}

/// Generate a complete level from `master` seed.
pub fn generate_level(config: &GenerationConfig, master: u64) -> Result<Level> {
    generate_with_seeds(config, LevelSeeds::from_master(master))
}

/// Generate a complete level with explicit per-stage seeds.
pub fn generate_with_seeds(config: &GenerationConfig, seeds: LevelSeeds) -> Result<Level> {
    config.validate()?;

    let mut threshold = config.validity_threshold;
    let mut attempts = 0usize;

    loop {
        let mut invalid_layouts = 0usize;
        for _ in 0..config.max_attempts {
            let attempt_seeds = seeds.for_attempt(attempts);
            attempts += 1;
            tracing::debug!(attempt = attempts, threshold, "generating layout");

            match attempt_layout(config, &attempt_seeds, threshold) {
                Ok(layout) => return finish_level(config, attempt_seeds, attempts, threshold, layout),
                Err(Rejection::NoDominantZone) => invalid_layouts += 1,
                Err(Rejection::NoSpawnExit) => {}
            }
        }

        let floor = config.min_validity_threshold;
        if invalid_layouts == 0 {
            tracing::warn!(attempts, threshold, "no spawn/exit pair in any valid layout, giving up");
            return Err(LevelError::AttemptsExhausted { attempts, threshold });
        }
        if config.threshold_relaxation <= 0.0 || threshold <= floor + THRESHOLD_EPSILON {
            tracing::warn!(attempts, threshold, "no valid layout, giving up");
            return Err(LevelError::AttemptsExhausted { attempts, threshold });
        }

        let relaxed = (threshold - config.threshold_relaxation).max(floor);
        tracing::warn!(attempts, from = threshold, to = relaxed, "relaxing validity threshold");
        threshold = relaxed;
    }
}

/// Decorate and populate an accepted layout.
fn finish_level(
    config: &GenerationConfig,
    seeds: LevelSeeds,
    attempts: usize,
    threshold: f64,
    layout: Layout,
) -> Result<Level> {
    let Layout { mut analyzer, spawn_exit } = layout;

    let hazards = place_hazards(&mut analyzer, &config.hazards, &mut seeds.hazards_rng())?;
    let noise = NoiseField::generate(
        config.height,
        config.width,
        config.noise_octaves,
        config.interpolation,
        &mut seeds.noise_rng(),
    );
    let color_scheme = ColorScheme::random(&mut seeds.decor_rng());

    tracing::info!(
        seed = seeds.master,
        attempts,
        zones = analyzer.zones().len(),
        hazards = hazards.len(),
        distance = spawn_exit.distance(),
        "level generated"
    );

    Ok(Level::assemble(
        seeds,
        attempts,
        threshold,
        analyzer,
        noise,
        spawn_exit,
        hazards,
        color_scheme,
    ))
}

/// Generate on a background thread. The level is only visible once the
/// handle is joined.
pub fn spawn_generation(config: GenerationConfig, master: u64) -> JoinHandle<Result<Level>> {
    thread::spawn(move || generate_level(&config, master))
}

/// Generate one level per master seed, in parallel. Results keep the order
/// of `masters`.
pub fn generate_batch(config: &GenerationConfig, masters: &[u64]) -> Vec<Result<Level>> {
    masters
        .par_iter()
        .map(|&master| generate_level(config, master))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AutomatonRules;
    use crate::config::HazardConfig;
    use crate::hazards::HazardKind;

    #[test]
    fn test_default_level_is_valid() {
        // Turrets may wall off a narrow passage, so check the bare layout
        let config = GenerationConfig {
            hazards: HazardConfig::none(),
            ..GenerationConfig::default()
        };
        let level = generate_level(&config, 2024).unwrap();

        assert!(level.attempts >= 1);
        assert!(!level.is_stale());
        let SpawnExit { spawn, exit } = level.spawn_exit();
        assert!(spawn.distance_squared(&exit) >= 60.0 * 60.0);
        assert_eq!(level.zoned_grid().get(spawn.row, spawn.col), level.zoned_grid().get(exit.row, exit.col));
        assert!(level.zoned_grid().get(spawn.row, spawn.col).is_zone());

        let (h, w) = (level.height(), level.width());
        for (row, col, &wall) in level.grid().iter() {
            if row == 0 || col == 0 || row == h - 1 || col == w - 1 {
                assert!(wall);
            }
        }
        assert_eq!((level.noise().height(), level.noise().width()), (100, 100));
    }

    #[test]
    fn test_hazards_sit_where_they_belong() {
        let level = generate_level(&GenerationConfig::default(), 77).unwrap();
        assert!(!level.hazards().is_empty());
        for hazard in level.hazards() {
            let loc = hazard.location;
            match hazard.kind {
                HazardKind::Spike => {
                    assert!(!*level.grid().get(loc.row, loc.col));
                    assert!(*level.grid().get(loc.row + 1, loc.col));
                }
                HazardKind::Turret { .. } => assert!(*level.grid().get(loc.row, loc.col)),
            }
        }
    }

    #[test]
    fn test_same_seed_same_level() {
        let config = GenerationConfig::with_size(60, 80);
        let a = generate_level(&config, 5).unwrap();
        let b = generate_level(&config, 5).unwrap();

        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.spawn_exit(), b.spawn_exit());
        assert_eq!(a.hazards(), b.hazards());
        assert_eq!(a.noise(), b.noise());
        assert_eq!(a.color_scheme(), b.color_scheme());
        assert_eq!(a.attempts, b.attempts);
    }

    #[test]
    fn test_exhaustion_after_relaxing() {
        let config = GenerationConfig {
            height: 20,
            width: 20,
            rules: AutomatonRules::with_probability(1.0),
            max_attempts: 3,
            validity_threshold: 0.65,
            min_validity_threshold: 0.6,
            ..GenerationConfig::default()
        };
        match generate_level(&config, 1) {
            Err(LevelError::AttemptsExhausted { attempts, threshold }) => {
                assert_eq!(attempts, 6);
                assert!((threshold - 0.6).abs() < 1e-6);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn test_no_relaxation_single_round() {
        let config = GenerationConfig {
            height: 20,
            width: 20,
            rules: AutomatonRules::with_probability(1.0),
            max_attempts: 4,
            threshold_relaxation: 0.0,
            ..GenerationConfig::default()
        };
        assert!(matches!(
            generate_level(&config, 1),
            Err(LevelError::AttemptsExhausted { attempts: 4, .. })
        ));
    }

    #[test]
    fn test_unreachable_distance_does_not_relax() {
        // An open cave is always valid, but no pair can be 1000 tiles apart
        let config = GenerationConfig {
            height: 20,
            width: 20,
            rules: AutomatonRules::with_probability(0.0),
            simulation_steps: 0,
            min_spawn_exit_distance: 1000.0,
            max_attempts: 3,
            ..GenerationConfig::default()
        };
        match generate_level(&config, 1) {
            Err(LevelError::AttemptsExhausted { attempts, threshold }) => {
                assert_eq!(attempts, 3);
                assert_eq!(threshold, config.validity_threshold);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GenerationConfig {
            height: 0,
            ..GenerationConfig::default()
        };
        assert!(matches!(generate_level(&config, 1), Err(LevelError::InvalidConfig(_))));
    }

    #[test]
    fn test_background_generation() {
        let mut config = GenerationConfig::with_size(50, 50);
        config.hazards = HazardConfig::none();
        let handle = spawn_generation(config, 11);
        let level = handle.join().unwrap().unwrap();
        assert!(level.hazards().is_empty());
        assert_eq!(level.height(), 50);
    }

    #[test]
    fn test_batch_keeps_order() {
        let config = GenerationConfig::with_size(50, 60);
        let masters = [3, 1, 4];
        let levels = generate_batch(&config, &masters);
        assert_eq!(levels.len(), 3);
        for (level, &master) in levels.iter().zip(&masters) {
            assert_eq!(level.as_ref().unwrap().seeds.master, master);
        }
    }
}
