//! Profiling tool for the generation stages on a large grid

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use cave_generator::automaton::CaveAutomaton;
use cave_generator::hazards;
use cave_generator::noise::NoiseField;
use cave_generator::zones::{ZoneAnalyzer, DEFAULT_VALIDITY_THRESHOLD};
use cave_generator::{generate_batch, generate_level, GenerationConfig, LevelSeeds};

fn percent(part: Duration, total: Duration) -> f64 {
    100.0 * part.as_secs_f64() / total.as_secs_f64().max(f64::EPSILON)
}

fn main() {
    let height = 400;
    let width = 600;
    let seed = 1337u64;
    let config = GenerationConfig::with_size(height, width);
    let seeds = LevelSeeds::from_master(seed);

    println!("=== Performance Profiling ===");
    println!("Map size: {}x{} ({} cells)", width, height, width * height);
    println!();

    let start = Instant::now();
    let mut automaton = CaveAutomaton::new(height, width, config.rules, &mut seeds.automaton_rng());
    let init_time = start.elapsed();
    println!("Automaton seeding: {:?}", init_time);

    let start = Instant::now();
    automaton.simulate(config.simulation_steps);
    let simulate_time = start.elapsed();
    println!("Automaton simulation ({} steps): {:?}", config.simulation_steps, simulate_time);

    let start = Instant::now();
    let mut analyzer = ZoneAnalyzer::new(automaton);
    analyzer.enforce_boundary();
    analyzer.segment();
    let segment_time = start.elapsed();
    println!("Segmentation: {:?} ({} zones)", segment_time, analyzer.zones().len());

    let start = Instant::now();
    let valid = analyzer.validate(DEFAULT_VALIDITY_THRESHOLD);
    let pair = valid.and_then(|zone| analyzer.select_spawn_exit(zone, config.min_spawn_exit_distance));
    let select_time = start.elapsed();
    match pair {
        Some(pair) => println!("Validation + spawn/exit: {:?} (distance {:.1})", select_time, pair.distance()),
        None => println!("Validation + spawn/exit: {:?} (layout rejected)", select_time),
    }

    let start = Instant::now();
    let mut occupied = BTreeSet::new();
    let mut rng = seeds.hazards_rng();
    let spikes = hazards::place_spikes(&analyzer, &config.hazards, &mut occupied, &mut rng);
    let turrets = hazards::place_turrets(&mut analyzer, &config.hazards, &mut occupied, &mut rng)
        .map(|t| t.len())
        .unwrap_or(0);
    let hazard_time = start.elapsed();
    println!("Hazards: {:?} ({} spikes, {} turrets)", hazard_time, spikes.len(), turrets);

    let start = Instant::now();
    let noise = NoiseField::generate(height, width, config.noise_octaves, config.interpolation, &mut seeds.noise_rng());
    let noise_time = start.elapsed();
    println!("Noise field ({} octaves): {:?} ({} values)", config.noise_octaves, noise_time, noise.field.as_slice().len());

    // Summary
    let total = init_time + simulate_time + segment_time + select_time + hazard_time + noise_time;
    println!("\n=== Summary ===");
    println!("Seeding:        {:>8.2}% ({:?})", percent(init_time, total), init_time);
    println!("Simulation:     {:>8.2}% ({:?})", percent(simulate_time, total), simulate_time);
    println!("Segmentation:   {:>8.2}% ({:?})", percent(segment_time, total), segment_time);
    println!("Spawn/exit:     {:>8.2}% ({:?})", percent(select_time, total), select_time);
    println!("Hazards:        {:>8.2}% ({:?})", percent(hazard_time, total), hazard_time);
    println!("Noise:          {:>8.2}% ({:?})", percent(noise_time, total), noise_time);
    println!("─────────────────────────────────");
    println!("TOTAL:          {:>8}  {:?}", "100%", total);

    println!("\n=== Full pipeline ===");
    let start = Instant::now();
    match generate_level(&config, seed) {
        Ok(level) => println!("Single level: {:?} ({} attempts)", start.elapsed(), level.attempts),
        Err(e) => println!("Single level failed after {:?}: {}", start.elapsed(), e),
    }

    let masters: Vec<u64> = (0..8).map(|i| seed + i).collect();
    let start = Instant::now();
    let levels = generate_batch(&config, &masters);
    let ok = levels.iter().filter(|l| l.is_ok()).count();
    println!("Batch of {}: {:?} ({} succeeded)", masters.len(), start.elapsed(), ok);
}
