use std::error::Error;

use clap::Parser;

use cave_generator::ascii::{self, AsciiMode};
use cave_generator::noise::Interpolation;
use cave_generator::{GenerationConfig, LevelSeeds};

#[derive(Parser, Debug)]
#[command(name = "cave_generator")]
#[command(about = "Generate procedural 2D cave levels with cellular automata")]
struct Args {
    /// Load generation parameters from a JSON file (flags below override it)
    #[arg(short, long)]
    config: Option<String>,

    /// Write the effective configuration to a JSON file
    #[arg(long)]
    save_config: Option<String>,

    /// Width of the level in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the level in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the decor seed only (keeps the same cave)
    #[arg(long)]
    decor_seed: Option<u64>,

    /// Automaton smoothing steps
    #[arg(long)]
    steps: Option<usize>,

    /// Noise octaves for wall decoration
    #[arg(long)]
    octaves: Option<u32>,

    /// Use cosine instead of linear noise interpolation
    #[arg(long)]
    cosine: bool,

    /// Minimum spawn to exit distance in tiles
    #[arg(long)]
    min_distance: Option<f64>,

    /// Export the minimap to PNG (e.g., "minimap.png")
    #[arg(long)]
    minimap: Option<String>,

    /// Pixels per tile in the minimap
    #[arg(long, default_value = "4")]
    minimap_scale: u32,

    /// Export the level to a text file (e.g., "level.txt")
    #[arg(long)]
    ascii: Option<String>,

    /// Include the zone map and per-tile data in the text export
    #[arg(long)]
    verbose: bool,

    /// Print the level to stdout
    #[arg(long)]
    print: bool,

    /// Print with ANSI colours
    #[arg(long)]
    color: bool,

    /// View used by --print: tiles, zones or styles
    #[arg(long, default_value = "tiles")]
    view: String,
}

fn parse_mode(view: &str) -> Option<AsciiMode> {
    AsciiMode::all()
        .iter()
        .copied()
        .find(|mode| mode.name().eq_ignore_ascii_case(view))
}

fn build_config(args: &Args) -> Result<GenerationConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => match (args.height, args.width) {
            (Some(h), Some(w)) => GenerationConfig::with_size(h, w),
            (Some(h), None) => GenerationConfig::with_size(h, 100),
            (None, Some(w)) => GenerationConfig::with_size(100, w),
            (None, None) => GenerationConfig::default(),
        },
    };

    if args.config.is_some() {
        if let Some(h) = args.height {
            config.height = h;
        }
        if let Some(w) = args.width {
            config.width = w;
        }
    }
    if let Some(steps) = args.steps {
        config.simulation_steps = steps;
    }
    if let Some(octaves) = args.octaves {
        config.noise_octaves = octaves;
    }
    if args.cosine {
        config.interpolation = Interpolation::Cosine;
    }
    if let Some(distance) = args.min_distance {
        config.min_spawn_exit_distance = distance;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = build_config(&args)?;

    if let Some(path) = &args.save_config {
        config.save(path)?;
        println!("Saved configuration to {}", path);
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut builder = LevelSeeds::builder(seed);
    if let Some(decor) = args.decor_seed {
        builder = builder.decor(decor);
    }
    let seeds = builder.build();

    println!("Generating cave with seed: {}", seed);
    println!("Level size: {}x{}", config.width, config.height);

    let level = cave_generator::generate_with_seeds(&config, seeds)?;

    let pair = level.spawn_exit();
    println!(
        "Accepted after {} attempt(s) at validity threshold {:.2}",
        level.attempts, level.threshold
    );
    println!("Zones: {}", level.zones().len());
    if let Ok(Some(zone)) = level.main_zone() {
        let open = level.grid().count(|&wall| !wall);
        println!(
            "Main zone: id {} with {} tiles ({:.1}% of open space)",
            zone.id.0,
            zone.size,
            100.0 * zone.size as f64 / open.max(1) as f64
        );
    }
    println!(
        "Spawn: ({}, {})  Exit: ({}, {})  Distance: {:.1}",
        pair.spawn.row,
        pair.spawn.col,
        pair.exit.row,
        pair.exit.col,
        pair.distance()
    );
    let turrets = level.hazards().iter().filter(|h| h.is_turret()).count();
    println!(
        "Hazards: {} spikes, {} turrets",
        level.hazards().len() - turrets,
        turrets
    );
    println!("Color scheme: {}", level.color_scheme().name());

    if let Some(path) = &args.minimap {
        println!("Exporting minimap to {}...", path);
        level.save_minimap(path, args.minimap_scale)?;
    }

    if let Some(path) = &args.ascii {
        println!("Exporting level file to {}...", path);
        ascii::export_level_file(&level, path, args.verbose)?;
    }

    if args.print {
        let mode = parse_mode(&args.view).unwrap_or_else(|| {
            println!("Unknown view '{}', using tiles", args.view);
            AsciiMode::Tiles
        });
        println!();
        if args.color {
            ascii::print_colored_ascii_level(&level, mode);
        } else {
            ascii::print_ascii_level(&level, mode);
        }
    }

    Ok(())
}
