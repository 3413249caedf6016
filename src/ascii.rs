//! ASCII rendering and export for generated levels
//!
//! Renders a level as text in one of several views and writes level files
//! with a header, the map, a legend and zone statistics.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::decor::{ColorScheme, WallStyle};
use crate::hazards::{Hazard, HazardKind};
use crate::level::Level;
use crate::tilemap::Tilemap;
use crate::zones::ZoneId;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Walls, floor, spawn/exit and hazards
    Tiles,
    /// Zone membership, one symbol per zone id
    Zones,
    /// Wall style bands from the noise field
    Styles,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Tiles => "Tiles",
            AsciiMode::Zones => "Zones",
            AsciiMode::Styles => "Styles",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Tiles, AsciiMode::Zones, AsciiMode::Styles]
    }
}

pub const WALL_CHAR: char = '#';
pub const FLOOR_CHAR: char = '.';
pub const SPAWN_CHAR: char = 'S';
pub const EXIT_CHAR: char = 'E';

pub fn hazard_char(hazard: &Hazard) -> char {
    match hazard.kind {
        HazardKind::Spike => '^',
        HazardKind::Turret { .. } => 'T',
    }
}

/// Zones 1-9 are digits, then lowercase and uppercase letters; the symbols
/// repeat past 61.
pub fn zone_char(id: ZoneId) -> char {
    const SYMBOLS: &[u8] = b"123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if id.is_wall() {
        return WALL_CHAR;
    }
    if !id.is_zone() {
        return '?';
    }
    SYMBOLS[(id.0 as usize - 1) % SYMBOLS.len()] as char
}

pub fn style_char(style: Option<WallStyle>) -> char {
    match style {
        None => ' ',
        Some(WallStyle::Cross) => '+',
        Some(WallStyle::Signs) => '$',
        Some(WallStyle::Cement) => '=',
        Some(WallStyle::Mat) => '%',
        Some(WallStyle::Brick) => '#',
    }
}

/// Character grid for `mode`, before joining into lines.
fn ascii_tiles(level: &Level, mode: AsciiMode) -> Tilemap<char> {
    let mut chars = match mode {
        AsciiMode::Tiles => Tilemap::from_fn(level.height(), level.width(), |row, col| {
            if *level.grid().get(row, col) {
                WALL_CHAR
            } else {
                FLOOR_CHAR
            }
        }),
        AsciiMode::Zones => {
            let zoned = level.zoned_grid();
            Tilemap::from_fn(zoned.height, zoned.width, |row, col| zone_char(*zoned.get(row, col)))
        }
        AsciiMode::Styles => {
            let styles = level.wall_styles();
            Tilemap::from_fn(styles.height, styles.width, |row, col| style_char(*styles.get(row, col)))
        }
    };

    if mode == AsciiMode::Tiles {
        for hazard in level.hazards() {
            let loc = hazard.location;
            if chars.in_bounds(loc.row, loc.col) {
                chars.set(loc.row, loc.col, hazard_char(hazard));
            }
        }
    }

    let pair = level.spawn_exit();
    for (loc, ch) in [(pair.spawn, SPAWN_CHAR), (pair.exit, EXIT_CHAR)] {
        if !loc.is_undefined() && chars.in_bounds(loc.row, loc.col) {
            chars.set(loc.row, loc.col, ch);
        }
    }
    chars
}

/// Render a level to an ASCII string, one line per row, top row first.
pub fn render_ascii_level(level: &Level, mode: AsciiMode) -> String {
    let chars = ascii_tiles(level, mode);
    let mut result = String::with_capacity((chars.width + 1) * chars.height);
    for row in 0..chars.height {
        for col in 0..chars.width {
            result.push(*chars.get(row, col));
        }
        result.push('\n');
    }
    result
}

/// Print ASCII map to stdout
pub fn print_ascii_level(level: &Level, mode: AsciiMode) {
    print!("{}", render_ascii_level(level, mode));
}

/// Terminal tint for wall tiles of a colour scheme.
pub fn scheme_color(scheme: ColorScheme) -> (u8, u8, u8) {
    match scheme {
        ColorScheme::Royal => (90, 70, 170),
        ColorScheme::Snow => (200, 220, 235),
        ColorScheme::Arid => (190, 140, 80),
        ColorScheme::Gold => (220, 180, 40),
    }
}

/// Format a string with ANSI true color (24-bit) - foreground only
pub fn ansi_fg_colored(text: &str, fg: (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", fg.0, fg.1, fg.2, text)
}

/// Render with walls tinted by the level's colour scheme and markers highlighted.
pub fn render_colored_ascii_level(level: &Level, mode: AsciiMode) -> String {
    let chars = ascii_tiles(level, mode);
    let wall = scheme_color(level.color_scheme());
    let mut result = String::new();

    for row in 0..chars.height {
        for col in 0..chars.width {
            let ch = *chars.get(row, col);
            let text = ch.to_string();
            let colored = match ch {
                SPAWN_CHAR => ansi_fg_colored(&text, (80, 80, 255)),
                EXIT_CHAR => ansi_fg_colored(&text, (152, 251, 152)),
                '^' | 'T' => ansi_fg_colored(&text, (230, 60, 60)),
                _ if *level.grid().get(row, col) => ansi_fg_colored(&text, wall),
                _ => text,
            };
            result.push_str(&colored);
        }
        result.push('\n');
    }
    result
}

pub fn print_colored_ascii_level(level: &Level, mode: AsciiMode) {
    print!("{}", render_colored_ascii_level(level, mode));
}

/// Legend for the tile view
pub fn level_legend() -> String {
    "=== LEGEND ===\n\
     # Wall   . Floor   S Spawn   E Exit   ^ Spike   T Turret\n"
        .to_string()
}

/// Export a level to an ASCII file
pub fn export_level_file(level: &Level, path: impl AsRef<Path>, verbose: bool) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    let width = level.width();
    let height = level.height();
    let total = width * height;

    // Header
    writeln!(file, "=== CAVE LEVEL FILE ===")?;
    writeln!(file, "Seed: {}", level.seeds.master)?;
    writeln!(file, "Size: {}x{}", width, height)?;
    writeln!(file, "Attempts: {} (threshold {:.2})", level.attempts, level.threshold)?;
    writeln!(file, "Zones: {}", level.zones().len())?;
    writeln!(file, "Color scheme: {}", level.color_scheme().name())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", render_ascii_level(level, AsciiMode::Tiles))?;
    writeln!(file)?;
    write!(file, "{}", level_legend())?;
    writeln!(file)?;

    // Statistics
    writeln!(file, "=== STATISTICS ===")?;
    let walls = level.grid().count(|&wall| wall);
    let floor = total - walls;
    writeln!(file, "Total tiles: {}", total)?;
    writeln!(file, "Wall: {} ({:.1}%)", walls, 100.0 * walls as f64 / total.max(1) as f64)?;
    writeln!(file, "Floor: {} ({:.1}%)", floor, 100.0 * floor as f64 / total.max(1) as f64)?;

    let pair = level.spawn_exit();
    writeln!(
        file,
        "Spawn: ({}, {})  Exit: ({}, {})  Distance: {:.1}",
        pair.spawn.row,
        pair.spawn.col,
        pair.exit.row,
        pair.exit.col,
        pair.distance()
    )?;

    let spikes = level.hazards().iter().filter(|h| !h.is_turret()).count();
    let turrets = level.hazards().len() - spikes;
    writeln!(file, "Hazards: {} spikes, {} turrets", spikes, turrets)?;
    writeln!(file)?;

    writeln!(file, "Zone Distribution:")?;
    let mut zones: Vec<_> = level.zones().iter().collect();
    zones.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));
    for zone in zones {
        let pct = 100.0 * zone.size as f64 / floor.max(1) as f64;
        writeln!(
            file,
            "  zone {:>3} {} {:>6} ({:>5.1}%)  ground {:>4}  ceiling {:>4}  left {:>4}  right {:>4}",
            zone.id.0,
            zone_char(zone.id),
            zone.size,
            pct,
            zone.ground.len(),
            zone.ceiling.len(),
            zone.left.len(),
            zone.right.len()
        )?;
    }
    writeln!(file)?;

    if verbose {
        writeln!(file, "=== ZONE MAP ===")?;
        write!(file, "{}", render_ascii_level(level, AsciiMode::Zones))?;
        writeln!(file)?;
        writeln!(file, "=== TILE DATA ===")?;
        writeln!(file, "[row,col,wall,zone,noise]")?;
        for (row, col, &wall) in level.grid().iter() {
            let zone = level.zoned_grid().get(row, col).0;
            let noise = if level.noise().field.in_bounds(row, col) {
                level.noise().get(row, col)
            } else {
                0.0
            };
            writeln!(file, "{},{},{},{},{:.3}", row, col, wall as u8, zone, noise)?;
        }
    }

    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hazards::Facing;
    use crate::level::tests::pillar_level;
    use crate::zones::Location;

    #[test]
    fn test_tile_view() {
        let level = pillar_level(vec![
            Hazard {
                kind: HazardKind::Spike,
                location: Location::new(4, 4),
            },
            Hazard {
                kind: HazardKind::Turret { facing: Facing::Right },
                location: Location::new(2, 1),
            },
        ]);
        let text = render_ascii_level(&level, AsciiMode::Tiles);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "############");
        assert_eq!(lines[2], "#T...##....#");
        assert_eq!(lines[4], "#.S.^....E.#");
    }

    #[test]
    fn test_zone_view() {
        let level = pillar_level(Vec::new());
        let text = render_ascii_level(&level, AsciiMode::Zones);
        assert_eq!(text.lines().nth(1), Some("#1111111111#"));
        assert_eq!(zone_char(ZoneId(10)), 'a');
        assert_eq!(zone_char(ZoneId(62)), '1');
        assert_eq!(zone_char(ZoneId::UNASSIGNED), '?');
    }

    #[test]
    fn test_colored_output_keeps_floor_plain() {
        let level = pillar_level(Vec::new());
        let text = render_colored_ascii_level(&level, AsciiMode::Tiles);
        assert!(text.contains("\x1b[38;2;220;180;40m#\x1b[0m"));
        assert!(text.contains("..."));
    }

    #[test]
    fn test_export_level_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.txt");
        let level = pillar_level(Vec::new());
        export_level_file(&level, &path, true).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("=== CAVE LEVEL FILE ==="));
        assert!(contents.contains("Size: 12x6"));
        assert!(contents.contains("Generated: "));
        assert!(contents.contains("#.S......E.#"));
        assert!(contents.contains("=== TILE DATA ==="));
    }
}
