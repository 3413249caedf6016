//! Debug tool for comparing zone segmentation across seeds
//! Generates a grid of zone-coloured levels, labelled with seed and zone count

use std::error::Error;

use image::{ImageBuffer, Rgb, RgbImage};
use cave_generator::hazards::HazardKind;
use cave_generator::{generate_batch, GenerationConfig, Level};

const SCALE: u32 = 3;
const COLS: usize = 3;
const ROWS: usize = 3;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Generating zone comparison grid...");

    let config = GenerationConfig::default();
    let seeds: Vec<u64> = (1..=(COLS * ROWS) as u64).collect();
    let results = generate_batch(&config, &seeds);

    let mut images = Vec::new();
    for (seed, result) in seeds.iter().zip(results) {
        let level = result?;
        println!(
            "  seed {}: {} zones, {} hazards, {} attempt(s)",
            seed,
            level.zones().len(),
            level.hazards().len(),
            level.attempts
        );
        images.push((format!("{} {}", seed, level.zones().len()), render_zones(&level)));
    }

    let grid = create_grid(&images, COLS, ROWS);
    grid.save("zone_comparison.png")?;
    println!("Saved zone_comparison.png");
    Ok(())
}

/// Spread zone hues around the colour wheel.
fn zone_color(id: i32) -> Rgb<u8> {
    let hue = (id as f32 * 0.618_034).fract() * 6.0;
    let x = 1.0 - (hue % 2.0 - 1.0).abs();
    let (r, g, b) = match hue as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let channel = |v: f32| (80.0 + v * 150.0) as u8;
    Rgb([channel(r), channel(g), channel(b)])
}

fn render_zones(level: &Level) -> RgbImage {
    let zoned = level.zoned_grid();
    let mut img: RgbImage = ImageBuffer::new(zoned.width as u32 * SCALE, zoned.height as u32 * SCALE);

    let mut paint = |row: usize, col: usize, color: Rgb<u8>| {
        for dy in 0..SCALE {
            for dx in 0..SCALE {
                img.put_pixel(col as u32 * SCALE + dx, row as u32 * SCALE + dy, color);
            }
        }
    };

    for (row, col, id) in zoned.iter() {
        let color = if id.is_zone() {
            zone_color(id.0)
        } else if id.is_wall() {
            Rgb([20, 20, 20])
        } else {
            Rgb([255, 255, 255])
        };
        paint(row, col, color);
    }

    for hazard in level.hazards() {
        let color = match hazard.kind {
            HazardKind::Spike => Rgb([230, 40, 40]),
            HazardKind::Turret { .. } => Rgb([255, 140, 0]),
        };
        paint(hazard.location.row, hazard.location.col, color);
    }

    let pair = level.spawn_exit();
    paint(pair.spawn.row, pair.spawn.col, Rgb([0, 0, 139]));
    paint(pair.exit.row, pair.exit.col, Rgb([152, 251, 152]));

    img
}

fn create_grid(images: &[(String, RgbImage)], cols: usize, rows: usize) -> RgbImage {
    let Some((_, first)) = images.first() else {
        return ImageBuffer::new(1, 1);
    };

    let cell_width = first.width() + 4;
    let cell_height = first.height();
    let label_height = 14u32;
    let total_cell_height = cell_height + label_height;

    let mut grid: RgbImage = ImageBuffer::from_pixel(
        cell_width * cols as u32,
        total_cell_height * rows as u32,
        Rgb([40, 40, 40]),
    );

    for (idx, (label, img)) in images.iter().enumerate().take(cols * rows) {
        let x_offset = (idx % cols) as u32 * cell_width + 2;
        let y_top = (idx / cols) as u32 * total_cell_height;

        for (x, y, pixel) in img.enumerate_pixels() {
            grid.put_pixel(x_offset + x, y_top + label_height + y, *pixel);
        }
        draw_label(&mut grid, x_offset + 3, y_top + 3, label);
    }

    grid
}

/// 3x5 glyphs, one row per entry, high bit on the left.
fn glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        _ => [0; 5],
    }
}

fn draw_label(img: &mut RgbImage, x: u32, y: u32, text: &str) {
    let color = Rgb([220, 220, 220]);
    for (i, c) in text.chars().enumerate() {
        let gx = x + i as u32 * 4 * 2;
        for (dy, bits) in glyph(c).iter().enumerate() {
            for dx in 0..3u32 {
                if bits & (0b100 >> dx) == 0 {
                    continue;
                }
                // Doubled pixels so labels stay readable next to scaled maps
                for sy in 0..2 {
                    for sx in 0..2 {
                        let px = gx + dx * 2 + sx;
                        let py = y + dy as u32 * 2 + sy;
                        if px < img.width() && py < img.height() {
                            img.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
    }
}
