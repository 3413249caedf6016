//! Minimap rasterization of a zoned grid.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::Result;
use crate::tilemap::Tilemap;
use crate::zones::{Location, ZoneId};

pub const WALL_COLOR: [u8; 4] = [0, 0, 0, 255];
pub const FLOOR_COLOR: [u8; 4] = [255, 255, 255, 255];
/// Dark blue.
pub const SPAWN_COLOR: [u8; 4] = [0, 0, 139, 255];
/// Pale green.
pub const EXIT_COLOR: [u8; 4] = [152, 251, 152, 255];

/// Row-major RGBA bytes, 4 per tile, row 0 first.
///
/// Wall tiles are black and everything else white. The spawn and exit
/// pixels are painted over the result; an undefined or off-grid marker is
/// left out.
pub fn export_rgba(zoned: &Tilemap<ZoneId>, spawn: Location, exit: Location) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(zoned.width * zoned.height * 4);
    for (_, _, id) in zoned.iter() {
        pixels.extend_from_slice(if id.is_wall() { &WALL_COLOR } else { &FLOOR_COLOR });
    }

    for (marker, color) in [(spawn, SPAWN_COLOR), (exit, EXIT_COLOR)] {
        if marker.is_undefined() || !zoned.in_bounds(marker.row, marker.col) {
            continue;
        }
        let offset = (marker.row * zoned.width + marker.col) * 4;
        pixels[offset..offset + 4].copy_from_slice(&color);
    }

    pixels
}

/// [`export_rgba`] as an image, one pixel per tile.
pub fn minimap_image(zoned: &Tilemap<ZoneId>, spawn: Location, exit: Location) -> RgbaImage {
    let pixels = export_rgba(zoned, spawn, exit);
    ImageBuffer::from_fn(zoned.width as u32, zoned.height as u32, |x, y| {
        let offset = (y as usize * zoned.width + x as usize) * 4;
        Rgba([pixels[offset], pixels[offset + 1], pixels[offset + 2], pixels[offset + 3]])
    })
}

/// Write the minimap as a PNG, each tile scaled to `scale` x `scale` pixels.
pub fn save_minimap(
    zoned: &Tilemap<ZoneId>,
    spawn: Location,
    exit: Location,
    scale: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    let mut img = minimap_image(zoned, spawn, exit);
    let scale = scale.max(1);
    if scale > 1 {
        img = image::imageops::resize(
            &img,
            img.width() * scale,
            img.height() * scale,
            image::imageops::FilterType::Nearest,
        );
    }
    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal() -> Tilemap<ZoneId> {
        Tilemap::from_fn(2, 2, |r, c| if r == c { ZoneId::WALL } else { ZoneId(1) })
    }

    #[test]
    fn test_markers_painted_over_floor() {
        let pixels = export_rgba(&diagonal(), Location::new(0, 1), Location::new(1, 0));
        let expected: Vec<u8> = [WALL_COLOR, SPAWN_COLOR, EXIT_COLOR, WALL_COLOR].concat();
        assert_eq!(pixels, expected);
    }

    #[test]
    fn test_undefined_markers_skipped() {
        let pixels = export_rgba(&diagonal(), Location::UNDEFINED, Location::new(5, 5));
        let expected: Vec<u8> = [WALL_COLOR, FLOOR_COLOR, FLOOR_COLOR, WALL_COLOR].concat();
        assert_eq!(pixels, expected);
    }

    #[test]
    fn test_unassigned_floor_is_white() {
        let zoned = Tilemap::new_with(1, 3, ZoneId::UNASSIGNED);
        let pixels = export_rgba(&zoned, Location::UNDEFINED, Location::UNDEFINED);
        assert_eq!(pixels.len(), 12);
        assert!(pixels.iter().all(|&b| b == 255));
    }

    #[test]
    fn test_image_matches_buffer() {
        let zoned = Tilemap::from_fn(3, 4, |r, c| if (r + c) % 3 == 0 { ZoneId::WALL } else { ZoneId(2) });
        let img = minimap_image(&zoned, Location::new(2, 3), Location::new(0, 1));
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(3, 2).0, SPAWN_COLOR);
        assert_eq!(img.get_pixel(1, 0).0, EXIT_COLOR);
        assert_eq!(img.get_pixel(0, 0).0, WALL_COLOR);
        assert_eq!(img.into_raw(), export_rgba(&zoned, Location::new(2, 3), Location::new(0, 1)));
    }

    #[test]
    fn test_save_scaled_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimap.png");
        save_minimap(&diagonal(), Location::new(0, 1), Location::new(1, 0), 4, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (8, 8));
        assert_eq!(loaded.get_pixel(7, 0).0, SPAWN_COLOR);
    }
}
