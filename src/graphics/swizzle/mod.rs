//! Tile addressing (swizzling).
//!
//! GPU textures are rarely stored row-major; [`MasterSwizzle`] maps a linear
//! pixel index to its 2D coordinate using a bit-to-offset table instead of
//! hard-coded tiling loops. Supplying the canonical `(1,0),(0,1),(2,0),...`
//! table gives a classic Z-order curve; other tables give arbitrary custom
//! tilings with the same engine.

pub mod ctr;

pub use ctr::{CtrSwizzle, Orientation};

/// Generalized Morton/Z-order address engine.
///
/// Each entry of `bit_field_coords` is the (dx, dy) contribution of one bit
/// of the pixel index inside a macro tile; the optional `y_transform` table
/// contributes per bit of the macro-tile row index. The macro tile
/// dimensions derived from the table must be powers of two for a
/// collision-free tiling; a table violating that addresses an overlapping
/// space, which is on the caller, not re-validated here.
pub struct MasterSwizzle {
    bit_field_coords: Vec<(u32, u32)>,
    y_transform: Vec<(u32, u32)>,
    init: (u32, u32),
    macro_tile_width: u32,
    macro_tile_height: u32,
    width_in_tiles: u32,
}

impl MasterSwizzle {
    pub fn new(
        image_stride: u32,
        init: (u32, u32),
        bit_field_coords: Vec<(u32, u32)>,
        y_transform: Vec<(u32, u32)>,
    ) -> Self {
        let macro_tile_width = bit_field_coords.iter().fold(0, |acc, p| acc | p.0) + 1;
        let macro_tile_height = bit_field_coords.iter().fold(0, |acc, p| acc | p.1) + 1;
        let width_in_tiles = image_stride.div_ceil(macro_tile_width);

        MasterSwizzle {
            bit_field_coords,
            y_transform,
            init,
            macro_tile_width,
            macro_tile_height,
            width_in_tiles,
        }
    }

    pub fn macro_tile_width(&self) -> u32 {
        self.macro_tile_width
    }

    pub fn macro_tile_height(&self) -> u32 {
        self.macro_tile_height
    }

    /// Maps a linear pixel count to its swizzled coordinate.
    pub fn get(&self, point_count: u32) -> (u32, u32) {
        let macro_tile_count = point_count / self.macro_tile_width / self.macro_tile_height;
        let macro_x = macro_tile_count % self.width_in_tiles;
        let macro_y = macro_tile_count / self.width_in_tiles;

        // XOR-fold the table entries selected by the set bits of the index
        // and of the macro row, starting from the configured origin.
        let base = (
            self.init.0 ^ macro_x * self.macro_tile_width,
            self.init.1 ^ macro_y * self.macro_tile_height,
        );

        let folded = self
            .bit_field_coords
            .iter()
            .enumerate()
            .filter(|(j, _)| point_count >> j & 1 == 1)
            .map(|(_, p)| p)
            .chain(
                self.y_transform
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| macro_y >> j & 1 == 1)
                    .map(|(_, p)| p),
            )
            .fold(base, |a, b| (a.0 ^ b.0, a.1 ^ b.1));

        folded
    }
}
