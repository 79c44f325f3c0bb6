//! 3DS (CTR) texture tiling.
//!
//! The PICA200 stores textures in 8x8 macro tiles laid out in Z-order, with
//! dimensions padded to powers of two and an optional whole-image
//! orientation applied on top.

use crate::graphics::swizzle::MasterSwizzle;

/// Post-transform applied after the base Z-order address, keyed by the
/// orientation flag found in CTR texture headers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    None,
    YFlip,
    Rotate90,
    Transpose,
}

impl Orientation {
    /// Maps the raw header flag (0 / 2 / 4 / 8) onto an orientation.
    /// Unknown values behave like 0, matching the hardware's fallback.
    pub fn from_flag(flag: u8) -> Self {
        match flag {
            8 => Orientation::Transpose,
            4 => Orientation::Rotate90,
            2 => Orientation::YFlip,
            _ => Orientation::None,
        }
    }
}

pub struct CtrSwizzle {
    width: u32,
    height: u32,
    orientation: Orientation,
    z_order: MasterSwizzle,
}

impl CtrSwizzle {
    pub fn new(width: u32, height: u32, orientation: Orientation, to_power_of_2: bool) -> Self {
        let width = if to_power_of_2 {
            width.next_power_of_two()
        } else {
            width
        };
        let height = if to_power_of_2 {
            height.next_power_of_two()
        } else {
            height
        };

        // Rotated/transposed images are packed along their height instead.
        let stride = match orientation {
            Orientation::None | Orientation::YFlip => width,
            Orientation::Rotate90 | Orientation::Transpose => height,
        };

        let z_order = MasterSwizzle::new(
            stride,
            (0, 0),
            vec![(1, 0), (0, 1), (2, 0), (0, 2), (4, 0), (0, 4)],
            Vec::new(),
        );

        CtrSwizzle {
            width,
            height,
            orientation,
            z_order,
        }
    }

    /// Padded width the swizzle addresses.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Padded height the swizzle addresses.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Maps a sequential (row-major) point to its storage coordinate.
    pub fn get(&self, point: (u32, u32)) -> (u32, u32) {
        let point_count = point.1 * self.width + point.0;
        let (x, y) = self.z_order.get(point_count);

        match self.orientation {
            Orientation::Transpose => (y, x),
            Orientation::Rotate90 => (y, self.height - 1 - x),
            Orientation::YFlip => (x, self.height - 1 - y),
            Orientation::None => (x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn points(swizzle: &CtrSwizzle) -> Vec<(u32, u32)> {
        let (w, h) = (swizzle.width(), swizzle.height());
        (0..w * h)
            .map(|i| swizzle.get((i % w, i / w)))
            .collect()
    }

    #[test]
    fn dimensions_pad_to_powers_of_two() {
        let swizzle = CtrSwizzle::new(200, 120, Orientation::None, true);
        assert_eq!(swizzle.width(), 256);
        assert_eq!(swizzle.height(), 128);

        let unpadded = CtrSwizzle::new(200, 120, Orientation::None, false);
        assert_eq!(unpadded.width(), 200);
        assert_eq!(unpadded.height(), 120);
    }

    #[test]
    fn default_orientation_is_z_order() {
        let swizzle = CtrSwizzle::new(8, 8, Orientation::None, true);
        assert_eq!(swizzle.get((0, 0)), (0, 0));
        assert_eq!(swizzle.get((1, 0)), (1, 0));
        assert_eq!(swizzle.get((2, 0)), (0, 1));
        assert_eq!(swizzle.get((3, 0)), (1, 1));
        assert_eq!(swizzle.get((4, 0)), (2, 0));
    }

    #[test]
    fn every_orientation_stays_bijective() {
        for orientation in [
            Orientation::None,
            Orientation::YFlip,
            Orientation::Rotate90,
            Orientation::Transpose,
        ] {
            let swizzle = CtrSwizzle::new(16, 16, orientation, true);
            let unique: HashSet<_> = points(&swizzle).into_iter().collect();
            assert_eq!(unique.len(), 256, "{:?} lost addresses", orientation);
            assert!(unique.iter().all(|&(x, y)| x < 16 && y < 16));
        }
    }

    #[test]
    fn y_flip_mirrors_vertically() {
        let plain = CtrSwizzle::new(8, 8, Orientation::None, true);
        let flipped = CtrSwizzle::new(8, 8, Orientation::YFlip, true);
        for i in 0..64 {
            let p = (i % 8, i / 8);
            let (x, y) = plain.get(p);
            assert_eq!(flipped.get(p), (x, 7 - y));
        }
    }

    #[test]
    fn transpose_swaps_axes() {
        let plain = CtrSwizzle::new(8, 8, Orientation::None, true);
        let transposed = CtrSwizzle::new(8, 8, Orientation::Transpose, true);
        for i in 0..64 {
            let p = (i % 8, i / 8);
            let (x, y) = plain.get(p);
            assert_eq!(transposed.get(p), (y, x));
        }
    }

    #[test]
    fn orientation_flags_decode() {
        assert_eq!(Orientation::from_flag(0), Orientation::None);
        assert_eq!(Orientation::from_flag(2), Orientation::YFlip);
        assert_eq!(Orientation::from_flag(4), Orientation::Rotate90);
        assert_eq!(Orientation::from_flag(8), Orientation::Transpose);
        assert_eq!(Orientation::from_flag(7), Orientation::None);
    }
}
