//! # blocklinear
//! blocklinear is an unofficial CPU implementation of the block linear
//! swizzling used for texture surfaces on the NVIDIA Tegra X1.
//!
//! Block linear arranges the bytes of a surface into 64x8 byte tiles of
//! 512 bytes called GOBs ("group of bytes"). GOBs stack vertically into
//! blocks controlled by the [BlockHeight] parameter, and blocks tile the
//! surface in row-major order. Surfaces padded to integral block dimensions
//! may take up more space swizzled than the row-major data they contain.
//!
//! # Getting Started
//! Mipmaps are usually stored in one contiguous region, so deswizzling a
//! surface one mip at a time only requires tracking the starting offset.
//! BC7 compressed data has 4x4 pixel blocks that each take up 16 bytes,
//! so the dimensions are converted with [div_round_up]. Uncompressed
//! formats like R8G8B8A8 can skip these conversions and use the dimensions
//! in pixels directly.
/*!
```rust no_run
use blocklinear::{block_height_mip0, div_round_up, mip_block_height};
use blocklinear::swizzle::{deswizzle_block_linear, swizzled_mip_size};

# fn main() -> Result<(), blocklinear::SwizzleError> {
# let image_data = vec![0u8; 4];
# let width = 128;
# let height = 300;
# let mipmap_count = 5;
// Infer the block height if the file format doesn't store one.
let block_height_mip0 = block_height_mip0(div_round_up(height, 4));

let mut offset = 0;
for mip in 0..mipmap_count {
    let mip_width = std::cmp::max(div_round_up(width >> mip, 4), 1);
    let mip_height = std::cmp::max(div_round_up(height >> mip, 4), 1);

    // The block height shrinks as the mipmaps get smaller.
    let mip_block_height = mip_block_height(mip_height, block_height_mip0);

    let deswizzled_mipmap = deswizzle_block_linear(
        mip_width,
        mip_height,
        1,
        &image_data[offset..],
        mip_block_height,
        16,
    )?;

    offset += swizzled_mip_size(mip_width, mip_height, 1, mip_block_height, 16);
}
# Ok(())
# }
```
*/
//! For surfaces that combine all array layers and mipmaps into a single
//! buffer, use the functions in the [surface] module instead. These handle
//! the per-mip parameters and the alignment between array layers.
use thiserror::Error;

mod arrays;
mod blockdepth;
mod blockheight;

pub mod surface;
pub mod swizzle;

// The C API is compiled out unless explicitly requested.
#[cfg(feature = "ffi")]
pub mod ffi;

pub use blockheight::{block_height_mip0, mip_block_height};

pub(crate) const GOB_WIDTH_IN_BYTES: usize = 64;
pub(crate) const GOB_HEIGHT_IN_BYTES: usize = 8;
pub(crate) const GOB_SIZE_IN_BYTES: usize = GOB_WIDTH_IN_BYTES * GOB_HEIGHT_IN_BYTES;

// Only the values from the Tegra TRM page 1189 table 79 are representable.

/// The height of a block in GOBs where each GOB is 8 bytes tall.
///
/// Texture file formats differ in how they encode this parameter.
/// Some formats store the log2, so a block height of 8 would be stored as 3.
/// For formats that don't store a block height at all, see [block_height_mip0].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum BlockHeight {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
    Sixteen = 16,
    ThirtyTwo = 32,
}

impl BlockHeight {
    /// Attempts to construct a block height from `value`.
    /// Returns [None] if `value` is not a supported block height.
    /// # Examples
    /**
    ```rust
    use blocklinear::BlockHeight;

    assert_eq!(Some(BlockHeight::Eight), BlockHeight::new(8));
    assert_eq!(None, BlockHeight::new(5));
    ```
    */
    pub fn new(value: usize) -> Option<Self> {
        match value {
            1 => Some(BlockHeight::One),
            2 => Some(BlockHeight::Two),
            4 => Some(BlockHeight::Four),
            8 => Some(BlockHeight::Eight),
            16 => Some(BlockHeight::Sixteen),
            32 => Some(BlockHeight::ThirtyTwo),
            _ => None,
        }
    }
}

/// Errors that can occur while swizzling or deswizzling.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum SwizzleError {
    /// The source data does not contain enough bytes.
    /// Deswizzling expects at least [swizzled_mip_size](crate::swizzle::swizzled_mip_size)
    /// or [swizzled_surface_size](crate::surface::swizzled_surface_size) many bytes.
    /// Swizzling expects at least [deswizzled_mip_size](crate::swizzle::deswizzled_mip_size)
    /// or [deswizzled_surface_size](crate::surface::deswizzled_surface_size) many bytes.
    #[error("expected at least {expected_size} bytes but found {actual_size} bytes")]
    NotEnoughData {
        expected_size: usize,
        actual_size: usize,
    },
}

/// Calculates the division of `x` by `d` but rounds up rather than truncating.
///
/// # Examples
/// Use this function when calculating dimensions for block compressed formats like BC7.
/**
```rust
# use blocklinear::div_round_up;
assert_eq!(2, div_round_up(8, 4));
assert_eq!(3, div_round_up(10, 4));
```
 */
/// Uncompressed formats are equivalent to 1x1 pixel blocks,
/// so the call to [div_round_up] can simply be omitted.
/**
```rust
# use blocklinear::div_round_up;
let n = 10;
assert_eq!(n, div_round_up(n, 1));
```
 */
#[inline]
pub const fn div_round_up(x: usize, d: usize) -> usize {
    (x + d - 1) / d
}

pub(crate) const fn round_up(x: usize, n: usize) -> usize {
    div_round_up(x, n) * n
}

pub(crate) const fn width_in_gobs(width: usize, bytes_per_pixel: usize) -> usize {
    div_round_up(width * bytes_per_pixel, GOB_WIDTH_IN_BYTES)
}

pub(crate) const fn height_in_blocks(height: usize, block_height: usize) -> usize {
    // Each block is block_height many GOBs tall.
    div_round_up(height, block_height * GOB_HEIGHT_IN_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_in_gobs_bc7() {
        assert_eq!(20, width_in_gobs(320 / 4, 16));
    }

    #[test]
    fn height_in_blocks_rgba() {
        assert_eq!(1, height_in_blocks(8, 1));
        assert_eq!(2, height_in_blocks(10, 1));
        assert_eq!(2, height_in_blocks(256, 16));
    }

    #[test]
    fn round_up_block_depth() {
        assert_eq!(8, round_up(8, 4));
        assert_eq!(12, round_up(9, 4));
    }
}
