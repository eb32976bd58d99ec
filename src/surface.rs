//! Functions for working with surfaces stored in a combined buffer for all array layers and mipmaps.
//!
//! It's common for texture surfaces to be represented
//! as a single allocated region of memory that contains all array layers and mipmaps.
//! This also applies to the swizzled surfaces used for textures on the Tegra X1.
//!
//! Use [deswizzle_surface] for reading a swizzled surface into a single combined `Vec<u8>`.
//! The resulting dense layout is what DDS files and modern graphics APIs like Vulkan expect
//! when initializing all array layers and mipmaps in a single call.
//!
//! Use [swizzle_surface] for the opposite conversion from a combined buffer
//! to the layout expected by texture file formats for games targeting the Tegra X1.
//!
//! # Layout
//! Array layers and mipmaps are ordered by layer and then mipmap.
//! A surface with `L` layers and `M` mipmaps would have the following layout.
/*!
```no_compile
Layer 0 Mip 0
Layer 0 Mip 1
...
Layer 0 Mip M-1
Layer 1 Mip 0
Layer 1 Mip 1
...
Layer L-1 Mip M-1
```
*/
//! The convention is for the deswizzled layout to be tightly packed.
//! Swizzled surfaces add alignment between array layers.
use std::{cmp::max, num::NonZeroUsize};

use crate::{
    arrays::align_layer_size,
    blockdepth::{block_depth, mip_block_depth},
    div_round_up, mip_block_height,
    swizzle::{deswizzled_mip_size, swizzle_inner, swizzled_mip_size},
    BlockHeight, SwizzleError,
};

/// The dimensions of a compressed block in pixels. Compressed block sizes are usually 4x4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDim {
    /// The width of the block in pixels.
    pub width: NonZeroUsize,
    /// The height of the block in pixels.
    pub height: NonZeroUsize,
    /// The depth of the block in pixels.
    pub depth: NonZeroUsize,
}

impl BlockDim {
    /// A 1x1x1 block for formats that do not use block compression like R8G8B8A8.
    pub fn uncompressed() -> Self {
        BlockDim {
            width: NonZeroUsize::new(1).unwrap(),
            height: NonZeroUsize::new(1).unwrap(),
            depth: NonZeroUsize::new(1).unwrap(),
        }
    }

    /// A 4x4x1 compressed block. This includes any of the BCN formats like BC1, BC3, or BC7.
    /// This also includes DXT1, DXT3, and DXT5.
    pub fn block_4x4() -> Self {
        BlockDim {
            width: NonZeroUsize::new(4).unwrap(),
            height: NonZeroUsize::new(4).unwrap(),
            depth: NonZeroUsize::new(1).unwrap(),
        }
    }
}

// 3D textures stack GOBs in z, so they never stack GOBs in y.
// 2D surfaces can infer the block height if not specified.
fn base_block_height(
    height: usize,
    depth: usize,
    block_dim: BlockDim,
    block_height_mip0: Option<BlockHeight>,
) -> BlockHeight {
    if depth == 1 {
        block_height_mip0.unwrap_or_else(|| {
            crate::block_height_mip0(div_round_up(height, block_dim.height.get()))
        })
    } else {
        BlockHeight::One
    }
}

/// Swizzles all the array layers and mipmaps in `source` using the block linear algorithm
/// to a combined vector with appropriate layer alignment.
///
/// Returns [SwizzleError::NotEnoughData] if `source` has fewer bytes
/// than the result of [deswizzled_surface_size].
///
/// Set `block_height_mip0` to [None] to infer the block height from the specified dimensions.
/// # Examples
/**
```rust
use blocklinear::BlockHeight;
use blocklinear::surface::{deswizzled_surface_size, swizzle_surface, BlockDim};

# fn main() -> Result<(), blocklinear::SwizzleError> {
let width = 256;
let height = 256;
# let data = vec![0u8; deswizzled_surface_size(width, height, 1, BlockDim::uncompressed(), 4, 9, 6)];
// Swizzle a cube map with mipmaps from a combined buffer like a DDS file.
let swizzled = swizzle_surface(
    width,
    height,
    1,
    &data,
    BlockDim::uncompressed(),
    None,
    4,
    9,
    6,
)?;
# Ok(())
# }
```
*/
pub fn swizzle_surface(
    width: usize,
    height: usize,
    depth: usize,
    source: &[u8],
    block_dim: BlockDim,
    block_height_mip0: Option<BlockHeight>,
    bytes_per_pixel: usize,
    mipmap_count: usize,
    layer_count: usize,
) -> Result<Vec<u8>, SwizzleError> {
    swizzle_surface_inner::<false>(
        width,
        height,
        depth,
        source,
        block_dim,
        block_height_mip0,
        bytes_per_pixel,
        mipmap_count,
        layer_count,
    )
}

/// Deswizzles all the array layers and mipmaps in `source` using the block linear algorithm
/// to a new vector without any padding between layers or mipmaps.
///
/// Returns [SwizzleError::NotEnoughData] if `source` has fewer bytes
/// than the result of [swizzled_surface_size].
///
/// Set `block_height_mip0` to [None] to infer the block height from the specified dimensions.
/// # Examples
/**
```rust
use blocklinear::BlockHeight;
use blocklinear::surface::{deswizzle_surface, swizzled_surface_size, BlockDim};

# fn main() -> Result<(), blocklinear::SwizzleError> {
let width = 256;
let height = 256;
# let data = vec![0u8; swizzled_surface_size(width, height, 1, BlockDim::uncompressed(), None, 4, 9, 6)];
// Deswizzle a cube map with mipmaps into a tightly packed buffer.
let deswizzled = deswizzle_surface(
    width,
    height,
    1,
    &data,
    BlockDim::uncompressed(),
    None,
    4,
    9,
    6,
)?;
# Ok(())
# }
```
*/
pub fn deswizzle_surface(
    width: usize,
    height: usize,
    depth: usize,
    source: &[u8],
    block_dim: BlockDim,
    block_height_mip0: Option<BlockHeight>,
    bytes_per_pixel: usize,
    mipmap_count: usize,
    layer_count: usize,
) -> Result<Vec<u8>, SwizzleError> {
    swizzle_surface_inner::<true>(
        width,
        height,
        depth,
        source,
        block_dim,
        block_height_mip0,
        bytes_per_pixel,
        mipmap_count,
        layer_count,
    )
}

fn swizzle_surface_inner<const DESWIZZLE: bool>(
    width: usize,
    height: usize,
    depth: usize,
    source: &[u8],
    block_dim: BlockDim,
    block_height_mip0: Option<BlockHeight>,
    bytes_per_pixel: usize,
    mipmap_count: usize,
    layer_count: usize,
) -> Result<Vec<u8>, SwizzleError> {
    let swizzled_size = swizzled_surface_size(
        width,
        height,
        depth,
        block_dim,
        block_height_mip0,
        bytes_per_pixel,
        mipmap_count,
        layer_count,
    );
    let deswizzled_size = deswizzled_surface_size(
        width,
        height,
        depth,
        block_dim,
        bytes_per_pixel,
        mipmap_count,
        layer_count,
    );

    let (surface_size, expected_size) = if DESWIZZLE {
        (deswizzled_size, swizzled_size)
    } else {
        (swizzled_size, deswizzled_size)
    };

    // Validate the source length before allocating.
    // This reduces potential out of memory panics.
    if source.len() < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: source.len(),
        });
    }

    // Assume the calculated size is accurate, so don't reallocate later.
    let mut result = vec![0u8; surface_size];

    let block_height_mip0 = base_block_height(height, depth, block_dim, block_height_mip0);
    let block_depth_mip0 = block_depth(depth);

    let mut src_offset = 0;
    let mut dst_offset = 0;
    for _ in 0..layer_count {
        for mip in 0..mipmap_count {
            let mip_width = max(div_round_up(width >> mip, block_dim.width.get()), 1);
            let mip_height = max(div_round_up(height >> mip, block_dim.height.get()), 1);
            let mip_depth = max(div_round_up(depth >> mip, block_dim.depth.get()), 1);

            let mip_block_height = mip_block_height(mip_height, block_height_mip0);
            let mip_block_depth = mip_block_depth(mip_depth, block_depth_mip0);

            swizzle_mipmap::<DESWIZZLE>(
                mip_width,
                mip_height,
                mip_depth,
                mip_block_height,
                mip_block_depth,
                bytes_per_pixel,
                source,
                &mut src_offset,
                &mut result,
                &mut dst_offset,
            )?;
        }

        // Only the swizzled side needs alignment between array layers.
        // The deswizzled layout stays tightly packed.
        if layer_count > 1 {
            if DESWIZZLE {
                src_offset = align_layer_size(src_offset, height, depth, block_height_mip0, 1);
            } else {
                dst_offset = align_layer_size(dst_offset, height, depth, block_height_mip0, 1);
            }
        }
    }

    Ok(result)
}

fn swizzle_mipmap<const DESWIZZLE: bool>(
    width: usize,
    height: usize,
    depth: usize,
    block_height: BlockHeight,
    block_depth: usize,
    bytes_per_pixel: usize,
    source: &[u8],
    src_offset: &mut usize,
    dst: &mut [u8],
    dst_offset: &mut usize,
) -> Result<(), SwizzleError> {
    let swizzled_size = swizzled_mip_size(width, height, depth, block_height, bytes_per_pixel);
    let deswizzled_size = deswizzled_mip_size(width, height, depth, bytes_per_pixel);

    // The surface level validation should already cover this,
    // but truncated sources must never reach the permutation itself.
    let input_size = if DESWIZZLE {
        swizzled_size
    } else {
        deswizzled_size
    };
    if source.len() < *src_offset + input_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size: *src_offset + input_size,
            actual_size: source.len(),
        });
    }

    // Swizzle the data and advance both cursors to the next mip.
    swizzle_inner::<DESWIZZLE>(
        width,
        height,
        depth,
        &source[*src_offset..],
        &mut dst[*dst_offset..],
        block_height as usize,
        block_depth,
        bytes_per_pixel,
    );

    if DESWIZZLE {
        *src_offset += swizzled_size;
        *dst_offset += deswizzled_size;
    } else {
        *src_offset += deswizzled_size;
        *dst_offset += swizzled_size;
    }

    Ok(())
}

/// Calculates the size in bytes for the swizzled data for the given surface.
/// Compare with [deswizzled_surface_size].
///
/// Dimensions should be in pixels.
///
/// Set `block_height_mip0` to [None] to infer the block height from the specified dimensions.
pub fn swizzled_surface_size(
    width: usize,
    height: usize,
    depth: usize,
    block_dim: BlockDim,
    block_height_mip0: Option<BlockHeight>,
    bytes_per_pixel: usize,
    mipmap_count: usize,
    layer_count: usize,
) -> usize {
    let block_height_mip0 = base_block_height(height, depth, block_dim, block_height_mip0);

    let mut layer_size = 0;
    for mip in 0..mipmap_count {
        let mip_width = max(div_round_up(width >> mip, block_dim.width.get()), 1);
        let mip_height = max(div_round_up(height >> mip, block_dim.height.get()), 1);
        let mip_depth = max(div_round_up(depth >> mip, block_dim.depth.get()), 1);
        let mip_block_height = mip_block_height(mip_height, block_height_mip0);

        layer_size += swizzled_mip_size(
            mip_width,
            mip_height,
            mip_depth,
            mip_block_height,
            bytes_per_pixel,
        );
    }

    if layer_count > 1 {
        // Only the alignment between array layers matters.
        align_layer_size(layer_size, height, depth, block_height_mip0, 1) * layer_count
    } else {
        layer_size
    }
}

/// Calculates the size in bytes for the deswizzled data for the given surface.
/// Compare with [swizzled_surface_size].
///
/// Dimensions should be in pixels.
pub fn deswizzled_surface_size(
    width: usize,
    height: usize,
    depth: usize,
    block_dim: BlockDim,
    bytes_per_pixel: usize,
    mipmap_count: usize,
    layer_count: usize,
) -> usize {
    let mut layer_size = 0;
    for mip in 0..mipmap_count {
        let mip_width = max(div_round_up(width >> mip, block_dim.width.get()), 1);
        let mip_height = max(div_round_up(height >> mip, block_dim.height.get()), 1);
        let mip_depth = max(div_round_up(depth >> mip, block_dim.depth.get()), 1);
        layer_size += deswizzled_mip_size(mip_width, mip_height, mip_depth, bytes_per_pixel);
    }

    layer_size * layer_count
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut rng: StdRng = SeedableRng::from_seed([13u8; 32]);
        (0..len).map(|_| rng.gen_range::<u8, _>(0..=255)).collect()
    }

    // Helper functions to shorten the size test cases.
    fn swizzle_length_3d(
        width: usize,
        height: usize,
        depth: usize,
        source_length: usize,
        is_compressed: bool,
        bpp: usize,
        mipmap_count: usize,
        layer_count: usize,
    ) -> usize {
        swizzle_surface(
            width,
            height,
            depth,
            &vec![0u8; source_length],
            if is_compressed {
                BlockDim::block_4x4()
            } else {
                BlockDim::uncompressed()
            },
            None,
            bpp,
            mipmap_count,
            layer_count,
        )
        .unwrap()
        .len()
    }

    fn deswizzle_length_3d(
        width: usize,
        height: usize,
        depth: usize,
        source_length: usize,
        is_compressed: bool,
        bpp: usize,
        mipmap_count: usize,
        layer_count: usize,
    ) -> usize {
        deswizzle_surface(
            width,
            height,
            depth,
            &vec![0u8; source_length],
            if is_compressed {
                BlockDim::block_4x4()
            } else {
                BlockDim::uncompressed()
            },
            None,
            bpp,
            mipmap_count,
            layer_count,
        )
        .unwrap()
        .len()
    }

    fn swizzle_length(
        width: usize,
        height: usize,
        source_length: usize,
        is_compressed: bool,
        bpp: usize,
        mipmap_count: usize,
        layer_count: usize,
    ) -> usize {
        swizzle_length_3d(
            width,
            height,
            1,
            source_length,
            is_compressed,
            bpp,
            mipmap_count,
            layer_count,
        )
    }

    fn deswizzle_length(
        width: usize,
        height: usize,
        source_length: usize,
        is_compressed: bool,
        bpp: usize,
        mipmap_count: usize,
        layer_count: usize,
    ) -> usize {
        deswizzle_length_3d(
            width,
            height,
            1,
            source_length,
            is_compressed,
            bpp,
            mipmap_count,
            layer_count,
        )
    }

    // Expected swizzled sizes are taken from the footers of nutexb files
    // in Smash Ultimate. Expected deswizzled sizes are the product of the
    // mipmap size sum and the layer count.
    #[test]
    fn swizzle_surface_nutexb_lengths() {
        assert_eq!(12800, swizzle_length(100, 100, 6864, true, 8, 7, 1));
        assert_eq!(24064, swizzle_length(128, 32, 21852, false, 4, 8, 1));
        assert_eq!(17920, swizzle_length(256, 32, 11024, true, 16, 9, 1));
        assert_eq!(26624, swizzle_length(64, 512, 21896, true, 8, 10, 1));
        assert_eq!(2048, swizzle_length(4, 24, 384, false, 4, 1, 1));
    }

    #[test]
    fn deswizzle_surface_nutexb_lengths() {
        assert_eq!(6864, deswizzle_length(100, 100, 12800, true, 8, 7, 1));
        assert_eq!(21852, deswizzle_length(128, 32, 24064, false, 4, 8, 1));
        assert_eq!(11024, deswizzle_length(256, 32, 17920, true, 16, 9, 1));
        assert_eq!(21896, deswizzle_length(64, 512, 26624, true, 8, 10, 1));
        assert_eq!(384, deswizzle_length(4, 24, 2048, false, 4, 1, 1));
    }

    #[test]
    fn swizzle_surface_array_lengths() {
        assert_eq!(6144, swizzle_length(16, 16, 6144, false, 4, 1, 6));
        assert_eq!(3072, swizzle_length(16, 16, 768, true, 8, 1, 6));
        assert_eq!(15360, swizzle_length(16, 16, 2208, true, 16, 5, 6));
        assert_eq!(147456, swizzle_length(128, 128, 131232, true, 16, 8, 6));
    }

    #[test]
    fn deswizzle_surface_array_lengths() {
        assert_eq!(6144, deswizzle_length(16, 16, 6144, false, 4, 1, 6));
        assert_eq!(768, deswizzle_length(16, 16, 3072, true, 8, 1, 6));
        assert_eq!(2208, deswizzle_length(16, 16, 15360, true, 16, 5, 6));
        assert_eq!(131232, deswizzle_length(128, 128, 147456, true, 16, 8, 6));
    }

    #[test]
    fn surface_sizes_match_walker_output() {
        let width = 128;
        let height = 128;
        let mipmap_count = 8;
        let layer_count = 6;

        let deswizzled_size = deswizzled_surface_size(
            width,
            height,
            1,
            BlockDim::block_4x4(),
            16,
            mipmap_count,
            layer_count,
        );
        let swizzled_size = swizzled_surface_size(
            width,
            height,
            1,
            BlockDim::block_4x4(),
            None,
            16,
            mipmap_count,
            layer_count,
        );

        let swizzled = swizzle_surface(
            width,
            height,
            1,
            &vec![0u8; deswizzled_size],
            BlockDim::block_4x4(),
            None,
            16,
            mipmap_count,
            layer_count,
        )
        .unwrap();
        assert_eq!(swizzled_size, swizzled.len());

        let deswizzled = deswizzle_surface(
            width,
            height,
            1,
            &swizzled,
            BlockDim::block_4x4(),
            None,
            16,
            mipmap_count,
            layer_count,
        )
        .unwrap();
        assert_eq!(deswizzled_size, deswizzled.len());
    }

    #[test]
    fn swizzle_deswizzle_surface_arrays_mipmaps() {
        let input = random_bytes(deswizzled_surface_size(
            128,
            128,
            1,
            BlockDim::block_4x4(),
            16,
            8,
            6,
        ));

        let swizzled =
            swizzle_surface(128, 128, 1, &input, BlockDim::block_4x4(), None, 16, 8, 6).unwrap();
        let deswizzled =
            deswizzle_surface(128, 128, 1, &swizzled, BlockDim::block_4x4(), None, 16, 8, 6)
                .unwrap();

        assert_eq!(input, deswizzled);
    }

    #[test]
    fn swizzle_deswizzle_surface_layers_explicit_block_height() {
        // Two layers of 256x256 BC7 data with the block height given by the caller.
        let input = random_bytes(2 * 65536);

        let swizzled = swizzle_surface(
            256,
            256,
            1,
            &input,
            BlockDim::block_4x4(),
            Some(BlockHeight::Sixteen),
            16,
            1,
            2,
        )
        .unwrap();
        assert_eq!(131072, swizzled.len());

        let deswizzled = deswizzle_surface(
            256,
            256,
            1,
            &swizzled,
            BlockDim::block_4x4(),
            Some(BlockHeight::Sixteen),
            16,
            1,
            2,
        )
        .unwrap();
        assert_eq!(input, deswizzled);
    }

    #[test]
    fn swizzle_deswizzle_surface_3d_mipmaps() {
        let input = random_bytes(deswizzled_surface_size(
            16,
            16,
            16,
            BlockDim::uncompressed(),
            4,
            4,
            1,
        ));

        let swizzled =
            swizzle_surface(16, 16, 16, &input, BlockDim::uncompressed(), None, 4, 4, 1).unwrap();
        let deswizzled =
            deswizzle_surface(16, 16, 16, &swizzled, BlockDim::uncompressed(), None, 4, 4, 1)
                .unwrap();

        assert_eq!(input, deswizzled);
    }

    #[test]
    fn swizzle_surface_not_enough_data() {
        let input = [0, 0, 0, 0];
        let result = swizzle_surface(16, 16, 16, &input, BlockDim::uncompressed(), None, 4, 1, 1);
        assert_eq!(
            Err(SwizzleError::NotEnoughData {
                expected_size: 16384,
                actual_size: 4
            }),
            result
        );
    }

    #[test]
    fn deswizzle_surface_not_enough_data() {
        let input = [0, 0, 0, 0];
        let result = deswizzle_surface(4, 4, 1, &input, BlockDim::uncompressed(), None, 4, 1, 1);
        assert_eq!(
            Err(SwizzleError::NotEnoughData {
                expected_size: 512,
                actual_size: 4
            }),
            result
        );
    }
}
