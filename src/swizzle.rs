//! Functions for swizzling and deswizzling a single mip level.
use crate::{
    blockdepth::block_depth, height_in_blocks, width_in_gobs, BlockHeight, SwizzleError,
    GOB_HEIGHT_IN_BYTES, GOB_SIZE_IN_BYTES, GOB_WIDTH_IN_BYTES,
};

// The starting offset within a swizzled GOB for each of its 8 linear rows.
const GOB_ROW_OFFSETS: [usize; GOB_HEIGHT_IN_BYTES] = [0, 16, 64, 80, 128, 144, 192, 208];

/// Swizzles the bytes from `source` using the block linear swizzling algorithm.
///
/// Returns [SwizzleError::NotEnoughData] if `source` has fewer bytes
/// than the result of [deswizzled_mip_size].
/// # Examples
/// Uncompressed formats like R8G8B8A8 can use the width and height in pixels.
/**
```rust
use blocklinear::BlockHeight;
use blocklinear::swizzle::{deswizzled_mip_size, swizzle_block_linear};

let width = 512;
let height = 512;
# let input = vec![0u8; deswizzled_mip_size(width, height, 1, 4)];
let output = swizzle_block_linear(width, height, 1, &input, BlockHeight::Sixteen, 4);
```
 */
/// For compressed formats with multiple pixels in a block, divide the width and height by the block dimensions.
/**
```rust
# use blocklinear::BlockHeight;
# use blocklinear::swizzle::{deswizzled_mip_size, swizzle_block_linear};
// BC7 has 4x4 pixel blocks that each take up 16 bytes.
use blocklinear::div_round_up;

let width = 512;
let height = 512;
# let input = vec![0u8; deswizzled_mip_size(div_round_up(width, 4), div_round_up(height, 4), 1, 16)];
let output = swizzle_block_linear(
    div_round_up(width, 4),
    div_round_up(height, 4),
    1,
    &input,
    BlockHeight::Sixteen,
    16,
);
```
 */
pub fn swizzle_block_linear(
    width: usize,
    height: usize,
    depth: usize,
    source: &[u8],
    block_height: BlockHeight,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>, SwizzleError> {
    // Validate before allocating to avoid spurious out of memory panics.
    let expected_size = deswizzled_mip_size(width, height, depth, bytes_per_pixel);
    if source.len() < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: source.len(),
        });
    }

    let mut destination =
        vec![0u8; swizzled_mip_size(width, height, depth, block_height, bytes_per_pixel)];

    swizzle_inner::<false>(
        width,
        height,
        depth,
        source,
        &mut destination,
        block_height as usize,
        block_depth(depth),
        bytes_per_pixel,
    );
    Ok(destination)
}

/// Deswizzles the bytes from `source` using the block linear swizzling algorithm.
///
/// Returns [SwizzleError::NotEnoughData] if `source` has fewer bytes
/// than the result of [swizzled_mip_size].
/// # Examples
/// Uncompressed formats like R8G8B8A8 can use the width and height in pixels.
/**
```rust
use blocklinear::BlockHeight;
use blocklinear::swizzle::{deswizzle_block_linear, swizzled_mip_size};

let width = 512;
let height = 512;
# let input = vec![0u8; swizzled_mip_size(width, height, 1, BlockHeight::Sixteen, 4)];
let output = deswizzle_block_linear(width, height, 1, &input, BlockHeight::Sixteen, 4);
```
 */
/// For compressed formats with multiple pixels in a block, divide the width and height by the block dimensions.
/**
```rust
# use blocklinear::BlockHeight;
# use blocklinear::swizzle::{deswizzle_block_linear, swizzled_mip_size};
// BC7 has 4x4 pixel blocks that each take up 16 bytes.
use blocklinear::div_round_up;

let width = 512;
let height = 512;
# let input = vec![0u8; swizzled_mip_size(div_round_up(width, 4), div_round_up(height, 4), 1, BlockHeight::Sixteen, 16)];
let output = deswizzle_block_linear(
    div_round_up(width, 4),
    div_round_up(height, 4),
    1,
    &input,
    BlockHeight::Sixteen,
    16,
);
```
 */
pub fn deswizzle_block_linear(
    width: usize,
    height: usize,
    depth: usize,
    source: &[u8],
    block_height: BlockHeight,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>, SwizzleError> {
    let expected_size = swizzled_mip_size(width, height, depth, block_height, bytes_per_pixel);
    if source.len() < expected_size {
        return Err(SwizzleError::NotEnoughData {
            expected_size,
            actual_size: source.len(),
        });
    }

    let mut destination = vec![0u8; deswizzled_mip_size(width, height, depth, bytes_per_pixel)];

    swizzle_inner::<true>(
        width,
        height,
        depth,
        source,
        &mut destination,
        block_height as usize,
        block_depth(depth),
        bytes_per_pixel,
    );
    Ok(destination)
}

/// Calculates the size in bytes for the swizzled data for the given dimensions for the block linear format.
/// The result will always be at least as large as [deswizzled_mip_size]
/// for the same surface parameters.
/// # Examples
/// Uncompressed formats like R8G8B8A8 can use the width and height in pixels.
/**
```rust
use blocklinear::BlockHeight;
use blocklinear::swizzle::swizzled_mip_size;

let width = 256;
let height = 256;
assert_eq!(262144, swizzled_mip_size(width, height, 1, BlockHeight::Sixteen, 4));
```
 */
/// For compressed formats with multiple pixels in a block, divide the width and height by the block dimensions.
/**
```rust
# use blocklinear::BlockHeight;
# use blocklinear::swizzle::swizzled_mip_size;
// BC7 has 4x4 pixel blocks that each take up 16 bytes.
use blocklinear::div_round_up;

let width = 256;
let height = 256;
assert_eq!(
    131072,
    swizzled_mip_size(div_round_up(width, 4), div_round_up(height, 4), 1, BlockHeight::Sixteen, 16)
);
```
 */
pub const fn swizzled_mip_size(
    width: usize,
    height: usize,
    depth: usize,
    block_height: BlockHeight,
    bytes_per_pixel: usize,
) -> usize {
    // Assume each block is 1 GOB wide.
    let width_in_gobs = width_in_gobs(width, bytes_per_pixel);
    let height_in_gobs = height_in_blocks(height, block_height as usize) * block_height as usize;
    let depth_in_gobs = crate::round_up(depth, block_depth(depth));

    width_in_gobs * height_in_gobs * depth_in_gobs * GOB_SIZE_IN_BYTES
}

/// Calculates the size in bytes for the deswizzled data for the given dimensions.
/// Compare with [swizzled_mip_size].
/// # Examples
/// Uncompressed formats like R8G8B8A8 can use the width and height in pixels.
/**
```rust
use blocklinear::swizzle::deswizzled_mip_size;

let width = 256;
let height = 256;
assert_eq!(262144, deswizzled_mip_size(width, height, 1, 4));
```
 */
/// For compressed formats with multiple pixels in a block, divide the width and height by the block dimensions.
/**
```rust
# use blocklinear::swizzle::deswizzled_mip_size;
// BC7 has 4x4 pixel blocks that each take up 16 bytes.
use blocklinear::div_round_up;

let width = 256;
let height = 256;
assert_eq!(
    65536,
    deswizzled_mip_size(div_round_up(width, 4), div_round_up(height, 4), 1, 16)
);
```
 */
pub const fn deswizzled_mip_size(
    width: usize,
    height: usize,
    depth: usize,
    bytes_per_pixel: usize,
) -> usize {
    width * height * depth * bytes_per_pixel
}

// The gob address and slice size functions are adapted from Ryujinx Emulator.
// https://github.com/Ryujinx/Ryujinx/blob/master/Ryujinx.Graphics.Texture/BlockLinearLayout.cs
// License MIT: https://github.com/Ryujinx/Ryujinx/blob/master/LICENSE.txt.
fn slice_size(block_height: usize, block_depth: usize, width_in_gobs: usize, height: usize) -> usize {
    let rob_size = GOB_SIZE_IN_BYTES * block_height * block_depth * width_in_gobs;
    crate::div_round_up(height, block_height * GOB_HEIGHT_IN_BYTES) * rob_size
}

fn gob_address_z(z: usize, block_height: usize, block_depth: usize, slice_size: usize) -> usize {
    // Each "column" of blocks stacks block_depth many blocks in z.
    // block_depth is always a power of two, so the mask is equivalent to z % block_depth.
    (z / block_depth * slice_size) + ((z & (block_depth - 1)) * GOB_SIZE_IN_BYTES * block_height)
}

fn gob_address_y(
    y: usize,
    block_height_in_bytes: usize,
    block_size_in_bytes: usize,
    image_width_in_gobs: usize,
) -> usize {
    let block_y = y / block_height_in_bytes;
    let block_inner_row = y % block_height_in_bytes / GOB_HEIGHT_IN_BYTES;
    block_y * block_size_in_bytes * image_width_in_gobs + block_inner_row * GOB_SIZE_IN_BYTES
}

// Code for offset_x and offset_y adapted from examples in the Tegra TRM page 1187.
fn gob_address_x(x: usize, block_size_in_bytes: usize) -> usize {
    let block_x = x / GOB_WIDTH_IN_BYTES;
    block_x * block_size_in_bytes
}

// Code taken from examples in the Tegra TRM page 1188.
// Return the offset within the GOB for the byte at location (x, y).
fn gob_offset(x: usize, y: usize) -> usize {
    ((x % 64) / 32) * 256 + ((y % 8) / 2) * 64 + ((x % 32) / 16) * 32 + (y % 2) * 16 + (x % 16)
}

pub(crate) fn swizzle_inner<const DESWIZZLE: bool>(
    width: usize,
    height: usize,
    depth: usize,
    source: &[u8],
    destination: &mut [u8],
    block_height: usize,
    block_depth: usize,
    bytes_per_pixel: usize,
) {
    let image_width_in_gobs = width_in_gobs(width, bytes_per_pixel);
    let slice_size = slice_size(block_height, block_depth, image_width_in_gobs, height);

    // Blocks are always one GOB wide for non sparse textures.
    let block_size_in_bytes = GOB_SIZE_IN_BYTES * block_height * block_depth;
    let block_height_in_bytes = GOB_HEIGHT_IN_BYTES * block_height;

    // The bytes per pixel converts pixel coordinates to byte coordinates.
    // This assumes BCN formats pass in their dimensions in blocks rather than pixels.
    let row_size_in_bytes = width * bytes_per_pixel;

    // Swizzling is a mapping from byte coordinates x,y,z -> x',y',z'.
    // Step by a GOB of bytes at a time to enable a tiled optimization approach.
    // GOBs always use the same pattern, so complete 64x8 byte tiles copy entire rows at once.
    // Partially filled GOBs along the right and bottom edges copy byte by byte instead.
    for z0 in 0..depth {
        let offset_z = gob_address_z(z0, block_height, block_depth, slice_size);

        for y0 in (0..height).step_by(GOB_HEIGHT_IN_BYTES) {
            let offset_y = gob_address_y(
                y0,
                block_height_in_bytes,
                block_size_in_bytes,
                image_width_in_gobs,
            );

            for x0 in (0..row_size_in_bytes).step_by(GOB_WIDTH_IN_BYTES) {
                let offset_x = gob_address_x(x0, block_size_in_bytes);

                let gob_address = offset_z + offset_y + offset_x;

                if x0 + GOB_WIDTH_IN_BYTES <= row_size_in_bytes
                    && y0 + GOB_HEIGHT_IN_BYTES <= height
                {
                    let linear_offset = (z0 * height + y0) * row_size_in_bytes + x0;

                    if DESWIZZLE {
                        deswizzle_complete_gob(
                            &mut destination[linear_offset..],
                            &source[gob_address..],
                            row_size_in_bytes,
                        );
                    } else {
                        swizzle_complete_gob(
                            &mut destination[gob_address..],
                            &source[linear_offset..],
                            row_size_in_bytes,
                        );
                    }
                } else {
                    swizzle_partial_gob::<DESWIZZLE>(
                        destination,
                        source,
                        x0,
                        y0,
                        z0,
                        width,
                        height,
                        bytes_per_pixel,
                        gob_address,
                    );
                }
            }
        }
    }
}

// Fall back to a slow implementation that iterates over each byte.
// Bytes outside the surface are left untouched in the destination.
fn swizzle_partial_gob<const DESWIZZLE: bool>(
    destination: &mut [u8],
    source: &[u8],
    x0: usize,
    y0: usize,
    z0: usize,
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
    gob_address: usize,
) {
    let row_size_in_bytes = width * bytes_per_pixel;
    for y in 0..GOB_HEIGHT_IN_BYTES {
        for x in 0..GOB_WIDTH_IN_BYTES {
            if y0 + y < height && x0 + x < row_size_in_bytes {
                let swizzled_offset = gob_address + gob_offset(x, y);
                let linear_offset = (z0 * height + y0 + y) * row_size_in_bytes + x0 + x;

                // Swap the addresses for swizzling vs deswizzling.
                if DESWIZZLE {
                    destination[linear_offset] = source[swizzled_offset];
                } else {
                    destination[swizzled_offset] = source[linear_offset];
                }
            }
        }
    }
}

// An optimized version of gob_offset for an entire GOB worth of bytes.
// The swizzled GOB is a contiguous region of 512 bytes.
// The deswizzled GOB is a 64x8 2D region of memory, so the pitch matters.
fn deswizzle_complete_gob(dst: &mut [u8], src: &[u8], row_size_in_bytes: usize) {
    // Each of the 8 rows splits into fixed 16 byte segments,
    // which the compiler can optimize with SIMD loads and stores.
    for (i, offset) in GOB_ROW_OFFSETS.iter().enumerate() {
        deswizzle_gob_row(dst, row_size_in_bytes * i, src, *offset);
    }
}

fn deswizzle_gob_row(dst: &mut [u8], dst_offset: usize, src: &[u8], src_offset: usize) {
    let dst = &mut dst[dst_offset..];
    let src = &src[src_offset..];
    // Start with the largest offset first to reduce bounds checks.
    dst[48..64].copy_from_slice(&src[288..304]);
    dst[32..48].copy_from_slice(&src[256..272]);
    dst[16..32].copy_from_slice(&src[32..48]);
    dst[0..16].copy_from_slice(&src[0..16]);
}

// The swizzle functions are identical but with the addresses swapped.
fn swizzle_complete_gob(dst: &mut [u8], src: &[u8], row_size_in_bytes: usize) {
    for (i, offset) in GOB_ROW_OFFSETS.iter().enumerate() {
        swizzle_gob_row(dst, *offset, src, row_size_in_bytes * i);
    }
}

fn swizzle_gob_row(dst: &mut [u8], dst_offset: usize, src: &[u8], src_offset: usize) {
    let dst = &mut dst[dst_offset..];
    let src = &src[src_offset..];
    dst[288..304].copy_from_slice(&src[48..64]);
    dst[256..272].copy_from_slice(&src[32..48]);
    dst[32..48].copy_from_slice(&src[16..32]);
    dst[0..16].copy_from_slice(&src[0..16]);
}
