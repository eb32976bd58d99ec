//! C API for swizzling from other languages.
//!
//! Unlike the safe API, these functions write into caller allocated buffers.
//! Use the size functions to determine the required buffer sizes.
use crate::{blockdepth::block_depth, swizzle::swizzle_inner, BlockHeight};

fn valid_block_height(value: usize) -> BlockHeight {
    // Invalid block heights are a caller contract violation rather than a runtime error.
    BlockHeight::new(value).expect("block height must be one of 1, 2, 4, 8, 16, or 32")
}

/// Swizzles the bytes from `source` into `destination` using the block linear swizzling algorithm.
/// See the safe alternative [swizzle_block_linear](crate::swizzle::swizzle_block_linear).
/// # Panics
/// Panics if `block_height` is not a supported block height.
/// # Safety
/// `source` and `source_len` should refer to an array with at least as many bytes as the result of
/// [deswizzled_mip_size](crate::swizzle::deswizzled_mip_size).
/// Similarly, `destination` and `destination_len` should refer to an array with at least as many bytes
/// as the result of [swizzled_mip_size](crate::swizzle::swizzled_mip_size).
#[no_mangle]
pub unsafe extern "C" fn swizzle_block_linear(
    width: usize,
    height: usize,
    depth: usize,
    source: *const u8,
    source_len: usize,
    destination: *mut u8,
    destination_len: usize,
    block_height: usize,
    bytes_per_pixel: usize,
) {
    let source = std::slice::from_raw_parts(source, source_len);
    let destination = std::slice::from_raw_parts_mut(destination, destination_len);

    swizzle_inner::<false>(
        width,
        height,
        depth,
        source,
        destination,
        valid_block_height(block_height) as usize,
        block_depth(depth),
        bytes_per_pixel,
    )
}

/// Deswizzles the bytes from `source` into `destination` using the block linear swizzling algorithm.
/// See the safe alternative [deswizzle_block_linear](crate::swizzle::deswizzle_block_linear).
/// # Panics
/// Panics if `block_height` is not a supported block height.
/// # Safety
/// `source` and `source_len` should refer to an array with at least as many bytes as the result of
/// [swizzled_mip_size](crate::swizzle::swizzled_mip_size).
/// Similarly, `destination` and `destination_len` should refer to an array with at least as many bytes
/// as the result of [deswizzled_mip_size](crate::swizzle::deswizzled_mip_size).
#[no_mangle]
pub unsafe extern "C" fn deswizzle_block_linear(
    width: usize,
    height: usize,
    depth: usize,
    source: *const u8,
    source_len: usize,
    destination: *mut u8,
    destination_len: usize,
    block_height: usize,
    bytes_per_pixel: usize,
) {
    let source = std::slice::from_raw_parts(source, source_len);
    let destination = std::slice::from_raw_parts_mut(destination, destination_len);

    swizzle_inner::<true>(
        width,
        height,
        depth,
        source,
        destination,
        valid_block_height(block_height) as usize,
        block_depth(depth),
        bytes_per_pixel,
    )
}

/// See [swizzled_mip_size](crate::swizzle::swizzled_mip_size).
/// # Panics
/// Panics if `block_height` is not a supported block height.
#[no_mangle]
pub extern "C" fn swizzled_mip_size(
    width: usize,
    height: usize,
    depth: usize,
    block_height: usize,
    bytes_per_pixel: usize,
) -> usize {
    crate::swizzle::swizzled_mip_size(
        width,
        height,
        depth,
        valid_block_height(block_height),
        bytes_per_pixel,
    )
}

/// See [deswizzled_mip_size](crate::swizzle::deswizzled_mip_size).
#[no_mangle]
pub extern "C" fn deswizzled_mip_size(
    width: usize,
    height: usize,
    depth: usize,
    bytes_per_pixel: usize,
) -> usize {
    crate::swizzle::deswizzled_mip_size(width, height, depth, bytes_per_pixel)
}

/// See [block_height_mip0](crate::block_height_mip0).
#[no_mangle]
pub extern "C" fn block_height_mip0(height: usize) -> usize {
    crate::block_height_mip0(height) as usize
}

/// See [mip_block_height](crate::mip_block_height).
/// # Panics
/// Panics if `block_height_mip0` is not a supported block height.
#[no_mangle]
pub extern "C" fn mip_block_height(mip_height: usize, block_height_mip0: usize) -> usize {
    crate::mip_block_height(mip_height, valid_block_height(block_height_mip0)) as usize
}
