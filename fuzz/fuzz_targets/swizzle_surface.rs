#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::{Arbitrary, Result, Unstructured};

use blocklinear::surface::BlockDim;

#[derive(Debug)]
struct Input {
    width: usize,
    height: usize,
    depth: usize,
    block_height: blocklinear::BlockHeight,
    bytes_per_pixel: usize,
    mipmap_count: usize,
    layer_count: usize,
    input_size: usize,
}

impl<'a> Arbitrary<'a> for Input {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Input {
            width: u.int_in_range(0..=256)?,
            height: u.int_in_range(0..=256)?,
            depth: u.int_in_range(0..=64)?,
            block_height: u.arbitrary()?,
            bytes_per_pixel: u.int_in_range(0..=32)?,
            mipmap_count: u.int_in_range(0..=32)?,
            layer_count: u.int_in_range(0..=12)?,
            input_size: u.int_in_range(0..=16777216)?,
        })
    }
}

fuzz_target!(|input: Input| {
    let source = vec![0u8; input.input_size];

    // This should never panic even if the input size is incorrect.
    let _ = blocklinear::surface::swizzle_surface(
        input.width,
        input.height,
        input.depth,
        &source,
        BlockDim::block_4x4(),
        Some(input.block_height),
        input.bytes_per_pixel,
        input.mipmap_count,
        input.layer_count,
    );
});
