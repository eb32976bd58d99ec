#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::{Arbitrary, Result, Unstructured};

#[derive(Debug)]
struct Input {
    width: usize,
    height: usize,
    block_height: blocklinear::BlockHeight,
    bytes_per_pixel: usize,
    input_size: usize,
}

impl<'a> Arbitrary<'a> for Input {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Input {
            width: u.int_in_range(0..=4096)?,
            height: u.int_in_range(0..=4096)?,
            block_height: u.arbitrary()?,
            bytes_per_pixel: u.int_in_range(0..=32)?,
            input_size: u.int_in_range(0..=16777216)?,
        })
    }
}

fuzz_target!(|input: Input| {
    let swizzled = vec![0u8; input.input_size];

    // This should never panic even if the input size is incorrect.
    let _ = blocklinear::swizzle::deswizzle_block_linear(
        input.width,
        input.height,
        1,
        &swizzled,
        input.block_height,
        input.bytes_per_pixel,
    );
});
