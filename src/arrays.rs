// Layer alignment code ported from C# implementations of driver code by gdkchan.
// The code can be found here: https://github.com/KillzXGaming/Switch-Toolbox/pull/419#issuecomment-959980096
// This comes from the Ryujinx emulator: https://github.com/Ryujinx/Ryujinx/blob/master/LICENSE.txt.
use crate::{BlockHeight, GOB_SIZE_IN_BYTES};

// Pads a layer's swizzled size to the alignment expected between array layers.
// Blocks are assumed to be one GOB wide (gob_blocks_in_tile_x = 1).
// Sparse tilings with wider tiles in x aren't supported.
pub(crate) fn align_layer_size(
    layer_size: usize,
    height: usize,
    depth: usize,
    block_height_mip0: BlockHeight,
    depth_in_gobs: usize,
) -> usize {
    let mut gob_height = block_height_mip0 as usize;
    let mut gob_depth = depth_in_gobs;

    while height <= (gob_height / 2) * 8 && gob_height > 1 {
        gob_height /= 2;
    }

    while depth <= gob_depth / 2 && gob_depth > 1 {
        gob_depth /= 2;
    }

    let block_of_gobs_size = gob_height * gob_depth * GOB_SIZE_IN_BYTES;
    let size_in_blocks_of_gobs = layer_size / block_of_gobs_size;

    if layer_size != size_in_blocks_of_gobs * block_of_gobs_size {
        (size_in_blocks_of_gobs + 1) * block_of_gobs_size
    } else {
        layer_size
    }
}
