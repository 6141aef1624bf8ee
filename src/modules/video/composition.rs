use crate::infrastructure::transcoder::filter::{FilterGraphSpec, FilterNode};

/// Side length of the square the video is cropped to and the overlay is scaled to.
pub const FRAME_SIZE: u32 = 500;

pub const OUTPUT_NAME: &str = "output.mp4";

/// Crop the video (input 0) to a square, scale the overlay (input 1) to the
/// same square, and lay the overlay over the video at the top-left corner.
pub const OVERLAY_COMPOSITION: FilterGraphSpec = FilterGraphSpec {
    nodes: &[
        FilterNode {
            filter: "crop",
            options: &[("w", FRAME_SIZE), ("h", FRAME_SIZE), ("x", 0), ("y", 0)],
            inputs: &["0:v"],
            outputs: &["cropped"],
        },
        FilterNode {
            filter: "scale",
            options: &[("w", FRAME_SIZE), ("h", FRAME_SIZE)],
            inputs: &["1:v"],
            outputs: &["scaled"],
        },
        FilterNode {
            filter: "overlay",
            options: &[("x", 0), ("y", 0)],
            inputs: &["cropped", "scaled"],
            outputs: &[],
        },
    ],
    output: OUTPUT_NAME,
};
