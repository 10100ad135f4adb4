pub mod multi;
pub mod single;

pub use multi::{deinterleave, interleave, MultiChannelSample};
pub use single::{span_seconds, Sample};
