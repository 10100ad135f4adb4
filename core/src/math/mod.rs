pub mod crossing;
pub mod stats;
pub mod window;

pub use crossing::CrossingHelper;
pub use stats::StatsHelper;
pub use window::WindowHelper;
