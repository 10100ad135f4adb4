pub mod sine;

pub use sine::generate_sine_wave;
