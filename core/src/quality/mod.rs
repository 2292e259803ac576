pub mod color;
pub mod scale;

pub use color::Rgb;
pub use scale::{QualityLevel, QualityScale, FALLBACK_COLOR};
