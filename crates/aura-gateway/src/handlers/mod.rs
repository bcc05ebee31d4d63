pub mod analyze;
pub mod status;

pub use analyze::analyze_patterns;
pub use status::status;
