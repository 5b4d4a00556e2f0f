mod backend;
mod detection;

pub use backend::NBackend;
pub use detection::{NDetection, detect_n};
