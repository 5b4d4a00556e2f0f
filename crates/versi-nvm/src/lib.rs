mod backend;
mod client;
mod detection;
mod output;

pub use backend::NvmBackend;
pub use client::NvmClient;
pub use detection::{NvmDetection, default_nvm_dir, detect_nvm, nvm_script};
