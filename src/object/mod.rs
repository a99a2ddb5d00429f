//! Object references and identifier classification

pub mod classifier;
pub mod reference;

// Re-export main functionality
pub use classifier::{classify, normalize};
pub use reference::ObjectReference;
