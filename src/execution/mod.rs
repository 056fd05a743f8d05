// Execution venues
pub mod paper;

pub use paper::PaperExecution;
