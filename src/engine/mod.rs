pub mod progress;
pub mod search;
pub mod stats;
