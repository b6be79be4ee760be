pub mod progress;
pub mod quote;
