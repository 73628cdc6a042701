pub mod constants;
pub mod error;
pub mod logging;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod types;
