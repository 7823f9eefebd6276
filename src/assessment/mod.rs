//! The assessment stages that follow the gap test.

pub mod personality;
pub mod report;
pub mod technical;
