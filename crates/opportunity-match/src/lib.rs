//! Skill/interest matching for student opportunities and the application lifecycle that
//! consumes the ranked output.

pub mod applications;
pub mod config;
pub mod error;
pub mod matching;
pub mod store;
pub mod telemetry;
