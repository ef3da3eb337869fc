//! Ambient plumbing shared by DevSuite binaries: configuration and tracing.

pub mod config;
pub mod tracing;
