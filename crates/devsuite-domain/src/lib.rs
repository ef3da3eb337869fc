//! Domain types shared across DevSuite services.
//!
//! This crate contains only pure types and rules with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; `infra/` maps to and from them.

pub mod calendar;
pub mod code;
pub mod entity;
pub mod id;
pub mod money;
pub mod status;
pub mod validation;
