//! Shared test support: in-memory construction of minimal .NET images.

mod builder;

pub use builder::ImageBuilder;
