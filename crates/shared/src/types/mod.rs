//! Common types used across the application.

pub mod id;
pub mod pagination;
pub mod points;
pub mod timestamp;

pub use id::*;
pub use pagination::{PageRequest, PageResponse};
pub use points::Points;
