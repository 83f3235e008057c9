//! The knowledge-resolution pipeline.
//!
//! Pure decision steps live in their own modules and are wired together by
//! [`QueryOrchestrator`]:
//!
//! - [`intent`] - keyword intent classification
//! - [`resolver`] - company name resolution, using [`similarity`]
//! - [`completeness`] - whether a stored record answers the request
//! - [`quality`] - whether a scraped record may be stored
//! - [`render`] - templated answers

pub mod completeness;
pub mod intent;
pub mod orchestrator;
pub mod quality;
pub mod render;
pub mod resolver;
pub mod similarity;

pub use completeness::{missing_fields, needs_refresh, MissingField};
pub use intent::classify;
pub use orchestrator::{QueryOrchestrator, APOLOGY};
pub use quality::{acceptable, check_description, Rejection};
pub use render::{render, render_general, topic, Topic};
pub use resolver::{extract, resolve, Resolution, Strategy};
pub use similarity::similarity;
