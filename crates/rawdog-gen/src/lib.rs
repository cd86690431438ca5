//! Artifact synthesizers for rawdog.
//!
//! Each synthesizer is a pure function from the structural model to rendered
//! text. None of them share state or read another's output, so the four
//! artifact families can be produced in any order from the same model.

pub mod controller;
pub mod mock;
pub mod queries;
pub mod scaffold;
pub mod service;
pub mod signature;
pub mod text;

pub use controller::synthesize_controller;
pub use mock::{synthesize_mock, synthesize_mocks};
pub use queries::{QueryOptions, synthesize_queries};
pub use scaffold::{ScaffoldOptions, synthesize_scaffold};
pub use service::{synthesize_service, synthesize_services};
pub use text::TextBuilder;
