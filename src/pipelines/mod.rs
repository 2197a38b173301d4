//! Workflow pipelines orchestrating stateless services.

pub mod inspect;

pub use inspect::{InspectWorkflow, InspectionReport, SourceKind};
