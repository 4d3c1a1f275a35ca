//! stubdoc core library: JavaDoc extraction, stub matching, enhancement and output.
//!
//! The main entry point is [`pipeline::StubdocPipeline`], which runs the
//! Extract → Analyze → Render pipeline over a stub directory and a JavaDoc tree.

pub mod analyze;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod progress;
pub mod render;
pub mod types;
