//! imgstamp image build functionality
//!
//! This crate provides the build pipeline behind the `imgstamp` CLI:
//! Dockerfile resolution, image reference composition, and invocation of
//! an external container engine to build, tag and push images.

pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod reference;
pub mod resolver;

pub use engine::{CommandRunner, CommandStatus, DEFAULT_ENGINE, Engine, EngineCommand, ProcessRunner};
pub use error::{BuildError, Result, Stage};
pub use orchestrator::{
    BuildOutcome, BuildRequest, DEFAULT_REGISTRY_USER, Defaults, Orchestrator, resolve_defaults,
};
pub use reference::{ImageReference, LATEST_TAG};
pub use resolver::BuildResolver;
