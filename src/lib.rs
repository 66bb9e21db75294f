//! Build-lifecycle analysis and repository pollution protection for
//! coverage-instrumented builds.
//!
//! Given the goals a build invocation requested, the lifecycle resolver
//! statically determines which phases and plugin goals will actually run.
//! The guard then checks that resolved plan, plus the project's artifact
//! identity, against three pollution rules and rejects configurations that
//! would let an instrumented artifact reach a shared repository disguised
//! as the normal one.
//!
//! The guard is a pre-flight gate: run it before committing any
//! instrumentation side effect. It performs no side effects of its own and
//! reports violations as typed errors for the host to act on.

pub mod config;
pub mod error;
pub mod guard;
pub mod lifecycle;
pub mod policy;
pub mod types;

pub use config::{DistributedCoverage, GoalFlavor, InstrumentConfig};
pub use error::{ConfigError, GuardError};
pub use guard::{run_guard, GuardSession};
pub use lifecycle::LifecycleResolver;
pub use policy::{PolicyRule, PolicyViolation, PollutionPolicy};
pub use types::{ArtifactDescriptor, BuildPlan, Packaging};
