//! Pollution policy evaluation.
//!
//! Three independent rules decide whether an instrumented build is allowed
//! to proceed. Each rule inspects the resolved [`BuildPlan`] and the
//! project's [`ArtifactDescriptor`] against the active [`PollutionPolicy`]
//! and either passes or produces a [`PolicyViolation`] whose message names
//! the exact remediation. The messages are part of the contract.

use crate::types::{ArtifactDescriptor, BuildPlan};
use serde::{Deserialize, Serialize};

/// The enforcement settings consumed by the pollution rules.
///
/// A risk only becomes a violation when `protection_enabled` is set and the
/// mitigations (`use_classifier` together with `redirect_artifacts`) are not
/// both active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollutionPolicy {
    /// Master switch. Off by default: enforcement is opt-in.
    pub protection_enabled: bool,
    /// Whether instrumented artifacts get a distinguishing classifier.
    pub use_classifier: bool,
    /// Whether instrumented output is redirected to a side location instead
    /// of replacing the primary artifact in place.
    pub redirect_artifacts: bool,
}

impl Default for PollutionPolicy {
    fn default() -> Self {
        Self {
            protection_enabled: false,
            use_classifier: true,
            redirect_artifacts: false,
        }
    }
}

impl PollutionPolicy {
    /// Both mitigations active: instrumented output is classified and kept
    /// away from the primary artifact path.
    pub fn mitigated(&self) -> bool {
        self.use_classifier && self.redirect_artifacts
    }
}

/// Which pollution rule produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyRule {
    InstallPhase,
    DeployPhase,
    CustomClassifier,
}

/// A failed pollution check. Always fatal to the current build step; the
/// message carries the remediation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    #[error(
        "Repository pollution protection is enabled. Your build runs the 'install' phase, \
         which can put instrumented artifacts into the local repository cache. \
         Remove this phase to fix it. You can also disable pollution protection \
         if this is intentional."
    )]
    InstallPhasePresent,

    #[error(
        "Repository pollution protection is enabled. Your build runs the 'deploy' phase, \
         which can upload instrumented artifacts into your shared repository. \
         Remove this phase to fix it. You can also disable pollution protection \
         if this is intentional."
    )]
    DeployPhasePresent,

    #[error(
        "Repository pollution protection is enabled. Your build produces an artifact with \
         the custom classifier '{classifier}'. An artifact supports only one classifier, \
         so appending a second classifier for instrumented output may not be handled \
         correctly. Remove the custom classifier to fix it. You can also disable \
         pollution protection if you know it does not affect your project."
    )]
    CustomClassifierPresent { classifier: String },
}

impl PolicyViolation {
    pub fn rule(&self) -> PolicyRule {
        match self {
            PolicyViolation::InstallPhasePresent => PolicyRule::InstallPhase,
            PolicyViolation::DeployPhasePresent => PolicyRule::DeployPhase,
            PolicyViolation::CustomClassifierPresent { .. } => PolicyRule::CustomClassifier,
        }
    }
}

/// Fails when the plan reaches the `install` phase and the instrumented
/// artifact would land in the local repository cache undistinguished.
pub fn check_install_phase(
    plan: &BuildPlan,
    _artifact: &ArtifactDescriptor,
    policy: &PollutionPolicy,
) -> Result<(), PolicyViolation> {
    if policy.protection_enabled && plan.contains("install") && !policy.mitigated() {
        return Err(PolicyViolation::InstallPhasePresent);
    }
    Ok(())
}

/// Fails when the plan reaches the `deploy` phase. Same condition as the
/// install rule with a broader blast radius: deploy publishes to a shared
/// remote repository.
pub fn check_deploy_phase(
    plan: &BuildPlan,
    _artifact: &ArtifactDescriptor,
    policy: &PollutionPolicy,
) -> Result<(), PolicyViolation> {
    if policy.protection_enabled && plan.contains("deploy") && !policy.mitigated() {
        return Err(PolicyViolation::DeployPhasePresent);
    }
    Ok(())
}

/// Fails when the artifact already carries a custom classifier and the
/// policy would append a second, instrumented-output classifier on top.
/// Reserved documentation/source classifiers are exempt.
pub fn check_custom_classifier(
    _plan: &BuildPlan,
    artifact: &ArtifactDescriptor,
    policy: &PollutionPolicy,
) -> Result<(), PolicyViolation> {
    if policy.protection_enabled
        && artifact.has_custom_classifier()
        && policy.use_classifier
        && policy.redirect_artifacts
    {
        let classifier = artifact
            .classifier
            .clone()
            .unwrap_or_default();
        return Err(PolicyViolation::CustomClassifierPresent { classifier });
    }
    Ok(())
}
