//! The pollution-protection guard.
//!
//! Sequences the three pollution rules over one build invocation's resolved
//! plan. The guard is a pre-flight gate: hosts must run it before committing
//! any instrumentation side effect. It never aborts the process itself; a
//! violation comes back as a typed error and the host decides what to do.

use crate::lifecycle::LifecycleResolver;
use crate::policy::{
    check_custom_classifier, check_deploy_phase, check_install_phase, PollutionPolicy,
    PolicyViolation,
};
use crate::types::{ArtifactDescriptor, BuildPlan, Packaging};
use once_cell::unsync::OnceCell;

/// Evaluate the pollution rules against an already-resolved plan.
///
/// Rule order is fixed (install, then deploy, then classifier) and the first
/// violation short-circuits the rest; callers can rely on which reason is
/// reported when several rules would fire.
pub fn run_guard(
    plan: &BuildPlan,
    artifact: &ArtifactDescriptor,
    policy: &PollutionPolicy,
) -> Result<(), PolicyViolation> {
    check_install_phase(plan, artifact, policy)?;
    check_deploy_phase(plan, artifact, policy)?;
    check_custom_classifier(plan, artifact, policy)?;
    Ok(())
}

/// A per-invocation snapshot of the build session state the guard needs.
///
/// Holds the requested goals, the project's packaging and artifact identity,
/// and the enforcement policy. The resolved [`BuildPlan`] is computed lazily
/// on first use and cached for the lifetime of the session; sessions are not
/// retained across invocations and share no state with each other, so
/// parallel module builds each get an independent snapshot.
#[derive(Debug, Clone)]
pub struct GuardSession {
    requested_goals: Vec<String>,
    packaging: Packaging,
    artifact: ArtifactDescriptor,
    policy: PollutionPolicy,
    plan: OnceCell<BuildPlan>,
}

impl GuardSession {
    pub fn new(
        requested_goals: Vec<String>,
        packaging: Packaging,
        artifact: ArtifactDescriptor,
        policy: PollutionPolicy,
    ) -> Self {
        Self {
            requested_goals,
            packaging,
            artifact,
            policy,
            plan: OnceCell::new(),
        }
    }

    pub fn artifact(&self) -> &ArtifactDescriptor {
        &self.artifact
    }

    pub fn policy(&self) -> &PollutionPolicy {
        &self.policy
    }

    /// The resolved build plan, computed at most once per session.
    pub fn plan(&self) -> &BuildPlan {
        self.plan.get_or_init(|| {
            let plan = LifecycleResolver::new().resolve(&self.requested_goals, &self.packaging);
            tracing::debug!(goals = plan.len(), "resolved build plan");
            plan
        })
    }

    /// Run the pollution-protection checks for this invocation.
    ///
    /// Must be invoked strictly before any instrumentation side effect is
    /// committed. When protection is disabled this returns immediately
    /// without resolving the lifecycle. Deterministic: re-running on the
    /// same session reproduces the same verdict and message.
    pub fn run(&self) -> Result<(), PolicyViolation> {
        if !self.policy.protection_enabled {
            tracing::debug!("repository pollution protection is disabled, skipping checks");
            return Ok(());
        }
        tracing::info!("repository pollution protection is enabled");
        let verdict = run_guard(self.plan(), &self.artifact, &self.policy);
        if let Err(violation) = &verdict {
            tracing::warn!(rule = ?violation.rule(), "pollution check failed");
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyRule;

    fn session(goals: &[&str], policy: PollutionPolicy) -> GuardSession {
        GuardSession::new(
            goals.iter().map(|s| (*s).to_owned()).collect(),
            Packaging::Jar,
            ArtifactDescriptor::new("core", Packaging::Jar),
            policy,
        )
    }

    fn strict() -> PollutionPolicy {
        PollutionPolicy {
            protection_enabled: true,
            use_classifier: false,
            redirect_artifacts: false,
        }
    }

    #[test]
    fn install_is_reported_before_deploy() {
        // "deploy" resolves to a plan containing both risk phases; the
        // install rule runs first and wins.
        let verdict = session(&["deploy"], strict()).run();
        assert_eq!(verdict, Err(PolicyViolation::InstallPhasePresent));
        assert_eq!(verdict.unwrap_err().rule(), PolicyRule::InstallPhase);
    }

    #[test]
    fn safe_plan_passes_under_strict_policy() {
        assert_eq!(session(&["package"], strict()).run(), Ok(()));
    }

    #[test]
    fn disabled_protection_passes_any_plan() {
        assert_eq!(session(&["deploy"], PollutionPolicy::default()).run(), Ok(()));
    }

    #[test]
    fn verdict_is_idempotent() {
        let s = session(&["install"], strict());
        let first = s.run();
        let second = s.run();
        assert_eq!(first, second);
        assert_eq!(
            first.unwrap_err().to_string(),
            second.unwrap_err().to_string()
        );
    }

    #[test]
    fn plan_is_resolved_once_and_cached() {
        let s = session(&["verify"], strict());
        let a = s.plan() as *const BuildPlan;
        let b = s.plan() as *const BuildPlan;
        assert_eq!(a, b);
    }

    #[test]
    fn classifier_violation_surfaces_through_run() {
        let s = GuardSession::new(
            vec!["package".to_owned()],
            Packaging::Jar,
            ArtifactDescriptor::new("core", Packaging::Jar).with_classifier("shaded"),
            PollutionPolicy {
                protection_enabled: true,
                use_classifier: true,
                redirect_artifacts: true,
            },
        );
        assert_eq!(
            s.run(),
            Err(PolicyViolation::CustomClassifierPresent {
                classifier: "shaded".to_owned()
            })
        );
    }
}
