//! Lifecycle plan resolution.
//!
//! Expands the goals/phases a build invocation requested into the full set
//! of phases and bound plugin goals that will actually execute, using the
//! standard lifecycle-binding tables. This is a static query over declared
//! build configuration; nothing here executes a build.

use crate::types::{BuildPlan, Packaging};
use std::collections::BTreeSet;

/// The default lifecycle, in execution order. Requesting a phase runs every
/// phase at or before it.
pub const DEFAULT_LIFECYCLE: &[&str] = &[
    "validate",
    "initialize",
    "generate-sources",
    "process-sources",
    "generate-resources",
    "process-resources",
    "compile",
    "process-classes",
    "generate-test-sources",
    "process-test-sources",
    "generate-test-resources",
    "process-test-resources",
    "test-compile",
    "process-test-classes",
    "test",
    "prepare-package",
    "package",
    "pre-integration-test",
    "integration-test",
    "post-integration-test",
    "verify",
    "install",
    "deploy",
];

/// The clean lifecycle. Independent of the default lifecycle: `clean` never
/// pulls in `compile` and vice versa.
pub const CLEAN_LIFECYCLE: &[&str] = &["pre-clean", "clean", "post-clean"];

/// The site lifecycle.
pub const SITE_LIFECYCLE: &[&str] = &["pre-site", "site", "post-site", "site-deploy"];

/// True when `name` is a phase of any standard lifecycle.
pub fn is_phase(name: &str) -> bool {
    lifecycle_of(name).is_some()
}

/// The lifecycle containing `name` and the index of `name` within it.
fn lifecycle_of(name: &str) -> Option<(&'static [&'static str], usize)> {
    for lifecycle in [DEFAULT_LIFECYCLE, CLEAN_LIFECYCLE, SITE_LIFECYCLE] {
        if let Some(idx) = lifecycle.iter().position(|p| *p == name) {
            return Some((lifecycle, idx));
        }
    }
    None
}

/// Plugin goals bound to `phase` for the given packaging type.
///
/// A compact rendition of the standard per-packaging binding tables. Unknown
/// packaging types get the jar bindings, which is what build tools do for
/// custom packaging without its own lifecycle mapping.
fn bound_goals(phase: &str, packaging: &Packaging) -> &'static [&'static str] {
    // Bindings shared by every lifecycle mapping.
    match phase {
        "clean" => return &["clean:clean"],
        "site" => return &["site:site"],
        "site-deploy" => return &["site:deploy"],
        "install" => return &["install:install"],
        "deploy" => return &["deploy:deploy"],
        _ => {}
    }

    if let Packaging::Pom = packaging {
        // pom builds neither compile nor package anything beyond the
        // descriptor attachment.
        return match phase {
            "package" => &["site:attach-descriptor"],
            _ => &[],
        };
    }

    match phase {
        "process-resources" => &["resources:resources"],
        "compile" => &["compiler:compile"],
        "process-classes" => match packaging {
            Packaging::MavenPlugin => &["plugin:descriptor"],
            _ => &[],
        },
        "process-test-resources" => &["resources:testResources"],
        "test-compile" => &["compiler:testCompile"],
        "test" => &["surefire:test"],
        "package" => match packaging {
            Packaging::War => &["war:war"],
            Packaging::Ear => &["ear:ear"],
            Packaging::MavenPlugin => &["jar:jar", "plugin:addPluginArtifactMetadata"],
            _ => &["jar:jar"],
        },
        "generate-resources" => match packaging {
            Packaging::Ear => &["ear:generate-application-xml"],
            _ => &[],
        },
        _ => &[],
    }
}

/// Resolves requested goals/phases into the concrete [`BuildPlan`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleResolver;

impl LifecycleResolver {
    pub fn new() -> Self {
        Self
    }

    /// Expand `requested` into the full set of phases and bound goals that
    /// will execute for `packaging`.
    ///
    /// A requested item naming a lifecycle phase contributes every phase at
    /// or before it in that lifecycle, plus the goals bound to those phases.
    /// Anything else (a direct plugin goal, or a name this resolver does not
    /// know) passes through literally: this is a best-effort static check,
    /// and an unknown name simply never matches a risk phase downstream.
    pub fn resolve(&self, requested: &[String], packaging: &Packaging) -> BuildPlan {
        let mut goals = BTreeSet::new();
        for item in requested {
            match lifecycle_of(item) {
                Some((lifecycle, idx)) => {
                    for phase in &lifecycle[..=idx] {
                        goals.insert((*phase).to_owned());
                        for goal in bound_goals(phase, packaging) {
                            goals.insert((*goal).to_owned());
                        }
                    }
                }
                None => {
                    tracing::debug!(goal = %item, "not a lifecycle phase, passing through");
                    goals.insert(item.clone());
                }
            }
        }
        BuildPlan::from_goals(goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(requested: &[&str], packaging: Packaging) -> BuildPlan {
        let requested: Vec<String> = requested.iter().map(|s| (*s).to_owned()).collect();
        LifecycleResolver::new().resolve(&requested, &packaging)
    }

    #[test]
    fn deploy_is_cumulative() {
        let plan = resolve(&["deploy"], Packaging::Jar);
        for phase in DEFAULT_LIFECYCLE {
            assert!(plan.contains(phase), "missing phase {phase}");
        }
        assert!(plan.contains("install:install"));
        assert!(plan.contains("deploy:deploy"));
        assert!(plan.contains("jar:jar"));
        assert!(plan.contains("surefire:test"));
    }

    #[test]
    fn package_stops_before_install() {
        let plan = resolve(&["package"], Packaging::Jar);
        assert!(plan.contains("package"));
        assert!(plan.contains("compile"));
        assert!(!plan.contains("install"));
        assert!(!plan.contains("deploy"));
        assert!(!plan.contains("install:install"));
    }

    #[test]
    fn clean_lifecycle_is_independent() {
        let plan = resolve(&["clean"], Packaging::Jar);
        assert!(plan.contains("pre-clean"));
        assert!(plan.contains("clean"));
        assert!(plan.contains("clean:clean"));
        assert!(!plan.contains("compile"));
        assert!(!plan.contains("post-clean"));
    }

    #[test]
    fn unknown_goal_passes_through_literally() {
        let plan = resolve(&["coverage:setup", "frobnicate"], Packaging::Jar);
        assert!(plan.contains("coverage:setup"));
        assert!(plan.contains("frobnicate"));
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn direct_deploy_goal_is_not_the_deploy_phase() {
        // Invoking the plugin goal directly skips the lifecycle entirely.
        let plan = resolve(&["deploy:deploy"], Packaging::Jar);
        assert!(plan.contains("deploy:deploy"));
        assert!(!plan.contains("deploy"));
        assert!(!plan.contains("install"));
    }

    #[test]
    fn pom_packaging_skips_build_bindings() {
        let plan = resolve(&["install"], Packaging::Pom);
        assert!(plan.contains("install"));
        assert!(plan.contains("install:install"));
        assert!(plan.contains("site:attach-descriptor"));
        assert!(!plan.contains("compiler:compile"));
        assert!(!plan.contains("jar:jar"));
    }

    #[test]
    fn plugin_packaging_adds_descriptor_goals() {
        let plan = resolve(&["package"], Packaging::MavenPlugin);
        assert!(plan.contains("plugin:descriptor"));
        assert!(plan.contains("plugin:addPluginArtifactMetadata"));
        assert!(plan.contains("jar:jar"));
    }

    #[test]
    fn unknown_packaging_uses_default_bindings() {
        let plan = resolve(&["package"], Packaging::Other("bundle".to_owned()));
        assert!(plan.contains("jar:jar"));
    }
}
