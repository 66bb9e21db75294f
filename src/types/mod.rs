use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Classifiers that conventionally mark documentation/source side artifacts.
/// These never conflict with an instrumented-artifact classifier and are
/// exempt from the custom-classifier pollution rule.
pub const RESERVED_CLASSIFIERS: &[&str] = &["sources", "javadoc"];

/// Packaging type of the build unit under analysis.
///
/// Unknown packaging names are preserved as `Other` and resolved with the
/// default (jar-style) lifecycle bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Packaging {
    Jar,
    War,
    Ear,
    Pom,
    MavenPlugin,
    Other(String),
}

impl Packaging {
    pub fn as_str(&self) -> &str {
        match self {
            Packaging::Jar => "jar",
            Packaging::War => "war",
            Packaging::Ear => "ear",
            Packaging::Pom => "pom",
            Packaging::MavenPlugin => "maven-plugin",
            Packaging::Other(name) => name,
        }
    }
}

impl From<String> for Packaging {
    fn from(value: String) -> Self {
        match value.as_str() {
            "jar" => Packaging::Jar,
            "war" => Packaging::War,
            "ear" => Packaging::Ear,
            "pom" => Packaging::Pom,
            "maven-plugin" => Packaging::MavenPlugin,
            _ => Packaging::Other(value),
        }
    }
}

impl From<Packaging> for String {
    fn from(value: Packaging) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Packaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The primary build output identity of the current project.
///
/// Owned by the surrounding build session; the guard only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDescriptor {
    pub artifact_id: String,
    #[serde(default)]
    pub classifier: Option<String>,
    pub packaging: Packaging,
}

impl ArtifactDescriptor {
    pub fn new(artifact_id: impl Into<String>, packaging: Packaging) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            classifier: None,
            packaging,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// True when the artifact carries a non-empty classifier outside the
    /// reserved documentation/source set.
    pub fn has_custom_classifier(&self) -> bool {
        match self.classifier.as_deref() {
            Some(c) if !c.is_empty() => !RESERVED_CLASSIFIERS.contains(&c),
            _ => false,
        }
    }
}

/// The resolved set of goal/phase identifiers the current build invocation
/// will execute, including goals reachable through default lifecycle
/// bindings for the declared packaging type.
///
/// Immutable once constructed. Only membership matters downstream; the
/// internal ordering is the identifiers' natural order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    goals: BTreeSet<String>,
}

impl BuildPlan {
    pub fn from_goals(goals: impl IntoIterator<Item = String>) -> Self {
        Self {
            goals: goals.into_iter().collect(),
        }
    }

    pub fn contains(&self, goal: &str) -> bool {
        self.goals.contains(goal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.goals.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packaging_roundtrips_through_strings() {
        assert_eq!(Packaging::from("jar".to_owned()), Packaging::Jar);
        assert_eq!(Packaging::from("maven-plugin".to_owned()), Packaging::MavenPlugin);
        assert_eq!(
            Packaging::from("bundle".to_owned()),
            Packaging::Other("bundle".to_owned())
        );
        assert_eq!(Packaging::Pom.as_str(), "pom");
    }

    #[test]
    fn reserved_classifiers_are_not_custom() {
        let base = ArtifactDescriptor::new("core", Packaging::Jar);
        assert!(!base.has_custom_classifier());
        assert!(!base.clone().with_classifier("sources").has_custom_classifier());
        assert!(!base.clone().with_classifier("javadoc").has_custom_classifier());
        assert!(!base.clone().with_classifier("").has_custom_classifier());
        assert!(base.clone().with_classifier("tests").has_custom_classifier());
        assert!(base.with_classifier("shaded").has_custom_classifier());
    }

    #[test]
    fn plan_membership_is_order_insensitive() {
        let a = BuildPlan::from_goals(["install".to_owned(), "package".to_owned()]);
        let b = BuildPlan::from_goals(["package".to_owned(), "install".to_owned()]);
        assert_eq!(a, b);
        assert!(a.contains("install"));
        assert!(!a.contains("deploy"));
    }
}
