//! Instrumentation plugin configuration.
//!
//! The full parameter surface a host build tool binds for the
//! instrumentation goals. Most of this is plain data consumed elsewhere in
//! the plugin; the guard only reads the pollution-protection subset exposed
//! through [`InstrumentConfig::pollution_policy`].

use crate::error::ConfigError;
use crate::policy::PollutionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Which instrumentation goal flavor the build runs.
///
/// `Instrument` forks the build and redirects instrumented artifacts and
/// output directories to a side location; `Setup` instruments the main
/// build in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalFlavor {
    Instrument,
    #[default]
    Setup,
}

impl GoalFlavor {
    pub fn redirects_artifacts(self) -> bool {
        matches!(self, GoalFlavor::Instrument)
    }

    pub fn redirects_output_directories(self) -> bool {
        matches!(self, GoalFlavor::Instrument)
    }
}

impl FromStr for GoalFlavor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instrument" => Ok(GoalFlavor::Instrument),
            "setup" => Ok(GoalFlavor::Setup),
            other => Err(ConfigError::UnknownGoalFlavor(other.to_owned())),
        }
    }
}

/// Coverage recorder flush policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushPolicy {
    Directed,
    Interval,
    #[default]
    Threaded,
}

impl FromStr for FlushPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "directed" => Ok(FlushPolicy::Directed),
            "interval" => Ok(FlushPolicy::Interval),
            "threaded" => Ok(FlushPolicy::Threaded),
            other => Err(ConfigError::UnknownFlushPolicy(other.to_owned())),
        }
    }
}

/// Granularity to instrument to. Method-level greatly reduces overhead at
/// the cost of limited reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentationLevel {
    Method,
    #[default]
    Statement,
}

impl FromStr for InstrumentationLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "method" => Ok(InstrumentationLevel::Method),
            "statement" => Ok(InstrumentationLevel::Statement),
            other => Err(ConfigError::UnknownInstrumentationLevel(other.to_owned())),
        }
    }
}

/// Which lambda function forms get instrumented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LambdaInstrumentation {
    #[default]
    None,
    Expression,
    Block,
    All,
}

impl FromStr for LambdaInstrumentation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(LambdaInstrumentation::None),
            "expression" => Ok(LambdaInstrumentation::Expression),
            "block" => Ok(LambdaInstrumentation::Block),
            "all" => Ok(LambdaInstrumentation::All),
            other => Err(ConfigError::UnknownLambdaInstrumentation(other.to_owned())),
        }
    }
}

/// Distributed (cross-process) coverage collection settings. Presence of
/// this block enables collection across processes; all fields have
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistributedCoverage {
    pub host: String,
    pub port: u16,
    /// Clients the test process waits for before continuing.
    pub num_clients: u32,
    pub timeout_ms: u64,
    pub retry_period_ms: u64,
}

impl Default for DistributedCoverage {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 1198,
            num_clients: 0,
            timeout_ms: 5000,
            retry_period_ms: 1000,
        }
    }
}

impl DistributedCoverage {
    /// The `key=value;...` form handed to the coverage runtime.
    pub fn as_connection_string(&self) -> String {
        format!(
            "host={};port={};numclients={};timeout={};retryperiod={}",
            self.host, self.port, self.num_clients, self.timeout_ms, self.retry_period_ms
        )
    }
}

const DEFAULT_INCLUDES: &[&str] = &["**/*.java", "**/*.groovy"];

/// Full configuration surface of the instrumentation goals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentConfig {
    pub goal_flavor: GoalFlavor,

    /// Master switch for the pollution-protection guard.
    pub repository_pollution_protection: bool,
    /// Whether instrumented artifacts carry a distinguishing classifier.
    pub use_classifier: bool,

    /// Patterns to instrument, resolved against source roots. Overridden
    /// wholesale by `includes_list` when that is set.
    pub includes: BTreeSet<String>,
    /// Comma-separated alternative to `includes`; replaces the defaults.
    pub includes_list: Option<String>,
    /// Patterns to exclude from instrumentation.
    pub excludes: BTreeSet<String>,
    /// Comma-separated additions merged into `excludes`.
    pub excludes_list: Option<String>,

    /// Character encoding used when parsing source files.
    pub encoding: Option<String>,
    pub flush_policy: FlushPolicy,
    pub instrumentation: InstrumentationLevel,
    pub instrument_lambda: LambdaInstrumentation,
    /// Source language level to parse with; highest supported when unset.
    pub source_level: Option<String>,

    /// Named method contexts for filtering methods out of reports.
    pub method_contexts: BTreeMap<String, String>,
    /// Named statement contexts for filtering statements out of reports.
    pub statement_contexts: BTreeMap<String, String>,

    /// Modification-date granularity for reinstrumentation staleness checks.
    pub stale_millis: u64,
    /// Copy excluded files into the instrumented source tree so resource
    /// scanners still find them.
    pub copy_excluded_files: bool,
    pub includes_all_source_roots: bool,
    pub includes_test_source_roots: bool,
    /// Downgrade test/validation failures to warnings so a coverage report
    /// can still be produced for a failing build.
    pub set_test_failure_ignore: bool,
    /// Dependency scope used when injecting the coverage runtime.
    pub scope: Option<String>,
    /// How much older a classified instrumented artifact may be than the
    /// plain one before the plain one is preferred.
    pub instrumented_artifact_expiry_ms: u64,
    pub use_fully_qualified_java_lang: bool,

    pub distributed_coverage: Option<DistributedCoverage>,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            goal_flavor: GoalFlavor::default(),
            repository_pollution_protection: false,
            use_classifier: true,
            includes: DEFAULT_INCLUDES.iter().map(|s| (*s).to_owned()).collect(),
            includes_list: None,
            excludes: BTreeSet::new(),
            excludes_list: None,
            encoding: None,
            flush_policy: FlushPolicy::default(),
            instrumentation: InstrumentationLevel::default(),
            instrument_lambda: LambdaInstrumentation::default(),
            source_level: None,
            method_contexts: BTreeMap::new(),
            statement_contexts: BTreeMap::new(),
            stale_millis: 0,
            copy_excluded_files: true,
            includes_all_source_roots: false,
            includes_test_source_roots: true,
            set_test_failure_ignore: false,
            scope: None,
            instrumented_artifact_expiry_ms: 2000,
            use_fully_qualified_java_lang: true,
            distributed_coverage: None,
        }
    }
}

impl InstrumentConfig {
    /// Effective include patterns: `includes_list` replaces the pattern set
    /// entirely when present.
    pub fn effective_includes(&self) -> BTreeSet<String> {
        match &self.includes_list {
            Some(list) => split_list(list),
            None => self.includes.clone(),
        }
    }

    /// Effective exclude patterns: `excludes_list` merges into the set.
    pub fn effective_excludes(&self) -> BTreeSet<String> {
        let mut excludes = self.excludes.clone();
        if let Some(list) = &self.excludes_list {
            excludes.extend(split_list(list));
        }
        excludes
    }

    /// The pollution-protection subset the guard consumes. Whether
    /// artifacts are redirected is a property of the goal flavor, not a
    /// user-settable flag.
    pub fn pollution_policy(&self) -> PollutionPolicy {
        PollutionPolicy {
            protection_enabled: self.repository_pollution_protection,
            use_classifier: self.use_classifier,
            redirect_artifacts: self.goal_flavor.redirects_artifacts(),
        }
    }
}

fn split_list(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
