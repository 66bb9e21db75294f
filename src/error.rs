use crate::policy::PolicyViolation;

/// Umbrella error for guard hosts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    /// A pollution rule rejected the build. Fatal to the current build step.
    #[error("policy violation: {0}")]
    Policy(#[from] PolicyViolation),

    /// Malformed host-supplied configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Invalid values in the instrumentation configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown flush policy '{0}', expected one of: directed, interval, threaded")]
    UnknownFlushPolicy(String),

    #[error("unknown instrumentation level '{0}', expected 'method' or 'statement'")]
    UnknownInstrumentationLevel(String),

    #[error("unknown lambda instrumentation '{0}', expected one of: none, expression, block, all")]
    UnknownLambdaInstrumentation(String),

    #[error("unknown goal flavor '{0}', expected 'instrument' or 'setup'")]
    UnknownGoalFlavor(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violations_and_config_errors_lift_into_guard_error() {
        let err: GuardError = PolicyViolation::DeployPhasePresent.into();
        assert!(matches!(err, GuardError::Policy(_)));
        assert!(err.to_string().starts_with("policy violation:"));

        let err: GuardError = ConfigError::UnknownFlushPolicy("eager".to_owned()).into();
        assert_eq!(
            err.to_string(),
            "configuration error: unknown flush policy 'eager', expected one of: directed, interval, threaded"
        );
    }
}
