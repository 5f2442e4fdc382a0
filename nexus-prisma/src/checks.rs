//! Client-on-context check
//!
//! Verifies that the context slot really holds the expected data client
//! before a resolver uses it. The configured [`CheckStrategy`] decides how:
//! - `strict`: the client must report the configured identity
//! - `structural`: the client must answer `findMany` for every model
//! - `strictWithFallback`: strict first, structural with a warning second

use crate::error::ResolverError;
use crate::resolvers::{ClientMethod, DataClient};
use crate::settings::{CheckStrategy, RuntimeSettings};

/// Result of running the check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Check passed, or is disabled
    Pass,
    /// Strict check failed but the structural fallback passed
    WarnPass(String),
    /// Every configured strategy failed
    Fail(String),
}

/// Run the configured check against `client`
pub fn check_client_on_context<'m>(
    client: &dyn DataClient,
    models: impl IntoIterator<Item = &'m str>,
    settings: &RuntimeSettings,
) -> CheckOutcome {
    let check = settings.checks.prisma_client_on_context;
    if !check.enabled {
        return CheckOutcome::Pass;
    }

    let expected = settings.prisma_client_import_id.as_str();
    let field = settings.prisma_client_context_field.as_str();
    let identity_failure = || {
        format!(
            "the client on context field `{field}` reports identity `{}`, expected `{expected}`",
            client.client_id()
        )
    };

    match check.strategy {
        CheckStrategy::StrictIdentity if client.client_id() == expected => CheckOutcome::Pass,
        CheckStrategy::StrictIdentity => CheckOutcome::Fail(identity_failure()),
        CheckStrategy::StructuralProbe => match missing_model(client, models) {
            None => CheckOutcome::Pass,
            Some(model) => CheckOutcome::Fail(structural_failure(field, &model)),
        },
        CheckStrategy::StrictWithFallback if client.client_id() == expected => CheckOutcome::Pass,
        CheckStrategy::StrictWithFallback => match missing_model(client, models) {
            None => CheckOutcome::WarnPass(format!(
                "{}; it passed the structural check instead",
                identity_failure()
            )),
            Some(model) => CheckOutcome::Fail(format!(
                "{} and {}",
                identity_failure(),
                structural_failure(field, &model)
            )),
        },
    }
}

/// Turn an outcome into a result, logging fallback passes
pub fn enforce(outcome: CheckOutcome) -> Result<(), ResolverError> {
    match outcome {
        CheckOutcome::Pass => Ok(()),
        CheckOutcome::WarnPass(message) => {
            tracing::warn!("{message}");
            Ok(())
        }
        CheckOutcome::Fail(message) => Err(ResolverError::ClientCheck(message)),
    }
}

fn missing_model<'m>(
    client: &dyn DataClient,
    models: impl IntoIterator<Item = &'m str>,
) -> Option<String> {
    models
        .into_iter()
        .find(|model| !client.has_method(model, ClientMethod::FindMany))
        .map(str::to_string)
}

fn structural_failure(field: &str, model: &str) -> String {
    format!("the client on context field `{field}` has no `findMany` for model `{model}`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::resolvers::Operation;
    use crate::settings::CheckSetting;
    use async_trait::async_trait;
    use serde_json::Value;

    struct Probe {
        id: &'static str,
        models: &'static [&'static str],
    }

    #[async_trait]
    impl DataClient for Probe {
        fn client_id(&self) -> &str {
            self.id
        }

        fn has_method(&self, model: &str, _method: ClientMethod) -> bool {
            self.models.iter().any(|m| *m == model)
        }

        async fn execute(&self, _operation: Operation) -> Result<Value, ClientError> {
            Ok(Value::Null)
        }

        async fn transaction(&self, _operations: Vec<Operation>) -> Result<Vec<Value>, ClientError> {
            Ok(Vec::new())
        }
    }

    fn settings(strategy: CheckStrategy) -> RuntimeSettings {
        let mut settings = RuntimeSettings::default();
        settings.checks.prisma_client_on_context = CheckSetting {
            enabled: true,
            strategy,
        };
        settings
    }

    const GENUINE: Probe = Probe {
        id: "@prisma/client",
        models: &["User", "Post"],
    };
    const LOOKALIKE: Probe = Probe {
        id: "mock",
        models: &["User", "Post"],
    };
    const BROKEN: Probe = Probe {
        id: "mock",
        models: &["User"],
    };

    #[test]
    fn test_strict() {
        let settings = settings(CheckStrategy::StrictIdentity);
        let models = ["User", "Post"];
        assert_eq!(check_client_on_context(&GENUINE, models, &settings), CheckOutcome::Pass);
        assert!(matches!(
            check_client_on_context(&LOOKALIKE, models, &settings),
            CheckOutcome::Fail(_)
        ));
    }

    #[test]
    fn test_structural() {
        let settings = settings(CheckStrategy::StructuralProbe);
        let models = ["User", "Post"];
        assert_eq!(check_client_on_context(&LOOKALIKE, models, &settings), CheckOutcome::Pass);
        match check_client_on_context(&BROKEN, models, &settings) {
            CheckOutcome::Fail(message) => assert!(message.contains("`Post`")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_fallback_warns_then_fails() {
        let settings = settings(CheckStrategy::StrictWithFallback);
        let models = ["User", "Post"];
        assert_eq!(check_client_on_context(&GENUINE, models, &settings), CheckOutcome::Pass);
        assert!(matches!(
            check_client_on_context(&LOOKALIKE, models, &settings),
            CheckOutcome::WarnPass(_)
        ));
        assert!(matches!(
            check_client_on_context(&BROKEN, models, &settings),
            CheckOutcome::Fail(_)
        ));
    }

    #[test]
    fn test_disabled_always_passes() {
        let mut settings = settings(CheckStrategy::StrictIdentity);
        settings.checks.prisma_client_on_context.enabled = false;
        assert_eq!(check_client_on_context(&BROKEN, ["User", "Post"], &settings), CheckOutcome::Pass);
    }

    #[test]
    fn test_enforce() {
        assert!(enforce(CheckOutcome::Pass).is_ok());
        assert!(enforce(CheckOutcome::WarnPass("fallback".into())).is_ok());
        assert!(matches!(
            enforce(CheckOutcome::Fail("nope".into())),
            Err(ResolverError::ClientCheck(_))
        ));
    }
}
