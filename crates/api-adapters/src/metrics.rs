//! Operation counters.
//!
//! One counter family, `quarterdeck_forum_operations_total{op, outcome}`,
//! incremented once per service call at the handler layer. `outcome` is
//! either `ok` or the error taxonomy variant, so drift-relevant failures
//! (storage errors mid-protocol) are visible without log spelunking.

use std::sync::Arc;

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

use domains::DomainError;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OperationLabels {
    pub op: String,
    pub outcome: String,
}

#[derive(Clone)]
pub struct ApiMetrics {
    operations: Family<OperationLabels, Counter>,
    registry: Arc<Registry>,
}

fn outcome_of<T>(result: &domains::Result<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(DomainError::NotFound(..)) => "not_found",
        Err(DomainError::Validation(_)) => "validation",
        Err(DomainError::Unauthorized(_)) => "unauthorized",
        Err(DomainError::Locked(_)) => "locked",
        Err(DomainError::Storage(_)) => "storage",
    }
}

impl ApiMetrics {
    pub fn new() -> Self {
        let operations = Family::<OperationLabels, Counter>::default();
        let mut registry = Registry::with_prefix("quarterdeck");
        registry.register(
            "forum_operations",
            "Forum operations by outcome",
            operations.clone(),
        );
        Self {
            operations,
            registry: Arc::new(registry),
        }
    }

    pub fn record<T>(&self, op: &str, result: &domains::Result<T>) {
        self.operations
            .get_or_create(&OperationLabels {
                op: op.to_string(),
                outcome: outcome_of(result).to_string(),
            })
            .inc();
    }

    /// OpenMetrics text exposition for the `/metrics` endpoint.
    pub fn encode_text(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn outcomes_map_to_labels() {
        let metrics = ApiMetrics::new();
        metrics.record("create_topic", &Ok(()));
        metrics.record("create_topic", &Ok(()));
        metrics.record::<()>(
            "create_reply",
            &Err(DomainError::Locked(Uuid::nil())),
        );

        let text = metrics.encode_text().unwrap();
        assert!(text.contains("quarterdeck_forum_operations_total"));
        assert!(text.contains("op=\"create_topic\""));
        assert!(text.contains("outcome=\"ok\"} 2"));
        assert!(text.contains("outcome=\"locked\"} 1"));
    }
}
