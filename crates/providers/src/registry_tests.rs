use super::*;
use crate::llm::{LlmOutput, LlmProvider, LlmRequest};

struct FakeLlm {
    label: String,
    healthy: bool,
}

#[async_trait]
impl HealthCheckable for FakeLlm {
    fn label(&self) -> &str {
        &self.label
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.healthy {
            Ok(())
        } else {
            Err(ProviderError::RequestFailed { vendor: self.label.clone(), message: "down".to_string() })
        }
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn summarize(&self, _request: LlmRequest<'_>) -> Result<LlmOutput, ProviderError> {
        Ok(LlmOutput { summary: "ok".to_string(), tokens_used: Some(1) })
    }
}

#[tokio::test]
async fn build_excludes_unhealthy_candidates_but_keeps_order() {
    let candidates: Vec<Arc<dyn LlmProvider>> = vec![
        Arc::new(FakeLlm { label: "primary".to_string(), healthy: false }),
        Arc::new(FakeLlm { label: "secondary".to_string(), healthy: true }),
        Arc::new(FakeLlm { label: "tertiary".to_string(), healthy: true }),
    ];
    let registry = Registry::build(candidates).await;
    assert_eq!(registry.current().unwrap().label(), "secondary");
}

#[tokio::test]
async fn report_failure_rotates_forward_and_wraps_modulo_len() {
    let candidates: Vec<Arc<dyn LlmProvider>> = vec![
        Arc::new(FakeLlm { label: "a".to_string(), healthy: true }),
        Arc::new(FakeLlm { label: "b".to_string(), healthy: true }),
    ];
    let registry = Registry::build(candidates).await;
    assert_eq!(registry.current().unwrap().label(), "a");

    registry.report_failure();
    assert_eq!(registry.current().unwrap().label(), "b");

    // Every survivor has now failed in turn; the pointer wraps back to "a"
    // (spec.md §8 "cur_idx advances by 1 mod k") rather than staying pinned
    // to "b" forever.
    registry.report_failure();
    assert_eq!(registry.current().unwrap().label(), "a");

    registry.report_failure();
    assert_eq!(registry.current().unwrap().label(), "b");
}

#[tokio::test]
async fn report_failure_on_single_survivor_leaves_state_unchanged() {
    let candidates: Vec<Arc<dyn LlmProvider>> =
        vec![Arc::new(FakeLlm { label: "only".to_string(), healthy: true })];
    let registry = Registry::build(candidates).await;
    assert_eq!(registry.current().unwrap().label(), "only");

    registry.report_failure();
    assert_eq!(registry.current().unwrap().label(), "only");
}

#[tokio::test]
async fn empty_registry_reports_none_available() {
    let registry: Registry<dyn LlmProvider> = Registry::build(vec![]).await;
    assert!(registry.is_empty());
    assert!(matches!(registry.current(), Err(ProviderError::NoneAvailable)));
}
