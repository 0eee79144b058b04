#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! echocast-providers: the LLM/TTS provider registry and concrete vendor
//! adapters (spec.md §4.1).

pub mod bytedance_tts;
pub mod edge_tts;
pub mod error;
pub mod llm;
pub mod nvidia;
pub mod openai_compatible;
pub mod registry;
pub mod tts;

#[cfg(feature = "test-support")]
pub mod fake;

pub use bytedance_tts::ByteDancePodcastProvider;
pub use edge_tts::EdgeTtsProvider;
pub use error::ProviderError;
pub use llm::{LlmOutput, LlmProvider, LlmRequest};
pub use nvidia::nvidia_provider;
pub use openai_compatible::OpenAiCompatibleProvider;
pub use registry::{HealthCheckable, Registry, HEALTH_CHECK_TIMEOUT};
pub use tts::{TtsOutput, TtsProvider};

#[cfg(feature = "test-support")]
pub use fake::{FakeLlmProvider, FakeTtsProvider};
