use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::optimize::pipeline::PipelineDefaults;
use crate::optimize::rewriter::Generative;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The generative capability behind the rewriter. Production:
    /// `LlmGenerator` over the Claude client; tests inject stubs.
    pub generator: Arc<dyn Generative>,
    pub config: Config,
}

impl AppState {
    /// Pipeline knobs resolved from configuration.
    pub fn pipeline_defaults(&self) -> PipelineDefaults {
        PipelineDefaults {
            top_n: self.config.top_n_projects,
            generation_timeout: Duration::from_secs(self.config.generation_timeout_secs),
        }
    }
}
