use std::sync::Arc;

use crate::pipeline::SentimentPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SentimentPipeline>,
}

impl AppState {
    pub fn new(pipeline: SentimentPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
