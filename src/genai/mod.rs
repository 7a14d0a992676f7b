//! Access to the hosted generative model API.

mod client;
pub mod types;

use std::future::Future;

pub use client::{DEFAULT_API_BASE, GenAiClient};
pub use types::{
    Blob, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    PredictRequest, PredictResponse, Tool, WebSource,
};

/// The two endpoint shapes the tattoo service needs from a model host.
///
/// `GenAiClient` talks HTTP; tests provide canned responses.
pub trait ModelTransport: Send + Sync {
    fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> impl Future<Output = anyhow::Result<GenerateContentResponse>> + Send;

    fn predict(
        &self,
        model: &str,
        request: &PredictRequest,
    ) -> impl Future<Output = anyhow::Result<PredictResponse>> + Send;
}
