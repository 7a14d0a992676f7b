use std::collections::VecDeque;
use std::sync::Mutex;

use image::{DynamicImage, ImageBuffer, Rgba};
use inkgenius::core::data_uri::image_to_uri;
use inkgenius::genai::types::Prediction;
use inkgenius::genai::{
    GenerateContentRequest, GenerateContentResponse, ModelTransport, PredictRequest, PredictResponse,
};
use inkgenius::{Artist, ModelSet, Project, StudioDb, TattooService};
use serde_json::json;

/// One request the service sent, as the model name plus the JSON body.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub body: serde_json::Value,
}

/// Model host that replays queued responses and records what it was asked.
#[derive(Default)]
pub struct MockTransport {
    content: Mutex<VecDeque<anyhow::Result<GenerateContentResponse>>>,
    predictions: Mutex<VecDeque<anyhow::Result<PredictResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_content(&self, response: anyhow::Result<GenerateContentResponse>) {
        self.content.lock().unwrap().push_back(response);
    }

    pub fn push_prediction(&self, response: anyhow::Result<PredictResponse>) {
        self.predictions.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, model: &str, body: serde_json::Value) {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            body,
        });
    }
}

impl ModelTransport for MockTransport {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> anyhow::Result<GenerateContentResponse> {
        self.record(model, serde_json::to_value(request)?);
        self.content
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no canned generateContent response left")))
    }

    async fn predict(&self, model: &str, request: &PredictRequest) -> anyhow::Result<PredictResponse> {
        self.record(model, serde_json::to_value(request)?);
        self.predictions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no canned predict response left")))
    }
}

pub fn test_models() -> ModelSet {
    ModelSet {
        image: "test-image".to_string(),
        edit: "test-edit".to_string(),
        text: "test-text".to_string(),
    }
}

pub fn mock_service() -> TattooService<MockTransport> {
    TattooService::new(MockTransport::new(), test_models())
}

/// A small design: black square on white paper.
pub fn test_design_image() -> DynamicImage {
    DynamicImage::ImageRgba8(ImageBuffer::from_fn(16, 16, |x, y| {
        if (4..12).contains(&x) && (4..12).contains(&y) {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    }))
}

pub fn test_design_uri() -> String {
    image_to_uri(&test_design_image()).expect("Failed to encode test design")
}

/// Base64 PNG payload as the API returns it (no data URI prefix).
pub fn test_design_base64() -> String {
    inkgenius::core::data_uri::DataUri::parse(&test_design_uri())
        .expect("Test design should parse")
        .base64_payload()
}

pub fn text_response(text: &str) -> GenerateContentResponse {
    serde_json::from_value(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
    .expect("Invalid canned text response")
}

pub fn image_response(base64_png: &str) -> GenerateContentResponse {
    serde_json::from_value(json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "Here you go." },
                    { "inlineData": { "mimeType": "image/png", "data": base64_png } }
                ]
            },
            "finishReason": "STOP"
        }]
    }))
    .expect("Invalid canned image response")
}

pub fn blocked_response(reason: &str) -> GenerateContentResponse {
    serde_json::from_value(json!({ "promptFeedback": { "blockReason": reason } }))
        .expect("Invalid canned blocked response")
}

pub fn predictions(count: usize) -> PredictResponse {
    PredictResponse {
        predictions: (0..count)
            .map(|_| Prediction {
                bytes_base64_encoded: Some(test_design_base64()),
                mime_type: Some("image/png".to_string()),
            })
            .collect(),
    }
}

/// Opens a StudioDb in a temporary directory.
/// Returns both the store and the temp directory (which must be kept alive).
pub async fn create_test_studio() -> (StudioDb, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let studio = StudioDb::open(dir.path().join("studio.db"))
        .await
        .expect("Failed to open test studio");
    (studio, dir)
}

pub fn make_test_project(prompt: &str) -> Project {
    Project::new(test_design_uri()).with_prompt(prompt)
}

pub fn make_test_artist(name: &str) -> Artist {
    Artist {
        name: name.to_string(),
        description: "Custom work, walk-ins on Fridays".to_string(),
        address: "221 Main St, Springfield".to_string(),
        specialties: vec!["Fine Line".to_string(), "Blackwork".to_string()],
        availability: "Booking two weeks out".to_string(),
        ..Default::default()
    }
}
