//! Tattoo studio operations on top of the hosted model API.
//!
//! Every operation builds a prompt, calls one model endpoint, and unwraps an image or text
//! payload. Failures come back as errors naming the action that failed.

pub mod artists;
pub mod prompts;

use anyhow::Context;
use tracing::{info, warn};

use crate::config::ModelSet;
use crate::core::data_uri::DataUri;
use crate::genai::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, ModelTransport, Part,
    PredictRequest, Tool, WebSource,
};
use crate::models::{Artist, DesignBrief, DesignCandidate, Message};

/// Most images the generation endpoint returns per call
pub const MAX_DESIGNS: u32 = 4;

/// Where and what to search for on the find-artist step.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistQuery {
    pub style: String,
    pub location: String,
}

/// Artists found by a grounded search plus the web pages the answer was based on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistSearch {
    pub artists: Vec<Artist>,
    pub sources: Vec<WebSource>,
}

pub struct TattooService<T> {
    transport: T,
    models: ModelSet,
}

impl<T: ModelTransport> TattooService<T> {
    pub fn new(transport: T, models: ModelSet) -> Self {
        Self { transport, models }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Generate `count` candidate designs (clamped to 1..=4) for the brief.
    pub async fn generate_designs(
        &self,
        brief: &DesignBrief,
        count: u32,
    ) -> anyhow::Result<Vec<DesignCandidate>> {
        if brief.description.trim().is_empty() {
            anyhow::bail!("Describe the tattoo you want before generating designs");
        }
        let count = count.clamp(1, MAX_DESIGNS);
        let prompt = prompts::design_prompt(brief);
        info!(style = %brief.style, count, "Generating tattoo designs");

        let response = self
            .transport
            .predict(&self.models.image, &PredictRequest::new(&prompt, count))
            .await
            .context("Design generation failed")?;

        let mut candidates = Vec::new();
        for prediction in response.predictions {
            let Some(payload) = prediction.bytes_base64_encoded else {
                continue;
            };
            let mime_type = prediction.mime_type.unwrap_or_else(|| "image/png".to_string());
            match DataUri::from_base64(mime_type, &payload) {
                Ok(uri) => candidates.push(DesignCandidate {
                    id: uuid::Uuid::new_v4().to_string(),
                    image: uri.to_string(),
                    prompt: prompt.clone(),
                }),
                Err(e) => warn!("Dropping undecodable design: {e:#}"),
            }
        }

        if candidates.is_empty() {
            anyhow::bail!(
                "Design generation failed: the model returned no images. Try rewording the description"
            );
        }
        Ok(candidates)
    }

    /// Apply a written change to an existing design.
    pub async fn refine_design(&self, design: &str, instruction: &str) -> anyhow::Result<String> {
        if instruction.trim().is_empty() {
            anyhow::bail!("Say what should change in the design");
        }
        self.edit_image("Design refinement", design, &prompts::refine_prompt(instruction))
            .await
    }

    /// Line-art-only version of a design.
    pub async fn create_stencil(&self, design: &str) -> anyhow::Result<String> {
        self.edit_image("Stencil creation", design, prompts::STENCIL_PROMPT)
            .await
    }

    /// Turn a flat composite of design-on-photo into a realistic healed-tattoo render.
    pub async fn render_on_skin(&self, composite: &str) -> anyhow::Result<String> {
        self.edit_image("Skin rendering", composite, prompts::SKIN_RENDER_PROMPT)
            .await
    }

    /// Rewrite a short idea into a richer description.
    pub async fn enhance_description(&self, brief: &DesignBrief) -> anyhow::Result<String> {
        let prompt = format!(
            "{}\n\nStyle: {}\nIdea: {}",
            prompts::ENHANCE_PROMPT,
            brief.style,
            brief.description.trim()
        );
        self.generate_text("Description enhancement", &prompt, 0.9).await
    }

    /// Search the web for artists matching the query.
    pub async fn find_artists(&self, query: &ArtistQuery) -> anyhow::Result<ArtistSearch> {
        if query.location.trim().is_empty() {
            anyhow::bail!("Enter a city or area to search for artists");
        }
        info!(style = %query.style, location = %query.location, "Searching for artists");
        let request = GenerateContentRequest::from_parts(vec![Part::text(
            prompts::artist_search_prompt(query.style.trim(), query.location.trim()),
        )])
        .with_tool(Tool::google_search());

        let response = self
            .transport
            .generate_content(&self.models.text, &request)
            .await
            .context("Artist search failed")?;
        let text = expect_text("Artist search", &response)?;
        let artists = artists::parse_artists(&text).context("Artist search failed")?;
        info!(found = artists.len(), "Artist search finished");

        Ok(ArtistSearch {
            artists,
            sources: response.web_sources(),
        })
    }

    /// First message to send to an artist about a design.
    pub async fn draft_inquiry(
        &self,
        artist: &Artist,
        brief: Option<&DesignBrief>,
    ) -> anyhow::Result<String> {
        self.generate_text("Message drafting", &prompts::inquiry_prompt(artist, brief), 0.7)
            .await
    }

    /// The artist's next reply in a conversation.
    pub async fn artist_reply(&self, artist: &Artist, conversation: &[Message]) -> anyhow::Result<String> {
        if conversation.is_empty() {
            anyhow::bail!("There is no message for the artist to reply to");
        }
        self.generate_text(
            "Artist reply",
            &prompts::artist_reply_prompt(artist, conversation),
            0.8,
        )
        .await
    }

    async fn edit_image(&self, action: &str, image: &str, instruction: &str) -> anyhow::Result<String> {
        let source = DataUri::parse(image).with_context(|| format!("{action} failed: invalid input image"))?;
        let request = GenerateContentRequest::from_parts(vec![
            Part::inline_image(&source.mime_type, source.base64_payload()),
            Part::text(instruction),
        ])
        .with_config(GenerationConfig::image_output());

        info!(action, model = %self.models.edit, "Editing image");
        let response = self
            .transport
            .generate_content(&self.models.edit, &request)
            .await
            .with_context(|| format!("{action} failed"))?;

        if let Some(reason) = response.block_reason() {
            anyhow::bail!("{action} failed: the request was blocked ({reason})");
        }
        let blob = response.first_image().ok_or_else(|| {
            let detail = response
                .text()
                .map(|t| format!(": {}", t.trim()))
                .unwrap_or_default();
            anyhow::anyhow!("{action} failed: the model returned no image{detail}")
        })?;
        let uri = DataUri::from_base64(&blob.mime_type, &blob.data)
            .with_context(|| format!("{action} failed"))?;
        Ok(uri.to_string())
    }

    async fn generate_text(&self, action: &str, prompt: &str, temperature: f32) -> anyhow::Result<String> {
        let request = GenerateContentRequest::from_parts(vec![Part::text(prompt)])
            .with_system_instruction(prompts::STUDIO_SYSTEM_PROMPT)
            .with_config(GenerationConfig::with_temperature(temperature));
        let response = self
            .transport
            .generate_content(&self.models.text, &request)
            .await
            .with_context(|| format!("{action} failed"))?;
        Ok(expect_text(action, &response)?.trim().to_string())
    }
}

fn expect_text(action: &str, response: &GenerateContentResponse) -> anyhow::Result<String> {
    if let Some(reason) = response.block_reason() {
        anyhow::bail!("{action} failed: the request was blocked ({reason})");
    }
    response
        .text()
        .ok_or_else(|| anyhow::anyhow!("{action} failed: the model returned an empty reply"))
}
