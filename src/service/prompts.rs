//! Prompt templates for the hosted model calls

use crate::models::{Artist, ColorMode, DesignBrief, Message, Sender};

/// Standing instruction for every text conversation with the model
pub const STUDIO_SYSTEM_PROMPT: &str = "You are the assistant inside InkGenius, a tattoo design studio. You help clients shape tattoo ideas and talk to tattoo artists. Be warm, concise and practical.";

pub const STENCIL_PROMPT: &str = "Convert this tattoo design into a clean tattoo stencil. Keep only crisp black outlines and essential contour lines on a pure white background. Remove all colour, shading, gradients and texture. Preserve the exact composition and proportions.";

pub const SKIN_RENDER_PROMPT: &str = "This photo shows a tattoo design digitally placed on skin. Make the tattoo look like a real, healed tattoo: follow the skin's curvature and texture, let skin tone and lighting show through the ink, and soften edges slightly. Do not change the design, the person, the pose or the background.";

pub const ENHANCE_PROMPT: &str = "Rewrite the client's tattoo idea as a single vivid paragraph an illustrator could draw from. Keep every element the client named, add composition and detail suggestions that suit the style, and do not add text or lettering unless the client asked for it. Reply with the paragraph only.";

/// Prompt for the text-to-image model
pub fn design_prompt(brief: &DesignBrief) -> String {
    let color = match brief.color {
        ColorMode::BlackAndGrey => "black and grey ink only",
        ColorMode::Color => "full colour ink",
    };
    let placement = brief
        .placement
        .as_deref()
        .map(|p| format!(" Designed to fit the {p}."))
        .unwrap_or_default();
    format!(
        "A tattoo design of {description}. Style: {style}. {color}.{placement} Isolated flash artwork centred on a plain white background, no skin, no body, no mockup, no text or watermark, high contrast, clean edges.",
        description = brief.description.trim().trim_end_matches('.'),
        style = brief.style.descriptor(),
    )
}

pub fn refine_prompt(instruction: &str) -> String {
    format!(
        "Edit this tattoo design: {}. Keep the same style, keep it isolated on a plain white background, and keep everything else unchanged.",
        instruction.trim().trim_end_matches('.')
    )
}

pub fn artist_search_prompt(style: &str, location: &str) -> String {
    format!(
        r#"Find up to 5 real, currently operating tattoo artists or studios near {location} who are known for {style} tattoos.

Return ONLY a JSON array. Each element must have exactly these keys:
{{
  "name": "artist or studio name",
  "description": "one or two sentences about their work",
  "address": "street address",
  "coordinates": {{ "lat": 0.0, "lng": 0.0 }},
  "specialties": ["style", "style"],
  "availability": "booking status if known, otherwise \"Unknown\"",
  "portfolio": ["https://..."]
}}
Do not include markdown fences or any text outside the JSON array."#
    )
}

pub fn inquiry_prompt(artist: &Artist, brief: Option<&DesignBrief>) -> String {
    let idea = brief
        .map(|b| format!("The design is {} in a {} style.", b.description.trim(), b.style))
        .unwrap_or_else(|| "The client has a finished design ready to share.".to_string());
    let specialties = if artist.specialties.is_empty() {
        String::new()
    } else {
        format!(" They specialise in {}.", artist.specialties.join(", "))
    };
    format!(
        "Write a short, friendly first message from a client to the tattoo artist {name}.{specialties} {idea} Ask about availability, an estimated price and next steps. Sign off as \"the InkGenius client\". Reply with the message text only.",
        name = artist.name,
    )
}

/// Conversation so far, written from the artist's point of view for a simulated reply.
pub fn artist_reply_prompt(artist: &Artist, conversation: &[Message]) -> String {
    let transcript: Vec<String> = conversation
        .iter()
        .map(|message| {
            let who = match message.sender {
                Sender::User => "Client",
                Sender::Artist => artist.name.as_str(),
            };
            format!("{who}: {}", message.text)
        })
        .collect();
    format!(
        "You are {name}, a tattoo artist. {description}\nContinue this conversation with one reply as the artist. Be professional and specific about scheduling and pricing when asked. Reply with the message text only.\n\n{transcript}",
        name = artist.name,
        description = artist.description,
        transcript = transcript.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TattooStyle;

    #[test]
    fn test_design_prompt_mentions_brief() {
        let mut brief = DesignBrief::new("a fox curled around a crescent moon.", TattooStyle::FineLine);
        brief.placement = Some("inner forearm".to_string());
        let prompt = design_prompt(&brief);

        assert!(prompt.contains("a fox curled around a crescent moon."));
        assert!(!prompt.contains("moon.."));
        assert!(prompt.contains("single-needle"));
        assert!(prompt.contains("inner forearm"));
        assert!(prompt.contains("white background"));
    }

    #[test]
    fn test_reply_prompt_labels_speakers() {
        let artist = Artist {
            name: "Mara Vey".to_string(),
            ..Default::default()
        };
        let conversation = vec![Message::from_user("Hello!"), Message::from_artist("Hi, what's the idea?")];
        let prompt = artist_reply_prompt(&artist, &conversation);
        assert!(prompt.contains("Client: Hello!"));
        assert!(prompt.contains("Mara Vey: Hi, what's the idea?"));
    }
}
