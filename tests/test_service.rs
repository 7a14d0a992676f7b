//! Integration tests for the tattoo service against a canned model host.
//!
//! Tests cover:
//! - Design generation: request shape, count clamping, empty results
//! - Image edits (refine, stencil, skin render) and blocked requests
//! - Grounded artist search with sources
//! - Drafted inquiries and simulated artist replies

mod common;

use inkgenius::ArtistQuery;
use inkgenius::core::data_uri::DataUri;

use common::*;

#[tokio::test]
async fn test_generate_designs_returns_data_uris() -> anyhow::Result<()> {
    let service = mock_service();
    service.transport().push_prediction(Ok(predictions(3)));

    let brief = DesignBrief::new("a fox curled around a crescent moon", TattooStyle::FineLine);
    let designs = service.generate_designs(&brief, 3).await?;

    assert_eq!(designs.len(), 3);
    for design in &designs {
        let uri = DataUri::parse(&design.image)?;
        assert_eq!(uri.mime_type, "image/png");
        assert!(uri.decode_image().is_ok());
        assert!(design.prompt.contains("crescent moon"));
    }
    assert_ne!(designs[0].id, designs[1].id);

    let calls = service.transport().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "test-image");
    assert_eq!(calls[0].body["parameters"]["sampleCount"], 3);

    Ok(())
}

#[tokio::test]
async fn test_generate_designs_clamps_the_count() -> anyhow::Result<()> {
    let service = mock_service();
    service.transport().push_prediction(Ok(predictions(4)));
    service.transport().push_prediction(Ok(predictions(1)));

    let brief = DesignBrief::new("koi fish", TattooStyle::Japanese);
    service.generate_designs(&brief, 12).await?;
    service.generate_designs(&brief, 0).await?;

    let calls = service.transport().calls();
    assert_eq!(calls[0].body["parameters"]["sampleCount"], 4);
    assert_eq!(calls[1].body["parameters"]["sampleCount"], 1);

    Ok(())
}

#[tokio::test]
async fn test_generate_designs_rejects_empty_input_and_empty_output() {
    let service = mock_service();
    let empty = DesignBrief::new("   ", TattooStyle::Traditional);
    assert!(service.generate_designs(&empty, 4).await.is_err());
    // nothing was sent
    assert!(service.transport().calls().is_empty());

    service.transport().push_prediction(Ok(predictions(0)));
    let brief = DesignBrief::new("swallow", TattooStyle::Traditional);
    let err = service.generate_designs(&brief, 4).await.unwrap_err();
    assert!(format!("{err:#}").contains("no images"));
}

#[tokio::test]
async fn test_transport_errors_name_the_action() {
    let service = mock_service();
    service
        .transport()
        .push_prediction(Err(anyhow::anyhow!("API request failed with status 503")));

    let brief = DesignBrief::new("dagger", TattooStyle::Traditional);
    let err = service.generate_designs(&brief, 2).await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.starts_with("Design generation failed"));
    assert!(message.contains("503"));
}

#[tokio::test]
async fn test_stencil_sends_the_design_and_returns_the_edit() -> anyhow::Result<()> {
    let service = mock_service();
    service.transport().push_content(Ok(image_response(&test_design_base64())));

    let design = test_design_uri();
    let stencil = service.create_stencil(&design).await?;
    assert!(stencil.starts_with("data:image/png;base64,"));

    let calls = service.transport().calls();
    assert_eq!(calls[0].model, "test-edit");
    let parts = &calls[0].body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(
        parts[0]["inlineData"]["data"],
        DataUri::parse(&design)?.base64_payload().as_str()
    );
    assert!(parts[1]["text"].as_str().unwrap().contains("stencil"));
    assert_eq!(
        calls[0].body["generationConfig"]["responseModalities"],
        serde_json::json!(["IMAGE", "TEXT"])
    );

    Ok(())
}

#[tokio::test]
async fn test_refine_requires_an_instruction() -> anyhow::Result<()> {
    let service = mock_service();
    assert!(service.refine_design(&test_design_uri(), "  ").await.is_err());

    service.transport().push_content(Ok(image_response(&test_design_base64())));
    service
        .refine_design(&test_design_uri(), "add a second moon")
        .await?;
    let calls = service.transport().calls();
    assert_eq!(calls.len(), 1);
    assert!(
        calls[0].body["contents"][0]["parts"][1]["text"]
            .as_str()
            .unwrap()
            .contains("add a second moon")
    );

    Ok(())
}

#[tokio::test]
async fn test_blocked_or_imageless_edits_fail() {
    let service = mock_service();
    service.transport().push_content(Ok(blocked_response("SAFETY")));
    service.transport().push_content(Ok(text_response("I can't edit this image.")));

    let err = service.render_on_skin(&test_design_uri()).await.unwrap_err();
    assert!(format!("{err:#}").contains("blocked (SAFETY)"));

    let err = service.render_on_skin(&test_design_uri()).await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("no image"));
    assert!(message.contains("I can't edit this image."));
}

#[tokio::test]
async fn test_find_artists_parses_reply_and_sources() -> anyhow::Result<()> {
    let service = mock_service();
    let reply = serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": "```json\n[{\"name\": \"Iron Rose\", \"address\": \"5 Bay St\", \"coordinates\": {\"lat\": 37.8, \"lng\": -122.4}, \"specialties\": [\"Traditional\"], \"availability\": \"Open\"}]\n```" }] },
            "groundingMetadata": { "groundingChunks": [
                { "web": { "uri": "https://ironrose.example", "title": "Iron Rose Tattoo" } },
                { "web": { "uri": "https://ironrose.example", "title": "Iron Rose Tattoo" } }
            ] }
        }]
    });
    service
        .transport()
        .push_content(Ok(serde_json::from_value(reply)?));

    let query = ArtistQuery {
        style: "Traditional".to_string(),
        location: "San Francisco".to_string(),
    };
    let search = service.find_artists(&query).await?;

    assert_eq!(search.artists.len(), 1);
    assert_eq!(search.artists[0].name, "Iron Rose");
    assert_eq!(search.sources.len(), 1);
    assert_eq!(search.sources[0].title, "Iron Rose Tattoo");

    let calls = service.transport().calls();
    assert_eq!(calls[0].model, "test-text");
    assert!(calls[0].body["tools"][0]["googleSearch"].is_object());
    let prompt = calls[0].body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("San Francisco"));
    assert!(prompt.contains("Traditional"));

    Ok(())
}

#[tokio::test]
async fn test_find_artists_needs_a_location() {
    let service = mock_service();
    let query = ArtistQuery {
        style: "Blackwork".to_string(),
        location: " ".to_string(),
    };
    assert!(service.find_artists(&query).await.is_err());
    assert!(service.transport().calls().is_empty());
}

#[tokio::test]
async fn test_artist_reply_sees_the_conversation() -> anyhow::Result<()> {
    let service = mock_service();
    service
        .transport()
        .push_content(Ok(text_response("  Thanks! I have an opening on the 14th.  ")));

    let artist = make_test_artist("Black Lotus");
    let conversation = vec![Message::from_user("Could you do this on my forearm?")];
    let reply = service.artist_reply(&artist, &conversation).await?;
    assert_eq!(reply, "Thanks! I have an opening on the 14th.");

    let calls = service.transport().calls();
    let body = &calls[0].body;
    assert!(body["systemInstruction"]["parts"][0]["text"].is_string());
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Could you do this on my forearm?"));
    assert!(prompt.contains("Black Lotus"));

    assert!(service.artist_reply(&artist, &[]).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_draft_inquiry_and_enhance_return_trimmed_text() -> anyhow::Result<()> {
    let service = mock_service();
    service
        .transport()
        .push_content(Ok(text_response("Hi Black Lotus, I'd love to book a session.\n")));
    service
        .transport()
        .push_content(Ok(text_response("A sleeping fox wrapped around a thin crescent moon.")));

    let artist = make_test_artist("Black Lotus");
    let brief = DesignBrief::new("fox and moon", TattooStyle::FineLine);
    let draft = service.draft_inquiry(&artist, Some(&brief)).await?;
    assert_eq!(draft, "Hi Black Lotus, I'd love to book a session.");

    let enhanced = service.enhance_description(&brief).await?;
    assert!(enhanced.starts_with("A sleeping fox"));

    let calls = service.transport().calls();
    assert!(
        calls[0].body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("fox and moon")
    );

    Ok(())
}

#[tokio::test]
async fn test_draft_for_saved_project_mentions_its_description() -> anyhow::Result<()> {
    let service = mock_service();
    service
        .transport()
        .push_content(Ok(text_response("Hi! I'd love a Japanese koi sleeve.")));

    let project = make_test_project("a japanese koi climbing a waterfall")
        .with_artist(make_test_artist("Wave Ink"));
    let artist = project.artist.clone().expect("artist was set");
    service.draft_inquiry(&artist, project.brief().as_ref()).await?;

    let calls = service.transport().calls();
    let prompt = calls[0].body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("a japanese koi climbing a waterfall"));
    assert!(prompt.contains("Japanese style"));

    Ok(())
}
