//! Artist commands: grounded search and the conversation with a project's artist.

use anyhow::Result;
use tracing::info;

use inkgenius::models::Message;
use inkgenius::{ArtistQuery, Config, ProjectRepository};

use super::{connect_service, open_studio};

/// Runs the artists command.
///
/// Prints the artists found with the web pages the answer was grounded on. With `project` and
/// `pick`, the chosen artist is attached to that saved project.
pub async fn search(
    config: &Config,
    style: &str,
    location: &str,
    json: bool,
    project: Option<&str>,
    pick: Option<usize>,
) -> Result<()> {
    let service = connect_service(config)?;
    let query = ArtistQuery {
        style: style.to_string(),
        location: location.to_string(),
    };
    let found = service.find_artists(&query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&found.artists)?);
    } else if found.artists.is_empty() {
        println!("No artists found near {location}");
    } else {
        for (index, artist) in found.artists.iter().enumerate() {
            println!("{}. {}", index + 1, artist.name);
            if !artist.address.is_empty() {
                println!("   {}", artist.address);
            }
            if !artist.specialties.is_empty() {
                println!("   Specialties: {}", artist.specialties.join(", "));
            }
            println!("   Availability: {}", artist.availability);
            if !artist.description.is_empty() {
                println!("   {}", artist.description);
            }
        }
        if !found.sources.is_empty() {
            println!("\nSources:");
            for source in &found.sources {
                println!("  {} <{}>", source.title, source.uri);
            }
        }
    }

    if let (Some(id), Some(number)) = (project, pick) {
        let artist = number
            .checked_sub(1)
            .and_then(|i| found.artists.get(i))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("There is no artist number {number}"))?;
        let studio = open_studio(config).await?;
        let name = artist.name.clone();
        studio.set_artist(id, artist).await?;
        println!("Attached {name} to project {id}");
    }

    Ok(())
}

/// Runs the message command.
///
/// Appends the user's message (drafted by the model when `text` is `None`) and, if asked, the
/// artist's reply.
pub async fn message(config: &Config, id: &str, text: Option<String>, reply: bool) -> Result<()> {
    let studio = open_studio(config).await?;
    let project = studio
        .get_project(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No saved project with id {id}"))?;
    let artist = project
        .artist
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Project {id} has no artist yet; pick one with `artists --project`"))?;

    let service = connect_service(config)?;
    let text = match text {
        Some(text) if !text.trim().is_empty() => text,
        _ => service.draft_inquiry(&artist, project.brief().as_ref()).await?,
    };

    let project = studio.append_message(id, Message::from_user(text.trim())).await?;
    println!("You: {}", text.trim());

    if reply {
        let answer = service.artist_reply(&artist, &project.conversation).await?;
        studio.append_message(id, Message::from_artist(answer.as_str())).await?;
        println!("{}: {answer}", artist.name);
    }
    info!(project = id, "Conversation updated");
    Ok(())
}
