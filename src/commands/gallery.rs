//! Gallery commands: browse, export and manage saved projects.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use inkgenius::core::db::{export_bundle, import_bundle};
use inkgenius::models::Sender;
use inkgenius::{Config, Contract, ContractStatus, ProjectRepository};

use super::open_studio;

/// Runs the gallery list command.
pub async fn list(config: &Config) -> Result<()> {
    let studio = open_studio(config).await?;
    let projects = studio.list_projects().await?;
    if projects.is_empty() {
        println!("No saved projects");
        return Ok(());
    }

    for project in &projects {
        let artist = project.artist.as_ref().map_or("no artist", |a| a.name.as_str());
        let status = project
            .contract
            .as_ref()
            .map_or_else(|| "no contract".to_string(), |c| c.status.to_string());
        println!(
            "{}  {}  {artist}  {status}  {} messages",
            project.id,
            project.saved_at_display(),
            project.conversation.len()
        );
    }
    Ok(())
}

/// Runs the gallery show command.
pub async fn show(config: &Config, id: &str) -> Result<()> {
    let studio = open_studio(config).await?;
    let project = studio
        .get_project(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No saved project with id {id}"))?;

    println!("Project {}", project.id);
    println!("Saved:   {}", project.saved_at_display());
    if let Some(prompt) = &project.prompt {
        println!("Prompt:  {prompt}");
    }
    println!("Stencil: {}", if project.stencil.is_some() { "yes" } else { "no" });
    if let Some(artist) = &project.artist {
        println!("Artist:  {} ({})", artist.name, artist.address);
    }
    if let Some(contract) = &project.contract {
        print!("Contract: {}", contract.status);
        if let Some(price) = contract.price {
            print!(", {price:.2}");
        }
        if let Some(date) = &contract.date {
            print!(", {date}");
        }
        println!();
    }

    if !project.conversation.is_empty() {
        println!();
        let artist_name = project.artist.as_ref().map_or("Artist", |a| a.name.as_str());
        for message in &project.conversation {
            let who = match message.sender {
                Sender::User => "You",
                Sender::Artist => artist_name,
            };
            println!("{who}: {}", message.text);
        }
    }
    Ok(())
}

/// Runs the gallery delete command.
pub async fn delete(config: &Config, id: &str) -> Result<()> {
    let studio = open_studio(config).await?;
    studio.delete_project(id).await?;
    println!("Deleted project {id}");
    Ok(())
}

/// Runs the gallery export command.
pub async fn export(config: &Config, id: &str, path: &Path) -> Result<()> {
    let studio = open_studio(config).await?;
    let project = studio
        .get_project(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No saved project with id {id}"))?;
    export_bundle(&project, path)?;
    println!("{}", path.display());
    Ok(())
}

/// Runs the gallery import command. An existing project with the same id is replaced.
pub async fn import(config: &Config, path: &Path) -> Result<()> {
    let project = import_bundle(path)?;
    let studio = open_studio(config).await?;
    studio.save_project(&project).await?;
    info!(id = %project.id, "Imported project");
    println!("Imported project {}", project.id);
    Ok(())
}

/// Runs the gallery contract command.
pub async fn contract(
    config: &Config,
    id: &str,
    status: ContractStatus,
    price: Option<f64>,
    date: Option<String>,
) -> Result<()> {
    if price.is_some_and(|p| !p.is_finite() || p < 0.0) {
        anyhow::bail!("Price must be a non-negative number");
    }
    let studio = open_studio(config).await?;
    let project = studio.update_contract(id, Contract { status, price, date }).await?;
    if let Some(contract) = project.contract {
        println!("Project {id}: {}", contract.status);
    }
    Ok(())
}
