//! Design commands: generate, refine, stencil and save.

use std::path::{Path, PathBuf};

use anyhow::Result;
use image::DynamicImage;
use tracing::info;

use inkgenius::compose::linework_preview;
use inkgenius::core::data_uri::{decode_image_uri, image_to_uri};
use inkgenius::models::ColorMode;
use inkgenius::{Config, DesignBrief, Project, ProjectRepository, TattooStyle};

use super::{connect_service, open_studio, read_image_uri, write_image_uri};

pub struct GenerateOptions {
    pub description: String,
    pub style: TattooStyle,
    pub color: bool,
    pub placement: Option<String>,
    pub count: u32,
    pub enhance: bool,
    pub out_dir: PathBuf,
    /// 1-based design number to save to the gallery
    pub save: Option<usize>,
}

/// Runs the generate command.
///
/// Writes `design-<n>.png` files into the output directory and prints their paths.
///
/// # Errors
///
/// Returns an error if the model call fails or an image cannot be written.
pub async fn generate(config: &Config, options: GenerateOptions) -> Result<()> {
    let service = connect_service(config)?;

    let mut brief = DesignBrief::new(options.description, options.style);
    brief.color = if options.color { ColorMode::Color } else { ColorMode::BlackAndGrey };
    brief.placement = options.placement;

    if options.enhance {
        brief.description = service.enhance_description(&brief).await?;
        println!("Enhanced description: {}", brief.description);
    }

    let designs = service.generate_designs(&brief, options.count).await?;
    info!(count = designs.len(), "Designs generated");

    for (index, design) in designs.iter().enumerate() {
        let path = options.out_dir.join(format!("design-{}.png", index + 1));
        write_image_uri(&design.image, &path)?;
        println!("{}. {}", index + 1, path.display());
    }

    if let Some(number) = options.save {
        let design = number
            .checked_sub(1)
            .and_then(|i| designs.get(i))
            .ok_or_else(|| anyhow::anyhow!("There is no design number {number}"))?;
        let project = Project::new(design.image.clone()).with_prompt(brief.description.clone());
        let studio = open_studio(config).await?;
        studio.save_project(&project).await?;
        println!("Saved design {number} as project {}", project.id);
    }

    Ok(())
}

/// Runs the refine command.
pub async fn refine(config: &Config, design: &Path, instruction: &str, out: &Path) -> Result<()> {
    let service = connect_service(config)?;
    let refined = service.refine_design(&read_image_uri(design)?, instruction).await?;
    write_image_uri(&refined, out)?;
    println!("{}", out.display());
    Ok(())
}

/// Runs the stencil command, with the model or the local edge tracer.
pub async fn stencil(
    config: &Config,
    design: &Path,
    out: &Path,
    local: bool,
    project: Option<&str>,
) -> Result<()> {
    let source = read_image_uri(design)?;
    let stencil = if local {
        let lines = linework_preview(&decode_image_uri(&source)?);
        image_to_uri(&DynamicImage::ImageLuma8(lines))?
    } else {
        connect_service(config)?.create_stencil(&source).await?
    };
    write_image_uri(&stencil, out)?;
    println!("{}", out.display());

    if let Some(id) = project {
        let studio = open_studio(config).await?;
        studio.set_stencil(id, stencil).await?;
        println!("Attached stencil to project {id}");
    }
    Ok(())
}

/// Runs the save command.
pub async fn save(
    config: &Config,
    design: &Path,
    stencil: Option<&Path>,
    prompt: Option<String>,
) -> Result<()> {
    let mut project = Project::new(read_image_uri(design)?);
    project.stencil = stencil.map(read_image_uri).transpose()?;
    project.prompt = prompt;

    let studio = open_studio(config).await?;
    studio.save_project(&project).await?;
    println!("Saved project {}", project.id);
    Ok(())
}
