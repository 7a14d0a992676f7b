//! InkGenius: design a tattoo from a text description, try it on a photo, and find an artist.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use inkgenius::{Config, ContractStatus, TattooStyle};

mod commands;

#[derive(Parser)]
#[command(name = "inkgenius")]
#[command(about = "Generate tattoo designs, try them on, and find an artist")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Local storage database (defaults to INKGENIUS_DB or ./inkgenius.db)
    #[arg(long, value_name = "FILE", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum BlendArg {
    Normal,
    Multiply,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate candidate designs from a description
    Generate {
        /// What the tattoo should show
        #[arg(value_name = "DESCRIPTION", required = true)]
        description: Vec<String>,

        /// Tattoo style (e.g. "traditional", "fine-line", "japanese")
        #[arg(short, long, default_value = "traditional")]
        style: TattooStyle,

        /// Use colour ink instead of black and grey
        #[arg(long)]
        color: bool,

        /// Body placement the design should suit
        #[arg(long)]
        placement: Option<String>,

        /// Number of designs (1-4)
        #[arg(short = 'n', long, default_value = "4")]
        count: u32,

        /// Let the model expand the description first
        #[arg(long)]
        enhance: bool,

        /// Directory for the generated images
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Save design number N to the gallery
        #[arg(long, value_name = "N")]
        save: Option<usize>,
    },

    /// Change an existing design with a written instruction
    Refine {
        design: PathBuf,
        /// What should change
        #[arg(required = true)]
        instruction: Vec<String>,
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Turn a design into a line-art stencil
    Stencil {
        design: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
        /// Approximate locally instead of calling the model
        #[arg(long)]
        local: bool,
        /// Also attach the stencil to this saved project
        #[arg(long, value_name = "ID")]
        project: Option<String>,
    },

    /// Place a design on a photo
    TryOn {
        photo: PathBuf,
        design: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
        /// Design centre, x in photo pixels (default: photo centre)
        #[arg(long)]
        x: Option<f32>,
        /// Design centre, y in photo pixels (default: photo centre)
        #[arg(long)]
        y: Option<f32>,
        /// Design pixels to photo pixels (default: fit a third of the photo)
        #[arg(long)]
        scale: Option<f32>,
        /// Clockwise rotation in degrees
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        rotation: f32,
        #[arg(long, default_value = "0.9")]
        opacity: f32,
        #[arg(long, value_enum, default_value = "multiply")]
        blend: BlendArg,
        /// Ask the model to make the result look like a healed tattoo
        #[arg(long)]
        realistic: bool,
    },

    /// Save a design file to the gallery
    Save {
        design: PathBuf,
        #[arg(long)]
        stencil: Option<PathBuf>,
        /// Description the design was made from
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Search for tattoo artists near a location
    Artists {
        /// City or area to search
        #[arg(short, long)]
        location: String,
        /// Style to look for
        #[arg(short, long, default_value = "traditional")]
        style: String,
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
        /// Attach a found artist to this saved project
        #[arg(long, value_name = "ID", requires = "pick")]
        project: Option<String>,
        /// Artist number to attach (1-based)
        #[arg(long, value_name = "N")]
        pick: Option<usize>,
    },

    /// Send a message to the artist of a saved project
    Message {
        project: String,
        /// Message text (drafted by the model if omitted)
        text: Vec<String>,
        /// Do not ask for the artist's reply
        #[arg(long)]
        no_reply: bool,
    },

    /// Browse and manage saved projects
    Gallery {
        #[command(subcommand)]
        command: GalleryCommand,
    },

    /// Open the desktop app
    #[cfg(feature = "gui")]
    Gui,
}

#[derive(Subcommand)]
enum GalleryCommand {
    /// List saved projects
    List,
    /// Show one project and its conversation
    Show { id: String },
    /// Delete a project
    Delete { id: String },
    /// Write a project bundle (.inkp)
    Export { id: String, path: PathBuf },
    /// Add a project from a bundle
    Import { path: PathBuf },
    /// Set the contract of a project
    Contract {
        id: String,
        /// Pending, Approved, In Progress or Completed
        #[arg(long)]
        status: ContractStatus,
        #[arg(long)]
        price: Option<f64>,
        /// Appointment date
        #[arg(long)]
        date: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = if cli.verbose {
        EnvFilter::new("inkgenius=debug,info")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    #[cfg(feature = "gui")]
    if matches!(cli.command, Commands::Gui) {
        // iced owns its own runtime
        return commands::gui::run(config);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(cli.command, config))
}

async fn run(command: Commands, config: Config) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            description,
            style,
            color,
            placement,
            count,
            enhance,
            out_dir,
            save,
        } => {
            let options = commands::design::GenerateOptions {
                description: description.join(" "),
                style,
                color,
                placement,
                count,
                enhance,
                out_dir,
                save,
            };
            commands::design::generate(&config, options).await?;
        }
        Commands::Refine {
            design,
            instruction,
            out,
        } => {
            commands::design::refine(&config, &design, &instruction.join(" "), &out).await?;
        }
        Commands::Stencil {
            design,
            out,
            local,
            project,
        } => {
            commands::design::stencil(&config, &design, &out, local, project.as_deref()).await?;
        }
        Commands::TryOn {
            photo,
            design,
            out,
            x,
            y,
            scale,
            rotation,
            opacity,
            blend,
            realistic,
        } => {
            let options = commands::try_on::TryOnOptions {
                x,
                y,
                scale,
                rotation,
                opacity,
                blend: match blend {
                    BlendArg::Normal => inkgenius::BlendMode::Normal,
                    BlendArg::Multiply => inkgenius::BlendMode::Multiply,
                },
                realistic,
            };
            commands::try_on::run(&config, &photo, &design, &out, options).await?;
        }
        Commands::Save {
            design,
            stencil,
            prompt,
        } => {
            commands::design::save(&config, &design, stencil.as_deref(), prompt).await?;
        }
        Commands::Artists {
            location,
            style,
            json,
            project,
            pick,
        } => {
            commands::artists::search(&config, &style, &location, json, project.as_deref(), pick).await?;
        }
        Commands::Message {
            project,
            text,
            no_reply,
        } => {
            let text = (!text.is_empty()).then(|| text.join(" "));
            commands::artists::message(&config, &project, text, !no_reply).await?;
        }
        Commands::Gallery { command } => match command {
            GalleryCommand::List => commands::gallery::list(&config).await?,
            GalleryCommand::Show { id } => commands::gallery::show(&config, &id).await?,
            GalleryCommand::Delete { id } => commands::gallery::delete(&config, &id).await?,
            GalleryCommand::Export { id, path } => commands::gallery::export(&config, &id, &path).await?,
            GalleryCommand::Import { path } => commands::gallery::import(&config, &path).await?,
            GalleryCommand::Contract {
                id,
                status,
                price,
                date,
            } => commands::gallery::contract(&config, &id, status, price, date).await?,
        },
        #[cfg(feature = "gui")]
        Commands::Gui => unreachable!("handled before the runtime starts"),
    }

    Ok(())
}
