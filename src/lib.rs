pub mod compose;
pub mod config;
pub mod core;
pub mod genai;
pub mod models;
pub mod request;
pub mod service;
pub mod wizard;

pub use compose::{BlendMode, Placement};
pub use config::{Config, ModelSet};
pub use crate::core::db::{ProjectRepository, StudioDb};
pub use genai::{GenAiClient, ModelTransport};
pub use models::{Artist, Contract, ContractStatus, DesignBrief, DesignCandidate, Message, Project, TattooStyle};
pub use request::RequestState;
pub use service::{ArtistQuery, ArtistSearch, TattooService};
pub use wizard::{Step, Wizard};

#[cfg(feature = "gui")]
pub mod gui;
