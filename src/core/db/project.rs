use std::future::Future;

use crate::models::{Artist, Contract, Message, Project};

/// Storage key holding the JSON array of saved projects
pub const PROJECTS_KEY: &str = "inkgenius_projects";

pub trait ProjectRepository {
    /// Saved projects, most recently added first.
    fn list_projects(&self) -> impl Future<Output = anyhow::Result<Vec<Project>>> + Send;
    fn get_project(&self, id: &str) -> impl Future<Output = anyhow::Result<Option<Project>>> + Send;
    /// Insert a new project at the front, or replace the stored project with the same id in place.
    fn save_project(&self, project: &Project) -> impl Future<Output = anyhow::Result<()>> + Send;
    fn delete_project(&self, id: &str) -> impl Future<Output = anyhow::Result<()>> + Send;
    fn append_message(
        &self,
        id: &str,
        message: Message,
    ) -> impl Future<Output = anyhow::Result<Project>> + Send;
    fn update_contract(
        &self,
        id: &str,
        contract: Contract,
    ) -> impl Future<Output = anyhow::Result<Project>> + Send;
    fn set_stencil(&self, id: &str, stencil: String) -> impl Future<Output = anyhow::Result<Project>> + Send;
    fn set_artist(&self, id: &str, artist: Artist) -> impl Future<Output = anyhow::Result<Project>> + Send;
}
