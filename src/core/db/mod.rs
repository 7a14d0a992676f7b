mod bundle;
mod project;
mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use sqlx::{SqliteConnection, sqlite::SqlitePool};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::{Artist, Contract, Message, Project};

pub use bundle::{export_bundle, import_bundle};
pub use project::{PROJECTS_KEY, ProjectRepository};

/// Local key/value storage backed by a SQLite file.
///
/// Mirrors the browser's `localStorage`: string keys, string values. Saved projects live under
/// [`PROJECTS_KEY`] as one JSON array.
#[derive(Debug, Clone)]
pub struct StudioDb {
    db_file: PathBuf,
    pool: SqlitePool,
    /// Held across every read-modify-write of the projects array; shared by clones
    write_lock: Arc<Mutex<()>>,
}

impl StudioDb {
    pub async fn open<P: AsRef<Path>>(db_file: P) -> anyhow::Result<Self> {
        let db_file = db_file.as_ref().to_path_buf();
        let pool = state::connect(&db_file).await?;
        debug!(path = %db_file.display(), "Opened studio storage");
        Ok(Self {
            db_file,
            pool,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_file
    }

    pub async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut conn = self.pool.acquire().await?;
        state::read_item(&mut conn, key).await
    }

    pub async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        state::write_item(&mut conn, key, value).await
    }

    pub async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        state::remove_item(&mut conn, key).await
    }

    /// Close the pool, flushing the WAL into the main database file.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Read-modify-write of the projects array inside one transaction.
    ///
    /// Writers take `write_lock` first: a deferred SQLite transaction that reads and then writes
    /// fails with a busy snapshot when another writer commits in between.
    /// Refuses to run if the stored array cannot be parsed, so a corrupt value is never clobbered.
    async fn modify_projects<R>(
        &self,
        f: impl FnOnce(&mut Vec<Project>) -> anyhow::Result<R> + Send,
    ) -> anyhow::Result<R> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;
        let mut projects = match state::read_item(&mut tx, PROJECTS_KEY).await? {
            Some(raw) => serde_json::from_str::<Vec<Project>>(&raw)
                .context("Stored projects are unreadable; refusing to overwrite them")?,
            None => Vec::new(),
        };
        let result = f(&mut projects)?;
        let raw = serde_json::to_string(&projects)?;
        state::write_item(&mut tx, PROJECTS_KEY, &raw).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn modify_project(
        &self,
        id: &str,
        f: impl FnOnce(&mut Project) + Send,
    ) -> anyhow::Result<Project> {
        self.modify_projects(|projects| {
            let project = projects
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| anyhow::anyhow!("No saved project with id {id}"))?;
            f(project);
            Ok(project.clone())
        })
        .await
    }
}

async fn load_projects(conn: &mut SqliteConnection) -> anyhow::Result<Vec<Project>> {
    let Some(raw) = state::read_item(conn, PROJECTS_KEY).await? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(projects) => Ok(projects),
        Err(e) => {
            warn!("Ignoring unreadable saved projects: {e}");
            Ok(Vec::new())
        }
    }
}

impl ProjectRepository for StudioDb {
    async fn list_projects(&self) -> anyhow::Result<Vec<Project>> {
        let mut conn = self.pool.acquire().await?;
        load_projects(&mut conn).await
    }

    async fn get_project(&self, id: &str) -> anyhow::Result<Option<Project>> {
        Ok(self.list_projects().await?.into_iter().find(|p| p.id == id))
    }

    async fn save_project(&self, project: &Project) -> anyhow::Result<()> {
        let project = project.clone();
        self.modify_projects(move |projects| {
            match projects.iter_mut().find(|p| p.id == project.id) {
                Some(existing) => *existing = project,
                None => projects.insert(0, project),
            }
            Ok(())
        })
        .await
    }

    async fn delete_project(&self, id: &str) -> anyhow::Result<()> {
        self.modify_projects(|projects| {
            let before = projects.len();
            projects.retain(|p| p.id != id);
            if projects.len() == before {
                anyhow::bail!("No saved project with id {id}");
            }
            Ok(())
        })
        .await
    }

    async fn append_message(&self, id: &str, message: Message) -> anyhow::Result<Project> {
        self.modify_project(id, move |project| project.conversation.push(message))
            .await
    }

    async fn update_contract(&self, id: &str, contract: Contract) -> anyhow::Result<Project> {
        self.modify_project(id, move |project| project.contract = Some(contract))
            .await
    }

    async fn set_stencil(&self, id: &str, stencil: String) -> anyhow::Result<Project> {
        self.modify_project(id, move |project| project.stencil = Some(stencil))
            .await
    }

    async fn set_artist(&self, id: &str, artist: Artist) -> anyhow::Result<Project> {
        self.modify_project(id, move |project| project.artist = Some(artist))
            .await
    }
}
