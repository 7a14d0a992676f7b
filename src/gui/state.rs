use std::collections::HashMap;
use std::sync::Arc;

use iced::widget::image::Handle;
use image::{DynamicImage, RgbaImage};

use crate::compose;
use crate::config::Config;
use crate::core::data_uri::{DataUri, image_to_uri};
use crate::core::db::StudioDb;
use crate::genai::GenAiClient;
use crate::models::{ContractStatus, Project};
use crate::request::RequestState;
use crate::service::TattooService;
use crate::wizard::Wizard;

pub type Service = Arc<TattooService<GenAiClient>>;

/// Paper brighter than this is knocked out of a design before it is placed on skin
const KNOCKOUT_THRESHOLD: u8 = 235;

/// Editable fields of the open gallery project.
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub id: String,
    pub chat: String,
    pub status: Option<ContractStatus>,
    pub price: String,
    pub date: String,
}

impl ProjectDraft {
    pub fn for_project(project: &Project) -> Self {
        let contract = project.contract.as_ref();
        Self {
            id: project.id.clone(),
            chat: String::new(),
            status: contract.map(|c| c.status),
            price: contract
                .and_then(|c| c.price)
                .map(|p| p.to_string())
                .unwrap_or_default(),
            date: contract.and_then(|c| c.date.clone()).unwrap_or_default(),
        }
    }
}

pub struct AppState {
    pub config: Config,
    service: Option<Service>,
    pub studio: RequestState<StudioDb>,
    pub wizard: Wizard,
    pub refine_instruction: String,
    /// Last action outcome shown under the current screen
    pub notice: Option<String>,
    /// Unrecoverable failure; the reload panel replaces every screen
    pub fatal: Option<String>,

    pub gallery: RequestState<Vec<Project>>,
    pub open_project: Option<ProjectDraft>,
    /// A gallery action (chat, contract, delete) is in flight
    pub gallery_busy: bool,

    photo_image: Option<DynamicImage>,
    design_ink: Option<RgbaImage>,
    preview: Option<RgbaImage>,
    pub preview_handle: Option<Handle>,
    /// Decoded images keyed by their data URI, so views don't decode every frame
    handles: HashMap<String, Handle>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let service = config.api_key.as_deref().and_then(|key| {
            GenAiClient::new(&config.api_base, key)
                .ok()
                .map(|client| Arc::new(TattooService::new(client, config.models.clone())))
        });
        Self {
            config,
            service,
            studio: RequestState::Pending,
            wizard: Wizard::new(),
            refine_instruction: String::new(),
            notice: None,
            fatal: None,
            gallery: RequestState::Idle,
            open_project: None,
            gallery_busy: false,
            photo_image: None,
            design_ink: None,
            preview: None,
            preview_handle: None,
            handles: HashMap::new(),
        }
    }

    pub fn service(&self) -> Result<Service, String> {
        self.service
            .clone()
            .ok_or_else(|| "No API key configured. Set GEMINI_API_KEY and reload".to_string())
    }

    pub fn studio(&self) -> Result<StudioDb, String> {
        match &self.studio {
            RequestState::Success(db) => Ok(db.clone()),
            RequestState::Error(e) => Err(e.clone()),
            _ => Err("Local storage is still opening".to_string()),
        }
    }

    /// Cache a displayable handle for an image data URI.
    pub fn remember_image(&mut self, uri: &str) {
        if self.handles.contains_key(uri) {
            return;
        }
        if let Ok(data) = DataUri::parse(uri) {
            self.handles.insert(uri.to_string(), Handle::from_bytes(data.bytes));
        }
    }

    pub fn image_handle(&self, uri: &str) -> Option<Handle> {
        self.handles.get(uri).cloned()
    }

    pub fn photo_size(&self) -> Option<(u32, u32)> {
        self.photo_image.as_ref().map(|p| (p.width(), p.height()))
    }

    /// Use `photo` for the try-on and centre the selected design on it.
    pub fn load_photo(&mut self, uri: String, photo: DynamicImage) -> anyhow::Result<()> {
        self.wizard.ensure_placement_editable()?;
        let design = self
            .wizard
            .selected_design()
            .ok_or_else(|| anyhow::anyhow!("Pick one of the designs first"))?;
        let design = DataUri::parse(&design.image)?.decode_image()?;
        let placement = compose::initial_placement(
            (photo.width(), photo.height()),
            (design.width(), design.height()),
        );
        self.design_ink = Some(compose::knock_out_background(&design, KNOCKOUT_THRESHOLD));
        self.photo_image = Some(photo);
        self.wizard.set_photo(uri, placement)?;
        self.render_preview();
        Ok(())
    }

    /// Re-composite after the placement changed. Does nothing while a render is in flight.
    pub fn render_preview(&mut self) {
        if self.wizard.composite.is_pending() {
            return;
        }
        let (Some(photo), Some(ink), Some(placement)) =
            (&self.photo_image, &self.design_ink, &self.wizard.placement)
        else {
            return;
        };
        let out = compose::composite(photo, ink, placement);
        self.preview_handle = Some(Handle::from_rgba(out.width(), out.height(), out.as_raw().clone()));
        self.preview = Some(out);
        // the stored render no longer matches what is shown
        self.wizard.composite = RequestState::Idle;
    }

    /// Store the shown preview as the try-on result.
    pub fn commit_preview(&mut self) {
        if self.wizard.composite.is_pending() {
            return;
        }
        let Some(preview) = &self.preview else {
            return;
        };
        let result = image_to_uri(&DynamicImage::ImageRgba8(preview.clone()));
        self.wizard.composite_loaded(result);
    }

    /// Back to a fresh wizard, dropping everything tied to the old run.
    pub fn reset_flow(&mut self) {
        self.wizard.restart();
        self.refine_instruction.clear();
        self.notice = None;
        self.photo_image = None;
        self.design_ink = None;
        self.preview = None;
        self.preview_handle = None;
        self.handles.clear();
    }

    pub fn open_project_record(&self) -> Option<&Project> {
        let id = &self.open_project.as_ref()?.id;
        self.gallery.value()?.iter().find(|p| &p.id == id)
    }

    /// Put an updated project back into the loaded gallery list.
    pub fn replace_project(&mut self, project: Project) {
        if let RequestState::Success(projects) = &mut self.gallery {
            match projects.iter_mut().find(|p| p.id == project.id) {
                Some(existing) => *existing = project,
                None => projects.insert(0, project),
            }
        }
    }
}
