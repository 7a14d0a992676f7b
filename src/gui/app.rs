use iced::{Element, Task};
use rfd::AsyncFileDialog;
use tracing::{info, warn};

use super::message::LoadedPhoto;
use super::screens;
use super::state::ProjectDraft;
use super::{AppState, Message};
use crate::compose;
use crate::config::Config;
use crate::core::data_uri::image_to_uri;
use crate::core::db::{ProjectRepository, StudioDb, export_bundle, import_bundle};
use crate::models::{Contract, ContractStatus, Message as ChatMessage};
use crate::request::RequestState;
use crate::service::MAX_DESIGNS;
use crate::wizard::Step;

fn to_message(e: anyhow::Error) -> String {
    format!("{e:#}")
}

/// A hosted model call failed: the reload panel takes over the window.
fn model_failed(state: &mut AppState, error: &str) {
    warn!("Model request failed: {error}");
    state.fatal = Some(error.to_string());
}

pub struct InkGeniusApp {
    state: AppState,
}

impl InkGeniusApp {
    pub fn new(config: Config) -> (Self, Task<Message>) {
        let state = AppState::new(config);
        let task = open_studio(&state.config);
        (Self { state }, task)
    }

    /// Show a failed guard as a notice instead of acting.
    fn guard(&mut self, result: anyhow::Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.state.notice = Some(to_message(e));
                false
            }
        }
    }

    fn adjust_placement(&mut self, f: impl FnOnce(&mut compose::Placement)) -> Task<Message> {
        let result = self.state.wizard.ensure_placement_editable();
        if !self.guard(result) {
            return Task::none();
        }
        if let Some(placement) = &mut self.state.wizard.placement {
            f(placement);
            self.state.render_preview();
        }
        Task::none()
    }

    fn load_gallery(&mut self) -> Task<Message> {
        let studio = match self.state.studio() {
            Ok(studio) => studio,
            Err(e) => {
                self.state.gallery = RequestState::Error(e);
                return Task::none();
            }
        };
        if self.state.gallery.start().is_err() {
            return Task::none();
        }
        Task::perform(
            async move { studio.list_projects().await.map_err(to_message) },
            Message::GalleryLoaded,
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let state = &mut self.state;
        match message {
            Message::StudioOpened(result) => {
                state.studio = match result {
                    Ok(studio) => RequestState::Success(studio),
                    Err(e) => {
                        state.fatal = Some(format!("Could not open local storage: {e}"));
                        RequestState::Error(e)
                    }
                };
                Task::none()
            }
            Message::Reload => {
                info!("Reloading after error");
                state.fatal = None;
                state.reset_flow();
                state.gallery = RequestState::Idle;
                state.open_project = None;
                state.gallery_busy = false;
                if state.studio.value().is_none() {
                    state.studio = RequestState::Pending;
                    return open_studio(&state.config);
                }
                Task::none()
            }
            Message::DismissNotice => {
                state.notice = None;
                Task::none()
            }
            Message::Begin => {
                let result = state.wizard.begin();
                self.guard(result);
                Task::none()
            }
            Message::Back => {
                state.wizard.back();
                state.notice = None;
                Task::none()
            }
            Message::Restart => {
                state.reset_flow();
                Task::none()
            }
            Message::OpenGallery => {
                state.wizard.open_gallery();
                state.notice = None;
                self.load_gallery()
            }

            Message::DescriptionChanged(text) => {
                state.wizard.brief.description = text;
                Task::none()
            }
            Message::StyleSelected(style) => {
                state.wizard.brief.style = style;
                Task::none()
            }
            Message::ColorSelected(color) => {
                state.wizard.brief.color = color;
                Task::none()
            }
            Message::PlacementChanged(text) => {
                state.wizard.brief.placement = (!text.trim().is_empty()).then_some(text);
                Task::none()
            }
            Message::Enhance => {
                let service = match state.service() {
                    Ok(service) => service,
                    Err(e) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                let brief = match state.wizard.submit_enhancement() {
                    Ok(brief) => brief,
                    Err(e) => {
                        state.notice = Some(to_message(e));
                        return Task::none();
                    }
                };
                Task::perform(
                    async move { service.enhance_description(&brief).await.map_err(to_message) },
                    Message::Enhanced,
                )
            }
            Message::Enhanced(result) => {
                if let Err(e) = &result {
                    model_failed(state, e);
                }
                state.wizard.enhancement_loaded(result.map_err(anyhow::Error::msg));
                Task::none()
            }
            Message::Generate => {
                let service = state.service();
                let result = state.wizard.submit_description();
                if !self.guard(result) {
                    return Task::none();
                }
                let state = &mut self.state;
                let service = match service {
                    Ok(service) => service,
                    Err(e) => {
                        state.wizard.designs_loaded(Err(anyhow::anyhow!(e)));
                        return Task::none();
                    }
                };
                let brief = state.wizard.brief.clone();
                Task::perform(
                    async move {
                        service
                            .generate_designs(&brief, MAX_DESIGNS)
                            .await
                            .map_err(to_message)
                    },
                    Message::DesignsGenerated,
                )
            }
            Message::DesignsGenerated(result) => {
                match &result {
                    Ok(designs) => {
                        for design in designs {
                            state.remember_image(&design.image);
                        }
                    }
                    Err(e) => model_failed(state, e),
                }
                state.wizard.designs_loaded(result.map_err(anyhow::Error::msg));
                Task::none()
            }

            Message::SelectDesign(index) => {
                let result = state.wizard.select_design(index);
                self.guard(result);
                Task::none()
            }
            Message::RefineChanged(text) => {
                state.refine_instruction = text;
                Task::none()
            }
            Message::Refine => {
                let service = match state.service() {
                    Ok(service) => service,
                    Err(e) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                let instruction = state.refine_instruction.clone();
                let design = match state.wizard.submit_refinement(&instruction) {
                    Ok(design) => design,
                    Err(e) => {
                        state.notice = Some(to_message(e));
                        return Task::none();
                    }
                };
                Task::perform(
                    async move {
                        service
                            .refine_design(&design, &instruction)
                            .await
                            .map_err(to_message)
                    },
                    Message::Refined,
                )
            }
            Message::Refined(result) => {
                match &result {
                    Ok(image) => {
                        state.remember_image(image);
                        state.refine_instruction.clear();
                    }
                    Err(e) => model_failed(state, e),
                }
                state.wizard.refinement_loaded(result.map_err(anyhow::Error::msg));
                Task::none()
            }
            Message::StartTryOn => {
                let result = state.wizard.start_try_on();
                self.guard(result);
                Task::none()
            }

            Message::PickPhoto => Task::perform(pick_photo(), Message::PhotoLoaded),
            Message::PhotoLoaded(None) => Task::none(),
            Message::PhotoLoaded(Some(Ok(photo))) => {
                let result = state.load_photo(photo.uri, photo.image);
                self.guard(result);
                Task::none()
            }
            Message::PhotoLoaded(Some(Err(e))) => {
                state.notice = Some(e);
                Task::none()
            }
            Message::MoveX(x) => self.adjust_placement(|p| p.center_x = x),
            Message::MoveY(y) => self.adjust_placement(|p| p.center_y = y),
            Message::ScaleChanged(scale) => self.adjust_placement(|p| p.scale = scale),
            Message::RotationChanged(degrees) => self.adjust_placement(|p| p.rotation = degrees),
            Message::OpacityChanged(opacity) => self.adjust_placement(|p| p.opacity = opacity),
            Message::BlendSelected(blend) => self.adjust_placement(|p| p.blend = blend),
            Message::RenderRealistic => {
                let service = match state.service() {
                    Ok(service) => service,
                    Err(e) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                state.commit_preview();
                let flat = match state.wizard.submit_render() {
                    Ok(flat) => flat,
                    Err(e) => {
                        state.notice = Some(to_message(e));
                        return Task::none();
                    }
                };
                Task::perform(
                    async move { service.render_on_skin(&flat).await.map_err(to_message) },
                    Message::Rendered,
                )
            }
            Message::Rendered(result) => {
                match &result {
                    Ok(image) => state.remember_image(image),
                    Err(e) => model_failed(state, e),
                }
                state.wizard.composite_loaded(result.map_err(anyhow::Error::msg));
                Task::none()
            }
            Message::FinishTryOn => {
                if state.wizard.composite.value().is_none() {
                    state.commit_preview();
                }
                let result = self.state.wizard.finish_try_on();
                self.guard(result);
                Task::none()
            }

            Message::MakeStencil => {
                let Some(design) = state.wizard.selected_design().map(|d| d.image.clone()) else {
                    return Task::none();
                };
                let service = match state.service() {
                    Ok(service) => service,
                    Err(e) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                let result = self.state.wizard.stencil.start();
                if !self.guard(result) {
                    return Task::none();
                }
                Task::perform(
                    async move { service.create_stencil(&design).await.map_err(to_message) },
                    Message::StencilMade,
                )
            }
            Message::StencilMade(result) => {
                match &result {
                    Ok(image) => state.remember_image(image),
                    Err(e) => model_failed(state, e),
                }
                state.wizard.stencil_loaded(result.map_err(anyhow::Error::msg));
                Task::none()
            }
            Message::SaveProject => {
                let project = match state.wizard.to_project() {
                    Ok(project) => project,
                    Err(e) => {
                        state.notice = Some(to_message(e));
                        return Task::none();
                    }
                };
                let studio = match state.studio() {
                    Ok(studio) => studio,
                    Err(e) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                Task::perform(
                    async move {
                        studio.save_project(&project).await.map_err(to_message)?;
                        Ok::<_, String>(project)
                    },
                    Message::ProjectSaved,
                )
            }
            Message::ProjectSaved(result) => {
                match result {
                    Ok(project) => {
                        state.notice = Some("Saved to the gallery".to_string());
                        state.remember_image(&project.design);
                        state.replace_project(project);
                    }
                    Err(e) => state.notice = Some(e),
                }
                Task::none()
            }
            Message::FindArtist => {
                let result = state.wizard.find_artist();
                self.guard(result);
                Task::none()
            }

            Message::ArtistStyleChanged(style) => {
                state.wizard.artist_query.style = style;
                Task::none()
            }
            Message::LocationChanged(location) => {
                state.wizard.artist_query.location = location;
                Task::none()
            }
            Message::SearchArtists => {
                let service = match state.service() {
                    Ok(service) => service,
                    Err(e) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                let result = state.wizard.submit_artist_search();
                if !self.guard(result) {
                    return Task::none();
                }
                let query = self.state.wizard.artist_query.clone();
                Task::perform(
                    async move { service.find_artists(&query).await.map_err(to_message) },
                    Message::ArtistsFound,
                )
            }
            Message::ArtistsFound(result) => {
                if let Err(e) = &result {
                    model_failed(state, e);
                }
                state.wizard.artists_loaded(result.map_err(anyhow::Error::msg));
                Task::none()
            }
            Message::ChooseArtist(index) => {
                let result = state.wizard.choose_artist(index);
                self.guard(result);
                Task::none()
            }

            Message::GalleryLoaded(result) => {
                if let Ok(projects) = &result {
                    for project in projects {
                        state.remember_image(&project.design);
                        if let Some(stencil) = &project.stencil {
                            state.remember_image(stencil);
                        }
                    }
                }
                state.gallery = RequestState::from(result.map_err(anyhow::Error::msg));
                Task::none()
            }
            Message::ImportProject => {
                let studio = match state.studio() {
                    Ok(studio) => studio,
                    Err(e) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                Task::perform(
                    async move {
                        let file = AsyncFileDialog::new()
                            .set_title("Import project")
                            .add_filter("InkGenius project", &["inkp"])
                            .pick_file()
                            .await
                            .ok_or_else(|| "Import cancelled".to_string())?;
                        let project = import_bundle(file.path()).map_err(to_message)?;
                        studio.save_project(&project).await.map_err(to_message)?;
                        Ok::<_, String>(project)
                    },
                    Message::ProjectSaved,
                )
            }
            Message::OpenProject(id) => {
                state.open_project = state
                    .gallery
                    .value()
                    .and_then(|projects| projects.iter().find(|p| p.id == id))
                    .map(ProjectDraft::for_project);
                Task::none()
            }
            Message::CloseProject => {
                state.open_project = None;
                Task::none()
            }
            Message::DeleteProject(id) => {
                let studio = match state.studio() {
                    Ok(studio) => studio,
                    Err(e) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                state.gallery_busy = true;
                Task::perform(
                    async move {
                        studio.delete_project(&id).await.map_err(to_message)?;
                        Ok::<_, String>(id)
                    },
                    Message::ProjectDeleted,
                )
            }
            Message::ProjectDeleted(result) => {
                state.gallery_busy = false;
                match result {
                    Ok(id) => {
                        if let RequestState::Success(projects) = &mut state.gallery {
                            projects.retain(|p| p.id != id);
                        }
                        if state.open_project.as_ref().is_some_and(|d| d.id == id) {
                            state.open_project = None;
                        }
                    }
                    Err(e) => state.notice = Some(e),
                }
                Task::none()
            }
            Message::ExportProject(id) => {
                let Some(project) = state
                    .gallery
                    .value()
                    .and_then(|projects| projects.iter().find(|p| p.id == id))
                    .cloned()
                else {
                    return Task::none();
                };
                let short_id: String = project.id.chars().take(8).collect();
                Task::perform(
                    async move {
                        let file = AsyncFileDialog::new()
                            .set_title("Export project")
                            .set_file_name(format!("inkgenius-{short_id}.inkp"))
                            .add_filter("InkGenius project", &["inkp"])
                            .save_file()
                            .await?;
                        let path = file.path().to_path_buf();
                        Some(
                            export_bundle(&project, &path)
                                .map(|()| path.display().to_string())
                                .map_err(to_message),
                        )
                    },
                    Message::Exported,
                )
            }
            Message::Exported(None) => Task::none(),
            Message::Exported(Some(result)) => {
                state.notice = Some(match result {
                    Ok(path) => format!("Exported to {path}"),
                    Err(e) => e,
                });
                Task::none()
            }
            Message::ChatChanged(text) => {
                if let Some(draft) = &mut state.open_project {
                    draft.chat = text;
                }
                Task::none()
            }
            Message::DraftInquiry => {
                let Some((artist, brief)) = state
                    .open_project_record()
                    .and_then(|p| Some((p.artist.clone()?, p.brief())))
                else {
                    state.notice = Some("This project has no artist yet".to_string());
                    return Task::none();
                };
                let service = match state.service() {
                    Ok(service) => service,
                    Err(e) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                state.gallery_busy = true;
                Task::perform(
                    async move {
                        service
                            .draft_inquiry(&artist, brief.as_ref())
                            .await
                            .map_err(to_message)
                    },
                    Message::InquiryDrafted,
                )
            }
            Message::InquiryDrafted(result) => {
                state.gallery_busy = false;
                match result {
                    Ok(text) => {
                        if let Some(draft) = &mut state.open_project {
                            draft.chat = text;
                        }
                    }
                    Err(e) => model_failed(state, &e),
                }
                Task::none()
            }
            Message::SendChat => {
                let Some(draft) = &state.open_project else {
                    return Task::none();
                };
                let text = draft.chat.trim().to_string();
                if text.is_empty() || state.gallery_busy {
                    return Task::none();
                }
                let id = draft.id.clone();
                let Some(artist) = state.open_project_record().and_then(|p| p.artist.clone()) else {
                    state.notice = Some("This project has no artist yet".to_string());
                    return Task::none();
                };
                let (studio, service) = match (state.studio(), state.service()) {
                    (Ok(studio), Ok(service)) => (studio, service),
                    (Err(e), _) | (_, Err(e)) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                state.gallery_busy = true;
                Task::perform(
                    async move {
                        let project = studio
                            .append_message(&id, ChatMessage::from_user(text))
                            .await
                            .map_err(to_message)?;
                        let reply = match service.artist_reply(&artist, &project.conversation).await {
                            Ok(reply) => reply,
                            Err(e) => {
                                // the user's message is already stored
                                warn!("Artist reply failed: {e:#}");
                                return Ok(project);
                            }
                        };
                        studio
                            .append_message(&id, ChatMessage::from_artist(reply))
                            .await
                            .map_err(to_message)
                    },
                    Message::ChatSent,
                )
            }
            Message::ChatSent(result) => {
                state.gallery_busy = false;
                match result {
                    Ok(project) => {
                        if let Some(draft) = &mut state.open_project {
                            draft.chat.clear();
                        }
                        state.replace_project(project);
                    }
                    Err(e) => state.notice = Some(e),
                }
                Task::none()
            }
            Message::ContractStatusSelected(status) => {
                if let Some(draft) = &mut state.open_project {
                    draft.status = Some(status);
                }
                Task::none()
            }
            Message::ContractPriceChanged(price) => {
                if let Some(draft) = &mut state.open_project {
                    draft.price = price;
                }
                Task::none()
            }
            Message::ContractDateChanged(date) => {
                if let Some(draft) = &mut state.open_project {
                    draft.date = date;
                }
                Task::none()
            }
            Message::SaveContract => {
                let Some(draft) = &state.open_project else {
                    return Task::none();
                };
                let price = match draft.price.trim() {
                    "" => None,
                    raw => match raw.parse::<f64>() {
                        Ok(price) if price.is_finite() && price >= 0.0 => Some(price),
                        _ => {
                            state.notice = Some(format!("\"{raw}\" is not a valid price"));
                            return Task::none();
                        }
                    },
                };
                let contract = Contract {
                    status: draft.status.unwrap_or(ContractStatus::Pending),
                    price,
                    date: Some(draft.date.trim().to_string()).filter(|d| !d.is_empty()),
                };
                let id = draft.id.clone();
                let studio = match state.studio() {
                    Ok(studio) => studio,
                    Err(e) => {
                        state.notice = Some(e);
                        return Task::none();
                    }
                };
                Task::perform(
                    async move { studio.update_contract(&id, contract).await.map_err(to_message) },
                    Message::ProjectUpdated,
                )
            }
            Message::ProjectUpdated(result) => {
                match result {
                    Ok(project) => {
                        state.notice = Some("Contract saved".to_string());
                        state.replace_project(project);
                    }
                    Err(e) => state.notice = Some(e),
                }
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        if let Some(error) = &self.state.fatal {
            return screens::error::view(error);
        }
        let content = match self.state.wizard.step() {
            Step::Start => screens::start::view(&self.state),
            Step::Describe => screens::describe::view(&self.state),
            Step::Choose => screens::choose::view(&self.state),
            Step::TryOn => screens::try_on::view(&self.state),
            Step::Done => screens::done::view(&self.state),
            Step::FindArtist => screens::find_artist::view(&self.state),
            Step::Gallery => screens::gallery::view(&self.state),
        };
        super::widgets::layout(screens::sidebar(&self.state), content, self.state.wizard.step())
    }
}

fn open_studio(config: &Config) -> Task<Message> {
    let path = config.db_path.clone();
    Task::perform(
        async move { StudioDb::open(path).await.map_err(to_message) },
        Message::StudioOpened,
    )
}

async fn pick_photo() -> Option<Result<LoadedPhoto, String>> {
    let file = AsyncFileDialog::new()
        .set_title("Choose a photo of the body part")
        .add_filter("Images", &["png", "jpg", "jpeg", "webp"])
        .pick_file()
        .await?;
    let bytes = file.read().await;
    let loaded = compose::prepare_photo(&bytes).and_then(|image| {
        let uri = image_to_uri(&image)?;
        Ok(LoadedPhoto { uri, image })
    });
    Some(loaded.map_err(to_message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSet;

    fn test_app() -> InkGeniusApp {
        InkGeniusApp {
            state: AppState::new(Config {
                api_key: Some("test-key".to_string()),
                api_base: "http://127.0.0.1:9/v1beta".to_string(),
                models: ModelSet::default(),
                db_path: "unused.db".into(),
            }),
        }
    }

    #[test]
    fn test_model_failure_shows_reload_panel() {
        let mut app = test_app();
        app.state.wizard.begin().unwrap();
        app.state.wizard.brief.description = "a fox".to_string();
        app.state.wizard.submit_description().unwrap();

        let _ = app.update(Message::DesignsGenerated(Err("Design generation failed: status 500".to_string())));
        assert_eq!(app.state.fatal.as_deref(), Some("Design generation failed: status 500"));

        let _ = app.update(Message::Reload);
        assert!(app.state.fatal.is_none());
        assert_eq!(app.state.wizard.step(), Step::Start);
    }

    #[test]
    fn test_placement_is_frozen_while_rendering() {
        let mut app = test_app();
        app.state.wizard.placement = Some(compose::initial_placement((100, 100), (10, 10)));
        app.state.wizard.composite = RequestState::Pending;

        let before = app.state.wizard.placement;
        let _ = app.update(Message::ScaleChanged(3.0));
        assert_eq!(app.state.wizard.placement, before);
        assert!(app.state.wizard.composite.is_pending());
        assert!(app.state.notice.is_some());
    }
}
