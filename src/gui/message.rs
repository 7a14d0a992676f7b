use image::DynamicImage;

use crate::core::db::StudioDb;
use crate::models::{ColorMode, ContractStatus, DesignCandidate, Project, TattooStyle};
use crate::compose::BlendMode;
use crate::service::ArtistSearch;

/// A decoded user photo and its data URI.
#[derive(Debug, Clone)]
pub struct LoadedPhoto {
    pub uri: String,
    pub image: DynamicImage,
}

#[derive(Debug, Clone)]
pub enum Message {
    StudioOpened(Result<StudioDb, String>),
    /// Leave the error panel and start over
    Reload,
    DismissNotice,

    Begin,
    Back,
    Restart,
    OpenGallery,

    // describe
    DescriptionChanged(String),
    StyleSelected(TattooStyle),
    ColorSelected(ColorMode),
    PlacementChanged(String),
    Enhance,
    Enhanced(Result<String, String>),
    Generate,
    DesignsGenerated(Result<Vec<DesignCandidate>, String>),

    // choose
    SelectDesign(usize),
    RefineChanged(String),
    Refine,
    Refined(Result<String, String>),
    StartTryOn,

    // try on
    PickPhoto,
    PhotoLoaded(Option<Result<LoadedPhoto, String>>),
    MoveX(f32),
    MoveY(f32),
    ScaleChanged(f32),
    RotationChanged(f32),
    OpacityChanged(f32),
    BlendSelected(BlendMode),
    RenderRealistic,
    Rendered(Result<String, String>),
    FinishTryOn,

    // done
    MakeStencil,
    StencilMade(Result<String, String>),
    SaveProject,
    ProjectSaved(Result<Project, String>),
    FindArtist,

    // find artist
    ArtistStyleChanged(String),
    LocationChanged(String),
    SearchArtists,
    ArtistsFound(Result<ArtistSearch, String>),
    ChooseArtist(usize),

    // gallery
    GalleryLoaded(Result<Vec<Project>, String>),
    ImportProject,
    OpenProject(String),
    CloseProject,
    DeleteProject(String),
    ProjectDeleted(Result<String, String>),
    ExportProject(String),
    Exported(Option<Result<String, String>>),
    ChatChanged(String),
    SendChat,
    DraftInquiry,
    InquiryDrafted(Result<String, String>),
    ChatSent(Result<Project, String>),
    ProjectUpdated(Result<Project, String>),
    ContractStatusSelected(ContractStatus),
    ContractPriceChanged(String),
    ContractDateChanged(String),
    SaveContract,
}
