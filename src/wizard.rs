//! The design flow: start → describe → choose → try-on → done → find-artist, with the gallery
//! reachable from anywhere.
//!
//! This holds only state and guarded transitions. Front ends run the requests and report the
//! outcomes back through the `*_loaded` methods.

use crate::compose::Placement;
use crate::models::{Artist, DesignBrief, DesignCandidate, Project, TattooStyle};
use crate::request::RequestState;
use crate::service::{ArtistQuery, ArtistSearch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Start,
    Describe,
    Choose,
    TryOn,
    Done,
    FindArtist,
    Gallery,
}

impl Step {
    /// The linear part of the flow, in order.
    pub const FLOW: [Step; 6] = [
        Step::Start,
        Step::Describe,
        Step::Choose,
        Step::TryOn,
        Step::Done,
        Step::FindArtist,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Step::Start => "Start",
            Step::Describe => "Describe",
            Step::Choose => "Choose",
            Step::TryOn => "Try On",
            Step::Done => "Done",
            Step::FindArtist => "Find Artist",
            Step::Gallery => "Gallery",
        }
    }

    fn previous(self) -> Option<Step> {
        let index = Step::FLOW.iter().position(|s| *s == self)?;
        index.checked_sub(1).map(|i| Step::FLOW[i])
    }
}

#[derive(Debug, Clone)]
pub struct Wizard {
    step: Step,
    /// Where to go back to when leaving the gallery
    return_to: Option<Step>,
    pub brief: DesignBrief,
    /// Rewritten description
    pub enhancement: RequestState<String>,
    pub designs: RequestState<Vec<DesignCandidate>>,
    /// Refined image of the selected design
    pub refinement: RequestState<String>,
    selected: Option<usize>,
    /// User photo as a data URI
    pub photo: Option<String>,
    pub placement: Option<Placement>,
    /// Try-on render as a data URI
    pub composite: RequestState<String>,
    pub stencil: RequestState<String>,
    pub artist_query: ArtistQuery,
    pub artists: RequestState<ArtistSearch>,
    chosen_artist: Option<Artist>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: Step::Start,
            return_to: None,
            brief: DesignBrief::new("", TattooStyle::Traditional),
            enhancement: RequestState::Idle,
            designs: RequestState::Idle,
            refinement: RequestState::Idle,
            selected: None,
            photo: None,
            placement: None,
            composite: RequestState::Idle,
            stencil: RequestState::Idle,
            artist_query: ArtistQuery {
                style: String::new(),
                location: String::new(),
            },
            artists: RequestState::Idle,
            chosen_artist: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    fn expect_step(&self, expected: &[Step], action: &str) -> anyhow::Result<()> {
        if !expected.contains(&self.step) {
            anyhow::bail!("Cannot {action} from the {} step", self.step.label());
        }
        Ok(())
    }

    pub fn begin(&mut self) -> anyhow::Result<()> {
        self.expect_step(&[Step::Start], "start describing")?;
        self.step = Step::Describe;
        Ok(())
    }

    /// Start rewriting the description; returns the brief to send.
    pub fn submit_enhancement(&mut self) -> anyhow::Result<DesignBrief> {
        self.expect_step(&[Step::Describe], "improve the description")?;
        if self.brief.description.trim().is_empty() {
            anyhow::bail!("Describe the tattoo you want first");
        }
        self.enhancement.start()?;
        Ok(self.brief.clone())
    }

    /// A successful rewrite replaces the description.
    pub fn enhancement_loaded(&mut self, result: anyhow::Result<String>) {
        if let Ok(text) = &result {
            self.brief.description = text.clone();
        }
        self.enhancement.finish(result);
    }

    /// Accept the brief and move to the choose step with designs pending.
    ///
    /// Also used from the choose step to regenerate.
    pub fn submit_description(&mut self) -> anyhow::Result<()> {
        self.expect_step(&[Step::Describe, Step::Choose], "generate designs")?;
        if self.brief.description.trim().is_empty() {
            anyhow::bail!("Describe the tattoo you want first");
        }
        if self.refinement.is_pending() || self.enhancement.is_pending() {
            anyhow::bail!("Wait for the current request to finish");
        }
        self.designs.start()?;
        self.selected = None;
        self.refinement = RequestState::Idle;
        self.step = Step::Choose;
        Ok(())
    }

    pub fn designs_loaded(&mut self, result: anyhow::Result<Vec<DesignCandidate>>) {
        self.designs.finish(result);
    }

    pub fn select_design(&mut self, index: usize) -> anyhow::Result<()> {
        self.expect_step(&[Step::Choose], "choose a design")?;
        let count = self.designs.value().map(Vec::len).unwrap_or(0);
        if index >= count {
            anyhow::bail!("There is no design number {}", index + 1);
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn selected_design(&self) -> Option<&DesignCandidate> {
        self.designs.value()?.get(self.selected?)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Swap the selected design for a refined version of it.
    pub fn replace_selected_design(&mut self, image: String) -> anyhow::Result<()> {
        let index = self
            .selected
            .ok_or_else(|| anyhow::anyhow!("No design is selected"))?;
        match &mut self.designs {
            RequestState::Success(designs) if index < designs.len() => {
                designs[index].image = image;
                self.stencil = RequestState::Idle;
                Ok(())
            }
            _ => anyhow::bail!("No design is selected"),
        }
    }

    /// Start refining the selected design; returns the image to edit.
    pub fn submit_refinement(&mut self, instruction: &str) -> anyhow::Result<String> {
        self.expect_step(&[Step::Choose], "refine a design")?;
        if instruction.trim().is_empty() {
            anyhow::bail!("Say what should change in the design");
        }
        let design = self
            .selected_design()
            .map(|d| d.image.clone())
            .ok_or_else(|| anyhow::anyhow!("Pick one of the designs first"))?;
        self.refinement.start()?;
        Ok(design)
    }

    /// A successful refinement replaces the selected design.
    pub fn refinement_loaded(&mut self, result: anyhow::Result<String>) {
        let result = result.and_then(|image| {
            self.replace_selected_design(image.clone())?;
            Ok(image)
        });
        self.refinement.finish(result);
    }

    pub fn start_try_on(&mut self) -> anyhow::Result<()> {
        self.expect_step(&[Step::Choose], "try on a design")?;
        if self.selected_design().is_none() {
            anyhow::bail!("Pick one of the designs first");
        }
        if self.refinement.is_pending() {
            anyhow::bail!("Wait for the refinement to finish");
        }
        self.step = Step::TryOn;
        Ok(())
    }

    /// New photo; any previous render no longer applies.
    pub fn set_photo(&mut self, photo: String, placement: Placement) -> anyhow::Result<()> {
        self.ensure_placement_editable()?;
        self.photo = Some(photo);
        self.placement = Some(placement);
        self.composite = RequestState::Idle;
        Ok(())
    }

    /// Photo and placement stay fixed while a render of them is in flight.
    pub fn ensure_placement_editable(&self) -> anyhow::Result<()> {
        if self.composite.is_pending() {
            anyhow::bail!("Wait for the render to finish");
        }
        Ok(())
    }

    /// Start a realistic render of the current composite; returns the flat composite to send.
    pub fn submit_render(&mut self) -> anyhow::Result<String> {
        self.expect_step(&[Step::TryOn], "render the try-on")?;
        let flat = self
            .composite
            .value()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Place the design on a photo first"))?;
        self.composite.start()?;
        Ok(flat)
    }

    pub fn composite_loaded(&mut self, result: anyhow::Result<String>) {
        self.composite.finish(result);
    }

    pub fn stencil_loaded(&mut self, result: anyhow::Result<String>) {
        self.stencil.finish(result);
    }

    pub fn finish_try_on(&mut self) -> anyhow::Result<()> {
        self.expect_step(&[Step::TryOn], "finish the try-on")?;
        if self.composite.value().is_none() {
            anyhow::bail!("Place the design on a photo first");
        }
        self.step = Step::Done;
        Ok(())
    }

    pub fn find_artist(&mut self) -> anyhow::Result<()> {
        self.expect_step(&[Step::Done], "look for an artist")?;
        if self.artist_query.style.trim().is_empty() {
            self.artist_query.style = self.brief.style.label().to_string();
        }
        self.step = Step::FindArtist;
        Ok(())
    }

    /// Start an artist search; the location must be filled in.
    pub fn submit_artist_search(&mut self) -> anyhow::Result<()> {
        self.expect_step(&[Step::FindArtist], "search for artists")?;
        if self.artist_query.location.trim().is_empty() {
            anyhow::bail!("Enter a city or area to search");
        }
        self.artists.start()?;
        self.chosen_artist = None;
        Ok(())
    }

    pub fn artists_loaded(&mut self, result: anyhow::Result<ArtistSearch>) {
        self.artists.finish(result);
    }

    pub fn choose_artist(&mut self, index: usize) -> anyhow::Result<()> {
        let artist = self
            .artists
            .value()
            .and_then(|search| search.artists.get(index))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("There is no artist number {}", index + 1))?;
        self.chosen_artist = Some(artist);
        Ok(())
    }

    pub fn chosen_artist(&self) -> Option<&Artist> {
        self.chosen_artist.as_ref()
    }

    pub fn open_gallery(&mut self) {
        if self.step != Step::Gallery {
            self.return_to = Some(self.step);
            self.step = Step::Gallery;
        }
    }

    /// Go one step back. Leaving the gallery returns to where it was opened from.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Gallery => self.return_to.take().unwrap_or(Step::Start),
            step => step.previous().unwrap_or(Step::Start),
        };
    }

    pub fn restart(&mut self) {
        *self = Wizard::new();
    }

    /// A project record for the current selection, ready to save.
    pub fn to_project(&self) -> anyhow::Result<Project> {
        let design = self
            .selected_design()
            .ok_or_else(|| anyhow::anyhow!("Pick a design before saving"))?;
        let mut project = Project::new(design.image.clone()).with_prompt(self.brief.description.trim());
        project.stencil = self.stencil.value().cloned();
        project.artist = self.chosen_artist.clone();
        Ok(project)
    }
}
