use iced::{
    Element, Length,
    widget::{button, column, image, row, scrollable, text},
};

use super::picture;
use crate::gui::{AppState, Message, widgets::request_status};

pub fn view(state: &AppState) -> Element<'_, Message> {
    let wizard = &state.wizard;
    let mut content = column![text("Your tattoo").size(28)].spacing(16);

    let mut images = row![].spacing(16);
    if let Some(design) = wizard.selected_design() {
        images = images.push(column![text("Design"), picture(state, &design.image, 260.0)].spacing(6));
    }
    if let Some(render) = wizard.composite.value() {
        let shown: Element<'_, Message> = match state.image_handle(render) {
            Some(handle) => image(handle).width(Length::Fixed(360.0)).into(),
            None => match &state.preview_handle {
                Some(handle) => image(handle.clone()).width(Length::Fixed(360.0)).into(),
                None => text("(preview unavailable)").into(),
            },
        };
        images = images.push(column![text("On you"), shown].spacing(6));
    }
    if let Some(stencil) = wizard.stencil.value() {
        images = images.push(column![text("Stencil"), picture(state, stencil, 260.0)].spacing(6));
    }
    content = content.push(images);

    if let Some(status) = request_status(&wizard.stencil, "Tracing the stencil...") {
        content = content.push(status);
    }

    content = content.push(
        row![
            button("Make stencil").on_press_maybe(
                (!wizard.stencil.is_pending() && wizard.stencil.value().is_none())
                    .then_some(Message::MakeStencil)
            ),
            button("Save to gallery").on_press(Message::SaveProject),
            button("Find an artist").on_press(Message::FindArtist),
        ]
        .spacing(10),
    );
    scrollable(content).into()
}
