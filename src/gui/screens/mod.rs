//! One view per wizard step, plus the error panel.

pub mod choose;
pub mod describe;
pub mod done;
pub mod error;
pub mod find_artist;
pub mod gallery;
pub mod start;
pub mod try_on;

use iced::{
    Element, Length,
    widget::{button, column, image, text},
};

use crate::gui::{AppState, Message};
use crate::wizard::Step;

pub fn sidebar(state: &AppState) -> Element<'_, Message> {
    let step = state.wizard.step();
    let mut content = column![
        button("Gallery")
            .width(Length::Fill)
            .on_press_maybe((step != Step::Gallery).then_some(Message::OpenGallery)),
        button("Back")
            .width(Length::Fill)
            .on_press_maybe((step != Step::Start).then_some(Message::Back)),
        button("Start over")
            .width(Length::Fill)
            .on_press(Message::Restart),
    ]
    .spacing(10);

    if let Some(notice) = &state.notice {
        content = content
            .push(text(notice.as_str()).size(14))
            .push(button("Dismiss").on_press(Message::DismissNotice));
    }
    content.into()
}

/// A cached image at a fixed width, or a placeholder while it is not decodable.
fn picture<'a>(state: &'a AppState, uri: &str, width: f32) -> Element<'a, Message> {
    match state.image_handle(uri) {
        Some(handle) => image(handle).width(Length::Fixed(width)).into(),
        None => text("(image unavailable)").into(),
    }
}
