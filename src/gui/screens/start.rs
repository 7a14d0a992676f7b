use iced::{
    Alignment::Center,
    Element, Length,
    widget::{button, column, container, row, text},
};

use crate::gui::{AppState, Message};

pub fn view(state: &AppState) -> Element<'_, Message> {
    let mut content = column![
        text("InkGenius").size(40),
        text("Describe a tattoo, see it on your skin, and find the artist to make it."),
        row![
            button("Start a design").on_press(Message::Begin),
            button("Open gallery").on_press(Message::OpenGallery),
        ]
        .spacing(20),
    ]
    .spacing(20)
    .align_x(Center);

    if state.service().is_err() {
        content = content.push(text("Set GEMINI_API_KEY to generate designs and search for artists.").size(14));
    }

    container(content)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
