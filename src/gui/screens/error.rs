use iced::{
    Alignment::Center,
    Element, Length,
    widget::{button, column, container, text},
};

use crate::gui::Message;

/// Panel shown in place of the app after an unrecoverable failure.
pub fn view(error: &str) -> Element<'_, Message> {
    container(
        column![
            text("Something went wrong").size(32),
            text(error),
            button("Reload").on_press(Message::Reload),
        ]
        .spacing(20)
        .align_x(Center),
    )
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}
