use iced::{
    Element,
    widget::{button, column, pick_list, row, text, text_input},
};

use crate::gui::{AppState, Message, widgets::request_status};
use crate::models::{ColorMode, TattooStyle};

fn color_button(label: &str, mode: ColorMode, current: ColorMode) -> iced::widget::Button<'_, Message> {
    let style = if mode == current { button::primary } else { button::secondary };
    button(label).style(style).on_press(Message::ColorSelected(mode))
}

pub fn view(state: &AppState) -> Element<'_, Message> {
    let brief = &state.wizard.brief;
    let has_description = !brief.description.trim().is_empty();
    let can_enhance = has_description && !state.wizard.enhancement.is_pending();

    let content = column![
        text("Describe your tattoo").size(28),
        text_input("A fox curled around a crescent moon...", &brief.description)
            .on_input(Message::DescriptionChanged)
            .on_submit(Message::Generate)
            .padding(10),
        row![
            text("Style"),
            pick_list(TattooStyle::ALL, Some(brief.style), Message::StyleSelected),
        ]
        .spacing(10),
        row![
            color_button("Black & grey", ColorMode::BlackAndGrey, brief.color),
            color_button("Color", ColorMode::Color, brief.color),
        ]
        .spacing(10),
        text_input("Placement (optional), e.g. forearm", brief.placement.as_deref().unwrap_or(""))
            .on_input(Message::PlacementChanged)
            .padding(10),
        row![
            button("Improve description").on_press_maybe(can_enhance.then_some(Message::Enhance)),
            button("Generate designs").on_press_maybe(can_enhance.then_some(Message::Generate)),
        ]
        .spacing(10),
    ]
    .spacing(16);

    match request_status(&state.wizard.enhancement, "Improving the description...") {
        Some(status) => content.push(status).into(),
        None => content.into(),
    }
}
