use iced::{
    Element,
    widget::{Row, button, column, row, scrollable, text, text_input},
};

use super::picture;
use crate::gui::{AppState, Message, widgets::request_status};

pub fn view(state: &AppState) -> Element<'_, Message> {
    let wizard = &state.wizard;
    let mut content = column![text("Choose a design").size(28)].spacing(16);

    if let Some(status) = request_status(&wizard.designs, "Drawing your designs...") {
        content = content.push(status);
    }

    if let Some(designs) = wizard.designs.value() {
        let gallery = designs.iter().enumerate().fold(Row::new().spacing(12), |gallery, (index, design)| {
            let chosen = wizard.selected_index() == Some(index);
            let label = if chosen { "Chosen" } else { "Choose" };
            gallery.push(
                column![
                    picture(state, &design.image, 220.0),
                    button(label)
                        .style(if chosen { button::success } else { button::primary })
                        .on_press(Message::SelectDesign(index)),
                ]
                .spacing(6),
            )
        });
        content = content.push(scrollable(gallery).direction(scrollable::Direction::Horizontal(
            scrollable::Scrollbar::default(),
        )));
    }

    let has_selection = wizard.selected_design().is_some();
    let can_refine = has_selection
        && !state.refine_instruction.trim().is_empty()
        && !wizard.refinement.is_pending();
    if let Some(status) = request_status(&wizard.refinement, "Refining the design...") {
        content = content.push(status);
    }
    content
        .push(
            row![
                text_input("Change something, e.g. \"make the moon larger\"", &state.refine_instruction)
                    .on_input(Message::RefineChanged)
                    .on_submit_maybe(can_refine.then_some(Message::Refine))
                    .padding(10),
                button("Refine").on_press_maybe(can_refine.then_some(Message::Refine)),
            ]
            .spacing(10),
        )
        .push(
            row![
                button("Generate again")
                    .on_press_maybe((!wizard.designs.is_pending()).then_some(Message::Generate)),
                button("Try it on").on_press_maybe(has_selection.then_some(Message::StartTryOn)),
            ]
            .spacing(10),
        )
        .into()
}
