use std::ops::RangeInclusive;

use iced::{
    Element, Length,
    widget::{button, column, image, row, scrollable, slider, text},
};

use crate::compose::BlendMode;
use crate::gui::{AppState, Message, widgets::request_status};
use crate::request::RequestState;

fn labelled<'a>(
    label: &'a str,
    range: RangeInclusive<f32>,
    value: f32,
    step: f32,
    on_change: fn(f32) -> Message,
) -> Element<'a, Message> {
    row![
        text(label).width(Length::Fixed(80.0)),
        slider(range, value, on_change).step(step),
        text(format!("{value:.2}")).width(Length::Fixed(60.0)),
    ]
    .spacing(10)
    .into()
}

pub fn view(state: &AppState) -> Element<'_, Message> {
    let wizard = &state.wizard;
    let mut content = column![
        text("Try it on").size(28),
        button("Choose photo").on_press(Message::PickPhoto),
    ]
    .spacing(12);

    let (Some(placement), Some((width, height)), Some(preview)) =
        (wizard.placement, state.photo_size(), state.preview_handle.clone())
    else {
        return content
            .push(text("Pick a photo of the spot where the tattoo should go."))
            .into();
    };

    let blend_button = |label, mode: BlendMode| {
        button(label)
            .style(if placement.blend == mode { button::primary } else { button::secondary })
            .on_press(Message::BlendSelected(mode))
    };

    content = content
        .push(image(preview).height(Length::Fixed(420.0)))
        .push(labelled("Left", 0.0..=width as f32, placement.center_x, 1.0, Message::MoveX))
        .push(labelled("Top", 0.0..=height as f32, placement.center_y, 1.0, Message::MoveY))
        .push(labelled("Size", 0.05..=3.0, placement.scale, 0.01, Message::ScaleChanged))
        .push(labelled("Rotate", -180.0..=180.0, placement.rotation, 1.0, Message::RotationChanged))
        .push(labelled("Opacity", 0.0..=1.0, placement.opacity, 0.01, Message::OpacityChanged))
        .push(
            row![
                blend_button("Ink (multiply)", BlendMode::Multiply),
                blend_button("Flat (normal)", BlendMode::Normal),
            ]
            .spacing(10),
        );

    if let Some(status) = request_status(&wizard.composite, "Rendering on skin...") {
        content = content.push(status);
    }
    // only model renders are cached as handles; a flat preview is shown above
    if let RequestState::Success(render) = &wizard.composite {
        if let Some(handle) = state.image_handle(render) {
            content = content.push(text("Realistic render")).push(image(handle).height(Length::Fixed(420.0)));
        }
    }

    let content = content.push(
        row![
            button("Make it realistic")
                .on_press_maybe((!wizard.composite.is_pending()).then_some(Message::RenderRealistic)),
            button("Looks good")
                .on_press_maybe((!wizard.composite.is_pending()).then_some(Message::FinishTryOn)),
        ]
        .spacing(10),
    );
    scrollable(content).into()
}
