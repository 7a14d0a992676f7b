use iced::{
    Color, Element, Length, Theme, border,
    widget::{Column, column, container, container::Style, container::bordered_box, row, text},
};

use crate::request::RequestState;
use crate::wizard::Step;

/// Sidebar box style: steps already behind `current` are shaded.
fn step_style(current: Step, step: Step) -> impl Fn(&Theme) -> Style {
    move |theme: &Theme| {
        let style = bordered_box(theme).border(border::width(if current == step { 3 } else { 1 }));
        if step < current {
            let mut color_rgba = theme.palette().background.into_rgba8();
            color_rgba[0] /= 2;
            color_rgba[1] /= 2;
            color_rgba[2] /= 2;
            style.background(Color::from_rgb8(color_rgba[0], color_rgba[1], color_rgba[2]))
        } else {
            style.background(theme.palette().background)
        }
    }
}

/// Step list and sidebar on the left, the current screen on the right.
pub fn layout<'a, Message>(
    sidebar: impl Into<Element<'a, Message>>,
    main_content: impl Into<Element<'a, Message>>,
    step: Step,
) -> Element<'a, Message>
where
    Message: 'a,
{
    let steps = Step::FLOW.iter().fold(Column::new(), |steps, s| {
        steps.push(
            container(text(s.label()))
                .style(step_style(step, *s))
                .padding(10)
                .width(Length::Fill),
        )
    });

    container(row![
        container(column![
            container(steps),
            container(sidebar.into()).padding(10).height(Length::Fill),
        ])
        .width(Length::FillPortion(1)),
        container(main_content.into())
            .padding(20)
            .width(Length::FillPortion(4)),
    ])
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

/// One line describing where a request stands, or nothing while idle.
pub fn request_status<'a, T, Message: 'a>(
    state: &RequestState<T>,
    pending: &'a str,
) -> Option<Element<'a, Message>> {
    match state {
        RequestState::Idle | RequestState::Success(_) => None,
        RequestState::Pending => Some(text(pending).into()),
        RequestState::Error(e) => Some(
            text(e.clone())
                .style(|theme: &Theme| text::Style {
                    color: Some(theme.palette().danger),
                })
                .into(),
        ),
    }
}
