use iced::{
    Element, Length,
    widget::{Column, button, column, container, pick_list, row, scrollable, text, text_input},
};

use super::picture;
use crate::gui::state::ProjectDraft;
use crate::gui::{AppState, Message, widgets::request_status};
use crate::models::{ContractStatus, Project, Sender};

const STATUSES: [ContractStatus; 4] = [
    ContractStatus::Pending,
    ContractStatus::Approved,
    ContractStatus::InProgress,
    ContractStatus::Completed,
];

fn project_row<'a>(state: &'a AppState, project: &'a Project) -> Element<'a, Message> {
    let artist = project.artist.as_ref().map_or("No artist yet", |a| a.name.as_str());
    let status = project
        .contract
        .as_ref()
        .map_or_else(|| "No contract".to_string(), |c| c.status.to_string());

    container(
        row![
            picture(state, &project.design, 96.0),
            column![
                text(artist).size(18),
                text(project.saved_at_display()).size(12),
                text(status).size(14),
            ]
            .spacing(4)
            .width(Length::Fill),
            button("Open").on_press(Message::OpenProject(project.id.clone())),
        ]
        .spacing(12),
    )
    .style(container::bordered_box)
    .padding(8)
    .width(Length::Fill)
    .into()
}

fn project_detail<'a>(
    state: &'a AppState,
    project: &'a Project,
    draft: &'a ProjectDraft,
) -> Element<'a, Message> {
    let busy = state.gallery_busy;
    let mut content = column![
        row![
            button("All projects").on_press(Message::CloseProject),
            button("Export").on_press(Message::ExportProject(project.id.clone())),
            button("Delete")
                .style(button::danger)
                .on_press_maybe((!busy).then(|| Message::DeleteProject(project.id.clone()))),
        ]
        .spacing(10),
    ]
    .spacing(14);

    let mut images = row![picture(state, &project.design, 240.0)].spacing(12);
    if let Some(stencil) = &project.stencil {
        images = images.push(picture(state, stencil, 240.0));
    }
    content = content.push(images);
    if let Some(prompt) = &project.prompt {
        content = content.push(text(prompt.as_str()).size(14));
    }

    let Some(artist) = &project.artist else {
        return content
            .push(text("No artist chosen for this design yet."))
            .into();
    };
    content = content.push(text(format!("{} · {}", artist.name, artist.address)).size(18));

    let conversation = project.conversation.iter().fold(Column::new().spacing(6), |list, message| {
        let who = match message.sender {
            Sender::User => "You",
            Sender::Artist => artist.name.as_str(),
        };
        list.push(text(format!("{who}: {}", message.text)))
    });
    let can_send = !busy && !draft.chat.trim().is_empty();
    content = content.push(conversation).push(
        row![
            text_input("Message the artist", &draft.chat)
                .on_input(Message::ChatChanged)
                .on_submit_maybe(can_send.then_some(Message::SendChat))
                .padding(10),
            button("Send").on_press_maybe(can_send.then_some(Message::SendChat)),
            button("Draft for me").on_press_maybe((!busy).then_some(Message::DraftInquiry)),
        ]
        .spacing(10),
    );

    content
        .push(text("Contract").size(18))
        .push(
            row![
                pick_list(STATUSES, draft.status, Message::ContractStatusSelected).placeholder("Status"),
                text_input("Price", &draft.price)
                    .on_input(Message::ContractPriceChanged)
                    .width(Length::Fixed(120.0))
                    .padding(8),
                text_input("Date", &draft.date)
                    .on_input(Message::ContractDateChanged)
                    .width(Length::Fixed(160.0))
                    .padding(8),
                button("Save contract").on_press(Message::SaveContract),
            ]
            .spacing(10),
        )
        .into()
}

pub fn view(state: &AppState) -> Element<'_, Message> {
    let mut content = column![
        row![
            text("Gallery").size(28).width(Length::Fill),
            button("Import").on_press(Message::ImportProject),
        ]
        .spacing(10),
    ]
    .spacing(12);

    if let Some(status) = request_status(&state.gallery, "Loading saved projects...") {
        content = content.push(status);
    }

    if let (Some(draft), Some(project)) = (&state.open_project, state.open_project_record()) {
        content = content.push(project_detail(state, project, draft));
    } else if let Some(projects) = state.gallery.value() {
        if projects.is_empty() {
            content = content.push(text("Nothing saved yet. Finish a design and save it here."));
        }
        for project in projects {
            content = content.push(project_row(state, project));
        }
    }
    scrollable(content).into()
}
