use iced::{
    Element, Length,
    widget::{Column, button, column, container, row, scrollable, text, text_input},
};

use crate::gui::{AppState, Message, widgets::request_status};
use crate::models::Artist;

fn artist_card(artist: &Artist, index: usize, chosen: bool) -> Element<'_, Message> {
    let mut details = column![text(artist.name.as_str()).size(20)].spacing(4);
    if !artist.address.is_empty() {
        details = details.push(text(artist.address.as_str()).size(14));
    }
    if !artist.specialties.is_empty() {
        details = details.push(text(format!("Specialties: {}", artist.specialties.join(", "))).size(14));
    }
    details = details.push(text(format!("Availability: {}", artist.availability)).size(14));
    if !artist.description.is_empty() {
        details = details.push(text(artist.description.as_str()).size(14));
    }
    let label = if chosen { "Chosen" } else { "Choose" };
    details = details.push(
        button(label)
            .style(if chosen { button::success } else { button::primary })
            .on_press(Message::ChooseArtist(index)),
    );

    container(details)
        .style(container::bordered_box)
        .padding(10)
        .width(Length::Fill)
        .into()
}

pub fn view(state: &AppState) -> Element<'_, Message> {
    let wizard = &state.wizard;
    let query = &wizard.artist_query;
    let can_search = !query.location.trim().is_empty() && !wizard.artists.is_pending();

    let mut content = column![
        text("Find an artist").size(28),
        row![
            text_input("Style", &query.style)
                .on_input(Message::ArtistStyleChanged)
                .padding(10),
            text_input("City or area", &query.location)
                .on_input(Message::LocationChanged)
                .on_submit_maybe(can_search.then_some(Message::SearchArtists))
                .padding(10),
            button("Search").on_press_maybe(can_search.then_some(Message::SearchArtists)),
        ]
        .spacing(10),
    ]
    .spacing(16);

    if let Some(status) = request_status(&wizard.artists, "Searching the web for artists...") {
        content = content.push(status);
    }

    if let Some(search) = wizard.artists.value() {
        if search.artists.is_empty() {
            content = content.push(text("No artists found. Try a nearby city or a broader style."));
        }
        let chosen = wizard.chosen_artist().map(|a| a.name.as_str());
        for (index, artist) in search.artists.iter().enumerate() {
            content = content.push(artist_card(artist, index, chosen == Some(artist.name.as_str())));
        }
        if !search.sources.is_empty() {
            let sources = search.sources.iter().fold(Column::new().spacing(2), |list, source| {
                let label = if source.title.is_empty() { &source.uri } else { &source.title };
                list.push(text(format!("{label} ({})", source.uri)).size(12))
            });
            content = content.push(text("Sources").size(16)).push(sources);
        }
    }

    content = content.push(
        button("Save with this artist")
            .on_press_maybe(wizard.chosen_artist().is_some().then_some(Message::SaveProject)),
    );
    scrollable(content).into()
}
