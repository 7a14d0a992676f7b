//! Desktop front end for the design flow.

mod app;
mod message;
mod screens;
mod state;
mod widgets;

pub use app::InkGeniusApp;
pub use message::Message;
pub use state::AppState;

use crate::config::Config;

/// Open the app window. Blocks until it is closed.
pub fn run(config: Config) -> iced::Result {
    iced::application(
        move || InkGeniusApp::new(config.clone()),
        InkGeniusApp::update,
        InkGeniusApp::view,
    )
    .title("InkGenius")
    .centered()
    .run()
}
