//! Gui command: hand over to the desktop app.

use anyhow::{Context, Result};

use inkgenius::Config;

pub fn run(config: Config) -> Result<()> {
    inkgenius::gui::run(config).context("Desktop app failed")
}
