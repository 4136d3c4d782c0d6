//! `gallery list` - load and print the gallery.

use anyhow::Result;

use gallery::controller::Outcome;
use gallery::ui;

use super::Session;

/// Execute the list command.
pub async fn execute(session: &Session, html: bool) -> Result<()> {
    session.load().await?;

    let renderer = session.controller.renderer();
    if session.ui.empty_state.is_set() {
        println!("{}", renderer.locale().messages().empty_gallery);
    } else if html {
        print!("{}", renderer.grid(&session.ui.grid.cards()));
    } else {
        ui::print_records(&session.controller.store().snapshot(), renderer);
    }

    session.finish(Outcome::Completed)
}
