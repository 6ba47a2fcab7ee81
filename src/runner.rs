use crate::machine::Game;
use crate::surface::{Key, Surface};
use std::io;
use std::time::Duration;
use tracing::info;

/// Polls input and feeds it to the game until the quit key arrives.
///
/// Each iteration waits at most `poll` for a key; a timeout is passed on as
/// "no input" so a running snake keeps moving. Quit is honoured in every
/// status.
pub fn run<S: Surface>(surface: &mut S, game: &mut Game, poll: Duration) -> io::Result<()> {
    loop {
        let key = surface.read_key(poll)?;
        if key == Some(Key::Quit) {
            info!(status = ?game.status, score = game.state.score, "quit");
            return Ok(());
        }
        game.handle(surface, key)?;
    }
}
