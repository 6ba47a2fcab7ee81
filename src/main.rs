use anyhow::{ensure, Context, Result};
use crossterm::terminal;
use snake_term::{Config, Game, Layout, TermSurface};
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_logging(&config)?;

    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let (min_rows, min_cols) = Layout::MIN_SIZE;
    ensure!(
        rows >= min_rows && cols >= min_cols,
        "terminal is {cols}x{rows}, snake needs at least {min_cols}x{min_rows}"
    );

    let mut surface = TermSurface::new();
    surface.init().context("preparing terminal")?;

    // Restore the terminal before any error is printed.
    let result = play(&mut surface, &config);
    surface.cleanup().context("restoring terminal")?;
    result
}

fn play(surface: &mut TermSurface, config: &Config) -> Result<()> {
    let mut game = Game::new(surface, config.seed)?;
    tracing::info!(seed = config.seed, tick_ms = config.tick.as_millis() as u64, "snake started");

    snake_term::run(surface, &mut game, config.tick)?;
    game.close(surface)?;
    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter {:?}", config.log_filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
