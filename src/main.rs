use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use macroquad::prelude::*;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use snake_classic::engine::{self, Game, GameConfig, GamePhase, SPEED_RANGE};
use snake_classic::input::{self, Control};
use snake_classic::records::{FileStorage, Scoreboard};
use snake_classic::render::{self, BoardLayout};
use snake_classic::settings::{self, Settings};

#[derive(Parser, Debug)]
#[command(name = "snake_classic", about = "Grid snake with a fixed-timestep engine")]
struct Cli {
    /// Cells per second. Defaults to the last speed played.
    #[arg(
        long,
        value_parser = clap::value_parser!(u32)
            .range(i64::from(*SPEED_RANGE.start())..=i64::from(*SPEED_RANGE.end()))
    )]
    speed: Option<u32>,
    /// Where scores and settings are kept.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
    /// Fixed seed for the food sequence.
    #[arg(long)]
    seed: Option<u64>,
    /// Open in a window instead of fullscreen.
    #[arg(long)]
    windowed: bool,
}

fn window_conf(fullscreen: bool) -> Conf {
    Conf {
        window_title: "Snake".to_owned(),
        window_width: 960,
        window_height: 640,
        fullscreen,
        high_dpi: true,
        ..Default::default()
    }
}

/// `info` unless `directives` (the value of `RUST_LOG`) says otherwise.
fn env_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn main() -> anyhow::Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt().with_env_filter(env_filter(directives.as_deref())).init();

    let cli = Cli::parse();
    fs::create_dir_all(&cli.data_dir)
        .with_context(|| format!("failed to create data directory {}", cli.data_dir.display()))?;

    let stored = match settings::load(&cli.data_dir) {
        Ok(s) => s.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("{:#}, using default settings", anyhow::Error::from(e));
            Settings::default()
        }
    };
    let settings = Settings {
        speed: cli.speed.unwrap_or(stored.speed),
        fullscreen: stored.fullscreen && !cli.windowed,
    };
    let config = GameConfig { speed: settings.speed(), seed: cli.seed };

    tracing::info!(
        "starting snake: data_dir={} speed={} seed={:?} fullscreen={}",
        cli.data_dir.display(),
        config.speed.get(),
        config.seed,
        settings.fullscreen
    );

    macroquad::Window::from_config(window_conf(settings.fullscreen), run(config, cli.data_dir, settings));
    Ok(())
}

async fn run(config: GameConfig, data_dir: PathBuf, mut settings: Settings) {
    let store = Scoreboard::new(FileStorage::new(&data_dir));
    let mut game = Game::new(config, Box::new(store));
    let mut records = game.records();
    let mut phase = game.phase();
    let mut last_time = get_time();

    loop {
        let now = get_time();
        let dt = (now - last_time).max(0.0);
        last_time = now;

        let layout = BoardLayout::new(screen_width(), screen_height());

        let mut control = Control::Continue;
        for key in get_keys_pressed() {
            if let Some(action) = input::action_for_key(key) {
                if input::apply(&mut game, action) == Control::Quit {
                    control = Control::Quit;
                }
            }
        }
        if control == Control::Quit {
            break;
        }
        // saved eagerly, closing the window drops this future
        if settings.remember_speed(game.speed()) {
            save_settings(&data_dir, &settings);
        }

        // touches arrive as simulated mouse presses
        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            let point = vec2(x, y);
            if let Some(button) = layout.pad_at(point) {
                input::apply(&mut game, button.action());
            } else if layout.board_rect().contains(point) && game.phase() != GamePhase::Running {
                game.start();
            }
        }

        game.advance(Duration::from_secs_f64(dt));

        if game.phase() != phase {
            phase = game.phase();
            if phase == GamePhase::Over {
                records = game.records();
            }
        }

        clear_background(render::background());
        render::draw(&game.snapshot(), &records, &layout, engine::system_clock());

        next_frame().await;
    }
}

fn save_settings(data_dir: &Path, settings: &Settings) {
    if let Err(e) = settings::save(data_dir, settings) {
        tracing::warn!("could not save settings: {:#}", anyhow::Error::from(e));
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn log_level_defaults_to_info() {
        assert!(env_filter(None).to_string().eq_ignore_ascii_case("info"));
        assert!(env_filter(Some("")).to_string().eq_ignore_ascii_case("info"));
    }

    #[test]
    fn rust_log_level_is_kept() {
        assert!(env_filter(Some("debug")).to_string().eq_ignore_ascii_case("debug"));
        assert!(
            env_filter(Some("snake_classic=trace"))
                .to_string()
                .eq_ignore_ascii_case("snake_classic=trace")
        );
    }

    #[test]
    fn speed_flag_follows_the_engine_range() {
        Cli::command().debug_assert();
        let top = SPEED_RANGE.end().to_string();
        let too_fast = (SPEED_RANGE.end() + 1).to_string();
        let parsed = Cli::try_parse_from(["snake_classic", "--speed", &top]).unwrap();
        assert_eq!(parsed.speed, Some(*SPEED_RANGE.end()));
        assert!(Cli::try_parse_from(["snake_classic", "--speed", &too_fast]).is_err());
        assert!(Cli::try_parse_from(["snake_classic", "--speed", "0"]).is_err());
    }
}
