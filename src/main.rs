mod assets;
mod config;
mod error;
mod game;
mod ui;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::assets::DataRoot;
use crate::config::Config;
use crate::error::{Error, ResourceError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install logger immediately, then set runtime max level from config after loading it.
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .try_init();
    // Startup default when config is missing or malformed.
    log::set_max_level(log::LevelFilter::Warn);

    config::load();
    let cfg = config::get();
    log::set_max_level(cfg.log_level.as_level_filter());

    let requested = std::env::args().nth(1);
    if let Err(e) = run(&cfg, requested.as_deref()) {
        if e.is_configuration() {
            error!("Layout or dictionary problem, nothing was drawn: {e}");
        } else {
            error!("Could not read game data, nothing was drawn: {e}");
        }
        return Err(e.into());
    }
    Ok(())
}

fn run(cfg: &Config, requested: Option<&str>) -> Result<(), Error> {
    let mut rng = cfg
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

    let game = choose_game(requested, &cfg.games, &mut rng)?;
    let data = DataRoot::new(&cfg.data_root);

    let words = data.load_word_bank()?;
    let layout = data.load_layout(&game)?;
    layout.check_coverage(&words)?;

    let commands = game::menu::generate_bounded(&words, &layout, &mut rng, cfg.max_draws)?;
    println!("~~~~{game}~~~~");
    for cmd in &commands {
        if cmd.is_empty() {
            println!("-----");
        } else {
            println!("{cmd}");
        }
    }

    let shot = data.pick_screenshot(&game, &mut rng)?;
    let background = assets::open_rgba(&shot)?;
    let font_sheet = data.load_font_sheet(&game)?;
    let image =
        ui::compose::render_scaled(&commands, &layout, &background, &font_sheet, cfg.scale_factor)?;
    assets::save_png(&image, &cfg.output_path)?;

    info!("Battle menu for '{game}' drawn onto '{}'.", shot.display());
    Ok(())
}

/// The game named on the command line if it's a known one, otherwise a
/// random pick from the configured list.
fn choose_game<R: Rng + ?Sized>(
    requested: Option<&str>,
    games: &[String],
    rng: &mut R,
) -> Result<String, ResourceError> {
    if let Some(name) = requested {
        if games.iter().any(|g| g == name) {
            return Ok(name.to_string());
        }
        warn!("Unknown game '{name}', picking one at random.");
    }
    games
        .choose(rng)
        .cloned()
        .ok_or_else(|| ResourceError::UnknownGame {
            name: requested.unwrap_or_default().to_string(),
        })
}
