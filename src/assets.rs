//! Local data directory: dictionaries, per-game layouts, font strips and
//! screenshots.
//!
//! ```text
//! <root>/verb.dict
//! <root>/menu.dict
//! <root>/<game>/offset.json
//! <root>/<game>/font.png
//! <root>/<game>/img/*.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use log::{debug, info, warn};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::{Error, ResourceError};
use crate::game::layout::LayoutSpec;
use crate::game::words::WordBank;

const VERB_DICT: &str = "verb.dict";
const NOUN_DICT: &str = "menu.dict";
const LAYOUT_FILE: &str = "offset.json";
const FONT_FILE: &str = "font.png";
const SCREENSHOT_DIR: &str = "img";

#[inline(always)]
fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ResourceError + '_ {
    move |source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[inline(always)]
fn image_err(path: &Path) -> impl FnOnce(image::ImageError) -> ResourceError + '_ {
    move |source| ResourceError::Image {
        path: path.to_path_buf(),
        source,
    }
}

/* ======================= IMAGES ======================= */

/// Decode using the extension's format first, then fall back to sniffing
/// the content. Screenshots are sometimes saved with the wrong extension.
pub fn open_image(path: &Path) -> Result<DynamicImage, ResourceError> {
    let hint = ImageFormat::from_path(path).ok();
    if let Some(fmt) = hint {
        let mut reader = ImageReader::open(path).map_err(io_err(path))?;
        reader.set_format(fmt);
        if let Ok(img) = reader.decode() {
            return Ok(img);
        }
    }

    let guessed = ImageReader::open(path)
        .map_err(io_err(path))?
        .with_guessed_format()
        .map_err(io_err(path))?;
    if let (Some(hint_fmt), Some(real_fmt)) = (hint, guessed.format())
        && hint_fmt != real_fmt
    {
        warn!("Graphic file '{}' is really {:?}", path.display(), real_fmt);
    }
    guessed.decode().map_err(image_err(path))
}

pub fn open_rgba(path: &Path) -> Result<RgbaImage, ResourceError> {
    open_image(path).map(DynamicImage::into_rgba8)
}

pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), ResourceError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(image_err(path))?;
    info!(
        "Wrote {}x{} image to '{}'.",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

/* ======================= DATA ROOT ======================= */

#[derive(Debug, Clone)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn game_dir(&self, game: &str) -> PathBuf {
        self.root.join(game)
    }

    pub fn load_word_bank(&self) -> Result<WordBank, ResourceError> {
        let verbs_path = self.root.join(VERB_DICT);
        let nouns_path = self.root.join(NOUN_DICT);
        let verbs = fs::read_to_string(&verbs_path).map_err(io_err(&verbs_path))?;
        let nouns = fs::read_to_string(&nouns_path).map_err(io_err(&nouns_path))?;
        let bank = WordBank::from_text(&verbs, &nouns);
        info!(
            "Loaded {} verb(s) and {} noun(s).",
            bank.verbs.len(),
            bank.nouns.len()
        );
        Ok(bank)
    }

    pub fn load_layout(&self, game: &str) -> Result<LayoutSpec, Error> {
        let path = self.game_dir(game).join(LAYOUT_FILE);
        if !path.is_file() {
            return Err(ResourceError::UnknownGame {
                name: game.to_string(),
            }
            .into());
        }
        let text = fs::read_to_string(&path).map_err(io_err(&path))?;
        let layout = LayoutSpec::from_json(&text)?;
        debug!(
            "Layout '{}': {}x{} grid, {} glyph(s).",
            path.display(),
            layout.rows,
            layout.columns,
            layout.glyph_metrics.len()
        );
        Ok(layout)
    }

    pub fn load_font_sheet(&self, game: &str) -> Result<RgbaImage, ResourceError> {
        open_rgba(&self.game_dir(game).join(FONT_FILE))
    }

    /// Uniformly pick one file from the game's screenshot folder. The
    /// listing is sorted so a seeded run is reproducible.
    pub fn pick_screenshot<R: Rng + ?Sized>(
        &self,
        game: &str,
        rng: &mut R,
    ) -> Result<PathBuf, ResourceError> {
        let dir = self.game_dir(game).join(SCREENSHOT_DIR);
        let mut shots = Vec::new();
        for entry in fs::read_dir(&dir).map_err(io_err(&dir))? {
            let path = entry.map_err(io_err(&dir))?.path();
            if path.is_file() {
                shots.push(path);
            }
        }
        shots.sort();
        let pick = shots
            .choose(rng)
            .cloned()
            .ok_or(ResourceError::NoScreenshots { dir })?;
        debug!("Picked screenshot '{}' of {}.", pick.display(), shots.len());
        Ok(pick)
    }
}
