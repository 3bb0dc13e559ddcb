use std::path::PathBuf;

/// Problems with the per-game layout, glyph tables or dictionaries.
/// None of these can be fixed by retrying; the run has to be aborted.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("no glyph metrics for {ch:?} (character code {code})")]
    MissingGlyph { ch: char, code: u32 },

    #[error("menu needs column {column} but the layout only has {available} origin(s)")]
    MissingOrigin { column: usize, available: usize },

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error(
        "glyph {ch:?} cell x={x} w={width} h={height} lies outside the {sheet_width}x{sheet_height} font sheet"
    )]
    GlyphOutOfBounds {
        ch: char,
        x: u32,
        width: u32,
        height: u32,
        sheet_width: u32,
        sheet_height: u32,
    },

    #[error(
        "menu generation gave up after {draws} draws with {emitted}/{target} commands; \
         check commandlength against the dictionaries"
    )]
    GenerationExhausted {
        draws: usize,
        emitted: usize,
        target: usize,
    },

    #[error("malformed layout descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),
}

/// Unreadable or malformed input files.
#[derive(thiserror::Error, Debug)]
pub enum ResourceError {
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image '{}': {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no screenshots found in '{}'", .dir.display())]
    NoScreenshots { dir: PathBuf },

    #[error("unknown game '{name}'")]
    UnknownGame { name: String },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),
}

impl Error {
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
