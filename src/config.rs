use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

const CONFIG_PATH: &str = "battlemenu.ini";

// --- Minimal INI reader ---
#[derive(Debug, Default)]
pub struct SimpleIni {
    sections: HashMap<String, HashMap<String, String>>,
}

impl SimpleIni {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content);
        Ok(())
    }

    pub fn load_str(&mut self, content: &str) {
        self.sections.clear();

        let mut current_section: Option<String> = None;

        for raw_line in content.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            // Section header: [SectionName]
            if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
                let name = &line[1..line.len() - 1];
                let section = name.trim().to_string();
                current_section = Some(section.clone());
                self.sections.entry(section).or_default();
                continue;
            }

            // Key/value pair: key=value
            if let Some(eq_idx) = line.find('=') {
                let (key_raw, value_raw) = line.split_at(eq_idx);
                let key = key_raw.trim();
                if key.is_empty() {
                    continue;
                }
                // Skip '=' and trim whitespace from the value.
                let value = value_raw[1..].trim().to_string();
                let section = current_section.clone().unwrap_or_default();
                self.sections
                    .entry(section)
                    .or_default()
                    .insert(key.to_string(), value);
            }
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section).and_then(|s| s.get(key)).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info",
            Self::Debug => "Debug",
            Self::Trace => "Trace",
        }
    }

    pub const fn as_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_root: PathBuf,
    /// Games eligible for a random pick; each needs a folder under `data_root`.
    pub games: Vec<String>,
    pub output_path: PathBuf,
    /// Integer upscale applied to the finished screenshot.
    pub scale_factor: u32,
    /// Draw budget for menu generation before giving up on the layout.
    pub max_draws: usize,
    // None = fresh OS entropy every run.
    pub seed: Option<u64>,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            games: vec!["ff1".to_string(), "ff4".to_string(), "ff6".to_string()],
            output_path: PathBuf::from("out.png"),
            scale_factor: crate::ui::compose::DEFAULT_SCALE,
            max_draws: crate::game::menu::DEFAULT_MAX_DRAWS,
            seed: None,
            log_level: LogLevel::Info,
        }
    }
}

// Global, mutable configuration instance.
static CONFIG: std::sync::LazyLock<Mutex<Config>> =
    std::sync::LazyLock::new(|| Mutex::new(Config::default()));

// --- File I/O ---

fn create_default_config_file() -> Result<(), std::io::Error> {
    info!("'{CONFIG_PATH}' not found, creating with default values.");
    let default = Config::default();

    let mut content = String::new();

    // [Options] section - keys in alphabetical order
    content.push_str("[Options]\n");
    content.push_str(&format!("DataRoot={}\n", default.data_root.display()));
    content.push_str(&format!("Games={}\n", default.games.join(",")));
    content.push_str(&format!("LogLevel={}\n", default.log_level.as_str()));
    content.push_str(&format!("MaxDraws={}\n", default.max_draws));
    content.push_str(&format!("OutputPath={}\n", default.output_path.display()));
    content.push_str(&format!("ScaleFactor={}\n", default.scale_factor));
    content.push_str("Seed=\n");
    content.push('\n');

    std::fs::write(CONFIG_PATH, content)
}

fn parse_games(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a config from parsed INI data, keeping defaults for missing or
/// unreadable keys.
fn from_ini(conf: &SimpleIni) -> Config {
    let default = Config::default();
    let get = |key: &str| conf.get("Options", key).filter(|v| !v.is_empty());

    let data_root = get("DataRoot").map_or(default.data_root, PathBuf::from);
    let output_path = get("OutputPath").map_or(default.output_path, PathBuf::from);
    let games = get("Games")
        .map(|v| parse_games(&v))
        .filter(|g| !g.is_empty())
        .unwrap_or(default.games);
    let scale_factor = match get("ScaleFactor").map(|v| v.parse::<u32>()) {
        Some(Ok(n)) => n.max(1),
        Some(Err(e)) => {
            warn!("Invalid ScaleFactor in '{CONFIG_PATH}': {e}");
            default.scale_factor
        }
        None => default.scale_factor,
    };
    let max_draws = match get("MaxDraws").map(|v| v.parse::<usize>()) {
        Some(Ok(n)) => n.max(1),
        Some(Err(e)) => {
            warn!("Invalid MaxDraws in '{CONFIG_PATH}': {e}");
            default.max_draws
        }
        None => default.max_draws,
    };
    let seed = match get("Seed").map(|v| v.parse::<u64>()) {
        Some(Ok(n)) => Some(n),
        Some(Err(e)) => {
            warn!("Invalid Seed in '{CONFIG_PATH}': {e}");
            default.seed
        }
        None => default.seed,
    };
    let log_level = get("LogLevel")
        .and_then(|v| LogLevel::from_str(&v).ok())
        .unwrap_or(default.log_level);

    Config {
        data_root,
        games,
        output_path,
        scale_factor,
        max_draws,
        seed,
        log_level,
    }
}

pub fn load() {
    if !Path::new(CONFIG_PATH).exists()
        && let Err(e) = create_default_config_file()
    {
        warn!("Failed to create default config file: {e}");
    }

    let mut conf = SimpleIni::new();
    match conf.load(CONFIG_PATH) {
        Ok(()) => {
            let loaded = from_ini(&conf);
            match CONFIG.lock() {
                Ok(mut cfg) => *cfg = loaded,
                Err(poisoned) => *poisoned.into_inner() = loaded,
            }
            info!("Configuration loaded from '{CONFIG_PATH}'.");
        }
        Err(e) => {
            warn!("Failed to load '{CONFIG_PATH}': {e}. Using default values.");
        }
    }
}

pub fn get() -> Config {
    match CONFIG.lock() {
        Ok(cfg) => cfg.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
