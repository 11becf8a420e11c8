//! User settings, saved and loaded from the preferences directory. Missing or unreadable settings
//! fall back to defaults.

use nazori_core::{geometry::Size, history::DEFAULT_MAX_LEN, io::EMPTY_CANVAS_SIZE, session::SessionConfig};

pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

const DOCUMENTATION: &str = r"# Settings for nazori.
# data_dir: where profiles, drawings and history are kept. Defaults to the platform data directory.
# max_history: snapshots kept per drawing for undo.
# frame_interval_ms: how often buffered pointer samples are drawn.
# canvas_width, canvas_height: canvas size before the first resize.

";

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub data_dir: Option<std::path::PathBuf>,
    pub max_history: usize,
    pub frame_interval_ms: u64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_history: DEFAULT_MAX_LEN,
            // ~60hz
            frame_interval_ms: 16,
            canvas_width: EMPTY_CANVAS_SIZE,
            canvas_height: EMPTY_CANVAS_SIZE,
        }
    }
}
impl Settings {
    const FILENAME: &'static str = "settings.toml";
    /// Shared global settings.
    pub fn get() -> &'static Self {
        static SETTINGS: std::sync::OnceLock<Settings> = std::sync::OnceLock::new();

        SETTINGS.get_or_init(|| match preferences_dir() {
            None => {
                log::warn!("No preferences dir, using default settings.");
                Self::default()
            }
            Some(mut dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(&dir)
            }
        })
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let load = || -> anyhow::Result<Self> {
            let string = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&string)?)
        };
        match load() {
            Ok(settings) => settings,
            Err(e) => {
                log::info!("Settings unavailable ({e}), defaulting.");
                Self::default()
            }
        }
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Not recursive. If the parent is missing, the user probably has a good reason.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        let string = DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(self)?;
        std::fs::write(preferences, string)?;
        Ok(())
    }
    /// Where the store lives: the configured directory, else the platform data directory, else
    /// the working directory.
    #[must_use]
    pub fn data_dir(&self) -> std::path::PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        let mut dir = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
        dir.push(env!("CARGO_PKG_NAME"));
        dir
    }
    #[must_use]
    pub fn frame_interval(&self) -> std::time::Duration {
        // Zero would make the interval timer panic.
        std::time::Duration::from_millis(self.frame_interval_ms.max(1))
    }
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_history: self.max_history,
            canvas_size: Size::new(self.canvas_width, self.canvas_height),
        }
    }
}
