use crate::stroke::StrokeStyle;

const DOCUMENTATION: &str = r##"# Snapink annotation preferences. You may edit this file, but be aware that formatting and comments
# will not be preserved.

# stroke_color is written "#rrggbb" or "#rrggbbaa", in hexadecimal.
# stroke_width_px is the pen width in display pixels, and must be greater than zero.

# Example:
# stroke_color = "#ff0000ff"
# stroke_width_px = 10.0

"##;

/// Directory name under the platform preference directory. Shared by every front end.
const APP_DIR: &str = "snapink";

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(APP_DIR);
    Some(base_dir)
}

#[derive(thiserror::Error, Debug)]
pub enum PrefsError {
    #[error("no preferences dir found")]
    NoPath,
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct Preferences {
    failed_to_load: bool,
    pub style: StrokeStyle,
}
impl Preferences {
    const FILENAME: &'static str = "annotation.toml";
    /// Shared global preferences, loaded from the user's preference directory.
    /// (Or defaulted, if unavailable for some reason)
    #[must_use]
    pub fn get() -> &'static Self {
        static GLOBAL_PREFERENCES: std::sync::OnceLock<Preferences> = std::sync::OnceLock::new();

        GLOBAL_PREFERENCES.get_or_init(|| match Self::path() {
            None => Self::no_path(),
            Some(path) => Self::load_or_default(&path),
        })
    }
    /// Where [`Preferences::get`] loads from and [`Preferences::save`] writes to.
    #[must_use]
    pub fn path() -> Option<std::path::PathBuf> {
        let mut dir = preferences_dir()?;
        dir.push(Self::FILENAME);
        Some(dir)
    }
    /// Preferences holding `style`, not (yet) backed by any file.
    #[must_use]
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            failed_to_load: false,
            style,
        }
    }
    #[must_use]
    pub fn no_path() -> Self {
        log::warn!("Annotation preferences weren't available, defaulting.");
        Self {
            failed_to_load: true,
            style: StrokeStyle::default(),
        }
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let load = || -> Result<StrokeStyle, Box<dyn std::error::Error>> {
            let string = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&string)?)
        };
        match load() {
            Ok(style) => Self {
                failed_to_load: false,
                style,
            },
            Err(err) => {
                log::debug!("Reading {}: {err}", path.display());
                Self::no_path()
            }
        }
    }
    /// Return true if loading user's settings failed. This can be useful for
    /// displaying a warning.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    pub fn save(&self) -> Result<(), PrefsError> {
        let dir = preferences_dir().ok_or(PrefsError::NoPath)?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&dir);
        self.save_to(&dir.join(Self::FILENAME))
    }
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), PrefsError> {
        let mut string = toml::ser::to_string_pretty(&self.style)?;
        // Prefix some documentation.
        string = DOCUMENTATION.to_owned() + &string;
        std::fs::write(path, string)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Preferences;
    use crate::{color::Color, stroke::StrokeStyle};

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotation.toml");
        let prefs = Preferences::new(StrokeStyle::new(Color::new(0, 128, 255, 255), 3.0).unwrap());
        prefs.save_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Snapink"));

        let loaded = Preferences::load_or_default(&path);
        assert!(!loaded.did_fail_to_load());
        assert_eq!(loaded.style, prefs.style);
    }
    #[test]
    fn missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Preferences::load_or_default(&dir.path().join("nope.toml"));
        assert!(loaded.did_fail_to_load());
        assert_eq!(loaded.style, StrokeStyle::default());
    }
    #[test]
    fn invalid_width_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotation.toml");
        std::fs::write(&path, "stroke_color = \"#ffffff\"\nstroke_width_px = -2.0\n").unwrap();
        let loaded = Preferences::load_or_default(&path);
        assert!(loaded.did_fail_to_load());
        assert_eq!(loaded.style, StrokeStyle::default());
    }
}
