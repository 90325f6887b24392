use std::{
    fs,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const THEME_FIELD: &str = "theme";
const FONT_SIZE_FIELD: &str = "fontSize";
const ALWAYS_ON_TOP_FIELD: &str = "alwaysOnTop";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub(crate) const ALL: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|theme| theme.as_str() == raw)
    }

    pub(crate) fn menu_label(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub(crate) struct FontSize(u8);

impl FontSize {
    pub(crate) const LEGAL: [u8; 4] = [14, 16, 18, 20];
    pub(crate) const DEFAULT: FontSize = FontSize(14);
    const STEP: u8 = 2;

    pub(crate) fn new(value: u8) -> Option<Self> {
        Self::LEGAL.contains(&value).then_some(Self(value))
    }

    pub(crate) fn value(self) -> u8 {
        self.0
    }

    pub(crate) fn menu_label(self) -> &'static str {
        match self.0 {
            14 => "Default",
            16 => "Medium",
            18 => "Large",
            _ => "Extra Large",
        }
    }

    pub(crate) fn larger(self) -> Option<Self> {
        self.0.checked_add(Self::STEP).and_then(Self::new)
    }

    pub(crate) fn smaller(self) -> Option<Self> {
        self.0.checked_sub(Self::STEP).and_then(Self::new)
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for FontSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("font size {value} is not one of {:?}", Self::LEGAL))
    }
}

impl From<FontSize> for u8 {
    fn from(size: FontSize) -> Self {
        size.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Preferences {
    pub(crate) theme: Theme,
    pub(crate) font_size: FontSize,
    pub(crate) always_on_top: bool,
}

fn decode_field<T: for<'de> Deserialize<'de>>(object: &Map<String, Value>, field: &str) -> Option<T> {
    object
        .get(field)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

impl Preferences {
    /// Validates each stored key on its own; an illegal value only resets
    /// that key to its default.
    pub(crate) fn from_stored(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        Self {
            theme: decode_field(object, THEME_FIELD).unwrap_or_default(),
            font_size: decode_field(object, FONT_SIZE_FIELD).unwrap_or_default(),
            always_on_top: decode_field(object, ALWAYS_ON_TOP_FIELD).unwrap_or_default(),
        }
    }
}

fn empty_state_object() -> Value {
    Value::Object(Map::new())
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = empty_state_object();
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just normalized into a JSON object"),
    }
}

/// Preferences plus the file they persist to. A store without a path keeps
/// its values in memory only.
#[derive(Debug)]
pub(crate) struct PreferencesStore {
    path: Option<PathBuf>,
    preferences: Preferences,
}

impl PreferencesStore {
    pub(crate) fn in_memory() -> Self {
        Self {
            path: None,
            preferences: Preferences::default(),
        }
    }

    pub(crate) fn load<F>(path: PathBuf, log: F) -> Self
    where
        F: Fn(&str),
    {
        let preferences = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) => {
                    let preferences = Preferences::from_stored(&value);
                    if serde_json::to_value(preferences).ok().as_ref() != Some(&value) {
                        log(&format!(
                            "preferences {} had missing or invalid values; defaults applied",
                            path.display()
                        ));
                    }
                    preferences
                }
                Err(error) => {
                    log(&format!(
                        "failed to parse preferences {}: {}. using defaults",
                        path.display(),
                        error
                    ));
                    Preferences::default()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(error) => {
                log(&format!(
                    "failed to read preferences {}: {}. using defaults",
                    path.display(),
                    error
                ));
                Preferences::default()
            }
        };

        Self {
            path: Some(path),
            preferences,
        }
    }

    pub(crate) fn get(&self) -> Preferences {
        self.preferences
    }

    pub(crate) fn set_theme(&mut self, theme: Theme) -> Result<(), String> {
        self.preferences.theme = theme;
        self.persist()
    }

    pub(crate) fn set_font_size(&mut self, font_size: FontSize) -> Result<(), String> {
        self.preferences.font_size = font_size;
        self.persist()
    }

    pub(crate) fn set_always_on_top(&mut self, always_on_top: bool) -> Result<(), String> {
        self.preferences.always_on_top = always_on_top;
        self.persist()
    }

    /// Writes every known key, keeping unknown keys already in the file.
    fn persist(&self) -> Result<(), String> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        if let Some(parent_dir) = path.parent() {
            fs::create_dir_all(parent_dir).map_err(|error| {
                format!(
                    "Failed to create preferences directory {}: {}",
                    parent_dir.display(),
                    error
                )
            })?;
        }

        let mut parsed = match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str::<Value>(&raw).unwrap_or_else(|_| empty_state_object()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => empty_state_object(),
            Err(error) => {
                return Err(format!(
                    "Failed to read preferences {}: {}",
                    path.display(),
                    error
                ));
            }
        };
        let object = ensure_object(&mut parsed);
        let current = serde_json::to_value(self.preferences)
            .map_err(|error| format!("Failed to serialize preferences: {error}"))?;
        if let Value::Object(fields) = current {
            object.extend(fields);
        }

        let serialized = serde_json::to_string_pretty(&parsed)
            .map_err(|error| format!("Failed to serialize preferences: {error}"))?;
        fs::write(path, serialized).map_err(|error| {
            format!("Failed to write preferences {}: {}", path.display(), error)
        })
    }
}
