//! Terminal color themes
//!
//! Maps the semantic color roles of the terminal surface (background,
//! foreground, cursor, selection, plus the standard and bright ANSI colors)
//! to hex color strings. Two built-in presets, overridable per field.

use serde::{Deserialize, Serialize};

/// Theme variant selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    /// Dark theme (default)
    #[default]
    Dark,
    /// Light theme
    Light,
}

/// Resolved terminal theme: every color role has a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: String,
    pub foreground: String,
    pub cursor: String,
    pub selection: String,
    pub black: String,
    pub red: String,
    pub green: String,
    pub yellow: String,
    pub blue: String,
    pub magenta: String,
    pub cyan: String,
    pub white: String,
    pub bright_black: String,
    pub bright_red: String,
    pub bright_green: String,
    pub bright_yellow: String,
    pub bright_blue: String,
    pub bright_magenta: String,
    pub bright_cyan: String,
    pub bright_white: String,
}

impl Theme {
    /// The built-in dark preset
    pub fn dark() -> Self {
        Self {
            background: "#1e1e1e".into(),
            foreground: "#d4d4d4".into(),
            cursor: "#d4d4d4".into(),
            selection: "#4682b4".into(),
            black: "#000000".into(),
            red: "#cd3131".into(),
            green: "#0dbc79".into(),
            yellow: "#e5e510".into(),
            blue: "#2472c8".into(),
            magenta: "#bc3fbc".into(),
            cyan: "#11a8cd".into(),
            white: "#e5e5e5".into(),
            bright_black: "#666666".into(),
            bright_red: "#f14c4c".into(),
            bright_green: "#23d18b".into(),
            bright_yellow: "#f5f543".into(),
            bright_blue: "#3b8eea".into(),
            bright_magenta: "#d670d6".into(),
            bright_cyan: "#29b8db".into(),
            bright_white: "#ffffff".into(),
        }
    }

    /// The built-in light preset
    pub fn light() -> Self {
        Self {
            background: "#fafafa".into(),
            foreground: "#1e1e1e".into(),
            cursor: "#1e1e1e".into(),
            selection: "#add6ff".into(),
            black: "#000000".into(),
            red: "#cd3131".into(),
            green: "#00bc00".into(),
            yellow: "#949800".into(),
            blue: "#0451a5".into(),
            magenta: "#bc05bc".into(),
            cyan: "#0598bc".into(),
            white: "#555555".into(),
            bright_black: "#666666".into(),
            bright_red: "#cd3131".into(),
            bright_green: "#14ce14".into(),
            bright_yellow: "#b5ba00".into(),
            bright_blue: "#0451a5".into(),
            bright_magenta: "#bc05bc".into(),
            bright_cyan: "#0598bc".into(),
            bright_white: "#a5a5a5".into(),
        }
    }

    /// Get the preset for a variant
    pub fn preset(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self::dark(),
            ThemeVariant::Light => Self::light(),
        }
    }

    /// Resolve a theme from a variant preset and a partial override.
    /// Override fields win key by key; unset fields keep the preset value.
    pub fn resolve(variant: ThemeVariant, overrides: &ThemeOverride) -> Self {
        let mut theme = Self::preset(variant);
        overrides.apply_to(&mut theme);
        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

macro_rules! override_fields {
    ($($field:ident),* $(,)?) => {
        /// Partial theme: every color role optional, unset fields default to
        /// the preset value
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct ThemeOverride {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )*
        }

        impl ThemeOverride {
            /// Copy every set field onto `theme`
            pub fn apply_to(&self, theme: &mut Theme) {
                $(
                    if let Some(ref value) = self.$field {
                        theme.$field = value.clone();
                    }
                )*
            }

            /// Whether no field is set
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }
    };
}

override_fields!(
    background,
    foreground,
    cursor,
    selection,
    black,
    red,
    green,
    yellow,
    blue,
    magenta,
    cyan,
    white,
    bright_black,
    bright_red,
    bright_green,
    bright_yellow,
    bright_blue,
    bright_magenta,
    bright_cyan,
    bright_white,
);
