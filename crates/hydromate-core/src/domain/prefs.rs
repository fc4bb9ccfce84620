use serde::{Deserialize, Serialize};

/// Display unit for liquid amounts.
///
/// Amounts are always stored in milliliters; the unit only affects
/// formatting and the default cup sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidUnit {
    #[default]
    Milliliters,
    Ounces,
}

impl LiquidUnit {
    pub fn serialized(self) -> &'static str {
        match self {
            LiquidUnit::Milliliters => "milliliters",
            LiquidUnit::Ounces => "ounces",
        }
    }

    /// Decode a persisted unit, falling back to milliliters for unknown
    /// or missing values.
    pub fn of(serialized: Option<&str>) -> LiquidUnit {
        match serialized {
            Some("ounces") => LiquidUnit::Ounces,
            _ => LiquidUnit::Milliliters,
        }
    }

    pub fn format(self) -> &'static str {
        match self {
            LiquidUnit::Milliliters => "Milliliters",
            LiquidUnit::Ounces => "Ounces",
        }
    }
}

/// Application color theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Dark,
    Light,
}

impl Theme {
    pub fn serialized(self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Decode a persisted theme, falling back to `System` for unknown or
    /// missing values.
    pub fn of(serialized: Option<&str>) -> Theme {
        match serialized {
            Some("dark") => Theme::Dark,
            Some("light") => Theme::Light,
            _ => Theme::System,
        }
    }

    pub fn format(self) -> &'static str {
        match self {
            Theme::System => "System",
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_roundtrip() {
        for theme in [Theme::System, Theme::Dark, Theme::Light] {
            assert_eq!(Theme::of(Some(theme.serialized())), theme);
        }
    }

    #[test]
    fn unknown_theme_falls_back_to_system() {
        assert_eq!(Theme::of(Some("sepia")), Theme::System);
        assert_eq!(Theme::of(None), Theme::System);
    }

    #[test]
    fn unknown_unit_falls_back_to_milliliters() {
        assert_eq!(LiquidUnit::of(Some("cups")), LiquidUnit::Milliliters);
        assert_eq!(LiquidUnit::of(Some("ounces")), LiquidUnit::Ounces);
    }
}
