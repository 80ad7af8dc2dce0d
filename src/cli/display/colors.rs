//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for an operator health value
    pub fn get_health_color(&self, health: &str) -> TableColor {
        match health.to_ascii_lowercase().as_str() {
            "green" => self.success,
            "yellow" => self.warning,
            "red" => self.error,
            _ => self.muted,
        }
    }

    /// Highlight instances this tool manages
    pub fn get_managed_color(&self, managed: bool) -> TableColor {
        if managed {
            self.info
        } else {
            self.muted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_get_health_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_health_color("green"), TableColor::Green);
        assert_eq!(theme.get_health_color("YELLOW"), TableColor::Yellow);
        assert_eq!(theme.get_health_color("red"), TableColor::Red);
        assert_eq!(theme.get_health_color("unknown"), TableColor::DarkGrey);
    }
}
