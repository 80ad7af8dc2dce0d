//! Status icons for CLI output

/// Status icons for operator health values
pub struct StatusIcon;

impl StatusIcon {
    /// Operator reports green health
    pub const SUCCESS: &'static str = "✓";

    /// Operator reports yellow health
    pub const WARNING: &'static str = "⚠";

    /// Operator reports red health
    pub const ERROR: &'static str = "✗";

    /// No status reported yet
    pub const PENDING: &'static str = "⏳";

    /// Unrecognized status
    pub const UNKNOWN: &'static str = "?";

    /// Get status icon for an operator health value
    pub fn get_health_icon(health: &str) -> &'static str {
        match health.to_ascii_lowercase().as_str() {
            "green" => Self::SUCCESS,
            "yellow" => Self::WARNING,
            "red" => Self::ERROR,
            "" | "unknown" => Self::PENDING,
            _ => Self::UNKNOWN,
        }
    }

    /// Human-readable text for an operator health value
    pub fn get_health_text(health: &str) -> &'static str {
        match health.to_ascii_lowercase().as_str() {
            "green" => "Healthy",
            "yellow" => "Degraded",
            "red" => "Unhealthy",
            "" | "unknown" => "Pending",
            _ => "Unknown",
        }
    }
}
