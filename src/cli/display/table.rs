//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::cluster::InstanceStatus;
use chrono::{DateTime, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render a single instance as label/value rows
    pub fn render_instance_status(&self, status: &InstanceStatus) -> String {
        let managed = status.is_managed().to_string();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.add_row(vec![Cell::new("Astarte Instance Name"), Cell::new(&status.name)]);
        table.add_row(vec![
            Cell::new("Kubernetes Namespace"),
            Cell::new(&status.namespace),
        ]);
        table.add_row(vec![Cell::new("Astarte Version"), Cell::new(&status.version)]);
        table.add_row(vec![
            Cell::new("Operator Status"),
            Cell::new(&status.operator_status)
                .fg(self.theme.get_health_color(&status.operator_status)),
        ]);
        table.add_row(vec![
            Cell::new("Managed by astartectl"),
            Cell::new(&managed).fg(self.theme.get_managed_color(status.is_managed())),
        ]);
        table.add_row(vec![
            Cell::new("Deployment Profile"),
            Cell::new(&status.deployment_profile),
        ]);

        table.to_string()
    }

    /// Render instances as a list table
    pub fn render_instances_list(&self, instances: &[InstanceStatus]) -> String {
        self.render_instances_list_at(instances, Utc::now())
    }

    fn render_instances_list_at(&self, instances: &[InstanceStatus], now: DateTime<Utc>) -> String {
        if instances.is_empty() {
            return "No Managed Astarte installations found.".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("NAMESPACE").set_alignment(CellAlignment::Left),
                Cell::new("VERSION").set_alignment(CellAlignment::Left),
                Cell::new("HEALTH").set_alignment(CellAlignment::Center),
                Cell::new("PROFILE").set_alignment(CellAlignment::Left),
                Cell::new("AGE").set_alignment(CellAlignment::Right),
            ]);

        for instance in instances {
            let health = &instance.operator_status;
            let age = instance
                .created_at
                .as_deref()
                .and_then(|ts| format_age(ts, now))
                .unwrap_or_else(|| "-".to_string());

            table.add_row(vec![
                Cell::new(&instance.name),
                Cell::new(&instance.namespace),
                Cell::new(&instance.version),
                Cell::new(format!("{} {}", StatusIcon::get_health_icon(health), health))
                    .fg(self.theme.get_health_color(health)),
                Cell::new(&instance.deployment_profile)
                    .fg(self.theme.get_managed_color(instance.is_managed())),
                Cell::new(age).set_alignment(CellAlignment::Right),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Astarte Instances {} ─╮\n",
            format!("[{} instances]", instances.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} {}  {} {}  {} {}\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::get_health_text("green"),
            StatusIcon::WARNING.yellow(),
            StatusIcon::get_health_text("yellow"),
            StatusIcon::ERROR.red(),
            StatusIcon::get_health_text("red"),
        ));

        output
    }
}

/// Kubectl-style age of an RFC 3339 timestamp, e.g. `3d`, `5h`, `42s`.
fn format_age(timestamp: &str, now: DateTime<Utc>) -> Option<String> {
    let created = DateTime::parse_from_rfc3339(timestamp).ok()?;
    let seconds = (now - created.with_timezone(&Utc)).num_seconds().max(0);

    Some(match seconds {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m", s / 60),
        s if s < 86400 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86400),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(name: &str, manager: &str) -> InstanceStatus {
        InstanceStatus {
            name: name.to_string(),
            namespace: "astarte".to_string(),
            version: "1.0.0".to_string(),
            operator_status: "green".to_string(),
            deployment_manager: manager.to_string(),
            deployment_profile: "basic".to_string(),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn test_render_empty_instances() {
        let renderer = TableRenderer::new();
        let output = renderer.render_instances_list(&[]);
        assert!(output.contains("No Managed Astarte installations found."));
    }

    #[test]
    fn test_render_instance_list() {
        let renderer = TableRenderer::new();
        let now = DateTime::parse_from_rfc3339("2024-01-03T06:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let output = renderer.render_instances_list_at(&[instance("prod", "astartectl")], now);
        assert!(output.contains("prod"));
        assert!(output.contains("1.0.0"));
        assert!(output.contains("basic"));
        assert!(output.contains("2d"));
    }

    #[test]
    fn test_render_instance_status_rows() {
        let renderer = TableRenderer::new();
        let output = renderer.render_instance_status(&instance("prod", "astartectl"));
        let labels = [
            "Astarte Instance Name",
            "Kubernetes Namespace",
            "Astarte Version",
            "Operator Status",
            "Managed by astartectl",
            "Deployment Profile",
        ];
        let positions: Vec<usize> = labels
            .iter()
            .map(|label| output.find(label).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(output.contains("true"));

        let output = renderer.render_instance_status(&instance("prod", ""));
        assert!(output.contains("false"));
    }

    #[test]
    fn test_format_age() {
        let now = DateTime::parse_from_rfc3339("2024-01-01T01:00:30Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_age("2024-01-01T01:00:00Z", now).as_deref(), Some("30s"));
        assert_eq!(format_age("2024-01-01T00:30:00Z", now).as_deref(), Some("30m"));
        assert_eq!(format_age("2023-12-31T00:00:00Z", now).as_deref(), Some("1d"));
        assert_eq!(format_age("not a timestamp", now), None);
    }
}
