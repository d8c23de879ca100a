//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{AsyncResult, GenericResponse, RedeployResponse, Stack};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Stack {
    fn pretty_print(&self) -> String {
        let header = format!("Stack: {}", self.name);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![
            header,
            divider,
            format!("UID:            {}", self.uid),
            format!("Environment:    {}", self.environment),
            format!("Status:         {}", self.status()),
            format!("Health:         {}", self.health()),
        ];

        if !self.git.is_empty() {
            lines.push(format!("Git:            {} ({})", self.git, self.git_branch));
        }

        if !self.fqdn.is_empty() {
            lines.push(format!("FQDN:           {}", self.fqdn));
        }

        if !self.cloud.is_empty() {
            lines.push(format!("Cloud:          {}", self.cloud));
        }

        if let Some(ref last) = self.last_activity {
            lines.push(format!("Last Activity:  {}", last.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        if self.maintenance_mode {
            lines.push("Maintenance:    on".to_string());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for AsyncResult {
    fn pretty_print(&self) -> String {
        let header = format!("Action #{}", self.id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider, format!("Action:         {}", self.action)];

        match (self.finished_at, self.finished_success) {
            (Some(finished), success) => {
                let outcome = if success.unwrap_or(false) { "succeeded" } else { "failed" };
                lines.push(format!(
                    "Finished:       {} ({})",
                    finished.format("%Y-%m-%d %H:%M:%S UTC"),
                    outcome
                ));
            }
            (None, _) => lines.push("Finished:       still running".to_string()),
        }

        if !self.finished_message.is_empty() {
            lines.push(format!("Message:        {}", self.finished_message));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for GenericResponse {
    fn pretty_print(&self) -> String {
        let outcome = if self.ok { "OK" } else { "FAILED" };
        if self.message.is_empty() {
            outcome.to_string()
        } else {
            format!("{outcome}: {}", self.message)
        }
    }
}

impl PrettyPrint for RedeployResponse {
    fn pretty_print(&self) -> String {
        let mut lines = vec![format!("Message:        {}", self.message)];
        if self.queued {
            lines.push("Queued:         yes".to_string());
        }
        if let Some(id) = self.async_action_id {
            lines.push(format!("Action:         #{id}"));
        }
        lines.join("\n")
    }
}
