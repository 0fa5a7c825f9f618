//! Resolution results and host lists at a point.

use super::{format_section_heading, to_json};
use crate::error::ApiError;
use crate::evaluate::Evaluation;
use crate::host::Host;
use crate::setting::SettingKey;
use crate::types::{ActorId, Point};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde_json::json;

fn actor_label(actor: Option<&ActorId>) -> String {
    actor.map_or_else(|| "<anonymous>".to_string(), |a| a.to_string())
}

pub fn format_resolution_text(
    key: &SettingKey,
    point: &Point,
    actor: Option<&ActorId>,
    evaluation: &Evaluation,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("{} at {}", key.id(), point))
    ));
    out.push_str(&format!("  Actor: {}\n", actor_label(actor)));
    out.push_str(&format!("  Value: {}", key.print_datum(&evaluation.value)));
    if evaluation.is_default() {
        out.push_str(" (default)");
    }
    out.push('\n');

    if !evaluation.trace.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Host", "Value"]);
        for entry in &evaluation.trace {
            table.add_row(vec![entry.host.clone(), key.print_datum(&entry.value)]);
        }
        out.push_str(&format!("\n{}\n", table));
    }

    let redundant = evaluation.redundant_hosts();
    if !redundant.is_empty() {
        out.push_str(&format!("\n  Redundant: {}\n", redundant.join(", ")));
    }
    out
}

pub fn format_resolution_json(
    key: &SettingKey,
    point: &Point,
    actor: Option<&ActorId>,
    evaluation: &Evaluation,
) -> Result<String, ApiError> {
    let trace: Vec<serde_json::Value> = evaluation
        .trace
        .iter()
        .map(|entry| {
            json!({
                "host": entry.host,
                "value": key.print_datum(&entry.value),
            })
        })
        .collect();
    to_json(&json!({
        "key": key.id(),
        "point": point,
        "actor": actor.map(|a| a.as_str()),
        "value": key.print_datum(&evaluation.value),
        "default": evaluation.is_default(),
        "trace": trace,
        "redundant": evaluation.redundant_hosts(),
    }))
}

pub fn format_hosts_text(point: &Point, hosts: &[&dyn Host]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Host", "Priority", "Assignments"]);
    for host in hosts {
        let priority = if host.is_global() {
            "-".to_string()
        } else {
            host.priority().to_string()
        };
        table.add_row(vec![
            host.name().to_string(),
            priority,
            host.settings().len().to_string(),
        ]);
    }
    format!(
        "{}\n\n{}",
        format_section_heading(&format!("Hosts at {}", point)),
        table
    )
}

pub fn format_hosts_json(hosts: &[&dyn Host]) -> Result<String, ApiError> {
    let rows: Vec<serde_json::Value> = hosts
        .iter()
        .map(|host| {
            json!({
                "name": host.name(),
                "priority": host.priority(),
                "global": host.is_global(),
                "assignments": host.settings().len(),
            })
        })
        .collect();
    to_json(&serde_json::Value::Array(rows))
}
