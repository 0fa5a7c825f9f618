//! Registry listings: keys, scenes, domains and priority changes.

use super::{format_section_heading, to_json};
use crate::error::ApiError;
use crate::host::Host;
use crate::setting::{KeyShape, SettingKeyRegistry};
use crate::system::{HostSystem, PriorityShift};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

fn key_flags(key: &crate::setting::SettingKey) -> String {
    let mut flags = Vec::new();
    if key.is_global() {
        flags.push("global");
    }
    if key.is_player_restrictive() {
        flags.push("restrictive");
    }
    if !key.is_functional() {
        flags.push("inactive");
    }
    flags.join(", ")
}

pub fn format_keys_text(keys: &SettingKeyRegistry) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Key", "Type", "Category", "Default", "Flags"]);
    for key in keys.iter() {
        let kind = match key.shape() {
            KeyShape::Unary => key.codec().type_name().to_string(),
            KeyShape::Poly => "set".to_string(),
        };
        table.add_row(vec![
            key.id().to_string(),
            kind,
            key.category().to_string(),
            key.print_datum(&key.default_datum()),
            key_flags(key),
        ]);
    }
    format!("{}\n\n{}", format_section_heading("Setting keys"), table)
}

pub fn format_keys_json(keys: &SettingKeyRegistry) -> Result<String, ApiError> {
    let rows: Vec<serde_json::Value> = keys
        .iter()
        .map(|key| {
            json!({
                "id": key.id(),
                "shape": key.shape().to_string(),
                "type": key.codec().type_name(),
                "category": key.category(),
                "default": key.print_datum(&key.default_datum()),
                "global": key.is_global(),
                "player_restrictive": key.is_player_restrictive(),
                "functional": key.is_functional(),
                "description": key.description(),
            })
        })
        .collect();
    to_json(&serde_json::Value::Array(rows))
}

pub fn format_scenes_text(system: &HostSystem) -> String {
    let scenes = system.scenes();
    if scenes.is_empty() {
        return "No scenes defined".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Scene", "Priority", "Volumes", "Settings", "Updated"]);
    for scene in scenes {
        let volumes: Vec<String> = scene
            .volumes()
            .iter()
            .filter_map(|id| system.volume(*id).ok())
            .map(|v| format!("{} {}: {}", v.id, v.domain, v.shape))
            .collect();
        let settings: Vec<String> = scene
            .settings()
            .iter()
            .filter_map(|(id, assignment)| {
                let key = system.keys().get(id).ok()?;
                let value = assignment
                    .value
                    .as_ref()
                    .map_or_else(|| "(target only)".to_string(), |v| key.print_value(v));
                Some(format!("{} = {}", id, value))
            })
            .collect();
        table.add_row(vec![
            scene.name().to_string(),
            scene.priority().to_string(),
            volumes.join("\n"),
            settings.join("\n"),
            scene.updated_at().format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    format!("{}\n\n{}", format_section_heading("Scenes"), table)
}

pub fn format_scenes_json(system: &HostSystem) -> Result<String, ApiError> {
    let rows: Vec<serde_json::Value> = system
        .scenes()
        .into_iter()
        .map(|scene| {
            let volumes: Vec<serde_json::Value> = scene
                .volumes()
                .iter()
                .filter_map(|id| system.volume(*id).ok())
                .map(|v| {
                    json!({
                        "id": v.id.0,
                        "domain": v.domain,
                        "zone_type": v.zone_type(),
                        "shape": v.shape,
                    })
                })
                .collect();
            let settings: serde_json::Map<String, serde_json::Value> = scene
                .settings()
                .iter()
                .filter_map(|(id, assignment)| {
                    let key = system.keys().get(id).ok()?;
                    Some((
                        id.clone(),
                        json!({
                            "value": assignment.value.as_ref().map(|v| key.print_value(v)),
                            "target": assignment.target,
                        }),
                    ))
                })
                .collect();
            json!({
                "name": scene.name(),
                "priority": scene.priority(),
                "volumes": volumes,
                "settings": settings,
                "created_at": scene.created_at().to_rfc3339(),
                "updated_at": scene.updated_at().to_rfc3339(),
            })
        })
        .collect();
    to_json(&serde_json::Value::Array(rows))
}

pub fn format_domains(system: &HostSystem) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Domains"));
    let mut any = false;
    for domain in system.domains() {
        any = true;
        out.push_str(&format!(
            "  {} ({} volumes)\n",
            domain.name(),
            domain.volumes().len()
        ));
    }
    if !any {
        out.push_str("  (none)\n");
    }
    out
}

pub fn format_priority_shift(scene: &str, priority: i32, shift: &PriorityShift) -> String {
    let mut out = format!("Scene {} now has priority {}", scene, priority);
    if shift.success_count > 1 {
        out.push_str(&format!(
            "\n  Moved {} overlapping scene(s) up",
            shift.success_count - 1
        ));
    }
    if !shift.is_complete() {
        out.push_str(&format!(
            "\n  {}",
            format!(
                "{} overlapping scene(s) could not be moved",
                shift.fail_count
            )
            .yellow()
        ));
    }
    out
}
