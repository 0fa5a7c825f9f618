//! CLI route: single route table and run context. Dispatches to the warden service and presentation.

use crate::cli::parse::{Commands, DomainCommands, SceneCommands, ZoneCommands};
use crate::cli::presentation::{
    format_domains, format_hosts_json, format_hosts_text, format_keys_json, format_keys_text,
    format_priority_shift, format_resolution_json, format_resolution_text, format_scenes_json,
    format_scenes_text,
};
use crate::config::{ConfigLoader, WardenConfig};
use crate::context::NoCapabilities;
use crate::error::{ApiError, StorageError};
use crate::geometry::Shape;
use crate::service::Warden;
use crate::setting::{catalog, PolyEdit};
use crate::types::{ActorId, Point, VolumeId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Runtime context for CLI execution: workspace, config path, and the loaded service.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    warden: Warden,
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        resolve_store_path(&mut config, &workspace_root)?;

        let warden = Warden::open(&config, catalog::standard()?, Arc::new(NoCapabilities))?;
        debug!(
            workspace = %workspace_root.display(),
            store = %config.storage.path.display(),
            "Run context ready"
        );

        Ok(Self {
            warden,
            workspace_root,
            config_path,
        })
    }

    pub fn warden(&self) -> &Warden {
        &self.warden
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        debug!(command = command_name(command), "Executing command");
        match command {
            Commands::Resolve {
                key,
                domain,
                x,
                y,
                z,
                actor,
                format,
            } => {
                let json = wants_json(format)?;
                let point = Point::new(domain.clone(), *x, *y, *z);
                let actor = actor.as_deref().map(ActorId::from);
                self.warden.read(|sys| {
                    let evaluation = sys.resolve(key, actor.as_ref(), &point)?;
                    let setting = sys.keys().get(key)?;
                    if json {
                        format_resolution_json(setting, &point, actor.as_ref(), &evaluation)
                    } else {
                        Ok(format_resolution_text(
                            setting,
                            &point,
                            actor.as_ref(),
                            &evaluation,
                        ))
                    }
                })
            }
            Commands::Hosts {
                domain,
                x,
                y,
                z,
                format,
            } => {
                let json = wants_json(format)?;
                let point = Point::new(domain.clone(), *x, *y, *z);
                self.warden.read(|sys| {
                    let hosts = sys.find_containing_hosts(&point)?;
                    if json {
                        format_hosts_json(&hosts)
                    } else {
                        Ok(format_hosts_text(&point, &hosts))
                    }
                })
            }
            Commands::Keys { format } => {
                let json = wants_json(format)?;
                self.warden.read(|sys| {
                    if json {
                        format_keys_json(sys.keys())
                    } else {
                        Ok(format_keys_text(sys.keys()))
                    }
                })
            }
            Commands::Scenes { format } => {
                let json = wants_json(format)?;
                self.warden.read(|sys| {
                    if json {
                        format_scenes_json(sys)
                    } else {
                        Ok(format_scenes_text(sys))
                    }
                })
            }
            Commands::Domain { command } => self.handle_domain_command(command),
            Commands::Scene { command } => self.handle_scene_command(command),
            Commands::Zone { command } => self.handle_zone_command(command),
            Commands::Set {
                host,
                key,
                value,
                add,
                remove,
            } => {
                let edit = if *add {
                    PolyEdit::Add
                } else if *remove {
                    PolyEdit::Subtract
                } else {
                    PolyEdit::Declare
                };
                let message = self.warden.write(|sys| {
                    let setting = Arc::clone(sys.keys().get(key)?);
                    let parsed = setting.parse_value(value, edit)?;
                    let printed = setting.print_value(&parsed);
                    sys.set_value(host, key, parsed)?;
                    Ok::<_, ApiError>(format!("Set {} on {} to {}", setting.id(), host, printed))
                })?;
                self.warden.save()?;
                Ok(message)
            }
            Commands::Unset { host, key } => {
                let previous = self.warden.write(|sys| sys.unset_value(host, key))?;
                if previous.is_none() {
                    return Ok(format!("{} has no value for {}", host, key));
                }
                self.warden.save()?;
                Ok(format!("Removed {} from {}", key, host))
            }
        }
    }

    fn handle_domain_command(&self, command: &DomainCommands) -> Result<String, ApiError> {
        match command {
            DomainCommands::Add { name } => {
                let added = self.warden.write(|sys| sys.register_domain(name))?;
                if !added {
                    return Ok(format!("Domain {} is already registered", name));
                }
                self.warden.save()?;
                Ok(format!("Registered domain {}", name))
            }
            DomainCommands::List => Ok(self.warden.read(format_domains)),
        }
    }

    fn handle_scene_command(&self, command: &SceneCommands) -> Result<String, ApiError> {
        match command {
            SceneCommands::Create { name, priority } => {
                self.warden.write(|sys| sys.create_scene(name, *priority))?;
                self.warden.save()?;
                Ok(format!("Created scene {} with priority {}", name, priority))
            }
            SceneCommands::Destroy { name } => {
                let scene = self.warden.destroy_scene(name)?;
                self.warden.save()?;
                Ok(format!(
                    "Destroyed scene {} and {} volume(s)",
                    scene.name,
                    scene.volumes().len()
                ))
            }
            SceneCommands::Rename { old, new } => {
                self.warden.write(|sys| sys.rename_scene(old, new))?;
                self.warden.save()?;
                Ok(format!("Renamed scene {} to {}", old, new))
            }
            SceneCommands::Priority { name, priority } => {
                let shift = self.warden.set_priority(name, *priority)?;
                self.warden.save()?;
                Ok(format_priority_shift(name, *priority, &shift))
            }
        }
    }

    fn handle_zone_command(&self, command: &ZoneCommands) -> Result<String, ApiError> {
        let (scene, domain, shape) = match command {
            ZoneCommands::Remove { id } => {
                let volume = self.warden.write(|sys| sys.remove_volume(VolumeId(*id)))?;
                self.warden.save()?;
                return Ok(format!("Removed volume {} ({})", volume.id, volume.shape));
            }
            ZoneCommands::AddBox {
                scene,
                domain,
                x1,
                y1,
                z1,
                x2,
                y2,
                z2,
            } => (scene, domain, Shape::cuboid(*x1, *y1, *z1, *x2, *y2, *z2)?),
            ZoneCommands::AddCylinder {
                scene,
                domain,
                x,
                y,
                z,
                radius,
                height,
            } => (scene, domain, Shape::cylinder(*x, *y, *z, *radius, *height)?),
            ZoneCommands::AddSlab {
                scene,
                domain,
                y,
                height,
            } => (scene, domain, Shape::slab(*y, *height)?),
            ZoneCommands::AddSphere {
                scene,
                domain,
                x,
                y,
                z,
                radius,
            } => (scene, domain, Shape::sphere(*x, *y, *z, *radius)?),
        };

        let description = shape.to_string();
        let id = self
            .warden
            .write(|sys| sys.add_volume(scene, domain, shape))?;
        self.warden.save()?;
        Ok(format!("Added volume {} to {}: {}", id, scene, description))
    }
}

/// Anchor a relative store path at the workspace root and make sure its
/// parent directory exists.
fn resolve_store_path(config: &mut WardenConfig, workspace_root: &Path) -> Result<(), ApiError> {
    if config.storage.path.is_relative() {
        config.storage.path = workspace_root.join(&config.storage.path);
    }
    if let Some(parent) = config.storage.path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
    }
    Ok(())
}

fn wants_json(format: &str) -> Result<bool, ApiError> {
    match format {
        "json" => Ok(true),
        "text" => Ok(false),
        other => Err(ApiError::InvalidArgument(format!(
            "Unknown output format '{}' (expected 'text' or 'json')",
            other
        ))),
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Resolve { .. } => "resolve",
        Commands::Hosts { .. } => "hosts",
        Commands::Keys { .. } => "keys",
        Commands::Scenes { .. } => "scenes",
        Commands::Domain { .. } => "domain",
        Commands::Scene { .. } => "scene",
        Commands::Zone { .. } => "zone",
        Commands::Set { .. } => "set",
        Commands::Unset { .. } => "unset",
    }
}
