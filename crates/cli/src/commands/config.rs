//! Configuration inspection and editing commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chutils_config::{ConfigContext, ConfigFormat, Value, persistence, scalar_to_string};
use clap::Subcommand;
use serde::Serialize;

use crate::error::CommandError;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the project root and the config files in use
    Path {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the merged configuration
    Show {
        /// Only print this section
        #[arg(short, long)]
        section: Option<String>,

        /// Print as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Print one value from the merged configuration
    Get {
        /// Section name
        section: String,

        /// Key name (dotted paths address nested YAML mappings)
        key: String,

        /// Printed when the key does not exist
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Write one value into the primary config file, keeping its layout
    Set {
        /// Section name
        section: String,

        /// Key name
        key: String,

        /// New value (numbers and booleans keep their type in YAML files)
        value: String,

        /// File to edit instead of the discovered primary config
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct PathReport {
    root: PathBuf,
    primary: Option<PathBuf>,
    local: Option<PathBuf>,
    format: Option<String>,
}

pub fn run(command: ConfigCommand, ctx: &ConfigContext) -> Result<()> {
    match command {
        ConfigCommand::Path { json } => run_path(ctx, json),
        ConfigCommand::Show { section, json } => run_show(ctx, section.as_deref(), json),
        ConfigCommand::Get {
            section,
            key,
            default,
        } => run_get(ctx, &section, &key, default),
        ConfigCommand::Set {
            section,
            key,
            value,
            file,
        } => run_set(ctx, &section, &key, &value, file.as_deref()),
    }
}

fn run_path(ctx: &ConfigContext, json: bool) -> Result<()> {
    let paths = ctx.config_paths();
    let report = PathReport {
        root: ctx.project_root(),
        format: paths.format().map(|f| f.to_string()),
        primary: paths.primary,
        local: paths.local,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let show = |p: &Option<PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };
    println!("root:    {}", report.root.display());
    println!("primary: {}", show(&report.primary));
    println!("local:   {}", show(&report.local));
    println!(
        "format:  {}",
        report.format.as_deref().unwrap_or("(none)")
    );
    Ok(())
}

fn run_show(ctx: &ConfigContext, section: Option<&str>, json: bool) -> Result<()> {
    let config = ctx.get_config();
    let text = match section {
        Some(name) => {
            let data = config
                .section(name)
                .cloned()
                .ok_or_else(|| CommandError::NotFound(format!("Section '{name}' not found")))?;
            render_document(&Value::Mapping(data), json)?
        }
        None if json => render_document(&Value::Mapping(config.as_mapping().clone()), true)?,
        None => config.to_yaml_string()?,
    };
    print!("{text}");
    Ok(())
}

fn run_get(ctx: &ConfigContext, section: &str, key: &str, default: Option<String>) -> Result<()> {
    let config = ctx.get_config();
    match (config.value(section, key), default) {
        (Some(value), _) => print!("{}", render_value(value)?),
        (None, Some(default)) => println!("{default}"),
        (None, None) => {
            return Err(CommandError::NotFound(format!(
                "Key '{key}' not found in section '{section}'"
            ))
            .into());
        }
    }
    Ok(())
}

fn run_set(
    ctx: &ConfigContext,
    section: &str,
    key: &str,
    raw: &str,
    file: Option<&Path>,
) -> Result<()> {
    let target = match file {
        Some(path) => path.to_path_buf(),
        None => ctx.config_paths().primary.ok_or_else(|| {
            CommandError::NotFound("No config file found; pass --file to choose one".into())
        })?,
    };

    let value = parse_value(raw, ConfigFormat::from_path(&target));
    if !persistence::save_value(&target, section, key, &value) {
        return Err(CommandError::Failed(format!(
            "Failed to write {section}.{key} to {}",
            target.display()
        )))
        .context("config set");
    }
    println!("Saved {section}.{key} to {}", target.display());
    Ok(())
}

/// Interpret a command-line value for the target format.
///
/// YAML files get native booleans and numbers; everything else is a string.
fn parse_value(raw: &str, format: ConfigFormat) -> Value {
    if format == ConfigFormat::Yaml
        && let Ok(value @ (Value::Bool(_) | Value::Number(_))) = serde_yaml::from_str::<Value>(raw)
    {
        return value;
    }
    Value::String(raw.to_string())
}

/// Scalars print bare, sequences one item per line, mappings as YAML.
fn render_value(value: &Value) -> Result<String> {
    if let Some(scalar) = scalar_to_string(value) {
        return Ok(format!("{scalar}\n"));
    }
    match value {
        Value::Null => Ok("null\n".to_string()),
        Value::Sequence(items) => Ok(items
            .iter()
            .map(|item| {
                scalar_to_string(item).unwrap_or_else(|| {
                    serde_yaml::to_string(item)
                        .map(|s| s.trim_end().to_string())
                        .unwrap_or_default()
                })
            })
            .map(|line| format!("{line}\n"))
            .collect()),
        other => render_document(other, false),
    }
}

fn render_document(value: &Value, json: bool) -> Result<String> {
    if json {
        let mut text =
            serde_json::to_string_pretty(value).context("configuration is not representable as JSON")?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(serde_yaml::to_string(value)?)
    }
}
