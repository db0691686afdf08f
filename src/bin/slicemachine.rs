// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use slicemachine::{
    custom_type::{
        field::{Field, NestableWidget},
        CustomType,
    },
    CustomTypeFormat, ModelStatus, Project, ProjectConfig,
};

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use std::{env::current_dir, path::PathBuf, process::exit};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "slicemachine [options] <slicemachine-command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path inside project to use instead of the current directory.
    #[arg(long, global = true, value_name = "path")]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let start = match self.project {
            Some(path) => path,
            None => current_dir()?,
        };

        match self.command {
            Command::Init(opts) => run_init(start, opts),
            Command::Status(opts) => run_status(&Project::discover(start)?, opts),
            Command::CustomType(opts) => run_custom_type(&Project::discover(start)?, opts.command),
            Command::Section(opts) => run_section(&Project::discover(start)?, opts.command),
            Command::SliceZone(opts) => run_slice_zone(&Project::discover(start)?, opts.command),
            Command::Field(opts) => run_field(&Project::discover(start)?, opts.command),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Initialize new project.
    #[command(override_usage = "slicemachine init [options] <repository_name>")]
    Init(InitOptions),

    /// Show sync status of local models.
    #[command(override_usage = "slicemachine status [options]")]
    Status(StatusOptions),

    /// Create, delete, or convert custom types.
    #[command(subcommand_help_heading = "Commands")]
    CustomType(CustomTypeOptions),

    /// Add, remove, or rename sections of a custom type.
    #[command(subcommand_help_heading = "Commands")]
    Section(SectionOptions),

    /// Manage slice zone of a section.
    #[command(subcommand_help_heading = "Commands")]
    SliceZone(SliceZoneOptions),

    /// Manage fields of a section, or sub-fields of a group.
    #[command(subcommand_help_heading = "Commands")]
    Field(FieldOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct InitOptions {
    /// Name of remote repository to sync models to.
    #[arg(value_name = "repository_name")]
    pub repository_name: String,

    /// Slice library directory, may be given more than once.
    #[arg(short, long = "library", value_name = "path")]
    pub libraries: Vec<PathBuf>,

    /// Directory to keep custom types in.
    #[arg(short, long, value_name = "path")]
    pub custom_types_dir: Option<PathBuf>,

    /// Directory to read remote model snapshots from.
    #[arg(short, long, value_name = "path")]
    pub remote_dir: Option<PathBuf>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct StatusOptions {
    /// List only slices.
    #[arg(group = "target", short, long)]
    pub slices: bool,

    /// List only custom types.
    #[arg(group = "target", short, long)]
    pub custom_types: bool,
}

#[derive(Args, Clone, Debug)]
struct CustomTypeOptions {
    #[command(subcommand)]
    pub command: CustomTypeCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum CustomTypeCommand {
    /// Create new custom type.
    Create {
        /// Identifier of custom type.
        #[arg(value_name = "custom_type")]
        id: String,

        /// Display name, defaults to the identifier.
        #[arg(short, long, value_name = "label")]
        label: Option<String>,

        /// Allow only one document of this type.
        #[arg(short, long)]
        single: bool,

        /// Create a page type instead of a custom type.
        #[arg(short, long)]
        page: bool,
    },

    /// Delete custom type.
    Delete {
        #[arg(value_name = "custom_type")]
        id: String,
    },

    /// Convert custom type into a page type.
    Convert {
        #[arg(value_name = "custom_type")]
        id: String,
    },
}

#[derive(Args, Clone, Debug)]
struct SectionOptions {
    #[command(subcommand)]
    pub command: SectionCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum SectionCommand {
    /// Append new empty section.
    Add {
        #[arg(value_name = "custom_type")]
        id: String,

        #[arg(value_name = "section")]
        section: String,
    },

    /// Remove section with all of its fields.
    Remove {
        #[arg(value_name = "custom_type")]
        id: String,

        #[arg(value_name = "section")]
        section: String,
    },

    /// Rename section in place.
    Rename {
        #[arg(value_name = "custom_type")]
        id: String,

        #[arg(value_name = "section")]
        section: String,

        #[arg(value_name = "new_section")]
        new_section: String,
    },
}

#[derive(Args, Clone, Debug)]
struct SliceZoneOptions {
    #[command(subcommand)]
    pub command: SliceZoneCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum SliceZoneCommand {
    /// Create slice zone at the end of a section.
    Add {
        #[arg(value_name = "custom_type")]
        id: String,

        #[arg(value_name = "section")]
        section: String,
    },

    /// Remove slice zone of a section.
    Remove {
        #[arg(value_name = "custom_type")]
        id: String,

        #[arg(value_name = "section")]
        section: String,
    },

    /// Make slice selectable in slice zone of a section.
    AddSlice {
        #[arg(value_name = "custom_type")]
        id: String,

        #[arg(value_name = "section")]
        section: String,

        #[arg(value_name = "slice")]
        slice: String,
    },

    /// Remove slice from slice zone of a section.
    RemoveSlice {
        #[arg(value_name = "custom_type")]
        id: String,

        #[arg(value_name = "section")]
        section: String,

        #[arg(value_name = "slice")]
        slice: String,
    },
}

#[derive(Args, Clone, Debug)]
struct FieldOptions {
    #[command(subcommand)]
    pub command: FieldCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum FieldCommand {
    /// Add field, or overwrite existing field with the same key.
    Add {
        #[command(flatten)]
        target: FieldTarget,

        #[arg(value_name = "field")]
        field: String,

        /// Field definition as JSON.
        #[arg(short, long, value_name = "json")]
        json: String,
    },

    /// Remove field.
    Remove {
        #[command(flatten)]
        target: FieldTarget,

        #[arg(value_name = "field")]
        field: String,
    },

    /// Rename field in place, optionally replacing its definition.
    Rename {
        #[command(flatten)]
        target: FieldTarget,

        #[arg(value_name = "field")]
        field: String,

        #[arg(value_name = "new_field")]
        new_field: String,

        /// New field definition as JSON.
        #[arg(short, long, value_name = "json")]
        json: Option<String>,
    },

    /// Move field to a new position, counted without the slice zone.
    Move {
        #[command(flatten)]
        target: FieldTarget,

        #[arg(value_name = "source_index")]
        source_index: usize,

        #[arg(value_name = "destination_index")]
        destination_index: usize,
    },
}

#[derive(Args, Clone, Debug)]
struct FieldTarget {
    #[arg(value_name = "custom_type")]
    pub id: String,

    #[arg(value_name = "section")]
    pub section: String,

    /// Target sub-fields of this group field instead of the section.
    #[arg(short, long, value_name = "group")]
    pub group: Option<String>,
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn run_init(root: PathBuf, opts: InitOptions) -> Result<()> {
    let mut config = ProjectConfig::new(opts.repository_name);
    if !opts.libraries.is_empty() {
        config.libraries = opts.libraries;
    }
    if let Some(path) = opts.custom_types_dir {
        config.custom_types_dir = path;
    }
    if let Some(path) = opts.remote_dir {
        config.remote_dir = path;
    }

    Project::init(root, config)?;

    Ok(())
}

fn run_status(project: &Project, opts: StatusOptions) -> Result<()> {
    if !opts.custom_types {
        report_statuses("slice", project.slice_statuses()?);
    }
    if !opts.slices {
        report_statuses("custom type", project.custom_type_statuses()?);
    }

    Ok(())
}

fn report_statuses(kind: &str, statuses: Vec<(String, ModelStatus)>) {
    if statuses.is_empty() {
        warn!("no {kind} models found");
        return;
    }

    for (id, status) in statuses {
        info!("{kind} {id}: {status}");
    }
}

fn run_custom_type(project: &Project, command: CustomTypeCommand) -> Result<()> {
    match command {
        CustomTypeCommand::Create {
            id,
            label,
            single,
            page,
        } => {
            let label = label.unwrap_or_else(|| id.clone());
            let format = if page {
                CustomTypeFormat::Page
            } else {
                CustomTypeFormat::Custom
            };
            project.create_custom_type(&CustomType::new(id, label, !single, format))?;
        }
        CustomTypeCommand::Delete { id } => project.delete_custom_type(&id)?,
        CustomTypeCommand::Convert { id } => {
            project.edit_custom_type(&id, CustomType::convert_to_page_type)?;
        }
    }

    Ok(())
}

fn run_section(project: &Project, command: SectionCommand) -> Result<()> {
    match command {
        SectionCommand::Add { id, section } => {
            project.edit_custom_type(&id, |ct| ct.create_section(&section))?;
        }
        SectionCommand::Remove { id, section } => {
            project.edit_custom_type(&id, |ct| ct.delete_section(&section))?;
        }
        SectionCommand::Rename {
            id,
            section,
            new_section,
        } => {
            project.edit_custom_type(&id, |ct| ct.rename_section(&section, &new_section))?;
        }
    }

    Ok(())
}

fn run_slice_zone(project: &Project, command: SliceZoneCommand) -> Result<()> {
    match command {
        SliceZoneCommand::Add { id, section } => {
            project.edit_custom_type(&id, |ct| ct.create_section_slice_zone(&section))?;
        }
        SliceZoneCommand::Remove { id, section } => {
            project.edit_custom_type(&id, |ct| ct.delete_section_slice_zone(&section))?;
        }
        SliceZoneCommand::AddSlice { id, section, slice } => {
            let current = project.read_custom_type(&id)?;
            let Some((_, zone)) = current.section_slice_zone_entry(&section) else {
                bail!("section {section:?} of {id:?} has no slice zone");
            };
            if zone.has_choice(&slice) {
                warn!("slice {slice:?} is already a choice of section {section:?}");
                return Ok(());
            }

            project.edit_custom_type(&id, |ct| ct.add_slice_zone_slice(&section, &slice))?;
        }
        SliceZoneCommand::RemoveSlice { id, section, slice } => {
            project.edit_custom_type(&id, |ct| ct.delete_slice_zone_slice(&section, &slice))?;
        }
    }

    Ok(())
}

fn run_field(project: &Project, command: FieldCommand) -> Result<()> {
    match command {
        FieldCommand::Add {
            target,
            field,
            json,
        } => match target.group {
            Some(group) => {
                let widget: NestableWidget = serde_json::from_str(&json)?;
                project.edit_custom_type(&target.id, |ct| {
                    ct.add_group_field(&target.section, &group, &field, widget)
                })?;
            }
            None => {
                let definition = parse_field(&json)?;
                project.edit_custom_type(&target.id, |ct| {
                    ct.add_field(&target.section, &field, definition)
                })?;
            }
        },
        FieldCommand::Remove { target, field } => match target.group {
            Some(group) => {
                project.edit_custom_type(&target.id, |ct| {
                    ct.delete_group_field(&target.section, &group, &field)
                })?;
            }
            None => {
                project.edit_custom_type(&target.id, |ct| ct.delete_field(&target.section, &field))?;
            }
        },
        FieldCommand::Rename {
            target,
            field,
            new_field,
            json,
        } => {
            let current = project.read_custom_type(&target.id)?;
            match target.group {
                Some(group) => {
                    let widget = match json {
                        Some(json) => serde_json::from_str(&json)?,
                        None => current
                            .group_field(&target.section, &group)
                            .and_then(|group| group.fields()?.get(&field).cloned())
                            .ok_or_else(|| anyhow!("no sub-field {field:?} in group {group:?}"))?,
                    };
                    project.edit_custom_type(&target.id, |ct| {
                        ct.update_group_field(&target.section, &group, &field, &new_field, widget)
                    })?;
                }
                None => {
                    let definition = match json {
                        Some(json) => parse_field(&json)?,
                        None => current
                            .section(&target.section)
                            .and_then(|section| section.get(&field).cloned())
                            .ok_or_else(|| {
                                anyhow!("no field {field:?} in section {:?}", target.section)
                            })?,
                    };
                    if definition.is_slice_zone() {
                        bail!("slice zones cannot be renamed");
                    }
                    project.edit_custom_type(&target.id, |ct| {
                        ct.update_field(&target.section, &field, &new_field, definition)
                    })?;
                }
            }
        }
        FieldCommand::Move {
            target,
            source_index,
            destination_index,
        } => match target.group {
            Some(group) => {
                project.edit_custom_type(&target.id, |ct| {
                    ct.reorder_group_field(&target.section, &group, source_index, destination_index)
                })?;
            }
            None => {
                project.edit_custom_type(&target.id, |ct| {
                    ct.reorder_field(&target.section, source_index, destination_index)
                })?;
            }
        },
    }

    Ok(())
}

fn parse_field(json: &str) -> Result<Field> {
    let field: Field = serde_json::from_str(json)?;
    if field.is_slice_zone() {
        bail!("use `slicemachine slice-zone add` to create slice zones");
    }

    Ok(field)
}
