// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Project model store management and manipulation.
//!
//! A __project__ groups all local models together in one place: the custom
//! types it defines, and the slice libraries it uses. The project store reads
//! and writes those models, and pairs each of them with its remote counterpart
//! to work out its sync status.
//!
//! # Project Layout
//!
//! The top-level of a project always contains a `slicemachine.toml`
//! configuration file. Everything else is placed where that file says:
//!
//! ```text
//! slicemachine.toml
//! customtypes/<id>/index.json
//! slices/<SliceDir>/model.json
//! slices/<SliceDir>/screenshot-<variation>.png
//! .slicemachine/remote/customtypes/<id>.json
//! .slicemachine/remote/slices/<id>.json
//! ```
//!
//! Model files are plain JSON, written with the exact field order of the
//! in-memory model so that editing a model never reorders anything the user
//! did not ask to reorder.
//!
//! # Remote Snapshots
//!
//! The store does not talk to the remote repository. Instead it reads a
//! snapshot of the remote models from the remote directory. A model without a
//! remote snapshot is considered new.

use crate::{
    config::{ConfigError, ProjectConfig, CONFIG_FILE_NAME},
    custom_type::CustomType,
    path::{self, custom_type_index, find_project_root, slice_model, variation_screenshot},
    slice::{Screenshot, SliceModel},
    status::{FrontEndCustomTypeModel, FrontEndSliceModel, ModelStatus},
};

use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::{
    collections::HashMap,
    ffi::OsStr,
    fs::{read, read_to_string, remove_dir_all, write},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

/// Local slice model together with the directory it was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSlice {
    pub dir: PathBuf,
    pub model: SliceModel,
}

/// Project model store.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Initialize new project.
    ///
    /// Writes the project configuration file to `root`, and creates the custom
    /// types directory and every slice library directory.
    ///
    /// # Errors
    ///
    /// - Return [`Error::ProjectExists`] if `root` already holds a project.
    /// - Return [`Error::WriteFile`] if configuration cannot be written.
    /// - Return [`Error::CreateDir`] if directories cannot be created.
    #[instrument(skip(root, config), level = "debug")]
    pub fn init(root: impl Into<PathBuf>, config: ProjectConfig) -> Result<Self> {
        let root = root.into();
        let config_path = root.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Err(Error::ProjectExists { path: config_path });
        }

        info!("initialize new project: {:?}", root.display());
        let project = Self { root, config };
        create_dir(&project.root)?;
        write(&config_path, project.config.to_string()).map_err(|err| Error::WriteFile {
            source: err,
            path: config_path.clone(),
        })?;

        create_dir(project.custom_types_dir())?;
        for library in project.libraries() {
            create_dir(library)?;
        }

        Ok(project)
    }

    /// Open existing project at `root`.
    ///
    /// # Errors
    ///
    /// - Return [`Error::ReadFile`] if configuration cannot be read.
    /// - Return [`Error::Config`] if configuration cannot be parsed.
    #[instrument(skip(root), level = "debug")]
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        debug!("open project: {:?}", root.display());
        let config_path = root.join(CONFIG_FILE_NAME);
        let config = read_to_string(&config_path)
            .map_err(|err| Error::ReadFile {
                source: err,
                path: config_path.clone(),
            })?
            .parse()?;

        Ok(Self { root, config })
    }

    /// Open project that `start` is located in.
    ///
    /// # Errors
    ///
    /// - Return [`Error::NoProjectRoot`] if `start` is not inside a project.
    /// - Return any error [`Project::open`] returns.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        Self::open(find_project_root(start)?)
    }

    /// Top-level directory of project.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Project configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    fn custom_types_dir(&self) -> PathBuf {
        self.resolve(&self.config.custom_types_dir)
    }

    fn libraries(&self) -> Vec<PathBuf> {
        self.config
            .libraries
            .iter()
            .map(|library| self.resolve(library))
            .collect()
    }

    fn custom_type_path(&self, id: &str) -> Result<PathBuf> {
        check_model_id(id)?;
        Ok(custom_type_index(self.custom_types_dir(), id))
    }

    fn remote_path(&self, kind: &str, id: &str) -> Result<PathBuf> {
        check_model_id(id)?;
        Ok(self
            .resolve(&self.config.remote_dir)
            .join(kind)
            .join(format!("{id}.json")))
    }

    /// List ids of all local custom types, sorted.
    ///
    /// # Errors
    ///
    /// - Return [`Error::Glob`] if the custom types directory cannot be
    ///   searched.
    pub fn custom_type_ids(&self) -> Result<Vec<String>> {
        let pattern = custom_type_index(self.custom_types_dir(), "*");
        let mut ids = glob_paths(&pattern)?
            .into_iter()
            .filter_map(|index| {
                index
                    .parent()
                    .and_then(Path::file_name)
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .collect::<Vec<_>>();
        ids.sort();

        Ok(ids)
    }

    /// Read local custom type.
    ///
    /// # Errors
    ///
    /// - Return [`Error::CustomTypeNotFound`] if no such custom type exists.
    /// - Return [`Error::ReadFile`] or [`Error::ParseModel`] if its model file
    ///   cannot be loaded.
    pub fn read_custom_type(&self, id: &str) -> Result<CustomType> {
        let path = self.custom_type_path(id)?;
        read_model(&path)?.ok_or_else(|| Error::CustomTypeNotFound { id: id.into() })
    }

    /// Write local custom type, replacing any previous version.
    ///
    /// # Errors
    ///
    /// - Return [`Error::CreateDir`] or [`Error::WriteFile`] if its model file
    ///   cannot be written.
    #[instrument(skip(self, custom_type), fields(id = %custom_type.id), level = "debug")]
    pub fn write_custom_type(&self, custom_type: &CustomType) -> Result<()> {
        let path = self.custom_type_path(&custom_type.id)?;
        debug!("write custom type to {:?}", path.display());
        write_model(&path, custom_type)
    }

    /// Add new local custom type.
    ///
    /// # Errors
    ///
    /// - Return [`Error::CustomTypeExists`] if the id is already taken.
    /// - Return any error [`Project::write_custom_type`] returns.
    pub fn create_custom_type(&self, custom_type: &CustomType) -> Result<()> {
        let path = self.custom_type_path(&custom_type.id)?;
        if path.exists() {
            return Err(Error::CustomTypeExists {
                id: custom_type.id.clone(),
            });
        }

        info!("create custom type {}", custom_type.id);
        self.write_custom_type(custom_type)
    }

    /// Edit local custom type.
    ///
    /// Loads the custom type, hands it to `editor`, and writes back whatever
    /// comes out. Nothing is written when the editor leaves the custom type as
    /// it was.
    ///
    /// # Errors
    ///
    /// - Return any error [`Project::read_custom_type`] or
    ///   [`Project::write_custom_type`] returns.
    #[instrument(skip(self, editor), level = "debug")]
    pub fn edit_custom_type<E>(&self, id: &str, editor: E) -> Result<CustomType>
    where
        E: FnOnce(CustomType) -> CustomType,
    {
        let current = self.read_custom_type(id)?;
        let edited = editor(current.clone());
        if edited == current && serialized_eq(&edited, &current)? {
            warn!("custom type {id} left unchanged");
            return Ok(edited);
        }

        self.write_custom_type(&edited)?;
        info!("updated custom type {id}");

        Ok(edited)
    }

    /// Delete local custom type along with its directory.
    ///
    /// # Errors
    ///
    /// - Return [`Error::InvalidModelId`] if `id` is not a plain name.
    /// - Return [`Error::CustomTypeNotFound`] if no such custom type exists.
    /// - Return [`Error::DeleteDir`] if its directory cannot be removed.
    #[instrument(skip(self), level = "debug")]
    pub fn delete_custom_type(&self, id: &str) -> Result<()> {
        let index = self.custom_type_path(id)?;
        if !index.is_file() {
            return Err(Error::CustomTypeNotFound { id: id.into() });
        }

        let dir = self.custom_types_dir().join(id);
        remove_dir_all(&dir).map_err(|err| Error::DeleteDir {
            source: err,
            path: dir.clone(),
        })?;
        info!("deleted custom type {id}");

        Ok(())
    }

    /// Read remote snapshot of a custom type, if there is one.
    ///
    /// # Errors
    ///
    /// - Return [`Error::ReadFile`] or [`Error::ParseModel`] if the snapshot
    ///   exists but cannot be loaded.
    pub fn remote_custom_type(&self, id: &str) -> Result<Option<CustomType>> {
        read_model(&self.remote_path("customtypes", id)?)
    }

    /// Pair every local custom type with its remote snapshot.
    ///
    /// # Errors
    ///
    /// - Return any error from listing or loading models.
    #[instrument(skip(self), level = "debug")]
    pub fn custom_type_models(&self) -> Result<Vec<FrontEndCustomTypeModel>> {
        self.custom_type_ids()?
            .into_iter()
            .map(|id| {
                Ok(FrontEndCustomTypeModel {
                    local: self.read_custom_type(&id)?,
                    remote: self.remote_custom_type(&id)?,
                })
            })
            .collect()
    }

    /// Load every slice of every slice library.
    ///
    /// Slices are returned library by library, sorted by directory within
    /// each library.
    ///
    /// # Errors
    ///
    /// - Return [`Error::Glob`] if a library cannot be searched.
    /// - Return [`Error::ReadFile`] or [`Error::ParseModel`] if a slice model
    ///   cannot be loaded.
    #[instrument(skip(self), level = "debug")]
    pub fn slices(&self) -> Result<Vec<LocalSlice>> {
        let mut slices = Vec::new();
        for library in self.libraries() {
            let mut models = glob_paths(&slice_model(library.join("*")))?;
            models.sort();
            for path in models {
                let Some(model) = read_model::<SliceModel>(&path)? else {
                    continue;
                };
                let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
                debug!("loaded slice {} from {:?}", model.id, dir.display());
                slices.push(LocalSlice { dir, model });
            }
        }

        Ok(slices)
    }

    /// Hash local screenshots of every variation of a slice.
    ///
    /// Variations without a screenshot file are left out.
    ///
    /// # Errors
    ///
    /// - Return [`Error::ReadFile`] if a screenshot exists but cannot be read.
    pub fn local_screenshots(&self, slice: &LocalSlice) -> Result<HashMap<String, Screenshot>> {
        let mut screenshots = HashMap::new();
        for variation in &slice.model.variations {
            let path = variation_screenshot(&slice.dir, &variation.id);
            let bytes = match read(&path) {
                Ok(bytes) => bytes,
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(Error::ReadFile { source: err, path }),
            };

            let screenshot = Screenshot {
                path: path.to_string_lossy().into_owned(),
                hash: hex::encode(Sha256::digest(&bytes)),
            };
            screenshots.insert(variation.id.clone(), screenshot);
        }

        Ok(screenshots)
    }

    /// Read remote snapshot of a slice, if there is one.
    ///
    /// # Errors
    ///
    /// - Return [`Error::ReadFile`] or [`Error::ParseModel`] if the snapshot
    ///   exists but cannot be loaded.
    pub fn remote_slice(&self, id: &str) -> Result<Option<SliceModel>> {
        read_model(&self.remote_path("slices", id)?)
    }

    /// Pair every local slice with its remote snapshot and local screenshots.
    ///
    /// # Errors
    ///
    /// - Return any error from listing or loading models.
    #[instrument(skip(self), level = "debug")]
    pub fn slice_models(&self) -> Result<Vec<FrontEndSliceModel>> {
        self.slices()?
            .into_iter()
            .map(|slice| {
                Ok(FrontEndSliceModel {
                    local_screenshots: self.local_screenshots(&slice)?,
                    remote: self.remote_slice(&slice.model.id)?,
                    local: slice.model,
                })
            })
            .collect()
    }

    /// Sync status of every local slice, keyed by slice id.
    ///
    /// # Errors
    ///
    /// - Return any error [`Project::slice_models`] returns.
    pub fn slice_statuses(&self) -> Result<Vec<(String, ModelStatus)>> {
        Ok(self
            .slice_models()?
            .into_iter()
            .map(|model| {
                let status = model.status();
                (model.local.id, status)
            })
            .collect())
    }

    /// Sync status of every local custom type, keyed by custom type id.
    ///
    /// # Errors
    ///
    /// - Return any error [`Project::custom_type_models`] returns.
    pub fn custom_type_statuses(&self) -> Result<Vec<(String, ModelStatus)>> {
        Ok(self
            .custom_type_models()?
            .into_iter()
            .map(|model| {
                let status = model.status();
                (model.local.id, status)
            })
            .collect())
    }
}

// INVARIANT: Model ids name exactly one directory entry, never a path.
fn check_model_id(id: &str) -> Result<()> {
    let single_component = !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && Path::new(id).file_name() == Some(OsStr::new(id));
    if !single_component {
        return Err(Error::InvalidModelId { id: id.into() });
    }

    Ok(())
}

// INVARIANT: Map equality ignores key order, so compare rendered output too.
fn serialized_eq<T: Serialize>(left: &T, right: &T) -> Result<bool> {
    Ok(serde_json::to_string(left).map_err(Error::SerializeModel)?
        == serde_json::to_string(right).map_err(Error::SerializeModel)?)
}

fn read_model<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(Error::ReadFile {
                source: err,
                path: path.to_path_buf(),
            })
        }
    };

    serde_json::from_str(&data)
        .map(Some)
        .map_err(|err| Error::ParseModel {
            source: err,
            path: path.to_path_buf(),
        })
}

fn write_model<T: Serialize>(path: &Path, model: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }

    let mut data = serde_json::to_string_pretty(model).map_err(Error::SerializeModel)?;
    data.push('\n');
    write(path, data).map_err(|err| Error::WriteFile {
        source: err,
        path: path.to_path_buf(),
    })
}

fn create_dir(path: impl AsRef<Path>) -> Result<()> {
    mkdirp::mkdirp(path.as_ref()).map_err(|err| Error::CreateDir {
        source: err,
        path: path.as_ref().to_path_buf(),
    })?;

    Ok(())
}

fn glob_paths(pattern: &Path) -> Result<Vec<PathBuf>> {
    let pattern = pattern.to_string_lossy();
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        paths.push(entry?);
    }

    Ok(paths)
}

/// All possible error types for project store interaction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Project configuration file already exists.
    #[error("project already exists at {:?}", path.display())]
    ProjectExists { path: PathBuf },

    /// Start directory is not inside a project.
    #[error(transparent)]
    NoProjectRoot(#[from] path::NoProjectRoot),

    /// Project configuration cannot be parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Custom type does not exist locally.
    #[error("custom type {id:?} does not exist")]
    CustomTypeNotFound { id: String },

    /// Model id would resolve outside of its model directory.
    #[error("invalid model id {id:?}, ids must be a single path component")]
    InvalidModelId { id: String },

    /// Custom type id is already taken.
    #[error("custom type {id:?} already exists")]
    CustomTypeExists { id: String },

    /// File cannot be read from.
    #[error("failed to read from {:?}", path.display())]
    ReadFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File cannot be written to.
    #[error("failed to write to {:?}", path.display())]
    WriteFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Directory cannot be created.
    #[error("failed to create directory {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Directory cannot be removed.
    #[error("failed to delete directory {:?}", path.display())]
    DeleteDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Model file does not hold a valid model.
    #[error("failed to parse model at {:?}", path.display())]
    ParseModel {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },

    /// Model cannot be serialized.
    #[error(transparent)]
    SerializeModel(serde_json::Error),

    /// Search pattern is invalid.
    #[error(transparent)]
    Glob(#[from] glob::PatternError),

    /// Search result cannot be read.
    #[error(transparent)]
    GlobEntry(#[from] glob::GlobError),
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
