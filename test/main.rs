// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT


use anyhow::Result;
use slicemachine::{Project, ProjectConfig};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(crate) struct ProjectFixture {
    root: PathBuf,
    project: Project,
}

impl ProjectFixture {
    pub(crate) fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let project = Project::init(&root, ProjectConfig::new("fixture"))?;

        Ok(Self { root, project })
    }

    pub(crate) fn project(&self) -> &Project {
        &self.project
    }

    /// Write slice model and screenshots into the default slice library.
    pub(crate) fn add_slice(
        &self,
        dir_name: &str,
        model: impl AsRef<str>,
        screenshots: &[(&str, &[u8])],
    ) -> Result<()> {
        let dir = self.root.join("slices").join(dir_name);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("model.json"), model.as_ref())?;
        for (variation, bytes) in screenshots {
            fs::write(dir.join(format!("screenshot-{variation}.png")), bytes)?;
        }

        Ok(())
    }

    /// Write remote snapshot of a model.
    ///
    /// `kind` is either `customtypes` or `slices`.
    pub(crate) fn add_remote(&self, kind: &str, id: &str, model: impl AsRef<str>) -> Result<()> {
        let dir = self.root.join(".slicemachine").join("remote").join(kind);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{id}.json")), model.as_ref())?;

        Ok(())
    }

    /// Copy current local custom type into the remote snapshot.
    pub(crate) fn push_custom_type(&self, id: &str) -> Result<()> {
        let local = fs::read_to_string(self.root.join("customtypes").join(id).join("index.json"))?;
        self.add_remote("customtypes", id, local)
    }
}
