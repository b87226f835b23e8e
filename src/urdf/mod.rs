//! URDF loading for static scenery.
//!
//! Files are looked up the way the classic simulator does it: the name as
//! given, then every registered search path in order. The bundled data
//! directory ships `plane.urdf`, so scenes can load a ground plane without
//! touching the filesystem.

mod parser;
mod types;

pub use parser::parse_urdf_str;
pub use types::{UrdfCollision, UrdfLink, UrdfOrigin, UrdfRobot, UrdfVisual};

use bevy::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{SimError, SimResult};

/// Files compiled into the crate, keyed by file name.
const BUNDLED_FILES: &[(&str, &str)] = &[("plane.urdf", include_str!("../../assets/plane.urdf"))];

/// A place to look for URDF files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPath {
    /// Data files compiled into the crate
    Bundled,
    /// A directory on disk
    Dir(PathBuf),
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => f.write_str("<bundled data>"),
            Self::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// The bundled data directory, to pass to `set_additional_search_path`.
pub fn bundled_data_path() -> SearchPath {
    SearchPath::Bundled
}

/// Ordered list of additional search paths.
#[derive(Resource, Debug, Default, Clone)]
pub struct AssetSearchPaths {
    paths: Vec<SearchPath>,
}

impl AssetSearchPaths {
    /// Append a search path; adding the same path twice is a no-op.
    pub fn add(&mut self, path: SearchPath) {
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    pub fn paths(&self) -> &[SearchPath] {
        &self.paths
    }

    /// Locate `name` and return its contents.
    pub fn read(&self, name: &str) -> SimResult<String> {
        let direct = Path::new(name);
        if direct.is_file() {
            return read_file(direct);
        }

        let mut searched = vec![name.to_string()];
        for path in &self.paths {
            match path {
                SearchPath::Bundled => {
                    if let Some((_, contents)) = BUNDLED_FILES.iter().find(|(file, _)| *file == name) {
                        return Ok((*contents).to_string());
                    }
                    searched.push(format!("{path}/{name}"));
                }
                SearchPath::Dir(dir) => {
                    let candidate = dir.join(name);
                    if candidate.is_file() {
                        return read_file(&candidate);
                    }
                    searched.push(candidate.display().to_string());
                }
            }
        }

        Err(SimError::UrdfNotFound {
            name: name.to_string(),
            searched,
        })
    }

    /// Locate and parse `name`.
    pub fn load(&self, name: &str) -> SimResult<UrdfRobot> {
        let xml = self.read(name)?;
        parse_urdf_str(&xml).map_err(|source| SimError::Urdf {
            name: name.to_string(),
            source,
        })
    }
}

fn read_file(path: &Path) -> SimResult<String> {
    std::fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })
}
