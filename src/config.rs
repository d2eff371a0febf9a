use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::tpl::Tpl;
use crate::utils;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "Pack.toml";

/// What to build, what to package and how to name the result
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PackConfig {
    /// Product name; archive root folder and `$NAME`
    pub name: String,

    /// Architecture identifier embedded in the archive name as `$ARCH`
    pub arch: String,

    /// Archive file name template, without the `.zip` extension
    pub filename: String,

    /// Where the archive is written, relative to the working directory
    pub output_folder: Option<String>,

    /// Compile command tokens; empty means nothing to build
    pub build: Vec<String>,

    /// Command whose trimmed output becomes `$TAG`
    pub tag: Vec<String>,

    /// Optional command run after the archive is written
    pub clean: Vec<String>,

    /// Top-level files that must exist
    pub files: Vec<String>,

    /// Directories whose whole subtree is packaged
    pub dirs: Vec<String>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            name: "Launcher".to_string(),
            arch: "win-x64".to_string(),
            filename: "$NAME_$TAG_$ARCH".to_string(),
            output_folder: None,
            build: tokens(&["go", "build", "-ldflags", "-H=windowsgui -w -s"]),
            tag: tokens(&["git", "describe", "--tags"]),
            clean: Vec::new(),
            files: tokens(&["launcher.exe", "config.toml", "raylib.dll"]),
            dirs: tokens(&["Fonts"]),
        }
    }
}

fn tokens(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

impl PackConfig {
    /// Load the configuration for this run
    ///
    /// An explicit path must exist. Otherwise `Pack.toml` in the working
    /// directory is used when present, falling back to the built-in defaults.
    pub fn resolve(ctx: &Context, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    ctx.base_dir.join(path)
                };
                if !path.is_file() {
                    return Err(Error::ConfigNotFound(path.display().to_string()));
                }
                Some(path)
            }
            None => Some(ctx.base_dir.join(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        match path {
            Some(path) => Self::load(&path),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Parse and validate a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: PackConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidConfig("`name` must not be empty".to_string()));
        }
        if self.name.contains(['/', '\\']) {
            return Err(Error::InvalidConfig(format!(
                "`name` must not contain a path separator: {}",
                self.name
            )));
        }
        if self.arch.trim().is_empty() {
            return Err(Error::InvalidConfig("`arch` must not be empty".to_string()));
        }
        if self.filename.trim().is_empty() {
            return Err(Error::InvalidConfig("`filename` must not be empty".to_string()));
        }
        if self.tag.is_empty() {
            return Err(Error::InvalidConfig("`tag` command must not be empty".to_string()));
        }
        // each entry must name something strictly below the working directory
        for path in self.files.iter().chain(&self.dirs) {
            utils::to_archive_path(Path::new(path))?;
        }
        Ok(())
    }

    /// Archive file name for `tag`, e.g. `Launcher_v1.2.3_win-x64.zip`
    pub fn archive_filename(&self, tag: &str) -> String {
        let mut tpl = Tpl::new();
        tpl.register("NAME", &self.name);
        tpl.register("TAG", tag);
        tpl.register("ARCH", &self.arch);
        format!("{}.zip", tpl.parse(&self.filename))
    }

    pub fn output_dir(&self, ctx: &Context) -> PathBuf {
        match &self.output_folder {
            Some(folder) => ctx.base_dir.join(folder),
            None => ctx.base_dir.clone(),
        }
    }
}
