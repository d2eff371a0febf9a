use crate::config::PackConfig;
use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::utils;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file to package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path on disk, relative to the working directory
    pub source: PathBuf,

    /// Entry name inside the archive, `<name>/<source>`
    pub destination: String,

    /// Stored with `0o755` instead of `0o644`
    pub executable: bool,
}

/// Ordered list of files that go into the archive
#[derive(Debug, Default)]
pub struct Manifest {
    pub entries: Vec<Entry>,
}

impl Manifest {
    /// Collect the required files, then the content of every required directory
    ///
    /// All required files are checked before any directory is walked, so a
    /// missing file fails the run without touching the rest of the tree.
    /// `archive_path` is never collected, even when it lies inside a packaged
    /// directory.
    pub fn collect(ctx: &Context, config: &PackConfig, archive_path: &Path) -> Result<Self> {
        let mut manifest = Manifest::default();
        let mut seen = HashSet::new();

        for file in &config.files {
            let path = ctx.base_dir.join(file);
            if !path.is_file() {
                cliclack::log::error(format!("could not find {}", file))?;
                return Err(Error::MissingFile(file.clone()));
            }
            if path == archive_path {
                continue;
            }
            manifest.push(ctx, config, Path::new(file), &mut seen)?;
        }

        for dir in &config.dirs {
            let root = ctx.base_dir.join(dir);
            if !root.is_dir() {
                cliclack::log::error(format!("could not find directory {}", dir))?;
                return Err(Error::MissingDirectory(dir.clone()));
            }

            for entry in WalkDir::new(&root).sort_by_file_name() {
                let entry = entry?;
                let file_type = entry.file_type();

                if file_type.is_symlink() {
                    // links to files are packaged with the target content,
                    // links to directories are not followed
                    match fs::metadata(entry.path()) {
                        Ok(meta) if meta.is_file() => {}
                        Ok(_) => continue,
                        Err(_) => {
                            cliclack::log::error(format!(
                                "broken link {}",
                                entry.path().display()
                            ))?;
                            return Err(Error::BrokenLink(entry.path().display().to_string()));
                        }
                    }
                } else if !file_type.is_file() {
                    continue;
                }

                if entry.path() == archive_path {
                    continue;
                }

                let relative = entry.path().strip_prefix(&ctx.base_dir).map_err(|_| {
                    Error::custom(format!(
                        "{} is outside of {}",
                        entry.path().display(),
                        ctx.base_dir.display()
                    ))
                })?;
                manifest.push(ctx, config, relative, &mut seen)?;
            }
        }

        Ok(manifest)
    }

    fn push(
        &mut self,
        ctx: &Context,
        config: &PackConfig,
        relative: &Path,
        seen: &mut HashSet<String>,
    ) -> Result<()> {
        let source = utils::to_archive_path(relative)?;
        let destination = format!("{}/{}", config.name, source);

        if !seen.insert(destination.clone()) {
            if ctx.verbose {
                cliclack::log::remark(format!("{} is already packaged, skipping", source))?;
            }
            return Ok(());
        }

        let executable = is_executable(&ctx.base_dir.join(relative))?;
        self.entries.push(Entry {
            source: PathBuf::from(source),
            destination,
            executable,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::metadata(path)?.permissions().mode() & 0o111 != 0 || has_exe_extension(path))
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> Result<bool> {
    Ok(has_exe_extension(path))
}

fn has_exe_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in ["launcher.exe", "config.toml", "raylib.dll"] {
            fs::write(dir.path().join(file), file).unwrap();
        }
        fs::create_dir_all(dir.path().join("Fonts").join("sub")).unwrap();
        fs::write(dir.path().join("Fonts").join("a.ttf"), "a").unwrap();
        fs::write(dir.path().join("Fonts").join("sub").join("b.ttf"), "b").unwrap();
        fs::write(dir.path().join("unrelated.txt"), "nope").unwrap();
        dir
    }

    fn archive(dir: &TempDir) -> PathBuf {
        dir.path().join("Launcher_v1_win-x64.zip")
    }

    fn sources(manifest: &Manifest) -> Vec<String> {
        manifest
            .entries
            .iter()
            .map(|e| e.source.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_files_then_directory_content() {
        let dir = fixture();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let manifest = Manifest::collect(&ctx, &PackConfig::default(), &archive(&dir)).unwrap();

        assert_eq!(
            sources(&manifest),
            vec![
                "launcher.exe",
                "config.toml",
                "raylib.dll",
                "Fonts/a.ttf",
                "Fonts/sub/b.ttf",
            ]
        );
        assert_eq!(manifest.entries[4].destination, "Launcher/Fonts/sub/b.ttf");
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = fixture();
        fs::remove_file(dir.path().join("config.toml")).unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        match Manifest::collect(&ctx, &PackConfig::default(), &archive(&dir)) {
            Err(Error::MissingFile(name)) => assert_eq!(name, "config.toml"),
            other => panic!("expected MissingFile, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_checked_before_directories() {
        let dir = fixture();
        fs::remove_file(dir.path().join("raylib.dll")).unwrap();
        fs::remove_dir_all(dir.path().join("Fonts")).unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let err = Manifest::collect(&ctx, &PackConfig::default(), &archive(&dir)).unwrap_err();
        assert!(matches!(err, Error::MissingFile(ref name) if name == "raylib.dll"));
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = fixture();
        fs::remove_dir_all(dir.path().join("Fonts")).unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let err = Manifest::collect(&ctx, &PackConfig::default(), &archive(&dir)).unwrap_err();
        assert!(matches!(err, Error::MissingDirectory(ref name) if name == "Fonts"));
    }

    #[test]
    fn test_directory_file_also_listed_is_packaged_once() {
        let dir = fixture();
        let ctx = Context::new(dir.path().to_path_buf(), false);
        let mut config = PackConfig::default();
        config.files.push("Fonts/a.ttf".to_string());

        let manifest = Manifest::collect(&ctx, &config, &archive(&dir)).unwrap();
        let count = sources(&manifest).iter().filter(|s| *s == "Fonts/a.ttf").count();
        assert_eq!(count, 1);
        assert_eq!(manifest.len(), 5);
    }

    #[test]
    fn test_directory_is_not_a_required_file() {
        let dir = fixture();
        let ctx = Context::new(dir.path().to_path_buf(), false);
        let mut config = PackConfig::default();
        config.files = vec!["Fonts".to_string()];

        assert!(matches!(
            Manifest::collect(&ctx, &config, &archive(&dir)),
            Err(Error::MissingFile(_))
        ));
    }

    #[test]
    fn test_empty_configuration() {
        let dir = fixture();
        let ctx = Context::new(dir.path().to_path_buf(), false);
        let mut config = PackConfig::default();
        config.files.clear();
        config.dirs.clear();

        assert!(Manifest::collect(&ctx, &config, &archive(&dir)).unwrap().is_empty());
    }

    #[test]
    fn test_output_archive_is_never_collected() {
        let dir = fixture();
        fs::write(archive(&dir), "previous run").unwrap();
        fs::write(dir.path().join("Fonts").join("Launcher_v1_win-x64.zip"), "zip").unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), false);
        let mut config = PackConfig::default();
        config.files.push("Launcher_v1_win-x64.zip".to_string());

        let manifest = Manifest::collect(&ctx, &config, &archive(&dir)).unwrap();
        let collected = sources(&manifest);
        assert!(!collected.contains(&"Launcher_v1_win-x64.zip".to_string()));

        // the same name elsewhere is an ordinary file
        assert!(collected.contains(&"Fonts/Launcher_v1_win-x64.zip".to_string()));

        let inside = dir.path().join("Fonts").join("Launcher_v1_win-x64.zip");
        let manifest = Manifest::collect(&ctx, &PackConfig::default(), &inside).unwrap();
        assert_eq!(
            sources(&manifest)
                .iter()
                .filter(|s| s.ends_with(".zip"))
                .count(),
            0
        );
    }

    #[test]
    fn test_executable_flag() {
        let dir = fixture();
        let ctx = Context::new(dir.path().to_path_buf(), false);

        let manifest = Manifest::collect(&ctx, &PackConfig::default(), &archive(&dir)).unwrap();
        let executables: Vec<&str> = manifest
            .entries
            .iter()
            .filter(|e| e.executable)
            .map(|e| e.destination.as_str())
            .collect();
        assert_eq!(executables, vec!["Launcher/launcher.exe"]);
    }

    #[cfg(unix)]
    mod links {
        use super::*;
        use std::os::unix::fs::symlink;

        #[test]
        fn test_file_link_is_packaged() {
            let dir = fixture();
            symlink(dir.path().join("config.toml"), dir.path().join("Fonts").join("linked.toml"))
                .unwrap();
            let ctx = Context::new(dir.path().to_path_buf(), false);

            let manifest = Manifest::collect(&ctx, &PackConfig::default(), &archive(&dir)).unwrap();
            assert!(sources(&manifest).contains(&"Fonts/linked.toml".to_string()));
        }

        #[test]
        fn test_directory_link_is_not_followed() {
            let dir = fixture();
            symlink(dir.path().join("Fonts").join("sub"), dir.path().join("Fonts").join("alias"))
                .unwrap();
            let ctx = Context::new(dir.path().to_path_buf(), false);

            let manifest = Manifest::collect(&ctx, &PackConfig::default(), &archive(&dir)).unwrap();
            assert!(sources(&manifest).iter().all(|s| !s.starts_with("Fonts/alias")));
            assert_eq!(manifest.len(), 5);
        }

        #[test]
        fn test_broken_link_fails() {
            let dir = fixture();
            symlink(dir.path().join("gone.ttf"), dir.path().join("Fonts").join("c.ttf")).unwrap();
            let ctx = Context::new(dir.path().to_path_buf(), false);

            let err = Manifest::collect(&ctx, &PackConfig::default(), &archive(&dir)).unwrap_err();
            assert!(matches!(err, Error::BrokenLink(ref path) if path.ends_with("c.ttf")));
        }

        #[test]
        fn test_executable_bit_is_detected() {
            use std::os::unix::fs::PermissionsExt;

            let dir = fixture();
            let script = dir.path().join("Fonts").join("install.sh");
            fs::write(&script, "#!/bin/sh").unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
            let ctx = Context::new(dir.path().to_path_buf(), false);

            let manifest = Manifest::collect(&ctx, &PackConfig::default(), &archive(&dir)).unwrap();
            let script = manifest
                .entries
                .iter()
                .find(|e| e.destination == "Launcher/Fonts/install.sh")
                .unwrap();
            assert!(script.executable);
        }
    }
}
