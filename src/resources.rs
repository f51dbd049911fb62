//! Asset and per-user path lookup
//!
//! Fonts live under `<assets>/fonts/`. The ImGui layout file lives in a per-user
//! config directory so it survives moving the executable around.

use directories::ProjectDirs;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolved location of the shell's read-only assets
#[derive(Debug, Clone)]
pub struct Resources {
    assets_dir: PathBuf,
}

impl Resources {
    /// Resolves `assets_dir`
    ///
    /// Absolute paths are used as-is. Relative paths are tried next to the
    /// running executable first, then against the working directory.
    pub fn new(assets_dir: impl AsRef<Path>) -> Self {
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let cwd = env::current_dir().ok();

        Self::resolve(assets_dir.as_ref(), exe_dir.as_deref(), cwd.as_deref())
    }

    fn resolve(assets_dir: &Path, exe_dir: Option<&Path>, cwd: Option<&Path>) -> Self {
        if assets_dir.is_absolute() {
            return Self {
                assets_dir: assets_dir.to_path_buf(),
            };
        }

        let candidates: Vec<PathBuf> = [exe_dir, cwd]
            .into_iter()
            .flatten()
            .map(|base| base.join(assets_dir))
            .collect();

        let assets_dir = candidates
            .iter()
            .find(|candidate| candidate.is_dir())
            .or(candidates.last())
            .cloned()
            .unwrap_or_else(|| assets_dir.to_path_buf());

        Self { assets_dir }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    pub fn font_path(&self, font_name: &str) -> PathBuf {
        self.assets_dir.join("fonts").join(font_name)
    }
}

/// Returns the per-user config directory for `app_name`, creating it if needed
///
/// `override_dir` wins when set; a relative override is taken against the
/// working directory. Otherwise the platform convention is used. The result is
/// always absolute.
pub fn user_config_path(app_name: &str, override_dir: Option<&Path>) -> io::Result<PathBuf> {
    let dir = match override_dir {
        Some(dir) => {
            let cwd = env::current_dir()?;
            absolute_against(dir, &cwd)
        }
        None => ProjectDirs::from("", "", app_name)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "could not determine the user config directory",
                )
            })?,
    };

    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn absolute_against(dir: &Path, base: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        base.join(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_font_path_is_under_fonts() {
        let resources = Resources::new("/opt/imshell/assets");
        assert_eq!(
            resources.font_path("Manrope.ttf"),
            PathBuf::from("/opt/imshell/assets/fonts/Manrope.ttf")
        );
    }

    #[test]
    fn test_relative_assets_prefer_executable_dir() {
        let root = tempdir().unwrap();
        let exe_dir = root.path().join("bin");
        let cwd = root.path().join("work");
        fs::create_dir_all(exe_dir.join("assets")).unwrap();
        fs::create_dir_all(cwd.join("assets")).unwrap();

        let resources = Resources::resolve(Path::new("assets"), Some(&exe_dir), Some(&cwd));
        assert_eq!(resources.assets_dir(), exe_dir.join("assets"));
    }

    #[test]
    fn test_relative_assets_fall_back_to_cwd() {
        let root = tempdir().unwrap();
        let exe_dir = root.path().join("bin");
        let cwd = root.path().join("work");
        fs::create_dir_all(&exe_dir).unwrap();
        fs::create_dir_all(cwd.join("assets")).unwrap();

        let resources = Resources::resolve(Path::new("assets"), Some(&exe_dir), Some(&cwd));
        assert_eq!(resources.assets_dir(), cwd.join("assets"));

        // Neither exists: still points at the working directory
        fs::remove_dir_all(cwd.join("assets")).unwrap();
        let resources = Resources::resolve(Path::new("assets"), Some(&exe_dir), Some(&cwd));
        assert_eq!(resources.assets_dir(), cwd.join("assets"));
    }

    #[test]
    fn test_user_config_override_is_created() {
        let root = tempdir().unwrap();
        let dir = root.path().join("nested");
        assert!(!dir.exists());

        let path = user_config_path("imshell-test", Some(&dir)).unwrap();
        assert_eq!(path, dir);
        assert!(path.is_dir());
    }

    #[test]
    fn test_relative_override_is_made_absolute() {
        let base = Path::new("/srv/imshell");
        assert_eq!(
            absolute_against(Path::new("settings"), base),
            PathBuf::from("/srv/imshell/settings")
        );
        assert_eq!(
            absolute_against(Path::new("/etc/imshell"), base),
            PathBuf::from("/etc/imshell")
        );
    }

    #[cfg(target_os = "linux")]
    fn with_config_env<T>(xdg: &std::ffi::OsStr, home: &Path, f: impl FnOnce() -> T) -> T {
        let saved_xdg = env::var_os("XDG_CONFIG_HOME");
        let saved_home = env::var_os("HOME");
        env::set_var("XDG_CONFIG_HOME", xdg);
        env::set_var("HOME", home);

        let result = f();

        match saved_xdg {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
        match saved_home {
            Some(value) => env::set_var("HOME", value),
            None => env::remove_var("HOME"),
        }
        result
    }

    #[test]
    #[serial(env)]
    #[cfg(target_os = "linux")]
    fn test_xdg_config_home_is_used() {
        let xdg = tempdir().unwrap();
        let home = tempdir().unwrap();

        let path = with_config_env(xdg.path().as_os_str(), home.path(), || {
            user_config_path("imshell-test", None)
        })
        .unwrap();

        assert_eq!(path, xdg.path().join("imshell-test"));
        assert!(path.is_dir());
    }

    #[test]
    #[serial(env)]
    #[cfg(target_os = "linux")]
    fn test_relative_xdg_config_home_falls_back_to_home() {
        let home = tempdir().unwrap();

        let path = with_config_env("relative-cfg".as_ref(), home.path(), || {
            user_config_path("imshell-test", None)
        })
        .unwrap();

        assert!(path.is_absolute());
        assert_eq!(path, home.path().join(".config").join("imshell-test"));
        assert!(!Path::new("relative-cfg").exists());
    }
}
