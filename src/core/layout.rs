/// Environment layout
///
/// Resolves the env-path argument to an absolute root and knows where the
/// executable directory and the marker script live inside it.

use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Name of the executable directory inside an environment
pub const BIN_DIR: &str = "bin";

/// Launcher script whose interpreter line records the original install path
pub const MARKER_SCRIPT: &str = "pip";

/// Absolute location of an environment on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLayout {
    root: PathBuf,
}

impl EnvLayout {
    /// Resolve a command-line path against the working directory
    ///
    /// An absolute argument is used as-is, a relative one is joined onto `cwd`
    /// and a leading `~` expands to the home directory. Trailing separators and
    /// `.` segments are dropped; symlinks and `..` are left alone so the root
    /// matches what the user typed.
    ///
    /// # Arguments
    /// * `arg` - The env-path argument
    /// * `cwd` - Directory to resolve relative paths against
    pub fn resolve<P: AsRef<Path>>(arg: &str, cwd: P) -> Self {
        let expanded = expand_home(arg);

        let joined = if expanded.is_absolute() {
            expanded
        } else {
            cwd.as_ref().join(expanded)
        };

        let root = normalize(&joined);
        debug!(root = %root.display(), "resolved env path");

        Self { root }
    }

    /// Wrap an already absolute root
    pub fn from_root<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The root as the literal string substituted into scripts
    pub fn root_str(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }

    /// `<root>/bin`
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// `<root>/bin/pip`
    pub fn marker_path(&self) -> PathBuf {
        self.bin_dir().join(MARKER_SCRIPT)
    }
}

fn expand_home(arg: &str) -> PathBuf {
    let rest = match arg {
        "~" => Some(""),
        _ => arg.strip_prefix("~/"),
    };

    let Some(rest) = rest else {
        return PathBuf::from(arg);
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => {
            warn!("could not determine home directory, treating {} as relative", arg);
            PathBuf::from(arg)
        }
    }
}

// Lexical only: collecting components drops `.` and repeated/trailing separators.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_used_as_is() {
        let layout = EnvLayout::resolve("/opt/myenv", "/somewhere/else");
        assert_eq!(layout.root(), Path::new("/opt/myenv"));
        assert_eq!(layout.root_str(), "/opt/myenv");
    }

    #[test]
    fn test_trailing_separators_stripped() {
        let layout = EnvLayout::resolve("/opt/myenv///", "/");
        assert_eq!(layout.root_str(), "/opt/myenv");
    }

    #[test]
    fn test_root_stays_root() {
        let layout = EnvLayout::resolve("/", "/tmp");
        assert_eq!(layout.root_str(), "/");
    }

    #[test]
    fn test_relative_path_joined_onto_cwd() {
        let relative = EnvLayout::resolve("envs/myenv/", "/home/alice");
        let dotted = EnvLayout::resolve("./envs/myenv", "/home/alice");
        let absolute = EnvLayout::resolve("/home/alice/envs/myenv", "/");

        assert_eq!(relative, absolute);
        assert_eq!(dotted, absolute);
    }

    #[test]
    fn test_home_expansion() {
        if let Some(home) = dirs::home_dir() {
            let layout = EnvLayout::resolve("~/envs/myenv", "/tmp");
            assert_eq!(layout.root(), home.join("envs/myenv").as_path());
        }
    }

    #[test]
    fn test_bin_and_marker_paths() {
        let layout = EnvLayout::from_root("/opt/myenv");
        assert_eq!(layout.bin_dir(), PathBuf::from("/opt/myenv/bin"));
        assert_eq!(layout.marker_path(), PathBuf::from("/opt/myenv/bin/pip"));
    }
}
