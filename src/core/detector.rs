/// Original install path detection
///
/// Reads the interpreter line of the marker script and works out which
/// directory the environment was created in.

use crate::core::layout::{EnvLayout, BIN_DIR};
use crate::error::{RepairError, Result};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

// `#!` followed by the interpreter path; anything after the first token is an argument.
const SHEBANG_PATTERN: &str = r"^#!\s*(\S+)";

// Interpreter names an environment's own launchers point at.
const INTERPRETER_PREFIXES: &[&str] = &["python", "pypy"];

/// Handles detection of the path an environment was installed at
pub struct PathDetector {
    shebang: Regex,
}

impl PathDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            shebang: Regex::new(SHEBANG_PATTERN)?,
        })
    }

    /// Detect the previous root of an environment
    ///
    /// # Arguments
    /// * `layout` - The environment at its current location
    ///
    /// # Returns
    /// * `Ok(Some(String))` - The root recorded in the marker script
    /// * `Ok(None)` - The marker script does not exist
    /// * `Err(RepairError)` - The marker could not be read or its first line is malformed
    pub fn detect(&self, layout: &EnvLayout) -> Result<Option<String>> {
        let marker = layout.marker_path();

        if !marker.is_file() {
            debug!(marker = %marker.display(), "marker script missing");
            return Ok(None);
        }

        let line = read_first_line(&marker)?;
        let previous = self.parse_root(&line).ok_or_else(|| RepairError::MalformedShebang {
            path: marker.clone(),
            line: line.trim_end().to_string(),
        })?;

        info!(previous = %previous, "detected original env path");
        Ok(Some(previous))
    }

    /// Extract the environment root from an interpreter line
    ///
    /// `#!/opt/env/bin/python3` gives `/opt/env`. The interpreter path must be
    /// absolute, end in `bin/<python interpreter>` and keep at least one segment
    /// once those two are dropped. Launchers going through `/usr/bin/env` carry
    /// no install path and are rejected.
    pub fn parse_root(&self, line: &str) -> Option<String> {
        let captures = self.shebang.captures(line.trim())?;
        let interpreter = captures.get(1)?.as_str();

        if !interpreter.starts_with('/') {
            return None;
        }

        let mut segments = interpreter.rsplitn(3, '/');
        let binary = segments.next()?;
        let bin_dir = segments.next()?;
        let root = segments.next()?;

        let is_interpreter = INTERPRETER_PREFIXES.iter().any(|p| binary.starts_with(p));
        if !is_interpreter || bin_dir != BIN_DIR || root.trim_end_matches('/').is_empty() {
            return None;
        }

        Some(root.to_string())
    }
}

fn read_first_line(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| RepairError::io(path, e))?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|e| RepairError::io(path, e))?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env_with_marker(first_line: &str) -> (EnvLayout, TempDir) {
        let temp = TempDir::new().unwrap();
        let layout = EnvLayout::from_root(temp.path());
        fs::create_dir_all(layout.bin_dir()).unwrap();
        fs::write(
            layout.marker_path(),
            format!("{}\nimport sys\nfrom pip._internal.cli.main import main\n", first_line),
        )
        .unwrap();
        (layout, temp)
    }

    #[test]
    fn test_parse_root() {
        let detector = PathDetector::new().unwrap();
        assert_eq!(detector.parse_root("#!/opt/env/bin/python3"), Some("/opt/env".to_string()));
        assert_eq!(detector.parse_root("#!/opt/pp/bin/pypy3"), Some("/opt/pp".to_string()));
        assert_eq!(
            detector.parse_root("#!/home/alice/envs/myenv/bin/python3\n"),
            Some("/home/alice/envs/myenv".to_string())
        );
    }

    #[test]
    fn test_parse_root_tolerates_spacing_and_arguments() {
        let detector = PathDetector::new().unwrap();
        assert_eq!(detector.parse_root("#! /opt/env/bin/python3"), Some("/opt/env".to_string()));
        assert_eq!(
            detector.parse_root("  #!/opt/env/bin/python3 -E  "),
            Some("/opt/env".to_string())
        );
    }

    #[test]
    fn test_parse_root_rejects_malformed_lines() {
        let detector = PathDetector::new().unwrap();
        assert_eq!(detector.parse_root(""), None);
        assert_eq!(detector.parse_root("#!"), None);
        assert_eq!(detector.parse_root("import sys"), None);
        assert_eq!(detector.parse_root("/opt/env/bin/python3"), None);
        assert_eq!(detector.parse_root("#!python3"), None);
        assert_eq!(detector.parse_root("#!bin/python3"), None);
        assert_eq!(detector.parse_root("#!/python3"), None);
        assert_eq!(detector.parse_root("#!/bin/python3"), None);
        assert_eq!(detector.parse_root("#!/opt/env/bin/"), None);
        assert_eq!(detector.parse_root("#!/usr/bin/env python3"), None);
        assert_eq!(detector.parse_root("#!/opt/env/sbin/python3"), None);
        assert_eq!(detector.parse_root("#!/opt/env/bin/bash"), None);
    }

    #[test]
    fn test_detect_from_marker() {
        let (layout, _temp) = env_with_marker("#!/opt/env/bin/python3");
        let detector = PathDetector::new().unwrap();

        let previous = detector.detect(&layout).unwrap();
        assert_eq!(previous, Some("/opt/env".to_string()));
    }

    #[test]
    fn test_detect_missing_marker() {
        let temp = TempDir::new().unwrap();
        let layout = EnvLayout::from_root(temp.path());
        fs::create_dir_all(layout.bin_dir()).unwrap();

        let detector = PathDetector::new().unwrap();
        assert_eq!(detector.detect(&layout).unwrap(), None);
    }

    #[test]
    fn test_detect_marker_is_directory() {
        let temp = TempDir::new().unwrap();
        let layout = EnvLayout::from_root(temp.path());
        fs::create_dir_all(layout.marker_path()).unwrap();

        let detector = PathDetector::new().unwrap();
        assert_eq!(detector.detect(&layout).unwrap(), None);
    }

    #[test]
    fn test_detect_empty_marker_is_malformed() {
        let temp = TempDir::new().unwrap();
        let layout = EnvLayout::from_root(temp.path());
        fs::create_dir_all(layout.bin_dir()).unwrap();
        fs::write(layout.marker_path(), "").unwrap();

        let detector = PathDetector::new().unwrap();
        let err = detector.detect(&layout).unwrap_err();
        assert!(matches!(err, RepairError::MalformedShebang { .. }));
    }

    #[test]
    fn test_detect_env_launcher_is_malformed() {
        let (layout, _temp) = env_with_marker("#!/usr/bin/env python3");
        let detector = PathDetector::new().unwrap();

        let err = detector.detect(&layout).unwrap_err();
        match err {
            RepairError::MalformedShebang { line, .. } => {
                assert_eq!(line, "#!/usr/bin/env python3")
            }
            other => panic!("expected malformed shebang, got {:?}", other),
        }
    }

    #[test]
    fn test_detect_short_interpreter_is_malformed() {
        let (layout, _temp) = env_with_marker("#!/python3");
        let detector = PathDetector::new().unwrap();

        match detector.detect(&layout) {
            Err(RepairError::MalformedShebang { path, line }) => {
                assert_eq!(path, layout.marker_path());
                assert_eq!(line, "#!/python3");
            }
            other => panic!("expected malformed shebang, got {:?}", other),
        }
    }
}
