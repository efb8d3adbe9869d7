//! Locating the first call-stack frame outside the logging library.

use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Frames scanned once the logging entry point has been left.
const SCAN_WINDOW: usize = 13;
/// Upper bound on resolved frames collected per walk.
const MAX_FRAMES: usize = 64;

/// A resolved source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSite {
    pub file: PathBuf,
    pub line: u32,
}

impl fmt::Display for SourceSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// Source directory of this crate, the default boundary of every logger.
pub fn crate_boundary() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Test sources count as external even when they lie under a boundary.
///
/// Only the part of `path` below `root` is searched for a `tests` directory, so a
/// project checked out somewhere under a `tests` folder is not mistaken for tests.
pub fn is_test_source(path: &Path, root: &Path) -> bool {
    let test_stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| {
            stem == "tests" || stem.ends_with("_test") || stem.ends_with("_tests")
        });
    let relative = path.strip_prefix(root).unwrap_or(path);
    test_stem
        || relative
            .parent()
            .is_some_and(|dir| dir.components().any(|c| c.as_os_str() == "tests"))
}

/// Finds the caller of the logging entry point, skipping frames under `boundary`.
///
/// Returns `None` when no frame qualifies, which includes binaries built without
/// debug info.
pub fn caller_location(boundary: &Path) -> Option<SourceSite> {
    let sites = collect_sites();
    select(&sites, &crate_boundary(), boundary).cloned()
}

fn collect_sites() -> Vec<SourceSite> {
    let mut sites = Vec::new();
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) {
                sites.push(SourceSite {
                    file: file.to_path_buf(),
                    line,
                });
            }
        });
        sites.len() < MAX_FRAMES
    });
    sites
}

/// `sites` is ordered innermost first. Frames preceding the first `internal` frame
/// belong to the stack walker itself.
fn select<'a>(
    sites: &'a [SourceSite],
    internal: &Path,
    boundary: &Path,
) -> Option<&'a SourceSite> {
    let is_internal = |site: &SourceSite| {
        site.file.starts_with(internal) && !is_test_source(&site.file, internal)
    };
    let entry = sites.iter().position(|site| is_internal(site))?;
    let outside = entry + sites[entry..].iter().position(|site| !is_internal(site))?;
    sites[outside..]
        .iter()
        .take(SCAN_WINDOW)
        .find(|site| !site.file.starts_with(boundary) || is_test_source(&site.file, boundary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(file: &str, line: u32) -> SourceSite {
        SourceSite {
            file: file.into(),
            line,
        }
    }

    fn stack(tail: &[SourceSite]) -> Vec<SourceSite> {
        let mut sites = vec![
            site("/cargo/registry/backtrace/src/backtrace/mod.rs", 53),
            site("/lib/src/caller.rs", 60),
            site("/lib/src/logger.rs", 120),
            site("/lib/src/logger.rs", 80),
        ];
        sites.extend_from_slice(tail);
        sites
    }

    #[test]
    fn test_select_first_external_frame() {
        let sites = stack(&[site("/app/src/main.rs", 7), site("/rustc/core/ops.rs", 250)]);
        let found = select(&sites, Path::new("/lib/src"), Path::new("/lib/src"));
        assert_eq!(found, Some(&site("/app/src/main.rs", 7)));
    }

    #[test]
    fn test_select_skips_custom_boundary() {
        let sites = stack(&[
            site("/wrapper/src/lib.rs", 31),
            site("/wrapper/src/util.rs", 12),
            site("/app/src/main.rs", 7),
        ]);
        let found = select(&sites, Path::new("/lib/src"), Path::new("/wrapper/src"));
        assert_eq!(found.map(ToString::to_string), Some("/app/src/main.rs:7".into()));
    }

    #[test]
    fn test_select_test_sources_are_external() {
        let sites = stack(&[
            site("/wrapper/src/lib.rs", 31),
            site("/wrapper/src/lib_tests.rs", 9),
            site("/app/src/main.rs", 7),
        ]);
        let found = select(&sites, Path::new("/lib/src"), Path::new("/wrapper/src"));
        assert_eq!(found, Some(&site("/wrapper/src/lib_tests.rs", 9)));
    }

    #[test]
    fn test_select_scan_window() {
        let mut tail: Vec<_> = (0..SCAN_WINDOW as u32)
            .map(|i| site("/wrapper/src/deep.rs", i))
            .collect();
        tail.push(site("/app/src/main.rs", 7));
        let sites = stack(&tail);
        assert_eq!(select(&sites, Path::new("/lib/src"), Path::new("/wrapper/src")), None);
    }

    #[test]
    fn test_select_without_entry_point() {
        let sites = vec![site("/app/src/main.rs", 7)];
        assert_eq!(select(&sites, Path::new("/lib/src"), Path::new("/lib/src")), None);
        assert_eq!(select(&[], Path::new("/lib/src"), Path::new("/lib/src")), None);
    }

    #[test]
    fn test_is_test_source() {
        let root = Path::new("/app");
        assert!(is_test_source(Path::new("/app/tests/location.rs"), root));
        assert!(is_test_source(Path::new("/app/src/tests.rs"), root));
        assert!(is_test_source(Path::new("/app/src/parser_test.rs"), root));
        assert!(is_test_source(Path::new("tests/bridge.rs"), root));
        assert!(!is_test_source(Path::new("/app/src/contest.rs"), root));
        assert!(!is_test_source(Path::new("/app/src/main.rs"), root));
        // `tests` above the root does not count.
        let nested = Path::new("/work/tests/app/src");
        assert!(!is_test_source(Path::new("/work/tests/app/src/logger.rs"), nested));
        assert!(is_test_source(Path::new("/work/tests/app/src/tests/it.rs"), nested));
    }

    #[test]
    fn test_select_library_under_tests_directory() {
        let internal = Path::new("/x/tests/lib/src");
        let sites = vec![
            site("/cargo/registry/backtrace/src/backtrace/mod.rs", 53),
            site("/x/tests/lib/src/caller.rs", 60),
            site("/x/tests/lib/src/logger.rs", 120),
            site("/x/tests/app/src/main.rs", 7),
        ];
        assert_eq!(
            select(&sites, internal, internal),
            Some(&site("/x/tests/app/src/main.rs", 7))
        );
    }

    #[test]
    fn test_select_boundary_under_tests_directory() {
        let sites = stack(&[
            site("/x/tests/wrapper/src/lib.rs", 31),
            site("/x/tests/app/src/main.rs", 7),
        ]);
        let found = select(&sites, Path::new("/lib/src"), Path::new("/x/tests/wrapper/src"));
        assert_eq!(found, Some(&site("/x/tests/app/src/main.rs", 7)));
    }

    #[test]
    fn test_crate_boundary() {
        assert!(crate_boundary().ends_with("src"));
        assert!(crate_boundary().is_absolute());
    }
}
