//! File utility functions

use std::path::PathBuf;

/// Expand `~`, `~/...` and relative paths to an absolute path.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = match (path, dirs::home_dir()) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_absolute() {
        assert_eq!(expand_path("/srv/data"), PathBuf::from("/srv/data"));
    }

    #[test]
    fn test_expand_path_relative() {
        let result = expand_path("./board-data");
        assert!(result.is_absolute());
        assert!(result.ends_with("board-data"));
    }

    #[test]
    fn test_expand_path_tilde() {
        let result = expand_path("~/.taskboard");
        assert!(!result.to_string_lossy().contains('~'));
        assert!(result.ends_with(".taskboard"));
    }

    #[test]
    fn test_expand_path_trims_whitespace() {
        assert_eq!(expand_path("  /path/to/dir  "), PathBuf::from("/path/to/dir"));
    }
}
