// src/watch/path_utils.rs

//! Path handling shared by the matcher, the resolver and the watcher.

use std::path::{Component, Path, PathBuf};

/// Characters that make a path segment a glob rather than a literal name.
const WILDCARD_CHARS: &[char] = &['*', '?', '[', ']', '{', '}'];

/// Whether a single path segment contains glob syntax.
pub fn is_wildcard_segment(segment: &str) -> bool {
    segment.contains(WILDCARD_CHARS)
}

/// Render a path with forward slashes, the form glob patterns are matched on.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Lexically clean a path: drop `.` segments and fold `..` into its parent.
///
/// Does not touch the filesystem, so it works for glob patterns and for
/// paths that no longer exist.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal =
                    matches!(out.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn absolutize(root: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&root.join(path))
    }
}

/// Resolve a glob pattern against `root`, returning it with forward slashes.
pub fn absolutize_pattern(root: &Path, pattern: &str) -> String {
    to_slash(&absolutize(root, pattern))
}

/// The literal directory a pattern starts from: every segment before the
/// first one containing a wildcard. A pattern without wildcards names a
/// single file, so its parent directory is returned.
pub fn literal_base(pattern: &str) -> PathBuf {
    let segments = literal_segments(pattern);
    let mut base = PathBuf::new();
    for segment in &segments {
        base.push(segment);
    }
    base
}

fn literal_segments(pattern: &str) -> Vec<String> {
    let path = Path::new(pattern);
    let mut segments = Vec::new();
    let mut saw_wildcard = false;
    for component in path.components() {
        let text = component.as_os_str().to_string_lossy();
        if is_wildcard_segment(&text) {
            saw_wildcard = true;
            break;
        }
        segments.push(text.into_owned());
    }
    if !saw_wildcard {
        segments.pop();
    }
    segments
}

/// Deepest directory that contains everything the given (absolute) patterns
/// can match: the longest common prefix of their literal segments.
///
/// Returns `None` for an empty pattern list.
pub fn watch_root<S: AsRef<str>>(patterns: &[S]) -> Option<PathBuf> {
    let mut iter = patterns.iter();
    let mut common = literal_segments(iter.next()?.as_ref());

    for pattern in iter {
        let segments = literal_segments(pattern.as_ref());
        let shared = common
            .iter()
            .zip(segments.iter())
            .take_while(|(a, b)| a == b)
            .count();
        common.truncate(shared);
    }

    let mut root = PathBuf::new();
    for segment in &common {
        root.push(segment);
    }
    Some(root)
}
