// tests/patterns.rs

mod common;
use crate::common::{abs, abs_str, project_fs, ROOT};

use std::path::{Path, PathBuf};

use buildjs::errors::BuildjsError;
use buildjs::resolve::resolve_targets;
use buildjs::watch::path_utils::{literal_base, normalize, watch_root};
use buildjs::watch::patterns::{compile_glob, normalize_glob};
use buildjs::watch::{expand, expand_build, includes_file, matches, PatternSet};
use buildjs_test_utils::builders::ConfigBuilder;

fn set(patterns: &[&str]) -> PatternSet {
    PatternSet::new(patterns.iter().map(|p| abs_str(p))).unwrap()
}

#[test]
fn double_star_glued_to_extension_is_recursive() {
    assert_eq!(normalize_glob("src/**.js"), "src/**/*.js");

    let patterns = set(&["src/**.js"]);
    assert!(matches(&abs("src/a.js"), &patterns));
    assert!(matches(&abs("src/x/y/b.js"), &patterns));
    assert!(!matches(&abs("src/a.ts"), &patterns));
    assert!(!matches(&abs("lib/a.js"), &patterns));
}

#[test]
fn single_star_stays_within_one_segment() {
    let patterns = set(&["src/*.js"]);
    assert!(matches(&abs("src/a.js"), &patterns));
    assert!(!matches(&abs("src/x/b.js"), &patterns));
}

#[test]
fn whole_segment_double_star_matches_zero_or_more_directories() {
    let patterns = set(&["src/**/*.js"]);
    assert!(matches(&abs("src/a.js"), &patterns));
    assert!(matches(&abs("src/deep/er/a.js"), &patterns));
}

#[test]
fn glued_double_star_inside_a_name() {
    assert_eq!(normalize_glob("src/a**b.js"), "src/{a*b.js,a*/**/*b.js}");
    assert_eq!(normalize_glob("src/**/x/*.js"), "src/**/x/*.js");
}

#[test]
fn invalid_glob_is_reported_with_its_pattern() {
    let err = compile_glob("src/[.js").unwrap_err();
    match err {
        BuildjsError::Glob { pattern, .. } => assert_eq!(pattern, "src/[.js"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn literal_paths_match_only_themselves() {
    let patterns = PatternSet::with_literals(
        vec![abs_str("src/*.test.js")],
        vec![
            abs_str("src/[legacy]/a.js"),
            abs_str("src/*.js"),
            abs_str("src/{a,b}.js"),
        ],
    )
    .unwrap();

    assert!(matches(&abs("src/{a,b}.js"), &patterns));
    assert!(!matches(&abs("src/a.js"), &patterns));

    assert!(matches(&abs("src/[legacy]/a.js"), &patterns));
    assert!(!matches(&abs("src/l/a.js"), &patterns));
    assert!(matches(&abs("src/*.js"), &patterns));
    assert!(!matches(&abs("src/b.js"), &patterns));
    assert!(matches(&abs("src/b.test.js"), &patterns));
    assert_eq!(patterns.len(), 4);
    assert_ne!(
        patterns,
        set(&["src/*.test.js", "src/[legacy]/a.js", "src/*.js", "src/{a,b}.js"])
    );
}

#[test]
fn includes_file_is_pure_and_idempotent() {
    let cfg = ConfigBuilder::new(ROOT)
        .target("src/app.js", "dist/app.js")
        .target("src/admin.js", "dist/admin.js")
        .source("src/**/*.js")
        .build();
    let builds = resolve_targets(&cfg).into_result().unwrap();
    let app = &builds[0];

    // Nothing exists on disk; matching never looks.
    for path in [abs("src/nothing/here.js"), abs("src/admin.js")] {
        let first = includes_file(&path, app);
        let second = includes_file(&path, app);
        assert_eq!(first, second);
    }
    assert!(includes_file(&abs("src/nothing/here.js"), app));
}

#[test]
fn expand_walks_from_literal_base_and_skips_hidden() {
    let fs = project_fs(&[
        "src/a.js",
        "src/lib/b.js",
        "src/.cache/c.js",
        "src/readme.md",
        "test/d.js",
    ]);

    let files = expand(&fs, &set(&["src/**/*.js"])).unwrap();
    let expected: Vec<PathBuf> = vec![abs("src/a.js"), abs("src/lib/b.js")];
    assert_eq!(files.into_iter().collect::<Vec<_>>(), expected);
}

#[cfg(unix)]
#[test]
fn expand_survives_symlink_loops() -> Result<(), Box<dyn std::error::Error>> {
    use buildjs::fs::RealFileSystem;

    let dir = tempfile::tempdir()?;
    let root = dir.path().canonicalize()?;
    std::fs::create_dir_all(root.join("src/lib"))?;
    std::fs::write(root.join("src/a.js"), "// a\n")?;
    std::fs::write(root.join("src/lib/b.js"), "// b\n")?;
    std::os::unix::fs::symlink(root.join("src"), root.join("src/lib/loop"))?;

    let pattern = format!("{}/src/**/*.js", root.to_string_lossy());
    let files = expand(&RealFileSystem, &PatternSet::new([pattern])?)?;

    let expected: Vec<PathBuf> = vec![root.join("src/a.js"), root.join("src/lib/b.js")];
    assert_eq!(files.into_iter().collect::<Vec<_>>(), expected);
    Ok(())
}

#[test]
fn expand_with_missing_base_is_empty() {
    let fs = project_fs(&["src/a.js"]);
    let files = expand(&fs, &set(&["vendor/**/*.js"])).unwrap();
    assert!(files.is_empty());
}

#[test]
fn expand_build_drops_ignored_files() {
    let fs = project_fs(&["src/app.js", "src/admin.js", "src/util.js"]);
    let cfg = ConfigBuilder::new(ROOT)
        .target("src/app.js", "dist/app.js")
        .target("src/admin.js", "dist/admin.js")
        .source("src/*.js")
        .build();
    let builds = resolve_targets(&cfg).into_result().unwrap();

    let files = expand_build(&fs, &builds[0]).unwrap();
    assert!(files.contains(&abs("src/app.js")));
    assert!(files.contains(&abs("src/util.js")));
    assert!(!files.contains(&abs("src/admin.js")));
}

#[test]
fn literal_base_and_watch_root() {
    assert_eq!(literal_base("/p/src/**/*.js"), PathBuf::from("/p/src"));
    assert_eq!(literal_base("/p/src/app.js"), PathBuf::from("/p/src"));

    let root = watch_root(&["/p/src/a/*.js", "/p/src/b/**/*.js"]).unwrap();
    assert_eq!(root, PathBuf::from("/p/src"));
    assert!(watch_root::<&str>(&[]).is_none());
}

#[test]
fn normalize_is_lexical() {
    assert_eq!(normalize(Path::new("/p/src/../lib/./a.js")), PathBuf::from("/p/lib/a.js"));
    assert_eq!(normalize(Path::new("../a/../b")), PathBuf::from("../b"));
}
