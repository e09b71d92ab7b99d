//! Hygiene: enforces coding standards at test time.
//!
//! Scans the crate's production sources (sibling `_test.rs` files excluded)
//! for patterns the project does not allow. Every budget is zero. Raising one
//! requires removing an existing occurrence first.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    reason: &'static str,
}

const BUDGETS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, reason: "panics on None/Err" },
    Budget { pattern: ".expect(", max: 0, reason: "panics on None/Err" },
    Budget { pattern: "panic!(", max: 0, reason: "crashes the host" },
    Budget { pattern: "unreachable!(", max: 0, reason: "crashes the host" },
    Budget { pattern: "todo!(", max: 0, reason: "unfinished code" },
    Budget { pattern: "unimplemented!(", max: 0, reason: "unfinished code" },
    Budget { pattern: "let _ =", max: 0, reason: "discards a result without inspecting it" },
    Budget { pattern: ".ok()", max: 0, reason: "discards an error without inspecting it" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, reason: "hides unused code" },
    Budget { pattern: "println!(", max: 0, reason: "logging goes through tracing" },
    Budget { pattern: "eprintln!(", max: 0, reason: "logging goes through tracing" },
];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

#[test]
fn sources_were_found() {
    assert!(source_files().iter().any(|f| f.path.ends_with("lib.rs")));
}

#[test]
fn pattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, n)| n).sum();
        if count > budget.max {
            let detail = found.iter().map(|(p, n)| format!("    {p}: {n}")).collect::<Vec<_>>().join("\n");
            failures.push(format!(
                "`{}` budget exceeded ({}): found {count}, max {}\n{detail}",
                budget.pattern, budget.reason, budget.max
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn every_test_file_is_wired() {
    let files = source_files();
    let Ok(entries) = fs::read_dir("src") else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        let Some(stem) = name.strip_suffix("_test.rs") else {
            continue;
        };
        let owner = format!("{stem}.rs");
        let wired = files
            .iter()
            .any(|f| f.path.ends_with(&owner) && f.content.contains(&format!("#[path = \"{name}\"]")));
        assert!(wired, "{name} is not included by {owner}");
    }
}
