use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use elle::lang::{directives, keywords};

/// Guardrail against reintroducing stringly-typed vocabulary checks.
///
/// A coarse safety net: it looks for patterns like `== "struct"` or `"alloc" =>` in Rust source files,
/// where callers should go through `elle_core::lang` registries (`keywords::from_str`,
/// `directives::from_str`, ...) instead.
///
/// Notes:
/// - Occurrences in `crates/elle_core/src/lang/**` (the registries themselves) and in tests are allowed.
/// - Inline `#[cfg(test)]` modules are not detected; keep such comparisons out of them too.
#[test]
fn no_new_stringly_vocab_checks_in_rust_sources() {
    let root = repo_root();
    let spellings = vocabulary_spellings();
    let mut offenders: Vec<(PathBuf, usize, String)> = Vec::new();

    for dir in [root.join("src"), root.join("crates")] {
        if dir.exists() {
            scan_dir(&root, &dir, &spellings, &mut offenders);
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::new();
        msg.push_str("Found potential stringly-typed vocabulary checks. Prefer elle_core registries.\n\n");
        for (path, line_no, line) in offenders.into_iter().take(80) {
            msg.push_str(&format!(
                "- {}:{}: {}\n",
                path.strip_prefix(&root).unwrap_or(&path).display(),
                line_no,
                line.trim()
            ));
        }
        panic!("{msg}");
    }
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn vocabulary_spellings() -> Vec<&'static str> {
    let mut set: BTreeSet<&'static str> = BTreeSet::new();
    for k in keywords::KEYWORDS {
        set.insert(k.canonical);
    }
    for d in directives::DIRECTIVES {
        set.insert(d.name);
    }
    set.into_iter().collect()
}

fn is_allowed_file(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy().replace('\\', "/");
    if !rel.ends_with(".rs") {
        return true;
    }
    // Registries define the spellings.
    if rel.starts_with("crates/elle_core/src/lang/") {
        return true;
    }
    if rel.starts_with("tests/") || rel.contains("/tests/") || rel.ends_with("/tests.rs") {
        return true;
    }
    false
}

fn scan_dir(root: &Path, dir: &Path, spellings: &[&'static str], offenders: &mut Vec<(PathBuf, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(root, &path, spellings, offenders);
            continue;
        }
        if is_allowed_file(root, &path) {
            continue;
        }
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in contents.lines().enumerate() {
            if is_suspicious_line(line, spellings) {
                offenders.push((path.clone(), idx + 1, line.to_string()));
            }
        }
    }
}

fn is_suspicious_line(line: &str, spellings: &[&'static str]) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        return false;
    }

    // `... == "spelling"` and `"spelling" => ...`
    spellings.iter().any(|s| {
        let eq = format!("== \"{s}\"");
        let arm = format!("\"{s}\" =>");
        line.contains(&eq) || line.contains(&arm)
    })
}

#[test]
fn suspicious_line_detection() {
    let spellings = ["struct", "alloc"];
    assert!(is_suspicious_line(r#"if name == "struct" {"#, &spellings));
    assert!(is_suspicious_line(r#"    "alloc" => Directive::Alloc,"#, &spellings));
    assert!(!is_suspicious_line(r#"// name == "struct""#, &spellings));
    assert!(!is_suspicious_line(r#"writer.write("struct ");"#, &spellings));
}
