use std::{
    fs,
    path::{Path, PathBuf},
};

#[test]
fn versions_agree() {
    let root = project_root();
    let workspace = fs::read_to_string(root.join("Cargo.toml")).unwrap();
    let package = fs::read_to_string(root.join("crates/cmdflag/Cargo.toml")).unwrap();
    let version = |manifest: &str| {
        manifest
            .lines()
            .find_map(|line| line.strip_prefix("version = \""))
            .and_then(|rest| rest.split_once('"'))
            .map(|(version, _)| version.to_string())
    };
    assert!(version(&workspace).is_some());
    assert_eq!(version(&workspace), version(&package), "update the version in both manifests");
}

#[test]
fn source_hygiene() {
    let root = project_root();
    let mut files = Vec::new();
    for dir in ["crates", "xtask"] {
        rust_files(&root.join(dir), &mut files);
    }
    assert!(!files.is_empty());

    for file in files {
        let text = fs::read_to_string(&file).unwrap();
        for (idx, line) in text.lines().enumerate() {
            let at = || format!("{}:{}", file.display(), idx + 1);
            assert!(!line.ends_with(' '), "trailing whitespace at {}", at());
            assert!(!line.contains('\t'), "tab at {}", at());
            assert!(!line.contains(concat!("dbg", "!(")), "leftover debug print at {}", at());
        }
    }
}

fn rust_files(dir: &Path, acc: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if path.file_name().map_or(false, |it| it == "target") {
                continue;
            }
            rust_files(&path, acc);
        } else if path.extension().map_or(false, |it| it == "rs") {
            acc.push(path);
        }
    }
}

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap().to_path_buf()
}
