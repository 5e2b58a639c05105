//! Integration tests for the generated Markdown document.

use assert_cmd::Command;
use similar_asserts::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp repo");
        fs::create_dir(dir.path().join("repo")).expect("mkdir repo");
        Self { dir }
    }

    fn root(&self) -> PathBuf {
        self.dir.path().join("repo")
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("out.md")
    }

    fn write(&self, rel: &str, content: &str) -> &Self {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, content).expect("write fixture");
        self
    }

    fn export(&self, extra: &[&str]) -> String {
        run_export(&self.root(), &self.output(), extra);
        fs::read_to_string(self.output()).expect("read output")
    }
}

/// Runs from the fixture's temp dir with no inherited config or log env.
fn run_export(root: &Path, output: &Path, extra: &[&str]) {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repo-to-md"));
    cmd.arg(root.to_str().expect("root str"))
        .arg(output.to_str().expect("output str"))
        .args(extra)
        .current_dir(root.parent().expect("fixture dir"))
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("REPO_TO_MD_") {
            cmd.env_remove(key);
        }
    }
    cmd.assert().success();
}

#[test]
fn scenario_hidden_dir_and_ignored_image() {
    let repo = TestRepo::new();
    repo.write("a.py", "print(1)")
        .write(".git/HEAD", "ref: refs/heads/main\n")
        .write("img.png", "\u{89}PNG")
        .write(".gitignore", "*.png\n");

    let out = repo.export(&[]);
    assert_eq!(out, "\n# a.py\n```python\nprint(1)\n```\n");
}

#[test]
fn one_block_per_file_in_lexical_order() {
    let repo = TestRepo::new();
    repo.write("zeta.rs", "fn z() {}")
        .write("alpha/beta.go", "package alpha")
        .write("alpha/aardvark.c", "int x;")
        .write("mid.txt", "plain");

    let out = repo.export(&[]);
    let expected = concat!(
        "\n# alpha/aardvark.c\n```c\nint x;\n```\n",
        "\n# alpha/beta.go\n```go\npackage alpha\n```\n",
        "\n# mid.txt\n```\nplain\n```\n",
        "\n# zeta.rs\n```rust\nfn z() {}\n```\n",
    );
    assert_eq!(out, expected);
}

#[test]
fn directory_pattern_excludes_whole_subtree() {
    let repo = TestRepo::new();
    repo.write(".gitignore", "# generated\ngenerated/\n")
        .write("generated/api.rs", "fn api() {}")
        .write("generated/nested/deep.py", "x = 1")
        .write("src/lib.rs", "pub fn lib() {}");

    let out = repo.export(&[]);
    assert!(out.contains("# src/lib.rs"));
    assert!(!out.contains("generated/"));
    assert!(!out.contains("deep.py"));
}

#[test]
fn skip_extensions_apply_without_ignore_file() {
    let repo = TestRepo::new();
    repo.write("config.yaml", "a: 1")
        .write("settings.json", "{}")
        .write("vite.config.ts", "export default {}")
        .write("app.ts", "export const x = 1;");

    let out = repo.export(&[]);
    assert_eq!(out, "\n# app.ts\n```typescript\nexport const x = 1;\n```\n");
}

#[test]
fn malformed_ignore_file_falls_back_to_builtins() {
    let repo = TestRepo::new();
    repo.write("keep.log.txt", "kept").write("node_modules/dep/index.js", "dep");
    fs::write(repo.root().join(".gitignore"), [0xff, 0xfe, 0xfd]).expect("write bad ignore");

    let out = repo.export(&[]);
    assert_eq!(out, "\n# keep.log.txt\n```\nkept\n```\n");
}

#[test]
fn rerun_appends_a_second_copy() {
    let repo = TestRepo::new();
    repo.write("main.py", "print('hi')");

    let first = repo.export(&[]);
    let second = repo.export(&[]);
    assert_eq!(second, format!("{first}{first}"));
}

#[test]
fn output_inside_root_is_not_emitted() {
    let repo = TestRepo::new();
    repo.write("a.rs", "fn a() {}");
    let output = repo.root().join("ALL.md");

    run_export(&repo.root(), &output, &[]);
    run_export(&repo.root(), &output, &[]);

    let out = fs::read_to_string(&output).expect("read output");
    assert_eq!(out.matches("# a.rs").count(), 2);
    assert!(!out.contains("# ALL.md"));
}

#[test]
fn exclude_flag_adds_patterns() {
    let repo = TestRepo::new();
    repo.write("a.rs", "fn a() {}").write("b_test.rs", "fn t() {}").write("docs/guide.md", "# Guide");

    let out = repo.export(&["--exclude", "*_test.rs,docs/"]);
    assert_eq!(out, "\n# a.rs\n```rust\nfn a() {}\n```\n");
}

#[test]
fn custom_ignore_file_name() {
    let repo = TestRepo::new();
    repo.write(".mdignore", "secret.txt\n").write("secret.txt", "hidden").write("open.txt", "shown");

    let out = repo.export(&["--ignore-file", ".mdignore"]);
    assert_eq!(out, "\n# open.txt\n```\nshown\n```\n");
}

#[test]
fn report_flag_writes_json_stats() {
    let repo = TestRepo::new();
    repo.write("a.py", "print(1)").write("logo.png", "png").write(".env", "X=1");
    let report = repo.dir.path().join("report.json");

    repo.export(&["--report", report.to_str().expect("report str")]);

    let raw = fs::read_to_string(&report).expect("read report");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("parse report");
    assert_eq!(value["files_included"], serde_json::json!(1));
    assert_eq!(value["files_skipped"]["extension"], serde_json::json!(1));
    assert_eq!(value["files_skipped"]["hidden"], serde_json::json!(1));
}

#[test]
fn config_file_in_working_directory_is_applied() {
    let repo = TestRepo::new();
    repo.write("a.rs", "fn a() {}").write("notes.txt", "todo");
    fs::write(repo.dir.path().join("repo-to-md.toml"), "exclude = [\"*.txt\"]\n")
        .expect("write config");

    let out = repo.export(&[]);
    assert_eq!(out, "\n# a.rs\n```rust\nfn a() {}\n```\n");
}
