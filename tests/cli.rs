//! End-to-end tests running the built binary against temporary project trees.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const MIT_TEXT: &str = r#"MIT License

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software.

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.
"#;

const BSD3_TEXT: &str = r#"Redistribution and use in source and binary forms, with or without
modification, are permitted provided that the following conditions are met:

1. Redistributions of source code must retain the above copyright notice.
2. Redistributions in binary form must reproduce the above copyright notice.
3. Neither the name of the copyright holder nor the names of its contributors
   may be used to endorse or promote products derived from this software
   without specific prior written permission.
"#;

/// Workspace with `MIT/`, `BSD3/` and `no-licence/` projects.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for (name, licence) in [("MIT", Some(MIT_TEXT)), ("BSD3", Some(BSD3_TEXT)), ("no-licence", None)] {
            let project = dir.path().join(name);
            std::fs::create_dir_all(&project).unwrap();
            std::fs::write(project.join("README.md"), "# project").unwrap();
            if let Some(text) = licence {
                std::fs::write(project.join("LICENSE"), text).unwrap();
            }
        }
        Self { dir }
    }

    fn project(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_licence-compliance-checker"))
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn results(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| panic!("invalid json {:?}: {}", stdout, e))
}

fn projects(results: &Value, bucket: &str) -> Vec<String> {
    results[bucket]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["project"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn fails_when_project_path_does_not_exist() {
    let fx = Fixture::new();
    let missing = fx.project("does-not-exist");
    let output = fx.run(&["-A", "-r", "MIT", &missing]);
    assert!(!output.status.success());

    let results = results(&output);
    assert_eq!(projects(&results, "unidentifiable"), vec![missing]);
    assert!(projects(&results, "compliant").is_empty());
    assert!(projects(&results, "restricted").is_empty());
    assert!(projects(&results, "ignored").is_empty());
}

#[test]
fn restricted_licence_fails_the_check() {
    let fx = Fixture::new();
    let (mit, bsd3) = (fx.project("MIT"), fx.project("BSD3"));
    let output = fx.run(&["-A", "-r", "MIT", &mit, &bsd3]);
    assert_eq!(output.status.code(), Some(1));

    let results = results(&output);
    assert_eq!(projects(&results, "restricted"), vec![mit]);
    assert_eq!(projects(&results, "compliant"), vec![bsd3]);
    assert_eq!(results["restricted"][0]["matches"][0]["license"], "MIT");
}

#[test]
fn fails_when_project_has_no_licence_file() {
    let fx = Fixture::new();
    let no_licence = fx.project("no-licence");
    let output = fx.run(&["-A", "-r", "MIT", &no_licence]);
    assert!(!output.status.success());

    let results = results(&output);
    assert_eq!(projects(&results, "unidentifiable"), vec![no_licence]);
    assert_eq!(
        results["unidentifiable"][0]["error"],
        "no license file was found"
    );
    assert!(results["unidentifiable"][0].get("matches").is_none());
}

#[test]
fn unrestricted_licences_are_compliant_and_sorted() {
    let fx = Fixture::new();
    let (mit, bsd3) = (fx.project("MIT"), fx.project("BSD3"));
    let output = fx.run(&["-A", "-r", "BSD", &mit, &bsd3]);
    assert!(output.status.success());

    let results = results(&output);
    assert_eq!(projects(&results, "compliant"), vec![bsd3, mit]);
    assert!(projects(&results, "restricted").is_empty());
    assert!(projects(&results, "unidentifiable").is_empty());
    assert!(projects(&results, "ignored").is_empty());
}

#[test]
fn overridden_licence_is_used() {
    let fx = Fixture::new();
    let mit = fx.project("MIT");
    let output = fx.run(&["-A", "-r", "MIT", "-o", &format!("{}=BSD", mit), &mit]);
    assert!(output.status.success());

    let results = results(&output);
    assert_eq!(projects(&results, "compliant"), vec![mit]);
    assert_eq!(results["compliant"][0]["matches"][0]["license"], "BSD");
    assert_eq!(results["compliant"][0]["matches"][0]["confidence"], 0.0);
}

#[test]
fn ignored_project_is_not_checked() {
    let fx = Fixture::new();
    let (mit, bsd3) = (fx.project("MIT"), fx.project("BSD3"));
    let output = fx.run(&["-A", "-r", "MIT", "-i", &mit, &mit, &bsd3]);
    assert!(output.status.success());

    let results = results(&output);
    assert_eq!(projects(&results, "ignored"), vec![mit]);
    assert_eq!(projects(&results, "compliant"), vec![bsd3]);
}

#[test]
fn silent_by_default() {
    let fx = Fixture::new();
    let output = fx.run(&["-r", "BSD", &fx.project("MIT")]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());

    let output = fx.run(&["-r", "MIT", &fx.project("MIT")]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn show_errors_only_prints_on_failure() {
    let fx = Fixture::new();
    let output = fx.run(&["-E", "-r", "BSD", &fx.project("MIT")]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let output = fx.run(&["-E", "-r", "MIT", &fx.project("MIT")]);
    assert!(!output.status.success());
    assert_eq!(projects(&results(&output), "restricted"), vec![fx.project("MIT")]);
}

#[test]
fn table_format_lists_projects() {
    let fx = Fixture::new();
    let output = fx.run(&["-A", "--format", "table", "-r", "MIT", &fx.project("BSD3")]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BSD-3-Clause"));
    assert!(stdout.contains("BSD3"));
}

#[test]
fn restricted_licence_is_required() {
    let fx = Fixture::new();
    let output = fx.run(&[&fx.project("MIT")]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("restricted licence"));
}

#[test]
fn restricted_licences_from_config_file() {
    let fx = Fixture::new();
    let config: PathBuf = fx.path().join("policy.toml");
    std::fs::write(
        &config,
        format!(
            "restricted_licences = [\"MIT\"]\n\n[overridden_project_licences]\n{:?} = \"ISC\"\n",
            fx.project("MIT")
        ),
    )
    .unwrap();

    let output = fx.run(&[
        "-A",
        "--config",
        config.to_str().unwrap(),
        &fx.project("MIT"),
    ]);
    assert!(output.status.success());
    let results = results(&output);
    assert_eq!(results["compliant"][0]["matches"][0]["license"], "ISC");
}

#[test]
fn log_level_writes_to_stderr() {
    let fx = Fixture::new();
    let output = fx.run(&["-L", "info", "-r", "MIT", &fx.project("BSD3")]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Licences are compliant"));
}

#[test]
fn help_lists_flags() {
    let fx = Fixture::new();
    let output = fx.run(&["--help"]);
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "-h, --help",
        "-o, --override-licence",
        "-m, --override-module-licence",
        "-i, --ignore-project",
        "-r, --restricted-licence",
        "-L, --log-level",
        "-A, --show-compliance-all",
        "-E, --show-compliance-errors",
        "--check-go-modules",
    ] {
        assert!(help.contains(flag), "missing {} in {}", flag, help);
    }
}

#[cfg(unix)]
#[test]
fn external_detector_command() {
    let fx = Fixture::new();
    let script = fx.path().join("detector.sh");
    std::fs::write(
        &script,
        "#!/bin/sh\necho '[{\"project\":\"b\",\"matches\":[{\"license\":\"GPL-3.0\",\"confidence\":0.9}]},{\"project\":\"a\",\"matches\":[{\"license\":\"MIT\",\"confidence\":0.95,\"file\":\"LICENSE\"}]}]'\n",
    )
    .unwrap();

    let command = format!("sh {}", script.display());
    let output = fx.run(&["-A", "-r", "GPL-3.0", "--detector-command", &command, "a", "b"]);
    assert_eq!(output.status.code(), Some(1));
    let results = results(&output);
    assert_eq!(projects(&results, "compliant"), vec!["a"]);
    assert_eq!(projects(&results, "restricted"), vec!["b"]);
}

#[cfg(unix)]
#[test]
fn external_detector_failure_is_fatal() {
    let fx = Fixture::new();
    let output = fx.run(&["-A", "-r", "MIT", "--detector-command", "false", "a"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
