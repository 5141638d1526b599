// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rendering the workspace Makefile from the bundled template.
//!
//! The exporter generates a Makefile of its own; we overwrite it with one
//! that also knows how to deploy uvisor and drive pyocd.

use std::path::Path;

use anyhow::{Context, Result};

const TEMPLATE: &str = include_str!("../Makefile.template");
const TEMPLATE_FILE: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/Makefile.template");

/// Renders the bundled template and overwrites the Makefile in the
/// workspace root.
pub fn patch(
    workspace: &Path,
    target: &str,
    toolchain: &str,
    uvisor_dir: &Path,
    importer_dir: &Path,
) -> Result<()> {
    let vars = [
        ("workspace_dir", workspace.display().to_string()),
        ("uvisor_dir", uvisor_dir.display().to_string()),
        ("importer_dir", importer_dir.display().to_string()),
        ("target", target.to_string()),
        ("toolchain", toolchain.to_string()),
        ("template_file", TEMPLATE_FILE.to_string()),
    ];

    let makefile = workspace.join("Makefile");
    log::info!("writing {}", makefile.display());

    std::fs::write(&makefile, substitute(TEMPLATE, &vars))
        .with_context(|| format!("failed to write {}", makefile.display()))?;

    Ok(())
}

/// Replaces `${name}` and `$name` references with values from `vars`; `$$`
/// renders a literal `$`. Anything else involving `$`, including references
/// to names missing from `vars`, is passed through unchanged.
fn substitute(template: &str, vars: &[(&str, String)]) -> String {
    let lookup = |name: &str| {
        vars.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(i) = rest.find('$') {
        out.push_str(&rest[..i]);
        let tail = &rest[i + 1..];

        if let Some(after) = tail.strip_prefix('$') {
            out.push('$');
            rest = after;
            continue;
        }

        if let Some(braced) = tail.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                if let Some(value) = lookup(&braced[..end]) {
                    out.push_str(value);
                    rest = &braced[end + 1..];
                    continue;
                }
            }
        } else {
            let len = ident_len(tail);
            if len > 0 {
                if let Some(value) = lookup(&tail[..len]) {
                    out.push_str(value);
                    rest = &tail[len..];
                    continue;
                }
            }
        }

        // Not a reference we can resolve; emit the `$` and move on.
        out.push('$');
        rest = tail;
    }

    out.push_str(rest);
    out
}

fn ident_len(s: &str) -> usize {
    s.bytes()
        .enumerate()
        .take_while(|&(i, b)| {
            if i == 0 {
                b.is_ascii_alphabetic() || b == b'_'
            } else {
                b.is_ascii_alphanumeric() || b == b'_'
            }
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn vars() -> Vec<(&'static str, String)> {
        vec![
            ("target", "K64F".to_string()),
            ("toolchain", "GCC_ARM".to_string()),
        ]
    }

    #[test]
    fn substitutes_braced_and_bare_references() {
        assert_eq!(
            substitute("TARGET := ${target}\nTC := $toolchain\n", &vars()),
            "TARGET := K64F\nTC := GCC_ARM\n"
        );
    }

    #[test]
    fn unknown_references_pass_through() {
        assert_eq!(
            substitute("${nope} $nope $(MAKE) ${unclosed", &vars()),
            "${nope} $nope $(MAKE) ${unclosed"
        );
    }

    #[test]
    fn dollar_dollar_escapes() {
        assert_eq!(
            substitute("cost: $$5 for ${target}", &vars()),
            "cost: $5 for K64F"
        );
    }

    #[test]
    fn patch_overwrites_the_workspace_makefile() {
        let ws = tempfile::tempdir().unwrap();
        std::fs::write(ws.path().join("Makefile"), indoc! {"
            # exporter output
            all:
        "})
        .unwrap();

        patch(
            ws.path(),
            "K64F",
            "GCC_ARM",
            Path::new("/deps/uvisor"),
            Path::new("/deps/importer"),
        )
        .unwrap();

        let text =
            std::fs::read_to_string(ws.path().join("Makefile")).unwrap();
        assert!(text.contains("TARGET     := K64F"));
        assert!(text.contains("TOOLCHAIN  := GCC_ARM"));
        assert!(text.contains("UVISOR_DIR   := /deps/uvisor"));
        assert!(text.contains("IMPORTER_DIR := /deps/importer"));
        assert!(!text.contains("exporter output"));
        assert!(!text.contains("${"));
    }
}
