// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Patching the PyOCD debug launch configuration.
//!
//! The exporter drops a generic `<target>_pyocd_settings.launch` in the
//! workspace. We rename it after the workspace and point the debug session
//! at the uvisor image, so that the debugger loads uvisor's symbols and
//! stops at its entry point instead of `main`.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use path_slash::PathExt;
use xmltree::{Element, XMLNode};

use crate::uvisor;

const OTHER_RUN_COMMANDS: &str =
    "ilg.gnuarmeclipse.debug.gdbjtag.pyocd.otherRunCommands";
const STOP_AT: &str = "org.eclipse.cdt.debug.gdbjtag.core.stopAt";
const PROGRAM_NAME: &str = "org.eclipse.cdt.launch.PROGRAM_NAME";
const DEBUG_NAME: &str = "org.eclipse.cdt.dsf.gdb.DEBUG_NAME";

/// Renames the exported launch file to `PyOCD_<target>_<workspace>.launch`
/// and rewrites its debugger settings. All four attributes must be present;
/// a launch file missing any of them is not one we know how to patch, and
/// is left with its original contents.
pub fn patch(
    workspace: &Path,
    target: &str,
    toolchain: &str,
    uvisor_dir: &Path,
) -> Result<()> {
    let workspace_name = workspace
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            anyhow!("workspace {} has no name", workspace.display())
        })?;

    let old_launcher =
        workspace.join(format!("{}_pyocd_settings.launch", target));
    let new_launcher =
        workspace.join(format!("PyOCD_{}_{}.launch", target, workspace_name));

    log::info!(
        "{} -> {}",
        old_launcher.display(),
        new_launcher.display()
    );
    std::fs::rename(&old_launcher, &new_launcher).with_context(|| {
        format!("failed to rename {}", old_launcher.display())
    })?;

    let contents = std::fs::read(&new_launcher)?;
    let mut tree = Element::parse(&contents[..])?;

    let elf = uvisor::elf_name(uvisor_dir, target)?;
    set_string_attribute(
        &mut tree,
        OTHER_RUN_COMMANDS,
        &format!(
            "add-symbol-file {} __uvisor_main_start",
            elf.to_slash_lossy()
        ),
    )?;
    set_string_attribute(&mut tree, STOP_AT, "uvisor_init")?;
    set_string_attribute(
        &mut tree,
        PROGRAM_NAME,
        &format!("BUILD/{}/{}/{}.elf", target, toolchain, workspace_name),
    )?;
    set_string_attribute(&mut tree, DEBUG_NAME, "arm-none-eabi-gdb")?;

    let out = std::fs::File::create(&new_launcher).with_context(|| {
        format!("failed to write {}", new_launcher.display())
    })?;
    tree.write(out)?;

    Ok(())
}

/// Overwrites the `value` of the `stringAttribute` element with the given
/// `key`, anywhere in the tree.
fn set_string_attribute(
    el: &mut Element,
    key: &str,
    value: &str,
) -> Result<()> {
    match find_string_attribute(el, key) {
        Some(attr) => {
            attr.attributes
                .insert("value".to_string(), value.to_string());
            Ok(())
        }
        None => bail!("launch file has no stringAttribute with key {}", key),
    }
}

fn find_string_attribute<'a>(
    el: &'a mut Element,
    key: &str,
) -> Option<&'a mut Element> {
    if el.name == "stringAttribute"
        && el.attributes.get("key").map(String::as_str) == Some(key)
    {
        return Some(el);
    }

    for child in el.children.iter_mut() {
        if let XMLNode::Element(child) = child {
            if let Some(found) = find_string_attribute(child, key) {
                return Some(found);
            }
        }
    }

    None
}
