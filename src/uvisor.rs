// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locating the uvisor dependency tree inside an exported workspace.
//!
//! `mbed deploy` leaves an `mbed-os` checkout somewhere below the workspace
//! root; the uvisor importer lives at a fixed path inside it, and the
//! uvisor checkout itself at a fixed path inside that.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use walkdir::WalkDir;

/// Relative path from an `mbed-os` checkout to the uvisor importer.
const IMPORTER_SUBDIR: &str = "features/FEATURE_UVISOR/importer";

/// Walks the workspace tree and derives the uvisor importer directory from
/// the first `mbed-os` checkout found.
pub fn find_importer_dir(workspace: &Path) -> Result<PathBuf> {
    for entry in WalkDir::new(workspace) {
        let entry = entry?;
        if entry.file_type().is_dir() && entry.file_name() == "mbed-os" {
            let importer = entry.path().join(IMPORTER_SUBDIR);
            if !importer.is_dir() {
                bail!("uvisor not deployed in {}", entry.path().display());
            }
            return Ok(importer);
        }
    }

    bail!(
        "mbed-os directory was not found under {}",
        workspace.display()
    );
}

/// Returns the uvisor checkout nested inside the importer directory.
pub fn uvisor_dir(importer_dir: &Path) -> Result<PathBuf> {
    let dir = importer_dir.join("TARGET_IGNORE/uvisor");
    if !dir.is_dir() {
        bail!("uvisor checkout missing at {}", dir.display());
    }
    Ok(dir)
}

/// Path of the prelinked uvisor debug image for the given target.
pub fn elf_name(uvisor_dir: &Path, target: &str) -> Result<PathBuf> {
    match target {
        "K64F" => Ok(uvisor_dir.join(
            "platform/kinetis/debug/\
             configuration_kinetis_cortex_m4_0x1fff0000.elf",
        )),
        _ => bail!("unsupported target - {}", target),
    }
}
