// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Runs `mbed export` for the chosen target/IDE with the workspace as the
/// working directory. The exporter's exit status is the only
/// success/failure signal we get.
pub fn run(
    workspace: &Path,
    target: &str,
    ide: &str,
    verbose: bool,
) -> Result<()> {
    log::info!("exporting {} for {}", workspace.display(), ide);

    let mut cmd = Command::new("mbed");
    cmd.arg("export").arg("-m").arg(target).arg("-i").arg(ide);

    if verbose {
        cmd.arg("-v");
    }

    cmd.current_dir(workspace);

    let status = cmd
        .status()
        .with_context(|| format!("failed to run mbed export ({:?})", cmd))?;

    if !status.success() {
        bail!("mbed export failed, see output for details");
    }

    Ok(())
}
