// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use anyhow::{Context, Result};
use structopt::StructOpt;

mod export;
mod launch;
mod makefile;
mod uvisor;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "eclipse-prj-helper",
    max_term_width = 80,
    about = "generates Eclipse project files for uvisor-enabled mbed \
             workspaces"
)]
struct Args {
    /// Application/Example root directory for hosting Eclipse project files
    #[structopt(short = "w", long, parse(from_os_str))]
    workspace: PathBuf,

    /// Compile target MCU. Example: K64F, NUCLEO_F401RE, NRF51822...
    #[structopt(short = "m", long, default_value = "K64F")]
    target: String,

    /// Compile toolchain. Example: ARM, GCC_ARM, IAR
    #[structopt(short = "t", long, default_value = "GCC_ARM")]
    toolchain: String,

    /// IDE to create project files for. Example: UVISION4, UVISION5,
    /// GCC_ARM, IAR, COIDE
    #[structopt(short = "i", long, default_value = "eclipse_gcc_arm")]
    ide: String,

    /// Request verbosity from tools we shell out to.
    #[structopt(short = "v", long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    let args = Args::from_args();

    let workspace = args.workspace.canonicalize().with_context(|| {
        format!("no such workspace {}", args.workspace.display())
    })?;

    export::run(&workspace, &args.target, &args.ide, args.verbose)?;

    let importer_dir = uvisor::find_importer_dir(&workspace)?;
    let uvisor_dir = uvisor::uvisor_dir(&importer_dir)?;

    makefile::patch(
        &workspace,
        &args.target,
        &args.toolchain,
        &uvisor_dir,
        &importer_dir,
    )?;

    launch::patch(&workspace, &args.target, &args.toolchain, &uvisor_dir)?;

    Ok(())
}
