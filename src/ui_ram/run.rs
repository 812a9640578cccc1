// Copyright (c) 2026 Brick Firmware Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Entry point for the ui-ram subcommand: rebuild the UI/LED modules in
//! isolation and report the RAM footprint of every tagged symbol.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::report::{footprint_report, render_markdown};
use crate::symbols::SymbolScan;
use crate::toolchain;

/// Modules audited when no explicit source list is given. These cover the
/// paths that historically leaked buffers into SRAM.
const DEFAULT_SOURCES: &[&str] = &[
    "apps/seq_led_bridge.c",
    "ui/ui_led_backend.c",
    "drivers/drv_leds_addr.c",
    "drivers/drv_display.c",
    "core/seq/seq_project.c",
    "core/seq/seq_runtime.c",
];

#[derive(Args, Debug)]
pub struct UiRamArgs {
    /// arm-none-eabi gcc path
    #[arg(long = "gcc", default_value = "arm-none-eabi-gcc")]
    pub gcc: String,

    /// arm-none-eabi nm path
    #[arg(long = "nm", default_value = "arm-none-eabi-nm")]
    pub nm: String,

    /// Directory for the audit objects
    #[arg(long = "build-dir", default_value = "build/ui_ram_audit")]
    pub build_dir: PathBuf,

    /// Emit the report as JSON on stdout
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,

    /// Sources to audit (defaults to the UI/LED module set)
    pub sources: Vec<String>,
}

/// Returns whether the audit produced a report. An empty report is a failed
/// run; compiler and tool failures come back as errors.
pub fn run(args: UiRamArgs) -> Result<bool> {
    let sources: Vec<String> = if args.sources.is_empty() {
        DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect()
    } else {
        args.sources.clone()
    };

    let objects = toolchain::compile_objects(&args.gcc, &sources, &args.build_dir)?;

    let mut scan = SymbolScan::new();
    for obj in &objects {
        let artifact = obj
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| obj.display().to_string());
        let dump = toolchain::run_nm(&args.nm, obj)?;
        scan.scan_artifact(&artifact, &dump);
    }

    match footprint_report(&scan) {
        Ok(rows) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{}", render_markdown(&rows));
            }
            Ok(true)
        }
        Err(empty) => {
            eprintln!("{empty}");
            Ok(false)
        }
    }
}
