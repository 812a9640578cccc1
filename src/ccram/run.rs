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

//! Entry point for the ccram subcommand: audit the `.ram4` placement of a
//! linked ELF before it goes anywhere near a flasher.

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use crate::layout::{validate_layout, CcramConstraints};
use crate::sections::parse_section_table;
use crate::toolchain;

#[derive(Args, Debug)]
pub struct CcramArgs {
    /// ELF image to audit
    #[arg(default_value = "build/ch.elf")]
    pub elf: PathBuf,

    /// objdump executable
    #[arg(long = "objdump", default_value = "arm-none-eabi-objdump")]
    pub objdump: String,

    /// Expected .ram4 base address
    #[arg(long = "base", value_parser = parse_hex_u64, default_value = "0x10000000")]
    pub base: u64,

    /// .ram4 size budget in bytes
    #[arg(long = "max-size", value_parser = parse_hex_u64, default_value = "0x10000")]
    pub max_size: u64,

    /// Emit the result as JSON on stdout
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

/// Returns whether the layout check passed. Tool and file problems come back
/// as errors; rule violations only flip the flag.
pub fn run(args: CcramArgs) -> Result<bool> {
    if !args.elf.exists() {
        bail!("ELF file {} not found", args.elf.display());
    }

    let dump = toolchain::run_objdump_headers(&args.objdump, &args.elf)?;
    let sections = parse_section_table(&dump);

    let constraints = CcramConstraints {
        base: args.base,
        max_size: args.max_size,
        ..CcramConstraints::default()
    };
    let result = validate_layout(&sections, &constraints);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for diagnostic in &result.diagnostics {
            eprintln!("error: {diagnostic}");
        }
        if let Some(summary) = &result.summary {
            eprintln!("[ccm-audit] {summary}");
        }
    }

    Ok(result.passed)
}

/// Parse an address from string (supports "0x1234" or "1234" format)
fn parse_hex_u64(input: &str) -> Result<u64, String> {
    let trimmed = input.trim();
    let hex_str = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    u64::from_str_radix(hex_str, 16).map_err(|e| format!("invalid address {input:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_addresses_parse_with_and_without_prefix() {
        assert_eq!(parse_hex_u64("0x10000000").unwrap(), 0x1000_0000);
        assert_eq!(parse_hex_u64("10000").unwrap(), 0x10000);
        assert!(parse_hex_u64("zz").is_err());
    }

    #[test]
    fn missing_elf_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = CcramArgs {
            elf: dir.path().join("missing.elf"),
            objdump: "arm-none-eabi-objdump".to_string(),
            base: 0x1000_0000,
            max_size: 0x1_0000,
            json: false,
        };
        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("missing.elf"));
    }
}
