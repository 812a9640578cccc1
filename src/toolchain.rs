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

//! Thin wrappers around the arm-none-eabi binutils/gcc invocations. All the
//! parsing of their output lives in `sections` and `symbols`; this module
//! only spawns processes and captures text.

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::debug_println;

/// Flags matching the firmware's production build closely enough that the
/// audited objects carry the same data layout.
const COMPILE_FLAGS: &[&str] = &[
    "-c",
    "-mcpu=cortex-m4",
    "-mthumb",
    "-Os",
    "-ffunction-sections",
    "-fdata-sections",
    "-std=c11",
    "-Wall",
    "-Wextra",
    "-Wno-unused-function",
    "-Itests/stubs",
    "-Iui",
    "-Iapps",
    "-Idrivers",
    "-Imidi",
    "-Icart",
    "-Iboard",
    "-Icore",
    "-Icore/seq",
    "-I.",
];

/// Spawn a command with piped stdout and collect its output line by line.
/// Streaming keeps memory flat on large dumps and strips CR/LF as it goes.
fn capture_stdout(mut cmd: Command) -> Result<String> {
    debug_println!("running: {:?}", cmd);
    let mut child = cmd
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("unable to run {:?}", cmd.get_program()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("failed to capture stdout of {:?}", cmd.get_program()))?;

    let mut reader = BufReader::with_capacity(64 * 1024, stdout);
    let mut buf: Vec<u8> = Vec::with_capacity(8 * 1024);
    let mut text = String::new();

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break; // EOF
        }
        while buf
            .last()
            .map(|b| *b == b'\n' || *b == b'\r')
            .unwrap_or(false)
        {
            buf.pop();
        }
        text.push_str(&String::from_utf8_lossy(&buf));
        text.push('\n');
    }

    let status = child.wait()?;
    if !status.success() {
        bail!("{:?} exited with {}", cmd.get_program(), status);
    }
    Ok(text)
}

/// Run `objdump -h` on the ELF and return the header dump text.
pub fn run_objdump_headers(objdump: &str, elf: &Path) -> Result<String> {
    let mut cmd = Command::new(objdump);
    cmd.arg("-h").arg(elf);
    capture_stdout(cmd)
}

/// Run `nm -S` on one object file and return the symbol dump text.
pub fn run_nm(nm: &str, object: &Path) -> Result<String> {
    let mut cmd = Command::new(nm);
    cmd.arg("-S").arg(object);
    capture_stdout(cmd)
}

/// Compile each source in isolation into `build_dir`, returning the object
/// paths in source order. Sources must exist before gcc is spawned so a typo
/// in the list is reported by name, not as a compiler error.
pub fn compile_objects(gcc: &str, sources: &[String], build_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(build_dir)
        .with_context(|| format!("unable to create {}", build_dir.display()))?;

    let mut objects = Vec::with_capacity(sources.len());
    for src in sources {
        let src_path = Path::new(src);
        if !src_path.exists() {
            bail!("source file {src} not found");
        }
        let stem = src_path
            .file_stem()
            .ok_or_else(|| anyhow!("source path {src} has no file name"))?;
        let obj = build_dir.join(Path::new(stem).with_extension("o"));

        let mut cmd = Command::new(gcc);
        cmd.args(COMPILE_FLAGS).arg(src_path).arg("-o").arg(&obj);
        debug_println!("running: {:?}", cmd);
        let status = cmd
            .status()
            .with_context(|| format!("unable to run {gcc:?}"))?;
        if !status.success() {
            bail!("compilation of {src} failed ({status})");
        }
        objects.push(obj);
    }
    Ok(objects)
}
