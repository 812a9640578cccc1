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

//! CCM RAM layout rules for the linked firmware image.
//!
//! The `.ram4` section holds battery-backed state and must sit at the CCM
//! base, stay inside the 64 KiB window and be NOLOAD (nothing in the image
//! file, nothing loaded at startup). `.ram4_init` exists only to catch
//! accidental initialized data aimed at CCM; it must stay empty.

use serde::Serialize;

use crate::sections::SectionTable;

/// Flag tokens that mark a section as backed by file contents or loaded at
/// program-load time. Either one on `.ram4` means the linker script regressed.
const LOADABLE_FLAGS: [&str; 2] = ["LOAD", "CONTENTS"];

#[derive(Debug, Clone)]
pub struct CcramConstraints {
    /// Section that must be present and correctly placed.
    pub section: String,
    /// Companion section that must stay empty, if the script emits it at all.
    pub companion: Option<String>,
    /// Expected VMA of `section`.
    pub base: u64,
    /// Size budget for `section`, in bytes.
    pub max_size: u64,
}

impl Default for CcramConstraints {
    fn default() -> Self {
        Self {
            section: ".ram4".to_string(),
            companion: Some(".ram4_init".to_string()),
            base: 0x1000_0000,
            max_size: 0x1_0000,
        }
    }
}

/// Outcome of one layout check. `diagnostics` holds one entry per violated
/// rule, in rule order; `summary` is set only on a pass.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub diagnostics: Vec<String>,
    pub summary: Option<String>,
}

fn has_loadable_flag(flags: &[String]) -> bool {
    flags.iter().any(|f| LOADABLE_FLAGS.contains(&f.as_str()))
}

/// Check the section table against the CCM constraints.
///
/// Only a missing primary section cuts the check short; every other rule is
/// evaluated so a single run reports all violations at once.
pub fn validate_layout(sections: &SectionTable, constraints: &CcramConstraints) -> ValidationResult {
    let name = constraints.section.as_str();

    let Some(record) = sections.get(name) else {
        return ValidationResult {
            passed: false,
            diagnostics: vec![format!("section {name} not found in ELF headers")],
            summary: None,
        };
    };

    let mut diagnostics = Vec::new();

    if record.vma != constraints.base {
        diagnostics.push(format!(
            "{name} VMA expected 0x{:08X}, got 0x{:08X}",
            constraints.base, record.vma
        ));
    }

    if record.size > constraints.max_size {
        diagnostics.push(format!(
            "{name} size {} exceeds {} byte budget",
            record.size, constraints.max_size
        ));
    }

    if has_loadable_flag(&record.flags) {
        diagnostics.push(format!("{name} should be NOLOAD (no LOAD/CONTENTS flags)"));
    }

    if let Some(companion) = constraints.companion.as_deref() {
        // Skipped entirely when the script does not emit the companion.
        if let Some(init) = sections.get(companion) {
            if init.size != 0 {
                diagnostics.push(format!("{companion} should be empty"));
                if has_loadable_flag(&init.flags) {
                    diagnostics.push(format!("{companion} must not request loadable data"));
                }
            }
        }
    }

    if !diagnostics.is_empty() {
        return ValidationResult {
            passed: false,
            diagnostics,
            summary: None,
        };
    }

    let mut flags: Vec<&str> = record.flags.iter().map(String::as_str).collect();
    flags.sort_unstable();
    flags.dedup();
    let flags_display = if flags.is_empty() {
        "<none>".to_string()
    } else {
        flags.join(" ")
    };

    ValidationResult {
        passed: true,
        diagnostics: Vec::new(),
        summary: Some(format!(
            "{name} OK — size={} bytes, flags={}",
            record.size, flags_display
        )),
    }
}
