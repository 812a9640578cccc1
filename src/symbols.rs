use std::collections::{BTreeSet, HashMap};

/// Symbol prefix that marks a global as a RAM-audit tag. The remainder of the
/// tag names the real symbol to report on.
pub const TRACKED_PREFIX: &str = "ui_ram_audit_entry_";

/// Storage classes we account for: uninitialized data (b), initialized data
/// (d) and read-only data (r). nm reports uppercase for global symbols, so
/// the check is case-insensitive.
fn is_data_class(class: &str) -> bool {
    matches!(class, "b" | "d" | "r")
}

/// Accumulator for `nm -S` output across several object files.
///
/// `sizes` keeps the most recent size seen for a symbol name (last artifact
/// wins), while `origins` keeps the first artifact that defined it (first
/// artifact wins). The asymmetry is deliberate: a later recompile may shrink
/// or grow a symbol, but the file it belongs to does not change.
#[derive(Debug, Default)]
pub struct SymbolScan {
    pub sizes: HashMap<String, u64>,
    pub origins: HashMap<String, String>,
    /// Display names extracted from audit tags, prefix stripped.
    pub tracked: BTreeSet<String>,
}

impl SymbolScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one artifact's `nm -S` text into the scan. Artifacts must be fed
    /// in list order so the first/last-wins rules are stable.
    ///
    /// Lines with fewer than four tokens (headers, blanks, undefined symbols
    /// without a size column) are skipped. Tag detection runs on every line
    /// that has a name token, before the storage-class and size filters, so
    /// a tag is registered even when its own line is otherwise unusable.
    pub fn scan_artifact(&mut self, artifact: &str, text: &str) {
        for line in text.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                continue;
            }
            let size_hex = parts[1];
            let class = parts[2];
            let name = parts[3];

            if let Some(display) = name.strip_prefix(TRACKED_PREFIX) {
                self.tracked.insert(display.to_string());
            }

            if !is_data_class(&class.to_ascii_lowercase()) {
                continue;
            }

            let Ok(size) = u64::from_str_radix(size_hex, 16) else {
                log::debug!("{artifact}: unparseable size {size_hex:?} for {name}");
                continue;
            };

            self.sizes.insert(name.to_string(), size);
            self.origins
                .entry(name.to_string())
                .or_insert_with(|| artifact.to_string());
        }
    }
}
