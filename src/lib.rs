// Crate root: declare modules and control visibility
pub mod ccram;
pub mod debug;
pub mod layout;
pub mod report;
pub mod sections;
pub mod symbols;
pub mod toolchain;
pub mod ui_ram;

// Re-export commonly used API from the library for binaries/tests
pub use layout::{validate_layout, CcramConstraints, ValidationResult};
pub use report::{footprint_report, render_markdown, FootprintRow, ReportError};
pub use sections::{parse_section_table, SectionRecord, SectionTable};
pub use symbols::{SymbolScan, TRACKED_PREFIX};
