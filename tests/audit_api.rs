use brick_audit_helper::{
    footprint_report, parse_section_table, validate_layout, CcramConstraints, SymbolScan,
};

const GOOD_DUMP: &str = "\
build/ch.elf:     file format elf32-littlearm

Sections:
Idx Name          Size      VMA       LMA       File off  Algn
  0 .text         0001c2f0  08000000  08000000  00010000  2**4
                  CONTENTS, ALLOC, LOAD, READONLY, CODE
  1 .data         00000840  20000000  0801c2f0  00060000  2**3
                  CONTENTS, ALLOC, LOAD, DATA
  2 .ram4         00003c00  10000000  10000000  00070000  2**3
                  ALLOC
  3 .ram4_init    00000000  10003c00  10003c00  00070000  2**0
                  CONTENTS
";

#[test]
fn ccram_audit_passes_on_a_healthy_image() {
    let sections = parse_section_table(GOOD_DUMP);
    let result = validate_layout(&sections, &CcramConstraints::default());
    assert!(result.passed, "diagnostics: {:?}", result.diagnostics);
    assert!(result.summary.unwrap().contains(".ram4 OK"));
}

#[test]
fn ccram_audit_collects_every_violation_in_one_run() {
    // .ram4 moved, over budget and loadable; .ram4_init grew.
    let dump = "\
  0 .ram4         00020000  20000000  20000000  00010000  2**3
                  CONTENTS, ALLOC, LOAD
  1 .ram4_init    00000010  10000000  10000000  00020000  2**0
                  ALLOC
";
    let sections = parse_section_table(dump);
    let result = validate_layout(&sections, &CcramConstraints::default());
    assert!(!result.passed);
    assert_eq!(result.diagnostics.len(), 4);
    assert!(result.diagnostics[0].contains("VMA"));
    assert!(result.diagnostics[1].contains("budget"));
    assert!(result.diagnostics[2].contains("NOLOAD"));
    assert!(result.diagnostics[3].contains(".ram4_init"));
}

#[test]
fn ui_ram_audit_reports_tagged_symbols_across_artifacts() {
    let mut scan = SymbolScan::new();
    scan.scan_artifact(
        "drv_display.o",
        "\
00000000 00000400 b display_buf
00000400 00000001 b ui_ram_audit_entry_display_buf
         U memset
",
    );
    scan.scan_artifact(
        "seq_led_bridge.o",
        "\
00000000 00000060 B led_frame
00000060 00000001 b ui_ram_audit_entry_led_frame
00000061 00000400 b display_buf
",
    );

    let rows = footprint_report(&scan).expect("report should not be empty");
    assert_eq!(rows.len(), 2);
    // Largest first; origin sticks with the first artifact that defined it.
    assert_eq!(rows[0].name, "display_buf");
    assert_eq!(rows[0].size, 0x400);
    assert_eq!(rows[0].origin, "drv_display.o");
    assert_eq!(rows[1].name, "led_frame");
    assert_eq!(rows[1].size, 0x60);
    assert_eq!(rows[1].origin, "seq_led_bridge.o");
}

#[test]
fn ui_ram_audit_distinguishes_the_two_empty_outcomes() {
    use brick_audit_helper::ReportError;

    let no_tags = SymbolScan::new();
    assert_eq!(
        footprint_report(&no_tags).unwrap_err(),
        ReportError::NoTrackedSymbols
    );

    let mut unresolved = SymbolScan::new();
    unresolved.scan_artifact("a.o", "0 00000001 t ui_ram_audit_entry_ghost");
    assert_eq!(
        footprint_report(&unresolved).unwrap_err(),
        ReportError::NoResolvableSizes
    );
}
