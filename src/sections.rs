use regex::Regex;
use std::collections::HashMap;

/// We use objdump to dump the section headers of the linked ELF. This module
/// parses that header table into structured records for the layout checks.
///
/// objdump prints each section as two lines: a header line with the index,
/// name and the size/VMA/LMA/file-offset columns ending in an alignment
/// marker, and a second line listing the section flags. Anything that does
/// not look like a header line (the banner, the column legend, blank lines)
/// is noise and gets skipped.

#[derive(Debug, Clone, PartialEq)]
pub struct SectionRecord {
    pub size: u64,
    pub vma: u64,
    pub lma: u64,
    /// Flag tokens from the line following the header, stored verbatim.
    /// objdump separates them with ", " so a token may carry a trailing comma.
    pub flags: Vec<String>,
}

/// Section name to record, for one dump. Duplicate names overwrite.
pub type SectionTable = HashMap<String, SectionRecord>;

/// Parse the full text of an `objdump -h` dump into a SectionTable.
///
/// Single linear pass. A header line whose hex columns do not fit in a u64
/// is treated like any other non-matching line.
pub fn parse_section_table(text: &str) -> SectionTable {
    let re = Regex::new(
        r"^\s*(?P<idx>\d+)\s+(?P<name>\S+)\s+(?P<size>[0-9a-fA-F]+)\s+(?P<vma>[0-9a-fA-F]+)\s+(?P<lma>[0-9a-fA-F]+)\s+(?P<fo>[0-9a-fA-F]+)\s+2\*\*\d+",
    )
    .unwrap();

    let lines: Vec<&str> = text.lines().collect();
    let mut table = SectionTable::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = re.captures(line) else {
            continue;
        };

        let size = u64::from_str_radix(&caps["size"], 16);
        let vma = u64::from_str_radix(&caps["vma"], 16);
        let lma = u64::from_str_radix(&caps["lma"], 16);
        let (Ok(size), Ok(vma), Ok(lma)) = (size, vma, lma) else {
            continue;
        };

        // The flags live on the next line. A header line at EOF simply has
        // no flags.
        let flags: Vec<String> = match lines.get(i + 1) {
            Some(next) => next.split_whitespace().map(str::to_string).collect(),
            None => Vec::new(),
        };

        let name = caps["name"].to_string();
        log::debug!(
            "section {}: size=0x{:x} vma=0x{:x} lma=0x{:x} flags={:?}",
            name,
            size,
            vma,
            lma,
            flags
        );
        table.insert(
            name,
            SectionRecord {
                size,
                vma,
                lma,
                flags,
            },
        );
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
build/ch.elf:     file format elf32-littlearm

Sections:
Idx Name          Size      VMA       LMA       File off  Algn
  0 .text         0001c2f0  08000000  08000000  00010000  2**4
                  CONTENTS, ALLOC, LOAD, READONLY, CODE
  1 .ram4         00001000  10000000  10000000  00050000  2**3
                  ALLOC
";

    #[test]
    fn parses_two_line_records() {
        let table = parse_section_table(DUMP);
        let text = table.get(".text").expect(".text should be present");
        assert_eq!(text.size, 0x1c2f0);
        assert_eq!(text.vma, 0x0800_0000);
        assert_eq!(text.lma, 0x0800_0000);
        assert_eq!(
            text.flags,
            vec!["CONTENTS,", "ALLOC,", "LOAD,", "READONLY,", "CODE"]
        );

        let ram4 = table.get(".ram4").expect(".ram4 should be present");
        assert_eq!(ram4.size, 0x1000);
        assert_eq!(ram4.vma, 0x1000_0000);
        assert_eq!(ram4.flags, vec!["ALLOC"]);
    }

    #[test]
    fn header_line_at_eof_has_empty_flags() {
        let dump = "  3 .ram4         00000400  10000000  10000000  00060000  2**3";
        let table = parse_section_table(dump);
        let ram4 = table.get(".ram4").unwrap();
        assert_eq!(ram4.size, 0x400);
        assert!(ram4.flags.is_empty());
    }

    #[test]
    fn noise_lines_are_skipped() {
        let dump = "\
Sections:
Idx Name          Size      VMA       LMA       File off  Algn
not a section line at all
";
        assert!(parse_section_table(dump).is_empty());
    }

    #[test]
    fn duplicate_names_take_the_last_record() {
        let dump = "\
  0 .ram4         00000100  10000000  10000000  00010000  2**3
                  ALLOC
  1 .ram4         00000200  10000000  10000000  00020000  2**3
                  ALLOC
";
        let table = parse_section_table(dump);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(".ram4").unwrap().size, 0x200);
    }

    #[test]
    fn large_hex_values_round_trip() {
        let dump = "  7 .big          fffffff0  e0000000  e0000000  00000000  2**2\n  X";
        let table = parse_section_table(dump);
        let big = table.get(".big").unwrap();
        assert_eq!(big.size, 0xffff_fff0);
        assert_eq!(big.vma, 0xe000_0000);
    }

    #[test]
    fn unparseable_hex_is_not_a_record() {
        // 17 hex digits overflows u64; the line must be dropped, not truncated.
        let dump = "  0 .huge         fffffffffffffffff  10000000  10000000  00010000  2**3";
        assert!(parse_section_table(dump).is_empty());
    }
}
