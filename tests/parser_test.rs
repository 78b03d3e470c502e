//! Integration tests for the document parser.

use memreport::parser::{DocumentParser, ParseOptions, UnmatchedLines};
use memreport::{Error, ResolvedSectionConfig, SectionDefinition, TableParsePattern};

fn section(name: &str, start: &str, end: &str, tables: Vec<TableParsePattern>) -> ResolvedSectionConfig {
    ResolvedSectionConfig::from_definition(SectionDefinition::new(name, start, end), tables)
}

fn objects_section() -> ResolvedSectionConfig {
    section(
        "Objects",
        r#"MemReport: Begin command "obj list""#,
        r#"MemReport: End command "obj list""#,
        vec![TableParsePattern::captured(
            "^Objects:",
            r"^\s*\d+ Objects",
            r"^(\S+)\s+(\S+)\s+(\S+)$",
        )
        .named("Objects")
        .with_header()
        .with_numeric_columns([1, 2])],
    )
}

const OBJECTS_REPORT: &str = "MemReport: Begin command \"obj list\"\n\
Obj List:\n\
Objects:\n\
\n\
Class Count NumKB\n\
Texture2D 412 1,234.50\n\
StaticMesh 120 512.25\n\
SoundWave 33 80.00\n\
   565 Objects (Total: 1.8M)\n\
MemReport: End command \"obj list\"\n";

async fn parse(text: &str, sections: &[ResolvedSectionConfig]) -> memreport::ParsedDocument {
    DocumentParser::new().parse(text, "report", sections).await.unwrap()
}

// ==================== Plain Sections ====================

#[tokio::test]
async fn test_plain_section_interior() {
    let doc = parse(
        "noise\nBEGIN X\nalpha\n\nbeta\nEND X\nnoise\n",
        &[section("X", "BEGIN X", "END X", vec![])],
    )
    .await;

    assert_eq!(doc.section_count(), 1);
    let x = doc.section("X").unwrap();
    assert_eq!(x.content.as_deref(), Some("alpha\n\nbeta"));
    assert!(x.tables.is_empty());
}

#[tokio::test]
async fn test_plain_section_removes_echo_lines() {
    let text = "MemReport: Begin command \"stat memory\"\n\
                MemReport: Begin command \"stat memory\"\n\
                Physical: 100 MB\n\
                MemReport: End command \"stat memory\"\n\
                MemReport: End command \"stat memory\"\n";
    let config = section(
        "Memory",
        r#"MemReport: Begin command "stat memory""#,
        r#"MemReport: End command "stat memory""#,
        vec![],
    );
    let doc = parse(text, &[config]).await;

    // lazy interior stops at the first end marker
    assert_eq!(doc.sections[0].content.as_deref(), Some("Physical: 100 MB"));
}

#[tokio::test]
async fn test_crlf_input() {
    let doc = parse(
        "BEGIN X\r\none\r\ntwo\rEND X\r\n",
        &[section("X", "BEGIN X", "END X", vec![])],
    )
    .await;
    assert_eq!(doc.sections[0].content.as_deref(), Some("one\ntwo"));
}

#[tokio::test]
async fn test_wildcard_start_marker_stays_on_its_line() {
    let doc = parse(
        "BEGIN X\nline one\nline two\nEND X\nother\n",
        &[section("X", "BEGIN .*", "END X", vec![])],
    )
    .await;
    assert_eq!(doc.sections[0].content.as_deref(), Some("line one\nline two"));
}

#[tokio::test]
async fn test_wildcard_end_marker_bounds_section() {
    let config = section(
        "Textures",
        "Listing all textures",
        "Total size: .*",
        vec![TableParsePattern::separated("^BEGIN Y", "^END Y", ",")],
    );
    let text = "Listing all textures\nA,1\nTotal size: 3 KB\nBEGIN Y\nY,9\nEND Y\n";
    let doc = parse(text, &[config]).await;

    // the table markers lie after the section's end marker
    let textures = doc.section("Textures").unwrap();
    assert!(textures.tables.is_empty());
}

#[tokio::test]
async fn test_sections_keep_configuration_order() {
    let text = "BEGIN B\nb\nEND B\nBEGIN A\na\nEND A\n";
    let doc = parse(
        text,
        &[
            section("A", "BEGIN A", "END A", vec![]),
            section("Missing", "BEGIN M", "END M", vec![]),
            section("B", "BEGIN B", "END B", vec![]),
        ],
    )
    .await;

    let titles: Vec<_> = doc.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

// ==================== Tables ====================

#[tokio::test]
async fn test_header_row_and_row_order() {
    let doc = parse(OBJECTS_REPORT, &[objects_section()]).await;
    let table = doc.section("Objects").and_then(|s| s.table("Objects")).unwrap();

    assert_eq!(
        table.headers.as_deref(),
        Some(&["Class".to_string(), "Count".to_string(), "NumKB".to_string()][..])
    );
    // four non-blank body lines, one of them the header
    assert_eq!(table.row_count(), 3);
    assert!(table.rows.iter().all(|r| r.len() == 3));

    let classes: Vec<_> = table.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(classes, vec!["Texture2D", "StaticMesh", "SoundWave"]);

    assert_eq!(table.numeric_value(0, 2), Some(1234.5));
    assert_eq!(table.numeric_value(0, 0), None);
    assert_eq!(table.column_index("NumKB"), Some(2));
}

#[tokio::test]
async fn test_table_edge_text() {
    let doc = parse(OBJECTS_REPORT, &[objects_section()]).await;
    let table = &doc.sections[0].tables[0];

    assert_eq!(table.pre_text.as_deref(), Some("Obj List:"));
    assert_eq!(table.post_text.as_deref(), Some("(Total: 1.8M)"));
}

#[tokio::test]
async fn test_parse_is_idempotent() {
    let parser = DocumentParser::new();
    let sections = [objects_section(), section("X", "BEGIN X", "END X", vec![])];
    let text = format!("{}BEGIN X\nfree\nEND X\n", OBJECTS_REPORT);

    let first = parser.parse(&text, "r", &sections).await.unwrap();
    let second = parser.parse(&text, "r", &sections).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_comma_list_expansion() {
    let config = section(
        "Pools",
        "BEGIN POOLS",
        "END POOLS",
        vec![TableParsePattern::captured("^Pools:", "^Done", r"^([^:]+):\s*(.*)$")],
    );
    let text = "BEGIN POOLS\nPools:\nSizes: 1, 2, 3\nSingle: 9\nDone\nEND POOLS\n";
    let doc = parse(text, &[config]).await;
    let table = &doc.sections[0].tables[0];

    // two commas: label plus three values
    assert_eq!(table.rows[0], vec!["Sizes", "1", "2", "3"]);
    assert_eq!(table.rows[1], vec!["Single", "9"]);
    assert!(table.is_ragged());
    assert_eq!(table.column_count(), 4);
}

#[tokio::test]
async fn test_named_columns() {
    let config = section(
        "Heaps",
        "BEGIN",
        "END",
        vec![TableParsePattern::captured(
            "^Heaps",
            r"^\s*$",
            r"^Heap (?P<index>\d+) holds (?P<size>\d+) KB$",
        )
        .with_columns(["size", "index"])],
    );
    let text = "BEGIN\nHeaps\nHeap 0 holds 64 KB\nHeap 1 holds 32 KB\n\nEND\n";
    let doc = parse(text, &[config]).await;

    assert_eq!(
        doc.sections[0].tables[0].rows,
        vec![vec!["64", "0"], vec!["32", "1"]]
    );
}

#[tokio::test]
async fn test_unmatched_table_pattern_keeps_section() {
    let config = section(
        "X",
        "BEGIN X",
        "END X",
        vec![TableParsePattern::separated("^Never", "^Nope", ",")],
    );
    let doc = parse("BEGIN X\na,b\nEND X\n", &[config]).await;

    let x = doc.section("X").unwrap();
    assert!(x.tables.is_empty());
    assert!(x.content.is_none());
}

#[tokio::test]
async fn test_only_produced_tables_carry_edge_text() {
    let config = section(
        "S",
        "BEGIN S",
        "END S",
        vec![
            TableParsePattern::separated("^Missing", "^Gone", ",").named("missing"),
            TableParsePattern::separated("^First", "^--", ",").named("first"),
        ],
    );
    let doc = parse("BEGIN S\nlead\nFirst\na,b\n--\ntail\nEND S\n", &[config]).await;
    let tables = &doc.sections[0].tables;

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].pre_text.as_deref(), Some("BEGIN S\nlead"));
    assert_eq!(tables[0].post_text.as_deref(), Some("tail\nEND S"));
}

// ==================== Options & Failures ====================

#[tokio::test]
async fn test_strict_parse_fails_on_unmatched_line() {
    let parser = DocumentParser::with_options(ParseOptions::new().strict());
    let text = OBJECTS_REPORT.replace("SoundWave 33 80.00", "-- garbage line here --");

    let err = parser.parse(&text, "r", &[objects_section()]).await.unwrap_err();
    assert!(matches!(
        err,
        Error::UnmatchedRow { ref table, ref line } if table == "Objects" && line == "-- garbage line here --"
    ));
}

#[tokio::test]
async fn test_raw_policy_keeps_unmatched_line() {
    let options = ParseOptions::new().with_unmatched_lines(UnmatchedLines::Raw);
    let text = OBJECTS_REPORT.replace("SoundWave 33 80.00", "-- garbage line here --");
    let doc = DocumentParser::with_options(options)
        .parse(&text, "r", &[objects_section()])
        .await
        .unwrap();

    let table = &doc.sections[0].tables[0];
    assert_eq!(table.rows[2], vec!["-- garbage line here --"]);
}

#[tokio::test]
async fn test_malformed_row_pattern_fails_before_parsing() {
    let broken = section(
        "Broken",
        "BEGIN",
        "END",
        vec![TableParsePattern::captured("^s", "^e", "(unclosed").named("Rows")],
    );
    let err = DocumentParser::new()
        .parse("no sections here", "r", &[broken])
        .await
        .unwrap_err();

    match err {
        Error::InvalidPattern { context, .. } => {
            assert_eq!(context, "section 'Broken' table 'Rows'");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_many_sections_with_pacing() {
    let sections: Vec<_> = (0..23)
        .map(|i| section(&format!("S{i}"), &format!("BEGIN {i}$"), &format!("END {i}"), vec![]))
        .collect();
    let text: String = (0..23).map(|i| format!("BEGIN {i}\nbody {i}\nEND {i}\n")).collect();

    for yield_every in [0, 1, 5] {
        let parser = DocumentParser::with_options(ParseOptions::new().with_yield_every(yield_every));
        let doc = parser.parse(&text, "r", &sections).await.unwrap();
        assert_eq!(doc.section_count(), 23);
        assert_eq!(doc.sections[17].content.as_deref(), Some("body 17"));
    }
}
