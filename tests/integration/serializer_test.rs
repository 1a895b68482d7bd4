use tempfile::TempDir;

use tnsed::core::entry::TnsEntry;
use tnsed::core::parser::parse_file;
use tnsed::core::serializer::{save_file, serialize};

fn entry(name: &str, service: &str, sid: &str, server: &str) -> TnsEntry {
    TnsEntry {
        name: name.to_string(),
        host: format!("{}.example.com", name.to_lowercase()),
        port: "1521".to_string(),
        service_name: service.to_string(),
        sid: sid.to_string(),
        server: server.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_save_then_parse_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tnsnames.ora");

    // every empty/non-empty combination of server, service name and sid
    // that still leaves a meaningful entry
    let originals = vec![
        entry("A1", "SVC", "", ""),
        entry("A2", "", "SID2", ""),
        entry("A3", "SVC", "SID3", ""),
        entry("A4", "SVC", "", "DEDICATED"),
        entry("A5", "", "SID5", "SHARED"),
        entry("A6", "SVC", "SID6", "DEDICATED"),
    ];

    save_file(&path, &originals).unwrap();
    let parsed = parse_file(&path).unwrap();

    assert_eq!(parsed.len(), originals.len());
    for original in &originals {
        let found = parsed
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&original.name))
            .unwrap();
        assert!(
            found.is_identical_to(original),
            "round trip changed {}",
            original.name
        );
    }
}

#[test]
fn test_saved_file_is_idempotent_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tnsnames.ora");

    let entries = vec![entry("beta", "SVC", "", ""), entry("ALPHA", "", "SID", "")];
    save_file(&path, &entries).unwrap();
    let first = std::fs::read_to_string(&path).unwrap();

    let reloaded = parse_file(&path).unwrap();
    save_file(&path, &reloaded).unwrap();
    let second = std::fs::read_to_string(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_unsorted_input_serializes_sorted() {
    let entries = vec![
        entry("zulu", "S", "", ""),
        entry("alpha", "S", "", ""),
        entry("Mike", "S", "", ""),
    ];
    let text = serialize(&entries);

    let alpha = text.find("alpha =").unwrap();
    let mike = text.find("Mike =").unwrap();
    let zulu = text.find("zulu =").unwrap();
    assert!(alpha < mike && mike < zulu);
}
