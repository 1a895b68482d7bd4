use std::fs;
use std::path::Path;
use tempfile::TempDir;

use tnsed::core::parser::{parse_file, parse_text};

const THREE_ALIASES: &str = "\
# tnsnames.ora Network Configuration File
# Generated by tnsed

DB1 =
  (DESCRIPTION =
    (ADDRESS = (PROTOCOL = TCP)(HOST = host1)(PORT = 1521))
    (CONNECT_DATA =
      (SERVER = PRODSRV)
      (SERVICE_NAME = SVC1)
    )
  )

DB2 =
  (DESCRIPTION =
    (ADDRESS_LIST =
      (ADDRESS = (PROTOCOL = TCP)(HOST = host2)(PORT = 1522))
    )
    (CONNECT_DATA =
      (SID = ORCL)
    )
  )

DB3 =
  (DESCRIPTION =
    (ADDRESS_LIST =
      (ADDRESS = (PROTOCOL = TCPS)(HOST = host3)(PORT = 2484))
    )
    (CONNECT_DATA =
      (SERVICE_NAME = SVC3)
      (SID = SID3)
    )
  )
";

#[test]
fn test_parse_missing_file_returns_empty_list() {
    let entries = parse_file(Path::new("/nonexistent/path/tnsnames.ora")).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn test_parse_existing_but_unreadable_path_errors() {
    // a directory exists but cannot be read as a file
    let dir = TempDir::new().unwrap();
    assert!(parse_file(dir.path()).is_err());
}

#[test]
fn test_parse_file_round() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tnsnames.ora");
    fs::write(&path, THREE_ALIASES).unwrap();

    let entries = parse_file(&path).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].name, "DB1");
    assert_eq!(entries[1].name, "DB2");
    assert_eq!(entries[2].name, "DB3");
}

#[test]
fn test_three_alias_scenario_shapes() {
    let entries = parse_text(THREE_ALIASES);

    let db1 = &entries[0];
    assert_eq!(db1.server, "PRODSRV");
    assert_eq!(db1.sid, "");
    let db1_text = db1.to_tns_format();
    assert!(!db1_text.contains("ADDRESS_LIST"));
    assert!(db1_text.contains("(SERVER = PRODSRV)"));

    let db2 = &entries[1];
    assert_eq!(db2.sid, "ORCL");
    assert_eq!(db2.server, "");
    let db2_text = db2.to_tns_format();
    assert!(db2_text.contains("(ADDRESS_LIST =\n"));
    assert!(db2_text.contains("(SID = ORCL)"));
    assert!(!db2_text.contains("SERVICE_NAME"));

    let db3 = &entries[2];
    let db3_text = db3.to_tns_format();
    let svc = db3_text.find("(SERVICE_NAME = SVC3)").unwrap();
    let sid = db3_text.find("(SID = SID3)").unwrap();
    assert!(svc < sid);
}

#[test]
fn test_comment_noise_parses_identically() {
    let noisy = "\
# header comment

DB1 =
  (DESCRIPTION =
# comment inside the entry body
    (ADDRESS = (PROTOCOL = TCP)(HOST = host1)(PORT = 1521))

    (CONNECT_DATA =
      (SERVER = PRODSRV)
      (SERVICE_NAME = SVC1)
    )
  )
";
    let clean = "\
DB1 =
  (DESCRIPTION =
    (ADDRESS = (PROTOCOL = TCP)(HOST = host1)(PORT = 1521))
    (CONNECT_DATA =
      (SERVER = PRODSRV)
      (SERVICE_NAME = SVC1)
    )
  )
";

    let noisy_entries = parse_text(noisy);
    let clean_entries = parse_text(clean);

    assert_eq!(noisy_entries.len(), clean_entries.len());
    assert!(noisy_entries[0].is_identical_to(&clean_entries[0]));
}

#[test]
fn test_service_name_without_sid() {
    let entries = parse_text(
        "ONLY_SVC =\n  (DESCRIPTION =\n    (CONNECT_DATA =\n      (SERVICE_NAME = ORCL)\n    )\n  )\n",
    );
    assert_eq!(entries[0].service_name, "ORCL");
    assert_eq!(entries[0].sid, "");
}
