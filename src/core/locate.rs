//! Discovery of the default tnsnames.ora location.
//!
//! Order mirrors what the Oracle client itself honors: `TNS_ADMIN` wins,
//! then `ORACLE_HOME/network/admin`, then a handful of conventional install
//! roots per platform.

use std::env;
use std::path::PathBuf;

const VERSIONS: &[&str] = &["21", "19", "18", "12", "11"];
const HOME_FOLDERS: &[&str] = &["client_1", "dbhome_1", "home"];

/// All candidate locations, highest priority first. Pure enumeration, no
/// filesystem checks.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();
    let add = |candidates: &mut Vec<PathBuf>, path: PathBuf| {
        if !candidates.contains(&path) {
            candidates.push(path);
        }
    };

    if let Ok(tns_admin) = env::var("TNS_ADMIN") {
        if !tns_admin.trim().is_empty() {
            add(&mut paths, PathBuf::from(tns_admin).join("tnsnames.ora"));
        }
    }

    if let Ok(oracle_home) = env::var("ORACLE_HOME") {
        if !oracle_home.trim().is_empty() {
            add(
                &mut paths,
                PathBuf::from(oracle_home)
                    .join("network")
                    .join("admin")
                    .join("tnsnames.ora"),
            );
        }
    }

    for base in install_roots() {
        add(
            &mut paths,
            base.join("network").join("admin").join("tnsnames.ora"),
        );

        for version in VERSIONS {
            for home in HOME_FOLDERS {
                add(
                    &mut paths,
                    base.join("product")
                        .join(version)
                        .join(home)
                        .join("network")
                        .join("admin")
                        .join("tnsnames.ora"),
                );
            }
        }
    }

    paths
}

#[cfg(windows)]
fn install_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from(r"C:\oracle"),
        PathBuf::from(r"C:\app\oracle"),
    ];

    if let Ok(program_files) = env::var("ProgramFiles") {
        roots.push(PathBuf::from(program_files).join("Oracle"));
    }
    if let Ok(program_files_x86) = env::var("ProgramFiles(x86)") {
        roots.push(PathBuf::from(program_files_x86).join("Oracle"));
    }

    roots
}

#[cfg(not(windows))]
fn install_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/opt/oracle"),
        PathBuf::from("/usr/lib/oracle"),
        PathBuf::from("/u01/app/oracle"),
    ]
}

/// First candidate that exists on disk, if any
pub fn default_tnsnames_path() -> Option<PathBuf> {
    candidate_paths().into_iter().find(|p| p.is_file())
}
