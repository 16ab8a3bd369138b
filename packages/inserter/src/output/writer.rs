//! File output for updated contracts and YAML run reports.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::batch::BatchReport;
use crate::error::Result;
use crate::types::ContractId;

/// Write `content` to `path` atomically.
///
/// Writes to a temp file next to the target, syncs it to disk, then renames
/// it over the target, so a crash never leaves a half-written file.
///
/// # Errors
/// Returns an error if the temp file cannot be written or renamed.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}

/// Save an updated contract into `output_dir`.
///
/// # Returns
/// Path to the saved file
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn save_contract(output_dir: &Path, contract: &ContractId, source: &str) -> Result<PathBuf> {
    let output_file = output_dir.join(contract.file_name());
    write_atomic(&output_file, source)?;
    Ok(output_file)
}

/// Render a batch report as YAML.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn generate_report(report: &BatchReport) -> Result<String> {
    let yaml = serde_yaml_ng::to_string(report)?;
    let lines: Vec<&str> = yaml.lines().map(str::trim_end).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Save a batch report as YAML, creating parent directories as needed.
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn save_report(report: &BatchReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let content = generate_report(report)?;
    write_atomic(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{ContractReport, DirectiveOutcome, DirectiveStatus, SkippedBlockRecord};
    use crate::types::DirectiveRecord;
    use chrono::Utc;
    use tempfile::tempdir;

    fn report() -> BatchReport {
        BatchReport {
            generated_at: Utc::now(),
            skipped_blocks: vec![SkippedBlockRecord {
                contract: "Contract 4".to_string(),
                reason: "no blank line between instruction and payload".to_string(),
            }],
            contracts: vec![ContractReport {
                contract: "Contract 1".to_string(),
                output: Some(PathBuf::from("updated/Contract 1.xml")),
                applied: 1,
                directives: vec![DirectiveOutcome {
                    directive: DirectiveRecord {
                        contract: "Contract 1".to_string(),
                        insert_type: Some("as".to_string()),
                        section_name: Some("1A".to_string()),
                        sentence_after: None,
                        text: "The Supplier shall maintain insurance.".to_string(),
                    },
                    status: DirectiveStatus::Applied,
                }],
                error: None,
            }],
        }
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Contract 1.xml");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join(".Contract 1.xml.tmp").exists());
    }

    #[test]
    fn test_save_contract() {
        let dir = tempdir().unwrap();
        let path = save_contract(dir.path(), &ContractId::new("2"), "<w:document/>").unwrap();

        assert_eq!(path, dir.path().join("Contract 2.xml"));
        assert_eq!(fs::read_to_string(path).unwrap(), "<w:document/>");
    }

    #[test]
    fn test_generate_report() {
        let yaml = generate_report(&report()).unwrap();

        assert!(yaml.starts_with("---\n"));
        assert!(yaml.contains("generated_at:"));
        assert!(yaml.contains("contract: Contract 1"));
        assert!(yaml.contains("status: applied"));
        assert!(yaml.contains("reason: no blank line between instruction and payload"));
        assert!(!yaml.contains("error:"));
    }

    #[test]
    fn test_save_report_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("run.yaml");

        save_report(&report(), &path).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("applied: 1"));
    }
}
