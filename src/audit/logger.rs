//! Append-only JSONL audit log
//!
//! One JSON object per line, flushed on every write.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CashplanError, CashplanResult};

use super::entry::AuditEntry;

/// Writes and reads the audit log file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open_for_append(&self) -> CashplanResult<BufWriter<File>> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map(BufWriter::new)
            .map_err(|e| CashplanError::Io(format!("Failed to open audit log: {}", e)))
    }

    fn write_line(writer: &mut impl Write, entry: &AuditEntry) -> CashplanResult<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| CashplanError::Json(format!("Failed to serialize audit entry: {}", e)))?;
        writeln!(writer, "{}", json)
            .map_err(|e| CashplanError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Append one entry
    pub fn log(&self, entry: &AuditEntry) -> CashplanResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries, flushing once at the end
    pub fn log_batch(&self, entries: &[AuditEntry]) -> CashplanResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut writer = self.open_for_append()?;
        for entry in entries {
            Self::write_line(&mut writer, entry)?;
        }
        writer
            .flush()
            .map_err(|e| CashplanError::Io(format!("Failed to flush audit log: {}", e)))
    }

    /// All entries, oldest first; blank lines are skipped
    pub fn read_all(&self) -> CashplanResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| CashplanError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                CashplanError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                CashplanError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> CashplanResult<Vec<AuditEntry>> {
        let mut all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries.split_off(start))
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use crate::models::{Bucket, Goal, Money};
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn bucket_entry(name: &str) -> AuditEntry {
        let bucket = Bucket::new(name, 25.0);
        AuditEntry::create(
            EntityType::Bucket,
            bucket.id.to_string(),
            Some(bucket.name.clone()),
            &bucket,
        )
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        assert!(!logger.path().exists());
    }

    #[test]
    fn test_log_appends_across_loggers() {
        let (logger, temp) = create_test_logger();
        logger.log(&bucket_entry("Ops")).unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        reopened.log(&bucket_entry("Attack")).unwrap();

        let entries = reopened.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entity_name.as_deref(), Some("Ops"));
        assert_eq!(entries[1].entity_name.as_deref(), Some("Attack"));
    }

    #[test]
    fn test_batch_and_recent() {
        let (logger, _temp) = create_test_logger();
        let names = ["A", "B", "C", "D"];
        let batch: Vec<AuditEntry> = names.iter().map(|n| bucket_entry(n)).collect();
        logger.log_batch(&batch).unwrap();
        logger.log_batch(&[]).unwrap();

        let recent = logger.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].entity_name.as_deref(), Some("C"));
        assert_eq!(recent[1].entity_name.as_deref(), Some("D"));
        assert_eq!(logger.read_recent(10).unwrap().len(), 4);
    }

    #[test]
    fn test_mixed_operations_round_trip() {
        let (logger, _temp) = create_test_logger();
        let goal = Goal::savings("Trip", Money::from_cents(1000));
        let mut cleared = goal.clone();
        cleared.mark_cleared();

        logger
            .log(&AuditEntry::update(
                EntityType::Goal,
                goal.id.to_string(),
                None,
                &goal,
                &cleared,
                None,
            ))
            .unwrap();
        logger
            .log(&AuditEntry::delete(EntityType::Goal, goal.id.to_string(), None, &cleared))
            .unwrap();

        let ops: Vec<Operation> = logger.read_all().unwrap().iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec![Operation::Update, Operation::Delete]);
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let (logger, temp) = create_test_logger();
        logger.log(&bucket_entry("Ops")).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(temp.path().join("audit.log"))
            .unwrap();
        writeln!(file, "not json").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
