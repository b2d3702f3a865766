use std::{
    collections::HashSet,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::{LoadReport, RecordStore, Result, SaveReport, SkippedLine};
use crate::{
    config::Config,
    errors::{ConfigError, DataFileError, ParseError},
    ledger::{codec, Transaction},
    utils::tmp_path,
};

pub const PRIMARY_FILE: &str = "transactions.txt";
pub const BACKUP_FILE: &str = "transactions_backup.txt";

/// Flat text transaction log with a single rolling backup.
///
/// Saves go through a temp file that is renamed over the primary, so readers
/// never see a half-written log. There is no locking: one writer per file.
#[derive(Debug, Clone)]
pub struct TextLogStore {
    primary: PathBuf,
    backup: PathBuf,
}

impl TextLogStore {
    pub fn new(primary: PathBuf, backup: PathBuf) -> Self {
        Self { primary, backup }
    }

    /// Store using the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(PRIMARY_FILE), dir.join(BACKUP_FILE))
    }

    /// Builds a store from configuration, creating the data directory.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let dir = config.resolve_data_dir();
        fs::create_dir_all(&dir)?;
        Ok(Self::new(
            dir.join(&config.primary_file),
            dir.join(&config.backup_file),
        ))
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    pub fn tmp_path(&self) -> PathBuf {
        tmp_path(&self.primary)
    }

    fn write_temp(&self, tmp: &Path, records: &[Transaction]) -> io::Result<SaveReport> {
        if let Some(parent) = tmp.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(tmp)?;
        let mut writer = BufWriter::new(file);
        let mut report = SaveReport::default();
        for txn in records {
            if let Some(reason) = structural_issue(txn) {
                warn!(id = txn.id(), reason, "skipping transaction during save");
                report.skipped += 1;
                continue;
            }
            writeln!(writer, "{}", codec::encode(txn))?;
            report.written += 1;
        }
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(report)
    }

    /// Best effort: a failed backup never blocks the save.
    fn backup_existing(&self) -> bool {
        if !self.primary.exists() {
            return false;
        }
        match fs::copy(&self.primary, &self.backup) {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    backup = %self.backup.display(),
                    error = %err,
                    "could not create backup"
                );
                false
            }
        }
    }
}

impl RecordStore for TextLogStore {
    fn save(&self, records: &[Transaction]) -> Result<SaveReport> {
        let tmp = self.tmp_path();
        let mut report = match self.write_temp(&tmp, records) {
            Ok(report) => report,
            Err(source) => {
                let _ = fs::remove_file(&tmp);
                return Err(DataFileError::WriteTemp { path: tmp, source });
            }
        };
        debug!(written = report.written, skipped = report.skipped, "temp log written");

        report.backed_up = self.backup_existing();

        if let Err(source) = replace_file(&tmp, &self.primary) {
            let _ = fs::remove_file(&tmp);
            return Err(DataFileError::Replace {
                path: self.primary.clone(),
                source,
            });
        }
        debug!(path = %self.primary.display(), "transaction log saved");
        Ok(report)
    }

    fn load(&self) -> Result<LoadReport> {
        if !self.primary.exists() {
            info!(path = %self.primary.display(), "no existing data found, starting fresh");
            return Ok(LoadReport::default());
        }
        let bytes = fs::read(&self.primary).map_err(|source| DataFileError::Read {
            path: self.primary.clone(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        let mut report = LoadReport::default();
        let mut seen = HashSet::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            let parsed = codec::decode(line).and_then(|txn| {
                if seen.insert(txn.id()) {
                    Ok(txn)
                } else {
                    Err(ParseError::DuplicateId(txn.id()))
                }
            });
            match parsed {
                Ok(txn) => report.records.push(txn),
                Err(error) => {
                    warn!(line_no, %error, "skipping invalid transaction line");
                    report.skipped.push(SkippedLine {
                        line_no,
                        content: line.to_string(),
                        error,
                    });
                }
            }
        }

        info!(
            valid = report.valid(),
            invalid = report.invalid(),
            "loaded transactions"
        );
        if report.records.is_empty() && !report.skipped.is_empty() {
            warn!(path = %self.primary.display(), "file found but no valid transactions loaded");
        }
        Ok(report)
    }

    fn restore_from_backup(&self) -> Result<()> {
        if !self.backup.exists() {
            return Err(DataFileError::BackupMissing(self.backup.clone()));
        }
        let tmp = self.tmp_path();
        if let Err(source) = fs::copy(&self.backup, &tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(DataFileError::Restore {
                path: self.backup.clone(),
                source,
            });
        }
        if let Err(source) = replace_file(&tmp, &self.primary) {
            let _ = fs::remove_file(&tmp);
            return Err(DataFileError::Replace {
                path: self.primary.clone(),
                source,
            });
        }
        info!(backup = %self.backup.display(), "transaction log restored from backup");
        Ok(())
    }
}

/// Swaps `tmp` into place. `fs::rename` replaces the destination atomically on
/// Unix and uses `MoveFileEx` with replace semantics on Windows.
fn replace_file(tmp: &Path, dest: &Path) -> io::Result<()> {
    fs::rename(tmp, dest)
}

fn structural_issue(txn: &Transaction) -> Option<&'static str> {
    if txn.id() == 0 {
        Some("invalid id")
    } else if txn.amount() <= Decimal::ZERO {
        Some("invalid amount")
    } else if txn.description().trim().is_empty() {
        Some("invalid description")
    } else {
        None
    }
}
