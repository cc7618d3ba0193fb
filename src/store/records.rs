//! Append-only CSV log of attendance events.
//!
//! Layout: optional UTF-8 byte-order mark, header row
//! `UserID,UserName,Action,Timestamp`, then one row per event.

use crate::errors::{AppError, AppResult};
use crate::models::record::HEADER;
use crate::models::{AttendanceRecord, SubjectDirectory};
use chrono::FixedOffset;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Written at the start of a new store so spreadsheet tools detect UTF-8.
const BOM: &[u8] = b"\xEF\xBB\xBF";

const DEFAULT_FILE_NAME: &str = "attendance_records.csv";

/// Result of a full pass over the store.
#[derive(Debug, Clone, Default)]
pub struct Scan {
    pub records: Vec<AttendanceRecord>,
    /// Rows dropped because of a wrong field count or unparsable values.
    pub skipped: usize,
}

impl Scan {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn filtered<F>(self, keep: F) -> Scan
    where
        F: Fn(&AttendanceRecord) -> bool,
    {
        Scan {
            records: self.records.into_iter().filter(|r| keep(r)).collect(),
            skipped: self.skipped,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    offset: FixedOffset,
}

impl RecordStore {
    /// `offset` is the fixed timezone the `Timestamp` column is written in.
    pub fn new(path: impl Into<PathBuf>, offset: FixedOffset) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name the store is shipped under as a document.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string())
    }

    /// Append one record, writing the header first when the file is new or empty.
    ///
    /// The row is encoded up front and handed to the OS in a single append,
    /// then synced, so a reader never observes half a row.
    pub fn append(&self, record: &AttendanceRecord) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let fresh = file.metadata()?.len() == 0;

        let mut buf: Vec<u8> = Vec::new();
        if fresh {
            buf.extend_from_slice(BOM);
        }
        {
            let mut wtr = WriterBuilder::new().has_headers(false).from_writer(&mut buf);
            if fresh {
                wtr.write_record(HEADER)?;
            }
            wtr.write_record(record.to_row())?;
            wtr.flush()?;
        }

        file.write_all(&buf)?;
        file.sync_data()?;

        debug!(
            path = %self.path.display(),
            subject = %record.subject_id,
            action = record.action.to_store_str(),
            "record appended"
        );
        Ok(())
    }

    /// Every data row, header excluded, in file order.
    ///
    /// Fails with `StoreMissing` when the file was never created.
    pub fn scan_all(&self) -> AppResult<Scan> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::StoreMissing(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let body = bytes.strip_prefix(BOM).unwrap_or(&bytes);
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(body);

        let mut scan = Scan::default();
        let mut raw = StringRecord::new();
        let mut first = true;

        loop {
            let line = rdr.position().line();
            match rdr.read_record(&mut raw) {
                Ok(false) => break,
                Ok(true) => {
                    if first {
                        first = false;
                        if is_header(&raw) {
                            continue;
                        }
                    }
                    match AttendanceRecord::from_row(&raw, self.offset) {
                        Ok(rec) => scan.records.push(rec),
                        Err(reason) => {
                            let err = AppError::MalformedRow { line, reason };
                            warn!(path = %self.path.display(), "{err}");
                            scan.skipped += 1;
                        }
                    }
                }
                Err(e) => {
                    // invalid UTF-8 and similar: drop the row, keep reading
                    first = false;
                    warn!(path = %self.path.display(), line, error = %e, "unreadable row skipped");
                    scan.skipped += 1;
                }
            }
        }

        Ok(scan)
    }

    /// Same as [`scan_all`](Self::scan_all) but a missing store reads as empty.
    pub fn scan_all_or_empty(&self) -> AppResult<Scan> {
        match self.scan_all() {
            Err(AppError::StoreMissing(_)) => Ok(Scan::default()),
            other => other,
        }
    }

    pub fn scan_by_subject(&self, subject_id: &str) -> AppResult<Scan> {
        Ok(self.scan_all()?.filtered(|r| r.subject_id == subject_id))
    }

    /// Records whose timestamp date component equals `iso_date` (`YYYY-MM-DD`).
    pub fn scan_by_date_prefix(&self, iso_date: &str) -> AppResult<Scan> {
        Ok(self.scan_all()?.filtered(|r| r.date_str() == iso_date))
    }

    /// Known users, first-seen display name per id, in scan order.
    pub fn distinct_subjects(&self) -> AppResult<SubjectDirectory> {
        let mut dir = SubjectDirectory::new();
        for r in self.scan_all_or_empty()?.records {
            dir.insert_first_seen(&r.subject_id, &r.display_name);
        }
        Ok(dir)
    }

    /// Raw store bytes, as shipped to the administrator.
    pub fn read_bytes(&self) -> AppResult<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(b) => Ok(b),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::StoreMissing(self.path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// True when the file exists and holds at least one byte.
    pub fn has_content(&self) -> bool {
        fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    /// Encode a slice of records as a standalone CSV document in store layout.
    pub fn render_csv(records: &[AttendanceRecord]) -> AppResult<Vec<u8>> {
        let mut buf: Vec<u8> = BOM.to_vec();
        {
            let mut wtr = WriterBuilder::new().has_headers(false).from_writer(&mut buf);
            wtr.write_record(HEADER)?;
            for r in records {
                wtr.write_record(r.to_row())?;
            }
            wtr.flush()?;
        }
        Ok(buf)
    }
}

fn is_header(row: &StringRecord) -> bool {
    row.len() == HEADER.len() && row.iter().zip(HEADER).all(|(a, b)| a.trim() == b)
}
