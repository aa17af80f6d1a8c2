use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use seiva_core::{CoreError, SchoolSnapshot, SchoolStorage};
use serde::{de::DeserializeOwned, Serialize};

const JSON_EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "school";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

const STUDENTS_FILE: &str = "students.json";
const TRANSACTIONS_FILE: &str = "transactions.json";
const EVENTS_FILE: &str = "events.json";
const EMPLOYEES_FILE: &str = "employees.json";
const PAYROLL_FILE: &str = "payroll.json";

/// Filesystem-backed JSON persistence: one file per collection plus snapshot backups.
#[derive(Debug, Clone)]
pub struct JsonSchoolStorage {
    data_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl JsonSchoolStorage {
    pub fn new(data_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(data_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(data_dir: PathBuf, retention: usize) -> Result<Self, CoreError> {
        let backups_dir = data_dir.join("backups");
        fs::create_dir_all(&data_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            data_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn students_path(&self) -> PathBuf {
        self.data_dir.join(STUDENTS_FILE)
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join(TRANSACTIONS_FILE)
    }

    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join(EVENTS_FILE)
    }

    pub fn employees_path(&self) -> PathBuf {
        self.data_dir.join(EMPLOYEES_FILE)
    }

    pub fn payroll_path(&self) -> PathBuf {
        self.data_dir.join(PAYROLL_FILE)
    }

    /// Writes the whole snapshot into a single timestamped backup file.
    pub fn backup(
        &self,
        snapshot: &SchoolSnapshot,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError> {
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{BACKUP_PREFIX}_{timestamp}");
        if let Some(label) = sanitize_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let path = self.free_backup_path(&stem);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &to_json(snapshot)?)?;
        fs::rename(&tmp, &path)?;
        self.prune_backups()?;
        describe_backup(&path).ok_or_else(|| {
            CoreError::Storage(format!("backup `{}` was pruned immediately", path.display()))
        })
    }

    /// Backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(JSON_EXTENSION)
            {
                continue;
            }
            if let Some(info) = describe_backup(&path) {
                let modified = fs::metadata(&path).and_then(|meta| meta.modified()).ok();
                entries.push((info, modified));
            }
        }
        // Names only resolve to the second; file mtime orders backups taken within one.
        entries.sort_by_key(|(info, modified)| Reverse((info.created_at, *modified)));
        Ok(entries.into_iter().map(|(info, _)| info).collect())
    }

    /// Reads a backup and makes it the current data. Returns the restored snapshot.
    pub fn restore_backup(&self, backup: &BackupInfo) -> Result<SchoolSnapshot, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let snapshot: SchoolSnapshot = read_json(&backup.path)?;
        self.save(&snapshot)?;
        Ok(snapshot)
    }

    fn free_backup_path(&self, stem: &str) -> PathBuf {
        let mut path = self.backups_dir.join(format!("{stem}.{JSON_EXTENSION}"));
        let mut counter = 1;
        while path.exists() {
            path = self
                .backups_dir
                .join(format!("{stem}-{counter}.{JSON_EXTENSION}"));
            counter += 1;
        }
        path
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl SchoolStorage for JsonSchoolStorage {
    fn load(&self) -> Result<Option<SchoolSnapshot>, CoreError> {
        let paths = [
            self.students_path(),
            self.transactions_path(),
            self.events_path(),
        ];
        let present = paths.iter().filter(|path| path.exists()).count();
        if present == 0 {
            return Ok(None);
        }
        if present < paths.len() {
            let missing: Vec<_> = paths
                .iter()
                .filter(|path| !path.exists())
                .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
                .collect();
            return Err(CoreError::Storage(format!(
                "incomplete data directory, missing {}",
                missing.join(", ")
            )));
        }
        Ok(Some(SchoolSnapshot {
            students: read_json(&paths[0])?,
            transactions: read_json(&paths[1])?,
            events: read_json(&paths[2])?,
            employees: read_optional_json(&self.employees_path())?,
            payroll: read_optional_json(&self.payroll_path())?,
        }))
    }

    fn save(&self, snapshot: &SchoolSnapshot) -> Result<(), CoreError> {
        fs::create_dir_all(&self.data_dir)?;
        save_json(&self.students_path(), &snapshot.students)?;
        save_json(&self.transactions_path(), &snapshot.transactions)?;
        save_json(&self.events_path(), &snapshot.events)?;
        save_json(&self.employees_path(), &snapshot.employees)?;
        save_json(&self.payroll_path(), &snapshot.payroll)?;
        Ok(())
    }
}

fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, &to_json(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|err| CoreError::Serde(format!("{}: {}", path.display(), err)))
}

/// Staff files came later than the core collections; a data directory
/// without them loads as empty.
fn read_optional_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, CoreError> {
    if path.exists() {
        read_json(path)
    } else {
        Ok(T::default())
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value).map_err(|err| CoreError::Serde(err.to_string()))
}

fn describe_backup(path: &Path) -> Option<BackupInfo> {
    let id = path.file_name()?.to_str()?.to_string();
    let size_bytes = fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
    Some(BackupInfo {
        created_at: parse_backup_timestamp(&id),
        id,
        size_bytes,
        path: path.to_path_buf(),
    })
}

fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `school_20241020_093015_note.json` carries its creation time in the name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{JSON_EXTENSION}"))?;
    let rest = stem.strip_prefix(&format!("{BACKUP_PREFIX}_"))?;
    let mut segments = rest.split('_');
    let date = segments.next()?;
    let time = segments.next()?.split('-').next()?;
    if !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
