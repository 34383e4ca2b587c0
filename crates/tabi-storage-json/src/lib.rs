use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use tabi_core::{ChangeSet, CoreError, CoreResult, EntityStore};
use tabi_domain::{Entity, EntityRef, TripBook, CURRENT_SCHEMA_VERSION};
use tracing::{debug, info, warn};

const BOOK_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Directories a store reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub data_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    pub fn under(base: &Path) -> Self {
        Self {
            data_root: base.join("books"),
            backup_root: base.join("backups"),
        }
    }

    pub fn book_path(&self, name: &str) -> PathBuf {
        self.data_root
            .join(format!("{}.{}", canonical_name(name), BOOK_EXTENSION))
    }

    pub fn backup_dir(&self, name: &str) -> PathBuf {
        self.backup_root.join(canonical_name(name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub id: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
}

/// A trip book persisted as one pretty-printed JSON document.
///
/// Staged changes live in memory until `save`, which applies them to a copy
/// of the committed book, snapshots the previous file into the backup
/// directory, and replaces the document through a temp file and a rename.
/// Nothing in memory changes unless the rename succeeded.
#[derive(Debug)]
pub struct JsonEntityStore {
    paths: StoragePaths,
    slug: String,
    retention: usize,
    committed: TripBook,
    staged: ChangeSet,
}

impl JsonEntityStore {
    /// Opens the named book, starting an empty one when no file exists yet.
    pub fn open(paths: StoragePaths, name: &str) -> CoreResult<Self> {
        Self::open_with_retention(paths, name, DEFAULT_RETENTION)
    }

    pub fn open_with_retention(
        paths: StoragePaths,
        name: &str,
        retention: usize,
    ) -> CoreResult<Self> {
        fs::create_dir_all(&paths.data_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        let path = paths.book_path(name);
        let committed = if path.exists() {
            load_book_from_path(&path)?
        } else {
            debug!(path = %path.display(), "starting new trip book");
            TripBook::new(name.trim(), Utc::now())
        };
        Ok(Self {
            slug: canonical_name(name),
            paths,
            retention: retention.max(1),
            committed,
            staged: ChangeSet::new(),
        })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn book_path(&self) -> PathBuf {
        self.paths.book_path(&self.slug)
    }

    pub fn book_name(&self) -> &str {
        &self.committed.name
    }

    pub fn set_retention(&mut self, retention: usize) {
        self.retention = retention.max(1);
    }

    /// Names of the books stored under `paths`, sorted.
    pub fn list_books(paths: &StoragePaths) -> CoreResult<Vec<String>> {
        if !paths.data_root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&paths.data_root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Writes a snapshot of the committed book into the backup directory.
    pub fn backup(&self, note: Option<&str>) -> CoreResult<BackupInfo> {
        let dir = self.paths.backup_dir(&self.slug);
        fs::create_dir_all(&dir)?;
        let mut stem = format!("{}_{}", self.slug, backup_stamp());
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{}.{}", stem, BOOK_EXTENSION);
        let path = dir.join(&file_name);
        let data = serialize_book(&self.committed)?;
        write_atomic(&path, &data)?;
        self.prune_backups()?;
        info!(backup = %file_name, "trip book backed up");
        Ok(BackupInfo {
            created_at: parse_backup_timestamp(&file_name),
            id: file_name,
            path,
            size_bytes: data.len() as u64,
        })
    }

    /// Backups of this book, newest first.
    pub fn list_backups(&self) -> CoreResult<Vec<BackupInfo>> {
        let dir = self.paths.backup_dir(&self.slug);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BOOK_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
                entries.push(BackupInfo {
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    path: path.clone(),
                    size_bytes,
                });
            }
        }
        entries.sort_by(|a, b| {
            Reverse(a.created_at)
                .cmp(&Reverse(b.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    /// Replaces the book with a backup. Staged changes are dropped and the
    /// current file is snapshotted first.
    pub fn restore(&mut self, backup_id: &str) -> CoreResult<TripBook> {
        if !is_plain_file_name(backup_id) {
            return Err(CoreError::Persistence(format!(
                "invalid backup id `{backup_id}`"
            )));
        }
        let path = self.paths.backup_dir(&self.slug).join(backup_id);
        if !path.is_file() {
            return Err(CoreError::Persistence(format!(
                "backup `{backup_id}` not found"
            )));
        }
        let book = load_book_from_path(&path)?;
        let book_path = self.book_path();
        self.backup_existing_file(&book_path)?;
        save_book_to_path(&book, &book_path)?;
        self.committed = book.clone();
        self.staged = ChangeSet::new();
        info!(backup = backup_id, "trip book restored");
        Ok(book)
    }

    fn backup_existing_file(&self, path: &Path) -> CoreResult<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.paths.backup_dir(&self.slug);
        fs::create_dir_all(&dir)?;
        let file_name = format!("{}_{}.{}", self.slug, backup_stamp(), BOOK_EXTENSION);
        fs::copy(path, dir.join(file_name))?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> CoreResult<()> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "could not prune backup");
            }
        }
        Ok(())
    }
}

impl EntityStore for JsonEntityStore {
    fn load(&self) -> CoreResult<TripBook> {
        Ok(self.committed.clone())
    }

    fn insert(&mut self, entity: Entity) {
        self.staged.insert(entity);
    }

    fn delete(&mut self, entity: EntityRef) {
        self.staged.delete(entity);
    }

    fn save(&mut self) -> CoreResult<()> {
        let mut next = self.committed.clone();
        self.staged.apply_to(&mut next);
        next.touch(Utc::now());
        next.schema_version = CURRENT_SCHEMA_VERSION;

        let path = self.book_path();
        self.backup_existing_file(&path)?;
        save_book_to_path(&next, &path)?;

        debug!(changes = self.staged.len(), path = %path.display(), "trip book saved");
        self.committed = next;
        self.staged = ChangeSet::new();
        Ok(())
    }

    fn discard(&mut self) {
        self.staged = ChangeSet::new();
    }

    fn pending(&self) -> usize {
        self.staged.len()
    }
}

/// Saves a book to an arbitrary path on disk.
pub fn save_book_to_path(book: &TripBook, path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_book(book)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a book from the provided filesystem path.
pub fn load_book_from_path(path: &Path) -> CoreResult<TripBook> {
    let data = fs::read_to_string(path)?;
    let book: TripBook =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    if book.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::Persistence(format!(
            "{} uses schema version {}, newer than supported {}",
            path.display(),
            book.schema_version,
            CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(book)
}

/// Lowercase file-safe form of a book name.
/// Backup ids are bare file names inside the book's backup directory.
fn is_plain_file_name(id: &str) -> bool {
    !id.trim().is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}

pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "trips".into()
    } else {
        sanitized
    }
}

fn backup_stamp() -> String {
    Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string()
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
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
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Finds the `YYYYMMDD_HHMMSS` pair in a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BOOK_EXTENSION))?;
    let segments: Vec<&str> = trimmed.split('_').collect();
    segments.windows(2).rev().find_map(|pair| {
        if !is_digits(pair[0], 8) || !is_digits(pair[1], 6) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}{}", pair[0], pair[1]), "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_book(book: &TripBook) -> CoreResult<String> {
    serde_json::to_string_pretty(book).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_are_file_safe() {
        assert_eq!(canonical_name("Family Trips"), "family_trips");
        assert_eq!(canonical_name("  "), "trips");
        assert_eq!(canonical_name("kyoto-2025"), "kyoto-2025");
    }

    #[test]
    fn backup_timestamps_parse_with_or_without_note() {
        let plain = parse_backup_timestamp("trips_20250301_091500.json").unwrap();
        assert_eq!(plain.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-03-01 09:15:00");
        let noted = parse_backup_timestamp("family_trips_20250301_091500_before-edit.json");
        assert_eq!(noted, Some(plain));
        assert_eq!(parse_backup_timestamp("trips.json"), None);
    }

    #[test]
    fn notes_are_slugged() {
        assert_eq!(
            sanitize_backup_note(Some("Before  big edit!")),
            Some("before-big-edit".into())
        );
        assert_eq!(sanitize_backup_note(Some("   ")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }

    #[test]
    fn tmp_path_keeps_extension() {
        let tmp = tmp_path(Path::new("/data/trips.json"));
        assert_eq!(tmp, PathBuf::from("/data/trips.json.tmp"));
    }
}
