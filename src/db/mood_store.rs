use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::models::mood::{MoodEntry, MoodLabel};

/// Accepted on-disk layouts. Writes always use the bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLog {
    Bare(Vec<MoodEntry>),
    Versioned {
        #[allow(dead_code)]
        version: u32,
        entries: Vec<MoodEntry>,
    },
}

impl StoredLog {
    fn into_entries(self) -> Vec<MoodEntry> {
        match self {
            StoredLog::Bare(entries) => entries,
            StoredLog::Versioned { entries, .. } => entries,
        }
    }
}

/// Flat-file mood log. Every call goes to disk; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct MoodStore {
    path: PathBuf,
}

impl MoodStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted log.
    ///
    /// A missing file yields an empty log. An empty or unparseable file is
    /// deleted and also yields an empty log. Only genuine I/O failures are
    /// returned as errors.
    pub fn load(&self) -> Result<Vec<MoodEntry>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Read(e)),
        };

        if content.trim().is_empty() {
            self.discard("empty file");
            return Ok(Vec::new());
        }

        match serde_json::from_str::<StoredLog>(&content) {
            Ok(log) => Ok(log.into_entries()),
            Err(e) => {
                self.discard(&e.to_string());
                Ok(Vec::new())
            }
        }
    }

    /// Replace the whole log. The new content becomes visible in one rename.
    pub fn save(&self, entries: &[MoodEntry]) -> Result<(), StoreError> {
        let data = serde_json::to_vec(entries)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Same directory as the target so the rename stays on one filesystem
        let mut temp_file = NamedTempFile::new_in(dir).map_err(StoreError::Write)?;
        temp_file.write_all(&data).map_err(StoreError::Write)?;
        // The temp file is created owner-only; keep whatever mode the log already had
        if let Ok(meta) = fs::metadata(&self.path) {
            temp_file
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(StoreError::Write)?;
        }
        temp_file.as_file().sync_all().map_err(StoreError::Write)?;
        temp_file
            .persist(&self.path)
            .map_err(|e| StoreError::Write(e.error))?;

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "Mood data saved");
        Ok(())
    }

    /// Drop the whole history and leave an explicit empty array behind.
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::Write(e)),
        }
        self.save(&[])
    }

    /// Overwrite the mood of the most recent entry. Returns `false` when the
    /// log is empty and nothing was written.
    pub fn update_last_mood(&self, label: MoodLabel) -> Result<bool, StoreError> {
        let mut entries = self.load()?;
        let Some(last) = entries.last_mut() else {
            return Ok(false);
        };
        last.mood = label;
        self.save(&entries)?;
        Ok(true)
    }

    /// Cheap readiness probe that never mutates the file.
    pub fn probe(&self) -> Result<(), StoreError> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(StoreError::Read(std::io::Error::new(
                ErrorKind::Other,
                "mood data path is not a regular file",
            ))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Read(e)),
        }
    }

    fn discard(&self, reason: &str) {
        tracing::warn!(path = %self.path.display(), reason = %reason, "Discarding unreadable mood data");
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(error = %e, "Failed to delete unreadable mood data");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (MoodStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = MoodStore::new(temp_dir.path().join("mood_data.json"));
        (store, temp_dir)
    }

    fn entry(date: &str, mood: MoodLabel, stress: i32, water: i32, energy: i32) -> MoodEntry {
        MoodEntry {
            date: date.into(),
            mood,
            stress,
            water,
            energy,
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (store, _dir) = setup_store();
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_load_after_save_empty() {
        let (store, _dir) = setup_store();
        store.save(&[]).unwrap();
        assert_eq!(store.load().unwrap(), Vec::<MoodEntry>::new());
    }

    #[test]
    fn test_load_corrupt_file_deletes_it() {
        let (store, _dir) = setup_store();
        fs::write(store.path(), "not json").unwrap();
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_load_wrong_shape_deletes_it() {
        let (store, _dir) = setup_store();
        fs::write(store.path(), r#"{"date": "2026-01-01 00:00:00"}"#).unwrap();
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_load_blank_file_is_empty() {
        let (store, _dir) = setup_store();
        fs::write(store.path(), "  \n").unwrap();
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_round_trip() {
        let (store, _dir) = setup_store();
        let entries = vec![
            entry("2026-02-09 08:00:00", MoodLabel::Bad, 9, 2, 1),
            entry("2026-02-10 21:15:42", MoodLabel::Great, 0, 10, 10),
            entry("2026-02-11 12:00:00", MoodLabel::Meh, 5, 5, 5),
        ];
        assert!(store.load().unwrap().is_empty());
        store.save(&entries).unwrap();
        assert_eq!(store.load().unwrap(), entries);
    }

    #[test]
    fn test_save_does_not_validate_bounds() {
        let (store, _dir) = setup_store();
        let entries = vec![entry("2026-02-09 08:00:00", MoodLabel::Good, 42, -3, 11)];
        store.save(&entries).unwrap();
        assert_eq!(store.load().unwrap(), entries);
    }

    #[test]
    fn test_save_writes_bare_array() {
        let (store, _dir) = setup_store();
        store
            .save(&[entry("2026-02-09 08:00:00", MoodLabel::Good, 1, 2, 3)])
            .unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert!(raw.is_array());
        assert_eq!(raw[0]["mood"], "Good");
        assert_eq!(raw[0]["stress"], 1);
    }

    #[test]
    fn test_load_legacy_emoji_labels() {
        let (store, _dir) = setup_store();
        fs::write(
            store.path(),
            r#"[{"date":"2025-03-01 10:00:00","mood":"😞 Bad","stress":7,"water":3,"energy":2}]"#,
        )
        .unwrap();
        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mood, MoodLabel::Bad);
        assert_eq!(entries[0].stress, 7);
    }

    #[test]
    fn test_load_versioned_envelope() {
        let (store, _dir) = setup_store();
        fs::write(
            store.path(),
            r#"{"version":1,"entries":[{"date":"2025-03-01 10:00:00","mood":"Good","stress":1,"water":2,"energy":3}]}"#,
        )
        .unwrap();
        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mood, MoodLabel::Good);
    }

    #[test]
    fn test_clear_leaves_empty_array() {
        let (store, _dir) = setup_store();
        store
            .save(&[entry("2026-02-09 08:00:00", MoodLabel::Good, 1, 2, 3)])
            .unwrap();
        store.clear().unwrap();
        assert!(store.path().exists());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_clear_without_file() {
        let (store, _dir) = setup_store();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_update_last_mood_empty_is_noop() {
        let (store, _dir) = setup_store();
        assert!(!store.update_last_mood(MoodLabel::Good).unwrap());
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_last_mood_only_touches_last() {
        let (store, _dir) = setup_store();
        let first = entry("2026-02-09 08:00:00", MoodLabel::Bad, 8, 3, 2);
        let second = entry("2026-02-10 08:00:00", MoodLabel::Meh, 4, 6, 7);
        store.save(&[first.clone(), second.clone()]).unwrap();

        assert!(store.update_last_mood(MoodLabel::Good).unwrap());

        let entries = store.load().unwrap();
        assert_eq!(entries[0], first);
        assert_eq!(entries[1].mood, MoodLabel::Good);
        assert_eq!(entries[1].date, second.date);
        assert_eq!(entries[1].stress, second.stress);
        assert_eq!(entries[1].water, second.water);
        assert_eq!(entries[1].energy, second.energy);
    }

    #[test]
    fn test_probe() {
        let (store, dir) = setup_store();
        assert!(store.probe().is_ok());
        store.save(&[]).unwrap();
        assert!(store.probe().is_ok());
        let dir_store = MoodStore::new(dir.path());
        assert!(dir_store.probe().is_err());
    }

    #[test]
    fn test_load_unreadable_file_is_error_and_kept() {
        let (store, _dir) = setup_store();
        fs::write(store.path(), [0xff, 0xfe, 0xfd]).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Read(_))));
        assert!(store.update_last_mood(MoodLabel::Good).is_err());
        assert_eq!(fs::read(store.path()).unwrap(), vec![0xff, 0xfe, 0xfd]);
    }

    #[test]
    fn test_save_into_missing_directory_is_error() {
        let (_, dir) = setup_store();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();
        let store = MoodStore::new(blocker.join("mood_data.json"));
        assert!(matches!(store.save(&[]), Err(StoreError::Write(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _dir) = setup_store();
        store.save(&[]).unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store
            .save(&[entry("2026-02-10 08:00:00", MoodLabel::Good, 1, 2, 3)])
            .unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
