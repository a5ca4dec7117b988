//! On-disk dictionary files and their backups.
//!
//! Layout inside the dictionary directory:
//! - `<lang>_words.json` is the authoritative entry array
//! - `<lang>_words_backup_<unix-millis>.json` is a copy taken before each overwrite
//!
//! Files are never patched in place. Every write takes a backup first, then
//! renames a fully written temp file over the dictionary. Backups are never
//! pruned.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::entry::DictionaryEntry;
use crate::error::{HygieneError, HygieneResult};

/// Language codes accepted when no allow-list is configured.
pub const DEFAULT_LANGUAGES: &[&str] = &["uk", "en", "es"];

/// A language code that passed the allow-list check.
///
/// Only [`DictionaryStore::language`] constructs these, so holding one means
/// validation already happened and no file I/O can run for a bad code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A backup file found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct BackupFile {
    /// Full path of the backup.
    #[schemars(with = "String")]
    pub path: Utf8PathBuf,
    /// Creation time in Unix milliseconds, parsed from the file name.
    pub created_millis: u64,
}

/// Directory of per-language dictionary files.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    dir: Utf8PathBuf,
    allowed: Vec<String>,
}

impl DictionaryStore {
    /// Store rooted at `dir`, accepting only the `allowed` language codes.
    pub fn new(dir: impl Into<Utf8PathBuf>, allowed: &[String]) -> Self {
        Self {
            dir: dir.into(),
            allowed: allowed.to_vec(),
        }
    }

    /// Store rooted at `dir` with [`DEFAULT_LANGUAGES`].
    pub fn with_default_languages(dir: impl Into<Utf8PathBuf>) -> Self {
        let allowed: Vec<String> = DEFAULT_LANGUAGES.iter().map(|s| (*s).to_string()).collect();
        Self::new(dir, &allowed)
    }

    /// Directory holding the dictionary files.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Validate `code` against the allow-list.
    pub fn language(&self, code: &str) -> HygieneResult<LanguageCode> {
        if self.allowed.iter().any(|allowed| allowed == code) {
            Ok(LanguageCode(code.to_string()))
        } else {
            Err(HygieneError::UnsupportedLanguage {
                code: code.to_string(),
                allowed: self.allowed.join(", "),
            })
        }
    }

    /// Path of the authoritative file for `lang`.
    pub fn path(&self, lang: &LanguageCode) -> Utf8PathBuf {
        self.dir.join(format!("{lang}_words.json"))
    }

    /// Read and parse the authoritative entry list.
    #[tracing::instrument(skip(self), fields(lang = %lang))]
    pub fn load(&self, lang: &LanguageCode) -> HygieneResult<Vec<DictionaryEntry>> {
        let path = self.path(lang);
        let file = fs::File::open(path.as_std_path()).map_err(|source| HygieneError::Load {
            path: path.clone(),
            source,
        })?;
        let entries: Vec<DictionaryEntry> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| HygieneError::Parse {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path, entries = entries.len(), "dictionary loaded");
        Ok(entries)
    }

    /// Back up the current file, then atomically replace it with `entries`.
    ///
    /// Returns the backup path. A failed backup aborts before the dictionary
    /// is touched; a failed write leaves the old file in place.
    #[tracing::instrument(skip(self, entries), fields(lang = %lang, entries = entries.len()))]
    pub fn replace(
        &self,
        lang: &LanguageCode,
        entries: &[DictionaryEntry],
    ) -> HygieneResult<Utf8PathBuf> {
        let path = self.path(lang);
        let backup = self.write_backup(lang, &path)?;

        let write_err = |source: std::io::Error| HygieneError::Write {
            path: path.clone(),
            source,
        };
        let tmp = NamedTempFile::new_in(self.dir.as_std_path()).map_err(write_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, entries).map_err(HygieneError::Serialize)?;
            writer.flush().map_err(write_err)?;
        }
        tmp.as_file().sync_all().map_err(write_err)?;
        // Keep the mode of the file being replaced, not the temp file's 0600.
        let permissions = fs::metadata(path.as_std_path())
            .map_err(write_err)?
            .permissions();
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(write_err)?;
        tmp.persist(path.as_std_path())
            .map_err(|e| write_err(e.error))?;

        tracing::info!(path = %path, backup = %backup, "dictionary replaced");
        Ok(backup)
    }

    /// Replace a dictionary from a serialized payload.
    ///
    /// The language must be on the allow-list and the payload must be a
    /// non-empty JSON array of entries. Both are checked before any file I/O.
    pub fn save_serialized(&self, code: &str, payload: &str) -> HygieneResult<Utf8PathBuf> {
        let lang = self.language(code)?;
        if payload.trim().is_empty() {
            return Err(HygieneError::InvalidPayload(
                "dictionary payload is empty".to_string(),
            ));
        }
        let entries: Vec<DictionaryEntry> = serde_json::from_str(payload)
            .map_err(|e| HygieneError::InvalidPayload(e.to_string()))?;
        self.replace(&lang, &entries)
    }

    /// Backups for `lang`, oldest first.
    pub fn backups(&self, lang: &LanguageCode) -> HygieneResult<Vec<BackupFile>> {
        let prefix = format!("{lang}_words_backup_");
        let read_dir = match self.dir.read_dir_utf8() {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(HygieneError::Load {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut backups = Vec::new();
        for item in read_dir {
            let item = item.map_err(|source| HygieneError::Load {
                path: self.dir.clone(),
                source,
            })?;
            let name = item.file_name();
            let Some(stamp) = name
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };
            let millis = stamp.split('-').next().and_then(|s| s.parse::<u64>().ok());
            if let Some(created_millis) = millis {
                backups.push(BackupFile {
                    path: item.path().to_path_buf(),
                    created_millis,
                });
            }
        }
        backups.sort_by(|a, b| {
            a.created_millis
                .cmp(&b.created_millis)
                .then_with(|| a.path.cmp(&b.path))
        });
        Ok(backups)
    }

    /// Copy `path` to a fresh timestamped backup, never overwriting an older one.
    fn write_backup(&self, lang: &LanguageCode, path: &Utf8Path) -> HygieneResult<Utf8PathBuf> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());

        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("{lang}_words_backup_{millis}.json")
            } else {
                format!("{lang}_words_backup_{millis}-{attempt}.json")
            };
            let backup = self.dir.join(name);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(backup.as_std_path())
            {
                Ok(mut dest) => {
                    let copied = fs::File::open(path.as_std_path())
                        .and_then(|mut src| std::io::copy(&mut src, &mut dest))
                        .and_then(|_| dest.sync_all());
                    if let Err(source) = copied {
                        if let Err(cleanup) = fs::remove_file(backup.as_std_path()) {
                            tracing::warn!(
                                backup = %backup,
                                error = %cleanup,
                                "failed to remove partial backup"
                            );
                        }
                        return Err(HygieneError::Backup {
                            path: backup,
                            source,
                        });
                    }
                    tracing::debug!(backup = %backup, "backup written");
                    return Ok(backup);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
                Err(source) => {
                    return Err(HygieneError::Backup {
                        path: backup,
                        source,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(entries: &[DictionaryEntry]) -> (TempDir, DictionaryStore) {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        fs::write(
            dir.join("uk_words.json"),
            serde_json::to_string(entries).unwrap(),
        )
        .unwrap();
        (tmp, DictionaryStore::with_default_languages(dir))
    }

    #[test]
    fn rejects_unlisted_language() {
        let store = DictionaryStore::with_default_languages("/nonexistent");
        let err = store.language("de").unwrap_err();
        assert!(matches!(err, HygieneError::UnsupportedLanguage { .. }));
        assert!(store.language("uk").is_ok());
    }

    #[test]
    fn load_reports_missing_file() {
        let (_tmp, store) = fixture(&[]);
        let en = store.language("en").unwrap();
        assert!(matches!(store.load(&en), Err(HygieneError::Load { .. })));
    }

    #[test]
    fn load_reports_bad_json() {
        let (_tmp, store) = fixture(&[]);
        let uk = store.language("uk").unwrap();
        fs::write(store.path(&uk), "{not json").unwrap();
        assert!(matches!(store.load(&uk), Err(HygieneError::Parse { .. })));
    }

    #[test]
    fn replace_backs_up_then_overwrites() {
        let original = vec![DictionaryEntry::new("a", 1), DictionaryEntry::new("b", 2)];
        let (_tmp, store) = fixture(&original);
        let uk = store.language("uk").unwrap();

        let backup = store.replace(&uk, &original[..1]).unwrap();

        assert_ne!(backup, store.path(&uk));
        let saved: Vec<DictionaryEntry> =
            serde_json::from_str(&fs::read_to_string(backup.as_std_path()).unwrap()).unwrap();
        assert_eq!(saved, original);
        assert_eq!(store.load(&uk).unwrap(), original[..1]);
    }

    #[cfg(unix)]
    #[test]
    fn replace_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let (_tmp, store) = fixture(&[DictionaryEntry::new("a", 1)]);
        let uk = store.language("uk").unwrap();
        let path = store.path(&uk);
        fs::set_permissions(path.as_std_path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.replace(&uk, &[]).unwrap();

        let mode = fs::metadata(path.as_std_path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn backups_do_not_collide() {
        let (_tmp, store) = fixture(&[DictionaryEntry::new("a", 1)]);
        let uk = store.language("uk").unwrap();
        let first = store.replace(&uk, &[]).unwrap();
        let second = store.replace(&uk, &[]).unwrap();
        assert_ne!(first, second);

        let listed = store.backups(&uk).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_millis <= listed[1].created_millis);
    }

    #[test]
    fn replace_without_source_fails_before_writing() {
        let (_tmp, store) = fixture(&[]);
        let en = store.language("en").unwrap();
        let err = store.replace(&en, &[DictionaryEntry::new("x", 1)]).unwrap_err();
        assert!(matches!(err, HygieneError::Backup { .. }));
        assert!(!store.path(&en).exists());
        // The partial backup was cleaned up.
        assert!(store.backups(&en).unwrap().is_empty());
    }

    #[test]
    fn save_serialized_validates_before_io() {
        let store = DictionaryStore::with_default_languages("/nonexistent");
        assert!(matches!(
            store.save_serialized("xx", "[]"),
            Err(HygieneError::UnsupportedLanguage { .. })
        ));
        assert!(matches!(
            store.save_serialized("uk", "  "),
            Err(HygieneError::InvalidPayload(_))
        ));
        assert!(matches!(
            store.save_serialized("uk", r#"{"word":"a"}"#),
            Err(HygieneError::InvalidPayload(_))
        ));
    }

    #[test]
    fn save_serialized_writes_payload() {
        let (_tmp, store) = fixture(&[DictionaryEntry::new("old", 1)]);
        store
            .save_serialized("uk", r#"[{"word":"new","freq":4}]"#)
            .unwrap();
        let uk = store.language("uk").unwrap();
        assert_eq!(store.load(&uk).unwrap(), [DictionaryEntry::new("new", 4)]);
    }

    #[test]
    fn backups_on_missing_dir_is_empty() {
        let store = DictionaryStore::with_default_languages("/nonexistent/dict");
        let uk = store.language("uk").unwrap();
        assert!(store.backups(&uk).unwrap().is_empty());
    }
}
