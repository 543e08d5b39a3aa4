//! Settings assembly and load-once caching.

use serde_yaml::Mapping;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use super::document::read_document;
use super::error::{LoadError, SettingError};
use super::extract;
use super::paths::{FsPathCheck, PathCheck};
use super::types::Settings;

/// Settings file used when no path is given.
pub const DEFAULT_FILE_NAME: &str = "settings.yml";

static GLOBAL: SettingsLoader = SettingsLoader::new();

/// Load settings through the process-wide loader.
///
/// The first successful call parses the file; every later call returns the
/// same instance, whatever path it passes.
pub fn load_settings(path: Option<&Path>) -> Result<Arc<Settings>, LoadError> {
    GLOBAL.load(path)
}

/// The process-wide loader behind [`load_settings`].
pub fn global() -> &'static SettingsLoader {
    &GLOBAL
}

/// Resolve an optional settings path to the one that will be read.
pub fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
}

impl Settings {
    /// Validate a raw document and build settings from it.
    ///
    /// Fields are extracted in document-schema order, so when several are
    /// broken the first one in that order is reported.
    pub fn from_mapping(doc: &Mapping, check: &dyn PathCheck) -> Result<Self, SettingError> {
        let default_stt_name = extract::default_speech_to_text(doc)?;
        let default_tts_name = extract::default_text_to_speech(doc)?;
        let default_trigger_name = extract::default_trigger(doc)?;
        let stts = extract::speech_to_text_engines(doc)?;
        let ttss = extract::text_to_speech_engines(doc)?;
        let triggers = extract::triggers(doc)?;
        let random_wake_up_answers = extract::random_wake_up_answers(doc)?;
        let random_wake_up_sounds = extract::random_wake_up_sounds(doc)?;
        let rest_api = extract::rest_api(doc)?;
        let cache_path = extract::cache_path(doc, check)?;

        Ok(Self {
            default_stt_name,
            default_tts_name,
            default_trigger_name,
            stts,
            ttss,
            triggers,
            random_wake_up_answers,
            random_wake_up_sounds,
            rest_api,
            cache_path,
        })
    }
}

struct Loaded {
    path: PathBuf,
    settings: Arc<Settings>,
}

/// Loads a settings file at most once.
///
/// The check-and-load sequence runs under a mutex: concurrent first calls
/// parse the file once and all receive the same `Arc`. A failed load
/// publishes nothing, so the next call tries again.
pub struct SettingsLoader<C = FsPathCheck> {
    loaded: Mutex<Option<Loaded>>,
    check: C,
}

impl SettingsLoader {
    /// Loader that validates `cache_path` against the real filesystem.
    pub const fn new() -> Self {
        Self {
            loaded: Mutex::new(None),
            check: FsPathCheck,
        }
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: PathCheck> SettingsLoader<C> {
    /// Loader with a custom `cache_path` check.
    pub fn with_path_check(check: C) -> Self {
        Self {
            loaded: Mutex::new(None),
            check,
        }
    }

    /// Return the loaded settings, reading `path` (default `settings.yml`)
    /// on the first successful call only.
    pub fn load(&self, path: Option<&Path>) -> Result<Arc<Settings>, LoadError> {
        let mut loaded = self.lock();

        if let Some(current) = loaded.as_ref() {
            if let Some(requested) = path {
                if requested != current.path {
                    debug!(
                        "Settings already loaded from {}, ignoring {}",
                        current.path.display(),
                        requested.display()
                    );
                }
            }
            debug!("Settings already loaded");
            return Ok(Arc::clone(&current.settings));
        }

        let path = resolve_path(path);
        let settings = Arc::new(self.parse(&path)?);
        info!("Settings loaded from {}", path.display());

        *loaded = Some(Loaded {
            path,
            settings: Arc::clone(&settings),
        });
        Ok(settings)
    }

    /// Read and validate a settings file without touching the cache.
    pub fn parse(&self, path: &Path) -> Result<Settings, LoadError> {
        let doc = read_document(path)?;
        Ok(Settings::from_mapping(&doc, &self.check)?)
    }

    /// The raw document a load would read.
    pub fn raw_document(&self, path: Option<&Path>) -> Result<Mapping, LoadError> {
        read_document(&resolve_path(path))
    }

    /// Whether a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    /// Path the cached settings were read from.
    pub fn loaded_path(&self) -> Option<PathBuf> {
        self.lock().as_ref().map(|l| l.path.clone())
    }

    // The guarded state is either fully published or untouched, so a
    // poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Option<Loaded>> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::error::SettingErrorKind;
    use crate::settings::types::NamedComponent;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const VALID: &str = r#"
default_speech_to_text: google
default_text_to_speech: pico2wave
default_trigger: snowboy

speech_to_text:
  - google:
      language: en-US
  - bing

text_to_speech:
  - pico2wave:
      language: en-US
      cache: true
  - voxygen

triggers:
  - snowboy:
      pmdl_file: trigger/snowboy/resources/model.pmdl

random_wake_up_answers:
  - Yes sir?
  - I'm listening

rest_api:
  password_protected: true
  login: admin
  password: secret
  active: true
  port: 5000

cache_path: /tmp/assistant_tts_cache
"#;

    fn accept_all() -> SettingsLoader<impl PathCheck> {
        SettingsLoader::with_path_check(|_: &Path| true)
    }

    fn write_settings(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("settings.yml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), VALID);

        let settings = accept_all().load(Some(&path)).unwrap();

        assert_eq!(settings.default_stt_name, "google");
        assert_eq!(settings.default_tts_name, "pico2wave");
        assert_eq!(settings.default_trigger_name, "snowboy");
        assert_eq!(settings.stts.len(), 2);
        assert_eq!(settings.stts[1], NamedComponent::bare("bing"));
        assert_eq!(settings.ttss[0].name, "pico2wave");
        assert_eq!(settings.triggers.len(), 1);
        assert_eq!(
            settings.random_wake_up_answers.as_deref(),
            Some(&["Yes sir?".to_string(), "I'm listening".to_string()][..])
        );
        assert_eq!(settings.random_wake_up_sounds, None);
        assert_eq!(settings.rest_api.port, 5000);
        assert_eq!(settings.cache_path, PathBuf::from("/tmp/assistant_tts_cache"));
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), VALID);
        let loader = accept_all();

        let first = loader.load(Some(&path)).unwrap();
        fs::write(&path, VALID.replace("port: 5000", "port: 6000")).unwrap();
        let second = loader.load(Some(&path)).unwrap();
        let third = loader.load(None).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(second.rest_api.port, 5000);
        assert_eq!(loader.loaded_path(), Some(path));
    }

    #[test]
    fn test_cached_instance_survives_file_removal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), VALID);
        let loader = accept_all();

        let first = loader.load(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &loader.load(Some(&path)).unwrap()));
    }

    #[test]
    fn test_failed_load_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), &VALID.replace("port: 5000", "port: 80"));
        let loader = accept_all();

        let err = loader.load(Some(&path)).unwrap_err();
        let setting = err.setting().unwrap();
        assert_eq!(setting.kind, SettingErrorKind::Invalid);
        assert_eq!(setting.field, "rest_api.port");
        assert!(!loader.is_loaded());

        fs::write(&path, VALID).unwrap();
        let settings = loader.load(Some(&path)).unwrap();
        assert_eq!(settings.rest_api.port, 5000);
        assert!(loader.is_loaded());
    }

    #[test]
    fn test_first_broken_field_wins() {
        let broken = VALID
            .replace("default_text_to_speech: pico2wave", "default_text_to_speech:")
            .replace("cache_path: /tmp/assistant_tts_cache", "");
        let doc: Mapping = serde_yaml::from_str(&broken).unwrap();

        let err = Settings::from_mapping(&doc, &|_: &Path| true).unwrap_err();
        assert_eq!(err.kind, SettingErrorKind::NullValue);
        assert_eq!(err.field, "default_text_to_speech");
    }

    #[test]
    fn test_missing_triggers() {
        let mut doc: Mapping = serde_yaml::from_str(VALID).unwrap();
        doc.remove("triggers");

        let err = Settings::from_mapping(&doc, &|_: &Path| true).unwrap_err();
        assert_eq!(err.kind, SettingErrorKind::NotFound);
        assert_eq!(err.field, "triggers");
    }

    #[test]
    fn test_unusable_cache_path() {
        let doc: Mapping = serde_yaml::from_str(VALID).unwrap();

        let err = Settings::from_mapping(&doc, &|_: &Path| false).unwrap_err();
        assert_eq!(err.kind, SettingErrorKind::Invalid);
        assert_eq!(err.field, "cache_path");
    }

    #[test]
    fn test_missing_file_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let loader = accept_all();

        let err = loader.load(Some(&dir.path().join("settings.yml"))).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(!loader.is_loaded());
    }

    #[test]
    fn test_concurrent_first_loads_parse_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), VALID);
        let parses = AtomicUsize::new(0);
        let loader = SettingsLoader::with_path_check(|_: &Path| {
            parses.fetch_add(1, Ordering::SeqCst);
            true
        });

        let results: Vec<Arc<Settings>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| loader.load(Some(&path)).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(parses.load(Ordering::SeqCst), 1);
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    // The only test touching the process-wide loader.
    #[test]
    fn test_process_wide_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), VALID);
        let cache = dir.path().join("cache");
        fs::write(
            &path,
            VALID.replace("/tmp/assistant_tts_cache", &cache.to_string_lossy()),
        )
        .unwrap();

        let first = load_settings(Some(&path)).unwrap();
        assert!(global().is_loaded());
        assert!(Arc::ptr_eq(&first, &load_settings(None).unwrap()));
        assert_eq!(first.cache_path, cache);
    }

    #[test]
    fn test_raw_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), VALID);

        let doc = SettingsLoader::new().raw_document(Some(&path)).unwrap();
        assert!(doc.contains_key("rest_api"));
    }

    #[test]
    fn test_default_path() {
        assert_eq!(resolve_path(None), PathBuf::from("settings.yml"));
        assert_eq!(
            resolve_path(Some(Path::new("/etc/assistant.yml"))),
            PathBuf::from("/etc/assistant.yml")
        );
    }
}
