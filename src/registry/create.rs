//! New entries: launchers built from a command line, and desktop files
//! imported into the user directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use url::Url;

use super::save::arm;
use super::Registry;
use crate::clock::Clock;
use crate::defaults::DESKTOP_SUFFIX;
use crate::entry::{is_blank, AutostartEntry, Field};
use crate::error::{Error, Result};
use crate::events::EntryEvent;
use crate::shell;

/// Fields of a launcher to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLauncher {
    pub exec: String,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub delay: u32,
    /// File name to start the free name search from, instead of the command
    pub basename: Option<String>,
}

impl NewLauncher {
    pub fn new(exec: impl Into<String>) -> Self {
        Self {
            exec: exec.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    pub fn basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = Some(basename.into());
        self
    }
}

impl<C: Clock> Registry<C> {
    /// Create a launcher in the user directory and arm its first save.
    ///
    /// Returns the chosen file name.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCommand`] when the command line is blank or cannot
    ///   be tokenized.
    /// - [`Error::NameExhausted`] when no free file name was found.
    pub fn create(&mut self, launcher: NewLauncher) -> Result<String> {
        if is_blank(Some(&launcher.exec)) {
            return Err(Error::InvalidCommand {
                command: launcher.exec,
                message: "command line is empty".to_string(),
            });
        }
        let argv = shell::split(&launcher.exec)?;

        // Only the last component is used so the file stays in the user directory.
        let suggested = launcher
            .basename
            .as_deref()
            .filter(|basename| !basename.trim().is_empty())
            .and_then(|basename| Path::new(basename).file_name())
            .and_then(|name| name.to_str());
        let base = match suggested {
            Some(basename) => basename.to_string(),
            None => argv
                .first()
                .and_then(|program| Path::new(program).file_name())
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .ok_or_else(|| Error::InvalidCommand {
                    command: launcher.exec.clone(),
                    message: "no program name".to_string(),
                })?,
        };
        let filename = self.find_free_filename(&base)?;

        let mut entry = AutostartEntry::new_launcher(
            &filename,
            self.dirs.user_path_for(&filename),
            launcher.name.as_deref(),
            launcher.comment.as_deref(),
            &launcher.exec,
            launcher.delay,
        );
        let deadline = self.clock.now() + self.settings.save_delay;
        arm(&mut entry, &self.dirs, deadline);

        debug!("Created launcher {} for '{}'", filename, launcher.exec);
        self.entries.insert(filename.clone(), entry);
        self.emit(EntryEvent::Added(filename.clone()));
        Ok(filename)
    }

    /// Copy an external desktop file into the user directory and load it.
    ///
    /// `source` is a path or a `file://` URL. An imported entry that was
    /// hidden is made visible again. Returns the chosen file name.
    pub fn copy_from(&mut self, source: &str) -> Result<String> {
        let src = resolve_source(source)?;
        let copy_error = |dst: &Path, message: String| Error::Copy {
            src: src.display().to_string(),
            dst: dst.display().to_string(),
            message,
        };

        let basename = src
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| copy_error(Path::new(""), "source has no file name".to_string()))?
            .to_string();
        let filename = self.find_free_filename(&basename)?;
        let dst = self.dirs.user_path_for(&filename);

        std::fs::create_dir_all(self.dirs.user_dir())
            .map_err(|e| copy_error(&dst, e.to_string()))?;
        if let Err(e) = std::fs::copy(&src, &dst) {
            match std::fs::remove_file(&dst) {
                Err(cleanup) if cleanup.kind() != ErrorKind::NotFound => {
                    warn!("Could not remove partial copy {}: {}", dst.display(), cleanup);
                }
                _ => {}
            }
            return Err(copy_error(&dst, e.to_string()));
        }

        let hidden = match self.load(&dst, 0) {
            Some(entry) => entry.hidden(),
            None => {
                if let Err(e) = std::fs::remove_file(&dst) {
                    warn!("Could not remove {}: {}", dst.display(), e);
                }
                return Err(copy_error(
                    &dst,
                    "not a launchable desktop entry".to_string(),
                ));
            }
        };
        info!("Imported {} as {}", src.display(), filename);

        if hidden {
            let deadline = self.clock.now() + self.settings.save_delay;
            if let Some(entry) = self.entries.get_mut(&filename) {
                entry.hidden = false;
                entry.dirty.mark(Field::Hidden);
                arm(entry, &self.dirs, deadline);
            }
            self.emit(EntryEvent::Changed(filename.clone()));
        }
        Ok(filename)
    }

    /// First unused `<stem>.desktop`, `<stem>-1.desktop`, ... name.
    ///
    /// A name is in use when the registry knows it or a file with that name
    /// exists in the user directory.
    pub fn find_free_filename(&self, base: &str) -> Result<String> {
        let stem = base.strip_suffix(DESKTOP_SUFFIX).unwrap_or(base);
        let attempts = self.settings.max_name_attempts;

        for attempt in 0..attempts {
            let candidate = if attempt == 0 {
                format!("{}{}", stem, DESKTOP_SUFFIX)
            } else {
                format!("{}-{}{}", stem, attempt, DESKTOP_SUFFIX)
            };
            if !self.entries.contains_key(&candidate)
                && !self.dirs.user_path_for(&candidate).exists()
            {
                return Ok(candidate);
            }
        }

        Err(Error::NameExhausted {
            base: stem.to_string(),
            attempts,
        })
    }
}

fn resolve_source(source: &str) -> Result<PathBuf> {
    if !source.contains("://") {
        return Ok(PathBuf::from(source));
    }
    let url = Url::parse(source)?;
    url.to_file_path().map_err(|()| Error::Copy {
        src: source.to_string(),
        dst: String::new(),
        message: format!("unsupported URL scheme '{}'", url.scheme()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Settings;
    use crate::entry::{DirtyFields, USER_RANK};
    use tempfile::TempDir;

    fn registry(temp: &TempDir) -> Registry<ManualClock> {
        let settings = Settings::new(temp.path().join("user"), vec![temp.path().join("sys")]);
        Registry::with_clock(settings, ManualClock::new())
    }

    #[test]
    fn test_create_uses_program_basename() {
        let temp = TempDir::new().unwrap();
        let mut registry = registry(&temp);

        let filename = registry
            .create(NewLauncher::new("/usr/bin/redshift -l 0:0").name("Redshift"))
            .unwrap();
        assert_eq!(filename, "redshift.desktop");

        let entry = registry.find(&filename).unwrap();
        assert_eq!(entry.directory_rank(), Some(USER_RANK));
        assert_eq!(entry.shadowed_system_rank(), None);
        assert_eq!(entry.dirty_fields(), DirtyFields::all());
        assert!(entry.is_save_armed());
        assert_eq!(entry.source_path(), temp.path().join("user/redshift.desktop"));
    }

    #[test]
    fn test_create_same_base_twice() {
        let temp = TempDir::new().unwrap();
        let mut registry = registry(&temp);

        let first = registry.create(NewLauncher::new("foo")).unwrap();
        let second = registry.create(NewLauncher::new("foo --other")).unwrap();
        assert_eq!(first, "foo.desktop");
        assert_eq!(second, "foo-1.desktop");
    }

    #[test]
    fn test_create_with_suggested_basename() {
        let temp = TempDir::new().unwrap();
        let mut registry = registry(&temp);
        let filename = registry
            .create(NewLauncher::new("foo").basename("custom.desktop"))
            .unwrap();
        assert_eq!(filename, "custom.desktop");
    }

    #[test]
    fn test_create_keeps_suggested_basename_in_user_dir() {
        let temp = TempDir::new().unwrap();
        let mut registry = registry(&temp);

        let filename = registry
            .create(NewLauncher::new("foo").basename("../escaped"))
            .unwrap();
        assert_eq!(filename, "escaped.desktop");
        registry.flush(&filename).unwrap();
        assert!(temp.path().join("user/escaped.desktop").is_file());
        assert!(!temp.path().join("escaped.desktop").exists());

        let fallback = registry.create(NewLauncher::new("foo").basename("..")).unwrap();
        assert_eq!(fallback, "foo.desktop");
    }

    #[test]
    fn test_create_rejects_bad_commands() {
        let temp = TempDir::new().unwrap();
        let mut registry = registry(&temp);
        assert!(matches!(
            registry.create(NewLauncher::new("   ")),
            Err(Error::InvalidCommand { .. })
        ));
        assert!(matches!(
            registry.create(NewLauncher::new("foo 'unterminated")),
            Err(Error::InvalidCommand { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_free_name_skips_existing_user_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("user")).unwrap();
        std::fs::write(temp.path().join("user/foo.desktop"), "").unwrap();
        let registry = registry(&temp);

        assert_eq!(registry.find_free_filename("foo").unwrap(), "foo-1.desktop");
    }

    #[test]
    fn test_free_name_exhaustion() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::new(temp.path().join("user"), Vec::new()).with_max_name_attempts(2);
        let mut registry = Registry::with_clock(settings, ManualClock::new());

        registry.create(NewLauncher::new("foo")).unwrap();
        registry.create(NewLauncher::new("foo")).unwrap();
        let result = registry.create(NewLauncher::new("foo"));

        assert!(matches!(result, Err(Error::NameExhausted { attempts: 2, .. })));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_copy_from_unhides_entry() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("download/tool.desktop");
        std::fs::create_dir_all(src.parent().unwrap()).unwrap();
        std::fs::write(&src, "[Desktop Entry]\nName=Tool\nExec=tool\nHidden=true\n").unwrap();
        let mut registry = registry(&temp);

        let filename = registry.copy_from(src.to_str().unwrap()).unwrap();
        assert_eq!(filename, "tool.desktop");

        let entry = registry.find(&filename).unwrap();
        assert!(!entry.hidden());
        assert!(entry.dirty_fields().hidden);
        assert!(entry.is_save_armed());
        assert!(temp.path().join("user/tool.desktop").is_file());
    }

    #[test]
    fn test_copy_from_file_url() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("tool.desktop");
        std::fs::write(&src, "[Desktop Entry]\nExec=tool\n").unwrap();
        let mut registry = registry(&temp);

        let url = Url::from_file_path(&src).unwrap();
        let filename = registry.copy_from(url.as_str()).unwrap();
        assert_eq!(filename, "tool.desktop");
        assert!(!registry.find(&filename).unwrap().is_save_armed());
    }

    #[test]
    fn test_copy_from_removes_unloadable_copy() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("junk.desktop");
        std::fs::write(&src, "this is not a desktop file").unwrap();
        let mut registry = registry(&temp);

        let result = registry.copy_from(src.to_str().unwrap());
        assert!(matches!(result, Err(Error::Copy { .. })));
        assert!(!temp.path().join("user/junk.desktop").exists());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_copy_from_missing_source() {
        testing_logger::setup();
        let temp = TempDir::new().unwrap();
        let mut registry = registry(&temp);
        let result = registry.copy_from(temp.path().join("nope.desktop").to_str().unwrap());
        assert!(matches!(result, Err(Error::Copy { .. })));
        assert!(!temp.path().join("user/nope.desktop").exists());

        // nothing was copied, so there is nothing to clean up
        testing_logger::validate(|captured| {
            assert!(!captured
                .iter()
                .any(|log| log.body.contains("Could not remove partial copy")));
        });
    }

    #[test]
    fn test_copy_from_rejects_remote_urls() {
        let temp = TempDir::new().unwrap();
        let mut registry = registry(&temp);
        assert!(matches!(
            registry.copy_from("https://example.com/tool.desktop"),
            Err(Error::Copy { .. })
        ));
    }
}
