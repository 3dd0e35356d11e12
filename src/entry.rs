//! # Autostart Entries
//!
//! This module defines [`AutostartEntry`], the in-memory state of one
//! autostart desktop file, identified by its file name.
//!
//! An entry carries three kinds of state:
//!
//! - **Fields read from the file**: visibility flags, name, command, comment,
//!   icon and startup delay.
//! - **Derived values**: the resolved [`EntryIcon`] and the description markup,
//!   recomputed whenever the fields they depend on change.
//! - **Sync state**: where the authoritative file lives (its directory rank),
//!   which system directory also defines it, which fields are dirty, and the
//!   bookkeeping of the deferred save.
//!
//! Entries are created and mutated only through the
//! [`Registry`](crate::registry::Registry); this module exposes read access
//! and the comparison helpers the registry needs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::keyfile::{keys, DesktopFile};
use crate::locale::Locale;

/// Position of a directory in the autostart search order.
///
/// Rank 0 is the user directory; ranks 1..N are system directories.
pub type Rank = u32;

/// Rank of the per-user autostart directory.
pub const USER_RANK: Rank = 0;

/// Placeholder shown when an entry has neither a name nor a command.
pub const NO_NAME: &str = "No name";

/// Placeholder shown when an entry has no comment.
pub const NO_DESCRIPTION: &str = "No description";

/// A persisted field of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Hidden,
    Name,
    Comment,
    Exec,
    Delay,
}

/// Fields changed in memory and not yet written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFields {
    pub hidden: bool,
    pub name: bool,
    pub comment: bool,
    pub exec: bool,
    pub delay: bool,
}

impl DirtyFields {
    /// Every persisted field.
    pub fn all() -> Self {
        Self {
            hidden: true,
            name: true,
            comment: true,
            exec: true,
            delay: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn mark(&mut self, field: Field) {
        match field {
            Field::Hidden => self.hidden = true,
            Field::Name => self.name = true,
            Field::Comment => self.comment = true,
            Field::Exec => self.exec = true,
            Field::Delay => self.delay = true,
        }
    }

    pub fn contains(&self, field: Field) -> bool {
        match field {
            Field::Hidden => self.hidden,
            Field::Name => self.name,
            Field::Comment => self.comment,
            Field::Exec => self.exec,
            Field::Delay => self.delay,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Icon of an entry: a file on disk or a name looked up in the icon theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryIcon {
    File(PathBuf),
    Themed(String),
}

impl EntryIcon {
    /// Absolute paths are icon files; anything else is a theme icon name.
    pub fn resolve(spec: &str) -> Self {
        let path = Path::new(spec);
        if path.is_absolute() {
            EntryIcon::File(path.to_path_buf())
        } else {
            EntryIcon::Themed(spec.to_string())
        }
    }
}

/// Blank-tolerant string equality: an absent value equals an empty one.
pub fn text_equal(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        (Some(s), None) | (None, Some(s)) => s.is_empty(),
    }
}

/// Absent, empty or whitespace-only.
pub fn is_blank(text: Option<&str>) -> bool {
    text.is_none_or(|t| t.trim().is_empty())
}

/// Whether a desktop file may be launched in one of the given desktops.
///
/// `OnlyShowIn`, when present, must name one of them; `NotShowIn` must not.
pub fn is_launchable(file: &DesktopFile, desktop_names: &[String]) -> bool {
    let listed = |list: &[String]| list.iter().any(|d| desktop_names.contains(d));

    if let Some(only) = file.get_string_list(keys::ONLY_SHOW_IN) {
        if !listed(&only) {
            return false;
        }
    }
    if let Some(not) = file.get_string_list(keys::NOT_SHOW_IN) {
        if listed(&not) {
            return false;
        }
    }
    true
}

/// One autostart desktop file known to the registry.
#[derive(Debug, Clone)]
pub struct AutostartEntry {
    pub(crate) filename: String,
    pub(crate) source_path: PathBuf,

    pub(crate) hidden: bool,
    pub(crate) no_display: bool,
    pub(crate) name: Option<String>,
    pub(crate) exec: Option<String>,
    pub(crate) comment: Option<String>,
    pub(crate) icon_spec: Option<String>,
    pub(crate) delay: u32,

    icon: Option<EntryIcon>,
    description: String,

    /// `None` while the entry is between definitions
    pub(crate) directory_rank: Option<Rank>,
    /// Lowest system rank that also defines this file name
    pub(crate) shadowed_system_rank: Option<Rank>,

    pub(crate) dirty: DirtyFields,
    /// Merge base for the next save when the user copy does not exist yet
    pub(crate) pending_original_path: Option<PathBuf>,
    /// The next change notification for our own path is our own write
    pub(crate) suppress_next_change: bool,
    pub(crate) save_deadline: Option<Instant>,
}

impl AutostartEntry {
    /// Build an entry from a parsed desktop file found at `path`.
    pub(crate) fn from_document(
        filename: &str,
        path: &Path,
        file: &DesktopFile,
        locale: Option<&Locale>,
        rank: Rank,
    ) -> Self {
        let exec = file.get_string(keys::EXEC);
        let mut name = file.get_locale_string(keys::NAME, locale);
        if is_blank(name.as_deref()) {
            name = exec.clone();
        }

        let mut entry = Self {
            filename: filename.to_string(),
            source_path: path.to_path_buf(),
            hidden: file.get_boolean(keys::HIDDEN, false),
            no_display: file.get_boolean(keys::NO_DISPLAY, false),
            name,
            exec,
            comment: file.get_locale_string(keys::COMMENT, locale),
            icon_spec: None,
            delay: file.get_delay(),
            icon: None,
            description: String::new(),
            directory_rank: Some(rank),
            shadowed_system_rank: None,
            dirty: DirtyFields::default(),
            pending_original_path: None,
            suppress_next_change: false,
            save_deadline: None,
        };
        entry.set_icon_spec(file.get_locale_string(keys::ICON, locale));
        entry.refresh_description();
        entry
    }

    /// Build a brand-new launcher living in the user directory.
    ///
    /// Every field is dirty: nothing about it exists on disk yet.
    pub(crate) fn new_launcher(
        filename: &str,
        path: PathBuf,
        name: Option<&str>,
        comment: Option<&str>,
        exec: &str,
        delay: u32,
    ) -> Self {
        let name = if is_blank(name) { Some(exec) } else { name };
        let mut entry = Self {
            filename: filename.to_string(),
            source_path: path,
            hidden: false,
            no_display: false,
            name: name.map(str::to_string),
            exec: Some(exec.to_string()),
            comment: comment.map(str::to_string),
            icon_spec: None,
            delay,
            icon: None,
            description: String::new(),
            directory_rank: Some(USER_RANK),
            shadowed_system_rank: None,
            dirty: DirtyFields::all(),
            pending_original_path: None,
            suppress_next_change: false,
            save_deadline: None,
        };
        entry.refresh_description();
        entry
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Path of the file currently considered authoritative.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Enabled entries launch at login.
    pub fn is_enabled(&self) -> bool {
        !self.hidden
    }

    pub fn no_display(&self) -> bool {
        self.no_display
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn exec(&self) -> Option<&str> {
        self.exec.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn icon_spec(&self) -> Option<&str> {
        self.icon_spec.as_deref()
    }

    pub fn icon(&self) -> Option<&EntryIcon> {
        self.icon.as_ref()
    }

    /// Startup delay in seconds.
    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// Display markup: the name (or command) in bold, then the comment.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn directory_rank(&self) -> Option<Rank> {
        self.directory_rank
    }

    pub fn shadowed_system_rank(&self) -> Option<Rank> {
        self.shadowed_system_rank
    }

    pub fn dirty_fields(&self) -> DirtyFields {
        self.dirty
    }

    pub fn pending_original_path(&self) -> Option<&Path> {
        self.pending_original_path.as_deref()
    }

    pub fn is_save_armed(&self) -> bool {
        self.save_deadline.is_some()
    }

    pub fn save_deadline(&self) -> Option<Instant> {
        self.save_deadline
    }

    /// Whether the next change notification for this entry will be ignored.
    pub fn suppresses_next_change(&self) -> bool {
        self.suppress_next_change
    }

    pub(crate) fn set_icon_spec(&mut self, spec: Option<String>) {
        self.icon = spec.as_deref().map(EntryIcon::resolve);
        self.icon_spec = spec;
    }

    pub(crate) fn refresh_description(&mut self) {
        let primary = if !is_blank(self.name.as_deref()) {
            self.name.as_deref().unwrap_or_default()
        } else if !is_blank(self.exec.as_deref()) {
            self.exec.as_deref().unwrap_or_default()
        } else {
            NO_NAME
        };
        let secondary = if !is_blank(self.comment.as_deref()) {
            self.comment.as_deref().unwrap_or_default()
        } else {
            NO_DESCRIPTION
        };

        self.description = format!(
            "<b>{}</b>\n{}",
            quick_xml::escape::escape(primary),
            quick_xml::escape::escape(secondary)
        );
    }

    /// Whether a desktop file describes exactly what this entry holds now.
    ///
    /// Compares hidden, name, comment, exec, icon and delay with blank-tolerant
    /// equality.
    pub fn matches_document(&self, file: &DesktopFile, locale: Option<&Locale>) -> bool {
        file.get_boolean(keys::HIDDEN, false) == self.hidden
            && text_equal(
                file.get_locale_string(keys::NAME, locale).as_deref(),
                self.name(),
            )
            && text_equal(
                file.get_locale_string(keys::COMMENT, locale).as_deref(),
                self.comment(),
            )
            && text_equal(file.get_string(keys::EXEC).as_deref(), self.exec())
            && text_equal(
                file.get_locale_string(keys::ICON, locale).as_deref(),
                self.icon_spec(),
            )
            && file.get_delay() == self.delay
    }

    /// Write the dirty fields into `file`, leaving every other key alone.
    pub(crate) fn merge_dirty_into(&self, file: &mut DesktopFile, locale: Option<&Locale>) {
        if self.dirty.hidden {
            file.set_boolean(keys::HIDDEN, self.hidden);
        }
        if self.dirty.name {
            file.set_locale_string(keys::NAME, locale, self.name().unwrap_or_default());
            file.ensure_untranslated(keys::NAME, locale);
        }
        if self.dirty.comment {
            file.set_locale_string(keys::COMMENT, locale, self.comment().unwrap_or_default());
            file.ensure_untranslated(keys::COMMENT, locale);
        }
        if self.dirty.exec {
            file.set_string(keys::EXEC, self.exec().unwrap_or_default());
        }
        if self.dirty.delay {
            file.set_delay(self.delay);
        }
    }
}
