//! Desktop entry documents
//!
//! This module provides [`DesktopFile`], a lossless in-memory view of a
//! desktop entry key file. It is the "structured config document" the
//! registry reads entries from and merges edits into.
//!
//! ## Features
//!
//! - Groups (`[Desktop Entry]`), `key=value` pairs and localized keys
//!   (`Name[de]=...`)
//! - Comments and blank lines are kept in place
//! - An unmodified document serializes back to the text it was parsed from
//! - Setting an existing key rewrites only that line; new keys are appended
//!   after the last key of the group
//! - Value escapes (`\s`, `\n`, `\t`, `\r`, `\\`) and `;`-separated lists
//!
//! All typed accessors operate on the `[Desktop Entry]` group.

use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::locale::Locale;

/// The main group of a desktop entry file.
pub const DESKTOP_GROUP: &str = "Desktop Entry";

/// Well-known keys of the `[Desktop Entry]` group.
pub mod keys {
    pub const TYPE: &str = "Type";
    pub const HIDDEN: &str = "Hidden";
    pub const NO_DISPLAY: &str = "NoDisplay";
    pub const NAME: &str = "Name";
    pub const COMMENT: &str = "Comment";
    pub const EXEC: &str = "Exec";
    pub const ICON: &str = "Icon";
    pub const ONLY_SHOW_IN: &str = "OnlyShowIn";
    pub const NOT_SHOW_IN: &str = "NotShowIn";
    /// Vendor key holding the startup delay in seconds
    pub const DELAY: &str = "X-MATE-Autostart-Delay";
}

/// A `key[locale]=value` line
#[derive(Clone, Debug, PartialEq)]
struct KeyLine {
    key: String,
    locale: Option<String>,
    /// Value as written in the file, still escaped
    raw_value: String,
    /// The whole line as it appeared in the file
    raw: String,
}

impl KeyLine {
    fn new(key: &str, locale: Option<&str>, raw_value: String) -> Self {
        let raw = match locale {
            Some(locale) => format!("{}[{}]={}", key, locale, raw_value),
            None => format!("{}={}", key, raw_value),
        };
        Self {
            key: key.to_string(),
            locale: locale.map(str::to_string),
            raw_value,
            raw,
        }
    }

    fn matches(&self, key: &str, locale: Option<&str>) -> bool {
        self.key == key && self.locale.as_deref() == locale
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Line {
    /// Blank or comment line, kept verbatim
    Verbatim(String),
    Entry(KeyLine),
}

#[derive(Clone, Debug, PartialEq)]
struct Group {
    name: String,
    header: String,
    lines: Vec<Line>,
}

impl Group {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            header: format!("[{}]", name),
            lines: Vec::new(),
        }
    }

    fn find(&self, key: &str, locale: Option<&str>) -> Option<&KeyLine> {
        self.lines.iter().find_map(|line| match line {
            Line::Entry(entry) if entry.matches(key, locale) => Some(entry),
            _ => None,
        })
    }

    fn set(&mut self, key: &str, locale: Option<&str>, raw_value: String) {
        let replacement = KeyLine::new(key, locale, raw_value);
        for line in self.lines.iter_mut() {
            if let Line::Entry(entry) = line {
                if entry.matches(key, locale) {
                    if entry.raw_value != replacement.raw_value {
                        *entry = replacement;
                    }
                    return;
                }
            }
        }
        let index = self.insertion_index();
        self.lines.insert(index, Line::Entry(replacement));
    }

    /// New keys go after the last key, or before trailing blank lines.
    fn insertion_index(&self) -> usize {
        if let Some(last) = self
            .lines
            .iter()
            .rposition(|line| matches!(line, Line::Entry(_)))
        {
            return last + 1;
        }
        let trailing_blank = self
            .lines
            .iter()
            .rev()
            .take_while(|line| matches!(line, Line::Verbatim(text) if text.trim().is_empty()))
            .count();
        self.lines.len() - trailing_blank
    }
}

/// A parsed desktop entry key file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DesktopFile {
    /// Comments and blank lines before the first group
    preamble: Vec<String>,
    groups: Vec<Group>,
}

impl DesktopFile {
    /// An empty document without any group.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh application entry: `[Desktop Entry]` with `Type=Application`.
    pub fn new_application() -> Self {
        let mut file = Self::new();
        file.set_string(keys::TYPE, "Application");
        file
    }

    /// Parse desktop entry text.
    ///
    /// Supports:
    /// - Group headers: `[Group Name]`
    /// - Key-value pairs: `Key=value`, `Key[locale]=value`
    /// - Comments (`#`) and blank lines anywhere
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when a key appears before the first group, a
    /// group is declared twice, or a line is none of the above.
    pub fn parse(content: &str) -> Result<Self> {
        let mut file = Self::new();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                match file.groups.last_mut() {
                    Some(group) => group.lines.push(Line::Verbatim(line.to_string())),
                    None => file.preamble.push(line.to_string()),
                }
                continue;
            }

            if trimmed.starts_with('[') {
                if !trimmed.ends_with(']') || trimmed.len() < 3 {
                    return Err(parse_error(line_number, "Invalid group header"));
                }
                let name = &trimmed[1..trimmed.len() - 1];
                if name.contains('[') || name.contains(']') {
                    return Err(parse_error(line_number, "Invalid group name"));
                }
                if file.group(name).is_some() {
                    return Err(parse_error(
                        line_number,
                        &format!("Duplicate group [{}]", name),
                    ));
                }
                file.groups.push(Group {
                    name: name.to_string(),
                    header: line.to_string(),
                    lines: Vec::new(),
                });
                continue;
            }

            let Some((key_part, value)) = line.split_once('=') else {
                return Err(parse_error(
                    line_number,
                    "Line is not a group, comment or key-value pair",
                ));
            };
            let (key, locale) = parse_key(key_part.trim())
                .ok_or_else(|| parse_error(line_number, "Invalid key name"))?;

            let Some(group) = file.groups.last_mut() else {
                return Err(parse_error(
                    line_number,
                    "Key file does not start with a group",
                ));
            };
            group.lines.push(Line::Entry(KeyLine {
                key,
                locale,
                raw_value: value.trim_start().to_string(),
                raw: line.to_string(),
            }));
        }

        Ok(file)
    }

    /// Read and parse a file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            Error::Parse { line, message, .. } => Error::Parse {
                path: Some(path.to_path_buf()),
                line,
                message,
            },
            other => other,
        })
    }

    /// Write the document to `path`, replacing the file atomically.
    ///
    /// The parent directory must exist.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_error = |message: String| Error::Write {
            path: path.to_path_buf(),
            message,
        };
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| write_error(e.to_string()))?;
        temp.write_all(self.to_string().as_bytes())
            .map_err(|e| write_error(e.to_string()))?;

        // Temp files are created 0600; desktop files are world-readable.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(|e| write_error(e.to_string()))?;
        }

        temp.persist(path)
            .map_err(|e| write_error(e.error.to_string()))?;
        Ok(())
    }

    /// Names of all groups, in file order.
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    /// Whether the document has a group with this name.
    pub fn has_group(&self, name: &str) -> bool {
        self.group(name).is_some()
    }

    /// Whether `[Desktop Entry]` has this exact key (no locale).
    pub fn has_key(&self, key: &str) -> bool {
        self.raw_value(key, None).is_some()
    }

    /// Unescaped value of an untranslated key.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.raw_value(key, None).map(unescape)
    }

    /// Value of a localized key, following the locale fallback chain and
    /// ending at the untranslated key.
    pub fn get_locale_string(&self, key: &str, locale: Option<&Locale>) -> Option<String> {
        if let Some(locale) = locale {
            for candidate in locale.candidates() {
                if let Some(value) = self.raw_value(key, Some(&candidate)) {
                    return Some(unescape(value));
                }
            }
        }
        self.get_string(key)
    }

    /// Boolean value; anything other than `true`/`false`/`1`/`0` yields `default`.
    pub fn get_boolean(&self, key: &str, default: bool) -> bool {
        match self.raw_value(key, None).map(str::trim) {
            Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            _ => default,
        }
    }

    /// A `;`-separated list, or `None` if the key is absent.
    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        self.raw_value(key, None).map(split_list)
    }

    /// Startup delay in seconds; missing, negative or malformed values read as 0.
    pub fn get_delay(&self) -> u32 {
        self.raw_value(keys::DELAY, None)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(|delay| delay.clamp(0, i64::from(u32::MAX)) as u32)
            .unwrap_or(0)
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        self.desktop_group_mut().set(key, None, escape(value));
    }

    pub fn set_boolean(&mut self, key: &str, value: bool) {
        let value = if value { "true" } else { "false" };
        self.desktop_group_mut().set(key, None, value.to_string());
    }

    /// Store a translation for `locale`, or the untranslated value when no
    /// locale is configured.
    pub fn set_locale_string(&mut self, key: &str, locale: Option<&Locale>, value: &str) {
        match locale {
            Some(locale) => {
                let suffix = locale.key_suffix();
                self.desktop_group_mut().set(key, Some(&suffix), escape(value));
            }
            None => self.set_string(key, value),
        }
    }

    /// Make sure the untranslated key has a value.
    ///
    /// If it is missing or empty, the value visible in `locale` is copied into
    /// it, so other locales do not fall back to an empty string.
    pub fn ensure_untranslated(&mut self, key: &str, locale: Option<&Locale>) {
        let untranslated = self.get_string(key);
        if untranslated.as_deref().is_some_and(|v| !v.is_empty()) {
            return;
        }
        if let Some(value) = self.get_locale_string(key, locale) {
            self.set_string(key, &value);
        }
    }

    pub fn set_delay(&mut self, delay: u32) {
        self.desktop_group_mut()
            .set(keys::DELAY, None, delay.to_string());
    }

    fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn raw_value(&self, key: &str, locale: Option<&str>) -> Option<&str> {
        self.group(DESKTOP_GROUP)
            .and_then(|group| group.find(key, locale))
            .map(|entry| entry.raw_value.as_str())
    }

    /// The `[Desktop Entry]` group, created as the first group if missing.
    fn desktop_group_mut(&mut self) -> &mut Group {
        let index = match self.groups.iter().position(|g| g.name == DESKTOP_GROUP) {
            Some(index) => index,
            None => {
                let mut group = Group::new(DESKTOP_GROUP);
                if !self.groups.is_empty() {
                    group.lines.push(Line::Verbatim(String::new()));
                }
                self.groups.insert(0, group);
                0
            }
        };
        &mut self.groups[index]
    }
}

impl fmt::Display for DesktopFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.preamble {
            writeln!(f, "{}", line)?;
        }
        for group in &self.groups {
            writeln!(f, "{}", group.header)?;
            for line in &group.lines {
                match line {
                    Line::Verbatim(text) => writeln!(f, "{}", text)?,
                    Line::Entry(entry) => writeln!(f, "{}", entry.raw)?,
                }
            }
        }
        Ok(())
    }
}

fn parse_error(line: usize, message: &str) -> Error {
    Error::Parse {
        path: None,
        line,
        message: message.to_string(),
    }
}

/// Split `Key[locale]` into its parts.
fn parse_key(key_part: &str) -> Option<(String, Option<String>)> {
    let (key, locale) = match key_part.split_once('[') {
        Some((key, rest)) => {
            let locale = rest.strip_suffix(']')?;
            if locale.is_empty() || locale.contains('[') || locale.contains(']') {
                return None;
            }
            (key.trim_end(), Some(locale.to_string()))
        }
        None => {
            if key_part.contains(']') {
                return None;
            }
            (key_part, None)
        }
    };
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), locale))
}

/// Escape a value for writing.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (index, c) in value.chars().enumerate() {
        match c {
            ' ' if index == 0 => escaped.push_str("\\s"),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Resolve the escapes of a raw value. Unknown escapes are kept as written.
pub fn unescape(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => value.push(' '),
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('\\') => value.push('\\'),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

/// Split a raw `;`-separated list; `\;` is a literal semicolon.
fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(';') => current.push(';'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ';' => items.push(unescape(&std::mem::take(&mut current))),
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        items.push(unescape(&current));
    }
    items
}
