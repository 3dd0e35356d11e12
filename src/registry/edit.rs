//! In-memory edits.
//!
//! Every edit compares against the current value with blank-tolerant
//! equality, marks only the fields that really changed, and arms the
//! deferred save. Nothing is written here except when deleting a file that
//! only exists in the user directory.

use std::io::ErrorKind;

use log::info;

use super::save::arm;
use super::{unknown, Registry};
use crate::clock::Clock;
use crate::entry::{text_equal, Field, USER_RANK};
use crate::error::Result;
use crate::events::EntryEvent;

impl<C: Clock> Registry<C> {
    /// Replace the name, comment, command and delay of an entry.
    ///
    /// Returns whether anything changed. An unchanged update neither arms a
    /// save nor notifies.
    pub fn update(
        &mut self,
        filename: &str,
        name: Option<&str>,
        comment: Option<&str>,
        exec: Option<&str>,
        delay: u32,
    ) -> Result<bool> {
        let deadline = self.clock.now() + self.settings.save_delay;
        let entry = self
            .entries
            .get_mut(filename)
            .ok_or_else(|| unknown(filename))?;
        let mut changed = false;

        if !text_equal(name, entry.name()) {
            entry.name = name.map(str::to_string);
            entry.dirty.mark(Field::Name);
            changed = true;
        }
        if !text_equal(comment, entry.comment()) {
            entry.comment = comment.map(str::to_string);
            entry.dirty.mark(Field::Comment);
            changed = true;
        }
        if !text_equal(exec, entry.exec()) {
            entry.exec = exec.map(str::to_string);
            entry.dirty.mark(Field::Exec);
            changed = true;
        }
        if delay != entry.delay {
            entry.delay = delay;
            entry.dirty.mark(Field::Delay);
            changed = true;
        }

        if !changed {
            return Ok(false);
        }

        entry.refresh_description();
        arm(entry, &self.dirs, deadline);
        self.emit(EntryEvent::Changed(filename.to_string()));
        Ok(true)
    }

    /// Enable (`false`) or disable (`true`) an entry.
    pub fn set_hidden(&mut self, filename: &str, hidden: bool) -> Result<bool> {
        let deadline = self.clock.now() + self.settings.save_delay;
        let entry = self
            .entries
            .get_mut(filename)
            .ok_or_else(|| unknown(filename))?;
        if entry.hidden == hidden {
            return Ok(false);
        }

        entry.hidden = hidden;
        entry.dirty.mark(Field::Hidden);
        arm(entry, &self.dirs, deadline);
        self.emit(EntryEvent::Changed(filename.to_string()));
        Ok(true)
    }

    /// Delete an entry.
    ///
    /// A file that only exists in the user directory is removed right away
    /// and the entry is dropped. When a system directory also defines it, the
    /// entry is hidden instead and the hiding override is saved later.
    pub fn delete(&mut self, filename: &str) -> Result<()> {
        let deadline = self.clock.now() + self.settings.save_delay;
        let entry = self
            .entries
            .get_mut(filename)
            .ok_or_else(|| unknown(filename))?;

        if entry.directory_rank == Some(USER_RANK) && entry.shadowed_system_rank.is_none() {
            match std::fs::remove_file(&entry.source_path) {
                Ok(()) => info!("Deleted {}", entry.source_path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            entry.save_deadline = None;
            entry.hidden = true;
            self.emit(EntryEvent::Removed(filename.to_string()));
            self.entries.remove(filename);
            return Ok(());
        }

        entry.hidden = true;
        entry.dirty.mark(Field::Hidden);
        arm(entry, &self.dirs, deadline);
        self.emit(EntryEvent::Changed(filename.to_string()));
        Ok(())
    }
}
