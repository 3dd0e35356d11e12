//! Desktop file corpus tests using datatest-stable for test data discovery
//!
//! Every `.desktop` file under `tests/testdata/desktop-files` is checked to:
//! 1. parse without error
//! 2. serialize back to exactly the same text
//! 3. agree with an independent INI parser on the untranslated keys
//! 4. keep comments and other groups when a key is edited
//! 5. load into a registry unless another desktop is required

use std::path::Path;

use autostart_sync::config::Settings;
use autostart_sync::keyfile::{keys, DesktopFile, DESKTOP_GROUP};
use autostart_sync::registry::Registry;

fn test_desktop_file(path: &Path) -> datatest_stable::Result<()> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read test file {}: {}", path.display(), e))?;

    let file = DesktopFile::parse(&content)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    assert_eq!(
        file.to_string(),
        content,
        "{} did not serialize back to its own text",
        path.display()
    );

    let ini = ini::Ini::load_from_str(&content)
        .map_err(|e| format!("rust-ini rejected {}: {}", path.display(), e))?;
    let section = ini
        .section(Some(DESKTOP_GROUP))
        .ok_or_else(|| format!("{} has no [{}] group", path.display(), DESKTOP_GROUP))?;
    for key in [keys::NAME, keys::EXEC, keys::TYPE] {
        assert_eq!(
            file.get_string(key).as_deref(),
            section.get(key),
            "{} disagrees on {}",
            path.display(),
            key
        );
    }

    let mut edited = file.clone();
    edited.set_boolean(keys::HIDDEN, true);
    let edited_text = edited.to_string();
    for line in content.lines().filter(|line| !line.starts_with("Hidden=")) {
        assert!(
            edited_text.contains(line),
            "{} lost line '{}' after an edit",
            path.display(),
            line
        );
    }
    assert_eq!(file.group_names(), edited.group_names());

    let dir = tempfile::tempdir()?;
    let system_dir = dir.path().join("system");
    std::fs::create_dir_all(&system_dir)?;
    let filename = path
        .file_name()
        .ok_or_else(|| format!("{} has no file name", path.display()))?;
    std::fs::copy(path, system_dir.join(filename))?;

    let settings = Settings::new(dir.path().join("user"), vec![system_dir]).with_desktop_names(["MATE"]);
    let mut registry = Registry::new(settings);
    let loaded = registry.scan();
    let only_elsewhere = file
        .get_string_list(keys::ONLY_SHOW_IN)
        .is_some_and(|desktops| !desktops.iter().any(|d| d == "MATE"));
    assert_eq!(
        loaded,
        usize::from(!only_elsewhere),
        "{} loaded {} entries",
        path.display(),
        loaded
    );

    Ok(())
}

// Register datatest harness to discover and run tests on all desktop files in testdata directory
datatest_stable::harness!(
    test_desktop_file,
    "tests/testdata/desktop-files",
    r".*\.desktop$"
);
