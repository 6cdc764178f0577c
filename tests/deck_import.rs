// tests/deck_import.rs

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use cmdchain::cmd::{ImportArgs, execute_import};
use cmdchain::config::{load_deck, load_settings};
use cmdchain::errors::CmdchainError;
use cmdchain::model::ArgumentKind;
use cmdchain::store::{CommandStore, MemoryStore, StateStore};
use cmdchain::types::{CommandStatus, StoreMode};
use cmdchain_test_utils::{memory_service, service_with_store};

type TestResult = Result<(), Box<dyn Error>>;

fn write_deck(dir: &Path, contents: &str) -> Result<String, std::io::Error> {
    let path = dir.join("deck.toml");
    fs::write(&path, contents)?;
    Ok(path.to_string_lossy().to_string())
}

const DECK: &str = r#"
[command.build]
executable = "cargo build"
position = 1

[[command.build.argument]]
name = "--release"

[command.serve]
name = "Serve docs"
executable = "python3 -m http.server"
depends_on = ["build"]
working_directory = "target/doc"

[[command.serve.argument]]
name = "--bind"
value = "127.0.0.1"

[[command.serve.argument]]
name = "--port"
type = "variable"
source_command_id = "build"
regex = 'port (\d+)'
"#;

#[test]
fn deck_parses_commands_and_arguments_in_order() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_deck(dir.path(), DECK)?;

    let deck = load_deck(&path)?;
    assert_eq!(deck.command.len(), 2);

    let build = deck.command.get("build").unwrap().clone();
    let def = build.into_definition("build");
    // Name falls back to the id; runtime fields start pristine.
    assert_eq!(def.name, "build");
    assert_eq!(def.position, Some(1));
    assert_eq!(def.status, CommandStatus::Defined);
    assert!(def.output.is_empty());
    assert_eq!(def.arguments.len(), 1);
    assert!(def.arguments[0].enabled);

    let serve = deck.command.get("serve").unwrap().clone().into_definition("serve");
    assert_eq!(serve.name, "Serve docs");
    assert_eq!(serve.depends_on, vec!["build"]);
    assert_eq!(serve.working_directory.as_deref(), Some("target/doc"));
    assert_eq!(serve.arguments[0].name, "--bind");
    assert_eq!(serve.arguments[0].kind, ArgumentKind::Static);
    assert_eq!(serve.arguments[1].kind, ArgumentKind::Variable);
    assert_eq!(serve.arguments[1].source_command_id.as_deref(), Some("build"));
    assert_eq!(serve.arguments[1].regex.as_deref(), Some(r"port (\d+)"));
    Ok(())
}

#[test]
fn empty_deck_is_refused() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_deck(dir.path(), "")?;
    let err = load_deck(&path).unwrap_err();
    assert!(matches!(err, CmdchainError::ConfigError(ref msg)
        if msg.contains("at least one [command.<id>] section")));
    Ok(())
}

#[test]
fn empty_executable_is_refused() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_deck(dir.path(), "[command.a]\nexecutable = \"  \"\n")?;
    let err = load_deck(&path).unwrap_err();
    assert!(matches!(err, CmdchainError::ConfigError(ref msg)
        if msg.contains("empty executable")));
    Ok(())
}

#[test]
fn self_dependency_is_refused() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_deck(
        dir.path(),
        "[command.a]\nexecutable = \"true\"\ndepends_on = [\"a\"]\n",
    )?;
    let err = load_deck(&path).unwrap_err();
    assert!(matches!(err, CmdchainError::ConfigError(ref msg)
        if msg.contains("cannot depend on itself")));
    Ok(())
}

#[test]
fn self_sourced_variable_argument_is_refused() -> TestResult {
    let dir = tempfile::tempdir()?;
    let deck = r#"
[command.a]
executable = "true"

[[command.a.argument]]
name = "--x"
type = "variable"
source_command_id = "a"
regex = "x"
"#;
    let path = write_deck(dir.path(), deck)?;
    let err = load_deck(&path).unwrap_err();
    assert!(matches!(err, CmdchainError::ConfigError(ref msg)
        if msg.contains("variable argument source")));
    Ok(())
}

#[test]
fn dependency_cycles_load_with_a_warning_only() -> TestResult {
    let dir = tempfile::tempdir()?;
    let deck = r#"
[command.a]
executable = "true"
depends_on = ["b"]

[command.b]
executable = "true"
depends_on = ["a"]
"#;
    let path = write_deck(dir.path(), deck)?;
    // Runs are manual, so a cycle is survivable; the deck still loads.
    assert_eq!(load_deck(&path)?.command.len(), 2);
    Ok(())
}

#[test]
fn import_creates_then_updates_preserving_run_state() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let service = service_with_store(Arc::clone(&store));

    let path = write_deck(dir.path(), DECK)?;
    execute_import(&service, ImportArgs { deck: path, dry_run: false })?;
    assert_eq!(service.list_commands()?.len(), 2);

    // Fake a finished run for one of the imported commands.
    let mut ran = service.get_command("build")?;
    ran.status = CommandStatus::Success;
    ran.output = vec!["$ cargo build --release".to_string(), "Finished".to_string()];
    ran.return_code = Some(0);
    store.put(&ran)?;

    let changed = r#"
[command.build]
executable = "cargo build --verbose"

[command.test]
executable = "cargo test"
"#;
    let path = write_deck(dir.path(), changed)?;
    execute_import(&service, ImportArgs { deck: path, dry_run: false })?;

    let build = service.get_command("build")?;
    assert_eq!(build.executable, "cargo build --verbose");
    // The re-import replaced the definition but kept the run history.
    assert_eq!(build.status, CommandStatus::Success);
    assert_eq!(build.return_code, Some(0));
    assert_eq!(build.output.len(), 2);
    assert_eq!(service.get_command("test")?.executable, "cargo test");
    // `serve` came from the first deck and is not part of the second; it stays.
    assert!(service.get_command("serve").is_ok());
    Ok(())
}

#[test]
fn dry_run_changes_nothing() -> TestResult {
    let dir = tempfile::tempdir()?;
    let service = memory_service();

    let path = write_deck(dir.path(), DECK)?;
    execute_import(&service, ImportArgs { deck: path, dry_run: true })?;
    assert!(service.list_commands()?.is_empty());
    Ok(())
}

#[test]
fn settings_file_parses_all_sections() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cmdchain.toml");
    fs::write(
        &path,
        r#"
[store]
mode = "memory"
path = "custom/state.json"

[events]
capacity = 16

[exec]
relay_buffer = 8
"#,
    )?;

    let settings = load_settings(Some(&path))?;
    assert_eq!(settings.store.mode, StoreMode::Memory);
    assert_eq!(settings.store.path, Path::new("custom/state.json"));
    assert_eq!(settings.events.capacity, 16);
    assert_eq!(settings.exec.relay_buffer, 8);
    Ok(())
}

#[test]
fn empty_settings_file_means_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cmdchain.toml");
    fs::write(&path, "")?;

    let settings = load_settings(Some(&path))?;
    assert_eq!(settings.store.mode, StoreMode::File);
    assert_eq!(settings.store.path, Path::new(".cmdchain/state.json"));
    assert_eq!(settings.events.capacity, 256);
    assert_eq!(settings.exec.relay_buffer, 64);
    Ok(())
}

#[test]
fn explicitly_named_settings_file_must_exist() {
    let err = load_settings(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
    assert!(matches!(err, CmdchainError::IoError(_)));
}
