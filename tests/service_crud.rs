// tests/service_crud.rs

use std::error::Error;
use std::sync::Arc;

use cmdchain::errors::CmdchainError;
use cmdchain::resolve::ResolveError;
use cmdchain::store::{ArgumentHistory, CommandStore, MemoryStore, StateStore};
use cmdchain::types::CommandStatus;
use cmdchain_test_utils::builders::{ArgumentBuilder, CommandBuilder};
use cmdchain_test_utils::{init_tracing, memory_service, service_with_store, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn create_generates_an_id_when_none_is_given() -> TestResult {
    with_timeout(async {
        init_tracing();

        let service = memory_service();
        let created =
            service.create_command(CommandBuilder::new("", "echo hi").name("greeter").build())?;

        assert!(created.id.starts_with("cmd-"), "got id {}", created.id);
        assert_eq!(created.name, "greeter");
        assert_eq!(created.status, CommandStatus::Defined);
        assert_eq!(service.get_command(&created.id)?.executable, "echo hi");
        Ok(())
    })
    .await
}

#[tokio::test]
async fn create_refuses_a_duplicate_id() -> TestResult {
    with_timeout(async {
        init_tracing();

        let service = memory_service();
        service.create_command(CommandBuilder::new("a", "echo one").build())?;

        let err = service
            .create_command(CommandBuilder::new("a", "echo two").build())
            .unwrap_err();
        assert!(matches!(err, CmdchainError::CommandExists(ref id) if id == "a"));

        // The original is untouched.
        assert_eq!(service.get_command("a")?.executable, "echo one");
        Ok(())
    })
    .await
}

#[tokio::test]
async fn create_wipes_any_runtime_fields_the_caller_sent() -> TestResult {
    with_timeout(async {
        init_tracing();

        let service = memory_service();
        let mut def = CommandBuilder::new("a", "echo hi")
            .status(CommandStatus::Success)
            .output(&["stale output"])
            .build();
        def.generated_command = Some("echo hi".to_string());
        def.return_code = Some(0);

        let created = service.create_command(def)?;
        assert_eq!(created.status, CommandStatus::Defined);
        assert!(created.output.is_empty());
        assert_eq!(created.generated_command, None);
        assert_eq!(created.return_code, None);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn get_unknown_command_fails() -> TestResult {
    with_timeout(async {
        init_tracing();

        let service = memory_service();
        let err = service.get_command("ghost").unwrap_err();
        assert!(matches!(err, CmdchainError::CommandNotFound(ref id) if id == "ghost"));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn listing_sorts_by_position_then_name_then_id() -> TestResult {
    with_timeout(async {
        init_tracing();

        let service = memory_service();
        service.create_command(
            CommandBuilder::new("c", "true").name("zeta").build(),
        )?;
        service.create_command(
            CommandBuilder::new("a", "true").name("beta").position(2).build(),
        )?;
        service.create_command(
            CommandBuilder::new("b", "true").name("alpha").position(1).build(),
        )?;
        service.create_command(
            CommandBuilder::new("d", "true").name("alpha").build(),
        )?;

        let ids: Vec<String> = service
            .list_commands()?
            .into_iter()
            .map(|def| def.id)
            .collect();
        // Positioned commands first in position order, the rest by name.
        assert_eq!(ids, vec!["b", "a", "d", "c"]);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn update_replaces_the_definition_but_keeps_run_state() -> TestResult {
    with_timeout(async {
        init_tracing();

        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let service = service_with_store(Arc::clone(&store));

        let mut ran = CommandBuilder::new("a", "echo one")
            .status(CommandStatus::Success)
            .output(&["$ echo one", "one"])
            .build();
        ran.generated_command = Some("echo one".to_string());
        ran.return_code = Some(0);
        store.put(&ran)?;

        let updated = service.update_command(
            CommandBuilder::new("a", "echo two")
                .name("renamed")
                .position(7)
                .argument(ArgumentBuilder::flag("--loud").build())
                .build(),
        )?;

        assert_eq!(updated.executable, "echo two");
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.position, Some(7));
        assert_eq!(updated.arguments.len(), 1);
        // Everything the last run produced survives.
        assert_eq!(updated.status, CommandStatus::Success);
        assert_eq!(updated.output, vec!["$ echo one", "one"]);
        assert_eq!(updated.generated_command.as_deref(), Some("echo one"));
        assert_eq!(updated.return_code, Some(0));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn update_unknown_command_fails() -> TestResult {
    with_timeout(async {
        init_tracing();

        let service = memory_service();
        let err = service
            .update_command(CommandBuilder::new("ghost", "true").build())
            .unwrap_err();
        assert!(matches!(err, CmdchainError::CommandNotFound(_)));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn delete_removes_the_command_and_its_argument_history() -> TestResult {
    with_timeout(async {
        init_tracing();

        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let service = service_with_store(Arc::clone(&store));

        service.create_command(CommandBuilder::new("a", "true").build())?;
        store.record("a", "--flag", "kept")?;
        store.record("other", "--flag", "unrelated")?;

        service.delete_command("a")?;

        let err = service.get_command("a").unwrap_err();
        assert!(matches!(err, CmdchainError::CommandNotFound(_)));
        assert!(store.query("a", "--flag", 10)?.is_empty());
        // Another command's history is left alone.
        assert_eq!(store.query("other", "--flag", 10)?, vec!["unrelated"]);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn delete_unknown_command_fails() -> TestResult {
    with_timeout(async {
        init_tracing();

        let service = memory_service();
        let err = service.delete_command("ghost").unwrap_err();
        assert!(matches!(err, CmdchainError::CommandNotFound(_)));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn argument_history_is_capped_and_distinct() -> TestResult {
    with_timeout(async {
        init_tracing();

        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let service = service_with_store(Arc::clone(&store));

        for i in 0..12 {
            store.record("a", "--flag", &format!("v{i}"))?;
        }
        store.record("a", "--other", "elsewhere")?;

        let history = service.argument_history("a", "--flag")?;
        assert_eq!(history.len(), 10);
        assert_eq!(history.first().map(String::as_str), Some("v11"));
        assert_eq!(history.last().map(String::as_str), Some("v2"));

        // Recording a value that is already present changes nothing.
        store.record("a", "--flag", "v5")?;
        assert_eq!(service.argument_history("a", "--flag")?, history);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn variables_can_be_set_listed_and_removed() -> TestResult {
    with_timeout(async {
        init_tracing();

        let service = memory_service();
        service.set_variable("env", "prod")?;
        service.set_variable("region", "eu")?;
        service.set_variable("env", "staging")?;

        let vars = service.variables()?;
        assert_eq!(vars.get("env").map(String::as_str), Some("staging"));
        assert_eq!(vars.get("region").map(String::as_str), Some("eu"));

        service.delete_variable("env")?;
        assert!(!service.variables()?.contains_key("env"));

        let err = service.set_variable("   ", "x").unwrap_err();
        assert!(matches!(err, CmdchainError::ConfigError(_)));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_regex_probes_without_touching_state() -> TestResult {
    with_timeout(async {
        init_tracing();

        let service = memory_service();
        assert_eq!(
            service.test_regex(r"(\d+)", "abc 42 def")?.as_deref(),
            Some("42")
        );
        assert_eq!(service.test_regex("nope", "abc")?, None);

        let err = service.test_regex("(", "abc").unwrap_err();
        assert!(matches!(
            err,
            CmdchainError::Resolve(ResolveError::InvalidRegex(_))
        ));
        Ok(())
    })
    .await
}
