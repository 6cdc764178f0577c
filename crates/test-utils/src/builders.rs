#![allow(dead_code)]

use cmdchain::model::{Argument, ArgumentKind, CommandDefinition};
use cmdchain::types::CommandStatus;

/// Builder for `CommandDefinition` to simplify test setup.
pub struct CommandBuilder {
    def: CommandDefinition,
}

impl CommandBuilder {
    pub fn new(id: &str, executable: &str) -> Self {
        Self {
            def: CommandDefinition {
                id: id.to_string(),
                name: id.to_string(),
                executable: executable.to_string(),
                ..CommandDefinition::default()
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.def.name = name.to_string();
        self
    }

    pub fn argument(mut self, arg: Argument) -> Self {
        self.def.arguments.push(arg);
        self
    }

    pub fn depends_on(mut self, id: &str) -> Self {
        self.def.depends_on.push(id.to_string());
        self
    }

    pub fn working_directory(mut self, dir: &str) -> Self {
        self.def.working_directory = Some(dir.to_string());
        self
    }

    pub fn position(mut self, position: u32) -> Self {
        self.def.position = Some(position);
        self
    }

    pub fn status(mut self, status: CommandStatus) -> Self {
        self.def.status = status;
        self
    }

    /// Captured output, one entry per line. Handy for faking a source
    /// command that has already run.
    pub fn output(mut self, lines: &[&str]) -> Self {
        self.def.output = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn build(self) -> CommandDefinition {
        self.def
    }
}

/// Builder for `Argument`. Starts as an enabled static argument.
pub struct ArgumentBuilder {
    arg: Argument,
}

impl ArgumentBuilder {
    pub fn flag(name: &str) -> Self {
        Self {
            arg: Argument {
                name: name.to_string(),
                ..Argument::default()
            },
        }
    }

    pub fn value(mut self, value: &str) -> Self {
        self.arg.value = value.to_string();
        self
    }

    /// Switch to a variable argument. Wire the source and pattern with
    /// [`source`](Self::source) and [`regex`](Self::regex); leaving either
    /// off is how the resolution failure cases get exercised.
    pub fn variable(mut self) -> Self {
        self.arg.kind = ArgumentKind::Variable;
        self
    }

    pub fn source(mut self, command_id: &str) -> Self {
        self.arg.source_command_id = Some(command_id.to_string());
        self
    }

    pub fn regex(mut self, pattern: &str) -> Self {
        self.arg.regex = Some(pattern.to_string());
        self
    }

    pub fn positional(mut self) -> Self {
        self.arg.is_positional = true;
        self
    }

    pub fn joiner(mut self, joiner: &str) -> Self {
        self.arg.joiner = Some(joiner.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.arg.enabled = false;
        self
    }

    pub fn build(self) -> Argument {
        self.arg
    }
}
