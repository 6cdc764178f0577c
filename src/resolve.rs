// src/resolve.rs

//! Argument resolution: turning a command template into a concrete shell line.
//!
//! Resolution walks the arguments in order, skipping disabled ones. Static
//! arguments use their stored value; variable arguments extract their value
//! from the captured output of another command by running a regex over it.
//! Global `{{name}}` variables are substituted into executables, argument
//! names, static values, regex patterns and working directories before
//! anything else happens.
//!
//! Resolution is all-or-nothing: any failure aborts before a process is
//! spawned, and the error message is what ends up in the command's
//! errorOutput.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::model::{ArgumentKind, CommandDefinition};
use crate::types::CommandStatus;

/// Failures that abort resolution. The payload is the full human-readable
/// message, built where the failing argument is known; it is persisted
/// verbatim as the command's errorOutput.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A variable argument has no source command, or the source (or an entry
    /// of dependsOn) does not exist.
    #[error("{0}")]
    MissingDependency(String),

    /// The source command exists but its status is not `success`.
    #[error("{0}")]
    DependencyNotReady(String),

    /// A variable argument has no regex pattern.
    #[error("{0}")]
    MissingRegex(String),

    /// The regex pattern failed to compile.
    #[error("{0}")]
    InvalidRegex(String),

    /// The regex matched nothing in the source command's output.
    #[error("{0}")]
    NoMatch(String),
}

/// Read access to other commands' definitions during resolution.
pub trait DependencyLookup {
    fn command(&self, id: &str) -> Option<CommandDefinition>;
}

impl DependencyLookup for HashMap<String, CommandDefinition> {
    fn command(&self, id: &str) -> Option<CommandDefinition> {
        self.get(id).cloned()
    }
}

impl DependencyLookup for BTreeMap<String, CommandDefinition> {
    fn command(&self, id: &str) -> Option<CommandDefinition> {
        self.get(id).cloned()
    }
}

/// Sink for the argument history side effect. Recording must not abort
/// resolution, so implementations swallow (and log) their own failures.
pub trait HistorySink {
    fn record(&self, command_id: &str, argument: &str, value: &str);
}

/// Sink that records nothing. Used by probes and tests.
#[derive(Debug, Default)]
pub struct NoHistory;

impl HistorySink for NoHistory {
    fn record(&self, _command_id: &str, _argument: &str, _value: &str) {}
}

/// Everything the resolver needs besides the definition itself.
pub struct ResolveContext<'a> {
    pub lookup: &'a dyn DependencyLookup,
    pub variables: &'a BTreeMap<String, String>,
    pub history: &'a dyn HistorySink,
}

/// A fully resolved invocation, ready for the process supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInvocation {
    pub executable: String,
    /// Argument tokens in emission order, values already quoted.
    pub tokens: Vec<String>,
    /// The exact line handed to the shell; with no tokens this is the
    /// executable alone, with no trailing space.
    pub command_line: String,
    /// Working directory with variables substituted, if one is set.
    pub working_dir: Option<String>,
}

/// Resolve `def` into a concrete invocation.
///
/// Static arguments with a non-empty value are recorded into the history sink
/// as they are resolved, so a resolution that fails on a later argument still
/// remembers the values it got through.
pub fn resolve(
    def: &CommandDefinition,
    ctx: &ResolveContext<'_>,
) -> Result<ResolvedInvocation, ResolveError> {
    debug!(command = %def.id, "resolving arguments");

    check_dependencies(def, ctx)?;

    let executable = substitute(&def.executable, ctx.variables);
    let mut tokens = Vec::new();

    for (index, arg) in def.arguments.iter().enumerate() {
        if !arg.enabled {
            continue;
        }

        let name = substitute(&arg.name, ctx.variables);

        let value = match arg.kind {
            ArgumentKind::Static => {
                let value = substitute(&arg.value, ctx.variables);
                if !value.is_empty() {
                    ctx.history.record(&def.id, &name, &value);
                }
                value
            }
            ArgumentKind::Variable => {
                extract_from_source(arg, &argument_label(&name, index), ctx)?
            }
        };

        emit_tokens(&mut tokens, name, &value, arg.is_positional, arg.joiner.as_deref());
    }

    let command_line = if tokens.is_empty() {
        executable.clone()
    } else {
        format!("{} {}", executable, tokens.join(" "))
    };

    let working_dir = def
        .working_directory
        .as_ref()
        .map(|dir| substitute(dir, ctx.variables))
        .filter(|dir| !dir.is_empty());

    Ok(ResolvedInvocation {
        executable,
        tokens,
        command_line,
        working_dir,
    })
}

/// Verify every explicit dependsOn entry exists and has run successfully.
/// The sources of variable arguments are checked separately, argument by
/// argument, as resolution reaches them.
fn check_dependencies(
    def: &CommandDefinition,
    ctx: &ResolveContext<'_>,
) -> Result<(), ResolveError> {
    for dep_id in &def.depends_on {
        let dep = ctx.lookup.command(dep_id).ok_or_else(|| {
            ResolveError::MissingDependency(format!("Dependency '{dep_id}' not found"))
        })?;
        if dep.status != CommandStatus::Success {
            return Err(ResolveError::DependencyNotReady(format!(
                "Dependency '{}' has not run successfully",
                display_name(&dep)
            )));
        }
    }
    Ok(())
}

/// Resolve one variable argument against its source command's output.
fn extract_from_source(
    arg: &crate::model::Argument,
    label: &str,
    ctx: &ResolveContext<'_>,
) -> Result<String, ResolveError> {
    let source_id = arg
        .source_command_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ResolveError::MissingDependency(format!("{label} is missing its source command"))
        })?;

    let source = ctx.lookup.command(source_id).ok_or_else(|| {
        ResolveError::MissingDependency(format!(
            "{label}: source command '{source_id}' not found"
        ))
    })?;

    if source.status != CommandStatus::Success {
        return Err(ResolveError::DependencyNotReady(format!(
            "Dependency '{}' has not run successfully",
            display_name(&source)
        )));
    }

    let pattern = arg
        .regex
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            ResolveError::MissingRegex(format!("{label} is missing its regex pattern"))
        })?;
    let pattern = substitute(pattern, ctx.variables);

    let haystack = source.output.join("\n");
    let value = extract(&pattern, &haystack)
        .map_err(|err| ResolveError::InvalidRegex(format!("{label} has an invalid regex: {err}")))?
        .ok_or_else(|| {
            ResolveError::NoMatch(format!(
                "No match for regex '{}' in the output of '{}'",
                pattern,
                display_name(&source)
            ))
        })?;

    debug!(source = %source_id, value = %value, "extracted variable argument");
    Ok(value)
}

/// Apply the extraction rule: first match wins; if the pattern has at least
/// one capture group, group 1 is the value, otherwise the whole match is.
///
/// `Ok(None)` means the pattern is valid but matched nothing.
pub fn extract(pattern: &str, haystack: &str) -> Result<Option<String>, regex::Error> {
    let re = Regex::new(pattern)?;
    let Some(caps) = re.captures(haystack) else {
        return Ok(None);
    };
    let value = if re.captures_len() > 1 {
        // A group that did not participate in the match extracts nothing.
        caps.get(1).map_or("", |m| m.as_str())
    } else {
        caps.get(0).map_or("", |m| m.as_str())
    };
    Ok(Some(value.to_string()))
}

/// Token emission for one resolved argument value.
///
/// - positional: the quoted value alone, even when empty;
/// - empty value: the bare flag token (nothing at all if the name is empty);
/// - joiner: name, joiner and quoted value glued into a single token;
/// - otherwise: name and quoted value as two tokens.
fn emit_tokens(
    tokens: &mut Vec<String>,
    name: String,
    value: &str,
    positional: bool,
    joiner: Option<&str>,
) {
    if positional {
        tokens.push(quote(value));
    } else if value.is_empty() {
        if !name.is_empty() {
            tokens.push(name);
        }
    } else if let Some(joiner) = joiner {
        tokens.push(format!("{}{}{}", name, joiner, quote(value)));
    } else if name.is_empty() {
        tokens.push(quote(value));
    } else {
        tokens.push(name);
        tokens.push(quote(value));
    }
}

/// Replace every `{{name}}` occurrence with the variable's value.
/// Unknown variables are left in place.
pub fn substitute(input: &str, variables: &BTreeMap<String, String>) -> String {
    if !input.contains("{{") {
        return input.to_string();
    }
    let mut out = input.to_string();
    for (name, value) in variables {
        out = out.replace(&format!("{{{{{name}}}}}"), value);
    }
    out
}

/// Single-quote a value for the shell. Always quotes, even when the value is
/// empty or harmless; embedded single quotes use the `'\''` escape.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// How an argument is referred to in failure messages.
fn argument_label(name: &str, index: usize) -> String {
    if name.is_empty() {
        format!("Argument {}", index + 1)
    } else {
        format!("Argument '{name}'")
    }
}

/// Commands are referred to by name when they have one, id otherwise.
fn display_name(def: &CommandDefinition) -> &str {
    if def.name.is_empty() { &def.id } else { &def.name }
}
