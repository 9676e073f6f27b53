//! Command-line construction for the Copilot CLI.
//!
//! Every invocation is `copilot --yolo -p <prompt> [--model <m>] [extra...]`.
//! How that reaches the OS depends on the [`CommandStyle`]:
//!
//! - [`CommandStyle::ArgVector`]: the prompt is one element of the argument
//!   vector. Nothing is interpreted by a shell, so nothing needs quoting.
//! - [`CommandStyle::ShellString`]: the whole invocation is one line for the
//!   platform shell (`cmd /d /s /c` on Windows, where npm installs the CLI as
//!   a `.cmd` shim). The prompt is sanitized and wrapped in double quotes.
//!
//! ## Known Limitations
//!
//! Shell-string sanitization only turns line endings into spaces and doubles
//! `"`. That keeps the prompt inside its quoted region but is not a complete
//! escaping scheme: `cmd` still expands `%VAR%` inside quotes, and no other
//! metacharacter has been analyzed. When the style is chosen on Unix the line
//! runs through `sh -c`, which still expands `$VAR`, `$(...)` and backticks
//! inside double quotes; prefer [`CommandStyle::ArgVector`] there. Model names
//! and extra arguments are appended unquoted and must come from a trusted
//! caller.

use cli_engine_core::InvocationRequest;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::Path;

/// Shell used for [`CommandStyle::ShellString`] on this platform.
pub const SHELL: &str = if cfg!(windows) { "cmd" } else { "sh" };

/// How a built command is handed to the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandStyle {
    /// Program plus a POSIX-style argument vector.
    ArgVector,
    /// A single line interpreted by the platform shell.
    ShellString,
}

impl CommandStyle {
    /// The style appropriate for the compilation target.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(windows) {
            Self::ShellString
        } else {
            Self::ArgVector
        }
    }
}

impl Default for CommandStyle {
    fn default() -> Self {
        Self::native()
    }
}

/// A fully constructed invocation, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltCommand {
    /// Run `program` directly with `args`.
    Argv {
        /// Executable to run.
        program: OsString,
        /// Arguments in order.
        args: Vec<OsString>,
    },
    /// Run `line` through `shell`.
    Shell {
        /// Shell executable.
        shell: OsString,
        /// Complete command line.
        line: String,
    },
}

/// Builds the command for `request` in the given style.
///
/// Pure: identical inputs always produce identical commands.
#[must_use]
pub fn build_command(
    style: CommandStyle,
    program: &Path,
    request: &InvocationRequest,
) -> BuiltCommand {
    match style {
        CommandStyle::ArgVector => BuiltCommand::Argv {
            program: program.as_os_str().to_os_string(),
            args: build_args(request),
        },
        CommandStyle::ShellString => BuiltCommand::Shell {
            shell: OsString::from(SHELL),
            line: build_shell_line(program, request),
        },
    }
}

/// Builds the argument vector for a Copilot CLI invocation.
#[must_use]
pub fn build_args(request: &InvocationRequest) -> Vec<OsString> {
    let mut args = vec![
        OsString::from("--yolo"),
        OsString::from("-p"),
        OsString::from(&request.prompt),
    ];

    if let Some(ref model) = request.model {
        args.push(OsString::from("--model"));
        args.push(OsString::from(model));
    }

    args.extend(request.extra_args.iter().map(OsString::from));

    args
}

/// Builds a single shell line for a Copilot CLI invocation.
#[must_use]
pub fn build_shell_line(program: &Path, request: &InvocationRequest) -> String {
    let program = program.to_string_lossy();
    let mut line = if program.contains(' ') {
        format!("\"{program}\"")
    } else {
        program.into_owned()
    };

    line.push_str(" --yolo -p \"");
    line.push_str(&sanitize_prompt(&request.prompt));
    line.push('"');

    if let Some(ref model) = request.model {
        line.push_str(" --model ");
        line.push_str(model);
    }

    for arg in &request.extra_args {
        line.push(' ');
        line.push_str(arg);
    }

    line
}

/// Makes a prompt safe to embed in a double-quoted shell string.
///
/// Each line ending (`\r\n`, `\r` or `\n`) becomes one space and every `"`
/// is doubled.
#[must_use]
pub fn sanitize_prompt(prompt: &str) -> String {
    prompt
        .replace("\r\n", " ")
        .replace(&['\r', '\n'][..], " ")
        .replace('"', "\"\"")
}
