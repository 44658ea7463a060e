use std::io::{self, Write};
use std::process::{Command, ExitStatus};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{info, warn};

/// Exit code reported when the command could not be started at all.
pub const LAUNCH_FAILED_CODE: i32 = -1;

/// Outcome of one foreground command. Displayed once, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Exited(i32),
    /// Killed by the given signal number.
    Signaled(i32),
    LaunchFailed(String),
}

impl ExecutionResult {
    #[must_use]
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }
        Self::Exited(LAUNCH_FAILED_CODE)
    }

    /// Shell-style code: signals map to `128 + N`.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::Exited(code) => *code,
            Self::Signaled(signal) => 128 + signal,
            Self::LaunchFailed(_) => LAUNCH_FAILED_CODE,
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }

    /// Line printed under the command's own output. Always carries the code.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::LaunchFailed(reason) => format!(
                "Command completed with exit code: {} (could not start: {reason})",
                self.code()
            ),
            _ => format!("Command completed with exit code: {}", self.code()),
        }
    }

    /// Short form for the dashboard status line.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self {
            Self::Exited(code) => format!("exit code {code}"),
            Self::Signaled(signal) => format!("killed by signal {signal} (exit code {})", self.code()),
            Self::LaunchFailed(reason) => {
                format!("exit code {} (could not start: {reason})", self.code())
            }
        }
    }
}

/// Terminal-side effects of running a command in passthrough mode.
pub trait ExecHost {
    /// Run the command line in the foreground and wait for it.
    fn spawn(&mut self, command_line: &str) -> ExecutionResult;
    /// Show the summary and block for one keypress.
    fn acknowledge(&mut self, summary: &str) -> io::Result<()>;
}

/// Run `command_line`, assuming passthrough mode is already active.
/// Empty or blank command lines are a no-op and return `None`.
pub fn run<H: ExecHost + ?Sized>(host: &mut H, command_line: &str) -> Option<ExecutionResult> {
    if command_line.trim().is_empty() {
        return None;
    }
    info!(command = %command_line, "command started");
    let result = host.spawn(command_line);
    match &result {
        ExecutionResult::LaunchFailed(reason) => {
            warn!(command = %command_line, error = %reason, "command could not be started");
        }
        other => info!(command = %command_line, exit_code = other.code(), "command finished"),
    }
    if let Err(e) = host.acknowledge(&result.summary()) {
        warn!(error = %e, "failed to wait for acknowledgement");
    }
    Some(result)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    pub program: String,
    pub flag: &'static str,
}

impl Default for Shell {
    fn default() -> Self {
        #[cfg(windows)]
        {
            Self::from_program("cmd")
        }
        #[cfg(not(windows))]
        {
            Self::from_program("/bin/sh")
        }
    }
}

impl Shell {
    #[must_use]
    pub fn from_program(program: &str) -> Self {
        let lower = program.to_ascii_lowercase();
        let flag = if lower.ends_with("cmd") || lower.ends_with("cmd.exe") {
            "/C"
        } else {
            "-c"
        };
        Self {
            program: program.to_string(),
            flag,
        }
    }

    #[must_use]
    pub fn command(&self, command_line: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(self.flag).arg(command_line);
        cmd
    }
}

/// Runs commands through the platform shell attached to the real terminal.
#[derive(Debug, Clone, Default)]
pub struct ShellHost {
    shell: Shell,
}

impl ShellHost {
    #[must_use]
    pub fn new(shell: Option<&str>) -> Self {
        let shell = shell
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Shell::from_program)
            .unwrap_or_default();
        Self { shell }
    }

    #[must_use]
    pub fn shell(&self) -> &Shell {
        &self.shell
    }
}

impl ExecHost for ShellHost {
    fn spawn(&mut self, command_line: &str) -> ExecutionResult {
        if let Err(e) = announce(&mut io::stdout(), command_line) {
            warn!(error = %e, "failed to print command banner");
        }
        match self.shell.command(command_line).status() {
            Ok(status) => ExecutionResult::from_status(status),
            Err(e) => ExecutionResult::LaunchFailed(format!("{}: {e}", self.shell.program)),
        }
    }

    fn acknowledge(&mut self, summary: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        write!(stdout, "\n\n{summary}\nPress any key to continue...")?;
        stdout.flush()?;
        wait_for_key()
    }
}

fn announce<W: Write>(out: &mut W, command_line: &str) -> io::Result<()> {
    write!(out, "Executing: {command_line}\n\n")?;
    out.flush()
}

/// Block until one key press arrives, in raw mode so no Enter is needed.
fn wait_for_key() -> io::Result<()> {
    enable_raw_mode()?;
    let outcome = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(()),
            Ok(_) => {}
            Err(e) => break Err(e),
        }
    };
    disable_raw_mode()?;
    outcome
}
