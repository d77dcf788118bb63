//! Scripted [`CommandRunner`] for tests.

use super::{CommandOutput, CommandRunner};
use std::cell::RefCell;
use std::collections::HashSet;

enum Reply {
    Output(CommandOutput),
    SpawnError(String),
}

struct Expectation {
    command_line: String,
    reply: Reply,
}

/// Replies to command lines registered with [`FakeRunner::on`].
///
/// A command line is the program followed by its arguments joined with single
/// spaces. Unregistered command lines fail to spawn.
#[derive(Default)]
pub struct FakeRunner {
    expectations: Vec<Expectation>,
    missing_programs: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, command_line: &str, output: CommandOutput) -> Self {
        self.expectations.push(Expectation {
            command_line: command_line.to_string(),
            reply: Reply::Output(output),
        });
        self
    }

    pub fn on_spawn_error(mut self, command_line: &str, message: &str) -> Self {
        self.expectations.push(Expectation {
            command_line: command_line.to_string(),
            reply: Reply::SpawnError(message.to_string()),
        });
        self
    }

    pub fn without_program(mut self, program: &str) -> Self {
        self.missing_programs.insert(program.to_string());
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String]) -> anyhow::Result<CommandOutput> {
        let mut parts = vec![program.to_string()];
        parts.extend(args.iter().cloned());
        let command_line = parts.join(" ");
        self.calls.borrow_mut().push(command_line.clone());

        let expectation = self
            .expectations
            .iter()
            .find(|e| e.command_line == command_line);
        match expectation.map(|e| &e.reply) {
            Some(Reply::Output(output)) => Ok(output.clone()),
            Some(Reply::SpawnError(message)) => anyhow::bail!("{}", message),
            None => anyhow::bail!("unexpected command: {}", command_line),
        }
    }

    fn is_available(&self, program: &str) -> bool {
        !self.missing_programs.contains(program)
    }
}
