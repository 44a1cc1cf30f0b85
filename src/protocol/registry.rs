use crate::{
    errors::{CommandError, CommandResult},
    protocol::types::Request,
    security::PathResolver,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCommand = Arc<dyn Command + Send + Sync + 'static>;

/// Stateless dispatcher from command names to their implementations.
#[derive(Clone)]
pub struct CommandRegistry {
    commands: Vec<(String, DynCommand)>,
}

impl CommandRegistry {
    pub fn new(resolver: Arc<PathResolver>) -> Self {
        use crate::commands::{
            dirs::{Mkdir, Rmdir},
            files::{Download, Rm, Upload},
            session::{Exit, Ls, Pwd},
            transfer::{Cp, Rename},
        };
        let mut commands: Vec<(String, DynCommand)> = [
            Arc::new(Pwd::new(resolver.clone())) as DynCommand,
            Arc::new(Ls::new(resolver.clone())),
            Arc::new(Mkdir::new(resolver.clone())),
            Arc::new(Rmdir::new(resolver.clone())),
            Arc::new(Rm::new(resolver.clone())),
            Arc::new(Rename::new(resolver.clone())),
            Arc::new(Upload::new(resolver.clone())),
            Arc::new(Download::new(resolver.clone())),
            Arc::new(Cp::new(resolver)),
            Arc::new(Exit),
        ]
        .into_iter()
        .map(|c| (c.name().to_string(), c))
        .collect();
        commands.sort_by(|a, b| a.0.cmp(&b.0));
        Self { commands }
    }

    pub fn get(&self, name: &str) -> Option<DynCommand> { self.commands.iter().find(|(n, _)| n == name).map(|(_, c)| c.clone()) }
    pub fn list_names(&self) -> Vec<String> { self.commands.iter().map(|(n, _)| n.clone()).collect() }

    pub async fn dispatch(&self, request: &Request) -> CommandResult<String> {
        let command = self
            .get(&request.command)
            .ok_or_else(|| CommandError::UnknownCommand(request.command.clone()))?;
        command.call(&request.args).await
    }

    /// Parses and runs one raw request line.
    pub async fn execute(&self, line: &str) -> CommandResult<String> {
        let request = Request::parse(line)?;
        self.dispatch(&request).await
    }
}

#[async_trait]
pub trait Command {
    fn name(&self) -> &'static str;
    async fn call(&self, args: &[String]) -> CommandResult<String>;
}

/// Returns the argument at `idx` or a missing-argument error naming `what`.
pub fn required<'a>(args: &'a [String], idx: usize, what: &'static str) -> CommandResult<&'a str> {
    args.get(idx).map(String::as_str).ok_or(CommandError::MissingArgument(what))
}

/// Returns both arguments of a two-argument command, or one missing-argument error
/// naming the pair when either is absent.
pub fn required_pair<'a>(args: &'a [String], what: &'static str) -> CommandResult<(&'a str, &'a str)> {
    match args {
        [first, second, ..] => Ok((first.as_str(), second.as_str())),
        _ => Err(CommandError::MissingArgument(what)),
    }
}
