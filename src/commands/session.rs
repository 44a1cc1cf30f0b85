use crate::{
    commands::FAREWELL,
    errors::{CommandError, CommandResult},
    protocol::registry::Command,
    security::PathResolver,
};
use async_trait::async_trait;
use std::sync::Arc;

pub struct Pwd { resolver: Arc<PathResolver> }

impl Pwd { pub fn new(resolver: Arc<PathResolver>) -> Self { Self { resolver } } }

#[async_trait]
impl Command for Pwd {
    fn name(&self) -> &'static str { "pwd" }
    async fn call(&self, _args: &[String]) -> CommandResult<String> {
        Ok(self.resolver.root().display().to_string())
    }
}

/// Lists the root's immediate entries in directory order.
pub struct Ls { resolver: Arc<PathResolver> }

impl Ls { pub fn new(resolver: Arc<PathResolver>) -> Self { Self { resolver } } }

#[async_trait]
impl Command for Ls {
    fn name(&self) -> &'static str { "ls" }
    async fn call(&self, _args: &[String]) -> CommandResult<String> {
        let root = self.resolver.root();
        let mut entries = tokio::fs::read_dir(root).await.map_err(|e| CommandError::from_io(".", e))?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| CommandError::from_io(".", e))? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names.join("\n"))
    }
}

/// Says goodbye. The connection closes as with any other command; the server keeps running.
pub struct Exit;

#[async_trait]
impl Command for Exit {
    fn name(&self) -> &'static str { "exit" }
    async fn call(&self, _args: &[String]) -> CommandResult<String> {
        Ok(FAREWELL.to_string())
    }
}
