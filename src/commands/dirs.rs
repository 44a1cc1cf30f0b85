use crate::{
    commands::OK,
    errors::{CommandError, CommandResult},
    protocol::registry::{required, Command},
    security::PathResolver,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::fs;

pub struct Mkdir { resolver: Arc<PathResolver> }

impl Mkdir { pub fn new(resolver: Arc<PathResolver>) -> Self { Self { resolver } } }

#[async_trait]
impl Command for Mkdir {
    fn name(&self) -> &'static str { "mkdir" }
    async fn call(&self, args: &[String]) -> CommandResult<String> {
        let dir = required(args, 0, "directory name")?;
        let full = self.resolver.confine(dir)?;
        fs::create_dir(&full).await.map_err(|e| CommandError::from_io(dir, e))?;
        Ok(OK.to_string())
    }
}

/// Removes a directory and everything beneath it.
pub struct Rmdir { resolver: Arc<PathResolver> }

impl Rmdir { pub fn new(resolver: Arc<PathResolver>) -> Self { Self { resolver } } }

#[async_trait]
impl Command for Rmdir {
    fn name(&self) -> &'static str { "rmdir" }
    async fn call(&self, args: &[String]) -> CommandResult<String> {
        let dir = required(args, 0, "directory name")?;
        let full = self.resolver.confine(dir)?;
        fs::remove_dir_all(&full).await.map_err(|e| CommandError::from_io(dir, e))?;
        Ok(OK.to_string())
    }
}
