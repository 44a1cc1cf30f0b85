use crate::{
    commands::OK,
    errors::{CommandError, CommandResult},
    protocol::registry::{required, required_pair, Command},
    security::PathResolver,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::fs;

pub struct Rm { resolver: Arc<PathResolver> }

impl Rm { pub fn new(resolver: Arc<PathResolver>) -> Self { Self { resolver } } }

#[async_trait]
impl Command for Rm {
    fn name(&self) -> &'static str { "rm" }
    async fn call(&self, args: &[String]) -> CommandResult<String> {
        let file = required(args, 0, "filename")?;
        let full = self.resolver.confine(file)?;
        fs::remove_file(&full).await.map_err(|e| CommandError::from_io(file, e))?;
        Ok(OK.to_string())
    }
}

/// Replaces the whole file with the request's content, creating it if needed.
pub struct Upload { resolver: Arc<PathResolver> }

impl Upload { pub fn new(resolver: Arc<PathResolver>) -> Self { Self { resolver } } }

#[async_trait]
impl Command for Upload {
    fn name(&self) -> &'static str { "upload" }
    async fn call(&self, args: &[String]) -> CommandResult<String> {
        let (file, content) = required_pair(args, "arguments (filename content)")?;
        let full = self.resolver.confine(file)?;
        fs::write(&full, content.as_bytes()).await.map_err(|e| CommandError::from_io(file, e))?;
        Ok(OK.to_string())
    }
}

pub struct Download { resolver: Arc<PathResolver> }

impl Download { pub fn new(resolver: Arc<PathResolver>) -> Self { Self { resolver } } }

#[async_trait]
impl Command for Download {
    fn name(&self) -> &'static str { "download" }
    async fn call(&self, args: &[String]) -> CommandResult<String> {
        let file = required(args, 0, "filename")?;
        let full = self.resolver.confine(file)?;
        let meta = fs::metadata(&full).await.map_err(|e| CommandError::from_io(file, e))?;
        if !meta.is_file() {
            return Err(CommandError::NotAFile(file.to_string()));
        }
        fs::read_to_string(&full).await.map_err(|e| CommandError::from_io(file, e))
    }
}
