use crate::{
    commands::OK,
    errors::{CommandError, CommandResult},
    protocol::registry::{required_pair, Command},
    security::PathResolver,
};
use async_trait::async_trait;
use std::{fs::Metadata, io, path::Path, sync::Arc};
use tokio::fs;

pub struct Rename { resolver: Arc<PathResolver> }

impl Rename { pub fn new(resolver: Arc<PathResolver>) -> Self { Self { resolver } } }

#[async_trait]
impl Command for Rename {
    fn name(&self) -> &'static str { "rename" }
    async fn call(&self, args: &[String]) -> CommandResult<String> {
        let (old, new) = required_pair(args, "arguments (oldname newname)")?;
        // both sides are confined before anything moves
        let from = self.resolver.confine(old)?;
        let to = self.resolver.confine(new)?;
        if let Err(e) = fs::rename(&from, &to).await {
            return Err(blame(old, &from, new, e).await);
        }
        Ok(OK.to_string())
    }
}

/// Copies file contents, overwriting the destination.
pub struct Cp { resolver: Arc<PathResolver> }

impl Cp { pub fn new(resolver: Arc<PathResolver>) -> Self { Self { resolver } } }

#[async_trait]
impl Command for Cp {
    fn name(&self) -> &'static str { "cp" }
    async fn call(&self, args: &[String]) -> CommandResult<String> {
        let (src, dst) = required_pair(args, "arguments (source destination)")?;
        let from = self.resolver.confine(src)?;
        let to = self.resolver.confine(dst)?;
        if same_file(&from, &to).await {
            let source = io::Error::new(io::ErrorKind::InvalidInput, "source and destination are the same file");
            return Err(CommandError::Io { path: src.to_string(), source });
        }
        if let Err(e) = fs::copy(&from, &to).await {
            return Err(blame(src, &from, dst, e).await);
        }
        Ok(OK.to_string())
    }
}

/// Attributes a two-path failure: a missing path is the source unless the source
/// is still there, in which case the destination side is at fault.
async fn blame(src_arg: &str, src: &Path, dst_arg: &str, err: io::Error) -> CommandError {
    if err.kind() == io::ErrorKind::NotFound && fs::try_exists(src).await.unwrap_or(false) {
        CommandError::from_io(dst_arg, err)
    } else {
        CommandError::from_io(src_arg, err)
    }
}

/// True when both paths name the same file, through links included.
async fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::metadata(a).await, fs::metadata(b).await) {
        (Ok(ma), Ok(mb)) => same_inode(&ma, &mb),
        _ => false,
    }
}

#[cfg(unix)]
fn same_inode(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_inode(_a: &Metadata, _b: &Metadata) -> bool {
    false
}
