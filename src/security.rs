use crate::errors::CommandError;
use std::path::{Component, Path, PathBuf};

/// Maps client-supplied relative paths onto the sandbox root.
///
/// Resolution is purely lexical: `.` and `..` are collapsed without consulting the
/// filesystem, and containment is decided on whole path components so a sibling such
/// as `/srv/data-evil` never passes for a root of `/srv/data`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// `root` is expected to be absolute; it is normalized once here.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: normalize(root.as_ref()) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        normalize(&self.root.join(relative))
    }

    pub fn is_safe(&self, relative: &str) -> bool {
        self.resolve(relative).starts_with(&self.root)
    }

    /// Resolves `relative`, rejecting it when it lands outside the root.
    pub fn confine(&self, relative: &str) -> Result<PathBuf, CommandError> {
        if self.is_safe(relative) {
            Ok(self.resolve(relative))
        } else {
            Err(CommandError::PathOutsideRoot(relative.to_string()))
        }
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            // `..` at the filesystem root stays at the root
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(c) => out.push(c),
        }
    }
    out
}
