use std::path::{Path, PathBuf};

/// File name of the multi-project workspace marker.
pub const WORKSPACE_MARKER: &str = ".qfg-workspace";

/// Where a command is running. Recomputed on every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceContext {
    /// A directory holding a project Config; the path points at the Config.
    SingleProject(PathBuf),
    /// A marked workspace root and its member project roots, sorted.
    Workspace { root: PathBuf, members: Vec<PathBuf> },
    NoContext,
}

impl WorkspaceContext {
    /// Project root for a single project.
    pub fn project_root(&self) -> Option<&Path> {
        match self {
            Self::SingleProject(config) => config.parent(),
            _ => None,
        }
    }

    /// Member whose directory name equals `name`.
    pub fn member(&self, name: &str) -> Option<&Path> {
        match self {
            Self::Workspace { members, .. } => members
                .iter()
                .find(|m| m.file_name().is_some_and(|n| n == name))
                .map(PathBuf::as_path),
            _ => None,
        }
    }

    pub fn member_names(&self) -> Vec<String> {
        match self {
            Self::Workspace { members, .. } => members
                .iter()
                .filter_map(|m| m.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::NoContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_members_by_directory_name() {
        let ctx = WorkspaceContext::Workspace {
            root: PathBuf::from("/ws"),
            members: vec![PathBuf::from("/ws/api"), PathBuf::from("/ws/web")],
        };
        assert_eq!(ctx.member("web"), Some(Path::new("/ws/web")));
        assert_eq!(ctx.member("mobile"), None);
        assert_eq!(ctx.member_names(), ["api", "web"]);
    }

    #[test]
    fn single_project_root_is_config_parent() {
        let ctx = WorkspaceContext::SingleProject(PathBuf::from("/p/.framework-config.yml"));
        assert_eq!(ctx.project_root(), Some(Path::new("/p")));
        assert!(WorkspaceContext::NoContext.is_none());
    }
}
