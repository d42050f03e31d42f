//! Workspace Resolver - finds the project a command applies to.
//!
//! Searches the start directory and then each ancestor. In every directory
//! a project Config wins over a workspace marker. Nothing is cached: each
//! call walks the tree again.

use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{CONFIG_FILE_NAME, Config, DomainValidator, WORKSPACE_MARKER, WorkspaceContext},
    error::QfgResult,
};

/// A located project and its parsed Config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHandle {
    pub root: PathBuf,
    pub config: Config,
}

impl ProjectHandle {
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }
}

pub struct WorkspaceResolver {
    filesystem: Box<dyn Filesystem>,
}

impl WorkspaceResolver {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    #[instrument(skip(self), fields(start = %start.display()))]
    pub fn resolve(&self, start: &Path) -> QfgResult<WorkspaceContext> {
        for dir in start.ancestors() {
            let config = dir.join(CONFIG_FILE_NAME);
            if self.filesystem.exists(&config) {
                debug!(config = %config.display(), "Found project config");
                return Ok(WorkspaceContext::SingleProject(config));
            }

            if self.filesystem.exists(&dir.join(WORKSPACE_MARKER)) {
                let members = self.members(dir)?;
                debug!(root = %dir.display(), members = members.len(), "Found workspace");
                return Ok(WorkspaceContext::Workspace {
                    root: dir.to_path_buf(),
                    members,
                });
            }
        }

        debug!("No project context");
        Ok(WorkspaceContext::NoContext)
    }

    /// Root of the project a command should act on.
    ///
    /// Inside a workspace root, `member` picks the project; without it the
    /// caller is asked to choose.
    pub fn project_root(&self, start: &Path, member: Option<&str>) -> QfgResult<PathBuf> {
        let context = self.resolve(start)?;

        match (&context, member) {
            (WorkspaceContext::SingleProject(config), _) => Ok(config
                .parent()
                .map_or_else(|| start.to_path_buf(), Path::to_path_buf)),
            (WorkspaceContext::Workspace { .. }, Some(name)) => context
                .member(name)
                .map(Path::to_path_buf)
                .ok_or_else(|| {
                    ApplicationError::UnknownWorkspaceMember {
                        name: name.to_string(),
                        members: context.member_names(),
                    }
                    .into()
                }),
            (WorkspaceContext::Workspace { root, .. }, None) => {
                Err(ApplicationError::WorkspaceMemberRequired {
                    root: root.clone(),
                    members: context.member_names(),
                }
                .into())
            }
            (WorkspaceContext::NoContext, _) => Err(ApplicationError::NoProjectFound {
                start: start.to_path_buf(),
            }
            .into()),
        }
    }

    /// Locate the project and load its Config.
    pub fn load_project(&self, start: &Path, member: Option<&str>) -> QfgResult<ProjectHandle> {
        let root = self.project_root(start, member)?;
        let config = self.load_config(&root)?;
        Ok(ProjectHandle { root, config })
    }

    /// Parse and validate `<root>/.framework-config.yml`.
    pub fn load_config(&self, root: &Path) -> QfgResult<Config> {
        let raw = self.filesystem.read_to_string(&root.join(CONFIG_FILE_NAME))?;
        let config = Config::parse(&raw)?;
        DomainValidator::validate_config(&config)?;
        Ok(config)
    }

    /// Immediate subdirectories holding a Config, sorted by path.
    fn members(&self, root: &Path) -> QfgResult<Vec<PathBuf>> {
        let mut members: Vec<PathBuf> = self
            .filesystem
            .list_dir(root)?
            .into_iter()
            .filter(|p| self.filesystem.is_dir(p) && self.filesystem.exists(&p.join(CONFIG_FILE_NAME)))
            .collect();
        members.sort();
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::error::QfgError;

    /// A filesystem where `files` exist and `dirs` are directories.
    fn fake(files: &[&str], dirs: &[&str]) -> MockFilesystem {
        let files: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
        let dirs: Vec<PathBuf> = dirs.iter().map(PathBuf::from).collect();

        let mut fs = MockFilesystem::new();
        let (f, d) = (files.clone(), dirs.clone());
        fs.expect_exists()
            .returning(move |p| f.iter().any(|x| x == p) || d.iter().any(|x| x == p));
        let d = dirs.clone();
        fs.expect_is_dir().returning(move |p| d.iter().any(|x| x == p));
        let all: Vec<PathBuf> = files.into_iter().chain(dirs).collect();
        fs.expect_list_dir().returning(move |root| {
            let mut children: Vec<PathBuf> = all
                .iter()
                .filter(|p| p.parent() == Some(root))
                .cloned()
                .collect();
            children.sort();
            Ok(children)
        });
        fs
    }

    #[test]
    fn config_found_in_an_ancestor() {
        let resolver = WorkspaceResolver::new(Box::new(fake(
            &["/work/shop/.framework-config.yml"],
            &["/work/shop", "/work/shop/pages"],
        )));

        let root = resolver
            .project_root(Path::new("/work/shop/pages"), None)
            .unwrap();
        assert_eq!(root, PathBuf::from("/work/shop"));
    }

    #[test]
    fn config_wins_over_marker_in_the_same_directory() {
        let resolver = WorkspaceResolver::new(Box::new(fake(
            &["/work/.framework-config.yml", "/work/.qfg-workspace"],
            &["/work"],
        )));

        let context = resolver.resolve(Path::new("/work")).unwrap();
        assert_eq!(
            context,
            WorkspaceContext::SingleProject(PathBuf::from("/work/.framework-config.yml"))
        );
    }

    #[test]
    fn workspace_root_requires_a_member() {
        let resolver = WorkspaceResolver::new(Box::new(fake(
            &[
                "/work/.qfg-workspace",
                "/work/beta/.framework-config.yml",
                "/work/alpha/.framework-config.yml",
            ],
            &["/work", "/work/alpha", "/work/beta", "/work/docs"],
        )));

        match resolver.project_root(Path::new("/work"), None) {
            Err(QfgError::Application(ApplicationError::WorkspaceMemberRequired {
                members, ..
            })) => assert_eq!(members, vec!["alpha", "beta"]),
            other => panic!("expected WorkspaceMemberRequired, got {other:?}"),
        }

        let beta = resolver.project_root(Path::new("/work"), Some("beta")).unwrap();
        assert_eq!(beta, PathBuf::from("/work/beta"));

        let err = resolver
            .project_root(Path::new("/work"), Some("docs"))
            .unwrap_err();
        assert!(matches!(
            err,
            QfgError::Application(ApplicationError::UnknownWorkspaceMember { .. })
        ));
    }

    #[test]
    fn nothing_found_is_reported() {
        let resolver = WorkspaceResolver::new(Box::new(fake(&[], &["/tmp"])));
        assert_eq!(
            resolver.resolve(Path::new("/tmp")).unwrap(),
            WorkspaceContext::NoContext
        );
        assert!(matches!(
            resolver.project_root(Path::new("/tmp"), None),
            Err(QfgError::Application(ApplicationError::NoProjectFound { .. }))
        ));
    }
}
