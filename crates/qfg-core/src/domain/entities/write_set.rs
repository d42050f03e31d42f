use super::artifact::Artifact;
use super::common::RelativePath;
use super::registry_file::RegistryFormat;

/// A single filesystem operation for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Create a new file. Fails if the path exists.
    Create {
        path: RelativePath,
        template_key: &'static str,
    },
    /// Append a named entry to a shared registry file.
    Append {
        path: RelativePath,
        registry: RegistryFormat,
        entry_name: String,
        template_key: &'static str,
    },
}

impl WriteOp {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::Create { path, .. } | Self::Append { path, .. } => path,
        }
    }

    pub fn template_key(&self) -> &'static str {
        match self {
            Self::Create { template_key, .. } | Self::Append { template_key, .. } => template_key,
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create { .. })
    }
}

/// Ordered operations that add one artifact to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSet {
    artifact: Artifact,
    ops: Vec<WriteOp>,
}

impl WriteSet {
    pub fn new(artifact: Artifact, ops: Vec<WriteOp>) -> Self {
        Self { artifact, ops }
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn creates(&self) -> impl Iterator<Item = &RelativePath> {
        self.ops.iter().filter(|op| op.is_create()).map(WriteOp::path)
    }

    pub fn appends(&self) -> impl Iterator<Item = &WriteOp> {
        self.ops.iter().filter(|op| !op.is_create())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
