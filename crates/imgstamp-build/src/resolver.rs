use crate::error::{BuildError, Result};
use std::path::PathBuf;

/// ビルド定義ファイル名
pub const DOCKERFILE_NAME: &str = "Dockerfile";

pub struct BuildResolver {
    project_root: PathBuf,
}

impl BuildResolver {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Dockerfileのパスを解決
    ///
    /// 規約: `{root}/{target-name}/Dockerfile`
    pub fn resolve_dockerfile(&self, target_name: &str) -> Result<PathBuf> {
        let path = self.project_root.join(target_name).join(DOCKERFILE_NAME);

        if !path.is_file() {
            return Err(BuildError::DockerfileNotFound(path));
        }

        tracing::debug!(
            "Found Dockerfile for '{}' at: {}",
            target_name,
            path.display()
        );
        Ok(path)
    }

    /// ビルドコンテキストのパスを解決
    ///
    /// コンテキストは常にリポジトリルート（各ディレクトリから共有ファイルを参照できるように）
    pub fn resolve_context(&self) -> Result<PathBuf> {
        if !self.project_root.is_dir() {
            return Err(BuildError::ContextNotFound(self.project_root.clone()));
        }

        Ok(self.project_root.canonicalize()?)
    }
}
