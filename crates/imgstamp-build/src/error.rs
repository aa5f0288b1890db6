use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// パイプラインのどの段階で失敗したか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// build とそれに続く push
    Building,
    /// `:latest` への tag とそれに続く push
    Tagging,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Building => write!(f, "build"),
            Stage::Tagging => write!(f, "tag"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{stage} stage failed: `{command}` exited with {}", describe_code(.code))]
    CommandFailed {
        stage: Stage,
        command: String,
        code: Option<i32>,
    },

    #[error("Dockerfile not found: {0}")]
    DockerfileNotFound(PathBuf),

    #[error("Build context directory not found: {0}")]
    ContextNotFound(PathBuf),

    #[error("Invalid image reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("Failed to launch container engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// 外部コマンドが非ゼロで終了したことによる失敗か
    pub fn is_command_failure(&self) -> bool {
        matches!(self, BuildError::CommandFailed { .. })
    }

    /// プロセスの終了コードとして使う値（常に非ゼロ）
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::CommandFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// ユーザー向けの分かりやすいエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            BuildError::DockerfileNotFound(path) => {
                format!(
                    "Dockerfileが見つかりません: {}\n\
                     \n\
                     解決方法:\n\
                     1. ターゲット名がリポジトリ直下のディレクトリ名と一致しているか確認してください\n\
                     2. --root でリポジトリのルートを指定してください",
                    path.display()
                )
            }
            BuildError::ContextNotFound(path) => {
                format!(
                    "ビルドコンテキストが見つかりません: {}\n\
                     \n\
                     --root または IMGSTAMP_ROOT の値を確認してください。",
                    path.display()
                )
            }
            BuildError::Spawn { program, .. } => {
                format!(
                    "コンテナエンジン '{}' を起動できませんでした。\n\
                     \n\
                     インストールされているか、--engine の指定を確認してください。",
                    program
                )
            }
            _ => format!("{}", self),
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failure_exit_code() {
        let err = BuildError::CommandFailed {
            stage: Stage::Building,
            command: "docker build".to_string(),
            code: Some(125),
        };
        assert!(err.is_command_failure());
        assert_eq!(err.exit_code(), 125);
        assert_eq!(
            err.to_string(),
            "build stage failed: `docker build` exited with status 125"
        );
    }

    #[test]
    fn test_signal_terminated_command_exits_with_one() {
        let err = BuildError::CommandFailed {
            stage: Stage::Tagging,
            command: "docker push a/b:latest".to_string(),
            code: None,
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("tag stage failed"));
    }

    #[test]
    fn test_other_errors_are_not_command_failures() {
        let err = BuildError::DockerfileNotFound(PathBuf::from("/repo/app/Dockerfile"));
        assert!(!err.is_command_failure());
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_message().contains("/repo/app/Dockerfile"));
    }
}
