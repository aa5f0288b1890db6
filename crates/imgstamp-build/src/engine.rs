//! コンテナエンジン CLI の呼び出し
//!
//! コマンドはシェルを介さず、プログラム名と引数リストで実行する。

use crate::error::{BuildError, Result};
use crate::reference::ImageReference;
use std::fmt;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// 既定のコンテナエンジン
pub const DEFAULT_ENGINE: &str = "docker";

/// 実行するコマンド（プログラム名 + 引数）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    program: String,
    args: Vec<String>,
}

impl EngineCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// 最初の引数（`build` / `push` / `tag`）
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// 終了ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: Option<i32>) -> Self {
        Self { code }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// シグナルで終了した場合は None
    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// 外部コマンドを実行する抽象
pub trait CommandRunner {
    /// コマンドを完了まで実行し、終了ステータスを返す
    fn run(&self, command: &EngineCommand) -> Result<CommandStatus>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &EngineCommand) -> Result<CommandStatus> {
        (**self).run(command)
    }
}

/// 子プロセスとして実行する（stdout/stderr は継承）
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &EngineCommand) -> Result<CommandStatus> {
        let status = Command::new(command.program())
            .args(command.args())
            .status()
            .map_err(|source| BuildError::Spawn {
                program: command.program().to_string(),
                source,
            })?;

        Ok(status.into())
    }
}

/// エンジン CLI のコマンドライン組み立て
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    program: String,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE)
    }
}

impl Engine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// `build --progress=plain -t <ref> -f <dockerfile> <context>`
    pub fn build_command(
        &self,
        reference: &ImageReference,
        dockerfile: &Path,
        context: &Path,
    ) -> EngineCommand {
        EngineCommand::new(&self.program)
            .arg("build")
            .arg("--progress=plain")
            .arg("-t")
            .arg(reference.to_string())
            .arg("-f")
            .arg(dockerfile.display().to_string())
            .arg(context.display().to_string())
    }

    /// `push <ref>`
    pub fn push_command(&self, reference: &ImageReference) -> EngineCommand {
        EngineCommand::new(&self.program)
            .arg("push")
            .arg(reference.to_string())
    }

    /// `tag <source> <target>`
    pub fn tag_command(&self, source: &ImageReference, target: &ImageReference) -> EngineCommand {
        EngineCommand::new(&self.program)
            .arg("tag")
            .arg(source.to_string())
            .arg(target.to_string())
    }
}
