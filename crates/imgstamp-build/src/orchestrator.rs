//! ビルドパイプライン
//!
//! build → (push) → (tag :latest) → (push :latest) を順に実行する。
//! どこかでコマンドが失敗した時点で残りは実行しない。

use crate::engine::{CommandRunner, Engine, EngineCommand};
use crate::error::{BuildError, Result, Stage};
use crate::reference::ImageReference;
use crate::resolver::BuildResolver;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// 既定のレジストリユーザー
pub const DEFAULT_REGISTRY_USER: &str = "f00d4tehg0dz";

/// 日付タグの書式（DDMMYYYY）
pub const DATE_TAG_FORMAT: &str = "%d%m%Y";

/// 引数で上書きされなかった場合に使う値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub tag: String,
    pub registry_user: String,
}

/// 現在日時から既定値を計算
pub fn resolve_defaults() -> Defaults {
    Defaults {
        tag: default_tag(),
        registry_user: DEFAULT_REGISTRY_USER.to_string(),
    }
}

/// 今日の日付タグ
fn default_tag() -> String {
    date_tag(Local::now().date_naive())
}

fn date_tag(date: NaiveDate) -> String {
    date.format(DATE_TAG_FORMAT).to_string()
}

/// 1回の実行で行うビルドの内容
///
/// CLI 入力から一度だけ組み立て、以降は変更しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    root: PathBuf,
    target_name: String,
    registry_user: String,
    tag: String,
    also_tag_latest: bool,
    push: bool,
}

impl BuildRequest {
    /// push あり、`:latest` なしで作成
    pub fn new(
        root: impl Into<PathBuf>,
        target_name: impl Into<String>,
        registry_user: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            target_name: target_name.into(),
            registry_user: registry_user.into(),
            tag: tag.into(),
            also_tag_latest: false,
            push: true,
        }
    }

    pub fn with_latest(mut self, also_tag_latest: bool) -> Self {
        self.also_tag_latest = also_tag_latest;
        self
    }

    pub fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn registry_user(&self) -> &str {
        &self.registry_user
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn also_tag_latest(&self) -> bool {
        self.also_tag_latest
    }

    pub fn push(&self) -> bool {
        self.push
    }
}

/// 実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub primary: ImageReference,
    pub latest: Option<ImageReference>,
    pub pushed: bool,
}

pub struct Orchestrator<R> {
    request: BuildRequest,
    engine: Engine,
    runner: R,
    resolver: BuildResolver,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(request: BuildRequest, engine: Engine, runner: R) -> Self {
        let resolver = BuildResolver::new(request.root().to_path_buf());
        Self {
            request,
            engine,
            runner,
            resolver,
        }
    }

    /// パイプライン全体を実行
    pub fn run(&self) -> Result<BuildOutcome> {
        let request = &self.request;

        let primary = self.build(request.target_name(), request.tag(), request.push())?;
        tracing::info!("Successfully built the container: {}", primary);

        let latest = if request.also_tag_latest() {
            let latest = primary.latest();
            self.tag_and_maybe_push(&primary, &latest, request.push())?;

            if request.push() {
                tracing::info!("Successfully tagged and pushed to {}", latest);
            } else {
                tracing::info!("Successfully tagged as {}", latest);
            }
            Some(latest)
        } else {
            None
        };

        Ok(BuildOutcome {
            primary,
            latest,
            pushed: request.push(),
        })
    }

    /// イメージをビルドし、必要ならプッシュ
    pub fn build(&self, target_name: &str, tag: &str, push: bool) -> Result<ImageReference> {
        let reference = ImageReference::new(self.request.registry_user(), target_name, tag)?;
        tracing::info!("Building {}", reference);

        let context = self.resolver.resolve_context()?;
        let dockerfile = self.resolver.resolve_dockerfile(target_name)?;

        let command = self.engine.build_command(&reference, &dockerfile, &context);
        self.execute(Stage::Building, &command)?;

        if push {
            self.execute(Stage::Building, &self.engine.push_command(&reference))?;
            tracing::info!("Successfully pushed {}", reference);
        } else {
            tracing::info!("Build complete. Skipping push (--no-push specified)");
        }

        Ok(reference)
    }

    /// `source` に `target` の別名を付け、必要ならプッシュ
    pub fn tag_and_maybe_push(
        &self,
        source: &ImageReference,
        target: &ImageReference,
        push: bool,
    ) -> Result<()> {
        self.execute(Stage::Tagging, &self.engine.tag_command(source, target))?;

        if push {
            self.execute(Stage::Tagging, &self.engine.push_command(target))?;
        }

        Ok(())
    }

    fn execute(&self, stage: Stage, command: &EngineCommand) -> Result<()> {
        tracing::info!("Running {} command: {}", self.engine.program(), command);

        let status = self.runner.run(command)?;
        if status.success() {
            return Ok(());
        }

        let err = BuildError::CommandFailed {
            stage,
            command: command.to_string(),
            code: status.code(),
        };
        tracing::error!(
            "Got error while executing {} command: {}",
            self.engine.program(),
            err
        );
        Err(err)
    }
}
