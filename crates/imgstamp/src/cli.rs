use anyhow::Context;
use clap::Parser;
use imgstamp_build::{BuildRequest, DEFAULT_ENGINE, Engine, resolve_defaults};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "imgstamp", version)]
#[command(about = "Build a Dockerfile directory into a date-stamped image and push it", long_about = None)]
pub struct Cli {
    /// ビルドするイメージ名（リポジトリ直下のディレクトリ名と一致させる）
    pub target: String,

    /// レジストリのユーザー名（名前空間）。省略時は f00d4tehg0dz
    #[arg(long, env = "IMGSTAMP_USERNAME")]
    pub username: Option<String>,

    /// イメージタグ。省略時は今日の日付 (DDMMYYYY)
    #[arg(long)]
    pub tag: Option<String>,

    /// `:latest` としてもタグ付け・プッシュする
    #[arg(long)]
    pub latest: bool,

    /// ビルドのみ行い、プッシュしない
    #[arg(long)]
    pub no_push: bool,

    /// `<target>/Dockerfile` を含むリポジトリのルート（ビルドコンテキスト）。
    /// 省略時はカレントディレクトリ
    #[arg(long, env = "IMGSTAMP_ROOT")]
    pub root: Option<PathBuf>,

    /// 使用するコンテナエンジン CLI（docker 互換）
    #[arg(long, env = "IMGSTAMP_ENGINE", default_value = DEFAULT_ENGINE)]
    pub engine: String,

    /// デバッグログを表示
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 実行内容とエンジン設定を組み立てる
    pub fn into_request(self) -> anyhow::Result<(BuildRequest, Engine)> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir().context("カレントディレクトリを取得できません")?,
        };

        let defaults = resolve_defaults();
        let username = self.username.unwrap_or(defaults.registry_user);
        let tag = self.tag.unwrap_or(defaults.tag);

        let request = BuildRequest::new(root, self.target, username, tag)
            .with_latest(self.latest)
            .with_push(!self.no_push);

        Ok((request, Engine::new(self.engine)))
    }
}
