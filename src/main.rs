// src/main.rs

use clap::Parser;
use std::io;
use std::path::PathBuf;

mod discovery;
mod driver;
mod error;
mod logger;
mod model;
mod naming;
mod page;
mod patcher;

use driver::Options;
use error::{Result, ScaffoldError};
use logger::Console;

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "qpages",
    version = "0.1.0",
    about = "Quasar プロジェクトにページコンポーネントを作成し、routes ファイルへルートを追加する対話型 CLI ツール"
)]
struct Cli {
    /// 探索の起点となるプロジェクトルート (省略時はカレントディレクトリ)
    #[arg(short = 'r', long = "project-root", value_name = "DIR", default_value = ".")]
    project_root: PathBuf,

    /// pages ディレクトリを直接指定する (探索しない)
    #[arg(long = "pages-dir", value_name = "DIR")]
    pages_dir: Option<PathBuf>,

    /// routes.ts / routes.js を直接指定する (探索しない)
    #[arg(long = "routes-file", value_name = "FILE")]
    routes_file: Option<PathBuf>,

    /// 実行結果を JSON で出力
    #[arg(long)]
    json: bool,

    /// 色付けを無効にする
    #[arg(long = "no-color")]
    no_color: bool,

    /// 探索結果などの詳細を表示
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    // 1) CLI 引数をパース
    let cli = Cli::parse();
    if cli.no_color {
        owo_colors::set_override(false);
    }

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout(), cli.verbose);

    // 2) 致命的エラーは赤字で表示して終了コード 1
    if let Err(e) = execute(&cli, &mut console) {
        console.error(&e.to_string());
        std::process::exit(1);
    }
}

fn execute<R: io::BufRead, W: io::Write>(cli: &Cli, console: &mut Console<R, W>) -> Result<()> {
    let project_root = cli
        .project_root
        .canonicalize()
        .map_err(|source| ScaffoldError::ProjectRoot {
            path: cli.project_root.clone(),
            source,
        })?;

    let options = Options {
        project_root,
        pages_dir: cli.pages_dir.clone(),
        routes_file: cli.routes_file.clone(),
    };

    // 3) 対話 → ページ作成 → ルート追加
    let summary = driver::run(console, &options)?;

    // 4) --json なら結果を標準出力へ
    if cli.json {
        console.info(&serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
