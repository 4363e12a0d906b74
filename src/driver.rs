// src/driver.rs
use path_absolutize::Absolutize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::discovery::{find_pages_dir, find_routes_file};
use crate::error::{Result, ScaffoldError};
use crate::logger::Console;
use crate::model::{LoadMode, PageSpec, PatchOutcome, RunSummary, ScriptLang};
use crate::naming::to_kebab_case;
use crate::page::create_page;
use crate::patcher::add_routes;

/// 1 回の実行に必要な設定 (CLI 引数から組み立てる)
#[derive(Debug, Clone)]
pub struct Options {
    /// 探索の起点
    pub project_root: PathBuf,
    /// 指定があれば pages ディレクトリの探索を省略
    pub pages_dir: Option<PathBuf>,
    /// 指定があれば routes ファイルの探索を省略
    pub routes_file: Option<PathBuf>,
}

/// 対話入力 → ページ作成 → ルート追加 を一通り実行する
///
/// 戻り値の `Err` は致命的エラー (不正な言語指定、pages / routes が見つからない、入力終了)。
/// ページ単位の書き込み失敗やルート追加の失敗はここで表示して処理を続ける。
pub fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    options: &Options,
) -> Result<RunSummary> {
    // 1) 対話でページ情報を集める
    let batch = collect_batch(console)?;
    let mut summary = RunSummary {
        pages: batch.clone(),
        ..RunSummary::default()
    };
    let Some(last) = batch.last() else {
        return Ok(summary);
    };
    // routes ファイル名は最後に入力された言語で決める
    let lang = last.lang;

    // 2) pages ディレクトリ
    let pages_dir = match &options.pages_dir {
        Some(dir) => dir.clone(),
        None => find_pages_dir(&options.project_root)
            .ok_or_else(|| ScaffoldError::PagesDirNotFound(options.project_root.clone()))?,
    };
    console.debug(&format!("pages directory: {}", absolute(&pages_dir).display()));
    summary.pages_dir = Some(absolute(&pages_dir));

    // 3) ページを作成。失敗したページはルート追加の対象から外す
    let mut created: Vec<PageSpec> = Vec::new();
    for spec in &batch {
        match create_page(spec, &pages_dir) {
            Ok(path) => {
                console.debug(&format!("wrote {}", path.display()));
                created.push(spec.clone());
            }
            Err(e) => {
                console.error(&format!("could not create page '{}': {e}", spec.name));
                summary.failed.push(spec.name.clone());
            }
        }
    }
    summary.created = created.iter().map(|p| p.name.clone()).collect();

    // 4) routes ファイル
    let routes_file = match &options.routes_file {
        Some(file) => file.clone(),
        None => find_routes_file(&options.project_root, lang.routes_file_name())
            .ok_or_else(|| ScaffoldError::RoutesFileNotFound(lang.routes_file_name().to_string()))?,
    };
    console.debug(&format!("routes file: {}", absolute(&routes_file).display()));
    summary.routes_file = Some(absolute(&routes_file));

    // 5) ルート追加
    match add_routes(&routes_file, &created) {
        Ok(outcome) => {
            report_outcome(console, &routes_file, outcome);
            summary.routes_added = outcome.inserted();
            summary.outcome = Some(outcome);
            console.success(&format!(
                "Successfully created pages: {}",
                summary.created.join(", ")
            ));
        }
        Err(e) => console.error(&format!("could not add the routes: {e}")),
    }

    Ok(summary)
}

/// 「もう 1 ページ追加するか」で `n` / `no` が返るまでページ情報を集める
fn collect_batch<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Vec<PageSpec>> {
    let mut batch = Vec::new();

    loop {
        let name = loop {
            let answer = required(console, "Enter page name: ")?;
            if !answer.is_empty() {
                break answer;
            }
            console.warn("Page name must not be empty.");
        };

        let route_path = required(console, "Enter the route path (leave blank to use page name): ")?;
        let route_path = if route_path.is_empty() {
            to_kebab_case(&name)
        } else {
            route_path
        };

        let lang = ScriptLang::parse_token(&required(console, "Enter the script type (js or ts): ")?)?;
        let load = LoadMode::from_answer(&required(
            console,
            "Do you want to use dynamic component loading? (y/n): ",
        )?);

        batch.push(PageSpec {
            name,
            route_path,
            lang,
            load,
        });

        // 入力が尽きた場合はここで打ち切る
        match console.prompt("Do you want to add more pages? (y/n): ")? {
            None => break,
            Some(answer) if matches!(answer.to_lowercase().as_str(), "n" | "no") => break,
            Some(_) => {}
        }
    }

    Ok(batch)
}

fn required<R: BufRead, W: Write>(console: &mut Console<R, W>, question: &str) -> Result<String> {
    console.prompt(question)?.ok_or(ScaffoldError::InputClosed)
}

fn report_outcome<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    routes_file: &Path,
    outcome: PatchOutcome,
) {
    let file = routes_file.display();
    match outcome {
        PatchOutcome::Inserted { entries } => {
            console.debug(&format!("added {entries} route(s) to {file}"));
        }
        PatchOutcome::RootNotFound => {
            console.warn(&format!("No `path: '/'` route in {file}; no routes were added."));
        }
        PatchOutcome::ChildrenNotFound => {
            console.warn(&format!("No `children: [` after the root route in {file}; no routes were added."));
        }
        PatchOutcome::ChildrenUnclosed => {
            console.warn(&format!("The root route's children array in {file} is never closed; no routes were added."));
        }
    }
}

/// 表示・サマリ用に絶対パス化する。失敗したら元のパスのまま
fn absolute(path: &Path) -> PathBuf {
    path.absolutize()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|_| path.to_path_buf())
}
