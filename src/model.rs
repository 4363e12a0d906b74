// src/model.rs
use serde::Serialize;
use std::path::PathBuf;

use crate::error::ScaffoldError;

/// ページのスクリプト言語 (`js` / `ts`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLang {
    Js,
    Ts,
}

impl ScriptLang {
    /// ユーザー入力のトークンを解釈する。前後の空白と大文字小文字は無視。
    pub fn parse_token(token: &str) -> Result<Self, ScaffoldError> {
        match token.trim().to_lowercase().as_str() {
            "js" => Ok(ScriptLang::Js),
            "ts" => Ok(ScriptLang::Ts),
            other => Err(ScaffoldError::InvalidScriptLang(other.to_string())),
        }
    }

    /// この言語で探すルーティングファイル名
    pub fn routes_file_name(self) -> &'static str {
        match self {
            ScriptLang::Js => "routes.js",
            ScriptLang::Ts => "routes.ts",
        }
    }

    /// `<script>` タグに付ける属性 (ts のときだけ)
    pub fn script_attr(self) -> &'static str {
        match self {
            ScriptLang::Js => "",
            ScriptLang::Ts => " lang='ts'",
        }
    }
}

/// コンポーネントの読み込み方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// `() => import('pages/X.vue')` で遅延読み込み
    Dynamic,
    /// ファイル先頭の `import X from ...` を直接参照
    Static,
}

impl LoadMode {
    /// `y` / `yes` だけが Dynamic。それ以外はエラーにせず Static 扱い。
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => LoadMode::Dynamic,
            _ => LoadMode::Static,
        }
    }
}

/// 1 ページ分の入力内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSpec {
    /// コンポーネント名 (例: "UserProfile")
    pub name: String,

    /// ルートのパス。空欄なら name のケバブケース
    pub route_path: String,

    pub lang: ScriptLang,

    pub load: LoadMode,
}

impl PageSpec {
    /// コンポーネントファイル名 (例: "UserProfile.vue")
    pub fn file_name(&self) -> String {
        format!("{}.vue", self.name)
    }
}

/// ルーティングファイルへの挿入結果。マーカーが見つからないのはエラーではない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOutcome {
    /// children 配列にエントリを挿入した
    Inserted { entries: usize },
    /// `path: '/'` の行がない
    RootNotFound,
    /// ルート行以降に `children: [` がない
    ChildrenNotFound,
    /// children 配列の閉じ括弧が見つからない
    ChildrenUnclosed,
}

impl PatchOutcome {
    pub fn inserted(&self) -> usize {
        match self {
            PatchOutcome::Inserted { entries } => *entries,
            _ => 0,
        }
    }
}

/// 1 回の実行結果。`--json` のときに標準出力へ書き出す
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    /// 対話で入力されたページ (入力順)
    pub pages: Vec<PageSpec>,
    pub pages_dir: Option<PathBuf>,
    pub routes_file: Option<PathBuf>,
    pub created: Vec<String>,
    pub failed: Vec<String>,
    pub routes_added: usize,
    /// ルーティングファイルへの挿入結果。ルート追加まで進まなかった場合は None
    pub outcome: Option<PatchOutcome>,
}
