// src/discovery.rs
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 探索しないディレクトリ (依存パッケージ内の pages / routes.js に誤マッチしないため)
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// プロジェクト以下を深さ優先でたどるイテレータ
///
/// - 同じ階層ではファイルを先に、次にディレクトリを名前順に見る。
///   浅い階層のファイルが優先され、最初に見つかるものは毎回同じ
/// - 隠しディレクトリと node_modules には入らない
/// - 読めないエントリは読み飛ばす
fn walk(root: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|e| e.ok())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    // ルート自身 (一時ディレクトリ名が `.` で始まることもある) は除外しない
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}

/// 末尾のパス要素が `pages` の最初のディレクトリを返す。ルート自身は対象外。
pub fn find_pages_dir(root: &Path) -> Option<PathBuf> {
    walk(root)
        .find(|e| e.file_type().is_dir() && e.file_name() == "pages")
        .map(DirEntry::into_path)
}

/// ファイル名が `file_name` と完全一致する最初のファイルを返す
pub fn find_routes_file(root: &Path, file_name: &str) -> Option<PathBuf> {
    walk(root)
        .find(|e| e.file_type().is_file() && e.file_name() == file_name)
        .map(DirEntry::into_path)
}
