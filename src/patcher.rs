// src/patcher.rs
use std::fs;
use std::path::Path;

use crate::error::{Result, ScaffoldError};
use crate::model::{LoadMode, PageSpec, PatchOutcome};

/// 追加するルート行のインデント
const ENTRY_INDENT: &str = "      ";

/// ルーティングファイルを読み込み、ページのルートを children 配列へ追加して書き戻す
///
/// - `routes_file`: 発見した routes.ts / routes.js
/// - `pages`: 書き出しに成功したページ (順番どおりに挿入される)
///
/// マーカーが見つからない場合もエラーにはせず、`PatchOutcome` で返す。
pub fn add_routes(routes_file: &Path, pages: &[PageSpec]) -> Result<PatchOutcome> {
    let text = fs::read_to_string(routes_file).map_err(|e| ScaffoldError::io(routes_file, e))?;
    let (patched, outcome) = patch_routes(&text, pages);
    fs::write(routes_file, patched).map_err(|e| ScaffoldError::io(routes_file, e))?;
    Ok(outcome)
}

/// 1 ページ分の children エントリ (インデント・改行なし)
pub fn route_entry(page: &PageSpec) -> String {
    match page.load {
        LoadMode::Dynamic => format!(
            "{{ path: '{}', component: () => import('pages/{}') }},",
            page.route_path,
            page.file_name()
        ),
        LoadMode::Static => format!(
            "{{ path: '{}', component: {} }},",
            page.route_path, page.name
        ),
    }
}

/// 静的読み込みのページ用 import 文 (改行なし)
pub fn import_line(page: &PageSpec) -> String {
    format!("import {} from 'pages/{}';", page.name, page.file_name())
}

/// テキスト上でルートを追加する本体。ファイル I/O はしない。
///
/// 1) 静的読み込みのページの import 文をファイル先頭に追加
/// 2) `path: '/'` を含む最初の行を探す
/// 3) そこから `children: [` を探す
/// 4) 対応する `]` を括弧の深さで探し、その直前にエントリを挿入
///
/// 挿入位置以外のテキストはそのまま残す。
pub fn patch_routes(text: &str, pages: &[PageSpec]) -> (String, PatchOutcome) {
    if pages.is_empty() {
        return (text.to_string(), PatchOutcome::Inserted { entries: 0 });
    }

    let nl = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut lines: Vec<String> = text.split_inclusive('\n').map(String::from).collect();

    // 1) import 文は他のどの処理よりも先に、入力順で先頭へ
    let imports: Vec<String> = pages
        .iter()
        .filter(|p| p.load == LoadMode::Static)
        .map(|p| format!("{}{}", import_line(p), nl))
        .collect();
    lines.splice(0..0, imports);

    let outcome = insert_entries(&mut lines, pages, nl);
    (lines.concat(), outcome)
}

fn insert_entries(lines: &mut Vec<String>, pages: &[PageSpec], nl: &str) -> PatchOutcome {
    // マーカー探索はコメントを空白に置き換えた行で行う (バイト位置は元の行と同じ)
    let code = mask_comments(lines);

    // 2) ルートパスの行
    let Some(root) = code.iter().position(|l| is_root_line(l)) else {
        return PatchOutcome::RootNotFound;
    };

    // 3) children 配列の開き括弧
    let Some(open) = code
        .iter()
        .enumerate()
        .skip(root)
        .find_map(|(i, l)| children_open_col(l).map(|col| (i, col)))
    else {
        return PatchOutcome::ChildrenNotFound;
    };

    // 4) 対応する閉じ括弧
    let Some(scan) = find_matching_close(lines, open) else {
        return PatchOutcome::ChildrenUnclosed;
    };

    let (close_line, mut close_col) = scan.close;

    // 既存の要素があり、末尾がカンマでなければ補う
    if let Some(sig) = scan.last {
        if sig.ch != ',' {
            lines[sig.line].insert(sig.end, ',');
            if sig.line == close_line {
                close_col += 1;
            }
        }
    }

    let entries: Vec<String> = pages
        .iter()
        .map(|p| format!("{ENTRY_INDENT}{}{nl}", route_entry(p)))
        .collect();
    let count = entries.len();

    let head = &lines[close_line][..close_col];
    if head.trim().is_empty() {
        // `]` が行頭 (インデントのみ) にある通常のケース
        lines.splice(close_line..close_line, entries);
    } else {
        // `children: []` のように閉じ括弧の前に中身がある行は分割する
        let indent = leading_whitespace(&lines[open.0]).to_string();
        let head = format!("{}{nl}", head.trim_end());
        let tail = format!("{indent}{}", &lines[close_line][close_col..]);
        let mut replacement = Vec::with_capacity(count + 2);
        replacement.push(head);
        replacement.extend(entries);
        replacement.push(tail);
        lines.splice(close_line..=close_line, replacement);
    }

    PatchOutcome::Inserted { entries: count }
}

fn is_root_line(line: &str) -> bool {
    line.contains("path: '/'") || line.contains("path: \"/\"")
}

/// `children:` の後に続く `[` の位置 (バイトオフセット)
fn children_open_col(line: &str) -> Option<usize> {
    const KEY: &str = "children:";
    line.match_indices(KEY).find_map(|(pos, _)| {
        let rest = &line[pos + KEY.len()..];
        let trimmed = rest.trim_start();
        trimmed
            .starts_with('[')
            .then(|| pos + KEY.len() + (rest.len() - trimmed.len()))
    })
}

/// コメント部分を同じバイト数の空白に置き換えた行を返す
///
/// 文字列リテラル内の `//` や `/*` はコメントとして扱わない。改行文字は残す。
fn mask_comments(lines: &[String]) -> Vec<String> {
    let mut state = Lex::Code;
    let mut masked = Vec::with_capacity(lines.len());

    for line in lines {
        let mut out = String::with_capacity(line.len());
        let mut chars = line.chars().peekable();
        let mut line_comment = false;

        while let Some(c) = chars.next() {
            if c == '\r' || c == '\n' {
                out.push(c);
                continue;
            }
            if line_comment {
                blank(&mut out, c);
                continue;
            }
            match state {
                Lex::Code => match c {
                    '/' if chars.peek() == Some(&'/') => {
                        line_comment = true;
                        blank(&mut out, c);
                    }
                    '/' if chars.peek() == Some(&'*') => {
                        chars.next();
                        state = Lex::BlockComment;
                        out.push_str("  ");
                    }
                    '\'' | '"' | '`' => {
                        state = Lex::Str(c);
                        out.push(c);
                    }
                    _ => out.push(c),
                },
                Lex::Str(quote) => {
                    out.push(c);
                    if c == '\\' {
                        if let Some(&next) = chars.peek() {
                            if next != '\r' && next != '\n' {
                                chars.next();
                                out.push(next);
                            }
                        }
                    } else if c == quote {
                        state = Lex::Code;
                    }
                }
                Lex::BlockComment => {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        state = Lex::Code;
                        out.push_str("  ");
                    } else {
                        blank(&mut out, c);
                    }
                }
            }
        }

        if matches!(state, Lex::Str(q) if q != '`') {
            state = Lex::Code;
        }
        masked.push(out);
    }
    masked
}

fn blank(out: &mut String, c: char) {
    out.extend(std::iter::repeat_n(' ', c.len_utf8()));
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

/// 配列内で最後に現れた意味のある文字 (空白・コメント以外)
#[derive(Debug, Clone, Copy)]
struct Significant {
    line: usize,
    /// 文字の直後のバイトオフセット
    end: usize,
    ch: char,
}

#[derive(Debug)]
struct CloseScan {
    close: (usize, usize),
    last: Option<Significant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lex {
    Code,
    Str(char),
    BlockComment,
}

/// `open` の `[` に対応する `]` を探す
///
/// 文字列リテラル ('...', "...", `...`) とコメント中の括弧は数えない。
fn find_matching_close(lines: &[String], open: (usize, usize)) -> Option<CloseScan> {
    let mut depth = 1usize;
    let mut state = Lex::Code;
    let mut last: Option<Significant> = None;

    for (li, line) in lines.iter().enumerate().skip(open.0) {
        let start = if li == open.0 { open.1 + 1 } else { 0 };
        let mut chars = line[start..]
            .char_indices()
            .map(|(i, c)| (i + start, c))
            .peekable();

        while let Some((i, c)) = chars.next() {
            let sig = Significant {
                line: li,
                end: i + c.len_utf8(),
                ch: c,
            };
            match state {
                Lex::Code => match c {
                    '/' if matches!(chars.peek(), Some((_, '/'))) => break,
                    '/' if matches!(chars.peek(), Some((_, '*'))) => {
                        chars.next();
                        state = Lex::BlockComment;
                    }
                    '\'' | '"' | '`' => {
                        state = Lex::Str(c);
                        last = Some(sig);
                    }
                    '[' => {
                        depth += 1;
                        last = Some(sig);
                    }
                    ']' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(CloseScan {
                                close: (li, i),
                                last,
                            });
                        }
                        last = Some(sig);
                    }
                    c if c.is_whitespace() => {}
                    _ => last = Some(sig),
                },
                Lex::Str(quote) => {
                    if c == '\\' {
                        chars.next();
                    } else if c == quote {
                        state = Lex::Code;
                        last = Some(sig);
                    }
                }
                Lex::BlockComment => {
                    if c == '*' && matches!(chars.peek(), Some((_, '/'))) {
                        chars.next();
                        state = Lex::Code;
                    }
                }
            }
        }

        // ' と " の文字列は行をまたがない。テンプレートリテラルだけ継続
        if matches!(state, Lex::Str(q) if q != '`') {
            state = Lex::Code;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScriptLang;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn page(name: &str, route: &str, load: LoadMode) -> PageSpec {
        PageSpec {
            name: name.to_string(),
            route_path: route.to_string(),
            lang: ScriptLang::Ts,
            load,
        }
    }

    const EMPTY_CHILDREN: &str = "import { RouteRecordRaw } from 'vue-router';

const routes: RouteRecordRaw[] = [
  {
    path: '/',
    component: () => import('layouts/MainLayout.vue'),
    children: [],
  },

  {
    path: '/:catchAll(.*)*',
    component: () => import('pages/ErrorNotFound.vue'),
  },
];

export default routes;
";

    const MULTILINE_CHILDREN: &str = "const routes = [
  {
    path: '/',
    component: () => import('layouts/MainLayout.vue'),
    children: [
      { path: '', component: () => import('pages/IndexPage.vue') }
    ],
  },
];
";

    #[test]
    fn dynamic_page_into_empty_children() {
        let pages = [page("Home", "/home", LoadMode::Dynamic)];
        let (out, outcome) = patch_routes(EMPTY_CHILDREN, &pages);

        let expected = EMPTY_CHILDREN.replace(
            "    children: [],\n",
            "    children: [\n      { path: '/home', component: () => import('pages/Home.vue') },\n    ],\n",
        );
        assert_eq!(out, expected);
        assert_eq!(outcome, PatchOutcome::Inserted { entries: 1 });
    }

    #[test]
    fn static_pages_prepend_imports_in_order() {
        let pages = [
            page("Settings", "settings", LoadMode::Static),
            page("UserProfile", "user-profile", LoadMode::Static),
        ];
        let (out, _) = patch_routes(EMPTY_CHILDREN, &pages);

        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("import Settings from 'pages/Settings.vue';"));
        assert_eq!(lines.next(), Some("import UserProfile from 'pages/UserProfile.vue';"));
        assert_eq!(lines.next(), Some("import { RouteRecordRaw } from 'vue-router';"));

        assert!(out.contains(
            "    children: [\n      { path: 'settings', component: Settings },\n      { path: 'user-profile', component: UserProfile },\n    ],\n"
        ));
        assert!(!out.contains("import('pages/Settings.vue')"));
    }

    #[test]
    fn missing_comma_is_added_to_previous_entry() {
        let pages = [page("About", "about", LoadMode::Dynamic)];
        let (out, _) = patch_routes(MULTILINE_CHILDREN, &pages);

        let expected = "const routes = [
  {
    path: '/',
    component: () => import('layouts/MainLayout.vue'),
    children: [
      { path: '', component: () => import('pages/IndexPage.vue') },
      { path: 'about', component: () => import('pages/About.vue') },
    ],
  },
];
";
        assert_eq!(out, expected);
    }

    #[test]
    fn existing_trailing_comma_is_kept_single() {
        let src = MULTILINE_CHILDREN.replace("IndexPage.vue') }\n", "IndexPage.vue') },\n");
        let (out, _) = patch_routes(&src, &[page("About", "about", LoadMode::Dynamic)]);
        assert!(!out.contains(",,"));
        assert_eq!(out.matches("IndexPage.vue') },").count(), 1);
    }

    #[test]
    fn empty_multiline_children_get_no_stray_comma() {
        let src = "const routes = [\n  {\n    path: '/',\n    children: [\n    ],\n  },\n];\n";
        let (out, _) = patch_routes(src, &[page("Home", "home", LoadMode::Static)]);

        let expected = "import Home from 'pages/Home.vue';\nconst routes = [\n  {\n    path: '/',\n    children: [\n      { path: 'home', component: Home },\n    ],\n  },\n];\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn no_root_path_is_a_no_op_apart_from_imports() {
        let src = "const routes = [\n  { path: '/login', children: [] },\n];\n";

        let (out, outcome) = patch_routes(src, &[page("Home", "home", LoadMode::Dynamic)]);
        assert_eq!(outcome, PatchOutcome::RootNotFound);
        assert_eq!(out, src);

        let (out, outcome) = patch_routes(src, &[page("Home", "home", LoadMode::Static)]);
        assert_eq!(outcome, PatchOutcome::RootNotFound);
        assert_eq!(out, format!("import Home from 'pages/Home.vue';\n{src}"));
    }

    #[test]
    fn root_without_children_is_a_no_op() {
        let src = "const routes = [\n  { path: '/', component: Main },\n];\n";
        let (out, outcome) = patch_routes(src, &[page("Home", "home", LoadMode::Dynamic)]);
        assert_eq!(outcome, PatchOutcome::ChildrenNotFound);
        assert_eq!(out, src);
    }

    #[test]
    fn unclosed_children_is_a_no_op() {
        let src = "const routes = [\n  {\n    path: '/',\n    children: [\n      { path: '', component: Index },\n";
        let (out, outcome) = patch_routes(src, &[page("Home", "home", LoadMode::Dynamic)]);
        assert_eq!(outcome, PatchOutcome::ChildrenUnclosed);
        assert_eq!(out, src);
    }

    #[test]
    fn brackets_in_strings_and_nested_arrays_are_skipped() {
        let src = "const routes = [
  {
    path: '/',
    children: [
      { path: 'tags', meta: { tags: ['a', 'b'] }, component: Tags },
      { path: 'odd', meta: { label: 'x]y' }, component: Odd }, // not ] here
      /* ] */
    ],
  },
];
";
        let (out, _) = patch_routes(src, &[page("Home", "home", LoadMode::Static)]);

        let expected_tail = "      /* ] */
      { path: 'home', component: Home },
    ],
  },
];
";
        assert!(out.ends_with(expected_tail), "{out}");
        assert!(out.contains("meta: { tags: ['a', 'b'] }, component: Tags },\n"));
    }

    #[test]
    fn commented_out_markers_are_ignored() {
        let src = "const routes = [
  {
    // path: '/', children: [ legacy ],
    path: '/',
    // children: [ old
    /* children: [
    ] */
    children: [
      { path: '' }
    ],
  },
];
";
        let (out, outcome) = patch_routes(src, &[page("Home", "home", LoadMode::Dynamic)]);

        let expected = src.replace(
            "      { path: '' }\n    ],\n",
            "      { path: '' },\n      { path: 'home', component: () => import('pages/Home.vue') },\n    ],\n",
        );
        assert_eq!(out, expected);
        assert_eq!(outcome, PatchOutcome::Inserted { entries: 1 });
    }

    #[test]
    fn comment_markers_inside_strings_are_not_comments() {
        let src = "const routes = [
  {
    path: '/', meta: { home: 'https://example.com' }, children: [
    ],
  },
];
";
        let (out, outcome) = patch_routes(src, &[page("Home", "home", LoadMode::Static)]);
        assert_eq!(outcome, PatchOutcome::Inserted { entries: 1 });
        assert!(out.contains("children: [\n      { path: 'home', component: Home },\n    ],\n"));
    }

    #[test]
    fn root_only_in_comment_is_not_found() {
        let src = "const routes = [\n  // { path: '/', children: [] },\n];\n";
        let (out, outcome) = patch_routes(src, &[page("Home", "home", LoadMode::Dynamic)]);
        assert_eq!(outcome, PatchOutcome::RootNotFound);
        assert_eq!(out, src);
    }

    #[test]
    fn masking_keeps_byte_offsets() {
        let lines = vec!["a /* é */ b // ü\r\n".to_string(), "'//' c\n".to_string()];
        let masked = mask_comments(&lines);
        assert_eq!(masked[0].len(), lines[0].len());
        assert_eq!(masked[0].trim_end(), "a          b");
        assert!(masked[0].ends_with("\r\n"));
        assert_eq!(masked[1], "'//' c\n");
    }

    #[test]
    fn comma_goes_before_trailing_comment() {
        let src = "const routes = [\n  {\n    path: '/',\n    children: [\n      { path: '', component: Index } // index\n    ],\n  },\n];\n";
        let (out, _) = patch_routes(src, &[page("Home", "home", LoadMode::Dynamic)]);
        assert!(out.contains("{ path: '', component: Index }, // index\n"));
    }

    #[test]
    fn inline_children_with_content_are_split() {
        let src = "const routes = [\n  {\n    path: '/',\n    children: [{ path: '', component: Index }],\n  },\n];\n";
        let (out, _) = patch_routes(src, &[page("Home", "home", LoadMode::Static)]);

        let expected = "import Home from 'pages/Home.vue';\nconst routes = [\n  {\n    path: '/',\n    children: [{ path: '', component: Index },\n      { path: 'home', component: Home },\n    ],\n  },\n];\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn mixed_modes_only_import_static_pages() {
        let pages = [
            page("Home", "home", LoadMode::Dynamic),
            page("About", "about", LoadMode::Static),
        ];
        let (out, outcome) = patch_routes(EMPTY_CHILDREN, &pages);

        assert!(out.starts_with("import About from 'pages/About.vue';\nimport { RouteRecordRaw }"));
        assert!(!out.contains("import Home from"));
        assert!(out.contains("      { path: 'home', component: () => import('pages/Home.vue') },\n      { path: 'about', component: About },\n"));
        assert_eq!(outcome.inserted(), 2);
    }

    #[test]
    fn crlf_files_keep_crlf() {
        let src = MULTILINE_CHILDREN.replace('\n', "\r\n");
        let (out, _) = patch_routes(&src, &[page("About", "about", LoadMode::Static)]);

        assert!(out.starts_with("import About from 'pages/About.vue';\r\n"));
        assert!(out.contains("      { path: 'about', component: About },\r\n    ],\r\n"));
        assert!(!out.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn double_quoted_root_is_recognised() {
        let src = "export default [\n  {\n    path: \"/\",\n    children: [\n    ],\n  },\n];\n";
        let (_, outcome) = patch_routes(src, &[page("Home", "home", LoadMode::Dynamic)]);
        assert_eq!(outcome, PatchOutcome::Inserted { entries: 1 });
    }

    #[test]
    fn no_pages_leaves_text_untouched() {
        let (out, outcome) = patch_routes(MULTILINE_CHILDREN, &[]);
        assert_eq!(out, MULTILINE_CHILDREN);
        assert_eq!(outcome.inserted(), 0);
    }

    #[test]
    fn add_routes_rewrites_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("routes.ts");
        fs::write(&file, EMPTY_CHILDREN).unwrap();

        let outcome = add_routes(&file, &[page("Home", "/home", LoadMode::Dynamic)]).unwrap();

        assert_eq!(outcome, PatchOutcome::Inserted { entries: 1 });
        let text = fs::read_to_string(&file).unwrap();
        assert!(text.contains("{ path: '/home', component: () => import('pages/Home.vue') },"));
    }

    #[test]
    fn add_routes_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("routes.js");
        let err = add_routes(&file, &[page("Home", "home", LoadMode::Dynamic)]).unwrap_err();
        assert!(matches!(err, ScaffoldError::Io { .. }));
    }
}
