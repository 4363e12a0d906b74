// src/naming.rs

/// コンポーネント名をルートパス用のケバブケースに変換する
///
/// 先頭以外の大文字 (A-Z) の前に `-` を入れ、全体を小文字にする。
/// 例: "UserProfile" → "user-profile", "home" → "home"
pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            out.push('-');
        }
        out.push(ch);
    }
    out.to_lowercase()
}
