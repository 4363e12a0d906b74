// src/page.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};
use crate::model::PageSpec;

/// Quasar のページコンポーネント (.vue) の中身を組み立てる
///
/// コンポーネント名は見出しと `name` フィールドの 2 か所に入る。
/// ts のときだけ `<script lang='ts'>` になる。
pub fn render_page(spec: &PageSpec) -> String {
    let name = &spec.name;
    let attr = spec.lang.script_attr();
    format!(
        r#"<template>
  <q-page>
    <q-card>
      <q-card-section>
        <div class="text-h6">{name}</div>
      </q-card-section>
    </q-card>
  </q-page>
</template>

<script{attr}>
export default {{
  name: '{name}',
}};
</script>
"#
    )
}

/// `pages_dir/<name>.vue` を書き出す。既存ファイルは警告なしで上書きする。
///
/// 戻り値: 書き出したファイルのパス
pub fn create_page(spec: &PageSpec, pages_dir: &Path) -> Result<PathBuf> {
    let target = pages_dir.join(spec.file_name());
    fs::write(&target, render_page(spec)).map_err(|e| ScaffoldError::io(&target, e))?;
    Ok(target)
}
