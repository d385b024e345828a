// Reconcile - 入力と出力のファイル名照合

use crate::storage::StorageBackend;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// 入力ファイル名のうち出力側に同名で存在するものを数える
///
/// 照合は完全一致（大文字小文字を区別する）。
pub fn count_matches<'a>(
    input_names: impl IntoIterator<Item = &'a str>,
    output_names: &HashSet<String>,
) -> usize {
    input_names
        .into_iter()
        .filter(|name| output_names.contains(*name))
        .count()
}

/// 出力ディレクトリを列挙して一致件数を求める
pub async fn reconcile<S>(storage: &S, input_names: &[String], output_dir: &Path) -> Result<usize>
where
    S: StorageBackend + ?Sized,
{
    let output_names = storage
        .list_names(output_dir)
        .await
        .with_context(|| format!("出力ディレクトリの列挙に失敗: {}", output_dir.display()))?;

    Ok(count_matches(
        input_names.iter().map(String::as_str),
        &output_names,
    ))
}
