//! Directory Scan Module
//!
//! 入力ディレクトリから処理対象のXMLファイルを列挙するモジュール。
//! サブディレクトリは再帰的に探索しません。

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::api::FileOrder;
use crate::error::NfeReportError;

/// 処理対象とするファイル名の接尾辞（大文字小文字を区別）
const XML_SUFFIX: &str = ".xml";

/// ファイル名が処理対象かどうかを判定
///
/// `.XML`のような大文字の拡張子は対象外です。
pub(crate) fn is_candidate_name(name: &str) -> bool {
    name.ends_with(XML_SUFFIX)
}

/// ディレクトリ直下の`.xml`ファイルを列挙する
///
/// # 引数
///
/// * `dir` - 入力ディレクトリ
/// * `order` - 処理順序
///
/// # 戻り値
///
/// * `Ok(Vec<PathBuf>)` - 処理対象ファイルのパス（`order`に従った順序）
/// * `Err(NfeReportError)` - ディレクトリの列挙に失敗した場合
pub(crate) fn list_xml_files(
    dir: &Path,
    order: FileOrder,
) -> Result<Vec<PathBuf>, NfeReportError> {
    if !dir.is_dir() {
        return Err(NfeReportError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !is_candidate_name(&name.to_string_lossy()) {
            continue;
        }

        // シンボリックリンクは参照先で判定する
        let path = entry.path();
        if !path.is_file() {
            debug!("Ignoring non-file entry: {}", path.display());
            continue;
        }
        files.push(path);
    }

    if order == FileOrder::Sorted {
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }

    Ok(files)
}
