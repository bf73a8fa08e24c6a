//! Directory Selector Module
//!
//! 入力ディレクトリを取得するモジュール。
//! コマンドライン引数で与えられたパスと、コンソールでの対話入力の
//! 2つの実装を提供します。

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::error::NfeReportError;

/// 入力ディレクトリの取得方法
///
/// `Ok(None)`はユーザーによるキャンセルを表し、エラーではありません。
pub trait DirectorySelector {
    /// ディレクトリを取得する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Some(PathBuf))` - ディレクトリが選択された場合
    /// * `Ok(None)` - 選択がキャンセルされた場合
    /// * `Err(NfeReportError)` - コンソールの入出力に失敗した場合
    fn select(&mut self) -> Result<Option<PathBuf>, NfeReportError>;
}

/// あらかじめ決められたディレクトリを返すセレクター
#[derive(Debug, Clone)]
pub struct FixedDirectory {
    path: PathBuf,
}

impl FixedDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DirectorySelector for FixedDirectory {
    fn select(&mut self) -> Result<Option<PathBuf>, NfeReportError> {
        Ok(Some(self.path.clone()))
    }
}

/// コンソールで対話的にディレクトリを尋ねるセレクター
///
/// 空行または入力の終端（Ctrl+D）はキャンセルとして扱います。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::io;
/// use nfe_report::{DirectorySelector, PromptSelector};
///
/// # fn main() -> Result<(), nfe_report::NfeReportError> {
/// let stdin = io::stdin();
/// let mut selector = PromptSelector::new(stdin.lock(), io::stderr());
/// match selector.select()? {
///     Some(dir) => println!("Selected: {}", dir.display()),
///     None => println!("No folder selected."),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

/// プロンプトに表示する文言
pub const PROMPT: &str = "Select the folder with the XML files: ";

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> DirectorySelector for PromptSelector<R, W> {
    fn select(&mut self) -> Result<Option<PathBuf>, NfeReportError> {
        write!(self.output, "{}", PROMPT)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let path = clean_input(&line);
        if path.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(path)))
    }
}

/// 前後の空白と、ファイルマネージャーから貼り付けた際の引用符を取り除く
fn clean_input(line: &str) -> &str {
    let trimmed = line.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].trim();
        }
    }
    trimmed
}
