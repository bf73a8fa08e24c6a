//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 入力ファイルの処理順序
///
/// 出力Excelの行順は、XMLファイルの処理順序に従います。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum FileOrder {
    /// ファイル名のバイト順でソート（デフォルト）
    ///
    /// 同じディレクトリに対しては、どのファイルシステムでも同じ行順になります。
    #[default]
    Sorted,

    /// ファイルシステムの列挙順をそのまま使用
    ///
    /// 列挙順はファイルシステムに依存し、実行ごとに安定する保証はありません。
    Listing,
}
