//! Security Module
//!
//! 入力XMLに対する制限を実装するモジュール。
//! 巨大なファイルや異常に深いネストによるリソース枯渇への対策を提供します。
//! 外部実体（XXE）はquick-xmlが展開しないため、未定義の実体参照として
//! 不正なXMLの扱いになります。

use crate::types::SkipReason;

/// セキュリティ設定
///
/// ファイル処理時の制限を定義します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 64MB (67_108_864 bytes)
    pub max_input_file_size: u64,
    /// 要素のネストの最大深さ
    /// デフォルト: 256
    pub max_element_depth: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 67_108_864, // 64MB
            max_element_depth: 256,
        }
    }
}

impl SecurityConfig {
    /// 入力ファイルサイズの検証
    ///
    /// # 引数
    ///
    /// * `size` - ファイルサイズ（バイト）
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 上限以内の場合
    /// * `Err(SkipReason::TooLarge)` - 上限を超えている場合
    pub fn check_input_size(&self, size: u64) -> Result<(), SkipReason> {
        if size > self.max_input_file_size {
            return Err(SkipReason::TooLarge {
                size,
                limit: self.max_input_file_size,
            });
        }
        Ok(())
    }

    /// ネストの深さの検証
    pub fn check_depth(&self, depth: usize) -> Result<(), SkipReason> {
        if depth > self.max_element_depth {
            return Err(SkipReason::Malformed(format!(
                "element nesting exceeds maximum depth: {} (max: {})",
                depth, self.max_element_depth
            )));
        }
        Ok(())
    }
}
