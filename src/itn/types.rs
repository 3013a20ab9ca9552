//! ITN 类型定义

use serde::{Deserialize, Serialize};

/// 短语类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PhraseCategory {
    /// 数字短语
    #[default]
    #[serde(rename = "NUM")]
    Num,
}

/// 定位器找到的短语
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedPhrase {
    /// 原文中的短语文本
    pub text: String,
    /// 起始位置（字节偏移）
    pub start: usize,
    /// 结束位置（字节偏移，不含）
    pub end: usize,
    /// 交给引擎的词（已折叠大小写，可能经过纠错）
    pub words: Vec<String>,
    pub category: PhraseCategory,
}

/// 替换记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replacement {
    /// 原始文本
    pub original: String,
    /// 替换后文本
    pub replaced: String,
    /// 起始位置（字节偏移）
    pub start: usize,
    /// 结束位置（字节偏移）
    pub end: usize,
    /// 解码路径的累计权重
    pub weight: f32,
}

/// 未能归一化的短语
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedPhrase {
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// 跳过原因
    pub reason: String,
}

/// 规范化结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationResult {
    /// 规范化后的文本
    pub text: String,
    /// 是否有改动
    pub changed: bool,
    /// 已替换的短语
    pub applied: Vec<Replacement>,
    /// 被跳过的短语（原文保留）
    pub skipped: Vec<SkippedPhrase>,
    /// 处理耗时（微秒）
    pub elapsed_us: u64,
}

impl NormalizationResult {
    /// 创建无修改的结果
    pub fn unchanged(text: String, elapsed_us: u64) -> Self {
        Self {
            text,
            changed: false,
            applied: Vec::new(),
            skipped: Vec::new(),
            elapsed_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_as_num() {
        let json = serde_json::to_string(&PhraseCategory::Num).unwrap();
        assert_eq!(json, "\"NUM\"");
    }
}
