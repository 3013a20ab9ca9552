//! ITN 规则定义
//!
//! 包含短语定位器使用的数字词表、连接符

use std::collections::HashSet;

/// 定位器认得的数字词
///
/// 比注册表的词汇更宽：十一到十九、lakh、crore 会被定位出来，
/// 但没有对应的数量级转换器，归一化时按未识别词跳过。
const NUMBER_WORDS: [&str; 34] = [
    // 个位
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    // 十到十九
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
    // 整十
    "twenty",
    "thirty",
    "forty",
    "fifty",
    "sixty",
    "seventy",
    "eighty",
    "ninety",
    // 量级
    "hundred",
    "thousand",
    "million",
    "billion",
    "trillion",
    // 印度计数
    "lakh",
    "crore",
];

/// 序数词
///
/// 和基数词只差一两个字母（fifth/fifty、ninth/nine、hundredth/hundred），
/// 拼写纠错不得把它们当作错拼的数字词。
const ORDINAL_WORDS: [&str; 32] = [
    "first",
    "second",
    "third",
    "fourth",
    "fifth",
    "sixth",
    "seventh",
    "eighth",
    "ninth",
    "tenth",
    "eleventh",
    "twelfth",
    "thirteenth",
    "fourteenth",
    "fifteenth",
    "sixteenth",
    "seventeenth",
    "eighteenth",
    "nineteenth",
    "twentieth",
    "thirtieth",
    "fortieth",
    "fiftieth",
    "sixtieth",
    "seventieth",
    "eightieth",
    "ninetieth",
    "hundredth",
    "thousandth",
    "millionth",
    "billionth",
    "trillionth",
];

/// 是否为英文序数词（已小写）
pub fn is_ordinal(word: &str) -> bool {
    ORDINAL_WORDS.contains(&word)
}

/// 数字词表
#[derive(Debug, Clone)]
pub struct NumberVocabulary {
    words: Vec<String>,
    index: HashSet<String>,
}

impl NumberVocabulary {
    pub fn new() -> Self {
        Self::with_extra_words(&[])
    }

    /// 内置词表 + 额外词（统一转小写，去重）
    pub fn with_extra_words(extra: &[String]) -> Self {
        let mut words: Vec<String> = Vec::with_capacity(NUMBER_WORDS.len() + extra.len());
        let mut index = HashSet::new();

        let candidates = NUMBER_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(extra.iter().map(|w| w.trim().to_lowercase()));
        for word in candidates {
            if !word.is_empty() && index.insert(word.clone()) {
                words.push(word);
            }
        }

        Self { words, index }
    }

    /// 检查词是否在词表中（调用方负责折叠大小写）
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    /// 所有词（内置词在前，保持插入顺序）
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// 数字词之间允许出现的连接符（如 "twenty-two"）
    pub fn is_joiner(&self, symbol: &str) -> bool {
        matches!(symbol, "-" | "\u{2010}" | "\u{2011}")
    }
}

impl Default for NumberVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_vocabulary() {
        let vocab = NumberVocabulary::new();
        assert!(vocab.contains("seventeen"));
        assert!(vocab.contains("crore"));
        assert!(vocab.contains("trillion"));
        assert!(!vocab.contains("zillion"));
        assert_eq!(vocab.words().len(), 34);
    }

    #[test]
    fn test_extra_words() {
        let vocab = NumberVocabulary::with_extra_words(&[" Zillion ".to_string(), "ten".to_string()]);
        assert!(vocab.contains("zillion"));
        assert_eq!(vocab.words().len(), 35);
        assert_eq!(vocab.words().last().map(String::as_str), Some("zillion"));
    }

    #[test]
    fn test_ordinals() {
        assert!(is_ordinal("fifth"));
        assert!(is_ordinal("hundredth"));
        assert!(!is_ordinal("fifty"));
        assert!(!NumberVocabulary::new().words().iter().any(|w| is_ordinal(w)));
    }

    #[test]
    fn test_joiner() {
        let vocab = NumberVocabulary::new();
        assert!(vocab.is_joiner("-"));
        assert!(!vocab.is_joiner("."));
    }
}
