//! ITN (Inverse Text Normalization) - 数字词规范化层
//!
//! 把自由文本中拼写出来的数字短语替换为阿拉伯数字。
//!
//! ## 处理流程
//! 1. 分词（字母词/数字/空白/符号），保留字节偏移
//! 2. 定位数字短语（词表匹配 + 可选拼写纠错，或 LLM 抽取）
//! 3. 每个短语交给 WFST 引擎解码
//! 4. 从右往左回填原文，失败的短语原样保留

mod engine;
mod fuzzy;
mod llm_locator;
mod locator;
mod rules;
mod tokenizer;
mod types;

pub use engine::NumberNormalizer;
pub use fuzzy::FuzzyCorrector;
pub use llm_locator::{anchor_phrases, parse_phrase_list, LlmPhraseLocator};
pub use locator::{fold_word, PatternLocator, PhraseLocator};
pub use rules::NumberVocabulary;
pub use tokenizer::{Token, TokenType, Tokenizer};
pub use types::{LocatedPhrase, NormalizationResult, PhraseCategory, Replacement, SkippedPhrase};
