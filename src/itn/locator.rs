//! ITN 短语定位
//!
//! 找出文本中所有数字词短语。定位器可替换：内置的词表匹配器、基于 LLM 的
//! 抽取器（见 `llm_locator`），或调用方自己的实现。

use std::collections::HashMap;

use aho_corasick::{AhoCorasick, MatchKind};
use unicode_normalization::UnicodeNormalization;

use crate::error::{NormalizeError, NormalizeResult};
use crate::itn::fuzzy::FuzzyCorrector;
use crate::itn::rules::NumberVocabulary;
use crate::itn::tokenizer::{Token, TokenType, Tokenizer};
use crate::itn::types::{LocatedPhrase, PhraseCategory};

/// 短语定位器
///
/// 返回的短语互不重叠，按在文本中的位置排序。
pub trait PhraseLocator: Send + Sync {
    fn name(&self) -> &'static str;

    fn locate(&self, text: &str) -> NormalizeResult<Vec<LocatedPhrase>>;
}

/// 词形折叠：NFKC + 小写
pub fn fold_word(word: &str) -> String {
    word.nfkc().collect::<String>().to_lowercase()
}

/// 词表匹配定位器
///
/// 按整词匹配数字词，仅由空白或连字符隔开的相邻数字词合并为一个短语。
pub struct PatternLocator {
    vocabulary: NumberVocabulary,
    matcher: AhoCorasick,
    fuzzy: Option<FuzzyCorrector>,
}

impl PatternLocator {
    pub fn new(vocabulary: NumberVocabulary) -> NormalizeResult<Self> {
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(vocabulary.words())
            .map_err(|e| NormalizeError::LocatorFailure(format!("词表编译失败: {}", e)))?;

        Ok(Self {
            vocabulary,
            matcher,
            fuzzy: None,
        })
    }

    /// 内置英文词表
    pub fn english() -> NormalizeResult<Self> {
        Self::new(NumberVocabulary::new())
    }

    /// 启用拼写纠错
    pub fn with_fuzzy_correction(mut self) -> Self {
        self.fuzzy = Some(FuzzyCorrector::new(self.vocabulary.words().to_vec()));
        self
    }

    /// 识别单个词 token，返回交给引擎的词
    ///
    /// ASCII 词只看多模式匹配结果；非 ASCII 写法（全角等）匹配器认不出，折叠后查词表。
    fn recognize(&self, token: &Token, exact: &HashMap<usize, (usize, usize)>) -> Option<String> {
        let folded = if token.text.is_ascii() {
            match exact.get(&token.start) {
                Some(&(end, pattern)) if end == token.end => {
                    return self.vocabulary.words().get(pattern).cloned();
                }
                _ => token.text.to_ascii_lowercase(),
            }
        } else {
            let folded = fold_word(&token.text);
            if self.vocabulary.contains(&folded) {
                return Some(folded);
            }
            folded
        };

        let corrected = self.fuzzy.as_ref()?.correct(&folded)?;
        tracing::debug!("拼写纠错: {} -> {}", token.text, corrected);
        Some(corrected)
    }

    /// 非数字 token 是否打断正在累积的短语（换行、非连字符的符号、其他词）
    fn breaks_phrase(&self, token: &Token) -> bool {
        match token.token_type {
            TokenType::Whitespace => token.text.contains('\n'),
            TokenType::Symbol => !self.vocabulary.is_joiner(&token.text),
            TokenType::Word | TokenType::Digits => true,
        }
    }
}

/// 正在累积的短语
struct PendingPhrase {
    start: usize,
    end: usize,
    words: Vec<String>,
}

impl PendingPhrase {
    fn finish(self, text: &str) -> LocatedPhrase {
        LocatedPhrase {
            text: text[self.start..self.end].to_string(),
            start: self.start,
            end: self.end,
            words: self.words,
            category: PhraseCategory::Num,
        }
    }
}

impl PhraseLocator for PatternLocator {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn locate(&self, text: &str) -> NormalizeResult<Vec<LocatedPhrase>> {
        // 词表词在原文中的命中：起始偏移 → (结束偏移, 词表下标)
        let exact: HashMap<usize, (usize, usize)> = self
            .matcher
            .find_iter(text)
            .map(|m| (m.start(), (m.end(), m.pattern().as_usize())))
            .collect();

        let mut phrases = Vec::new();
        let mut pending: Option<PendingPhrase> = None;

        for token in Tokenizer::tokenize(text) {
            let recognized = if token.is_word() {
                self.recognize(&token, &exact)
            } else {
                None
            };

            match (recognized, pending.as_mut()) {
                (Some(word), Some(p)) => {
                    p.end = token.end;
                    p.words.push(word);
                }
                (Some(word), None) => {
                    pending = Some(PendingPhrase {
                        start: token.start,
                        end: token.end,
                        words: vec![word],
                    });
                }
                (None, _) => {
                    if self.breaks_phrase(&token) {
                        if let Some(p) = pending.take() {
                            phrases.push(p.finish(text));
                        }
                    }
                }
            }
        }

        if let Some(p) = pending.take() {
            phrases.push(p.finish(text));
        }

        tracing::debug!("定位到 {} 个数字短语", phrases.len());
        Ok(phrases)
    }
}
