//! ITN 主引擎
//!
//! 短语定位 → 分块 → 组合 → 解码 → 回填原文

use std::sync::Arc;
use std::time::Instant;

use crate::config::LocatorConfig;
use crate::error::{NormalizeError, NormalizeResult};
use crate::itn::locator::{PatternLocator, PhraseLocator};
use crate::itn::rules::NumberVocabulary;
use crate::itn::types::{LocatedPhrase, NormalizationResult, Replacement, SkippedPhrase};
use crate::wfst::{compose_phrase, english_registry, CompositeRegistry, Decoded, Decoder, Segmenter};

/// 数字规范化引擎（可复用，注册表只读共享）
pub struct NumberNormalizer {
    registry: Arc<CompositeRegistry>,
    locator: Box<dyn PhraseLocator>,
}

impl NumberNormalizer {
    pub fn new(registry: Arc<CompositeRegistry>, locator: Box<dyn PhraseLocator>) -> Self {
        Self { registry, locator }
    }

    /// 英文注册表 + 内置词表定位器
    pub fn english() -> NormalizeResult<Self> {
        Ok(Self::new(english_registry(), Box::new(PatternLocator::english()?)))
    }

    /// 按配置构建词表定位器
    pub fn from_config(config: &LocatorConfig) -> NormalizeResult<Self> {
        let vocabulary = NumberVocabulary::with_extra_words(&config.extra_words);
        let mut locator = PatternLocator::new(vocabulary)?;
        if config.fuzzy_correction {
            locator = locator.with_fuzzy_correction();
        }
        Ok(Self::new(english_registry(), Box::new(locator)))
    }

    /// 规范化文本
    ///
    /// 定位器失败时整个调用失败；单个短语失败只跳过该短语。
    pub fn normalize(&self, text: &str) -> NormalizeResult<NormalizationResult> {
        let start = Instant::now();

        if text.is_empty() {
            return Ok(NormalizationResult::unchanged(String::new(), 0));
        }

        // 定位阶段没有“单个短语”可跳过，任何错误都算定位失败
        let phrases = self.locator.locate(text).map_err(|e| {
            tracing::error!("定位器 {} 失败: {}", self.locator.name(), e);
            if e.is_phrase_scoped() {
                NormalizeError::LocatorFailure(e.to_string())
            } else {
                e
            }
        })?;
        tracing::debug!("定位器 {} 找到 {} 个短语", self.locator.name(), phrases.len());

        let mut result = self.apply_phrases(text, &phrases);
        result.elapsed_us = start.elapsed().as_micros() as u64;
        Ok(result)
    }

    /// 规范化文本，只返回结果文本
    pub fn normalize_text(&self, text: &str) -> NormalizeResult<String> {
        self.normalize(text).map(|r| r.text)
    }

    /// 把已定位的短语逐个解码并回填原文
    ///
    /// 供外部定位器（如异步的 LLM 定位器）使用。不可失败：解码失败的短语原样保留，
    /// 记录在 `skipped` 中。
    pub fn apply_phrases(&self, text: &str, phrases: &[LocatedPhrase]) -> NormalizationResult {
        let start = Instant::now();

        let mut applied: Vec<Replacement> = Vec::new();
        let mut skipped: Vec<SkippedPhrase> = Vec::new();
        let mut last_end = 0;

        for phrase in phrases {
            let valid_span = phrase.start >= last_end && text.get(phrase.start..phrase.end).is_some();
            if !valid_span {
                tracing::warn!(
                    "短语位置无效或重叠，跳过: {:?} [{}..{}]",
                    phrase.text,
                    phrase.start,
                    phrase.end
                );
                skipped.push(Self::skipped(phrase, "invalid or overlapping span".to_string()));
                continue;
            }

            match self.normalize_phrase(&phrase.words) {
                Ok(decoded) => {
                    tracing::debug!(
                        "短语 {:?} -> {} (weight={})",
                        phrase.text,
                        decoded.output,
                        decoded.weight
                    );
                    applied.push(Replacement {
                        original: text[phrase.start..phrase.end].to_string(),
                        replaced: decoded.output,
                        start: phrase.start,
                        end: phrase.end,
                        weight: decoded.weight,
                    });
                    last_end = phrase.end;
                }
                Err(e) => {
                    tracing::warn!("短语 {:?} 未规范化: {}", phrase.text, e);
                    skipped.push(Self::skipped(phrase, e.to_string()));
                }
            }
        }

        // 从右往左替换，前面的偏移不受影响
        let mut output = text.to_string();
        for replacement in applied.iter().rev() {
            output.replace_range(replacement.start..replacement.end, &replacement.replaced);
        }

        NormalizationResult {
            changed: output != text,
            text: output,
            applied,
            skipped,
            elapsed_us: start.elapsed().as_micros() as u64,
        }
    }

    /// 单个短语：分块 → 组合 → 解码
    pub fn normalize_phrase(&self, words: &[String]) -> NormalizeResult<Decoded> {
        if words.is_empty() {
            return Err(NormalizeError::EmptyComposition);
        }

        let chunks = Segmenter::new(&self.registry).segment(words)?;
        tracing::debug!("分块: {:?}", chunks);

        let phrase = compose_phrase(&self.registry, &chunks)?;
        Decoder::decode(&phrase)
    }

    fn skipped(phrase: &LocatedPhrase, reason: String) -> SkippedPhrase {
        SkippedPhrase {
            text: phrase.text.clone(),
            start: phrase.start,
            end: phrase.end,
            reason,
        }
    }
}
