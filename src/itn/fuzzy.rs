//! ITN 拼写纠错
//!
//! 用编辑距离把拼错的数字词（如 "fourty"、"thousnd"）纠正为词表中的词

use strsim::levenshtein;

use crate::itn::rules::is_ordinal;

/// 参与纠错的最短词长（字符数），过短的词误纠率太高（"on" → "one"）
pub const MIN_FUZZY_LEN: usize = 5;

/// 拼写纠错器
#[derive(Debug, Clone)]
pub struct FuzzyCorrector {
    /// 候选词（已小写）
    dictionary: Vec<String>,
}

impl FuzzyCorrector {
    pub fn new(dictionary: Vec<String>) -> Self {
        Self { dictionary }
    }

    /// 纠正单个词
    ///
    /// 阈值：max(1, len/4)。多个候选距离相同时视为冲突，不纠正。
    /// 序数词是合法的普通词，从不纠正。
    pub fn correct(&self, word: &str) -> Option<String> {
        let word_len = word.chars().count();
        if word_len < MIN_FUZZY_LEN || is_ordinal(word) {
            return None;
        }
        let threshold = std::cmp::max(1, word_len / 4);

        let mut best: Option<(&str, usize)> = None;
        let mut conflict = false;

        for candidate in &self.dictionary {
            let candidate_len = candidate.chars().count();
            // 长度差异过大则跳过
            if candidate_len.abs_diff(word_len) > threshold {
                continue;
            }

            let distance = levenshtein(word, candidate);
            if distance == 0 || distance > threshold {
                continue;
            }

            match best {
                Some((_, d)) if distance > d => {}
                Some((_, d)) if distance == d => conflict = true,
                _ => {
                    best = Some((candidate.as_str(), distance));
                    conflict = false;
                }
            }
        }

        if conflict {
            tracing::debug!("纠错候选冲突，跳过: {}", word);
            return None;
        }
        best.map(|(w, _)| w.to_string())
    }
}
