//! 短语分块
//!
//! 从右往左扫描词序列，记录当前块最右侧词所属转换器的状态数。当前词的转换器
//! 不小于该值且缓冲区非空时，开启新块。转换器越大表示量级越高，向左扫描时遇到
//! 同级或更高量级即为新的量级组，例如 "two hundred fifty" → [two hundred] [fifty]。
//!
//! 这是启发式规则，不保证对所有量级顺序都正确（如 "hundred two"）。

use crate::error::NormalizeResult;
use crate::wfst::registry::CompositeRegistry;

pub struct Segmenter<'a> {
    registry: &'a CompositeRegistry,
}

impl<'a> Segmenter<'a> {
    pub fn new(registry: &'a CompositeRegistry) -> Self {
        Self { registry }
    }

    /// 分块，块内与块间都保持原始顺序
    ///
    /// 任何一个词未注册即返回 `UnrecognizedWord`。
    pub fn segment(&self, words: &[String]) -> NormalizeResult<Vec<Vec<String>>> {
        let mut chunks: Vec<Vec<String>> = Vec::new();
        let mut buffer: Vec<String> = Vec::new();
        let mut run_size = 0;

        for word in words.iter().rev() {
            let size = self.registry.transducer_for(word)?.num_states();

            if !buffer.is_empty() && size >= run_size {
                chunks.push(std::mem::take(&mut buffer));
                run_size = size;
            } else if buffer.is_empty() {
                run_size = size;
            }
            buffer.push(word.clone());
        }

        if !buffer.is_empty() {
            chunks.push(buffer);
        }

        // 扫描是倒序的，翻转回原始顺序
        for chunk in chunks.iter_mut() {
            chunk.reverse();
        }
        chunks.reverse();
        Ok(chunks)
    }
}
