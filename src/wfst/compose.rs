//! 组合引擎
//!
//! 把若干转换器串接成一条线性链：第 `i` 个状态只有指向 `i + 1` 的弧。
//!
//! 右侧的对齐规则：
//! - 右侧状态数不少于左侧时，从左侧最后一个状态开始向后追加；
//! - 右侧状态数更少时，右侧的终止态与左侧的终止态对齐，右侧的弧叠加到左侧
//!   末尾的补零状态上。叠加后同一状态可能同时有字面数字（权重 0）和补零（正权重），
//!   由解码器按权重挑选。
//!
//! 组合从不消除歧义：同一状态、同一输入的多条候选弧全部保留。

use crate::error::{NormalizeError, NormalizeResult};
use crate::wfst::registry::CompositeRegistry;
use crate::wfst::transducer::{Arc, StateId, StateRecord, Symbol, Transducer};

/// 单词组合：用一个输入词驱动右侧转换器，接到左侧之后
///
/// 右侧每个非终止状态取与 `word` 匹配的弧，没有则取空输入弧。
pub fn compose(left: &Transducer, right: &Transducer, word: &str) -> Transducer {
    let symbol = Symbol::word(word);
    compose_with(left, right, |record| {
        if let Some(arcs) = record.arcs_for(&symbol) {
            return arcs.iter().map(|a| (symbol.clone(), a)).collect();
        }
        record
            .arcs_for(&Symbol::Epsilon)
            .map(|arcs| arcs.iter().map(|a| (Symbol::Epsilon, a)).collect())
            .unwrap_or_default()
    })
}

/// 自动机串接：把右侧（已组合好的块）的全部弧接到左侧之后
pub fn compose_alt(left: &Transducer, right: &Transducer) -> Transducer {
    compose_with(left, right, |record| {
        record.iter().map(|(s, a)| (s.clone(), a)).collect()
    })
}

/// 把一个块内的词逐个组合成一个转换器
pub fn compose_chunk(registry: &CompositeRegistry, words: &[String]) -> NormalizeResult<Transducer> {
    if words.is_empty() {
        return Err(NormalizeError::EmptyComposition);
    }

    let mut composed = Transducer::unit("");
    for word in words {
        let transducer = registry.transducer_for(word)?;
        composed = compose(&composed, transducer, word);
    }
    Ok(composed)
}

/// 组合整个短语：先逐块组合，再把各块依次串接
pub fn compose_phrase(
    registry: &CompositeRegistry,
    chunks: &[Vec<String>],
) -> NormalizeResult<Transducer> {
    let (first, rest) = chunks.split_first().ok_or(NormalizeError::EmptyComposition)?;

    let mut phrase = compose_chunk(registry, first)?;
    for chunk in rest {
        let next = compose_chunk(registry, chunk)?;
        phrase = compose_alt(&phrase, &next);
    }

    tracing::debug!(
        "短语自动机: category={}, states={}",
        phrase.category(),
        phrase.num_states()
    );
    Ok(phrase)
}

/// 右侧的起始偏移
fn right_offset(left: &Transducer, right: &Transducer) -> StateId {
    if left.num_states() > right.num_states() {
        left.num_states() - right.num_states()
    } else {
        left.last_state()
    }
}

fn compose_with<'a, F>(left: &Transducer, right: &'a Transducer, select: F) -> Transducer
where
    F: Fn(&'a StateRecord) -> Vec<(Symbol, &'a Arc)>,
{
    let category = if left.category().is_empty() {
        right.category().to_string()
    } else {
        format!("{}+{}", left.category(), right.category())
    };
    let mut result = Transducer::new(category);
    result.set_start_state(0);

    // 1. 左侧非终止状态的弧原样复制
    for (from, symbol, arc) in left.transitions() {
        if !left.is_final(from) {
            result.add_transition(from, from + 1, symbol.clone(), arc.output.clone(), arc.weight);
        }
    }

    // 2. 右侧从偏移处逐状态追加
    let start = right_offset(left, right);
    for (offset, record) in right.states().iter().enumerate() {
        if right.is_final(offset) {
            continue;
        }
        let selected = select(record);
        if selected.is_empty() {
            tracing::debug!(
                "转换器 {} 的状态 {} 没有可用的弧",
                right.category(),
                offset
            );
        }
        let from = start + offset;
        for (symbol, arc) in selected {
            result.add_transition(from, from + 1, symbol, arc.output.clone(), arc.weight);
        }
    }

    // 3. 最后一个位置为终止态
    result.add_final_state(start + right.num_states() - 1);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wfst::magnitude::{Magnitude, FILL_WEIGHT};

    fn outputs_at(t: &Transducer, state: StateId) -> Vec<(String, f32)> {
        t.states()[state]
            .iter()
            .map(|(_, a)| (a.output.clone(), a.weight))
            .collect()
    }

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_seed_threads_single_word() {
        let tens = Magnitude::Tens.build();
        let t = compose(&Transducer::unit(""), &tens, "sixty");

        assert_eq!(t.category(), "tens");
        assert_eq!(t.num_states(), 3);
        assert_eq!(outputs_at(&t, 0), vec![("6".to_string(), 0.0)]);
        assert_eq!(outputs_at(&t, 1), vec![("0".to_string(), FILL_WEIGHT)]);
        assert!(t.is_final(2));
    }

    #[test]
    fn test_compose_appends_larger_right_side() {
        let reg = CompositeRegistry::english();
        let t = compose_chunk(&reg, &words(&["two", "hundred"])).unwrap();

        assert_eq!(t.num_states(), 4);
        assert_eq!(outputs_at(&t, 0)[0].0, "2");
        assert_eq!(outputs_at(&t, 1), vec![("0".to_string(), FILL_WEIGHT)]);
        assert_eq!(outputs_at(&t, 2), vec![("0".to_string(), FILL_WEIGHT)]);
        assert!(t.is_final(3));
    }

    #[test]
    fn test_compose_overlays_smaller_right_side() {
        let reg = CompositeRegistry::english();
        let t = compose_chunk(&reg, &words(&["twenty", "two"])).unwrap();

        // "two" 叠加到 "twenty" 的补零状态上
        assert_eq!(t.num_states(), 3);
        assert_eq!(
            outputs_at(&t, 1),
            vec![("0".to_string(), FILL_WEIGHT), ("2".to_string(), 0.0)]
        );
        assert!(t.is_final(2));
    }

    #[test]
    fn test_compose_alt_right_aligns_chunks() {
        let reg = CompositeRegistry::english();
        let left = compose_chunk(&reg, &words(&["two", "hundred"])).unwrap();
        let right = compose_chunk(&reg, &words(&["fifty"])).unwrap();
        let t = compose_alt(&left, &right);

        assert_eq!(t.num_states(), 4);
        assert_eq!(t.finals().iter().copied().collect::<Vec<_>>(), vec![3]);
        let state1: Vec<String> = outputs_at(&t, 1).into_iter().map(|(o, _)| o).collect();
        assert_eq!(state1, vec!["0", "5"]);
    }

    #[test]
    fn test_compose_alt_copies_every_alternative() {
        let mut right = Transducer::new("r");
        right.add_word_transition(0, 1, "a", "1", 0.0);
        right.add_word_transition(0, 1, "b", "2", 0.5);
        right.add_final_state(1);

        let t = compose_alt(&Transducer::unit(""), &right);
        assert_eq!(outputs_at(&t, 0).len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        let reg = CompositeRegistry::english();
        assert_eq!(
            compose_chunk(&reg, &[]).map(|t| t.num_states()),
            Err(NormalizeError::EmptyComposition)
        );
        assert_eq!(
            compose_phrase(&reg, &[]).map(|t| t.num_states()),
            Err(NormalizeError::EmptyComposition)
        );
    }

    #[test]
    fn test_unrecognized_word_aborts_chunk() {
        let reg = CompositeRegistry::english();
        let err = compose_chunk(&reg, &words(&["two", "zillion"])).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::UnrecognizedWord {
                word: "zillion".to_string()
            }
        );
    }
}
