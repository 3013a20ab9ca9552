//! 最优路径解码
//!
//! 按状态升序逐个访问非终止状态，在该状态的全部出弧中取权重最小者（相同权重取
//! 最先插入者），拼接输出并累加权重。这是逐状态的贪心局部最优，不回溯。
//!
//! 只有在自动机是线性链（每条弧都从 `i` 指向 `i + 1`）时，局部最优才等于全局最短路径。
//! 组合引擎只产生线性链；遇到非线性自动机时解码器直接报错，而不是给出错误结果。

use serde::{Deserialize, Serialize};

use crate::error::{NormalizeError, NormalizeResult};
use crate::wfst::transducer::{Arc, StateId, Transducer, Weight};

/// 解码结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoded {
    /// 最后到达的状态
    pub state: StateId,
    /// 输出数字串
    pub output: String,
    /// 累计权重
    pub weight: Weight,
}

pub struct Decoder;

impl Decoder {
    pub fn decode(transducer: &Transducer) -> NormalizeResult<Decoded> {
        Self::check_linear(transducer)?;

        let mut decoded: Option<Decoded> = None;
        let mut output = String::new();
        let mut weight: Weight = 0.0;

        // 线性链：从起始状态逐个向后
        for (state, record) in transducer.states().iter().enumerate().skip(transducer.start()) {
            if transducer.is_final(state) {
                continue;
            }
            let Some(best) = Self::best_arc(record.iter().map(|(_, arc)| arc)) else {
                continue;
            };
            output.push_str(&best.output);
            weight += best.weight;
            decoded = Some(Decoded {
                state: best.to,
                output: output.clone(),
                weight,
            });
        }

        decoded.ok_or(NormalizeError::EmptyComposition)
    }

    /// 权重最小的弧；相同权重时保留先出现者
    fn best_arc<'a>(arcs: impl Iterator<Item = &'a Arc>) -> Option<&'a Arc> {
        let mut best: Option<&Arc> = None;
        for arc in arcs {
            match best {
                Some(b) if arc.weight >= b.weight => {}
                _ => best = Some(arc),
            }
        }
        best
    }

    fn check_linear(transducer: &Transducer) -> NormalizeResult<()> {
        match transducer
            .transitions()
            .find(|(from, _, arc)| arc.to != from + 1)
        {
            Some((state, _, _)) => Err(NormalizeError::NonLinearAutomaton { state }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wfst::compose::compose_alt;
    use crate::wfst::magnitude::Magnitude;
    use crate::wfst::transducer::Symbol;

    #[test]
    fn test_prefers_lowest_weight() {
        let mut t = Transducer::new("t");
        t.add_epsilon_transition(0, 1, "0", 0.1);
        t.add_word_transition(0, 1, "two", "2", 0.0);
        t.add_final_state(1);

        let d = Decoder::decode(&t).unwrap();
        assert_eq!(d.output, "2");
        assert_eq!(d.weight, 0.0);
        assert_eq!(d.state, 1);
    }

    #[test]
    fn test_tie_keeps_first_inserted() {
        let mut t = Transducer::new("t");
        t.add_word_transition(0, 1, "a", "x", 0.5);
        t.add_word_transition(0, 1, "b", "y", 0.5);
        t.add_final_state(1);

        for _ in 0..10 {
            assert_eq!(Decoder::decode(&t).unwrap().output, "x");
        }
    }

    #[test]
    fn test_accumulates_fill_weights() {
        let seed = crate::wfst::compose::compose(
            &Transducer::unit(""),
            &Magnitude::Hundreds.build(),
            "hundred",
        );
        let d = Decoder::decode(&seed).unwrap();
        assert_eq!(d.output, "00");
        assert!((d.weight - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_starts_from_start_state() {
        let mut t = Transducer::new("t");
        t.add_word_transition(0, 1, "one", "1", 0.0);
        t.add_word_transition(1, 2, "two", "2", 0.0);
        t.add_final_state(2);
        t.set_start_state(1);

        let d = Decoder::decode(&t).unwrap();
        assert_eq!(d.output, "2");
        assert_eq!(d.state, 2);
    }

    #[test]
    fn test_rejects_non_linear() {
        let mut t = Transducer::new("t");
        t.add_transition(0, 2, Symbol::word("skip"), "9", 0.0);
        t.add_final_state(2);
        assert_eq!(
            Decoder::decode(&t),
            Err(NormalizeError::NonLinearAutomaton { state: 0 })
        );
    }

    #[test]
    fn test_empty_automaton() {
        let t = compose_alt(&Transducer::unit(""), &Transducer::unit(""));
        assert_eq!(Decoder::decode(&t), Err(NormalizeError::EmptyComposition));
    }
}
