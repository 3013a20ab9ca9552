//! 加权有限状态转换器（WFST）
//!
//! 状态以数组（arena）形式存储：状态 ID 就是下标，始终稠密且从 0 开始连续。
//! 组合与解码都依赖这一点按构造顺序遍历状态。

use std::collections::BTreeSet;
use std::fmt;

/// 状态 ID（在所属自动机内的下标）
pub type StateId = usize;

/// 权重：非负代价，越小越优先
pub type Weight = f32;

/// 输入符号
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// 空输入（不消耗任何词，用于自动补零）
    Epsilon,
    /// 字面词
    Word(String),
}

impl Symbol {
    pub fn word(word: impl Into<String>) -> Self {
        Symbol::Word(word.into())
    }

    pub fn as_word(&self) -> Option<&str> {
        match self {
            Symbol::Word(w) => Some(w.as_str()),
            Symbol::Epsilon => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::Word(w) => write!(f, "{}", w),
        }
    }
}

/// 转移弧：(目标状态, 输出符号, 权重)
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub to: StateId,
    pub output: String,
    pub weight: Weight,
}

/// 单个状态的出边
///
/// 按输入符号分组，组与组内的弧都保持插入顺序。
/// 同一输入符号允许多条弧（歧义留给解码器按权重裁决）。
#[derive(Debug, Clone, Default)]
pub struct StateRecord {
    arcs: Vec<(Symbol, Vec<Arc>)>,
}

impl StateRecord {
    /// 指定输入符号下的全部弧
    pub fn arcs_for(&self, symbol: &Symbol) -> Option<&[Arc]> {
        self.arcs
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, arcs)| arcs.as_slice())
    }

    fn push(&mut self, symbol: Symbol, arc: Arc) {
        match self.arcs.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, arcs)) => arcs.push(arc),
            None => self.arcs.push((symbol, vec![arc])),
        }
    }

    /// 按插入顺序遍历所有 (输入符号, 弧)
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Arc)> {
        self.arcs
            .iter()
            .flat_map(|(symbol, arcs)| arcs.iter().map(move |arc| (symbol, arc)))
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

/// 加权有限状态转换器
///
/// 每个实例独占自己的状态与转移；组合总是生成新实例。
#[derive(Debug, Clone)]
pub struct Transducer {
    category: String,
    states: Vec<StateRecord>,
    start: StateId,
    finals: BTreeSet<StateId>,
}

impl Transducer {
    /// 创建只有起始状态 0 的转换器
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            states: vec![StateRecord::default()],
            start: 0,
            finals: BTreeSet::new(),
        }
    }

    /// 单状态、起始即终止的空转换器（组合的单位元）
    pub fn unit(category: impl Into<String>) -> Self {
        let mut t = Self::new(category);
        t.add_final_state(0);
        t
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn set_start_state(&mut self, state: StateId) {
        self.ensure_state(state);
        self.start = state;
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// 最大状态下标
    pub fn last_state(&self) -> StateId {
        self.states.len() - 1
    }

    pub fn states(&self) -> &[StateRecord] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&StateRecord> {
        self.states.get(id)
    }

    pub fn finals(&self) -> &BTreeSet<StateId> {
        &self.finals
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    pub fn add_final_state(&mut self, state: StateId) {
        self.ensure_state(state);
        self.finals.insert(state);
    }

    /// 添加转移 (from, input) → (to, output, weight)
    ///
    /// 缺失的状态会按下标补齐，保证 ID 稠密。
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        input: Symbol,
        output: impl Into<String>,
        weight: Weight,
    ) {
        self.ensure_state(from.max(to));
        self.states[from].push(
            input,
            Arc {
                to,
                output: output.into(),
                weight,
            },
        );
    }

    pub fn add_word_transition(
        &mut self,
        from: StateId,
        to: StateId,
        word: &str,
        output: impl Into<String>,
        weight: Weight,
    ) {
        self.add_transition(from, to, Symbol::word(word), output, weight);
    }

    pub fn add_epsilon_transition(
        &mut self,
        from: StateId,
        to: StateId,
        output: impl Into<String>,
        weight: Weight,
    ) {
        self.add_transition(from, to, Symbol::Epsilon, output, weight);
    }

    /// 按状态顺序遍历所有转移 (from, input, arc)
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, &Symbol, &Arc)> {
        self.states
            .iter()
            .enumerate()
            .flat_map(|(id, record)| record.iter().map(move |(symbol, arc)| (id, symbol, arc)))
    }

    /// 该转换器识别的所有字面词（去重，保持首次出现顺序）
    pub fn words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = Vec::new();
        for (_, symbol, _) in self.transitions() {
            if let Some(w) = symbol.as_word() {
                if !words.contains(&w) {
                    words.push(w);
                }
            }
        }
        words
    }

    fn ensure_state(&mut self, state: StateId) {
        while self.states.len() <= state {
            self.states.push(StateRecord::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_stay_dense() {
        let mut t = Transducer::new("tens");
        t.add_word_transition(0, 1, "twenty", "2", 0.0);
        t.add_epsilon_transition(1, 2, "0", 0.1);
        t.add_final_state(2);

        assert_eq!(t.num_states(), 3);
        assert_eq!(t.last_state(), 2);
        assert!(t.is_final(2));
        assert!(t.state(2).map(StateRecord::is_empty).unwrap_or(false));
    }

    #[test]
    fn test_far_state_fills_gap() {
        let mut t = Transducer::new("x");
        t.add_final_state(4);
        assert_eq!(t.num_states(), 5);
    }

    #[test]
    fn test_ambiguity_is_kept_in_insertion_order() {
        let mut t = Transducer::new("units");
        t.add_word_transition(0, 1, "one", "1", 0.0);
        t.add_epsilon_transition(0, 1, "0", 0.1);
        t.add_word_transition(0, 1, "one", "I", 0.0);

        let outputs: Vec<&str> = t.states()[0].iter().map(|(_, a)| a.output.as_str()).collect();
        assert_eq!(outputs, vec!["1", "I", "0"]);
        assert_eq!(t.states()[0].arcs_for(&Symbol::word("one")).map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_words_dedup() {
        let mut t = Transducer::new("units");
        t.add_word_transition(0, 1, "two", "2", 0.0);
        t.add_word_transition(0, 1, "one", "1", 0.0);
        t.add_word_transition(0, 1, "two", "2", 0.5);
        t.add_epsilon_transition(1, 2, "0", 0.1);
        assert_eq!(t.words(), vec!["two", "one"]);
    }

    #[test]
    fn test_unit_is_single_final_state() {
        let t = Transducer::unit("phrase");
        assert_eq!(t.num_states(), 1);
        assert!(t.is_final(0));
    }
}
