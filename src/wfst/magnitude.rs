//! 数量级转换器
//!
//! 每个数量级（个位、十位、百、千、百万、十亿、万亿）一个固定的转换器：
//! - 词汇步：`0 → 1`，数字词输出其首位数字，权重 0
//! - 量级步：`0 → 1`，量级词输出 "0"，之后接一串空输入补零步，末状态为终止态
//!
//! 补零步带小的正权重，这样组合后同一位置上字面数字总是优先于推断出的 0。

use serde::{Deserialize, Serialize};

use crate::wfst::transducer::{Transducer, Weight};

/// 补零步 / 量级步的权重
pub const FILL_WEIGHT: Weight = 0.1;

const UNIT_WORDS: [(&str, &str); 9] = [
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
];

const TENS_WORDS: [(&str, &str); 9] = [
    ("ten", "1"),
    ("twenty", "2"),
    ("thirty", "3"),
    ("forty", "4"),
    ("fifty", "5"),
    ("sixty", "6"),
    ("seventy", "7"),
    ("eighty", "8"),
    ("ninety", "9"),
];

/// 数量级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Magnitude {
    Units,
    Tens,
    Hundreds,
    Thousands,
    Millions,
    Billions,
    Trillions,
}

impl Magnitude {
    pub const ALL: [Magnitude; 7] = [
        Magnitude::Units,
        Magnitude::Tens,
        Magnitude::Hundreds,
        Magnitude::Thousands,
        Magnitude::Millions,
        Magnitude::Billions,
        Magnitude::Trillions,
    ];

    /// 类别名（注册表键）
    pub fn category(&self) -> &'static str {
        match self {
            Magnitude::Units => "units",
            Magnitude::Tens => "tens",
            Magnitude::Hundreds => "hundreds",
            Magnitude::Thousands => "thousands",
            Magnitude::Millions => "millions",
            Magnitude::Billions => "billions",
            Magnitude::Trillions => "trillions",
        }
    }

    /// 量级词（个位、十位没有）
    pub fn scale_word(&self) -> Option<&'static str> {
        match self {
            Magnitude::Units | Magnitude::Tens => None,
            Magnitude::Hundreds => Some("hundred"),
            Magnitude::Thousands => Some("thousand"),
            Magnitude::Millions => Some("million"),
            Magnitude::Billions => Some("billion"),
            Magnitude::Trillions => Some("trillion"),
        }
    }

    /// 量级步之后的空输入补零步数
    pub fn fill_steps(&self) -> usize {
        match self {
            Magnitude::Units => 0,
            Magnitude::Tens => 1,
            Magnitude::Hundreds => 1,
            Magnitude::Thousands => 2,
            Magnitude::Millions => 5,
            Magnitude::Billions => 8,
            Magnitude::Trillions => 11,
        }
    }

    /// 构建该数量级的转换器
    pub fn build(&self) -> Transducer {
        let mut t = Transducer::new(self.category());
        t.set_start_state(0);

        match self.scale_word() {
            None => {
                let lexicon: &[(&str, &str)] = match self {
                    Magnitude::Units => &UNIT_WORDS,
                    _ => &TENS_WORDS,
                };
                for (word, digit) in lexicon {
                    t.add_word_transition(0, 1, word, *digit, 0.0);
                }
            }
            Some(word) => t.add_word_transition(0, 1, word, "0", FILL_WEIGHT),
        }

        let mut last = 1;
        for _ in 0..self.fill_steps() {
            t.add_epsilon_transition(last, last + 1, "0", FILL_WEIGHT);
            last += 1;
        }
        t.add_final_state(last);
        t
    }
}
