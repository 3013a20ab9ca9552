//! 类别注册表与组合注册表
//!
//! 启动时构建一次，之后只读。共享的英文注册表通过 `lazy_static` 初始化，
//! 首次访问即完成全部构建，之后可在多个调用方之间无锁共享。

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{NormalizeError, NormalizeResult};
use crate::wfst::magnitude::Magnitude;
use crate::wfst::transducer::Transducer;

lazy_static::lazy_static! {
    static ref ENGLISH_REGISTRY: Arc<CompositeRegistry> = Arc::new(CompositeRegistry::english());
}

/// 共享的英文数量级注册表
pub fn english_registry() -> Arc<CompositeRegistry> {
    Arc::clone(&ENGLISH_REGISTRY)
}

/// 词 → 类别名
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    categories: HashMap<String, String>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册词的类别
    ///
    /// 已存在时不覆盖（先注册者胜出）。返回是否新插入。
    pub fn register(&mut self, word: &str, category: &str) -> bool {
        if let Some(existing) = self.categories.get(word) {
            if existing != category {
                tracing::warn!(
                    "词 '{}' 已属于类别 '{}'，忽略来自 '{}' 的重复注册",
                    word,
                    existing,
                    category
                );
            }
            return false;
        }
        self.categories.insert(word.to_string(), category.to_string());
        true
    }

    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.categories.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// 类别名 → 转换器，附带词类别表
#[derive(Debug, Clone, Default)]
pub struct CompositeRegistry {
    categories: CategoryRegistry,
    transducers: HashMap<String, Transducer>,
}

impl CompositeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册全部英文数量级
    pub fn english() -> Self {
        let mut registry = Self::new();
        for magnitude in Magnitude::ALL {
            registry.add_transducer(magnitude.build());
        }
        tracing::debug!(
            "英文注册表就绪: {} 个转换器, {} 个词",
            registry.transducers.len(),
            registry.categories.len()
        );
        registry
    }

    /// 添加转换器，并把它识别的每个词登记到类别表
    pub fn add_transducer(&mut self, transducer: Transducer) {
        let category = transducer.category().to_string();
        for word in transducer.words() {
            self.categories.register(word, &category);
        }
        self.transducers.insert(category, transducer);
    }

    pub fn category_of(&self, word: &str) -> Option<&str> {
        self.categories.lookup(word)
    }

    pub fn get(&self, category: &str) -> Option<&Transducer> {
        self.transducers.get(category)
    }

    /// 词 → 管辖它的转换器
    pub fn transducer_for(&self, word: &str) -> NormalizeResult<&Transducer> {
        let category = self
            .category_of(word)
            .ok_or_else(|| NormalizeError::UnrecognizedWord {
                word: word.to_string(),
            })?;
        self.get(category).ok_or_else(|| NormalizeError::UnknownCategory {
            category: category.to_string(),
        })
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_writer_wins() {
        let mut reg = CategoryRegistry::new();
        assert!(reg.register("ten", "tens"));
        assert!(!reg.register("ten", "units"));
        assert!(!reg.register("ten", "tens"));
        assert_eq!(reg.lookup("ten"), Some("tens"));
        assert_eq!(reg.lookup("eleven"), None);
    }

    #[test]
    fn test_english_vocabulary() {
        let reg = CompositeRegistry::english();
        assert_eq!(reg.category_of("five"), Some("units"));
        assert_eq!(reg.category_of("ninety"), Some("tens"));
        assert_eq!(reg.category_of("hundred"), Some("hundreds"));
        assert_eq!(reg.category_of("trillion"), Some("trillions"));
        // 9 + 9 + 5 个量级词
        assert_eq!(reg.categories().len(), 23);
        assert_eq!(reg.category_of("lakh"), None);
    }

    #[test]
    fn test_transducer_for_unknown_word() {
        let reg = english_registry();
        assert_eq!(reg.transducer_for("thousand").map(|t| t.num_states()), Ok(4));
        assert_eq!(
            reg.transducer_for("zillion").map(|t| t.num_states()),
            Err(NormalizeError::UnrecognizedWord {
                word: "zillion".to_string()
            })
        );
    }

    #[test]
    fn test_missing_transducer_is_reported() {
        let mut reg = CompositeRegistry::new();
        reg.categories.register("dozen", "dozens");
        assert_eq!(
            reg.transducer_for("dozen").map(|t| t.num_states()),
            Err(NormalizeError::UnknownCategory {
                category: "dozens".to_string()
            })
        );
    }
}
