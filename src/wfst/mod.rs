//! WFST（加权有限状态转换器）框架
//!
//! ## 处理流程
//! 1. 按量级构建转换器（个位、十位、百、千……），登记到注册表
//! 2. 分块：把数字词序列切成量级组
//! 3. 组合：块内逐词组合，块间首尾串接成一条线性链
//! 4. 解码：逐状态取权重最小的弧，得到数字串

pub mod compose;
pub mod decoder;
pub mod magnitude;
pub mod registry;
pub mod segmenter;
pub mod transducer;

pub use compose::{compose, compose_alt, compose_chunk, compose_phrase};
pub use decoder::{Decoded, Decoder};
pub use magnitude::Magnitude;
pub use registry::{english_registry, CategoryRegistry, CompositeRegistry};
pub use segmenter::Segmenter;
pub use transducer::{Arc, StateId, StateRecord, Symbol, Transducer, Weight};
