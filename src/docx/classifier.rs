//! 文本内容分类 (项目符号行、邮件地址)

use crate::utils::starts_with_bullet;

/// 内容分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClass {
    Plain,
    BulletGlyph,
    EmailLike,
}

/// 内容分类策略
pub trait ContentClassifier: Send + Sync {
    /// 按段落全文分类
    fn classify_paragraph(&self, text: &str) -> ContentClass;

    /// 按单个文本块分类
    fn classify_run(&self, text: &str) -> ContentClass;
}

/// 默认的启发式分类
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl ContentClassifier for HeuristicClassifier {
    fn classify_paragraph(&self, text: &str) -> ContentClass {
        if starts_with_bullet(text) {
            ContentClass::BulletGlyph
        } else {
            ContentClass::Plain
        }
    }

    // 粗略判断，不做完整的地址校验
    fn classify_run(&self, text: &str) -> ContentClass {
        if text.contains('@') && text.contains('.') {
            ContentClass::EmailLike
        } else {
            ContentClass::Plain
        }
    }
}
