//! Confidence-tiered response strategy and prompt assembly.
//!
//! The tier is decided by the best similarity score among the retrieved
//! documents. High confidence answers primarily from the documents,
//! medium confidence blends one document with general expertise, low
//! confidence (or no documents) answers from general expertise alone.

use crate::types::ScoredDocument;

const HIGH_CONFIDENCE: f64 = 0.6;
const MEDIUM_CONFIDENCE: f64 = 0.3;
const HIGH_CONTEXT_DOCS: usize = 2;
const HIGH_CONTEXT_CHARS: usize = 300;
const HYBRID_CONTEXT_CHARS: usize = 200;

/// How much retrieved context the generated answer should lean on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStrategy {
    /// High confidence: answer primarily from the provided documents.
    DocumentBased,
    /// Medium confidence: combine one document with general expertise.
    Hybrid,
    /// Low confidence or no documents: answer from general expertise.
    General,
}

/// A selected strategy with its prompt ingredients.
#[derive(Debug, Clone)]
pub struct StrategyPlan {
    pub strategy: AnswerStrategy,
    pub context_section: String,
    pub guidance: String,
}

/// Pick a strategy from the best score among `documents`.
pub fn select_strategy(documents: &[ScoredDocument]) -> StrategyPlan {
    if documents.is_empty() {
        return StrategyPlan {
            strategy: AnswerStrategy::General,
            context_section: "知识库中没有找到相关文档。".to_string(),
            guidance: "请基于您的专业知识回答这个问题。".to_string(),
        };
    }

    let max_score = documents.iter().map(|d| d.score).fold(f64::MIN, f64::max);

    if max_score > HIGH_CONFIDENCE {
        let excerpts: Vec<String> = documents
            .iter()
            .take(HIGH_CONTEXT_DOCS)
            .map(|d| format!("- {}...", truncate_chars(&d.content, HIGH_CONTEXT_CHARS)))
            .collect();
        StrategyPlan {
            strategy: AnswerStrategy::DocumentBased,
            context_section: format!("基于以下相关文档内容：\n{}", excerpts.join("\n")),
            guidance: "请主要基于提供的文档内容给出专业回答。".to_string(),
        }
    } else if max_score > MEDIUM_CONFIDENCE {
        let excerpt = truncate_chars(&documents[0].content, HYBRID_CONTEXT_CHARS);
        StrategyPlan {
            strategy: AnswerStrategy::Hybrid,
            context_section: format!("以下文档可能与问题相关：\n- {}...", excerpt),
            guidance: "请结合文档内容和您的专业知识回答。".to_string(),
        }
    } else {
        StrategyPlan {
            strategy: AnswerStrategy::General,
            context_section: "知识库中没有找到高度相关的文档。".to_string(),
            guidance: "请基于您的专业知识回答这个问题。".to_string(),
        }
    }
}

/// Assemble the full prompt: persona preamble, context, verbatim
/// question, guidance.
pub fn build_prompt(question: &str, plan: &StrategyPlan) -> String {
    format!(
        "你是一个专业的火灾预防安全专家。\n\n{}\n\n用户问题：{}\n\n{}\n\n请给出专业、简洁的回答，使用中文：\n",
        plan.context_section, question, plan.guidance
    )
}

/// Char-boundary prefix; content is Chinese text, so byte slicing would panic.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
