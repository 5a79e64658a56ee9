//! Deterministic rule-based answer generation.
//!
//! Used whenever the language-model path is unconfigured or fails. The
//! table is matched in order against the question; answers from this path
//! are cheap to recompute and are deliberately never cached.

use super::strategy::truncate_chars;
use crate::types::ScoredDocument;

const DOC_SUMMARY_CHARS: usize = 200;

/// Ordered topic table; first match wins.
const TOPIC_ANSWERS: &[(&[&str], &str)] = &[
    (
        &["灭火器"],
        "灭火器应放置在易于取用的位置，定期检查压力表，确保在有效期内使用。",
    ),
    (
        &["逃生", "疏散"],
        "火灾逃生时应保持冷静，用湿毛巾捂住口鼻，低姿前进，按照疏散指示标志撤离。",
    ),
    (
        &["预防"],
        "火灾预防包括定期检查电器线路、不乱扔烟头、不堵塞消防通道、配备灭火器材等措施。",
    ),
    (
        &["报警"],
        "发现火灾应立即拨打119报警，说明详细地址、火势情况和人员被困情况。",
    ),
];

const GENERIC_ANSWER: &str = "建议您关注火灾预防的基本知识，包括电器安全、用火管理等。";

/// Produce a canned answer for `question`, backed by `documents` when no
/// topic keyword matches.
pub fn rule_based_answer(question: &str, documents: &[ScoredDocument]) -> String {
    for (keywords, answer) in TOPIC_ANSWERS {
        if keywords.iter().any(|kw| question.contains(kw)) {
            return (*answer).to_string();
        }
    }
    match documents.first() {
        Some(doc) => format!(
            "根据相关文档：{}...",
            truncate_chars(&doc.content, DOC_SUMMARY_CHARS)
        ),
        None => GENERIC_ANSWER.to_string(),
    }
}

/// Recover the question from an assembled prompt and answer it. Used when
/// the model path fails after prompt assembly and only the prompt is at
/// hand.
pub fn rule_based_answer_from_prompt(prompt: &str) -> String {
    let question = prompt
        .split("用户问题：")
        .nth(1)
        .and_then(|rest| rest.lines().next())
        .map(str::trim)
        .unwrap_or("");
    rule_based_answer(question, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extinguisher_keyword_matches() {
        let answer = rule_based_answer("如何使用灭火器？", &[]);
        assert_eq!(
            answer,
            "灭火器应放置在易于取用的位置，定期检查压力表，确保在有效期内使用。"
        );
    }

    #[test]
    fn test_escape_and_evacuation_share_an_answer() {
        let escape = rule_based_answer("着火了怎么逃生？", &[]);
        let evacuate = rule_based_answer("如何组织疏散？", &[]);
        assert_eq!(escape, evacuate);
        assert!(escape.contains("湿毛巾"));
    }

    #[test]
    fn test_keyword_wins_even_with_documents_present() {
        let docs = vec![ScoredDocument::new("不相关的文档内容", 0.9)];
        let answer = rule_based_answer("发现火情如何报警？", &docs);
        assert!(answer.contains("119"));
    }

    #[test]
    fn test_no_match_with_document_summarizes_it() {
        let docs = vec![ScoredDocument::new("消防通道必须保持畅通。", 0.4)];
        let answer = rule_based_answer("仓库管理要注意什么？", &docs);
        assert_eq!(answer, "根据相关文档：消防通道必须保持畅通。...");
    }

    #[test]
    fn test_no_match_without_documents_is_generic() {
        let answer = rule_based_answer("天气如何？", &[]);
        assert_eq!(answer, GENERIC_ANSWER);
    }

    #[test]
    fn test_question_is_recovered_from_a_prompt() {
        let prompt = "你是一个专业的火灾预防安全专家。\n\n知识库中没有找到相关文档。\n\n用户问题：如何使用灭火器？\n\n请基于您的专业知识回答这个问题。\n";
        let answer = rule_based_answer_from_prompt(prompt);
        assert!(answer.contains("灭火器"));
        assert!(answer.contains("压力表"));
    }

    #[test]
    fn test_prompt_without_question_marker_is_generic() {
        assert_eq!(rule_based_answer_from_prompt("malformed"), GENERIC_ANSWER);
    }
}
