//! Fixed Korean prompt for grounded answer synthesis.

use docsearch_core::types::RetrievedChunk;

/// Returned verbatim when a question arrives before any index exists.
pub const NOT_INDEXED_MESSAGE: &str = "문서가 인덱싱되지 않았습니다. 먼저 문서를 로드해주세요.";

const TEMPLATE: &str = "당신은 사내 규정 전문가입니다.

[중요] 질문에서 특정 장/조 번호를 요청했는데 문서에 없다면:
\"제공된 문서에 제X장(제X조)에 대한 내용이 없습니다.\"라고 답변하세요.

[문서 내용]
{context}

[질문]
{question}

[답변 규칙]
1. 요청한 장/조 번호가 문서에 정확히 있는지 확인
2. 없으면 \"문서에 없습니다\" 명확히 답변
3. 있으면 번호와 제목을 먼저 명시하고 내용 요약
4. 절대 다른 조문으로 대체하지 말 것

답변:";

/// Stuff the retrieved passages and the question into the template.
/// Passages are concatenated in merge order, separated by blank lines.
pub fn build_prompt(passages: &[RetrievedChunk], question: &str) -> String {
    let context = passages
        .iter()
        .map(|p| p.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    TEMPLATE
        .replace("{context}", &context)
        .replace("{question}", question)
}
