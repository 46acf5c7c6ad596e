use thiserror::Error;

/// Errors raised by invalid fluent construction sequences or detected while
/// rendering a statement tree. These are programmer-usage errors: the
/// partially built node should be discarded and rebuilt.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CypherBuildError {
    #[error("label check requires at least one label")]
    EmptyLabelList,
    #[error("CASE branch {0} was opened with WHEN but never given a THEN result")]
    CaseWhenWithoutResult(usize),
    #[error("RETURN clause is empty (must project at least one column or *)")]
    EmptyReturn,
    #[error("WITH clause is empty (must carry at least one column or *)")]
    EmptyWith,
    #[error("YIELD requires at least one column")]
    EmptyYield,
    #[error("import WITH is already set for this CALL block")]
    ImportWithAlreadySet,
    #[error("UNION requires at least one sub-statement")]
    EmptyUnion,
}
