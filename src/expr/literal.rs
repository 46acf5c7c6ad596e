use crate::errors::CypherBuildError;
use crate::scope::Environment;
use crate::tree::ToCypher;
use crate::utils::escape_string_literal;

/// A literal value embedded directly in the query text.
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Null,
}

impl ToCypher for Literal {
    fn to_cypher(&self, _env: &mut Environment) -> Result<String, CypherBuildError> {
        let text = match self {
            Literal::Integer(i) => i.to_string(),
            Literal::Float(f) => f.to_string(),
            Literal::Boolean(b) => b.to_string(),
            Literal::String(s) => escape_string_literal(s),
            Literal::Null => "NULL".to_string(),
        };
        Ok(text)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Integer(value as i64)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(lit: Literal) -> String {
        let mut env = Environment::new(None);
        lit.to_cypher(&mut env).unwrap()
    }

    #[test]
    fn test_string_literals_are_double_quoted() {
        assert_eq!(render(Literal::from("The Matrix")), "\"The Matrix\"");
    }

    #[test]
    fn test_null_renders_upper_case() {
        assert_eq!(render(Literal::Null), "NULL");
    }

    #[test]
    fn test_numbers_and_booleans() {
        assert_eq!(render(Literal::from(42)), "42");
        assert_eq!(render(Literal::from(2.5)), "2.5");
        assert_eq!(render(Literal::from(true)), "true");
    }
}
