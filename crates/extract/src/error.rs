use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("Vocabulary parse error: {0}")]
    VocabularyParse(#[from] serde_json::Error),

    #[error("Pattern compile error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        let err = ExtractError::Validation("text must be a string".into());
        assert_eq!(err.to_string(), "Validation error: text must be a string");

        let err = ExtractError::Vocabulary("no pattern families".into());
        assert_eq!(err.to_string(), "Vocabulary error: no pattern families");
    }

    #[test]
    fn error_from_serde() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: ExtractError = parse.unwrap_err().into();
        assert!(matches!(err, ExtractError::VocabularyParse(_)));
    }
}
