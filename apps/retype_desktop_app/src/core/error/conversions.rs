use super::*;

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::Terminal(err.to_string())
    }
}
