use std::fmt::{self, Display};

/// Models served by the legacy `/completions` endpoint.
#[derive(Clone)]
pub enum OpenAIModel {
    Gpt35Instruct,
    Babbage002,
    Davinci002,
}

impl Display for OpenAIModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenAIModel::Gpt35Instruct => write!(f, "gpt-3.5-turbo-instruct"),
            OpenAIModel::Babbage002 => write!(f, "babbage-002"),
            OpenAIModel::Davinci002 => write!(f, "davinci-002"),
        }
    }
}

impl From<OpenAIModel> for String {
    fn from(val: OpenAIModel) -> Self {
        val.to_string()
    }
}
