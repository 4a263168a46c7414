/// Per-call sampling options a model merges into its requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    /// Number of completions to generate per prompt.
    pub n: Option<u8>,
    pub stop_words: Option<Vec<String>>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_n(mut self, n: u8) -> Self {
        self.n = Some(n);
        self
    }

    pub fn with_stop_words(mut self, stop_words: Vec<String>) -> Self {
        self.stop_words = Some(stop_words);
        self
    }

    /// Overwrites every field for which `incoming` carries a value.
    pub fn merge_options(&mut self, incoming: CallOptions) {
        self.max_tokens = incoming.max_tokens.or(self.max_tokens);
        self.temperature = incoming.temperature.or(self.temperature);
        self.top_p = incoming.top_p.or(self.top_p);
        self.n = incoming.n.or(self.n);
        self.stop_words = incoming.stop_words.or(self.stop_words.take());
    }
}
