use crate::types::TokenUsage;

pub const GPT_4O_MINI: &str = "gpt-4o-mini";
pub const GPT_4O: &str = "gpt-4o";
pub const DEFAULT_MODEL: &str = GPT_4O;

/// Per-token prices in US dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostPerToken {
    pub input: f64,
    pub cached_input: f64,
    pub output: f64,
}

impl CostPerToken {
    pub fn per_million(input: f64, cached_input: f64, output: f64) -> Self {
        Self {
            input: input * 1e-6,
            cached_input: cached_input * 1e-6,
            output: output * 1e-6,
        }
    }

    pub fn estimate(&self, usage: TokenUsage) -> f64 {
        self.input * usage.input_tokens as f64
            + self.cached_input * usage.cached_input_tokens as f64
            + self.output * usage.output_tokens as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub id: String,
    pub cost: CostPerToken,
}

/// The models the client accepts and what each one costs.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCatalog {
    models: Vec<ModelSpec>,
}

impl ModelCatalog {
    pub fn new(models: Vec<ModelSpec>) -> Self {
        Self { models }
    }

    /// https://openai.com/api/pricing/
    pub fn openai() -> Self {
        Self::new(vec![
            ModelSpec {
                id: GPT_4O_MINI.to_string(),
                cost: CostPerToken::per_million(0.150, 0.075, 0.600),
            },
            ModelSpec {
                id: GPT_4O.to_string(),
                cost: CostPerToken::per_million(2.50, 1.25, 10.00),
            },
        ])
    }

    pub fn get(&self, model: &str) -> Option<&ModelSpec> {
        self.models.iter().find(|spec| spec.id == model)
    }

    pub fn is_supported(&self, model: &str) -> bool {
        self.get(model).is_some()
    }

    pub fn supported_ids(&self) -> Vec<&str> {
        self.models.iter().map(|spec| spec.id.as_str()).collect()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::openai()
    }
}
