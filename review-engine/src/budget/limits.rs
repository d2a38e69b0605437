//! Per-model token limits.

use serde::{Deserialize, Serialize};

/// Tokens kept free between the request ceiling and the response reserve.
pub const REQUEST_MARGIN: usize = 200;
/// Tokens reserved for the model's answer.
pub const DEFAULT_RESPONSE_TOKENS: usize = 4_000;

const SMALL_CONTEXT_MODELS: &[&str] = &["anthropic.claude-instant-v1", "anthropic.claude-v2"];
const SMALL_CONTEXT_TOKENS: usize = 100_000;
const LARGE_CONTEXT_TOKENS: usize = 200_000;

/// Token budget of one LLM request.
///
/// `request_tokens = max_tokens - response_tokens - REQUEST_MARGIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLimits {
    pub max_tokens: usize,
    pub request_tokens: usize,
    pub response_tokens: usize,
}

/// Same thing under the name the packer talks about.
pub type TokenBudget = TokenLimits;

impl TokenLimits {
    pub fn new(max_tokens: usize, response_tokens: usize) -> Self {
        Self {
            max_tokens,
            request_tokens: max_tokens
                .saturating_sub(response_tokens)
                .saturating_sub(REQUEST_MARGIN),
            response_tokens,
        }
    }

    /// Limits for a known model id; unknown ids get the large window.
    pub fn for_model(model: &str) -> Self {
        let max = if SMALL_CONTEXT_MODELS.contains(&model) {
            SMALL_CONTEXT_TOKENS
        } else {
            LARGE_CONTEXT_TOKENS
        };
        Self::new(max, DEFAULT_RESPONSE_TOKENS)
    }

    pub fn describe(&self) -> String {
        format!(
            "max_tokens={}, request_tokens={}, response_tokens={}",
            self.max_tokens, self.request_tokens, self.response_tokens
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_table() {
        let v2 = TokenLimits::for_model("anthropic.claude-v2");
        assert_eq!(v2.max_tokens, 100_000);
        assert_eq!(v2.request_tokens, 95_800);

        let sonnet = TokenLimits::for_model("anthropic.claude-3-sonnet-20240229-v1:0");
        assert_eq!(sonnet.max_tokens, 200_000);
        assert_eq!(sonnet.request_tokens, 195_800);
        assert_eq!(sonnet.response_tokens, 4_000);
    }

    #[test]
    fn tiny_window_saturates() {
        assert_eq!(TokenLimits::new(100, 4_000).request_tokens, 0);
    }

    #[test]
    fn describe_lists_all_fields() {
        assert_eq!(
            TokenLimits::for_model("anthropic.claude-instant-v1").describe(),
            "max_tokens=100000, request_tokens=95800, response_tokens=4000"
        );
    }
}
