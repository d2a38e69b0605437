//! Token counting seam.

/// Anything that can estimate how many tokens a text costs.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// ~4 characters per token, rounded up.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTokenCounter;

impl TokenCounter for ApproxTokenCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_rounds_up() {
        let c = ApproxTokenCounter;
        assert_eq!(c.count(""), 0);
        assert_eq!(c.count("abc"), 1);
        assert_eq!(c.count("abcd"), 1);
        assert_eq!(c.count("abcde"), 2);
        // chars, not bytes
        assert_eq!(c.count("ääää"), 1);
    }

    #[test]
    fn closures_are_counters() {
        let words = |s: &str| s.split_whitespace().count();
        assert_eq!(words.count("one two three"), 3);
    }
}
