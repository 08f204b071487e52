//! Mock captcha solver.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::fetcher::{CaptchaSolver, FetcherError};

/// Mock implementation of [`CaptchaSolver`] returning a fixed solution and
/// recording every image URL it was asked to solve.
pub struct MockCaptchaSolver {
    solution: String,
    solved_urls: Mutex<Vec<String>>,
}

impl Default for MockCaptchaSolver {
    fn default() -> Self {
        Self::with_solution("mock-captcha-solution")
    }
}

impl MockCaptchaSolver {
    pub fn with_solution(solution: impl Into<String>) -> Self {
        Self {
            solution: solution.into(),
            solved_urls: Mutex::new(Vec::new()),
        }
    }

    /// Image URLs passed to `solve`, in order.
    pub fn solved_urls(&self) -> Vec<String> {
        self.solved_urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaptchaSolver for MockCaptchaSolver {
    async fn solve(&self, image_url: &str) -> Result<String, FetcherError> {
        self.solved_urls.lock().unwrap().push(image_url.to_string());
        Ok(self.solution.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_solved_urls() {
        let solver = MockCaptchaSolver::with_solution("abcd");
        let solution = solver.solve("http://example.org/captcha.jpg").await.unwrap();
        assert_eq!(solution, "abcd");
        assert_eq!(
            solver.solved_urls(),
            vec!["http://example.org/captcha.jpg".to_string()]
        );
    }
}
