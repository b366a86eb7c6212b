//! Tri-state wrapper for screens backed by a store read.

use serde::{Deserialize, Serialize};

/// Loading until the first read lands, then `Empty` or `Success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum UiState<T> {
    Loading,
    Empty,
    Success(T),
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Loading | Self::Empty => None,
        }
    }
}

impl<T> Default for UiState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::UiState;

    #[test]
    fn serializes_with_state_tag() {
        let loading: UiState<Vec<i64>> = UiState::Loading;
        let success = UiState::Success(vec![2_i64, 1]);

        assert_eq!(
            serde_json::to_value(&loading).unwrap(),
            serde_json::json!({ "state": "loading" })
        );
        assert_eq!(
            serde_json::to_value(&success).unwrap(),
            serde_json::json!({ "state": "success", "data": [2, 1] })
        );
    }
}
