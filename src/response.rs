//! Shared response bodies.
//!
//! Records serialize directly as flat column/value objects, so the only
//! shared shape is the `detail` message used by DELETE confirmations and
//! every error response.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

impl Detail {
    pub fn new(detail: impl Into<String>) -> Self {
        Detail {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_detail_object() {
        let body = serde_json::to_value(Detail::new("Forecast with id 7 deleted successfully"))
            .expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({"detail": "Forecast with id 7 deleted successfully"})
        );
    }
}
