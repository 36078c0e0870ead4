use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub booking_id: i64,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NewReview {
    pub fn new(booking_id: i64, rating: u8, comment: Option<String>) -> AppResult<Self> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(Self {
            booking_id,
            rating,
            comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(NewReview::new(1, 0, None).is_err());
        assert!(NewReview::new(1, 6, None).is_err());
        assert!(NewReview::new(1, 1, None).is_ok());
        assert!(NewReview::new(1, 5, None).is_ok());
    }

    #[test]
    fn test_blank_comment_dropped() {
        let review = NewReview::new(3, 4, Some("   ".to_string())).unwrap();
        assert!(review.comment.is_none());
        assert_eq!(
            serde_json::to_value(&review).unwrap(),
            serde_json::json!({"bookingId": 3, "rating": 4})
        );
    }
}
