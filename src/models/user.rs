use serde::{Deserialize, Serialize};

/// Signed-in user as handed to the client; only the token is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub token: String,
}

impl User {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            email: None,
            token: token.into(),
        }
    }
}
