//! Profile types

use crate::slack::UserId;

/// What the destination side needs to impersonate a sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// User ID (e.g., U09JDBT2MCM)
    pub id: UserId,

    /// Username/handle (e.g., "john.doe")
    pub display_name: String,

    /// 48px avatar, when the user has one
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// Mention form used in rewritten text
    pub fn mention(&self) -> String {
        format!("@{}", self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_prefix() {
        let user = UserProfile {
            id: UserId::new("U123"),
            display_name: "john.doe".to_string(),
            avatar_url: None,
        };

        assert_eq!(user.mention(), "@john.doe");
    }
}
