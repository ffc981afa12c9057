use diesel::prelude::*;

/// Account row as seen by the notification dispatcher.
///
/// Read-only projection of `accounts`, `settings` and `stats` joined on `akey`.
/// Field order matches the select tuple in `DieselAccountStore`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct Account {
    pub account_key: String,
    pub auth_token: String,
    /// Presence enables the email channel
    pub email_address: Option<String>,
    pub push_enabled: bool,
    /// Telegram chat id; presence enables the messaging channel
    pub messaging_identity: Option<i64>,
    /// Preferred language code, e.g. `en`
    pub locale: String,
}

impl Account {
    /// Exact, case-sensitive comparison against the stored token.
    pub fn token_matches(&self, token: &str) -> bool {
        self.auth_token == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            account_key: "A1".to_string(),
            auth_token: "T1".to_string(),
            email_address: None,
            push_enabled: false,
            messaging_identity: None,
            locale: "en".to_string(),
        }
    }

    #[test]
    fn test_token_matches_exactly() {
        let account = account();
        assert!(account.token_matches("T1"));
        assert!(!account.token_matches("t1"));
        assert!(!account.token_matches("T1 "));
        assert!(!account.token_matches(""));
    }
}
