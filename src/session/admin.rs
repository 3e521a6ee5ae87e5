use super::Principal;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

pub trait AdminPolicy: Send + Sync {
    fn is_admin(&self, principal: &Principal) -> bool;
}

/// Admin iff the principal's email is on a configured list.
#[derive(Debug, Clone)]
pub struct AllowListAdminPolicy {
    emails: Vec<String>,
}

impl AllowListAdminPolicy {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|email| email.as_ref().trim().to_ascii_lowercase())
                .filter(|email| !email.is_empty())
                .collect(),
        }
    }
}

impl Default for AllowListAdminPolicy {
    fn default() -> Self {
        Self::new([DEFAULT_ADMIN_EMAIL])
    }
}

impl AdminPolicy for AllowListAdminPolicy {
    fn is_admin(&self, principal: &Principal) -> bool {
        let email = principal.email.to_ascii_lowercase();
        self.emails.iter().any(|allowed| *allowed == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(email: &str) -> Principal {
        Principal {
            uid: "u".into(),
            email: email.into(),
        }
    }

    #[test]
    fn default_policy_admits_only_default_admin() {
        let policy = AllowListAdminPolicy::default();
        assert!(policy.is_admin(&principal("admin@example.com")));
        assert!(policy.is_admin(&principal("Admin@Example.com")));
        assert!(!policy.is_admin(&principal("volunteer@example.com")));
    }

    #[test]
    fn blank_entries_are_ignored() {
        let policy = AllowListAdminPolicy::new([" ", "ops@cleansea.kz "]);
        assert!(policy.is_admin(&principal("ops@cleansea.kz")));
        assert!(!policy.is_admin(&principal("")));
    }
}
