use crate::models::User;

/// Credential check backing the login endpoint
pub trait UserDirectory: Send + Sync {
    /// Returns the user when `email` and `password` match an entry
    fn authenticate(&self, email: &str, password: &str) -> Option<User>;
}

/// Fixed demo accounts spread across three tenants
pub struct StaticUserDirectory {
    users: Vec<User>,
}

impl StaticUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub fn demo() -> Self {
        let entries = [
            ("a@customer1.com", "tenant-customer1"),
            ("b@customer1.com", "tenant-customer1"),
            ("c@customer1.com", "tenant-customer1"),
            ("a@customer2.com", "tenant-customer2"),
            ("b@customer2.com", "tenant-customer2"),
            ("b@customer3.com", "tenant-customer3"),
        ];

        Self::new(
            entries
                .iter()
                .map(|(email, tenant_id)| User {
                    email: email.to_string(),
                    password: "abc".to_string(),
                    tenant_id: tenant_id.to_string(),
                })
                .collect(),
        )
    }
}

impl UserDirectory for StaticUserDirectory {
    fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()) && u.password == password)
            .cloned()
    }
}
