/// The single admin account. Exactly one row exists in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredential {
    pub username: String,
    pub password: String,
}

impl AdminCredential {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
