/// Caller identity as resolved by the external authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Authenticated { username: String },
}

impl Actor {
    /// Blank usernames are treated as anonymous.
    pub fn from_username(username: Option<&str>) -> Self {
        match username.map(str::trim) {
            Some(name) if !name.is_empty() => Actor::Authenticated {
                username: name.to_string(),
            },
            _ => Actor::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::Authenticated { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Actor::Authenticated { username } => Some(username),
            Actor::Anonymous => None,
        }
    }
}
