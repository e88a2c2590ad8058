use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Partner,
}

/// The signed-in customer or partner, as resolved from a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: String,
    pub role: Role,
    pub display_name: String,
}

impl Party {
    pub fn is_partner(&self) -> bool {
        self.role == Role::Partner
    }
}
