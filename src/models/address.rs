use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AddressType {
    #[default]
    Home,
    Office,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "type", default)]
    pub kind: AddressType,
    pub address_line1: String,
    pub address_line2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Checks the fields the address step requires before a draft accepts it.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("addressLine1", &self.address_line1),
            ("addressLine2", &self.address_line2),
            ("city", &self.city),
            ("state", &self.state),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{field} is required"));
            }
        }

        if self.pincode.len() != 6 || !self.pincode.chars().all(|c| c.is_ascii_digit()) {
            return Err("please enter a valid 6-digit pincode".to_string());
        }

        Ok(())
    }
}
