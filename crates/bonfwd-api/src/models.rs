// Dashboard wire types
//
// Field names follow the dashboard's camelCase JSON. Unknown fields are
// ignored so additions on the remote side never break decoding.

use serde::{Deserialize, Deserializer, Serialize};

/// An organization visible to the API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// A network inside an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    /// e.g. `["appliance", "switch", "wireless"]`
    #[serde(default)]
    pub product_types: Vec<String>,
}

impl Network {
    /// Whether this network manages wireless devices (and therefore has SSIDs).
    pub fn is_wireless(&self) -> bool {
        self.product_types.iter().any(|p| p == "wireless")
    }
}

/// One of the (up to 15) SSID slots of a wireless network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ssid {
    /// Slot number, 0-14. This is the SSID's identifier in every path.
    pub number: u8,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
}

/// A single Bonjour forwarding rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonjourRule {
    pub description: String,
    /// Sent as a string; some responses carry a bare number.
    #[serde(deserialize_with = "string_or_number")]
    pub vlan_id: String,
    pub services: Vec<String>,
}

/// `GET .../wireless/ssids/{number}/bonjourForwarding`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonjourForwarding {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rules: Vec<BonjourRule>,
}

/// `PUT .../wireless/ssids/{number}/bonjourForwarding` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonjourForwardingUpdate {
    pub enabled: bool,
    pub rules: Vec<BonjourRule>,
}

/// `{"errors": ["..."]}` envelope returned on failure.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn network_wireless_detection() {
        let net: Network = serde_json::from_value(json!({
            "id": "L_1",
            "name": "Branch",
            "organizationId": "42",
            "productTypes": ["appliance", "wireless"],
            "timeZone": "Europe/Berlin"
        }))
        .unwrap();
        assert!(net.is_wireless());
        assert_eq!(net.organization_id.as_deref(), Some("42"));

        let wired: Network = serde_json::from_value(json!({
            "id": "L_2",
            "name": "Core",
            "productTypes": ["switch"]
        }))
        .unwrap();
        assert!(!wired.is_wireless());
    }

    #[test]
    fn rule_accepts_numeric_vlan() {
        let rule: BonjourRule = serde_json::from_value(json!({
            "description": "Printers",
            "vlanId": 20,
            "services": ["Printers"]
        }))
        .unwrap();
        assert_eq!(rule.vlan_id, "20");
    }

    #[test]
    fn update_serializes_camel_case_with_string_vlan() {
        let update = BonjourForwardingUpdate {
            enabled: true,
            rules: vec![BonjourRule {
                description: "Rule 01".into(),
                vlan_id: "10".into(),
                services: vec!["AirPlay".into()],
            }],
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "enabled": true,
                "rules": [{ "description": "Rule 01", "vlanId": "10", "services": ["AirPlay"] }]
            })
        );
    }
}
