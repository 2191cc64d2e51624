//! ONU registrations

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// One ONU registered on the OLT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OnuRegistration {
    /// ONU serial number
    pub serial_number: String,
    /// PON interface the ONU is registered on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    /// Service profiles provisioned on the ONU, by name
    #[serde(default)]
    pub service_profiles: Vec<String>,
}

impl OnuRegistration {
    /// Create a registration
    #[must_use]
    pub fn new(serial_number: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.into(),
            interface: None,
            service_profiles: Vec::new(),
        }
    }

    /// Builder: set the PON interface
    #[must_use]
    pub fn on_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// Builder: add a service profile
    #[must_use]
    pub fn with_service(mut self, service_profile: impl Into<String>) -> Self {
        self.service_profiles.push(service_profile.into());
        self
    }

    /// Whether the ONU uses `service_profile`
    #[must_use]
    pub fn uses(&self, service_profile: &str) -> bool {
        self.service_profiles.iter().any(|s| s == service_profile)
    }
}

impl Display for OnuRegistration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.interface {
            Some(interface) => write!(f, "{} ({interface})", self.serial_number),
            None => f.write_str(&self.serial_number),
        }
    }
}
