//! WiFi access point + mDNS bring-up.
//!
//! The launcher is its own network: it raises a WPA2/WPA3 soft-AP and
//! advertises itself as `katapult.local` so the control page is
//! reachable without any infrastructure. Credential validation is
//! host-testable; the actual radio bring-up is target-only.

use core::fmt;

use log::info;

/// Advertised mDNS hostname (`<hostname>.local`).
pub const MDNS_HOSTNAME: &str = "katapult";

/// Soft-AP credentials.
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetConfigError {
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for NetConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID must be 1-32 printable ASCII bytes"),
            Self::InvalidPassword => write!(f, "password must be 8-64 bytes"),
        }
    }
}

impl NetConfig {
    /// Validate and store AP credentials. WPA2 requires a password of at
    /// least 8 bytes; there is no open-network mode here.
    pub fn new(ssid: &str, password: &str) -> Result<Self, NetConfigError> {
        if ssid.is_empty() || !ssid.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
            return Err(NetConfigError::InvalidSsid);
        }
        if password.len() < 8 {
            return Err(NetConfigError::InvalidPassword);
        }
        Ok(Self {
            ssid: ssid.try_into().map_err(|_| NetConfigError::InvalidSsid)?,
            password: password
                .try_into()
                .map_err(|_| NetConfigError::InvalidPassword)?,
        })
    }
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            ssid: "katapult".try_into().unwrap_or_default(),
            password: "launchpad".try_into().unwrap_or_default(),
        }
    }
}

// ── Radio bring-up (target only) ──────────────────────────────

/// Start the soft-AP and mDNS responder. The returned handles must stay
/// alive for the life of the process.
#[cfg(target_os = "espidf")]
pub fn start_network(
    modem: esp_idf_hal::modem::Modem,
    sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
    nvs: esp_idf_svc::nvs::EspDefaultNvsPartition,
    config: &NetConfig,
) -> anyhow::Result<(esp_idf_svc::wifi::EspWifi<'static>, esp_idf_svc::mdns::EspMdns)> {
    use esp_idf_svc::mdns::EspMdns;
    use esp_idf_svc::wifi::{AccessPointConfiguration, AuthMethod, Configuration, EspWifi};

    let mut wifi = EspWifi::new(modem, sysloop, Some(nvs))?;
    wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
        ssid: config.ssid.clone(),
        password: config.password.clone(),
        auth_method: AuthMethod::WPA2WPA3Personal,
        ..Default::default()
    }))?;
    wifi.start()?;
    info!("net: soft-AP '{}' up", config.ssid);

    let mut mdns = EspMdns::take()?;
    mdns.set_hostname(MDNS_HOSTNAME)?;
    mdns.set_instance_name("Katapult Launcher")?;
    info!("net: advertising {}.local", MDNS_HOSTNAME);

    Ok((wifi, mdns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_credentials_validate() {
        let d = NetConfig::default();
        assert!(NetConfig::new(&d.ssid, &d.password).is_ok());
    }

    #[test]
    fn rejects_empty_ssid() {
        assert!(matches!(
            NetConfig::new("", "password1"),
            Err(NetConfigError::InvalidSsid)
        ));
    }

    #[test]
    fn rejects_short_password() {
        assert!(matches!(
            NetConfig::new("katapult", "short"),
            Err(NetConfigError::InvalidPassword)
        ));
    }

    #[test]
    fn rejects_non_ascii_ssid() {
        assert!(matches!(
            NetConfig::new("k\u{fe}t", "password1"),
            Err(NetConfigError::InvalidSsid)
        ));
    }
}
