//! Wi-Fi station bring-up.
//!
//! Credentials are validated with the same rules as the config file
//! before the driver is touched.  Reconnect supervision is not handled
//! here; a dropped link shows up as send/receive failures in the node
//! loops.

use core::time::Duration;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::info;

use crate::config::WifiConfig;

/// Connect in station mode and block until the network interface is up,
/// giving up after `config.connect_timeout_ms`.
pub fn connect_station(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
    config: &WifiConfig,
) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("wifi credentials: {e}"))?;

    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), Some(nvs))?, sysloop)?;

    let auth_method = if config.password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: config
            .ssid
            .as_str()
            .try_into()
            .map_err(|_| anyhow::anyhow!("ssid too long"))?,
        password: config
            .password
            .as_str()
            .try_into()
            .map_err(|_| anyhow::anyhow!("password too long"))?,
        auth_method,
        ..Default::default()
    }))?;

    wifi.start()?;
    info!("WiFi: connecting to '{}'", config.ssid);
    wifi.connect()?;
    wifi.ip_wait_while(
        |w| w.is_up().map(|up| !up),
        Some(Duration::from_millis(u64::from(config.connect_timeout_ms))),
    )?;

    let ip = wifi.wifi().sta_netif().get_ip_info()?;
    info!("WiFi: connected, ip {}", ip.ip);
    Ok(wifi)
}
