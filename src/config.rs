//! Node configuration.
//!
//! One JSON document per node, split into the same sections on both
//! boards (`wifi`, `network`, then `sensor` on the sender and
//! `dfplayer` + `audio` on the receiver).  Every section defaults, so a
//! partial file only overrides what it names.

use core::time::Duration;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::audio::{MAX_VOLUME, TrackMapping};
use crate::color::ColorClassifier;
use crate::net::NotifierConfig;
use crate::stability::StabilityConfig;

/// Behaviour shared by both node configs.
pub trait NodeConfig: Sized + Serialize + for<'de> Deserialize<'de> {
    fn validate(&self) -> Result<(), ConfigError>;

    /// Parse and validate a JSON document.
    fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }
}

// ───────────────────────────────────────────────────────────────
// Shared sections
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub ssid: heapless::String<32>,
    /// Empty for an open network.
    pub password: heapless::String<64>,
    pub connect_timeout_ms: u32,
}

impl Default for WifiConfig {
    fn default() -> Self {
        let mut ssid = heapless::String::new();
        let mut password = heapless::String::new();
        let _ = ssid.push_str("Your_SSID");
        let _ = password.push_str("Your_PASSWORD");
        Self {
            ssid,
            password,
            connect_timeout_ms: 20_000,
        }
    }
}

impl WifiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_wifi_credentials(&self.ssid, &self.password)
    }
}

/// SSID 1..=32 printable ASCII bytes; password empty or 8..=64 bytes.
pub fn validate_wifi_credentials(ssid: &str, password: &str) -> Result<(), ConfigError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConfigError::ValidationFailed("wifi.ssid must be 1-32 printable ASCII bytes"));
    }
    if !password.is_empty() && !(8..=64).contains(&password.len()) {
        return Err(ConfigError::ValidationFailed("wifi.password must be empty or 8-64 bytes"));
    }
    Ok(())
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

// ───────────────────────────────────────────────────────────────
// Sender
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderNetwork {
    /// Dotted-quad IPv4 address of the receiver board.
    pub receiver_ip: heapless::String<15>,
    pub udp_port: u16,
    pub ack_timeout_ms: u32,
    pub max_attempts: u8,
}

impl Default for SenderNetwork {
    fn default() -> Self {
        let mut receiver_ip = heapless::String::new();
        let _ = receiver_ip.push_str("192.168.4.2");
        Self {
            receiver_ip,
            udp_port: 4210,
            ack_timeout_ms: 500,
            max_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    /// Pause between samples.
    pub sample_delay_ms: u32,
    /// Per-channel floor; totals under 3× this read as Black.
    pub min_intensity: u16,
    /// Total above which a neutral sample reads as White.
    pub high_intensity: u16,
    pub confidence_threshold: f32,
    pub stability_threshold: u32,
    /// Local pause after each stable event.
    pub send_cooldown_ms: u32,
    pub calibration_samples: usize,
    pub calibration_interval_ms: u32,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            sample_delay_ms: 1000,
            min_intensity: ColorClassifier::DEFAULT_MIN_INTENSITY,
            high_intensity: ColorClassifier::DEFAULT_HIGH_INTENSITY,
            confidence_threshold: 0.6,
            stability_threshold: 2,
            send_cooldown_ms: 2000,
            calibration_samples: 10,
            calibration_interval_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    pub wifi: WifiConfig,
    pub network: SenderNetwork,
    pub sensor: SensorSettings,
}

impl SenderConfig {
    pub fn peer_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: Ipv4Addr = self
            .network
            .receiver_ip
            .parse()
            .map_err(|_| ConfigError::ValidationFailed("network.receiver_ip is not an IPv4 address"))?;
        Ok(SocketAddr::V4(SocketAddrV4::new(ip, self.network.udp_port)))
    }

    pub fn classifier(&self) -> ColorClassifier {
        ColorClassifier::new(self.sensor.min_intensity, self.sensor.high_intensity)
    }

    pub fn stability(&self) -> StabilityConfig {
        StabilityConfig {
            stability_threshold: self.sensor.stability_threshold,
            confidence_threshold: self.sensor.confidence_threshold,
            cooldown: Duration::from_millis(u64::from(self.sensor.send_cooldown_ms)),
        }
    }

    pub fn notifier(&self) -> NotifierConfig {
        NotifierConfig {
            ack_timeout: Duration::from_millis(u64::from(self.network.ack_timeout_ms)),
            max_attempts: self.network.max_attempts,
        }
    }
}

impl NodeConfig for SenderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.wifi.validate()?;
        self.peer_addr()?;
        let net = &self.network;
        if net.udp_port == 0 {
            return Err(ConfigError::ValidationFailed("network.udp_port must be non-zero"));
        }
        if net.ack_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("network.ack_timeout_ms must be non-zero"));
        }
        if net.max_attempts == 0 {
            return Err(ConfigError::ValidationFailed("network.max_attempts must be at least 1"));
        }

        let s = &self.sensor;
        if !(0.0..=1.0).contains(&s.confidence_threshold) {
            return Err(ConfigError::ValidationFailed("sensor.confidence_threshold must be within 0..=1"));
        }
        if u32::from(s.high_intensity) <= 3 * u32::from(s.min_intensity) {
            return Err(ConfigError::ValidationFailed(
                "sensor.high_intensity must exceed 3 x sensor.min_intensity",
            ));
        }
        if s.sample_delay_ms == 0 {
            return Err(ConfigError::ValidationFailed("sensor.sample_delay_ms must be non-zero"));
        }
        if s.calibration_samples == 0 {
            return Err(ConfigError::ValidationFailed("sensor.calibration_samples must be at least 1"));
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Receiver
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverNetwork {
    pub udp_port: u16,
    /// Upper bound on one blocking receive.
    pub poll_timeout_ms: u32,
}

impl Default for ReceiverNetwork {
    fn default() -> Self {
        Self {
            udp_port: 4210,
            poll_timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// 0..=30
    pub volume: u8,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self { volume: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub track_map: TrackMapping,
    /// Same-label repeats inside this window are suppressed.
    pub repeat_cooldown_ms: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            track_map: TrackMapping::default(),
            repeat_cooldown_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    pub wifi: WifiConfig,
    pub network: ReceiverNetwork,
    pub dfplayer: PlayerSettings,
    pub audio: AudioSettings,
}

impl ReceiverConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, self.network.udp_port))
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.network.poll_timeout_ms))
    }

    pub fn repeat_cooldown(&self) -> Duration {
        Duration::from_millis(u64::from(self.audio.repeat_cooldown_ms))
    }
}

impl NodeConfig for ReceiverConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.wifi.validate()?;
        if self.network.udp_port == 0 {
            return Err(ConfigError::ValidationFailed("network.udp_port must be non-zero"));
        }
        if self.network.poll_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("network.poll_timeout_ms must be non-zero"));
        }
        if self.dfplayer.volume > MAX_VOLUME {
            return Err(ConfigError::ValidationFailed("dfplayer.volume must be within 0..=30"));
        }
        if self.audio.track_map.validate().is_err() {
            return Err(ConfigError::ValidationFailed("audio.track_map tracks must be within 1..=3000"));
        }
        Ok(())
    }
}
