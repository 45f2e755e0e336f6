//! Sensing node: TCS34725 on I2C0 (SDA=GPIO21, SCL=GPIO22) → UDP.
//!
//! ```text
//!  boot ─▶ config ─▶ Wi-Fi ─▶ sensor ─▶ calibrate ─▶ loop { tick; sleep(sample_delay) }
//! ```

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use spectrum::adapters::config_file::{JsonFileConfig, mount_spiffs};
use spectrum::adapters::log_sink::LogEventSink;
use spectrum::adapters::time::{MonotonicClock, StdDelay};
use spectrum::adapters::udp::UdpAdapter;
use spectrum::adapters::wifi;
use spectrum::app::SenderService;
use spectrum::config::SenderConfig;
use spectrum::net::ReliableNotifier;
use spectrum::sensors::Tcs34725;

const CONFIG_PATH: &str = "/spiffs/config.json";
/// Time for the operator to present the white reference.
const CALIBRATION_LEAD_MS: u32 = 3000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("Sensory Spectrum sender v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config (defaults on any failure) ───────────────────
    if let Err(e) = mount_spiffs() {
        warn!("SPIFFS mount failed ({}), config file unavailable", e);
    }
    let config: SenderConfig = JsonFileConfig::new(CONFIG_PATH).load_or_default();

    // ── 3. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let _wifi = wifi::connect_station(peripherals.modem, sysloop, nvs, &config.wifi)?;

    let socket = UdpAdapter::bind("0.0.0.0:0".parse()?)?;
    let notifier = ReliableNotifier::new(socket, config.peer_addr()?, config.notifier());

    // ── 4. Sensor ─────────────────────────────────────────────
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(100_000)),
    )?;
    let mut sensor = Tcs34725::new(i2c, StdDelay)?;

    // ── 5. Calibrate, then run ────────────────────────────────
    let clock = MonotonicClock::new();
    let mut delay = StdDelay;
    let mut sink = LogEventSink::new();
    let mut service = SenderService::new(&config, notifier);
    service.start(&mut sink);

    info!("Point the sensor at a WHITE surface...");
    delay.delay_ms(CALIBRATION_LEAD_MS);
    let report = service.calibrate(&mut sensor, &mut delay, &mut sink);
    if report.accepted == 0 {
        error!("Calibration read no samples; continuing uncalibrated");
    }

    info!("Monitoring colours");
    loop {
        service.tick(&mut sensor, &clock, &mut sink);
        delay.delay_ms(config.sensor.sample_delay_ms);
    }
}
