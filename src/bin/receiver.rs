//! Actuating node: UDP → DFPlayer Mini on UART2 (TX=GPIO17, RX=GPIO16).
//!
//! ```text
//!  boot ─▶ config ─▶ Wi-Fi ─▶ UART ─▶ set volume ─▶ loop { poll, back off on socket fault }
//! ```

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::AnyIOPin;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{UartConfig, UartDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use spectrum::adapters::config_file::{JsonFileConfig, mount_spiffs};
use spectrum::adapters::log_sink::LogEventSink;
use spectrum::adapters::time::{MonotonicClock, StdDelay};
use spectrum::adapters::uart::{DFPLAYER_BAUD, UartLink};
use spectrum::adapters::udp::UdpAdapter;
use spectrum::adapters::wifi;
use spectrum::app::ReceiverService;
use spectrum::config::ReceiverConfig;

const CONFIG_PATH: &str = "/spiffs/config.json";

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("Sensory Spectrum receiver v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config (defaults on any failure) ───────────────────
    if let Err(e) = mount_spiffs() {
        warn!("SPIFFS mount failed ({}), config file unavailable", e);
    }
    let config: ReceiverConfig = JsonFileConfig::new(CONFIG_PATH).load_or_default();

    // ── 3. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let _wifi = wifi::connect_station(peripherals.modem, sysloop, nvs, &config.wifi)?;
    let socket = UdpAdapter::bind(config.bind_addr())?;

    // ── 4. Player ─────────────────────────────────────────────
    let uart = UartDriver::new(
        peripherals.uart2,
        peripherals.pins.gpio17,
        peripherals.pins.gpio16,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(DFPLAYER_BAUD)),
    )?;

    // ── 5. Run ────────────────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut delay = StdDelay;
    let mut sink = LogEventSink::new();
    let mut service = ReceiverService::new(&config, socket, UartLink::new(uart));
    if let Err(e) = service.start(&mut sink) {
        warn!("Volume not applied: {}", e);
    }

    info!("Listening on UDP port {}", config.network.udp_port);
    loop {
        service.run_once(&clock, &mut delay, &mut sink);
    }
}
