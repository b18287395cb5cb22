//! Bluetooth module
//!
//! Advertises the watch and exposes the habit service and the Current Time
//! Service. The companion app writes all five habits at once to the habit
//! characteristic, see [`HabitUpdate::decode`] for the payload format.

use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use heapless::Vec;
use nrf_softdevice::{
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
        },
        gatt_server, peripheral,
    },
    Softdevice,
};
use pinetime_habits::{HabitUpdate, CURRENT_TIME_LEN, HABIT_TEXT_MAX_LEN, NUM_HABITS};

use super::time::TimeReference;

/// Five habits with their terminators
pub const HABIT_PAYLOAD_LEN: usize = NUM_HABITS * HABIT_TEXT_MAX_LEN;

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_128(
        ServiceList::Complete,
        &[0x9a1e0001_5b3c_4f2b_9a57_1f0c6e8d4b21_u128.to_le_bytes()],
    )
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload =
    LegacyAdvertisementBuilder::new().full_name("PineTime").build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub habit: HabitService,
    pub time: CurrentTimeService,
}

#[nrf_softdevice::gatt_service(uuid = "1805")]
pub struct CurrentTimeService {
    #[characteristic(uuid = "2a2b", write)]
    pub current_time: [u8; CURRENT_TIME_LEN],
}

#[nrf_softdevice::gatt_service(uuid = "9a1e0001-5b3c-4f2b-9a57-1f0c6e8d4b21")]
pub struct HabitService {
    /// NUL separated habit texts, one per slot
    #[characteristic(uuid = "9a1e0002-5b3c-4f2b-9a57-1f0c6e8d4b21", write)]
    pub habits: Vec<u8, HABIT_PAYLOAD_LEN>,
}

/// Serve the companion app forever, one connection at a time.
///
/// Every valid habit write is handed to `updates` and every valid time write
/// to `time`; malformed ones are logged and dropped.
pub async fn run(
    sd: &'static Softdevice,
    server: &Server,
    updates: &'static Signal<ThreadModeRawMutex, HabitUpdate>,
    time: &'static Signal<ThreadModeRawMutex, TimeReference>,
) -> ! {
    loop {
        let config = peripheral::Config::default();
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                defmt::warn!("Advertising failed: {:?}", e);
                continue;
            }
        };
        defmt::info!("Companion app connected");

        gatt_server::run(&conn, server, |event| match event {
            ServerEvent::Habit(HabitServiceEvent::HabitsWrite(payload)) => {
                match HabitUpdate::decode(&payload) {
                    Ok(update) => updates.signal(update),
                    Err(e) => defmt::warn!("Dropping habit update: {}", e),
                }
            }
            ServerEvent::Time(CurrentTimeServiceEvent::CurrentTimeWrite(bytes)) => {
                match TimeReference::from_cts_bytes(&bytes) {
                    Ok(reference) => time.signal(reference),
                    Err(e) => defmt::warn!("Dropping current time: {}", e),
                }
            }
        })
        .await;
        defmt::info!("Companion app disconnected");
    }
}
