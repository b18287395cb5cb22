#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Level, Output, OutputDrive},
    peripherals::SPI2,
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Delay, Duration, Ticker};
use nrf_softdevice::{Flash, Softdevice};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{backlight::Backlight, display::Display};
use pinetime_habits::{
    FlashStorage, HabitStore, HabitText, HabitUpdate, MinuteClock, RotationConfig,
    RotationController,
};
use system::{
    bluetooth::{self, Server},
    config::SystemConfig,
    time::{TimeManager, TimeReference},
};

// Others
use chrono::NaiveDateTime;

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
const TIMEZONE: i64 = 1 * 3_600;

/// First flash sector of the habit slots, right behind the application
const HABIT_FLASH_BASE: u32 = 0x7_a000;

/// Backlight level once the watch face is drawn
const BRIGHTNESS: u8 = 2;

// Communication channels
static CLOCK_TICK: Signal<ThreadModeRawMutex, ()> = Signal::new();
static HABIT_TEXT: Signal<ThreadModeRawMutex, HabitText> = Signal::new();
static HABIT_UPDATE: Signal<ThreadModeRawMutex, HabitUpdate> = Signal::new();
static TIME: Signal<ThreadModeRawMutex, NaiveDateTime> = Signal::new();
static TIME_REFERENCE: Signal<ThreadModeRawMutex, TimeReference> = Signal::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertise and receive habits and the time from the companion app
#[embassy_executor::task]
async fn ble(sd: &'static Softdevice, server: &'static Server) -> ! {
    bluetooth::run(sd, server, &HABIT_UPDATE, &TIME_REFERENCE).await
}

/// Own the habit slots and decide which one is shown.
#[embassy_executor::task(pool_size = 1)]
async fn habits(mut store: HabitStore<FlashStorage<Flash>>, config: RotationConfig) {
    let mut rotation = RotationController::new(config);
    HABIT_TEXT.signal(rotation.on_start(&mut store).await);

    loop {
        match select(CLOCK_TICK.wait(), HABIT_UPDATE.wait()).await {
            Either::First(()) => {
                if let Some(habit) = rotation.on_tick(&mut store).await {
                    HABIT_TEXT.signal(habit);
                }
            }
            Either::Second(update) => {
                defmt::info!("Received habit update");
                HABIT_TEXT.signal(rotation.on_update(&mut store, &update).await);
            }
        }
    }
}

/// Redraw the parts of the watch face that changed
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(mut display: Display<'static, SPI2>, mut backlight: Backlight<'static>) {
    let mut lit = false;
    loop {
        let drawn = match select(TIME.wait(), HABIT_TEXT.wait()).await {
            Either::First(time) => display.update_time(time),
            Either::Second(habit) => {
                defmt::info!("Showing habit: {}", habit);
                display.update_habit(&habit)
            }
        };
        if let Err(e) = drawn {
            defmt::warn!("Drawing failed: {}", defmt::Debug2Format(&e));
        }

        // Only light up once there is something on screen
        if !lit {
            unwrap!(backlight.set(BRIGHTNESS));
            lit = true;
        }
    }
}

/// Get the current time, and tick the habit rotation every minute.
#[embassy_executor::task(pool_size = 1)]
async fn update_time(mut clock: TimeManager) {
    let mut minutes = MinuteClock::new();
    let mut tick = Ticker::every(Duration::from_secs(1));
    loop {
        if let Some(reference) = TIME_REFERENCE.try_take() {
            defmt::info!("Clock set by companion app");
            clock.set_time(reference);
        }

        let now = clock.get_time();
        if minutes.poll(now) {
            CLOCK_TICK.signal(());
        }
        TIME.signal(now);

        // Re-schedule the timer interrupt
        tick.next().await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::embassy());
    defmt::info!("Initializing");

    // Initialize Backlight
    let backlight = Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        &mut Delay,
    ));

    // Initialize Bluetooth
    let sd = Softdevice::enable(&SystemConfig::softdevice());
    static SERVER: StaticCell<Server> = StaticCell::new();
    let server = SERVER.init(unwrap!(Server::new(sd)));
    let sd: &'static Softdevice = sd;

    // Initialize habit storage, flash access goes through the SoftDevice
    let storage = unwrap!(FlashStorage::new(Flash::take(sd), HABIT_FLASH_BASE));
    let store = HabitStore::new(storage);

    // Initialize wall clock from the build time, until the phone sets it
    let clock = TimeManager::init(TimeReference::from_timestamp(UTC_EPOCH + TIMEZONE));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(ble(sd, server)));
    unwrap!(spawner.spawn(habits(store, RotationConfig::default())));
    unwrap!(spawner.spawn(update_lcd(display, backlight)));
    unwrap!(spawner.spawn(update_time(clock)));
}
