//! Display control module for PineTime
//!
//! Draws the watch face: time, date and the current habit.

use chrono::{Datelike, NaiveDateTime, Timelike};
use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};
use embassy_time::Delay;
use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_10X20, MonoTextStyleBuilder},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Text},
};
use embedded_text::{alignment::HorizontalAlignment, style::TextBoxStyleBuilder, TextBox};
use mipidsi::{models::ST7789, Builder, Orientation};
use pinetime_habits::HabitText;
use profont::PROFONT_24_POINT;

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

const MARGIN: i32 = 20;

const BACKGROUND_COLOR: Rgb565 = Rgb565::BLACK;
const TEXT_COLOR: Rgb565 = Rgb565::WHITE;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'a, SPI>,
}

impl<'a, SPI> Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Initialize the display and clear it, `None` if the LCD does not respond
    pub fn init(
        spim: Spim<'a, SPI>,
        cs: Output<'a, P0_25>,
        dc: Output<'a, P0_18>,
        rst: Output<'a, P0_26>,
        delay: &mut Delay,
    ) -> Option<Self> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(delay, Some(rst))
            .ok()?;

        let mut display = Self { lcd };
        display.lcd.clear(BACKGROUND_COLOR).ok()?;
        Some(display)
    }

    /// Update time and date
    pub fn update_time(&mut self, now: NaiveDateTime) -> Result<(), mipidsi::Error> {
        let time_style = MonoTextStyleBuilder::new()
            .font(&PROFONT_24_POINT)
            .text_color(TEXT_COLOR)
            .background_color(BACKGROUND_COLOR)
            .build();
        let date_style = MonoTextStyleBuilder::new()
            .font(&FONT_10X20)
            .text_color(TEXT_COLOR)
            .background_color(BACKGROUND_COLOR)
            .build();

        let mut buf = [0u8; 8];
        let time = format_no_std::show(
            &mut buf,
            format_args!("{:02}:{:02}", now.hour(), now.minute()),
        )
        .unwrap_or("--:--");
        Text::with_alignment(
            time,
            Point::new(LCD_W as i32 / 2, 70),
            time_style,
            Alignment::Center,
        )
        .draw(&mut self.lcd)?;

        let mut buf = [0u8; 24];
        let date = format_no_std::show(
            &mut buf,
            format_args!(
                "{}, {} {} {}",
                now.weekday(),
                now.day(),
                MONTHS[now.month0() as usize],
                now.year()
            ),
        )
        .unwrap_or("");
        Text::with_alignment(
            date,
            Point::new(LCD_W as i32 / 2, 105),
            date_style,
            Alignment::Center,
        )
        .draw(&mut self.lcd)?;

        Ok(())
    }

    /// Replace the habit shown below the date
    pub fn update_habit(&mut self, habit: &HabitText) -> Result<(), mipidsi::Error> {
        let bounds = Rectangle::new(
            Point::new(MARGIN, 130),
            Size::new(LCD_W as u32 - 2 * MARGIN as u32, LCD_H as u32 - 140),
        );
        bounds
            .into_styled(PrimitiveStyle::with_fill(BACKGROUND_COLOR))
            .draw(&mut self.lcd)?;

        let character_style = MonoTextStyleBuilder::new()
            .font(&FONT_10X20)
            .text_color(TEXT_COLOR)
            .build();
        let textbox_style = TextBoxStyleBuilder::new()
            .alignment(HorizontalAlignment::Center)
            .build();
        TextBox::with_textbox_style(habit.as_str(), bounds, character_style, textbox_style)
            .draw(&mut self.lcd)?;

        Ok(())
    }
}
