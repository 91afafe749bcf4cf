//! Startup banner: "TEMPORAL" in the standard figlet font, shaded left to right
//! from night to dawn to noon, followed by the calendar range being served.

use crate::domain::week_numbering::weeks_in_year;
use crate::domain::WeekNumber;
use crate::shared::config::BuilderConfig;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::QueueableCommand;
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

type Rgb = (u8, u8, u8);

/// Colour stops across the banner width.
const SKY: [Rgb; 3] = [(0x1e, 0x3a, 0x8a), (0xf4, 0x72, 0xb6), (0xf5, 0x9e, 0x0b)];

/// Colour at `t` in [0.0, 1.0] along the `SKY` stops.
fn sky_at(t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0) * (SKY.len() - 1) as f64;
    let i = (t.floor() as usize).min(SKY.len() - 2);
    let f = t - i as f64;
    let (a, b) = (SKY[i], SKY[i + 1]);
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * f).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// `vX.Y.Z  weeks 2020-01 .. 2050-52  (Sunday-first)`.
fn subtitle(config: &BuilderConfig) -> String {
    let first = WeekNumber::new(config.epoch_year(), 1);
    let last_week = weeks_in_year(config.end_year()).unwrap_or(52);
    let last = WeekNumber::new(config.end_year(), last_week);
    format!(
        "v{}  weeks {} .. {}  ({}-first)",
        env!("CARGO_PKG_VERSION"),
        first,
        last,
        config.start_of_week()
    )
}

/// Prints the banner and the configured range. Falls back to a plain title
/// when the font cannot be loaded.
pub fn print_welcome(config: &BuilderConfig) {
    let art = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("TEMPORAL").map(|figure| figure.to_string()))
        .unwrap_or_else(|| "TEMPORAL".to_string());
    let width = art.lines().map(|l| l.chars().count()).max().unwrap_or(1).max(2);

    let mut out = stdout();
    for line in art.lines() {
        for (col, ch) in line.chars().enumerate() {
            let (r, g, b) = sky_at(col as f64 / (width - 1) as f64);
            let _ = out.queue(SetForegroundColor(Color::Rgb { r, g, b }));
            let _ = out.queue(Print(ch));
        }
        let _ = out.queue(ResetColor);
        let _ = out.queue(Print("\r\n"));
    }
    let _ = out.queue(Print(format!("{}\r\n", subtitle(config))));
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sky_stops() {
        assert_eq!(sky_at(0.0), SKY[0]);
        assert_eq!(sky_at(0.5), SKY[1]);
        assert_eq!(sky_at(1.0), SKY[2]);
        assert_eq!(sky_at(7.0), SKY[2]);
    }

    #[test]
    fn test_subtitle_shows_range() {
        let config = BuilderConfig::new(2021, 2022, "SUN").unwrap();
        let text = subtitle(&config);
        assert!(text.contains("weeks 2021-01 .. 2022-53"), "{}", text);
        assert!(text.ends_with("(SUN-first)"), "{}", text);
    }
}
