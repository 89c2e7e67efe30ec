//! Human-readable forecast output.
//!
//! Rendering never fails on odd-but-present data: days without hourly
//! samples fall back to the current reading, and an out-of-range day index
//! is printed as a diagnostic line. Only the output sink can return an error.

use std::{
    fmt::Display,
    io::{self, Write},
};

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::model::{ForecastDay, WeatherSnapshot};

pub mod glyph;
pub mod theme;

use theme::{Role, Theme, rain_role, temperature_role, theme_for};

pub const NO_FORECAST: &str = "No Forecast available.";

const HEADER_TIME_FORMAT: &str = "%a %d %b %Y %H:%M:%S %Z";
const DAY_TITLE_FORMAT: &str = "%a %d %b %Y";
const HOUR_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayOptions {
    pub color: bool,
    pub emoji: bool,
}

pub struct Renderer<Tz: TimeZone = Local> {
    options: DisplayOptions,
    theme: &'static dyn Theme,
    tz: Tz,
}

impl Renderer<Local> {
    /// Renders timestamps in the machine's local time zone.
    pub fn new(options: DisplayOptions) -> Self {
        Self::with_timezone(options, Local)
    }
}

impl<Tz> Renderer<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn with_timezone(options: DisplayOptions, tz: Tz) -> Self {
        Self { options, theme: theme_for(options.color), tz }
    }

    /// Greeting with the location, then the observation time.
    pub fn render_header<W: Write>(
        &self,
        snapshot: &WeatherSnapshot,
        out: &mut W,
    ) -> io::Result<()> {
        let observed = self.at(snapshot.current.observed_at_epoch);

        writeln!(
            out,
            "{}{} {}",
            self.icon(glyph::PIN),
            self.wrap(Role::Header, "¡Buen día!"),
            self.wrap(Role::Bold, &snapshot.location_label()),
        )?;
        writeln!(
            out,
            "{}{} {}",
            self.icon(glyph::CALENDAR),
            self.wrap(Role::Label, "Fecha:"),
            self.wrap(Role::Value, &observed.format(HEADER_TIME_FORMAT).to_string()),
        )
    }

    /// Every forecast day in order, or a single notice when there are none.
    pub fn render_all<W: Write>(&self, snapshot: &WeatherSnapshot, out: &mut W) -> io::Result<()> {
        let total = snapshot.forecast_days.len();
        if total == 0 {
            return writeln!(out, "{NO_FORECAST}");
        }

        for index in 0..total {
            self.render_day(snapshot, index, total, out)?;
        }
        Ok(())
    }

    /// Summary and hourly rows for one day. `total` is only used in the title.
    pub fn render_day<W: Write>(
        &self,
        snapshot: &WeatherSnapshot,
        index: usize,
        total: usize,
        out: &mut W,
    ) -> io::Result<()> {
        let day = match snapshot.day(index) {
            Ok(day) => day,
            Err(err) => {
                tracing::warn!(
                    index,
                    available = snapshot.forecast_days.len(),
                    "day index out of range"
                );
                return writeln!(out, "{err}");
            }
        };

        self.render_summary(snapshot, day, index, total, out)?;
        self.render_hours(day, out)
    }

    fn render_summary<W: Write>(
        &self,
        snapshot: &WeatherSnapshot,
        day: &ForecastDay,
        index: usize,
        total: usize,
        out: &mut W,
    ) -> io::Result<()> {
        let current = &snapshot.current;

        let title_time = match day.first_hour_epoch() {
            Some(epoch) => self.at(epoch),
            None => Utc::now().with_timezone(&self.tz),
        };
        let title = format!(
            "{} (día {}/{})",
            title_time.format(DAY_TITLE_FORMAT),
            index + 1,
            total
        );
        writeln!(
            out,
            "\n{} {}",
            self.wrap(Role::Bold, "==="),
            self.wrap(Role::Bold, &self.wrap(Role::Header, &title)),
        )?;

        let condition = day.representative_condition(&current.condition);
        writeln!(
            out,
            "{}{} {}",
            self.condition_icon(condition),
            self.wrap(Role::Label, "Hoy:"),
            self.wrap(Role::Value, condition),
        )?;

        writeln!(
            out,
            "  {}{}  {}  {}{}  {}  {}{}  {}",
            self.icon(glyph::TEMP_MAX),
            self.wrap(Role::Label, "max:"),
            self.temperature(day.max_temp_c),
            self.icon(glyph::TEMP_AVG),
            self.wrap(Role::Label, "avg:"),
            self.temperature(day.average_temp_c(current.temperature_c)),
            self.icon(glyph::TEMP_MIN),
            self.wrap(Role::Label, "min:"),
            self.temperature(day.min_temp_c),
        )?;

        writeln!(
            out,
            "  {}{} {}  {}{} {}",
            self.icon(glyph::WIND),
            self.wrap(Role::Label, "viento:"),
            self.wrap(Role::Value, &format!("{:.0} km/h", current.wind_kph)),
            self.icon(glyph::HUMIDITY),
            self.wrap(Role::Label, "humedad:"),
            self.wrap(Role::Value, &format!("{}%", current.humidity_pct)),
        )?;

        writeln!(
            out,
            "  {}{} {}  {}{} {}\n",
            self.icon(glyph::SUNRISE),
            self.wrap(Role::Label, "amanecer:"),
            self.wrap(Role::Value, &day.astro.sunrise),
            self.icon(glyph::SUNSET),
            self.wrap(Role::Label, "atardecer:"),
            self.wrap(Role::Value, &day.astro.sunset),
        )
    }

    fn render_hours<W: Write>(&self, day: &ForecastDay, out: &mut W) -> io::Result<()> {
        for hour in &day.hours {
            let time = self.at(hour.epoch).format(HOUR_FORMAT).to_string();
            writeln!(
                out,
                "{} {}{} - {}, {}{}",
                self.wrap(Role::Dim, &time),
                self.condition_icon(&hour.condition),
                self.wrap(Role::Value, &hour.condition),
                self.temperature(hour.temperature_c),
                self.icon(glyph::UMBRELLA),
                self.percent(hour.chance_of_rain_pct),
            )?;
        }
        Ok(())
    }

    fn at(&self, epoch: i64) -> DateTime<Tz> {
        let utc = DateTime::<Utc>::from_timestamp(epoch, 0).unwrap_or_default();
        utc.with_timezone(&self.tz)
    }

    fn wrap(&self, role: Role, text: &str) -> String {
        self.theme.wrap(role, text)
    }

    fn temperature(&self, celsius: f64) -> String {
        self.wrap(temperature_role(celsius), &format!("{celsius:.0}°C"))
    }

    fn percent(&self, percent: f64) -> String {
        self.wrap(rain_role(percent), &format!("{percent:.0}%"))
    }

    /// Glyph plus separating space, or nothing at all with emoji off.
    fn icon(&self, glyph: &str) -> String {
        if self.options.emoji { format!("{glyph} ") } else { String::new() }
    }

    fn condition_icon(&self, condition: &str) -> String {
        self.icon(glyph::condition_glyph(condition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Astro, Current, HourSample, Location};

    const EPOCH: i64 = 1_700_000_000; // Tue 14 Nov 2023 22:13:20 UTC

    fn hour(epoch: i64, temp: f64, rain: f64, condition: &str) -> HourSample {
        HourSample {
            epoch,
            temperature_c: temp,
            condition: condition.to_string(),
            chance_of_rain_pct: rain,
        }
    }

    fn snapshot(hours: Vec<HourSample>) -> WeatherSnapshot {
        WeatherSnapshot {
            location: Location { name: "Vigo".into(), country: "Spain".into() },
            current: Current {
                observed_at_epoch: EPOCH,
                temperature_c: 18.0,
                condition: "Parcialmente nublado".into(),
                wind_kph: 10.0,
                humidity_pct: 55,
            },
            forecast_days: vec![ForecastDay {
                max_temp_c: 20.0,
                min_temp_c: 15.0,
                daily_chance_of_rain_pct: 30,
                daily_will_rain: 0,
                astro: Astro { sunrise: "08:00 AM".into(), sunset: "08:00 PM".into() },
                hours,
            }],
        }
    }

    fn two_hours() -> Vec<HourSample> {
        vec![hour(EPOCH, 17.5, 10.0, "Despejado"), hour(EPOCH + 3600, 19.0, 20.0, "Soleado")]
    }

    fn render(snapshot: &WeatherSnapshot, options: DisplayOptions) -> String {
        let renderer = Renderer::with_timezone(options, Utc);
        let mut out = Vec::new();
        renderer.render_header(snapshot, &mut out).unwrap();
        renderer.render_all(snapshot, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn contains_any_glyph(s: &str) -> bool {
        glyph::ALL.iter().any(|g| s.contains(g))
    }

    #[test]
    fn plain_output_has_no_escapes_or_glyphs() {
        let out = render(&snapshot(two_hours()), DisplayOptions { color: false, emoji: false });

        assert!(!out.contains('\x1b'), "unexpected ANSI in:\n{out}");
        assert!(!contains_any_glyph(&out), "unexpected emoji in:\n{out}");
        for want in [
            "¡Buen día! Vigo, Spain",
            "Fecha: Tue 14 Nov 2023 22:13:20 UTC",
            "=== Tue 14 Nov 2023 (día 1/1)",
            "Hoy: Soleado",
            "  max:  20°C  avg:  18°C  min:  15°C",
            "  viento: 10 km/h  humedad: 55%",
            "  amanecer: 08:00 AM  atardecer: 08:00 PM",
            "22:13 Despejado - 18°C, 10%",
            "23:13 Soleado - 19°C, 20%",
        ] {
            assert!(out.contains(want), "expected {want:?} in:\n{out}");
        }
    }

    #[test]
    fn plain_lines_have_no_placeholder_whitespace() {
        let out = render(&snapshot(two_hours()), DisplayOptions::default());
        for line in out.lines() {
            assert_eq!(line, line.trim_end(), "trailing whitespace in {line:?}");
            assert!(!line.starts_with(' ') || line.starts_with("  "), "stray indent in {line:?}");
        }
        assert!(out.lines().any(|l| l.starts_with("¡Buen día!")));
        assert!(out.lines().any(|l| l.starts_with("Hoy:")));
    }

    #[test]
    fn color_and_emoji_decorate_output() {
        let out = render(&snapshot(two_hours()), DisplayOptions { color: true, emoji: true });

        assert!(out.contains("\x1b["));
        assert!(out.contains(&format!("{} ", glyph::PIN)));
        assert!(out.contains(&format!("{} \x1b[37mHoy:", glyph::SUN)));
        assert!(out.contains(&format!("{} ", glyph::UMBRELLA)));
        // 10% rain is dimmed, 20% is a plain value.
        assert!(out.contains("\x1b[90m10%\x1b[0m"));
        assert!(out.contains("\x1b[97m20%\x1b[0m"));
    }

    #[test]
    fn emoji_without_color_has_no_escapes() {
        let out = render(&snapshot(two_hours()), DisplayOptions { color: false, emoji: true });
        assert!(!out.contains('\x1b'));
        assert!(out.contains(&format!("{} Hoy: Soleado", glyph::SUN)));
    }

    #[test]
    fn hot_and_cold_temperatures_are_colored() {
        let mut snap =
            snapshot(vec![hour(EPOCH, 31.0, 0.0, "Soleado"), hour(EPOCH, 4.0, 75.0, "Nieve")]);
        snap.forecast_days[0].max_temp_c = 31.0;
        let out = render(&snap, DisplayOptions { color: true, emoji: false });

        assert!(out.contains("\x1b[31m31°C\x1b[0m"));
        assert!(out.contains("\x1b[34m4°C\x1b[0m"));
        assert!(out.contains("\x1b[33m75%\x1b[0m"));
    }

    #[test]
    fn empty_forecast_prints_only_notice() {
        let mut snap = snapshot(Vec::new());
        snap.forecast_days.clear();

        let renderer = Renderer::with_timezone(DisplayOptions { color: true, emoji: true }, Utc);
        let mut out = Vec::new();
        renderer.render_all(&snap, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "No Forecast available.\n");
    }

    #[test]
    fn day_without_hours_falls_back_to_current() {
        let mut snap = snapshot(Vec::new());
        snap.current.temperature_c = 23.0;
        snap.current.condition = "Niebla".into();
        let out = render(&snap, DisplayOptions::default());

        assert!(out.contains("avg:  23°C"), "{out}");
        assert!(out.contains("Hoy: Niebla"));
        assert!(!out.contains("NaN"));
        assert!(out.contains("(día 1/1)"));
    }

    #[test]
    fn out_of_range_index_is_reported_not_fatal() {
        let snap = snapshot(two_hours());
        let renderer = Renderer::with_timezone(DisplayOptions::default(), Utc);
        let mut out = Vec::new();

        renderer.render_day(&snap, 1, 1, &mut out).expect("must not fail");

        assert_eq!(String::from_utf8(out).unwrap(), "Invalid day index 1 (available: 0..0)\n");
    }

    #[test]
    fn every_day_is_rendered_in_order() {
        let mut snap = snapshot(two_hours());
        let mut second = snap.forecast_days[0].clone();
        second.hours = vec![hour(EPOCH + 86_400, 12.0, 0.0, "Nublado")];
        snap.forecast_days.push(second);

        let out = render(&snap, DisplayOptions::default());
        let first = out.find("(día 1/2)").expect("day 1");
        let next = out.find("=== Wed 15 Nov 2023 (día 2/2)").expect("day 2");
        assert!(first < next);
    }
}
