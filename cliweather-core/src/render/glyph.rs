//! Emoji decoration. Condition glyphs come from an ordered keyword table where
//! the first matching group wins.

pub const PIN: &str = "\u{1F4CD}";
pub const CALENDAR: &str = "\u{1F4C5}";
pub const TEMP_MAX: &str = "\u{1F53A}";
pub const TEMP_AVG: &str = "\u{1F4CA}";
pub const TEMP_MIN: &str = "\u{1F53B}";
pub const WIND: &str = "\u{1F4A8}";
pub const HUMIDITY: &str = "\u{1F4A7}";
pub const SUNRISE: &str = "\u{1F305}";
pub const SUNSET: &str = "\u{1F307}";
pub const UMBRELLA: &str = "\u{2614}\u{FE0F}";

pub const SUN: &str = "\u{2600}\u{FE0F}";
pub const PARTLY_CLOUDY: &str = "\u{26C5}\u{FE0F}";
pub const CLOUD: &str = "\u{2601}\u{FE0F}";
pub const RAIN: &str = "\u{1F327}\u{FE0F}";
pub const STORM: &str = "\u{26C8}\u{FE0F}";
pub const SNOW: &str = "\u{2744}\u{FE0F}";
pub const FOG: &str = "\u{1F32B}\u{FE0F}";
pub const PARTLY_SUNNY: &str = "\u{1F324}\u{FE0F}";

/// Keywords are lowercase, matched as substrings of the lowercased condition.
const CONDITION_GLYPHS: &[(&[&str], &str)] = &[
    (&["soleado", "despejado", "sunny", "clear"], SUN),
    (&["parcial", "partly", "intervals"], PARTLY_CLOUDY),
    (&["nublado", "cloud"], CLOUD),
    (&["lluvia", "rain", "chubasc"], RAIN),
    (&["tormenta", "thunder"], STORM),
    (&["nieve", "snow"], SNOW),
    (&["niebla", "fog", "mist"], FOG),
    (&["viento", "wind"], WIND),
];

pub fn condition_glyph(condition: &str) -> &'static str {
    let lower = condition.to_lowercase();
    CONDITION_GLYPHS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, glyph)| *glyph)
        .unwrap_or(PARTLY_SUNNY)
}

/// Every glyph the renderer can emit.
pub const ALL: &[&str] = &[
    PIN, CALENDAR, TEMP_MAX, TEMP_AVG, TEMP_MIN, WIND, HUMIDITY, SUNRISE, SUNSET, UMBRELLA, SUN,
    PARTLY_CLOUDY, CLOUD, RAIN, STORM, SNOW, FOG, PARTLY_SUNNY,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_group_wins() {
        // "parcial" is checked before "nublado" and "lluvia".
        assert_eq!(condition_glyph("Parcialmente nublado con lluvia"), PARTLY_CLOUDY);
        assert_eq!(condition_glyph("Partly cloudy"), PARTLY_CLOUDY);
        assert_eq!(condition_glyph("Moderate or heavy rain with thunder"), RAIN);
        assert_eq!(condition_glyph("Cielo nublado"), CLOUD);
    }

    #[test]
    fn matches_each_group() {
        assert_eq!(condition_glyph("Soleado"), SUN);
        assert_eq!(condition_glyph("Despejado"), SUN);
        assert_eq!(condition_glyph("Sunny intervals"), SUN);
        assert_eq!(condition_glyph("Cloudy"), CLOUD);
        assert_eq!(condition_glyph("Lluvia moderada"), RAIN);
        assert_eq!(condition_glyph("Chubascos ligeros"), RAIN);
        assert_eq!(condition_glyph("Thundery outbreaks possible"), STORM);
        assert_eq!(condition_glyph("Nieve moderada"), SNOW);
        assert_eq!(condition_glyph("Blowing snow"), SNOW);
        assert_eq!(condition_glyph("Niebla"), FOG);
        assert_eq!(condition_glyph("Mist"), FOG);
        assert_eq!(condition_glyph("Viento fuerte"), WIND);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(condition_glyph("SOLEADO"), SUN);
        assert_eq!(condition_glyph("pArTlY cloudy"), PARTLY_CLOUDY);
    }

    #[test]
    fn unknown_condition_gets_default() {
        assert_eq!(condition_glyph("Overcast"), PARTLY_SUNNY);
        assert_eq!(condition_glyph(""), PARTLY_SUNNY);
    }
}
