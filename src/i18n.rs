//! Display labels in English and Italian
//!
//! Names returned by the calculation service (planets, signs, cards, angles,
//! phases) are translated through small lookup tables. Unknown names are
//! shown as received.

use crate::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    It,
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "it" => Ok(Language::It),
            other => Err(AppError::validation(format!("Unsupported language: {other}"))),
        }
    }
}

/// `(key, english, italian)`
type Table = [(&'static str, &'static str, &'static str)];

const PLANETS: &Table = &[
    ("Sun", "Sun", "Sole"),
    ("Moon", "Moon", "Luna"),
    ("Mercury", "Mercury", "Mercurio"),
    ("Venus", "Venus", "Venere"),
    ("Mars", "Mars", "Marte"),
    ("Jupiter", "Jupiter", "Giove"),
    ("Saturn", "Saturn", "Saturno"),
    ("Uranus", "Uranus", "Urano"),
    ("Neptune", "Neptune", "Nettuno"),
    ("Pluto", "Pluto", "Plutone"),
];

const SIGNS: &Table = &[
    ("Aries", "Aries", "Ariete"),
    ("Taurus", "Taurus", "Toro"),
    ("Gemini", "Gemini", "Gemelli"),
    ("Cancer", "Cancer", "Cancro"),
    ("Leo", "Leo", "Leone"),
    ("Virgo", "Virgo", "Vergine"),
    ("Libra", "Libra", "Bilancia"),
    ("Scorpio", "Scorpio", "Scorpione"),
    ("Sagittarius", "Sagittarius", "Sagittario"),
    ("Capricorn", "Capricorn", "Capricorno"),
    ("Aquarius", "Aquarius", "Acquario"),
    ("Pisces", "Pisces", "Pesci"),
];

const CARDS: &Table = &[
    ("Rider", "Rider", "Cavaliere"),
    ("Clover", "Clover", "Trifoglio"),
    ("Ship", "Ship", "Nave"),
    ("House", "House", "Casa"),
    ("Tree", "Tree", "Albero"),
    ("Clouds", "Clouds", "Nuvole"),
    ("Snake", "Snake", "Serpente"),
    ("Coffin", "Coffin", "Bara"),
    ("Bouquet", "Bouquet", "Mazzo di fiori"),
    ("Scythe", "Scythe", "Falce"),
    ("Whip", "Whip", "Frusta"),
    ("Birds", "Birds", "Uccelli"),
    ("Child", "Child", "Bambino"),
    ("Fox", "Fox", "Volpe"),
    ("Bear", "Bear", "Orso"),
    ("Stars", "Stars", "Stelle"),
    ("Stork", "Stork", "Cicogna"),
    ("Dog", "Dog", "Cane"),
    ("Tower", "Tower", "Torre"),
    ("Garden", "Garden", "Giardino"),
    ("Mountain", "Mountain", "Montagna"),
    ("Crossroads", "Crossroads", "Bivio"),
    ("Mice", "Mice", "Topi"),
    ("Heart", "Heart", "Cuore"),
    ("Ring", "Ring", "Anello"),
    ("Book", "Book", "Libro"),
    ("Letter", "Letter", "Lettera"),
    ("Man", "Man", "Uomo"),
    ("Woman", "Woman", "Donna"),
    ("Lily", "Lily", "Gigli"),
    ("Sun", "Sun", "Sole"),
    ("Moon", "Moon", "Luna"),
    ("Key", "Key", "Chiave"),
    ("Fish", "Fish", "Pesci"),
    ("Anchor", "Anchor", "Ancora"),
    ("Cross", "Cross", "Croce"),
];

const MONTHS: &Table = &[
    ("1", "January", "Gennaio"),
    ("2", "February", "Febbraio"),
    ("3", "March", "Marzo"),
    ("4", "April", "Aprile"),
    ("5", "May", "Maggio"),
    ("6", "June", "Giugno"),
    ("7", "July", "Luglio"),
    ("8", "August", "Agosto"),
    ("9", "September", "Settembre"),
    ("10", "October", "Ottobre"),
    ("11", "November", "Novembre"),
    ("12", "December", "Dicembre"),
];

// keys are lowercase, lookups lowercase the input
const ASPECTS: &Table = &[
    ("conjunction", "Conjunction", "Congiunzione"),
    ("opposition", "Opposition", "Opposizione"),
    ("trine", "Trine", "Trigono"),
    ("square", "Square", "Quadratura"),
    ("sextile", "Sextile", "Sestile"),
    ("quincunx", "Quincunx", "Quinconce"),
];

const ANGLES: &Table = &[
    ("Ascendant", "Ascendant", "Ascendente"),
    ("Descendant", "Descendant", "Discendente"),
    ("Midheaven", "Midheaven", "Medio Cielo"),
    ("Imum Coeli", "Imum Coeli", "Fondo Cielo"),
];

const MOON_PHASES: &Table = &[
    ("New Moon", "New Moon", "Luna Nuova"),
    ("Waxing Crescent", "Waxing Crescent", "Luna Crescente"),
    ("First Quarter", "First Quarter", "Primo Quarto"),
    ("Waxing Gibbous", "Waxing Gibbous", "Gibbosa Crescente"),
    ("Full Moon", "Full Moon", "Luna Piena"),
    ("Waning Gibbous", "Waning Gibbous", "Gibbosa Calante"),
    ("Last Quarter", "Last Quarter", "Ultimo Quarto"),
    ("Waning Crescent", "Waning Crescent", "Luna Calante"),
];

fn lookup(table: &Table, key: &str, language: Language) -> Option<&'static str> {
    table
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, en, it)| match language {
            Language::En => *en,
            Language::It => *it,
        })
}

fn translate(table: &Table, key: &str, language: Language) -> String {
    lookup(table, key, language).map_or_else(|| key.to_string(), str::to_string)
}

#[must_use]
pub fn translate_planet(planet: &str, language: Language) -> String {
    translate(PLANETS, planet, language)
}

#[must_use]
pub fn translate_sign(sign: &str, language: Language) -> String {
    translate(SIGNS, sign, language)
}

#[must_use]
pub fn translate_card(card: &str, language: Language) -> String {
    translate(CARDS, card, language)
}

/// Month name from its number, `1` to `12`
#[must_use]
pub fn translate_month(month: u32, language: Language) -> String {
    translate(MONTHS, &month.to_string(), language)
}

#[must_use]
pub fn translate_aspect(aspect: &str, language: Language) -> String {
    lookup(ASPECTS, &aspect.to_lowercase(), language)
        .map_or_else(|| aspect.to_string(), str::to_string)
}

#[must_use]
pub fn translate_angle(angle: &str, language: Language) -> String {
    translate(ANGLES, angle, language)
}

/// Phase name for a fraction of the synodic cycle
#[must_use]
pub fn phase_for_fraction(fraction: f64) -> &'static str {
    if !(0.03..=0.97).contains(&fraction) {
        "New Moon"
    } else if fraction < 0.25 {
        "Waxing Crescent"
    } else if fraction < 0.27 {
        "First Quarter"
    } else if fraction < 0.50 {
        "Waxing Gibbous"
    } else if fraction < 0.53 {
        "Full Moon"
    } else if fraction < 0.75 {
        "Waning Gibbous"
    } else if fraction < 0.77 {
        "Last Quarter"
    } else {
        "Waning Crescent"
    }
}

/// Translate a phase name. Names outside the table fall back to the phase
/// of the cycle fraction when one is known, else to the name as received.
#[must_use]
pub fn translate_moon_phase(phase_name: &str, fraction: Option<f64>, language: Language) -> String {
    lookup(MOON_PHASES, phase_name, language)
        .or_else(|| {
            fraction
                .filter(|f| f.is_finite())
                .and_then(|f| lookup(MOON_PHASES, phase_for_fraction(f), language))
        })
        .unwrap_or(phase_name)
        .to_string()
}

/// Fixed labels of the result views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    HoroscopeTitle,
    AspectsTitle,
    MoonPhaseTitle,
    TransitTitle,
    MonthMoonPhasesTitle,
    BirthInformation,
    Date,
    Time,
    Location,
    Planets,
    Houses,
    LenormandCard,
    Summary,
    TotalAspects,
    OrbUsed,
    Aspects,
    Phase,
    Age,
    Days,
    Illuminated,
    CycleFraction,
    JulianDate,
    MoonPosition,
    Sign,
    Decan,
    DegreeInSign,
    AbsoluteLongitude,
    ReferencePoints,
    AscendantLongitude,
    DescendantLongitude,
    Planet,
    TotalTransits,
    Period,
    Coordinates,
    TimezoneOffset,
    Degree,
    Longitude,
    TotalPhases,
    Events,
    CityFound,
}

impl Label {
    #[must_use]
    pub fn text(self, language: Language) -> &'static str {
        let (en, it) = match self {
            Label::HoroscopeTitle => ("Horoscope Data", "Dati Oroscopo"),
            Label::AspectsTitle => ("Aspects Data", "Dati Aspetti"),
            Label::MoonPhaseTitle => ("Moon Phase Data", "Dati Fase Lunare"),
            Label::TransitTitle => ("Planet Transit Data", "Dati Transiti Planetari"),
            Label::MonthMoonPhasesTitle => ("Month Moon Phases", "Fasi Lunari del Mese"),
            Label::BirthInformation => ("Birth Information", "Dati di Nascita"),
            Label::Date => ("Date", "Data"),
            Label::Time => ("Time", "Ora"),
            Label::Location => ("Location", "Luogo"),
            Label::Planets => ("Planets", "Pianeti"),
            Label::Houses => ("Houses", "Case"),
            Label::LenormandCard => ("Lenormand Card", "Carta Lenormand"),
            Label::Summary => ("Summary", "Riepilogo"),
            Label::TotalAspects => ("Total Aspects", "Aspetti Totali"),
            Label::OrbUsed => ("Orb Used", "Orbita Usata"),
            Label::Aspects => ("Aspects", "Aspetti"),
            Label::Phase => ("Phase", "Fase"),
            Label::Age => ("Age", "Età"),
            Label::Days => ("days", "giorni"),
            Label::Illuminated => ("Illuminated", "Illuminazione"),
            Label::CycleFraction => ("Cycle Fraction", "Frazione del Ciclo"),
            Label::JulianDate => ("Julian Date", "Data Giuliana"),
            Label::MoonPosition => ("Moon Position", "Posizione della Luna"),
            Label::Sign => ("Sign", "Segno"),
            Label::Decan => ("Decan", "Decano"),
            Label::DegreeInSign => ("Degree in Sign", "Grado nel Segno"),
            Label::AbsoluteLongitude => ("Absolute Longitude", "Longitudine Assoluta"),
            Label::ReferencePoints => ("Reference Points", "Punti di Riferimento"),
            Label::AscendantLongitude => ("Ascendant Longitude", "Longitudine Ascendente"),
            Label::DescendantLongitude => ("Descendant Longitude", "Longitudine Discendente"),
            Label::Planet => ("Planet", "Pianeta"),
            Label::TotalTransits => ("Total Transits", "Transiti Totali"),
            Label::Period => ("Period", "Periodo"),
            Label::Coordinates => ("Coordinates", "Coordinate"),
            Label::TimezoneOffset => ("Timezone Offset", "Fuso Orario"),
            Label::Degree => ("Degree", "Grado"),
            Label::Longitude => ("Longitude", "Longitudine"),
            Label::TotalPhases => ("Total Phases", "Fasi Totali"),
            Label::Events => ("Events", "Eventi"),
            Label::CityFound => ("City found", "Città trovata"),
        };
        match language {
            Language::En => en,
            Language::It => it,
        }
    }
}
