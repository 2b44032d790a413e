//! Text rendering of calculation results
//!
//! Each renderer produces the plain-text report printed by the CLI. Labels
//! and service-provided names go through [`crate::i18n`].

use crate::AppError;
use crate::i18n::{
    Label, Language, translate_angle, translate_aspect, translate_card, translate_month,
    translate_moon_phase, translate_planet, translate_sign,
};
use crate::models::{
    AspectsResponse, GeocodingResult, HoroscopeResponse, MonthMoonPhasesResponse,
    MoonPhaseResponse, PositionData, TransitResponse,
};
use crate::service::CalculationResult;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Title shown above a result
#[must_use]
pub fn title(result: &CalculationResult) -> Label {
    match result {
        CalculationResult::Horoscope(_) => Label::HoroscopeTitle,
        CalculationResult::Aspects(_) => Label::AspectsTitle,
        CalculationResult::MoonPhase(_) => Label::MoonPhaseTitle,
        CalculationResult::Transit(_) => Label::TransitTitle,
        CalculationResult::MonthMoonPhases(_) => Label::MonthMoonPhasesTitle,
    }
}

/// Render a result with its title
#[must_use]
pub fn render(result: &CalculationResult, language: Language) -> String {
    let body = match result {
        CalculationResult::Horoscope(data) => render_horoscope(data, language),
        CalculationResult::Aspects(data) => render_aspects(data, language),
        CalculationResult::MoonPhase(data) => render_moon_phase(data, language),
        CalculationResult::Transit(data) => render_transits(data, language),
        CalculationResult::MonthMoonPhases(data) => render_month_moon_phases(data, language),
    };

    let title = title(result).text(language);
    format!("{title}\n{}\n{body}", "=".repeat(title.chars().count()))
}

/// Errors are shown verbatim with their code
#[must_use]
pub fn render_error(error: &AppError) -> String {
    format!("[{}] {}", error.code, error.message)
}

fn heading(text: &str) -> String {
    format!("\n{text}\n{}", "-".repeat(text.chars().count()))
}

fn position_lines<'a>(
    positions: impl IntoIterator<Item = (&'a String, &'a PositionData)>,
    translate_key: impl Fn(&str) -> String,
    language: Language,
) -> Vec<String> {
    positions
        .into_iter()
        .map(|(name, data)| {
            format!(
                "  {}: {} ({:.2}°)",
                translate_key(name),
                translate_sign(&data.sign, language),
                data.degree_in_sign
            )
        })
        .collect()
}

#[must_use]
pub fn render_horoscope(data: &HoroscopeResponse, language: Language) -> String {
    let birth = &data.birth_data;
    let mut lines = vec![heading(Label::BirthInformation.text(language))];
    lines.push(format!(
        "  {}: {}/{}/{}",
        Label::Date.text(language),
        birth.date.day,
        birth.date.month,
        birth.date.year
    ));
    lines.push(format!(
        "  {}: {}:{:02}:{:02}",
        Label::Time.text(language),
        birth.time.hour,
        birth.time.minute,
        birth.time.second
    ));
    lines.push(format!(
        "  {}: {}°N, {}°E",
        Label::Location.text(language),
        birth.location.latitude,
        birth.location.longitude
    ));

    lines.push(heading(Label::Planets.text(language)));
    lines.extend(position_lines(
        &data.horoscope.planets,
        |planet| translate_planet(planet, language),
        language,
    ));

    // House keys are "1".."12"; non-numeric keys go last in service order
    let mut houses: Vec<_> = data.horoscope.houses.iter().collect();
    houses.sort_by_key(|(number, _)| number.trim().parse::<u32>().unwrap_or(u32::MAX));

    lines.push(heading(Label::Houses.text(language)));
    lines.extend(position_lines(houses, str::to_string, language));

    if let Some(card) = &data.lenormand_card {
        lines.push(heading(Label::LenormandCard.text(language)));
        lines.push(format!(
            "  {} ({} {}, {} {})",
            translate_card(&card.card, language),
            translate_planet("Moon", language),
            translate_sign(&card.moon_sign, language),
            Label::Decan.text(language),
            card.moon_decan
        ));
    }

    lines.join("\n")
}

#[must_use]
pub fn render_aspects(data: &AspectsResponse, language: Language) -> String {
    let mut lines = vec![heading(Label::Summary.text(language))];
    lines.push(format!(
        "  {}: {}",
        Label::TotalAspects.text(language),
        data.aspect_count
    ));
    lines.push(format!("  {}: {}°", Label::OrbUsed.text(language), data.orb_used));

    lines.push(heading(Label::Aspects.text(language)));
    for aspect in &data.aspects {
        lines.push(format!(
            "  {} - {}: {} {:.2}° ±{:.2}°",
            translate_planet(&aspect.planet1, language),
            translate_planet(&aspect.planet2, language),
            translate_aspect(&aspect.aspect, language),
            aspect.degrees,
            aspect.orb
        ));
    }

    lines.join("\n")
}

#[must_use]
pub fn render_moon_phase(data: &MoonPhaseResponse, language: Language) -> String {
    let phase = &data.moon_phase;
    let mut lines = vec![heading(Label::Phase.text(language))];
    lines.push(format!(
        "  {} {}",
        phase_emoji(&phase.phase_name),
        translate_moon_phase(&phase.phase_name, Some(phase.fraction_of_cycle), language)
    ));
    lines.push(format!(
        "  {}: {:.1} {}",
        Label::Age.text(language),
        phase.age_days,
        Label::Days.text(language)
    ));
    lines.push(format!(
        "  {}: {}",
        Label::Illuminated.text(language),
        format_percentage(phase.illuminated_fraction)
    ));
    lines.push(format!(
        "  {}: {:.3}",
        Label::CycleFraction.text(language),
        phase.fraction_of_cycle
    ));
    lines.push(format!(
        "  {}: {:.4}",
        Label::JulianDate.text(language),
        phase.julian_date
    ));

    if let Some(position) = &data.moon_position {
        lines.push(heading(Label::MoonPosition.text(language)));
        lines.push(format!(
            "  {}: {}",
            Label::Sign.text(language),
            translate_sign(&position.sign, language)
        ));
        lines.push(format!("  {}: {}", Label::Decan.text(language), position.decan));
        lines.push(format!(
            "  {}: {:.2}°",
            Label::DegreeInSign.text(language),
            position.degree_in_sign
        ));
        lines.push(format!(
            "  {}: {:.2}°",
            Label::AbsoluteLongitude.text(language),
            position.absolute_longitude
        ));
    }

    if let Some(points) = &data.reference_points {
        lines.push(heading(Label::ReferencePoints.text(language)));
        lines.push(format!(
            "  {}: {:.2}°",
            Label::AscendantLongitude.text(language),
            points.ascendant_longitude
        ));
        lines.push(format!(
            "  {}: {:.2}°",
            Label::DescendantLongitude.text(language),
            points.descendant_longitude
        ));
    }

    lines.join("\n")
}

#[must_use]
pub fn render_transits(data: &TransitResponse, language: Language) -> String {
    let params = &data.parameters;
    let mut lines = vec![heading(Label::Summary.text(language))];
    lines.push(format!(
        "  {}: {}",
        Label::Planet.text(language),
        translate_planet(&params.planet, language)
    ));
    lines.push(format!(
        "  {}: {}",
        Label::TotalTransits.text(language),
        data.total_transits
    ));
    lines.push(format!(
        "  {}: {}/{}",
        Label::Period.text(language),
        translate_month(params.month, language),
        params.year
    ));

    lines.push(heading(Label::Location.text(language)));
    lines.push(format!(
        "  {}: {:.4}°N, {:.4}°E",
        Label::Coordinates.text(language),
        params.location.latitude,
        params.location.longitude
    ));
    lines.push(format!(
        "  {}: {}h",
        Label::TimezoneOffset.text(language),
        params.location.timezone_offset_hours
    ));

    lines.push(heading(Label::Events.text(language)));
    for transit in &data.transits {
        lines.push(format!(
            "  {} {} | {}",
            angle_icon(&transit.angle),
            translate_angle(&transit.angle, language),
            format_transit_time(&transit.datetime_local, language)
        ));
        lines.push(format!(
            "     {} | {} {:.2}° | {} {} | {} {:.2}°",
            translate_sign(&transit.sign, language),
            Label::Degree.text(language),
            transit.degree_in_sign,
            Label::Decan.text(language),
            transit.decan,
            Label::Longitude.text(language),
            transit.longitude
        ));
    }

    lines.join("\n")
}

#[must_use]
pub fn render_month_moon_phases(data: &MonthMoonPhasesResponse, language: Language) -> String {
    let mut lines = vec![format!(
        "{}/{} | {}: {}",
        data.request_data.year,
        data.request_data.month,
        Label::TotalPhases.text(language),
        data.month_moon_phases.len()
    )];

    for phase in &data.month_moon_phases {
        lines.push(format!(
            "  {} {} | {} | {}: {:.1} {} | {}: {}",
            phase_emoji(&phase.phase_name),
            format_long_date(&phase.date, language),
            translate_moon_phase(&phase.phase_name, phase.fraction_of_cycle, language),
            Label::Age.text(language),
            phase.age_days,
            Label::Days.text(language),
            Label::Illuminated.text(language),
            format_percentage(phase.illuminated_fraction)
        ));
    }

    lines.join("\n")
}

#[must_use]
pub fn render_geocoding(result: &GeocodingResult, language: Language) -> String {
    let mut lines = vec![format!(
        "{}: {}",
        Label::CityFound.text(language),
        result.display_name
    )];
    lines.push(format!(
        "  {}: {:.4}, {:.4}",
        Label::Coordinates.text(language),
        result.latitude,
        result.longitude
    ));
    if result.country.is_empty() {
        lines.push(format!("  {}", result.city));
    } else {
        lines.push(format!("  {}, {}", result.city, result.country));
    }
    lines.join("\n")
}

/// `0.987` → `98.7%`
#[must_use]
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// `2025-03-04T06:12:00` → `Mar 4, 2025, 06:12:00`; unparsable input is kept
#[must_use]
pub fn format_transit_time(value: &str, language: Language) -> String {
    let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") else {
        return value.to_string();
    };
    let month = translate_month(datetime.month(), language);
    let short_month: String = month.chars().take(3).collect();
    match language {
        Language::En => format!(
            "{short_month} {}, {}, {}",
            datetime.day(),
            datetime.year(),
            datetime.format("%H:%M:%S")
        ),
        Language::It => format!(
            "{} {} {}, {}",
            datetime.day(),
            short_month.to_lowercase(),
            datetime.year(),
            datetime.format("%H:%M:%S")
        ),
    }
}

/// `2024-05-01` → `May 1, 2024` / `1 maggio 2024`; unparsable input is kept
#[must_use]
pub fn format_long_date(value: &str, language: Language) -> String {
    let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        return value.to_string();
    };
    let month = translate_month(date.month(), language);
    match language {
        Language::En => format!("{month} {}, {}", date.day(), date.year()),
        Language::It => format!("{} {} {}", date.day(), month.to_lowercase(), date.year()),
    }
}

#[must_use]
pub fn phase_emoji(phase_name: &str) -> &'static str {
    match phase_name {
        "New Moon" => "🌑",
        "Waxing Crescent" => "🌒",
        "First Quarter" => "🌓",
        "Waxing Gibbous" => "🌔",
        "Full Moon" => "🌕",
        "Waning Gibbous" => "🌖",
        "Last Quarter" => "🌗",
        "Waning Crescent" => "🌘",
        _ => "🌙",
    }
}

#[must_use]
pub fn angle_icon(angle: &str) -> &'static str {
    match angle {
        "Ascendant" => "⬆️",
        "Descendant" => "⬇️",
        "Midheaven" => "🔝",
        "Imum Coeli" => "🔻",
        _ => "📍",
    }
}
