//! Form submission services
//!
//! A service owns the request state of one form: it validates the form,
//! resolves the location (geocoding a city when no coordinates are filled
//! in), builds the payload and calls the calculation API. A failed
//! submission records the error and leaves no result behind.

use crate::api::AstroApi;
use crate::geocoding::Geocoder;
use crate::models::{
    AspectsResponse, CalculationRequest, FormData, GeocodingResult, HoroscopeResponse,
    LocationFields, LocationForm, MonthMoonPhasesFormData, MonthMoonPhasesResponse,
    MoonPhaseResponse, TransitFormData, TransitRequest, TransitResponse,
};
use crate::models::Location;
use crate::validation::{self, LocationSpec};
use crate::{AppError, Result};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which birth-data calculation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationKind {
    Horoscope,
    Aspects,
    MoonPhase,
}

/// A result ready to be displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalculationResult {
    Horoscope(HoroscopeResponse),
    Aspects(AspectsResponse),
    MoonPhase(MoonPhaseResponse),
    Transit(TransitResponse),
    MonthMoonPhases(MonthMoonPhasesResponse),
}

/// Loading flag, last error and last result of one form
#[derive(Debug, Clone)]
pub struct RequestState<T> {
    loading: bool,
    error: Option<AppError>,
    data: Option<T>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
        }
    }
}

impl<T: Clone> RequestState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Mark a submission as started. Fails while another one is outstanding.
    ///
    /// [`Self::track`] holds `&mut self` for the whole submission, so this
    /// check only matters for callers driving `begin`/`finish` by hand.
    pub fn begin(&mut self) -> Result<()> {
        if self.loading {
            return Err(AppError::validation("A request is already in progress"));
        }
        self.loading = true;
        self.error = None;
        self.data = None;
        Ok(())
    }

    /// Record the outcome of the submission started by [`Self::begin`]
    pub fn finish(&mut self, outcome: Result<T>) -> Result<T> {
        self.loading = false;
        match outcome {
            Ok(data) => {
                self.data = Some(data.clone());
                Ok(data)
            }
            Err(e) => {
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Run `work` as one tracked submission. Dropping the returned future
    /// before it completes clears the loading flag.
    pub async fn track<F>(&mut self, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.begin()?;
        let in_flight = InFlight(self);
        let outcome = work.await;
        in_flight.0.finish(outcome)
    }
}

/// Resets the loading flag of an abandoned submission
struct InFlight<'a, T>(&'a mut RequestState<T>);

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        self.0.loading = false;
    }
}

/// Service for resolving a validated location into coordinates
pub struct LocationResolver;

impl LocationResolver {
    pub async fn resolve_location(
        geocoder: &dyn Geocoder,
        input: LocationSpec,
    ) -> Result<Location> {
        debug!("Resolving location input: {:?}", input);

        let location = match input {
            LocationSpec::Coordinates(location) => location,
            LocationSpec::City(name) => {
                let result = geocoder.search_city(&name).await?;
                Location::from(&result)
            }
        };

        debug!(
            "Resolved location: ({}, {})",
            location.latitude, location.longitude
        );

        Ok(location)
    }

    /// Geocode the city of a form and store the found coordinates in it
    pub async fn search_city<F: LocationFields + Default>(
        geocoder: &dyn Geocoder,
        form: &mut LocationForm<F>,
    ) -> Result<GeocodingResult> {
        let city = form.data.city().trim().to_string();
        if city.is_empty() {
            return Err(AppError::validation("City name is required"));
        }

        let result = geocoder.search_city(&city).await?;
        form.update_coordinates(result.latitude.to_string(), result.longitude.to_string());
        info!(
            "City '{}' resolved to {}",
            city,
            Location::from(&result).format_coordinates()
        );
        Ok(result)
    }
}

/// Horoscope, aspects and moon phase calculations for the birth-data form
pub struct HoroscopeService {
    api: Arc<dyn AstroApi>,
    geocoder: Arc<dyn Geocoder>,
    timezone_offset_hours: f64,
    pub state: RequestState<CalculationResult>,
    pub search_state: RequestState<GeocodingResult>,
}

impl HoroscopeService {
    pub fn new(
        api: Arc<dyn AstroApi>,
        geocoder: Arc<dyn Geocoder>,
        timezone_offset_hours: f64,
    ) -> Self {
        Self {
            api,
            geocoder,
            timezone_offset_hours,
            state: RequestState::default(),
            search_state: RequestState::default(),
        }
    }

    /// Search the form's city and fill in its coordinates
    pub async fn search_city(
        &mut self,
        form: &mut LocationForm<FormData>,
    ) -> Result<GeocodingResult> {
        let geocoder = self.geocoder.as_ref();
        self.search_state
            .track(LocationResolver::search_city(geocoder, form))
            .await
    }

    /// Validate the form and run one calculation
    pub async fn calculate(
        &mut self,
        kind: CalculationKind,
        form: &LocationForm<FormData>,
    ) -> Result<CalculationResult> {
        let work = Self::run(
            self.api.as_ref(),
            self.geocoder.as_ref(),
            self.timezone_offset_hours,
            kind,
            form,
        );
        self.state.track(work).await
    }

    async fn run(
        api: &dyn AstroApi,
        geocoder: &dyn Geocoder,
        timezone_offset_hours: f64,
        kind: CalculationKind,
        form: &LocationForm<FormData>,
    ) -> Result<CalculationResult> {
        let input = validation::validate_birth_form(&form.data, form.input_mode)?;
        let location = LocationResolver::resolve_location(geocoder, input.location).await?;
        let request =
            CalculationRequest::new(input.date, input.time, location, timezone_offset_hours);

        info!("Running {:?} calculation", kind);
        let result = match kind {
            CalculationKind::Horoscope => {
                CalculationResult::Horoscope(api.calculate_horoscope(&request).await?)
            }
            CalculationKind::Aspects => {
                CalculationResult::Aspects(api.calculate_aspects(&request).await?)
            }
            CalculationKind::MoonPhase => {
                CalculationResult::MoonPhase(api.calculate_moon_phase(&request).await?)
            }
        };
        Ok(result)
    }
}

/// Planet transit calculations for the transit form
pub struct TransitService {
    api: Arc<dyn AstroApi>,
    geocoder: Arc<dyn Geocoder>,
    timezone_offset_hours: f64,
    step_minutes: u32,
    pub state: RequestState<CalculationResult>,
    pub search_state: RequestState<GeocodingResult>,
}

impl TransitService {
    pub fn new(
        api: Arc<dyn AstroApi>,
        geocoder: Arc<dyn Geocoder>,
        timezone_offset_hours: f64,
        step_minutes: u32,
    ) -> Self {
        Self {
            api,
            geocoder,
            timezone_offset_hours,
            step_minutes,
            state: RequestState::default(),
            search_state: RequestState::default(),
        }
    }

    pub async fn search_city(
        &mut self,
        form: &mut LocationForm<TransitFormData>,
    ) -> Result<GeocodingResult> {
        let geocoder = self.geocoder.as_ref();
        self.search_state
            .track(LocationResolver::search_city(geocoder, form))
            .await
    }

    pub async fn calculate_transits(
        &mut self,
        form: &LocationForm<TransitFormData>,
    ) -> Result<CalculationResult> {
        let api = self.api.as_ref();
        let geocoder = self.geocoder.as_ref();
        let timezone_offset_hours = self.timezone_offset_hours;
        let step_minutes = self.step_minutes;

        let work = async move {
            let input = validation::validate_transit_form(&form.data, form.input_mode)?;
            let location = LocationResolver::resolve_location(geocoder, input.location).await?;
            let request = TransitRequest {
                year: input.year,
                month: input.month,
                latitude: location.latitude,
                longitude: location.longitude,
                timezone_offset_hours,
                planet: input.planet,
                step_minutes,
            };

            let response = api.calculate_transits(&request).await?;
            if response.transits.is_empty() {
                warn!(
                    "No transits of {} in {}/{}",
                    request.planet, request.month, request.year
                );
            }
            Ok(CalculationResult::Transit(response))
        };

        self.state.track(work).await
    }
}

/// Moon phases of a whole month
pub struct MonthMoonPhasesService {
    api: Arc<dyn AstroApi>,
    pub state: RequestState<CalculationResult>,
}

impl MonthMoonPhasesService {
    pub fn new(api: Arc<dyn AstroApi>) -> Self {
        Self {
            api,
            state: RequestState::default(),
        }
    }

    pub async fn calculate_month_moon_phases(
        &mut self,
        form: &MonthMoonPhasesFormData,
    ) -> Result<CalculationResult> {
        let api = self.api.as_ref();
        let work = async move {
            let request = validation::validate_month_form(form)?;
            let response = api.fetch_month_moon_phases(&request).await?;
            Ok(CalculationResult::MonthMoonPhases(response))
        };

        self.state.track(work).await
    }
}
