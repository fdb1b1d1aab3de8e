//! Origin-request enrichment.
//!
//! Derives the viewer country and UTC offset from CDN headers and attaches
//! them as `X-Country`/`HTTP_X_COUNTRY` and `X-Time-Zone`/`HTTP_X_TIME_ZONE`.
//!
//! # Failure policy
//! [`RequestEnricher::enrich`] reports problems as `Err`. [`RequestEnricher::handle`]
//! is the platform boundary: it logs the error and forwards the request with
//! whatever headers were attached before the failure. Enrichment never blocks
//! a request.

use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::{EnrichmentConfig, TimezoneFallback};
use crate::edge::event::{CfPayload, DistributionConfig, EdgeEvent, InboundRequest};
use crate::edge::headers::{
    EdgeHeaders, HTTP_X_COUNTRY, HTTP_X_TIME_ZONE, VIEWER_COUNTRY, VIEWER_TIME_ZONE, X_COUNTRY,
    X_TIME_ZONE,
};
use crate::edge::offset::format_offset;
use crate::edge::timezone::{TimezoneOffsetResolver, UnknownZoneError};
use crate::observability::metrics;

/// Errors raised while enriching a single request.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    UnknownZone(#[from] UnknownZoneError),

    #[error("enrichment panicked: {0}")]
    Panicked(String),
}

/// Viewer signals read from one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentContext {
    pub viewer_country: Option<String>,
    pub viewer_timezone_name: Option<String>,
}

impl EnrichmentContext {
    pub fn from_headers(headers: &EdgeHeaders) -> Self {
        Self {
            viewer_country: headers.first_value(VIEWER_COUNTRY).map(str::to_string),
            viewer_timezone_name: headers.first_value(VIEWER_TIME_ZONE).map(str::to_string),
        }
    }
}

/// Where a derived header pair came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    Viewer,
    Fallback,
}

impl Derivation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentOutcome {
    pub country: Derivation,
    pub timezone: Derivation,
}

/// Attaches geolocation headers to origin requests.
#[derive(Debug, Clone, Default)]
pub struct RequestEnricher {
    resolver: TimezoneOffsetResolver,
    config: EnrichmentConfig,
}

impl RequestEnricher {
    pub fn new(config: EnrichmentConfig) -> Self {
        Self {
            resolver: TimezoneOffsetResolver::new(),
            config,
        }
    }

    /// Platform entry point. Always yields the request to forward unless the
    /// event carries no request at all.
    pub fn handle(&self, event: EdgeEvent) -> Option<InboundRequest> {
        let Some(record) = event.records.into_iter().next() else {
            tracing::error!("Edge event carried no records; nothing to forward");
            metrics::record_enrichment("no_record");
            return None;
        };

        let CfPayload { config, mut request } = record.cf;
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.enrich(&mut request, &config)))
            .unwrap_or_else(|payload| Err(EnrichError::Panicked(panic_message(payload.as_ref()))));

        match result {
            Ok(outcome) => {
                tracing::debug!(
                    uri = %request.uri,
                    country = outcome.country.as_str(),
                    timezone = outcome.timezone.as_str(),
                    "Request enriched"
                );
                metrics::record_enrichment("ok");
            }
            Err(e) => {
                tracing::error!(
                    distribution_id = %config.distribution_id,
                    event_type = %config.event_type,
                    uri = %request.uri,
                    error = %e,
                    "An error occurred enriching the request; forwarding it as is"
                );
                metrics::record_enrichment("suppressed");
            }
        }

        Some(request)
    }

    /// Enrich using the current time for offset resolution.
    pub fn enrich(
        &self,
        request: &mut InboundRequest,
        config: &DistributionConfig,
    ) -> Result<EnrichmentOutcome, EnrichError> {
        self.enrich_at(request, config, Utc::now())
    }

    /// Enrich, resolving daylight-saving state at `instant`.
    ///
    /// The country pair is always written before the time zone is resolved,
    /// so a time zone failure leaves it in place.
    pub fn enrich_at(
        &self,
        request: &mut InboundRequest,
        config: &DistributionConfig,
        instant: DateTime<Utc>,
    ) -> Result<EnrichmentOutcome, EnrichError> {
        let context = EnrichmentContext::from_headers(&request.headers);
        let country = self.apply_country(request, config, &context);
        let timezone = self.apply_timezone(request, config, &context, instant)?;
        Ok(EnrichmentOutcome { country, timezone })
    }

    fn apply_country(
        &self,
        request: &mut InboundRequest,
        config: &DistributionConfig,
        context: &EnrichmentContext,
    ) -> Derivation {
        let (value, derivation) = match &context.viewer_country {
            Some(country) => (country.clone(), Derivation::Viewer),
            None => {
                tracing::info!(
                    distribution_id = %config.distribution_id,
                    event_type = %config.event_type,
                    uri = %request.uri,
                    "{VIEWER_COUNTRY} not found"
                );
                metrics::record_fallback("country");
                (self.config.fallback_country.clone(), Derivation::Fallback)
            }
        };

        request.headers.set_single(HTTP_X_COUNTRY, value.clone());
        request.headers.set_single(X_COUNTRY, value);
        derivation
    }

    fn apply_timezone(
        &self,
        request: &mut InboundRequest,
        config: &DistributionConfig,
        context: &EnrichmentContext,
        instant: DateTime<Utc>,
    ) -> Result<Derivation, EnrichError> {
        let Some(name) = &context.viewer_timezone_name else {
            tracing::info!(
                distribution_id = %config.distribution_id,
                event_type = %config.event_type,
                uri = %request.uri,
                fallback = ?self.config.timezone_fallback,
                "{VIEWER_TIME_ZONE} not found"
            );
            metrics::record_fallback("timezone");
            // Country mode: the country pair already written stands alone.
            if self.config.timezone_fallback == TimezoneFallback::Utc {
                set_timezone(&mut request.headers, format_offset(0));
            }
            return Ok(Derivation::Fallback);
        };

        let offset = self.resolver.resolve_at(name, instant)?;
        set_timezone(&mut request.headers, format_offset(offset));
        Ok(Derivation::Viewer)
    }
}

fn set_timezone(headers: &mut EdgeHeaders, value: String) {
    headers.set_single(HTTP_X_TIME_ZONE, value.clone());
    headers.set_single(X_TIME_ZONE, value);
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
