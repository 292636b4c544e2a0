//! Frame analysis results to alerts
//!
//! The analyzer answers with a JSON object. Anything it returns that cannot
//! be decoded degrades to a low-threat fallback instead of an error, so a
//! flaky analyzer never takes the tile down.

use sentinel_core::{AlertCategory, AnalysisResult, SecurityAlert, Severity, StreamId, ThreatLevel};

/// Description used when the analyzer flags a threat without explaining it
pub const DEFAULT_ANOMALY_DESCRIPTION: &str = "AI Anomaly Detected";

const FALLBACK_DESCRIPTION: &str = "Analysis failed due to error.";

/// Low-threat result reported when analysis fails
#[must_use]
pub fn fallback_analysis() -> AnalysisResult {
    AnalysisResult {
        detected_objects: Vec::new(),
        threat_level: ThreatLevel::Low,
        description: Some(FALLBACK_DESCRIPTION.to_string()),
        license_plates: None,
        faces_detected: None,
    }
}

/// Decode an analyzer response body
///
/// Empty bodies decode as `{}`, which is a low-threat result with no
/// detections.
#[must_use]
pub fn decode_analysis(body: &str) -> AnalysisResult {
    let body = if body.trim().is_empty() { "{}" } else { body };
    match serde_json::from_str(body) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "frame analysis response could not be decoded");
            fallback_analysis()
        }
    }
}

/// Raise an alert for a medium or high threat
///
/// High threats become `UNAUTHORIZED`, medium threats `VEHICLE`; low
/// threats produce nothing.
#[must_use]
pub fn alert_from_analysis(
    stream_id: &StreamId,
    result: &AnalysisResult,
    thumbnail: Option<&str>,
) -> Option<SecurityAlert> {
    let (category, severity) = match result.threat_level {
        ThreatLevel::High => (AlertCategory::Unauthorized, Severity::High),
        ThreatLevel::Medium => (AlertCategory::Vehicle, Severity::Medium),
        ThreatLevel::Low => return None,
    };

    let description = result
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_ANOMALY_DESCRIPTION);

    let mut alert = SecurityAlert::new(stream_id.clone(), category, severity, description);
    alert.thumbnail = thumbnail.map(str::to_string);
    Some(alert)
}
