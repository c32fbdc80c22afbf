// ABOUTME: Public wire models for the travel checklist and chat citation contracts
// ABOUTME: Mirrors the frontend type definitions, with server-side required-field validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! Common data models for the Copiloto API
//!
//! The travel-form input uses `Option` for every field: the frontend
//! validates its form before submitting, but the server re-checks the
//! presence of the four fields the checklist prompt cannot be built
//! without. A zero or empty value counts as missing, matching the
//! truthiness semantics the frontend contract was built against.

use serde::{Deserialize, Serialize};

use crate::constants::checklist;
use crate::errors::AppError;

// ============================================================================
// Travel Form Input
// ============================================================================

/// Knowledge level of the user, selecting the tone of the checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserLevel {
    /// Little technical knowledge; plain language, full explanations
    Beginner,
    /// Basic mechanical knowledge; brief technical explanations
    Intermediate,
    /// Technical background; direct, terminology allowed
    Advanced,
}

impl UserLevel {
    /// Wire representation of the level
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

/// Cargo load classification for the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CargoLoad {
    /// Light cargo
    Light,
    /// Medium cargo
    Medium,
    /// Heavy cargo
    Heavy,
}

impl CargoLoad {
    /// Wire representation of the load
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

/// Structured travel/vehicle form data for checklist generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelInput {
    /// Trip distance in kilometers
    pub distance: Option<f64>,
    /// Route type (highway, urban, mixed, offroad)
    pub route_type: Option<String>,
    /// Vehicle type (e.g. "Carro", "Moto")
    pub vehicle_type: Option<String>,
    /// Vehicle model year
    pub vehicle_year: Option<u32>,
    /// Vehicle brand
    pub vehicle_brand: Option<String>,
    /// Vehicle model
    pub vehicle_model: Option<String>,
    /// Odometer reading at the last maintenance, in km
    pub last_maintenance_km: Option<u64>,
    /// Current odometer reading, in km
    pub current_mileage: Option<u64>,
    /// Active dashboard warning lights
    pub warning_lights: Option<Vec<String>>,
    /// Reported symptoms
    pub symptoms: Option<Vec<String>>,
    /// Time available for checks, in minutes
    pub available_time: Option<u32>,
    /// User knowledge level
    pub user_level: Option<UserLevel>,
    /// Trip duration in days
    pub travel_duration: Option<u32>,
    /// Number of passengers
    pub passengers: Option<u32>,
    /// Cargo load classification
    pub cargo: Option<CargoLoad>,
}

impl TravelInput {
    /// Check the presence of the fields the prompt cannot be built without
    ///
    /// # Errors
    ///
    /// Returns a 400 error listing all required form fields when
    /// `distance`, `routeType`, `vehicleType`, or `vehicleYear` is absent,
    /// zero, or empty.
    pub fn validate_required(&self) -> Result<(), AppError> {
        let missing = self.distance.is_none_or(|d| d == 0.0)
            || self.route_type.as_deref().is_none_or(str::is_empty)
            || self.vehicle_type.as_deref().is_none_or(str::is_empty)
            || self.vehicle_year.is_none_or(|y| y == 0);

        if missing {
            return Err(AppError::missing_fields(
                "Campos obrigatórios faltando",
                &checklist::REQUIRED_FIELDS,
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Checklist Output
// ============================================================================

/// One verification item in the generated checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Item category (e.g. Pneus, Fluidos, Documentos)
    pub category: String,
    /// Description of the verification
    pub item: String,
    /// Priority (essential, recommended, optional)
    pub priority: ItemPriority,
    /// Explanation, present for non-advanced users
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Estimated time in minutes
    #[serde(rename = "estimatedTime")]
    pub estimated_time: f64,
}

/// Priority of a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemPriority {
    /// Must be checked before departure
    Essential,
    /// Should be checked when time allows
    Recommended,
    /// Nice to have
    Optional,
}

/// A detected risk condition in the generated checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedFlag {
    /// Identified problem
    pub issue: String,
    /// Severity (warning, critical)
    pub severity: RedFlagSeverity,
    /// What to do about it
    pub recommendation: String,
}

/// Severity of a red flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedFlagSeverity {
    /// Should be looked at before the trip
    Warning,
    /// Do not travel before resolving
    Critical,
}

/// Complete checklist payload produced by the AI model
///
/// The proxy does not validate the model's output against this shape; it
/// only injects `generated_by_ai: true` after a successful JSON parse.
/// The typed struct exists for consumers of the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistResponse {
    /// Always `true`; injected by the proxy
    pub generated_by_ai: bool,
    /// Full prioritized checklist
    pub checklist: Vec<ChecklistItem>,
    /// Items that must be checked even with little time
    pub essential_items: Vec<ChecklistItem>,
    /// Detected risk conditions
    pub red_flags: Vec<RedFlag>,
    /// Follow-up questions when the form data was incomplete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_to_user: Option<Vec<String>>,
    /// Total estimated time in minutes
    pub total_estimated_time: f64,
    /// Brief assessment summary
    pub summary: String,
}

// ============================================================================
// Chat Citations
// ============================================================================

/// Descriptive source metadata attached to an assistant reply
///
/// Sourced verbatim from the AI response; no validation beyond
/// optional-field presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Source document name
    pub source: String,
    /// Page reference, when the model provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<serde_json::Value>,
    /// Section reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Quoted excerpt
    pub excerpt: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn valid_input() -> TravelInput {
        serde_json::from_value(serde_json::json!({
            "distance": 500,
            "routeType": "highway",
            "vehicleType": "Carro",
            "vehicleYear": 2020,
            "vehicleBrand": "VW",
            "vehicleModel": "Polo",
            "availableTime": 30,
            "userLevel": "beginner"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_input_passes_validation() {
        assert!(valid_input().validate_required().is_ok());
    }

    #[test]
    fn test_missing_route_type_fails_validation() {
        let mut input = valid_input();
        input.route_type = None;
        let err = input.validate_required().unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.message, "Campos obrigatórios faltando");
    }

    #[test]
    fn test_zero_distance_counts_as_missing() {
        let mut input = valid_input();
        input.distance = Some(0.0);
        assert!(input.validate_required().is_err());
    }

    #[test]
    fn test_empty_vehicle_type_counts_as_missing() {
        let mut input = valid_input();
        input.vehicle_type = Some(String::new());
        assert!(input.validate_required().is_err());
    }

    #[test]
    fn test_snake_case_aliases_are_not_accepted_for_camel_case_fields() {
        // The form contract is camelCase only; unknown keys are ignored.
        let input: TravelInput = serde_json::from_value(serde_json::json!({
            "route_type": "highway"
        }))
        .unwrap();
        assert!(input.route_type.is_none());
    }

    #[test]
    fn test_citation_tolerates_string_or_numeric_pages() {
        let with_number: Citation = serde_json::from_value(serde_json::json!({
            "source": "Manual do Proprietário",
            "page": 42,
            "excerpt": "Verifique o nível do óleo com o motor frio."
        }))
        .unwrap();
        assert_eq!(with_number.page, Some(serde_json::json!(42)));
        assert!(with_number.section.is_none());

        let with_string: Citation = serde_json::from_value(serde_json::json!({
            "source": "Manual do Proprietário",
            "page": "42-43",
            "section": "Lubrificação",
            "excerpt": "..."
        }))
        .unwrap();
        assert_eq!(with_string.page, Some(serde_json::json!("42-43")));
    }

    #[test]
    fn test_checklist_response_round_trip() {
        let raw = serde_json::json!({
            "generated_by_ai": true,
            "checklist": [{
                "category": "Pneus",
                "item": "Verificar calibragem",
                "priority": "essential",
                "explanation": "Pneus murchos aumentam o consumo",
                "estimatedTime": 5
            }],
            "essential_items": [],
            "red_flags": [{
                "issue": "Luz de freio acesa",
                "severity": "critical",
                "recommendation": "Levar ao mecânico antes de viajar"
            }],
            "total_estimated_time": 5,
            "summary": "Veículo em boas condições"
        });

        let parsed: ChecklistResponse = serde_json::from_value(raw).unwrap();
        assert!(parsed.generated_by_ai);
        assert_eq!(parsed.checklist[0].priority, ItemPriority::Essential);
        assert_eq!(parsed.red_flags[0].severity, RedFlagSeverity::Critical);
    }
}
