// ABOUTME: Deterministic prompt construction for checklist generation
// ABOUTME: Builds the Portuguese system and user prompts from the travel form
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Copiloto Veicular

//! Prompt builders for checklist generation
//!
//! Both prompts are pure functions of the form input. The system prompt
//! fixes the response contract and adapts the tone to the user's level;
//! the user prompt restates the form, with the warning-light and symptom
//! sections present only when non-empty.

use crate::models::{TravelInput, UserLevel};
use std::fmt::Write as _;

/// Tone instruction for each user level
const fn level_description(level: UserLevel) -> &'static str {
    match level {
        UserLevel::Beginner => {
            "Use linguagem simples, evite termos técnicos. Explique cada verificação de forma clara e acessível."
        }
        UserLevel::Intermediate => {
            "Inclua explicações técnicas breves sobre o porquê de cada verificação. O usuário tem conhecimento básico."
        }
        UserLevel::Advanced => "Seja direto e técnico. O usuário entende terminologia automotiva.",
    }
}

/// Build the system prompt for checklist generation
///
/// Assumes the input already passed required-field validation; the tone
/// falls back to the beginner description when no level was supplied.
#[must_use]
pub fn build_system_prompt(input: &TravelInput) -> String {
    let tone = level_description(input.user_level.unwrap_or(UserLevel::Beginner));
    let available_time = input
        .available_time
        .map_or_else(|| "Não informado".to_owned(), |t| t.to_string());
    let route_type = input.route_type.as_deref().unwrap_or_default();

    format!(
        r#"Você é um especialista em mecânica automotiva e segurança veicular. Sua função é gerar checklists personalizados de pré-viagem.

REGRAS IMPORTANTES:
1. Sempre retorne JSON válido no formato especificado
2. Adapte a linguagem ao nível do usuário: {tone}
3. Priorize itens com base no tempo disponível ({available_time} minutos)
4. Se houver luzes de advertência ou sintomas relatados, SEMPRE inclua em red_flags
5. Considere o tipo de trajeto ({route_type}) nas recomendações
6. Para viagens longas (>500km), dê atenção extra a fluidos e pneus
7. Inclua documentos obrigatórios (CNH, CRLV, seguro)

FORMATO DE RESPOSTA (JSON):
{{
  "checklist": [
    {{
      "category": "string (ex: Pneus, Fluidos, Documentos, Iluminação, Segurança)",
      "item": "string (descrição da verificação)",
      "priority": "essential | recommended | optional",
      "explanation": "string (apenas se usuário não for advanced)",
      "estimatedTime": number (minutos)
    }}
  ],
  "essential_items": [/* itens que DEVEM ser verificados antes de sair, mesmo com pouco tempo */],
  "red_flags": [
    {{
      "issue": "string (problema identificado)",
      "severity": "warning | critical",
      "recommendation": "string (o que fazer)"
    }}
  ],
  "questions_to_user": ["string (perguntas para refinar o checklist, se dados incompletos)"],
  "total_estimated_time": number (tempo total em minutos),
  "summary": "string (resumo breve da avaliação)"
}}"#
    )
}

/// Build the user prompt restating the travel form
///
/// Optional fields render as "Não informada"/"Não informado" when absent
/// or zero; the warning-light and symptom sections appear only when the
/// corresponding lists are non-empty.
#[must_use]
pub fn build_user_prompt(input: &TravelInput) -> String {
    let distance = input
        .distance
        .map_or_else(String::new, |d| d.to_string());
    let route_type = input.route_type.as_deref().unwrap_or_default();
    let vehicle_type = input.vehicle_type.as_deref().unwrap_or_default();
    let vehicle_brand = input.vehicle_brand.as_deref().unwrap_or_default();
    let vehicle_model = input.vehicle_model.as_deref().unwrap_or_default();
    let vehicle_year = input
        .vehicle_year
        .map_or_else(String::new, |y| y.to_string());

    let mut prompt = format!(
        r"Gere um checklist de pré-viagem personalizado com base nestas informações:

DADOS DA VIAGEM:
- Distância: {distance} km
- Tipo de trajeto: {route_type}
- Duração: {} dias
- Passageiros: {}
- Carga: {}

DADOS DO VEÍCULO:
- Tipo: {vehicle_type}
- Marca/Modelo: {vehicle_brand} {vehicle_model}
- Ano: {vehicle_year}
- Quilometragem atual: {} km
- Última manutenção: {} km",
        opt_count(input.travel_duration.map(u64::from), "Não informada"),
        opt_count(input.passengers.map(u64::from), "Não informado"),
        input
            .cargo
            .map_or("Não informada", |c| c.as_str()),
        opt_count(input.current_mileage, "Não informada"),
        opt_count(input.last_maintenance_km, "Não informada"),
    );

    if let Some(lights) = input.warning_lights.as_deref().filter(|l| !l.is_empty()) {
        let _ = write!(
            prompt,
            "\n\nLUZES DE ADVERTÊNCIA ACESAS: {}",
            lights.join(", ")
        );
    }

    if let Some(symptoms) = input.symptoms.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(prompt, "\n\nSINTOMAS RELATADOS: {}", symptoms.join(", "));
    }

    let _ = write!(
        prompt,
        "\n\nPERFIL DO USUÁRIO:\n- Nível de conhecimento: {}\n- Tempo disponível para verificações: {} minutos",
        input
            .user_level
            .map_or("Não informado", |l| l.as_str()),
        opt_count(input.available_time.map(u64::from), "Não informado"),
    );

    prompt.push_str(
        "\n\nGere o checklist priorizando os itens essenciais que cabem no tempo disponível. Se houver riscos, destaque em red_flags.",
    );

    prompt
}

/// Render an optional count, treating zero as not informed
fn opt_count(value: Option<u64>, placeholder: &str) -> String {
    value
        .filter(|&v| v > 0)
        .map_or_else(|| placeholder.to_owned(), |v| v.to_string())
}
