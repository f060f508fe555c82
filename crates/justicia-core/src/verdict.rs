//! Judge verdicts: the two JSON schemas a judge model may answer with, and the
//! canonical [`Assessment`] the decision gate reads.
//!
//! # Schemas
//!
//! - **Legacy**: `{"verdict": "equivalent" | "minor_diffs" | "mismatch", "issues": [...], ...}`
//! - **Rich**: `{"veredicto": "ACEPTAR" | "RECHAZAR", "equivalencia_juridica": {...}, ...}`
//!
//! The variant is chosen by field presence (`veredicto` vs `verdict`), never by
//! trial deserialisation, so a malformed rich answer is reported as such rather
//! than silently falling through to the legacy shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Error, PartialEq)]
pub enum VerdictSchemaError {
    #[error("judge output is not a JSON object")]
    NotAnObject,
    #[error("judge output has neither `veredicto` nor `verdict`")]
    UnknownSchema,
    #[error("invalid {schema} verdict: {message}")]
    Invalid {
        schema: &'static str,
        message: String,
    },
}

// ── Legacy schema ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyKind {
    Equivalent,
    MinorDiffs,
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyVerdict {
    pub verdict: LegacyKind,
    #[serde(default, deserialize_with = "null_default")]
    pub issues: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub changed_numbers: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub changed_dates: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub changed_parties: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub negation_flip: bool,
}

// ── Rich schema ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Veredicto {
    Aceptar,
    Rechazar,
}

/// Legal-risk band derived from the equivalence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Bajo,
    Medio,
    Alto,
}

impl RiskBand {
    /// ≥90 low, 70–89 medium, <70 high.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Bajo
        } else if score >= 70.0 {
            Self::Medio
        } else {
            Self::Alto
        }
    }

    /// Case-insensitive parse of a band name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bajo" => Some(Self::Bajo),
            "medio" => Some(Self::Medio),
            "alto" => Some(Self::Alto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bajo => "bajo",
            Self::Medio => "medio",
            Self::Alto => "alto",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Proposition {
    #[serde(default, deserialize_with = "null_default")]
    pub tipo: String,
    #[serde(default, deserialize_with = "null_default")]
    pub original: String,
    #[serde(default, deserialize_with = "null_default")]
    pub simplificado: String,
    #[serde(default, deserialize_with = "null_default")]
    pub estado: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nota: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalEquivalence {
    #[serde(default, deserialize_with = "lenient_score")]
    pub puntaje_0_100: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_risk",
        skip_serializing_if = "Option::is_none"
    )]
    pub riesgo_juridico: Option<RiskBand>,
    #[serde(default, deserialize_with = "null_default")]
    pub resumen: String,
    #[serde(default, deserialize_with = "null_default")]
    pub proposiciones: Vec<Proposition>,
    #[serde(default, deserialize_with = "null_default")]
    pub alertas_cambio_sentido: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideCheck {
    #[serde(default, deserialize_with = "lenient_index")]
    pub punto: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub nombre: String,
    #[serde(default, deserialize_with = "null_default")]
    pub cumple: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub severidad: String,
    #[serde(default, deserialize_with = "null_default")]
    pub evidencia: String,
    #[serde(default, deserialize_with = "null_default")]
    pub sugerencia: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideCompliance {
    #[serde(default, deserialize_with = "lenient_score")]
    pub puntaje_0_100: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub chequeos: Vec<GuideCheck>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Consistency {
    Ok,
    Inconsistentes,
    #[default]
    Unknown,
}

impl<'de> Deserialize<'de> for Consistency {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "ok" => Self::Ok,
                "inconsistentes" | "inconsistente" => Self::Inconsistentes,
                _ => Self::Unknown,
            },
            _ => Self::Unknown,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConsistency {
    #[serde(default, deserialize_with = "null_default")]
    pub fechas: Consistency,
    #[serde(default, deserialize_with = "null_default")]
    pub montos: Consistency,
    #[serde(default, deserialize_with = "null_default")]
    pub nombres_partes: Consistency,
    #[serde(default, deserialize_with = "null_default")]
    pub referencias_normativas: Consistency,
}

impl DataConsistency {
    fn fields(&self) -> [(&'static str, Consistency); 4] {
        [
            ("fechas", self.fechas),
            ("montos", self.montos),
            ("nombres_partes", self.nombres_partes),
            ("referencias_normativas", self.referencias_normativas),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "null_default")]
    pub modelo_validador: String,
    #[serde(default, deserialize_with = "null_default")]
    pub fecha_validacion: String,
    #[serde(default, deserialize_with = "null_default")]
    pub version_esquema: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichVerdict {
    pub veredicto: Veredicto,
    #[serde(default, deserialize_with = "null_default")]
    pub equivalencia_juridica: LegalEquivalence,
    #[serde(default, deserialize_with = "null_default")]
    pub guia_clara: GuideCompliance,
    #[serde(default, deserialize_with = "null_default")]
    pub hallucinations: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub omisiones_relevantes: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub consistencia_y_datos: DataConsistency,
    #[serde(default, deserialize_with = "null_default")]
    pub sugerencias_de_correccion: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub metadatos: Metadata,
}

impl RichVerdict {
    /// Stated risk band, or the band implied by the score when the model omitted it.
    pub fn risk(&self) -> Option<RiskBand> {
        self.equivalencia_juridica
            .riesgo_juridico
            .or_else(|| self.equivalencia_juridica.puntaje_0_100.map(RiskBand::from_score))
    }
}

/// `null` reads as the field's default.
fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Any casing of a known band; anything else counts as absent.
fn lenient_risk<'de, D: Deserializer<'de>>(d: D) -> Result<Option<RiskBand>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => RiskBand::parse(&s),
        _ => None,
    })
}

/// Non-negative integers, given as numbers or numeric strings; otherwise 0.
fn lenient_index<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let index = match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(index.and_then(|i| u32::try_from(i).ok()).unwrap_or(0))
}

/// Accept numbers and numeric strings; anything else counts as absent.
fn lenient_score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

// ── Judge verdict ──

/// A parsed judge answer in either schema.
///
/// Serialises back to the schema it came from, so the audit record keeps the
/// judge's own shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JudgeVerdict {
    Rich(RichVerdict),
    Legacy(LegacyVerdict),
}

impl<'de> Deserialize<'de> for JudgeVerdict {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl JudgeVerdict {
    /// Discriminate on field presence and parse the matching schema.
    pub fn from_value(value: Value) -> Result<Self, VerdictSchemaError> {
        let Value::Object(map) = &value else {
            return Err(VerdictSchemaError::NotAnObject);
        };

        if map.contains_key("veredicto") {
            serde_json::from_value(value)
                .map(Self::Rich)
                .map_err(|e| VerdictSchemaError::Invalid {
                    schema: "rich",
                    message: e.to_string(),
                })
        } else if map.contains_key("verdict") {
            serde_json::from_value(value)
                .map(Self::Legacy)
                .map_err(|e| VerdictSchemaError::Invalid {
                    schema: "legacy",
                    message: e.to_string(),
                })
        } else {
            Err(VerdictSchemaError::UnknownSchema)
        }
    }

    /// The maximally pessimistic verdict substituted when the judge fails.
    pub fn pessimistic(reason: &str) -> Self {
        Self::Rich(RichVerdict {
            veredicto: Veredicto::Rechazar,
            equivalencia_juridica: LegalEquivalence {
                puntaje_0_100: Some(0.0),
                riesgo_juridico: Some(RiskBand::Alto),
                resumen: format!("Error en validación: {reason}"),
                proposiciones: Vec::new(),
                alertas_cambio_sentido: Vec::new(),
            },
            guia_clara: GuideCompliance {
                puntaje_0_100: Some(0.0),
                chequeos: Vec::new(),
            },
            hallucinations: Vec::new(),
            omisiones_relevantes: Vec::new(),
            consistencia_y_datos: DataConsistency::default(),
            sugerencias_de_correccion: Vec::new(),
            metadatos: Metadata {
                modelo_validador: "judge_error".to_string(),
                fecha_validacion: "unknown".to_string(),
                version_esquema: SCHEMA_VERSION.to_string(),
            },
        })
    }

    /// The categorical verdict as the judge wrote it.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rich(r) => match r.veredicto {
                Veredicto::Aceptar => "ACEPTAR",
                Veredicto::Rechazar => "RECHAZAR",
            },
            Self::Legacy(l) => match l.verdict {
                LegacyKind::Equivalent => "equivalent",
                LegacyKind::MinorDiffs => "minor_diffs",
                LegacyKind::Mismatch => "mismatch",
            },
        }
    }

    /// One-line summary for display: the rich `resumen`, or the legacy issues.
    pub fn summary(&self) -> String {
        match self {
            Self::Rich(r) => r.equivalencia_juridica.resumen.clone(),
            Self::Legacy(l) => l.issues.join("; "),
        }
    }

    /// Normalise either schema into the single shape the decision gate reads.
    pub fn assessment(&self) -> Assessment {
        match self {
            Self::Legacy(l) => {
                let lean = match l.verdict {
                    LegacyKind::Equivalent | LegacyKind::MinorDiffs => Lean::Accept,
                    LegacyKind::Mismatch => Lean::Reject,
                };
                let mut evidence = l.issues.clone();
                evidence.extend(l.changed_numbers.iter().map(|n| format!("changed number: {n}")));
                evidence.extend(l.changed_dates.iter().map(|d| format!("changed date: {d}")));
                evidence.extend(l.changed_parties.iter().map(|p| format!("changed party: {p}")));
                if l.negation_flip {
                    evidence.push("judge reports a negation flip".to_string());
                }
                Assessment {
                    lean,
                    score: None,
                    evidence,
                }
            }
            Self::Rich(r) => {
                let lean = match r.veredicto {
                    Veredicto::Aceptar => Lean::Accept,
                    Veredicto::Rechazar => Lean::Reject,
                };
                let eq = &r.equivalencia_juridica;
                let mut evidence = eq.alertas_cambio_sentido.clone();
                evidence.extend(r.hallucinations.iter().map(|h| format!("hallucination: {h}")));
                evidence.extend(
                    r.omisiones_relevantes
                        .iter()
                        .map(|o| format!("omission: {o}")),
                );
                evidence.extend(
                    r.consistencia_y_datos
                        .fields()
                        .into_iter()
                        .filter(|(_, c)| *c == Consistency::Inconsistentes)
                        .map(|(name, _)| format!("inconsistent {name}")),
                );
                Assessment {
                    lean,
                    score: eq.puntaje_0_100,
                    evidence,
                }
            }
        }
    }
}

// ── Canonical assessment ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lean {
    Accept,
    Reject,
}

/// Schema-independent reading of a judge verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub lean: Lean,
    /// Equivalence score 0–100, when the schema carries one.
    pub score: Option<f64>,
    pub evidence: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_minimal() {
        let v = JudgeVerdict::from_value(json!({"verdict": "equivalent"})).unwrap();
        assert_eq!(v.label(), "equivalent");
        let a = v.assessment();
        assert_eq!(a.lean, Lean::Accept);
        assert_eq!(a.score, None);
        assert!(a.evidence.is_empty());
    }

    #[test]
    fn legacy_minor_diffs_leans_accept() {
        let v = JudgeVerdict::from_value(json!({"verdict": "minor_diffs"})).unwrap();
        assert_eq!(v.assessment().lean, Lean::Accept);
    }

    #[test]
    fn legacy_mismatch_collects_evidence() {
        let v = JudgeVerdict::from_value(json!({
            "verdict": "mismatch",
            "issues": ["plazo alterado"],
            "changed_numbers": ["1.500 → 150"],
            "changed_dates": [],
            "changed_parties": ["demandante/demandado"],
            "negation_flip": true
        }))
        .unwrap();
        let a = v.assessment();
        assert_eq!(a.lean, Lean::Reject);
        assert_eq!(
            a.evidence,
            vec![
                "plazo alterado",
                "changed number: 1.500 → 150",
                "changed party: demandante/demandado",
                "judge reports a negation flip",
            ]
        );
    }

    #[test]
    fn unknown_legacy_verdict_is_invalid() {
        let err = JudgeVerdict::from_value(json!({"verdict": "maybe"})).unwrap_err();
        assert!(matches!(err, VerdictSchemaError::Invalid { schema: "legacy", .. }));
    }

    #[test]
    fn rich_full_document() {
        let v = JudgeVerdict::from_value(json!({
            "veredicto": "ACEPTAR",
            "equivalencia_juridica": {
                "puntaje_0_100": 94,
                "riesgo_juridico": "bajo",
                "resumen": "Se conserva el fallo y los plazos.",
                "proposiciones": [{
                    "tipo": "fallo",
                    "original": "Se estima la demanda",
                    "simplificado": "El juzgado da la razón al demandante",
                    "estado": "conservada"
                }],
                "alertas_cambio_sentido": []
            },
            "guia_clara": {
                "puntaje_0_100": 88.9,
                "chequeos": [{"punto": 1, "nombre": "Lenguaje llano", "cumple": true,
                              "severidad": "menor", "evidencia": "", "sugerencia": ""}]
            },
            "hallucinations": [],
            "omisiones_relevantes": ["no menciona las costas"],
            "consistencia_y_datos": {
                "fechas": "ok", "montos": "inconsistentes",
                "nombres_partes": "ok", "referencias_normativas": "ok"
            },
            "sugerencias_de_correccion": [],
            "metadatos": {"modelo_validador": "llama3", "fecha_validacion": "2025-03-01",
                          "version_esquema": "1.0.0"}
        }))
        .unwrap();

        let JudgeVerdict::Rich(rich) = &v else {
            panic!("expected rich verdict");
        };
        assert_eq!(rich.equivalencia_juridica.proposiciones.len(), 1);
        assert_eq!(rich.guia_clara.chequeos[0].punto, 1);
        assert_eq!(rich.risk(), Some(RiskBand::Bajo));

        let a = v.assessment();
        assert_eq!(a.lean, Lean::Accept);
        assert_eq!(a.score, Some(94.0));
        assert_eq!(
            a.evidence,
            vec!["omission: no menciona las costas", "inconsistent montos"]
        );
    }

    #[test]
    fn rich_minimal_has_no_score() {
        let v = JudgeVerdict::from_value(json!({"veredicto": "RECHAZAR"})).unwrap();
        let a = v.assessment();
        assert_eq!(a.lean, Lean::Reject);
        assert_eq!(a.score, None);
    }

    #[test]
    fn rich_score_as_string() {
        let v = JudgeVerdict::from_value(json!({
            "veredicto": "ACEPTAR",
            "equivalencia_juridica": {"puntaje_0_100": "85"}
        }))
        .unwrap();
        assert_eq!(v.assessment().score, Some(85.0));
    }

    #[test]
    fn rich_unparseable_score_is_absent() {
        let v = JudgeVerdict::from_value(json!({
            "veredicto": "ACEPTAR",
            "equivalencia_juridica": {"puntaje_0_100": "alto"}
        }))
        .unwrap();
        assert_eq!(v.assessment().score, None);
    }

    #[test]
    fn unknown_consistency_values_fold_to_unknown() {
        let v = JudgeVerdict::from_value(json!({
            "veredicto": "RECHAZAR",
            "consistencia_y_datos": {"fechas": "dudosas"}
        }))
        .unwrap();
        let JudgeVerdict::Rich(rich) = v else {
            panic!("expected rich verdict");
        };
        assert_eq!(rich.consistencia_y_datos.fechas, Consistency::Unknown);
    }

    #[test]
    fn rich_tolerates_null_text_fields() {
        let v = JudgeVerdict::from_value(json!({
            "veredicto": "ACEPTAR",
            "equivalencia_juridica": {
                "puntaje_0_100": 95,
                "resumen": null,
                "proposiciones": [{"tipo": "fallo", "nota": null, "estado": null}],
                "alertas_cambio_sentido": null
            },
            "guia_clara": {"chequeos": [{"punto": 2, "evidencia": null, "cumple": null}]},
            "hallucinations": null,
            "metadatos": null
        }))
        .unwrap();
        assert_eq!(v.summary(), "");
        let a = v.assessment();
        assert_eq!(a.lean, Lean::Accept);
        assert_eq!(a.score, Some(95.0));
        assert!(a.evidence.is_empty());
    }

    #[test]
    fn risk_band_is_case_insensitive() {
        let v = JudgeVerdict::from_value(json!({
            "veredicto": "ACEPTAR",
            "equivalencia_juridica": {"puntaje_0_100": 95, "riesgo_juridico": "Bajo"}
        }))
        .unwrap();
        let JudgeVerdict::Rich(rich) = v else {
            panic!("expected rich verdict");
        };
        assert_eq!(rich.equivalencia_juridica.riesgo_juridico, Some(RiskBand::Bajo));
    }

    #[test]
    fn unknown_risk_band_falls_back_to_score() {
        let v = JudgeVerdict::from_value(json!({
            "veredicto": "RECHAZAR",
            "equivalencia_juridica": {"puntaje_0_100": 60, "riesgo_juridico": "muy alto"}
        }))
        .unwrap();
        let JudgeVerdict::Rich(rich) = v else {
            panic!("expected rich verdict");
        };
        assert_eq!(rich.equivalencia_juridica.riesgo_juridico, None);
        assert_eq!(rich.risk(), Some(RiskBand::Alto));
    }

    #[test]
    fn guide_point_as_string() {
        let v = JudgeVerdict::from_value(json!({
            "veredicto": "ACEPTAR",
            "guia_clara": {"chequeos": [{"punto": "1"}, {"punto": 3.0}, {"punto": "uno"}]}
        }))
        .unwrap();
        let JudgeVerdict::Rich(rich) = v else {
            panic!("expected rich verdict");
        };
        let points: Vec<u32> = rich.guia_clara.chequeos.iter().map(|c| c.punto).collect();
        assert_eq!(points, vec![1, 3, 0]);
    }

    #[test]
    fn consistency_is_case_insensitive() {
        let v = JudgeVerdict::from_value(json!({
            "veredicto": "RECHAZAR",
            "consistencia_y_datos": {"fechas": "OK", "montos": "Inconsistentes", "nombres_partes": null}
        }))
        .unwrap();
        let JudgeVerdict::Rich(rich) = &v else {
            panic!("expected rich verdict");
        };
        assert_eq!(rich.consistencia_y_datos.fechas, Consistency::Ok);
        assert_eq!(rich.consistencia_y_datos.montos, Consistency::Inconsistentes);
        assert_eq!(rich.consistencia_y_datos.nombres_partes, Consistency::Unknown);
        assert_eq!(v.assessment().evidence, vec!["inconsistent montos"]);
    }

    #[test]
    fn risk_band_boundaries() {
        assert_eq!(RiskBand::from_score(90.0), RiskBand::Bajo);
        assert_eq!(RiskBand::from_score(89.9), RiskBand::Medio);
        assert_eq!(RiskBand::from_score(70.0), RiskBand::Medio);
        assert_eq!(RiskBand::from_score(69.0), RiskBand::Alto);
    }

    #[test]
    fn risk_derived_when_missing() {
        let v = JudgeVerdict::from_value(json!({
            "veredicto": "ACEPTAR",
            "equivalencia_juridica": {"puntaje_0_100": 75}
        }))
        .unwrap();
        let JudgeVerdict::Rich(rich) = v else {
            panic!("expected rich verdict");
        };
        assert_eq!(rich.risk(), Some(RiskBand::Medio));
    }

    #[test]
    fn schema_errors() {
        assert_eq!(
            JudgeVerdict::from_value(json!(["ACEPTAR"])).unwrap_err(),
            VerdictSchemaError::NotAnObject
        );
        assert_eq!(
            JudgeVerdict::from_value(json!({"resultado": "ok"})).unwrap_err(),
            VerdictSchemaError::UnknownSchema
        );
    }

    #[test]
    fn pessimistic_default_rejects_with_reason() {
        let v = JudgeVerdict::pessimistic("connection refused");
        assert_eq!(v.label(), "RECHAZAR");
        assert_eq!(v.summary(), "Error en validación: connection refused");
        let a = v.assessment();
        assert_eq!(a.lean, Lean::Reject);
        assert_eq!(a.score, Some(0.0));

        let JudgeVerdict::Rich(rich) = &v else {
            panic!("expected rich verdict");
        };
        assert_eq!(rich.risk(), Some(RiskBand::Alto));
        assert_eq!(rich.metadatos.version_esquema, SCHEMA_VERSION);
        assert_eq!(rich.consistencia_y_datos.montos, Consistency::Unknown);
    }

    #[test]
    fn serializes_back_to_original_shape() {
        let legacy = JudgeVerdict::from_value(json!({"verdict": "mismatch"})).unwrap();
        let json = serde_json::to_value(&legacy).unwrap();
        assert_eq!(json["verdict"], "mismatch");
        assert!(json.get("veredicto").is_none());

        let rich = JudgeVerdict::pessimistic("timeout");
        let json = serde_json::to_value(&rich).unwrap();
        assert_eq!(json["veredicto"], "RECHAZAR");
        assert_eq!(json["equivalencia_juridica"]["riesgo_juridico"], "alto");
        assert_eq!(json["consistencia_y_datos"]["fechas"], "unknown");

        let back: JudgeVerdict = serde_json::from_value(json).unwrap();
        assert_eq!(back, rich);
    }
}
