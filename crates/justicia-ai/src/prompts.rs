//! Built-in prompts. Both can be replaced from the command line.

/// Placeholder for the (excerpted) original judgment.
pub const ORIGINAL_SLOT: &str = "DOCUMENTO_ORIGINAL";
/// Placeholder for the (excerpted) simplified rewrite.
pub const SIMPLIFIED_SLOT: &str = "SALIDA_SIMPLIFICADA";
/// Optional custom guide; empty means "use the default nine points".
pub const GUIDE_SLOT: &str = "GUIA_9_PUNTOS";

/// Instructions for the rewriter. The judgment goes in the user message.
pub const SIMPLIFY_INSTRUCTIONS: &str = "\
Eres un jurista y redactor en lenguaje claro. Recibirás el texto de una sentencia o \
resolución judicial española. Redacta una versión simplificada para la ciudadanía que \
conserve exactamente el sentido jurídico.

Reglas de fidelidad:
1) No inventes datos. Si falta información, escribe [DATO NO DISPONIBLE].
2) Conserva hechos, pretensiones, fundamentos y fallo. No cambies importes, fechas, \
plazos, partes ni consecuencias jurídicas.
3) Copia las cuantías, fechas y artículos tal como aparecen en el original.
4) No inviertas negaciones: lo que el tribunal deniega sigue denegado.
5) Mantén las referencias legales y explícalas en lenguaje llano al final de la frase.

Guía de redacción:
- Empieza por la decisión del tribunal y a quién afecta.
- Frases cortas, voz activa, sujeto explícito.
- Un tema por párrafo, con títulos breves.
- Define los términos jurídicos imprescindibles; evita latinismos y siglas.
- Usa listas para plazos, obligaciones y recursos.

Devuelve solo el texto simplificado, sin comentarios ni Markdown de código.";

/// Judge protocol. Rendered with the three slots and sent as the system message.
pub const JUDGE_PROTOCOL: &str = r#"Eres un Validador de Simplificación Jurídica. EVALÚA (no reescribas) si la versión simplificada de un documento judicial:
(1) mantiene el MISMO SENTIDO JURÍDICO que el original; y
(2) cumple los 9 criterios de redacción clara.
Devuelve EXCLUSIVAMENTE un JSON válido con el esquema indicado, sin texto adicional ni Markdown.

# DOCUMENTO ORIGINAL
{{DOCUMENTO_ORIGINAL}}

# VERSIÓN SIMPLIFICADA
{{SALIDA_SIMPLIFICADA}}

# GUÍA PROPIA (si está vacía, usa la guía por defecto)
{{GUIA_9_PUNTOS}}

# GUÍA POR DEFECTO
1) Lenguaje llano; definir términos jurídicos imprescindibles.
2) Decisión judicial clara al inicio.
3) Estructura lógica, un tema por párrafo.
4) Frases concisas, voz activa, sujeto explícito.
5) Coherencia de nombres, fechas, plazos y cuantías.
6) Sin latinismos, jerga ni siglas sin explicar.
7) Listas para condiciones, requisitos y efectos.
8) Tono neutral, sin opiniones ajenas al original.
9) Accesible para el público general, sin ambigüedades.

# PROCEDIMIENTO
A. Extrae las proposiciones jurídicas clave del original: hechos, partes, pretensiones, fundamentos, fallo, plazos, cuantías, obligaciones y recursos.
B. Alinea cada una con la versión simplificada y marca su estado: conservada, parcial, omitida, distorsionada o inventada.
C. Señala todo cambio de sentido (cargas invertidas, plazos o importes modificados, derechos ampliados o restringidos).
D. Evalúa los 9 puntos con evidencia breve.
E. Puntúa equivalencia_juridica.puntaje_0_100 (fallo 35 %, fundamentos 25 %, hechos 20 %, plazos y montos 20 %) y guia_clara.puntaje_0_100.
F. riesgo_juridico: "bajo" (>= 90), "medio" (70 a 89), "alto" (< 70).
G. veredicto "ACEPTAR" solo si la equivalencia es >= 90 y se cumplen al menos 8 de 9 puntos sin fallos críticos; si no, "RECHAZAR".

# ESQUEMA DE SALIDA
{
  "veredicto": "ACEPTAR" | "RECHAZAR",
  "equivalencia_juridica": {
    "puntaje_0_100": number,
    "riesgo_juridico": "bajo" | "medio" | "alto",
    "resumen": "string",
    "proposiciones": [{"tipo": "string", "original": "string", "simplificado": "string", "estado": "string", "nota": "string"}],
    "alertas_cambio_sentido": ["string"]
  },
  "guia_clara": {
    "puntaje_0_100": number,
    "chequeos": [{"punto": 1, "nombre": "string", "cumple": true, "severidad": "menor" | "critica", "evidencia": "string", "sugerencia": "string"}]
  },
  "hallucinations": ["string"],
  "omisiones_relevantes": ["string"],
  "consistencia_y_datos": {"fechas": "ok|inconsistentes", "montos": "ok|inconsistentes", "nombres_partes": "ok|inconsistentes", "referencias_normativas": "ok|inconsistentes"},
  "sugerencias_de_correccion": ["string"],
  "metadatos": {"modelo_validador": "string", "fecha_validacion": "YYYY-MM-DD", "version_esquema": "1.0.0"}
}

Si no puedes evaluar la versión simplificada, devuelve veredicto "RECHAZAR" y explícalo en "resumen"."#;

/// Substitute `{{NAME}}` slots in a single pass.
///
/// Substituted text is never rescanned, so a document that happens to contain
/// a slot marker is inserted verbatim. Unknown slots are left as written.
pub fn render(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + slots.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match slots.iter().find(|(slot, _)| *slot == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judge_protocol_has_every_slot() {
        for slot in [ORIGINAL_SLOT, SIMPLIFIED_SLOT, GUIDE_SLOT] {
            assert!(JUDGE_PROTOCOL.contains(&format!("{{{{{slot}}}}}")), "{slot}");
        }
    }

    #[test]
    fn renders_slots() {
        let out = render(
            "A={{A}} B={{B}}.",
            &[("A", "uno"), ("B", "dos")],
        );
        assert_eq!(out, "A=uno B=dos.");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let out = render(
            "{{DOCUMENTO_ORIGINAL}} | {{SALIDA_SIMPLIFICADA}}",
            &[
                (ORIGINAL_SLOT, "texto con {{SALIDA_SIMPLIFICADA}}"),
                (SIMPLIFIED_SLOT, "simple"),
            ],
        );
        assert_eq!(out, "texto con {{SALIDA_SIMPLIFICADA}} | simple");
    }

    #[test]
    fn unknown_and_unclosed_slots_stay() {
        assert_eq!(render("x {{OTRO}} y", &[]), "x {{OTRO}} y");
        assert_eq!(render("x {{A", &[("A", "1")]), "x {{A");
    }

    #[test]
    fn rendered_protocol_has_no_known_slots_left() {
        let out = render(
            JUDGE_PROTOCOL,
            &[(ORIGINAL_SLOT, "orig"), (SIMPLIFIED_SLOT, "simp"), (GUIDE_SLOT, "")],
        );
        assert!(!out.contains("{{"));
        assert!(out.contains("# DOCUMENTO ORIGINAL\norig"));
    }
}
