//! Human-readable output for verification outcomes and stored records.

use std::fmt::Write;
use std::path::Path;

use justicia_core::{AuditRecord, Decision, JudgeVerdict, RejectReason, TokenCategory, TokenDiff};

const MAX_LIST_ITEMS: usize = 10;

// ── Public API ──

/// `ACEPTADO` / `RECHAZADO`, followed by one line per reason.
pub fn decision_summary(decision: &Decision) -> String {
    let mut out = String::from(if decision.accepted {
        "ACEPTADO"
    } else {
        "RECHAZADO"
    });
    for reason in &decision.reasons {
        let _ = write!(out, "\n  - {}", describe_reason(reason));
    }
    out
}

pub fn describe_reason(reason: &RejectReason) -> String {
    match reason {
        RejectReason::AmountsMismatch => "las cuantías no coinciden".into(),
        RejectReason::DatesMismatch => "las fechas no coinciden".into(),
        RejectReason::ArticlesMismatch => "los artículos citados no coinciden".into(),
        RejectReason::NegationFlip => "posible inversión de una negación".into(),
        RejectReason::LowSimilarity { score, threshold } => {
            format!("similitud {score:.3} por debajo de {threshold:.2}")
        }
        RejectReason::SimilarityUnavailable { error } => {
            format!("similitud no disponible: {error}")
        }
        RejectReason::JudgeRejected { verdict } => format!("el juez dictamina {verdict}"),
        RejectReason::JudgeScoreBelow { score, threshold } => {
            format!("equivalencia jurídica {score:.0} por debajo de {threshold:.0}")
        }
    }
}

/// One line per record for `list`.
pub fn list_line(path: &Path, record: &AuditRecord) -> String {
    format!(
        "{:<10} {:>6.3}  {:<12} {}",
        if record.decision.accepted {
            "ACEPTADO"
        } else {
            "RECHAZADO"
        },
        record.result.similarity,
        record.result.judge.label(),
        path.display()
    )
}

/// A stored record as a vertical card grouped by section.
pub fn record_card(path: &Path, record: &AuditRecord) -> String {
    let mut out = String::new();
    let title = record
        .source
        .as_deref()
        .map_or_else(|| path.display().to_string(), str::to_string);
    let _ = writeln!(out, "=== {title} ===");
    let _ = writeln!(out, "{}", decision_summary(&record.decision));
    out.push('\n');

    let r = &record.result;
    section(&mut out, "Record");
    field(&mut out, "processed_at", &record.processed_at);
    field(&mut out, "path", &path.display().to_string());
    out.push('\n');

    section(&mut out, "Rule checks");
    field(&mut out, "amounts_ok", yes_no(r.checks.amounts_ok));
    field(&mut out, "dates_ok", yes_no(r.checks.dates_ok));
    field(&mut out, "articles_ok", yes_no(r.checks.articles_ok));
    field(&mut out, "negation_flip", yes_no(r.checks.negation_flip));
    for category in TokenCategory::ALL {
        if let Some(diff) = r.details.diff(category) {
            token_diff(&mut out, category.as_str(), diff);
        }
    }
    out.push('\n');

    section(&mut out, "Similarity");
    field(&mut out, "score", &format!("{:.3}", r.similarity));
    if let Some(error) = &r.similarity_error {
        field(&mut out, "error", error);
    }
    out.push('\n');

    section(&mut out, "Judge");
    judge(&mut out, &r.judge);
    out
}

// ── Sections ──

fn section(out: &mut String, header: &str) {
    let _ = writeln!(out, "{header}");
}

fn field(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "  {name:<26} {value}");
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

fn token_diff(out: &mut String, name: &str, diff: &TokenDiff) {
    let _ = writeln!(out, "  {name}:");
    let _ = writeln!(out, "    {:<24} {}", "original", diff.original.join(", "));
    let _ = writeln!(out, "    {:<24} {}", "simplified", diff.simplified.join(", "));
}

fn judge(out: &mut String, verdict: &JudgeVerdict) {
    let assessment = verdict.assessment();
    field(out, "verdict", verdict.label());
    if let Some(score) = assessment.score {
        field(out, "score", &format!("{score:.0}"));
    }
    if let JudgeVerdict::Rich(rich) = verdict
        && let Some(risk) = rich.risk()
    {
        field(out, "risk", risk.as_str());
    }
    let summary = verdict.summary();
    if !summary.is_empty() {
        field(out, "summary", &summary);
    }
    list(out, "evidence", &assessment.evidence);
}

fn list(out: &mut String, name: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {} ({}):", name, items.len());
    for item in items.iter().take(MAX_LIST_ITEMS) {
        let _ = writeln!(out, "    - {item}");
    }
    if items.len() > MAX_LIST_ITEMS {
        let _ = writeln!(out, "    ... and {} more", items.len() - MAX_LIST_ITEMS);
    }
}
