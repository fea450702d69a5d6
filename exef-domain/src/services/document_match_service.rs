//! # Document Match Service
//!
//! Implements the `/match/documents/{id}` scoring formula of spec.md §6
//! verbatim. Compressed in spec.md's distillation to a single paragraph
//! naming the formula but not its home component; SPEC_FULL.md places it
//! here, beside the access resolver, since it is pure scoring logic over
//! documents the application layer has already fetched — no repository
//! access happens inside this module.

use crate::value_objects::ids::DocumentId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One document considered as a possible match, with only the fields the
/// scoring formula reads.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub document_id: DocumentId,
    pub project_id: crate::value_objects::ids::ProjectId,
    pub contractor_tax_id: Option<String>,
    pub contractor_name: Option<String>,
    pub amount_gross: Option<Decimal>,
    pub document_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSuggestion {
    pub document_id: DocumentId,
    pub score: f64,
}

/// Corporate-form tokens excluded from the "shared words" name-similarity
/// check, since they inflate similarity between unrelated companies (every
/// "Sp. z o.o." matches every other "Sp. z o.o.").
const CORPORATE_FORM_TOKENS: &[&str] = &["sp", "z", "o.o.", "oo", "s.a.", "sa", "spk", "spółka", "jawna", "s.c.", "sc"];

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentMatchService;

impl DocumentMatchService {
    pub fn new() -> Self {
        Self
    }

    /// Scores `candidate` as a potential match for `target`, excluding
    /// same-project suggestions by returning `None` (spec.md §6: "same
    /// project excluded").
    pub fn score(&self, target: &MatchCandidate, candidate: &MatchCandidate) -> Option<f64> {
        if candidate.project_id == target.project_id {
            return None;
        }

        let mut score = 0.0_f64;

        if let (Some(a), Some(b)) = (&target.contractor_tax_id, &candidate.contractor_tax_id) {
            if a == b {
                score += 0.35;
            }
        }

        if let (Some(a), Some(b)) = (target.amount_gross, candidate.amount_gross) {
            if a == b {
                score += 0.35;
            } else if a != Decimal::ZERO {
                let diff_ratio = ((a - b).abs() / a).abs();
                if diff_ratio <= Decimal::new(1, 2) {
                    score += 0.25;
                } else if diff_ratio <= Decimal::new(5, 2) {
                    score += 0.10;
                }
            }
        }

        if let (Some(a), Some(b)) = (&target.contractor_name, &candidate.contractor_name) {
            score += name_similarity_score(a, b);
        }

        if let (Some(a), Some(b)) = (target.document_date, candidate.document_date) {
            let days = (a - b).num_days().abs();
            if days <= 7 {
                score += 0.10;
            } else if days <= 30 {
                score += 0.05;
            }
        }

        Some(score.min(1.0))
    }

    /// Scores every candidate against `target`, sorts descending, and caps
    /// at `limit` — the shape `/match/documents/{id}?limit=` needs.
    pub fn suggest(&self, target: &MatchCandidate, candidates: &[MatchCandidate], limit: usize) -> Vec<MatchSuggestion> {
        let mut scored: Vec<MatchSuggestion> = candidates
            .iter()
            .filter(|c| c.document_id != target.document_id)
            .filter_map(|c| self.score(target, c).map(|score| MatchSuggestion { document_id: c.document_id.clone(), score }))
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }
}

fn name_similarity_score(a: &str, b: &str) -> f64 {
    let norm_a = a.trim().to_lowercase();
    let norm_b = b.trim().to_lowercase();
    if norm_a == norm_b {
        return 0.20;
    }
    if norm_a.contains(&norm_b) || norm_b.contains(&norm_a) {
        return 0.15;
    }

    let words_a: HashSet<&str> = norm_a.split_whitespace().filter(|w| !is_corporate_form_token(w)).collect();
    let words_b: HashSet<&str> = norm_b.split_whitespace().filter(|w| !is_corporate_form_token(w)).collect();
    let shared = words_a.intersection(&words_b).count();
    if shared >= 2 {
        0.10
    } else {
        0.0
    }
}

fn is_corporate_form_token(word: &str) -> bool {
    let stripped = word.trim_matches(',').trim_matches('.');
    CORPORATE_FORM_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(stripped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ids::ProjectId;

    fn candidate(project: ProjectId, nip: Option<&str>, gross: Option<&str>, name: Option<&str>, date: Option<NaiveDate>) -> MatchCandidate {
        MatchCandidate {
            document_id: DocumentId::new(),
            project_id: project,
            contractor_tax_id: nip.map(str::to_string),
            amount_gross: gross.map(|v| v.parse().unwrap()),
            contractor_name: name.map(str::to_string),
            document_date: date,
        }
    }

    #[test]
    fn exact_nip_and_gross_and_name_and_date_caps_at_one() {
        let svc = DocumentMatchService::new();
        let p1 = ProjectId::new();
        let p2 = ProjectId::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let target = candidate(p1, Some("5213003700"), Some("1500.00"), Some("Acme Sp. z o.o."), Some(date));
        let other = candidate(p2, Some("5213003700"), Some("1500.00"), Some("Acme Sp. z o.o."), Some(date));
        assert_eq!(svc.score(&target, &other), Some(1.0));
    }

    #[test]
    fn same_project_is_excluded() {
        let svc = DocumentMatchService::new();
        let p1 = ProjectId::new();
        let target = candidate(p1.clone(), Some("5213003700"), None, None, None);
        let other = candidate(p1, Some("5213003700"), None, None, None);
        assert_eq!(svc.score(&target, &other), None);
    }

    #[test]
    fn close_amount_within_one_percent_scores_partial() {
        let svc = DocumentMatchService::new();
        let p1 = ProjectId::new();
        let p2 = ProjectId::new();
        let target = candidate(p1, None, Some("1000.00"), None, None);
        let other = candidate(p2, None, Some("1005.00"), None, None);
        assert_eq!(svc.score(&target, &other), Some(0.25));
    }

    #[test]
    fn shared_words_excluding_corporate_forms_scores_partial() {
        let svc = DocumentMatchService::new();
        let p1 = ProjectId::new();
        let p2 = ProjectId::new();
        let target = candidate(p1, None, None, Some("Nowak Kowalski Sp. z o.o."), None);
        let other = candidate(p2, None, None, Some("Nowak Kowalski S.A."), None);
        assert_eq!(svc.score(&target, &other), Some(0.10));
    }
}
