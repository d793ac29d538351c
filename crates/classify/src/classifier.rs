use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::normalize::fold;
use crate::rules::{BrandRule, RuleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Card,
    Voucher,
}

/// Classification result: canonical acquirer/brand name plus whether it
/// settles as a card or a voucher instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub category: Category,
}

/// Pairing of a rule with its precompiled regex.
struct CompiledBrand {
    regex: regex::Regex,
    name: String,
}

/// Maps raw statement descriptions to canonical acquirer/brand names.
///
/// Precedence, in order: per-bank custom predicate, the bank's own rule
/// table (first match wins), the shared voucher aliases, and — only for
/// banks without a table — the default brand table. Stateless per call;
/// build once and share.
pub struct Classifier {
    banks: HashMap<String, Vec<CompiledBrand>>,
    default_table: Vec<CompiledBrand>,
    vouchers: Vec<(String, String)>,
}

impl Classifier {
    pub fn new(rules: RuleSet) -> Self {
        let banks = rules
            .banks
            .into_iter()
            .map(|(bank, table)| (bank, compile_table(table)))
            .collect();

        Classifier {
            banks,
            default_table: compile_table(rules.default),
            vouchers: rules
                .vouchers
                .into_iter()
                .map(|va| (fold(&va.alias), va.name))
                .collect(),
        }
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, String> {
        RuleSet::from_toml(toml_content).map(Self::new)
    }

    pub fn classify(&self, description: &str, source_bank: Option<&str>) -> Option<Outcome> {
        let folded = fold(description);
        if folded.is_empty() {
            return None;
        }

        if let Some(bank) = source_bank {
            if let Some(outcome) = bank_override(bank, &folded) {
                return Some(outcome);
            }
        }

        let bank_table = source_bank.and_then(|bank| self.banks.get(bank));

        if let Some(table) = bank_table {
            if let Some(outcome) = match_table(table, &folded) {
                return Some(outcome);
            }
        }

        for (alias, name) in &self.vouchers {
            if folded.contains(alias.as_str()) {
                return Some(Outcome {
                    name: name.clone(),
                    category: Category::Voucher,
                });
            }
        }

        if bank_table.is_none() {
            if let Some(outcome) = match_table(&self.default_table, &folded) {
                return Some(outcome);
            }
        }

        None
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(RuleSet::builtin())
    }
}

fn compile_table(table: Vec<BrandRule>) -> Vec<CompiledBrand> {
    table
        .into_iter()
        .filter_map(|rule| match regex::Regex::new(&rule.pattern) {
            Ok(regex) => Some(CompiledBrand {
                regex,
                name: rule.name,
            }),
            Err(e) => {
                tracing::warn!("dropping unparseable brand pattern {:?}: {e}", rule.pattern);
                None
            }
        })
        .collect()
}

fn match_table(table: &[CompiledBrand], folded: &str) -> Option<Outcome> {
    table
        .iter()
        .find(|cb| cb.regex.is_match(folded))
        .map(|cb| Outcome {
            name: cb.name.clone(),
            category: Category::Card,
        })
}

/// Special cases that must run before the bank's own table. Banco do
/// Brasil encodes SIPAG settlements with the bare "CR CPS" abbreviation,
/// which would otherwise classify as the card network named after it.
fn bank_override(bank: &str, folded: &str) -> Option<Outcome> {
    match bank {
        "banco_do_brasil" if folded.contains("CR CPS") => Some(Outcome {
            name: "SIPAG".to_string(),
            category: Category::Card,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::default()
    }

    #[test]
    fn bb_cr_cps_abbreviation_wins_over_brand_table() {
        // "VS ELECTRON" alone is VISA ELECTRON, but the CR CPS prefix
        // marks a SIPAG settlement and must be checked first.
        let outcome = classifier()
            .classify("CR CPS VS ELECTRON", Some("banco_do_brasil"))
            .unwrap();
        assert_eq!(outcome.name, "SIPAG");
        assert_eq!(outcome.category, Category::Card);
    }

    #[test]
    fn bb_electron_without_prefix_is_visa_electron() {
        let outcome = classifier()
            .classify("VS ELECTRON 03/11", Some("banco_do_brasil"))
            .unwrap();
        assert_eq!(outcome.name, "VISA ELECTRON");
    }

    #[test]
    fn voucher_alias_matches_any_bank() {
        for bank in [None, Some("itau"), Some("sicoob")] {
            let outcome = classifier().classify("TICKET SERVICOS SA", bank).unwrap();
            assert_eq!(outcome.name, "TICKET SERVICOS SA");
            assert_eq!(outcome.category, Category::Voucher);
        }
    }

    #[test]
    fn voucher_matches_inside_longer_description() {
        let outcome = classifier()
            .classify("PAGTO ALELO REFEICAO LTDA", Some("bradesco"))
            .unwrap();
        assert_eq!(outcome.category, Category::Voucher);
        assert_eq!(outcome.name, "ALELO");
    }

    #[test]
    fn word_boundary_prevents_rede_misfire() {
        // "PAREDE" must not classify as the REDE acquirer.
        assert!(classifier().classify("CONSTRUCOES PAREDE LTDA", Some("itau")).is_none());
        let hit = classifier().classify("CRED REDE ADQ", Some("itau")).unwrap();
        assert_eq!(hit.name, "REDE");
    }

    #[test]
    fn folding_applies_before_matching() {
        let outcome = classifier().classify("crédito-cielo", Some("caixa")).unwrap();
        assert_eq!(outcome.name, "CIELO");
    }

    #[test]
    fn bank_without_table_uses_default_scope() {
        let outcome = classifier().classify("DEP GETNET", Some("sicoob")).unwrap();
        assert_eq!(outcome.name, "GETNET");
    }

    #[test]
    fn bank_with_table_does_not_fall_back_to_default_scope() {
        // SAFRAPAY only exists in the default table; itau has its own.
        assert!(classifier().classify("SAFRAPAY REPASSE", Some("itau")).is_none());
        assert!(classifier().classify("SAFRAPAY REPASSE", Some("inter")).is_some());
    }

    #[test]
    fn bradesco_legacy_visanet_is_cielo() {
        let outcome = classifier().classify("CRED VISANET", Some("bradesco")).unwrap();
        assert_eq!(outcome.name, "CIELO");
    }

    #[test]
    fn unmatched_is_none_not_error() {
        assert!(classifier().classify("TED RECEBIDA FULANO", Some("itau")).is_none());
        assert!(classifier().classify("", None).is_none());
    }

    #[test]
    fn custom_toml_rules_are_honored() {
        let toml_src = r#"
[[banks.banco_xyz]]
pattern = '\bACME PAY\b'
name = "ACME"
"#;
        let classifier = Classifier::from_toml(toml_src).unwrap();
        let outcome = classifier.classify("liq. acme-pay 123", Some("banco_xyz")).unwrap();
        assert_eq!(outcome.name, "ACME");
    }
}
