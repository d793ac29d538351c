use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One ordered brand/acquirer rule: a regex applied to the folded
/// description. First match in table order wins — several patterns are
/// substrings of others, so ordering and word-boundary anchors matter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandRule {
    pub pattern: String,
    pub name: String,
}

/// Voucher processors are recognized by alias containment on the folded
/// text, shared across every bank scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherAlias {
    pub alias: String,
    pub name: String,
}

/// The full rule configuration: one table per bank code, a default table
/// for banks without their own, and the shared voucher aliases. Plain
/// data — the matching precedence lives in [`crate::Classifier`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub banks: BTreeMap<String, Vec<BrandRule>>,
    #[serde(default)]
    pub default: Vec<BrandRule>,
    #[serde(default)]
    pub vouchers: Vec<VoucherAlias>,
}

impl RuleSet {
    pub fn from_toml(toml_content: &str) -> Result<Self, String> {
        toml::from_str(toml_content).map_err(|e| format!("Failed to parse rule TOML: {e}"))
    }

    /// The compiled-in tables covering the institutions this pipeline ships
    /// support for. Patterns match against folded text (see
    /// [`crate::fold`]), so they never need to mention case or diacritics.
    pub fn builtin() -> Self {
        fn r(pattern: &str, name: &str) -> BrandRule {
            BrandRule {
                pattern: pattern.to_string(),
                name: name.to_string(),
            }
        }
        fn v(alias: &str, name: &str) -> VoucherAlias {
            VoucherAlias {
                alias: alias.to_string(),
                name: name.to_string(),
            }
        }

        let mut banks = BTreeMap::new();

        // Banco do Brasil statements name the card network of the SIPAG
        // settlement; ELECTRON must be tested before the bare VISA rule.
        banks.insert(
            "banco_do_brasil".to_string(),
            vec![
                r(r"\bVS ELECTRON\b|\bVISA ELECTRON\b", "VISA ELECTRON"),
                r(r"\bCIELO\b", "CIELO"),
                r(r"\bREDE\b", "REDE"),
                r(r"\bGETNET\b", "GETNET"),
                r(r"\bSTONE\b", "STONE"),
                r(r"\bSIPAG\b", "SIPAG"),
                r(r"\bVISA\b", "VISA"),
                r(r"\bMASTERCARD\b|\bMASTER CARD\b", "MASTERCARD"),
                r(r"\bELO\b", "ELO"),
            ],
        );

        banks.insert(
            "itau".to_string(),
            vec![
                r(r"\bREDECARD\b|\bREDE\b", "REDE"),
                r(r"\bCIELO\b", "CIELO"),
                r(r"\bVISA ELECTRON\b", "VISA ELECTRON"),
                r(r"\bVISA\b", "VISA"),
                r(r"\bMASTERCARD\b|\bMAESTRO\b", "MASTERCARD"),
                r(r"\bELO\b", "ELO"),
                r(r"\bHIPERCARD\b", "HIPERCARD"),
            ],
        );

        // Bradesco still emits the pre-2010 VISANET label for Cielo.
        banks.insert(
            "bradesco".to_string(),
            vec![
                r(r"\bVISANET\b", "CIELO"),
                r(r"\bCIELO\b", "CIELO"),
                r(r"\bREDE\b", "REDE"),
                r(r"\bAMEX\b|\bAMERICAN EXPRESS\b", "AMERICAN EXPRESS"),
                r(r"\bVISA\b", "VISA"),
                r(r"\bMASTERCARD\b", "MASTERCARD"),
                r(r"\bELO\b", "ELO"),
            ],
        );

        banks.insert(
            "santander".to_string(),
            vec![
                r(r"\bGETNET\b|\bGET NET\b", "GETNET"),
                r(r"\bCIELO\b", "CIELO"),
                r(r"\bREDE\b", "REDE"),
                r(r"\bVISA\b", "VISA"),
                r(r"\bMASTERCARD\b", "MASTERCARD"),
            ],
        );

        banks.insert(
            "caixa".to_string(),
            vec![
                // Caixa brands its Cielo-operated POS as "Azulzinha".
                r(r"\bAZULZINHA\b", "CIELO"),
                r(r"\bCIELO\b", "CIELO"),
                r(r"\bREDE\b", "REDE"),
                r(r"\bVISA\b", "VISA"),
                r(r"\bMASTERCARD\b", "MASTERCARD"),
                r(r"\bELO\b", "ELO"),
            ],
        );

        // Brand-column values of acquirer sales exports.
        banks.insert(
            "cielo".to_string(),
            vec![
                r(r"\bVISA ELECTRON\b", "VISA ELECTRON"),
                r(r"\bVISA\b", "VISA"),
                r(r"\bMAESTRO\b", "MAESTRO"),
                r(r"\bMASTERCARD\b|\bMASTER CARD\b", "MASTERCARD"),
                r(r"\bELO\b", "ELO"),
                r(r"\bAMEX\b|\bAMERICAN EXPRESS\b", "AMERICAN EXPRESS"),
                r(r"\bHIPERCARD\b", "HIPERCARD"),
                r(r"\bCABAL\b", "CABAL"),
            ],
        );

        // Fallback scope for banks without a table of their own
        // (sicoob, sicredi, inter).
        let default = vec![
            r(r"\bVS ELECTRON\b|\bVISA ELECTRON\b", "VISA ELECTRON"),
            r(r"\bVISA\b", "VISA"),
            r(r"\bMASTERCARD\b|\bMASTER CARD\b", "MASTERCARD"),
            r(r"\bMAESTRO\b", "MAESTRO"),
            r(r"\bELO\b", "ELO"),
            r(r"\bAMEX\b|\bAMERICAN EXPRESS\b", "AMERICAN EXPRESS"),
            r(r"\bHIPERCARD\b", "HIPERCARD"),
            r(r"\bCABAL\b", "CABAL"),
            r(r"\bCIELO\b", "CIELO"),
            r(r"\bREDE\b", "REDE"),
            r(r"\bGETNET\b", "GETNET"),
            r(r"\bSTONE\b", "STONE"),
            r(r"\bSIPAG\b", "SIPAG"),
            r(r"\bSAFRAPAY\b", "SAFRAPAY"),
            r(r"\bSUMUP\b", "SUMUP"),
            r(r"\bPAGSEGURO\b|\bPAGBANK\b", "PAGSEGURO"),
            r(r"\bMERCADO PAGO\b|\bMERCADOPAGO\b", "MERCADO PAGO"),
            r(r"\bVERO\b", "VERO"),
        ];

        let vouchers = vec![
            v("TICKET SERVICOS SA", "TICKET SERVICOS SA"),
            v("TICKET SERVICOS", "TICKET SERVICOS SA"),
            v("TICKET LOG", "TICKET LOG"),
            v("ALELO", "ALELO"),
            v("SODEXO", "SODEXO"),
            v("PLUXEE", "PLUXEE"),
            v("VR BENEFICIOS", "VR BENEFICIOS"),
            v("BEN VISA VALE", "BEN VISA VALE"),
            v("GREEN CARD", "GREEN CARD"),
            v("GREENCARD", "GREEN CARD"),
            v("UP BRASIL", "UP BRASIL"),
            v("VEROCHEQUE", "VEROCHEQUE"),
        ];

        RuleSet {
            banks,
            default,
            vouchers,
        }
    }
}
