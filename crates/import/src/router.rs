use std::fmt;
use std::str::FromStr;

use concil_classify::Classifier;
use concil_core::Extraction;

use crate::banks;

/// Statement file formats the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Ofx,
    Xlsx,
    Pdf,
    Txt,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Ofx => "OFX",
            Format::Xlsx => "XLSX",
            Format::Pdf => "PDF",
            Format::Txt => "TXT",
        };
        f.write_str(name)
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ofx" => Ok(Format::Ofx),
            "xlsx" | "xls" => Ok(Format::Xlsx),
            "pdf" => Ok(Format::Pdf),
            "txt" => Ok(Format::Txt),
            other => Err(format!("unsupported statement format: {other}")),
        }
    }
}

type Handler = fn(&Classifier, &[u8]) -> Extraction;

/// Every supported (institution, format) pair, in one place. Adding an
/// institution means adding its module under `banks` and a line here.
const REGISTRY: &[(&str, Format, Handler)] = &[
    ("banco_do_brasil", Format::Ofx, banks::banco_do_brasil::extract_ofx),
    ("banco_do_brasil", Format::Txt, banks::banco_do_brasil::extract_txt),
    ("itau", Format::Ofx, banks::itau::extract_ofx),
    ("itau", Format::Xlsx, banks::itau::extract_xlsx),
    ("bradesco", Format::Ofx, banks::bradesco::extract_ofx),
    ("sicoob", Format::Ofx, banks::sicoob::extract_ofx),
    ("santander", Format::Xlsx, banks::santander::extract_xlsx),
    ("inter", Format::Xlsx, banks::inter::extract_xlsx),
    ("caixa", Format::Pdf, banks::caixa::extract_pdf),
    ("sicredi", Format::Pdf, banks::sicredi::extract_pdf),
    ("cielo", Format::Xlsx, banks::cielo::extract_xlsx),
];

/// Entry point of the pipeline: owns the classifier (rule tables are
/// compiled once) and dispatches statement bytes to the registered
/// extractor. Never returns a bare error; unknown pairs and extractor
/// failures all come back as the `Err` arm of the envelope.
pub struct Router {
    classifier: Classifier,
}

impl Router {
    pub fn new(classifier: Classifier) -> Self {
        Router { classifier }
    }

    pub fn extract(&self, institution: &str, format: Format, data: &[u8]) -> Extraction {
        let key = institution.trim().to_ascii_lowercase();
        match REGISTRY
            .iter()
            .find(|(code, fmt, _)| *code == key && *fmt == format)
        {
            Some((_, _, handler)) => {
                tracing::info!(institution = %key, %format, bytes = data.len(), "dispatching statement");
                handler(&self.classifier, data)
            }
            None => Extraction::err(format!(
                "no importer registered for {institution} ({format})"
            )),
        }
    }

    /// The registered (institution, format) pairs, for surfacing in UIs
    /// and diagnostics.
    pub fn supported() -> impl Iterator<Item = (&'static str, Format)> {
        REGISTRY.iter().map(|(code, fmt, _)| (*code, *fmt))
    }
}

impl Default for Router {
    fn default() -> Self {
        Router::new(Classifier::default())
    }
}
