use concil_classify::Classifier;
use concil_core::Extraction;

use crate::ofx::{self, OfxBank};

const BANK: OfxBank = OfxBank {
    code: "bradesco",
    label: "Bradesco",
};

pub fn extract_ofx(classifier: &Classifier, data: &[u8]) -> Extraction {
    ofx::extract(classifier, data, &BANK)
}
