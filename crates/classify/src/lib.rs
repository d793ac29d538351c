pub mod classifier;
pub mod normalize;
pub mod rules;

pub use classifier::{Category, Classifier, Outcome};
pub use normalize::fold;
pub use rules::{BrandRule, RuleSet, VoucherAlias};
