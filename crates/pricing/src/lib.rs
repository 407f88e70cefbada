//! Price-analysis valuation methods on top of `appraise-engine`.
//!
//! Provides the records the engine reads (surveys, templates, the subject
//! property), the numeric primitives, the field-path registries of the
//! three valuation methods (Direct Comparison, Sale Adjustment Grid,
//! Weighted Quality Score), the rule builders that wire them together, and
//! form generation and save-time validation.

pub mod calc;
pub mod context;
pub mod defaults;
pub mod error;
pub mod form;
pub mod lenient;
pub mod method;
pub mod paths;
pub mod rules;
pub mod survey;
pub mod template;
pub mod validation;

pub use context::{PricingContext, PricingRule};
pub use defaults::PricingDefaults;
pub use error::PricingError;
pub use form::{FormDocument, ValuationForm};
pub use method::ValuationMethod;
pub use survey::{PropertyRecord, QualitativeLevel, QualitativeRow, Survey};
pub use template::Template;
pub use validation::{validate, ValidationIssue};
