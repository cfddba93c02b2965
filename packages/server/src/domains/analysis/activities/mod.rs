pub mod analyze;
pub mod csv_digest;
pub mod prompts;
pub mod validation;

pub use analyze::{analyze, analyze_with_deps, parse_structured_output};
pub use csv_digest::{parse_csv, summarize_csv, EnvironmentalReading, ParsedCsv, NO_DATA_SENTINEL};
pub use prompts::{build_prompts, build_restructure_prompts, PromptPair};
pub use validation::{is_valid_product_url, validate};
