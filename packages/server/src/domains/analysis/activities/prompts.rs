//! Prompt assembly for both completion passes.
//!
//! Output is a pure function of the inputs: no timestamps, no randomness.

use crate::domains::analysis::models::GrowthStage;
use crate::domains::products::ProductCatalog;

/// System and user message for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

const ASSISTANT_PREAMBLE: &str = r#"You are a helpful assistant responding to indoor cannabis growers, optimizing their grow environments.

These users will include a csv file that details environmental factors like humidity, PPFD, temperature, moisture levels, etc.

Some users may provide more or less of this data.

They will also let you know what stage of growth they're optimizing for: seedling, vegetation, or flowering."#;

const OUTPUT_CONTRACT: &str = r#"To help growers reach these ranges, suggest practical steps they can take like adding a humidifier to their environment, ways they can adjust the arrangement of the plants, etc.

Your answer must contain:
- A brief summary of the current environmental conditions and the main issues.
- Between 2 and 3 actionable recommendations.
- A priority for every recommendation: high, medium, or low, based on impact on plant health.
- A product link on at least one recommendation, as an example of equipment they could use. Give the product name, a full http(s) URL and, if known, an estimated price range."#;

const NO_CATALOG_GUIDANCE: &str = "No curated product list is available. Link to products from well-known grow-supply retailers and use complete URLs.";

const RESTRUCTURE_SYSTEM: &str = r#"You convert a grow-room environment analysis into structured JSON.

Rules:
- Keep the original wording, recommendations, and product links. Do not invent new facts.
- "summary": a brief overview of the conditions and main issues.
- "recommendations": 2 or 3 items, each with "title", "description", "priority" ("high", "medium", or "low") and "product".
- "product" is either null or an object with "name", "url" (full http:// or https:// URL) and "price_range" (string or null).
- At least one recommendation must include a product."#;

/// Stage-independent domain instructions.
pub fn build_system_prompt(catalog: Option<&ProductCatalog>) -> String {
    let mut prompt = String::from(ASSISTANT_PREAMBLE);

    prompt.push_str(
        "\n\nHere are the VPD ranges, temperature, and humidity to optimize for each of those stages:\n",
    );
    for stage in GrowthStage::ALL {
        prompt.push_str(&format!("{} -- {}\n", stage, stage.targets()));
    }

    prompt.push('\n');
    prompt.push_str(OUTPUT_CONTRACT);

    match catalog.filter(|c| !c.is_empty()) {
        Some(catalog) => {
            prompt.push_str(
                "\n\nOnly recommend products from this curated list, copying names and URLs exactly:\n",
            );
            prompt.push_str(&catalog.to_prompt_block());
        }
        None => {
            prompt.push_str("\n\n");
            prompt.push_str(NO_CATALOG_GUIDANCE);
        }
    }

    prompt
}

/// Per-request message naming the stage and quoting the digest.
pub fn build_user_prompt(stage: GrowthStage, digest: &str) -> String {
    format!(
        "Growth Stage: {stage}\n\n{digest}\n\nPlease analyze this environmental data for the {stage} stage and provide recommendations for optimization."
    )
}

/// Prompts for the first, free-form pass.
pub fn build_prompts(
    stage: GrowthStage,
    digest: &str,
    catalog: Option<&ProductCatalog>,
) -> PromptPair {
    PromptPair {
        system: build_system_prompt(catalog),
        user: build_user_prompt(stage, digest),
    }
}

/// Prompts for the second pass, re-expressing the free-form answer as JSON.
pub fn build_restructure_prompts(freeform: &str) -> PromptPair {
    PromptPair {
        system: RESTRUCTURE_SYSTEM.to_string(),
        user: format!("Convert this analysis:\n\n{}", freeform.trim()),
    }
}
