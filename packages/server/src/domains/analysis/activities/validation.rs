//! Validation of structured analysis candidates.
//!
//! Field rules run first and every failure is collected. The object-level
//! "at least one product" rule only runs once all field rules pass, over the
//! fully parsed recommendation list. Pure: no I/O, no logging.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crate::domains::analysis::models::{
    AnalysisResponse, Priority, ProductLink, Recommendation, Violation, AT_LEAST_ONE_PRODUCT,
};

lazy_static! {
    // http(s) scheme, then a host with at least one dot.
    static ref PRODUCT_URL: Regex =
        Regex::new(r"^https?://[^\s/?#]+\.[^\s/?#]+(?:[/?#]\S*)?$").unwrap();
}

/// Shallow syntactic check for product links. Says nothing about liveness.
pub fn is_valid_product_url(url: &str) -> bool {
    PRODUCT_URL.is_match(url)
}

/// Validate a candidate object into an [`AnalysisResponse`].
///
/// Returns every violated constraint on failure; never a partial response.
pub fn validate(candidate: &Value) -> Result<AnalysisResponse, Vec<Violation>> {
    let Some(obj) = candidate.as_object() else {
        return Err(vec![Violation::WrongType {
            field: "$".to_string(),
            expected: "a JSON object",
        }]);
    };

    let mut violations = Vec::new();
    let summary = required_text(obj, "summary", "", &mut violations);
    let recommendations = recommendations(obj, &mut violations);

    match (summary, recommendations) {
        (Some(summary), Some(recommendations)) if violations.is_empty() => {
            if recommendations.iter().any(|r| r.product.is_some()) {
                Ok(AnalysisResponse::from_validated(summary, recommendations))
            } else {
                Err(vec![Violation::CrossFieldViolation {
                    rule: AT_LEAST_ONE_PRODUCT,
                    message: "At least one recommendation must include a product link".to_string(),
                }])
            }
        }
        _ => Err(violations),
    }
}

fn recommendations(
    obj: &Map<String, Value>,
    violations: &mut Vec<Violation>,
) -> Option<Vec<Recommendation>> {
    let items = match obj.get("recommendations") {
        None | Some(Value::Null) => {
            violations.push(Violation::MissingField {
                field: "recommendations".to_string(),
            });
            return None;
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            violations.push(Violation::WrongType {
                field: "recommendations".to_string(),
                expected: "an array",
            });
            return None;
        }
    };

    let range = AnalysisResponse::MIN_RECOMMENDATIONS..=AnalysisResponse::MAX_RECOMMENDATIONS;
    if !range.contains(&items.len()) {
        violations.push(Violation::InvalidLength {
            field: "recommendations".to_string(),
            min: AnalysisResponse::MIN_RECOMMENDATIONS,
            max: AnalysisResponse::MAX_RECOMMENDATIONS,
            actual: items.len(),
        });
    }

    // Collect first so every item reports its violations.
    let parsed: Vec<Option<Recommendation>> = items
        .iter()
        .enumerate()
        .map(|(index, item)| recommendation(index, item, violations))
        .collect();
    parsed.into_iter().collect()
}

fn recommendation(
    index: usize,
    item: &Value,
    violations: &mut Vec<Violation>,
) -> Option<Recommendation> {
    let path = format!("recommendations[{}]", index);
    let Some(obj) = item.as_object() else {
        violations.push(Violation::WrongType {
            field: path,
            expected: "an object",
        });
        return None;
    };

    let title = required_text(obj, "title", &path, violations);
    let description = required_text(obj, "description", &path, violations);
    let priority = priority(obj, &path, violations);

    let product_path = format!("{}.product", path);
    let product = match obj.get("product") {
        None | Some(Value::Null) => Some(None),
        Some(Value::Object(link)) => product_link(link, &product_path, violations).map(Some),
        Some(_) => {
            violations.push(Violation::WrongType {
                field: product_path,
                expected: "an object or null",
            });
            None
        }
    };

    Some(Recommendation {
        title: title?,
        description: description?,
        priority: priority?,
        product: product?,
    })
}

fn priority(obj: &Map<String, Value>, path: &str, violations: &mut Vec<Violation>) -> Option<Priority> {
    let field = format!("{}.priority", path);
    match obj.get("priority") {
        None | Some(Value::Null) => {
            violations.push(Violation::MissingField { field });
            None
        }
        Some(Value::String(value)) => match value.parse() {
            Ok(priority) => Some(priority),
            Err(()) => {
                violations.push(Violation::InvalidEnum {
                    field,
                    value: value.clone(),
                });
                None
            }
        },
        Some(other) => {
            violations.push(Violation::InvalidEnum {
                field,
                value: other.to_string(),
            });
            None
        }
    }
}

fn product_link(
    obj: &Map<String, Value>,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Option<ProductLink> {
    let name = required_text(obj, "name", path, violations);

    let url = required_text(obj, "url", path, violations).and_then(|url| {
        if is_valid_product_url(&url) {
            Some(url)
        } else {
            violations.push(Violation::InvalidUrl {
                field: format!("{}.url", path),
                url,
            });
            None
        }
    });

    let price_range = match obj.get("price_range") {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) if s.trim().is_empty() => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(_) => {
            violations.push(Violation::WrongType {
                field: format!("{}.price_range", path),
                expected: "a string or null",
            });
            None
        }
    };

    Some(ProductLink {
        name: name?,
        url: url?,
        price_range: price_range?,
    })
}

/// Non-blank string field. Absent, null and blank all count as missing.
fn required_text(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    let field = if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    };

    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        None | Some(Value::Null) | Some(Value::String(_)) => {
            violations.push(Violation::MissingField { field });
            None
        }
        Some(_) => {
            violations.push(Violation::WrongType {
                field,
                expected: "a string",
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(title: &str, product: Value) -> Value {
        json!({
            "title": title,
            "description": format!("{} description", title),
            "priority": "medium",
            "product": product,
        })
    }

    fn humidifier() -> Value {
        json!({
            "name": "LEVOIT Humidifier",
            "url": "https://htgsupply.com/products/levoit-humidifier",
            "price_range": "$40-50",
        })
    }

    #[test]
    fn url_check_accepts_scheme_and_dotted_host() {
        assert!(is_valid_product_url("https://htgsupply.com/products/x"));
        assert!(is_valid_product_url("http://acinfinity.com"));
        assert!(is_valid_product_url("https://www.amazon.com/dp/B01MYGNGKK?th=1"));
    }

    #[test]
    fn url_check_rejects_malformed_urls() {
        for url in [
            "not-a-url",
            "ftp://x.com",
            "ftp://invalid-protocol.com",
            "www.no-scheme.com",
            "https://nodomain",
            "https://",
            "https://.com",
            "https://two words.com",
            "HTTPS://shout.com",
        ] {
            assert!(!is_valid_product_url(url), "{url} should be rejected");
        }
    }

    #[test]
    fn accepts_two_and_three_recommendations() {
        for count in [2, 3] {
            let recs: Vec<Value> = (0..count)
                .map(|i| rec(&format!("Rec {}", i), if i == 0 { humidifier() } else { Value::Null }))
                .collect();
            let response = validate(&json!({"summary": "ok", "recommendations": recs})).unwrap();
            assert_eq!(response.recommendations().len(), count);
        }
    }

    #[test]
    fn rejects_counts_outside_two_to_three() {
        for count in [0, 1, 4, 5] {
            let recs: Vec<Value> = (0..count).map(|i| rec(&format!("Rec {}", i), humidifier())).collect();
            let errors = validate(&json!({"summary": "ok", "recommendations": recs})).unwrap_err();
            assert!(
                errors.iter().any(|v| matches!(v, Violation::InvalidLength { actual, .. } if *actual == count)),
                "count {count}: {errors:?}"
            );
        }
    }

    #[test]
    fn cross_field_rule_requires_a_product() {
        let candidate = json!({
            "summary": "ok",
            "recommendations": [rec("A", Value::Null), rec("B", Value::Null)],
        });
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            Violation::CrossFieldViolation { rule, .. } if *rule == AT_LEAST_ONE_PRODUCT
        ));
        assert_eq!(
            errors[0].to_string(),
            "At least one recommendation must include a product link"
        );
    }

    #[test]
    fn cross_field_rule_waits_for_field_rules() {
        let candidate = json!({
            "summary": "",
            "recommendations": [rec("A", Value::Null), rec("B", Value::Null)],
        });
        let errors = validate(&candidate).unwrap_err();
        assert_eq!(
            errors,
            vec![Violation::MissingField {
                field: "summary".into()
            }]
        );
    }

    #[test]
    fn collects_every_violation() {
        let candidate = json!({
            "recommendations": [
                {"title": "", "description": "d", "priority": "urgent"},
                {"title": "t", "description": "d", "priority": "High",
                 "product": {"name": "Fan", "url": "www.no-scheme.com"}},
            ],
        });
        let errors = validate(&candidate).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(Violation::field).collect();

        assert_eq!(
            fields,
            vec![
                "summary",
                "recommendations[0].title",
                "recommendations[0].priority",
                "recommendations[1].priority",
                "recommendations[1].product.url",
            ]
        );
        assert!(matches!(&errors[2], Violation::InvalidEnum { value, .. } if value == "urgent"));
        assert!(matches!(&errors[4], Violation::InvalidUrl { url, .. } if url == "www.no-scheme.com"));
    }

    #[test]
    fn wrong_types_are_reported_not_coerced() {
        let candidate = json!({
            "summary": 42,
            "recommendations": [
                {"title": "t", "description": "d", "priority": 1, "product": "https://x.com"},
                "just text",
            ],
        });
        let errors = validate(&candidate).unwrap_err();
        assert!(errors.contains(&Violation::WrongType {
            field: "summary".into(),
            expected: "a string"
        }));
        assert!(errors.contains(&Violation::InvalidEnum {
            field: "recommendations[0].priority".into(),
            value: "1".into()
        }));
        assert!(errors.contains(&Violation::WrongType {
            field: "recommendations[0].product".into(),
            expected: "an object or null"
        }));
        assert!(errors.contains(&Violation::WrongType {
            field: "recommendations[1]".into(),
            expected: "an object"
        }));
    }

    #[test]
    fn non_object_candidate_is_rejected() {
        let errors = validate(&json!(["summary"])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "$");
    }

    #[test]
    fn blank_price_range_becomes_none() {
        let candidate = json!({
            "summary": "ok",
            "recommendations": [
                rec("A", json!({"name": "Fan", "url": "https://acinfinity.com/fan", "price_range": " "})),
                rec("B", Value::Null),
            ],
        });
        let response = validate(&candidate).unwrap();
        let product = response.recommendations()[0].product.as_ref().unwrap();
        assert_eq!(product.price_range, None);
        assert_eq!(product.url, "https://acinfinity.com/fan");
    }
}
