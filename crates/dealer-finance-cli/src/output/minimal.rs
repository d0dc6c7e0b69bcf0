use serde_json::Value;

// Checked in order; the first non-null one is the answer.
const PRIORITY_KEYS: &[&str] = &[
    "on_road_price_display",
    "on_road_price",
    "slip",
    "companies",
    "models",
    "variants",
    "mobile_number",
];

/// Print just the headline value.
///
/// EMI results print one `months<TAB>installment` line per tenure; other
/// results print the first well-known field, falling back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = super::payload(value);

    if let Some(Value::Array(schedules)) = result_obj.get("schedules") {
        for s in schedules {
            println!(
                "{}\t{}",
                format_minimal(&s["tenure_months"]),
                format_minimal(&s["monthly_installment_display"])
            );
        }
        return;
    }

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // Option lists print one per line
        Value::Array(items) => items
            .iter()
            .map(format_minimal)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
