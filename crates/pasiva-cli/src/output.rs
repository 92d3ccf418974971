use pasiva_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(envelope)?,
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>) -> Result<(), CliError> {
    println!("request_id  : {}", envelope.meta.request_id);
    println!("generated_at: {}", envelope.meta.generated_at);
    println!("source      : {}", envelope.meta.source);
    println!("latency_ms  : {}", envelope.meta.latency_ms);

    if !envelope.meta.warnings.is_empty() {
        println!("warnings:");
        for warning in &envelope.meta.warnings {
            println!("  - {warning}");
        }
    }

    if let Some(summary) = envelope.data.get("summary") {
        render_summary(summary);
    }

    println!("data:");
    let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
    for line in pretty_data.lines() {
        println!("  {line}");
    }

    if !envelope.errors.is_empty() {
        println!("errors:");
        for error in &envelope.errors {
            println!("  - {}: {}", error.code, error.message);
        }
    }

    Ok(())
}

/// Human view of the global results; the underlying fields stay numeric.
fn render_summary(summary: &Value) {
    let field = |name: &str| summary.get(name).and_then(Value::as_f64);

    println!("summary:");
    if let Some(value) = field("initial_value") {
        println!("  initial portfolio value : {}", fmt_currency(value));
    }
    if let Some(value) = field("final_value") {
        println!("  final portfolio value   : {}", fmt_currency(value));
    }
    if let Some(value) = field("total_return_pct") {
        println!("  return                  : {}", fmt_percent(value));
    }
    if let Some(value) = field("cash") {
        println!("  cash                    : {}", fmt_currency(value));
    }
    if let Some(value) = field("total_capital") {
        println!("  total capital           : {}", fmt_currency(value));
    }
}

fn fmt_currency(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let mut units = (cents / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    while units.len() > 3 {
        let split = units.split_off(units.len() - 3);
        grouped = if grouped.is_empty() {
            split
        } else {
            format!("{split},{grouped}")
        };
    }
    grouped = if grouped.is_empty() {
        units
    } else {
        format!("{units},{grouped}")
    };

    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}

fn fmt_percent(value: f64) -> String {
    format!("{value:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(fmt_currency(0.0), "$0.00");
        assert_eq!(fmt_currency(850.5), "$850.50");
        assert_eq!(fmt_currency(1_076.5), "$1,076.50");
        assert_eq!(fmt_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(fmt_currency(-141.5), "-$141.50");
    }

    #[test]
    fn percent_keeps_two_decimals() {
        assert_eq!(fmt_percent(10.0), "10.00%");
        assert_eq!(fmt_percent(-1.5), "-1.50%");
    }
}
