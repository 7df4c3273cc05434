//! Parse command - extract data from a single receipt text file.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use recr_core::models::config::ParserConfig;
use recr_core::{Receipt, ReceiptParser, TextParser};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file ("-" reads stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence score
    #[arg(long)]
    show_confidence: bool,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (one row per line item)
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        fs::read_to_string(&args.input)?
    };

    info!("Parsing {} characters of receipt text", text.len());

    let parser = ReceiptParser::with_config(config)?;
    let receipt = parser.parse(&text);

    // Validate if requested
    if args.validate {
        let issues = receipt.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    // Format output
    let output = format_receipt(&receipt, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if receipt.metadata.sample_data {
        eprintln!(
            "{} No usable data extracted - output is sample data",
            style("!").yellow()
        );
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            receipt.metadata.confidence * 100.0
        );
        if let Some(time_ms) = receipt.metadata.processing_time_ms {
            println!("{} Processing time: {}ms", style("ℹ").blue(), time_ms);
        }
    }

    Ok(())
}

/// Load a parser configuration from file, or fall back to the built-ins.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ParserConfig> {
    match config_path {
        Some(path) => Ok(ParserConfig::from_file(std::path::Path::new(path))?),
        None => Ok(ParserConfig::default()),
    }
}

/// Render a receipt in the requested output format.
pub fn format_receipt(receipt: &Receipt, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(receipt)?),
        OutputFormat::Csv => format_receipt_csv(receipt),
        OutputFormat::Text => Ok(format_receipt_text(receipt)),
    }
}

fn format_receipt_csv(receipt: &Receipt) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "merchant",
        "date",
        "item",
        "quantity",
        "category",
        "price",
        "subtotal",
        "tax",
        "total",
        "payment_method",
    ])?;

    for item in &receipt.items {
        wtr.write_record([
            &receipt.merchant,
            &receipt.date.to_string(),
            &item.name,
            &item.quantity.to_string(),
            item.category.as_str(),
            &item.price.to_string(),
            &receipt.totals.subtotal.to_string(),
            &receipt.totals.tax.to_string(),
            &receipt.totals.total.to_string(),
            receipt.payment_method.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_receipt_text(receipt: &Receipt) -> String {
    let mut output = String::new();

    output.push_str(&format!("Merchant: {}\n", receipt.merchant));
    output.push_str(&format!("Date: {}\n", receipt.date));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &receipt.items {
        output.push_str(&format!(
            "  {} x {:<40} {:>8}  ({})\n",
            item.quantity,
            item.name,
            item.price,
            item.category.as_str()
        ));
    }
    output.push('\n');

    output.push_str("Summary:\n");
    output.push_str(&format!("  Subtotal: {}\n", receipt.totals.subtotal));
    output.push_str(&format!("  Tax:      {}\n", receipt.totals.tax));
    output.push_str(&format!("  Total:    {}\n", receipt.totals.total));
    output.push_str(&format!(
        "  Payment:  {}\n",
        receipt.payment_method.as_str()
    ));

    match receipt.return_deadline {
        Some(deadline) => output.push_str(&format!(
            "\nReturn within {} days (by {})\n",
            receipt.return_policy_days, deadline
        )),
        None => output.push_str(&format!(
            "\nReturn within {} days\n",
            receipt.return_policy_days
        )),
    }

    if receipt.metadata.sample_data {
        output.push_str("\n[sample data - nothing usable was extracted]\n");
    }

    output
}
