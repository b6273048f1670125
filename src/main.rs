use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use chrono::{Local, Utc};
use clap::Parser;
use dotenvy::dotenv;
use invoice_service::application::draft_request::DraftRequest;
use invoice_service::domain::catalog::CatalogRef;
use invoice_service::domain::draft::TAX_RATE_PERCENT;
use invoice_service::domain::invoice::Invoice;
use invoice_service::export::{default_file_name, Report};
use invoice_service::format::{format_currency, format_date};
use invoice_service::infrastructure::seed;
use invoice_service::{AppError, Config, DraftEngine, InMemoryInvoiceRepository, InvoiceService};

/// Create an invoice from a JSON draft request.
#[derive(Debug, Parser)]
#[command(name = "invoice-service", version)]
struct Cli {
    /// JSON file with number, date, customerId, paymentTermId,
    /// salespersonId, comments and lines.
    request: PathBuf,

    /// Write the JSON report here after saving. A directory gets the
    /// default report file name.
    #[arg(long, env = "INVOICE_EXPORT_PATH")]
    export: Option<PathBuf>,

    /// Load the sample invoices before creating the new one.
    #[arg(long)]
    with_samples: bool,
}

fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{}", e);
        if let AppError::Rejected(violations) = &e {
            for v in violations {
                eprintln!("  {}: {}", v.field(), v);
            }
        }
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env()?;
    let catalog = seed::catalog();
    let mut repo = InMemoryInvoiceRepository::new(&config);
    if cli.with_samples {
        let samples = seed::seed_invoices(&mut repo, &catalog)?;
        log::info!("Loaded {} sample invoices", samples.len());
    }
    let mut service = InvoiceService::new(repo, catalog);

    let request: DraftRequest = serde_json::from_reader(BufReader::new(File::open(&cli.request)?))?;
    let mut engine = DraftEngine::new();
    service.start_draft(&mut engine, &request)?;
    let invoice = service.submit(&mut engine)?;
    print_summary(&invoice);

    if let Some(mut path) = cli.export {
        if path.is_dir() {
            path.push(default_file_name(Local::now().date_naive()));
        }
        let report = Report::new(service.catalog(), service.repository().all(), Utc::now());
        report.write_to(BufWriter::new(File::create(&path)?))?;
        log::info!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_summary(invoice: &Invoice) {
    let header = &invoice.header;
    let name = |r: &Option<CatalogRef>| {
        r.as_ref().map(|r| r.display_name.clone()).unwrap_or_default()
    };

    println!("Invoice {} ({})", header.number, invoice.status);
    println!("  Date:          {}", format_date(header.date));
    println!("  Customer:      {}", name(&header.customer));
    println!("  Payment terms: {}", name(&header.payment_term));
    println!("  Salesperson:   {}", name(&header.salesperson));
    if !header.comments.is_empty() {
        println!("  Comments:      {}", header.comments);
    }
    println!();
    for item in &invoice.items {
        println!(
            "  {:<30} {:>4} x {:>12} = {:>12}",
            item.description(),
            item.quantity(),
            format_currency(item.unit_price()),
            format_currency(item.line_subtotal())
        );
    }
    println!();
    println!("  {:>52} {:>12}", "Subtotal", format_currency(&invoice.subtotal));
    println!(
        "  {:>52} {:>12}",
        format!("Tax ({}%)", TAX_RATE_PERCENT),
        format_currency(&invoice.tax)
    );
    println!("  {:>52} {:>12}", "Total", format_currency(&invoice.total));
}
