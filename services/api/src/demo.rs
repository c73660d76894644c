use crate::infra::InMemoryReceiptRepository;
use clap::Args;
use receipt_points::config::ScoringConfig;
use receipt_points::error::AppError;
use receipt_points::receipts::{
    Item, Receipt, ReceiptRepository, ReceiptService, ScoreBreakdown, ScoringEngine,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a receipt JSON document
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the points awarded by each rule
    #[arg(long)]
    pub(crate) breakdown: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the points awarded by each rule
    #[arg(long)]
    pub(crate) breakdown: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { file, breakdown } = args;

    let receipt = load_receipt(&file)?;
    let scored = ScoringEngine::new(false).breakdown(&receipt)?;

    println!("{} ({}): {} points", receipt.retailer, file.display(), scored.total);
    if breakdown {
        print!("{}", render_breakdown(&scored));
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryReceiptRepository::default());
    let service = ReceiptService::new(repository.clone(), ScoringConfig { trace_rules: false });

    println!("Receipt points demo");
    for receipt in reference_receipts() {
        let retailer = receipt.retailer.clone();
        let record = service.process(receipt)?;
        println!("\n- Stored receipt {} from {}", record.id, retailer);

        let scored = service.breakdown(&record.id)?;
        println!("  Points: {}", scored.total);
        if args.breakdown {
            print!("{}", render_breakdown(&scored));
        }
    }

    let stored = repository.len()?;
    println!("\nReceipts held in memory: {stored}");

    Ok(())
}

pub(crate) fn load_receipt(path: &Path) -> Result<Receipt, AppError> {
    let raw = fs::read_to_string(path)?;
    let receipt = serde_json::from_str(&raw)?;
    Ok(receipt)
}

pub(crate) fn render_breakdown(breakdown: &ScoreBreakdown) -> String {
    let mut rendered = String::new();
    for component in &breakdown.components {
        rendered.push_str(&format!(
            "    {:<24} {:>5}  {}\n",
            component.rule.label(),
            component.points,
            component.notes
        ));
    }
    rendered
}

fn reference_receipts() -> Vec<Receipt> {
    vec![
        Receipt {
            retailer: "Target".to_string(),
            purchase_date: "2022-01-01".to_string(),
            purchase_time: "13:01".to_string(),
            total: "35.35".to_string(),
            items: vec![
                Item::new("Mountain Dew 12PK", "6.49"),
                Item::new("Emils Cheese Pizza", "12.25"),
                Item::new("Knorr Creamy Chicken", "1.26"),
                Item::new("Doritos Nacho Cheese", "3.35"),
                Item::new("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
            ],
        },
        Receipt {
            retailer: "M&M Corner Market".to_string(),
            purchase_date: "2022-03-20".to_string(),
            purchase_time: "14:33".to_string(),
            total: "9.00".to_string(),
            items: vec![Item::new("Gatorade", "2.25"); 4],
        },
    ]
}
