//! End-to-end billing walkthrough on the in-memory demo store

use billing_core::utils::MemoryStorage;
use billing_core::{BillingConfig, BillingDesk, BillingMode, CustomerDetails, LineItemInput, PriceMode};
use bigdecimal::BigDecimal;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BillingConfig::load_or_default(Some(Path::new("billing.toml")));

    let mut desk = BillingDesk::with_config(MemoryStorage::new(), config);

    println!("Catalog");
    let products = desk.seed_demo_products().await?;
    for product in &products {
        println!("  {:<20} {:>8}", product.name, product.price);
    }
    println!();

    // Product bill: 2 x Engine Oil, Brake Pads, Oil Filter
    let mut draft = desk.new_draft(BillingMode::Product);
    for product in products.iter().rev() {
        desk.add_product_to_draft(&mut draft, &product.id).await?;
    }
    let oil = products
        .iter()
        .find(|p| p.name.starts_with("Engine Oil"))
        .ok_or("engine oil missing from catalog")?;
    desk.add_product_to_draft(&mut draft, &oil.id).await?;

    let customer = CustomerDetails {
        name: "ravi kumar".to_string(),
        phone: "9876543210".to_string(),
        vehicle_number: "TN 09 AB 1234".to_string(),
        vehicle_name: "Maruti Swift".to_string(),
        gst_number: None,
    };
    let invoice = desk.save_bill(customer, &draft).await?;
    println!("{}", invoice.render_text());

    // Labour bill with a lump-sum service charge
    let mut labour = desk.new_draft(BillingMode::Labour);
    labour.add_line(&LineItemInput::new(
        "General service",
        Some(3),
        Some(BigDecimal::from(1500)),
        PriceMode::Total,
    ))?;
    let customer = CustomerDetails {
        name: "priya".to_string(),
        phone: "9123456780".to_string(),
        vehicle_number: "TN 10 CD 5678".to_string(),
        vehicle_name: "Honda City".to_string(),
        gst_number: Some("33ABCDE1234F1Z5".to_string()),
    };
    let invoice = desk.save_bill(customer, &labour).await?;
    println!("{}", invoice.render_text());

    println!("History");
    for summary in desk.list_bills().await? {
        let name = summary
            .customer
            .map(|c| c.details.name)
            .unwrap_or_else(|| "(unknown)".to_string());
        println!(
            "  #{:<4} {:<12} {:>10}",
            summary.bill.invoice_no, name, summary.bill.total_amount
        );
    }
    println!();

    let stats = desk.dashboard(None).await?;
    println!(
        "Dashboard {}: sales {} over {} orders, {} products, {} customers",
        stats.year, stats.total_sales, stats.total_orders, stats.total_products, stats.total_customers
    );

    Ok(())
}
