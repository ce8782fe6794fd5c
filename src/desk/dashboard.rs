//! Yearly revenue statistics

use bigdecimal::{BigDecimal, Zero};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::types::Bill;

/// Short month names used as chart labels
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Sales of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub month: String,
    pub sales: BigDecimal,
}

/// Dashboard figures for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub year: i32,
    /// Sum of bill subtotals in the year
    pub total_sales: BigDecimal,
    pub total_orders: usize,
    /// Catalog size, not restricted to the year
    pub total_products: usize,
    /// Customer count, not restricted to the year
    pub total_customers: usize,
    /// Always twelve entries, January first
    pub monthly_sales: Vec<MonthlySales>,
    /// Years with bills plus the current year, newest first
    pub available_years: Vec<i32>,
}

/// Years that have bills, plus the current year, sorted descending
pub fn available_years(bills: &[Bill], current_year: i32) -> Vec<i32> {
    let mut years: Vec<i32> = bills.iter().map(|bill| bill.created_at.year()).collect();
    years.push(current_year);
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Aggregate the bills created in `year`
pub fn dashboard_stats(
    bills: &[Bill],
    year: i32,
    current_year: i32,
    total_products: usize,
    total_customers: usize,
) -> DashboardStats {
    let mut monthly: Vec<BigDecimal> = vec![BigDecimal::zero(); 12];
    let mut total_sales = BigDecimal::zero();
    let mut total_orders = 0;

    for bill in bills.iter().filter(|bill| bill.created_at.year() == year) {
        let month = bill.created_at.month0() as usize;
        monthly[month] += &bill.total_amount;
        total_sales += &bill.total_amount;
        total_orders += 1;
    }

    DashboardStats {
        year,
        total_sales,
        total_orders,
        total_products,
        total_customers,
        monthly_sales: MONTHS
            .iter()
            .zip(monthly)
            .map(|(month, sales)| MonthlySales {
                month: month.to_string(),
                sales,
            })
            .collect(),
        available_years: available_years(bills, current_year),
    }
}
