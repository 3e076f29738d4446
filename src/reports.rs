//! Monthly aggregation. Two explicit passes: a dataset-global distinct
//! customer count, then a per-month group-by. Distinct counts are exact hash
//! sets, never estimates, because the global subtraction below only makes
//! sense against exact cardinalities.

use crate::types::{CleanRecord, MonthlySummaryRow};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct MonthAcc {
    stock_codes: HashSet<String>,
    customers: HashSet<i64>,
    quantity: i64,
    sales: f64,
}

/// Count distinct customers across the whole cleaned dataset (pass A).
pub fn global_unique_customers(data: &[CleanRecord]) -> usize {
    data.iter().map(|r| r.customer_id).collect::<HashSet<_>>().len()
}

/// Build one summary row per invoice month, sorted descending by month key
/// (pass B plus the combine step).
pub fn monthly_summary(data: &[CleanRecord]) -> Vec<MonthlySummaryRow> {
    let global_customers = global_unique_customers(data);

    let mut groups: HashMap<String, MonthAcc> = HashMap::new();
    for r in data {
        let acc = groups.entry(r.invoice_month.clone()).or_default();
        acc.stock_codes.insert(r.stock_code.clone());
        acc.customers.insert(r.customer_id);
        acc.quantity += r.quantity;
        acc.sales += r.total_sales;
    }

    let mut rows: Vec<MonthlySummaryRow> = groups
        .into_iter()
        .map(|(invoice_month, acc)| {
            let customers_bought = acc.customers.len();
            // Every group draws from the same records as the global count,
            // so this can only fire on a logic defect. Abort loudly rather
            // than emit a wrong report.
            assert!(
                customers_bought <= global_customers,
                "month {} counts {} distinct customers against {} globally",
                invoice_month,
                customers_bought,
                global_customers
            );
            MonthlySummaryRow {
                invoice_month,
                total_products_sold: acc.stock_codes.len(),
                total_quantity: acc.quantity,
                total_sales: format!("{:.2}", acc.sales),
                customers_bought,
                customers_who_bought_nothing: global_customers - customers_bought,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.invoice_month.cmp(&a.invoice_month));
    rows
}
