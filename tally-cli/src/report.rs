//! Plain-text rendering of an analysis.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt::{Display, Write};
use tally_core::{Analysis, ColumnProfile, Flow, Role, RoleMap};

pub fn render_analysis(a: &Analysis, show_transactions: bool) -> String {
    let mut out = String::new();

    let roles: Vec<String> = a.roles.iter().map(|(r, c)| format!("{r}={c}")).collect();
    let _ = writeln!(out, "Columns: {}", roles.join("  "));
    match &a.range {
        Some(r) => {
            let _ = writeln!(out, "Range:   {} .. {}", r.start, r.end);
        }
        None => {
            let _ = writeln!(out, "Range:   (no transactions)");
        }
    }
    let _ = writeln!(
        out,
        "Rows:    {} transactions, {} in range, {} dropped ({} bad date, {} bad amount)",
        a.transactions.len(),
        a.summary.count,
        a.dropped.total(),
        a.dropped.bad_date,
        a.dropped.bad_amount
    );

    let t = &a.summary.totals;
    let _ = writeln!(out, "\n## Totals\n");
    let _ = writeln!(out, "  inflow   {:>14.2}", t.inflow);
    let _ = writeln!(out, "  outflow  {:>14.2}", t.outflow);
    let _ = writeln!(out, "  balance  {:>14.2}", t.balance);

    flow_table(&mut out, "Daily", &a.summary.daily);
    flow_table(&mut out, "Fortnightly", &a.summary.fortnightly);
    flow_table(&mut out, "Monthly", &a.summary.monthly);

    if !a.summary.outflow_by_description.is_empty() {
        let _ = writeln!(out, "\n## Outflows by description\n");
        let mut rows: Vec<(&String, &Decimal)> = a.summary.outflow_by_description.iter().collect();
        rows.sort_by(|x, y| y.1.cmp(x.1).then_with(|| x.0.cmp(y.0)));
        for (desc, amount) in rows {
            let _ = writeln!(out, "  {:>14.2}  {}", amount, desc);
        }
    }

    if show_transactions {
        let _ = writeln!(out, "\n## Transactions\n");
        for txn in &a.transactions {
            let _ = writeln!(
                out,
                "  {} | {:>12.2} | {} | {} | {}",
                txn.date,
                txn.signed_amount(),
                txn.description.as_deref().unwrap_or(""),
                txn.counterparty.as_deref().unwrap_or(""),
                txn.reference.as_deref().unwrap_or("")
            );
        }
    }

    out
}

fn flow_table<K: Display>(out: &mut String, title: &str, rows: &BTreeMap<K, Flow>) {
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n## {title}\n");
    let _ = writeln!(
        out,
        "  {:<12} {:>14} {:>14} {:>14}",
        "period", "inflow", "outflow", "net"
    );
    for (key, flow) in rows {
        let _ = writeln!(
            out,
            "  {:<12} {:>14.2} {:>14.2} {:>14.2}",
            key.to_string(),
            flow.inflow,
            flow.outflow,
            flow.net()
        );
    }
}

pub fn render_columns(roles: &RoleMap, profiles: &[ColumnProfile]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:<18} {:>9} {:>7} {:>7}",
        "column", "role", "non-empty", "date%", "amount%"
    );
    for p in profiles {
        let role = roles
            .role_of(&p.name)
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<28} {:<18} {:>9} {:>7.0} {:>7.0}",
            p.name,
            role,
            p.non_empty,
            p.date_fraction * 100.0,
            p.amount_fraction * 100.0
        );
    }
    out
}

/// Flag that sets a role explicitly.
pub fn override_flag(role: Role) -> &'static str {
    match role {
        Role::Date => "--date-column",
        Role::Amount => "--amount-column",
        Role::Type => "--type-column",
        Role::Description => "--description-column",
        Role::CounterpartyRef => "--reference-column",
    }
}
