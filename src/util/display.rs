/// Display utilities for terminal output

use colored::{ColoredString, Colorize};

use crate::core::{RiskLevel, SafetyReport};
use crate::safety::risk_badge;

pub fn paint(text: &str, level: RiskLevel) -> ColoredString {
    match level {
        RiskLevel::Safe => text.green(),
        RiskLevel::Low => text.bright_green(),
        RiskLevel::Medium => text.yellow(),
        RiskLevel::High => text.truecolor(249, 115, 22),
        RiskLevel::Critical => text.red().bold(),
    }
}

fn unknown(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => "unknown".dimmed().to_string(),
    }
}

pub fn render_report(report: &SafetyReport) -> String {
    let badge = risk_badge(report.overall_risk);
    let mut out = String::new();

    out.push_str(&format!("\n{} {}\n", "🛡️", "TOKEN SAFETY REPORT".bold()));
    out.push_str(&format!("{}\n", "=".repeat(70)));
    out.push_str(&format!("   Token: {}\n", report.token_address));
    out.push_str(&format!("   Chain: {}\n", report.chain));
    out.push_str(&format!(
        "   Risk:  {} {} ({}/100)\n",
        badge.emoji,
        paint(badge.text, report.overall_risk),
        report.risk_score
    ));

    let failed = report.failed_checks().count();
    out.push_str(&format!(
        "\n{} {} of {} failed\n",
        "🔍 CHECKS:".bold(),
        failed,
        report.checks.len()
    ));
    for check in &report.checks {
        let mark = if check.passed { "✔".green() } else { "✘".red() };
        out.push_str(&format!(
            "   {} {:<22} {:<10} {}\n",
            mark,
            check.name,
            paint(check.severity.as_str(), check.severity),
            check.details
        ));
    }

    out.push_str(&format!("\n{}\n", "🍯 HONEYPOT:".bold()));
    out.push_str(&format!(
        "   Flagged: {}  Sell tax: {:.0}%  Reason: {}\n",
        if report.honeypot.is_honeypot { "YES".red().bold() } else { "no".green() },
        report.honeypot.sell_tax,
        report.honeypot.reason
    ));

    out.push_str(&format!("\n{}\n", "👥 HOLDERS (estimated):".bold()));
    out.push_str(&format!(
        "   Top 10: {:.0}%  Concentrated: {}\n",
        report.holders.top10_percentage,
        if report.holders.is_concentrated { "yes" } else { "no" }
    ));

    out.push_str(&format!("\n{}\n", "📜 CONTRACT / LP LOCK:".bold()));
    out.push_str(&format!(
        "   Verified: {}  Renounced: {}  LP locked: {}\n",
        unknown(report.contract.verified),
        unknown(report.contract.renounced),
        unknown(report.liquidity.locked)
    ));

    out.push_str(&format!("{}\n", "=".repeat(70)));
    out
}

pub fn print_report(report: &SafetyReport) {
    print!("{}", render_report(report));
}
