use crate::models::{Filter, Transaction};

/// Format cents as a dollar amount with thousands separators: $1,234.56
pub fn money(cents: i64) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let int_part = (abs / 100).to_string();
    let dec_part = abs % 100;

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part:02}")
    } else {
        format!("${with_commas}.{dec_part:02}")
    }
}

/// One-line summary of a transaction, without following its match.
pub fn describe(t: &Transaction) -> String {
    format!(
        "[{}: '{}', '{}', {}]",
        t.date.format("%Y-%m-%d"),
        t.description,
        t.details.as_deref().unwrap_or(""),
        money(t.amount)
    )
}

pub fn describe_filter(f: &Filter) -> String {
    match f.date {
        Some(date) => format!(
            "[filter:'{}', min:{}, max:{}, date:{}]",
            f.regex,
            money(f.min),
            money(f.max),
            date.format("%Y-%m-%d")
        ),
        None => format!("[filter:'{}', min:{}, max:{}]", f.regex, money(f.min), money(f.max)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(123456), "$1,234.56");
        assert_eq!(money(-50000), "-$500.00");
        assert_eq!(money(0), "$0.00");
        assert_eq!(money(100000099), "$1,000,000.99");
        assert_eq!(money(4210), "$42.10");
        assert_eq!(money(-5), "-$0.05");
    }

    #[test]
    fn test_describe() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let bank = Transaction::new(date, "COFFEE SHOP", None, -450);
        assert_eq!(describe(&bank), "[2024-03-05: 'COFFEE SHOP', '', -$4.50]");
        let budget = Transaction::new(date, "Coffee", Some("Dining"), -450);
        assert_eq!(describe(&budget), "[2024-03-05: 'Coffee', 'Dining', -$4.50]");
    }

    #[test]
    fn test_describe_filter() {
        let f = Filter { regex: "COFFEE".into(), min: -1000, max: 0, date: None };
        assert_eq!(describe_filter(&f), "[filter:'COFFEE', min:-$10.00, max:$0.00]");
    }
}
