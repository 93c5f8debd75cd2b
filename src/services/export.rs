//! CSV rendering of a personal ledger

use crate::models::Transaction;

pub const CSV_HEADER: [&str; 7] = [
    "ID",
    "Type",
    "Category",
    "Amount",
    "Description",
    "Transaction Date",
    "Created At",
];

/// Render transactions as RFC 4180 CSV (CRLF line endings, header row first)
pub fn transactions_to_csv(transactions: &[Transaction]) -> Vec<u8> {
    let mut out = String::new();
    write_record(&mut out, CSV_HEADER.iter().copied());

    for t in transactions {
        let id = t.id.to_string();
        let amount = t.amount.to_string();
        let date = t.transaction_date.format("%Y-%m-%d").to_string();
        let created_at = t.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
        write_record(
            &mut out,
            [
                id.as_str(),
                t.kind.as_str(),
                t.category.as_str(),
                amount.as_str(),
                t.description.as_str(),
                date.as_str(),
                created_at.as_str(),
            ],
        );
    }

    out.into_bytes()
}

fn write_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if field.contains(&[',', '"', '\r', '\n'][..]) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields_are_not_quoted() {
        let mut out = String::new();
        push_field(&mut out, "Groceries");
        assert_eq!(out, "Groceries");
    }

    #[test]
    fn test_special_fields_are_quoted() {
        let mut out = String::new();
        write_record(&mut out, ["a,b", "say \"hi\"", "two\nlines"]);
        assert_eq!(out, "\"a,b\",\"say \"\"hi\"\"\",\"two\nlines\"\r\n");
    }

    #[test]
    fn test_empty_ledger_is_header_only() {
        let csv = String::from_utf8(transactions_to_csv(&[])).unwrap();
        assert_eq!(
            csv,
            "ID,Type,Category,Amount,Description,Transaction Date,Created At\r\n"
        );
    }
}
