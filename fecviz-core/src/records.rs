use fecviz_common::{ContributionRecord, FecVizError, Result};
use std::path::Path;

const CATEGORY_COLUMNS: [&str; 3] = ["state", "category", "contbr_st"];
const AMOUNT_COLUMNS: [&str; 2] = ["amount", "contb_receipt_amt"];

/// Loads `.json` (array of `{state, amount}`) or `.csv` with a header row.
pub fn load_records(path: &Path) -> Result<Vec<ContributionRecord>> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("json") => parse_json(&content),
        Some("csv") => parse_csv(&content),
        other => Err(FecVizError::Other(format!(
            "unsupported input format: {} (use .json or .csv)",
            other.unwrap_or("<none>")
        ))),
    }
}

pub fn parse_json(content: &str) -> Result<Vec<ContributionRecord>> {
    let records: Vec<ContributionRecord> = serde_json::from_str(content)?;
    Ok(records)
}

/// Header names are matched case-insensitively; unknown columns are ignored.
/// Amounts may carry a leading `$` and thousands separators.
pub fn parse_csv(content: &str) -> Result<Vec<ContributionRecord>> {
    let mut lines = content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let Some((_, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = split_csv_line(header).iter().map(|h| h.trim().to_ascii_lowercase()).collect();
    let cat_idx = column_index(&header, &CATEGORY_COLUMNS).ok_or_else(|| FecVizError::InvalidRecord {
        line: 1,
        reason: "header has no state column".into(),
    })?;
    let amt_idx = column_index(&header, &AMOUNT_COLUMNS).ok_or_else(|| FecVizError::InvalidRecord {
        line: 1,
        reason: "header has no amount column".into(),
    })?;

    let mut records = Vec::new();
    for (i, line) in lines {
        let line_no = i + 1;
        let fields = split_csv_line(line);
        let get = |idx: usize| {
            fields.get(idx).ok_or_else(|| FecVizError::InvalidRecord {
                line: line_no,
                reason: format!("expected at least {} fields, got {}", idx + 1, fields.len()),
            })
        };
        let category = get(cat_idx)?.trim().to_string();
        let amount = parse_amount(get(amt_idx)?).map_err(|reason| FecVizError::InvalidRecord { line: line_no, reason })?;
        records.push(ContributionRecord { category, amount });
    }
    Ok(records)
}

fn column_index(header: &[String], names: &[&str]) -> Option<usize> {
    header.iter().position(|h| names.iter().any(|n| *n == h.as_str()))
}

fn parse_amount(raw: &str) -> std::result::Result<f64, String> {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let cleaned: String = body.trim_start_matches('$').chars().filter(|c| *c != ',').collect();
    let v: f64 = cleaned.parse().map_err(|_| format!("amount is not a number: {raw:?}"))?;
    if !v.is_finite() {
        return Err(format!("amount is not finite: {raw:?}"));
    }
    Ok(if negative { -v } else { v })
}

// quote-aware split; "" inside quotes is a literal quote
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                cur.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut cur)),
            _ => cur.push(c),
        }
    }
    fields.push(cur);
    fields
}

/// Distinct categories, sorted.
pub fn categories(records: &[ContributionRecord]) -> Vec<String> {
    let mut cats: Vec<String> = records.iter().map(|r| r.category.clone()).collect();
    cats.sort();
    cats.dedup();
    cats
}

/// Records in `category`, or all of them for `None`.
pub fn filter_category(records: &[ContributionRecord], category: Option<&str>) -> Vec<ContributionRecord> {
    match category {
        Some(c) => records.iter().filter(|r| r.category.eq_ignore_ascii_case(c)).cloned().collect(),
        None => records.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_state_field() {
        let r = parse_json(r#"[{"state":"CA","amount":200},{"state":"CA","amount":10}]"#).unwrap();
        assert_eq!(r, vec![ContributionRecord::new("CA", 200.0), ContributionRecord::new("CA", 10.0)]);
    }

    #[test]
    fn json_missing_amount_is_error() {
        assert!(matches!(parse_json(r#"[{"state":"CA"}]"#), Err(FecVizError::Json(_))));
    }

    #[test]
    fn csv_with_extra_columns_and_quotes() {
        let csv = "cmte_id,contbr_nm,contbr_st,contb_receipt_amt\nC1,\"DOE, JANE\",NY,\"$1,250.00\"\nC1,SMITH,CA,-25\n";
        let r = parse_csv(csv).unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r[0], ContributionRecord::new("NY", 1250.0));
        assert_eq!(r[1].amount, -25.0);
    }

    #[test]
    fn csv_bad_amount_names_line() {
        let err = parse_csv("state,amount\nCA,10\nCA,abc\n").unwrap_err();
        assert!(matches!(err, FecVizError::InvalidRecord { line: 3, .. }));
    }

    #[test]
    fn csv_rejects_nan() {
        assert!(parse_csv("state,amount\nCA,NaN\n").is_err());
    }

    #[test]
    fn csv_needs_amount_header() {
        assert!(matches!(parse_csv("state,total\nCA,1\n"), Err(FecVizError::InvalidRecord { line: 1, .. })));
    }

    #[test]
    fn csv_short_row() {
        assert!(parse_csv("state,amount\nCA\n").is_err());
    }

    #[test]
    fn empty_csv_is_empty() {
        assert!(parse_csv("").unwrap().is_empty());
    }

    #[test]
    fn category_helpers() {
        let r = vec![
            ContributionRecord::new("NY", 1.0),
            ContributionRecord::new("CA", 2.0),
            ContributionRecord::new("NY", 3.0),
        ];
        assert_eq!(categories(&r), vec!["CA", "NY"]);
        assert_eq!(filter_category(&r, Some("ny")).len(), 2);
        assert_eq!(filter_category(&r, None).len(), 3);
    }
}
