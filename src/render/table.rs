use std::fmt::Write;

use crate::format::FieldDescriptor;
use crate::table::Record;

use super::text::cells;

/// Boxed fixed-width table.
///
/// ```text
/// +------+-----+
/// | name | age |
/// +------+-----+
/// |Ann   |   41|
/// +------+-----+
/// ```
///
/// Columns are two wider than the field (or its name, if longer). Character
/// values are left-justified, everything else right-justified.
pub fn table(fields: &[FieldDescriptor], records: &[Record]) -> String {
    let widths: Vec<usize> = fields
        .iter()
        .map(|f| (f.length as usize).max(f.name.chars().count()) + 2)
        .collect();

    let mut divider = String::from("+");
    for w in &widths {
        divider.push_str(&"-".repeat(*w));
        divider.push('+');
    }
    divider.push('\n');

    let mut out = divider.clone();
    out.push('|');
    for (f, w) in fields.iter().zip(&widths) {
        let _ = write!(out, "{:^w$}|", f.name, w = *w);
    }
    out.push('\n');
    out.push_str(&divider);

    for record in records {
        out.push('|');
        for ((f, w), cell) in fields.iter().zip(&widths).zip(cells(fields, record)) {
            let _ = if f.field_type.left_justified() {
                write!(out, "{cell:<w$}|", w = *w)
            } else {
                write!(out, "{cell:>w$}|", w = *w)
            };
        }
        out.push('\n');
        out.push_str(&divider);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FieldSpec;
    use crate::table::Value;
    use chrono::NaiveDate;

    #[test]
    fn test_table_layout() {
        let fields = FieldSpec::to_descriptors(&[
            FieldSpec::character("name", 4),
            FieldSpec::numeric("age", 3, 0),
            FieldSpec::date("born"),
            FieldSpec::logical("ok"),
        ])
        .unwrap();
        let record = Record::new(
            false,
            vec![
                ("name".to_string(), Value::from("Ann")),
                ("age".to_string(), Value::Numeric(41)),
                (
                    "born".to_string(),
                    Value::Date(NaiveDate::from_ymd_opt(1983, 4, 2).unwrap()),
                ),
                ("ok".to_string(), Value::Logical(true)),
            ],
        );
        let expected = "\
+------+-----+----------+----+
| name | age |   born   | ok |
+------+-----+----------+----+
|Ann   |   41|1983-04-02|   T|
+------+-----+----------+----+
";
        assert_eq!(table(&fields, &[record]), expected);
    }

    #[test]
    fn test_short_field_keeps_its_name_whole() {
        let fields = FieldSpec::to_descriptors(&[
            FieldSpec::character("nickname", 3),
            FieldSpec::numeric("n", 5, 0),
        ])
        .unwrap();
        let record = Record::new(
            false,
            vec![
                ("nickname".to_string(), Value::from("Al")),
                ("n".to_string(), Value::Numeric(7)),
            ],
        );
        let expected = "\
+----------+-------+
| nickname |   n   |
+----------+-------+
|Al        |      7|
+----------+-------+
";
        assert_eq!(table(&fields, &[record]), expected);
    }

    #[test]
    fn test_empty_table() {
        let fields = FieldSpec::to_descriptors(&[FieldSpec::character("id", 2)]).unwrap();
        assert_eq!(table(&fields, &[]), "+----+\n| id |\n+----+\n");
    }
}
