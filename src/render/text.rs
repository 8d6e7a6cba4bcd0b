use crate::conf::RenderConfig;
use crate::format::FieldDescriptor;
use crate::table::Record;

/// Field values in schema order, joined by `field_sep`; records joined by
/// `record_sep`. Values are written as-is, with no quoting.
pub fn list(
    fields: &[FieldDescriptor],
    records: &[Record],
    field_sep: &str,
    record_sep: &str,
) -> String {
    records
        .iter()
        .map(|record| {
            cells(fields, record)
                .collect::<Vec<_>>()
                .join(field_sep)
        })
        .collect::<Vec<_>>()
        .join(record_sep)
}

/// Delimited text with quoting: a value containing the field separator, a
/// double quote, or a line break is wrapped in quotes with inner quotes
/// doubled. Optionally preceded by a row of field names.
pub fn csv(fields: &[FieldDescriptor], records: &[Record], conf: &RenderConfig) -> String {
    let sep = conf.field_separator.as_str();
    let mut rows = Vec::with_capacity(records.len() + 1);
    if conf.csv_header {
        rows.push(
            fields
                .iter()
                .map(|f| quote(&f.name, sep))
                .collect::<Vec<_>>()
                .join(sep),
        );
    }
    for record in records {
        rows.push(
            cells(fields, record)
                .map(|cell| quote(&cell, sep))
                .collect::<Vec<_>>()
                .join(sep),
        );
    }
    rows.join(&conf.record_separator)
}

pub(super) fn cells<'a>(
    fields: &'a [FieldDescriptor],
    record: &'a Record,
) -> impl Iterator<Item = String> + 'a {
    fields.iter().map(move |f| {
        record
            .get(&f.name)
            .map(|v| v.to_string())
            .unwrap_or_default()
    })
}

fn quote(cell: &str, sep: &str) -> String {
    let needs = cell.contains(sep) || cell.contains(['"', '\n', '\r']);
    if needs {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FieldSpec;
    use crate::table::Value;

    fn fields() -> Vec<FieldDescriptor> {
        FieldSpec::to_descriptors(&[
            FieldSpec::character("name", 20),
            FieldSpec::numeric("age", 3, 0),
        ])
        .unwrap()
    }

    fn row(name: &str, age: i64) -> Record {
        Record::new(
            false,
            vec![
                ("name".to_string(), Value::from(name)),
                ("age".to_string(), Value::Numeric(age)),
            ],
        )
    }

    #[test]
    fn test_list() {
        let records = [row("John Doe", 30), row("Jane Doe", 25)];
        assert_eq!(
            list(&fields(), &records, "|", "\n"),
            "John Doe|30\nJane Doe|25"
        );
        assert_eq!(list(&fields(), &[], "|", "\n"), "");
    }

    #[test]
    fn test_csv_quotes_when_needed() {
        let records = [row("Doe, John", 30), row("Jo \"JJ\" Doe", 25), row("Ann", 7)];
        let text = csv(&fields(), &records, &RenderConfig::default());
        assert_eq!(text, "\"Doe, John\",30\n\"Jo \"\"JJ\"\" Doe\",25\nAnn,7");
    }

    #[test]
    fn test_csv_header_and_separators() {
        let conf = RenderConfig {
            field_separator: String::from(";"),
            record_separator: String::from("\r\n"),
            csv_header: true,
            ..RenderConfig::default()
        };
        let text = csv(&fields(), &[row("Doe, John", 30)], &conf);
        assert_eq!(text, "name;age\r\nDoe, John;30");
    }

    #[test]
    fn test_missing_value_is_blank() {
        let partial = Record::new(false, vec![("age".to_string(), Value::Numeric(3))]);
        assert_eq!(list(&fields(), &[partial], ",", "\n"), ",3");
    }
}
