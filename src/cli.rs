use std::io::Write;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::conf::{Config, RenderConfig};
use crate::core::{Command, DbfError};
use crate::format::{FieldSpec, FieldType};
use crate::query::{Comparator, DELETED_KEY, Search, equals};
use crate::render;
use crate::table::{Record, TableFile, Value};

#[derive(Serialize)]
struct Hit<'a> {
    index: usize,
    record: &'a Record,
}

/// Execute one subcommand, writing its output to `out`.
pub fn run(command: Command, conf: &Config, out: &mut dyn Write) -> Result<(), DbfError> {
    match command {
        Command::Info { path } => {
            let table = open(&path, conf)?;
            writeln!(out, "{table}")?;
        }
        Command::Schema { path } => {
            let table = open(&path, conf)?;
            for f in table.fields() {
                writeln!(
                    out,
                    "{:<11} {} {:>3} {:>2}",
                    f.name(),
                    f.field_type(),
                    f.length(),
                    f.decimal()
                )?;
            }
        }
        Command::Csv { path, header } => {
            let mut table = open(&path, conf)?;
            let records = table.all()?;
            let render = RenderConfig {
                csv_header: header || conf.render.csv_header,
                ..conf.render.clone()
            };
            let text = render::csv(table.fields(), &records, &render);
            write_block(out, &text)?;
        }
        Command::List { path } => {
            let mut table = open(&path, conf)?;
            let records = table.all()?;
            let text = render::list(
                table.fields(),
                &records,
                &conf.render.list_separator,
                &conf.render.record_separator,
            );
            write_block(out, &text)?;
        }
        Command::Table {
            path,
            start,
            stop,
            step,
        } => {
            let mut table = open(&path, conf)?;
            let records = table.slice(start, stop, step)?;
            write!(out, "{}", render::table(table.fields(), &records))?;
        }
        Command::Get { path, index } => {
            let mut table = open(&path, conf)?;
            let record = table.get(index)?;
            writeln!(out, "{}", to_json(&record)?)?;
        }
        Command::Search {
            path,
            field,
            value,
            all,
        } => {
            let mut table = open(&path, conf)?;
            let (value, cmp) = query_value(&table, &field, &value)?;
            let hits = if all {
                table.matches(&field, &value, cmp)?
            } else {
                table.search(&field, &value, 0, cmp)?.into_iter().collect()
            };
            if hits.is_empty() {
                info!("no record matches {field} = {value}");
            }
            for (index, record) in &hits {
                let hit = Hit {
                    index: *index,
                    record,
                };
                writeln!(out, "{}", to_json(&hit)?)?;
            }
        }
        Command::Append { path, values } => {
            let mut table = open(&path, conf)?;
            if values.len() != table.fields().len() {
                return Err(DbfError::ArityError {
                    expected: table.fields().len(),
                    got: values.len(),
                });
            }
            let values = table
                .fields()
                .iter()
                .zip(&values)
                .map(|(f, text)| Value::parse_as(f, text))
                .collect::<Result<Vec<_>, _>>()?;
            let index = table.append(&values)?;
            writeln!(out, "{index}")?;
        }
        Command::Create { path, fields } => {
            let table = TableFile::create_with(&path, &fields, conf.table.options())?;
            writeln!(out, "{table}")?;
        }
        Command::Delete {
            path,
            index,
            undelete,
        } => {
            let mut table = open(&path, conf)?;
            table.soft_delete(index, !undelete)?;
        }
        Command::Compact { path, output } => {
            let table = open(&path, conf)?;
            let table = match output {
                Some(dest) => table.compact_into(dest)?,
                None => table.compact()?,
            };
            writeln!(out, "{table}")?;
        }
    }
    Ok(())
}

fn open(path: &Path, conf: &Config) -> Result<TableFile, DbfError> {
    TableFile::open_with(path, conf.table.options())
}

/// Parse `text` for the field it will be compared against. Logical fields
/// and the deleted flag have no default comparator, so they get equality.
fn query_value(
    table: &TableFile,
    field: &str,
    text: &str,
) -> Result<(Value, Option<&'static Comparator>), DbfError> {
    let eq: &'static Comparator = &equals;
    if let Some(f) = table.field(field) {
        let value = Value::parse_as(f, text)?;
        let cmp = (f.field_type == FieldType::Logical).then_some(eq);
        return Ok((value, cmp));
    }
    if field.trim().eq_ignore_ascii_case(DELETED_KEY) {
        let flag = FieldSpec::to_descriptors(&[FieldSpec::logical(DELETED_KEY)])?;
        let value = Value::parse_as(&flag[0], text)?;
        return Ok((value, Some(eq)));
    }
    Err(DbfError::UnknownField(field.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, DbfError> {
    serde_json::to_string(value).map_err(|e| DbfError::IoError(e.to_string()))
}

fn write_block(out: &mut dyn Write, text: &str) -> Result<(), DbfError> {
    if !text.is_empty() {
        writeln!(out, "{text}")?;
    }
    Ok(())
}
