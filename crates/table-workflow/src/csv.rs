// Archivo: csv.rs
// Propósito: exportación e importación CSV de una tabla. Fila de
// cabecera con los nombres de columna en orden de esquema; valores de
// columnas lista unidos con `;`; campos con comas, comillas o saltos de
// línea van entre comillas con comillas dobladas.
use crate::errors::WorkflowError;
use indexmap::IndexMap;
use table_domain::{CellValue, TableData, TableSchema};

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Exporta las filas de una tabla a CSV según su esquema.
pub fn export_table_csv(table: &TableData) -> String {
    let mut out = String::new();
    let header: Vec<String> = table.schema.columns.iter().map(|c| escape_field(&c.name)).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in &table.rows {
        let fields: Vec<String> = table.schema
                                       .columns
                                       .iter()
                                       .map(|c| {
                                           let rendered = row.value(&c.id)
                                                             .map(|v| v.render())
                                                             .unwrap_or_default();
                                           escape_field(&rendered)
                                       })
                                       .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Parser CSV mínimo: campos entre comillas con comillas dobladas,
/// separador coma, registros separados por `\n` o `\r\n`.
fn parse_csv(raw: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                other => field.push(other),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            other => field.push(other),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

/// Importa un CSV contra un esquema: la cabecera se empareja por nombre
/// de columna y cada campo se coerciona al tipo declarado (listas
/// separadas por `;`). Devuelve los mapas de valores listos para
/// `add_row`; los ids de fila los asigna el almacén.
pub fn import_table_csv(schema: &TableSchema,
                        raw: &str)
                        -> Result<Vec<IndexMap<String, CellValue>>, WorkflowError> {
    let records = parse_csv(raw);
    let mut iter = records.into_iter();
    let header = iter.next().ok_or_else(|| WorkflowError::Import("CSV vacío: falta la cabecera".to_string()))?;

    // índice de campo -> columna del esquema; cabeceras desconocidas se
    // ignoran
    let mapping: Vec<Option<&table_domain::Column>> =
        header.iter().map(|name| schema.column_by_name(name.trim())).collect();
    if mapping.iter().all(Option::is_none) {
        return Err(WorkflowError::Import("ninguna cabecera coincide con el esquema".to_string()));
    }

    let mut rows = Vec::new();
    for record in iter {
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let mut values = IndexMap::new();
        for (idx, column) in mapping.iter().enumerate() {
            if let Some(column) = column {
                let field = record.get(idx).map(String::as_str).unwrap_or("");
                values.insert(column.id.clone(), column.coerce_value(field));
            }
        }
        rows.push(values);
    }
    Ok(rows)
}
