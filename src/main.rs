use indexmap::IndexMap;
use std::error::Error;
use std::io::{self, Write};
use table_domain::{CellValue, Column, ColumnType, Relationship, RelationshipType, TableSchema};
use table_workflow::StudioService;

/// Pequeño menú interactivo para administrar el conjunto de datos de
/// tablas usando el almacén proporcionado por `table-persistence`.
///
/// Opciones soportadas:
/// 1) Ver tablas (tabla con id, nombre y filas)
/// 2) Crear tabla
/// 3) Añadir fila a una tabla
/// 4) Ver filas de una tabla
/// 5) Crear relación entre dos tablas
/// 6) Eliminar tabla (y sus relaciones)
/// 7) Exportar documento JSON a un archivo
/// 8) Salir
fn main() -> Result<(), Box<dyn Error>> {
    // Inicializar el almacén (carga inicial desde el documento en disco)
    let store = table_persistence::new_from_env().map_err(|e| Box::new(e) as Box<dyn Error>)?;
    let service = StudioService::new(store);

    loop {
        println!("\n== Tableflow CLI menu ==");
        println!("1) Ver tablas");
        println!("2) Crear tabla");
        println!("3) Añadir fila a una tabla");
        println!("4) Ver filas de una tabla");
        println!("5) Crear relación");
        println!("6) Eliminar tabla");
        println!("7) Exportar JSON a archivo");
        println!("8) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                match service.store().list_tables() {
                    Ok(tables) => {
                        println!("\nID                                   | NOMBRE               | FILAS");
                        println!("--------------------------------------------------------------------");
                        for t in tables {
                            println!("{} | {:<20} | {}", t.schema.id, t.schema.name, t.rows.len());
                        }
                    }
                    Err(e) => eprintln!("Error listando tablas: {}", e),
                }
            }
            "2" => {
                let name = prompt("Nombre de la tabla: ")?;
                if name.trim().is_empty() {
                    eprintln!("Nombre vacío");
                    continue;
                }
                let mut columns = Vec::new();
                loop {
                    let col_name = prompt("Nombre de columna (enter para terminar): ")?;
                    if col_name.trim().is_empty() {
                        break;
                    }
                    let ty = prompt("Tipo (string/number/boolean/date): ")?;
                    let column_type = match ty.trim() {
                        "number" => ColumnType::Number,
                        "boolean" => ColumnType::Boolean,
                        "date" => ColumnType::Date,
                        _ => ColumnType::String,
                    };
                    let mut column = Column::new(col_name.trim(), column_type);
                    if prompt("¿Obligatoria? (s/n): ")?.trim().eq_ignore_ascii_case("s") {
                        column = column.required();
                    }
                    columns.push(column);
                }
                match TableSchema::new(name.trim(), columns) {
                    Ok(schema) => match service.create_table(schema) {
                        Ok(created) => println!("Tabla creada: {}", created.id),
                        Err(e) => eprintln!("Error creando tabla: {}", e),
                    },
                    Err(e) => eprintln!("Esquema inválido: {}", e),
                }
            }
            "3" => {
                let table_id = prompt("Id de la tabla: ")?;
                let table = match service.store().get_table_by_id(table_id.trim()) {
                    Ok(Some(t)) => t,
                    Ok(None) => {
                        eprintln!("Tabla no encontrada");
                        continue;
                    }
                    Err(e) => {
                        eprintln!("Error buscando la tabla: {}", e);
                        continue;
                    }
                };
                let mut values: IndexMap<String, CellValue> = IndexMap::new();
                for column in &table.schema.columns {
                    let raw = prompt(&format!("{} ({}): ", column.name, column.column_type))?;
                    let raw = raw.trim();
                    if raw.is_empty() && !column.required {
                        continue;
                    }
                    values.insert(column.id.clone(), column.coerce_value(raw));
                }
                match service.add_row(table_id.trim(), values) {
                    Ok(Some(row)) => println!("Fila creada: {}", row.id),
                    Ok(None) => eprintln!("Tabla no encontrada"),
                    Err(e) => eprintln!("Error añadiendo fila: {}", e),
                }
            }
            "4" => {
                let table_id = prompt("Id de la tabla: ")?;
                match service.store().get_table_by_id(table_id.trim()) {
                    Ok(Some(table)) => {
                        for row in &table.rows {
                            let rendered: Vec<String> =
                                table.schema
                                     .columns
                                     .iter()
                                     .map(|c| {
                                         let value = row.value(&c.id).map(|v| v.render()).unwrap_or_default();
                                         format!("{}={}", c.name, value)
                                     })
                                     .collect();
                            println!("{} | {}", row.id, rendered.join(", "));
                        }
                    }
                    Ok(None) => eprintln!("Tabla no encontrada"),
                    Err(e) => eprintln!("Error leyendo filas: {}", e),
                }
            }
            "5" => {
                let from_table = prompt("Tabla origen (id): ")?;
                let from_column = prompt("Columna origen (id): ")?;
                let to_table = prompt("Tabla destino (id): ")?;
                let to_column = prompt("Columna destino (id): ")?;
                let ty = prompt("Tipo (one-to-one/one-to-many/many-to-many): ")?;
                let relationship_type = match ty.trim() {
                    "one-to-one" => RelationshipType::OneToOne,
                    "many-to-many" => RelationshipType::ManyToMany,
                    _ => RelationshipType::OneToMany,
                };
                let rel = Relationship::new(from_table.trim(),
                                            from_column.trim(),
                                            to_table.trim(),
                                            to_column.trim(),
                                            relationship_type);
                match service.add_relationship(rel) {
                    Ok(()) => println!("Relación creada"),
                    Err(e) => eprintln!("Error creando relación: {}", e),
                }
            }
            "6" => {
                let table_id = prompt("Id de la tabla a eliminar: ")?;
                let confirm = prompt(&format!("Confirma borrado de {}? escribir 'yes' para confirmar: ",
                                              table_id.trim()))?;
                if confirm.trim().to_lowercase() == "yes" {
                    match service.store().delete_table(table_id.trim()) {
                        Ok(()) => println!("Tabla eliminada: {}", table_id.trim()),
                        Err(e) => eprintln!("Error eliminando tabla: {}", e),
                    }
                } else {
                    println!("Borrado cancelado");
                }
            }
            "7" => {
                let path = prompt("Ruta del archivo de exportación: ")?;
                match service.export_json() {
                    Ok(body) => match std::fs::write(path.trim(), body) {
                        Ok(()) => println!("Exportado a {}", path.trim()),
                        Err(e) => eprintln!("Error escribiendo el archivo: {}", e),
                    },
                    Err(e) => eprintln!("Error exportando: {}", e),
                }
            }
            "8" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
