// Archivo: codegen.rs
// Propósito: generación del script de transformación para un nodo de
// proceso. Es plantillado de texto determinista: el script nombra las
// tablas de entrada (nodos Storage con arista entrante), las columnas
// de salida declaradas y la lógica del proceso embebida como comentario
// guía. No se ejecuta nada.
use crate::errors::WorkflowError;
use pipeline::{FlowTab, NodePayload};

fn sanitize_identifier(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else {
            out.push('_');
        }
    }
    if out.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(true) {
        out.insert(0, '_');
    }
    out
}

/// Genera el script de transformación del nodo de proceso dado sobre la
/// pestaña. El nodo debe existir y ser de categoría Transform.
pub fn generate_script(tab: &FlowTab, node_id: &str) -> Result<String, WorkflowError> {
    let node = tab.node_by_id(node_id)
                  .ok_or_else(|| WorkflowError::Validation(format!("nodo {} no encontrado", node_id)))?;
    let (output_columns, process_logic) = match &node.data.payload {
        NodePayload::Transform { output_columns, process_logic, .. } => (output_columns, process_logic),
        _ => {
            return Err(WorkflowError::Validation(format!("el nodo {} no es un nodo de proceso", node_id)));
        }
    };

    let inputs = tab.incoming_storage_nodes(node_id);
    let mut script = String::new();
    script.push_str(&format!("# Transformación: {}\n", node.data.label));
    if let Some(description) = &node.data.description {
        script.push_str(&format!("# {}\n", description));
    }
    script.push('\n');
    script.push_str("def load_inputs():\n");
    if inputs.is_empty() {
        script.push_str("    # Sin tablas de entrada conectadas\n");
        script.push_str("    return {}\n");
    } else {
        script.push_str("    tables = {}\n");
        for input in &inputs {
            if let NodePayload::Storage { table_name, columns } = &input.data.payload {
                let ident = sanitize_identifier(table_name);
                let column_names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
                script.push_str(&format!("    tables[\"{}\"] = read_table(\"{}\")  # columnas: {}\n",
                                         ident,
                                         table_name,
                                         column_names.join(", ")));
            }
        }
        script.push_str("    return tables\n");
    }
    script.push('\n');
    script.push_str("def transform(tables):\n");
    if !process_logic.trim().is_empty() {
        script.push_str("    # Lógica declarada:\n");
        for line in process_logic.lines() {
            script.push_str(&format!("    #   {}\n", line));
        }
    }
    script.push_str("    output = []\n");
    script.push_str("    for record in iter_records(tables):\n");
    script.push_str("        row = {}\n");
    for column in output_columns {
        script.push_str(&format!("        row[\"{}\"] = None  # {}\n", column.name, column.data_type));
    }
    script.push_str("        output.append(row)\n");
    script.push_str("    return output\n");
    script.push('\n');
    script.push_str("if __name__ == \"__main__\":\n");
    script.push_str("    write_table(transform(load_inputs()))\n");
    Ok(script)
}
