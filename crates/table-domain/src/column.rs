// column.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Tipo declarado de una columna.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
  String,
  Number,
  Boolean,
  Date,
}

impl fmt::Display for ColumnType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      ColumnType::String => "string",
      ColumnType::Number => "number",
      ColumnType::Boolean => "boolean",
      ColumnType::Date => "date",
    };
    write!(f, "{}", s)
  }
}

/// Valor de una celda, etiquetado por forma.
///
/// Las fechas viajan como texto ISO-8601; una columna `isList` contiene
/// `List` con escalares del tipo declarado. La representación serde es
/// `untagged` para que los documentos se lean de forma natural
/// (`29`, `"texto"`, `["a","b"]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
  Null,
  Bool(bool),
  Number(f64),
  Text(String),
  List(Vec<CellValue>),
}

impl CellValue {
  /// Coerción de texto crudo según el tipo declarado de la columna.
  ///
  /// Reglas: `number` vía parse numérico con 0 como valor por defecto si
  /// falla; `boolean` vía comparación "true" sin distinguir mayúsculas;
  /// `date` y `string` pasan tal cual.
  pub fn coerce(raw: &str, column_type: ColumnType) -> CellValue {
    match column_type {
      ColumnType::Number => CellValue::Number(raw.trim().parse::<f64>().unwrap_or(0.0)),
      ColumnType::Boolean => CellValue::Bool(raw.trim().eq_ignore_ascii_case("true")),
      ColumnType::Date | ColumnType::String => CellValue::Text(raw.to_string()),
    }
  }

  pub fn is_null(&self) -> bool {
    matches!(self, CellValue::Null)
  }

  /// Verifica que el valor tenga la forma escalar del tipo declarado.
  /// `Null` nunca cuenta como escalar válido aquí; la obligatoriedad se
  /// decide por separado con `Column::required`.
  pub fn matches_scalar(&self, column_type: ColumnType) -> bool {
    match (self, column_type) {
      (CellValue::Number(_), ColumnType::Number) => true,
      (CellValue::Bool(_), ColumnType::Boolean) => true,
      (CellValue::Text(_), ColumnType::String) | (CellValue::Text(_), ColumnType::Date) => true,
      _ => false,
    }
  }

  /// Representación textual plana del valor (listas unidas con `;`).
  pub fn render(&self) -> String {
    match self {
      CellValue::Null => String::new(),
      CellValue::Bool(b) => b.to_string(),
      CellValue::Number(n) => {
        if n.fract() == 0.0 && n.abs() < 1e15 {
          format!("{}", *n as i64)
        } else {
          format!("{}", n)
        }
      }
      CellValue::Text(s) => s.clone(),
      CellValue::List(items) => items.iter().map(|v| v.render()).collect::<Vec<_>>().join(";"),
    }
  }
}

/// Definición de una columna dentro de un `TableSchema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
  pub id: String,
  pub name: String,
  #[serde(rename = "type")]
  pub column_type: ColumnType,
  #[serde(default)]
  pub required: bool,
  #[serde(default)]
  pub unique: bool,
  #[serde(rename = "isList", default)]
  pub is_list: bool,
}

impl Column {
  pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
    Self { id: Uuid::new_v4().to_string(),
           name: name.into(),
           column_type,
           required: false,
           unique: false,
           is_list: false }
  }

  pub fn required(mut self) -> Self {
    self.required = true;
    self
  }

  pub fn unique(mut self) -> Self {
    self.unique = true;
    self
  }

  pub fn as_list(mut self) -> Self {
    self.is_list = true;
    self
  }

  /// Coerción de un campo textual crudo al `CellValue` de esta columna.
  /// Para columnas `isList` el texto se separa por `;` y cada elemento se
  /// coerciona por separado.
  pub fn coerce_value(&self, raw: &str) -> CellValue {
    if self.is_list {
      if raw.is_empty() {
        return CellValue::List(Vec::new());
      }
      CellValue::List(raw.split(';').map(|part| CellValue::coerce(part, self.column_type)).collect())
    } else {
      CellValue::coerce(raw, self.column_type)
    }
  }

  /// Verifica que `value` tenga la forma declarada (escalar o lista).
  pub fn accepts(&self, value: &CellValue) -> bool {
    match value {
      CellValue::Null => !self.required,
      CellValue::List(items) => self.is_list && items.iter().all(|v| v.matches_scalar(self.column_type)),
      scalar => !self.is_list && scalar.matches_scalar(self.column_type),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn coerce_number_defaults_to_zero() {
    assert_eq!(CellValue::coerce("29", ColumnType::Number), CellValue::Number(29.0));
    assert_eq!(CellValue::coerce("not-a-number", ColumnType::Number), CellValue::Number(0.0));
  }

  #[test]
  fn coerce_boolean_is_case_insensitive() {
    assert_eq!(CellValue::coerce("TRUE", ColumnType::Boolean), CellValue::Bool(true));
    assert_eq!(CellValue::coerce("True", ColumnType::Boolean), CellValue::Bool(true));
    assert_eq!(CellValue::coerce("yes", ColumnType::Boolean), CellValue::Bool(false));
  }

  #[test]
  fn coerce_list_splits_on_semicolon() {
    let col = Column::new("tags", ColumnType::String).as_list();
    let v = col.coerce_value("a;b;c");
    assert_eq!(v,
               CellValue::List(vec![CellValue::Text("a".into()),
                                    CellValue::Text("b".into()),
                                    CellValue::Text("c".into())]));
  }

  #[test]
  fn accepts_checks_shape_and_required() {
    let required = Column::new("id", ColumnType::String).required();
    assert!(!required.accepts(&CellValue::Null));
    assert!(required.accepts(&CellValue::Text("u1".into())));
    assert!(!required.accepts(&CellValue::Number(1.0)));

    let optional = Column::new("age", ColumnType::Number);
    assert!(optional.accepts(&CellValue::Null));
    assert!(optional.accepts(&CellValue::Number(29.0)));
  }

  #[test]
  fn untagged_round_trip() {
    let v = CellValue::List(vec![CellValue::Number(1.0), CellValue::Text("x".into())]);
    let s = serde_json::to_string(&v).unwrap();
    assert_eq!(s, "[1.0,\"x\"]");
    let back: CellValue = serde_json::from_str(&s).unwrap();
    assert_eq!(back, v);
  }
}
