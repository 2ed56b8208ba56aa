use std::path::Path;

use crate::*;

/// One row of the source file, before coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based data row (the header is row 0)
    pub row: usize,
    pub length: String,
    pub width: String,
    pub group: String,
}

/// A row whose numeric fields have been coerced
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub length: f64,
    pub width: f64,
    pub group: String,
}

impl Record {
    pub fn new(length: f64, width: f64, group: impl Into<String>) -> Self {
        Record {
            length,
            width,
            group: group.into(),
        }
    }

    pub fn field(&self, field: ChartField) -> f64 {
        match field {
            ChartField::Length => self.length,
            ChartField::Width => self.width,
        }
    }
}

/// The raw rows of a dataset, with the columns resolved against a schema
#[derive(Debug)]
pub struct Dataset {
    records: Vec<RawRecord>,
    schema: Schema,
}

impl Dataset {
    /// Read a dataset from a delimited file with a header row
    pub fn load(path: &Path, schema: &Schema) -> ChartResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(schema.delimiter_byte()?)
            .has_headers(true)
            .from_path(path)
            .map_err(|e| ChartError::Load(path.to_path_buf(), e))?;

        Self::from_reader(&mut reader, schema).map_err(|e| match e {
            ChartError::Load(_, inner) => ChartError::Load(path.to_path_buf(), inner),
            e => e,
        })
    }

    pub(crate) fn from_reader<R: std::io::Read>(
        reader: &mut csv::Reader<R>,
        schema: &Schema,
    ) -> ChartResult<Self> {
        let headers = reader
            .headers()
            .map_err(|e| ChartError::Load(Default::default(), e))?
            .clone();

        let column = |name: &str| {
            headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
                ChartError::MissingColumn(
                    name.to_string(),
                    headers.iter().collect::<Vec<_>>().join(", "),
                )
            })
        };
        let length_idx = column(&schema.length_column)?;
        let width_idx = column(&schema.width_column)?;
        let group_idx = column(&schema.group_column)?;

        let records = reader
            .records()
            .enumerate()
            .map(|(i, result)| {
                let record = result.map_err(|e| ChartError::Load(Default::default(), e))?;
                let get = |idx: usize| record.get(idx).unwrap_or_default().to_string();
                Ok(RawRecord {
                    row: i + 1,
                    length: get(length_idx),
                    width: get(width_idx),
                    group: get(group_idx),
                })
            })
            .collect::<ChartResult<Vec<_>>>()?;

        Ok(Self {
            records,
            schema: schema.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Turn the numeric columns into numbers
    ///
    /// The group column is kept as is.
    pub fn coerce(self, policy: CoercionPolicy) -> Vec<Record> {
        let schema = self.schema;
        self.records
            .into_iter()
            .filter_map(|raw| {
                let length = coerce_field(&raw.length, raw.row, &schema.length_column);
                let width = coerce_field(&raw.width, raw.row, &schema.width_column);
                match (length, width, policy) {
                    (Ok(length), Ok(width), _) => Some(Record::new(length, width, raw.group)),
                    (length, width, CoercionPolicy::Passthrough) => Some(Record::new(
                        length.unwrap_or(f64::NAN),
                        width.unwrap_or(f64::NAN),
                        raw.group,
                    )),
                    (Err(e), _, CoercionPolicy::Skip) | (_, Err(e), CoercionPolicy::Skip) => {
                        tracing::warn!("skipping {}", e);
                        None
                    }
                }
            })
            .collect()
    }
}

/// Parse a numeric field
///
/// Surrounding whitespace is ignored. Empty, non-numeric and non-finite
/// values are errors.
pub fn coerce_field(text: &str, row: usize, column: &str) -> Result<f64, CoercionError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CoercionError {
            row,
            column: column.to_string(),
            value: text.to_string(),
        })
}
