//! In-memory column-dictionary adapter.

use crate::error::{Error, Result};
use crate::source::{check_shape, ColumnSpec, DataSource, Row, Samples};

/// A data source backed by a dictionary of per-channel arrays.
///
/// Each column stores its values flattened row-major; a column of shape
/// `[s]` with `n` rows holds `n * s` values. All columns must agree on the
/// row count.
#[derive(Debug, Default)]
pub struct ColumnSource {
    specs: Vec<ColumnSpec>,
    data: Vec<Samples>,
    row_count: usize,
}

impl ColumnSource {
    /// Creates an empty source.
    pub fn new() -> ColumnSource {
        ColumnSource::default()
    }

    /// Appends a column. The first column fixes the row count; later
    /// columns must match it.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        data: Samples,
        shape: Vec<usize>,
    ) -> Result<()> {
        let name = name.into();
        check_shape(&name, &shape)?;
        if self.specs.iter().any(|spec| spec.name == name) {
            return Err(Error::validation(format!(
                "column {name:?} added twice"
            )));
        }

        let spec = ColumnSpec::new(name, data.sample_type(), shape);
        let elements = spec.element_count();
        if data.len() % elements != 0 {
            return Err(Error::validation(format!(
                "column {:?} holds {} values, not a multiple of its row size {elements}",
                spec.name,
                data.len(),
            )));
        }
        let rows = data.len() / elements;
        if self.specs.is_empty() {
            self.row_count = rows;
        } else if rows != self.row_count {
            return Err(Error::validation(format!(
                "column {:?} has {rows} rows; the source has {}",
                spec.name, self.row_count,
            )));
        }

        self.specs.push(spec);
        self.data.push(data);
        Ok(())
    }
}

impl DataSource for ColumnSource {
    fn row_count(&self) -> usize {
        self.row_count
    }

    fn dtype(&self) -> &[ColumnSpec] {
        &self.specs
    }

    fn column(&self, name: &str) -> Option<&Samples> {
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .map(|i| &self.data[i])
    }

    fn chunked_rows(
        &self,
        chunk_rows: Option<usize>,
    ) -> Box<dyn Iterator<Item = Result<Vec<Row>>> + '_> {
        let chunk = chunk_rows.unwrap_or(self.row_count).max(1);
        let mut start = 0;
        Box::new(std::iter::from_fn(move || {
            if start >= self.row_count {
                return None;
            }
            let end = (start + chunk).min(self.row_count);
            let rows = (start..end)
                .map(|row| {
                    let cells = self
                        .specs
                        .iter()
                        .zip(&self.data)
                        .map(|(spec, data)| {
                            let elements = spec.element_count();
                            data.slice(row * elements, (row + 1) * elements)
                        })
                        .collect();
                    Row::new(cells)
                })
                .collect();
            start = end;
            Some(Ok(rows))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SampleType;

    fn source() -> ColumnSource {
        let mut s = ColumnSource::new();
        s.add_column("t", Samples::F64(vec![0.0, 1.0, 2.0]), vec![1])
            .unwrap();
        s.add_column(
            "wave",
            Samples::U16(vec![1, 2, 3, 4, 5, 6]),
            vec![2],
        )
        .unwrap();
        s
    }

    #[test]
    fn dtype_and_columns() {
        let s = source();
        assert_eq!(s.row_count(), 3);
        assert_eq!(s.dtype().len(), 2);
        assert_eq!(s.dtype()[1].sample, SampleType::U16);
        assert_eq!(s.column("t").unwrap().len(), 3);
        assert!(s.column("missing").is_none());
    }

    #[test]
    fn mismatched_row_count_rejected() {
        let mut s = source();
        let err = s.add_column("short", Samples::F32(vec![0.0]), vec![1]);
        assert!(err.is_err());
    }

    #[test]
    fn chunked_rows_cover_the_table() {
        let s = source();
        let chunks: Vec<_> = s
            .chunked_rows(Some(2))
            .map(|chunk| chunk.unwrap())
            .collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 2);
        assert_eq!(chunks[1].len(), 1);
        assert_eq!(
            chunks[1][0].cells(),
            &[Samples::F64(vec![2.0]), Samples::U16(vec![5, 6])],
        );
    }

    #[test]
    fn single_chunk_by_default() {
        let s = source();
        let chunks: Vec<_> = s.chunked_rows(None).collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().len(), 3);
    }
}
