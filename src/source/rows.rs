//! In-memory structured-row adapter.

use crate::error::{Error, Result};
use crate::source::{check_shape, ColumnSpec, DataSource, Row, Samples};

/// A data source backed by pre-assembled structured rows.
///
/// The dtype is fixed up front; every pushed row must match it cell for
/// cell.
#[derive(Debug)]
pub struct RowSource {
    specs: Vec<ColumnSpec>,
    rows: Vec<Row>,
}

impl RowSource {
    /// Creates an empty source with the given dtype.
    pub fn new(specs: Vec<ColumnSpec>) -> Result<RowSource> {
        for spec in &specs {
            check_shape(&spec.name, &spec.shape)?;
        }
        Ok(RowSource {
            specs,
            rows: Vec::new(),
        })
    }

    /// Appends a row, checking it against the dtype.
    pub fn push_row(&mut self, cells: Vec<Samples>) -> Result<()> {
        if cells.len() != self.specs.len() {
            return Err(Error::validation(format!(
                "row has {} cells; the dtype has {} columns",
                cells.len(),
                self.specs.len(),
            )));
        }
        for (spec, cell) in self.specs.iter().zip(&cells) {
            if cell.sample_type() != spec.sample {
                return Err(Error::validation(format!(
                    "cell of column {:?} is {:?}; expected {:?}",
                    spec.name,
                    cell.sample_type(),
                    spec.sample,
                )));
            }
            if cell.len() != spec.element_count() {
                return Err(Error::validation(format!(
                    "cell of column {:?} holds {} values; its shape {:?} needs {}",
                    spec.name,
                    cell.len(),
                    spec.shape,
                    spec.element_count(),
                )));
            }
        }
        self.rows.push(Row::new(cells));
        Ok(())
    }
}

impl DataSource for RowSource {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn dtype(&self) -> &[ColumnSpec] {
        &self.specs
    }

    fn column(&self, name: &str) -> Option<&Samples> {
        // Rows are the unit of storage here; a whole-column view only
        // exists for single-row sources.
        let index = self.specs.iter().position(|spec| spec.name == name)?;
        match self.rows.as_slice() {
            [row] => Some(&row.cells()[index]),
            _ => None,
        }
    }

    fn chunked_rows(
        &self,
        chunk_rows: Option<usize>,
    ) -> Box<dyn Iterator<Item = Result<Vec<Row>>> + '_> {
        let chunk = chunk_rows.unwrap_or(self.rows.len()).max(1);
        Box::new(self.rows.chunks(chunk).map(|rows| Ok(rows.to_vec())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SampleType;

    fn specs() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("t", SampleType::F64, vec![1]),
            ColumnSpec::new("amp", SampleType::F32, vec![3]),
        ]
    }

    #[test]
    fn row_shape_is_enforced() {
        let mut s = RowSource::new(specs()).unwrap();
        s.push_row(vec![
            Samples::F64(vec![0.0]),
            Samples::F32(vec![1.0, 2.0, 3.0]),
        ])
        .unwrap();

        let wrong_type = s.push_row(vec![
            Samples::F32(vec![0.0]),
            Samples::F32(vec![1.0, 2.0, 3.0]),
        ]);
        assert!(wrong_type.is_err());

        let wrong_len = s.push_row(vec![
            Samples::F64(vec![0.0]),
            Samples::F32(vec![1.0]),
        ]);
        assert!(wrong_len.is_err());
        assert_eq!(s.row_count(), 1);
    }

    #[test]
    fn chunking() {
        let mut s = RowSource::new(specs()).unwrap();
        for i in 0..5 {
            s.push_row(vec![
                Samples::F64(vec![i as f64]),
                Samples::F32(vec![0.0; 3]),
            ])
            .unwrap();
        }
        let sizes: Vec<_> = s
            .chunked_rows(Some(2))
            .map(|chunk| chunk.unwrap().len())
            .collect();
        assert_eq!(sizes, [2, 2, 1]);
    }
}
