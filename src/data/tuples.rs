//! Tuple-level access shared by the numeric 1-D arrays.
//!
//! Implementors expose a flat value buffer of `size()` slots, of which
//! `[0, max_id]` are in use, grouped into tuples of `number_of_components()`
//! values. The provided methods build tuple and component access, insertion
//! with growth, value ranges and interpolation on top of those primitives,
//! reading and writing every value as `f64`.

use crate::array_error::ArrayError;
use crate::types::scalar::IdType;

/// Shared tuple operations for numeric 1-D arrays.
pub trait TupleAccess {
    /// Values per tuple (at least 1).
    fn number_of_components(&self) -> usize;

    /// Highest value index in use, `-1` when empty.
    fn max_id(&self) -> IdType;

    /// Allocated value slots.
    fn size(&self) -> usize;

    /// Value at `index < size()` widened to `f64`.
    fn value_f64(&self, index: usize) -> f64;

    /// Cast `v` and store it at `index < size()`.
    fn store_f64(&mut self, index: usize, v: f64);

    /// Make room for at least `len` value slots.
    ///
    /// Growth is additive: when `len` exceeds the current size the new size
    /// is `size() + len`.
    fn grow_to(&mut self, len: usize);

    /// Record a new highest value index.
    fn set_max_id(&mut self, id: IdType);

    /// Number of values in use, `max_id + 1`.
    fn number_of_values(&self) -> usize {
        (self.max_id() + 1) as usize
    }

    /// Number of complete tuples.
    ///
    /// Values past the last full tuple are not counted.
    fn number_of_tuples(&self) -> usize {
        self.number_of_values() / self.number_of_components()
    }

    /// Error unless `i` names an existing tuple.
    fn check_tuple(&self, i: IdType) -> Result<(), ArrayError> {
        let n = self.number_of_tuples();
        if i < 0 || i as usize >= n {
            return Err(ArrayError::IndexOutOfRange { index: i, len: n });
        }
        Ok(())
    }

    /// Error unless `values` holds exactly one tuple.
    fn check_tuple_len(&self, values: &[f64]) -> Result<(), ArrayError> {
        let nc = self.number_of_components();
        if values.len() != nc {
            return Err(ArrayError::ComponentCountMismatch {
                expected: nc,
                found: values.len(),
            });
        }
        Ok(())
    }

    /// Error unless `j` names a component.
    fn check_component(&self, j: i64) -> Result<(), ArrayError> {
        let nc = self.number_of_components();
        if j < 0 || j as usize >= nc {
            return Err(ArrayError::ComponentOutOfRange { component: j, components: nc });
        }
        Ok(())
    }

    /// Copy tuple `i` into `out`.
    fn tuple_into(&self, i: IdType, out: &mut [f64]) -> Result<(), ArrayError> {
        self.check_tuple(i)?;
        self.check_tuple_len(out)?;
        let base = i as usize * self.number_of_components();
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = self.value_f64(base + k);
        }
        Ok(())
    }

    /// Tuple `i` as `f64` values.
    fn tuple(&self, i: IdType) -> Result<Vec<f64>, ArrayError> {
        let mut out = vec![0.0; self.number_of_components()];
        self.tuple_into(i, &mut out)?;
        Ok(out)
    }

    /// Overwrite existing tuple `i`.
    fn set_tuple(&mut self, i: IdType, values: &[f64]) -> Result<(), ArrayError> {
        self.check_tuple(i)?;
        self.check_tuple_len(values)?;
        let base = i as usize * self.number_of_components();
        for (k, &v) in values.iter().enumerate() {
            self.store_f64(base + k, v);
        }
        Ok(())
    }

    /// Write tuple `i`, growing the array if needed.
    fn insert_tuple(&mut self, i: IdType, values: &[f64]) -> Result<(), ArrayError> {
        if i < 0 {
            return Err(ArrayError::IndexOutOfRange { index: i, len: self.number_of_tuples() });
        }
        self.check_tuple_len(values)?;
        let nc = self.number_of_components();
        let base = i as usize * nc;
        let end = base + nc;
        if end > self.size() {
            self.grow_to(end);
        }
        for (k, &v) in values.iter().enumerate() {
            self.store_f64(base + k, v);
        }
        let last = end as IdType - 1;
        if last > self.max_id() {
            self.set_max_id(last);
        }
        Ok(())
    }

    /// Append a tuple and return its index.
    fn insert_next_tuple(&mut self, values: &[f64]) -> Result<IdType, ArrayError> {
        let i = self.number_of_tuples() as IdType;
        self.insert_tuple(i, values)?;
        Ok(i)
    }

    /// Component `j` of tuple `i`.
    fn component(&self, i: IdType, j: i64) -> Result<f64, ArrayError> {
        self.check_tuple(i)?;
        self.check_component(j)?;
        Ok(self.value_f64(i as usize * self.number_of_components() + j as usize))
    }

    /// Overwrite component `j` of existing tuple `i`.
    fn set_component(&mut self, i: IdType, j: i64, v: f64) -> Result<(), ArrayError> {
        self.check_tuple(i)?;
        self.check_component(j)?;
        let index = i as usize * self.number_of_components() + j as usize;
        self.store_f64(index, v);
        Ok(())
    }

    /// Write component `j` of tuple `i`, growing the array if needed.
    fn insert_component(&mut self, i: IdType, j: i64, v: f64) -> Result<(), ArrayError> {
        self.check_component(j)?;
        if i < 0 {
            return Err(ArrayError::IndexOutOfRange { index: i, len: self.number_of_tuples() });
        }
        let index = i as usize * self.number_of_components() + j as usize;
        if index >= self.size() {
            self.grow_to(index + 1);
        }
        self.store_f64(index, v);
        if index as IdType > self.max_id() {
            self.set_max_id(index as IdType);
        }
        Ok(())
    }

    /// Set component `j` of every tuple to `v`.
    fn fill_component(&mut self, j: i64, v: f64) -> Result<(), ArrayError> {
        self.check_component(j)?;
        let nc = self.number_of_components();
        for i in 0..self.number_of_tuples() {
            self.store_f64(i * nc + j as usize, v);
        }
        Ok(())
    }

    /// `[min, max]` of component `j`, or of the tuple L2 norm when `j == -1`.
    ///
    /// `None` for an empty array.
    fn range(&self, j: i64) -> Result<Option<[f64; 2]>, ArrayError> {
        if j != -1 {
            self.check_component(j)?;
        }
        let nc = self.number_of_components();
        let mut out: Option<[f64; 2]> = None;
        for i in 0..self.number_of_tuples() {
            let base = i * nc;
            let v = if j == -1 {
                (0..nc)
                    .map(|k| self.value_f64(base + k).powi(2))
                    .sum::<f64>()
                    .sqrt()
            } else {
                self.value_f64(base + j as usize)
            };
            out = Some(match out {
                None => [v, v],
                Some([lo, hi]) => [lo.min(v), hi.max(v)],
            });
        }
        Ok(out)
    }

    /// Write at tuple `i` the weighted sum of tuples `ids` of `source`.
    fn interpolate_tuple(
        &mut self,
        i: IdType,
        ids: &[IdType],
        source: &dyn TupleAccess,
        weights: &[f64],
    ) -> Result<(), ArrayError> {
        let nc = self.number_of_components();
        if source.number_of_components() != nc {
            return Err(ArrayError::ComponentCountMismatch {
                expected: nc,
                found: source.number_of_components(),
            });
        }
        if ids.len() != weights.len() {
            return Err(ArrayError::TupleCountMismatch { left: ids.len(), right: weights.len() });
        }
        let mut acc = vec![0.0; nc];
        for (&id, &w) in ids.iter().zip(weights) {
            source.check_tuple(id)?;
            let base = id as usize * nc;
            for (k, slot) in acc.iter_mut().enumerate() {
                *slot += w * source.value_f64(base + k);
            }
        }
        self.insert_tuple(i, &acc)
    }

    /// Write at tuple `i` the blend `(1-t)*source1[id1] + t*source2[id2]`.
    fn interpolate_tuple_pair(
        &mut self,
        i: IdType,
        id1: IdType,
        source1: &dyn TupleAccess,
        id2: IdType,
        source2: &dyn TupleAccess,
        t: f64,
    ) -> Result<(), ArrayError> {
        let nc = self.number_of_components();
        for source in [source1, source2] {
            if source.number_of_components() != nc {
                return Err(ArrayError::ComponentCountMismatch {
                    expected: nc,
                    found: source.number_of_components(),
                });
            }
        }
        let a = source1.tuple(id1)?;
        let b = source2.tuple(id2)?;
        let blended: Vec<f64> = a.iter().zip(&b).map(|(x, y)| (1.0 - t) * x + t * y).collect();
        self.insert_tuple(i, &blended)
    }
}
