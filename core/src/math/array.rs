use ndarray::{Array1, Array2, ArrayD, ArrayViewD, Axis};
use serde::ser::{Error as _, SerializeSeq};
use serde::{Serialize, Serializer};

/// Numeric n-dimensional array carried inside a serializable value.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    Float(ArrayD<f64>),
    Int(ArrayD<i64>),
}

impl NumericArray {
    pub fn shape(&self) -> &[usize] {
        match self {
            NumericArray::Float(array) => array.shape(),
            NumericArray::Int(array) => array.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }
}

impl Serialize for NumericArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NumericArray::Float(array) => NestedArray(array.view()).serialize(serializer),
            NumericArray::Int(array) => NestedArray(array.view()).serialize(serializer),
        }
    }
}

impl From<ArrayD<f64>> for NumericArray {
    fn from(array: ArrayD<f64>) -> Self {
        NumericArray::Float(array)
    }
}

impl From<Array1<f64>> for NumericArray {
    fn from(array: Array1<f64>) -> Self {
        NumericArray::Float(array.into_dyn())
    }
}

impl From<Array2<f64>> for NumericArray {
    fn from(array: Array2<f64>) -> Self {
        NumericArray::Float(array.into_dyn())
    }
}

impl From<ArrayD<i64>> for NumericArray {
    fn from(array: ArrayD<i64>) -> Self {
        NumericArray::Int(array)
    }
}

impl From<Array1<i64>> for NumericArray {
    fn from(array: Array1<i64>) -> Self {
        NumericArray::Int(array.into_dyn())
    }
}

impl From<Array2<i64>> for NumericArray {
    fn from(array: Array2<i64>) -> Self {
        NumericArray::Int(array.into_dyn())
    }
}

/// Scalar element type that may appear in a [`NestedArray`].
pub trait ArrayElement {
    fn serialize_scalar<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>;
}

impl ArrayElement for f64 {
    fn serialize_scalar<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_finite() {
            return Err(S::Error::custom(format!(
                "Out of range float values are not JSON compliant: {}",
                self
            )));
        }
        serializer.serialize_f64(*self)
    }
}

impl ArrayElement for i64 {
    fn serialize_scalar<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*self)
    }
}

/// Serializes an array view as plain nested sequences, one level per axis.
/// A zero-dimensional view becomes its scalar.
pub struct NestedArray<'a, A>(pub ArrayViewD<'a, A>);

impl<A: ArrayElement> Serialize for NestedArray<'_, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.ndim() == 0 {
            let scalar = self
                .0
                .iter()
                .next()
                .ok_or_else(|| S::Error::custom("zero-dimensional array without a value"))?;
            return scalar.serialize_scalar(serializer);
        }

        let mut seq = serializer.serialize_seq(Some(self.0.len_of(Axis(0))))?;
        for lane in self.0.axis_iter(Axis(0)) {
            seq.serialize_element(&NestedArray(lane))?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr0, arr2, Array3};

    #[test]
    fn int_matrix_serializes_as_nested_lists() {
        let array = NumericArray::from(arr2(&[[1_i64, 0], [0, 1]]));
        assert_eq!(serde_json::to_string(&array).unwrap(), "[[1,0],[0,1]]");
    }

    #[test]
    fn zero_dimensional_array_is_a_scalar() {
        let array = NumericArray::from(arr0(4.5_f64).into_dyn());
        assert_eq!(array.ndim(), 0);
        assert_eq!(serde_json::to_string(&array).unwrap(), "4.5");
    }

    #[test]
    fn three_dimensional_array_nests_every_axis() {
        let array = NumericArray::from(Array3::<f64>::zeros((2, 1, 2)).into_dyn());
        assert_eq!(
            serde_json::to_string(&array).unwrap(),
            "[[[0.0,0.0]],[[0.0,0.0]]]"
        );
    }

    #[test]
    fn empty_leading_axis_is_an_empty_list() {
        let array = NumericArray::from(Array2::<f64>::zeros((0, 3)));
        assert_eq!(array.shape(), &[0, 3]);
        assert_eq!(serde_json::to_string(&array).unwrap(), "[]");
    }

    #[test]
    fn nan_elements_are_rejected() {
        let array = NumericArray::from(Array1::from(vec![1.0, f64::NAN]));
        let err = serde_json::to_string(&array).unwrap_err();
        assert!(err.to_string().contains("not JSON compliant"));
    }
}
