//! Shapes: an element type plus concrete dimensions.

use smallvec::SmallVec;

use rondo_dtype::ElementType;

/// Shape of an HLO value. A scalar has no dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    element_type: ElementType,
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    pub fn scalar(element_type: ElementType) -> Self {
        Self { element_type, dims: SmallVec::new() }
    }

    pub fn array(element_type: ElementType, dims: impl IntoIterator<Item = usize>) -> Self {
        Self { element_type, dims: dims.into_iter().collect() }
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Same dimensions, different element type. Used by `Convert` typing.
    pub fn with_element_type(&self, element_type: ElementType) -> Self {
        Self { element_type, dims: self.dims.clone() }
    }

    /// Same dimensions regardless of element type.
    pub fn same_dims(&self, other: &Shape) -> bool {
        self.dims == other.dims
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[", self.element_type)?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}
